use crate::core::language::LanguageTest;
use crate::telemetry::DEFAULT_LOG_LEVEL;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "crs-advisor",
    version,
    about = "Express Entry CRS score calculator with ranked improvement advice"
)]
pub struct Cli {
    /// Log filter used when CRS_LOG and RUST_LOG are unset.
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score a profile file or a directory of profiles.
    Score(ScoreArgs),
    /// Show ranked improvement suggestions.
    Advise(RunArgs),
    /// Write a default crs-advisor.toml into the current directory.
    Init(InitArgs),
    Tables {
        #[command(subcommand)]
        command: TablesSubcommand,
    },
    Language {
        #[command(subcommand)]
        command: LanguageSubcommand,
    },
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Profile file, or a directory of profile files.
    #[arg(long)]
    pub path: PathBuf,
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub run: RunArgs,
    #[arg(long)]
    pub no_advice: bool,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum TablesSubcommand {
    /// Print the point tables in effect.
    Show(TablesShowArgs),
    /// Check a point-table file without using it.
    Validate(TablesValidateArgs),
}

#[derive(Debug, Args)]
pub struct TablesShowArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TablesValidateArgs {
    #[arg(long)]
    pub path: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum LanguageSubcommand {
    /// Convert raw test results to CLB/NCLC levels.
    Convert(ConvertArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TestArg {
    Ielts,
    Celpip,
    Tef,
    Tcf,
}

impl From<TestArg> for LanguageTest {
    fn from(test: TestArg) -> Self {
        match test {
            TestArg::Ielts => Self::Ielts,
            TestArg::Celpip => Self::Celpip,
            TestArg::Tef => Self::Tef,
            TestArg::Tcf => Self::Tcf,
        }
    }
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    #[arg(long, value_enum)]
    pub test: TestArg,
    #[arg(long)]
    pub speaking: String,
    #[arg(long)]
    pub listening: String,
    #[arg(long)]
    pub reading: String,
    #[arg(long)]
    pub writing: String,
    #[arg(long)]
    pub json: bool,
}
