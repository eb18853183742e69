use anyhow::Result;
use clap::Parser;
use crs_advisor::cli::{Cli, Commands, ConvertArgs, LanguageSubcommand, RunArgs, TablesSubcommand};
use crs_advisor::config::{self, CONFIG_FILE_NAME};
use crs_advisor::core::language::{LanguageTest, TestResult};
use crs_advisor::core::profile::{LanguageAbility, Skill};
use crs_advisor::core::tables::PointTables;
use crs_advisor::core::{self as engine, RunProfile};
use crs_advisor::telemetry;
use serde::Serialize;
use std::path::{Path, PathBuf};

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;

    match cli.command {
        Commands::Score(args) => {
            let profile = if args.no_advice {
                RunProfile::ScoreOnly
            } else {
                RunProfile::Full
            };
            run_profile(args.run, profile)
        }
        Commands::Advise(args) => run_profile(args, RunProfile::AdviceOnly),
        Commands::Init(args) => {
            let cwd = std::env::current_dir()?;
            let path = args
                .config
                .map_or_else(|| cwd.join(CONFIG_FILE_NAME), |path| resolve_path(&cwd, &path));
            config::write_default_config(&path)?;
            println!("created {}", path.display());
            Ok(0)
        }
        Commands::Tables { command } => match command {
            TablesSubcommand::Show(args) => {
                let cwd = std::env::current_dir()?;
                let loaded = config::load_config(args.config.as_deref(), &cwd)?;
                let tables = engine::load_tables(&loaded, &cwd)?;
                if args.json || loaded.config.general.json {
                    println!("{}", serde_json::to_string_pretty(&*tables)?);
                } else {
                    print!("{}", tables.to_toml_string()?);
                }
                Ok(0)
            }
            TablesSubcommand::Validate(args) => {
                let cwd = std::env::current_dir()?;
                match PointTables::load(&resolve_path(&cwd, &args.path)) {
                    Ok(tables) => {
                        println!(
                            "valid point tables {} (effective {})",
                            tables.version, tables.effective
                        );
                        Ok(0)
                    }
                    Err(err) => {
                        println!("invalid: {err:#}");
                        Ok(1)
                    }
                }
            }
        },
        Commands::Language { command } => match command {
            LanguageSubcommand::Convert(args) => convert_language(args),
        },
    }
}

fn run_profile(args: RunArgs, profile: RunProfile) -> Result<i32> {
    let cwd = std::env::current_dir()?;
    let loaded = config::load_config(args.config.as_deref(), &cwd)?;
    let tables = engine::load_tables(&loaded, &cwd)?;
    let target = resolve_path(&cwd, &args.path);
    let skip = engine::support_files(&loaded, &cwd);
    let report = engine::run_profiles(&target, &loaded.config, &tables, profile, &skip)?;

    let output_json = args.json || loaded.config.general.json;
    if output_json {
        let json_report = engine::report::JsonReport::from(&report);
        println!("{}", serde_json::to_string_pretty(&json_report)?);
    } else {
        engine::report::print_human(&report);
    }

    if report.exit.ok { Ok(0) } else { Ok(1) }
}

#[derive(Debug, Serialize)]
struct ConversionReport {
    test: LanguageTest,
    scale: &'static str,
    levels: LanguageAbility,
    min_level: u8,
}

fn convert_language(args: ConvertArgs) -> Result<i32> {
    let result = TestResult {
        test: args.test.into(),
        speaking: args.speaking,
        listening: args.listening,
        reading: args.reading,
        writing: args.writing,
    };
    let levels = result.to_ability()?;
    let scale = if result.test.is_french() { "NCLC" } else { "CLB" };

    if args.json {
        let report = ConversionReport {
            test: result.test,
            scale,
            levels,
            min_level: levels.min_level(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(0);
    }

    println!("{}", result.test);
    for skill in Skill::ALL {
        println!(
            "  {:<10} {:>5} -> {} {}",
            skill.as_str(),
            result.raw(skill),
            scale,
            levels.skill(skill).level()
        );
    }
    println!("lowest: {} {}", scale, levels.min_level());
    Ok(0)
}

fn resolve_path(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
