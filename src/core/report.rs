use crate::config::Config;
use crate::core::RunProfile;
use crate::core::advisor::{ImprovementAnalysis, ImprovementSuggestion, Priority};
use crate::core::profile::CandidateProfile;
use crate::core::score::{CategoryBreakdown, ScoreCategory, ScoreDetails, ScoreResult, Standing};
use colored::Colorize;
use serde::Serialize;

impl Standing {
    fn colored(self) -> String {
        match self {
            Self::Excellent => self.label().green().bold().to_string(),
            Self::Competitive => self.label().blue().bold().to_string(),
            Self::GoodProgress => self.label().yellow().bold().to_string(),
            Self::NeedsImprovement => self.label().red().bold().to_string(),
        }
    }
}

impl Priority {
    fn colored(self) -> String {
        match self {
            Self::High => self.as_str().red().bold().to_string(),
            Self::Medium => self.as_str().yellow().bold().to_string(),
            Self::Low => self.as_str().blue().bold().to_string(),
        }
    }
}

/// One row of the category breakdown with the ceiling that applied to it.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CategoryLine {
    pub category: ScoreCategory,
    pub points: u32,
    pub ceiling: u32,
}

impl CategoryLine {
    pub fn percent(&self) -> u32 {
        if self.ceiling == 0 {
            return 0;
        }
        let percent = u64::from(self.points) * 100 / u64::from(self.ceiling);
        u32::try_from(percent).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone)]
pub struct ProfileReport {
    pub source: String,
    pub profile: CandidateProfile,
    pub result: ScoreResult,
    pub standing: Standing,
    pub categories: Vec<CategoryLine>,
    pub analysis: Option<ImprovementAnalysis>,
}

impl ProfileReport {
    pub fn points_to_target(&self, target: u32) -> u32 {
        target.saturating_sub(self.result.score)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileFailure {
    pub source: String,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct ExitStatus {
    pub ok: bool,
    pub reasons: Vec<String>,
}

impl ExitStatus {
    pub fn reason_line(&self) -> String {
        self.reasons.join("; ")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub target_score: u32,
    pub fail_below_target: bool,
    pub show_action_steps: bool,
    pub max_suggestions: usize,
}

impl From<&Config> for ConfigSummary {
    fn from(cfg: &Config) -> Self {
        Self {
            target_score: cfg.general.target_score,
            fail_below_target: cfg.general.fail_below_target,
            show_action_steps: cfg.advice.show_action_steps,
            max_suggestions: cfg.advice.max_suggestions,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FinalReport {
    pub run: RunProfile,
    pub tables_version: String,
    pub profiles: Vec<ProfileReport>,
    pub failures: Vec<ProfileFailure>,
    pub config: ConfigSummary,
    pub exit: ExitStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonProfile {
    pub source: String,
    pub score: u32,
    pub standing: Standing,
    pub standing_label: &'static str,
    pub points_to_target: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CategoryBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ScoreDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ImprovementAnalysis>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub tables_version: String,
    pub profiles: Vec<JsonProfile>,
    pub failures: Vec<ProfileFailure>,
    pub config: ConfigSummary,
    pub ok: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

impl From<&FinalReport> for JsonReport {
    fn from(report: &FinalReport) -> Self {
        let with_breakdown = report.run != RunProfile::AdviceOnly;
        let profiles = report
            .profiles
            .iter()
            .map(|profile| JsonProfile {
                source: profile.source.clone(),
                score: profile.result.score,
                standing: profile.standing,
                standing_label: profile.standing.label(),
                points_to_target: profile.points_to_target(report.config.target_score),
                breakdown: with_breakdown.then_some(profile.result.breakdown),
                details: with_breakdown.then_some(profile.result.details),
                analysis: profile.analysis.clone(),
            })
            .collect();

        Self {
            tables_version: report.tables_version.clone(),
            profiles,
            failures: report.failures.clone(),
            config: report.config.clone(),
            ok: report.exit.ok,
            reasons: report.exit.reasons.clone(),
        }
    }
}

pub fn evaluate_exit(
    profiles: &[ProfileReport],
    failures: &[ProfileFailure],
    cfg: &Config,
) -> ExitStatus {
    let mut reasons = Vec::new();

    if !failures.is_empty() {
        reasons.push(format!("{} profile(s) failed validation", failures.len()));
    }

    if cfg.general.fail_below_target {
        for profile in profiles {
            if profile.result.score < cfg.general.target_score {
                reasons.push(format!(
                    "{} scored {}, below target_score {}",
                    profile.source, profile.result.score, cfg.general.target_score
                ));
            }
        }
    }

    ExitStatus {
        ok: reasons.is_empty(),
        reasons,
    }
}

pub fn print_human(report: &FinalReport) {
    println!("Point tables: {}", report.tables_version);

    for profile in &report.profiles {
        println!();
        print_profile(profile, report);
    }

    if !report.failures.is_empty() {
        println!();
        println!("{} ({})", "INVALID".red().bold(), report.failures.len());
        for failure in &report.failures {
            println!("[INVALID] {}", failure.source);
            println!("details: {}", failure.error);
        }
    }

    println!();
    if report.exit.ok {
        println!("exit: OK");
    } else {
        println!("exit: FAILED ({})", report.exit.reason_line());
    }
}

fn print_profile(profile: &ProfileReport, report: &FinalReport) {
    let score = profile.result.score;
    println!(
        "CRS Score: {} ({}) - {}",
        score,
        profile.standing.colored(),
        profile.source
    );

    if report.run != RunProfile::AdviceOnly {
        for line in &profile.categories {
            println!(
                "  {:<22} {:>4}/{:<4} ({}%)",
                line.category.to_string(),
                line.points,
                line.ceiling,
                line.percent()
            );
        }
    }

    let target = report.config.target_score;
    match profile.points_to_target(target) {
        0 => println!("target {}: reached", target),
        gap => println!("target {}: {} points short", target, gap),
    }

    let Some(analysis) = &profile.analysis else {
        return;
    };

    println!(
        "Improvements ({} found, max possible score {})",
        analysis.suggestions.len(),
        analysis.max_possible_score
    );

    for priority in [Priority::High, Priority::Medium, Priority::Low] {
        let grouped: Vec<&ImprovementSuggestion> = analysis
            .suggestions
            .iter()
            .filter(|suggestion| suggestion.priority == priority)
            .collect();

        if grouped.is_empty() {
            continue;
        }

        println!();
        println!("{} ({})", priority.colored(), grouped.len());

        for suggestion in grouped {
            println!(
                "[{}] ({}) {} - {}",
                suggestion.priority.as_str(),
                suggestion.category,
                suggestion.title,
                suggestion.potential_gain_label()
            );
            println!(
                "-> {}, {}",
                suggestion.difficulty.as_str(),
                suggestion.timeframe
            );
            if !suggestion.description.is_empty() {
                println!("details: {}", suggestion.description);
            }
            if report.config.show_action_steps {
                for (idx, step) in suggestion.action_steps.iter().enumerate() {
                    println!("   {}. {}", idx + 1, step);
                }
            }
        }
    }

    print_shortlist("Quick wins", &analysis.quick_wins);
    print_shortlist("Strategic moves", &analysis.strategic_moves);
}

fn print_shortlist(heading: &str, suggestions: &[ImprovementSuggestion]) {
    if suggestions.is_empty() {
        return;
    }

    println!();
    println!("{}:", heading.bold());
    for suggestion in suggestions {
        println!("  - {} ({})", suggestion.title, suggestion.potential_gain_label());
    }
}
