//! Comprehensive Ranking System (CRS) scoring for Canada's Express Entry draws,
//! with a rule-based advisor that ranks the changes most likely to raise a score.
//!
//! ```no_run
//! use crs_advisor::{CandidateProfile, Education, LanguageAbility, analyze, score};
//!
//! let profile = CandidateProfile::new(30, Education::Bachelor, LanguageAbility::uniform(9));
//! let result = score(&profile);
//! let advice = analyze(&profile, result.score, &result.breakdown);
//! println!("{} points, {} suggestions", result.score, advice.suggestions.len());
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod telemetry;
pub mod utils;

pub use crate::core::advisor::{ImprovementAnalysis, ImprovementSuggestion, analyze};
pub use crate::core::error::{ProfileError, TableError};
pub use crate::core::input::ProfileInput;
pub use crate::core::profile::{
    CandidateProfile, Education, LanguageAbility, MaritalStatus, SpouseProfile, WorkExperience,
};
pub use crate::core::score::{CategoryBreakdown, ScoreEngine, ScoreResult, score};
pub use crate::core::tables::PointTables;
