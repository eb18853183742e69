//! Versioned CRS point tables.
//!
//! IRCC revises the grid from time to time, so the numbers live in a TOML
//! document rather than in the engine. The built-in set is embedded at compile
//! time; an alternative set can be loaded from disk and validated.

use crate::core::error::TableError;
use crate::core::profile::{CanadianEducation, Education, WorkExperience};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_TABLES_TOML: &str = include_str!("../../tables/default.toml");

static DEFAULT_TABLES: Lazy<PointTables> = Lazy::new(|| {
    PointTables::from_toml_str(DEFAULT_TABLES_TOML).expect("embedded point tables are valid")
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Threshold {
    pub min: u32,
    pub points: u32,
}

/// Step function: the points of the highest threshold whose `min` is `<=` the value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct ThresholdTable(Vec<Threshold>);

impl ThresholdTable {
    pub fn new(thresholds: Vec<Threshold>) -> Self {
        Self(thresholds)
    }

    pub fn points_for(&self, value: u32) -> u32 {
        self.0
            .iter()
            .rev()
            .find(|threshold| threshold.min <= value)
            .map_or(0, |threshold| threshold.points)
    }

    pub fn max_points(&self) -> u32 {
        self.0.iter().map(|threshold| threshold.points).max().unwrap_or(0)
    }

    /// Most a four-skill language profile can earn from this table.
    pub fn max_per_skill_points(&self) -> u32 {
        self.max_points().saturating_mul(4)
    }

    fn is_ascending(&self) -> bool {
        self.0.windows(2).all(|pair| pair[0].min < pair[1].min)
    }
}

/// A table that differs depending on whether a spouse accompanies the applicant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paired<T> {
    pub single: T,
    pub with_spouse: T,
}

impl<T> Paired<T> {
    pub fn get(&self, with_spouse: bool) -> &T {
        if with_spouse {
            &self.with_spouse
        } else {
            &self.single
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EducationTable {
    pub less_than_secondary: u32,
    pub secondary: u32,
    pub one_year_post_secondary: u32,
    pub two_year_post_secondary: u32,
    pub bachelor: u32,
    pub two_or_more_certificates: u32,
    pub master: u32,
    pub phd: u32,
}

impl EducationTable {
    pub fn points(&self, education: Education) -> u32 {
        match education {
            Education::LessThanSecondary => self.less_than_secondary,
            Education::Secondary => self.secondary,
            Education::OneYearPostSecondary => self.one_year_post_secondary,
            Education::TwoYearPostSecondary => self.two_year_post_secondary,
            Education::Bachelor => self.bachelor,
            Education::TwoOrMoreCertificates => self.two_or_more_certificates,
            Education::Master => self.master,
            Education::Phd => self.phd,
        }
    }

    pub fn max_points(&self) -> u32 {
        Education::ALL
            .into_iter()
            .map(|education| self.points(education))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkTable {
    pub none: u32,
    #[serde(rename = "1_year")]
    pub one_year: u32,
    #[serde(rename = "2_years")]
    pub two_years: u32,
    #[serde(rename = "3_years")]
    pub three_years: u32,
    #[serde(rename = "4_years")]
    pub four_years: u32,
    #[serde(rename = "5_plus_years")]
    pub five_plus_years: u32,
}

impl WorkTable {
    pub fn points(&self, experience: WorkExperience) -> u32 {
        match experience {
            WorkExperience::None => self.none,
            WorkExperience::OneYear => self.one_year,
            WorkExperience::TwoYears => self.two_years,
            WorkExperience::ThreeYears => self.three_years,
            WorkExperience::FourYears => self.four_years,
            WorkExperience::FivePlusYears => self.five_plus_years,
        }
    }

    pub fn max_points(&self) -> u32 {
        WorkExperience::ALL
            .into_iter()
            .map(|experience| self.points(experience))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanadianEducationTable {
    pub one_two_year: u32,
    pub three_plus_year: u32,
    pub two_or_more: u32,
}

impl CanadianEducationTable {
    pub fn points(&self, credential: CanadianEducation) -> u32 {
        match credential {
            CanadianEducation::OneTwoYear => self.one_two_year,
            CanadianEducation::ThreePlusYear => self.three_plus_year,
            CanadianEducation::TwoOrMore => self.two_or_more,
        }
    }

    pub fn max_points(&self) -> u32 {
        CanadianEducation::ALL
            .into_iter()
            .map(|credential| self.points(credential))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpouseTable {
    pub education: EducationTable,
    pub language: ThresholdTable,
    pub canadian_work: WorkTable,
}

/// Points for a combination gated on first-language strength.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageTiers {
    pub strong: u32,
    pub very_strong: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanadianWorkTiers {
    pub one_year: u32,
    pub two_plus_years: u32,
}

/// Indexed by foreign work band: 1 year, 2 years, 3 or more years.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForeignWorkGrid {
    pub strong_language: [u32; 3],
    pub very_strong_language: [u32; 3],
}

impl ForeignWorkGrid {
    fn max_points(&self) -> u32 {
        self.strong_language
            .into_iter()
            .chain(self.very_strong_language)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForeignCanadianGrid {
    pub one_year_canadian: [u32; 3],
    pub two_plus_years_canadian: [u32; 3],
}

impl ForeignCanadianGrid {
    fn max_points(&self) -> u32 {
        self.one_year_canadian
            .into_iter()
            .chain(self.two_plus_years_canadian)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TradeTiers {
    pub base: u32,
    pub strong_language: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferabilityTable {
    pub strong_clb: u8,
    pub very_strong_clb: u8,
    pub education_language: LanguageTiers,
    pub education_canadian_work: CanadianWorkTiers,
    pub foreign_work_language: ForeignWorkGrid,
    pub foreign_work_canadian_work: ForeignCanadianGrid,
    pub trade_certificate: TradeTiers,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BilingualTable {
    pub second_min_clb: u8,
    pub strong_first_clb: u8,
    pub strong_bonus: u32,
    pub basic_first_clb: u8,
    pub basic_bonus: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdditionalTable {
    pub provincial_nomination: u32,
    pub sibling_in_canada: u32,
    pub canadian_education: CanadianEducationTable,
    pub second_language: ThresholdTable,
    pub second_language_cap: u32,
    pub bilingual: BilingualTable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ceilings {
    pub core_single: u32,
    pub core_with_spouse: u32,
    pub spouse: u32,
    pub transferability: u32,
    pub additional: u32,
    pub total: u32,
}

impl Ceilings {
    pub fn core(&self, with_spouse: bool) -> u32 {
        if with_spouse {
            self.core_with_spouse
        } else {
            self.core_single
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PointTables {
    pub version: String,
    pub effective: String,
    pub age: Paired<ThresholdTable>,
    pub education: Paired<EducationTable>,
    pub first_language: Paired<ThresholdTable>,
    pub canadian_work: Paired<WorkTable>,
    pub spouse: SpouseTable,
    pub transferability: TransferabilityTable,
    pub additional: AdditionalTable,
    pub ceilings: Ceilings,
}

impl PointTables {
    /// The tables compiled into the crate.
    pub fn builtin() -> &'static PointTables {
        &DEFAULT_TABLES
    }

    pub fn from_toml_str(content: &str) -> Result<Self, TableError> {
        let tables = toml::from_str::<PointTables>(content)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed reading point tables {}", path.display()))?;
        let tables = Self::from_toml_str(&content)
            .with_context(|| format!("invalid point tables {}", path.display()))?;
        tracing::info!(version = %tables.version, path = %path.display(), "loaded point tables");
        Ok(tables)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize point tables")
    }

    pub fn validate(&self) -> Result<(), TableError> {
        let threshold_tables = [
            ("age.single", &self.age.single),
            ("age.with_spouse", &self.age.with_spouse),
            ("first_language.single", &self.first_language.single),
            ("first_language.with_spouse", &self.first_language.with_spouse),
            ("spouse.language", &self.spouse.language),
            ("additional.second_language", &self.additional.second_language),
        ];
        for (table, thresholds) in threshold_tables {
            if !thresholds.is_ascending() {
                return Err(TableError::Unsorted { table });
            }
        }

        let ceilings = &self.ceilings;
        let single = checked_sum(&[
            ceilings.core_single,
            ceilings.transferability,
            ceilings.additional,
        ])
        .ok_or(TableError::Overflow {
            what: "single-applicant ceilings",
        })?;
        if single != ceilings.total {
            return Err(TableError::CeilingMismatch {
                variant: "single",
                found: single,
                expected: ceilings.total,
            });
        }

        let with_spouse = checked_sum(&[
            ceilings.core_with_spouse,
            ceilings.spouse,
            ceilings.transferability,
            ceilings.additional,
        ])
        .ok_or(TableError::Overflow {
            what: "with-spouse ceilings",
        })?;
        if with_spouse != ceilings.total {
            return Err(TableError::CeilingMismatch {
                variant: "with-spouse",
                found: with_spouse,
                expected: ceilings.total,
            });
        }

        self.validate_factor_maxima()
    }

    /// No single factor may award more than the category it feeds into.
    fn validate_factor_maxima(&self) -> Result<(), TableError> {
        let ceilings = &self.ceilings;
        let transferability = &self.transferability;
        let additional = &self.additional;
        let second_language = additional
            .second_language
            .max_per_skill_points()
            .min(additional.second_language_cap);

        let factors = [
            ("age.single", self.age.single.max_points(), ceilings.core_single),
            (
                "age.with_spouse",
                self.age.with_spouse.max_points(),
                ceilings.core_with_spouse,
            ),
            (
                "education.single",
                self.education.single.max_points(),
                ceilings.core_single,
            ),
            (
                "education.with_spouse",
                self.education.with_spouse.max_points(),
                ceilings.core_with_spouse,
            ),
            (
                "first_language.single",
                self.first_language.single.max_per_skill_points(),
                ceilings.core_single,
            ),
            (
                "first_language.with_spouse",
                self.first_language.with_spouse.max_per_skill_points(),
                ceilings.core_with_spouse,
            ),
            (
                "canadian_work.single",
                self.canadian_work.single.max_points(),
                ceilings.core_single,
            ),
            (
                "canadian_work.with_spouse",
                self.canadian_work.with_spouse.max_points(),
                ceilings.core_with_spouse,
            ),
            (
                "spouse.education",
                self.spouse.education.max_points(),
                ceilings.spouse,
            ),
            (
                "spouse.language",
                self.spouse.language.max_per_skill_points(),
                ceilings.spouse,
            ),
            (
                "spouse.canadian_work",
                self.spouse.canadian_work.max_points(),
                ceilings.spouse,
            ),
            (
                "transferability.education_language",
                transferability
                    .education_language
                    .strong
                    .max(transferability.education_language.very_strong),
                ceilings.transferability,
            ),
            (
                "transferability.education_canadian_work",
                transferability
                    .education_canadian_work
                    .one_year
                    .max(transferability.education_canadian_work.two_plus_years),
                ceilings.transferability,
            ),
            (
                "transferability.foreign_work_language",
                transferability.foreign_work_language.max_points(),
                ceilings.transferability,
            ),
            (
                "transferability.foreign_work_canadian_work",
                transferability.foreign_work_canadian_work.max_points(),
                ceilings.transferability,
            ),
            (
                "transferability.trade_certificate",
                transferability
                    .trade_certificate
                    .base
                    .max(transferability.trade_certificate.strong_language),
                ceilings.transferability,
            ),
            (
                "additional.provincial_nomination",
                additional.provincial_nomination,
                ceilings.additional,
            ),
            (
                "additional.sibling_in_canada",
                additional.sibling_in_canada,
                ceilings.additional,
            ),
            (
                "additional.canadian_education",
                additional.canadian_education.max_points(),
                ceilings.additional,
            ),
            (
                "additional.second_language",
                second_language,
                ceilings.additional,
            ),
            (
                "additional.bilingual",
                additional
                    .bilingual
                    .strong_bonus
                    .max(additional.bilingual.basic_bonus),
                ceilings.additional,
            ),
        ];

        for (table, points, ceiling) in factors {
            if points > ceiling {
                return Err(TableError::ExceedsCeiling {
                    table,
                    points,
                    ceiling,
                });
            }
        }

        Ok(())
    }
}

fn checked_sum(values: &[u32]) -> Option<u32> {
    values
        .iter()
        .try_fold(0u32, |total, &value| total.checked_add(value))
}
