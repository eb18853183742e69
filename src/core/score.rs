use crate::core::profile::{CandidateProfile, LanguageAbility, SpouseProfile, WorkExperience};
use crate::core::tables::{PointTables, ThresholdTable};
use serde::Serialize;
use std::fmt;

/// Points per CRS category; the four values always sum to the total score.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, Hash)]
pub struct CategoryBreakdown {
    pub core_human_capital: u32,
    pub spouse_partner: u32,
    pub skill_transferability: u32,
    pub additional_points: u32,
}

impl CategoryBreakdown {
    pub fn total(&self) -> u32 {
        saturating_sum([
            self.core_human_capital,
            self.spouse_partner,
            self.skill_transferability,
            self.additional_points,
        ])
    }

    pub fn get(&self, category: ScoreCategory) -> u32 {
        match category {
            ScoreCategory::CoreHumanCapital => self.core_human_capital,
            ScoreCategory::SpousePartner => self.spouse_partner,
            ScoreCategory::SkillTransferability => self.skill_transferability,
            ScoreCategory::AdditionalPoints => self.additional_points,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    CoreHumanCapital,
    SpousePartner,
    SkillTransferability,
    AdditionalPoints,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 4] = [
        Self::CoreHumanCapital,
        Self::SpousePartner,
        Self::SkillTransferability,
        Self::AdditionalPoints,
    ];

    pub fn ceiling(self, tables: &PointTables, with_spouse: bool) -> u32 {
        let ceilings = &tables.ceilings;
        match self {
            Self::CoreHumanCapital => ceilings.core(with_spouse),
            Self::SpousePartner => ceilings.spouse,
            Self::SkillTransferability => ceilings.transferability,
            Self::AdditionalPoints => ceilings.additional,
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoreHumanCapital => write!(f, "Core/Human Capital"),
            Self::SpousePartner => write!(f, "Spouse/Partner"),
            Self::SkillTransferability => write!(f, "Skill Transferability"),
            Self::AdditionalPoints => write!(f, "Additional Points"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, Hash)]
pub struct CoreDetails {
    pub age: u32,
    pub education: u32,
    pub first_language: u32,
    pub canadian_work: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, Hash)]
pub struct SpouseDetails {
    pub education: u32,
    pub language: u32,
    pub canadian_work: u32,
}

/// Each transferability combination; only the best one counts.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, Hash)]
pub struct TransferabilityDetails {
    pub education_language: u32,
    pub education_canadian_work: u32,
    pub foreign_work_language: u32,
    pub foreign_work_canadian_work: u32,
    pub trade_certificate: u32,
}

impl TransferabilityDetails {
    pub fn best(&self) -> u32 {
        [
            self.education_language,
            self.education_canadian_work,
            self.foreign_work_language,
            self.foreign_work_canadian_work,
            self.trade_certificate,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, Hash)]
pub struct AdditionalDetails {
    pub provincial_nomination: u32,
    pub canadian_education: u32,
    pub sibling_in_canada: u32,
    pub second_language: u32,
    pub bilingual_bonus: u32,
}

impl AdditionalDetails {
    pub fn sum(&self) -> u32 {
        saturating_sum([
            self.provincial_nomination,
            self.canadian_education,
            self.sibling_in_canada,
            self.second_language,
            self.bilingual_bonus,
        ])
    }
}

/// Per-factor points behind the category breakdown, before category ceilings.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, Hash)]
pub struct ScoreDetails {
    pub core: CoreDetails,
    pub spouse: SpouseDetails,
    pub transferability: TransferabilityDetails,
    pub additional: AdditionalDetails,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct ScoreResult {
    pub score: u32,
    pub breakdown: CategoryBreakdown,
    pub details: ScoreDetails,
}

/// Evaluates candidate profiles against one version of the point tables.
#[derive(Debug, Clone, Copy)]
pub struct ScoreEngine<'a> {
    tables: &'a PointTables,
}

impl ScoreEngine<'static> {
    pub fn builtin() -> Self {
        Self::new(PointTables::builtin())
    }
}

impl<'a> ScoreEngine<'a> {
    pub fn new(tables: &'a PointTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'a PointTables {
        self.tables
    }

    pub fn score(&self, profile: &CandidateProfile) -> ScoreResult {
        let with_spouse = profile.has_spouse();
        let ceilings = &self.tables.ceilings;

        let core = self.core_details(profile, with_spouse);
        let spouse = profile
            .spouse()
            .map(|spouse| self.spouse_details(spouse))
            .unwrap_or_default();
        let transferability = self.transferability_details(profile);
        let additional = self.additional_details(profile);

        let breakdown = CategoryBreakdown {
            core_human_capital: saturating_sum([
                core.age,
                core.education,
                core.first_language,
                core.canadian_work,
            ])
            .min(ceilings.core(with_spouse)),
            spouse_partner: saturating_sum([
                spouse.education,
                spouse.language,
                spouse.canadian_work,
            ])
            .min(ceilings.spouse),
            skill_transferability: transferability.best().min(ceilings.transferability),
            additional_points: additional.sum().min(ceilings.additional),
        };
        let score = breakdown.total();

        tracing::debug!(
            score,
            core = breakdown.core_human_capital,
            spouse = breakdown.spouse_partner,
            transferability = breakdown.skill_transferability,
            additional = breakdown.additional_points,
            tables = %self.tables.version,
            "scored profile"
        );

        ScoreResult {
            score,
            breakdown,
            details: ScoreDetails {
                core,
                spouse,
                transferability,
                additional,
            },
        }
    }

    fn core_details(&self, profile: &CandidateProfile, with_spouse: bool) -> CoreDetails {
        let tables = self.tables;
        CoreDetails {
            age: tables
                .age
                .get(with_spouse)
                .points_for(u32::from(profile.age)),
            education: tables.education.get(with_spouse).points(profile.education),
            first_language: per_skill_points(
                tables.first_language.get(with_spouse),
                &profile.first_language,
            ),
            canadian_work: tables
                .canadian_work
                .get(with_spouse)
                .points(profile.canadian_work),
        }
    }

    fn spouse_details(&self, spouse: &SpouseProfile) -> SpouseDetails {
        let table = &self.tables.spouse;
        SpouseDetails {
            education: table.education.points(spouse.education),
            language: per_skill_points(&table.language, &spouse.language),
            canadian_work: table.canadian_work.points(spouse.canadian_work),
        }
    }

    fn transferability_details(&self, profile: &CandidateProfile) -> TransferabilityDetails {
        let table = &self.tables.transferability;
        let min_clb = profile.first_language.min_level();
        let strong = min_clb >= table.strong_clb;
        let very_strong = min_clb >= table.very_strong_clb;
        let post_secondary = profile.education.is_post_secondary();
        let canadian_years = profile.canadian_work.years();
        let foreign_band = foreign_work_band(profile.foreign_work);

        let education_language = match (post_secondary, very_strong, strong) {
            (true, true, _) => table.education_language.very_strong,
            (true, false, true) => table.education_language.strong,
            _ => 0,
        };

        let education_canadian_work = match (post_secondary, canadian_years) {
            (false, _) | (true, 0) => 0,
            (true, 1) => table.education_canadian_work.one_year,
            (true, _) => table.education_canadian_work.two_plus_years,
        };

        let foreign_work_language = match foreign_band {
            Some(band) if very_strong => table.foreign_work_language.very_strong_language[band],
            Some(band) if strong => table.foreign_work_language.strong_language[band],
            _ => 0,
        };

        let foreign_work_canadian_work = match (foreign_band, canadian_years) {
            (None, _) | (_, 0) => 0,
            (Some(band), 1) => table.foreign_work_canadian_work.one_year_canadian[band],
            (Some(band), _) => table.foreign_work_canadian_work.two_plus_years_canadian[band],
        };

        let trade_certificate = match (profile.certificate_of_qualification, strong) {
            (true, true) => table.trade_certificate.strong_language,
            (true, false) => table.trade_certificate.base,
            (false, _) => 0,
        };

        TransferabilityDetails {
            education_language,
            education_canadian_work,
            foreign_work_language,
            foreign_work_canadian_work,
            trade_certificate,
        }
    }

    fn additional_details(&self, profile: &CandidateProfile) -> AdditionalDetails {
        let table = &self.tables.additional;

        let (second_language, bilingual_bonus) = match &profile.second_language {
            Some(second) => {
                let per_skill = per_skill_points(&table.second_language, second)
                    .min(table.second_language_cap);
                let bilingual = &table.bilingual;
                let first_min = profile.first_language.min_level();
                let bonus = if second.min_level() < bilingual.second_min_clb {
                    0
                } else if first_min >= bilingual.strong_first_clb {
                    bilingual.strong_bonus
                } else if first_min >= bilingual.basic_first_clb {
                    bilingual.basic_bonus
                } else {
                    0
                };
                (per_skill, bonus)
            }
            None => (0, 0),
        };

        AdditionalDetails {
            provincial_nomination: if profile.provincial_nomination {
                table.provincial_nomination
            } else {
                0
            },
            canadian_education: profile
                .canadian_education
                .map_or(0, |credential| table.canadian_education.points(credential)),
            sibling_in_canada: if profile.sibling_in_canada {
                table.sibling_in_canada
            } else {
                0
            },
            second_language,
            bilingual_bonus,
        }
    }
}

fn per_skill_points(table: &ThresholdTable, ability: &LanguageAbility) -> u32 {
    ability
        .levels()
        .into_iter()
        .map(|level| table.points_for(u32::from(level)))
        .fold(0, u32::saturating_add)
}

/// Tables loaded from disk may carry arbitrary values; sums saturate instead of wrapping.
fn saturating_sum<const N: usize>(values: [u32; N]) -> u32 {
    values.into_iter().fold(0, u32::saturating_add)
}

/// Index into the foreign-work grids: 1 year, 2 years, 3 or more years.
fn foreign_work_band(experience: WorkExperience) -> Option<usize> {
    match experience.years() {
        0 => None,
        1 => Some(0),
        2 => Some(1),
        _ => Some(2),
    }
}

/// Score a profile against the built-in point tables.
pub fn score(profile: &CandidateProfile) -> ScoreResult {
    ScoreEngine::builtin().score(profile)
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Excellent,
    Competitive,
    GoodProgress,
    NeedsImprovement,
}

impl Standing {
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent Score",
            Self::Competitive => "Competitive Score",
            Self::GoodProgress => "Good Progress",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn standing_for_score(score: u32) -> Standing {
    match score {
        520.. => Standing::Excellent,
        500..=519 => Standing::Competitive,
        450..=499 => Standing::GoodProgress,
        _ => Standing::NeedsImprovement,
    }
}
