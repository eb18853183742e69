use serde::Serialize;
use std::fmt;

/// Highest level on the Canadian Language Benchmark / NCLC scale.
pub const MAX_CLB: u8 = 12;
pub const MAX_AGE: u8 = 100;

/// Highest completed level of education, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    LessThanSecondary,
    Secondary,
    OneYearPostSecondary,
    TwoYearPostSecondary,
    Bachelor,
    TwoOrMoreCertificates,
    Master,
    Phd,
}

impl Education {
    pub const ALL: [Education; 8] = [
        Self::LessThanSecondary,
        Self::Secondary,
        Self::OneYearPostSecondary,
        Self::TwoYearPostSecondary,
        Self::Bachelor,
        Self::TwoOrMoreCertificates,
        Self::Master,
        Self::Phd,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LessThanSecondary => "less_than_secondary",
            Self::Secondary => "secondary",
            Self::OneYearPostSecondary => "one_year_post_secondary",
            Self::TwoYearPostSecondary => "two_year_post_secondary",
            Self::Bachelor => "bachelor",
            Self::TwoOrMoreCertificates => "two_or_more_certificates",
            Self::Master => "master",
            Self::Phd => "phd",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LessThanSecondary => "Less than secondary school (high school)",
            Self::Secondary => "Secondary diploma (high school graduation)",
            Self::OneYearPostSecondary => "One-year post-secondary program",
            Self::TwoYearPostSecondary => "Two-year post-secondary program",
            Self::Bachelor => "Bachelor's degree (3+ years)",
            Self::TwoOrMoreCertificates => "Two or more certificates, diplomas, or degrees",
            Self::Master => "Master's degree or professional degree",
            Self::Phd => "Doctoral level university degree (PhD)",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }

    pub fn is_post_secondary(self) -> bool {
        self >= Self::OneYearPostSecondary
    }
}

impl fmt::Display for Education {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Years of skilled work experience, bucketed the way the points grid expects.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WorkExperience {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "1_year")]
    OneYear,
    #[serde(rename = "2_years")]
    TwoYears,
    #[serde(rename = "3_years")]
    ThreeYears,
    #[serde(rename = "4_years")]
    FourYears,
    #[serde(rename = "5_plus_years")]
    FivePlusYears,
}

impl WorkExperience {
    pub const ALL: [WorkExperience; 6] = [
        Self::None,
        Self::OneYear,
        Self::TwoYears,
        Self::ThreeYears,
        Self::FourYears,
        Self::FivePlusYears,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::OneYear => "1_year",
            Self::TwoYears => "2_years",
            Self::ThreeYears => "3_years",
            Self::FourYears => "4_years",
            Self::FivePlusYears => "5_plus_years",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None or less than a year",
            Self::OneYear => "1 year",
            Self::TwoYears => "2 years",
            Self::ThreeYears => "3 years",
            Self::FourYears => "4 years",
            Self::FivePlusYears => "5 or more years",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|years| years.as_str() == value)
    }

    pub fn years(self) -> u8 {
        match self {
            Self::None => 0,
            Self::OneYear => 1,
            Self::TwoYears => 2,
            Self::ThreeYears => 3,
            Self::FourYears => 4,
            Self::FivePlusYears => 5,
        }
    }
}

impl fmt::Display for WorkExperience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canadian post-secondary credential bonus bucket.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CanadianEducation {
    OneTwoYear,
    ThreePlusYear,
    TwoOrMore,
}

impl CanadianEducation {
    pub const ALL: [CanadianEducation; 3] = [Self::OneTwoYear, Self::ThreePlusYear, Self::TwoOrMore];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneTwoYear => "one_two_year",
            Self::ThreePlusYear => "three_plus_year",
            Self::TwoOrMore => "two_or_more",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OneTwoYear => "1 or 2-year credential",
            Self::ThreePlusYear => "3+ year credential or higher",
            Self::TwoOrMore => "Two or more credentials",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl fmt::Display for CanadianEducation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TeerCategory {
    Teer0,
    Teer1,
}

impl TeerCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Teer0 => "teer_0",
            Self::Teer1 => "teer_1",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Teer0 => "TEER 0 - Management jobs",
            Self::Teer1 => "TEER 1, 2, or 3 - Other skilled jobs",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        [Self::Teer0, Self::Teer1]
            .into_iter()
            .find(|teer| teer.as_str() == value)
    }
}

impl fmt::Display for TeerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single CLB/NCLC level in `0..=12`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(transparent)]
pub struct Clb(u8);

impl Clb {
    /// Levels outside the benchmark scale land in the zero-point band.
    pub fn new(level: i64) -> Self {
        if (0..=i64::from(MAX_CLB)).contains(&level) {
            Self(level as u8)
        } else {
            tracing::warn!(level, "CLB level outside 0..=12, treating as CLB 0");
            Self(0)
        }
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Clb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CLB {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Speaking,
    Listening,
    Reading,
    Writing,
}

impl Skill {
    pub const ALL: [Skill; 4] = [Self::Speaking, Self::Listening, Self::Reading, Self::Writing];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Speaking => "speaking",
            Self::Listening => "listening",
            Self::Reading => "reading",
            Self::Writing => "writing",
        }
    }
}

/// CLB levels for the four tested abilities of one official language.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub struct LanguageAbility {
    pub speaking: Clb,
    pub listening: Clb,
    pub reading: Clb,
    pub writing: Clb,
}

impl LanguageAbility {
    pub fn uniform(level: u8) -> Self {
        let clb = Clb::new(i64::from(level));
        Self {
            speaking: clb,
            listening: clb,
            reading: clb,
            writing: clb,
        }
    }

    pub fn skill(&self, skill: Skill) -> Clb {
        match skill {
            Skill::Speaking => self.speaking,
            Skill::Listening => self.listening,
            Skill::Reading => self.reading,
            Skill::Writing => self.writing,
        }
    }

    pub fn levels(&self) -> [u8; 4] {
        Skill::ALL.map(|skill| self.skill(skill).level())
    }

    /// Weakest ability; thresholds that require "CLB n in all skills" compare against this.
    pub fn min_level(&self) -> u8 {
        self.levels().into_iter().min().unwrap_or(0)
    }

    pub fn total_level(&self) -> u32 {
        self.levels().into_iter().map(u32::from).sum()
    }

    /// Whether the mean level falls in `[low, high)`, computed without floats.
    pub fn average_in(&self, low: u8, high: u8) -> bool {
        let total = self.total_level();
        total >= u32::from(low) * 4 && total < u32::from(high) * 4
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct JobOffer {
    pub teer: TeerCategory,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct SpouseProfile {
    pub education: Education,
    pub language: LanguageAbility,
    pub canadian_work: WorkExperience,
    /// Optional; only the principal-applicant comparison reads it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(tag = "status", content = "spouse", rename_all = "snake_case")]
pub enum MaritalStatus {
    #[default]
    Single,
    WithSpouse(SpouseProfile),
}

/// Validated candidate record consumed by the score engine and the advisor.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct CandidateProfile {
    pub age: u8,
    pub education: Education,
    pub first_language: LanguageAbility,
    pub second_language: Option<LanguageAbility>,
    pub canadian_work: WorkExperience,
    pub foreign_work: WorkExperience,
    pub certificate_of_qualification: bool,
    pub marital_status: MaritalStatus,
    pub provincial_nomination: bool,
    pub job_offer: Option<JobOffer>,
    pub canadian_education: Option<CanadianEducation>,
    pub sibling_in_canada: bool,
}

impl CandidateProfile {
    /// A single applicant with the given age and education and nothing else claimed.
    pub fn new(age: u8, education: Education, first_language: LanguageAbility) -> Self {
        Self {
            age: age.min(MAX_AGE),
            education,
            first_language,
            second_language: None,
            canadian_work: WorkExperience::None,
            foreign_work: WorkExperience::None,
            certificate_of_qualification: false,
            marital_status: MaritalStatus::Single,
            provincial_nomination: false,
            job_offer: None,
            canadian_education: None,
            sibling_in_canada: false,
        }
    }

    pub fn spouse(&self) -> Option<&SpouseProfile> {
        match &self.marital_status {
            MaritalStatus::Single => None,
            MaritalStatus::WithSpouse(spouse) => Some(spouse),
        }
    }

    pub fn has_spouse(&self) -> bool {
        self.spouse().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_lookup() {
        for level in Education::ALL {
            assert_eq!(Education::from_wire(level.as_str()), Some(level));
        }
        for years in WorkExperience::ALL {
            assert_eq!(WorkExperience::from_wire(years.as_str()), Some(years));
        }
        assert_eq!(Education::from_wire("doctorate"), None);
        assert_eq!(WorkExperience::from_wire("6_years"), None);
    }

    #[test]
    fn post_secondary_starts_at_one_year_programs() {
        assert!(!Education::Secondary.is_post_secondary());
        assert!(Education::OneYearPostSecondary.is_post_secondary());
        assert!(Education::Phd.is_post_secondary());
    }

    #[test]
    fn out_of_range_clb_falls_to_zero() {
        assert_eq!(Clb::new(13).level(), 0);
        assert_eq!(Clb::new(-1).level(), 0);
        assert_eq!(Clb::new(12).level(), 12);
    }

    #[test]
    fn language_aggregates() {
        let ability = LanguageAbility {
            speaking: Clb::new(9),
            listening: Clb::new(8),
            reading: Clb::new(7),
            writing: Clb::new(8),
        };
        assert_eq!(ability.min_level(), 7);
        assert_eq!(ability.total_level(), 32);
        assert!(ability.average_in(7, 9));
        assert!(!LanguageAbility::uniform(9).average_in(7, 9));
    }
}
