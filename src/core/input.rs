//! Wire shape of a candidate profile, as written by the calculator front end or
//! by hand in a TOML/JSON file, and its validation into `CandidateProfile`.

use crate::core::error::ProfileError;
use crate::core::language::{LanguageTest, TestResult};
use crate::core::profile::{
    CandidateProfile, CanadianEducation, Clb, Education, JobOffer, LanguageAbility, MAX_AGE,
    MaritalStatus, SpouseProfile, TeerCategory, WorkExperience,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub age: i64,
    pub education: String,
    pub first_language: LanguageInput,
    #[serde(default)]
    pub has_second_language: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_language: Option<LanguageInput>,
    pub canadian_work_experience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_work_experience: Option<String>,
    #[serde(default)]
    pub has_certificate_of_qualification: bool,
    #[serde(default)]
    pub has_spouse: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse_data: Option<SpouseInput>,
    #[serde(default)]
    pub provincial_nomination: bool,
    #[serde(default)]
    pub has_job_offer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_offer_details: Option<JobOfferInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canadian_education: Option<String>,
    #[serde(default)]
    pub has_sibling_in_canada: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpouseInput {
    pub education: String,
    pub language: LanguageInput,
    pub canadian_work_experience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobOfferInput {
    pub teer_category: String,
}

/// A language block: either CLB levels or raw scores from a named test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LanguageInput {
    TestScores(TestScoresInput),
    Levels(ClbLevels),
}

impl Default for LanguageInput {
    fn default() -> Self {
        Self::Levels(ClbLevels::default())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClbLevels {
    pub speaking: i64,
    pub listening: i64,
    pub reading: i64,
    pub writing: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestScoresInput {
    pub test: String,
    pub speaking: RawScore,
    pub listening: RawScore,
    pub reading: RawScore,
    pub writing: RawScore,
}

/// Scores arrive as numbers (`7.5`, `310`) or as the strings shown on result sheets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawScore {
    Number(f64),
    Text(String),
}

impl RawScore {
    fn render(&self, test: LanguageTest) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Number(value) if test == LanguageTest::Ielts => format!("{value:.1}"),
            Self::Number(value) if value.fract() == 0.0 && *value >= 0.0 => {
                format!("{}", *value as u64)
            }
            Self::Number(value) => value.to_string(),
        }
    }
}

impl LanguageInput {
    pub fn to_ability(&self) -> Result<LanguageAbility, ProfileError> {
        match self {
            Self::Levels(levels) => Ok(LanguageAbility {
                speaking: Clb::new(levels.speaking),
                listening: Clb::new(levels.listening),
                reading: Clb::new(levels.reading),
                writing: Clb::new(levels.writing),
            }),
            Self::TestScores(scores) => {
                let test: LanguageTest = scores.test.parse()?;
                TestResult {
                    test,
                    speaking: scores.speaking.render(test),
                    listening: scores.listening.render(test),
                    reading: scores.reading.render(test),
                    writing: scores.writing.render(test),
                }
                .to_ability()
            }
        }
    }
}

fn parse_enum<T>(
    field: &'static str,
    value: &str,
    from_wire: fn(&str) -> Option<T>,
) -> Result<T, ProfileError> {
    from_wire(value.trim()).ok_or_else(|| ProfileError::invalid(field, value))
}

/// Ages above the table domain clamp to the maximum; negative ages clamp to zero.
fn clamp_age(field: &'static str, age: i64) -> u8 {
    let clamped = age.clamp(0, i64::from(MAX_AGE));
    if clamped != age {
        tracing::warn!(field, age, clamped, "age outside 0..=100, clamping");
    }
    clamped as u8
}

impl TryFrom<&SpouseInput> for SpouseProfile {
    type Error = ProfileError;

    fn try_from(input: &SpouseInput) -> Result<Self, Self::Error> {
        Ok(Self {
            education: parse_enum("spouseData.education", &input.education, Education::from_wire)?,
            language: input.language.to_ability()?,
            canadian_work: parse_enum(
                "spouseData.canadianWorkExperience",
                &input.canadian_work_experience,
                WorkExperience::from_wire,
            )?,
            age: input.age.map(|age| clamp_age("spouseData.age", age)),
        })
    }
}

impl TryFrom<&ProfileInput> for CandidateProfile {
    type Error = ProfileError;

    fn try_from(input: &ProfileInput) -> Result<Self, Self::Error> {
        let education = parse_enum("education", &input.education, Education::from_wire)?;
        let first_language = input.first_language.to_ability()?;

        let second_language = if input.has_second_language {
            let second = input
                .second_language
                .as_ref()
                .ok_or_else(|| ProfileError::missing("secondLanguage", "hasSecondLanguage"))?;
            Some(second.to_ability()?)
        } else {
            None
        };

        let canadian_work = parse_enum(
            "canadianWorkExperience",
            &input.canadian_work_experience,
            WorkExperience::from_wire,
        )?;
        let foreign_work = match input.foreign_work_experience.as_deref() {
            Some(value) => {
                parse_enum("foreignWorkExperience", value, WorkExperience::from_wire)?
            }
            None => WorkExperience::None,
        };

        let marital_status = if input.has_spouse {
            let spouse = input
                .spouse_data
                .as_ref()
                .ok_or_else(|| ProfileError::missing("spouseData", "hasSpouse"))?;
            MaritalStatus::WithSpouse(SpouseProfile::try_from(spouse)?)
        } else {
            MaritalStatus::Single
        };

        let job_offer = if input.has_job_offer {
            let details = input
                .job_offer_details
                .as_ref()
                .ok_or_else(|| ProfileError::missing("jobOfferDetails", "hasJobOffer"))?;
            Some(JobOffer {
                teer: parse_enum(
                    "jobOfferDetails.teerCategory",
                    &details.teer_category,
                    TeerCategory::from_wire,
                )?,
            })
        } else {
            None
        };

        let canadian_education = input
            .canadian_education
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(|value| parse_enum("canadianEducation", value, CanadianEducation::from_wire))
            .transpose()?;

        Ok(Self {
            age: clamp_age("age", input.age),
            education,
            first_language,
            second_language,
            canadian_work,
            foreign_work,
            certificate_of_qualification: input.has_certificate_of_qualification,
            marital_status,
            provincial_nomination: input.provincial_nomination,
            job_offer,
            canadian_education,
            sibling_in_canada: input.has_sibling_in_canada,
        })
    }
}

impl TryFrom<ProfileInput> for CandidateProfile {
    type Error = ProfileError;

    fn try_from(input: ProfileInput) -> Result<Self, Self::Error> {
        Self::try_from(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json() -> serde_json::Value {
        serde_json::json!({
            "age": 30,
            "education": "bachelor",
            "firstLanguage": { "speaking": 9, "listening": 9, "reading": 9, "writing": 9 },
            "hasSecondLanguage": false,
            "canadianWorkExperience": "none",
            "hasSpouse": false,
            "provincialNomination": false,
            "hasJobOffer": false,
            "hasSiblingInCanada": false
        })
    }

    fn parse(value: serde_json::Value) -> Result<CandidateProfile, ProfileError> {
        let input: ProfileInput = serde_json::from_value(value).expect("well-formed input");
        CandidateProfile::try_from(input)
    }

    #[test]
    fn parses_the_calculator_wire_shape() {
        let profile = parse(minimal_json()).expect("valid profile");
        assert_eq!(profile.age, 30);
        assert_eq!(profile.education, Education::Bachelor);
        assert_eq!(profile.first_language, LanguageAbility::uniform(9));
        assert_eq!(profile.foreign_work, WorkExperience::None);
        assert_eq!(profile.marital_status, MaritalStatus::Single);
        assert!(profile.second_language.is_none());
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let mut value = minimal_json();
        value["education"] = serde_json::json!("doctorate");
        assert_eq!(
            parse(value),
            Err(ProfileError::invalid("education", "doctorate"))
        );
    }

    #[test]
    fn spouse_flag_without_data_fails_fast() {
        let mut value = minimal_json();
        value["hasSpouse"] = serde_json::json!(true);
        assert_eq!(
            parse(value),
            Err(ProfileError::missing("spouseData", "hasSpouse"))
        );
    }

    #[test]
    fn second_language_and_job_offer_flags_require_details() {
        let mut value = minimal_json();
        value["hasSecondLanguage"] = serde_json::json!(true);
        assert!(matches!(
            parse(value),
            Err(ProfileError::MissingField { field: "secondLanguage", .. })
        ));

        let mut value = minimal_json();
        value["hasJobOffer"] = serde_json::json!(true);
        assert!(matches!(
            parse(value),
            Err(ProfileError::MissingField { field: "jobOfferDetails", .. })
        ));
    }

    #[test]
    fn details_without_flags_are_ignored() {
        let mut value = minimal_json();
        value["secondLanguage"] =
            serde_json::json!({ "speaking": 9, "listening": 9, "reading": 9, "writing": 9 });
        value["spouseData"] = serde_json::json!({
            "education": "master",
            "language": { "speaking": 9, "listening": 9, "reading": 9, "writing": 9 },
            "canadianWorkExperience": "none"
        });
        let profile = parse(value).expect("valid profile");
        assert!(profile.second_language.is_none());
        assert!(!profile.has_spouse());
    }

    #[test]
    fn clamps_age_and_out_of_range_clb() {
        let mut value = minimal_json();
        value["age"] = serde_json::json!(130);
        value["firstLanguage"]["speaking"] = serde_json::json!(14);
        let profile = parse(value).expect("valid profile");
        assert_eq!(profile.age, 100);
        assert_eq!(profile.first_language.speaking.level(), 0);
    }

    #[test]
    fn accepts_raw_test_scores() {
        let mut value = minimal_json();
        value["firstLanguage"] = serde_json::json!({
            "test": "ielts",
            "speaking": 7.0,
            "listening": "8.0",
            "reading": 7,
            "writing": 7.0
        });
        value["hasSecondLanguage"] = serde_json::json!(true);
        value["secondLanguage"] = serde_json::json!({
            "test": "tef",
            "speaking": 310,
            "listening": 249,
            "reading": 207,
            "writing": "310"
        });
        let profile = parse(value).expect("valid profile");
        assert_eq!(profile.first_language.levels(), [9, 9, 8, 7]);
        assert_eq!(profile.second_language, Some(LanguageAbility::uniform(7)));
    }

    #[test]
    fn reads_toml_profiles() {
        let content = r#"
age = 35
education = "master"
canadianWorkExperience = "1_year"
foreignWorkExperience = "3_years"
hasSpouse = true
canadianEducation = "one_two_year"

[firstLanguage]
speaking = 8
listening = 8
reading = 8
writing = 8

[spouseData]
education = "secondary"
canadianWorkExperience = "none"
age = 28

[spouseData.language]
speaking = 6
listening = 6
reading = 6
writing = 6
"#;
        let input: ProfileInput = toml::from_str(content).expect("valid toml");
        let profile = CandidateProfile::try_from(&input).expect("valid profile");
        let spouse = profile.spouse().expect("spouse present");
        assert_eq!(spouse.education, Education::Secondary);
        assert_eq!(spouse.age, Some(28));
        assert_eq!(profile.foreign_work, WorkExperience::ThreeYears);
        assert_eq!(
            profile.canadian_education,
            Some(CanadianEducation::OneTwoYear)
        );
    }
}
