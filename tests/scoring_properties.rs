use crs_advisor::core::profile::{CanadianEducation, SpouseProfile};
use crs_advisor::core::score::ScoreCategory;
use crs_advisor::{
    CandidateProfile, Education, LanguageAbility, MaritalStatus, PointTables, ProfileInput,
    ScoreEngine, WorkExperience, analyze, score,
};

fn spouse(level: u8, education: Education, work: WorkExperience) -> MaritalStatus {
    MaritalStatus::WithSpouse(SpouseProfile {
        education,
        language: LanguageAbility::uniform(level),
        canadian_work: work,
        age: None,
    })
}

/// A spread of profiles across every input dimension.
fn sample_profiles() -> Vec<CandidateProfile> {
    let mut profiles = Vec::new();
    for age in [17, 18, 25, 30, 37, 44, 45, 100] {
        for education in [
            Education::LessThanSecondary,
            Education::Bachelor,
            Education::Phd,
        ] {
            for level in [0, 4, 7, 9, 12] {
                for married in [false, true] {
                    let mut profile =
                        CandidateProfile::new(age, education, LanguageAbility::uniform(level));
                    profile.canadian_work = WorkExperience::ALL[usize::from(level) % 6];
                    profile.foreign_work = WorkExperience::ALL[usize::from(age) % 6];
                    profile.certificate_of_qualification = level % 2 == 1;
                    profile.provincial_nomination = age == 44;
                    profile.sibling_in_canada = married;
                    if level >= 7 {
                        profile.second_language = Some(LanguageAbility::uniform(level));
                        profile.canadian_education = Some(CanadianEducation::ThreePlusYear);
                    }
                    if married {
                        profile.marital_status =
                            spouse(level, education, WorkExperience::FivePlusYears);
                    }
                    profiles.push(profile);
                }
            }
        }
    }
    profiles
}

#[test]
fn breakdown_always_sums_to_score() {
    for profile in sample_profiles() {
        let result = score(&profile);
        assert_eq!(result.breakdown.total(), result.score, "{profile:?}");
    }
}

#[test]
fn categories_respect_their_ceilings() {
    for profile in sample_profiles() {
        let result = score(&profile);
        let core_ceiling = if profile.has_spouse() { 460 } else { 500 };
        assert!(result.breakdown.core_human_capital <= core_ceiling);
        assert!(result.breakdown.spouse_partner <= 40);
        assert!(result.breakdown.skill_transferability <= 100);
        assert!(result.breakdown.additional_points <= 600);
        assert!(result.score <= 1200);
        if !profile.has_spouse() {
            assert_eq!(result.breakdown.spouse_partner, 0);
        }
    }
}

#[test]
fn ceilings_come_from_the_tables() {
    let tables = PointTables::builtin();
    assert_eq!(ScoreCategory::CoreHumanCapital.ceiling(tables, false), 500);
    assert_eq!(ScoreCategory::CoreHumanCapital.ceiling(tables, true), 460);
    assert_eq!(ScoreCategory::SpousePartner.ceiling(tables, true), 40);
    assert_eq!(ScoreCategory::SkillTransferability.ceiling(tables, false), 100);
    assert_eq!(ScoreCategory::AdditionalPoints.ceiling(tables, false), 600);
}

#[test]
fn age_points_never_increase_after_twenty() {
    let engine = ScoreEngine::builtin();
    for married in [false, true] {
        let mut previous = u32::MAX;
        for age in 20..=100 {
            let mut profile =
                CandidateProfile::new(age, Education::Bachelor, LanguageAbility::uniform(9));
            if married {
                profile.marital_status =
                    spouse(9, Education::Bachelor, WorkExperience::None);
            }
            let points = engine.score(&profile).details.core.age;
            assert!(points <= previous, "age {age} married={married}");
            previous = points;
        }
    }
}

#[test]
fn transferability_is_the_best_combination() {
    for profile in sample_profiles() {
        let result = score(&profile);
        let best = result.details.transferability.best().min(100);
        assert_eq!(result.breakdown.skill_transferability, best);
    }
}

#[test]
fn worked_scenario_from_a_wire_profile() {
    let input: ProfileInput = serde_json::from_value(serde_json::json!({
        "age": 30,
        "education": "bachelor",
        "firstLanguage": { "speaking": 9, "listening": 9, "reading": 9, "writing": 9 },
        "hasSecondLanguage": false,
        "canadianWorkExperience": "none",
        "hasSpouse": false,
        "provincialNomination": false,
        "hasJobOffer": false,
        "hasSiblingInCanada": false
    }))
    .expect("wire profile");
    let mut profile = CandidateProfile::try_from(input).expect("valid profile");

    let result = score(&profile);
    assert_eq!(result.breakdown.core_human_capital, 349);
    assert_eq!(result.breakdown.skill_transferability, 50);
    assert_eq!(result.score, 399);

    profile.provincial_nomination = true;
    let nominated = score(&profile);
    assert_eq!(nominated.breakdown.additional_points, 600);
    assert_eq!(nominated.score, 999);
}

#[test]
fn scoring_is_deterministic() {
    for profile in sample_profiles() {
        assert_eq!(score(&profile), score(&profile));
    }
}

#[test]
fn custom_tables_change_the_result() {
    let mut tables = PointTables::builtin().clone();
    tables.version = "test".to_string();
    tables.additional.sibling_in_canada = 30;
    tables.validate().expect("still consistent");

    let mut profile = CandidateProfile::new(30, Education::Bachelor, LanguageAbility::uniform(9));
    profile.sibling_in_canada = true;
    assert_eq!(score(&profile).details.additional.sibling_in_canada, 15);
    assert_eq!(
        ScoreEngine::new(&tables)
            .score(&profile)
            .details
            .additional
            .sibling_in_canada,
        30
    );
}

#[test]
fn advisor_handles_every_sample_profile() {
    for profile in sample_profiles() {
        let result = score(&profile);
        let analysis = analyze(&profile, result.score, &result.breakdown);
        assert_eq!(analysis.current_score, result.score);
        assert_eq!(analysis.max_possible_score, 1200);
        for quick_win in &analysis.quick_wins {
            assert!(analysis.suggestions.contains(quick_win));
        }
        let ranks: Vec<u8> = analysis
            .suggestions
            .iter()
            .map(|suggestion| suggestion.priority.rank())
            .collect();
        assert!(ranks.windows(2).all(|pair| pair[0] >= pair[1]));
    }
}
