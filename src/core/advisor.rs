//! Improvement advisor: inspects a scored profile and proposes ranked actions.

use crate::core::profile::{CandidateProfile, Education, WorkExperience};
use crate::core::score::CategoryBreakdown;
use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;

pub const MAX_POSSIBLE_SCORE: u32 = 1200;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum AdviceCategory {
    #[serde(rename = "Age Strategy")]
    AgeStrategy,
    Education,
    Language,
    #[serde(rename = "Work Experience")]
    WorkExperience,
    #[serde(rename = "Spouse Factors")]
    SpouseFactors,
    #[serde(rename = "Provincial Nomination")]
    ProvincialNomination,
    #[serde(rename = "Job Offer")]
    JobOffer,
    #[serde(rename = "Family Connection")]
    FamilyConnection,
    #[serde(rename = "Skill Transferability")]
    SkillTransferability,
}

impl fmt::Display for AdviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AgeStrategy => write!(f, "Age Strategy"),
            Self::Education => write!(f, "Education"),
            Self::Language => write!(f, "Language"),
            Self::WorkExperience => write!(f, "Work Experience"),
            Self::SpouseFactors => write!(f, "Spouse Factors"),
            Self::ProvincialNomination => write!(f, "Provincial Nomination"),
            Self::JobOffer => write!(f, "Job Offer"),
            Self::FamilyConnection => write!(f, "Family Connection"),
            Self::SkillTransferability => write!(f, "Skill Transferability"),
        }
    }
}

/// Estimated point gain, inclusive on both ends.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct GainRange {
    pub min: u32,
    pub max: u32,
}

impl GainRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub const fn exact(points: u32) -> Self {
        Self::new(points, points)
    }
}

impl fmt::Display for GainRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{} points", self.min)
        } else {
            write!(f, "{}-{} points", self.min, self.max)
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImprovementSuggestion {
    pub id: &'static str,
    pub category: AdviceCategory,
    pub title: String,
    pub description: String,
    pub potential_gain: GainRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain_note: Option<String>,
    pub difficulty: Difficulty,
    pub timeframe: String,
    pub priority: Priority,
    pub action_steps: Vec<String>,
    pub icon: &'static str,
}

impl ImprovementSuggestion {
    pub fn new(id: &'static str, category: AdviceCategory, title: impl Into<String>) -> Self {
        Self {
            id,
            category,
            title: title.into(),
            description: String::new(),
            potential_gain: GainRange::exact(0),
            gain_note: None,
            difficulty: Difficulty::Medium,
            timeframe: String::new(),
            priority: Priority::Medium,
            action_steps: Vec::new(),
            icon: "",
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_gain(mut self, gain: GainRange) -> Self {
        self.potential_gain = gain;
        self
    }

    pub fn with_gain_note(mut self, note: impl Into<String>) -> Self {
        self.gain_note = Some(note.into());
        self
    }

    pub fn with_effort(mut self, difficulty: Difficulty, timeframe: impl Into<String>) -> Self {
        self.difficulty = difficulty;
        self.timeframe = timeframe.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_steps(mut self, steps: &[&str]) -> Self {
        self.action_steps = steps.iter().map(|step| step.to_string()).collect();
        self
    }

    pub fn with_icon(mut self, icon: &'static str) -> Self {
        self.icon = icon;
        self
    }

    /// Human rendering of the gain, e.g. `15-30 points + PGWP`.
    pub fn potential_gain_label(&self) -> String {
        match &self.gain_note {
            Some(note) => format!("{} + {}", self.potential_gain, note),
            None => self.potential_gain.to_string(),
        }
    }

    pub fn is_quick_win(&self) -> bool {
        self.difficulty == Difficulty::Easy && self.priority == Priority::High
    }

    /// Large single moves: anything that can reach the 600-point nomination
    /// bonus, or that is worth at least 50 points even at the low end.
    pub fn is_strategic(&self) -> bool {
        self.potential_gain.max >= 600 || self.potential_gain.min >= 50
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImprovementAnalysis {
    pub current_score: u32,
    pub max_possible_score: u32,
    pub suggestions: Vec<ImprovementSuggestion>,
    pub quick_wins: Vec<ImprovementSuggestion>,
    pub strategic_moves: Vec<ImprovementSuggestion>,
}

/// Run every advice rule against the profile and rank the results.
pub fn analyze(
    profile: &CandidateProfile,
    current_score: u32,
    breakdown: &CategoryBreakdown,
) -> ImprovementAnalysis {
    let mut suggestions = Vec::new();

    advise_age(profile, &mut suggestions);
    advise_education(profile, &mut suggestions);
    advise_first_language(profile, &mut suggestions);
    advise_second_language(profile, &mut suggestions);
    advise_canadian_work(profile, &mut suggestions);
    advise_foreign_work(profile, &mut suggestions);
    advise_spouse(profile, &mut suggestions);
    advise_additional(profile, &mut suggestions);
    advise_transferability(profile, &mut suggestions);

    // sort_by_key is stable: equal priorities keep rule order.
    suggestions.sort_by_key(|suggestion| Reverse(suggestion.priority.rank()));

    let quick_wins = suggestions
        .iter()
        .filter(|suggestion| suggestion.is_quick_win())
        .cloned()
        .collect();
    let strategic_moves = suggestions
        .iter()
        .filter(|suggestion| suggestion.is_strategic())
        .cloned()
        .collect();

    tracing::debug!(
        current_score,
        additional = breakdown.additional_points,
        suggestions = suggestions.len(),
        "analyzed improvements"
    );

    ImprovementAnalysis {
        current_score,
        max_possible_score: MAX_POSSIBLE_SCORE,
        suggestions,
        quick_wins,
        strategic_moves,
    }
}

fn advise_age(profile: &CandidateProfile, suggestions: &mut Vec<ImprovementSuggestion>) {
    let age = profile.age;
    if !(30..=44).contains(&age) {
        return;
    }

    let younger_spouse = profile
        .spouse()
        .and_then(|spouse| spouse.age)
        .is_some_and(|spouse_age| spouse_age < age && (20..=29).contains(&spouse_age));
    if younger_spouse {
        suggestions.push(
            ImprovementSuggestion::new(
                "switch-principal-applicant",
                AdviceCategory::AgeStrategy,
                "Switch Principal Applicant",
            )
            .with_description(
                "Your spouse is younger and would earn more age points. Consider making them the principal applicant.",
            )
            .with_gain(GainRange::new(40, 100))
            .with_effort(Difficulty::Easy, "Immediate")
            .with_priority(Priority::High)
            .with_steps(&[
                "Compare both profiles in full",
                "Calculate the CRS score with your spouse as principal applicant",
                "Submit a new Express Entry profile with your spouse as principal applicant",
            ])
            .with_icon("🔄"),
        );
    }

    if age >= 35 {
        suggestions.push(
            ImprovementSuggestion::new(
                "compensate-age",
                AdviceCategory::AgeStrategy,
                "Compensate for Age with Other Factors",
            )
            .with_description(
                "Age points decline every year from 30. Offset them with stronger language results, more education, and a provincial nomination.",
            )
            .with_gain(GainRange::new(100, 600))
            .with_effort(Difficulty::Medium, "3-12 months")
            .with_priority(Priority::High)
            .with_steps(&[
                "Aim for CLB 9 or higher in every language ability",
                "Apply to Provincial Nominee Programs",
                "Consider upgrading your education",
                "Gain Canadian work experience where possible",
            ])
            .with_icon("⚡"),
        );
    }
}

fn advise_education(profile: &CandidateProfile, suggestions: &mut Vec<ImprovementSuggestion>) {
    match profile.education {
        Education::Bachelor => suggestions.push(
            ImprovementSuggestion::new(
                "pursue-masters",
                AdviceCategory::Education,
                "Pursue a Master's Degree",
            )
            .with_description(
                "Moving from a Bachelor's to a Master's adds 15 core points and strengthens skill transferability.",
            )
            .with_gain(GainRange::new(15, 50))
            .with_effort(Difficulty::Hard, "1-2 years")
            .with_priority(Priority::Medium)
            .with_steps(&[
                "Research Master's programs in Canada, which also earn Canadian education points",
                "Apply to accredited universities",
                "Consider one-year intensive programs",
                "Obtain an Educational Credential Assessment once you graduate",
            ])
            .with_icon("🎓"),
        ),
        Education::Master => suggestions.push(
            ImprovementSuggestion::new(
                "consider-phd",
                AdviceCategory::Education,
                "Consider a Doctoral Degree",
            )
            .with_description(
                "A PhD adds another 15 core points. Worth it only if it fits your career plans.",
            )
            .with_gain(GainRange::exact(15))
            .with_effort(Difficulty::Hard, "3-5 years")
            .with_priority(Priority::Low)
            .with_steps(&[
                "Decide whether a PhD matches your career plan",
                "Research funded PhD programs in Canada",
                "Apply to research institutions",
            ])
            .with_icon("🔬"),
        ),
        _ => {}
    }

    if profile.canadian_education.is_none() {
        suggestions.push(
            ImprovementSuggestion::new(
                "canadian-credential",
                AdviceCategory::Education,
                "Earn a Canadian Credential",
            )
            .with_description(
                "One to three years of study in Canada adds 15-30 additional points and opens the Post-Graduation Work Permit route.",
            )
            .with_gain(GainRange::new(15, 30))
            .with_gain_note("PGWP")
            .with_effort(Difficulty::Hard, "1-3 years")
            .with_priority(Priority::Medium)
            .with_steps(&[
                "Research one-year graduate certificate programs",
                "Apply to a Designated Learning Institution (DLI)",
                "Obtain a study permit",
                "Apply for a Post-Graduation Work Permit after graduating",
                "Gain Canadian work experience",
            ])
            .with_icon("🇨🇦"),
        );
    }
}

fn advise_first_language(
    profile: &CandidateProfile,
    suggestions: &mut Vec<ImprovementSuggestion>,
) {
    let language = &profile.first_language;
    let min_clb = language.min_level();

    if min_clb < 9 {
        let gain = if min_clb < 7 {
            GainRange::new(50, 100)
        } else {
            GainRange::new(30, 80)
        };
        let priority = if min_clb < 8 {
            Priority::High
        } else {
            Priority::Medium
        };

        suggestions.push(
            ImprovementSuggestion::new(
                "improve-first-language",
                AdviceCategory::Language,
                "Improve First Official Language Score",
            )
            .with_description(
                "Your CLB levels are not maximized. CLB 9 or higher in every ability raises both core and transferability points.",
            )
            .with_gain(gain)
            .with_effort(Difficulty::Medium, "1-3 months")
            .with_priority(priority)
            .with_steps(&[
                "Identify your weakest ability (listening, reading, writing, speaking)",
                "Enroll in an IELTS or CELPIP preparation course",
                "Practice daily with official test material",
                "Consider working with a language tutor",
                "Retake the test once practice results reach CLB 9 consistently",
            ])
            .with_icon("📚"),
        );
    }

    if language.average_in(7, 9) {
        suggestions.push(
            ImprovementSuggestion::new(
                "target-clb9",
                AdviceCategory::Language,
                "Target CLB 9 for Skill Transferability",
            )
            .with_description(
                "CLB 9 in every ability unlocks the top skill transferability combinations, worth up to 50 points.",
            )
            .with_gain(GainRange::new(25, 50))
            .with_effort(Difficulty::Medium, "2-4 months")
            .with_priority(Priority::High)
            .with_steps(&[
                "Focus on CLB 9 in all four abilities",
                "IELTS General Training equivalent: listening 8, reading 7, writing 7, speaking 7",
                "Join an online study group",
                "Take several full practice tests",
            ])
            .with_icon("🎯"),
        );
    }
}

fn advise_second_language(
    profile: &CandidateProfile,
    suggestions: &mut Vec<ImprovementSuggestion>,
) {
    match &profile.second_language {
        None => suggestions.push(
            ImprovementSuggestion::new(
                "learn-french",
                AdviceCategory::Language,
                "Learn French as a Second Language",
            )
            .with_description(
                "French results add up to 24 points on their own plus a bilingual bonus of up to 50 points.",
            )
            .with_gain(GainRange::new(25, 74))
            .with_effort(Difficulty::Hard, "6-12 months")
            .with_priority(Priority::High)
            .with_steps(&[
                "Enroll in French courses aiming for NCLC 7 or higher",
                "Practice daily with a language app",
                "Sit the TEF Canada or TCF Canada test",
                "Target NCLC 7 in every ability to unlock the bilingual bonus",
                "NCLC 7 French with CLB 5 English earns the full 50-point bonus",
            ])
            .with_icon("🇫🇷"),
        ),
        Some(second) if second.min_level() < 7 => suggestions.push(
            ImprovementSuggestion::new(
                "improve-french",
                AdviceCategory::Language,
                "Improve French to NCLC 7+",
            )
            .with_description(
                "NCLC 7 or higher in every French ability unlocks a 25-50 point bilingual bonus.",
            )
            .with_gain(GainRange::new(25, 50))
            .with_effort(Difficulty::Medium, "3-6 months")
            .with_priority(Priority::High)
            .with_steps(&[
                "Continue French studies toward NCLC 7",
                "Practice all four abilities evenly",
                "Retake TEF Canada or TCF Canada",
                "Reach at least NCLC 7 in every ability",
            ])
            .with_icon("📖"),
        ),
        Some(_) => {}
    }
}

fn advise_canadian_work(
    profile: &CandidateProfile,
    suggestions: &mut Vec<ImprovementSuggestion>,
) {
    match profile.canadian_work {
        WorkExperience::None => suggestions.push(
            ImprovementSuggestion::new(
                "gain-canadian-experience",
                AdviceCategory::WorkExperience,
                "Gain Canadian Work Experience",
            )
            .with_description(
                "A single year of Canadian experience is worth 35-40 core points and opens several transferability combinations.",
            )
            .with_gain(GainRange::new(40, 130))
            .with_effort(Difficulty::Hard, "1-5 years")
            .with_priority(Priority::High)
            .with_steps(&[
                "Apply for a Post-Graduation Work Permit if you studied in Canada",
                "Check eligibility for an International Experience Canada working holiday",
                "Search for LMIA-supported job offers",
                "Look into intra-company transfers",
                "Network with Canadian employers in your field",
            ])
            .with_icon("💼"),
        ),
        WorkExperience::OneYear => suggestions.push(
            ImprovementSuggestion::new(
                "extend-canadian-work",
                AdviceCategory::WorkExperience,
                "Work Towards 2+ Years of Canadian Experience",
            )
            .with_description(
                "Every additional year up to five earns more core points and better transferability combinations.",
            )
            .with_gain(GainRange::new(13, 40))
            .with_effort(Difficulty::Medium, "1-4 years")
            .with_priority(Priority::Medium)
            .with_steps(&[
                "Keep working in a TEER 0, 1, 2, or 3 occupation",
                "Extend your work permit if needed",
                "Keep records of all work experience",
            ])
            .with_icon("📈"),
        ),
        _ => {}
    }
}

fn advise_foreign_work(profile: &CandidateProfile, suggestions: &mut Vec<ImprovementSuggestion>) {
    if profile.foreign_work != WorkExperience::None {
        return;
    }

    suggestions.push(
        ImprovementSuggestion::new(
            "document-foreign-work",
            AdviceCategory::WorkExperience,
            "Document Foreign Work Experience",
        )
        .with_description(
            "Foreign work experience combined with strong language results adds up to 50 skill transferability points.",
        )
        .with_gain(GainRange::new(0, 50))
        .with_effort(Difficulty::Easy, "Immediate")
        .with_priority(Priority::Medium)
        .with_steps(&[
            "Collect reference letters from previous employers",
            "Make sure letters list duties, dates, and weekly hours",
            "Confirm the work falls under TEER 0, 1, 2, or 3",
            "Include all relevant experience",
        ])
        .with_icon("📋"),
    );
}

fn advise_spouse(profile: &CandidateProfile, suggestions: &mut Vec<ImprovementSuggestion>) {
    let Some(spouse) = profile.spouse() else {
        return;
    };

    if spouse.language.min_level() < 9 {
        suggestions.push(
            ImprovementSuggestion::new(
                "spouse-language",
                AdviceCategory::SpouseFactors,
                "Improve Spouse's Language Score",
            )
            .with_description("Your spouse's language results can contribute up to 20 points.")
            .with_gain(GainRange::new(5, 15))
            .with_effort(Difficulty::Medium, "2-4 months")
            .with_priority(Priority::Medium)
            .with_steps(&[
                "Spouse takes IELTS or CELPIP",
                "Target CLB 9 or higher in every ability",
                "Prepare for the test together",
            ])
            .with_icon("👥"),
        );
    }

    if spouse.education <= Education::Secondary {
        suggestions.push(
            ImprovementSuggestion::new(
                "spouse-education",
                AdviceCategory::SpouseFactors,
                "Upgrade Spouse's Education",
            )
            .with_description("Post-secondary education for your spouse adds up to 10 points.")
            .with_gain(GainRange::new(8, 10))
            .with_effort(Difficulty::Hard, "1-4 years")
            .with_priority(Priority::Low)
            .with_steps(&[
                "Consider your spouse completing a post-secondary program",
                "Obtain an Educational Credential Assessment for your spouse",
            ])
            .with_icon("🎓"),
        );
    }

    if spouse.canadian_work == WorkExperience::None {
        suggestions.push(
            ImprovementSuggestion::new(
                "spouse-canadian-work",
                AdviceCategory::SpouseFactors,
                "Spouse Gains Canadian Experience",
            )
            .with_description("Canadian work experience for your spouse adds up to 10 points.")
            .with_gain(GainRange::new(5, 10))
            .with_effort(Difficulty::Hard, "1+ years")
            .with_priority(Priority::Low)
            .with_steps(&[
                "Spouse applies for an open work permit",
                "Spouse secures a TEER 0, 1, 2, or 3 position in Canada",
            ])
            .with_icon("💼"),
        );
    }
}

fn advise_additional(profile: &CandidateProfile, suggestions: &mut Vec<ImprovementSuggestion>) {
    if !profile.provincial_nomination {
        suggestions.push(
            ImprovementSuggestion::new(
                "apply-pnp",
                AdviceCategory::ProvincialNomination,
                "Apply for a Provincial Nominee Program (PNP)",
            )
            .with_description(
                "A provincial nomination adds 600 points, which all but guarantees an invitation to apply. It is the single largest gain available.",
            )
            .with_gain(GainRange::exact(600))
            .with_effort(Difficulty::Medium, "3-12 months")
            .with_priority(Priority::High)
            .with_steps(&[
                "Research provincial programs: Ontario, British Columbia, Alberta, Saskatchewan, Manitoba, Atlantic provinces",
                "Check eligibility for Express Entry-aligned streams",
                "Submit an Expression of Interest to each province that fits",
                "Prepare all documents in advance",
                "Favor provinces listing your occupation as in demand",
            ])
            .with_icon("🏆"),
        );
    }

    if profile.job_offer.is_none() {
        suggestions.push(
            ImprovementSuggestion::new(
                "secure-job-offer",
                AdviceCategory::JobOffer,
                "Secure a Canadian Job Offer with LMIA",
            )
            .with_description(
                "An LMIA-supported offer strengthens provincial nomination and work permit options and has been worth 50-200 points under past grids.",
            )
            .with_gain(GainRange::new(50, 200))
            .with_effort(Difficulty::Hard, "3-12 months")
            .with_priority(Priority::Medium)
            .with_steps(&[
                "Search for employers willing to obtain an LMIA",
                "Network at industry events and job fairs",
                "Use Job Bank, LinkedIn, and Indeed",
                "Make sure the offer is full-time and non-seasonal",
            ])
            .with_icon("💼"),
        );
    }

    if !profile.sibling_in_canada {
        suggestions.push(
            ImprovementSuggestion::new(
                "sibling-points",
                AdviceCategory::FamilyConnection,
                "Sibling in Canada",
            )
            .with_description(
                "A brother or sister who is a Canadian citizen or permanent resident is worth 15 points.",
            )
            .with_gain(GainRange::exact(15))
            .with_effort(Difficulty::Easy, "Immediate")
            .with_priority(Priority::Medium)
            .with_steps(&[
                "Confirm your sibling is a Canadian citizen or permanent resident",
                "Confirm your sibling is at least 18 and living in Canada",
                "Gather proof of the relationship and status",
                "Update your Express Entry profile",
            ])
            .with_icon("👨‍👩‍👧‍👦"),
        );
    }
}

fn advise_transferability(
    profile: &CandidateProfile,
    suggestions: &mut Vec<ImprovementSuggestion>,
) {
    let min_clb = profile.first_language.min_level();
    if !profile.education.is_post_secondary() || !(7..9).contains(&min_clb) {
        return;
    }

    suggestions.push(
        ImprovementSuggestion::new(
            "maximize-transferability",
            AdviceCategory::SkillTransferability,
            "Unlock Maximum Transferability Points",
        )
        .with_description(
            "Your post-secondary education with CLB 9 in every ability is worth 50 transferability points, double what you earn now.",
        )
        .with_gain(GainRange::new(25, 50))
        .with_effort(Difficulty::Medium, "1-3 months")
        .with_priority(Priority::High)
        .with_steps(&[
            "Focus on reaching CLB 9 in every ability",
            "This combination unlocks the maximum transferability points",
            "Usually much faster than gaining more work experience",
        ])
        .with_icon("⚡"),
    );
}
