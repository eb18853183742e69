//! Conversion of raw language test results into CLB / NCLC levels.
//!
//! Each scale is a list of `(lowest score, level)` bands plus an upper bound;
//! scores above the bound or below the first band convert to level 0.

use crate::core::error::ProfileError;
use crate::core::profile::{Clb, LanguageAbility, Skill};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

static IELTS_BAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d(\.[05])?$").expect("valid ielts band regex"));
static WHOLE_SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}$").expect("valid whole score regex"));

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LanguageTest {
    Ielts,
    Celpip,
    Tef,
    Tcf,
}

impl LanguageTest {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ielts => "ielts",
            Self::Celpip => "celpip",
            Self::Tef => "tef",
            Self::Tcf => "tcf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ielts => "IELTS General Training",
            Self::Celpip => "CELPIP General",
            Self::Tef => "TEF Canada",
            Self::Tcf => "TCF Canada",
        }
    }

    /// French tests report NCLC levels rather than CLB.
    pub fn is_french(self) -> bool {
        matches!(self, Self::Tef | Self::Tcf)
    }
}

impl fmt::Display for LanguageTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LanguageTest {
    type Err = ProfileError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ielts" => Ok(Self::Ielts),
            "celpip" => Ok(Self::Celpip),
            "tef" => Ok(Self::Tef),
            "tcf" => Ok(Self::Tcf),
            _ => Err(ProfileError::invalid("test", value)),
        }
    }
}

struct Scale {
    max: u16,
    bands: &'static [(u16, u8)],
}

impl Scale {
    fn level_for(&self, score: u16) -> u8 {
        if score > self.max {
            return 0;
        }
        self.bands
            .iter()
            .rev()
            .find(|(lowest, _)| *lowest <= score)
            .map_or(0, |(_, level)| *level)
    }
}

// IELTS bands are keyed in half-band units (band * 2).
const IELTS_SPEAKING: Scale = Scale {
    max: 18,
    bands: &[
        (8, 4),
        (9, 5),
        (10, 6),
        (12, 7),
        (13, 8),
        (14, 9),
        (15, 10),
        (16, 11),
        (17, 12),
    ],
};
const IELTS_LISTENING: Scale = Scale {
    max: 18,
    bands: &[(8, 4), (10, 5), (11, 6), (12, 7), (13, 8), (15, 9), (17, 10)],
};
const IELTS_READING: Scale = Scale {
    max: 18,
    bands: &[
        (8, 3),
        (9, 4),
        (10, 5),
        (11, 6),
        (13, 7),
        (14, 8),
        (15, 9),
        (17, 10),
    ],
};
const IELTS_WRITING: Scale = Scale {
    max: 18,
    bands: &[(8, 4), (9, 5), (11, 6), (13, 7), (15, 8), (16, 9), (17, 10)],
};

const TEF_SPEAKING_WRITING: Scale = Scale {
    max: 500,
    bands: &[
        (181, 4),
        (226, 5),
        (271, 6),
        (310, 7),
        (349, 8),
        (371, 9),
        (393, 10),
        (416, 11),
        (451, 12),
    ],
};
const TEF_LISTENING: Scale = Scale {
    max: 400,
    bands: &[
        (145, 4),
        (181, 5),
        (217, 6),
        (249, 7),
        (280, 8),
        (298, 9),
        (316, 10),
        (334, 11),
        (361, 12),
    ],
};
const TEF_READING: Scale = Scale {
    max: 360,
    bands: &[
        (121, 4),
        (151, 5),
        (181, 6),
        (207, 7),
        (233, 8),
        (248, 9),
        (263, 10),
        (278, 11),
        (301, 12),
    ],
};

const TCF_SPEAKING_WRITING: Scale = Scale {
    max: 20,
    bands: &[(6, 4), (10, 5), (12, 6), (14, 7), (16, 8), (18, 9), (20, 10)],
};
const TCF_LISTENING: Scale = Scale {
    max: 600,
    bands: &[
        (331, 4),
        (369, 5),
        (398, 6),
        (458, 7),
        (503, 8),
        (523, 9),
        (549, 10),
    ],
};
const TCF_READING: Scale = Scale {
    max: 600,
    bands: &[
        (342, 4),
        (375, 5),
        (406, 6),
        (453, 7),
        (499, 8),
        (524, 9),
        (549, 10),
    ],
};

const CELPIP: Scale = Scale {
    max: 12,
    bands: &[
        (1, 1),
        (2, 2),
        (3, 3),
        (4, 4),
        (5, 5),
        (6, 6),
        (7, 7),
        (8, 8),
        (9, 9),
        (10, 10),
        (11, 11),
        (12, 12),
    ],
};

fn scale_for(test: LanguageTest, skill: Skill) -> &'static Scale {
    match (test, skill) {
        (LanguageTest::Ielts, Skill::Speaking) => &IELTS_SPEAKING,
        (LanguageTest::Ielts, Skill::Listening) => &IELTS_LISTENING,
        (LanguageTest::Ielts, Skill::Reading) => &IELTS_READING,
        (LanguageTest::Ielts, Skill::Writing) => &IELTS_WRITING,
        (LanguageTest::Celpip, _) => &CELPIP,
        (LanguageTest::Tef, Skill::Speaking | Skill::Writing) => &TEF_SPEAKING_WRITING,
        (LanguageTest::Tef, Skill::Listening) => &TEF_LISTENING,
        (LanguageTest::Tef, Skill::Reading) => &TEF_READING,
        (LanguageTest::Tcf, Skill::Speaking | Skill::Writing) => &TCF_SPEAKING_WRITING,
        (LanguageTest::Tcf, Skill::Listening) => &TCF_LISTENING,
        (LanguageTest::Tcf, Skill::Reading) => &TCF_READING,
    }
}

/// Convert one raw test score (as written on the result sheet) to a CLB level.
pub fn convert_score(test: LanguageTest, skill: Skill, raw: &str) -> Result<Clb, ProfileError> {
    let raw = raw.trim();
    let invalid = || ProfileError::InvalidTestScore {
        test: test.as_str(),
        skill: skill.as_str(),
        value: raw.to_string(),
    };

    let score = match test {
        LanguageTest::Ielts => {
            if !IELTS_BAND_RE.is_match(raw) {
                return Err(invalid());
            }
            let band: f32 = raw.parse().map_err(|_| invalid())?;
            (band * 2.0).round() as u16
        }
        LanguageTest::Celpip | LanguageTest::Tef | LanguageTest::Tcf => {
            if !WHOLE_SCORE_RE.is_match(raw) {
                return Err(invalid());
            }
            raw.parse::<u16>().map_err(|_| invalid())?
        }
    };

    let level = scale_for(test, skill).level_for(score);
    Ok(Clb::new(i64::from(level)))
}

/// Raw results for the four abilities of one test sitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub test: LanguageTest,
    pub speaking: String,
    pub listening: String,
    pub reading: String,
    pub writing: String,
}

impl TestResult {
    pub fn raw(&self, skill: Skill) -> &str {
        match skill {
            Skill::Speaking => &self.speaking,
            Skill::Listening => &self.listening,
            Skill::Reading => &self.reading,
            Skill::Writing => &self.writing,
        }
    }

    pub fn to_ability(&self) -> Result<LanguageAbility, ProfileError> {
        Ok(LanguageAbility {
            speaking: convert_score(self.test, Skill::Speaking, &self.speaking)?,
            listening: convert_score(self.test, Skill::Listening, &self.listening)?,
            reading: convert_score(self.test, Skill::Reading, &self.reading)?,
            writing: convert_score(self.test, Skill::Writing, &self.writing)?,
        })
    }
}
