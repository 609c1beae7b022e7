use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ReportError, Result};

pub const NAME_COLUMN: &str = "Name";
pub const GENDER_COLUMN: &str = "Gender";

/// Numeric competency columns in input order (everything after Name and Gender).
pub static SCORE_COLUMNS: [&str; 32] = [
    "Overall Leadership",
    "Reasoning & Problem Solving",
    "Drive Potential",
    "Contribution",
    "Purpose",
    "Achievement",
    "Learning Potential",
    "Mastery",
    "Growth",
    "Insightful",
    "People Potential",
    "Collaboration",
    "Empathy",
    "Sociable",
    "Strategic Potential",
    "Awareness",
    "Autonomy",
    "Perspective",
    "Execution Potential",
    "Resourcefulness",
    "Efficacy",
    "Resilience",
    "Change Potential",
    "Agility",
    "Ambiguity",
    "Venturesome",
    "Steers Changes",
    "Manages Stakeholders",
    "Drives Results",
    "Thinks Strategically",
    "Solves Challenges",
    "Develops Talent",
];

/// Every input column, in the order the sample template lays them out.
pub fn columns() -> impl Iterator<Item = &'static str> {
    [NAME_COLUMN, GENDER_COLUMN]
        .into_iter()
        .chain(SCORE_COLUMNS.iter().copied())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pronouns {
    pub subject: &'static str,
    pub object: &'static str,
    pub possessive: &'static str,
}

impl Gender {
    pub fn marker(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }

    pub fn pronouns(&self) -> Pronouns {
        match self {
            Gender::Male => Pronouns {
                subject: "he",
                object: "him",
                possessive: "his",
            },
            Gender::Female => Pronouns {
                subject: "she",
                object: "her",
                possessive: "her",
            },
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

impl FromStr for Gender {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            _ => Err(ReportError::InvalidGender(s.to_string())),
        }
    }
}

impl fmt::Display for Pronouns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.subject, self.object, self.possessive)
    }
}

/// One candidate's assessment row.
///
/// Scores are keyed by competency column name. Nothing here checks that every
/// competency is present; the prompt compiler does that when it walks the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    pub name: String,
    pub gender: Gender,
    pub scores: BTreeMap<String, f64>,
}

impl CandidateRecord {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            name: name.into(),
            gender,
            scores: BTreeMap::new(),
        }
    }

    pub fn with_score(mut self, competency: impl Into<String>, score: f64) -> Self {
        self.scores.insert(competency.into(), score);
        self
    }

    pub fn score(&self, competency: &str) -> Result<f64> {
        self.scores
            .get(competency)
            .copied()
            .ok_or_else(|| ReportError::MissingField(competency.to_string()))
    }

    /// Builds a record from one table row, where `headers[i]` names `values[i]`.
    ///
    /// Blank cells count as missing. A score must be a finite number, so `nan`
    /// and `inf` are rejected. Columns outside the schema are ignored.
    pub fn from_row<S: AsRef<str>>(headers: &[S], values: &[S]) -> Result<Self> {
        let name = cell(headers, values, NAME_COLUMN)?.to_string();
        let gender: Gender = cell(headers, values, GENDER_COLUMN)?.parse()?;

        let mut scores = BTreeMap::new();
        for column in SCORE_COLUMNS {
            let raw = cell(headers, values, column)?;
            let value = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ReportError::InvalidScore {
                    field: column.to_string(),
                    value: raw.to_string(),
                })?;
            scores.insert(column.to_string(), value);
        }

        Ok(Self {
            name,
            gender,
            scores,
        })
    }
}

fn cell<'a, S: AsRef<str>>(headers: &[S], values: &'a [S], column: &str) -> Result<&'a str> {
    headers
        .iter()
        .position(|h| h.as_ref().trim() == column)
        .and_then(|idx| values.get(idx))
        .map(|v| v.as_ref().trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ReportError::MissingField(column.to_string()))
}

/// Renders a score the way the input sheet shows it: whole numbers keep one
/// decimal place (`2.0`), everything else uses the shortest exact form.
pub fn format_score(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
