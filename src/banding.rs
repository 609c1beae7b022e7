use serde::{Deserialize, Serialize};

use crate::dictionary;
use crate::error::Result;
use crate::schema::{CandidateRecord, SCORE_COLUMNS};

pub const HIGH_THRESHOLD: f64 = 3.5;
pub const MODERATE_THRESHOLD: f64 = 2.5;
pub const STRENGTH_ONLY_THRESHOLD: f64 = 4.0;
pub const DEVELOPMENT_ONLY_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreBand {
    High,
    Moderate,
    Low,
}

impl ScoreBand {
    /// High = [3.5, 5.0], Moderate = [2.5, 3.49], Low = [1.0, 2.49].
    ///
    /// Values outside the nominal 1-5 range fall into the nearest band.
    pub fn classify(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            ScoreBand::High
        } else if score >= MODERATE_THRESHOLD {
            ScoreBand::Moderate
        } else {
            ScoreBand::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::High => "High",
            ScoreBand::Moderate => "Moderate",
            ScoreBand::Low => "Low",
        }
    }
}

pub fn is_strength_only(score: f64) -> bool {
    score >= STRENGTH_ONLY_THRESHOLD
}

pub fn is_development_only(score: f64) -> bool {
    score <= DEVELOPMENT_ONLY_THRESHOLD
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompetencyReading {
    pub competency: &'static str,
    pub score: f64,
    pub band: ScoreBand,
    /// Dictionary text for this band, when the competency has a dictionary entry.
    pub interpretation: Option<&'static str>,
}

/// Local banding of every competency on a record.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreProfile {
    pub readings: Vec<CompetencyReading>,
}

impl ScoreProfile {
    pub fn from_record(record: &CandidateRecord) -> Result<Self> {
        let readings = SCORE_COLUMNS
            .iter()
            .map(|&competency| {
                let score = record.score(competency)?;
                let band = ScoreBand::classify(score);
                Ok(CompetencyReading {
                    competency,
                    score,
                    band,
                    interpretation: dictionary::interpretation(competency, band),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { readings })
    }

    pub fn band_of(&self, competency: &str) -> Option<ScoreBand> {
        self.readings
            .iter()
            .find(|r| r.competency == competency)
            .map(|r| r.band)
    }

    pub fn strengths(&self) -> Vec<&'static str> {
        self.readings
            .iter()
            .filter(|r| is_strength_only(r.score))
            .map(|r| r.competency)
            .collect()
    }

    pub fn development_areas(&self) -> Vec<&'static str> {
        self.readings
            .iter()
            .filter(|r| is_development_only(r.score))
            .map(|r| r.competency)
            .collect()
    }
}
