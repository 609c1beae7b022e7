//! Behavioral interpretation dictionary.
//!
//! Each assessed competency has one fixed sentence per score band. The model is
//! told to use this text exactly, so the strings below are reproduced in the
//! prompt byte for byte.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::banding::ScoreBand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetencyFamily {
    Core,
    BusinessSimulation,
    ThrivingIndex,
}

impl CompetencyFamily {
    pub fn heading(&self) -> &'static str {
        match self {
            CompetencyFamily::Core => "Core Competencies:",
            CompetencyFamily::BusinessSimulation => "Business Simulation (BS) Competencies:",
            CompetencyFamily::ThrivingIndex => "Thriving Index (TI) Potentials & Factors:",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interpretation {
    pub competency: &'static str,
    pub family: CompetencyFamily,
    pub high: &'static str,
    pub moderate: &'static str,
    pub low: &'static str,
}

impl Interpretation {
    pub fn for_band(&self, band: ScoreBand) -> &'static str {
        match band {
            ScoreBand::High => self.high,
            ScoreBand::Moderate => self.moderate,
            ScoreBand::Low => self.low,
        }
    }
}

/// Business Simulation competency paired with the Thriving Index potential
/// that measures the same trait.
pub static BS_TI_MAPPING: [(&str, &str); 6] = [
    ("Steers Changes", "Change Potential"),
    ("Manages Stakeholders", "People Potential"),
    ("Drives Results", "Drive Potential"),
    ("Thinks Strategically", "Strategic Potential"),
    ("Solves Challenges", "Execution Potential"),
    ("Develops Talent", "Learning Potential"),
];

pub static DICTIONARY: [Interpretation; 14] = [
    Interpretation {
        competency: "Overall Leadership",
        family: CompetencyFamily::Core,
        high: "Demonstrates high potential with a strong capacity for growth and success in a more complex role.",
        moderate: "Demonstrates moderate potential with a reasonable capacity for growth and success in a more complex role.",
        low: "Demonstrates low potential with a reasonable capacity for growth and success in a more complex role.",
    },
    Interpretation {
        competency: "Reasoning & Problem Solving",
        family: CompetencyFamily::Core,
        high: "Candidate demonstrates a higher-than-average reasoning and problem-solving ability as compared to a group of peers.",
        moderate: "Candidate demonstrates an average reasoning and problem-solving ability as compared to a group of peers.",
        low: "Candidate demonstrates a below-average reasoning and problem-solving ability as compared to a group of peers.",
    },
    Interpretation {
        competency: "Steers Changes",
        family: CompetencyFamily::BusinessSimulation,
        high: "Strong ability to recognise and drive change and transformation at an organisational level. Displays strong resilience and strength during adversity and is well equipped to enable buy-in and support.",
        moderate: "Moderate ability to contribute to organisational change and transformation. Shows resilience during challenging times and can occasionally support others in gaining buy-in.",
        low: "Limited ability to support change and transformation at an organisational level. Struggles to remain resilient during adversity and has difficulty enabling buy-in and support.",
    },
    Interpretation {
        competency: "Manages Stakeholders",
        family: CompetencyFamily::BusinessSimulation,
        high: "Strong ability to develop and nurture relationships with key stakeholders. Actively finds synergies between organisations to ensure positive outcomes. Networks with stakeholders within and outside one’s industry to stay up-to-date about new developments.",
        moderate: "Moderate ability to maintain and build relationships with key stakeholders. Occasionally identifies synergies between organisations and engages with stakeholders to stay informed of developments.",
        low: "Limited ability to develop and maintain relationships with stakeholders. Rarely identifies synergies between organisations or engages with external stakeholders to stay informed.",
    },
    Interpretation {
        competency: "Drives Results",
        family: CompetencyFamily::BusinessSimulation,
        high: "Strong ability to articulate performance standards and metrics that support the achievement of organisational goals. Ensures a high-performance culture across teams and demonstrates grit in achievement of challenging goals.",
        moderate: "Moderate ability to articulate performance standards and metrics that contribute to achieving organisational goals. Occasionally supports performance across teams and shows persistence when working towards goals.",
        low: "Low ability to articulate performance standards and metrics that support organisational goals. Needs development in fostering a high-performance culture and in maintaining persistence when faced with challenging goals.",
    },
    Interpretation {
        competency: "Thinks Strategically",
        family: CompetencyFamily::BusinessSimulation,
        high: "Strong ability to balance the achievement of short-term results with creating long-term value and competitive advantage. Successfully translates complex organisational goals into meaningful actions across teams.",
        moderate: "Moderate ability to balance short-term results with long-term priorities. Occasionally translates organisational goals into meaningful actions across teams.",
        low: "Low ability to balance short-term performance with long-term value creation. Struggles to translate organisational goals into meaningful team actions.",
    },
    Interpretation {
        competency: "Solves Challenges",
        family: CompetencyFamily::BusinessSimulation,
        high: "Strong ability to deal with ambiguous and complex situations, by making tough decisions where necessary. Is comfortable leading in an environment where goals are frequently complex and thrives during periods of uncertainty.",
        moderate: "Moderate ability to handle some ambiguous and complex situations by making necessary decisions. Shows some confidence in leading through moderately uncertain environments.",
        low: "Low ability to deal with ambiguity and complexity. Hesitant to make tough decisions and limited confidence in leading through uncertain situations.",
    },
    Interpretation {
        competency: "Develops Talent",
        family: CompetencyFamily::BusinessSimulation,
        high: "Strong ability to leverage and nurture individual strengths to achieve positive outcomes. Actively fosters a culture of learning and advocates for career advancement opportunities within the organisation.",
        moderate: "Moderate ability to recognise and utilise individual strengths to support positive outcomes. Supports learning and contributes to career development within the organisation.",
        low: "Low ability to identify and leverage individual strengths. Rarely supports learning or advocates for career development within the organisation.",
    },
    Interpretation {
        competency: "Drive Potential",
        family: CompetencyFamily::ThrivingIndex,
        high: "Consistently demonstrates a positive mindset and motivation; regularly takes initiative to exceed expectations with a strong drive to achieve goals, targets, and results. Seeks fulfillment through impact.",
        moderate: "Shows a generally positive mindset and some motivation; occasionally takes initiative and shows a drive to achieve goals, but may need support. Interest in making an impact is present but not sustained.",
        low: "Demonstrates limited motivation or initiative; may meet expectations but does not show a consistent drive to exceed them. Fulfillment from work or desire to make an impact is not clearly evident.",
    },
    Interpretation {
        competency: "Learning Potential",
        family: CompetencyFamily::ThrivingIndex,
        high: "Consistently takes time to focus on personal and professional growth - for both self and others. Actively pursues continuous improvement and excellence; shows clear willingness to learn and unlearn.",
        moderate: "Shows some effort toward personal and professional growth. Engages in learning activities but may not do so consistently. Some openness to learning and unlearning.",
        low: "Rarely focuses on personal or professional growth. Engagement in learning is limited and may resist feedback or change.",
    },
    Interpretation {
        competency: "People Potential",
        family: CompetencyFamily::ThrivingIndex,
        high: "Consistently shows capability to lead and inspire others. Displays strong empathy, understanding, and a focus on people. Builds relationships with ease and enjoys social interactions.",
        moderate: "Displays some ability to relate to and lead others. May show empathy and focus on people inconsistently. Builds relationships but may need support.",
        low: "Shows limited capability in leading or inspiring others. Social interaction may be minimal or strained. Struggles to build and maintain relationships.",
    },
    Interpretation {
        competency: "Strategic Potential",
        family: CompetencyFamily::ThrivingIndex,
        high: "Approaches work with a strong focus on the bigger picture. Operates independently with minimal guidance. Demonstrates a commercial and strategic mindset, regularly anticipating trends and their impact.",
        moderate: "Some awareness of the bigger picture but may need occasional guidance. Understands strategy in parts but may not consistently anticipate trends or broader implications.",
        low: "Focus tends to be on immediate tasks. Requires frequent guidance. Shows limited awareness of trends or the strategic impact of work.",
    },
    Interpretation {
        competency: "Execution Potential",
        family: CompetencyFamily::ThrivingIndex,
        high: "Consistently addresses problems and challenges with confidence and resilience. Takes a diligent, practical, and solution-focused approach to solving issues.",
        moderate: "Can address problems but may need support or time to build confidence and resilience. Attempts a practical approach but not always solution-focused.",
        low: "Struggles to address problems confidently. May rely heavily on others. Practical or solution-oriented approaches are limited.",
    },
    Interpretation {
        competency: "Change Potential",
        family: CompetencyFamily::ThrivingIndex,
        high: "Thrives in change and complexity. Manages new ways of working with adaptability, flexibility, and decisiveness during uncertainty.",
        moderate: "Generally copes with change and can adapt when needed. May need support to remain flexible or decisive in uncertain situations.",
        low: "Struggles with change or uncertainty. May resist new ways of working and has difficulty adapting or deciding in changing circumstances.",
    },
];

pub fn lookup(competency: &str) -> Option<&'static Interpretation> {
    DICTIONARY.iter().find(|entry| entry.competency == competency)
}

pub fn interpretation(competency: &str, band: ScoreBand) -> Option<&'static str> {
    lookup(competency).map(|entry| entry.for_band(band))
}

/// The Thriving Index counterpart of a Business Simulation competency, or the
/// other way round.
pub fn counterpart(competency: &str) -> Option<&'static str> {
    BS_TI_MAPPING.iter().find_map(|&(bs, ti)| {
        if bs == competency {
            Some(ti)
        } else if ti == competency {
            Some(bs)
        } else {
            None
        }
    })
}

/// Renders the mapping as `#     - <BS> <-> <TI>` lines.
pub fn render_mapping() -> String {
    let mut out = String::new();
    for (bs, ti) in BS_TI_MAPPING {
        let _ = writeln!(out, "#     - {} <-> {}", bs, ti);
    }
    out
}

/// Renders the dictionary grouped by family, one `#`-commented block per competency.
pub fn render_dictionary() -> String {
    let mut out = String::new();
    let mut current_family = None;

    for entry in DICTIONARY.iter() {
        if current_family != Some(entry.family) {
            let _ = writeln!(out, "# **{}**", entry.family.heading());
            current_family = Some(entry.family);
        }
        let _ = writeln!(out, "# {}:", entry.competency);
        for band in [ScoreBand::High, ScoreBand::Moderate, ScoreBand::Low] {
            let _ = writeln!(out, "#   - {}: {}", band.label(), entry.for_band(band));
        }
    }

    out
}
