//! # HCTA Report Generator
//!
//! A library for turning tabular leadership-assessment scores into narrative
//! potential summaries written by a generative text model.
//!
//! ## Core Concepts
//!
//! - **Score Table**: One row per candidate (Name, Gender and 32 competency scores)
//! - **Prompt Compiler**: Embeds a candidate's scores into a fixed analyst template
//!   containing the writing rules, behavioral dictionary and worked examples
//! - **Batch Runner**: Sends one prompt per row, sequentially and paced, and records
//!   either the generated text or an error description for every row
//! - **Score Bands**: High / Moderate / Low classification of a single score
//!
//! ## Example
//!
//! ```rust,ignore
//! use hcta_report_generator::*;
//!
//! let table = ScoreTable::from_path("candidates.xlsx")?;
//! let client = GeminiClient::from_env()?;
//!
//! let report = BatchRunner::new(client).run(table).await?;
//! report.table.write_path("candidate_summaries_results.xlsx")?;
//! ```

pub mod banding;
pub mod batch;
pub mod dictionary;
pub mod error;
pub mod generation;
pub mod prompt;
pub mod schema;
pub mod table;

#[cfg(feature = "gemini")]
pub mod llm;

pub use banding::{is_development_only, is_strength_only, ScoreBand, ScoreProfile};
pub use batch::{BatchConfig, BatchEvent, BatchReport, BatchRunner, GenerationResult};
pub use error::{ReportError, Result};
pub use generation::TextGenerator;
pub use prompt::{compile_prompt, CompiledPrompt, PromptTemplate};
pub use schema::{CandidateRecord, Gender, Pronouns, SCORE_COLUMNS};
pub use table::{ScoreTable, RESULT_COLUMN};

#[cfg(feature = "gemini")]
pub use llm::{GeminiClient, GeminiConfig};
