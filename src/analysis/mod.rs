//! Analysis pipeline
//!
//! Fallback orchestration across model identities, extraction of the JSON
//! payload from model text, and assembly of the response envelope.

pub mod assembler;
pub mod extractor;
pub mod orchestrator;
pub mod report;

pub use assembler::{AnalysisEnvelope, PROMPT_VERSION, assemble, build_prompt};
pub use extractor::{ParseError, extract};
pub use orchestrator::{AnalysisJob, Completion, FallbackOrchestrator};
pub use report::StructuredReport;
