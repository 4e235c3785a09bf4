//! Pipeline logic: classification, extraction, note building, orchestration.

pub mod classifier;
pub mod extractor;
pub mod note;
pub mod orchestrator;

pub use classifier::{Classification, Intent, IntentClassifier};
pub use extractor::{build_prompt, CalendarEventExtractor};
pub use note::build_note;
pub use orchestrator::{PipelineOrchestrator, PipelineState};
