mod orchestrator;
mod retry;

pub use orchestrator::{GenerationRun, Orchestrator, Stage};
