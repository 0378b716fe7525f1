pub mod orchestrator;
pub mod summary;
