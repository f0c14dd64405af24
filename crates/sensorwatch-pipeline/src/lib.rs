pub mod config;
pub mod pipeline;
pub mod replay;

pub use pipeline::{AlertPipeline, PipelineOutcome};
