pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{
    process_bytes, process_fits, process_url, query_records, resolve_urls, run_pipeline,
    run_pipeline_reported, Archive,
};
pub use types::{FileOutcome, NoOpReporter, PipelineReporter, PipelineStage, RunSummary};
