use crate::shape::SkipReason;

/// Pipeline stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Querying,
    Filtering,
    Resolving,
    Processing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Querying => write!(f, "Querying catalog"),
            Self::Filtering => write!(f, "Filtering records"),
            Self::Resolving => write!(f, "Resolving download URLs"),
            Self::Processing => write!(f, "Processing files"),
        }
    }
}

/// What happened to one downloaded file.
#[derive(Clone, Debug, PartialEq)]
pub enum FileOutcome {
    Rendered,
    Skipped(SkipReason),
    /// Download failed (network error or non-success status).
    FetchFailed(String),
    /// Decoding or rendering failed.
    Failed(String),
}

impl FileOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered)
    }
}

/// Per-file outcomes of one run, in processing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub records_found: usize,
    pub records_kept: usize,
    pub outcomes: Vec<(String, FileOutcome)>,
}

impl RunSummary {
    pub fn rendered(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_rendered()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, FileOutcome::Skipped(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, FileOutcome::FetchFailed(_) | FileOutcome::Failed(_)))
            .count()
    }
}

/// Progress reporting for the pipeline.
///
/// Implementors can use this to drive console output, spinners, or logging.
/// All methods have default no-op implementations.
pub trait PipelineReporter {
    /// A new pipeline stage has started.
    fn begin_stage(&self, _stage: PipelineStage) {}

    /// The current stage is finished. `items` is the number of records or URLs it produced.
    fn finish_stage(&self, _stage: PipelineStage, _items: usize) {}

    /// Download of `file_name` is about to start.
    fn file_started(&self, _file_name: &str) {}

    /// The FITS container of `file_name` parsed successfully.
    fn file_opened(&self, _file_name: &str) {}

    /// Shape of the extension data about to be validated.
    fn data_shape(&self, _file_name: &str, _shape: &[usize]) {}

    /// Final outcome for `file_name`.
    fn file_finished(&self, _file_name: &str, _outcome: &FileOutcome) {}
}

/// No-op reporter, used when `run_pipeline` delegates.
pub struct NoOpReporter;
impl PipelineReporter for NoOpReporter {}
