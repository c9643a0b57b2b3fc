use std::cell::RefCell;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use skyfetch_core::pipeline::{FileOutcome, PipelineReporter, PipelineStage};
use skyfetch_core::shape::SkipReason;

/// Prints per-file progress lines and shows a spinner while talking to the catalog.
pub struct ConsoleReporter {
    spinner: RefCell<Option<ProgressBar>>,
    error: Style,
    skip: Style,
    ok: Style,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            spinner: RefCell::new(None),
            error: Style::new().red().bold(),
            skip: Style::new().yellow(),
            ok: Style::new().green(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineReporter for ConsoleReporter {
    fn begin_stage(&self, stage: PipelineStage) {
        if stage == PipelineStage::Processing {
            return;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(stage.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.borrow_mut() = Some(pb);
    }

    fn finish_stage(&self, stage: PipelineStage, items: usize) {
        let noun = match stage {
            PipelineStage::Querying => "records found",
            PipelineStage::Filtering => "records kept",
            PipelineStage::Resolving => "download URLs",
            PipelineStage::Processing => return,
        };
        if let Some(pb) = self.spinner.borrow_mut().take() {
            pb.finish_with_message(format!("{stage}: {items} {noun}"));
        }
    }

    fn file_started(&self, file_name: &str) {
        println!("\nProcessing: {file_name}");
    }

    fn file_opened(&self, _file_name: &str) {
        println!("FITS File Opened Successfully.");
    }

    fn data_shape(&self, _file_name: &str, shape: &[usize]) {
        println!("Stored Data Shape: {}", format_shape(shape));
    }

    fn file_finished(&self, file_name: &str, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Rendered => {
                println!("{}", self.ok.apply_to(format!("Rendered {file_name}")));
            }
            FileOutcome::Skipped(SkipReason::NoImageData) => {
                println!("{}", self.skip.apply_to(SkipReason::NoImageData));
            }
            FileOutcome::Skipped(reason) => {
                println!("{}", self.skip.apply_to(format!("Skipping {file_name}: {reason}")));
            }
            FileOutcome::FetchFailed(msg) => println!(
                "{}",
                self.error
                    .apply_to(format!("ERROR: Failed to download {file_name}: {msg}"))
            ),
            FileOutcome::Failed(msg) => println!(
                "{}",
                self.error
                    .apply_to(format!("ERROR: Issue processing {file_name}: {msg}"))
            ),
        }
    }
}

/// Tuple-style shape, e.g. `(4, 100, 100)` or `(5,)`.
pub fn format_shape(shape: &[usize]) -> String {
    match shape {
        [n] => format!("({n},)"),
        dims => {
            let parts: Vec<String> = dims.iter().map(ToString::to_string).collect();
            format!("({})", parts.join(", "))
        }
    }
}
