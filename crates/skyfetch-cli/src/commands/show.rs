use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use skyfetch_core::fits::FitsFile;
use skyfetch_core::pipeline::config::RenderConfig;
use skyfetch_core::pipeline::{process_fits, PipelineReporter};

use super::common::{make_renderer, RenderArgs};
use crate::reporter::ConsoleReporter;

#[derive(Args)]
pub struct ShowArgs {
    /// Local FITS file
    pub file: PathBuf,

    #[command(flatten)]
    pub render: RenderArgs,
}

/// Run shape validation and rendering on a file already on disk.
pub fn run(args: &ShowArgs) -> Result<()> {
    let mut render = RenderConfig::default();
    args.render.apply(&mut render);

    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());
    let reporter = ConsoleReporter::new();
    reporter.file_started(&file_name);

    let fits = FitsFile::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let mut renderer = make_renderer(&render);
    let outcome = process_fits(&fits, &file_name, renderer.as_mut(), &reporter)?;
    reporter.file_finished(&file_name, &outcome);
    Ok(())
}
