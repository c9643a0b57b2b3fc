use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use skyfetch_core::fits::FitsFile;
use skyfetch_core::pipeline::{process_fits, FileOutcome, NoOpReporter};
use skyfetch_core::render::Stretch;
use skyfetch_gui::WindowRenderer;

#[derive(Parser)]
#[command(name = "skyfetch-view", about = "Show extension 1 of a local FITS file")]
#[command(version)]
struct Args {
    /// FITS file to open. A file dialog is shown when omitted.
    file: Option<PathBuf>,

    /// Stretch between the 0.5% and 99.5% percentiles instead of min/max
    #[arg(long)]
    percentile: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let path = match args.file {
        Some(path) => path,
        None => match rfd::FileDialog::new()
            .add_filter("FITS", &["fits", "fit", "fts"])
            .pick_file()
        {
            Some(path) => path,
            None => return Ok(()),
        },
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let fits = FitsFile::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;

    let stretch = if args.percentile {
        Stretch::percentile_default()
    } else {
        Stretch::MinMax
    };
    let mut renderer = WindowRenderer::new(stretch);
    let outcome = process_fits(&fits, &file_name, &mut renderer, &NoOpReporter)?;
    if let FileOutcome::Skipped(reason) = outcome {
        println!("Skipping {file_name}: {reason}");
    }
    Ok(())
}
