use anyhow::{Context, Result};
use clap::Args;
use skyfetch_core::pipeline::{run_pipeline_reported, Archive};

use super::common::{make_renderer, ArchiveArgs, RenderArgs};
use crate::reporter::ConsoleReporter;
use crate::summary::{print_run_header, print_run_summary};

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub archive: ArchiveArgs,

    #[command(flatten)]
    pub render: RenderArgs,

    /// Abort on the first decode or render error
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = args.archive.to_config()?;
    args.render.apply(&mut config.render);
    if args.strict {
        config.strict = true;
    }
    config.validate().context("Invalid pipeline config")?;

    print_run_header(&config);

    let archive = Archive::cadc(&config)?;
    let mut renderer = make_renderer(&config.render);
    let reporter = ConsoleReporter::new();

    let summary = run_pipeline_reported(&config, &archive, renderer.as_mut(), &reporter)?;
    print_run_summary(&summary);
    Ok(())
}
