use anyhow::Result;
use clap::Args;
use skyfetch_core::pipeline::{resolve_urls, Archive, NoOpReporter};

use super::common::ArchiveArgs;

#[derive(Args)]
pub struct UrlsArgs {
    #[command(flatten)]
    pub archive: ArchiveArgs,
}

/// One URL per line on stdout, so the output can be piped.
pub fn run(args: &UrlsArgs) -> Result<()> {
    let config = args.archive.to_config()?;
    let archive = Archive::cadc(&config)?;
    let (_, _, urls) = resolve_urls(&config, &archive, &NoOpReporter)?;
    for url in urls {
        println!("{url}");
    }
    Ok(())
}
