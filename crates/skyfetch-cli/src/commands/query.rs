use anyhow::Result;
use clap::Args;
use console::Style;
use skyfetch_core::catalog::TapCatalog;
use skyfetch_core::pipeline::query_records;

use super::common::ArchiveArgs;
use crate::reporter::ConsoleReporter;

#[derive(Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub archive: ArchiveArgs,
}

pub fn run(args: &QueryArgs) -> Result<()> {
    let config = args.archive.to_config()?;
    let catalog = TapCatalog::new(config.query.tap_url.clone(), &config.fetch)?;
    let (found, records) = query_records(&config, &catalog, &ConsoleReporter::new())?;

    let header = Style::new().cyan().bold();
    println!();
    println!(
        "{}",
        header.apply_to(format!(
            "{:<10} {:<24} {:<36} {}",
            "Collection", "Released", "Observation", "Product"
        ))
    );
    for record in &records {
        println!(
            "{:<10} {:<24} {:<36} {}",
            record.collection, record.data_release, record.observation_id, record.product_id
        );
    }
    println!();
    println!("{} of {} records kept", records.len(), found);
    Ok(())
}
