use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use skyfetch_core::consts::IMAGE_HDU_INDEX;
use skyfetch_core::fits::FitsFile;
use skyfetch_core::shape::{classify, Classification};

use crate::reporter::format_shape;

#[derive(Args)]
pub struct InspectArgs {
    /// Local FITS file
    pub file: PathBuf,

    /// Print every header card
    #[arg(long)]
    pub cards: bool,
}

pub fn run(args: &InspectArgs) -> Result<()> {
    let fits = FitsFile::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;

    println!("File:        {}", args.file.display());
    println!("Size:        {:.1} MB", fits.bytes().len() as f64 / (1024.0 * 1024.0));
    println!("HDUs:        {}", fits.len());
    println!();
    println!(
        "{:<5} {:<10} {:<12} {:>7} {:<20} {:>6}",
        "No.", "Type", "Name", "BITPIX", "Shape", "Cards"
    );
    for hdu in &fits.hdus {
        println!(
            "{:<5} {:<10} {:<12} {:>7} {:<20} {:>6}",
            hdu.index,
            hdu.kind.to_string(),
            hdu.extname().unwrap_or(""),
            hdu.bitpix,
            format_shape(&hdu.shape()),
            hdu.cards().len()
        );
        if args.cards {
            for card in hdu.cards() {
                println!("      {:<8} {:?}", card.keyword_str(), card.value);
            }
        }
    }

    if !fits.warnings.is_empty() {
        println!();
        for warning in &fits.warnings {
            println!("Warning:     {warning}");
        }
    }

    println!();
    match fits.hdu_data(IMAGE_HDU_INDEX) {
        Ok(Some(data)) => match classify(&data) {
            Classification::Render => println!("Extension 1: displayable"),
            Classification::Skip(reason) => println!("Extension 1: {reason}"),
        },
        Ok(None) => println!("Extension 1: no image data"),
        Err(e) => println!("Extension 1: unreadable ({e})"),
    }
    Ok(())
}
