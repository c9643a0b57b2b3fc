use std::io::Cursor;

use tracing::{debug, info, warn};

use crate::catalog::{
    CatalogRecord, CatalogService, DatalinkResolver, RecordFilter, TapCatalog, UrlResolver,
};
use crate::consts::IMAGE_HDU_INDEX;
use crate::error::Result;
use crate::fetch::{file_name_from_url, Fetcher, HttpFetcher};
use crate::fits::{FitsFile, HduData};
use crate::render::Renderer;
use crate::shape::{classify, extract_display_plane, Classification, SkipReason};

use super::config::PipelineConfig;
use super::types::{FileOutcome, NoOpReporter, PipelineReporter, PipelineStage, RunSummary};

/// The remote services a run talks to.
pub struct Archive {
    pub catalog: Box<dyn CatalogService>,
    pub resolver: Box<dyn UrlResolver>,
    pub fetcher: Box<dyn Fetcher>,
}

impl Archive {
    /// Clients for the CADC TAP, DataLink, and file services.
    pub fn cadc(config: &PipelineConfig) -> Result<Self> {
        let q = &config.query;
        Ok(Self {
            catalog: Box::new(TapCatalog::new(q.tap_url.clone(), &config.fetch)?),
            resolver: Box::new(DatalinkResolver::new(
                q.datalink_url.clone(),
                q.include_auxiliaries,
                &config.fetch,
            )?),
            fetcher: Box::new(HttpFetcher::new(&config.fetch)?),
        })
    }
}

/// Query the catalog by target name and apply the collection and release filters.
///
/// Returns the number of records before filtering alongside the survivors.
pub fn query_records(
    config: &PipelineConfig,
    catalog: &dyn CatalogService,
    reporter: &dyn PipelineReporter,
) -> Result<(usize, Vec<CatalogRecord>)> {
    reporter.begin_stage(PipelineStage::Querying);
    let records = catalog.query_name(&config.query.target)?;
    let found = records.len();
    reporter.finish_stage(PipelineStage::Querying, found);

    reporter.begin_stage(PipelineStage::Filtering);
    let kept = RecordFilter::from_config(&config.query).apply(records);
    reporter.finish_stage(PipelineStage::Filtering, kept.len());
    info!(found, kept = kept.len(), "Catalog records selected");
    Ok((found, kept))
}

/// Query, filter, and resolve download URLs, honouring `limit`.
pub fn resolve_urls(
    config: &PipelineConfig,
    archive: &Archive,
    reporter: &dyn PipelineReporter,
) -> Result<(usize, usize, Vec<String>)> {
    let (found, records) = query_records(config, archive.catalog.as_ref(), reporter)?;

    reporter.begin_stage(PipelineStage::Resolving);
    let mut urls = archive.resolver.resolve(&records)?;
    if let Some(limit) = config.limit {
        urls.truncate(limit);
    }
    reporter.finish_stage(PipelineStage::Resolving, urls.len());
    Ok((found, records.len(), urls))
}

/// Run the full pipeline without progress reporting.
pub fn run_pipeline(
    config: &PipelineConfig,
    archive: &Archive,
    renderer: &mut dyn Renderer,
) -> Result<RunSummary> {
    run_pipeline_reported(config, archive, renderer, &NoOpReporter)
}

/// Run the full pipeline: query, filter, resolve, then fetch, decode, and render each file.
///
/// Failures before the per-file loop abort the run. Inside the loop every
/// file ends as rendered, skipped, or failed and the loop moves on, unless
/// `strict` is set and a decode or render error occurs.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    archive: &Archive,
    renderer: &mut dyn Renderer,
    reporter: &dyn PipelineReporter,
) -> Result<RunSummary> {
    let (records_found, records_kept, urls) = resolve_urls(config, archive, reporter)?;

    let mut summary = RunSummary {
        records_found,
        records_kept,
        outcomes: Vec::with_capacity(urls.len()),
    };

    reporter.begin_stage(PipelineStage::Processing);
    for url in &urls {
        let file_name = file_name_from_url(url);
        reporter.file_started(&file_name);

        let outcome = match process_url(url, &file_name, archive.fetcher.as_ref(), renderer, reporter)
        {
            Ok(outcome) => outcome,
            Err(e) if e.is_fetch() => {
                warn!(file = %file_name, error = %e, "Download failed");
                FileOutcome::FetchFailed(e.to_string())
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "Processing failed");
                if config.strict {
                    return Err(e);
                }
                FileOutcome::Failed(e.to_string())
            }
        };

        reporter.file_finished(&file_name, &outcome);
        summary.outcomes.push((file_name, outcome));
    }
    reporter.finish_stage(PipelineStage::Processing, summary.outcomes.len());

    info!(
        rendered = summary.rendered(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        "Run complete"
    );
    Ok(summary)
}

/// Download one URL and process its body. The body is dropped on return.
pub fn process_url(
    url: &str,
    file_name: &str,
    fetcher: &dyn Fetcher,
    renderer: &mut dyn Renderer,
    reporter: &dyn PipelineReporter,
) -> Result<FileOutcome> {
    let body = fetcher.get(url)?;
    process_bytes(body, file_name, renderer, reporter)
}

/// Decode an in-memory FITS body, validate extension 1, and render it.
pub fn process_bytes(
    body: Vec<u8>,
    file_name: &str,
    renderer: &mut dyn Renderer,
    reporter: &dyn PipelineReporter,
) -> Result<FileOutcome> {
    let fits = FitsFile::from_reader(Cursor::new(body))?;
    process_fits(&fits, file_name, renderer, reporter)
}

/// Validate extension 1 of a parsed container and render it when displayable.
pub fn process_fits(
    fits: &FitsFile,
    file_name: &str,
    renderer: &mut dyn Renderer,
    reporter: &dyn PipelineReporter,
) -> Result<FileOutcome> {
    for warning in &fits.warnings {
        debug!(file = %file_name, %warning, "FITS decode warning");
    }
    reporter.file_opened(file_name);

    let Some(data) = fits.hdu_data(IMAGE_HDU_INDEX)? else {
        return Ok(FileOutcome::Skipped(SkipReason::NoImageData));
    };

    let classification = classify(&data);
    if let Classification::Skip(SkipReason::TooManyDims(n)) = classification {
        return Ok(FileOutcome::Skipped(SkipReason::TooManyDims(n)));
    }
    reporter.data_shape(file_name, &data.shape());

    match (classification, data) {
        (Classification::Skip(reason), _) => Ok(FileOutcome::Skipped(reason)),
        (Classification::Render, HduData::Image(array)) => {
            let image = extract_display_plane(&array, file_name)?;
            renderer.render(&image)?;
            Ok(FileOutcome::Rendered)
        }
        (Classification::Render, HduData::Table { .. }) => {
            Ok(FileOutcome::Skipped(SkipReason::OneDimensional))
        }
    }
}
