use std::io::Read;

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::catalog::record::CatalogRecord;
use crate::error::{Result, SkyfetchError};
use crate::fetch::build_client;
use crate::pipeline::config::FetchConfig;

/// Name-based search against a remote observation catalog.
pub trait CatalogService {
    fn query_name(&self, name: &str) -> Result<Vec<CatalogRecord>>;
}

/// CADC TAP service queried synchronously with ADQL, answering in CSV.
pub struct TapCatalog {
    client: Client,
    tap_url: String,
}

impl TapCatalog {
    pub fn new(tap_url: impl Into<String>, fetch: &FetchConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(fetch)?,
            tap_url: tap_url.into(),
        })
    }
}

impl CatalogService for TapCatalog {
    fn query_name(&self, name: &str) -> Result<Vec<CatalogRecord>> {
        let adql = build_name_query(name);
        debug!(url = %self.tap_url, query = %adql, "Submitting TAP query");

        let response = self
            .client
            .post(&self.tap_url)
            .form(&[
                ("LANG", "ADQL"),
                ("REQUEST", "doQuery"),
                ("FORMAT", "csv"),
                ("QUERY", adql.as_str()),
            ])
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SkyfetchError::Catalog(e.to_string()))?;

        let body = response
            .bytes()
            .map_err(|e| SkyfetchError::Catalog(e.to_string()))?;
        let records = parse_csv_records(body.as_ref())?;
        info!(target_name = name, records = records.len(), "Catalog query complete");
        Ok(records)
    }
}

/// ADQL selecting every plane whose observation target contains `name`,
/// compared case-insensitively.
pub fn build_name_query(name: &str) -> String {
    let needle = name.to_lowercase().replace('\'', "''");
    format!(
        "SELECT o.collection, o.observationID, o.target_name, p.productID, \
         p.publisherID, p.dataRelease, p.calibrationLevel, p.dataProductType \
         FROM caom2.Observation AS o JOIN caom2.Plane AS p ON o.obsID = p.obsID \
         WHERE LOWER(o.target_name) LIKE '%{needle}%'"
    )
}

/// Parse a CSV TAP response (header row first) into records.
pub fn parse_csv_records<R: Read>(reader: R) -> Result<Vec<CatalogRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records = rdr
        .deserialize()
        .collect::<std::result::Result<Vec<CatalogRecord>, csv::Error>>()?;
    Ok(records)
}
