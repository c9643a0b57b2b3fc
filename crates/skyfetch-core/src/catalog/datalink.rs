use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::catalog::record::CatalogRecord;
use crate::consts::{DATALINK_BATCH_SIZE, SEMANTICS_PKG, SEMANTICS_THIS};
use crate::error::{Result, SkyfetchError};
use crate::fetch::build_client;
use crate::pipeline::config::FetchConfig;

/// Translates catalog records into direct download URLs.
pub trait UrlResolver {
    fn resolve(&self, records: &[CatalogRecord]) -> Result<Vec<String>>;
}

/// One row of a DataLink VOTable response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatalinkRow {
    pub id: String,
    pub access_url: String,
    pub service_def: String,
    pub error_message: String,
    pub semantics: String,
}

/// Resolves publisher IDs through the CADC DataLink service in batches.
pub struct DatalinkResolver {
    client: Client,
    datalink_url: String,
    include_auxiliaries: bool,
}

impl DatalinkResolver {
    pub fn new(
        datalink_url: impl Into<String>,
        include_auxiliaries: bool,
        fetch: &FetchConfig,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(fetch)?,
            datalink_url: datalink_url.into(),
            include_auxiliaries,
        })
    }

    fn fetch_batch(&self, batch: &[CatalogRecord]) -> Result<Vec<DatalinkRow>> {
        let ids: Vec<(&str, &str)> = batch
            .iter()
            .map(|r| ("ID", r.publisher_id.as_str()))
            .collect();
        debug!(url = %self.datalink_url, ids = ids.len(), "Requesting DataLink batch");

        let body = self
            .client
            .get(&self.datalink_url)
            .query(&ids)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| SkyfetchError::Catalog(e.to_string()))?;
        parse_datalink_votable(&body)
    }
}

impl UrlResolver for DatalinkResolver {
    fn resolve(&self, records: &[CatalogRecord]) -> Result<Vec<String>> {
        let mut urls = Vec::new();
        for batch in records.chunks(DATALINK_BATCH_SIZE) {
            let rows = self.fetch_batch(batch)?;
            urls.extend(select_links(&rows, self.include_auxiliaries));
        }
        info!(records = records.len(), urls = urls.len(), "Resolved download URLs");
        Ok(urls)
    }
}

/// Pick downloadable URLs out of DataLink rows, keeping service order.
///
/// Package links are always dropped. Auxiliary links (previews, thumbnails)
/// are kept only when `include_auxiliaries` is set.
pub fn select_links(rows: &[DatalinkRow], include_auxiliaries: bool) -> Vec<String> {
    let mut urls = Vec::new();
    for row in rows {
        if !row.error_message.is_empty() {
            warn!(id = %row.id, error = %row.error_message, "DataLink reported an error");
            continue;
        }
        if row.semantics == SEMANTICS_PKG {
            continue;
        }
        if row.semantics != SEMANTICS_THIS && !include_auxiliaries {
            continue;
        }
        if row.access_url.is_empty() {
            // Service descriptors (cutouts) need parameters and cannot be fetched directly.
            continue;
        }
        urls.push(row.access_url.clone());
    }
    urls
}

/// Parse a DataLink VOTable document into rows.
pub fn parse_datalink_votable(xml: &str) -> Result<Vec<DatalinkRow>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut rows = Vec::new();
    let mut cells: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_td = false;
    let mut query_error: Option<String> = None;
    let mut in_error_info = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"FIELD" => fields.push(attribute(&e, b"name")?.unwrap_or_default()),
                b"TR" => cells.clear(),
                b"TD" => {
                    in_td = true;
                    cell.clear();
                }
                b"INFO" => {
                    if is_error_status(&e)? {
                        in_error_info = true;
                        query_error = Some(String::new());
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"FIELD" => fields.push(attribute(&e, b"name")?.unwrap_or_default()),
                b"TD" => cells.push(String::new()),
                b"INFO" => {
                    if is_error_status(&e)? {
                        query_error = Some(String::new());
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if in_td {
                    cell.push_str(&t.unescape()?);
                } else if in_error_info {
                    if let Some(msg) = query_error.as_mut() {
                        msg.push_str(&t.unescape()?);
                    }
                }
            }
            Event::CData(t) => {
                if in_td {
                    cell.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"TD" => {
                    in_td = false;
                    cells.push(std::mem::take(&mut cell));
                }
                b"TR" => rows.push(row_from_cells(&fields, &cells)),
                b"INFO" => in_error_info = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(msg) = query_error {
        return Err(SkyfetchError::Catalog(format!("DataLink query failed: {msg}")));
    }
    Ok(rows)
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn is_error_status(e: &BytesStart<'_>) -> Result<bool> {
    let name = attribute(e, b"name")?;
    let value = attribute(e, b"value")?;
    Ok(name.as_deref() == Some("QUERY_STATUS") && value.as_deref() == Some("ERROR"))
}

fn row_from_cells(fields: &[String], cells: &[String]) -> DatalinkRow {
    let mut row = DatalinkRow::default();
    for (name, value) in fields.iter().zip(cells) {
        let slot = match name.as_str() {
            "ID" => &mut row.id,
            "access_url" => &mut row.access_url,
            "service_def" => &mut row.service_def,
            "error_message" => &mut row.error_message,
            "semantics" => &mut row.semantics,
            _ => continue,
        };
        *slot = value.trim().to_string();
    }
    row
}
