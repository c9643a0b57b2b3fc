#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use skyfetch_core::catalog::{CatalogRecord, CatalogService, UrlResolver};
use skyfetch_core::error::{FetchError, Result};
use skyfetch_core::fetch::Fetcher;
use skyfetch_core::pipeline::config::PipelineConfig;
use skyfetch_core::pipeline::Archive;
use skyfetch_core::render::{DisplayImage, Renderer};

pub const BLOCK: usize = 2880;

/// Pad a card image to 80 bytes.
pub fn card(text: &str) -> Vec<u8> {
    assert!(text.len() <= 80, "card too long: {text}");
    let mut buf = text.as_bytes().to_vec();
    buf.resize(80, b' ');
    buf
}

/// `KEYWORD = value` in fixed format, value right-justified to column 30.
pub fn kv(keyword: &str, value: &str) -> String {
    format!("{:<8}= {:>20}", keyword, value)
}

/// `KEYWORD = 'text'` string card.
pub fn kv_str(keyword: &str, value: &str) -> String {
    format!("{:<8}= '{:<8}'", keyword, value)
}

/// Header cards followed by END, padded with spaces to whole blocks.
pub fn header_bytes(cards: &[String]) -> Vec<u8> {
    let mut buf = Vec::new();
    for c in cards {
        buf.extend(card(c));
    }
    buf.extend(card("END"));
    pad_to_block(&mut buf, b' ');
    buf
}

pub fn pad_to_block(buf: &mut Vec<u8>, fill: u8) {
    let rem = buf.len() % BLOCK;
    if rem != 0 {
        buf.resize(buf.len() + BLOCK - rem, fill);
    }
}

/// Primary HDU without data.
pub fn primary_header() -> Vec<u8> {
    header_bytes(&[
        kv("SIMPLE", "T"),
        kv("BITPIX", "8"),
        kv("NAXIS", "0"),
        kv("EXTEND", "T"),
    ])
}

/// Axis cards for a shape given slowest axis first.
fn axis_cards(shape: &[usize]) -> Vec<String> {
    let mut cards = vec![kv("NAXIS", &shape.len().to_string())];
    for (i, n) in shape.iter().rev().enumerate() {
        cards.push(kv(&format!("NAXIS{}", i + 1), &n.to_string()));
    }
    cards
}

/// IMAGE extension header with the given BITPIX and shape plus extra cards.
pub fn image_header(bitpix: i64, shape: &[usize], extra: &[String]) -> Vec<u8> {
    let mut cards = vec![kv_str("XTENSION", "IMAGE"), kv("BITPIX", &bitpix.to_string())];
    cards.extend(axis_cards(shape));
    cards.push(kv("PCOUNT", "0"));
    cards.push(kv("GCOUNT", "1"));
    cards.push(kv_str("EXTNAME", "SCI"));
    cards.extend(extra.iter().cloned());
    header_bytes(&cards)
}

/// IMAGE extension with big-endian f32 data, padded.
pub fn image_extension_f32(shape: &[usize], data: &[f32]) -> Vec<u8> {
    assert_eq!(shape.iter().product::<usize>(), data.len());
    let mut buf = image_header(-32, shape, &[]);
    for v in data {
        buf.extend_from_slice(&v.to_be_bytes());
    }
    pad_to_block(&mut buf, 0);
    buf
}

/// IMAGE extension with big-endian i16 data and extra header cards, padded.
pub fn image_extension_i16(shape: &[usize], data: &[i16], extra: &[String]) -> Vec<u8> {
    assert_eq!(shape.iter().product::<usize>(), data.len());
    let mut buf = image_header(16, shape, extra);
    for v in data {
        buf.extend_from_slice(&v.to_be_bytes());
    }
    pad_to_block(&mut buf, 0);
    buf
}

/// BINTABLE extension with `rows` rows of `row_bytes` zero bytes.
pub fn table_extension(rows: usize, row_bytes: usize) -> Vec<u8> {
    let mut buf = header_bytes(&[
        kv_str("XTENSION", "BINTABLE"),
        kv("BITPIX", "8"),
        kv("NAXIS", "2"),
        kv("NAXIS1", &row_bytes.to_string()),
        kv("NAXIS2", &rows.to_string()),
        kv("PCOUNT", "0"),
        kv("GCOUNT", "1"),
        kv("TFIELDS", "1"),
        kv_str("TFORM1", &format!("{row_bytes}B")),
    ]);
    buf.resize(buf.len() + rows * row_bytes, 0);
    pad_to_block(&mut buf, 0);
    buf
}

/// Float image header whose element count does not fit in memory addressing.
pub fn oversized_image_header() -> Vec<u8> {
    image_header(-32, &[4_294_967_296, 4_294_967_296], &[])
}

/// Complete file: empty primary plus one f32 image extension.
pub fn fits_with_image(shape: &[usize], data: &[f32]) -> Vec<u8> {
    let mut buf = primary_header();
    buf.extend(image_extension_f32(shape, data));
    buf
}

/// Values 1..=n as f32, so every pixel is finite and non-zero.
pub fn ramp(n: usize) -> Vec<f32> {
    (1..=n).map(|v| v as f32).collect()
}

pub fn record(collection: &str, data_release: &str, product_id: &str) -> CatalogRecord {
    CatalogRecord {
        collection: collection.to_string(),
        observation_id: format!("obs-{product_id}"),
        target_name: "NGC-1068-BK".to_string(),
        product_id: product_id.to_string(),
        publisher_id: format!("ivo://cadc.nrc.ca/{collection}?obs-{product_id}/{product_id}"),
        data_release: data_release.to_string(),
        calibration_level: Some(3),
        data_product_type: Some("image".to_string()),
    }
}

pub fn url_for(product_id: &str) -> String {
    format!("https://archive.test/files/cadc:JWST/{product_id}.fits")
}

pub struct FakeCatalog {
    pub records: Vec<CatalogRecord>,
}

impl CatalogService for FakeCatalog {
    fn query_name(&self, _name: &str) -> Result<Vec<CatalogRecord>> {
        Ok(self.records.clone())
    }
}

/// One URL per record, derived from its product ID.
pub struct FakeResolver;

impl UrlResolver for FakeResolver {
    fn resolve(&self, records: &[CatalogRecord]) -> Result<Vec<String>> {
        Ok(records.iter().map(|r| url_for(&r.product_id)).collect())
    }
}

/// Serves files from memory; unknown URLs answer 404.
pub struct FakeFetcher {
    pub files: HashMap<String, Vec<u8>>,
    pub requested: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn new(files: HashMap<String, Vec<u8>>) -> Self {
        Self {
            files,
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl Fetcher for FakeFetcher {
    fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        self.requested.borrow_mut().push(url.to_string());
        self.files.get(url).cloned().ok_or_else(|| FetchError::Status {
            status: 404,
            url: url.to_string(),
        })
    }
}

/// Keeps every image it is asked to render.
#[derive(Default)]
pub struct RecordingRenderer {
    pub rendered: Vec<DisplayImage>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, image: &DisplayImage) -> Result<()> {
        self.rendered.push(image.clone());
        Ok(())
    }
}

/// Archive whose catalog holds one JWST record per `(product_id, file)` entry.
/// A `None` file makes the fetch of that product fail with 404.
pub fn fake_archive(files: Vec<(&str, Option<Vec<u8>>)>) -> Archive {
    let mut records = Vec::new();
    let mut served = HashMap::new();
    for (product_id, body) in files {
        records.push(record("JWST", "2023-01-01T00:00:00.000", product_id));
        if let Some(body) = body {
            served.insert(url_for(product_id), body);
        }
    }
    Archive {
        catalog: Box::new(FakeCatalog { records }),
        resolver: Box::new(FakeResolver),
        fetcher: Box::new(FakeFetcher::new(served)),
    }
}

pub fn test_config() -> PipelineConfig {
    PipelineConfig::default()
}
