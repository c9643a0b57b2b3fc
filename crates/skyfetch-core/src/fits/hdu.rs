use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use fitsio_pure::hdu::{parse_fits, HduInfo};
use fitsio_pure::header::Card;
use fitsio_pure::value::Value;
use memmap2::Mmap;
use tracing::debug;

use crate::error::{FitsError, Result};
use crate::fits::data::{decode_image, element_count, HduData};
use crate::fits::repair;

/// Structural kind of an HDU.
#[derive(Clone, Debug, PartialEq)]
pub enum HduKind {
    Primary,
    Image,
    /// Tile-compressed image stored in a binary table.
    CompressedImage,
    BinTable,
    AsciiTable,
    Other(String),
}

impl HduKind {
    pub fn is_table(&self) -> bool {
        matches!(self, HduKind::BinTable | HduKind::AsciiTable)
    }

    pub fn is_image(&self) -> bool {
        matches!(
            self,
            HduKind::Primary | HduKind::Image | HduKind::CompressedImage
        )
    }
}

impl fmt::Display for HduKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HduKind::Primary => write!(f, "PRIMARY"),
            HduKind::Image => write!(f, "IMAGE"),
            HduKind::CompressedImage => write!(f, "COMPRESSED"),
            HduKind::BinTable => write!(f, "BINTABLE"),
            HduKind::AsciiTable => write!(f, "TABLE"),
            HduKind::Other(name) => write!(f, "{name}"),
        }
    }
}

/// One Header/Data Unit as laid out in the stream.
pub struct Hdu {
    pub index: usize,
    pub kind: HduKind,
    pub bitpix: i64,
    /// Axis lengths in FITS order (NAXIS1 first). Compressed images report
    /// the uncompressed ZNAXISn lengths.
    pub naxes: Vec<usize>,
    /// Byte offset of the data section.
    pub data_start: usize,
    /// Declared data size in bytes, without block padding.
    pub data_len: usize,
    pub(crate) raw: fitsio_pure::hdu::Hdu,
}

impl Hdu {
    fn from_parsed(index: usize, raw: fitsio_pure::hdu::Hdu) -> std::result::Result<Self, FitsError> {
        let cards = raw.cards.as_slice();
        let (kind, bitpix, naxes) = match &raw.info {
            HduInfo::Primary { bitpix, naxes, .. } => (HduKind::Primary, *bitpix, naxes.clone()),
            HduInfo::Image { bitpix, naxes, .. } => (HduKind::Image, *bitpix, naxes.clone()),
            HduInfo::CompressedImage {
                zbitpix, znaxes, ..
            } => (HduKind::CompressedImage, *zbitpix, znaxes.clone()),
            HduInfo::AsciiTable { .. } => (HduKind::AsciiTable, 8, table_axes(cards)),
            _ => match card_str(cards, "XTENSION") {
                Some("BINTABLE") => (HduKind::BinTable, 8, table_axes(cards)),
                other => (
                    HduKind::Other(other.unwrap_or_default().to_string()),
                    card_int(cards, "BITPIX").unwrap_or(8),
                    Vec::new(),
                ),
            },
        };

        if kind.is_image() && !matches!(bitpix, 8 | 16 | 32 | 64 | -32 | -64) {
            return Err(FitsError::InvalidBitpix(bitpix));
        }
        element_count(&naxes)?;
        raw.data_start
            .checked_add(raw.data_len)
            .ok_or_else(|| FitsError::InvalidHeader("data size overflows".into()))?;

        Ok(Self {
            index,
            kind,
            bitpix,
            naxes,
            data_start: raw.data_start,
            data_len: raw.data_len,
            raw,
        })
    }

    pub fn cards(&self) -> &[Card] {
        &self.raw.cards
    }

    /// Value of the first card named `keyword`.
    pub fn keyword(&self, keyword: &str) -> Option<&Value> {
        card_value(self.cards(), keyword)
    }

    pub fn keyword_int(&self, keyword: &str) -> Option<i64> {
        card_int(self.cards(), keyword)
    }

    pub fn keyword_float(&self, keyword: &str) -> Option<f64> {
        match self.keyword(keyword)? {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn keyword_str(&self, keyword: &str) -> Option<&str> {
        card_str(self.cards(), keyword)
    }

    pub fn extname(&self) -> Option<&str> {
        self.keyword_str("EXTNAME")
    }

    /// Array shape in row-major order, slowest axis first.
    ///
    /// Tables are one-dimensional: one element per row.
    pub fn shape(&self) -> Vec<usize> {
        if self.kind.is_table() {
            return vec![self.naxes.get(1).copied().unwrap_or(0)];
        }
        self.naxes.iter().rev().copied().collect()
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Tables always carry data, even with zero rows.
    pub fn has_data(&self) -> bool {
        if self.kind.is_table() {
            return true;
        }
        self.kind.is_image() && !self.naxes.is_empty() && self.naxes.iter().all(|&n| n > 0)
    }
}

fn card_value<'a>(cards: &'a [Card], keyword: &str) -> Option<&'a Value> {
    cards
        .iter()
        .find(|c| c.keyword_str() == keyword)
        .and_then(|c| c.value.as_ref())
}

fn card_int(cards: &[Card], keyword: &str) -> Option<i64> {
    match card_value(cards, keyword)? {
        Value::Integer(i) => Some(*i),
        _ => None,
    }
}

fn card_str<'a>(cards: &'a [Card], keyword: &str) -> Option<&'a str> {
    match card_value(cards, keyword)? {
        Value::String(s) => Some(s.trim_end()),
        _ => None,
    }
}

/// `[NAXIS1, NAXIS2]` of a table: bytes per row, then rows.
fn table_axes(cards: &[Card]) -> Vec<usize> {
    ["NAXIS1", "NAXIS2"]
        .iter()
        .map(|k| {
            card_int(cards, k)
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(0)
        })
        .collect()
}

enum Storage {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl AsRef<[u8]> for Storage {
    fn as_ref(&self) -> &[u8] {
        match self {
            Storage::Mapped(m) => m,
            Storage::Owned(v) => v,
        }
    }
}

/// A parsed FITS container.
///
/// Decoder warnings (missing END, missing padding, truncated data) are kept
/// per file in `warnings` instead of being reported globally.
pub struct FitsFile {
    bytes: Storage,
    /// Length of real content; anything past it is padding added on load.
    content_len: usize,
    pub hdus: Vec<Hdu>,
    pub warnings: Vec<String>,
}

impl FitsFile {
    /// Read a whole stream into memory and parse it.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::parse(bytes)?)
    }

    /// Memory-map a FITS file from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self::load(Storage::Mapped(mmap))?)
    }

    pub fn parse(bytes: Vec<u8>) -> std::result::Result<Self, FitsError> {
        Self::load(Storage::Owned(bytes))
    }

    fn load(raw: Storage) -> std::result::Result<Self, FitsError> {
        if !raw.as_ref().starts_with(b"SIMPLE") {
            return Err(FitsError::InvalidHeader(
                "missing SIMPLE card; not a FITS file".into(),
            ));
        }

        let mut warnings = Vec::new();
        let (repaired, content_len) = match repair::normalize(raw.as_ref(), &mut warnings) {
            (Cow::Owned(fixed), len) => (Some(fixed), len),
            (Cow::Borrowed(_), len) => (None, len),
        };
        let bytes = repaired.map_or(raw, Storage::Owned);

        let parsed = parse_fits(bytes.as_ref())?;
        let hdus = parsed
            .hdus
            .into_iter()
            .enumerate()
            .map(|(index, raw)| Hdu::from_parsed(index, raw))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for hdu in &hdus {
            let available = content_len.saturating_sub(hdu.data_start);
            if available < hdu.data_len {
                warnings.push(format!(
                    "HDU {} data truncated: {available} of {} bytes present",
                    hdu.index, hdu.data_len
                ));
            }
        }

        debug!(hdus = hdus.len(), warnings = warnings.len(), "Parsed FITS layout");
        Ok(Self {
            bytes,
            content_len,
            hdus,
            warnings,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes.as_ref()[..self.content_len]
    }

    pub fn len(&self) -> usize {
        self.hdus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hdus.is_empty()
    }

    pub fn hdu(&self, index: usize) -> Option<&Hdu> {
        self.hdus.get(index)
    }

    /// Decoded data of HDU `index`, or `None` when the HDU is missing or has no data.
    pub fn hdu_data(&self, index: usize) -> std::result::Result<Option<HduData>, FitsError> {
        let Some(hdu) = self.hdus.get(index) else {
            return Ok(None);
        };
        if !hdu.has_data() {
            return Ok(None);
        }
        if hdu.kind.is_table() {
            return Ok(Some(HduData::Table {
                rows: hdu.naxes.get(1).copied().unwrap_or(0),
                row_bytes: hdu.naxes.first().copied().unwrap_or(0),
            }));
        }
        decode_image(self.bytes.as_ref(), self.content_len, hdu).map(|a| Some(HduData::Image(a)))
    }
}
