use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkyfetchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog query failed: {0}")]
    Catalog(String),

    #[error("Malformed catalog response: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed DataLink response: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invalid FITS file: {0}")]
    Fits(#[from] FitsError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Network-level failures while downloading a single file.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP status {status} for url: {url}")]
    Status { status: u16, url: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match (e.status(), e.url()) {
            (Some(status), Some(url)) => FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            },
            _ => FetchError::Transport(e.to_string()),
        }
    }
}

/// Decode failures for a FITS byte stream.
#[derive(Error, Debug, PartialEq)]
pub enum FitsError {
    #[error("data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("{0}")]
    InvalidHeader(String),

    #[error("unsupported BITPIX {0}")]
    InvalidBitpix(i64),
}

impl From<fitsio_pure::error::Error> for FitsError {
    fn from(e: fitsio_pure::error::Error) -> Self {
        match e {
            fitsio_pure::error::Error::InvalidBitpix(bitpix) => FitsError::InvalidBitpix(bitpix),
            other => FitsError::InvalidHeader(format!("{other:?}")),
        }
    }
}

impl SkyfetchError {
    /// True for errors raised while downloading, as opposed to decoding or rendering.
    pub fn is_fetch(&self) -> bool {
        matches!(self, SkyfetchError::Fetch(_))
    }
}

pub type Result<T> = std::result::Result<T, SkyfetchError>;
