//! FITS access on top of `fitsio-pure`.
//!
//! The byte stream is normalized first (missing `END` cards closed, block
//! padding restored), then handed to the parser. Anything the normalization
//! had to fix is kept as a per-file warning.

pub mod data;
pub mod hdu;
mod repair;

pub use data::HduData;
pub use hdu::{FitsFile, Hdu, HduKind};
pub use fitsio_pure::value::Value;
