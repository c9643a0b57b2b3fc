//! Interactive viewer windows for rendered FITS planes.

pub mod convert;
pub mod viewer;

pub use viewer::WindowRenderer;
