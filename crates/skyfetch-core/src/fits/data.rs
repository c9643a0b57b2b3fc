use fitsio_pure::image::{
    apply_bscale_bzero, blank_mask, extract_blank, extract_bscale_bzero, read_image_data,
};
use ndarray::{ArrayD, IxDyn};

use crate::error::FitsError;
use crate::fits::hdu::{Hdu, HduKind};

/// Data held by an HDU, as seen by shape validation.
#[derive(Clone, Debug)]
pub enum HduData {
    /// Physical pixel values, slowest axis first.
    Image(ArrayD<f64>),
    /// A table is a one-dimensional array of records.
    Table { rows: usize, row_bytes: usize },
}

impl HduData {
    pub fn ndim(&self) -> usize {
        match self {
            HduData::Image(a) => a.ndim(),
            HduData::Table { .. } => 1,
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            HduData::Image(a) => a.shape().to_vec(),
            HduData::Table { rows, .. } => vec![*rows],
        }
    }
}

/// Number of elements in an array with axis lengths `naxes`.
pub(crate) fn element_count(naxes: &[usize]) -> Result<usize, FitsError> {
    naxes
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| FitsError::InvalidHeader("data size overflows".into()))
}

/// Decode the image array of `hdu` to physical values.
///
/// `content_len` is how much of `buf` came from the source; data reaching
/// past it is truncated. Integer samples equal to BLANK become NaN when
/// scaling is applied; unscaled integer data is returned as-is.
pub(crate) fn decode_image(
    buf: &[u8],
    content_len: usize,
    hdu: &Hdu,
) -> Result<ArrayD<f64>, FitsError> {
    let count = element_count(&hdu.naxes)?;
    let available = content_len.saturating_sub(hdu.data_start);
    if hdu.kind != HduKind::CompressedImage && available < hdu.data_len {
        return Err(FitsError::Truncated {
            expected: hdu.data_len,
            actual: available,
        });
    }

    let stored = read_image_data(buf, &hdu.raw)?;
    let (bscale, bzero) = extract_bscale_bzero(hdu.cards());
    let mut values = apply_bscale_bzero(&stored, bscale, bzero);
    if bscale != 1.0 || bzero != 0.0 {
        if let Some(mask) = blank_mask(&stored, extract_blank(hdu.cards())) {
            for (v, _) in values.iter_mut().zip(mask).filter(|(_, blank)| *blank) {
                *v = f64::NAN;
            }
        }
    }

    if values.len() != count {
        return Err(FitsError::InvalidHeader(format!(
            "HDU {} holds {} values, header declares {count}",
            hdu.index,
            values.len()
        )));
    }
    let shape: Vec<usize> = hdu.naxes.iter().rev().copied().collect();
    ArrayD::from_shape_vec(IxDyn(&shape), values)
        .map_err(|e| FitsError::InvalidHeader(e.to_string()))
}
