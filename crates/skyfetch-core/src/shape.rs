use std::fmt;

use ndarray::{ArrayD, Axis, Ix2};

use crate::consts::MAX_RENDER_DIMS;
use crate::error::{Result, SkyfetchError};
use crate::fits::HduData;
use crate::render::{DisplayImage, Origin};

/// Why a file produced no image.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    NoImageData,
    TooManyDims(usize),
    OneDimensional,
    NanOrZero,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoImageData => write!(f, "No image data found in extension 1."),
            SkipReason::TooManyDims(n) => write!(f, "Data has over 3 dimensions ({n})."),
            SkipReason::OneDimensional => write!(f, "Data has only 1 dimension."),
            SkipReason::NanOrZero => write!(f, "Data contains only NaNs or zeros."),
        }
    }
}

/// Result of validating one HDU's data.
#[derive(Clone, Debug, PartialEq)]
pub enum Classification {
    Render,
    Skip(SkipReason),
}

/// Decide whether `data` can be shown as a grayscale image.
///
/// Checks run in order: dimensionality above 3, a single dimension, then
/// content that is entirely NaN or entirely zero.
pub fn classify(data: &HduData) -> Classification {
    let ndim = data.ndim();
    if ndim > MAX_RENDER_DIMS {
        return Classification::Skip(SkipReason::TooManyDims(ndim));
    }
    if ndim == 0 {
        return Classification::Skip(SkipReason::NoImageData);
    }
    if ndim == 1 {
        return Classification::Skip(SkipReason::OneDimensional);
    }
    match data {
        HduData::Image(array) if is_degenerate(array) => {
            Classification::Skip(SkipReason::NanOrZero)
        }
        HduData::Image(_) => Classification::Render,
        HduData::Table { .. } => Classification::Skip(SkipReason::OneDimensional),
    }
}

/// True when every element is NaN, or every element is exactly zero.
pub fn is_degenerate(array: &ArrayD<f64>) -> bool {
    array.iter().all(|v| v.is_nan()) || array.iter().all(|&v| v == 0.0)
}

/// Reduce a 2D or 3D array to the plane that gets displayed.
///
/// 2D arrays are shown as stored with row 0 at the top. For 3D arrays only
/// plane 0 of the leading axis is shown, with row 0 at the bottom.
pub fn extract_display_plane(array: &ArrayD<f64>, title: &str) -> Result<DisplayImage> {
    let (plane, origin) = match array.ndim() {
        2 => (array.view(), Origin::UpperLeft),
        3 => (array.index_axis(Axis(0), 0), Origin::LowerLeft),
        n => {
            return Err(SkyfetchError::Render(format!(
                "cannot display a {n}-dimensional array"
            )))
        }
    };
    let data = plane
        .into_dimensionality::<Ix2>()
        .map_err(|e| SkyfetchError::Render(e.to_string()))?
        .to_owned();
    Ok(DisplayImage {
        title: title.to_string(),
        data,
        origin,
    })
}
