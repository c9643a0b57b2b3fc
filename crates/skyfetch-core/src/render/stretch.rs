use ndarray::parallel::prelude::*;
use ndarray::{Array2, ArrayView2, Zip};
use rayon::slice::ParallelSliceMut;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HIGH_PERCENTILE, DEFAULT_LOW_PERCENTILE, PARALLEL_PIXEL_THRESHOLD};

/// How physical values are mapped to display gray levels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum Stretch {
    /// Linear over the finite minimum..maximum.
    #[default]
    MinMax,
    /// Linear between two percentiles (fractions in 0..1) of the finite values.
    Percentile { low: f32, high: f32 },
}

impl Stretch {
    pub fn percentile_default() -> Self {
        Stretch::Percentile {
            low: DEFAULT_LOW_PERCENTILE,
            high: DEFAULT_HIGH_PERCENTILE,
        }
    }
}

impl std::fmt::Display for Stretch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stretch::MinMax => write!(f, "Min/Max"),
            Stretch::Percentile { low, high } => {
                write!(f, "Percentile {:.1}%-{:.1}%", low * 100.0, high * 100.0)
            }
        }
    }
}

/// Map values into [0, 1]. Non-finite values become 0, and so does
/// everything when the display range is empty.
pub fn normalize(data: ArrayView2<f64>, stretch: &Stretch) -> Array2<f32> {
    let range = match stretch {
        Stretch::MinMax => finite_range(&data),
        Stretch::Percentile { low, high } => percentile_range(&data, *low, *high),
    };
    let Some((lo, hi)) = range else {
        return Array2::zeros(data.raw_dim());
    };

    let span = hi - lo;
    let map = move |&v: &f64| -> f32 {
        if !v.is_finite() || span <= 0.0 {
            0.0
        } else {
            ((v - lo) / span).clamp(0.0, 1.0) as f32
        }
    };

    if data.len() >= PARALLEL_PIXEL_THRESHOLD {
        Zip::from(&data).par_map_collect(map)
    } else {
        data.map(map)
    }
}

/// Minimum and maximum over finite values, if any.
pub fn finite_range(data: &ArrayView2<f64>) -> Option<(f64, f64)> {
    let fold = |(lo, hi): (f64, f64), &v: &f64| {
        if v.is_finite() {
            (lo.min(v), hi.max(v))
        } else {
            (lo, hi)
        }
    };
    let empty = (f64::INFINITY, f64::NEG_INFINITY);

    let (lo, hi) = if data.len() >= PARALLEL_PIXEL_THRESHOLD {
        data.view()
            .into_par_iter()
            .fold(|| empty, fold)
            .reduce(|| empty, |a, b| (a.0.min(b.0), a.1.max(b.1)))
    } else {
        data.iter().fold(empty, fold)
    };
    (lo <= hi).then_some((lo, hi))
}

fn percentile_range(data: &ArrayView2<f64>, low: f32, high: f32) -> Option<(f64, f64)> {
    let mut finite: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    if finite.len() >= PARALLEL_PIXEL_THRESHOLD {
        finite.par_sort_unstable_by(f64::total_cmp);
    } else {
        finite.sort_unstable_by(f64::total_cmp);
    }
    let last = finite.len() - 1;
    let pick = |p: f32| finite[((p.clamp(0.0, 1.0) as f64) * last as f64).round() as usize];
    Some((pick(low.min(high)), pick(high.max(low))))
}
