//! Histogram binning and Gaussian kernel density estimation for the
//! distribution charts.

use serde::Serialize;
use utoipa::ToSchema;

pub const HISTOGRAM_BINS: usize = 10;
const DENSITY_GRID_POINTS: usize = 100;

/// One half-open histogram bin `[start, end)`; the last bin is closed.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct DensityPoint {
    pub x: f64,
    pub y: f64,
}

/// Equal-width histogram over `[min, max]` with `bins` bins.
///
/// When every value is equal the range becomes `[v - 0.5, v + 0.5]`.
/// Returns an empty `Vec` for empty input.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    let Some((lo, hi)) = range(values) else {
        return Vec::new();
    };
    let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Gaussian KDE sampled over `[min, max]`, scaled to the count axis of a
/// histogram with bins of `bin_width`.
///
/// Bandwidth follows Scott's rule. `None` when fewer than two values are
/// given or the sample has zero variance.
pub fn density(values: &[f64], bin_width: f64) -> Option<Vec<DensityPoint>> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let sd = sample_std_dev(values);
    if sd == 0.0 || !sd.is_finite() {
        return None;
    }
    let (lo, hi) = range(values)?;

    let nf = n as f64;
    let bandwidth = sd * nf.powf(-0.2);
    let norm = 1.0 / (nf * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let scale = nf * bin_width;
    let step = (hi - lo) / (DENSITY_GRID_POINTS - 1) as f64;

    let points = (0..DENSITY_GRID_POINTS)
        .map(|i| {
            let x = lo + step * i as f64;
            let pdf: f64 = values
                .iter()
                .map(|&v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm;
            DensityPoint { x, y: pdf * scale }
        })
        .collect();
    Some(points)
}

fn range(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Standard deviation with Bessel's correction.
fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}
