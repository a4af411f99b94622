use serde::Serialize;

use super::model::{AsNumber, Sequence};
use crate::error::{ErrorKind, GtexError, Result};

/// Arithmetic mean rounded to 2 decimal places.
///
/// An empty collection has mean `0.0`. A non-list container or any
/// non-numeric element fails with `TypeWrong`; there is no partial mean.
pub fn mean<S>(values: &S) -> Result<f64>
where
    S: Sequence + ?Sized,
    S::Item: AsNumber,
{
    let elements = values.elements().map_err(|e| match e.kind() {
        ErrorKind::InvalidArgument => GtexError::type_wrong(format!("mean needs a list of numbers: {e}")),
        _ => e,
    })?;

    if elements.is_empty() {
        return Ok(0.0);
    }

    let mut total = 0.0;
    for (i, value) in elements.iter().enumerate() {
        total += value
            .as_number()
            .ok_or_else(|| GtexError::type_wrong(format!("element {i} is not an integer or float")))?;
    }

    Ok(round2(total / elements.len() as f64))
}

/// Round to 2 decimals from the exact binary value, ties to even.
fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

// ---------------------------------------------------------------------------
// BoxSummary – five-number summary for box plots
// ---------------------------------------------------------------------------

/// Quartiles, whiskers and outliers of one group's counts.
///
/// Quartiles use linear interpolation between closest ranks; whiskers reach
/// the most extreme counts within 1.5 IQR of the box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub n: usize,
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// `None` for a group with no counts.
    pub fn from_counts(counts: &[i64]) -> Option<Self> {
        if counts.is_empty() {
            return None;
        }

        let mut sorted: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 0.25);
        let median = percentile(&sorted, 0.5);
        let q3 = percentile(&sorted, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let inside = sorted.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(BoxSummary {
            n: sorted.len(),
            mean: mean(counts).ok()?,
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Linearly interpolated percentile of non-empty, ascending `sorted`.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}
