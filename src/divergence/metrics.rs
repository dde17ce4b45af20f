// Kullback-Leibler and Jensen-Shannon divergence over aligned vectors.
//
// All logarithms are base 2, so JS divergence is bounded by 1.0 and JS
// distance (its square root) is a metric on the same scale.
//
// KL skips every index where either probability is exactly zero. That
// includes q[i] == 0 with p[i] != 0, which the textbook definition sends to
// infinity. Inside JS the midpoint is non-zero wherever p or q is, so there
// only the p[i] == 0 terms are ever skipped.

use crate::error::AnalysisError;

fn check_lengths(p: &[f64], q: &[f64]) -> Result<(), AnalysisError> {
    if p.len() != q.len() {
        return Err(AnalysisError::LengthMismatch {
            left: p.len(),
            right: q.len(),
        });
    }
    Ok(())
}

/// KL divergence D(p || q) in bits, with zero terms skipped.
pub fn kl_divergence(p: &[f64], q: &[f64]) -> Result<f64, AnalysisError> {
    check_lengths(p, q)?;

    Ok(p.iter()
        .zip(q)
        .filter(|&(&pi, &qi)| pi != 0.0 && qi != 0.0)
        .map(|(&pi, &qi)| pi * (pi / qi).log2())
        .sum::<f64>())
}

/// Jensen-Shannon divergence: mean KL of p and q against their midpoint.
pub fn js_divergence(p: &[f64], q: &[f64]) -> Result<f64, AnalysisError> {
    check_lengths(p, q)?;

    let m: Vec<f64> = p.iter().zip(q).map(|(pi, qi)| 0.5 * (pi + qi)).collect();
    Ok(0.5 * kl_divergence(p, &m)? + 0.5 * kl_divergence(q, &m)?)
}

/// Jensen-Shannon distance, the square root of JS divergence.
///
/// Rounding can leave the divergence a hair below zero for identical
/// inputs; that is clamped before the square root.
pub fn js_distance(p: &[f64], q: &[f64]) -> Result<f64, AnalysisError> {
    Ok(js_divergence(p, q)?.max(0.0).sqrt())
}
