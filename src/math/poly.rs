//! Lag-polynomial helpers.
//!
//! A polynomial in the backshift operator `B` is stored as its coefficient
//! vector, lowest power first: `[1.0, -0.5]` is `1 - 0.5B`.

/// Multiply two lag polynomials.
pub fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        if x == 0.0 {
            continue;
        }
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// `1 + sign * (c_1 B^step + c_2 B^{2 step} + ...)`.
///
/// AR factors use `sign = -1.0`, MA factors `sign = 1.0`.
pub fn lag_poly(coeffs: &[f64], step: usize, sign: f64) -> Vec<f64> {
    let mut out = vec![0.0; coeffs.len() * step + 1];
    out[0] = 1.0;
    for (k, &c) in coeffs.iter().enumerate() {
        out[(k + 1) * step] = sign * c;
    }
    out
}

/// Integration operator `(1 - B)^d (1 - B^s)^D`.
pub fn difference_poly(d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut out = vec![1.0];
    for _ in 0..d {
        out = poly_mul(&out, &[1.0, -1.0]);
    }
    for _ in 0..seasonal_d {
        out = poly_mul(&out, &lag_poly(&[1.0], period, -1.0));
    }
    out
}

/// Apply a lag polynomial as a filter: `out_t = Σ_k poly_k x_{t-k}`.
///
/// The first `poly.len() - 1` observations are consumed, so the output is
/// shorter than the input by that amount (empty if the input is too short).
pub fn apply_filter(poly: &[f64], x: &[f64]) -> Vec<f64> {
    let lag = poly.len().saturating_sub(1);
    if x.len() <= lag {
        return Vec::new();
    }
    (lag..x.len())
        .map(|t| poly.iter().enumerate().map(|(k, &c)| c * x[t - k]).sum())
        .collect()
}
