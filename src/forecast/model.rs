//! Multiplicative seasonal ARIMA evaluation.
//!
//! The fitter relies on three primitive operations:
//! - expand seasonal/non-seasonal coefficients into plain lag coefficients
//! - compute conditional residuals of the differenced series (for CSS)
//! - recurse the difference equation forward and integrate (for forecasts)
//!
//! Sign convention (same as most statistics packages):
//!
//! ```text
//! (1 - φ(B)) (1 - Φ(B^s)) ∇^d ∇_s^D y_t = (1 + θ(B)) (1 + Θ(B^s)) e_t
//! ```

use serde::{Deserialize, Serialize};

use crate::math::{difference_poly, lag_poly, poly_mul};

/// Model orders `(p, d, q) x (P, D, Q, s)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SarimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub seasonal_p: usize,
    pub seasonal_d: usize,
    pub seasonal_q: usize,
    pub period: usize,
}

impl Default for SarimaOrder {
    /// SARIMA(1,1,1)(1,1,1)12.
    fn default() -> Self {
        Self {
            p: 1,
            d: 1,
            q: 1,
            seasonal_p: 1,
            seasonal_d: 1,
            seasonal_q: 1,
            period: 12,
        }
    }
}

impl SarimaOrder {
    /// Number of estimated coefficients.
    pub fn n_coeffs(&self) -> usize {
        self.p + self.q + self.seasonal_p + self.seasonal_q
    }

    /// Observations consumed by differencing.
    pub fn diff_lag(&self) -> usize {
        self.d + self.seasonal_d * self.period
    }

    /// Smallest training length that leaves more residuals than coefficients.
    pub fn min_train_len(&self) -> usize {
        self.diff_lag() + self.n_coeffs() + 1
    }

    /// Human-readable label for terminal output.
    pub fn display_name(&self) -> String {
        format!(
            "SARIMA({},{},{})({},{},{}){}",
            self.p, self.d, self.q, self.seasonal_p, self.seasonal_d, self.seasonal_q, self.period
        )
    }

    /// Split a flat coefficient vector into `(ar, ma, seasonal_ar, seasonal_ma)`.
    ///
    /// `None` unless `coeffs.len() == self.n_coeffs()`.
    pub fn split<'a>(&self, coeffs: &'a [f64]) -> Option<(&'a [f64], &'a [f64], &'a [f64], &'a [f64])> {
        if coeffs.len() != self.n_coeffs() {
            return None;
        }
        let (ar, rest) = coeffs.split_at(self.p);
        let (ma, rest) = rest.split_at(self.q);
        let (sar, sma) = rest.split_at(self.seasonal_p);
        Some((ar, ma, sar, sma))
    }
}

/// Coefficients of the expanded difference equation
/// `w_t = Σ ar[k-1] w_{t-k} + e_t + Σ ma[k-1] e_{t-k}`.
#[derive(Debug, Clone, PartialEq)]
pub struct LagCoefficients {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
}

/// Expand seasonal and non-seasonal factors into lag coefficients.
///
/// `None` when `coeffs` does not match the order.
pub fn expand(order: &SarimaOrder, coeffs: &[f64]) -> Option<LagCoefficients> {
    let (ar, ma, sar, sma) = order.split(coeffs)?;
    let ar_poly = poly_mul(&lag_poly(ar, 1, -1.0), &lag_poly(sar, order.period, -1.0));
    let ma_poly = poly_mul(&lag_poly(ma, 1, 1.0), &lag_poly(sma, order.period, 1.0));

    Some(LagCoefficients {
        ar: ar_poly.iter().skip(1).map(|c| -c).collect(),
        ma: ma_poly.iter().skip(1).copied().collect(),
    })
}

/// Conditional residuals of the differenced series `w`.
///
/// The recursion starts at the first observation with pre-sample values of
/// `w` and `e` taken as zero; the returned vector has the same length as `w`.
pub fn conditional_residuals(lags: &LagCoefficients, w: &[f64]) -> Vec<f64> {
    let mut e = vec![0.0; w.len()];
    for t in 0..w.len() {
        let mut pred = 0.0;
        for (k, &c) in lags.ar.iter().enumerate() {
            if t > k {
                pred += c * w[t - k - 1];
            }
        }
        for (k, &m) in lags.ma.iter().enumerate() {
            if t > k {
                pred += m * e[t - k - 1];
            }
        }
        e[t] = w[t] - pred;
    }
    e
}

/// Conditional sum of squares for `coeffs`; `None` when it is not finite or
/// `coeffs` does not match the order.
pub fn css(order: &SarimaOrder, coeffs: &[f64], w: &[f64]) -> Option<f64> {
    let lags = expand(order, coeffs)?;
    let sse: f64 = conditional_residuals(&lags, w).iter().map(|r| r * r).sum();
    if sse.is_finite() { Some(sse) } else { None }
}

/// Point forecasts `steps` periods past the end of `y`.
///
/// `w` and `e` are the differenced series and its residuals for the same
/// sample; future shocks are set to zero.
pub fn forecast(order: &SarimaOrder, lags: &LagCoefficients, y: &[f64], w: &[f64], e: &[f64], steps: usize) -> Vec<f64> {
    let mut w_ext = w.to_vec();
    let mut e_ext = e.to_vec();
    for _ in 0..steps {
        let t = w_ext.len();
        let mut next = 0.0;
        for (k, &c) in lags.ar.iter().enumerate() {
            if t > k {
                next += c * w_ext[t - k - 1];
            }
        }
        for (k, &m) in lags.ma.iter().enumerate() {
            if t > k {
                next += m * e_ext[t - k - 1];
            }
        }
        w_ext.push(next);
        e_ext.push(0.0);
    }

    // Undo differencing: y_t = w_t - Σ_{k≥1} δ_k y_{t-k}.
    let delta = difference_poly(order.d, order.seasonal_d, order.period);
    let mut y_ext = y.to_vec();
    let mut out = Vec::with_capacity(steps);
    for &w_hat in &w_ext[w.len()..] {
        let t = y_ext.len();
        let mut next = w_hat;
        for (k, &dk) in delta.iter().enumerate().skip(1) {
            if t >= k {
                next -= dk * y_ext[t - k];
            }
        }
        y_ext.push(next);
        out.push(next);
    }
    out
}
