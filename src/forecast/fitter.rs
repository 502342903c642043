//! Conditional-sum-of-squares estimation for one SARIMA order.
//!
//! Given a training series `y` we:
//! - difference it (`∇^d ∇_s^D`) into `w`
//! - evaluate the CSS objective over a coefficient grid (parallel)
//! - refine the best grid point with damped Gauss–Newton steps
//!
//! No stationarity or invertibility constraint is imposed on the estimates;
//! a candidate is only rejected when its objective is not finite.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::domain::SarimaParams;
use crate::forecast::grid::coefficient_grid;
use crate::forecast::model::{SarimaOrder, conditional_residuals, css, expand, forecast};
use crate::math::{apply_filter, difference_poly, solve_least_squares};

/// Why a model could not be fit (or could not forecast).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("insufficient data: need at least {required} training observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },
    #[error("training data contains non-finite values")]
    NonFiniteInput,
    #[error("no finite objective among {candidates} coefficient candidates")]
    NoValidCandidate { candidates: usize },
    #[error("forecast produced non-finite values")]
    NonFiniteForecast,
    #[error("invalid forecast configuration: {0}")]
    InvalidConfig(String),
}

/// Estimation options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Grid points per coefficient.
    pub grid_steps: usize,
    /// Grid spans `[-coeff_bound, coeff_bound]` on every axis.
    pub coeff_bound: f64,
    /// Maximum Gauss–Newton iterations after the grid search.
    pub refine_iters: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            grid_steps: 9,
            coeff_bound: 0.95,
            refine_iters: 25,
        }
    }
}

/// A fitted model together with the in-sample quantities needed to forecast.
#[derive(Debug, Clone)]
pub struct SarimaFit {
    pub order: SarimaOrder,
    pub coeffs: Vec<f64>,
    pub css: f64,
    y: Vec<f64>,
    w: Vec<f64>,
    resid: Vec<f64>,
}

impl SarimaFit {
    /// Residuals the objective is computed over.
    pub fn n_resid(&self) -> usize {
        self.w.len()
    }

    pub fn params(&self) -> SarimaParams {
        let none: &[f64] = &[];
        let (ar, ma, sar, sma) = self.order.split(&self.coeffs).unwrap_or((none, none, none, none));
        SarimaParams {
            ar: ar.to_vec(),
            ma: ma.to_vec(),
            seasonal_ar: sar.to_vec(),
            seasonal_ma: sma.to_vec(),
            css: self.css,
            n_resid: self.n_resid(),
        }
    }

    /// Point forecasts for the `steps` periods after the training sample.
    pub fn forecast(&self, steps: usize) -> Result<Vec<f64>, FitError> {
        let lags = expand(&self.order, &self.coeffs).ok_or(FitError::NonFiniteForecast)?;
        let out = forecast(&self.order, &lags, &self.y, &self.w, &self.resid, steps);
        if out.iter().all(|v| v.is_finite()) {
            Ok(out)
        } else {
            Err(FitError::NonFiniteForecast)
        }
    }
}

/// Fit `order` to `y` by conditional sum of squares.
pub fn fit_sarima(order: &SarimaOrder, y: &[f64], opts: &FitOptions) -> Result<SarimaFit, FitError> {
    if order.period == 0 && (order.seasonal_p + order.seasonal_d + order.seasonal_q) > 0 {
        return Err(FitError::InvalidConfig("seasonal period must be > 0".to_string()));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFiniteInput);
    }
    let required = order.min_train_len();
    if y.len() < required {
        return Err(FitError::InsufficientData {
            required,
            actual: y.len(),
        });
    }

    let w = apply_filter(&difference_poly(order.d, order.seasonal_d, order.period), y);
    let grid = coefficient_grid(order.n_coeffs(), opts.grid_steps, opts.coeff_bound)?;

    // Evaluate each grid point independently (parallel).
    let candidates: Vec<(usize, f64)> = grid
        .par_iter()
        .enumerate()
        .filter_map(|(idx, coeffs)| css(order, coeffs, &w).map(|v| (idx, v)))
        .collect();

    // Deterministic selection: pick the minimum CSS; break ties by grid index.
    let Some(&(best_idx, best_css)) = candidates
        .iter()
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
    else {
        return Err(FitError::NoValidCandidate {
            candidates: grid.len(),
        });
    };

    debug!(
        model = %order.display_name(),
        grid = grid.len(),
        finite = candidates.len(),
        css = best_css,
        "grid search done"
    );

    let (coeffs, css_value) = refine(order, &w, grid[best_idx].clone(), best_css, opts.refine_iters);
    let resid = residuals(order, &coeffs, &w).ok_or(FitError::NoValidCandidate {
        candidates: grid.len(),
    })?;

    Ok(SarimaFit {
        order: *order,
        coeffs,
        css: css_value,
        y: y.to_vec(),
        w,
        resid,
    })
}

/// Damped Gauss–Newton on the residual vector, starting from a grid point.
///
/// Steps are only accepted when they lower the objective, so the result is
/// never worse than the starting point.
fn refine(order: &SarimaOrder, w: &[f64], mut coeffs: Vec<f64>, mut best: f64, iters: usize) -> (Vec<f64>, f64) {
    let k = coeffs.len();
    if k == 0 || best <= 0.0 {
        return (coeffs, best);
    }
    for _ in 0..iters {
        let Some(e0) = residuals(order, &coeffs, w) else {
            break;
        };
        let m = e0.len();
        if m == 0 {
            break;
        }

        // Central-difference Jacobian of the residual vector.
        let mut jac = DMatrix::<f64>::zeros(m, k);
        let mut ok = true;
        for j in 0..k {
            let h = 1e-6 * coeffs[j].abs().max(1.0);
            let mut up = coeffs.clone();
            let mut down = coeffs.clone();
            up[j] += h;
            down[j] -= h;
            let (Some(eu), Some(ed)) = (residuals(order, &up, w), residuals(order, &down, w)) else {
                ok = false;
                break;
            };
            for i in 0..m {
                let d = (eu[i] - ed[i]) / (2.0 * h);
                if !d.is_finite() {
                    ok = false;
                }
                jac[(i, j)] = d;
            }
        }
        if !ok {
            break;
        }

        let rhs = DVector::from_iterator(m, e0.iter().map(|v| -v));
        let Some(delta) = solve_least_squares(&jac, &rhs) else {
            break;
        };

        // Step halving until the objective improves.
        let mut lambda = 1.0;
        let mut accepted = None;
        for _ in 0..12 {
            let cand: Vec<f64> = coeffs
                .iter()
                .zip(delta.iter())
                .map(|(c, d)| c + lambda * d)
                .collect();
            if let Some(v) = css(order, &cand, w) {
                if v < best {
                    accepted = Some((cand, v));
                    break;
                }
            }
            lambda *= 0.5;
        }

        let Some((cand, v)) = accepted else {
            break;
        };
        let gain = best - v;
        coeffs = cand;
        best = v;
        if gain <= 1e-10 * best.max(1e-12) {
            break;
        }
    }

    (coeffs, best)
}

fn residuals(order: &SarimaOrder, coeffs: &[f64], w: &[f64]) -> Option<Vec<f64>> {
    expand(order, coeffs).map(|lags| conditional_residuals(&lags, w))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seasonal_series(n: usize) -> Vec<f64> {
        // Deterministic "noise" keeps the objective non-trivial without RNG.
        (0..n)
            .map(|t| {
                let tf = t as f64;
                1000.0 + 12.0 * tf
                    + 150.0 * (2.0 * std::f64::consts::PI * tf / 12.0).sin()
                    + 25.0 * (1.7 * tf).sin()
            })
            .collect()
    }

    #[test]
    fn short_series_is_insufficient() {
        let order = SarimaOrder::default();
        let err = fit_sarima(&order, &seasonal_series(17), &FitOptions::default()).unwrap_err();
        assert_eq!(
            err,
            FitError::InsufficientData {
                required: order.min_train_len(),
                actual: 17
            }
        );
    }

    #[test]
    fn two_and_a_half_seasons_are_enough_to_fit() {
        let fit = fit_sarima(&SarimaOrder::default(), &seasonal_series(28), &FitOptions::default()).unwrap();
        assert!(fit.css.is_finite());
        let f = fit.forecast(12).unwrap();
        assert_eq!(f.len(), 12);
        assert!(f.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut y = seasonal_series(40);
        y[5] = f64::NAN;
        let err = fit_sarima(&SarimaOrder::default(), &y, &FitOptions::default()).unwrap_err();
        assert_eq!(err, FitError::NonFiniteInput);
    }

    #[test]
    fn refinement_never_worsens_grid_optimum() {
        let order = SarimaOrder::default();
        let y = seasonal_series(40);
        let coarse = FitOptions {
            refine_iters: 0,
            ..FitOptions::default()
        };
        let a = fit_sarima(&order, &y, &coarse).unwrap();
        let b = fit_sarima(&order, &y, &FitOptions::default()).unwrap();
        assert!(b.css <= a.css);
        assert!(b.css.is_finite());
    }

    #[test]
    fn fit_is_deterministic() {
        let order = SarimaOrder::default();
        let y = seasonal_series(44);
        let a = fit_sarima(&order, &y, &FitOptions::default()).unwrap();
        let b = fit_sarima(&order, &y, &FitOptions::default()).unwrap();
        assert_eq!(a.coeffs, b.coeffs);
        assert_eq!(a.forecast(6).unwrap(), b.forecast(6).unwrap());
    }

    #[test]
    fn params_report_split_coefficients() {
        let fit = fit_sarima(&SarimaOrder::default(), &seasonal_series(40), &FitOptions::default()).unwrap();
        let p = fit.params();
        assert_eq!((p.ar.len(), p.ma.len(), p.seasonal_ar.len(), p.seasonal_ma.len()), (1, 1, 1, 1));
        assert_eq!(p.n_resid, 40 - 13);
    }
}
