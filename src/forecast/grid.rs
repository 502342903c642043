//! Coefficient grid generation.
//!
//! The CSS objective of a seasonal model has many local minima once MA terms
//! are involved, so the fitter starts from a deterministic grid search over a
//! coefficient box and only then refines locally.

use super::fitter::FitError;

/// Upper bound on the number of grid points evaluated in one fit.
pub const MAX_GRID_POINTS: usize = 250_000;

/// Generate `steps` evenly spaced points between `-bound` and `bound` (inclusive).
pub fn lin_space(bound: f64, steps: usize) -> Result<Vec<f64>, FitError> {
    if !(bound.is_finite() && bound > 0.0) {
        return Err(FitError::InvalidConfig(format!(
            "coefficient bound must be finite and > 0 (got {bound})"
        )));
    }
    if steps < 2 {
        return Err(FitError::InvalidConfig("grid steps must be >= 2".to_string()));
    }

    let step = 2.0 * bound / (steps as f64 - 1.0);
    Ok((0..steps).map(|i| -bound + step * i as f64).collect())
}

/// Cartesian grid of `dims`-dimensional coefficient vectors.
///
/// With `dims == 0` the grid holds a single empty vector (nothing to estimate).
pub fn coefficient_grid(dims: usize, steps: usize, bound: f64) -> Result<Vec<Vec<f64>>, FitError> {
    let axis = lin_space(bound, steps)?;
    let total = (0..dims).try_fold(1usize, |acc, _| acc.checked_mul(axis.len()));
    match total {
        Some(n) if n <= MAX_GRID_POINTS => {}
        _ => {
            return Err(FitError::InvalidConfig(format!(
                "{steps}^{dims} grid points exceed the limit of {MAX_GRID_POINTS}"
            )));
        }
    }

    let mut grid: Vec<Vec<f64>> = vec![Vec::new()];
    for _ in 0..dims {
        let mut next = Vec::with_capacity(grid.len() * axis.len());
        for prefix in &grid {
            for &v in &axis {
                let mut c = prefix.clone();
                c.push(v);
                next.push(c);
            }
        }
        grid = next;
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lin_space_includes_endpoints_and_zero() {
        let v = lin_space(0.9, 7).unwrap();
        assert!((v[0] + 0.9).abs() < 1e-12);
        assert!(v[3].abs() < 1e-12);
        assert!((v[6] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn grid_is_full_cartesian_product() {
        let g = coefficient_grid(3, 4, 1.0).unwrap();
        assert_eq!(g.len(), 64);
        assert!(g.iter().all(|c| c.len() == 3));
        assert_eq!(coefficient_grid(0, 4, 1.0).unwrap(), vec![Vec::<f64>::new()]);
    }

    #[test]
    fn oversized_grid_is_rejected() {
        assert!(matches!(
            coefficient_grid(8, 11, 1.0),
            Err(FitError::InvalidConfig(_))
        ));
    }
}
