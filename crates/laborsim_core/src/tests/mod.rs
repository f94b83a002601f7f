//! Scenario tests for the simulation pipeline
//!
//! Tests are organized by topic:
//! - `solver` - Newton solver properties (monotonicity, boundary safety)
//! - `simulation` - Regime orchestration, determinism, sampling and failure policies
//! - `estimation` - Structural regressions on generated data (identification,
//!   omitted heterogeneity, selection)
//! - `builder_dsl` - Builder DSL for fluent configuration

mod simulation;

/// Ordinary least squares with an intercept.
///
/// Returns `(coefficients, r_squared)` where `coefficients[0]` is the
/// intercept and the rest follow the column order of `regressors`. Solves the
/// normal equations with partial-pivot Gaussian elimination; plenty for the
/// handful of regressors used here.
pub(crate) fn ols(y: &[f64], regressors: &[Vec<f64>]) -> (Vec<f64>, f64) {
    let n = y.len();
    let k = regressors.len() + 1;
    let row = |i: usize| -> Vec<f64> {
        std::iter::once(1.0)
            .chain(regressors.iter().map(|col| col[i]))
            .collect()
    };

    // Augmented normal equations [X'X | X'y]
    let mut m = vec![vec![0.0; k + 1]; k];
    for i in 0..n {
        let xi = row(i);
        for a in 0..k {
            for b in 0..k {
                m[a][b] += xi[a] * xi[b];
            }
            m[a][k] += xi[a] * y[i];
        }
    }

    for col in 0..k {
        let pivot = (col..k)
            .max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))
            .unwrap();
        m.swap(col, pivot);
        let pivot_row = m[col].clone();
        for (r, current) in m.iter_mut().enumerate() {
            if r != col {
                let factor = current[col] / pivot_row[col];
                for j in col..=k {
                    current[j] -= factor * pivot_row[j];
                }
            }
        }
    }
    let coefficients: Vec<f64> = (0..k).map(|i| m[i][k] / m[i][i]).collect();

    let mean = y.iter().sum::<f64>() / n as f64;
    let (ssr, sst) = (0..n).fold((0.0, 0.0), |(ssr, sst), i| {
        let fitted: f64 = row(i).iter().zip(&coefficients).map(|(x, b)| x * b).sum();
        (ssr + (y[i] - fitted).powi(2), sst + (y[i] - mean).powi(2))
    });

    (coefficients, 1.0 - ssr / sst)
}
