//! Ridge-regularised least squares on small dense systems.

/// Solve `min ‖y − Xβ‖² + Σ λⱼβⱼ²` for β.
///
/// `rows` is the design matrix X in row-major order and `penalties` holds
/// one λ per column. The penalised normal matrix `XᵀX + diag(λ)` is factored
/// in place as `LLᵀ`. Returns `None` when it is not positive definite.
pub(crate) fn ridge_fit(rows: &[Vec<f64>], y: &[f64], penalties: &[f64]) -> Option<Vec<f64>> {
    let p = penalties.len();
    if p == 0 || rows.len() != y.len() || rows.iter().any(|r| r.len() != p) {
        return None;
    }

    // lower triangle of XᵀX + diag(λ), flat row-major p×p
    let mut gram = vec![0.0; p * p];
    let mut beta = vec![0.0; p];
    for (row, &target) in rows.iter().zip(y) {
        for (i, &xi) in row.iter().enumerate().filter(|&(_, &x)| x != 0.0) {
            beta[i] += xi * target;
            for (cell, &xj) in gram[i * p..=i * p + i].iter_mut().zip(row) {
                *cell += xi * xj;
            }
        }
    }
    for (i, &lambda) in penalties.iter().enumerate() {
        gram[i * p + i] += lambda;
    }

    // overwrite the lower triangle with L
    for i in 0..p {
        for j in 0..=i {
            let dot: f64 = (0..j).map(|k| gram[i * p + k] * gram[j * p + k]).sum();
            let residual = gram[i * p + j] - dot;
            gram[i * p + j] = if i == j {
                if !(residual.is_finite() && residual > 0.0) {
                    return None;
                }
                residual.sqrt()
            } else {
                residual / gram[j * p + j]
            };
        }
    }

    // L z = Xᵀy, then Lᵀ β = z, both in place
    for i in 0..p {
        let dot: f64 = (0..i).map(|k| gram[i * p + k] * beta[k]).sum();
        beta[i] = (beta[i] - dot) / gram[i * p + i];
    }
    for i in (0..p).rev() {
        let dot: f64 = (i + 1..p).map(|k| gram[k * p + i] * beta[k]).sum();
        beta[i] = (beta[i] - dot) / gram[i * p + i];
    }

    Some(beta)
}
