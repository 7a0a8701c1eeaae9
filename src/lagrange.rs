//! Lagrange-at-zero reconstruction of thresholded secrets (spec.md §4.8).

use crate::error::{OcpError, Result};
use crate::group::{Point, Scalar};

const LOG_TARGET: &str = "ocp_core::lagrange";

/// Compute `lambda_j = Prod_{m != j} (-i_m) * (i_j - i_m)^-1 mod q` for every
/// index in `indices`. Rejects empty input, duplicate indices, and `index = 0`.
#[tracing::instrument(target = LOG_TARGET, skip(indices))]
pub fn coefficients_at_zero(indices: &[Scalar]) -> Result<Vec<Scalar>> {
    if indices.is_empty() {
        return Err(OcpError::InvalidArgument("Lagrange requires at least one index".into()));
    }
    for idx in indices {
        if idx.is_zero() {
            return Err(OcpError::InvalidArgument("Lagrange index must be non-zero".into()));
        }
    }
    for (i, a) in indices.iter().enumerate() {
        for b in &indices[i + 1..] {
            if a.eq(b) {
                return Err(OcpError::InvalidArgument("Lagrange indices must be distinct".into()));
            }
        }
    }

    let mut coefficients = Vec::with_capacity(indices.len());
    for (j, ij) in indices.iter().enumerate() {
        let mut numerator = Scalar::ONE;
        let mut denominator = Scalar::ONE;
        for (m, im) in indices.iter().enumerate() {
            if m == j {
                continue;
            }
            numerator = numerator.mul(&im.neg());
            denominator = denominator.mul(&ij.sub(im));
        }
        let lambda = numerator.mul(&denominator.inv()?);
        coefficients.push(lambda);
    }
    Ok(coefficients)
}

/// Reconstruct a scalar secret from `(index, share)` pairs via Lagrange
/// interpolation at zero: `sum_j lambda_j * share_j`.
pub fn reconstruct_scalar(shares: &[(Scalar, Scalar)]) -> Result<Scalar> {
    let indices: Vec<Scalar> = shares.iter().map(|(i, _)| *i).collect();
    let coefficients = coefficients_at_zero(&indices)?;
    let mut acc = Scalar::ZERO;
    for ((_, share), lambda) in shares.iter().zip(coefficients.iter()) {
        acc = acc.add(&lambda.mul(share));
    }
    Ok(acc)
}

/// Reconstruct a group-element secret (e.g. an epoch public key component)
/// from `(index, share)` pairs via Lagrange interpolation at zero.
pub fn reconstruct_point(shares: &[(Scalar, Point)]) -> Result<Point> {
    let indices: Vec<Scalar> = shares.iter().map(|(i, _)| *i).collect();
    let coefficients = coefficients_at_zero(&indices)?;
    let mut acc = Point::identity();
    for ((_, share), lambda) in shares.iter().zip(coefficients.iter()) {
        acc = acc.add(&Point::mul_point(share, lambda));
    }
    Ok(acc)
}
