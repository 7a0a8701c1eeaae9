//! Canonical-encoding façade over ristretto255: scalars, points, add/sub/mul,
//! base-point multiplication, and the canonicality rules spec.md §4.1 demands.
//!
//! Everything here is value-typed and reentrant; there is no mutable state.

use crate::error::{OcpError, Result};
use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar as DalekScalar;
use curve25519_dalek::traits::Identity;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};
use zeroize::Zeroize;

/// A residue mod the ristretto255 group order `q`.
#[derive(Clone, Copy, PartialEq, Eq, Zeroize, Serialize, Deserialize)]
#[serde(into = "[u8; 32]", try_from = "[u8; 32]")]
pub struct Scalar(pub(crate) DalekScalar);

impl std::fmt::Debug for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scalar({})", hex::encode(self.to_bytes()))
    }
}

impl Scalar {
    pub const ZERO: Scalar = Scalar(DalekScalar::ZERO);
    pub const ONE: Scalar = Scalar(DalekScalar::ONE);

    /// Decode a canonical little-endian scalar. Rejects any encoding of an
    /// integer `>= q`, per spec.md's canonicality rule.
    pub fn from_bytes_canonical(bytes: &[u8; 32]) -> Result<Self> {
        Option::<DalekScalar>::from(DalekScalar::from_canonical_bytes(*bytes))
            .map(Scalar)
            .ok_or_else(|| OcpError::InvalidEncoding("scalar not canonical (>= q)".into()))
    }

    /// Reduce 64 bytes of uniform randomness into a scalar.
    pub fn from_uniform_bytes(bytes: &[u8; 64]) -> Self {
        Scalar(DalekScalar::from_bytes_mod_order_wide(bytes))
    }

    pub fn from_u64(value: u64) -> Self {
        Scalar(DalekScalar::from(value))
    }

    pub fn add(&self, other: &Scalar) -> Scalar {
        Scalar(self.0 + other.0)
    }

    pub fn sub(&self, other: &Scalar) -> Scalar {
        Scalar(self.0 - other.0)
    }

    pub fn mul(&self, other: &Scalar) -> Scalar {
        Scalar(self.0 * other.0)
    }

    pub fn neg(&self) -> Scalar {
        Scalar(-self.0)
    }

    /// Multiplicative inverse. Fails on the zero scalar.
    pub fn inv(&self) -> Result<Scalar> {
        if self.is_zero() {
            return Err(OcpError::InvalidArgument("cannot invert zero scalar".into()));
        }
        Ok(Scalar(self.0.invert()))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == DalekScalar::ZERO
    }

    pub fn bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.bytes()
    }

    pub fn eq(&self, other: &Scalar) -> bool {
        self.0 == other.0
    }
}

impl From<Scalar> for [u8; 32] {
    fn from(s: Scalar) -> Self {
        s.bytes()
    }
}

impl TryFrom<[u8; 32]> for Scalar {
    type Error = OcpError;

    fn try_from(bytes: [u8; 32]) -> Result<Self> {
        Scalar::from_bytes_canonical(&bytes)
    }
}

impl Add for Scalar {
    type Output = Scalar;
    fn add(self, rhs: Scalar) -> Scalar {
        Scalar::add(&self, &rhs)
    }
}

impl Sub for Scalar {
    type Output = Scalar;
    fn sub(self, rhs: Scalar) -> Scalar {
        Scalar::sub(&self, &rhs)
    }
}

impl Mul for Scalar {
    type Output = Scalar;
    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar::mul(&self, &rhs)
    }
}

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar::neg(&self)
    }
}

/// A ristretto255 group element.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(into = "[u8; 32]", try_from = "[u8; 32]")]
pub struct Point(pub(crate) RistrettoPoint);

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Point({})", hex::encode(self.bytes()))
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for Point {}

impl Point {
    /// Decode a canonical 32-byte ristretto255 encoding. Non-canonical byte
    /// strings are rejected by the underlying `CompressedRistretto::decompress`.
    pub fn from_bytes_canonical(bytes: &[u8; 32]) -> Result<Self> {
        CompressedRistretto(*bytes)
            .decompress()
            .map(Point)
            .ok_or_else(|| OcpError::InvalidEncoding("point not a canonical ristretto255 encoding".into()))
    }

    pub fn bytes(&self) -> [u8; 32] {
        self.0.compress().to_bytes()
    }

    pub fn add(&self, other: &Point) -> Point {
        Point(self.0 + other.0)
    }

    pub fn sub(&self, other: &Point) -> Point {
        Point(self.0 - other.0)
    }

    /// Base-point multiplication `scalar * G`, using the precomputed table.
    pub fn mul_base(scalar: &Scalar) -> Point {
        Point(&scalar.0 * &RISTRETTO_BASEPOINT_TABLE)
    }

    /// General scalar multiplication `scalar * point`.
    pub fn mul_point(point: &Point, scalar: &Scalar) -> Point {
        Point(point.0 * scalar.0)
    }

    pub fn identity() -> Point {
        Point(RistrettoPoint::identity())
    }

    pub fn base() -> Point {
        Point(&Scalar::ONE.0 * &RISTRETTO_BASEPOINT_TABLE)
    }

    pub fn eq(&self, other: &Point) -> bool {
        self.0 == other.0
    }
}

impl From<Point> for [u8; 32] {
    fn from(p: Point) -> Self {
        p.bytes()
    }
}

impl TryFrom<[u8; 32]> for Point {
    type Error = OcpError;

    fn try_from(bytes: [u8; 32]) -> Result<Self> {
        Point::from_bytes_canonical(&bytes)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::add(&self, &rhs)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::sub(&self, &rhs)
    }
}

impl Mul<Scalar> for Point {
    type Output = Point;
    fn mul(self, rhs: Scalar) -> Point {
        Point::mul_point(&self, &rhs)
    }
}
