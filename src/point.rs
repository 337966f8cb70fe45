//! Scalar/point primitives for the secp256k1 group.
//!
//! This module is a thin wrapper over [`k256`]'s field and group
//! arithmetic. It exists so the rest of this crate talks about "a scalar"
//! and "a point" rather than reaching into `k256`'s generic-curve traits
//! directly, and so the byte encodings spec'd in §3/§6 live in one place.

use elliptic_curve::bigint::{CheckedAdd, U256};
use elliptic_curve::ff::{Field, PrimeField};
use elliptic_curve::group::Group;
use elliptic_curve::point::DecompressPoint;
use elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use elliptic_curve::{Curve, CurveArithmetic, FieldBytesEncoding};
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Secp256k1};
use subtle::Choice;

use crate::error::Error;
use crate::Result;

/// An integer in `[0, n)`, where `n` is the secp256k1 group order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Scalar(pub(crate) k256::Scalar);

impl Scalar {
    /// Interpret `bytes` as a big-endian unsigned integer and reduce it
    /// modulo `n`. Used to turn a hash (of any length up to 32 bytes, e.g.
    /// the 20-byte output of [`crate::hash::h160`]) into a scalar.
    pub fn from_bytes_reduce(bytes: &[u8]) -> Scalar {
        let mut buf = [0u8; 32];
        if bytes.len() >= 32 {
            buf.copy_from_slice(&bytes[bytes.len() - 32..]);
        } else {
            buf[32 - bytes.len()..].copy_from_slice(bytes);
        }
        let field_bytes = FieldBytes::from(buf);
        Scalar(<k256::Scalar as elliptic_curve::ops::Reduce<U256>>::reduce_bytes(&field_bytes))
    }

    /// Parse exactly 32 big-endian bytes as a scalar, failing if the value
    /// is zero or `>= n`.
    pub fn from_bytes_exact(bytes: &[u8; 32]) -> Result<Scalar> {
        let field_bytes = FieldBytes::from(*bytes);
        let scalar = Option::<k256::Scalar>::from(k256::Scalar::from_repr(field_bytes))
            .ok_or(Error::OutOfRange)?;
        if bool::from(scalar.is_zero()) {
            return Err(Error::OutOfRange);
        }
        Ok(Scalar(scalar))
    }

    /// Encode as 32 bytes, big-endian, left-padded with zeros.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.0.to_repr());
        out
    }

    /// `self + other (mod n)`.
    pub fn add(&self, other: &Scalar) -> Scalar {
        Scalar(self.0 + other.0)
    }

    /// `self * other (mod n)`.
    pub fn mul(&self, other: &Scalar) -> Scalar {
        Scalar(self.0 * other.0)
    }

    /// `-self (mod n)`.
    pub fn neg(&self) -> Scalar {
        Scalar(-self.0)
    }

    /// `self^-1 (mod n)`, or `None` if `self` is zero.
    pub fn invert(&self) -> Option<Scalar> {
        Option::<k256::Scalar>::from(self.0.invert()).map(Scalar)
    }
}

/// An element of the secp256k1 group, possibly the point at infinity.
#[derive(Copy, Clone, Debug)]
pub struct Point(pub(crate) ProjectivePoint);

impl Point {
    /// The curve's base point `G`.
    pub fn generator() -> Point {
        Point(ProjectivePoint::GENERATOR)
    }

    /// Decode a compressed (33-byte) or uncompressed (65-byte) SEC1 point.
    /// Rejects any other length and any bytes not on the curve.
    pub fn decode(bytes: &[u8]) -> Result<Point> {
        if bytes.len() != 33 && bytes.len() != 65 {
            return Err(Error::BadEncoding);
        }
        let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| Error::BadEncoding)?;
        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or(Error::NotOnCurve)?;
        Ok(Point(ProjectivePoint::from(affine)))
    }

    /// Reconstruct a point from its x-coordinate (as 32 raw field bytes,
    /// not necessarily `< n`) and the parity of its y-coordinate, as used
    /// by ECDSA recovery (SEC1 §4.1.6 step 3). Fails if no curve point has
    /// that x-coordinate.
    pub(crate) fn decompress(x: &[u8; 32], y_is_odd: bool) -> Option<Point> {
        let field_bytes = FieldBytes::from(*x);
        let affine = AffinePoint::decompress(&field_bytes, Choice::from(y_is_odd as u8));
        Option::<AffinePoint>::from(affine).map(|a| Point(ProjectivePoint::from(a)))
    }

    /// Encode as a 33-byte compressed SEC1 point. Only meaningful for a
    /// non-infinity point; callers must check [`Point::is_infinity`] first.
    pub fn encode_compressed(&self) -> [u8; 33] {
        let affine = AffinePoint::from(self.0);
        let encoded = affine.to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// Is this the point at infinity (the group identity)?
    pub fn is_infinity(&self) -> bool {
        bool::from(self.0.is_identity())
    }

    /// Constant-time-ish point equality (delegates to `k256`'s `PartialEq`,
    /// which compares affine coordinates rather than raw projective ones).
    pub fn equal(&self, other: &Point) -> bool {
        self.0 == other.0
    }

    /// `self + other`.
    pub fn add(&self, other: &Point) -> Point {
        Point(self.0 + other.0)
    }

    /// `scalar * self`.
    pub fn mul(&self, scalar: &Scalar) -> Point {
        Point(self.0 * scalar.0)
    }

    /// `k·G + q` as a single primitive, matching `EC_POINT_mul`'s combined
    /// form. The stealth derivation (§4.4) and ECDSA recovery (§4.3) are
    /// both naturally expressed with it.
    pub fn mul_gen_plus(k: &Scalar, q: &Point) -> Point {
        Point(ProjectivePoint::GENERATOR * k.0 + q.0)
    }

    /// Add `n` (the group order) to `x`, treating both as plain 256-bit
    /// unsigned integers. Used by recovery when `recid >= 2` (the x
    /// overflowed the curve order). Fails if the sum does not fit in 256
    /// bits.
    pub(crate) fn add_order(x: &[u8; 32]) -> Option<[u8; 32]> {
        let x_uint = U256::decode_field_bytes(&FieldBytes::from(*x));
        let sum = Option::<U256>::from(x_uint.checked_add(&Secp256k1::ORDER))?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&sum.encode_field_bytes());
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_from_bytes_exact_rejects_zero() {
        let zero = [0u8; 32];
        assert!(Scalar::from_bytes_exact(&zero).is_err());
    }

    #[test]
    fn scalar_roundtrip() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let s = Scalar::from_bytes_exact(&bytes).unwrap();
        assert_eq!(s.to_bytes(), bytes);
    }

    #[test]
    fn scalar_from_bytes_reduce_handles_short_input() {
        let h160 = [0xabu8; 20];
        let s = Scalar::from_bytes_reduce(&h160);
        let mut expected = [0u8; 32];
        expected[12..].copy_from_slice(&h160);
        assert_eq!(s.to_bytes(), expected);
    }

    #[test]
    fn point_decode_rejects_bad_length() {
        assert!(Point::decode(&[0u8; 10]).is_err());
    }

    #[test]
    fn mul_gen_plus_matches_add_of_muls() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let k = Scalar::from_bytes_exact(&one).unwrap();
        let g = Point(ProjectivePoint::GENERATOR);
        let q = g.mul(&k);
        let combined = Point::mul_gen_plus(&k, &q);
        let expected = g.mul(&k).add(&q);
        assert!(combined.equal(&expected));
    }
}
