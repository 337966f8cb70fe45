//! ECDSA public-key recovery (SEC1 §4.1.6) and the compact signature
//! encoding that carries the recovery metadata.
//!
//! `Key::sign_compact`/`set_compact_signature`/`verify_compact` (in
//! [`crate::key`]) are the public entry points; this module holds the
//! recovery algorithm itself and the header byte table from spec §3.

use k256::elliptic_curve::ff::PrimeField;
use k256::Scalar as K256Scalar;

use crate::error::Error;
use crate::point::{Point, Scalar};
use crate::Result;

/// Identifies which of up to four candidate public keys a signature
/// recovers to: two bits for the y-parity of `k·G` and whether the
/// x-coordinate of `k·G` overflowed the curve order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RecoveryId(u8);

impl RecoveryId {
    /// Build a recovery ID from a raw value, failing outside `0..=3`.
    pub fn new(value: u8) -> Result<RecoveryId> {
        if value <= 3 {
            Ok(RecoveryId(value))
        } else {
            Err(Error::BadEncoding)
        }
    }

    /// The raw `0..=3` value.
    pub fn to_u8(self) -> u8 {
        self.0
    }
}

/// A 65-byte `header || r || s` compact signature (§3): `r` and `s` are
/// 32-byte big-endian scalars, and `header` packs a [`RecoveryId`] with a
/// "was the signer's public key compressed" flag.
#[derive(Copy, Clone, Debug)]
pub struct CompactSignature {
    header: u8,
    r: [u8; 32],
    s: [u8; 32],
}

impl CompactSignature {
    /// Parse a 65-byte compact signature. Rejects any other length and any
    /// header byte outside `[27, 35)` (the source's `nV < 35` bound, which
    /// covers all four recids with and without the compression flag).
    pub fn from_bytes(bytes: &[u8]) -> Result<CompactSignature> {
        if bytes.len() != 65 {
            return Err(Error::BadEncoding);
        }
        let header = bytes[0];
        if !(27..35).contains(&header) {
            return Err(Error::BadEncoding);
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[1..33]);
        s.copy_from_slice(&bytes[33..65]);
        Ok(CompactSignature { header, r, s })
    }

    /// Build a compact signature from its fields (used by
    /// `Key::sign_compact`).
    pub(crate) fn new(recid: u8, compressed: bool, r: [u8; 32], s: [u8; 32]) -> CompactSignature {
        CompactSignature {
            header: 27 + recid + if compressed { 4 } else { 0 },
            r,
            s,
        }
    }

    /// Encode as the 65-byte wire form.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0] = self.header;
        out[1..33].copy_from_slice(&self.r);
        out[33..65].copy_from_slice(&self.s);
        out
    }

    /// The recovery ID packed into the header.
    pub fn recovery_id(&self) -> RecoveryId {
        RecoveryId((self.header - 27) % 4)
    }

    /// Whether the header marks the signer's public key as compressed.
    pub fn is_compressed(&self) -> bool {
        self.header >= 31
    }

    /// The `r` component, 32 bytes big-endian.
    pub fn r(&self) -> [u8; 32] {
        self.r
    }

    /// The `s` component, 32 bytes big-endian.
    pub fn s(&self) -> [u8; 32] {
        self.s
    }
}

/// Recover the candidate public point for `(hash, r, s, recid)` per SEC1
/// §4.1.6. `recid / 2` selects whether `r` needed `n` added back to
/// recover the x-coordinate of `k·G`; `recid % 2` selects its y-parity.
///
/// The spec's step 4 ("optionally verify `n·R = O`") is not implemented:
/// for a cofactor-1 group like secp256k1 every curve point has order
/// dividing `n`, so the check can never fail and is a tautology — the
/// teacher's own recovery implementation omits it for the same reason.
/// Callers that need assurance the recovered key actually produced `(r,
/// s)` must separately verify the signature against it.
pub(crate) fn recover_point(
    hash: &[u8; 32],
    r: &K256Scalar,
    s: &K256Scalar,
    recid: u8,
) -> Result<Point> {
    if recid > 3 {
        return Err(Error::BadEncoding);
    }
    let is_x_reduced = recid >= 2;
    let is_y_odd = recid % 2 == 1;

    let mut x_bytes = [0u8; 32];
    x_bytes.copy_from_slice(&r.to_repr());
    let x_bytes = if is_x_reduced {
        Point::add_order(&x_bytes).ok_or(Error::RecoveryFailed)?
    } else {
        x_bytes
    };

    let r_point = Point::decompress(&x_bytes, is_y_odd).ok_or(Error::RecoveryFailed)?;

    let e = Scalar::from_bytes_reduce(hash);
    let r_scalar = Scalar(*r);
    let s_scalar = Scalar(*s);
    let r_inv = r_scalar.invert().ok_or(Error::RecoveryFailed)?;

    // Q = r_inv * (s*R - e*G) = (-(e*r_inv))*G + (s*r_inv)*R
    let u1 = r_inv.mul(&e).neg();
    let u2 = r_inv.mul(&s_scalar);
    let scaled_r = r_point.mul(&u2);
    Ok(Point::mul_gen_plus(&u1, &scaled_r))
}
