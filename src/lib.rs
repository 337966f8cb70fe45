//! secp256k1 ECDSA core: recoverable compact signatures and stealth
//! addresses.
//!
//! This crate implements three things on top of the secp256k1 curve:
//!
//! - ordinary ECDSA keypairs ([`Key`]) with DER signing/verification and
//!   SEC1 DER import/export of the private key;
//! - "compact" signatures: a 65-byte `header || r || s` encoding that lets
//!   the signer's public key be recovered from `(hash, r, s, recid)`
//!   ([`recovery`]);
//! - a stealth-address primitive ([`MutableKey`]/[`MutablePubKey`]) that
//!   lets a sender derive an unlinkable one-time public key for a
//!   recipient, and lets the recipient recognize and spend it.
//!
//! Point and scalar arithmetic ([`point`]) is a thin wrapper over
//! [`k256`]; this crate supplies the protocol logic (recovery, header
//! encoding, stealth derivation) on top of it.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod error;
mod hash;
mod key;
mod mutable;
mod point;
mod recovery;

pub use crate::error::Error;
pub use crate::key::Key;
pub use crate::mutable::{check_variant, derive, MutableKey, MutablePubKey, Variant};
pub use crate::point::{Point, Scalar};
pub use crate::recovery::{CompactSignature, RecoveryId};

/// Result type returned by this crate's fallible operations.
pub type Result<T> = core::result::Result<T, Error>;
