//! Errors used throughout this crate.

/// Error taxonomy for the secp256k1 core.
///
/// Parse-level failures and recognition mismatches are ordinary, expected
/// outcomes (a caller feeding untrusted bytes, or a stealth variant that
/// simply isn't addressed to this recipient) and are returned as `Err`
/// rather than panicking. [`Error::Fatal`] is reserved for conditions the
/// caller cannot meaningfully retry: RNG exhaustion, or an invariant the
/// protocol guarantees failing to hold.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input bytes: wrong length, invalid DER, unknown header.
    #[error("bad encoding")]
    BadEncoding,
    /// A decoded point is not a valid element of the secp256k1 group.
    #[error("point is not on the curve")]
    NotOnCurve,
    /// A scalar is zero or `>= n`.
    #[error("scalar out of range")]
    OutOfRange,
    /// Parsing succeeded but `public != secret · G`.
    #[error("inconsistent key: public key does not match secret")]
    InconsistentKey,
    /// ECDSA recovery found no candidate point, or no recid reproduces the
    /// signer's key during compact signing.
    #[error("signature recovery failed")]
    RecoveryFailed,
    /// A derivation step produced the point at infinity. The caller may
    /// retry with fresh randomness.
    #[error("derivation produced the point at infinity")]
    InfinityResult,
    /// During stealth recognition, the derived one-time public key does not
    /// equal the supplied candidate. This is the common-case "not mine"
    /// outcome, not an exceptional one.
    #[error("variant does not match candidate public key")]
    Mismatch,
    /// The key or mutable key has not been populated.
    #[error("key is not set")]
    NotSet,
    /// The CSPRNG failed, or an internal invariant was violated.
    #[error("fatal: {0}")]
    Fatal(&'static str),
}
