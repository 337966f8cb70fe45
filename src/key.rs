//! Ordinary ECDSA keypair.

use der::asn1::ObjectIdentifier;
use der::{Decode, Encode};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::ff::PrimeField;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{AffinePoint, FieldBytes, PublicKey, SecretKey};
use rand_core::OsRng;
use sec1::{EcParameters, EcPrivateKey};
use zeroize::Zeroizing;

use crate::error::Error;
use crate::point::{Point, Scalar};
use crate::Result;

/// DER object identifier for the secp256k1 curve (SEC 2 §2.4.1).
const SECP256K1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.10");

/// An ECDSA keypair.
///
/// Holds at most a secret scalar and its corresponding public point; either
/// may be absent, but if a secret is present the public half always equals
/// `secret · G`. `compressed` governs only how [`Key::get_public_key`] and
/// [`Key::get_private_key`] serialize the public point, never signing.
///
/// The underlying [`k256::SecretKey`] zeroizes its scalar on drop, so no
/// explicit `Drop` impl is needed here to satisfy the "secret material is
/// zeroed on destruction" requirement.
#[derive(Clone, Default)]
pub struct Key {
    secret: Option<SecretKey>,
    public: Option<PublicKey>,
    compressed: bool,
    set: bool,
}

impl Key {
    /// An empty, unpopulated key.
    pub fn new() -> Key {
        Key::default()
    }

    /// Sample a uniform non-zero secret scalar and derive its public key.
    pub fn make_new(&mut self, compressed: bool) {
        let secret = SecretKey::random(&mut OsRng);
        self.public = Some(secret.public_key());
        self.secret = Some(secret);
        self.compressed = compressed;
        self.set = true;
    }

    /// Interpret `bytes` as a big-endian secret scalar. Fails (leaving the
    /// key reset) unless `0 < s < n`.
    pub fn set_secret(&mut self, bytes: &[u8; 32], compressed: bool) -> bool {
        match SecretKey::from_slice(bytes) {
            Ok(secret) => {
                self.public = Some(secret.public_key());
                self.secret = Some(secret);
                self.compressed = compressed;
                self.set = true;
                true
            }
            Err(_) => {
                self.reset();
                false
            }
        }
    }

    /// The secret scalar as 32 big-endian bytes, and the compression flag.
    pub fn get_secret(&self) -> Result<([u8; 32], bool)> {
        let secret = self.secret.as_ref().ok_or(Error::NotSet)?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&secret.to_bytes());
        Ok((bytes, self.compressed))
    }

    /// Import a SEC1 (RFC 5915) DER-encoded EC private key. The embedded
    /// public key, if present, must equal `secret · G` and determines the
    /// compression flag from its encoded length; if absent, the public key
    /// is re-derived and `compressed` defaults to `false`.
    pub fn set_private_key(&mut self, der: &[u8]) -> bool {
        let parsed = match EcPrivateKey::from_der(der) {
            Ok(parsed) => parsed,
            Err(_) => {
                self.reset();
                return false;
            }
        };

        if let Some(EcParameters::NamedCurve(oid)) = parsed.parameters {
            if oid != SECP256K1_OID {
                self.reset();
                return false;
            }
        }

        let secret_bytes: [u8; 32] = match parsed.private_key.try_into() {
            Ok(bytes) => bytes,
            Err(_) => {
                self.reset();
                return false;
            }
        };

        let secret = match SecretKey::from_slice(&secret_bytes) {
            Ok(secret) => secret,
            Err(_) => {
                self.reset();
                return false;
            }
        };
        let derived = secret.public_key();

        let (public, compressed) = match parsed.public_key {
            Some(bytes) => {
                let compressed = match bytes.len() {
                    33 => true,
                    65 => false,
                    _ => {
                        self.reset();
                        return false;
                    }
                };
                match PublicKey::from_sec1_bytes(bytes) {
                    Ok(public) if public == derived => (public, compressed),
                    _ => {
                        self.reset();
                        return false;
                    }
                }
            }
            None => (derived, false),
        };

        self.secret = Some(secret);
        self.public = Some(public);
        self.compressed = compressed;
        self.set = true;
        true
    }

    /// Emit the SEC1 DER form of the current secret, with the embedded
    /// public key honoring the compression flag.
    pub fn get_private_key(&self) -> Result<Vec<u8>> {
        let secret = self.secret.as_ref().ok_or(Error::NotSet)?;
        let public = self.public.as_ref().ok_or(Error::NotSet)?;
        let secret_bytes = Zeroizing::new(secret.to_bytes());
        let encoded_point = public.to_encoded_point(self.compressed);

        let ec_private_key = EcPrivateKey {
            private_key: &secret_bytes,
            parameters: Some(EcParameters::NamedCurve(SECP256K1_OID)),
            public_key: Some(encoded_point.as_bytes()),
        };
        ec_private_key.to_der().map_err(|_| Error::BadEncoding)
    }

    /// Decode a 33-byte compressed or 65-byte uncompressed public key.
    /// Clears any existing secret, since a `Key`'s secret must always match
    /// its public half.
    pub fn set_public_key(&mut self, bytes: &[u8]) -> bool {
        let compressed = match bytes.len() {
            33 => true,
            65 => false,
            _ => {
                self.reset();
                return false;
            }
        };
        match PublicKey::from_sec1_bytes(bytes) {
            Ok(public) => {
                self.public = Some(public);
                self.secret = None;
                self.compressed = compressed;
                self.set = true;
                true
            }
            Err(_) => {
                self.reset();
                false
            }
        }
    }

    /// Encode the public key using the current compression flag.
    pub fn get_public_key(&self) -> Result<Vec<u8>> {
        let public = self.public.as_ref().ok_or(Error::NotSet)?;
        Ok(public.to_encoded_point(self.compressed).as_bytes().to_vec())
    }

    /// Sign a 32-byte message hash, producing a strict DER-encoded
    /// signature. Uses RFC 6979 deterministic nonces.
    pub fn sign(&self, hash: &[u8; 32]) -> Result<Vec<u8>> {
        let secret = self.secret.as_ref().ok_or(Error::NotSet)?;
        let signing_key = SigningKey::from(secret.clone());
        let signature: Signature = signing_key
            .sign_prehash(hash)
            .map_err(|_| Error::Fatal("ECDSA signing failed"))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    /// Verify a strict DER-encoded signature over a 32-byte message hash.
    /// Non-canonical DER is rejected rather than accepted leniently.
    pub fn verify(&self, hash: &[u8; 32], sig: &[u8]) -> bool {
        let Some(public) = &self.public else {
            return false;
        };
        let Ok(signature) = Signature::from_der(sig) else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(public.to_encoded_point(true).as_bytes())
        else {
            return false;
        };
        verifying_key.verify_prehash(hash, &signature).is_ok()
    }

    /// Sign `hash`, returning a 65-byte compact signature: a header byte
    /// (§3) followed by 32-byte big-endian `r` and `s`. Fails if no recid
    /// in `0..=3` recovers this key's own public point, which would be an
    /// invariant violation rather than ordinary user error.
    pub fn sign_compact(&self, hash: &[u8; 32]) -> Result<[u8; 65]> {
        let secret = self.secret.as_ref().ok_or(Error::NotSet)?;
        let public = self.public.as_ref().ok_or(Error::NotSet)?;
        let signing_key = SigningKey::from(secret.clone());
        let signature: Signature = signing_key
            .sign_prehash(hash)
            .map_err(|_| Error::Fatal("ECDSA signing failed"))?;
        let (r, s) = signature.split_scalars();

        let our_bytes = public.to_encoded_point(true);
        for recid in 0u8..4 {
            if let Ok(recovered) = crate::recovery::recover_point(hash, &r, &s, recid) {
                if recovered.encode_compressed().as_slice() == our_bytes.as_bytes() {
                    let mut r_bytes = [0u8; 32];
                    let mut s_bytes = [0u8; 32];
                    r_bytes.copy_from_slice(&r.to_repr());
                    s_bytes.copy_from_slice(&s.to_repr());
                    let compact = crate::recovery::CompactSignature::new(
                        recid,
                        self.compressed,
                        r_bytes,
                        s_bytes,
                    );
                    return Ok(compact.to_bytes());
                }
            }
        }
        Err(Error::RecoveryFailed)
    }

    /// Recover a public key from a 65-byte compact signature and populate
    /// this key's public half with it, clearing any secret. The caller is
    /// responsible for calling [`Key::verify`] afterward if it hasn't
    /// already matched the recovered key against an expected one.
    pub fn set_compact_signature(&mut self, hash: &[u8; 32], sig: &[u8]) -> bool {
        let compact = match crate::recovery::CompactSignature::from_bytes(sig) {
            Ok(compact) => compact,
            Err(_) => {
                self.reset();
                return false;
            }
        };

        let (r, s) = match (
            k256::Scalar::from_repr(FieldBytes::from(compact.r())),
            k256::Scalar::from_repr(FieldBytes::from(compact.s())),
        ) {
            (r, s) if bool::from(r.is_some()) && bool::from(s.is_some()) => {
                (r.unwrap(), s.unwrap())
            }
            _ => {
                self.reset();
                return false;
            }
        };

        let recovered = match crate::recovery::recover_point(hash, &r, &s, compact.recovery_id().to_u8())
        {
            Ok(point) => point,
            Err(_) => {
                self.reset();
                return false;
            }
        };

        match PublicKey::from_affine(AffinePoint::from(recovered.0)) {
            Ok(public) => {
                self.secret = None;
                self.public = Some(public);
                self.compressed = compact.is_compressed();
                self.set = true;
                true
            }
            Err(_) => {
                self.reset();
                false
            }
        }
    }

    /// Derive the candidate public key via [`Key::set_compact_signature`]
    /// and compare it (on canonical compressed encoding) with this key's
    /// public half.
    pub fn verify_compact(&self, hash: &[u8; 32], sig: &[u8]) -> bool {
        let mut candidate = Key::new();
        if !candidate.set_compact_signature(hash, sig) {
            return false;
        }
        match (&self.public, &candidate.public) {
            (Some(ours), Some(theirs)) => {
                ours.to_encoded_point(true).as_bytes() == theirs.to_encoded_point(true).as_bytes()
            }
            _ => false,
        }
    }

    /// Does this key hold a valid, self-consistent state: populated, and,
    /// if a secret is present, `public == secret · G`?
    pub fn is_valid(&self) -> bool {
        if !self.set {
            return false;
        }
        match (&self.secret, &self.public) {
            (Some(secret), Some(public)) => secret.public_key() == *public,
            (None, Some(_)) => true,
            _ => false,
        }
    }

    /// Whether this key has been populated by one of the `make_new`/`set_*`
    /// constructors.
    pub fn is_set(&self) -> bool {
        self.set
    }

    /// Whether `get_public_key`/`get_private_key` will serialize in
    /// compressed form.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub(crate) fn secret_key(&self) -> Option<&SecretKey> {
        self.secret.as_ref()
    }

    pub(crate) fn public_key(&self) -> Option<&PublicKey> {
        self.public.as_ref()
    }

    /// The secret scalar, for internal callers that need raw group
    /// arithmetic (e.g. stealth derivation) rather than `k256`'s key types.
    pub(crate) fn secret_scalar(&self) -> Option<Scalar> {
        self.secret.as_ref().map(|s| Scalar(*s.to_nonzero_scalar().as_ref()))
    }

    /// The public point, for internal callers doing raw group arithmetic.
    pub(crate) fn public_point(&self) -> Option<Point> {
        self.public.as_ref().map(|p| Point(p.to_projective()))
    }

    /// A copy of this key with any secret scalar dropped, keeping the
    /// public half and compression flag. Used to turn a private stealth
    /// identity into the identity it publishes.
    pub(crate) fn public_only(&self) -> Result<Key> {
        let public = self.public.clone().ok_or(Error::NotSet)?;
        Ok(Key {
            secret: None,
            public: Some(public),
            compressed: self.compressed,
            set: true,
        })
    }

    fn reset(&mut self) {
        self.secret = None;
        self.public = None;
        self.compressed = false;
        self.set = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret_of_ones() -> [u8; 32] {
        [0x01; 32]
    }

    #[test]
    fn set_secret_rejects_zero() {
        let mut key = Key::new();
        assert!(!key.set_secret(&[0u8; 32], true));
        assert!(!key.is_set());
    }

    #[test]
    fn set_secret_pins_known_pubkey() {
        let mut key = Key::new();
        assert!(key.set_secret(&secret_of_ones(), true));
        let pubkey = key.get_public_key().unwrap();
        assert_eq!(pubkey[0], 0x03);
        assert_eq!(pubkey.len(), 33);
    }

    #[test]
    fn sign_verify_round_trip() {
        let mut key = Key::new();
        key.make_new(true);
        let hash = [0u8; 32];
        let sig = key.sign(&hash).unwrap();
        assert!(key.verify(&hash, &sig));

        let mut tampered = sig.clone();
        tampered[tampered.len() - 1] ^= 0x01;
        assert!(!key.verify(&hash, &tampered));
    }

    #[test]
    fn der_private_key_round_trip() {
        let mut key = Key::new();
        key.make_new(false);
        let der = key.get_private_key().unwrap();

        let mut roundtripped = Key::new();
        assert!(roundtripped.set_private_key(&der));
        assert_eq!(
            roundtripped.get_secret().unwrap().0,
            key.get_secret().unwrap().0
        );
        assert_eq!(
            roundtripped.get_public_key().unwrap(),
            key.get_public_key().unwrap()
        );
        assert_eq!(roundtripped.is_compressed(), key.is_compressed());
    }

    #[test]
    fn set_public_key_rejects_bad_length() {
        let mut key = Key::new();
        assert!(!key.set_public_key(&[0u8; 10]));
    }

    #[test]
    fn is_valid_requires_consistency() {
        let mut key = Key::new();
        assert!(!key.is_valid());
        key.make_new(true);
        assert!(key.is_valid());
    }
}
