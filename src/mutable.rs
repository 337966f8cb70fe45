//! Stealth addresses ("mutable keys"): a recipient publishes a fixed pair
//! of points `(L, H)`; a sender derives a fresh one-time public key `P`
//! plus a witness point `R` that only the holder of `(l, h)` (the private
//! halves of `L, H`) can link back to the recipient and unlock.

use zeroize::Zeroizing;

use crate::error::Error;
use crate::hash::h160;
use crate::key::Key;
use crate::point::{Point, Scalar};
use crate::Result;

/// A recipient's published stealth identity: `L = l·G`, `H = h·G`.
#[derive(Clone, Default)]
pub struct MutablePubKey {
    l: Key,
    h: Key,
}

impl MutablePubKey {
    /// An empty, unpopulated identity.
    pub fn new() -> MutablePubKey {
        MutablePubKey::default()
    }

    /// Load `L` and `H` from their 33/65-byte SEC1 encodings.
    pub fn set(&mut self, l_bytes: &[u8], h_bytes: &[u8]) -> bool {
        let mut l = Key::new();
        let mut h = Key::new();
        if !l.set_public_key(l_bytes) || !h.set_public_key(h_bytes) {
            return false;
        }
        self.l = l;
        self.h = h;
        true
    }

    /// `L`'s compressed SEC1 encoding.
    pub fn l_bytes(&self) -> Result<Vec<u8>> {
        self.l.get_public_key()
    }

    /// `H`'s compressed SEC1 encoding.
    pub fn h_bytes(&self) -> Result<Vec<u8>> {
        self.h.get_public_key()
    }

    pub(crate) fn l_point(&self) -> Result<Point> {
        self.l.public_point().ok_or(Error::NotSet)
    }

    pub(crate) fn h_point(&self) -> Result<Point> {
        self.h.public_point().ok_or(Error::NotSet)
    }
}

/// A recipient's private stealth identity: the secret scalars `l` and `h`
/// behind a [`MutablePubKey`].
#[derive(Clone, Default)]
pub struct MutableKey {
    l: Key,
    h: Key,
}

impl MutableKey {
    /// An empty, unpopulated identity.
    pub fn new() -> MutableKey {
        MutableKey::default()
    }

    /// Sample fresh `l` and `h` scalars.
    pub fn make_new(&mut self) {
        let mut l = Key::new();
        let mut h = Key::new();
        l.make_new(true);
        h.make_new(true);
        self.l = l;
        self.h = h;
    }

    /// Load `l` and `h` from their 32-byte big-endian secret scalars.
    pub fn set(&mut self, l_bytes: &[u8; 32], h_bytes: &[u8; 32]) -> bool {
        let mut l = Key::new();
        let mut h = Key::new();
        if !l.set_secret(l_bytes, true) || !h.set_secret(h_bytes, true) {
            return false;
        }
        self.l = l;
        self.h = h;
        true
    }

    /// The published identity `(L, H)` corresponding to this private key.
    pub fn public_key(&self) -> Result<MutablePubKey> {
        Ok(MutablePubKey {
            l: self.l.public_only()?,
            h: self.h.public_only()?,
        })
    }
}

/// A sender-derived one-time identity: the witness point `R` and the
/// one-time public key `P`, both in compressed SEC1 form.
#[derive(Clone, Copy, Debug)]
pub struct Variant {
    r: [u8; 33],
    p: [u8; 33],
}

impl Variant {
    /// The witness point `R`, compressed.
    pub fn r_bytes(&self) -> [u8; 33] {
        self.r
    }

    /// The one-time public key `P`, compressed.
    pub fn p_bytes(&self) -> [u8; 33] {
        self.p
    }
}

/// Derive a fresh one-time variant addressed to `recipient`, sampling a
/// uniform nonzero nonce internally. Retries are the caller's
/// responsibility; this fails with [`Error::InfinityResult`] rather than
/// silently resampling, since a collision here is astronomically unlikely
/// and worth surfacing.
pub fn derive(recipient: &MutablePubKey) -> Result<Variant> {
    let mut nonce = Key::new();
    nonce.make_new(true);
    let r_scalar = nonce
        .secret_scalar()
        .ok_or(Error::Fatal("fresh nonce has no secret"))?;
    derive_with_scalar(recipient, &r_scalar)
}

/// The derivation core, parameterized on the nonce `r` rather than
/// sampling it, so the fixed-`r` test vectors in spec.md §8 can exercise
/// it directly: compute the witness `R = r·G`, the shared point `T =
/// r·L`, fold `T` through [`h160`] into a scalar `k`, and set `P = k·G +
/// H`.
pub(crate) fn derive_with_scalar(recipient: &MutablePubKey, r_scalar: &Scalar) -> Result<Variant> {
    let l = recipient.l_point()?;
    let h = recipient.h_point()?;

    let r_point = Point::generator().mul(r_scalar);
    if r_point.is_infinity() {
        return Err(Error::InfinityResult);
    }

    let t = l.mul(r_scalar);
    if t.is_infinity() {
        return Err(Error::InfinityResult);
    }

    let t_bytes = Zeroizing::new(t.encode_compressed());
    let k = Scalar::from_bytes_reduce(&h160(&t_bytes));
    let p_point = Point::mul_gen_plus(&k, &h);
    if p_point.is_infinity() {
        return Err(Error::InfinityResult);
    }

    Ok(Variant {
        r: r_point.encode_compressed(),
        p: p_point.encode_compressed(),
    })
}

/// Check whether `variant` is addressed to the holder of `identity`, and
/// if so recover the one-time private key `p = k + h (mod n)` that unlocks
/// it. Returns [`Error::Mismatch`] (the ordinary "not mine" outcome) if the
/// derived public key does not equal `variant`'s `P`.
pub fn check_variant(identity: &MutableKey, variant: &Variant) -> Result<Key> {
    let r_point = Point::decode(&variant.r)?;
    let p_candidate = Point::decode(&variant.p)?;
    let h_point = identity.h.public_point().ok_or(Error::NotSet)?;
    let l_scalar = identity.l.secret_scalar().ok_or(Error::NotSet)?;
    let h_scalar = identity.h.secret_scalar().ok_or(Error::NotSet)?;

    let t_prime = r_point.mul(&l_scalar);
    if t_prime.is_infinity() {
        return Err(Error::InfinityResult);
    }

    let t_prime_bytes = Zeroizing::new(t_prime.encode_compressed());
    let k = Scalar::from_bytes_reduce(&h160(&t_prime_bytes));
    let p_prime = Point::mul_gen_plus(&k, &h_point);

    // `p_prime` being infinity would make it compare unequal to any valid
    // candidate anyway, so there is no separate check here (mirroring the
    // generator-sum recovery path, which relies on the same reasoning).
    if !p_prime.equal(&p_candidate) {
        return Err(Error::Mismatch);
    }

    let p_scalar = k.add(&h_scalar);
    let p_scalar_bytes = Zeroizing::new(p_scalar.to_bytes());
    let mut one_time = Key::new();
    if !one_time.set_secret(&p_scalar_bytes, true) {
        return Err(Error::Fatal("derived one-time scalar out of range"));
    }
    Ok(one_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_of(l: u8, h: u8) -> MutableKey {
        let mut key = MutableKey::new();
        assert!(key.set(&[l; 32], &[h; 32]));
        key
    }

    #[test]
    fn derive_and_unlock_round_trip() {
        let recipient = identity_of(0x02, 0x03);
        let published = recipient.public_key().unwrap();

        let variant = derive(&published).unwrap();
        let one_time = check_variant(&recipient, &variant).unwrap();

        assert_eq!(one_time.get_public_key().unwrap(), variant.p_bytes().to_vec());
    }

    #[test]
    fn wrong_recipient_does_not_recognize() {
        let recipient = identity_of(0x02, 0x03);
        let published = recipient.public_key().unwrap();
        let variant = derive(&published).unwrap();

        let stranger = identity_of(0x05, 0x06);
        assert!(matches!(check_variant(&stranger, &variant), Err(Error::Mismatch)));
    }

    #[test]
    fn fixed_scalars_round_trip() {
        let recipient = identity_of(0x02, 0x03);
        let published = recipient.public_key().unwrap();
        let r_scalar = Scalar::from_bytes_exact(&[0x04; 32]).unwrap();

        let variant = derive_with_scalar(&published, &r_scalar).unwrap();
        let one_time = check_variant(&recipient, &variant).unwrap();
        assert_eq!(one_time.get_public_key().unwrap(), variant.p_bytes().to_vec());
    }

    #[test]
    fn tampered_variant_does_not_recognize() {
        let recipient = identity_of(0x02, 0x03);
        let published = recipient.public_key().unwrap();
        let mut variant = derive(&published).unwrap();
        variant.p[1] ^= 0x01;

        assert!(matches!(check_variant(&recipient, &variant), Err(_)));
    }
}
