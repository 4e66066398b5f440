// File: src/kex/mod.rs
//! Key exchange engine
//!
//! Ephemeral key pair generation, SEC1 point encoding and decoding, and
//! ECDH shared secret derivation for the curves in the registry. The
//! arithmetic itself comes from the RustCrypto `p256`/`p384` crates; this
//! module pins down the wire-facing invariants:
//!
//! - points travel in uncompressed form and always occupy exactly the
//!   curve's fixed `share_size` ("snug" encode, strict decode)
//! - peer points are validated by the arithmetic library before use
//!   (off-curve and identity encodings are rejected)
//! - shared secrets are exactly one field element long and are zeroized
//!   on drop, including on every error path

use core::fmt;

use elliptic_curve::{
    ecdh,
    sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint},
    AffinePoint, CurveArithmetic, FieldBytesSize, PublicKey, SecretKey,
};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::curve::{CurveKind, NamedCurve, UNCOMPRESSED_POINT_TAG};
use crate::error::{Error, Result};

#[cfg(test)]
mod tests;

/// An ephemeral key pair bound to exactly one named curve.
///
/// Created only by [`EphemeralKeyPair::generate`] and owned exclusively by
/// the exchange parameters that requested it. The wrapped secret scalar is
/// zeroized when the key pair is dropped or replaced.
pub enum EphemeralKeyPair {
    Secp256r1(p256::SecretKey),
    Secp384r1(p384::SecretKey),
}

/// A validated public point on one of the supported curves.
///
/// Produced either locally from an [`EphemeralKeyPair`] or by decoding a
/// peer's key share; a value of this type is always on its curve and never
/// the identity.
#[derive(Clone, PartialEq, Eq)]
pub enum PublicPoint {
    Secp256r1(p256::PublicKey),
    Secp384r1(p384::PublicKey),
}

/// Raw ECDH output: one field element of secret bytes, zeroized on drop.
pub struct SharedSecret(Zeroizing<Vec<u8>>);

impl EphemeralKeyPair {
    /// Generate a fresh ephemeral key pair on the given curve.
    ///
    /// Fails with [`Error::KeyGeneration`] if the arithmetic library cannot
    /// produce a valid key pair.
    pub fn generate<R>(kind: CurveKind, rng: &mut R) -> Result<Self>
    where
        R: CryptoRng + RngCore,
    {
        let key_pair = match kind {
            CurveKind::Secp256r1 => EphemeralKeyPair::Secp256r1(p256::SecretKey::random(rng)),
            CurveKind::Secp384r1 => EphemeralKeyPair::Secp384r1(p384::SecretKey::random(rng)),
        };
        Ok(key_pair)
    }

    pub fn kind(&self) -> CurveKind {
        match self {
            EphemeralKeyPair::Secp256r1(_) => CurveKind::Secp256r1,
            EphemeralKeyPair::Secp384r1(_) => CurveKind::Secp384r1,
        }
    }

    pub fn curve(&self) -> &'static NamedCurve {
        self.kind().curve()
    }

    /// Public half of this key pair.
    pub fn public_point(&self) -> PublicPoint {
        match self {
            EphemeralKeyPair::Secp256r1(secret) => PublicPoint::Secp256r1(secret.public_key()),
            EphemeralKeyPair::Secp384r1(secret) => PublicPoint::Secp384r1(secret.public_key()),
        }
    }

    /// Uncompressed encoding of the public point; see [`PublicPoint::encode`].
    pub fn encode_public_point(&self) -> Result<Vec<u8>> {
        self.public_point().encode()
    }
}

impl fmt::Debug for EphemeralKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EphemeralKeyPair")
            .field(&self.curve().name)
            .finish()
    }
}

impl PublicPoint {
    /// Decode an uncompressed point received off the wire against `curve`.
    ///
    /// Rejects wrong lengths, a wrong leading tag byte, and encodings the
    /// arithmetic library refuses (off-curve coordinates, the identity) with
    /// [`Error::BadMessage`].
    pub fn decode(octets: &[u8], curve: &'static NamedCurve) -> Result<Self> {
        match curve.kind {
            CurveKind::Secp256r1 => {
                decode_on::<p256::NistP256>(octets, curve).map(PublicPoint::Secp256r1)
            }
            CurveKind::Secp384r1 => {
                decode_on::<p384::NistP384>(octets, curve).map(PublicPoint::Secp384r1)
            }
        }
    }

    pub fn kind(&self) -> CurveKind {
        match self {
            PublicPoint::Secp256r1(_) => CurveKind::Secp256r1,
            PublicPoint::Secp384r1(_) => CurveKind::Secp384r1,
        }
    }

    pub fn curve(&self) -> &'static NamedCurve {
        self.kind().curve()
    }

    /// Encode this point in uncompressed form.
    ///
    /// The length is computed first and must both fit the protocol's
    /// one-byte length field and equal the curve's fixed `share_size`; any
    /// mismatch is [`Error::Serialization`], never a truncated or padded
    /// write.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            PublicPoint::Secp256r1(public) => encode_on(public, self.curve()),
            PublicPoint::Secp384r1(public) => encode_on(public, self.curve()),
        }
    }
}

impl fmt::Debug for PublicPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicPoint").field(&self.curve().name).finish()
    }
}

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for SharedSecret {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret([REDACTED]; {} bytes)", self.0.len())
    }
}

/// Derive the ECDH shared secret from a local key pair and a peer point.
///
/// The secret is the x-coordinate of the ECDH product, exactly
/// `curve.field_size()` bytes. Both inputs must be on the same curve; a
/// mismatch or an unexpected result length is [`Error::SharedSecret`], and
/// no secret material remains reachable after an error return.
pub fn compute_shared_secret(
    own_key_pair: &EphemeralKeyPair,
    peer_point: &PublicPoint,
) -> Result<SharedSecret> {
    match (own_key_pair, peer_point) {
        (EphemeralKeyPair::Secp256r1(secret), PublicPoint::Secp256r1(peer)) => {
            derive_on(secret, peer, own_key_pair.curve())
        }
        (EphemeralKeyPair::Secp384r1(secret), PublicPoint::Secp384r1(peer)) => {
            derive_on(secret, peer, own_key_pair.curve())
        }
        _ => Err(Error::SharedSecret(
            "key pair and peer point are on different curves",
        )),
    }
}

fn decode_on<C>(octets: &[u8], curve: &'static NamedCurve) -> Result<PublicKey<C>>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    if octets.len() != curve.share_size {
        return Err(Error::BadMessage("point length does not match curve"));
    }
    if octets[0] != UNCOMPRESSED_POINT_TAG {
        return Err(Error::BadMessage("point is not in uncompressed form"));
    }
    PublicKey::from_sec1_bytes(octets).map_err(|_| Error::BadMessage("point is not on the curve"))
}

fn encode_on<C>(public: &PublicKey<C>, curve: &'static NamedCurve) -> Result<Vec<u8>>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    let encoded = public.to_encoded_point(false);
    if encoded.len() > usize::from(u8::MAX) {
        return Err(Error::Serialization(
            "point length exceeds one-byte length field",
        ));
    }
    if encoded.len() != curve.share_size {
        return Err(Error::Serialization("uncompressed point length mismatch"));
    }
    Ok(encoded.as_bytes().to_vec())
}

fn derive_on<C>(
    secret: &SecretKey<C>,
    peer: &PublicKey<C>,
    curve: &'static NamedCurve,
) -> Result<SharedSecret>
where
    C: CurveArithmetic,
{
    let shared = ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
    let bytes = shared.raw_secret_bytes();
    if bytes.len() != curve.field_size() {
        return Err(Error::SharedSecret("unexpected shared secret length"));
    }
    Ok(SharedSecret(Zeroizing::new(bytes.as_slice().to_vec())))
}
