// File: src/params/mod.rs
//! Per-handshake exchange parameters
//!
//! [`ExchangeParameters`] binds one negotiated curve to the key material a
//! handshake holds for it: a locally generated [`EphemeralKeyPair`], a
//! parsed peer [`PublicPoint`], or both sides of nothing yet. The two
//! symmetric flows live here:
//!
//! - **produce-and-send**: generate an ephemeral key on the negotiated
//!   curve and write the ECDHE params block
//!   `curve_type(1) | wire_id(2) | point_length(1) | point`
//! - **receive-and-derive**: read a peer's length-prefixed point against
//!   the negotiated curve and derive the shared secret
//!
//! Reading is split into [`ExchangeParameters::read`] (framing only, no
//! allocation, borrows the point octets) and [`ExchangeParameters::parse`]
//! (registry resolution and point validation), so the caller can hold the
//! raw bytes for transcript signature verification before committing.

use rand::{CryptoRng, RngCore};

use crate::curve::{find_by_wire_id, NamedCurve, CURVE_TYPE_NAMED};
use crate::error::{Error, Result};
use crate::kex::{compute_shared_secret, EphemeralKeyPair, PublicPoint, SharedSecret};
use crate::wire::{Reader, Writer};


/// An ECDHE params block as read off the wire, before resolution.
///
/// Borrows from the receive buffer; nothing is validated beyond framing.
#[derive(Debug, Clone, Copy)]
pub struct RawExchangeParams<'a> {
    /// Named-group identifier, not yet resolved against the registry.
    pub wire_id: u16,
    /// The encoded point octets, exactly as received.
    pub point: &'a [u8],
    /// The full consumed params block (`4 + point_length` bytes), the span
    /// a signature over the exchange covers.
    pub to_verify: &'a [u8],
}

/// One handshake's key-exchange state for one curve.
///
/// Created empty; the curve is set once (by cipher negotiation or by
/// extension parsing) and is not overwritten while still set. Key material
/// is dropped, and thereby zeroized, on [`clear`](Self::clear), on
/// replacement, or when the parameters themselves are dropped.
#[derive(Debug, Default)]
pub struct ExchangeParameters {
    negotiated_curve: Option<&'static NamedCurve>,
    key_pair: Option<EphemeralKeyPair>,
    peer_point: Option<PublicPoint>,
}

impl ExchangeParameters {
    pub fn new() -> Self {
        ExchangeParameters::default()
    }

    pub fn negotiated_curve(&self) -> Option<&'static NamedCurve> {
        self.negotiated_curve
    }

    pub fn key_pair(&self) -> Option<&EphemeralKeyPair> {
        self.key_pair.as_ref()
    }

    pub fn peer_point(&self) -> Option<&PublicPoint> {
        self.peer_point.as_ref()
    }

    /// Bind these parameters to a curve. Callers uphold the set-once
    /// invariant: an already-negotiated slot is never re-targeted (the
    /// extension codec's duplicate check enforces this on the receive path).
    pub fn set_negotiated_curve(&mut self, curve: &'static NamedCurve) {
        self.negotiated_curve = Some(curve);
    }

    pub(crate) fn set_peer_point(&mut self, point: PublicPoint) {
        self.peer_point = Some(point);
    }

    /// Generate an ephemeral key pair on the negotiated curve, replacing
    /// (and zeroizing) any previous one.
    pub fn generate_ephemeral_key<R>(&mut self, rng: &mut R) -> Result<()>
    where
        R: CryptoRng + RngCore,
    {
        let curve = self.negotiated_curve.ok_or(Error::KeyGeneration {
            curve: "unset",
            details: "no negotiated curve",
        })?;
        self.key_pair = Some(EphemeralKeyPair::generate(curve.kind, rng)?);
        Ok(())
    }

    /// Encode this side's public point; requires a generated key pair.
    pub fn encode_public_point(&self) -> Result<Vec<u8>> {
        let key_pair = self
            .key_pair
            .as_ref()
            .ok_or(Error::Serialization("no ephemeral key pair"))?;
        key_pair.encode_public_point()
    }

    /// Produce-and-send: write the ECDHE params block for the negotiated
    /// curve and generated key pair. Returns the number of bytes written,
    /// always `share_size + 4`.
    pub fn write(&self, out: &mut Writer) -> Result<usize> {
        let curve = self
            .negotiated_curve
            .ok_or(Error::Serialization("no negotiated curve"))?;
        let point = self.encode_public_point()?;

        out.write_u8(CURVE_TYPE_NAMED);
        out.write_u16(curve.wire_id);
        out.write_u8(point.len() as u8);
        out.write_bytes(&point);

        // point + point length (1) + wire id (2) + curve type (1)
        Ok(curve.share_size + 4)
    }

    /// Read an ECDHE params block without resolving or validating it.
    ///
    /// Fails with [`Error::BadMessage`] on an unknown curve-type tag or a
    /// buffer shorter than its own length framing.
    pub fn read<'a>(input: &mut Reader<'a>) -> Result<RawExchangeParams<'a>> {
        let start = input.position();

        let curve_type = input.read_u8()?;
        if curve_type != CURVE_TYPE_NAMED {
            return Err(Error::BadMessage("unknown curve type"));
        }
        let wire_id = input.read_u16()?;
        let point_length = usize::from(input.read_u8()?);
        let point = input.read_bytes(point_length)?;

        Ok(RawExchangeParams {
            wire_id,
            point,
            to_verify: input.consumed_since(start),
        })
    }

    /// Resolve raw params against the registry and validate the peer point,
    /// storing both on success.
    pub fn parse(&mut self, raw: &RawExchangeParams<'_>) -> Result<()> {
        let curve = find_by_wire_id(raw.wire_id).ok_or(Error::UnsupportedCurve {
            wire_id: raw.wire_id,
        })?;
        let point = PublicPoint::decode(raw.point, curve)?;
        self.negotiated_curve = Some(curve);
        self.peer_point = Some(point);
        Ok(())
    }

    /// Receive-and-derive, responder side: consume the peer's
    /// length-prefixed point and derive the shared secret with our own
    /// ephemeral key pair.
    pub fn compute_shared_secret_as_responder(
        &self,
        peer_share: &mut Reader<'_>,
    ) -> Result<SharedSecret> {
        let curve = self
            .negotiated_curve
            .ok_or(Error::SharedSecret("no negotiated curve"))?;
        let key_pair = self
            .key_pair
            .as_ref()
            .ok_or(Error::SharedSecret("no local key pair"))?;

        let point_length = usize::from(peer_share.read_u8()?);
        let octets = peer_share.read_bytes(point_length)?;
        let peer_point = PublicPoint::decode(octets, curve)?;

        compute_shared_secret(key_pair, &peer_point)
    }

    /// Receive-and-derive, initiator side: generate our own ephemeral key
    /// pair, derive against the responder's already-parsed public point,
    /// then append our own length-prefixed point to `own_share_out`.
    ///
    /// The transient key pair is dropped (zeroized) on every path out of
    /// this function, errors included.
    pub fn compute_shared_secret_as_initiator<R>(
        &self,
        rng: &mut R,
        own_share_out: &mut Writer,
    ) -> Result<SharedSecret>
    where
        R: CryptoRng + RngCore,
    {
        let curve = self
            .negotiated_curve
            .ok_or(Error::SharedSecret("no negotiated curve"))?;
        let peer_point = self
            .peer_point
            .as_ref()
            .ok_or(Error::SharedSecret("no peer public point"))?;

        let own_key = EphemeralKeyPair::generate(curve.kind, rng)?;
        let shared = compute_shared_secret(&own_key, peer_point)?;

        let point = own_key.encode_public_point()?;
        own_share_out.write_u8(point.len() as u8);
        own_share_out.write_bytes(&point);

        Ok(shared)
    }

    /// Teardown: release all key material and clear the negotiated curve.
    pub fn clear(&mut self) {
        self.key_pair = None;
        self.peer_point = None;
        self.negotiated_curve = None;
    }
}
