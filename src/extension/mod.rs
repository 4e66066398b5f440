// File: src/extension/mod.rs
//! Client key-share extension codec
//!
//! Structure (all integers big-endian):
//!
//! ```text
//! Extension type (2 bytes)
//! Extension data size (2 bytes)
//! Client shares size (2 bytes)
//! Client shares:
//!     Named group (2 bytes)
//!     Key share size (2 bytes)
//!     Key share (variable size)
//! ```
//!
//! Sending always offers one share per registry curve, in registry order,
//! so the extension size is a compile-time constant.
//!
//! Receiving does NOT reject a peer that violates the RFC. The receive loop
//! accepts:
//! - multiple key shares for the same named group: the first share wins and
//!   later duplicates are ignored, never overwriting accepted material
//! - shares for named groups we do not support: silently skipped
//! - shares whose declared size does not match the curve's fixed share
//!   size: silently skipped
//! - shares whose point fails to decode: the slot is rolled back to empty
//!   and the handshake continues as if that curve had not been offered
//!
//! Only buffer underflow against the declared sizes is fatal. The
//! skip-vs-abort policy is factored into [`vet_share`] so it can be audited
//! and tested apart from the parsing mechanics.

use rand::{CryptoRng, RngCore};

use crate::curve::{
    find_by_wire_id, CurveKind, NamedCurve, CURVE_TABLE, SUPPORTED_CURVES, SUPPORTED_CURVE_COUNT,
};
use crate::error::{Error, Result};
use crate::kex::PublicPoint;
use crate::params::ExchangeParameters;
use crate::wire::{Reader, Writer};


/// key_share extension type, RFC 8446 section 4.2.
pub const TLS_EXTENSION_KEY_SHARE: u16 = 51;

const SIZE_OF_EXTENSION_TYPE: usize = 2;
const SIZE_OF_EXTENSION_DATA_SIZE: usize = 2;
const SIZE_OF_CLIENT_SHARES_SIZE: usize = 2;
const SIZE_OF_NAMED_GROUP: usize = 2;
const SIZE_OF_KEY_SHARE_SIZE: usize = 2;

/// Total wire size of the extension when offering one share per supported
/// curve. Computed at compile time from the registry; immutable and shared
/// across all handshakes.
pub const CLIENT_KEY_SHARE_EXTENSION_SIZE: usize = {
    let mut size = SIZE_OF_EXTENSION_TYPE + SIZE_OF_EXTENSION_DATA_SIZE + SIZE_OF_CLIENT_SHARES_SIZE;
    let mut i = 0;
    while i < CURVE_TABLE.len() {
        size += SIZE_OF_NAMED_GROUP + SIZE_OF_KEY_SHARE_SIZE + CURVE_TABLE[i].share_size;
        i += 1;
    }
    size
};

/// Per-handshake key-share slots, one per registry curve.
///
/// Slots are addressed only through [`CurveKind`], keeping the
/// registry-order correspondence out of caller hands.
#[derive(Debug, Default)]
pub struct KeyShareSlots {
    slots: [ExchangeParameters; SUPPORTED_CURVE_COUNT],
}

impl KeyShareSlots {
    pub fn new() -> Self {
        KeyShareSlots::default()
    }

    pub fn get(&self, kind: CurveKind) -> &ExchangeParameters {
        &self.slots[kind.slot_index()]
    }

    pub fn get_mut(&mut self, kind: CurveKind) -> &mut ExchangeParameters {
        &mut self.slots[kind.slot_index()]
    }

    /// Slots in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &ExchangeParameters> {
        self.slots.iter()
    }
}

/// Why a received share was skipped rather than applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Named group absent from the registry.
    UnsupportedGroup,
    /// The slot for this group already holds an accepted share.
    DuplicateShare,
    /// Declared share size differs from the curve's fixed share size.
    SizeMismatch,
}

/// Disposition of one received share entry: apply it, or skip its bytes.
/// Skips are lenient by design and never abort the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareVerdict {
    Accept(CurveKind),
    Skip(SkipReason),
}

/// Classify one share entry against the registry and the current slots.
pub fn vet_share(slots: &KeyShareSlots, named_group: u16, declared_size: usize) -> ShareVerdict {
    let Some(curve) = find_by_wire_id(named_group) else {
        return ShareVerdict::Skip(SkipReason::UnsupportedGroup);
    };
    if slots.get(curve.kind).negotiated_curve().is_some() {
        return ShareVerdict::Skip(SkipReason::DuplicateShare);
    }
    if declared_size != curve.share_size {
        return ShareVerdict::Skip(SkipReason::SizeMismatch);
    }
    ShareVerdict::Accept(curve.kind)
}

/// Write the full extension: header, then one freshly generated share per
/// registry curve in order. Marks each slot negotiated and leaves the
/// generated key pairs in the slots for later derivation.
///
/// Writes exactly [`CLIENT_KEY_SHARE_EXTENSION_SIZE`] bytes.
pub fn send<R>(slots: &mut KeyShareSlots, rng: &mut R, out: &mut Writer) -> Result<()>
where
    R: CryptoRng + RngCore,
{
    let extension_data_size =
        CLIENT_KEY_SHARE_EXTENSION_SIZE - SIZE_OF_EXTENSION_TYPE - SIZE_OF_EXTENSION_DATA_SIZE;
    let client_shares_size = extension_data_size - SIZE_OF_CLIENT_SHARES_SIZE;

    out.write_u16(TLS_EXTENSION_KEY_SHARE);
    out.write_u16(extension_data_size as u16);
    out.write_u16(client_shares_size as u16);

    for curve in SUPPORTED_CURVES.iter() {
        let slot = slots.get_mut(curve.kind);
        slot.set_negotiated_curve(curve);
        send_share(slot, curve, rng, out)?;
    }

    Ok(())
}

fn send_share<R>(
    slot: &mut ExchangeParameters,
    curve: &'static NamedCurve,
    rng: &mut R,
    out: &mut Writer,
) -> Result<()>
where
    R: CryptoRng + RngCore,
{
    out.write_u16(curve.wire_id);
    out.write_u16(curve.share_size as u16);

    slot.generate_ephemeral_key(rng)?;
    let point = slot.encode_public_point()?;
    out.write_bytes(&point);

    Ok(())
}

/// Parse a peer's extension body, starting at the client-shares size field
/// (extension type and data size belong to the outer extension dispatch).
///
/// Applies the lenient policy described in the module docs; the only fatal
/// condition is a buffer shorter than the sizes it declares, which fails
/// with [`Error::BadMessage`] before any slot is touched (for the header)
/// or mid-loop (for a share). Reads never cross the end of `extension`.
///
/// Termination note: `bytes_processed` advances by each entry's declared
/// size before that size is validated, and the loop exits on
/// `bytes_processed >= key_shares_size`. A final over-declared entry can
/// therefore overshoot the declared total and leave trailing bytes of the
/// body unread. That matches deployed behavior and is pinned by test.
pub fn recv(slots: &mut KeyShareSlots, extension: &mut Reader<'_>) -> Result<()> {
    let key_shares_size = usize::from(extension.read_u16()?);
    if extension.remaining() < key_shares_size {
        return Err(Error::BadMessage("key shares exceed extension body"));
    }

    let mut bytes_processed = 0;
    while bytes_processed < key_shares_size {
        let named_group = extension.read_u16()?;
        let share_size = usize::from(extension.read_u16()?);

        if extension.remaining() < share_size {
            return Err(Error::BadMessage("key share exceeds extension body"));
        }
        bytes_processed += share_size + SIZE_OF_NAMED_GROUP + SIZE_OF_KEY_SHARE_SIZE;

        match vet_share(slots, named_group, share_size) {
            ShareVerdict::Skip(_) => {
                extension.skip(share_size)?;
            }
            ShareVerdict::Accept(kind) => {
                let octets = extension.read_bytes(share_size)?;
                let curve = kind.curve();
                let slot = slots.get_mut(kind);

                // Tentatively claim the slot; an undecodable point rolls it
                // back so a later share for this curve may still land.
                slot.set_negotiated_curve(curve);
                match PublicPoint::decode(octets, curve) {
                    Ok(point) => slot.set_peer_point(point),
                    Err(_) => slot.clear(),
                }
            }
        }
    }

    Ok(())
}
