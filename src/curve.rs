// File: src/curve.rs
//! Registry of supported named curves
//!
//! IANA group identifiers can be found in RFC 8446 appendix B.3.1.4; share
//! sizes follow RFC 8446 section 4.2.8.2 and include the leading
//! "legacy_form" byte of the uncompressed point encoding.

/// ECDHE params curve-type tag for a named curve.
pub const CURVE_TYPE_NAMED: u8 = 3;

/// Leading tag byte of an uncompressed SEC1 point encoding.
pub const UNCOMPRESSED_POINT_TAG: u8 = 4;

/// Number of entries in [`SUPPORTED_CURVES`].
pub const SUPPORTED_CURVE_COUNT: usize = 2;

/// Identity of a supported curve.
///
/// One variant per registry entry. All slot storage is addressed through
/// [`CurveKind::slot_index`], which is the single mapping between curve
/// identity and per-handshake slot position; the registry is laid out in the
/// same order and that correspondence is checked by test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    Secp256r1,
    Secp384r1,
}

impl CurveKind {
    /// Position of this curve's slot in a per-handshake slot array.
    pub const fn slot_index(self) -> usize {
        match self {
            CurveKind::Secp256r1 => 0,
            CurveKind::Secp384r1 => 1,
        }
    }

    /// Registry entry for this curve.
    pub fn curve(self) -> &'static NamedCurve {
        &SUPPORTED_CURVES[self.slot_index()]
    }
}

/// A named curve as negotiated on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedCurve {
    /// IANA group identifier sent on the wire.
    pub wire_id: u16,
    /// Curve identity, used to instantiate arithmetic and address slots.
    pub kind: CurveKind,
    /// Display name.
    pub name: &'static str,
    /// Length of this curve's key share: one tag byte plus two coordinates.
    /// Fixed per curve, never derived from peer data.
    pub share_size: usize,
}

impl NamedCurve {
    /// Byte length of one field element, which is also the length of the
    /// ECDH shared secret on this curve.
    pub const fn field_size(&self) -> usize {
        (self.share_size - 1) / 2
    }
}

// Const alias so extension-size precomputation can run at compile time
// (statics are not readable in const context).
pub(crate) const CURVE_TABLE: [NamedCurve; SUPPORTED_CURVE_COUNT] = [
    NamedCurve {
        wire_id: 23,
        kind: CurveKind::Secp256r1,
        name: "secp256r1",
        share_size: (32 * 2) + 1,
    },
    NamedCurve {
        wire_id: 24,
        kind: CurveKind::Secp384r1,
        name: "secp384r1",
        share_size: (48 * 2) + 1,
    },
];

/// Supported named curves, in preference order. Immutable after process
/// start and safely shared across concurrent handshakes.
pub static SUPPORTED_CURVES: [NamedCurve; SUPPORTED_CURVE_COUNT] = CURVE_TABLE;

/// Look up a curve by its wire identifier. Linear scan; the table is tiny.
pub fn find_by_wire_id(wire_id: u16) -> Option<&'static NamedCurve> {
    SUPPORTED_CURVES.iter().find(|curve| curve.wire_id == wire_id)
}
