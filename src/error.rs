// File: src/error.rs
//! Error handling for key exchange operations
//!
//! One crate-wide error enum covers the fatal failure kinds of the ECDHE
//! core. The client key-share receive path deliberately treats some
//! malformed share entries as skippable rather than fatal; those never
//! surface here (see [`crate::extension::ShareVerdict`]).

use thiserror::Error;

/// Error type for ECDHE key exchange and key-share codec operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A named group identifier with no entry in the curve registry, on a
    /// path where the curve must resolve (fatal to that negotiation).
    #[error("unsupported named curve: wire id {wire_id}")]
    UnsupportedCurve { wire_id: u16 },

    /// Malformed peer input: truncated buffer, bad length framing, or an
    /// undecodable point on a path where the curve was already fixed.
    /// Aborts the handshake.
    #[error("bad message: {0}")]
    BadMessage(&'static str),

    /// The arithmetic library could not produce a valid ephemeral key pair.
    #[error("ephemeral key generation failed on {curve}: {details}")]
    KeyGeneration {
        curve: &'static str,
        details: &'static str,
    },

    /// ECDH derivation failed or produced a result of unexpected length.
    #[error("shared secret computation failed: {0}")]
    SharedSecret(&'static str),

    /// Point encoding exceeded the protocol's length field or did not fill
    /// the reserved buffer exactly.
    #[error("point serialization failed: {0}")]
    Serialization(&'static str),
}

/// Result type for key exchange operations
pub type Result<T> = core::result::Result<T, Error>;
