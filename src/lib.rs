//! # keyshare
//!
//! ECDHE key exchange for TLS-style handshakes: ephemeral key pairs on a
//! negotiated named curve, uncompressed-point wire encoding, shared secret
//! derivation, and the client key-share extension that carries one share per
//! supported curve.
//!
//! The crate is split the way the wire protocol is layered:
//!
//! - [`curve`]: the fixed registry of supported named curves
//! - [`kex`]: ephemeral key pairs, point encode/decode, ECDH
//! - [`params`]: per-handshake exchange parameters and their send/receive flows
//! - [`extension`]: the client key-share extension codec
//! - [`wire`]: the bounds-checked byte cursor the codecs read and write through
//!
//! Curve arithmetic is delegated to the RustCrypto `p256`/`p384` crates; this
//! crate owns the wire formats, the per-handshake key material lifecycle, and
//! the lenient-receive policy for peer key shares.
//!
//! ## Example
//!
//! ```
//! use keyshare::{extension, wire::{Reader, Writer}, KeyShareSlots};
//! use rand::rngs::OsRng;
//!
//! # fn main() -> keyshare::Result<()> {
//! // Client offers one share per supported curve.
//! let mut client = KeyShareSlots::new();
//! let mut out = Writer::new();
//! extension::send(&mut client, &mut OsRng, &mut out)?;
//! assert_eq!(out.len(), extension::CLIENT_KEY_SHARE_EXTENSION_SIZE);
//!
//! // Server consumes the extension body (type and data size are handled by
//! // the surrounding extension dispatcher).
//! let mut server = KeyShareSlots::new();
//! let mut body = Reader::new(&out.as_bytes()[4..]);
//! extension::recv(&mut server, &mut body)?;
//! # Ok(())
//! # }
//! ```

pub mod curve;
pub mod error;
pub mod extension;
pub mod kex;
pub mod params;
pub mod wire;

// Re-exports
pub use curve::{find_by_wire_id, CurveKind, NamedCurve, SUPPORTED_CURVES};
pub use error::{Error, Result};
pub use extension::{KeyShareSlots, CLIENT_KEY_SHARE_EXTENSION_SIZE};
pub use kex::{compute_shared_secret, EphemeralKeyPair, PublicPoint, SharedSecret};
pub use params::{ExchangeParameters, RawExchangeParams};
pub use wire::{Reader, Writer};
