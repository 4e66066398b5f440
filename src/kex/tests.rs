// File: src/kex/tests.rs
use super::*;
use crate::curve::SUPPORTED_CURVES;
use crate::Error;
use rand::rngs::OsRng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn shared_secret_is_symmetric_on_every_curve() {
    let mut rng = OsRng;
    for curve in SUPPORTED_CURVES.iter() {
        let alice = EphemeralKeyPair::generate(curve.kind, &mut rng).unwrap();
        let bob = EphemeralKeyPair::generate(curve.kind, &mut rng).unwrap();

        let alice_secret = compute_shared_secret(&alice, &bob.public_point()).unwrap();
        let bob_secret = compute_shared_secret(&bob, &alice.public_point()).unwrap();

        assert_eq!(
            alice_secret.as_bytes(),
            bob_secret.as_bytes(),
            "shared secrets should match on {}",
            curve.name
        );
        assert_eq!(alice_secret.len(), curve.field_size());
    }
}

#[test]
fn encoded_point_has_fixed_share_size_and_tag() {
    let mut rng = OsRng;
    for curve in SUPPORTED_CURVES.iter() {
        let key_pair = EphemeralKeyPair::generate(curve.kind, &mut rng).unwrap();
        let encoded = key_pair.encode_public_point().unwrap();
        assert_eq!(encoded.len(), curve.share_size, "{}", curve.name);
        assert_eq!(encoded[0], UNCOMPRESSED_POINT_TAG);
    }
}

#[test]
fn point_encoding_round_trips() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    for curve in SUPPORTED_CURVES.iter() {
        let key_pair = EphemeralKeyPair::generate(curve.kind, &mut rng).unwrap();
        let encoded = key_pair.encode_public_point().unwrap();
        let decoded = PublicPoint::decode(&encoded, curve).unwrap();
        assert_eq!(decoded, key_pair.public_point());
        assert_eq!(decoded.encode().unwrap(), encoded);
    }
}

#[test]
fn distinct_key_pairs_produce_distinct_points() {
    let mut rng = OsRng;
    let a = EphemeralKeyPair::generate(CurveKind::Secp256r1, &mut rng).unwrap();
    let b = EphemeralKeyPair::generate(CurveKind::Secp256r1, &mut rng).unwrap();
    assert_ne!(a.public_point(), b.public_point());
}

#[test]
fn truncated_point_is_rejected() {
    let mut rng = OsRng;
    for curve in SUPPORTED_CURVES.iter() {
        let key_pair = EphemeralKeyPair::generate(curve.kind, &mut rng).unwrap();
        let mut encoded = key_pair.encode_public_point().unwrap();
        encoded.pop();
        let result = PublicPoint::decode(&encoded, curve);
        assert!(matches!(result, Err(Error::BadMessage(_))));
    }
}

#[test]
fn wrong_tag_byte_is_rejected() {
    let mut rng = OsRng;
    for curve in SUPPORTED_CURVES.iter() {
        let key_pair = EphemeralKeyPair::generate(curve.kind, &mut rng).unwrap();
        let mut encoded = key_pair.encode_public_point().unwrap();
        encoded[0] = 0x05;
        assert!(matches!(
            PublicPoint::decode(&encoded, curve),
            Err(Error::BadMessage(_))
        ));

        // Compressed form is not accepted either, even at the right length
        // for its own tag.
        encoded[0] = 0x02;
        assert!(matches!(
            PublicPoint::decode(&encoded[..curve.field_size() + 1], curve),
            Err(Error::BadMessage(_))
        ));
    }
}

#[test]
fn off_curve_coordinates_are_rejected() {
    for curve in SUPPORTED_CURVES.iter() {
        // Valid tag and length, but (0, 0) does not satisfy either curve
        // equation.
        let mut octets = vec![0u8; curve.share_size];
        octets[0] = UNCOMPRESSED_POINT_TAG;
        assert!(matches!(
            PublicPoint::decode(&octets, curve),
            Err(Error::BadMessage(_))
        ));
    }
}

#[test]
fn point_decoded_against_wrong_curve_is_rejected() {
    let mut rng = OsRng;
    let p256_key = EphemeralKeyPair::generate(CurveKind::Secp256r1, &mut rng).unwrap();
    let encoded = p256_key.encode_public_point().unwrap();
    // 65 bytes can never be a secp384r1 share.
    let result = PublicPoint::decode(&encoded, CurveKind::Secp384r1.curve());
    assert!(matches!(result, Err(Error::BadMessage(_))));
}

#[test]
fn mismatched_curves_cannot_derive_a_secret() {
    let mut rng = OsRng;
    let own = EphemeralKeyPair::generate(CurveKind::Secp256r1, &mut rng).unwrap();
    let peer = EphemeralKeyPair::generate(CurveKind::Secp384r1, &mut rng).unwrap();
    let result = compute_shared_secret(&own, &peer.public_point());
    assert!(matches!(result, Err(Error::SharedSecret(_))));
}

#[test]
fn shared_secret_debug_is_redacted() {
    let mut rng = OsRng;
    let a = EphemeralKeyPair::generate(CurveKind::Secp256r1, &mut rng).unwrap();
    let b = EphemeralKeyPair::generate(CurveKind::Secp256r1, &mut rng).unwrap();
    let secret = compute_shared_secret(&a, &b.public_point()).unwrap();
    let rendered = format!("{:?}", secret);
    assert!(rendered.contains("REDACTED"));
    assert!(!rendered.contains(&hex::encode(secret.as_bytes())));
}
