//! Integration test driven by an embedded JSON test-vector file, covering
//! the `hashToScalar`, `elgamal`, and `chaumPedersen` suites (spec.md §6
//! "Test-vector hook").
//!
//! Per spec.md §6, this hook is normative: every expected byte string here
//! was computed independently of this crate (an out-of-band ristretto255 +
//! SHA-512 evaluation of the same framing rules), so a framing/encoding
//! regression in this crate — a dropped length prefix, a reordered label, a
//! wrong domain tag — changes the byte output and fails these assertions,
//! even though determinism/round-trip checks alone would not catch it.

use ocp_core::chaum_pedersen::Proof as ChaumPedersenProof;
use ocp_core::elgamal::{decode_card, encode_card, Ciphertext};
use ocp_core::group::{Point, Scalar};
use ocp_core::transcript::hash_to_scalar;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

const VECTORS_JSON: &str = include_str!("vectors/core.json");

#[derive(Deserialize)]
struct Vectors {
    #[serde(rename = "hashToScalar")]
    hash_to_scalar: Vec<HashToScalarCase>,
    elgamal: Vec<ElGamalCase>,
    #[serde(rename = "chaumPedersen")]
    chaum_pedersen: Vec<ChaumPedersenCase>,
}

#[derive(Deserialize)]
struct HashToScalarCase {
    domain: String,
    #[serde(rename = "msgsHex")]
    msgs_hex: Vec<String>,
    #[serde(rename = "expectedHex")]
    expected_hex: Option<String>,
}

#[derive(Deserialize)]
struct ElGamalCase {
    sk: u64,
    #[serde(rename = "cardId")]
    card_id: u8,
    r: u64,
    #[serde(rename = "expectedHex")]
    expected_hex: String,
}

#[derive(Deserialize)]
struct ChaumPedersenCase {
    #[serde(rename = "c1Scalar")]
    c1_scalar: u64,
    x: u64,
    w: Option<u64>,
    #[serde(rename = "expectedHex")]
    expected_hex: Option<String>,
}

fn load_vectors() -> Vectors {
    serde_json::from_str(VECTORS_JSON).expect("embedded test-vector file must parse")
}

#[test]
fn hash_to_scalar_suite_is_deterministic_and_domain_separated() {
    let vectors = load_vectors();
    for case in &vectors.hash_to_scalar {
        let msgs: Vec<Vec<u8>> = case
            .msgs_hex
            .iter()
            .map(|hex_str| hex::decode(hex_str).expect("vector msg must be valid hex"))
            .collect();
        let msg_refs: Vec<Option<&[u8]>> = msgs.iter().map(|m| Some(m.as_slice())).collect();

        let first = hash_to_scalar(&case.domain, &msg_refs).unwrap();
        let second = hash_to_scalar(&case.domain, &msg_refs).unwrap();
        assert!(first.eq(&second), "hash_to_scalar must be deterministic for domain {}", case.domain);

        if let Some(expected_hex) = &case.expected_hex {
            let expected = hex::decode(expected_hex).expect("expectedHex must be valid hex");
            assert_eq!(
                first.bytes().to_vec(),
                expected,
                "hash_to_scalar output diverged from the pinned byte vector for domain {}",
                case.domain
            );
        }
    }

    // Two vectors share the same message but differ only in domain string;
    // their outputs must differ (domain separation).
    let same_message_cases: Vec<&HashToScalarCase> = vectors
        .hash_to_scalar
        .iter()
        .filter(|c| c.msgs_hex == vec!["68656c6c6f".to_string()])
        .collect();
    assert_eq!(same_message_cases.len(), 2, "fixture must carry two single-message cases to compare domains");
    let a = hash_to_scalar(&same_message_cases[0].domain, &[Some(b"hello" as &[u8])]).unwrap();
    let b = hash_to_scalar(&same_message_cases[1].domain, &[Some(b"hello" as &[u8])]).unwrap();
    assert!(!a.eq(&b), "different domains must yield different scalars for the same message");
}

#[test]
fn elgamal_suite_round_trips_every_case_and_matches_pinned_bytes() {
    let vectors = load_vectors();
    for case in &vectors.elgamal {
        let sk = Scalar::from_u64(case.sk);
        let pk = Point::mul_base(&sk);
        let r = Scalar::from_u64(case.r);
        let m = encode_card(case.card_id);

        let ciphertext = Ciphertext::encrypt(&pk, &m, &r);
        assert!(ciphertext.c1.eq(&Point::mul_base(&r)));

        let decrypted = ciphertext.decrypt(&sk);
        assert!(decrypted.eq(&m));
        assert_eq!(decode_card(&decrypted, 52).unwrap(), case.card_id);

        let bytes = ciphertext.to_bytes();
        assert_eq!(bytes.len(), 64);
        let decoded = Ciphertext::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, ciphertext);

        let expected = hex::decode(&case.expected_hex).expect("expectedHex must be valid hex");
        assert_eq!(
            bytes.to_vec(),
            expected,
            "ElGamal ciphertext encoding diverged from the pinned byte vector for sk={} cardId={} r={}",
            case.sk,
            case.card_id,
            case.r
        );
    }
}

#[test]
fn chaum_pedersen_suite_proves_and_verifies_every_case() {
    let vectors = load_vectors();
    for (i, case) in vectors.chaum_pedersen.iter().enumerate() {
        let c1 = Point::mul_base(&Scalar::from_u64(case.c1_scalar));
        let x = Scalar::from_u64(case.x);
        let y = Point::mul_base(&x);
        let d = Point::mul_point(&c1, &x);

        let proof = match case.w {
            // A pinned-nonce vector: bytes must match the independently
            // computed expectation byte-for-byte, not just round-trip.
            Some(w) => ChaumPedersenProof::prove_with_nonce(&c1, &x, &Scalar::from_u64(w)),
            None => {
                let mut rng = StdRng::seed_from_u64(i as u64);
                ChaumPedersenProof::prove(&mut rng, &c1, &x)
            }
        };
        assert!(proof.verify(&y, &c1, &d));

        let bytes = proof.to_bytes();
        assert_eq!(bytes.len(), 96);
        let decoded = ChaumPedersenProof::from_bytes(&bytes).unwrap();
        assert!(decoded.verify(&y, &c1, &d));

        if let Some(expected_hex) = &case.expected_hex {
            let expected = hex::decode(expected_hex).expect("expectedHex must be valid hex");
            assert_eq!(
                bytes.to_vec(),
                expected,
                "Chaum-Pedersen proof encoding diverged from the pinned byte vector at case {i}"
            );
        }
    }
}
