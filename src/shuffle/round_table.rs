//! Pair/single placement for one shuffle round: a pure function of `(n,
//! round_index)` that the prover and verifier both call, so round structure
//! never needs to travel on the wire (spec.md §9 "Shuffle round table").

/// Partition `{0..n-1}` into adjacent pairs and leftover singles for round
/// `round_index`. Round parity alternates the starting offset: even rounds
/// start at 0, odd rounds start at 1 (spec.md §4.7 step 3).
pub fn partition(n: u16, round_index: u16) -> (Vec<(u16, u16)>, Vec<u16>) {
    let start = round_index % 2;
    let mut pairs = Vec::new();
    let mut singles = Vec::new();

    if start == 1 && n > 0 {
        singles.push(0);
    }

    let mut i = start;
    while i + 1 < n {
        pairs.push((i, i + 1));
        i += 2;
    }
    if i < n {
        singles.push(i);
    }

    (pairs, singles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn assert_partitions(n: u16, round_index: u16) {
        let (pairs, singles) = partition(n, round_index);
        let mut covered = BTreeSet::new();
        for (a, b) in &pairs {
            assert!(covered.insert(*a), "index {a} covered twice");
            assert!(covered.insert(*b), "index {b} covered twice");
        }
        for s in &singles {
            assert!(covered.insert(*s), "index {s} covered twice");
        }
        let expected: BTreeSet<u16> = (0..n).collect();
        assert_eq!(covered, expected, "n={n} round={round_index} did not partition fully");
        assert!(singles.len() <= 2);
    }

    #[test]
    fn partitions_for_small_n_both_parities() {
        for n in 2u16..=64 {
            for round in 0u16..=1 {
                assert_partitions(n, round);
            }
        }
    }

    #[test]
    fn even_n_odd_round_has_two_singles_at_edges() {
        let (_, singles) = partition(10, 1);
        assert_eq!(singles, vec![0, 9]);
    }

    #[test]
    fn odd_n_even_round_has_single_at_end() {
        let (_, singles) = partition(5, 0);
        assert_eq!(singles, vec![4]);
    }

    #[test]
    fn odd_n_odd_round_has_single_at_start() {
        let (_, singles) = partition(5, 1);
        assert_eq!(singles, vec![0]);
    }

    proptest::proptest! {
        #[test]
        fn partitions_for_any_n_and_round_parity(n in 2u16..200, round in 0u16..2) {
            assert_partitions(n, round);
        }
    }
}
