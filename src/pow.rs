//! Proof-of-work search and verification

use std::sync::atomic::{AtomicBool, Ordering};

use sha2::{Digest, Sha256};

/// Leading hex characters a guess digest must carry. The difficulty is a
/// fixed design constant; at four zeros a search costs ~65536 hashes in
/// expectation.
pub const DIFFICULTY_PREFIX: &str = "0000";

/// True iff the SHA-256 hex digest of `"{last_proof}{proof}"` (decimal, no
/// separator) starts with [`DIFFICULTY_PREFIX`].
pub fn valid_proof(last_proof: u64, proof: u64) -> bool {
    let guess = format!("{}{}", last_proof, proof);
    let digest = hex::encode(Sha256::digest(guess.as_bytes()));
    digest.starts_with(DIFFICULTY_PREFIX)
}

/// Smallest proof valid against `last_proof`, by linear scan from zero.
///
/// The scan is intentionally shortcut-free: the puzzle has no known faster
/// solution, and the cost of the sequential search is the point. Unbounded
/// in the worst case, bounded only by the caller's patience.
pub fn proof_of_work(last_proof: u64) -> u64 {
    let mut proof = 0;
    while !valid_proof(last_proof, proof) {
        proof += 1;
    }
    proof
}

/// Same scan, but abandons when `cancel` is raised. Used by the node so a
/// search racing a consensus chain replacement can be cut short instead of
/// sealing against a stale tail.
pub fn proof_of_work_interruptible(last_proof: u64, cancel: &AtomicBool) -> Option<u64> {
    let mut proof = 0;
    loop {
        // Poll the flag every 1024 guesses; an atomic load per hash is not
        // worth it.
        if proof % 1024 == 0 && cancel.load(Ordering::Relaxed) {
            return None;
        }
        if valid_proof(last_proof, proof) {
            return Some(proof);
        }
        proof += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_finds_the_smallest_valid_proof() {
        let proof = proof_of_work(100);
        assert!(valid_proof(100, proof));
        for smaller in 0..proof {
            assert!(!valid_proof(100, smaller));
        }
    }

    #[test]
    fn validity_matches_the_digest_predicate() {
        // valid_proof must agree with the raw definition: hex digest of the
        // decimal concatenation, "0000" prefix.
        for (last_proof, proof) in [(100u64, 0u64), (100, 35293), (0, 69732)] {
            let digest = hex::encode(Sha256::digest(format!("{}{}", last_proof, proof)));
            assert_eq!(
                valid_proof(last_proof, proof),
                digest.starts_with(DIFFICULTY_PREFIX)
            );
        }
    }

    #[test]
    fn interruptible_search_matches_plain_search() {
        let cancel = AtomicBool::new(false);
        assert_eq!(
            proof_of_work_interruptible(100, &cancel),
            Some(proof_of_work(100))
        );
    }

    #[test]
    fn raised_flag_aborts_the_search() {
        let cancel = AtomicBool::new(true);
        assert_eq!(proof_of_work_interruptible(100, &cancel), None);
    }
}
