//! Chain validation: hash linkage and proof-of-work continuity

use tracing::debug;

use crate::block::Block;
use crate::pow;

/// Walk the chain from the front, requiring every block to carry the hash
/// of its predecessor and a proof valid against the predecessor's proof.
/// Short-circuits on the first violation. Genesis is exempt, so empty and
/// single-block chains are trivially valid.
pub fn is_valid_chain(chain: &[Block]) -> bool {
    for pair in chain.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);

        if cur.previous_hash != prev.hash() {
            debug!(index = cur.index, "block does not carry its predecessor's hash");
            return false;
        }
        if !pow::valid_proof(prev.proof, cur.proof) {
            debug!(index = cur.index, "proof of work does not continue the chain");
            return false;
        }
    }
    true
}
