//! Keccak merkle tree over raw 32-byte wallet addresses. The hashing scheme
//! (sorted pairs, `0x01` domain prefix, leaves used unhashed) matches what
//! the on-chain guard verifies against.

use solana_program::keccak;

/// Compute the root for a list of leaves. An empty list yields the zero
/// root, which no proof can satisfy.
pub fn merkle_root(leaves: &[[u8; 32]]) -> [u8; 32] {
    if leaves.is_empty() {
        return [0u8; 32];
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = parent_level(&level);
    }
    level[0]
}

/// Build the sibling path for `leaf`, or `None` when the leaf is not in the
/// list. An odd node at the end of a level is promoted unchanged and
/// contributes no proof element.
pub fn merkle_proof(leaves: &[[u8; 32]], leaf: &[u8; 32]) -> Option<Vec<[u8; 32]>> {
    let mut index = leaves.iter().position(|l| l == leaf)?;
    let mut proof = Vec::new();

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        let sibling = if index % 2 == 0 { index + 1 } else { index - 1 };
        if sibling < level.len() {
            proof.push(level[sibling]);
        }
        level = parent_level(&level);
        index /= 2;
    }

    Some(proof)
}

/// Returns true if a `leaf` can be proved to be a part of a Merkle tree
/// defined by `root`. For this, a `proof` must be provided, containing
/// sibling hashes on the branch from the leaf to the root of the tree. Each
/// pair of leaves and each pair of pre-images are assumed to be sorted.
pub fn verify(proof: &[[u8; 32]], root: &[u8; 32], leaf: &[u8; 32]) -> bool {
    let mut computed_hash = *leaf;
    for proof_element in proof.iter() {
        computed_hash = hash_pair(&computed_hash, proof_element);
    }
    computed_hash == *root
}

fn parent_level(level: &[[u8; 32]]) -> Vec<[u8; 32]> {
    let mut next = Vec::with_capacity((level.len() + 1) / 2);
    for pair in level.chunks(2) {
        match pair {
            [a, b] => next.push(hash_pair(a, b)),
            [a] => next.push(*a),
            _ => unreachable!(),
        }
    }
    next
}

fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    if a <= b {
        keccak::hashv(&[&[0x01], a, b]).0
    } else {
        keccak::hashv(&[&[0x01], b, a]).0
    }
}

#[cfg(test)]
mod tests {
    use solana_sdk::pubkey::Pubkey;

    use super::*;

    fn leaves(n: usize) -> Vec<[u8; 32]> {
        (0..n).map(|_| Pubkey::new_unique().to_bytes()).collect()
    }

    #[test]
    fn proof_round_trip_even_and_odd_lists() {
        for n in [1, 2, 3, 7, 8] {
            let leaves = leaves(n);
            let root = merkle_root(&leaves);

            for leaf in &leaves {
                let proof = merkle_proof(&leaves, leaf).unwrap();
                assert!(verify(&proof, &root, leaf), "n = {n}");
            }
        }
    }

    #[test]
    fn non_member_has_no_proof() {
        let leaves = leaves(4);
        let outsider = Pubkey::new_unique().to_bytes();

        assert!(merkle_proof(&leaves, &outsider).is_none());
    }

    #[test]
    fn proof_for_wrong_leaf_fails() {
        let leaves = leaves(4);
        let root = merkle_root(&leaves);

        let proof = merkle_proof(&leaves, &leaves[0]).unwrap();
        assert!(!verify(&proof, &root, &leaves[1]));
    }

    #[test]
    fn empty_list_accepts_nothing() {
        let root = merkle_root(&[]);
        let leaf = Pubkey::new_unique().to_bytes();

        assert!(!verify(&[], &root, &leaf));
    }
}
