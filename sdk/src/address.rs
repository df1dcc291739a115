//! Program-derived address search.
//!
//! A program-derived address is `SHA-256(seeds || bump || program_id ||
//! "ProgramDerivedAddress")`, accepted only when the hash is *not* a valid
//! compressed Ed25519 point, so no private key can sign for it. The bump is
//! searched from 255 downwards and the first off-curve hash wins.
//!
//! The seed convention is the caller's business: a single differing byte
//! yields a different address with no error.

use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

use crate::error::SdkError;

/// Domain separator appended to every derivation hash.
pub const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Maximum number of seeds, bump included.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed in bytes.
pub const MAX_SEED_LEN: usize = 32;

/// A derived address together with the bump that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedAddress {
    /// The derived address.
    pub address: Pubkey,
    /// The bump seed appended to reach it.
    pub bump: u8,
}

impl From<DerivedAddress> for (Pubkey, u8) {
    fn from(derived: DerivedAddress) -> Self {
        (derived.address, derived.bump)
    }
}

fn check_seeds(seeds: &[&[u8]], limit: usize) -> Result<(), SdkError> {
    if seeds.len() > limit {
        return Err(SdkError::InvalidSeeds(format!(
            "{} seeds given, at most {limit} allowed",
            seeds.len()
        )));
    }
    if let Some((index, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(SdkError::InvalidSeeds(format!(
            "seed {index} is {} bytes, at most {MAX_SEED_LEN} allowed",
            seed.len()
        )));
    }
    Ok(())
}

fn hash_seeds(seeds: &[&[u8]], bump: Option<u8>, program_id: &Pubkey) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    if let Some(bump) = bump {
        hasher.update([bump]);
    }
    hasher.update(program_id.as_ref());
    hasher.update(PDA_MARKER);
    hasher.finalize().into()
}

/// Returns true if `bytes` decompress to a point on the Ed25519 curve.
#[must_use]
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}

/// Derives the address for `seeds` as given, with no bump search.
///
/// `seeds` normally ends with a bump previously found by
/// [`find_program_address`].
///
/// # Errors
///
/// Returns [`SdkError::InvalidSeeds`] if the seeds break the length limits
/// or the hash lands on the curve.
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey, SdkError> {
    check_seeds(seeds, MAX_SEEDS)?;
    let hash = hash_seeds(seeds, None, program_id);
    if is_on_curve(&hash) {
        return Err(SdkError::InvalidSeeds(
            "derived address lies on the ed25519 curve".to_string(),
        ));
    }
    Ok(Pubkey::new_from_array(hash))
}

/// Finds the off-curve address for `seeds` and the highest bump reaching it.
///
/// Deterministic for fixed inputs.
///
/// # Errors
///
/// Returns [`SdkError::InvalidSeeds`] if the seeds break the length limits
/// (one seed slot is reserved for the bump), or
/// [`SdkError::DerivationExhausted`] if every bump lands on the curve.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<DerivedAddress, SdkError> {
    check_seeds(seeds, MAX_SEEDS - 1)?;

    for bump in (0..=u8::MAX).rev() {
        let hash = hash_seeds(seeds, Some(bump), program_id);
        if is_on_curve(&hash) {
            tracing::trace!(bump, "bump candidate lies on curve, trying next");
            continue;
        }
        return Ok(DerivedAddress {
            address: Pubkey::new_from_array(hash),
            bump,
        });
    }

    Err(SdkError::DerivationExhausted)
}
