//! PDA derivation utilities for Squads accounts.
//!
//! Provides functions to derive Program Derived Addresses (PDAs) for every
//! account the Squads program owns. Seed order is part of the program ABI:
//! a reordered or misspelled seed yields a different address without error.

use solana_sdk::pubkey::Pubkey;

use crate::address::find_program_address;
use crate::error::SdkError;

/// Seed suffix of the squad account.
pub const SQUAD_SEED: &[u8] = b"!squad";

/// Seed suffix of the squad mint (the mint owner).
pub const SQUAD_MINT_SEED: &[u8] = b"!squadmint";

/// Seed suffix of the squad SOL treasury.
pub const SQUAD_TREASURY_SEED: &[u8] = b"!squadsol";

/// Seed suffix of a member's equity account.
pub const MEMBER_EQUITY_SEED: &[u8] = b"!memberequity";

/// Seed suffix of a proposal account.
pub const PROPOSAL_SEED: &[u8] = b"!proposal";

/// Seed suffix of a vote record.
pub const VOTE_SEED: &[u8] = b"!vote";

/// Derives the squad PDA.
///
/// Seeds: `[admin, random_id, b"!squad"]`
///
/// # Errors
///
/// Returns an error if `random_id` is longer than a seed allows.
pub fn derive_squad_address(
    program_id: &Pubkey,
    admin: &Pubkey,
    random_id: &str,
) -> Result<(Pubkey, u8), SdkError> {
    find_program_address(
        &[admin.as_ref(), random_id.as_bytes(), SQUAD_SEED],
        program_id,
    )
    .map(Into::into)
}

/// Derives the squad mint PDA, which also acts as the mint owner.
///
/// Seeds: `[squad, b"!squadmint"]`
///
/// # Errors
///
/// Returns an error only if the bump search is exhausted.
pub fn derive_mint_owner_address(
    program_id: &Pubkey,
    squad: &Pubkey,
) -> Result<(Pubkey, u8), SdkError> {
    find_program_address(&[squad.as_ref(), SQUAD_MINT_SEED], program_id).map(Into::into)
}

/// Derives the squad SOL treasury PDA.
///
/// Seeds: `[squad, b"!squadsol"]`
///
/// # Errors
///
/// Returns an error only if the bump search is exhausted.
pub fn derive_squad_treasury_address(
    program_id: &Pubkey,
    squad: &Pubkey,
) -> Result<(Pubkey, u8), SdkError> {
    find_program_address(&[squad.as_ref(), SQUAD_TREASURY_SEED], program_id).map(Into::into)
}

/// Derives a member's equity PDA.
///
/// Seeds: `[squad, member, b"!memberequity"]`
///
/// # Errors
///
/// Returns an error only if the bump search is exhausted.
pub fn derive_member_equity_address(
    program_id: &Pubkey,
    member: &Pubkey,
    squad: &Pubkey,
) -> Result<(Pubkey, u8), SdkError> {
    find_program_address(
        &[squad.as_ref(), member.as_ref(), MEMBER_EQUITY_SEED],
        program_id,
    )
    .map(Into::into)
}

/// Derives a proposal PDA from the squad's proposal nonce.
///
/// Seeds: `[squad, nonce (i32 LE), b"!proposal"]`
///
/// # Errors
///
/// Returns an error only if the bump search is exhausted.
pub fn derive_proposal_address(
    program_id: &Pubkey,
    squad: &Pubkey,
    nonce: i32,
) -> Result<(Pubkey, u8), SdkError> {
    let nonce = nonce.to_le_bytes();
    find_program_address(&[squad.as_ref(), &nonce, PROPOSAL_SEED], program_id).map(Into::into)
}

/// Derives a member's vote record PDA on a proposal.
///
/// Seeds: `[proposal, member, b"!vote"]`
///
/// # Errors
///
/// Returns an error only if the bump search is exhausted.
pub fn derive_vote_address(
    program_id: &Pubkey,
    proposal: &Pubkey,
    member: &Pubkey,
) -> Result<(Pubkey, u8), SdkError> {
    find_program_address(&[proposal.as_ref(), member.as_ref(), VOTE_SEED], program_id)
        .map(Into::into)
}

/// Collection of the squad-level PDAs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquadPdas {
    /// Squad address.
    pub squad: Pubkey,
    /// Squad bump. `None` when the squad address was supplied, not derived.
    pub squad_bump: Option<u8>,
    /// Squad mint (mint owner) address.
    pub mint_owner: Pubkey,
    /// Squad mint bump.
    pub mint_owner_bump: u8,
    /// SOL treasury address.
    pub treasury: Pubkey,
    /// SOL treasury bump.
    pub treasury_bump: u8,
}

impl SquadPdas {
    /// Derives all squad PDAs from the admin and random id.
    ///
    /// # Errors
    ///
    /// Returns an error if any derivation fails.
    pub fn derive(program_id: &Pubkey, admin: &Pubkey, random_id: &str) -> Result<Self, SdkError> {
        let (squad, squad_bump) = derive_squad_address(program_id, admin, random_id)?;
        let mut pdas = Self::from_squad(program_id, &squad)?;
        pdas.squad_bump = Some(squad_bump);
        Ok(pdas)
    }

    /// Derives squad PDAs from an existing squad address.
    ///
    /// # Errors
    ///
    /// Returns an error if any derivation fails.
    pub fn from_squad(program_id: &Pubkey, squad: &Pubkey) -> Result<Self, SdkError> {
        let (mint_owner, mint_owner_bump) = derive_mint_owner_address(program_id, squad)?;
        let (treasury, treasury_bump) = derive_squad_treasury_address(program_id, squad)?;

        Ok(Self {
            squad: *squad,
            squad_bump: None,
            mint_owner,
            mint_owner_bump,
            treasury,
            treasury_bump,
        })
    }
}
