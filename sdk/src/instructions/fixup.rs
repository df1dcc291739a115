//! Post-processing of built instructions.
//!
//! Some call sites need to promote an account after a builder has run, for
//! instance when a proposal account is created in the same transaction and
//! must sign. Each step consumes an [`Instruction`] and returns a new one.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

/// Marks every reference to `key` as writable.
///
/// Instructions that do not reference `key` are returned unchanged.
#[must_use]
pub fn mark_writable(mut instruction: Instruction, key: &Pubkey) -> Instruction {
    instruction
        .accounts
        .iter_mut()
        .filter(|meta| meta.pubkey == *key)
        .for_each(|meta| meta.is_writable = true);
    instruction
}

/// Marks every reference to `key` as a signer.
///
/// Instructions that do not reference `key` are returned unchanged.
#[must_use]
pub fn add_signer(mut instruction: Instruction, key: &Pubkey) -> Instruction {
    instruction
        .accounts
        .iter_mut()
        .filter(|meta| meta.pubkey == *key)
        .for_each(|meta| meta.is_signer = true);
    instruction
}
