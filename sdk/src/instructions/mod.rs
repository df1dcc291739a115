//! Instruction builders for Squads transactions.
//!
//! This module provides builders for constructing Solana instructions for the
//! Squads operations this crate supports. Each builder derives the addresses
//! it was not given, normalizes its arguments, encodes the payload against the
//! instruction schema and lays out the accounts in program order.
//!
//! Builders either return the [`Instruction`](solana_sdk::instruction::Instruction)
//! from `build()` or append it to a caller-owned [`InstructionBatch`] with
//! `append_to()`. Nothing is appended when building fails.
//!
//! # Example
//!
//! ```rust
//! use squads_sdk::config::ProgramConfig;
//! use squads_sdk::instructions::{
//!     AddMembersToSquadBuilder, CreateSquadBuilder, InstructionBatch,
//! };
//! use solana_sdk::pubkey::Pubkey;
//!
//! let config = ProgramConfig::default();
//! let admin = Pubkey::new_unique();
//! let mut batch = InstructionBatch::new();
//!
//! let created = CreateSquadBuilder::new(config)
//!     .payer(admin)
//!     .squad_name("core team")
//!     .token("CORE")
//!     .append_to(&mut batch)
//!     .expect("should build instruction");
//!
//! AddMembersToSquadBuilder::new(config)
//!     .initializer(admin)
//!     .squad(created.squad)
//!     .mint_owner(created.mint_owner)
//!     .member(admin, 100_000)
//!     .append_to(&mut batch)
//!     .expect("should build instruction");
//!
//! assert_eq!(batch.len(), 2);
//! ```

pub mod add_members;
pub mod batch;
pub mod cast_vote;
pub mod create_proposal;
pub mod create_squad;
pub mod execute_proposal;
pub mod fixup;
pub mod pda;

pub use add_members::AddMembersToSquadBuilder;
pub use batch::InstructionBatch;
pub use cast_vote::CastVoteBuilder;
pub use create_proposal::CreateProposalBuilder;
pub use create_squad::{generate_random_id, CreateSquadBuilder, CreatedSquad};
pub use execute_proposal::ExecuteProposalBuilder;
pub use fixup::{add_signer, mark_writable};
pub use pda::{
    derive_member_equity_address, derive_mint_owner_address, derive_proposal_address,
    derive_squad_address, derive_squad_treasury_address, derive_vote_address, SquadPdas,
};
