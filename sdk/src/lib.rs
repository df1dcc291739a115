//! Squads SDK - Rust client library for the Squads program.
//!
//! This crate encodes instructions for the Squads squad-governance program on
//! Solana. It performs no I/O: builders produce ready-to-sign
//! [`Instruction`](solana_sdk::instruction::Instruction)s and append them to a
//! caller-owned batch, and a separate transport submits them.
//!
//! # Layers
//!
//! - [`layout`] - Fixed-span field layouts and the [`Structure`] composite
//! - [`schema`] - Instruction kinds, their payload schemas and argument records
//! - [`address`] - Generic program-derived address search
//! - [`instructions`] - Squads seed conventions and instruction builders
//! - [`config`] - Program identifiers per cluster
//!
//! # Example
//!
//! ```rust
//! use squads_sdk::{CastVoteBuilder, ProgramConfig};
//! use solana_sdk::pubkey::Pubkey;
//!
//! let ix = CastVoteBuilder::new(ProgramConfig::default())
//!     .payer(Pubkey::new_unique())
//!     .squad(Pubkey::new_unique())
//!     .proposal(Pubkey::new_unique())
//!     .vote(0)
//!     .build()
//!     .expect("should build instruction");
//!
//! assert_eq!(ix.data, vec![3, 0]);
//! ```

pub mod address;
pub mod config;
pub mod error;
pub mod instructions;
pub mod layout;
pub mod schema;

pub use address::{create_program_address, find_program_address, DerivedAddress};
pub use config::{Cluster, ProgramConfig};
pub use error::SdkError;
pub use instructions::{
    add_signer, mark_writable, AddMembersToSquadBuilder, CastVoteBuilder, CreateProposalBuilder,
    CreateSquadBuilder, CreatedSquad, ExecuteProposalBuilder, InstructionBatch, SquadPdas,
};
pub use layout::{Field, FieldValue, Layout, Record, Structure};
pub use schema::{decode_instruction, ProposalType, SquadsInstruction, SquadsInstructionArgs};
