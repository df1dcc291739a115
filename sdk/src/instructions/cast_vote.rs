//! CastVote instruction builder.
//!
//! Builds the instruction through which a member votes on a proposal. The
//! payer votes with its own equity; the vote record is derived from the
//! proposal and the payer.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::config::ProgramConfig;
use crate::error::SdkError;
use crate::schema::{CastVoteArgs, SquadsInstructionArgs};

use super::batch::InstructionBatch;
use super::pda::{derive_member_equity_address, derive_mint_owner_address, derive_vote_address};

/// Builder for the CastVote instruction.
#[derive(Debug, Clone)]
pub struct CastVoteBuilder {
    config: ProgramConfig,
    payer: Option<Pubkey>,
    squad: Option<Pubkey>,
    proposal: Option<Pubkey>,
    vote: Option<u8>,
    squad_mint: Option<Pubkey>,
    member_equity: Option<Pubkey>,
}

impl CastVoteBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(config: ProgramConfig) -> Self {
        Self {
            config,
            payer: None,
            squad: None,
            proposal: None,
            vote: None,
            squad_mint: None,
            member_equity: None,
        }
    }

    /// Sets the voting member, who pays for the vote record.
    #[must_use]
    pub fn payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    /// Sets the squad.
    #[must_use]
    pub fn squad(mut self, squad: Pubkey) -> Self {
        self.squad = Some(squad);
        self
    }

    /// Sets the proposal.
    #[must_use]
    pub fn proposal(mut self, proposal: Pubkey) -> Self {
        self.proposal = Some(proposal);
        self
    }

    /// Sets the index of the chosen vote label.
    #[must_use]
    pub fn vote(mut self, vote: u8) -> Self {
        self.vote = Some(vote);
        self
    }

    /// Sets an already derived squad mint.
    #[must_use]
    pub fn squad_mint(mut self, squad_mint: Pubkey) -> Self {
        self.squad_mint = Some(squad_mint);
        self
    }

    /// Sets the payer's already derived equity account.
    #[must_use]
    pub fn member_equity(mut self, member_equity: Pubkey) -> Self {
        self.member_equity = Some(member_equity);
        self
    }

    /// Builds the instruction.
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is not set or a derivation fails.
    pub fn build(self) -> Result<Instruction, SdkError> {
        self.build_with_vote_account().map(|(instruction, _)| instruction)
    }

    fn build_with_vote_account(self) -> Result<(Instruction, Pubkey), SdkError> {
        let payer = self
            .payer
            .ok_or_else(|| SdkError::MissingField("payer not set".to_string()))?;
        let squad = self
            .squad
            .ok_or_else(|| SdkError::MissingField("squad not set".to_string()))?;
        let proposal = self
            .proposal
            .ok_or_else(|| SdkError::MissingField("proposal not set".to_string()))?;
        let vote = self
            .vote
            .ok_or_else(|| SdkError::MissingField("vote not set".to_string()))?;
        self.config.validate()?;

        let program_id = &self.config.program_id;
        let squad_mint = match self.squad_mint {
            Some(squad_mint) => squad_mint,
            None => derive_mint_owner_address(program_id, &squad)?.0,
        };
        let member_equity = match self.member_equity {
            Some(member_equity) => member_equity,
            None => derive_member_equity_address(program_id, &payer, &squad)?.0,
        };
        let (vote_account, _) = derive_vote_address(program_id, &proposal, &payer)?;

        let accounts = vec![
            AccountMeta::new(payer, true),
            AccountMeta::new(squad, false),
            AccountMeta::new_readonly(squad_mint, false),
            AccountMeta::new(proposal, false),
            AccountMeta::new_readonly(member_equity, false),
            AccountMeta::new(vote_account, false),
            AccountMeta::new_readonly(self.config.system_program, false),
            AccountMeta::new_readonly(self.config.rent_sysvar, false),
            AccountMeta::new_readonly(self.config.program_id, false),
        ];

        let data = SquadsInstructionArgs::from(CastVoteArgs::new(vote)).encode()?;

        let instruction = Instruction {
            program_id: self.config.program_id,
            accounts,
            data,
        };
        Ok((instruction, vote_account))
    }

    /// Builds the instruction, appends it to `batch` and returns the vote
    /// record address.
    ///
    /// Nothing is appended when building fails.
    ///
    /// # Errors
    ///
    /// Returns an error if building fails.
    pub fn append_to(self, batch: &mut InstructionBatch) -> Result<Pubkey, SdkError> {
        let (instruction, vote_account) = self.build_with_vote_account()?;
        tracing::debug!(%vote_account, "built CastVote");
        batch.push(instruction);
        Ok(vote_account)
    }
}
