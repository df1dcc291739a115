//! ExecuteProposal instruction builder.
//!
//! Builds the instruction that executes a passed proposal against the squad
//! treasury. The payer appears twice in the account list, at positions 0
//! and 5.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::config::ProgramConfig;
use crate::error::SdkError;
use crate::schema::{ExecuteProposalArgs, SquadsInstructionArgs};

use super::batch::InstructionBatch;
use super::pda::SquadPdas;

/// Builder for the ExecuteProposal instruction.
#[derive(Debug, Clone)]
pub struct ExecuteProposalBuilder {
    config: ProgramConfig,
    payer: Option<Pubkey>,
    squad: Option<Pubkey>,
    proposal: Option<Pubkey>,
    random_id: Option<String>,
}

impl ExecuteProposalBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(config: ProgramConfig) -> Self {
        Self {
            config,
            payer: None,
            squad: None,
            proposal: None,
            random_id: None,
        }
    }

    /// Sets the payer account.
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

    /// Sets the proposal to execute.
    #[must_use]
    pub fn proposal(mut self, proposal: Pubkey) -> Self {
        self.proposal = Some(proposal);
        self
    }

    /// Sets the squad's random id.
    #[must_use]
    pub fn random_id(mut self, random_id: impl Into<String>) -> Self {
        self.random_id = Some(random_id.into());
        self
    }

    /// Builds the instruction.
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is not set or a derivation fails.
    pub fn build(self) -> Result<Instruction, SdkError> {
        let payer = self
            .payer
            .ok_or_else(|| SdkError::MissingField("payer not set".to_string()))?;
        let squad = self
            .squad
            .ok_or_else(|| SdkError::MissingField("squad not set".to_string()))?;
        let proposal = self
            .proposal
            .ok_or_else(|| SdkError::MissingField("proposal not set".to_string()))?;
        let random_id = self
            .random_id
            .ok_or_else(|| SdkError::MissingField("random_id not set".to_string()))?;
        self.config.validate()?;

        let pdas = SquadPdas::from_squad(&self.config.program_id, &squad)?;

        let accounts = vec![
            AccountMeta::new(payer, true),
            AccountMeta::new(squad, false),
            AccountMeta::new_readonly(pdas.mint_owner, false),
            AccountMeta::new(proposal, true),
            AccountMeta::new(pdas.treasury, false),
            AccountMeta::new(payer, true),
            AccountMeta::new_readonly(self.config.system_program, false),
            AccountMeta::new_readonly(self.config.token_program, false),
            AccountMeta::new_readonly(self.config.associated_token_program, false),
            AccountMeta::new_readonly(self.config.rent_sysvar, false),
        ];

        let data = SquadsInstructionArgs::from(ExecuteProposalArgs::new(&random_id)).encode()?;

        Ok(Instruction {
            program_id: self.config.program_id,
            accounts,
            data,
        })
    }

    /// Builds the instruction and appends it to `batch`.
    ///
    /// Nothing is appended when building fails.
    ///
    /// # Errors
    ///
    /// Returns an error if building fails.
    pub fn append_to(self, batch: &mut InstructionBatch) -> Result<(), SdkError> {
        let instruction = self.build()?;
        tracing::debug!("built ExecuteProposal");
        batch.push(instruction);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey;

    fn test_config() -> ProgramConfig {
        ProgramConfig::default()
    }

    fn squad() -> Pubkey {
        pubkey!("HsxAvxzGww3LYHgyNCsqBZ69YDzWRgks1vGzhjMT6eqL")
    }

    #[test]
    fn test_execute_proposal_builder_build() {
        let payer = Pubkey::new_unique();
        let proposal = Pubkey::new_unique();
        let ix = ExecuteProposalBuilder::new(test_config())
            .payer(payer)
            .squad(squad())
            .proposal(proposal)
            .random_id("abcd123456")
            .build()
            .expect("should build instruction");

        assert_eq!(ix.data.len(), 11);
        assert_eq!(ix.data[0], 5);
        assert_eq!(&ix.data[1..], b"abcd123456");

        assert_eq!(ix.accounts.len(), 10);
        assert_eq!(ix.accounts[0].pubkey, payer);
        assert_eq!(ix.accounts[5].pubkey, payer);
        assert!(ix.accounts[5].is_signer && ix.accounts[5].is_writable);
        assert_eq!(
            ix.accounts[2].pubkey,
            pubkey!("29DjEPAYwwBmvZps9ivoMKKAZbDpvTzur5CyEHw9a9rv")
        );
        assert!(!ix.accounts[2].is_writable);
        assert_eq!(ix.accounts[3].pubkey, proposal);
        assert!(ix.accounts[3].is_signer && ix.accounts[3].is_writable);
        assert_eq!(
            ix.accounts[4].pubkey,
            pubkey!("Fcf53y5ECvygjhrMrqy1McuFDx9NRykyNiVcAC91Gq4g")
        );
        assert!(ix.accounts[4].is_writable);
        assert_eq!(
            ix.accounts[8].pubkey,
            test_config().associated_token_program
        );
        assert!(ix.accounts[6..].iter().all(|meta| !meta.is_writable));
    }

    #[test]
    fn test_execute_proposal_builder_missing_random_id() {
        let result = ExecuteProposalBuilder::new(test_config())
            .payer(Pubkey::new_unique())
            .squad(squad())
            .proposal(Pubkey::new_unique())
            .build();

        assert!(matches!(result, Err(SdkError::MissingField(_))));
    }

    #[test]
    fn test_execute_proposal_invalid_config() {
        let result = ExecuteProposalBuilder::new(ProgramConfig::new(Pubkey::default()))
            .payer(Pubkey::new_unique())
            .squad(squad())
            .proposal(Pubkey::new_unique())
            .random_id("abcd123456")
            .build();

        assert!(matches!(result, Err(SdkError::InvalidAddress(_))));
    }
}
