//! AddMembersToSquad instruction builder.
//!
//! Builds the instruction that mints equity to a batch of members. The
//! account list ends with one `(member, member equity)` pair per member, in
//! the order the members were added to the builder.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::config::ProgramConfig;
use crate::error::SdkError;
use crate::schema::{AddMembersToSquadArgs, SquadsInstructionArgs};

use super::batch::InstructionBatch;
use super::pda::{derive_member_equity_address, derive_mint_owner_address};

/// Number of accounts preceding the member pairs.
pub const ADD_MEMBERS_FIXED_ACCOUNTS: usize = 6;

/// Builder for the AddMembersToSquad instruction.
#[derive(Debug, Clone)]
pub struct AddMembersToSquadBuilder {
    config: ProgramConfig,
    initializer: Option<Pubkey>,
    squad: Option<Pubkey>,
    mint_owner: Option<Pubkey>,
    allocations: Vec<(Pubkey, u64)>,
}

impl AddMembersToSquadBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(config: ProgramConfig) -> Self {
        Self {
            config,
            initializer: None,
            squad: None,
            mint_owner: None,
            allocations: Vec::new(),
        }
    }

    /// Sets the initializer (the squad admin).
    #[must_use]
    pub fn initializer(mut self, initializer: Pubkey) -> Self {
        self.initializer = Some(initializer);
        self
    }

    /// Sets the squad.
    #[must_use]
    pub fn squad(mut self, squad: Pubkey) -> Self {
        self.squad = Some(squad);
        self
    }

    /// Sets an already derived mint owner, skipping its derivation.
    #[must_use]
    pub fn mint_owner(mut self, mint_owner: Pubkey) -> Self {
        self.mint_owner = Some(mint_owner);
        self
    }

    /// Adds a member with its equity allocation.
    #[must_use]
    pub fn member(mut self, member: Pubkey, allocation: u64) -> Self {
        self.allocations.push((member, allocation));
        self
    }

    /// Adds several members with their allocations, in order.
    #[must_use]
    pub fn members(mut self, allocations: impl IntoIterator<Item = (Pubkey, u64)>) -> Self {
        self.allocations.extend(allocations);
        self
    }

    /// Builds the instruction.
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is not set, more than 255
    /// members were added, or a derivation fails.
    pub fn build(self) -> Result<Instruction, SdkError> {
        let initializer = self
            .initializer
            .ok_or_else(|| SdkError::MissingField("initializer not set".to_string()))?;
        let squad = self
            .squad
            .ok_or_else(|| SdkError::MissingField("squad not set".to_string()))?;
        self.config.validate()?;

        let args = AddMembersToSquadArgs::new(
            self.allocations
                .iter()
                .map(|(_, allocation)| *allocation)
                .collect(),
        )?;

        let mint_owner = match self.mint_owner {
            Some(mint_owner) => mint_owner,
            None => derive_mint_owner_address(&self.config.program_id, &squad)?.0,
        };

        let mut accounts =
            Vec::with_capacity(ADD_MEMBERS_FIXED_ACCOUNTS + 2 * self.allocations.len());
        accounts.extend([
            AccountMeta::new(initializer, true),
            AccountMeta::new_readonly(squad, false),
            AccountMeta::new(mint_owner, false),
            AccountMeta::new_readonly(self.config.token_program, false),
            AccountMeta::new_readonly(self.config.system_program, false),
            AccountMeta::new_readonly(self.config.rent_sysvar, false),
        ]);
        for (member, _) in &self.allocations {
            let (equity, _) =
                derive_member_equity_address(&self.config.program_id, member, &squad)?;
            accounts.push(AccountMeta::new_readonly(*member, false));
            accounts.push(AccountMeta::new(equity, false));
        }

        let data = SquadsInstructionArgs::from(args).encode()?;

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
        let members = self.allocations.len();
        let instruction = self.build()?;
        tracing::debug!(members, "built AddMembersToSquad");
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
    fn test_add_members_builder_chain() {
        let first = Pubkey::new_unique();
        let second = Pubkey::new_unique();
        let builder = AddMembersToSquadBuilder::new(test_config())
            .squad(squad())
            .member(first, 10)
            .members([(second, 20)]);

        assert_eq!(builder.squad, Some(squad()));
        assert_eq!(builder.allocations, vec![(first, 10), (second, 20)]);
    }

    #[test]
    fn test_add_members_builder_build() {
        let initializer = Pubkey::new_from_array([7u8; 32]);
        let member = Pubkey::new_from_array([9u8; 32]);

        let ix = AddMembersToSquadBuilder::new(test_config())
            .initializer(initializer)
            .squad(squad())
            .member(member, 100_000)
            .build()
            .expect("should build instruction");

        assert_eq!(ix.data.len(), 18);
        assert_eq!(&ix.data[..2], &[7, 1]);
        assert_eq!(ix.accounts.len(), ADD_MEMBERS_FIXED_ACCOUNTS + 2);

        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert!(!ix.accounts[1].is_writable);
        assert_eq!(
            ix.accounts[2].pubkey,
            pubkey!("29DjEPAYwwBmvZps9ivoMKKAZbDpvTzur5CyEHw9a9rv")
        );
        assert!(ix.accounts[2].is_writable);

        assert_eq!(ix.accounts[6].pubkey, member);
        assert!(!ix.accounts[6].is_writable && !ix.accounts[6].is_signer);
        assert_eq!(
            ix.accounts[7].pubkey,
            pubkey!("DBPaZrWWsSc5kWU53DDMvRi92RZPMo1bd93iPq8eXkz3")
        );
        assert!(ix.accounts[7].is_writable);
    }

    #[test]
    fn test_add_members_mint_owner_override() {
        let mint_owner = Pubkey::new_unique();
        let ix = AddMembersToSquadBuilder::new(test_config())
            .initializer(Pubkey::new_unique())
            .squad(squad())
            .mint_owner(mint_owner)
            .build()
            .expect("should build instruction");

        assert_eq!(ix.accounts[2].pubkey, mint_owner);
        assert_eq!(ix.accounts.len(), ADD_MEMBERS_FIXED_ACCOUNTS);
        assert_eq!(ix.data.len(), 10);
    }

    #[test]
    fn test_add_members_too_many() {
        let members = (0..256).map(|_| (Pubkey::new_unique(), 1));
        let result = AddMembersToSquadBuilder::new(test_config())
            .initializer(Pubkey::new_unique())
            .squad(squad())
            .members(members)
            .build();

        assert!(matches!(result, Err(SdkError::TooManyElements { .. })));
    }

    #[test]
    fn test_add_members_builder_missing_squad() {
        let result = AddMembersToSquadBuilder::new(test_config())
            .initializer(Pubkey::new_unique())
            .member(Pubkey::new_unique(), 1)
            .build();

        assert!(result.is_err());
    }
}
