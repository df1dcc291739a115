//! CreateSquad instruction builder.
//!
//! Builds the instruction to create a squad together with its mint. The squad
//! address is seeded by a random id, which the builder generates when the
//! caller does not supply one and hands back in [`CreatedSquad`].

use rand::Rng;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::config::ProgramConfig;
use crate::error::SdkError;
use crate::schema::{CreateSquadArgs, SquadsInstructionArgs, RANDOM_ID_WIDTH};

use super::batch::InstructionBatch;
use super::pda::{derive_mint_owner_address, derive_squad_address};

const RANDOM_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a random squad id of lowercase base-36 characters.
#[must_use]
pub fn generate_random_id<R: Rng>(rng: &mut R) -> String {
    (0..RANDOM_ID_WIDTH)
        .map(|_| char::from(RANDOM_ID_ALPHABET[rng.gen_range(0..RANDOM_ID_ALPHABET.len())]))
        .collect()
}

/// Addresses and id of a squad created by [`CreateSquadBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSquad {
    /// Squad address.
    pub squad: Pubkey,
    /// Squad mint, also the mint owner.
    pub mint_owner: Pubkey,
    /// Random id the squad address was derived from, as written on chain.
    pub random_id: String,
}

/// Builder for the CreateSquad instruction.
#[derive(Debug, Clone)]
pub struct CreateSquadBuilder {
    config: ProgramConfig,
    payer: Option<Pubkey>,
    squad_name: Option<String>,
    description: String,
    token: Option<String>,
    vote_support: u8,
    vote_quorum: u8,
    random_id: Option<String>,
}

impl CreateSquadBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(config: ProgramConfig) -> Self {
        Self {
            config,
            payer: None,
            squad_name: None,
            description: String::new(),
            token: None,
            vote_support: 50,
            vote_quorum: 50,
            random_id: None,
        }
    }

    /// Sets the payer, who also becomes the squad admin.
    #[must_use]
    pub fn payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    /// Sets the squad name. Truncated to 24 bytes.
    #[must_use]
    pub fn squad_name(mut self, name: impl Into<String>) -> Self {
        self.squad_name = Some(name.into());
        self
    }

    /// Sets the description. Truncated to 36 bytes.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the token symbol. Truncated to 6 bytes.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the vote support percentage.
    #[must_use]
    pub fn vote_support(mut self, vote_support: u8) -> Self {
        self.vote_support = vote_support;
        self
    }

    /// Sets the vote quorum percentage.
    #[must_use]
    pub fn vote_quorum(mut self, vote_quorum: u8) -> Self {
        self.vote_quorum = vote_quorum;
        self
    }

    /// Uses a fixed random id instead of generating one.
    #[must_use]
    pub fn random_id(mut self, random_id: impl Into<String>) -> Self {
        self.random_id = Some(random_id.into());
        self
    }

    /// Builds the instruction, generating the random id from `rng` if none
    /// was set.
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is not set or a derivation fails.
    pub fn build_with_rng<R: Rng>(
        self,
        rng: &mut R,
    ) -> Result<(Instruction, CreatedSquad), SdkError> {
        let payer = self
            .payer
            .ok_or_else(|| SdkError::MissingField("payer not set".to_string()))?;
        let squad_name = self
            .squad_name
            .ok_or_else(|| SdkError::MissingField("squad_name not set".to_string()))?;
        let token = self
            .token
            .ok_or_else(|| SdkError::MissingField("token not set".to_string()))?;
        self.config.validate()?;

        let random_id = self.random_id.unwrap_or_else(|| generate_random_id(rng));
        let args = CreateSquadArgs::new(
            self.vote_support,
            self.vote_quorum,
            &squad_name,
            &self.description,
            &token,
            &random_id,
        );
        // seeds use the id exactly as the program reads it from the payload
        let random_id = args.random_id().to_string();

        let (squad, _) = derive_squad_address(&self.config.program_id, &payer, &random_id)?;
        let (mint_owner, _) = derive_mint_owner_address(&self.config.program_id, &squad)?;

        let accounts = vec![
            AccountMeta::new(payer, true),
            AccountMeta::new(squad, false),
            AccountMeta::new(mint_owner, false),
            AccountMeta::new_readonly(self.config.token_program, false),
            AccountMeta::new_readonly(self.config.system_program, false),
            AccountMeta::new_readonly(self.config.rent_sysvar, false),
        ];

        let data = SquadsInstructionArgs::from(args).encode()?;

        let instruction = Instruction {
            program_id: self.config.program_id,
            accounts,
            data,
        };
        Ok((
            instruction,
            CreatedSquad {
                squad,
                mint_owner,
                random_id,
            },
        ))
    }

    /// Builds the instruction with a thread-local random id source.
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is not set or a derivation fails.
    pub fn build(self) -> Result<(Instruction, CreatedSquad), SdkError> {
        self.build_with_rng(&mut rand::thread_rng())
    }

    /// Builds the instruction and appends it to `batch`.
    ///
    /// Nothing is appended when building fails.
    ///
    /// # Errors
    ///
    /// Returns an error if building fails.
    pub fn append_to(self, batch: &mut InstructionBatch) -> Result<CreatedSquad, SdkError> {
        let (instruction, created) = self.build()?;
        tracing::debug!(
            squad = %created.squad,
            random_id = %created.random_id,
            "built CreateSquad"
        );
        batch.push(instruction);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use solana_sdk::pubkey;

    fn test_config() -> ProgramConfig {
        ProgramConfig::default()
    }

    fn admin() -> Pubkey {
        Pubkey::new_from_array([7u8; 32])
    }

    #[test]
    fn test_generate_random_id() {
        let mut rng = StdRng::seed_from_u64(42);
        let id = generate_random_id(&mut rng);
        assert_eq!(id.len(), RANDOM_ID_WIDTH);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));

        let mut same = StdRng::seed_from_u64(42);
        assert_eq!(generate_random_id(&mut same), id);
    }

    #[test]
    fn test_create_squad_builder_new() {
        let builder = CreateSquadBuilder::new(test_config());
        assert_eq!(builder.payer, None);
        assert_eq!(builder.vote_support, 50);
        assert_eq!(builder.vote_quorum, 50);
        assert!(builder.random_id.is_none());
    }

    #[test]
    fn test_create_squad_builder_build() {
        let (ix, created) = CreateSquadBuilder::new(test_config())
            .payer(admin())
            .squad_name("my squad")
            .description("it's cool")
            .token("SLIDE")
            .vote_support(90)
            .vote_quorum(40)
            .random_id("abcd123456")
            .build()
            .expect("should build instruction");

        assert_eq!(
            created.squad,
            pubkey!("HsxAvxzGww3LYHgyNCsqBZ69YDzWRgks1vGzhjMT6eqL")
        );
        assert_eq!(
            created.mint_owner,
            pubkey!("29DjEPAYwwBmvZps9ivoMKKAZbDpvTzur5CyEHw9a9rv")
        );
        assert_eq!(created.random_id, "abcd123456");

        assert_eq!(ix.program_id, test_config().program_id);
        assert_eq!(ix.data.len(), 81);
        assert_eq!(&ix.data[..5], &[0, 1, 90, 40, 0]);
        assert_eq!(ix.accounts.len(), 6);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, created.squad);
        assert!(ix.accounts[1].is_writable && !ix.accounts[1].is_signer);
        assert_eq!(ix.accounts[2].pubkey, created.mint_owner);
        assert!(ix.accounts[2].is_writable);
        assert_eq!(ix.accounts[3].pubkey, test_config().token_program);
        assert_eq!(ix.accounts[4].pubkey, test_config().system_program);
        assert_eq!(ix.accounts[5].pubkey, test_config().rent_sysvar);
        assert!(ix.accounts[3..].iter().all(|meta| !meta.is_writable));
    }

    #[test]
    fn test_create_squad_generated_id_is_returned() {
        let mut rng = StdRng::seed_from_u64(7);
        let (ix, created) = CreateSquadBuilder::new(test_config())
            .payer(admin())
            .squad_name("squad")
            .token("TKN")
            .build_with_rng(&mut rng)
            .expect("should build instruction");

        assert_eq!(created.random_id.len(), RANDOM_ID_WIDTH);
        assert_eq!(&ix.data[71..], created.random_id.as_bytes());
        let (squad, _) =
            derive_squad_address(&test_config().program_id, &admin(), &created.random_id)
                .expect("should derive");
        assert_eq!(squad, created.squad);
    }

    #[test]
    fn test_create_squad_short_random_id_is_padded() {
        let (ix, created) = CreateSquadBuilder::new(test_config())
            .payer(admin())
            .squad_name("squad")
            .token("TKN")
            .random_id("abc")
            .build()
            .expect("should build instruction");

        assert_eq!(created.random_id, "abc       ");
        assert_eq!(&ix.data[71..], b"abc       ");
    }

    #[test]
    fn test_create_squad_builder_missing_payer() {
        let result = CreateSquadBuilder::new(test_config())
            .squad_name("squad")
            .token("TKN")
            .build();
        assert!(matches!(result, Err(SdkError::MissingField(_))));
    }

    #[test]
    fn test_create_squad_append_to_batch() {
        let mut batch = InstructionBatch::new();
        let created = CreateSquadBuilder::new(test_config())
            .payer(admin())
            .squad_name("squad")
            .token("TKN")
            .append_to(&mut batch)
            .expect("should append");

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.as_slice()[0].accounts[1].pubkey, created.squad);
    }

    #[test]
    fn test_create_squad_failure_leaves_batch_untouched() {
        let mut batch = InstructionBatch::new();
        let result = CreateSquadBuilder::new(test_config())
            .payer(admin())
            .token("TKN")
            .append_to(&mut batch);
        assert!(result.is_err());
        assert!(batch.is_empty());
    }
}
