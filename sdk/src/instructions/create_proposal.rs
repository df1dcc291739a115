//! CreateProposalAccount instruction builder.
//!
//! Builds the instruction that opens a proposal on a squad. The proposal
//! address is derived from the squad and the squad's proposal nonce.

use chrono::{DateTime, Duration, Utc};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::config::ProgramConfig;
use crate::error::SdkError;
use crate::schema::{
    CreateProposalAccountArgs, ProposalExecution, ProposalType, SquadsInstructionArgs,
};

use super::batch::InstructionBatch;
use super::pda::derive_proposal_address;

/// Seconds before now a proposal opens when no start time is given.
pub const DEFAULT_PROPOSAL_START_DELTA_SECS: i64 = 24 * 60 * 60;

/// Seconds a proposal stays open when no close time is given.
pub const DEFAULT_PROPOSAL_LIFETIME_SECS: i64 = 30 * 60;

/// Builder for the CreateProposalAccount instruction.
#[derive(Debug, Clone)]
pub struct CreateProposalBuilder {
    config: ProgramConfig,
    payer: Option<Pubkey>,
    squad: Option<Pubkey>,
    nonce: Option<i32>,
    proposal_type: ProposalType,
    title: Option<String>,
    description: String,
    link: String,
    votes_num: Option<u8>,
    votes_labels: Vec<String>,
    start_time: Option<DateTime<Utc>>,
    close_time: Option<DateTime<Utc>>,
    execution: Option<ProposalExecution>,
}

impl CreateProposalBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(config: ProgramConfig) -> Self {
        Self {
            config,
            payer: None,
            squad: None,
            nonce: None,
            proposal_type: ProposalType::default(),
            title: None,
            description: String::new(),
            link: String::new(),
            votes_num: None,
            votes_labels: Vec::new(),
            start_time: None,
            close_time: None,
            execution: None,
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

    /// Sets the squad's proposal nonce for the new proposal.
    #[must_use]
    pub fn nonce(mut self, nonce: i32) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Sets the proposal type.
    #[must_use]
    pub fn proposal_type(mut self, proposal_type: ProposalType) -> Self {
        self.proposal_type = proposal_type;
        self
    }

    /// Sets the title. Truncated to 36 bytes.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description. Truncated to 496 bytes.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the link. Truncated to 48 bytes.
    #[must_use]
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    /// Sets the number of vote options. Defaults to the number of labels.
    #[must_use]
    pub fn votes_num(mut self, votes_num: u8) -> Self {
        self.votes_num = Some(votes_num);
        self
    }

    /// Sets the vote labels. At most five; each truncated to 44 bytes.
    #[must_use]
    pub fn votes_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.votes_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Sets when voting opens.
    #[must_use]
    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Sets when voting closes.
    #[must_use]
    pub fn close_time(mut self, close_time: DateTime<Utc>) -> Self {
        self.close_time = Some(close_time);
        self
    }

    /// Sets the execution amounts appended to the payload.
    #[must_use]
    pub fn execution(mut self, execution: ProposalExecution) -> Self {
        self.execution = Some(execution);
        self
    }

    /// Builds the instruction, filling missing times relative to `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is not set, there are too many
    /// vote labels, or the derivation fails.
    pub fn build_at(self, now: DateTime<Utc>) -> Result<Instruction, SdkError> {
        self.build_with_address(now).map(|(instruction, _)| instruction)
    }

    fn build_with_address(self, now: DateTime<Utc>) -> Result<(Instruction, Pubkey), SdkError> {
        let payer = self
            .payer
            .ok_or_else(|| SdkError::MissingField("payer not set".to_string()))?;
        let squad = self
            .squad
            .ok_or_else(|| SdkError::MissingField("squad not set".to_string()))?;
        let nonce = self
            .nonce
            .ok_or_else(|| SdkError::MissingField("nonce not set".to_string()))?;
        let title = self
            .title
            .ok_or_else(|| SdkError::MissingField("title not set".to_string()))?;
        self.config.validate()?;

        let start_time = self
            .start_time
            .unwrap_or_else(|| now - Duration::seconds(DEFAULT_PROPOSAL_START_DELTA_SECS));
        let close_time = self
            .close_time
            .unwrap_or_else(|| now + Duration::seconds(DEFAULT_PROPOSAL_LIFETIME_SECS));
        let votes_num = match self.votes_num {
            Some(votes_num) => votes_num,
            None => u8::try_from(self.votes_labels.len()).map_err(|_| SdkError::Overflow {
                field: "votes_num".to_string(),
            })?,
        };
        let labels: Vec<&str> = self.votes_labels.iter().map(String::as_str).collect();

        let args = CreateProposalAccountArgs::new(
            self.proposal_type,
            &title,
            &self.description,
            &self.link,
            votes_num,
            &labels,
            start_time.timestamp(),
            close_time.timestamp(),
            self.execution,
        )?;

        let (proposal, _) = derive_proposal_address(&self.config.program_id, &squad, nonce)?;

        let accounts = vec![
            AccountMeta::new(payer, true),
            AccountMeta::new(squad, false),
            AccountMeta::new(proposal, false),
            AccountMeta::new_readonly(self.config.system_program, false),
            AccountMeta::new_readonly(self.config.rent_sysvar, false),
            AccountMeta::new_readonly(self.config.program_id, false),
        ];

        let data = SquadsInstructionArgs::from(args).encode()?;

        let instruction = Instruction {
            program_id: self.config.program_id,
            accounts,
            data,
        };
        Ok((instruction, proposal))
    }

    /// Builds the instruction with missing times relative to the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if building fails.
    pub fn build(self) -> Result<Instruction, SdkError> {
        self.build_at(Utc::now())
    }

    /// Builds the instruction, appends it to `batch` and returns the
    /// proposal address.
    ///
    /// Nothing is appended when building fails.
    ///
    /// # Errors
    ///
    /// Returns an error if building fails.
    pub fn append_to(self, batch: &mut InstructionBatch) -> Result<Pubkey, SdkError> {
        let (instruction, proposal) = self.build_with_address(Utc::now())?;
        tracing::debug!(%proposal, "built CreateProposalAccount");
        batch.push(instruction);
        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use solana_sdk::pubkey;

    fn test_config() -> ProgramConfig {
        ProgramConfig::default()
    }

    fn squad() -> Pubkey {
        pubkey!("HsxAvxzGww3LYHgyNCsqBZ69YDzWRgks1vGzhjMT6eqL")
    }

    fn builder() -> CreateProposalBuilder {
        CreateProposalBuilder::new(test_config())
            .payer(Pubkey::new_unique())
            .squad(squad())
            .nonce(1)
            .title("[SLIDE PROPOSAL] Grant Permissions")
            .description("member: reviewer")
            .votes_labels(["Approve", "Deny"])
    }

    const LABELS_OFFSET: usize = 2 + 36 + 496 + 48;
    const START_OFFSET: usize = LABELS_OFFSET + 1 + 220;

    #[test]
    fn test_create_proposal_builder_build() {
        let ix = builder().build().expect("should build instruction");

        assert_eq!(ix.data.len(), 819);
        assert_eq!(ix.data[0], 2);
        assert_eq!(ix.data[LABELS_OFFSET], 2);
        assert_eq!(ix.accounts.len(), 6);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert!(ix.accounts[1].is_writable);
        assert_eq!(
            ix.accounts[2].pubkey,
            pubkey!("DbypC5KXXwZUkeYvYuRRvAYQTueAHhkzGVT9AgvW6Hjj")
        );
        assert!(ix.accounts[2].is_writable && !ix.accounts[2].is_signer);
        assert_eq!(ix.accounts[5].pubkey, test_config().program_id);
        assert!(ix.accounts[3..].iter().all(|meta| !meta.is_writable));
    }

    #[test]
    fn test_create_proposal_default_window() {
        let now = Utc
            .timestamp_opt(1_650_000_000, 0)
            .single()
            .expect("valid timestamp");
        let ix = builder().build_at(now).expect("should build instruction");

        let start = i64::from_le_bytes(
            ix.data[START_OFFSET..START_OFFSET + 8]
                .try_into()
                .expect("8 bytes"),
        );
        let close = i64::from_le_bytes(
            ix.data[START_OFFSET + 8..START_OFFSET + 16]
                .try_into()
                .expect("8 bytes"),
        );
        assert_eq!(start, 1_650_000_000 - 86_400);
        assert_eq!(close, 1_650_000_000 + 1_800);
    }

    #[test]
    fn test_create_proposal_explicit_window() {
        let start = Utc
            .timestamp_opt(1_000, 0)
            .single()
            .expect("valid timestamp");
        let close = Utc
            .timestamp_opt(2_000, 0)
            .single()
            .expect("valid timestamp");
        let ix = builder()
            .start_time(start)
            .close_time(close)
            .build()
            .expect("should build instruction");

        assert_eq!(
            &ix.data[START_OFFSET..START_OFFSET + 8],
            &1_000i64.to_le_bytes()
        );
        assert_eq!(
            &ix.data[START_OFFSET + 8..START_OFFSET + 16],
            &2_000i64.to_le_bytes()
        );
    }

    #[test]
    fn test_create_proposal_with_execution() {
        let ix = builder()
            .proposal_type(ProposalType::WithdrawSol)
            .execution(ProposalExecution::amount(1_000_000))
            .build()
            .expect("should build instruction");

        assert_eq!(ix.data.len(), 827);
        assert_eq!(ix.data[1], 4);
        assert_eq!(&ix.data[819..], &1_000_000u64.to_le_bytes());
    }

    #[test]
    fn test_create_proposal_votes_num_override() {
        let ix = builder()
            .votes_num(3)
            .build()
            .expect("should build instruction");
        assert_eq!(ix.data[LABELS_OFFSET], 3);
    }

    #[test]
    fn test_create_proposal_too_many_labels() {
        let result = builder()
            .votes_labels(["a", "b", "c", "d", "e", "f"])
            .build();
        assert!(matches!(result, Err(SdkError::TooManyElements { .. })));
    }

    #[test]
    fn test_create_proposal_missing_nonce() {
        let result = CreateProposalBuilder::new(test_config())
            .payer(Pubkey::new_unique())
            .squad(squad())
            .title("title")
            .build();
        assert!(matches!(result, Err(SdkError::MissingField(_))));
    }

    #[test]
    fn test_create_proposal_append_returns_address() {
        let mut batch = InstructionBatch::new();
        let proposal = builder().append_to(&mut batch).expect("should append");
        assert_eq!(
            proposal,
            pubkey!("DbypC5KXXwZUkeYvYuRRvAYQTueAHhkzGVT9AgvW6Hjj")
        );
        assert_eq!(batch.len(), 1);
    }
}
