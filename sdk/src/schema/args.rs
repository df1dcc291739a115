//! Argument records for each Squads instruction.
//!
//! Constructors normalize caller input to the widths the program expects:
//! text is truncated and space-padded (see [`normalize_text`]), while
//! structural limits such as the vote-label capacity are rejected.

use crate::error::SdkError;
use crate::layout::{Record, Structure};

use super::{
    normalize_text, ProposalType, SquadsInstruction, ADD_MEMBERS_HEADER_LEN, CAST_VOTE_DATA_LEN,
    CREATE_PROPOSAL_BASE_DATA_LEN, CREATE_SQUAD_DATA_LEN, EXECUTE_PROPOSAL_DATA_LEN,
    MAX_VOTE_LABELS, PROPOSAL_DESCRIPTION_WIDTH, PROPOSAL_LINK_WIDTH, PROPOSAL_TITLE_WIDTH,
    RANDOM_ID_WIDTH, SQUAD_DESCRIPTION_WIDTH, SQUAD_NAME_WIDTH, SQUAD_TOKEN_WIDTH,
    VOTE_LABEL_WIDTH,
};

/// Allocation type written by `CreateSquad` (team coordination).
pub const TEAM_COORDINATION_ALLOCATION: u8 = 1;

/// Arguments of `CreateSquad`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSquadArgs {
    allocation_type: u8,
    vote_support: u8,
    vote_quorum: u8,
    core_threshold: u8,
    squad_name: String,
    description: String,
    token: String,
    random_id: String,
}

impl CreateSquadArgs {
    /// Creates normalized `CreateSquad` arguments.
    ///
    /// `vote_support` and `vote_quorum` are percentages (1-100); the program
    /// enforces the range.
    #[must_use]
    pub fn new(
        vote_support: u8,
        vote_quorum: u8,
        squad_name: &str,
        description: &str,
        token: &str,
        random_id: &str,
    ) -> Self {
        Self {
            allocation_type: TEAM_COORDINATION_ALLOCATION,
            vote_support,
            vote_quorum,
            core_threshold: 0,
            squad_name: normalize_text(squad_name, SQUAD_NAME_WIDTH),
            description: normalize_text(description, SQUAD_DESCRIPTION_WIDTH),
            token: normalize_text(token, SQUAD_TOKEN_WIDTH),
            random_id: normalize_text(random_id, RANDOM_ID_WIDTH),
        }
    }

    /// Padded squad name.
    #[must_use]
    pub fn squad_name(&self) -> &str {
        &self.squad_name
    }

    /// Padded random id, as written on chain and used in the squad seeds.
    #[must_use]
    pub fn random_id(&self) -> &str {
        &self.random_id
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("instruction", SquadsInstruction::CreateSquad.discriminant())
            .with("allocation_type", self.allocation_type)
            .with("vote_support", self.vote_support)
            .with("vote_quorum", self.vote_quorum)
            .with("core_threshold", self.core_threshold)
            .with("squad_name", self.squad_name.clone())
            .with("description", self.description.clone())
            .with("token", self.token.clone())
            .with("random_id", self.random_id.clone())
    }
}

/// Arguments of `AddMembersToSquad`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddMembersToSquadArgs {
    allocation_table: Vec<u64>,
}

impl AddMembersToSquadArgs {
    /// Creates arguments from each member's equity allocation, in member order.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::TooManyElements`] for more than 255 members, since
    /// the count is a single byte.
    pub fn new(allocation_table: Vec<u64>) -> Result<Self, SdkError> {
        let max = usize::from(u8::MAX);
        if allocation_table.len() > max {
            return Err(SdkError::TooManyElements {
                field: "allocation_table".to_string(),
                max,
                actual: allocation_table.len(),
            });
        }
        Ok(Self { allocation_table })
    }

    /// Allocations in member order.
    #[must_use]
    pub fn allocation_table(&self) -> &[u64] {
        &self.allocation_table
    }

    /// Number of members.
    #[must_use]
    pub fn members_num(&self) -> u8 {
        // bounded by the constructor
        u8::try_from(self.allocation_table.len()).unwrap_or(u8::MAX)
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("instruction", SquadsInstruction::AddMembersToSquad.discriminant())
            .with("members_num", self.members_num())
            .with("allocation_table", self.allocation_table.clone())
    }
}

/// Optional execution amounts trailing a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposalExecution {
    /// Amount the proposal moves when executed.
    pub amount: u64,
    /// Minimum output, for swap-style proposals.
    pub minimum_out: Option<u64>,
}

impl ProposalExecution {
    /// Execution with an amount only.
    #[must_use]
    pub const fn amount(amount: u64) -> Self {
        Self {
            amount,
            minimum_out: None,
        }
    }

    /// Execution with an amount and a minimum output.
    #[must_use]
    pub const fn with_minimum_out(amount: u64, minimum_out: u64) -> Self {
        Self {
            amount,
            minimum_out: Some(minimum_out),
        }
    }

    /// Trailing bytes this execution adds to the payload.
    #[must_use]
    pub const fn trailing_len(&self) -> usize {
        match self.minimum_out {
            Some(_) => 16,
            None => 8,
        }
    }
}

/// Arguments of `CreateProposalAccount`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProposalAccountArgs {
    proposal_type: ProposalType,
    title: String,
    description: String,
    link: String,
    votes_num: u8,
    votes_labels: Vec<String>,
    start_timestamp: i64,
    close_timestamp: i64,
    execution: Option<ProposalExecution>,
}

impl CreateProposalAccountArgs {
    /// Creates normalized proposal arguments.
    ///
    /// Timestamps are Unix seconds.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::TooManyElements`] for more than five vote labels.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        proposal_type: ProposalType,
        title: &str,
        description: &str,
        link: &str,
        votes_num: u8,
        votes_labels: &[&str],
        start_timestamp: i64,
        close_timestamp: i64,
        execution: Option<ProposalExecution>,
    ) -> Result<Self, SdkError> {
        if votes_labels.len() > MAX_VOTE_LABELS {
            return Err(SdkError::TooManyElements {
                field: "votes_labels".to_string(),
                max: MAX_VOTE_LABELS,
                actual: votes_labels.len(),
            });
        }

        Ok(Self {
            proposal_type,
            title: normalize_text(title, PROPOSAL_TITLE_WIDTH),
            description: normalize_text(description, PROPOSAL_DESCRIPTION_WIDTH),
            link: normalize_text(link, PROPOSAL_LINK_WIDTH),
            votes_num,
            votes_labels: votes_labels
                .iter()
                .map(|label| normalize_text(label, VOTE_LABEL_WIDTH))
                .collect(),
            start_timestamp,
            close_timestamp,
            execution,
        })
    }

    /// Proposal type.
    #[must_use]
    pub const fn proposal_type(&self) -> ProposalType {
        self.proposal_type
    }

    /// Padded title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Padded vote labels.
    #[must_use]
    pub fn votes_labels(&self) -> &[String] {
        &self.votes_labels
    }

    /// Start of voting, Unix seconds.
    #[must_use]
    pub const fn start_timestamp(&self) -> i64 {
        self.start_timestamp
    }

    /// End of voting, Unix seconds.
    #[must_use]
    pub const fn close_timestamp(&self) -> i64 {
        self.close_timestamp
    }

    /// Optional execution amounts.
    #[must_use]
    pub const fn execution(&self) -> Option<ProposalExecution> {
        self.execution
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new()
            .with(
                "instruction",
                SquadsInstruction::CreateProposalAccount.discriminant(),
            )
            .with("proposal_type", u8::from(self.proposal_type))
            .with("title", self.title.clone())
            .with("description", self.description.clone())
            .with("link", self.link.clone())
            .with("votes_num", self.votes_num)
            .with("votes_labels", self.votes_labels.clone())
            .with("start_timestamp", self.start_timestamp)
            .with("close_timestamp", self.close_timestamp);

        if let Some(execution) = self.execution {
            record.insert("amount", execution.amount);
            if let Some(minimum_out) = execution.minimum_out {
                record.insert("minimum_out", minimum_out);
            }
        }
        record
    }
}

/// Arguments of `CastVote`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastVoteArgs {
    /// Index of the chosen vote label.
    pub vote: u8,
}

impl CastVoteArgs {
    /// Creates vote arguments.
    #[must_use]
    pub const fn new(vote: u8) -> Self {
        Self { vote }
    }

    fn to_record(self) -> Record {
        Record::new()
            .with("instruction", SquadsInstruction::CastVote.discriminant())
            .with("vote", self.vote)
    }
}

/// Arguments of `ExecuteProposal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteProposalArgs {
    random_id: String,
}

impl ExecuteProposalArgs {
    /// Creates execute arguments for the squad identified by `random_id`.
    #[must_use]
    pub fn new(random_id: &str) -> Self {
        Self {
            random_id: normalize_text(random_id, RANDOM_ID_WIDTH),
        }
    }

    /// Padded random id.
    #[must_use]
    pub fn random_id(&self) -> &str {
        &self.random_id
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("instruction", SquadsInstruction::ExecuteProposal.discriminant())
            .with("random_id", self.random_id.clone())
    }
}

/// Argument record for any supported instruction, keyed by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquadsInstructionArgs {
    /// `CreateSquad`.
    CreateSquad(CreateSquadArgs),
    /// `AddMembersToSquad`.
    AddMembersToSquad(AddMembersToSquadArgs),
    /// `CreateProposalAccount`.
    CreateProposalAccount(CreateProposalAccountArgs),
    /// `CastVote`.
    CastVote(CastVoteArgs),
    /// `ExecuteProposal`.
    ExecuteProposal(ExecuteProposalArgs),
}

impl SquadsInstructionArgs {
    /// Instruction kind.
    #[must_use]
    pub const fn kind(&self) -> SquadsInstruction {
        match self {
            Self::CreateSquad(_) => SquadsInstruction::CreateSquad,
            Self::AddMembersToSquad(_) => SquadsInstruction::AddMembersToSquad,
            Self::CreateProposalAccount(_) => SquadsInstruction::CreateProposalAccount,
            Self::CastVote(_) => SquadsInstruction::CastVote,
            Self::ExecuteProposal(_) => SquadsInstruction::ExecuteProposal,
        }
    }

    /// Payload length the builder must allocate, including optional
    /// trailing fields and the member table.
    #[must_use]
    pub fn data_len(&self) -> usize {
        match self {
            Self::CreateSquad(_) => CREATE_SQUAD_DATA_LEN,
            Self::AddMembersToSquad(args) => {
                ADD_MEMBERS_HEADER_LEN + 8 * args.allocation_table.len()
            }
            Self::CreateProposalAccount(args) => {
                CREATE_PROPOSAL_BASE_DATA_LEN
                    + args.execution.map_or(0, |execution| execution.trailing_len())
            }
            Self::CastVote(_) => CAST_VOTE_DATA_LEN,
            Self::ExecuteProposal(_) => EXECUTE_PROPOSAL_DATA_LEN,
        }
    }

    /// Field values in schema terms.
    #[must_use]
    pub fn to_record(&self) -> Record {
        match self {
            Self::CreateSquad(args) => args.to_record(),
            Self::AddMembersToSquad(args) => args.to_record(),
            Self::CreateProposalAccount(args) => args.to_record(),
            Self::CastVote(args) => args.to_record(),
            Self::ExecuteProposal(args) => args.to_record(),
        }
    }

    /// Layout of this record's kind.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::UnsupportedInstruction`] if the kind has no schema.
    pub fn schema(&self) -> Result<Structure, SdkError> {
        let kind = self.kind();
        kind.schema()
            .ok_or_else(|| SdkError::UnsupportedInstruction(kind.to_string()))
    }

    /// Encodes the record into a buffer of exactly [`Self::data_len`] bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if a value does not fit, or if the allocated length
    /// disagrees with the schema span.
    pub fn encode(&self) -> Result<Vec<u8>, SdkError> {
        let mut data = vec![0u8; self.data_len()];
        self.schema()?.encode_exact(&self.to_record(), &mut data)?;
        Ok(data)
    }
}

impl From<CreateSquadArgs> for SquadsInstructionArgs {
    fn from(args: CreateSquadArgs) -> Self {
        Self::CreateSquad(args)
    }
}

impl From<AddMembersToSquadArgs> for SquadsInstructionArgs {
    fn from(args: AddMembersToSquadArgs) -> Self {
        Self::AddMembersToSquad(args)
    }
}

impl From<CreateProposalAccountArgs> for SquadsInstructionArgs {
    fn from(args: CreateProposalAccountArgs) -> Self {
        Self::CreateProposalAccount(args)
    }
}

impl From<CastVoteArgs> for SquadsInstructionArgs {
    fn from(args: CastVoteArgs) -> Self {
        Self::CastVote(args)
    }
}

impl From<ExecuteProposalArgs> for SquadsInstructionArgs {
    fn from(args: ExecuteProposalArgs) -> Self {
        Self::ExecuteProposal(args)
    }
}
