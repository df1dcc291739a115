//! Squads instruction schemas.
//!
//! Binds each [`SquadsInstruction`] kind to the [`Structure`] the program
//! unpacks, and provides the argument records in [`args`]. Layouts mirror
//! the program's positional unpacking byte for byte; any change to the
//! program ABI must be carried into these tables by hand.

pub mod args;

pub use args::{
    AddMembersToSquadArgs, CastVoteArgs, CreateProposalAccountArgs, CreateSquadArgs,
    ExecuteProposalArgs, ProposalExecution, SquadsInstructionArgs,
};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SdkError;
use crate::layout::{Field, FieldKind, Record, SequenceCount, Structure};

/// Width of the squad name field.
pub const SQUAD_NAME_WIDTH: usize = 24;

/// Width of the squad description field.
pub const SQUAD_DESCRIPTION_WIDTH: usize = 36;

/// Width of the squad token symbol field.
pub const SQUAD_TOKEN_WIDTH: usize = 6;

/// Width of the random squad id.
pub const RANDOM_ID_WIDTH: usize = 10;

/// Width of a proposal title.
pub const PROPOSAL_TITLE_WIDTH: usize = 36;

/// Width of a proposal description.
pub const PROPOSAL_DESCRIPTION_WIDTH: usize = 496;

/// Width of a proposal link.
pub const PROPOSAL_LINK_WIDTH: usize = 48;

/// Width of one vote label.
pub const VOTE_LABEL_WIDTH: usize = 44;

/// Maximum number of vote labels on a proposal.
pub const MAX_VOTE_LABELS: usize = 5;

/// Payload length of `CreateSquad`.
pub const CREATE_SQUAD_DATA_LEN: usize = 81;

/// Payload length of `CreateProposalAccount` without optional trailing fields.
pub const CREATE_PROPOSAL_BASE_DATA_LEN: usize = 819;

/// Payload length of `AddMembersToSquad` before the allocation table.
pub const ADD_MEMBERS_HEADER_LEN: usize = 10;

/// Payload length of `CastVote`.
pub const CAST_VOTE_DATA_LEN: usize = 2;

/// Payload length of `ExecuteProposal`.
pub const EXECUTE_PROPOSAL_DATA_LEN: usize = 11;

/// Instruction discriminants of the Squads program, in program order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SquadsInstruction {
    /// Create a squad.
    CreateSquad = 0,
    /// Create a multisig squad.
    CreateMultisig = 1,
    /// Create a proposal.
    CreateProposalAccount = 2,
    /// Vote on a proposal.
    CastVote = 3,
    /// Vote on a multisig proposal.
    CastMultisigVote = 4,
    /// Execute a passed proposal.
    ExecuteProposal = 5,
    /// Execute a multisig proposal.
    ExecuteMultisigProposal = 6,
    /// Mint equity to new members.
    AddMembersToSquad = 7,
}

impl SquadsInstruction {
    /// Wire discriminant.
    #[must_use]
    pub const fn discriminant(self) -> u8 {
        self as u8
    }

    /// Payload layout for this kind.
    ///
    /// Returns `None` for the multisig kinds, which this crate does not build.
    #[must_use]
    pub fn schema(self) -> Option<Structure> {
        let fields = match self {
            Self::CreateSquad => vec![
                Field::u8("instruction"),
                Field::u8("allocation_type"),
                Field::u8("vote_support"),
                Field::u8("vote_quorum"),
                Field::u8("core_threshold"),
                Field::fixed_utf8("squad_name", SQUAD_NAME_WIDTH),
                Field::fixed_utf8("description", SQUAD_DESCRIPTION_WIDTH),
                Field::fixed_utf8("token", SQUAD_TOKEN_WIDTH),
                Field::fixed_utf8("random_id", RANDOM_ID_WIDTH),
            ],
            Self::AddMembersToSquad => vec![
                Field::u8("instruction"),
                Field::u8("members_num"),
                Field::reserved(8),
                Field::sequence(
                    "allocation_table",
                    FieldKind::U64,
                    SequenceCount::CountedBy("members_num"),
                ),
            ],
            Self::CreateProposalAccount => vec![
                Field::u8("instruction"),
                Field::u8("proposal_type"),
                Field::fixed_utf8("title", PROPOSAL_TITLE_WIDTH),
                Field::fixed_utf8("description", PROPOSAL_DESCRIPTION_WIDTH),
                Field::fixed_utf8("link", PROPOSAL_LINK_WIDTH),
                Field::u8("votes_num"),
                Field::sequence(
                    "votes_labels",
                    FieldKind::FixedUtf8(VOTE_LABEL_WIDTH),
                    SequenceCount::Fixed(MAX_VOTE_LABELS),
                ),
                Field::i64("start_timestamp"),
                Field::i64("close_timestamp"),
                Field::u64("amount").optional(),
                Field::u64("minimum_out").optional(),
            ],
            Self::CastVote => vec![Field::u8("instruction"), Field::u8("vote")],
            Self::ExecuteProposal => vec![
                Field::u8("instruction"),
                Field::fixed_utf8("random_id", RANDOM_ID_WIDTH),
            ],
            Self::CreateMultisig | Self::CastMultisigVote | Self::ExecuteMultisigProposal => {
                return None
            }
        };
        Some(Structure::new(fields))
    }
}

impl fmt::Display for SquadsInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateSquad => "CreateSquad",
            Self::CreateMultisig => "CreateMultisig",
            Self::CreateProposalAccount => "CreateProposalAccount",
            Self::CastVote => "CastVote",
            Self::CastMultisigVote => "CastMultisigVote",
            Self::ExecuteProposal => "ExecuteProposal",
            Self::ExecuteMultisigProposal => "ExecuteMultisigProposal",
            Self::AddMembersToSquad => "AddMembersToSquad",
        };
        write!(f, "{name}")
    }
}

impl TryFrom<u8> for SquadsInstruction {
    type Error = SdkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::CreateSquad),
            1 => Ok(Self::CreateMultisig),
            2 => Ok(Self::CreateProposalAccount),
            3 => Ok(Self::CastVote),
            4 => Ok(Self::CastMultisigVote),
            5 => Ok(Self::ExecuteProposal),
            6 => Ok(Self::ExecuteMultisigProposal),
            7 => Ok(Self::AddMembersToSquad),
            other => Err(SdkError::UnsupportedInstruction(format!(
                "unknown discriminant {other}"
            ))),
        }
    }
}

/// Proposal kinds understood by the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ProposalType {
    /// Free-text proposal with custom vote labels.
    #[default]
    Text = 0,
    /// Change the vote support threshold.
    ChangeSupport = 1,
    /// Change the vote quorum.
    ChangeQuorum = 2,
    /// Emergency quorum change.
    EmergencyQuorum = 3,
    /// Withdraw SOL from the treasury.
    WithdrawSol = 4,
    /// Withdraw tokens from the treasury.
    WithdrawToken = 5,
    /// Add a member.
    AddMember = 6,
    /// Remove a member.
    RemoveMember = 7,
    /// Mint more equity to a member.
    MintMoreTokens = 8,
}

impl From<ProposalType> for u8 {
    fn from(proposal_type: ProposalType) -> Self {
        proposal_type as u8
    }
}

/// Decodes an instruction payload into its kind and field values.
///
/// # Errors
///
/// Returns [`SdkError::Deserialization`] for an empty payload,
/// [`SdkError::UnsupportedInstruction`] for an unknown or multisig kind, or
/// any error raised while decoding the fields.
pub fn decode_instruction(data: &[u8]) -> Result<(SquadsInstruction, Record), SdkError> {
    let tag = data
        .first()
        .copied()
        .ok_or_else(|| SdkError::Deserialization("empty instruction data".to_string()))?;
    let kind = SquadsInstruction::try_from(tag)?;
    let schema = kind
        .schema()
        .ok_or_else(|| SdkError::UnsupportedInstruction(kind.to_string()))?;
    Ok((kind, schema.decode(data)?))
}

/// Truncates `input` to at most `width` bytes and right-pads it with spaces
/// to exactly `width` bytes.
///
/// Truncation is lossy: characters past the width are dropped silently.
/// It never splits a multi-byte character; when the cut falls inside one,
/// that character is dropped and the gap is padded.
#[must_use]
pub fn normalize_text(input: &str, width: usize) -> String {
    let mut end = input.len().min(width);
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    let kept = input.get(..end).unwrap_or_default();
    let mut normalized = String::with_capacity(width);
    normalized.push_str(kept);
    normalized.extend(std::iter::repeat(' ').take(width - end));
    normalized
}
