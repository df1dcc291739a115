//! Inspection report.
//!
//! Derives every address of the configured squad, builds a sample batch
//! covering each supported instruction and decodes the payloads back so the
//! encoding can be checked by eye.

use chrono::{DateTime, Utc};
use serde::Serialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use squads_sdk::config::{Cluster, ProgramConfig};
use squads_sdk::instructions::{
    derive_member_equity_address, derive_proposal_address, derive_vote_address,
    AddMembersToSquadBuilder, CastVoteBuilder, CreateProposalBuilder, CreateSquadBuilder,
    ExecuteProposalBuilder, InstructionBatch, SquadPdas,
};
use squads_sdk::layout::FieldValue;
use squads_sdk::schema::decode_instruction;

use crate::config::InspectConfig;

/// A derived address and its bump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressEntry {
    /// Base58 address.
    pub address: String,
    /// Bump, when the address was derived here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bump: Option<u8>,
}

impl AddressEntry {
    fn new(address: &Pubkey, bump: Option<u8>) -> Self {
        Self {
            address: address.to_string(),
            bump,
        }
    }
}

/// Equity account of one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberEntry {
    /// Member address.
    pub member: String,
    /// Member equity account.
    pub equity: AddressEntry,
}

/// Every address of the inspected squad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SquadAddresses {
    /// Squad account.
    pub squad: AddressEntry,
    /// Squad mint (mint owner).
    pub mint_owner: AddressEntry,
    /// SOL treasury.
    pub treasury: AddressEntry,
    /// Proposal at the configured nonce.
    pub proposal: AddressEntry,
    /// Admin's vote record on that proposal.
    pub admin_vote: AddressEntry,
    /// Members in configuration order.
    pub members: Vec<MemberEntry>,
}

/// One account reference of an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountEntry {
    /// Account address.
    pub pubkey: String,
    /// Whether the account signs.
    pub is_signer: bool,
    /// Whether the account is writable.
    pub is_writable: bool,
}

/// One encoded instruction of the sample batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructionEntry {
    /// Instruction kind.
    pub kind: String,
    /// Target program.
    pub program_id: String,
    /// Accounts in program order.
    pub accounts: Vec<AccountEntry>,
    /// Payload length in bytes.
    pub data_len: usize,
    /// Hex-encoded payload.
    pub data_hex: String,
    /// Payload decoded against its schema.
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Full inspection report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Cluster the program id was taken from.
    pub cluster: Cluster,
    /// Squads program.
    pub program_id: String,
    /// Squad admin.
    pub admin: String,
    /// Random id of the squad, as written on chain.
    pub random_id: String,
    /// Derived addresses.
    pub addresses: SquadAddresses,
    /// Sample batch in append order.
    pub instructions: Vec<InstructionEntry>,
}

/// Builds the report for `config`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or any derivation or
/// encoding fails.
pub fn build_report(config: &InspectConfig) -> anyhow::Result<InspectReport> {
    config.validate()?;
    let program = config.program_config()?;
    let admin = config.parse_admin()?;
    let members = config.parse_members()?;

    let mut batch = InstructionBatch::new();
    let mut create_squad = CreateSquadBuilder::new(program)
        .payer(admin)
        .squad_name("inspected squad")
        .description("offline inspection")
        .token("INSP");
    if let Some(random_id) = &config.random_id {
        create_squad = create_squad.random_id(random_id.clone());
    }
    let created = create_squad.append_to(&mut batch)?;
    tracing::info!(squad = %created.squad, random_id = %created.random_id, "derived squad");

    let addresses = derive_addresses(&program, &admin, &created.random_id, config, &members)?;

    AddMembersToSquadBuilder::new(program)
        .initializer(admin)
        .squad(created.squad)
        .mint_owner(created.mint_owner)
        .members(
            members
                .iter()
                .map(|member| (*member, config.member_allocation)),
        )
        .append_to(&mut batch)?;

    let proposal = CreateProposalBuilder::new(program)
        .payer(admin)
        .squad(created.squad)
        .nonce(config.proposal_nonce)
        .title("Inspection proposal")
        .description("Sample text proposal")
        .votes_labels(["Approve", "Deny"])
        .append_to(&mut batch)?;

    CastVoteBuilder::new(program)
        .payer(admin)
        .squad(created.squad)
        .squad_mint(created.mint_owner)
        .proposal(proposal)
        .vote(0)
        .append_to(&mut batch)?;

    ExecuteProposalBuilder::new(program)
        .payer(admin)
        .squad(created.squad)
        .proposal(proposal)
        .random_id(created.random_id.clone())
        .append_to(&mut batch)?;

    let instructions = batch
        .iter()
        .map(describe_instruction)
        .collect::<anyhow::Result<Vec<_>>>()?;
    tracing::debug!(count = instructions.len(), "encoded sample batch");

    Ok(InspectReport {
        generated_at: Utc::now(),
        cluster: config.cluster,
        program_id: program.program_id.to_string(),
        admin: admin.to_string(),
        random_id: created.random_id,
        addresses,
        instructions,
    })
}

fn derive_addresses(
    program: &ProgramConfig,
    admin: &Pubkey,
    random_id: &str,
    config: &InspectConfig,
    members: &[Pubkey],
) -> anyhow::Result<SquadAddresses> {
    let program_id = &program.program_id;
    let pdas = SquadPdas::derive(program_id, admin, random_id)?;
    let (proposal, proposal_bump) =
        derive_proposal_address(program_id, &pdas.squad, config.proposal_nonce)?;
    let (admin_vote, admin_vote_bump) = derive_vote_address(program_id, &proposal, admin)?;

    let members = members
        .iter()
        .map(|member| -> anyhow::Result<MemberEntry> {
            let (equity, bump) = derive_member_equity_address(program_id, member, &pdas.squad)?;
            Ok(MemberEntry {
                member: member.to_string(),
                equity: AddressEntry::new(&equity, Some(bump)),
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(SquadAddresses {
        squad: AddressEntry::new(&pdas.squad, pdas.squad_bump),
        mint_owner: AddressEntry::new(&pdas.mint_owner, Some(pdas.mint_owner_bump)),
        treasury: AddressEntry::new(&pdas.treasury, Some(pdas.treasury_bump)),
        proposal: AddressEntry::new(&proposal, Some(proposal_bump)),
        admin_vote: AddressEntry::new(&admin_vote, Some(admin_vote_bump)),
        members,
    })
}

/// Describes one instruction, decoding its payload.
///
/// # Errors
///
/// Returns an error if the payload does not decode against its schema.
pub fn describe_instruction(instruction: &Instruction) -> anyhow::Result<InstructionEntry> {
    let (kind, record) = decode_instruction(&instruction.data)?;
    let fields = record
        .iter()
        .map(|(name, value)| (name.to_string(), field_to_json(value)))
        .collect();

    Ok(InstructionEntry {
        kind: kind.to_string(),
        program_id: instruction.program_id.to_string(),
        accounts: instruction
            .accounts
            .iter()
            .map(|meta| AccountEntry {
                pubkey: meta.pubkey.to_string(),
                is_signer: meta.is_signer,
                is_writable: meta.is_writable,
            })
            .collect(),
        data_len: instruction.data.len(),
        data_hex: hex::encode(&instruction.data),
        fields,
    })
}

fn field_to_json(value: &FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Int(n) => i64::try_from(*n)
            .map(serde_json::Value::from)
            .or_else(|_| u64::try_from(*n).map(serde_json::Value::from))
            .unwrap_or_else(|_| serde_json::Value::String(n.to_string())),
        FieldValue::Text(text) => {
            serde_json::Value::String(text.trim_end_matches(['\0', ' ']).to_string())
        }
        FieldValue::List(values) => values.iter().map(field_to_json).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: &str = "US517G5965aydkZ46HS38QLi7UQiSojurfbQfKCELFx";
    const MEMBER: &str = "cGfHiC6Kgg3FpFZvgwGcswsCRtp4aBP2fzuXRQPizuN";

    fn fixture_config() -> InspectConfig {
        InspectConfig::default()
            .with_admin(ADMIN)
            .with_random_id("abcd123456")
            .with_members(vec![MEMBER.to_string()])
    }

    #[test]
    fn test_report_addresses() {
        let report = build_report(&fixture_config()).expect("should build report");

        assert_eq!(report.random_id, "abcd123456");
        let addresses = &report.addresses;
        assert_eq!(
            addresses.squad.address,
            "HsxAvxzGww3LYHgyNCsqBZ69YDzWRgks1vGzhjMT6eqL"
        );
        assert_eq!(addresses.squad.bump, Some(254));
        assert_eq!(
            addresses.mint_owner.address,
            "29DjEPAYwwBmvZps9ivoMKKAZbDpvTzur5CyEHw9a9rv"
        );
        assert_eq!(
            addresses.treasury.address,
            "Fcf53y5ECvygjhrMrqy1McuFDx9NRykyNiVcAC91Gq4g"
        );
        assert_eq!(
            addresses.proposal.address,
            "DbypC5KXXwZUkeYvYuRRvAYQTueAHhkzGVT9AgvW6Hjj"
        );
        assert_eq!(addresses.members.len(), 1);
        assert_eq!(
            addresses.members[0].equity.address,
            "DBPaZrWWsSc5kWU53DDMvRi92RZPMo1bd93iPq8eXkz3"
        );
    }

    #[test]
    fn test_report_instructions() {
        let report = build_report(&fixture_config()).expect("should build report");

        let kinds: Vec<&str> = report
            .instructions
            .iter()
            .map(|entry| entry.kind.as_str())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "CreateSquad",
                "AddMembersToSquad",
                "CreateProposalAccount",
                "CastVote",
                "ExecuteProposal"
            ]
        );

        let lens: Vec<usize> = report
            .instructions
            .iter()
            .map(|entry| entry.data_len)
            .collect();
        assert_eq!(lens, vec![81, 18, 819, 2, 11]);
        assert_eq!(report.instructions[3].data_hex, "0300");
        assert_eq!(
            report.instructions[4].fields.get("random_id"),
            Some(&serde_json::Value::from("abcd123456"))
        );
        assert_eq!(
            report.instructions[2].fields.get("votes_labels"),
            Some(&serde_json::json!(["Approve", "Deny", "", "", ""]))
        );
    }

    #[test]
    fn test_report_generates_random_id() {
        let config = InspectConfig::default().with_admin(ADMIN);
        let report = build_report(&config).expect("should build report");
        assert_eq!(report.random_id.len(), 10);
        assert_eq!(report.addresses.members.len(), 0);
    }

    #[test]
    fn test_report_requires_admin() {
        assert!(build_report(&InspectConfig::default()).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let report = build_report(&fixture_config()).expect("should build report");
        let json = serde_json::to_value(&report).expect("should serialize");
        assert_eq!(json["cluster"], "devnet");
        assert_eq!(json["addresses"]["squad"]["bump"], 254);
    }

    #[test]
    fn test_field_to_json() {
        assert_eq!(field_to_json(&FieldValue::Int(-5)), serde_json::json!(-5));
        assert_eq!(
            field_to_json(&FieldValue::Int(i128::from(u64::MAX))),
            serde_json::json!(u64::MAX)
        );
        assert_eq!(
            field_to_json(&FieldValue::Text("SLIDE \0".to_string())),
            serde_json::json!("SLIDE")
        );
        assert_eq!(
            field_to_json(&FieldValue::List(vec![FieldValue::Int(1), FieldValue::Int(2)])),
            serde_json::json!([1, 2])
        );
    }
}
