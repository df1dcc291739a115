//! Inspector configuration.
//!
//! Reads the squad to inspect from `SQUADS_*` environment variables.

use std::env;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use squads_sdk::config::{Cluster, ProgramConfig};
use squads_sdk::schema::RANDOM_ID_WIDTH;

/// Cluster name variable.
pub const CLUSTER_VAR: &str = "SQUADS_CLUSTER";
/// Program id override variable.
pub const PROGRAM_ID_VAR: &str = "SQUADS_PROGRAM_ID";
/// Squad admin variable.
pub const ADMIN_VAR: &str = "SQUADS_ADMIN";
/// Random squad id variable.
pub const RANDOM_ID_VAR: &str = "SQUADS_RANDOM_ID";
/// Comma-separated member list variable.
pub const MEMBERS_VAR: &str = "SQUADS_MEMBERS";
/// Proposal nonce variable.
pub const PROPOSAL_NONCE_VAR: &str = "SQUADS_PROPOSAL_NONCE";

/// Equity minted to each member in the sample batch.
pub const DEFAULT_MEMBER_ALLOCATION: u64 = 100_000;

/// Configuration for the inspector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectConfig {
    /// Cluster whose program id is used unless overridden.
    pub cluster: Cluster,

    /// Squads program override (base58).
    pub program_id: Option<String>,

    /// Squad admin (base58).
    pub admin: Option<String>,

    /// Random squad id. Generated when absent.
    pub random_id: Option<String>,

    /// Members to add (base58).
    pub members: Vec<String>,

    /// Proposal nonce to derive.
    pub proposal_nonce: i32,

    /// Equity minted to each member.
    pub member_allocation: u64,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            cluster: Cluster::default(),
            program_id: None,
            admin: None,
            random_id: None,
            members: Vec::new(),
            proposal_nonce: 1,
            member_allocation: DEFAULT_MEMBER_ALLOCATION,
        }
    }
}

impl InspectConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(cluster) = non_empty(CLUSTER_VAR) {
            config.cluster = cluster
                .parse()
                .map_err(|_| ConfigError::InvalidCluster(cluster.clone()))?;
        }
        config.program_id = non_empty(PROGRAM_ID_VAR).map(|value| value.trim().to_string());
        config.admin = non_empty(ADMIN_VAR).map(|value| value.trim().to_string());
        config.random_id = non_empty(RANDOM_ID_VAR).map(|value| value.trim().to_string());
        if let Some(members) = non_empty(MEMBERS_VAR) {
            config.members = members
                .split(',')
                .map(str::trim)
                .filter(|member| !member.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(nonce) = non_empty(PROPOSAL_NONCE_VAR) {
            config.proposal_nonce = nonce
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidProposalNonce(nonce.clone()))?;
        }

        Ok(config)
    }

    /// Sets the admin.
    #[must_use]
    pub fn with_admin(mut self, admin: impl Into<String>) -> Self {
        self.admin = Some(admin.into());
        self
    }

    /// Sets the random id.
    #[must_use]
    pub fn with_random_id(mut self, random_id: impl Into<String>) -> Self {
        self.random_id = Some(random_id.into());
        self
    }

    /// Sets the members.
    #[must_use]
    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.members = members;
        self
    }

    /// Sets the proposal nonce.
    #[must_use]
    pub fn with_proposal_nonce(mut self, nonce: i32) -> Self {
        self.proposal_nonce = nonce;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.program_config()?;
        self.parse_admin()?;
        self.parse_members()?;

        if let Some(random_id) = &self.random_id {
            if random_id.len() > RANDOM_ID_WIDTH {
                return Err(ConfigError::InvalidRandomId(random_id.clone()));
            }
        }

        if self.members.len() > usize::from(u8::MAX) {
            return Err(ConfigError::TooManyMembers(self.members.len()));
        }

        if self.proposal_nonce < 0 {
            return Err(ConfigError::InvalidProposalNonce(
                self.proposal_nonce.to_string(),
            ));
        }

        Ok(())
    }

    /// Program identifiers for the configured cluster and override.
    ///
    /// # Errors
    ///
    /// Returns an error if the override is not a valid address.
    pub fn program_config(&self) -> Result<ProgramConfig, ConfigError> {
        let config = ProgramConfig::for_cluster(self.cluster);
        let config = match &self.program_id {
            Some(program_id) => config.with_program_id(parse_pubkey(program_id)?),
            None => config,
        };
        config
            .validate()
            .map_err(|e| ConfigError::InvalidAddress(e.to_string()))?;
        Ok(config)
    }

    /// Parses the admin address.
    ///
    /// # Errors
    ///
    /// Returns an error if the admin is missing or invalid.
    pub fn parse_admin(&self) -> Result<Pubkey, ConfigError> {
        let admin = self.admin.as_deref().ok_or(ConfigError::MissingAdmin)?;
        parse_pubkey(admin)
    }

    /// Parses member addresses from base58 strings.
    ///
    /// # Errors
    ///
    /// Returns an error if any address is invalid.
    pub fn parse_members(&self) -> Result<Vec<Pubkey>, ConfigError> {
        self.members.iter().map(|s| parse_pubkey(s)).collect()
    }
}

fn parse_pubkey(s: &str) -> Result<Pubkey, ConfigError> {
    let bytes = bs58::decode(s)
        .into_vec()
        .map_err(|_| ConfigError::InvalidAddress(s.to_string()))?;

    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| ConfigError::InvalidAddress(s.to_string()))?;
    Ok(Pubkey::new_from_array(bytes))
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Unknown cluster name.
    #[error("invalid cluster: {0}")]
    InvalidCluster(String),

    /// Malformed address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Admin not configured.
    #[error("SQUADS_ADMIN must be set")]
    MissingAdmin,

    /// Random id longer than the on-chain field.
    #[error("random id must be at most 10 bytes: {0}")]
    InvalidRandomId(String),

    /// More members than one instruction can carry.
    #[error("at most 255 members allowed, got {0}")]
    TooManyMembers(usize),

    /// Malformed or negative proposal nonce.
    #[error("invalid proposal nonce: {0}")]
    InvalidProposalNonce(String),
}
