//! Program configuration.
//!
//! Every external program identifier the builders reference is carried in a
//! [`ProgramConfig`] passed in explicitly, so switching deployments never
//! touches process-wide state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey, pubkey::Pubkey, sysvar};

use crate::error::SdkError;

/// Squads program on mainnet-beta and devnet.
pub const SQUADS_PROGRAM_ID: Pubkey = pubkey!("SQDSm7ifFqwmgxY5aL59BtHcBGHEgbg5thh4Y9ytdn3");

/// SPL Token program ID.
pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// SPL Associated Token Account program ID.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// System program ID.
pub const SYSTEM_PROGRAM_ID: Pubkey = pubkey!("11111111111111111111111111111111");

/// Deployment target.
///
/// The Squads program is published under the same address on every cluster,
/// so the cluster is a label and never changes [`ProgramConfig`] ids. A
/// deployment at another address is selected with [`ProgramConfig::new`] or
/// [`ProgramConfig::with_program_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    /// Mainnet-beta.
    Mainnet,
    /// Devnet.
    #[default]
    Devnet,
    /// Local validator.
    Localnet,
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mainnet => "mainnet",
            Self::Devnet => "devnet",
            Self::Localnet => "localnet",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Cluster {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Self::Mainnet),
            "devnet" => Ok(Self::Devnet),
            "localnet" | "localhost" => Ok(Self::Localnet),
            other => Err(SdkError::Serialization(format!("unknown cluster: {other}"))),
        }
    }
}

/// Program identifiers used by the Squads instruction builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramConfig {
    /// Squads program. Also the program every address is derived against.
    pub program_id: Pubkey,
    /// SPL Token program.
    pub token_program: Pubkey,
    /// System program.
    pub system_program: Pubkey,
    /// Associated Token Account program.
    pub associated_token_program: Pubkey,
    /// Rent sysvar.
    pub rent_sysvar: Pubkey,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self::for_cluster(Cluster::default())
    }
}

impl ProgramConfig {
    /// Creates a configuration for a Squads deployment at `program_id`,
    /// with the standard system programs.
    #[must_use]
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            token_program: TOKEN_PROGRAM_ID,
            system_program: SYSTEM_PROGRAM_ID,
            associated_token_program: ASSOCIATED_TOKEN_PROGRAM_ID,
            rent_sysvar: sysvar::rent::ID,
        }
    }

    /// Configuration for a known cluster.
    ///
    /// Every cluster resolves to [`SQUADS_PROGRAM_ID`]. A local validator is
    /// expected to load the program under that address.
    #[must_use]
    pub fn for_cluster(_cluster: Cluster) -> Self {
        Self::new(SQUADS_PROGRAM_ID)
    }

    /// Sets the Squads program ID.
    #[must_use]
    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    /// Sets the token program ID.
    #[must_use]
    pub fn with_token_program(mut self, token_program: Pubkey) -> Self {
        self.token_program = token_program;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the Squads program ID is unset.
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.program_id == Pubkey::default() {
            return Err(SdkError::InvalidAddress(
                "program_id cannot be the default address".to_string(),
            ));
        }
        Ok(())
    }
}
