use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents every way a contract operation can be rejected
///
/// Each kind carries a stable numeric code so hosts can surface it verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractError {
    /// The caller is not allowed to perform this operation
    #[error("unauthorized")]
    Unauthorized,

    /// Reserved; no current operation produces it
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The referenced asset does not exist
    #[error("invalid asset")]
    InvalidAsset,

    /// Moving or minting the title token failed
    #[error("title token transfer failed")]
    TransferFailed,

    /// The recipient is not approved for this asset
    #[error("compliance check failed")]
    ComplianceCheckFailed,

    /// An argument failed validation
    #[error("invalid input")]
    InvalidInput,

    /// The sender holds fewer shares than requested
    #[error("insufficient shares")]
    InsufficientShares,

    /// The event log could not record the operation
    #[error("event logging failed")]
    EventLoggingFailed,
}

impl ContractError {
    /// Stable numeric code of this error kind
    pub fn code(&self) -> u32 {
        match self {
            ContractError::Unauthorized => 100,
            ContractError::InsufficientFunds => 101,
            ContractError::InvalidAsset => 102,
            ContractError::TransferFailed => 103,
            ContractError::ComplianceCheckFailed => 104,
            ContractError::InvalidInput => 105,
            ContractError::InsufficientShares => 106,
            ContractError::EventLoggingFailed => 107,
        }
    }
}

/// Errors raised while building a contract from its configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("contract name must not be empty")]
    EmptyContractName,

    #[error("invalid metadata URI bounds: min {min}, max {max}")]
    InvalidUriBounds { min: usize, max: usize },

    #[error("no off-curve contract address for '{0}'")]
    NoContractAddress(String),

    #[error("administrator must differ from the contract address")]
    AdministratorIsContract,
}

/// Errors raised by the runtime before or around contract execution
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The contract could not be initialized
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An encoded call could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The runtime's call sequence counter is exhausted
    #[error("Call limit reached")]
    CallLimitReached,

    /// The contract rejected the call
    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),
}

impl From<bincode::Error> for RuntimeError {
    fn from(err: bincode::Error) -> Self {
        RuntimeError::Decode(err.to_string())
    }
}
