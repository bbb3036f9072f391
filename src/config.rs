use crate::error::ConfigError;
use crate::id::Principal;
use serde::{Deserialize, Serialize};

/// Default contract name used to derive the contract address
pub const DEFAULT_CONTRACT_NAME: &str = "fractional-assets";

/// Shortest accepted metadata URI, in bytes
pub const DEFAULT_MIN_METADATA_URI_LEN: usize = 6;

/// Longest accepted metadata URI, in bytes
pub const MAX_METADATA_URI_LEN: usize = 256;

/// Settings fixed when the contract is deployed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// The deploying identity; the only principal allowed to set compliance status
    pub administrator: Principal,

    /// Name the contract address is derived from
    #[serde(default = "ContractConfig::default_contract_name")]
    pub contract_name: String,

    /// Inclusive lower bound on metadata URI length
    #[serde(default = "ContractConfig::default_min_uri_len")]
    pub min_metadata_uri_len: usize,

    /// Inclusive upper bound on metadata URI length
    #[serde(default = "ContractConfig::default_max_uri_len")]
    pub max_metadata_uri_len: usize,
}

impl ContractConfig {
    fn default_contract_name() -> String {
        DEFAULT_CONTRACT_NAME.to_string()
    }

    fn default_min_uri_len() -> usize {
        DEFAULT_MIN_METADATA_URI_LEN
    }

    fn default_max_uri_len() -> usize {
        MAX_METADATA_URI_LEN
    }

    /// Create a configuration with default bounds for the given administrator
    pub fn new(administrator: Principal) -> Self {
        Self {
            administrator,
            contract_name: Self::default_contract_name(),
            min_metadata_uri_len: Self::default_min_uri_len(),
            max_metadata_uri_len: Self::default_max_uri_len(),
        }
    }

    pub fn with_contract_name(mut self, name: impl Into<String>) -> Self {
        self.contract_name = name.into();
        self
    }

    /// Override the metadata URI length bounds (both inclusive)
    pub fn with_metadata_uri_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_metadata_uri_len = min;
        self.max_metadata_uri_len = max;
        self
    }

    /// Accept any non-empty metadata URI up to the maximum length
    pub fn lenient_metadata_uri(self) -> Self {
        let max = self.max_metadata_uri_len;
        self.with_metadata_uri_bounds(1, max)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.contract_name.is_empty() {
            return Err(ConfigError::EmptyContractName);
        }
        if self.min_metadata_uri_len == 0
            || self.min_metadata_uri_len > self.max_metadata_uri_len
            || self.max_metadata_uri_len > MAX_METADATA_URI_LEN
        {
            return Err(ConfigError::InvalidUriBounds {
                min: self.min_metadata_uri_len,
                max: self.max_metadata_uri_len,
            });
        }
        Ok(())
    }
}
