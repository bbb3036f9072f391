pub mod compliance;
pub mod config;
pub mod context;
pub mod contract;
pub mod error;
pub mod events;
pub mod id;
pub mod ledger;
pub mod registry;
pub mod runtime;
pub mod title;
pub mod validation;

// Re-export the main types for convenience
pub use compliance::{ComplianceRecord, ComplianceTable};
pub use config::ContractConfig;
pub use context::{BlockHeight, CallContext, Height, HeightSource};
pub use contract::AssetContract;
pub use error::{ConfigError, ContractError, RuntimeError};
pub use events::{Event, EventId, EventLog, EventType};
pub use id::Principal;
pub use ledger::{PlannedTransfer, ShareLedger};
pub use registry::{Asset, AssetId, AssetRegistry};
pub use runtime::{Call, CallHash, CallOutput, CallReceipt, ContractRuntime, Runtime};
pub use title::TitleTokens;
