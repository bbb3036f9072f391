use crate::context::{CallContext, Height, HeightSource};
use crate::contract::AssetContract;
use crate::error::{ContractError, RuntimeError};
use crate::events::EventId;
use crate::id::Principal;
use crate::registry::AssetId;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// A call hash uniquely identifies a dispatched call
pub type CallHash = [u8; 32];

/// A mutating contract call as submitted by a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Call {
    CreateAsset {
        total_supply: u64,
        fractional_shares: u64,
        metadata_uri: String,
    },
    Transfer {
        asset_id: AssetId,
        recipient: Principal,
        amount: u64,
    },
    SetComplianceStatus {
        asset_id: AssetId,
        user: Principal,
        is_approved: bool,
    },
}

impl Call {
    pub fn encode(&self) -> Result<Vec<u8>, RuntimeError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, RuntimeError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Name of the contract operation this call maps to
    pub fn operation(&self) -> &'static str {
        match self {
            Call::CreateAsset { .. } => "create-asset",
            Call::Transfer { .. } => "transfer-fractional-ownership",
            Call::SetComplianceStatus { .. } => "set-compliance-status",
        }
    }
}

/// Value returned by a successful call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOutput {
    AssetCreated(AssetId),
    Transferred(bool),
    ComplianceSet(bool),
}

/// Record of one dispatched call, kept whether or not it succeeded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallReceipt {
    pub call_hash: CallHash,

    /// Position of this call among all calls the runtime dispatched
    pub sequence: u64,

    pub caller: Principal,

    /// Height the call executed at
    pub height: Height,

    pub outcome: Result<CallOutput, ContractError>,

    /// The event logged by the call, if it succeeded
    pub event_id: Option<EventId>,
}

impl CallReceipt {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Runtime for dispatching calls against a contract
pub trait Runtime {
    /// Execute a call on behalf of `caller` and return its receipt
    ///
    /// An `Err` means the call never reached the contract and left no trace.
    fn execute_call(&mut self, caller: Principal, call: Call) -> Result<CallReceipt, RuntimeError>;

    /// Get a receipt by its call hash
    fn get_receipt(&self, hash: &CallHash) -> Option<&CallReceipt>;
}

/// Binds a contract to a height source and keeps receipts of every call
///
/// Receipts are kept in memory for the lifetime of the runtime, including
/// those of rejected calls; the store is unbounded.
pub struct ContractRuntime<H: HeightSource> {
    contract: AssetContract,
    heights: H,
    receipts: HashMap<CallHash, CallReceipt>,
    sequence: u64,
}

impl<H: HeightSource> ContractRuntime<H> {
    pub fn new(contract: AssetContract, heights: H) -> Self {
        Self {
            contract,
            heights,
            receipts: HashMap::new(),
            sequence: 0,
        }
    }

    /// Read-only view of the contract
    pub fn contract(&self) -> &AssetContract {
        &self.contract
    }

    pub fn heights_mut(&mut self) -> &mut H {
        &mut self.heights
    }

    /// Number of calls dispatched so far
    pub fn call_count(&self) -> u64 {
        self.sequence
    }

    /// Number of receipts held
    pub fn receipt_count(&self) -> usize {
        self.receipts.len()
    }

    /// Decode a bincode-encoded call and execute it.
    /// Undecodable input is rejected before reaching the contract.
    pub fn execute_encoded(
        &mut self,
        caller: Principal,
        bytes: &[u8],
    ) -> Result<CallReceipt, RuntimeError> {
        let call = Call::decode(bytes)?;
        self.execute_with_encoding(caller, call, bytes)
    }

    fn call_hash(encoded: &[u8], ctx: &CallContext, sequence: u64) -> CallHash {
        let mut hasher = Sha256::new();

        // Domain separator
        hasher.update(b"UNITS_Call");

        hasher.update(encoded);
        hasher.update(*ctx.caller);
        hasher.update(ctx.height.to_le_bytes());
        hasher.update(sequence.to_le_bytes());

        hasher.finalize().into()
    }

    fn execute_with_encoding(
        &mut self,
        caller: Principal,
        call: Call,
        encoded: &[u8],
    ) -> Result<CallReceipt, RuntimeError> {
        let sequence = self.sequence;
        self.sequence = sequence
            .checked_add(1)
            .ok_or(RuntimeError::CallLimitReached)?;

        let ctx = CallContext::from_source(caller, &self.heights);
        let last_event = self.contract.get_last_event_id();
        let outcome = self.dispatch(&ctx, &call);
        let event_id = match outcome {
            Ok(_) => self
                .contract
                .get_last_event_id()
                .filter(|id| Some(*id) != last_event),
            Err(_) => None,
        };

        let receipt = CallReceipt {
            call_hash: Self::call_hash(encoded, &ctx, sequence),
            sequence,
            caller,
            height: ctx.height,
            outcome,
            event_id,
        };
        debug!(
            "Call #{} {} by {} at height {}: {:?}",
            sequence,
            call.operation(),
            caller,
            ctx.height,
            receipt.outcome
        );

        self.receipts.insert(receipt.call_hash, receipt.clone());
        Ok(receipt)
    }

    fn dispatch(&mut self, ctx: &CallContext, call: &Call) -> Result<CallOutput, ContractError> {
        match call {
            Call::CreateAsset {
                total_supply,
                fractional_shares,
                metadata_uri,
            } => self
                .contract
                .create_asset(ctx, *total_supply, *fractional_shares, metadata_uri)
                .map(CallOutput::AssetCreated),
            Call::Transfer {
                asset_id,
                recipient,
                amount,
            } => self
                .contract
                .transfer(ctx, *asset_id, *recipient, *amount)
                .map(CallOutput::Transferred),
            Call::SetComplianceStatus {
                asset_id,
                user,
                is_approved,
            } => self
                .contract
                .set_compliance_status(ctx, *asset_id, *user, *is_approved)
                .map(CallOutput::ComplianceSet),
        }
    }
}

impl<H: HeightSource> Runtime for ContractRuntime<H> {
    fn execute_call(&mut self, caller: Principal, call: Call) -> Result<CallReceipt, RuntimeError> {
        let encoded = call.encode()?;
        self.execute_with_encoding(caller, call, &encoded)
    }

    fn get_receipt(&self, hash: &CallHash) -> Option<&CallReceipt> {
        self.receipts.get(hash)
    }
}
