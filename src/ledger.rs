use crate::error::ContractError;
use crate::id::Principal;
use crate::registry::AssetId;
use std::collections::HashMap;

/// Balances computed for a transfer that has passed every check but is not applied yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedTransfer {
    pub asset_id: AssetId,
    pub sender: Principal,
    pub recipient: Principal,
    pub amount: u64,

    /// Sender balance before the transfer
    pub sender_before: u64,
    pub sender_after: u64,
    pub recipient_after: u64,
}

impl PlannedTransfer {
    /// Whether the sender's entire position moves
    pub fn is_full_position(&self) -> bool {
        self.amount == self.sender_before
    }
}

/// Per-(asset, holder) share balances
#[derive(Debug, Clone, Default)]
pub struct ShareLedger {
    balances: HashMap<(AssetId, Principal), u64>,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded balance, `None` if the pair was never touched
    pub fn get(&self, asset_id: AssetId, holder: &Principal) -> Option<u64> {
        self.balances.get(&(asset_id, *holder)).copied()
    }

    pub fn balance_of(&self, asset_id: AssetId, holder: &Principal) -> u64 {
        self.get(asset_id, holder).unwrap_or(0)
    }

    /// Credit the full supply of a freshly created asset to its creator
    pub(crate) fn issue(&mut self, asset_id: AssetId, creator: Principal, total_supply: u64) {
        self.balances.insert((asset_id, creator), total_supply);
    }

    /// Compute the balances a transfer would produce without touching the ledger
    pub fn plan_transfer(
        &self,
        asset_id: AssetId,
        sender: Principal,
        recipient: Principal,
        amount: u64,
    ) -> Result<PlannedTransfer, ContractError> {
        let sender_before = self.balance_of(asset_id, &sender);
        let remaining = sender_before
            .checked_sub(amount)
            .ok_or(ContractError::InsufficientShares)?;

        let (sender_after, recipient_after) = if sender == recipient {
            (sender_before, sender_before)
        } else {
            let credited = self
                .balance_of(asset_id, &recipient)
                .checked_add(amount)
                .ok_or(ContractError::TransferFailed)?;
            (remaining, credited)
        };

        Ok(PlannedTransfer {
            asset_id,
            sender,
            recipient,
            amount,
            sender_before,
            sender_after,
            recipient_after,
        })
    }

    pub(crate) fn apply(&mut self, plan: &PlannedTransfer) {
        self.balances
            .insert((plan.asset_id, plan.sender), plan.sender_after);
        self.balances
            .insert((plan.asset_id, plan.recipient), plan.recipient_after);
    }

    /// Holders with a non-zero balance, ordered by principal
    pub fn holders(&self, asset_id: AssetId) -> Vec<(Principal, u64)> {
        let mut holders: Vec<(Principal, u64)> = self
            .balances
            .iter()
            .filter(|((id, _), balance)| *id == asset_id && **balance > 0)
            .map(|((_, holder), balance)| (*holder, *balance))
            .collect();
        holders.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        holders
    }

    /// Sum of every balance recorded for an asset
    pub fn total_for(&self, asset_id: AssetId) -> u128 {
        self.balances
            .iter()
            .filter(|((id, _), _)| *id == asset_id)
            .map(|(_, balance)| u128::from(*balance))
            .sum()
    }
}
