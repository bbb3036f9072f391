use crate::error::ContractError;
use crate::id::Principal;
use crate::registry::AssetId;
use std::collections::HashMap;

/// One-of-a-kind title tokens, one per asset
///
/// The holder of a title is a marker for whoever took over a complete
/// position; balances in the share ledger stay authoritative.
#[derive(Debug, Clone, Default)]
pub struct TitleTokens {
    owners: HashMap<AssetId, Principal>,
}

impl TitleTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self, asset_id: AssetId) -> Option<Principal> {
        self.owners.get(&asset_id).copied()
    }

    /// Whether `holder` currently holds the title for `asset_id`
    pub fn is_held_by(&self, asset_id: AssetId, holder: &Principal) -> bool {
        self.owners.get(&asset_id) == Some(holder)
    }

    pub fn can_mint(&self, asset_id: AssetId) -> bool {
        !self.owners.contains_key(&asset_id)
    }

    pub fn mint(&mut self, asset_id: AssetId, recipient: Principal) -> Result<(), ContractError> {
        if !self.can_mint(asset_id) {
            return Err(ContractError::TransferFailed);
        }
        self.owners.insert(asset_id, recipient);
        Ok(())
    }

    pub fn transfer(
        &mut self,
        asset_id: AssetId,
        sender: &Principal,
        recipient: Principal,
    ) -> Result<(), ContractError> {
        match self.owners.get_mut(&asset_id) {
            Some(owner) if owner == sender => {
                *owner = recipient;
                Ok(())
            }
            _ => Err(ContractError::TransferFailed),
        }
    }
}
