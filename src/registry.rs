use crate::context::Height;
use crate::id::Principal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sequential asset identifier, starting at 1
pub type AssetId = u64;

/// Authoritative record of a registered asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub asset_id: AssetId,

    /// The principal that created the asset
    pub owner: Principal,

    /// Total number of shares; the ledger always sums to this
    pub total_supply: u64,

    /// Stated minimum divisible unit. Validated at creation, not enforced on transfers.
    pub fractional_shares: u64,

    pub metadata_uri: String,

    /// Always true at creation; no operation changes it
    pub is_transferable: bool,

    /// Height at which the asset was created
    pub created_at: Height,
}

/// Registered assets and the id counter
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    assets: HashMap<AssetId, Asset>,
    next_asset_id: AssetId,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self {
            assets: HashMap::new(),
            next_asset_id: 1,
        }
    }
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn starting_at(next_asset_id: AssetId) -> Self {
        Self {
            assets: HashMap::new(),
            next_asset_id,
        }
    }

    pub fn get(&self, asset_id: AssetId) -> Option<&Asset> {
        self.assets.get(&asset_id)
    }

    /// The id the next created asset will receive
    pub fn next_asset_id(&self) -> AssetId {
        self.next_asset_id
    }

    /// The most recently assigned id, or 0 if nothing was created yet
    pub fn last_asset_id(&self) -> AssetId {
        self.next_asset_id - 1
    }

    /// Peek at the next id without consuming it.
    /// Returns `None` once the counter cannot advance any further.
    pub fn reserve_id(&self) -> Option<AssetId> {
        self.next_asset_id
            .checked_add(1)
            .map(|_| self.next_asset_id)
    }

    /// Store an asset under a previously reserved id and advance the counter
    pub(crate) fn commit(&mut self, asset: Asset) {
        debug_assert_eq!(asset.asset_id, self.next_asset_id);
        self.next_asset_id = asset.asset_id + 1;
        self.assets.insert(asset.asset_id, asset);
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
