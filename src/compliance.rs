use crate::context::Height;
use crate::id::Principal;
use crate::registry::AssetId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Approval state of one user for one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    /// Whether the user may receive shares of the asset
    pub is_approved: bool,

    /// Height of the most recent update
    pub last_updated: Height,

    /// The administrator who made the update
    pub approved_by: Principal,
}

/// Per-(asset, user) approval flags
#[derive(Debug, Clone, Default)]
pub struct ComplianceTable {
    records: HashMap<(AssetId, Principal), ComplianceRecord>,
}

impl ComplianceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, asset_id: AssetId, user: &Principal) -> Option<&ComplianceRecord> {
        self.records.get(&(asset_id, *user))
    }

    /// Insert or overwrite the record for `(asset_id, user)`
    pub fn upsert(
        &mut self,
        asset_id: AssetId,
        user: Principal,
        is_approved: bool,
        height: Height,
        approved_by: Principal,
    ) -> &ComplianceRecord {
        let record = ComplianceRecord {
            is_approved,
            last_updated: height,
            approved_by,
        };
        let key = (asset_id, user);
        self.records.insert(key, record);
        &self.records[&key]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
