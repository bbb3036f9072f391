//! Stateless predicates shared by the contract entry points

use crate::compliance::ComplianceTable;
use crate::id::Principal;
use crate::registry::AssetId;

/// Metadata URI length (in bytes) must fall within `[min_len, max_len]`
pub fn is_valid_metadata_uri(uri: &str, min_len: usize, max_len: usize) -> bool {
    let len = uri.len();
    len > 0 && len >= min_len && len <= max_len
}

/// An asset id is valid when it has already been handed out
pub fn is_valid_asset_id(asset_id: AssetId, next_asset_id: AssetId) -> bool {
    asset_id > 0 && asset_id < next_asset_id
}

/// Principals that may hold shares or receive compliance approval:
/// anyone except the administrator and the contract itself
pub fn is_valid_principal(
    principal: &Principal,
    administrator: &Principal,
    contract_address: &Principal,
) -> bool {
    principal != administrator && principal != contract_address
}

/// Absent records count as not approved
pub fn is_compliant(table: &ComplianceTable, asset_id: AssetId, user: &Principal) -> bool {
    table
        .get(asset_id, user)
        .map(|record| record.is_approved)
        .unwrap_or(false)
}
