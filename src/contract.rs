//! The fractional asset contract
//!
//! Every mutating entry point runs in two phases. The first phase performs all
//! validation and reserves every counter the call needs, touching nothing.
//! The second phase commits; it only runs once nothing can fail, so a
//! rejected call leaves the registry, ledger, titles and event log untouched.

use crate::compliance::{ComplianceRecord, ComplianceTable};
use crate::config::ContractConfig;
use crate::context::CallContext;
use crate::error::{ConfigError, ContractError};
use crate::events::{Event, EventId, EventLog, EventType};
use crate::id::Principal;
use crate::ledger::ShareLedger;
use crate::registry::{Asset, AssetId, AssetRegistry};
use crate::title::TitleTokens;
use crate::validation::{is_compliant, is_valid_asset_id, is_valid_metadata_uri, is_valid_principal};
use log::{debug, info, warn};

/// Registry, share ledger, compliance table, title tokens and event log of one deployment
#[derive(Debug, Clone)]
pub struct AssetContract {
    config: ContractConfig,
    contract_address: Principal,
    registry: AssetRegistry,
    ledger: ShareLedger,
    compliance: ComplianceTable,
    titles: TitleTokens,
    events: EventLog,
}

impl AssetContract {
    /// Deploy a contract with the given configuration
    pub fn new(config: ContractConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let (contract_address, _) = Principal::contract_address(&config.contract_name)
            .ok_or_else(|| ConfigError::NoContractAddress(config.contract_name.clone()))?;
        if contract_address == config.administrator {
            return Err(ConfigError::AdministratorIsContract);
        }

        info!(
            "Deployed contract '{}' at {} (administrator {})",
            config.contract_name, contract_address, config.administrator
        );

        Ok(Self {
            config,
            contract_address,
            registry: AssetRegistry::new(),
            ledger: ShareLedger::new(),
            compliance: ComplianceTable::new(),
            titles: TitleTokens::new(),
            events: EventLog::new(),
        })
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn administrator(&self) -> &Principal {
        &self.config.administrator
    }

    /// The contract's own execution address
    pub fn contract_address(&self) -> &Principal {
        &self.contract_address
    }

    /// Register a new asset and hand its full supply and title token to the caller
    ///
    /// # Returns
    /// The id of the new asset
    pub fn create_asset(
        &mut self,
        ctx: &CallContext,
        total_supply: u64,
        fractional_shares: u64,
        metadata_uri: &str,
    ) -> Result<AssetId, ContractError> {
        self.try_create_asset(ctx, total_supply, fractional_shares, metadata_uri)
            .map_err(|err| {
                warn!("create-asset by {} rejected: {}", ctx.caller, err);
                err
            })
    }

    fn try_create_asset(
        &mut self,
        ctx: &CallContext,
        total_supply: u64,
        fractional_shares: u64,
        metadata_uri: &str,
    ) -> Result<AssetId, ContractError> {
        if total_supply == 0
            || fractional_shares == 0
            || fractional_shares > total_supply
            || !is_valid_metadata_uri(
                metadata_uri,
                self.config.min_metadata_uri_len,
                self.config.max_metadata_uri_len,
            )
        {
            return Err(ContractError::InvalidInput);
        }

        let asset_id = self.registry.reserve_id().ok_or(ContractError::InvalidInput)?;
        if !self.titles.can_mint(asset_id) {
            return Err(ContractError::TransferFailed);
        }
        self.events.reserve()?;

        let caller = ctx.caller;
        self.registry.commit(Asset {
            asset_id,
            owner: caller,
            total_supply,
            fractional_shares,
            metadata_uri: metadata_uri.to_string(),
            is_transferable: true,
            created_at: ctx.height,
        });
        self.ledger.issue(asset_id, caller, total_supply);
        self.titles.mint(asset_id, caller)?;
        let event_id = self
            .events
            .log_event(EventType::AssetCreated, asset_id, caller, ctx.height)?;

        debug!(
            "Asset {} created by {} with supply {} (event {})",
            asset_id, caller, total_supply, event_id
        );
        Ok(asset_id)
    }

    /// Move `amount` shares of `asset_id` from the caller to `recipient`
    ///
    /// The title token follows only when the caller holds it and hands over
    /// their entire balance in this call.
    pub fn transfer(
        &mut self,
        ctx: &CallContext,
        asset_id: AssetId,
        recipient: Principal,
        amount: u64,
    ) -> Result<bool, ContractError> {
        self.try_transfer(ctx, asset_id, recipient, amount)
            .map_err(|err| {
                warn!(
                    "transfer of {} shares of asset {} from {} to {} rejected: {}",
                    amount, asset_id, ctx.caller, recipient, err
                );
                err
            })
    }

    fn try_transfer(
        &mut self,
        ctx: &CallContext,
        asset_id: AssetId,
        recipient: Principal,
        amount: u64,
    ) -> Result<bool, ContractError> {
        let caller = ctx.caller;
        let asset = self
            .registry
            .get(asset_id)
            .ok_or(ContractError::InvalidAsset)?;

        // The range check cannot fail once the lookup succeeded; it mirrors set_compliance_status
        if !is_valid_asset_id(asset_id, self.registry.next_asset_id())
            || !self.is_valid_principal(&recipient)
        {
            return Err(ContractError::InvalidInput);
        }
        if !asset.is_transferable {
            return Err(ContractError::Unauthorized);
        }
        // Only the receiving side is screened
        if !is_compliant(&self.compliance, asset_id, &recipient) {
            return Err(ContractError::ComplianceCheckFailed);
        }

        let plan = self.ledger.plan_transfer(asset_id, caller, recipient, amount)?;
        let moves_title = plan.is_full_position()
            && caller != recipient
            && self.titles.is_held_by(asset_id, &caller);
        self.events.reserve()?;

        self.ledger.apply(&plan);
        if moves_title {
            self.titles.transfer(asset_id, &caller, recipient)?;
        }
        let event_id = self
            .events
            .log_event(EventType::Transfer, asset_id, caller, ctx.height)?;

        debug!(
            "Transferred {} shares of asset {} from {} to {} (title moved: {}, event {})",
            amount, asset_id, caller, recipient, moves_title, event_id
        );
        Ok(true)
    }

    /// Approve or revoke `user` as a recipient of `asset_id`. Administrator only.
    pub fn set_compliance_status(
        &mut self,
        ctx: &CallContext,
        asset_id: AssetId,
        user: Principal,
        is_approved: bool,
    ) -> Result<bool, ContractError> {
        self.try_set_compliance_status(ctx, asset_id, user, is_approved)
            .map_err(|err| {
                warn!(
                    "set-compliance-status for {} on asset {} by {} rejected: {}",
                    user, asset_id, ctx.caller, err
                );
                err
            })
    }

    fn try_set_compliance_status(
        &mut self,
        ctx: &CallContext,
        asset_id: AssetId,
        user: Principal,
        is_approved: bool,
    ) -> Result<bool, ContractError> {
        if ctx.caller != self.config.administrator {
            return Err(ContractError::Unauthorized);
        }
        if !is_valid_asset_id(asset_id, self.registry.next_asset_id())
            || !self.is_valid_principal(&user)
        {
            return Err(ContractError::InvalidInput);
        }
        self.events.reserve()?;

        self.compliance
            .upsert(asset_id, user, is_approved, ctx.height, ctx.caller);
        let event_id = self
            .events
            .log_event(EventType::ComplianceUpdate, asset_id, user, ctx.height)?;

        debug!(
            "Compliance for {} on asset {} set to {} (event {})",
            user, asset_id, is_approved, event_id
        );
        Ok(is_approved)
    }

    fn is_valid_principal(&self, principal: &Principal) -> bool {
        is_valid_principal(principal, &self.config.administrator, &self.contract_address)
    }

    // ---- Read-only accessors ----

    pub fn get_asset_details(&self, asset_id: AssetId) -> Option<&Asset> {
        self.registry.get(asset_id)
    }

    /// Balance of `owner`, zero for pairs never touched
    pub fn get_owner_shares(&self, asset_id: AssetId, owner: &Principal) -> u64 {
        self.ledger.get(asset_id, owner).unwrap_or(0)
    }

    pub fn get_compliance_details(
        &self,
        asset_id: AssetId,
        user: &Principal,
    ) -> Option<&ComplianceRecord> {
        self.compliance.get(asset_id, user)
    }

    pub fn get_event(&self, event_id: EventId) -> Option<&Event> {
        self.events.get(event_id)
    }

    pub fn get_title_owner(&self, asset_id: AssetId) -> Option<Principal> {
        self.titles.owner(asset_id)
    }

    /// Id of the most recently created asset, 0 if none
    pub fn get_last_asset_id(&self) -> AssetId {
        self.registry.last_asset_id()
    }

    pub fn get_event_count(&self) -> u64 {
        self.events.len()
    }

    /// Id of the most recently logged event, if any
    pub fn get_last_event_id(&self) -> Option<EventId> {
        self.events.last().map(|event| event.event_id)
    }

    /// Holders with a non-zero balance, ordered by principal
    pub fn get_holders(&self, asset_id: AssetId) -> Vec<(Principal, u64)> {
        self.ledger.holders(asset_id)
    }

    /// Events in the order they were logged
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    #[cfg(test)]
    pub(crate) fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::tests::principal;
    use proptest::prelude::*;

    const URI: &str = "https://x/1";

    fn admin() -> Principal {
        principal(0xAD)
    }

    fn deploy() -> AssetContract {
        AssetContract::new(ContractConfig::new(admin())).unwrap()
    }

    fn ctx(caller: Principal, height: u64) -> CallContext {
        CallContext::new(caller, height)
    }

    fn approve(contract: &mut AssetContract, asset_id: AssetId, user: Principal) {
        contract
            .set_compliance_status(&ctx(admin(), 0), asset_id, user, true)
            .unwrap();
    }

    fn assert_supply_conserved(contract: &AssetContract, asset_id: AssetId) {
        let asset = contract.get_asset_details(asset_id).unwrap();
        let sum: u64 = contract.get_holders(asset_id).iter().map(|(_, b)| b).sum();
        assert_eq!(sum, asset.total_supply);
        assert_eq!(u128::from(asset.total_supply), contract.ledger.total_for(asset_id));
    }

    #[test]
    fn test_create_asset_scenario() {
        let mut contract = deploy();
        let p = principal(1);

        let asset_id = contract.create_asset(&ctx(p, 42), 1000, 100, URI).unwrap();
        assert_eq!(asset_id, 1);
        assert_eq!(contract.get_owner_shares(1, &p), 1000);
        assert_eq!(contract.get_title_owner(1), Some(p));

        let asset = contract.get_asset_details(1).unwrap();
        assert_eq!(asset.owner, p);
        assert_eq!(asset.total_supply, 1000);
        assert_eq!(asset.fractional_shares, 100);
        assert_eq!(asset.metadata_uri, URI);
        assert!(asset.is_transferable);
        assert_eq!(asset.created_at, 42);

        let event = contract.get_event(1).unwrap();
        assert_eq!(event.event_type, EventType::AssetCreated);
        assert_eq!(event.asset_id, 1);
        assert_eq!(event.actor, p);
        assert_eq!(event.timestamp, 42);
    }

    #[test]
    fn test_create_asset_boundaries() {
        let mut contract = deploy();
        let p = principal(1);
        let c = ctx(p, 0);

        assert_eq!(contract.create_asset(&c, 0, 0, URI), Err(ContractError::InvalidInput));
        assert_eq!(contract.create_asset(&c, 10, 0, URI), Err(ContractError::InvalidInput));
        assert_eq!(contract.create_asset(&c, 10, 11, URI), Err(ContractError::InvalidInput));
        assert_eq!(contract.create_asset(&c, 10, 1, ""), Err(ContractError::InvalidInput));
        assert_eq!(contract.create_asset(&c, 10, 1, "ipfs:"), Err(ContractError::InvalidInput));
        let long = "x".repeat(257);
        assert_eq!(contract.create_asset(&c, 10, 1, &long), Err(ContractError::InvalidInput));

        // Nothing was created or logged
        assert_eq!(contract.get_last_asset_id(), 0);
        assert_eq!(contract.get_event_count(), 0);
        assert!(contract.get_asset_details(1).is_none());

        // Edges that are allowed
        assert_eq!(contract.create_asset(&c, 10, 10, &"x".repeat(256)), Ok(1));
        assert_eq!(contract.create_asset(&c, 1, 1, "ipfs:/"), Ok(2));
    }

    #[test]
    fn test_lenient_uri_bounds() {
        let config = ContractConfig::new(admin()).lenient_metadata_uri();
        let mut contract = AssetContract::new(config).unwrap();
        let c = ctx(principal(1), 0);
        assert_eq!(contract.create_asset(&c, 10, 1, "a"), Ok(1));
        assert_eq!(contract.create_asset(&c, 10, 1, ""), Err(ContractError::InvalidInput));
    }

    #[test]
    fn test_asset_ids_are_gapless() {
        let mut contract = deploy();
        let creators = [principal(1), principal(2), principal(3)];
        let mut ids = Vec::new();
        for (i, creator) in creators.iter().cycle().take(9).enumerate() {
            // Interleave rejected calls
            let _ = contract.create_asset(&ctx(*creator, i as u64), 0, 1, URI);
            ids.push(contract.create_asset(&ctx(*creator, i as u64), 5, 1, URI).unwrap());
        }
        assert_eq!(ids, (1..=9).collect::<Vec<_>>());
        assert_eq!(contract.get_last_asset_id(), 9);
    }

    #[test]
    fn test_transfer_requires_recipient_compliance() {
        let mut contract = deploy();
        let (p, q) = (principal(1), principal(2));
        contract.create_asset(&ctx(p, 1), 1000, 100, URI).unwrap();

        assert_eq!(
            contract.transfer(&ctx(p, 2), 1, q, 100),
            Err(ContractError::ComplianceCheckFailed)
        );
        assert_eq!(contract.get_owner_shares(1, &p), 1000);
        assert_eq!(contract.get_owner_shares(1, &q), 0);
        assert_eq!(contract.get_event_count(), 1);
    }

    #[test]
    fn test_partial_then_full_transfer() {
        let mut contract = deploy();
        let (p, q) = (principal(1), principal(2));
        contract.create_asset(&ctx(p, 1), 1000, 100, URI).unwrap();
        approve(&mut contract, 1, q);

        assert_eq!(contract.transfer(&ctx(p, 3), 1, q, 100), Ok(true));
        assert_eq!(contract.get_owner_shares(1, &p), 900);
        assert_eq!(contract.get_owner_shares(1, &q), 100);
        assert_eq!(contract.get_title_owner(1), Some(p));
        assert_supply_conserved(&contract, 1);

        assert_eq!(contract.transfer(&ctx(p, 4), 1, q, 900), Ok(true));
        assert_eq!(contract.get_owner_shares(1, &p), 0);
        assert_eq!(contract.get_owner_shares(1, &q), 1000);
        assert_eq!(contract.get_title_owner(1), Some(q));
        assert_supply_conserved(&contract, 1);

        let event = contract.get_event(4).unwrap();
        assert_eq!(event.event_type, EventType::Transfer);
        assert_eq!(event.actor, p);
        assert_eq!(event.timestamp, 4);
    }

    #[test]
    fn test_overdraw_leaves_balances() {
        let mut contract = deploy();
        let (p, q) = (principal(1), principal(2));
        contract.create_asset(&ctx(p, 1), 1000, 100, URI).unwrap();
        approve(&mut contract, 1, q);
        let events_before = contract.get_event_count();

        assert_eq!(
            contract.transfer(&ctx(p, 2), 1, q, 1001),
            Err(ContractError::InsufficientShares)
        );
        assert_eq!(contract.get_owner_shares(1, &p), 1000);
        assert_eq!(contract.get_owner_shares(1, &q), 0);
        assert_eq!(contract.get_title_owner(1), Some(p));
        assert_eq!(contract.get_event_count(), events_before);

        // A holder with no shares cannot send any either
        assert_eq!(
            contract.transfer(&ctx(principal(3), 2), 1, q, 1),
            Err(ContractError::InsufficientShares)
        );
    }

    #[test]
    fn test_transfer_validation_order() {
        let mut contract = deploy();
        let (p, q) = (principal(1), principal(2));

        assert_eq!(
            contract.transfer(&ctx(p, 0), 1, q, 1),
            Err(ContractError::InvalidAsset)
        );
        assert_eq!(
            contract.transfer(&ctx(p, 0), 0, q, 1),
            Err(ContractError::InvalidAsset)
        );

        contract.create_asset(&ctx(p, 0), 10, 1, URI).unwrap();
        let admin = admin();
        let contract_address = *contract.contract_address();
        assert_eq!(
            contract.transfer(&ctx(p, 0), 1, admin, 1),
            Err(ContractError::InvalidInput)
        );
        assert_eq!(
            contract.transfer(&ctx(p, 0), 1, contract_address, 1),
            Err(ContractError::InvalidInput)
        );

        // Compliance is checked before the balance
        assert_eq!(
            contract.transfer(&ctx(p, 0), 1, q, 11),
            Err(ContractError::ComplianceCheckFailed)
        );
    }

    #[test]
    fn test_zero_amount_transfer_succeeds() {
        let mut contract = deploy();
        let (p, q) = (principal(1), principal(2));
        contract.create_asset(&ctx(p, 1), 1000, 100, URI).unwrap();
        approve(&mut contract, 1, q);
        let events_before = contract.get_event_count();

        assert_eq!(contract.transfer(&ctx(p, 2), 1, q, 0), Ok(true));
        assert_eq!(contract.get_owner_shares(1, &p), 1000);
        assert_eq!(contract.get_owner_shares(1, &q), 0);
        assert_eq!(contract.get_title_owner(1), Some(p));
        assert_eq!(contract.get_event_count(), events_before + 1);

        let event = contract.get_event(events_before + 1).unwrap();
        assert_eq!(event.event_type, EventType::Transfer);
        assert_eq!(event.actor, p);

        // A holder with nothing may send nothing; the title does not move
        approve(&mut contract, 1, principal(3));
        assert_eq!(contract.transfer(&ctx(principal(3), 3), 1, q, 0), Ok(true));
        assert_eq!(contract.get_title_owner(1), Some(p));
        assert_supply_conserved(&contract, 1);
    }

    #[test]
    fn test_non_transferable_asset() {
        let mut contract = deploy();
        let (p, q) = (principal(1), principal(2));
        contract.create_asset(&ctx(p, 0), 10, 1, URI).unwrap();
        approve(&mut contract, 1, q);

        // No operation freezes assets; flip the flag directly
        let mut asset = contract.registry.get(1).unwrap().clone();
        asset.is_transferable = false;
        let mut registry = AssetRegistry::new();
        registry.commit(asset);
        contract.registry = registry;

        assert_eq!(
            contract.transfer(&ctx(p, 1), 1, q, 1),
            Err(ContractError::Unauthorized)
        );
        assert_eq!(contract.get_owner_shares(1, &p), 10);
    }

    #[test]
    fn test_sender_compliance_not_required() {
        let mut contract = deploy();
        let (p, q, r) = (principal(1), principal(2), principal(3));
        contract.create_asset(&ctx(p, 0), 10, 1, URI).unwrap();
        approve(&mut contract, 1, q);
        contract.transfer(&ctx(p, 1), 1, q, 4).unwrap();

        // Revoke q, then let q send to an approved r
        contract
            .set_compliance_status(&ctx(admin(), 2), 1, q, false)
            .unwrap();
        approve(&mut contract, 1, r);
        assert_eq!(contract.transfer(&ctx(q, 3), 1, r, 4), Ok(true));
        assert_eq!(contract.get_owner_shares(1, &q), 0);
        assert_eq!(contract.get_owner_shares(1, &r), 4);

        // q can no longer receive
        assert_eq!(
            contract.transfer(&ctx(p, 4), 1, q, 1),
            Err(ContractError::ComplianceCheckFailed)
        );
    }

    #[test]
    fn test_partial_holder_full_divest_keeps_title() {
        let mut contract = deploy();
        let (p, q, r) = (principal(1), principal(2), principal(3));
        contract.create_asset(&ctx(p, 0), 10, 1, URI).unwrap();
        approve(&mut contract, 1, q);
        approve(&mut contract, 1, r);

        contract.transfer(&ctx(p, 1), 1, q, 3).unwrap();
        // q sends its entire (partial) position; the title stays with p
        assert_eq!(contract.transfer(&ctx(q, 2), 1, r, 3), Ok(true));
        assert_eq!(contract.get_title_owner(1), Some(p));
        assert_supply_conserved(&contract, 1);
    }

    #[test]
    fn test_title_follows_full_position_twice() {
        let mut contract = deploy();
        let (p, q, r) = (principal(1), principal(2), principal(3));
        contract.create_asset(&ctx(p, 0), 10, 1, URI).unwrap();
        approve(&mut contract, 1, q);
        approve(&mut contract, 1, r);

        contract.transfer(&ctx(p, 1), 1, q, 10).unwrap();
        assert_eq!(contract.get_title_owner(1), Some(q));
        contract.transfer(&ctx(q, 2), 1, r, 10).unwrap();
        assert_eq!(contract.get_title_owner(1), Some(r));
        assert_eq!(contract.get_owner_shares(1, &r), 10);
    }

    #[test]
    fn test_self_transfer() {
        let mut contract = deploy();
        let p = principal(1);
        contract.create_asset(&ctx(p, 0), 10, 1, URI).unwrap();
        approve(&mut contract, 1, p);

        assert_eq!(contract.transfer(&ctx(p, 1), 1, p, 10), Ok(true));
        assert_eq!(contract.get_owner_shares(1, &p), 10);
        assert_eq!(contract.get_title_owner(1), Some(p));
        assert_eq!(contract.get_event_count(), 3);
    }

    #[test]
    fn test_set_compliance_status() {
        let mut contract = deploy();
        let (p, q) = (principal(1), principal(2));
        contract.create_asset(&ctx(p, 0), 10, 1, URI).unwrap();

        assert_eq!(
            contract.set_compliance_status(&ctx(p, 5), 1, q, true),
            Err(ContractError::Unauthorized)
        );
        assert!(contract.get_compliance_details(1, &q).is_none());

        assert_eq!(
            contract.set_compliance_status(&ctx(admin(), 5), 2, q, true),
            Err(ContractError::InvalidInput)
        );
        assert_eq!(
            contract.set_compliance_status(&ctx(admin(), 5), 1, admin(), true),
            Err(ContractError::InvalidInput)
        );

        assert_eq!(contract.set_compliance_status(&ctx(admin(), 7), 1, q, true), Ok(true));
        let record = contract.get_compliance_details(1, &q).unwrap();
        assert!(record.is_approved);
        assert_eq!(record.last_updated, 7);
        assert_eq!(record.approved_by, admin());

        let event = contract.get_event(2).unwrap();
        assert_eq!(event.event_type, EventType::ComplianceUpdate);
        assert_eq!(event.actor, q);

        assert_eq!(contract.set_compliance_status(&ctx(admin(), 8), 1, q, false), Ok(false));
        assert!(!contract.get_compliance_details(1, &q).unwrap().is_approved);
        assert_eq!(contract.get_event_count(), 3);
    }

    #[test]
    fn test_unauthorized_checked_before_validation() {
        let mut contract = deploy();
        assert_eq!(
            contract.set_compliance_status(&ctx(principal(1), 0), 99, principal(2), true),
            Err(ContractError::Unauthorized)
        );
    }

    #[test]
    fn test_event_log_failure_is_atomic() {
        let mut contract = deploy();
        let (p, q) = (principal(1), principal(2));
        contract.create_asset(&ctx(p, 0), 10, 1, URI).unwrap();
        approve(&mut contract, 1, q);
        contract.events = EventLog::starting_at(u64::MAX);

        assert_eq!(
            contract.create_asset(&ctx(p, 1), 10, 1, URI),
            Err(ContractError::EventLoggingFailed)
        );
        assert_eq!(contract.get_last_asset_id(), 1);
        assert!(contract.get_asset_details(2).is_none());
        assert_eq!(contract.get_title_owner(2), None);

        assert_eq!(
            contract.transfer(&ctx(p, 1), 1, q, 10),
            Err(ContractError::EventLoggingFailed)
        );
        assert_eq!(contract.get_owner_shares(1, &p), 10);
        assert_eq!(contract.get_title_owner(1), Some(p));

        assert_eq!(
            contract.set_compliance_status(&ctx(admin(), 1), 1, q, false),
            Err(ContractError::EventLoggingFailed)
        );
        assert!(contract.get_compliance_details(1, &q).unwrap().is_approved);
    }

    #[test]
    fn test_exhausted_asset_ids() {
        let mut contract = deploy();
        contract.registry = AssetRegistry::starting_at(u64::MAX);
        assert_eq!(
            contract.create_asset(&ctx(principal(1), 0), 10, 1, URI),
            Err(ContractError::InvalidInput)
        );
        assert_eq!(contract.get_event_count(), 0);
    }

    #[test]
    fn test_assets_are_independent() {
        let mut contract = deploy();
        let (p, q) = (principal(1), principal(2));
        contract.create_asset(&ctx(p, 0), 10, 1, URI).unwrap();
        contract.create_asset(&ctx(q, 0), 20, 2, URI).unwrap();

        // Approval on asset 1 does not carry over to asset 2
        approve(&mut contract, 1, p);
        assert_eq!(
            contract.transfer(&ctx(q, 1), 2, p, 5),
            Err(ContractError::ComplianceCheckFailed)
        );
        assert_eq!(contract.get_owner_shares(1, &q), 0);
        assert_eq!(contract.get_title_owner(2), Some(q));
    }

    /// Five assets with supplies 100..=500, creator i holds asset i.
    /// The first four holders are approved on every asset, the fifth on none.
    fn seeded_contract() -> (AssetContract, Vec<Principal>) {
        let mut contract = deploy();
        let holders: Vec<Principal> = (1..=5).map(principal).collect();

        for (i, creator) in holders.iter().enumerate() {
            contract
                .create_asset(&ctx(*creator, 0), 100 * (i as u64 + 1), 1, URI)
                .unwrap();
        }
        for asset_id in 1..=5 {
            for holder in holders.iter().take(4) {
                approve(&mut contract, asset_id, *holder);
            }
        }
        (contract, holders)
    }

    proptest! {
        #[test]
        fn transfers_preserve_ledger_invariants(
            ops in proptest::collection::vec((1u64..=6, 0usize..5, 0usize..5, 0u64..600), 1..200)
        ) {
            let (mut contract, holders) = seeded_contract();

            for (height, (asset_id, sender_idx, recipient_idx, amount)) in ops.into_iter().enumerate() {
                let sender = holders[sender_idx];
                let recipient = holders[recipient_idx];

                let events_before = contract.get_event_count();
                let title_before = contract.get_title_owner(asset_id);
                let sender_before = contract.get_owner_shares(asset_id, &sender);
                let recipient_before = contract.get_owner_shares(asset_id, &recipient);

                let result = contract.transfer(&ctx(sender, height as u64), asset_id, recipient, amount);

                match result {
                    Ok(_) => {
                        prop_assert_eq!(contract.get_event_count(), events_before + 1);
                        let full = amount == sender_before && sender != recipient;
                        if full && title_before == Some(sender) {
                            prop_assert_eq!(contract.get_title_owner(asset_id), Some(recipient));
                        } else {
                            prop_assert_eq!(contract.get_title_owner(asset_id), title_before);
                        }
                        if sender != recipient {
                            prop_assert_eq!(contract.get_owner_shares(asset_id, &sender), sender_before - amount);
                            prop_assert_eq!(contract.get_owner_shares(asset_id, &recipient), recipient_before + amount);
                        }
                    }
                    Err(_) => {
                        prop_assert_eq!(contract.get_event_count(), events_before);
                        prop_assert_eq!(contract.get_title_owner(asset_id), title_before);
                        prop_assert_eq!(contract.get_owner_shares(asset_id, &sender), sender_before);
                        prop_assert_eq!(contract.get_owner_shares(asset_id, &recipient), recipient_before);
                    }
                }

                for id in 1..=5 {
                    assert_supply_conserved(&contract, id);
                }
            }

            let ids: Vec<EventId> = contract.events().map(|e| e.event_id).collect();
            prop_assert_eq!(ids, (1..=contract.get_event_count()).collect::<Vec<_>>());
        }

        #[test]
        fn create_asset_accepts_exactly_valid_inputs(
            total_supply in 0u64..2000,
            fractional_shares in 0u64..2000,
            uri_len in 0usize..300,
        ) {
            let mut contract = deploy();
            let uri = "u".repeat(uri_len);
            let expected_valid = total_supply > 0
                && fractional_shares > 0
                && fractional_shares <= total_supply
                && is_valid_metadata_uri(&uri, 6, 256);

            let result = contract.create_asset(&ctx(principal(1), 3), total_supply, fractional_shares, &uri);
            if expected_valid {
                prop_assert_eq!(result, Ok(1));
                prop_assert_eq!(contract.get_owner_shares(1, &principal(1)), total_supply);
                prop_assert_eq!(contract.get_title_owner(1), Some(principal(1)));
                prop_assert_eq!(contract.get_event_count(), 1);
            } else {
                prop_assert_eq!(result, Err(ContractError::InvalidInput));
                prop_assert!(contract.get_asset_details(1).is_none());
                prop_assert_eq!(contract.get_event_count(), 0);
            }
        }
    }

    #[test]
    fn test_deploy_rejects_bad_config() {
        let config = ContractConfig::new(admin()).with_contract_name("");
        assert_eq!(
            AssetContract::new(config).unwrap_err(),
            ConfigError::EmptyContractName
        );
    }
}
