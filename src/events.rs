use crate::context::Height;
use crate::error::ContractError;
use crate::id::Principal;
use crate::registry::AssetId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sequential event identifier, starting at 1
pub type EventId = u64;

/// The kind of state change an event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    AssetCreated,
    Transfer,
    ComplianceUpdate,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::AssetCreated => "asset-created",
            EventType::Transfer => "transfer",
            EventType::ComplianceUpdate => "compliance-update",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable audit record of one successful mutating call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: EventId,
    pub event_type: EventType,
    pub asset_id: AssetId,

    /// Creator, sender, or the user whose compliance changed
    pub actor: Principal,

    /// Height at which the event was logged
    pub timestamp: Height,
}

/// Append-only event log
#[derive(Debug, Clone)]
pub struct EventLog {
    events: BTreeMap<EventId, Event>,
    next_event_id: EventId,
}

impl Default for EventLog {
    fn default() -> Self {
        Self {
            events: BTreeMap::new(),
            next_event_id: 1,
        }
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn starting_at(next_event_id: EventId) -> Self {
        Self {
            events: BTreeMap::new(),
            next_event_id,
        }
    }

    pub fn get(&self, event_id: EventId) -> Option<&Event> {
        self.events.get(&event_id)
    }

    pub fn len(&self) -> u64 {
        self.events.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events in id order
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.values().next_back()
    }

    /// Check that another event can be appended and return the id it would receive
    pub fn reserve(&self) -> Result<EventId, ContractError> {
        self.next_event_id
            .checked_add(1)
            .map(|_| self.next_event_id)
            .ok_or(ContractError::EventLoggingFailed)
    }

    /// Append an event under the next id
    pub(crate) fn log_event(
        &mut self,
        event_type: EventType,
        asset_id: AssetId,
        actor: Principal,
        timestamp: Height,
    ) -> Result<EventId, ContractError> {
        let event_id = self.reserve()?;
        self.events.insert(
            event_id,
            Event {
                event_id,
                event_type,
                asset_id,
                actor,
                timestamp,
            },
        );
        self.next_event_id = event_id + 1;
        Ok(event_id)
    }
}
