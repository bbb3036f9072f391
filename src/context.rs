//! Collaborators supplied by the host for every invocation
//!
//! The contract trusts the caller identity it is handed and never mutates the
//! height source; it reads the height exactly once per operation.

use crate::id::Principal;
use serde::{Deserialize, Serialize};

/// Block height used to stamp assets, compliance records and events
pub type Height = u64;

/// Source of the current height
pub trait HeightSource {
    /// The current height. Successive reads must never decrease.
    fn current_height(&self) -> Height;
}

impl<F> HeightSource for F
where
    F: Fn() -> Height,
{
    fn current_height(&self) -> Height {
        self()
    }
}

/// A manually advanced height counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeight(Height);

impl BlockHeight {
    pub fn new(height: Height) -> Self {
        Self(height)
    }

    /// Move to the next height and return it
    pub fn advance(&mut self) -> Height {
        self.0 = self.0.saturating_add(1);
        self.0
    }

    /// Jump forward; heights in the past are ignored
    pub fn advance_to(&mut self, height: Height) {
        self.0 = self.0.max(height);
    }
}

impl HeightSource for BlockHeight {
    fn current_height(&self) -> Height {
        self.0
    }
}

/// Identity and height for a single contract invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// The authenticated caller
    pub caller: Principal,

    /// Height read from the host for this invocation
    pub height: Height,
}

impl CallContext {
    pub fn new(caller: Principal, height: Height) -> Self {
        Self { caller, height }
    }

    /// Build a context by reading the height once from `source`
    pub fn from_source<H: HeightSource + ?Sized>(caller: Principal, source: &H) -> Self {
        Self::new(caller, source.current_height())
    }
}
