use curve25519_dalek::edwards::CompressedEdwardsY;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::ops::Deref;

// Principal identifies a caller, a share holder or the contract itself.
// It is a 32 byte long identifier, resembling a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Principal([u8; 32]);

impl Default for Principal {
    fn default() -> Self {
        Principal([0; 32])
    }
}

impl Deref for Principal {
    type Target = [u8; 32];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Principal {
    fn from(bytes: [u8; 32]) -> Self {
        Principal(bytes)
    }
}

impl Principal {
    pub fn new(bytes: [u8; 32]) -> Self {
        Principal(bytes)
    }

    pub fn create_principal_id(seeds: &[&[u8]], bump: u8) -> [u8; 32] {
        let mut hasher = Sha256::new();

        // Domain separator
        hasher.update(b"UNITS_Principal");

        for seed in seeds {
            hasher.update(seed);
        }

        hasher.update([bump]);

        hasher.finalize().into()
    }

    /// Check that a 32-byte array does not decode to a point on the ed25519 curve,
    /// i.e. no private key can ever sign for it
    pub fn is_off_curve(bytes: &[u8; 32]) -> bool {
        CompressedEdwardsY(*bytes).decompress().is_none()
    }

    /// Try to derive an off-curve Principal for the given seeds
    pub fn try_find_principal(seeds: &[&[u8]]) -> Option<(Principal, u8)> {
        for bump in 0..=u8::MAX {
            let id = Principal::create_principal_id(seeds, bump);
            if Principal::is_off_curve(&id) {
                return Some((Principal(id), bump));
            }
        }
        None
    }

    /// Derive the execution address of a contract from its name
    pub fn contract_address(contract_name: &str) -> Option<(Principal, u8)> {
        Principal::try_find_principal(&[b"contract".as_slice(), contract_name.as_bytes()])
    }
}
