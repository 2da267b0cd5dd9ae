use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::caveats::{Caveat, CaveatKind};

/// Authority of a root delegation (no parent delegation).
pub const ROOT_AUTHORITY: B256 = B256::ZERO;

/// `caveatHash` reported alongside a delegation; the delegation manager computes the real value.
pub const PLACEHOLDER_CAVEAT_HASH: &str = "0x";

/// Delegation record in the delegation framework's struct layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegate: Address,
    pub delegator: Address,
    /// Parent delegation hash, or [`ROOT_AUTHORITY`].
    pub authority: B256,
    pub caveats: Vec<Caveat>,
    pub salt: U256,
    /// Empty until signed by the delegator.
    pub signature: Bytes,
}

impl Delegation {
    pub fn is_root(&self) -> bool {
        self.authority == ROOT_AUTHORITY
    }

    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }

    pub fn with_signature(mut self, signature: Bytes) -> Self {
        self.signature = signature;
        self
    }
}

/// What the delegate is allowed to do with the delegation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DelegationScope {
    #[serde(rename_all = "camelCase")]
    Erc20TransferAmount { token_address: String, max_amount: U256 },
    #[serde(rename_all = "camelCase")]
    NativeTokenTransferAmount { max_amount: U256 },
    /// Restrict to target contracts and 4-byte selectors.
    FunctionCall { targets: Vec<String>, selectors: Vec<String> },
}

impl DelegationScope {
    pub fn kind(&self) -> CaveatKind {
        match self {
            DelegationScope::Erc20TransferAmount { .. } => CaveatKind::Erc20TransferAmount,
            DelegationScope::NativeTokenTransferAmount { .. } => CaveatKind::NativeTokenTransferAmount,
            DelegationScope::FunctionCall { .. } => CaveatKind::FunctionCall,
        }
    }
}

/// Result of a delegation creation, as handed to the relayer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationInfo {
    pub delegator: Address,
    pub delegate: Address,
    pub caveat_hash: String,
    pub is_valid: bool,
    pub delegation: Delegation,
}
