//! Per-network delegation framework configuration.
//!
//! Replaces process-wide environment constants: callers construct a
//! [`NetworkConfig`] (built-in or from JSON) and pass it where it is needed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use alloy_primitives::{address, Address};
use heekowave_delegation_types::CaveatKind;
use serde::{Deserialize, Serialize};

use crate::errors::{CodecError, Result};

pub const MONAD_TESTNET_CHAIN_ID: u64 = 10143;

/// EIP-712 domain of the delegation manager, minus the parts taken from the network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainConfig {
    pub name: String,
    pub version: String,
}

/// Fully resolved EIP-712 domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub delegation_manager: Address,
    pub entry_point: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    pub domain: DomainConfig,
    /// Enforcer contract per caveat kind. Missing or zero entries are not configured.
    #[serde(default)]
    pub caveat_enforcers: BTreeMap<CaveatKind, Address>,
}

impl NetworkConfig {
    /// Monad testnet deployment of the delegation framework.
    pub fn monad_testnet() -> Self {
        let mut caveat_enforcers = BTreeMap::new();
        caveat_enforcers.insert(
            CaveatKind::Erc20TransferAmount,
            address!("f100b0819427117EcF76Ed94B358B1A5b5C6D2Fc"),
        );
        // Not deployed on this network yet.
        caveat_enforcers.insert(CaveatKind::NativeTokenTransferAmount, Address::ZERO);

        Self {
            name: "monad-testnet".to_string(),
            chain_id: MONAD_TESTNET_CHAIN_ID,
            delegation_manager: address!("db9B1e94B5b69Df7e401DDbedE43491141047dB3"),
            entry_point: address!("0000000071727De22E5E9d8BAf0edAc6f37da032"),
            rpc_url: None,
            domain: DomainConfig { name: "MetaMask Delegation".to_string(), version: "1".to_string() },
            caveat_enforcers,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CodecError::NetworkConfig(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| CodecError::NetworkConfig(format!("failed reading {}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    /// Domain the delegation manager verifies signatures against.
    pub fn eip712_domain(&self) -> Eip712Domain {
        Eip712Domain {
            name: self.domain.name.clone(),
            version: self.domain.version.clone(),
            chain_id: self.chain_id,
            verifying_contract: self.delegation_manager,
        }
    }
}

/// Look up the enforcer contract for `kind` on `network`.
pub fn resolve_enforcer_address(network: &NetworkConfig, kind: CaveatKind) -> Result<Address> {
    match network.caveat_enforcers.get(&kind) {
        Some(enforcer) if !enforcer.is_zero() => Ok(*enforcer),
        _ => Err(CodecError::EnforcerNotConfigured { network: network.name.clone(), kind }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monad_erc20_enforcer_resolves() {
        let network = NetworkConfig::monad_testnet();
        let enforcer = resolve_enforcer_address(&network, CaveatKind::Erc20TransferAmount).unwrap();
        assert_eq!(enforcer.to_string(), "0xf100b0819427117EcF76Ed94B358B1A5b5C6D2Fc");
    }

    #[test]
    fn zero_placeholder_counts_as_not_configured() {
        let network = NetworkConfig::monad_testnet();
        assert_eq!(
            resolve_enforcer_address(&network, CaveatKind::NativeTokenTransferAmount),
            Err(CodecError::EnforcerNotConfigured {
                network: "monad-testnet".into(),
                kind: CaveatKind::NativeTokenTransferAmount
            })
        );
        assert!(matches!(
            resolve_enforcer_address(&network, CaveatKind::FunctionCall),
            Err(CodecError::EnforcerNotConfigured { .. })
        ));
    }

    #[test]
    fn loads_json_table() {
        let json = r#"{
            "name": "local",
            "chainId": 31337,
            "delegationManager": "0xdb9B1e94B5b69Df7e401DDbedE43491141047dB3",
            "entryPoint": "0x0000000071727De22E5E9d8BAf0edAc6f37da032",
            "domain": { "name": "DelegationManager", "version": "1" },
            "caveatEnforcers": {
                "NativeTokenTransferAmount": "0x1111111111111111111111111111111111111111"
            }
        }"#;
        let network = NetworkConfig::from_json_str(json).unwrap();
        assert_eq!(network.chain_id, 31337);
        assert_eq!(
            resolve_enforcer_address(&network, CaveatKind::NativeTokenTransferAmount).unwrap(),
            Address::repeat_byte(0x11)
        );
        assert!(resolve_enforcer_address(&network, CaveatKind::Erc20TransferAmount).is_err());
        assert_eq!(network.eip712_domain().verifying_contract, network.delegation_manager);
    }

    #[test]
    fn loads_json_file_and_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monad.json");
        let json = serde_json::to_string_pretty(&NetworkConfig::monad_testnet()).unwrap();
        std::fs::write(&path, json).unwrap();
        assert_eq!(NetworkConfig::from_json_file(&path).unwrap(), NetworkConfig::monad_testnet());

        let missing = NetworkConfig::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(CodecError::NetworkConfig(_))));
    }
}
