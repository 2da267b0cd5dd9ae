//! Signing and relaying capabilities.
//!
//! The codec never talks to a wallet or bundler. Callers inject these
//! capabilities; [`LocalKeySigner`] is the in-process implementation used by
//! the tooling and tests.

use alloy_primitives::{Address, Bytes};
use heekowave_delegation_types::{Delegation, DelegationInfo};
use k256::ecdsa::SigningKey;

use crate::encoder::{delegation_digest, keccak256_bytes};
use crate::errors::{CodecError, Result};
use crate::network::NetworkConfig;

/// Produces the delegator's signature over an unsigned delegation.
pub trait DelegationSigner {
    /// Account whose signature this signer produces.
    fn address(&self) -> Address;

    fn sign_delegation(&self, delegation: &Delegation, network: &NetworkConfig) -> Result<Bytes>;
}

/// Hands a signed delegation to whatever redeems it (relayer, queue, file).
pub trait DelegationRelay {
    /// Returns an identifier for the submission (tx hash, queue id, path).
    fn submit(&self, info: &DelegationInfo) -> Result<String>;
}

/// ECDSA signer over the delegation manager's EIP-712 digest.
pub struct LocalKeySigner {
    key: SigningKey,
}

impl LocalKeySigner {
    pub fn from_bytes(secret: &[u8]) -> Result<Self> {
        let key = SigningKey::from_slice(secret).map_err(|e| CodecError::Signer(e.to_string()))?;
        Ok(Self { key })
    }

    /// Parse a 32-byte private key, with or without `0x`.
    pub fn from_hex(secret: &str) -> Result<Self> {
        let secret = secret.trim();
        let digits = secret.strip_prefix("0x").unwrap_or(secret);
        let bytes = hex::decode(digits).map_err(|_| CodecError::Signer("private key is not valid hex".into()))?;
        Self::from_bytes(&bytes)
    }
}

impl DelegationSigner for LocalKeySigner {
    fn address(&self) -> Address {
        let point = self.key.verifying_key().to_encoded_point(false);
        // uncompressed point: 0x04 || x || y
        let hash = keccak256_bytes(&point.as_bytes()[1..]);
        Address::from_slice(&hash[12..])
    }

    /// 65-byte `r || s || v` signature, v in {27, 28}.
    fn sign_delegation(&self, delegation: &Delegation, network: &NetworkConfig) -> Result<Bytes> {
        let digest = delegation_digest(delegation, &network.eip712_domain())?;
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(|e| CodecError::Signer(e.to_string()))?;

        let mut sig_bytes = Vec::with_capacity(65);
        sig_bytes.extend_from_slice(&signature.to_bytes());
        sig_bytes.push(27 + recovery_id.to_byte());
        Ok(Bytes::from(sig_bytes))
    }
}
