use core::fmt;
use core::str::FromStr;

use alloy_primitives::{hex, Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Hex length (with `0x`) of ERC-20 transfer amount terms: 20-byte token + 32-byte amount.
pub const ERC20_TRANSFER_AMOUNT_TERMS_LEN: usize = 2 + 40 + 64;

/// Hex length (with `0x`) of native transfer amount terms: 32-byte amount.
pub const NATIVE_TOKEN_TRANSFER_AMOUNT_TERMS_LEN: usize = 2 + 64;

/// Caveat kinds known to the delegation framework.
///
/// Serialized names match the enforcer keys of the network environment table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CaveatKind {
    #[serde(rename = "ERC20TransferAmount")]
    Erc20TransferAmount,
    #[serde(rename = "NativeTokenTransferAmount")]
    NativeTokenTransferAmount,
    /// Allowed targets / allowed methods restriction. Recognized, never encoded.
    #[serde(rename = "FunctionCall")]
    FunctionCall,
}

impl CaveatKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CaveatKind::Erc20TransferAmount => "ERC20TransferAmount",
            CaveatKind::NativeTokenTransferAmount => "NativeTokenTransferAmount",
            CaveatKind::FunctionCall => "FunctionCall",
        }
    }

    /// Exact hex length of the terms for this kind, if the kind has a fixed layout.
    pub const fn terms_len(&self) -> Option<usize> {
        match self {
            CaveatKind::Erc20TransferAmount => Some(ERC20_TRANSFER_AMOUNT_TERMS_LEN),
            CaveatKind::NativeTokenTransferAmount => Some(NATIVE_TOKEN_TRANSFER_AMOUNT_TERMS_LEN),
            CaveatKind::FunctionCall => None,
        }
    }
}

impl fmt::Display for CaveatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaveatKind {
    type Err = UnknownCaveatKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "ERC20TransferAmount" | "erc20TransferAmount" | "erc20" => CaveatKind::Erc20TransferAmount,
            "NativeTokenTransferAmount" | "nativeTokenTransferAmount" | "native" => {
                CaveatKind::NativeTokenTransferAmount
            }
            "FunctionCall" | "functionCall" | "function-call" => CaveatKind::FunctionCall,
            _ => return Err(UnknownCaveatKind(s.to_string())),
        };
        Ok(kind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownCaveatKind(pub String);

impl fmt::Display for UnknownCaveatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown caveat kind: {}", self.0)
    }
}

impl std::error::Error for UnknownCaveatKind {}

/// Encoded caveat terms: `0x`-prefixed lowercase hex of a fixed-width byte layout.
///
/// Values are produced by the codec; deserialized values are not re-validated here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaveatTerms(String);

impl CaveatTerms {
    /// Wrap an already-encoded terms string.
    pub fn from_encoded(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the hex rendering, including the `0x` prefix.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the underlying byte layout.
    pub fn byte_len(&self) -> usize {
        self.0.len().saturating_sub(2) / 2
    }

    /// Raw terms bytes, as passed to the enforcer contract.
    pub fn to_bytes(&self) -> Result<Bytes, hex::FromHexError> {
        hex::decode(&self.0).map(Bytes::from)
    }
}

impl AsRef<str> for CaveatTerms {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaveatTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A caveat attached to a delegation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caveat {
    /// Enforcer contract that interprets `terms`.
    pub enforcer: Address,
    pub terms: CaveatTerms,
    /// Redemption-time arguments; always empty for caveats built here.
    pub args: Bytes,
}

impl Caveat {
    pub fn new(enforcer: Address, terms: CaveatTerms) -> Self {
        Self { enforcer, terms, args: Bytes::new() }
    }
}

/// Decoded ERC-20 transfer amount terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20TransferAmountTerms {
    pub token_address: Address,
    pub max_amount: U256,
}

/// Decoded native token transfer amount terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTokenTransferAmountTerms {
    pub max_amount: U256,
}
