use heekowave_delegation_types::CaveatKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

/// Role an address plays in a delegation, used in zero-address errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressRole {
    Token,
    Delegate,
}

impl std::fmt::Display for AddressRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressRole::Token => f.write_str("Token"),
            AddressRole::Delegate => f.write_str("Delegate"),
        }
    }
}

/// Errors raised while validating, encoding, decoding or assembling delegations.
///
/// All of these are deterministic in their inputs; none is worth retrying.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Not `0x` followed by 40 hex digits, or a mixed-case address with a bad checksum.
    #[error("Invalid address format: {input} ({reason})")]
    InvalidFormat { input: String, reason: &'static str },

    /// Token address handed to the terms encoder is not a 42-character address.
    #[error("Invalid token address format: {0}")]
    InvalidAddressFormat(String),

    #[error("{0} address cannot be zero address")]
    ZeroAddressNotAllowed(AddressRole),

    #[error("Max amount must be positive, got {0}")]
    NegativeAmount(String),

    #[error("Invalid amount {input}: {reason}")]
    InvalidAmount { input: String, reason: &'static str },

    #[error("Invalid terms length for {kind}: expected {expected} characters, got {actual}")]
    InvalidTermsLength { kind: CaveatKind, expected: usize, actual: usize },

    #[error("Invalid terms encoding {terms}: {reason}")]
    InvalidTermsEncoding { terms: String, reason: &'static str },

    /// Post-condition of an encoder failed. Always a bug.
    #[error("Encoded {kind} terms have length {actual}, expected {expected}")]
    EncodingInvariantFailure { kind: CaveatKind, expected: usize, actual: usize },

    #[error("{kind} caveat enforcer not found in {network} configuration")]
    EnforcerNotConfigured { network: String, kind: CaveatKind },

    #[error("{0} scope not yet implemented")]
    NotImplemented(CaveatKind),

    #[error("Network configuration error: {0}")]
    NetworkConfig(String),

    #[error("Delegation signing failed: {0}")]
    Signer(String),

    #[error("Delegation relay failed: {0}")]
    Relay(String),
}
