//! Shared types for Heekowave delegations: caveats, terms, delegation records.

pub mod caveats;
pub mod delegation;

pub use caveats::{
    Caveat, CaveatKind, CaveatTerms, Erc20TransferAmountTerms, NativeTokenTransferAmountTerms,
    UnknownCaveatKind, ERC20_TRANSFER_AMOUNT_TERMS_LEN, NATIVE_TOKEN_TRANSFER_AMOUNT_TERMS_LEN,
};
pub use delegation::{
    Delegation, DelegationInfo, DelegationScope, PLACEHOLDER_CAVEAT_HASH, ROOT_AUTHORITY,
};

/// Decimals of the USD stablecoin used for payments.
pub const USDC_DECIMALS: u8 = 6;
