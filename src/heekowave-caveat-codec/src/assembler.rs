//! Delegation assembly: scope -> caveats -> unsigned delegation -> signed info.

use alloy_primitives::{Address, Bytes, U256};
use heekowave_delegation_types::{
    Caveat, CaveatKind, Delegation, DelegationInfo, DelegationScope, PLACEHOLDER_CAVEAT_HASH,
    ROOT_AUTHORITY,
};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::address::{normalize_address, validate_delegate_address, validate_token_address};
use crate::encoder::{erc20_transfer_amount_terms, native_token_transfer_amount_terms};
use crate::errors::{CodecError, Result};
use crate::network::{resolve_enforcer_address, NetworkConfig};
use crate::signer::DelegationSigner;

/// Where a delegation's salt comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaltSource {
    Fixed(U256),
    /// Current wall-clock time in milliseconds.
    UnixMillis,
}

impl SaltSource {
    pub fn salt(&self) -> U256 {
        match self {
            SaltSource::Fixed(salt) => *salt,
            SaltSource::UnixMillis => {
                let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
                U256::from(millis.max(0) as u128)
            }
        }
    }
}

/// Library helper that builds delegations, tried before manual construction.
pub trait DelegationFactory {
    fn create_delegation(
        &self,
        delegator: Address,
        delegate: Address,
        caveats: &[Caveat],
    ) -> Result<Delegation>;
}

/// Root delegation with no signature.
pub fn build_unsigned_delegation(
    delegator: Address,
    delegate: Address,
    caveats: Vec<Caveat>,
    salt: &SaltSource,
) -> Delegation {
    Delegation {
        delegate,
        delegator,
        authority: ROOT_AUTHORITY,
        caveats,
        salt: salt.salt(),
        signature: Bytes::new(),
    }
}

/// Why a helper-built delegation cannot be used as-is, if at all.
fn helper_mismatch(
    delegation: &Delegation,
    delegator: Address,
    delegate: Address,
    caveats: &[Caveat],
) -> Option<&'static str> {
    if delegation.delegator != delegator {
        Some("delegator differs")
    } else if delegation.delegate != delegate {
        Some("delegate differs")
    } else if delegation.caveats != caveats {
        Some("caveats differ")
    } else if !delegation.is_root() {
        Some("not a root delegation")
    } else if delegation.is_signed() {
        Some("already signed")
    } else {
        None
    }
}

/// Try `helper` first; build the delegation manually if it is absent, fails,
/// or returns something other than the requested unsigned root delegation.
pub fn assemble_with_fallback(
    helper: Option<&dyn DelegationFactory>,
    delegator: Address,
    delegate: Address,
    caveats: Vec<Caveat>,
    salt: &SaltSource,
) -> Delegation {
    if let Some(helper) = helper {
        match helper.create_delegation(delegator, delegate, &caveats) {
            Ok(delegation) => match helper_mismatch(&delegation, delegator, delegate, &caveats) {
                None => return delegation,
                Some(reason) => {
                    warn!(reason, "delegation helper returned an unusable delegation, constructing delegation manually")
                }
            },
            Err(err) => warn!(error = %err, "delegation helper failed, constructing delegation manually"),
        }
    }
    build_unsigned_delegation(delegator, delegate, caveats, salt)
}

/// The single caveat this system attaches for `scope`.
pub fn caveats_for_scope(network: &NetworkConfig, scope: &DelegationScope) -> Result<Vec<Caveat>> {
    let caveat = match scope {
        DelegationScope::Erc20TransferAmount { token_address, max_amount } => {
            let token = validate_token_address(token_address)?;
            let enforcer = resolve_enforcer_address(network, CaveatKind::Erc20TransferAmount)?;
            Caveat::new(enforcer, erc20_transfer_amount_terms(&token, *max_amount)?)
        }
        DelegationScope::NativeTokenTransferAmount { max_amount } => {
            let enforcer = resolve_enforcer_address(network, CaveatKind::NativeTokenTransferAmount)?;
            Caveat::new(enforcer, native_token_transfer_amount_terms(*max_amount)?)
        }
        DelegationScope::FunctionCall { .. } => {
            return Err(CodecError::NotImplemented(CaveatKind::FunctionCall));
        }
    };
    Ok(vec![caveat])
}

/// Validate inputs and assemble the unsigned delegation for `scope`.
pub fn prepare_delegation(
    network: &NetworkConfig,
    delegator: &str,
    delegate: &str,
    scope: &DelegationScope,
    salt: &SaltSource,
    helper: Option<&dyn DelegationFactory>,
) -> Result<Delegation> {
    let delegate = validate_delegate_address(delegate)?;
    let delegator = normalize_address(delegator)?;
    let caveats = caveats_for_scope(network, scope)?;

    let delegation = assemble_with_fallback(helper, delegator, delegate, caveats, salt);
    debug!(
        network = %network.name,
        delegator = %delegation.delegator,
        delegate = %delegation.delegate,
        scope = %scope.kind(),
        salt = %delegation.salt,
        "assembled delegation"
    );
    Ok(delegation)
}

/// Assemble and sign a delegation from `signer`'s account.
pub fn create_delegation<S>(
    network: &NetworkConfig,
    signer: &S,
    delegate: &str,
    scope: &DelegationScope,
    salt: &SaltSource,
    helper: Option<&dyn DelegationFactory>,
) -> Result<DelegationInfo>
where
    S: DelegationSigner + ?Sized,
{
    let delegator = signer.address().to_string();
    let delegation = prepare_delegation(network, &delegator, delegate, scope, salt, helper)?;
    let signature = signer.sign_delegation(&delegation, network)?;

    Ok(DelegationInfo {
        delegator: delegation.delegator,
        delegate: delegation.delegate,
        caveat_hash: PLACEHOLDER_CAVEAT_HASH.to_string(),
        is_valid: true,
        delegation: delegation.with_signature(signature),
    })
}

pub fn create_erc20_transfer_delegation<S>(
    network: &NetworkConfig,
    signer: &S,
    delegate: &str,
    token_address: &str,
    max_amount: U256,
    salt: &SaltSource,
    helper: Option<&dyn DelegationFactory>,
) -> Result<DelegationInfo>
where
    S: DelegationSigner + ?Sized,
{
    let scope = DelegationScope::Erc20TransferAmount {
        token_address: token_address.to_string(),
        max_amount,
    };
    create_delegation(network, signer, delegate, &scope, salt, helper)
}

pub fn create_native_token_delegation<S>(
    network: &NetworkConfig,
    signer: &S,
    delegate: &str,
    max_amount: U256,
    salt: &SaltSource,
    helper: Option<&dyn DelegationFactory>,
) -> Result<DelegationInfo>
where
    S: DelegationSigner + ?Sized,
{
    let scope = DelegationScope::NativeTokenTransferAmount { max_amount };
    create_delegation(network, signer, delegate, &scope, salt, helper)
}
