use alloy_primitives::{Address, B256, U256};
use heekowave_delegation_types::{
    CaveatKind, CaveatTerms, Delegation, ERC20_TRANSFER_AMOUNT_TERMS_LEN,
    NATIVE_TOKEN_TRANSFER_AMOUNT_TERMS_LEN,
};
use sha3::{Digest, Keccak256};
use tracing::debug;

use crate::amount::IntoMaxAmount;
use crate::errors::{CodecError, Result};
use crate::network::Eip712Domain;

/// Encode ERC20TransferAmountEnforcer terms: 20-byte token ++ 32-byte max amount.
///
/// `token_address` must be a 42-character `0x` address; its case is ignored.
/// The result is always 106 characters (52 bytes).
pub fn encode_erc20_transfer_amount_terms(
    token_address: &str,
    max_amount: impl IntoMaxAmount,
) -> Result<CaveatTerms> {
    if token_address.len() != 42 {
        return Err(CodecError::InvalidAddressFormat(token_address.to_string()));
    }
    let mut raw = [0u8; 20];
    token_address
        .strip_prefix("0x")
        .and_then(|digits| hex::decode_to_slice(digits, &mut raw).ok())
        .ok_or_else(|| CodecError::InvalidAddressFormat(token_address.to_string()))?;
    let max_amount = max_amount.into_max_amount()?;

    erc20_transfer_amount_terms(&Address::from(raw), max_amount)
}

/// Typed form of [`encode_erc20_transfer_amount_terms`] for already-validated tokens.
pub fn erc20_transfer_amount_terms(token: &Address, max_amount: U256) -> Result<CaveatTerms> {
    let address_hex = hex::encode(token.as_slice());
    let amount_hex = hex::encode(max_amount.to_be_bytes::<32>());
    let terms = format!("0x{address_hex}{amount_hex}");

    let terms = check_encoded_len(CaveatKind::Erc20TransferAmount, terms, ERC20_TRANSFER_AMOUNT_TERMS_LEN)?;
    debug!(
        token = %token,
        max_amount = %max_amount,
        terms = %terms,
        bytes = terms.byte_len(),
        "encoded ERC20TransferAmount terms"
    );
    Ok(terms)
}

/// Encode NativeTokenTransferAmountEnforcer terms: 32-byte max amount.
///
/// The result is always 66 characters (32 bytes).
pub fn encode_native_token_transfer_amount_terms(max_amount: impl IntoMaxAmount) -> Result<CaveatTerms> {
    native_token_transfer_amount_terms(max_amount.into_max_amount()?)
}

pub fn native_token_transfer_amount_terms(max_amount: U256) -> Result<CaveatTerms> {
    let terms = format!("0x{}", hex::encode(max_amount.to_be_bytes::<32>()));

    let terms = check_encoded_len(
        CaveatKind::NativeTokenTransferAmount,
        terms,
        NATIVE_TOKEN_TRANSFER_AMOUNT_TERMS_LEN,
    )?;
    debug!(max_amount = %max_amount, terms = %terms, "encoded NativeTokenTransferAmount terms");
    Ok(terms)
}

fn check_encoded_len(kind: CaveatKind, terms: String, expected: usize) -> Result<CaveatTerms> {
    if terms.len() != expected {
        return Err(CodecError::EncodingInvariantFailure { kind, expected, actual: terms.len() });
    }
    Ok(CaveatTerms::from_encoded(terms))
}

pub(crate) fn keccak256_bytes(bytes: &[u8]) -> B256 {
    let mut h = Keccak256::new();
    h.update(bytes);
    let out = h.finalize();
    let mut b = [0u8; 32];
    b.copy_from_slice(out.as_slice());
    B256::from(b)
}

fn address_word(address: &Address) -> [u8; 32] {
    let mut padded = [0u8; 32];
    padded[12..32].copy_from_slice(address.as_slice());
    padded
}

const EIP712_DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
const DELEGATION_TYPE: &[u8] =
    b"Delegation(address delegate,address delegator,bytes32 authority,Caveat[] caveats,uint256 salt)Caveat(address enforcer,bytes terms)";
const CAVEAT_TYPE: &[u8] = b"Caveat(address enforcer,bytes terms)";

/// Domain separator of the delegation manager.
pub fn domain_separator(domain: &Eip712Domain) -> B256 {
    let mut buf = Vec::with_capacity(32 * 5);
    buf.extend_from_slice(keccak256_bytes(EIP712_DOMAIN_TYPE).as_slice());
    buf.extend_from_slice(keccak256_bytes(domain.name.as_bytes()).as_slice());
    buf.extend_from_slice(keccak256_bytes(domain.version.as_bytes()).as_slice());
    buf.extend_from_slice(&U256::from(domain.chain_id).to_be_bytes::<32>());
    buf.extend_from_slice(&address_word(&domain.verifying_contract));
    keccak256_bytes(&buf)
}

/// EIP-712 struct hash of a delegation. Caveat `args` are not part of the typed data.
pub fn delegation_struct_hash(delegation: &Delegation) -> Result<B256> {
    let caveat_type_hash = keccak256_bytes(CAVEAT_TYPE);
    let mut caveat_hashes = Vec::with_capacity(32 * delegation.caveats.len());
    for caveat in &delegation.caveats {
        let terms = caveat.terms.to_bytes().map_err(|_| CodecError::InvalidTermsEncoding {
            terms: caveat.terms.to_string(),
            reason: "terms are not valid hex",
        })?;
        let mut buf = Vec::with_capacity(32 * 3);
        buf.extend_from_slice(caveat_type_hash.as_slice());
        buf.extend_from_slice(&address_word(&caveat.enforcer));
        buf.extend_from_slice(keccak256_bytes(&terms).as_slice());
        caveat_hashes.extend_from_slice(keccak256_bytes(&buf).as_slice());
    }

    let mut buf = Vec::with_capacity(32 * 6);
    buf.extend_from_slice(keccak256_bytes(DELEGATION_TYPE).as_slice());
    buf.extend_from_slice(&address_word(&delegation.delegate));
    buf.extend_from_slice(&address_word(&delegation.delegator));
    buf.extend_from_slice(delegation.authority.as_slice());
    buf.extend_from_slice(keccak256_bytes(&caveat_hashes).as_slice());
    buf.extend_from_slice(&delegation.salt.to_be_bytes::<32>());
    Ok(keccak256_bytes(&buf))
}

/// Digest the delegator signs: `keccak256("\x19\x01" || domainSeparator || structHash)`.
pub fn delegation_digest(delegation: &Delegation, domain: &Eip712Domain) -> Result<B256> {
    let struct_hash = delegation_struct_hash(delegation)?;

    let mut final_buf = Vec::with_capacity(2 + 32 + 32);
    final_buf.extend_from_slice(b"\x19\x01");
    final_buf.extend_from_slice(domain_separator(domain).as_slice());
    final_buf.extend_from_slice(struct_hash.as_slice());
    Ok(keccak256_bytes(&final_buf))
}
