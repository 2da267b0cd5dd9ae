use alloy_primitives::{Address, U256};
use heekowave_delegation_types::{
    CaveatKind, Erc20TransferAmountTerms, NativeTokenTransferAmountTerms,
    ERC20_TRANSFER_AMOUNT_TERMS_LEN, NATIVE_TOKEN_TRANSFER_AMOUNT_TERMS_LEN,
};

use crate::errors::{CodecError, Result};

/// Decode ERC20TransferAmountEnforcer terms (exactly 106 characters).
pub fn decode_erc20_transfer_amount_terms(terms: &str) -> Result<Erc20TransferAmountTerms> {
    let bytes = terms_bytes(terms, CaveatKind::Erc20TransferAmount, ERC20_TRANSFER_AMOUNT_TERMS_LEN)?;
    let mut i = 0usize;
    let token_address = read_address(&bytes, &mut i);
    let max_amount = read_u256(&bytes, &mut i);
    Ok(Erc20TransferAmountTerms { token_address, max_amount })
}

/// Decode NativeTokenTransferAmountEnforcer terms (exactly 66 characters).
pub fn decode_native_token_transfer_amount_terms(terms: &str) -> Result<NativeTokenTransferAmountTerms> {
    let bytes = terms_bytes(
        terms,
        CaveatKind::NativeTokenTransferAmount,
        NATIVE_TOKEN_TRANSFER_AMOUNT_TERMS_LEN,
    )?;
    let mut i = 0usize;
    let max_amount = read_u256(&bytes, &mut i);
    Ok(NativeTokenTransferAmountTerms { max_amount })
}

/// Length-check then hex-decode. The length check runs first so the
/// length error wins for inputs that are wrong in both ways.
fn terms_bytes(terms: &str, kind: CaveatKind, expected: usize) -> Result<Vec<u8>> {
    if terms.len() != expected {
        return Err(CodecError::InvalidTermsLength { kind, expected, actual: terms.len() });
    }
    let invalid = |reason| CodecError::InvalidTermsEncoding { terms: terms.to_string(), reason };
    let digits = terms.strip_prefix("0x").ok_or_else(|| invalid("missing 0x prefix"))?;
    hex::decode(digits).map_err(|_| invalid("non-hex character"))
}

// Callers size `bytes` from the fixed layout, so reads never run short.

fn read_address(bytes: &[u8], i: &mut usize) -> Address {
    let addr = Address::from_slice(&bytes[*i..*i + 20]);
    *i += 20;
    addr
}

fn read_u256(bytes: &[u8], i: &mut usize) -> U256 {
    let word = &bytes[*i..*i + 32];
    *i += 32;
    U256::from_be_slice(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_lengths_are_rejected() {
        assert_eq!(
            decode_erc20_transfer_amount_terms("0x1234"),
            Err(CodecError::InvalidTermsLength {
                kind: CaveatKind::Erc20TransferAmount,
                expected: 106,
                actual: 6
            })
        );
        let native_as_erc20 = format!("0x{}", "0".repeat(64));
        assert!(matches!(
            decode_erc20_transfer_amount_terms(&native_as_erc20),
            Err(CodecError::InvalidTermsLength { actual: 66, .. })
        ));
        let erc20_as_native = format!("0x{}", "0".repeat(104));
        assert!(matches!(
            decode_native_token_transfer_amount_terms(&erc20_as_native),
            Err(CodecError::InvalidTermsLength { expected: 66, actual: 106, .. })
        ));
    }

    #[test]
    fn non_hex_payload_is_rejected() {
        let bad = format!("0x{}", "g".repeat(64));
        assert!(matches!(
            decode_native_token_transfer_amount_terms(&bad),
            Err(CodecError::InvalidTermsEncoding { reason: "non-hex character", .. })
        ));
        let unprefixed = "00".repeat(33);
        assert!(matches!(
            decode_native_token_transfer_amount_terms(&unprefixed),
            Err(CodecError::InvalidTermsEncoding { reason: "missing 0x prefix", .. })
        ));
    }

    #[test]
    fn decodes_max_u256() {
        let terms = format!("0x{}", "f".repeat(64));
        let decoded = decode_native_token_transfer_amount_terms(&terms).unwrap();
        assert_eq!(decoded.max_amount, U256::MAX);
    }

    #[test]
    fn decodes_uppercase_hex() {
        let terms = format!("0x{}{}", "AB".repeat(20), "0".repeat(62) + "FF");
        let decoded = decode_erc20_transfer_amount_terms(&terms).unwrap();
        assert_eq!(decoded.token_address, Address::repeat_byte(0xab));
        assert_eq!(decoded.max_amount, U256::from(255u64));
    }
}
