//! Address validation and EIP-55 normalization.
//!
//! Addresses come in as user-typed strings. Everything downstream works on
//! [`Address`], whose `Display` is the checksum form.

use alloy_primitives::Address;

use crate::errors::{AddressRole, CodecError, Result};

const ADDRESS_HEX_LEN: usize = 40;

/// Parse `0x` + 40 hex digits. Does not look at letter case.
fn parse_hex_address(input: &str) -> Result<Address> {
    let invalid = |reason| CodecError::InvalidFormat { input: input.to_string(), reason };

    let digits = input.strip_prefix("0x").ok_or_else(|| invalid("missing 0x prefix"))?;
    if digits.len() != ADDRESS_HEX_LEN {
        return Err(invalid("expected 40 hex digits"));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("non-hex character"));
    }

    let mut raw = [0u8; 20];
    hex::decode_to_slice(digits, &mut raw).map_err(|_| invalid("non-hex character"))?;
    Ok(Address::from(raw))
}

fn is_mixed_case(input: &str) -> bool {
    let digits = &input[2..];
    digits.bytes().any(|b| b.is_ascii_lowercase()) && digits.bytes().any(|b| b.is_ascii_uppercase())
}

/// Validate an address string and return it as an [`Address`].
///
/// All-lowercase and all-uppercase inputs are accepted as is. Mixed-case inputs
/// are treated as checksummed and must carry a correct EIP-55 checksum.
pub fn normalize_address(input: &str) -> Result<Address> {
    let address = parse_hex_address(input)?;
    if is_mixed_case(input) && address.to_checksum(None) != input {
        return Err(CodecError::InvalidFormat {
            input: input.to_string(),
            reason: "checksum mismatch",
        });
    }
    Ok(address)
}

/// EIP-55 rendering of an address.
pub fn checksum(address: &Address) -> String {
    address.to_checksum(None)
}

fn reject_zero(address: Address, role: AddressRole) -> Result<Address> {
    if address.is_zero() {
        return Err(CodecError::ZeroAddressNotAllowed(role));
    }
    Ok(address)
}

/// Normalize a token contract address; the zero address is not a token.
pub fn validate_token_address(input: &str) -> Result<Address> {
    reject_zero(normalize_address(input)?, AddressRole::Token)
}

/// Normalize the address receiving a delegation; the zero address cannot redeem.
pub fn validate_delegate_address(input: &str) -> Result<Address> {
    reject_zero(normalize_address(input)?, AddressRole::Delegate)
}

/// Syntactic check for form validation. Never fails, ignores checksums.
pub fn is_valid_address(input: &str) -> bool {
    parse_hex_address(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_USDC: &str = "0x74328B128c59f10936f1cAA2c753E299d0491e40";
    const ZERO: &str = "0x0000000000000000000000000000000000000000";

    #[test]
    fn lowercase_input_normalizes_to_checksum() {
        let address = normalize_address(&MOCK_USDC.to_lowercase()).unwrap();
        assert_eq!(checksum(&address), MOCK_USDC);
        assert_eq!(address.to_string(), MOCK_USDC);
    }

    #[test]
    fn checksummed_input_is_accepted() {
        let address = normalize_address(MOCK_USDC).unwrap();
        assert_eq!(checksum(&address), MOCK_USDC);
    }

    #[test]
    fn uppercase_digits_are_accepted_without_checksum() {
        let upper = format!("0x{}", MOCK_USDC[2..].to_uppercase());
        let address = normalize_address(&upper).unwrap();
        assert_eq!(checksum(&address), MOCK_USDC);
    }

    #[test]
    fn bad_checksum_is_rejected_but_still_syntactically_valid() {
        // flip the case of the first letter
        let bad = MOCK_USDC.replacen('B', "b", 1);
        assert!(matches!(
            normalize_address(&bad),
            Err(CodecError::InvalidFormat { reason: "checksum mismatch", .. })
        ));
        assert!(is_valid_address(&bad));
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        for input in ["0x123", "not-an-address", "74328b128c59f10936f1caa2c753e299d0491e40", "0xzz328b128c59f10936f1caa2c753e299d0491e40", ""] {
            assert!(
                matches!(normalize_address(input), Err(CodecError::InvalidFormat { .. })),
                "{input} should be rejected"
            );
            assert!(!is_valid_address(input));
        }
    }

    #[test]
    fn zero_address_rejected_for_token_and_delegate() {
        assert_eq!(
            validate_token_address(ZERO),
            Err(CodecError::ZeroAddressNotAllowed(AddressRole::Token))
        );
        assert_eq!(
            validate_delegate_address(ZERO),
            Err(CodecError::ZeroAddressNotAllowed(AddressRole::Delegate))
        );
        // zero is still a well-formed address
        assert_eq!(normalize_address(ZERO).unwrap(), Address::ZERO);
    }

    #[test]
    fn error_messages_are_user_facing() {
        let err = validate_delegate_address(ZERO).unwrap_err();
        assert_eq!(err.to_string(), "Delegate address cannot be zero address");
    }
}
