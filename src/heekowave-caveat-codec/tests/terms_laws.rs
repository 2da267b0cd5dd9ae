//! Property tests for the caveat terms layouts.
//!
//! 1. ERC-20 terms decode back to the lowercased token and the amount
//! 2. Native terms decode back to the amount
//! 3. Encoded lengths never depend on the amount's magnitude

use alloy_primitives::{Address, U256};
use heekowave_caveat_codec::{
    checksum, decode_erc20_transfer_amount_terms, decode_native_token_transfer_amount_terms,
    encode_erc20_transfer_amount_terms, encode_native_token_transfer_amount_terms, format_amount,
    is_valid_address, normalize_address, parse_amount, validate_token_address, CodecError,
};
use proptest::prelude::*;

fn arb_u256() -> impl Strategy<Value = U256> {
    prop_oneof![
        any::<u64>().prop_map(U256::from),
        any::<[u8; 32]>().prop_map(|b| U256::from_be_bytes(b)),
        Just(U256::ZERO),
        Just(U256::MAX),
    ]
}

fn arb_address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from)
}

/// Random letter casing of an address's hex digits.
fn arb_cased_address() -> impl Strategy<Value = (Address, String)> {
    (arb_address(), prop::collection::vec(any::<bool>(), 40)).prop_map(|(address, upper)| {
        let digits: String = hex::encode(address.as_slice())
            .chars()
            .zip(upper)
            .map(|(c, u)| if u { c.to_ascii_uppercase() } else { c })
            .collect();
        (address, format!("0x{digits}"))
    })
}

proptest! {
    #[test]
    fn erc20_terms_round_trip((address, input) in arb_cased_address(), amount in arb_u256()) {
        let terms = encode_erc20_transfer_amount_terms(&input, amount).unwrap();
        prop_assert_eq!(terms.len(), 106);

        let decoded = decode_erc20_transfer_amount_terms(terms.as_str()).unwrap();
        prop_assert_eq!(decoded.token_address, address);
        prop_assert_eq!(format!("{:#x}", decoded.token_address), input.to_lowercase());
        prop_assert_eq!(decoded.max_amount, amount);
    }

    #[test]
    fn native_terms_round_trip(amount in arb_u256()) {
        let terms = encode_native_token_transfer_amount_terms(amount).unwrap();
        prop_assert_eq!(terms.len(), 66);
        prop_assert_eq!(decode_native_token_transfer_amount_terms(terms.as_str()).unwrap().max_amount, amount);
    }

    #[test]
    fn address_segment_is_independent_of_amount(address in arb_address(), a in arb_u256(), b in arb_u256()) {
        let token = format!("{address:#x}");
        let first = encode_erc20_transfer_amount_terms(&token, a).unwrap();
        let second = encode_erc20_transfer_amount_terms(&token, b).unwrap();
        prop_assert_eq!(&first.as_str()[..42], &second.as_str()[..42]);
        prop_assert_eq!(a == b, first == second);
    }

    #[test]
    fn negative_amounts_never_encode(n in i64::MIN..0) {
        prop_assert!(
            matches!(
                encode_native_token_transfer_amount_terms(n),
                Err(CodecError::NegativeAmount(_))
            ),
            "negative amount {} encoded", n
        );
    }

    #[test]
    fn checksum_form_is_a_fixed_point(address in arb_address()) {
        let canonical = checksum(&address);
        prop_assert_eq!(normalize_address(&canonical).unwrap(), address);
        prop_assert_eq!(normalize_address(&canonical.to_lowercase()).unwrap(), address);
        prop_assert!(is_valid_address(&canonical));
    }

    #[test]
    fn any_casing_is_syntactically_valid((address, input) in arb_cased_address()) {
        prop_assert!(is_valid_address(&input));
        if let Ok(normalized) = validate_token_address(&input) {
            prop_assert_eq!(normalized, address);
        }
    }

    #[test]
    fn usdc_amounts_format_back(whole in 0u64..1_000_000_000, micros in 0u32..1_000_000) {
        let input = format!("{whole}.{micros:06}");
        let base_units = parse_amount(&input, 6).unwrap();
        prop_assert_eq!(base_units, U256::from(whole) * U256::from(1_000_000u64) + U256::from(micros));
        prop_assert_eq!(parse_amount(&format_amount(base_units, 6), 6).unwrap(), base_units);
    }
}

#[test]
fn scenario_hundred_usdc() {
    let terms =
        encode_erc20_transfer_amount_terms("0x74328b128c59f10936f1caa2c753e299d0491e40", 100_000_000u64)
            .unwrap();
    assert_eq!(terms.len(), 106);
    let amount = U256::from_str_radix(&terms.as_str()[42..], 16).unwrap();
    assert_eq!(amount, U256::from(100_000_000u64));
}
