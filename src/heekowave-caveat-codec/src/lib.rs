//! Spend-limit caveat codec and delegation assembler.
//!
//! Flow: validate addresses ([`address`]) -> encode enforcer terms
//! ([`encoder`]) -> assemble an unsigned root delegation ([`assembler`]) ->
//! sign through an injected [`signer::DelegationSigner`].
//!
//! Everything here is pure and synchronous apart from reading a network
//! table from disk on request.

pub mod address;
pub mod amount;
pub mod assembler;
pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod network;
pub mod signer;

pub use address::{
    checksum, is_valid_address, normalize_address, validate_delegate_address,
    validate_token_address,
};
pub use amount::{format_amount, parse_amount, IntoMaxAmount};
pub use assembler::{
    assemble_with_fallback, build_unsigned_delegation, caveats_for_scope, create_delegation,
    create_erc20_transfer_delegation, create_native_token_delegation, prepare_delegation,
    DelegationFactory, SaltSource,
};
pub use decoder::{decode_erc20_transfer_amount_terms, decode_native_token_transfer_amount_terms};
pub use encoder::{
    delegation_digest, delegation_struct_hash, domain_separator,
    encode_erc20_transfer_amount_terms, encode_native_token_transfer_amount_terms,
    erc20_transfer_amount_terms, native_token_transfer_amount_terms,
};
pub use errors::{AddressRole, CodecError, Result};
pub use network::{resolve_enforcer_address, DomainConfig, Eip712Domain, NetworkConfig};
pub use signer::{DelegationRelay, DelegationSigner, LocalKeySigner};
