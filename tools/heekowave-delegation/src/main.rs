use std::path::PathBuf;

use alloy_primitives::U256;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use heekowave_caveat_codec::{
    checksum, create_delegation, decode_erc20_transfer_amount_terms,
    decode_native_token_transfer_amount_terms, encode_erc20_transfer_amount_terms,
    encode_native_token_transfer_amount_terms, normalize_address, parse_amount,
    prepare_delegation, resolve_enforcer_address, DelegationRelay, LocalKeySigner, NetworkConfig,
    SaltSource,
};
use heekowave_delegation_types::{CaveatKind, DelegationScope, USDC_DECIMALS};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod outbox;

use outbox::OutboxRelay;

/// MockUSDC on Monad testnet.
const DEFAULT_TOKEN: &str = "0x74328B128c59f10936f1cAA2c753E299d0491e40";

/// Encode, inspect and assemble spend-limit delegations for the Heekowave relayer.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Network table (JSON). Defaults to the built-in Monad testnet table.
    #[arg(long, global = true, env = "HEEKOWAVE_NETWORK_CONFIG")]
    network_config: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the checksum form of an address.
    Normalize { address: String },

    /// Encode ERC20TransferAmount terms.
    EncodeErc20 {
        #[arg(long, default_value = DEFAULT_TOKEN)]
        token: String,
        /// Decimal amount, eg `100` or `12.5`.
        #[arg(long)]
        amount: String,
        #[arg(long, default_value_t = USDC_DECIMALS)]
        decimals: u8,
    },

    /// Encode NativeTokenTransferAmount terms.
    EncodeNative {
        #[arg(long)]
        amount: String,
        #[arg(long, default_value_t = 18)]
        decimals: u8,
    },

    /// Decode ERC20TransferAmount terms.
    DecodeErc20 { terms: String },

    /// Decode NativeTokenTransferAmount terms.
    DecodeNative { terms: String },

    /// Print the enforcer configured for a caveat kind.
    Enforcer {
        #[arg(long)]
        kind: CaveatKind,
    },

    /// Assemble a delegation; sign it when a delegator key is available.
    Delegate(DelegateArgs),
}

#[derive(clap::Args, Debug)]
struct DelegateArgs {
    /// Address receiving the delegation (the relayer).
    #[arg(long, env = "RELAYER_ADDRESS")]
    delegate: String,

    #[arg(long, value_enum, default_value_t = Scope::Erc20)]
    scope: Scope,

    /// Decimal spend limit.
    #[arg(long)]
    amount: String,

    #[arg(long, default_value = DEFAULT_TOKEN)]
    token: String,

    #[arg(long, default_value_t = USDC_DECIMALS)]
    decimals: u8,

    /// Delegator key (hex). Without it only an unsigned delegation is printed.
    #[arg(long, env = "DELEGATOR_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Delegator address for unsigned delegations.
    #[arg(long, conflicts_with = "private_key")]
    delegator: Option<String>,

    /// Fixed salt (decimal or 0x hex). Defaults to the current time in milliseconds.
    #[arg(long)]
    salt: Option<String>,

    /// Append the signed delegation to this outbox file.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Scope {
    Erc20,
    Native,
    FunctionCall,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let network = load_network(cli.network_config.as_ref())?;
    run(cli.command, &network)
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_network(path: Option<&PathBuf>) -> Result<NetworkConfig> {
    match path {
        Some(path) => NetworkConfig::from_json_file(path)
            .with_context(|| format!("failed loading network table {}", path.display())),
        None => Ok(NetworkConfig::monad_testnet()),
    }
}

fn run(command: Command, network: &NetworkConfig) -> Result<()> {
    match command {
        Command::Normalize { address } => {
            println!("{}", checksum(&normalize_address(&address)?));
        }
        Command::EncodeErc20 { token, amount, decimals } => {
            let max_amount = parse_amount(&amount, decimals)?;
            let terms = encode_erc20_transfer_amount_terms(&token, max_amount)?;
            println!("{terms}");
        }
        Command::EncodeNative { amount, decimals } => {
            let max_amount = parse_amount(&amount, decimals)?;
            println!("{}", encode_native_token_transfer_amount_terms(max_amount)?);
        }
        Command::DecodeErc20 { terms } => {
            let decoded = decode_erc20_transfer_amount_terms(&terms)?;
            println!("{}", serde_json::to_string_pretty(&decoded)?);
        }
        Command::DecodeNative { terms } => {
            let decoded = decode_native_token_transfer_amount_terms(&terms)?;
            println!("{}", serde_json::to_string_pretty(&decoded)?);
        }
        Command::Enforcer { kind } => {
            println!("{}", resolve_enforcer_address(network, kind)?);
        }
        Command::Delegate(args) => delegate(args, network)?,
    }
    Ok(())
}

fn delegate(args: DelegateArgs, network: &NetworkConfig) -> Result<()> {
    let scope = build_scope(&args)?;
    let salt = match args.salt.as_deref() {
        Some(raw) => SaltSource::Fixed(raw.parse::<U256>().map_err(|e| anyhow!("invalid --salt {raw}: {e}"))?),
        None => SaltSource::UnixMillis,
    };

    let Some(private_key) = args.private_key.as_deref() else {
        if args.out.is_some() {
            return Err(anyhow!("--out needs a signed delegation: provide --private-key (or DELEGATOR_PRIVATE_KEY)"));
        }
        let delegator = args.delegator.as_deref().ok_or_else(|| {
            anyhow!("missing delegator: provide --private-key (or DELEGATOR_PRIVATE_KEY) or --delegator")
        })?;
        let delegation = prepare_delegation(network, delegator, &args.delegate, &scope, &salt, None)?;
        println!("{}", serde_json::to_string_pretty(&delegation)?);
        return Ok(());
    };

    let signer = LocalKeySigner::from_hex(private_key)?;
    let info = create_delegation(network, &signer, &args.delegate, &scope, &salt, None)?;

    if let Some(out) = args.out.as_ref() {
        let receipt = OutboxRelay::new(out, &network.name).submit(&info)?;
        info!(receipt = %receipt, delegator = %info.delegator, delegate = %info.delegate, "queued signed delegation");
    }

    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn build_scope(args: &DelegateArgs) -> Result<DelegationScope> {
    let scope = match args.scope {
        Scope::Erc20 => DelegationScope::Erc20TransferAmount {
            token_address: args.token.clone(),
            max_amount: parse_amount(&args.amount, args.decimals)?,
        },
        Scope::Native => DelegationScope::NativeTokenTransferAmount {
            max_amount: parse_amount(&args.amount, args.decimals)?,
        },
        Scope::FunctionCall => DelegationScope::FunctionCall { targets: Vec::new(), selectors: Vec::new() },
    };
    Ok(scope)
}
