//! ethtx: decode, hash, build and price Ethereum transactions; checksum addresses.

use std::process;

use alloy_primitives::U256;
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ethtx::config::TxConfig;
use ethtx::crypto::secp256k1::LocalSigner;
use ethtx::tx::access_list::{parse_json as parse_access_list, RawAccessListItem};
use ethtx::util::{add_0x_prefix, bytes_to_hex, hex_to_bytes, is_hex, strip_0x_prefix};
use ethtx::{address, Transaction, TxParams, TxType};

#[derive(Parser, Debug)]
#[command(name = "ethtx", version, about = "Ethereum transaction codec")]
struct Args {
    /// Path to TOML config
    #[arg(long, default_value = "ethtx.toml")]
    config: String,

    /// Overrides log_level from the config (RUST_LOG wins over both)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Decode a raw transaction and print its fields as JSON
    Decode { raw: String },
    /// Print the transaction hash of a raw transaction
    Hash { raw: String },
    /// Print the EIP-55 form of an address
    Checksum { address: String },
    /// Exit 0 if the address is valid, 1 otherwise
    Validate { address: String },
    /// Estimate intrinsic gas
    Gas {
        /// Call data or init code; hex, or else taken as raw text
        #[arg(long, default_value = "")]
        data: String,
        /// JSON access list
        #[arg(long)]
        access_list: Option<String>,
        /// Price the data as init code
        #[arg(long, default_value_t = false)]
        create: bool,
    },
    /// Build a transaction, optionally signing it
    Build(BuildArgs),
    /// Print an example config with all defaults
    ExampleConfig,
}

#[derive(clap::Args, Debug)]
struct BuildArgs {
    #[arg(long, value_enum)]
    r#type: Option<KindArg>,
    #[arg(long, value_parser = parse_u256)]
    chain_id: Option<U256>,
    #[arg(long, default_value_t = 0)]
    nonce: u64,
    #[arg(long)]
    gas_limit: Option<u64>,
    #[arg(long, value_parser = parse_u256)]
    gas_price: Option<U256>,
    #[arg(long, value_parser = parse_u256)]
    priority_fee: Option<U256>,
    #[arg(long, value_parser = parse_u256)]
    max_fee: Option<U256>,
    /// Destination; omit to create a contract
    #[arg(long)]
    to: Option<String>,
    #[arg(long, value_parser = parse_u256, default_value = "0")]
    value: U256,
    #[arg(long, default_value = "")]
    data: String,
    #[arg(long)]
    access_list: Option<String>,
    /// Name of an environment variable holding a hex secret key
    #[arg(long)]
    key_env: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Legacy,
    Eip2930,
    Eip1559,
}

impl From<KindArg> for TxType {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Legacy => TxType::Legacy,
            KindArg::Eip2930 => TxType::AccessList,
            KindArg::Eip1559 => TxType::PriorityFee,
        }
    }
}

fn parse_u256(s: &str) -> Result<U256, String> {
    s.parse::<U256>().map_err(|e| format!("{s:?}: {e}"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut cfg = TxConfig::load(&args.config).with_context(|| format!("loading {}", args.config))?;
    if let Some(v) = &args.log_level {
        cfg.node.log_level = v.clone();
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.node.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    debug!(config = %args.config, chain_id = cfg.chain.default_chain_id, "config loaded");

    match args.cmd {
        Cmd::Decode { raw } => {
            let tx = Transaction::decode_hex(&raw)?;
            println!("{}", serde_json::to_string_pretty(&describe(&tx, &cfg)?)?);
        }
        Cmd::Hash { raw } => {
            let tx = Transaction::decode_hex(&raw)?;
            println!("{}", add_0x_prefix(&tx.hash_hex()));
        }
        Cmd::Checksum { address } => {
            println!("{}", address::checksum(&address)?);
        }
        Cmd::Validate { address } => {
            let ok = address::validate(&address);
            println!("{}", if ok { "valid" } else { "invalid" });
            if !ok {
                process::exit(1);
            }
        }
        Cmd::Gas { data, access_list, create } => {
            let payload = if strip_0x_prefix(&data).is_empty() || is_hex(&data) {
                hex_to_bytes(&data).context("--data")?
            } else {
                data.into_bytes()
            };
            let list = access_list.as_deref().map(parse_access_list).transpose()?;
            let gas = cfg.costs.intrinsic_gas(&payload, list.as_deref(), create);
            println!("{gas}");
        }
        Cmd::Build(b) => {
            let tx = build(b, &cfg)?;
            info!(tx_type = %tx.transaction_type(), hash = %tx.hash_hex(), "built transaction");
            println!("{}", tx.to_hex());
        }
        Cmd::ExampleConfig => {
            print!("{}", TxConfig::example_toml());
        }
    }
    Ok(())
}

fn build(b: BuildArgs, cfg: &TxConfig) -> anyhow::Result<Transaction> {
    let access_list = b
        .access_list
        .as_deref()
        .map(serde_json::from_str::<Vec<RawAccessListItem>>)
        .transpose()
        .context("--access-list")?;
    let params = TxParams {
        tx_type: b.r#type.map(TxType::from),
        chain_id: b.chain_id,
        nonce: b.nonce,
        gas_limit: b.gas_limit,
        gas_price: b.gas_price,
        max_priority_fee_per_gas: b.priority_fee,
        max_fee_per_gas: b.max_fee,
        to: b.to,
        value: b.value,
        data: hex_to_bytes(&b.data).context("--data")?,
        access_list,
    };
    let tx = Transaction::new(params.build(cfg)?);
    let Some(var) = b.key_env else {
        return Ok(tx);
    };
    let secret = std::env::var(&var).with_context(|| format!("reading ${var}"))?;
    let signer = LocalSigner::from_hex(&secret).map_err(|e| anyhow::anyhow!("{var}: {e}"))?;
    Ok(tx.sign(&signer)?)
}

fn describe(tx: &Transaction, cfg: &TxConfig) -> anyhow::Result<serde_json::Value> {
    let list: Vec<_> = tx
        .access_list()
        .unwrap_or_default()
        .iter()
        .map(|item| {
            json!({
                "address": add_0x_prefix(&bytes_to_hex(&item.address)),
                "storageKeys": item.storage_keys.iter().map(|k| add_0x_prefix(&bytes_to_hex(k))).collect::<Vec<_>>(),
            })
        })
        .collect();
    let sender = tx.sender()?;
    Ok(json!({
        "type": tx.transaction_type().to_string(),
        "chainId": tx.chain_id().map(|c| c.to_string()),
        "nonce": tx.nonce(),
        "gasLimit": tx.gas_limit(),
        "gasPrice": tx.gas_price().map(|v| v.to_string()),
        "maxPriorityFeePerGas": tx.max_priority_fee_per_gas().map(|v| v.to_string()),
        "maxFeePerGas": tx.max_fee_per_gas().map(|v| v.to_string()),
        "to": tx.destination().map(|a| address::Address::from_bytes(*a).checksummed()),
        "value": tx.amount().to_string(),
        "data": add_0x_prefix(&bytes_to_hex(tx.payload())),
        "accessList": list,
        "v": tx.signature_v().map(|v| v.to_string()),
        "r": format!("{:#x}", tx.signature_r()),
        "s": format!("{:#x}", tx.signature_s()),
        "from": (!sender.is_empty()).then(|| add_0x_prefix(&sender)),
        "hash": add_0x_prefix(&tx.hash_hex()),
        "intrinsicGas": tx.intrinsic_gas(&cfg.costs),
    }))
}
