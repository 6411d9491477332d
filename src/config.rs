//! TOML configuration for transaction defaults.
//!
//! Loaded from --config path (default: ./ethtx.toml).
//! Environment variables (ETHTX_*) override the file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::gas::{GasSchedule, BLOCK_GAS_LIMIT, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE, DEFAULT_PRIORITY_FEE};

pub const ENV_CHAIN_ID: &str = "ETHTX_CHAIN_ID";
pub const ENV_LOG_LEVEL: &str = "ETHTX_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TxConfig {
    #[serde(default)]
    pub node: NodeSection,
    #[serde(default)]
    pub chain: ChainSection,
    #[serde(default)]
    pub gas: GasSection,
    #[serde(default)]
    pub costs: GasSchedule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSection {
    pub log_level: String,
}

impl Default for NodeSection {
    fn default() -> Self {
        Self { log_level: "info".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSection {
    /// Used when a transaction is built without an explicit chain id.
    pub default_chain_id: u64,
}

impl Default for ChainSection {
    fn default() -> Self {
        Self { default_chain_id: 1 }
    }
}

/// Values in wei, limits in gas units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasSection {
    pub default_gas_limit: u64,
    pub default_gas_price: u64,
    pub default_priority_fee: u64,
    pub default_max_fee: u64,
    pub block_gas_limit: u64,
}

impl Default for GasSection {
    fn default() -> Self {
        Self {
            default_gas_limit: DEFAULT_GAS_LIMIT,
            default_gas_price: DEFAULT_GAS_PRICE,
            default_priority_fee: DEFAULT_PRIORITY_FEE,
            default_max_fee: DEFAULT_GAS_PRICE,
            block_gas_limit: BLOCK_GAS_LIMIT,
        }
    }
}

impl TxConfig {
    /// Read `path` (defaults if it does not exist) and apply env overrides.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let mut cfg = if Path::new(path).exists() {
            let s = std::fs::read_to_string(path)?;
            toml::from_str(&s)?
        } else {
            Self::default()
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Overrides from `lookup` (normally the process environment); unparsable values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(ENV_CHAIN_ID) {
            match raw.trim().parse::<u64>() {
                Ok(id) => self.chain.default_chain_id = id,
                Err(e) => warn!(var = ENV_CHAIN_ID, value = %raw, error = %e, "ignoring invalid override"),
            }
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            if level.trim().is_empty() {
                warn!(var = ENV_LOG_LEVEL, "ignoring empty override");
            } else {
                self.node.log_level = level.trim().to_string();
            }
        }
    }

    pub fn example_toml() -> &'static str {
        r#"# ethtx configuration
# All values shown are defaults.

[node]
log_level = "info"        # trace | debug | info | warn | error

[chain]
default_chain_id = 1

[gas]
default_gas_limit    = 21000
default_gas_price    = 42690000000   # 42.69 gwei, legacy and EIP-2930
default_priority_fee = 1010000000    # 1.01 gwei
default_max_fee      = 42690000000
block_gas_limit      = 30000000

[costs]
tx_base                 = 21000
zero_byte               = 4
non_zero_byte           = 16
initcode_word           = 2
access_list_address     = 2400
access_list_storage_key = 1900
"#
    }

    pub fn write_example(path: &str) -> std::io::Result<()> {
        std::fs::write(path, Self::example_toml())
    }
}
