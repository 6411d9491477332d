pub mod address;
pub mod config;
pub mod crypto;
pub mod error;
pub mod gas;
pub mod rlp;
pub mod types;
pub mod util;

pub mod tx;

pub use address::Address;
pub use error::{Error, Result};
pub use gas::estimate_intrinsic_gas;
pub use tx::{sanitize_list, Transaction, TxParams};
pub use types::{AccessListItem, TxRecord, TxType};
