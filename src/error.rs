use thiserror::Error;

use crate::crypto::CryptoError;
use crate::rlp::RlpError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("malformed encoding: {0}")]
    MalformedEncoding(#[from] RlpError),
    #[error("Cannot decode unknown transaction type {0}!")]
    TransactionType(u8),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("sender recovery failed: {0}")]
    Recovery(String),
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("invalid transaction parameter: {0}")]
    Parameter(String),
    #[error("invalid access list: {0}")]
    InvalidAccessList(String),
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl From<CryptoError> for Error {
    fn from(e: CryptoError) -> Self {
        Error::Recovery(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
