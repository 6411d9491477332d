use thiserror::Error;

/// Reasons a byte buffer is not a single well-formed, canonical RLP value,
/// or an RLP value does not have the shape a field expects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RlpError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),
    #[error("length prefix has a leading zero byte")]
    LeadingZeroLength,
    #[error("long-form length {0} must use the short form")]
    NonCanonicalSize(usize),
    #[error("single byte {0:#04x} must encode as itself")]
    NonCanonicalSingleByte(u8),
    #[error("length does not fit in usize")]
    LengthOverflow,
    #[error("nesting deeper than {0} lists")]
    TooDeep(usize),
    #[error("expected a list")]
    ExpectedList,
    #[error("expected a byte string")]
    ExpectedBytes,
    #[error("integer has a leading zero byte")]
    LeadingZero,
    #[error("integer does not fit in {0} bytes")]
    IntegerOverflow(usize),
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("unexpected number of list items: {got}")]
    ItemCount { got: usize },
    #[error("invalid value for {0}")]
    InvalidValue(&'static str),
}
