use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A price field could not be read as a decimal number.
    #[error("invalid {field} price {input:?}: {source}")]
    InvalidNumericInput {
        field: &'static str,
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
    #[error("UTC offset of {0} hours is out of range")]
    InvalidUtcOffset(i32),
}

pub type Result<T> = std::result::Result<T, Error>;
