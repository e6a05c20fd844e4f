pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Hex input is empty")]
    EmptyHex,

    #[error("Hex input has odd length ({0} digits)")]
    OddLength(usize),

    #[error("Invalid hex digit '{digit}' at position {index}")]
    InvalidHexDigit { digit: char, index: usize },
}
