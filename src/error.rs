/// Errors returned by ciphers and modes.
///
/// Every error is reported before any output is written, so a
/// failed call never leaves a partially transformed block
/// behind.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The key is not 16, 24 or 32 bytes long.
    #[error("invalid AES key length: {0} bytes")]
    InvalidKeyLength(usize),
    /// The cipher was used before a key was installed.
    #[error("no key has been set")]
    KeyNotSet,
    /// An input or output span is not exactly one block long.
    #[error("invalid block length: {0} bytes")]
    InvalidBlockLength(usize),
    /// The IV is not exactly one block long.
    #[error("invalid IV length: {0} bytes")]
    InvalidIvLength(usize),
    /// The CTR counter width is not in `1..=128` bits.
    #[error("invalid counter width: {0} bits")]
    InvalidCounterWidth(u32),
    /// The hardware backend was requested on a CPU without AES
    /// instructions.
    #[error("AES instructions are not available on this CPU")]
    BackendUnavailable,
}
