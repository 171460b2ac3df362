/// Error types for script operations.
///
/// Script decoding itself never fails (faults are kept inside the `Script`);
/// these cover construction from hex, oversized pushes and address parsing.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Push data exceeds the largest length prefix.
    #[error("data too big: {0} bytes")]
    DataTooBig(usize),

    /// Invalid address string.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Address version byte is not a known P2PKH prefix.
    #[error("unsupported address version {0:#04x}")]
    UnsupportedAddressVersion(u8),

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] txscope_primitives::PrimitivesError),
}
