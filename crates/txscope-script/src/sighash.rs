//! The sighash flag byte carried at the end of every signature.

use std::fmt;

/// Base signature hash type, from the low five bits of the flag byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SigHashBase {
    All,
    None,
    Single,
}

/// A decomposed sighash flag byte.
///
/// The original byte is kept so preimages commit to exactly what was
/// signed, including bits with no meaning here.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SigHashFlags(pub u8);

impl SigHashFlags {
    pub const ALL: u8 = 0x01;
    pub const NONE: u8 = 0x02;
    pub const SINGLE: u8 = 0x03;
    pub const FORKID: u8 = 0x40;
    pub const ANYONECANPAY: u8 = 0x80;

    /// Mask selecting the base type bits.
    const BASE_MASK: u8 = 0x1f;

    pub fn new(byte: u8) -> Self {
        SigHashFlags(byte)
    }

    /// The base type. Unrecognised values behave as ALL.
    pub fn base(&self) -> SigHashBase {
        match self.0 & Self::BASE_MASK {
            Self::NONE => SigHashBase::None,
            Self::SINGLE => SigHashBase::Single,
            _ => SigHashBase::All,
        }
    }

    pub fn has_fork_id(&self) -> bool {
        self.0 & Self::FORKID != 0
    }

    pub fn anyone_can_pay(&self) -> bool {
        self.0 & Self::ANYONECANPAY != 0
    }

    /// The raw flag byte.
    pub fn byte(&self) -> u8 {
        self.0
    }

    /// The flag widened to the u32 appended to preimages.
    pub fn as_u32(&self) -> u32 {
        self.0 as u32
    }
}

impl From<u8> for SigHashFlags {
    fn from(byte: u8) -> Self {
        SigHashFlags(byte)
    }
}

impl fmt::Debug for SigHashFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigHashFlags({:#04x}: {})", self.0, self)
    }
}

impl fmt::Display for SigHashFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.base() {
            SigHashBase::All => "ALL",
            SigHashBase::None => "NONE",
            SigHashBase::Single => "SINGLE",
        };
        write!(f, "{}", base)?;
        if self.has_fork_id() {
            write!(f, "|FORKID")?;
        }
        if self.anyone_can_pay() {
            write!(f, "|ANYONECANPAY")?;
        }
        Ok(())
    }
}
