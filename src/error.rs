//! Errors produced while parsing or constructing a Segwit address.

use alloc::string::String;
use core::fmt;

use crate::codec::{self, ConvertError, DecodeError, Variant};
use crate::network::Network;
use crate::witness::WitnessVersion;

/// Why a Segwit address string or program was rejected.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AddressFormatError {
    /// A byte outside printable ASCII, or a character outside the bech32 alphabet.
    InvalidCharacter { character: char, position: usize },
    /// The string contains both upper- and lower-case letters.
    MixedCase,
    /// The human-readable part is missing, empty or not a known network prefix.
    InvalidPrefix(PrefixError),
    /// The checksum does not validate, or validates with the wrong variant.
    InvalidChecksum(ChecksumError),
    /// A string, data part or witness program length is out of bounds.
    InvalidDataLength(LengthError),
    /// Leftover bits in the 5-to-8 bit regrouping are invalid.
    InvalidPadding(ConvertError),
    /// The leading data symbol is larger than 16.
    InvalidWitnessVersion(u8),
    /// The prefix is recognized but belongs to a different network than requested.
    WrongNetwork { expected: Network, found: Network },
}

impl fmt::Display for AddressFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFormatError::InvalidCharacter { character, position } => {
                write!(f, "invalid character {character:?} at position {position}")
            }
            AddressFormatError::MixedCase => write!(f, "address contains mixed upper/lower case"),
            AddressFormatError::InvalidPrefix(e) => write!(f, "invalid prefix: {e}"),
            AddressFormatError::InvalidChecksum(e) => write!(f, "invalid checksum: {e}"),
            AddressFormatError::InvalidDataLength(e) => write!(f, "invalid data length: {e}"),
            AddressFormatError::InvalidPadding(e) => write!(f, "invalid padding: {e}"),
            AddressFormatError::InvalidWitnessVersion(v) => {
                write!(f, "invalid witness version {v} (expected 0..=16)")
            }
            AddressFormatError::WrongNetwork { expected, found } => {
                write!(f, "address is for {found}, expected {expected}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AddressFormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AddressFormatError::InvalidPadding(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for AddressFormatError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::InvalidLength(n) => Self::InvalidDataLength(LengthError::String(n)),
            DecodeError::InvalidCharacter { character, position } => {
                Self::InvalidCharacter { character, position }
            }
            DecodeError::MixedCase => Self::MixedCase,
            DecodeError::MissingSeparator => Self::InvalidPrefix(PrefixError::MissingSeparator),
            DecodeError::EmptyPrefix => Self::InvalidPrefix(PrefixError::Empty),
            DecodeError::ChecksumTooShort(n) => Self::InvalidDataLength(LengthError::DataPart(n)),
            DecodeError::InvalidChecksum => Self::InvalidChecksum(ChecksumError::NoMatch),
        }
    }
}

impl From<ConvertError> for AddressFormatError {
    fn from(e: ConvertError) -> Self {
        Self::InvalidPadding(e)
    }
}

/// Detail for [`AddressFormatError::InvalidPrefix`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PrefixError {
    /// No `'1'` separator.
    MissingSeparator,
    /// Nothing before the separator.
    Empty,
    /// No network claims this prefix.
    Unknown(String),
}

impl fmt::Display for PrefixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixError::MissingSeparator => write!(f, "missing separator '{}'", codec::SEPARATOR),
            PrefixError::Empty => write!(f, "empty human-readable part"),
            PrefixError::Unknown(p) => write!(f, "unknown HRP prefix: {p}"),
        }
    }
}

/// Detail for [`AddressFormatError::InvalidChecksum`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ChecksumError {
    /// The residue matches neither checksum constant.
    NoMatch,
    /// The checksum validated with a variant not allowed for the witness version.
    WrongVariant { version: WitnessVersion, found: Variant },
}

impl fmt::Display for ChecksumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumError::NoMatch => write!(f, "matches neither bech32 nor bech32m"),
            ChecksumError::WrongVariant { version, found } => write!(
                f,
                "witness version {} requires {}, found {found}",
                version.to_u8(),
                version.variant()
            ),
        }
    }
}

/// Detail for [`AddressFormatError::InvalidDataLength`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LengthError {
    /// The whole string is outside `8..=90` characters.
    String(usize),
    /// Fewer than six characters follow the separator.
    DataPart(usize),
    /// No data symbols besides the checksum, so no witness version.
    Empty,
    /// The witness program is outside `2..=40` bytes.
    Program(usize),
    /// A version 0 program is neither 20 nor 32 bytes.
    SegwitV0(usize),
}

impl fmt::Display for LengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthError::String(n) => write!(
                f,
                "string is {n} characters (expected {}..={})",
                codec::MIN_LENGTH,
                codec::MAX_LENGTH
            ),
            LengthError::DataPart(n) => write!(
                f,
                "data part is {n} characters, checksum needs {}",
                codec::CHECKSUM_LENGTH
            ),
            LengthError::Empty => write!(f, "empty data section"),
            LengthError::Program(n) => write!(f, "witness program is {n} bytes (expected 2..=40)"),
            LengthError::SegwitV0(n) => {
                write!(f, "version 0 witness program is {n} bytes (expected 20 or 32)")
            }
        }
    }
}
