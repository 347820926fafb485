//! Bech32 and Bech32m string codec ([BIP-173], [BIP-350]).
//!
//! Nothing in here knows about Bitcoin: the codec splits a string into its
//! human-readable part (HRP) and 5-bit data values, and verifies the BCH
//! checksum against both target constants at once.
//!
//! [BIP-173]: <https://github.com/bitcoin/bips/blob/master/bip-0173.mediawiki>
//! [BIP-350]: <https://github.com/bitcoin/bips/blob/master/bip-0350.mediawiki>

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;
use core::{fmt, iter};

/* ------------------------------------------------------------- *
 *  Constants                                                     *
 * ------------------------------------------------------------- */

/// The bech32 alphabet, indexed by 5-bit value.
pub const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Separator between the HRP and the data part.
pub const SEPARATOR: char = '1';

/// Number of checksum characters at the end of every string.
pub const CHECKSUM_LENGTH: usize = 6;

/// Shortest valid string: one HRP character, separator, checksum.
pub const MIN_LENGTH: usize = 8;

/// Longest valid string.
pub const MAX_LENGTH: usize = 90;

const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];

/* ------------------------------------------------------------- *
 *  Checksum variant                                              *
 * ------------------------------------------------------------- */

/// The checksum constant a string was (or is to be) encoded with.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Variant {
    /// BIP-173 checksum, target constant `1`.
    Bech32,
    /// BIP-350 checksum, target constant `0x2bc830a3`.
    Bech32m,
}

impl Variant {
    /// The value the checksum polynomial must reduce to for this variant.
    pub const fn constant(self) -> u32 {
        match self {
            Variant::Bech32 => 1,
            Variant::Bech32m => 0x2bc8_30a3,
        }
    }

    /// Matches a final polymod residue against the known constants.
    pub fn from_residue(residue: u32) -> Option<Self> {
        match residue {
            r if r == Variant::Bech32.constant() => Some(Variant::Bech32),
            r if r == Variant::Bech32m.constant() => Some(Variant::Bech32m),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Bech32 => f.write_str("bech32"),
            Variant::Bech32m => f.write_str("bech32m"),
        }
    }
}

/* ------------------------------------------------------------- *
 *  Errors                                                        *
 * ------------------------------------------------------------- */

/// Failure while decoding a bech32 string.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DecodeError {
    /// The whole string is shorter than 8 or longer than 90 characters.
    InvalidLength(usize),
    /// A character outside printable ASCII, or outside the data alphabet.
    InvalidCharacter { character: char, position: usize },
    /// The string contains both upper- and lower-case letters.
    MixedCase,
    /// No `'1'` separator was found.
    MissingSeparator,
    /// The separator is the first character.
    EmptyPrefix,
    /// Fewer than six characters follow the separator.
    ChecksumTooShort(usize),
    /// The checksum matches neither the bech32 nor the bech32m constant.
    InvalidChecksum,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidLength(n) => {
                write!(f, "invalid length {n} (expected {MIN_LENGTH}..={MAX_LENGTH})")
            }
            DecodeError::InvalidCharacter { character, position } => {
                write!(f, "invalid character {character:?} at position {position}")
            }
            DecodeError::MixedCase => write!(f, "string contains mixed upper/lower case"),
            DecodeError::MissingSeparator => write!(f, "missing separator '{SEPARATOR}'"),
            DecodeError::EmptyPrefix => write!(f, "empty human-readable part"),
            DecodeError::ChecksumTooShort(n) => {
                write!(f, "data part has {n} characters, checksum needs {CHECKSUM_LENGTH}")
            }
            DecodeError::InvalidChecksum => write!(f, "invalid checksum"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Failure while encoding a bech32 string.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum EncodeError {
    /// The HRP is empty.
    EmptyPrefix,
    /// The HRP contains a character outside printable ASCII.
    InvalidCharacter { character: char, position: usize },
    /// A data value does not fit in 5 bits.
    InvalidValue { value: u8, position: usize },
    /// The encoded string would exceed 90 characters.
    TooLong(usize),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::EmptyPrefix => write!(f, "empty human-readable part"),
            EncodeError::InvalidCharacter { character, position } => {
                write!(f, "invalid HRP character {character:?} at position {position}")
            }
            EncodeError::InvalidValue { value, position } => {
                write!(f, "data value {value} at position {position} is not a 5-bit value")
            }
            EncodeError::TooLong(n) => {
                write!(f, "encoded length {n} exceeds maximum ({MAX_LENGTH})")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// Failure while regrouping bits with [`convert_bits`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConvertError {
    /// A bit width is outside `1..=8`.
    InvalidBitWidth { from_bits: u8, to_bits: u8 },
    /// An input value has more bits set than `from_bits` allows.
    InvalidValue(u8),
    /// Leftover bits are not all zero.
    NonZeroPadding,
    /// A whole input group (or more) was left over as padding.
    ExcessPadding { bits: u8 },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::InvalidBitWidth { from_bits, to_bits } => {
                write!(f, "cannot regroup {from_bits}-bit values into {to_bits}-bit values")
            }
            ConvertError::InvalidValue(v) => write!(f, "input value {v} out of range"),
            ConvertError::NonZeroPadding => write!(f, "non-zero padding"),
            ConvertError::ExcessPadding { bits } => write!(f, "excess padding ({bits} bits)"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConvertError {}

/* ------------------------------------------------------------- *
 *  Decoded value                                                 *
 * ------------------------------------------------------------- */

/// A checksum-verified bech32 string, split into its parts.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Decoded {
    hrp: String,
    data: Vec<u8>,
    variant: Variant,
}

impl Decoded {
    /// The lower-case human-readable part.
    pub fn hrp(&self) -> &str {
        &self.hrp
    }

    /// The 5-bit data values, checksum stripped.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The checksum constant that validated.
    pub fn variant(&self) -> Variant {
        self.variant
    }
}

/* ------------------------------------------------------------- *
 *  Checksum                                                      *
 * ------------------------------------------------------------- */

fn polymod<I: IntoIterator<Item = u8>>(values: I) -> u32 {
    let mut chk: u32 = 1;
    for value in values {
        let top = chk >> 25;
        chk = (chk & 0x01ff_ffff) << 5 ^ u32::from(value);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

/// The HRP in checksum-input form: high bits, a zero, then low bits.
fn hrp_expand(hrp: &str) -> impl Iterator<Item = u8> + '_ {
    hrp.bytes()
        .map(|b| b >> 5)
        .chain(iter::once(0))
        .chain(hrp.bytes().map(|b| b & 0x1f))
}

fn create_checksum(hrp: &str, data: &[u8], variant: Variant) -> [u8; CHECKSUM_LENGTH] {
    let residue = polymod(
        hrp_expand(hrp)
            .chain(data.iter().copied())
            .chain(iter::repeat(0).take(CHECKSUM_LENGTH)),
    ) ^ variant.constant();

    let mut checksum = [0u8; CHECKSUM_LENGTH];
    for (i, symbol) in checksum.iter_mut().enumerate() {
        // Masked to 5 bits.
        *symbol = ((residue >> (5 * (CHECKSUM_LENGTH - 1 - i))) & 0x1f) as u8;
    }
    checksum
}

fn char_value(c: u8) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    CHARSET.iter().position(|&x| x == c).map(|p| p as u8)
}

/* ------------------------------------------------------------- *
 *  Public API                                                    *
 * ------------------------------------------------------------- */

/// Decodes a bech32 or bech32m string.
///
/// The checksum is verified once and matched against both variants; the one
/// that validated is recorded in the result.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the string is too short or too long, contains
/// characters outside printable ASCII or the data alphabet, mixes case, lacks
/// a separator or an HRP, or fails the checksum.
pub fn decode(s: &str) -> Result<Decoded, DecodeError> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&s.len()) {
        return Err(DecodeError::InvalidLength(s.len()));
    }

    let mut has_lower = false;
    let mut has_upper = false;
    for (position, character) in s.char_indices() {
        if !('\x21'..='\x7e').contains(&character) {
            return Err(DecodeError::InvalidCharacter { character, position });
        }
        has_lower |= character.is_ascii_lowercase();
        has_upper |= character.is_ascii_uppercase();
    }
    if has_lower && has_upper {
        return Err(DecodeError::MixedCase);
    }

    // All ASCII from here on, so byte offsets are character positions.
    let lower = s.to_ascii_lowercase();
    let sep = lower.rfind(SEPARATOR).ok_or(DecodeError::MissingSeparator)?;
    if sep == 0 {
        return Err(DecodeError::EmptyPrefix);
    }
    let (hrp, rest) = lower.split_at(sep);
    let data_chk = &rest.as_bytes()[1..];
    if data_chk.len() < CHECKSUM_LENGTH {
        return Err(DecodeError::ChecksumTooShort(data_chk.len()));
    }

    let mut data = Vec::with_capacity(data_chk.len());
    for (i, &b) in data_chk.iter().enumerate() {
        let value = char_value(b).ok_or_else(|| {
            let position = sep + 1 + i;
            DecodeError::InvalidCharacter { character: char::from(s.as_bytes()[position]), position }
        })?;
        data.push(value);
    }

    let residue = polymod(hrp_expand(hrp).chain(data.iter().copied()));
    let variant = Variant::from_residue(residue).ok_or(DecodeError::InvalidChecksum)?;

    data.truncate(data.len() - CHECKSUM_LENGTH);
    Ok(Decoded { hrp: hrp.to_owned(), data, variant })
}

/// Encodes `hrp` and 5-bit `data` into a lower-case bech32 string.
///
/// # Errors
///
/// Returns an [`EncodeError`] if the HRP is empty or not printable ASCII, a
/// data value is 32 or larger, or the result would exceed 90 characters.
pub fn encode(hrp: &str, data: &[u8], variant: Variant) -> Result<String, EncodeError> {
    if hrp.is_empty() {
        return Err(EncodeError::EmptyPrefix);
    }
    if let Some((position, character)) =
        hrp.char_indices().find(|&(_, c)| !('\x21'..='\x7e').contains(&c))
    {
        return Err(EncodeError::InvalidCharacter { character, position });
    }
    if let Some((position, &value)) = data.iter().enumerate().find(|&(_, &v)| v > 0x1f) {
        return Err(EncodeError::InvalidValue { value, position });
    }
    let len = hrp.len() + 1 + data.len() + CHECKSUM_LENGTH;
    if len > MAX_LENGTH {
        return Err(EncodeError::TooLong(len));
    }

    let hrp = hrp.to_ascii_lowercase();
    let checksum = create_checksum(&hrp, data, variant);

    let mut out = String::with_capacity(len);
    out.push_str(&hrp);
    out.push(SEPARATOR);
    out.extend(data.iter().chain(checksum.iter()).map(|&v| char::from(CHARSET[usize::from(v)])));
    Ok(out)
}

/// Regroups `data` from `from_bits`-wide values into `to_bits`-wide values.
///
/// With `pad` set, a final partial group is completed with zero bits (the
/// 8-to-5 direction). Without it, leftover bits must be fewer than
/// `from_bits` and all zero (the 5-to-8 direction).
///
/// # Errors
///
/// Returns a [`ConvertError`] if a bit width is outside `1..=8`, an input
/// value does not fit in `from_bits`, or, without `pad`, if the leftover
/// bits are non-zero or too many.
pub fn convert_bits(data: &[u8], from_bits: u8, to_bits: u8, pad: bool) -> Result<Vec<u8>, ConvertError> {
    if !(1..=8).contains(&from_bits) || !(1..=8).contains(&to_bits) {
        return Err(ConvertError::InvalidBitWidth { from_bits, to_bits });
    }

    let max_value: u32 = (1 << to_bits) - 1;
    let max_acc: u32 = (1 << (from_bits + to_bits - 1)) - 1;
    let mut acc: u32 = 0;
    let mut bits: u8 = 0;
    let mut out = Vec::with_capacity(data.len() * usize::from(from_bits) / usize::from(to_bits) + 1);

    for &value in data {
        if u32::from(value) >> from_bits != 0 {
            return Err(ConvertError::InvalidValue(value));
        }
        acc = ((acc << from_bits) | u32::from(value)) & max_acc;
        bits += from_bits;
        while bits >= to_bits {
            bits -= to_bits;
            // Masked to `to_bits` <= 8 bits.
            out.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to_bits - bits)) & max_value) as u8);
        }
    } else if bits >= from_bits {
        return Err(ConvertError::ExcessPadding { bits });
    } else if (acc << (to_bits - bits)) & max_value != 0 {
        return Err(ConvertError::NonZeroPadding);
    }

    Ok(out)
}

/* ------------------------------------------------------------- *
 *  Tests                                                         *
 * ------------------------------------------------------------- */
