//! Witness version and program validation on top of decoded bech32 data.

use alloc::vec::Vec;
use core::fmt;

use crate::codec::{self, Decoded, Variant};
use crate::error::{AddressFormatError, ChecksumError, LengthError};

/// Shortest witness program, in bytes.
pub const MIN_PROGRAM_LENGTH: usize = 2;
/// Longest witness program, in bytes.
pub const MAX_PROGRAM_LENGTH: usize = 40;

/* ------------------------------------------------------------- *
 *  Witness version                                               *
 * ------------------------------------------------------------- */

/// A Segwit output version, 0 to 16.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WitnessVersion(u8);

impl WitnessVersion {
    /// Version 0 (P2WPKH, P2WSH).
    pub const V0: WitnessVersion = WitnessVersion(0);
    /// Version 1 (Taproot).
    pub const V1: WitnessVersion = WitnessVersion(1);
    /// The highest version.
    pub const V16: WitnessVersion = WitnessVersion(16);

    pub fn to_u8(self) -> u8 {
        self.0
    }

    /// The checksum variant addresses of this version are encoded with.
    pub fn variant(self) -> Variant {
        if self == Self::V0 {
            Variant::Bech32
        } else {
            Variant::Bech32m
        }
    }

    /// The script opcode pushing this version (`OP_0`, `OP_1`..`OP_16`).
    pub fn opcode(self) -> u8 {
        if self == Self::V0 {
            0x00
        } else {
            0x50 + self.0
        }
    }
}

impl TryFrom<u8> for WitnessVersion {
    type Error = AddressFormatError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        if v > 16 {
            Err(AddressFormatError::InvalidWitnessVersion(v))
        } else {
            Ok(WitnessVersion(v))
        }
    }
}

impl fmt::Display for WitnessVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/* ------------------------------------------------------------- *
 *  Witness program                                               *
 * ------------------------------------------------------------- */

/// Checks the program length rules for `version`.
///
/// Every version accepts 2 to 40 bytes, except version 0 which accepts only
/// 20 or 32.
pub fn validate_program_length(version: WitnessVersion, len: usize) -> Result<(), AddressFormatError> {
    if !(MIN_PROGRAM_LENGTH..=MAX_PROGRAM_LENGTH).contains(&len) {
        return Err(AddressFormatError::InvalidDataLength(LengthError::Program(len)));
    }
    if version == WitnessVersion::V0 && len != 20 && len != 32 {
        return Err(AddressFormatError::InvalidDataLength(LengthError::SegwitV0(len)));
    }
    Ok(())
}

/// A witness version together with a program of valid length.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct WitnessProgram {
    version: WitnessVersion,
    program: Vec<u8>,
}

impl WitnessProgram {
    /// Validates `program` against the length rules for `version`.
    pub fn new(version: WitnessVersion, program: Vec<u8>) -> Result<Self, AddressFormatError> {
        validate_program_length(version, program.len())?;
        Ok(WitnessProgram { version, program })
    }

    /// Interprets checksum-verified bech32 data as a witness program.
    ///
    /// The first symbol is the version, the rest regroup to the program
    /// bytes with no padding allowed. The variant recorded in `decoded` must
    /// be bech32 for version 0 and bech32m for every other version.
    ///
    /// # Errors
    ///
    /// * `InvalidDataLength` if the data is empty or the program length is wrong
    /// * `InvalidWitnessVersion` if the first symbol is above 16
    /// * `InvalidPadding` if the 5-to-8 regrouping leaves bad padding
    /// * `InvalidChecksum` if the checksum variant does not match the version
    pub fn from_decoded(decoded: &Decoded) -> Result<Self, AddressFormatError> {
        let (&first, rest) = decoded
            .data()
            .split_first()
            .ok_or(AddressFormatError::InvalidDataLength(LengthError::Empty))?;
        let version = WitnessVersion::try_from(first)?;
        let program = codec::convert_bits(rest, 5, 8, false)?;
        validate_program_length(version, program.len())?;

        if decoded.variant() != version.variant() {
            return Err(AddressFormatError::InvalidChecksum(ChecksumError::WrongVariant {
                version,
                found: decoded.variant(),
            }));
        }
        Ok(WitnessProgram { version, program })
    }

    /// The 5-bit data symbols to encode: version, then the padded program.
    pub fn to_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(1 + (self.program.len() * 8 + 4) / 5);
        data.push(self.version.to_u8());
        data.extend(
            codec::convert_bits(&self.program, 8, 5, true)
                .expect("bytes always regroup into 5-bit values with padding"),
        );
        data
    }

    pub fn version(&self) -> WitnessVersion {
        self.version
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn version_bounds() {
        assert_eq!(WitnessVersion::try_from(16), Ok(WitnessVersion::V16));
        assert_eq!(WitnessVersion::try_from(17), Err(AddressFormatError::InvalidWitnessVersion(17)));
        assert_eq!(WitnessVersion::V0.opcode(), 0x00);
        assert_eq!(WitnessVersion::V1.opcode(), 0x51);
        assert_eq!(WitnessVersion::V16.opcode(), 0x60);
    }

    #[test]
    fn program_lengths() {
        assert!(validate_program_length(WitnessVersion::V0, 20).is_ok());
        assert!(validate_program_length(WitnessVersion::V0, 32).is_ok());
        assert_eq!(
            validate_program_length(WitnessVersion::V0, 16),
            Err(AddressFormatError::InvalidDataLength(LengthError::SegwitV0(16)))
        );
        assert!(validate_program_length(WitnessVersion::V1, 2).is_ok());
        assert!(validate_program_length(WitnessVersion::V1, 20).is_ok());
        assert!(validate_program_length(WitnessVersion::V1, 40).is_ok());
        assert_eq!(
            validate_program_length(WitnessVersion::V16, 1),
            Err(AddressFormatError::InvalidDataLength(LengthError::Program(1)))
        );
        assert_eq!(
            validate_program_length(WitnessVersion::V16, 41),
            Err(AddressFormatError::InvalidDataLength(LengthError::Program(41)))
        );
    }

    #[test]
    fn decoded_round_trip() {
        let wp = WitnessProgram::new(WitnessVersion::V16, vec![0x75, 0x1e]).unwrap();
        let s = codec::encode("bc", &wp.to_data(), Variant::Bech32m).unwrap();
        assert_eq!(s, "bc1sw50qgdz25j");
        let decoded = codec::decode(&s).unwrap();
        assert_eq!(WitnessProgram::from_decoded(&decoded).unwrap(), wp);
    }

    #[test]
    fn variant_must_match_version() {
        let wp = WitnessProgram::new(WitnessVersion::V16, vec![0x75, 0x1e]).unwrap();
        let s = codec::encode("bc", &wp.to_data(), Variant::Bech32).unwrap();
        let decoded = codec::decode(&s).unwrap();
        assert_eq!(
            WitnessProgram::from_decoded(&decoded),
            Err(AddressFormatError::InvalidChecksum(ChecksumError::WrongVariant {
                version: WitnessVersion::V16,
                found: Variant::Bech32,
            }))
        );
    }

    #[test]
    fn empty_data_section() {
        let decoded = codec::decode("bc1gmk9yu").unwrap();
        assert_eq!(
            WitnessProgram::from_decoded(&decoded),
            Err(AddressFormatError::InvalidDataLength(LengthError::Empty))
        );
    }
}
