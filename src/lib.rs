//! Segwit address codec.
//! Avoids unsafe code and works in `no_std` + `alloc` environments.
//!
//! # Crate Overview
//! The **segwit-address** crate encodes & decodes Segregated-Witness Bitcoin
//! addresses ([BIP-173] bech32 and [BIP-350] bech32m). An address couples a
//! network (see [`Network`]) with a witness version and program and is written
//! as a checksummed string like `bc1q…` or `tb1p…`.
//!
//! ```rust
//! use segwit_address::{Network, SegwitAddress, WitnessVersion};
//!
//! let addr: SegwitAddress = "BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4".parse()?;
//! assert_eq!(addr.network(), Network::Mainnet);
//! assert_eq!(addr.witness_version(), WitnessVersion::V0);
//! assert_eq!(addr.to_string(), "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
//!
//! let taproot = SegwitAddress::from_program(Network::Mainnet, WitnessVersion::V1, &[0x79; 32])?;
//! assert_eq!(taproot.to_string().parse::<SegwitAddress>()?, taproot);
//! # Ok::<(), segwit_address::AddressFormatError>(())
//! ```
//!
//! The layers are usable on their own:
//! * [`codec`] — bech32/bech32m strings, checksum and bit regrouping.
//! * [`witness`] — witness version and program rules.
//! * [`network`] — network ⇄ prefix registry, injectable via [`NetworkLookup`].
//!
//! ## Feature Flags
//! * **`std`** *(default)* — Use the Rust standard library and implement
//!   `std::error::Error`. Disable to build for `#![no_std]` + `alloc` targets.
//!
//! ## MSRV
//! Minimum supported Rust version: **1.70**.
//!
//! [BIP-173]: <https://github.com/bitcoin/bips/blob/master/bip-0173.mediawiki>
//! [BIP-350]: <https://github.com/bitcoin/bips/blob/master/bip-0350.mediawiki>

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod codec;
pub mod network;
pub mod witness;

mod address;
mod error;

pub use crate::address::{OutputScriptType, SegwitAddress};
pub use crate::codec::Variant;
pub use crate::error::{AddressFormatError, ChecksumError, LengthError, PrefixError};
pub use crate::network::{AddressNamespace, DefaultNetworks, Network, NetworkLookup};
pub use crate::witness::{WitnessProgram, WitnessVersion};
