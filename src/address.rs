//! The Segwit address value type.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

use crate::codec::{self, EncodeError};
use crate::error::{AddressFormatError, PrefixError};
use crate::network::{AddressNamespace, DefaultNetworks, Network, NetworkLookup};
use crate::witness::{WitnessProgram, WitnessVersion};

/// Named output script shapes for version 0 programs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OutputScriptType {
    /// Pay to witness public key hash (version 0, 20 bytes).
    P2wpkh,
    /// Pay to witness script hash (version 0, 32 bytes).
    P2wsh,
}

/// A validated Segwit address: network, witness version and program.
///
/// Equality and hashing ignore the difference between networks that share
/// an [`AddressNamespace`], so a testnet and a signet address with the same
/// program are equal.
#[derive(Clone)]
pub struct SegwitAddress {
    network: Network,
    program: WitnessProgram,
}

impl SegwitAddress {
    /// Parses `s`, resolving its prefix through `lookup`.
    ///
    /// With `expected` set, the prefix must be the one `lookup` registers for
    /// that network; the address then belongs to `expected` even when other
    /// networks share the prefix.
    ///
    /// # Errors
    ///
    /// Any [`AddressFormatError`]; `WrongNetwork` when the prefix belongs to
    /// another network than `expected`, `InvalidPrefix` when no network claims it.
    pub fn parse<L: NetworkLookup + ?Sized>(
        lookup: &L,
        expected: Option<Network>,
        s: &str,
    ) -> Result<Self, AddressFormatError> {
        let decoded = codec::decode(s)?;
        let network = resolve_network(lookup, expected, decoded.hrp())?;
        let program = WitnessProgram::from_decoded(&decoded)?;
        Ok(SegwitAddress { network, program })
    }

    /// Parses `s` for whichever of `lookup`'s candidates claims its prefix first.
    pub fn parse_any<L: NetworkLookup + ?Sized>(lookup: &L, s: &str) -> Result<Self, AddressFormatError> {
        Self::parse(lookup, None, s)
    }

    /// Parses `s` for `network` using the built-in prefixes.
    pub fn from_bech32(network: Network, s: &str) -> Result<Self, AddressFormatError> {
        Self::parse(&DefaultNetworks, Some(network), s)
    }

    /// Builds an address from its parts.
    ///
    /// # Errors
    ///
    /// `InvalidDataLength` if `program` breaks the length rules for `version`.
    pub fn from_program(
        network: Network,
        version: WitnessVersion,
        program: &[u8],
    ) -> Result<Self, AddressFormatError> {
        let program = WitnessProgram::new(version, program.to_vec())?;
        Ok(SegwitAddress { network, program })
    }

    /// A version 0 address for a 20-byte key hash or a 32-byte script hash.
    pub fn from_hash(network: Network, hash: &[u8]) -> Result<Self, AddressFormatError> {
        Self::from_program(network, WitnessVersion::V0, hash)
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn namespace(&self) -> AddressNamespace {
        self.network.namespace()
    }

    pub fn witness_version(&self) -> WitnessVersion {
        self.program.version()
    }

    pub fn witness_program(&self) -> &[u8] {
        self.program.program()
    }

    /// The script shape for version 0 programs, `None` for a generic witness output.
    pub fn output_script_type(&self) -> Option<OutputScriptType> {
        match (self.witness_version(), self.witness_program().len()) {
            (WitnessVersion::V0, 20) => Some(OutputScriptType::P2wpkh),
            (WitnessVersion::V0, 32) => Some(OutputScriptType::P2wsh),
            _ => None,
        }
    }

    /// The output script: version opcode, program push.
    pub fn script_pubkey(&self) -> Vec<u8> {
        let program = self.witness_program();
        let mut script = Vec::with_capacity(2 + program.len());
        script.push(self.witness_version().opcode());
        // Program length is at most 40, a direct push.
        script.push(program.len() as u8);
        script.extend_from_slice(program);
        script
    }

    /// Encodes the address with the prefix `lookup` registers for its network.
    ///
    /// # Errors
    ///
    /// Only if `lookup` registers an unusable prefix (empty, non-printable,
    /// or long enough to push the string past 90 characters).
    pub fn to_bech32_with<L: NetworkLookup + ?Sized>(&self, lookup: &L) -> Result<String, EncodeError> {
        codec::encode(
            lookup.prefix_for(self.network),
            &self.program.to_data(),
            self.witness_version().variant(),
        )
    }

    /// The lower-case address string with the built-in prefix.
    ///
    /// Addresses parsed through a custom [`NetworkLookup`] still encode with
    /// [`Network::hrp`] here; use [`to_bech32_with`](Self::to_bech32_with) to
    /// keep the registry's prefix.
    pub fn to_bech32(&self) -> String {
        alloc::string::ToString::to_string(self)
    }
}

fn resolve_network<L: NetworkLookup + ?Sized>(
    lookup: &L,
    expected: Option<Network>,
    hrp: &str,
) -> Result<Network, AddressFormatError> {
    let unknown = || AddressFormatError::InvalidPrefix(PrefixError::Unknown(hrp.into()));
    match expected {
        Some(network) if lookup.prefix_for(network).eq_ignore_ascii_case(hrp) => Ok(network),
        Some(expected) => match lookup.network_for(hrp) {
            Some(found) => Err(AddressFormatError::WrongNetwork { expected, found }),
            None => Err(unknown()),
        },
        None => lookup.network_for(hrp).ok_or_else(unknown),
    }
}

impl PartialEq for SegwitAddress {
    fn eq(&self, other: &Self) -> bool {
        self.namespace() == other.namespace() && self.program == other.program
    }
}

impl Eq for SegwitAddress {}

impl Hash for SegwitAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace().hash(state);
        self.program.hash(state);
    }
}

/// Encodes with the built-in prefixes of [`DefaultNetworks`], whatever
/// registry the address was parsed with.
impl fmt::Display for SegwitAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.to_bech32_with(&DefaultNetworks).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl fmt::Debug for SegwitAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegwitAddress")
            .field("network", &self.network)
            .field("version", &self.witness_version().to_u8())
            .field("program", &hex::encode(self.witness_program()))
            .finish()
    }
}

impl FromStr for SegwitAddress {
    type Err = AddressFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_any(&DefaultNetworks, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    const P2WPKH_TESTNET: &str = "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx";

    struct MainnetOnly;

    /// Built-in prefixes, except for signet.
    struct SignetPrefix(&'static str);

    impl NetworkLookup for SignetPrefix {
        fn prefix_for(&self, network: Network) -> &str {
            match network {
                Network::Signet => self.0,
                n => n.hrp(),
            }
        }

        fn candidates(&self) -> &[Network] {
            &Network::ALL
        }
    }

    impl NetworkLookup for MainnetOnly {
        fn prefix_for(&self, network: Network) -> &str {
            network.hrp()
        }

        fn candidates(&self) -> &[Network] {
            &[Network::Mainnet]
        }
    }

    #[test]
    fn p2wpkh_mainnet() {
        let s = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
        let addr = SegwitAddress::from_bech32(Network::Mainnet, s).unwrap();
        assert_eq!(addr.network(), Network::Mainnet);
        assert_eq!(addr.output_script_type(), Some(OutputScriptType::P2wpkh));
        assert_eq!(
            hex::encode(addr.script_pubkey()),
            "0014751e76e8199196d454941c45d1b3a323f1433bd6"
        );
        assert_eq!(addr.to_string(), s);
    }

    #[test]
    fn expected_network_keeps_identity() {
        let a = SegwitAddress::from_bech32(Network::Testnet, P2WPKH_TESTNET).unwrap();
        let b = SegwitAddress::from_bech32(Network::Signet, P2WPKH_TESTNET).unwrap();
        assert_eq!(a.network(), Network::Testnet);
        assert_eq!(b.network(), Network::Signet);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn equality_is_by_namespace() {
        let program = [0x75; 20];
        let main = SegwitAddress::from_hash(Network::Mainnet, &program).unwrap();
        let regtest = SegwitAddress::from_hash(Network::Regtest, &program).unwrap();
        assert_ne!(main, regtest);
    }

    #[test]
    fn custom_lookup() {
        let err = SegwitAddress::parse_any(&MainnetOnly, P2WPKH_TESTNET).unwrap_err();
        assert_eq!(err, AddressFormatError::InvalidPrefix(PrefixError::Unknown("tb".into())));

        let err = SegwitAddress::parse(&MainnetOnly, Some(Network::Mainnet), P2WPKH_TESTNET).unwrap_err();
        assert_eq!(err, AddressFormatError::InvalidPrefix(PrefixError::Unknown("tb".into())));
    }

    #[test]
    fn encode_with_registry_prefix() {
        let registry = SignetPrefix("sb");
        let addr = SegwitAddress::from_hash(Network::Signet, &[0x75; 20]).unwrap();
        let s = addr.to_bech32_with(&registry).unwrap();
        assert!(s.starts_with("sb1q"), "{s}");

        let parsed = SegwitAddress::parse(&registry, Some(Network::Signet), &s).unwrap();
        assert_eq!(parsed.network(), Network::Signet);
        assert_eq!(parsed, addr);
        assert_eq!(parsed.to_bech32_with(&registry).unwrap(), s);
        assert_eq!(SegwitAddress::parse_any(&registry, &s).unwrap().network(), Network::Signet);

        // Display keeps the built-in prefix.
        assert!(parsed.to_string().starts_with("tb1q"));
    }

    #[test]
    fn encode_with_unusable_registry_prefix() {
        let addr = SegwitAddress::from_hash(Network::Signet, &[0x75; 20]).unwrap();
        assert_eq!(addr.to_bech32_with(&SignetPrefix("")), Err(EncodeError::EmptyPrefix));

        // 60 + separator + 33 data symbols + checksum.
        let long = SignetPrefix("abcdefghijabcdefghijabcdefghijabcdefghijabcdefghijabcdefghij");
        assert_eq!(addr.to_bech32_with(&long), Err(EncodeError::TooLong(100)));
    }

    #[test]
    fn wrong_network() {
        let err = SegwitAddress::from_bech32(Network::Mainnet, P2WPKH_TESTNET).unwrap_err();
        assert_eq!(
            err,
            AddressFormatError::WrongNetwork { expected: Network::Mainnet, found: Network::Testnet }
        );
    }

    #[test]
    fn generic_witness_output() {
        let addr = SegwitAddress::from_program(Network::Mainnet, WitnessVersion::V16, &[0x75, 0x1e]).unwrap();
        assert_eq!(addr.output_script_type(), None);
        assert_eq!(hex::encode(addr.script_pubkey()), "6002751e");
        assert_eq!(addr.to_string(), "bc1sw50qgdz25j");
    }

    #[test]
    fn debug_shows_program_hex() {
        let addr = SegwitAddress::from_program(Network::Mainnet, WitnessVersion::V16, &[0x75, 0x1e]).unwrap();
        let dbg = alloc::format!("{addr:?}");
        assert!(dbg.contains("751e"), "{dbg}");
    }
}
