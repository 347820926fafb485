//! Networks ⇄ HRP prefixes.

use core::fmt;
use core::str::FromStr;

/// Bitcoin networks a Segwit address can belong to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Network {
    /// Main Bitcoin network (`bc` prefix).
    Mainnet,
    /// Bitcoin testnet (`tb` prefix).
    Testnet,
    /// Signet (`tb` prefix, shared with testnet).
    Signet,
    /// Regression-test network (`bcrt` prefix).
    Regtest,
}

/// The set of networks whose addresses are interchangeable.
///
/// Addresses compare equal across networks in the same namespace.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AddressNamespace {
    Bitcoin,
    Test,
    Regtest,
}

impl Network {
    /// Every network, in the order any-network parsing tries them.
    pub const ALL: [Network; 4] = [Network::Mainnet, Network::Testnet, Network::Signet, Network::Regtest];

    /// The default bech32 HRP.
    pub fn hrp(self) -> &'static str {
        match self {
            Network::Mainnet => "bc",
            Network::Testnet | Network::Signet => "tb",
            Network::Regtest => "bcrt",
        }
    }

    pub fn namespace(self) -> AddressNamespace {
        match self {
            Network::Mainnet => AddressNamespace::Bitcoin,
            Network::Testnet | Network::Signet => AddressNamespace::Test,
            Network::Regtest => AddressNamespace::Regtest,
        }
    }

    /// Stable identifier, as used by [`Display`](fmt::Display) and [`FromStr`].
    pub fn id(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Signet => "signet",
            Network::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The identifier did not name a known network.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnknownNetworkError(alloc::string::String);

impl fmt::Display for UnknownNetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown network: {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownNetworkError {}

impl FromStr for Network {
    type Err = UnknownNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .iter()
            .copied()
            .find(|n| n.id() == s)
            .ok_or_else(|| UnknownNetworkError(s.into()))
    }
}

/* ------------------------------------------------------------- *
 *  Prefix registry                                               *
 * ------------------------------------------------------------- */

/// Maps networks to HRP prefixes and back.
///
/// Implementations must be immutable once built; they are shared freely
/// between parsing calls.
pub trait NetworkLookup {
    /// The HRP addresses for `network` are encoded with.
    fn prefix_for(&self, network: Network) -> &str;

    /// Candidate networks, in the order prefix resolution tries them.
    fn candidates(&self) -> &[Network];

    /// The first candidate whose prefix is `prefix` (case-insensitive).
    fn network_for(&self, prefix: &str) -> Option<Network> {
        self.candidates()
            .iter()
            .copied()
            .find(|&n| self.prefix_for(n).eq_ignore_ascii_case(prefix))
    }
}

/// The built-in registry: every [`Network`] with its default prefix.
#[derive(Debug, Copy, Clone, Default)]
pub struct DefaultNetworks;

impl NetworkLookup for DefaultNetworks {
    fn prefix_for(&self, network: Network) -> &str {
        network.hrp()
    }

    fn candidates(&self) -> &[Network] {
        &Network::ALL
    }
}
