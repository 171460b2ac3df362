/// Address encoding for 20-byte public key hashes.
///
/// The decoder only needs `hash -> address` and its inverse, so the encoding
/// sits behind the `AddressEncoder` trait. `Base58AddressEncoder` is the
/// standard P2PKH Base58Check rendering.

use txscope_primitives::base58::{check_decode, check_encode};
use txscope_primitives::hash::hash160;

use crate::ScriptError;

/// Mainnet P2PKH address version byte.
const MAINNET_P2PKH: u8 = 0x00;
/// Testnet P2PKH address version byte.
const TESTNET_P2PKH: u8 = 0x6f;

/// Network type for address prefix selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Mainnet (address prefix 0x00, starts with '1').
    #[default]
    Mainnet,
    /// Testnet (address prefix 0x6f, starts with 'm' or 'n').
    Testnet,
}

impl Network {
    /// The P2PKH version byte for this network.
    pub fn p2pkh_version(&self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_P2PKH,
            Network::Testnet => TESTNET_P2PKH,
        }
    }

    fn from_version(version: u8) -> Option<Self> {
        match version {
            MAINNET_P2PKH => Some(Network::Mainnet),
            TESTNET_P2PKH => Some(Network::Testnet),
            _ => None,
        }
    }
}

/// Converts between 20-byte hashes and address strings.
pub trait AddressEncoder {
    /// Render a public key hash as an address.
    fn encode(&self, hash: &[u8; 20]) -> String;

    /// Parse an address back to its public key hash.
    fn decode(&self, address: &str) -> Result<[u8; 20], ScriptError>;

    /// Hash a raw public key and render it as an address.
    fn encode_public_key(&self, pub_key: &[u8]) -> String {
        self.encode(&hash160(pub_key))
    }
}

/// Base58Check P2PKH addresses for one network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Base58AddressEncoder {
    pub network: Network,
}

impl Base58AddressEncoder {
    pub fn new(network: Network) -> Self {
        Base58AddressEncoder { network }
    }
}

impl AddressEncoder for Base58AddressEncoder {
    fn encode(&self, hash: &[u8; 20]) -> String {
        let mut payload = Vec::with_capacity(21);
        payload.push(self.network.p2pkh_version());
        payload.extend_from_slice(hash);
        check_encode(&payload)
    }

    /// Accepts addresses of either network; the version byte must be a known
    /// P2PKH prefix.
    fn decode(&self, address: &str) -> Result<[u8; 20], ScriptError> {
        let payload = check_decode(address)?;
        if payload.len() != 21 {
            return Err(ScriptError::InvalidAddress(format!(
                "'{}' decodes to {} bytes, expected 21",
                address,
                payload.len()
            )));
        }
        if Network::from_version(payload[0]).is_none() {
            return Err(ScriptError::UnsupportedAddressVersion(payload[0]));
        }
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&payload[1..]);
        Ok(hash)
    }
}
