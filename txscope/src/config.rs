//! Inspection settings.

use serde::{Deserialize, Serialize};

use txscope_script::Network;
use txscope_tokenized::DecodeLimits;

use crate::InspectError;

/// Settings an [`Inspector`](crate::Inspector) can be built from.
///
/// Every key is optional:
///
/// ```json
/// { "network": "testnet", "limits": { "max_depth": 2 } }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Network whose address prefix P2PKH payloads are rendered with.
    pub network: Network,
    /// Bound on nested payload decoding.
    pub limits: DecodeLimits,
}

impl InspectConfig {
    /// Parse a config document.
    pub fn from_json(json: &str) -> Result<Self, InspectError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InspectConfig::from_json("{}").unwrap();
        assert_eq!(config, InspectConfig::default());
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.limits.max_depth, txscope_tokenized::DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_partial_document() {
        let config =
            InspectConfig::from_json(r#"{ "network": "testnet", "limits": { "max_depth": 1 } }"#)
                .unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.limits.max_depth, 1);
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            InspectConfig::from_json(r#"{ "network": "regtest" }"#),
            Err(InspectError::Config(_))
        ));
    }
}
