//! Configuration for a settlement instance.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{Result, TribunalError};

/// Domain a settlement instance is bound to. Both values feed every mandate
/// hash, so a mandate signed for one deployment cannot be filled on another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Chain this instance settles on.
    pub chain_id: u64,
    /// Address identifying this instance.
    pub tribunal: Address,
}

impl SettlementConfig {
    #[must_use]
    pub fn new(chain_id: u64, tribunal: Address) -> Self {
        Self { chain_id, tribunal }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations that could never produce a usable domain.
    pub fn validate(&self) -> Result<()> {
        if self.chain_id == 0 {
            return Err(TribunalError::Configuration("chain_id must be non-zero".into()));
        }
        if self.tribunal == Address::ZERO {
            return Err(TribunalError::Configuration(
                "tribunal address must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_parses_valid_config() {
        let json = r#"{"chain_id":10,"tribunal":"0x1111111111111111111111111111111111111111"}"#;
        let cfg = SettlementConfig::from_json(json).unwrap();
        assert_eq!(cfg.chain_id, 10);
        assert_eq!(cfg.tribunal, Address::repeat_byte(0x11));
    }

    #[test]
    fn zero_chain_id_rejected() {
        let json = r#"{"chain_id":0,"tribunal":"0x1111111111111111111111111111111111111111"}"#;
        let err = SettlementConfig::from_json(json).unwrap_err();
        assert!(matches!(err, TribunalError::Configuration(_)));
    }

    #[test]
    fn zero_tribunal_rejected() {
        let cfg = SettlementConfig::new(1, Address::ZERO);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let err = SettlementConfig::from_json("{").unwrap_err();
        assert!(matches!(err, TribunalError::Serialization(_)));
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = SettlementConfig::new(8453, Address::repeat_byte(0x22));
        let json = serde_json::to_string(&cfg).unwrap();
        let back = SettlementConfig::from_json(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
