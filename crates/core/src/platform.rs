//! Supported platform registry
//!
//! Static table of the marketplaces credentials can be stored for.
//! Each entry declares which extra fields the platform needs and the
//! shape its API key and secret must have. Callers treat an absent
//! entry as a validation failure, never as a crash.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Closed set of supported external platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "bol.com")]
    Bol,
    #[serde(rename = "amazon")]
    Amazon,
    #[serde(rename = "amazon-usa")]
    AmazonUsa,
    #[serde(rename = "zalando")]
    Zalando,
    #[serde(rename = "walmart")]
    Walmart,
}

/// Registry entry for one platform.
#[derive(Debug, Clone, Copy)]
pub struct PlatformConfig {
    /// Whether an API secret must accompany the key.
    pub requires_secret: bool,
    /// Extra fields the submission map must carry, by wire name.
    pub required_fields: &'static [&'static str],
    /// Anchored pattern the API key must match.
    pub key_pattern: &'static str,
    /// Anchored pattern the API secret must match, when one applies.
    pub secret_pattern: Option<&'static str>,
}

const BOL: PlatformConfig = PlatformConfig {
    requires_secret: true,
    required_fields: &[],
    key_pattern: r"^[A-Za-z0-9-]{32}$",
    secret_pattern: Some(r"^[A-Za-z0-9-]{32}$"),
};

const AMAZON: PlatformConfig = PlatformConfig {
    requires_secret: false,
    required_fields: &["clientId", "merchantId", "marketplaceId"],
    key_pattern: r"^AKIA[0-9A-Z]{16}$",
    secret_pattern: None,
};

const ZALANDO: PlatformConfig = PlatformConfig {
    requires_secret: false,
    required_fields: &["clientId"],
    key_pattern: r"^[A-Za-z0-9]{32}$",
    secret_pattern: None,
};

const WALMART: PlatformConfig = PlatformConfig {
    requires_secret: false,
    required_fields: &["clientId", "merchantId"],
    key_pattern: r"^[A-Za-z0-9]{40}$",
    secret_pattern: None,
};

impl Platform {
    pub const ALL: [Platform; 5] = [
        Self::Bol,
        Self::Amazon,
        Self::AmazonUsa,
        Self::Zalando,
        Self::Walmart,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bol => "bol.com",
            Self::Amazon => "amazon",
            Self::AmazonUsa => "amazon-usa",
            Self::Zalando => "zalando",
            Self::Walmart => "walmart",
        }
    }

    /// Registry entry for this platform. amazon-usa shares amazon's
    /// requirements.
    pub fn config(self) -> &'static PlatformConfig {
        match self {
            Self::Bol => &BOL,
            Self::Amazon | Self::AmazonUsa => &AMAZON,
            Self::Zalando => &ZALANDO,
            Self::Walmart => &WALMART,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "bol.com" => Ok(Self::Bol),
            "amazon" => Ok(Self::Amazon),
            "amazon-usa" => Ok(Self::AmazonUsa),
            "zalando" => Ok(Self::Zalando),
            "walmart" => Ok(Self::Walmart),
            _ => Err(Error::UnknownPlatform(value.to_string())),
        }
    }
}

/// Look up a platform by its wire identifier. Unknown identifiers
/// yield `None`; callers fail closed.
pub fn lookup(identifier: &str) -> Option<(Platform, &'static PlatformConfig)> {
    identifier
        .parse::<Platform>()
        .ok()
        .map(|platform| (platform, platform.config()))
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;

    #[test]
    fn all_registry_patterns_compile() {
        for platform in Platform::ALL {
            let config = platform.config();
            Regex::new(config.key_pattern).unwrap();
            if let Some(pattern) = config.secret_pattern {
                Regex::new(pattern).unwrap();
            }
        }
    }

    #[test]
    fn wire_identifiers_round_trip() {
        for platform in Platform::ALL {
            let parsed: Platform = platform.as_str().parse().unwrap();
            assert_eq!(parsed, platform);
        }
    }

    #[test]
    fn unknown_identifier_is_absent() {
        assert!(lookup("etsy").is_none());
        assert!(matches!(
            "etsy".parse::<Platform>(),
            Err(Error::UnknownPlatform(_))
        ));
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Platform::Bol).unwrap();
        assert_eq!(json, "\"bol.com\"");
        let back: Platform = serde_json::from_str("\"amazon-usa\"").unwrap();
        assert_eq!(back, Platform::AmazonUsa);
    }
}
