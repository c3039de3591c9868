//! API rate-limit tiers reported by the provider.

use serde::{Deserialize, Serialize};

/// Rate-limit class of the caller's credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApiTier {
    /// Probe was rejected; the credential is missing or invalid
    NoAuth,
    Regular,
    Gold,
    Diamond,
    Champion,
    GrandChampion,
    /// Tier name the provider reported that we don't know about
    Other(String),
}

impl ApiTier {
    /// Parse the `type` field of the probe response.
    pub fn from_type(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "noauth" => ApiTier::NoAuth,
            "regular" => ApiTier::Regular,
            "gold" => ApiTier::Gold,
            "diamond" => ApiTier::Diamond,
            "champion" => ApiTier::Champion,
            "gc" => ApiTier::GrandChampion,
            _ => ApiTier::Other(value.to_string()),
        }
    }

    /// Returns true if this tier gets the concurrent worker-pool path.
    ///
    /// Unauthenticated and regular credentials are processed sequentially.
    pub fn is_elevated(&self) -> bool {
        !matches!(self, ApiTier::NoAuth | ApiTier::Regular)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ApiTier::NoAuth => "noauth",
            ApiTier::Regular => "regular",
            ApiTier::Gold => "gold",
            ApiTier::Diamond => "diamond",
            ApiTier::Champion => "champion",
            ApiTier::GrandChampion => "gc",
            ApiTier::Other(s) => s,
        }
    }
}

impl From<String> for ApiTier {
    fn from(s: String) -> Self {
        ApiTier::from_type(&s)
    }
}

impl From<ApiTier> for String {
    fn from(tier: ApiTier) -> Self {
        tier.as_str().to_string()
    }
}

impl std::fmt::Display for ApiTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_from_type() {
        assert_eq!(ApiTier::from_type("regular"), ApiTier::Regular);
        assert_eq!(ApiTier::from_type("GC"), ApiTier::GrandChampion);
        assert_eq!(ApiTier::from_type("noauth"), ApiTier::NoAuth);
        assert_eq!(
            ApiTier::from_type("patron"),
            ApiTier::Other("patron".to_string())
        );
    }

    #[test]
    fn test_tier_elevated() {
        assert!(!ApiTier::NoAuth.is_elevated());
        assert!(!ApiTier::Regular.is_elevated());
        assert!(ApiTier::Gold.is_elevated());
        assert!(ApiTier::GrandChampion.is_elevated());
        assert!(ApiTier::Other("patron".to_string()).is_elevated());
    }

    #[test]
    fn test_tier_serialization() {
        let json = serde_json::to_string(&ApiTier::GrandChampion).unwrap();
        assert_eq!(json, "\"gc\"");

        let parsed: ApiTier = serde_json::from_str("\"diamond\"").unwrap();
        assert_eq!(parsed, ApiTier::Diamond);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(format!("{}", ApiTier::NoAuth), "noauth");
        assert_eq!(format!("{}", ApiTier::Regular), "regular");
    }
}
