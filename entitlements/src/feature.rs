use std::fmt;
use std::str::FromStr;

use common::error::AppError;
use serde::{Deserialize, Serialize};

/// The gated capabilities tracked by the usage ledger.
///
/// The set is closed: unknown keys are rejected when parsed instead of
/// being silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    RecipeGeneration,
    VideoGeneration,
    CommunityPost,
    CommunityComment,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 4] = [
        FeatureKey::RecipeGeneration,
        FeatureKey::VideoGeneration,
        FeatureKey::CommunityPost,
        FeatureKey::CommunityComment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::RecipeGeneration => "recipe_generation",
            FeatureKey::VideoGeneration => "video_generation",
            FeatureKey::CommunityPost => "community_post",
            FeatureKey::CommunityComment => "community_comment",
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recipe_generation" => Ok(FeatureKey::RecipeGeneration),
            "video_generation" => Ok(FeatureKey::VideoGeneration),
            "community_post" => Ok(FeatureKey::CommunityPost),
            "community_comment" => Ok(FeatureKey::CommunityComment),
            other => Err(AppError::UnknownFeature(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_key() {
        for key in FeatureKey::ALL {
            assert_eq!(key.as_str().parse::<FeatureKey>().unwrap(), key);
        }
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            "pdf_export".parse::<FeatureKey>(),
            Err(AppError::UnknownFeature(_))
        ));
        // keys are exact strings, not case-insensitive
        assert!("Recipe_Generation".parse::<FeatureKey>().is_err());
    }
}
