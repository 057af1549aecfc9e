//! The seven fixed travel-metric categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A travel-metric dimension scored for every city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Safety,
    Sustainability,
    Enjoyment,
    Calmcation,
    CulturalExchange,
    Navigation,
    EcoFriendly,
}

impl Category {
    /// Every category, in the order the API lists them.
    pub const ALL: [Category; 7] = [
        Category::Safety,
        Category::Sustainability,
        Category::Enjoyment,
        Category::Calmcation,
        Category::CulturalExchange,
        Category::Navigation,
        Category::EcoFriendly,
    ];

    /// Canonical lowercase name used in URLs and payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Safety => "safety",
            Category::Sustainability => "sustainability",
            Category::Enjoyment => "enjoyment",
            Category::Calmcation => "calmcation",
            Category::CulturalExchange => "cultural_exchange",
            Category::Navigation => "navigation",
            Category::EcoFriendly => "eco_friendly",
        }
    }

    /// Column holding this category's 0–10 score.
    ///
    /// The returned names come from a closed set, so they are safe to splice
    /// into `ORDER BY` clauses.
    pub fn score_column(self) -> &'static str {
        match self {
            Category::Safety => "safety_score",
            Category::Sustainability => "sustainability_score",
            Category::Enjoyment => "enjoyment_score",
            Category::Calmcation => "calmcation_score",
            Category::CulturalExchange => "cultural_exchange_score",
            Category::Navigation => "navigation_score",
            Category::EcoFriendly => "eco_friendly_score",
        }
    }

    pub(crate) fn description_column(self) -> String {
        format!("{}_description", self.as_str())
    }

    pub(crate) fn tips_column(self) -> String {
        format!("{}_tips", self.as_str())
    }

    pub(crate) fn recommendations_column(self) -> String {
        format!("{}_recommendations", self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Parse a category name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| Error::InvalidCategory {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("SAFETY".parse::<Category>().unwrap(), Category::Safety);
        assert_eq!(
            "Cultural_Exchange".parse::<Category>().unwrap(),
            Category::CulturalExchange
        );
        assert_eq!(
            "eco_friendly".parse::<Category>().unwrap(),
            Category::EcoFriendly
        );
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "eco-friendly".parse::<Category>().unwrap_err();
        assert!(matches!(err, Error::InvalidCategory { ref value } if value == "eco-friendly"));
    }

    #[test]
    fn columns_follow_naming_convention() {
        for category in Category::ALL {
            assert_eq!(category.score_column(), format!("{}_score", category));
            assert!(category.recommendations_column().ends_with("_recommendations"));
        }
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&Category::CulturalExchange).unwrap();
        assert_eq!(json, "\"cultural_exchange\"");
    }
}
