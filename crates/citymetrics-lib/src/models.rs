//! Row shapes returned by [`CityStore`](crate::CityStore) queries.
//!
//! Each type maps a `city_metrics` row (or a projection of one) by column
//! name and serializes to the JSON body the HTTP layer returns.

use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{Error, Result};
use crate::recommendations::parse_recommendations;

/// Inclusive bounds for every stored score.
pub const SCORE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

/// Assessment of a city in a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDetail {
    /// Score from 0 to 10.
    pub score: f64,
    /// Detailed assessment.
    pub description: String,
    /// Practical tips for travelers.
    pub tips: String,
    /// Specific recommendations, decoded from the stored free text.
    pub recommendations: Vec<String>,
}

impl MetricDetail {
    fn from_row(row: &Row<'_>, category: Category) -> rusqlite::Result<Self> {
        let recommendations: Option<String> = row.get(category.recommendations_column().as_str())?;
        Ok(Self {
            score: row.get(category.score_column())?,
            description: text(row, &category.description_column())?,
            tips: text(row, &category.tips_column())?,
            recommendations: parse_recommendations(recommendations.as_deref()),
        })
    }
}

/// Full record for one (capital, country) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityMetrics {
    pub id: i64,
    pub country: String,
    pub capital: String,
    pub analysis_date: String,

    pub city_description: String,
    pub overall_summary: String,

    pub safety: MetricDetail,
    pub sustainability: MetricDetail,
    pub enjoyment: MetricDetail,
    pub calmcation: MetricDetail,
    pub cultural_exchange: MetricDetail,
    pub navigation: MetricDetail,
    pub eco_friendly: MetricDetail,

    pub overall_score: f64,
    pub best_features: String,
    pub improvement_areas: String,

    pub post_count: i64,
    pub total_engagement: i64,
}

impl CityMetrics {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            country: row.get("country")?,
            capital: row.get("capital")?,
            analysis_date: text(row, "analysis_date")?,
            city_description: text(row, "city_description")?,
            overall_summary: text(row, "overall_summary")?,
            safety: MetricDetail::from_row(row, Category::Safety)?,
            sustainability: MetricDetail::from_row(row, Category::Sustainability)?,
            enjoyment: MetricDetail::from_row(row, Category::Enjoyment)?,
            calmcation: MetricDetail::from_row(row, Category::Calmcation)?,
            cultural_exchange: MetricDetail::from_row(row, Category::CulturalExchange)?,
            navigation: MetricDetail::from_row(row, Category::Navigation)?,
            eco_friendly: MetricDetail::from_row(row, Category::EcoFriendly)?,
            overall_score: row.get("overall_score")?,
            best_features: text(row, "best_features")?,
            improvement_areas: text(row, "improvement_areas")?,
            post_count: row.get::<_, Option<i64>>("post_count")?.unwrap_or_default(),
            total_engagement: row
                .get::<_, Option<i64>>("total_engagement")?
                .unwrap_or_default(),
        })
    }

    /// Detail for one category.
    pub fn metric(&self, category: Category) -> &MetricDetail {
        match category {
            Category::Safety => &self.safety,
            Category::Sustainability => &self.sustainability,
            Category::Enjoyment => &self.enjoyment,
            Category::Calmcation => &self.calmcation,
            Category::CulturalExchange => &self.cultural_exchange,
            Category::Navigation => &self.navigation,
            Category::EcoFriendly => &self.eco_friendly,
        }
    }

    /// Reject records whose overall or category scores leave the 0–10 range.
    pub fn check_scores(&self) -> Result<()> {
        let scores = std::iter::once(("overall_score", self.overall_score)).chain(
            Category::ALL
                .into_iter()
                .map(|c| (c.score_column(), self.metric(c).score)),
        );

        for (column, value) in scores {
            if !SCORE_RANGE.contains(&value) {
                return Err(Error::ScoreOutOfRange {
                    capital: self.capital.clone(),
                    column,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Score-only view of a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub capital: String,
    pub country: String,
    pub overall_score: f64,
    pub safety_score: f64,
    pub sustainability_score: f64,
    pub enjoyment_score: f64,
    pub calmcation_score: f64,
    pub cultural_exchange_score: f64,
    pub navigation_score: f64,
    pub eco_friendly_score: f64,
}

impl ScoreCard {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            capital: row.get("capital")?,
            country: row.get("country")?,
            overall_score: row.get("overall_score")?,
            safety_score: row.get("safety_score")?,
            sustainability_score: row.get("sustainability_score")?,
            enjoyment_score: row.get("enjoyment_score")?,
            calmcation_score: row.get("calmcation_score")?,
            cultural_exchange_score: row.get("cultural_exchange_score")?,
            navigation_score: row.get("navigation_score")?,
            eco_friendly_score: row.get("eco_friendly_score")?,
        })
    }
}

/// Per-category scores nested inside a ranking entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub safety: f64,
    pub sustainability: f64,
    pub enjoyment: f64,
    pub calmcation: f64,
    pub cultural_exchange: f64,
    pub navigation: f64,
    pub eco_friendly: f64,
}

impl CategoryScores {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            safety: row.get("safety_score")?,
            sustainability: row.get("sustainability_score")?,
            enjoyment: row.get("enjoyment_score")?,
            calmcation: row.get("calmcation_score")?,
            cultural_exchange: row.get("cultural_exchange_score")?,
            navigation: row.get("navigation_score")?,
            eco_friendly: row.get("eco_friendly_score")?,
        })
    }

    /// Score for one category.
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Safety => self.safety,
            Category::Sustainability => self.sustainability,
            Category::Enjoyment => self.enjoyment,
            Category::Calmcation => self.calmcation,
            Category::CulturalExchange => self.cultural_exchange,
            Category::Navigation => self.navigation,
            Category::EcoFriendly => self.eco_friendly,
        }
    }
}

/// Entry in the `/cities` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityOverview {
    pub capital: String,
    pub country: String,
    pub overall_score: f64,
    pub analysis_date: String,
}

impl CityOverview {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            capital: row.get("capital")?,
            country: row.get("country")?,
            overall_score: row.get("overall_score")?,
            analysis_date: text(row, "analysis_date")?,
        })
    }
}

/// City ranked by overall score, with its full score set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCity {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub capital: String,
    pub country: String,
    pub overall_score: f64,
    pub scores: CategoryScores,
    pub description: String,
}

impl RankedCity {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            rank: 0,
            capital: row.get("capital")?,
            country: row.get("country")?,
            overall_score: row.get("overall_score")?,
            scores: CategoryScores::from_row(row)?,
            description: text(row, "city_description")?,
        })
    }
}

/// City ranked by a single category score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRankedCity {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub capital: String,
    pub country: String,
    pub category_score: f64,
    pub overall_score: f64,
    pub description: String,
}

impl CategoryRankedCity {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            rank: 0,
            capital: row.get("capital")?,
            country: row.get("country")?,
            category_score: row.get("category_score")?,
            overall_score: row.get("overall_score")?,
            description: text(row, "city_description")?,
        })
    }
}

/// Search result entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub capital: String,
    pub country: String,
    pub overall_score: f64,
    pub description: String,
}

impl SearchHit {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            capital: row.get("capital")?,
            country: row.get("country")?,
            overall_score: row.get("overall_score")?,
            description: text(row, "city_description")?,
        })
    }
}

/// Read a nullable text column, treating NULL as empty.
fn text(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}
