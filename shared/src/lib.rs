//! # Shared Schemas
//!
//! Request/response contract between the API server and its consumers.
//! The dashboard deserializes these shapes verbatim, so field names are part
//! of the wire contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_AUTHOR_LEN: usize = 100;
pub const MAX_COMMENT_LEN: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCategory {
    pub category: String,
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityScores {
    pub city_id: i32,
    pub scores: Vec<ScoreCategory>,
    /// Stored aggregate, read as-is rather than recomputed from the rows.
    pub overall: f64,
}

/// City summary used in search results and recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub department: String,
    pub region: String,
    pub population: i32,
    pub overall_score: f64,
}

/// Full city record assembled from two independent lookups at request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityDetail {
    pub id: i32,
    pub name: String,
    pub department: String,
    pub region: String,
    pub population: i32,
    pub overall_score: f64,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub scores: Vec<ScoreCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityListResponse {
    pub cities: Vec<City>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub city_id: i32,
    pub author: String,
    pub rating: i32,
    pub comment: String,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// User-submitted review body. The city id comes from the request path, never
/// from the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    #[serde(default = "default_author")]
    pub author: String,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ReviewCreate {
    /// Boundary validation; repositories assume these bounds already hold.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.rating) {
            return Err("rating must be between 1 and 5".to_string());
        }
        if self.author.chars().count() > MAX_AUTHOR_LEN {
            return Err(format!("author must be at most {MAX_AUTHOR_LEN} characters"));
        }
        if self.comment.chars().count() > MAX_COMMENT_LEN {
            return Err(format!("comment must be at most {MAX_COMMENT_LEN} characters"));
        }
        Ok(())
    }
}

fn default_author() -> String {
    "Anonymous".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewsResponse {
    pub reviews: Vec<Review>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub city: City,
    pub similarity_score: f64,
    pub common_strengths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub source_city: String,
    pub recommendations: Vec<RecommendationItem>,
}
