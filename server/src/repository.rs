//! Store access seams.
//!
//! Each backend gets one trait and one raw row shape. Repositories hand these
//! raw shapes to the services, which own the single conversion step into the
//! `shared` contract types. Nullable columns stay `Option` here so the
//! defaulting happens in exactly one place.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::ReviewCreate;
use sqlx::FromRow;

use crate::error::AppError;

/// Sort column used when the requested one is not allowed.
pub const DEFAULT_SORT: &str = "overall_score";

/// Columns that may appear in ORDER BY. Everything else falls back to
/// [`DEFAULT_SORT`] instead of reaching the SQL layer.
const ALLOWED_SORT: [&str; 5] = ["overall_score", "population", "name", "department", "region"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CityFilters {
    pub search: Option<String>,
    pub region: Option<String>,
    pub department: Option<String>,
    pub min_population: Option<i32>,
    pub sort_by: String,
    pub sort_order: SortOrder,
    pub page: i64,
    pub page_size: i64,
}

impl Default for CityFilters {
    fn default() -> Self {
        Self {
            search: None,
            region: None,
            department: None,
            min_population: None,
            sort_by: DEFAULT_SORT.to_string(),
            sort_order: SortOrder::Desc,
            page: 1,
            page_size: 20,
        }
    }
}

impl CityFilters {
    /// Sort column actually used in SQL. Disallowed values are normalized
    /// silently, never rejected.
    pub fn sort_column(&self) -> &'static str {
        ALLOWED_SORT
            .into_iter()
            .find(|col| *col == self.sort_by)
            .unwrap_or(DEFAULT_SORT)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CityRow {
    pub id: i32,
    pub name: String,
    pub department: Option<String>,
    pub region: Option<String>,
    pub population: Option<i32>,
    pub overall_score: Option<f64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CityDetailRow {
    pub id: i32,
    pub name: String,
    pub department: Option<String>,
    pub region: Option<String>,
    pub population: Option<i32>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub overall_score: Option<f64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ScoreRow {
    pub category: String,
    pub label: Option<String>,
    pub score: f64,
}

/// Review document with its store-assigned identifier already exposed as a
/// plain string.
#[derive(Debug, Clone)]
pub struct ReviewRecord {
    pub id: String,
    pub city_id: i32,
    pub author: String,
    pub rating: i32,
    pub comment: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// One outgoing SIMILAR_TO edge. Every city attribute is optional: the graph
/// copy is a cache and may be missing properties.
#[derive(Debug, Clone, Default)]
pub struct SimilarCityRow {
    pub city_id: Option<i64>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub region: Option<String>,
    pub population: Option<i64>,
    pub overall_score: Option<f64>,
    pub similarity_score: f64,
    pub common_strengths: Vec<String>,
}

#[async_trait]
pub trait CityRepository: Send + Sync {
    /// Page of matching rows plus the total match count over the same
    /// predicate.
    async fn search(&self, filters: &CityFilters) -> Result<(Vec<CityRow>, i64), AppError>;

    async fn get_by_id(&self, city_id: i32) -> Result<Option<CityDetailRow>, AppError>;

    /// All score rows for a city, ordered by category. Empty when none exist.
    async fn get_scores(&self, city_id: i32) -> Result<Vec<ScoreRow>, AppError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn get_reviews(
        &self,
        city_id: i32,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<ReviewRecord>, u64), AppError>;

    async fn create_review(
        &self,
        city_id: i32,
        input: &ReviewCreate,
    ) -> Result<ReviewRecord, AppError>;

    async fn get_average_rating(&self, city_id: i32) -> Result<Option<f64>, AppError>;
}

#[async_trait]
pub trait SimilarityRepository: Send + Sync {
    /// Up to `k` targets of outgoing SIMILAR_TO edges, strongest first.
    /// Empty for unknown nodes as well as for isolated ones.
    async fn get_similar_cities(
        &self,
        city_id: i32,
        k: i64,
    ) -> Result<Vec<SimilarCityRow>, AppError>;

    async fn get_city_strengths(&self, city_id: i32) -> Result<Vec<String>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_allows_listed_columns() {
        for col in ["overall_score", "population", "name", "department", "region"] {
            let filters = CityFilters {
                sort_by: col.to_string(),
                ..CityFilters::default()
            };
            assert_eq!(filters.sort_column(), col);
        }
    }

    #[test]
    fn test_sort_column_falls_back_on_disallowed() {
        let filters = CityFilters {
            sort_by: "id; DROP TABLE cities".to_string(),
            ..CityFilters::default()
        };
        assert_eq!(filters.sort_column(), DEFAULT_SORT);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("ASC"), None);
        assert_eq!(SortOrder::parse("sideways"), None);
    }

    #[test]
    fn test_offset_is_one_indexed() {
        let filters = CityFilters {
            page: 3,
            page_size: 20,
            ..CityFilters::default()
        };
        assert_eq!(filters.offset(), 40);

        let first = CityFilters::default();
        assert_eq!(first.offset(), 0);
    }
}
