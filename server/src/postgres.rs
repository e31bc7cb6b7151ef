//! # PostgreSQL
//!
//! Relational store. Source of truth for cities and their per-category
//! scores; the graph keeps only a derived copy of the city attributes.
//!
//! ## Schema
//! - `cities`: id (PK), name, department, region, population, description,
//!   latitude, longitude, overall_score
//! - `scores`: city_id, category, label, score
//!
//! Filtered search is assembled with `QueryBuilder` so every user value goes
//! through a bind parameter. The sort column never comes from user input
//! directly; it is normalized against the allow-list first.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppError,
    repository::{CityDetailRow, CityFilters, CityRepository, CityRow, ScoreRow},
};

pub async fn init_postgres(postgres_url: &str) -> PgPool {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(postgres_url)
        .await
        .expect("PostgreSQL misconfigured!")
}

pub struct PostgresCityRepository {
    pool: PgPool,
}

impl PostgresCityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &CityFilters) {
    let mut prefix = " WHERE ";

    if let Some(search) = &filters.search {
        builder.push(prefix);
        builder.push("name ILIKE ");
        builder.push_bind(format!("%{search}%"));
        prefix = " AND ";
    }
    if let Some(region) = &filters.region {
        builder.push(prefix);
        builder.push("region = ");
        builder.push_bind(region.clone());
        prefix = " AND ";
    }
    if let Some(department) = &filters.department {
        builder.push(prefix);
        builder.push("department = ");
        builder.push_bind(department.clone());
        prefix = " AND ";
    }
    if let Some(min_population) = filters.min_population {
        builder.push(prefix);
        builder.push("population >= ");
        builder.push_bind(min_population);
    }
}

fn build_count_query(filters: &CityFilters) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM cities");
    push_filters(&mut builder, filters);
    builder
}

fn build_search_query(filters: &CityFilters) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT id, name, department, region, population, overall_score FROM cities",
    );
    push_filters(&mut builder, filters);

    builder
        .push(" ORDER BY ")
        .push(filters.sort_column())
        .push(" ")
        .push(filters.sort_order.as_sql());
    builder
        .push(" LIMIT ")
        .push_bind(filters.page_size)
        .push(" OFFSET ")
        .push_bind(filters.offset());

    builder
}

#[async_trait]
impl CityRepository for PostgresCityRepository {
    async fn search(&self, filters: &CityFilters) -> Result<(Vec<CityRow>, i64), AppError> {
        let mut count_query = build_count_query(filters);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut search_query = build_search_query(filters);
        let rows = search_query
            .build_query_as::<CityRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn get_by_id(&self, city_id: i32) -> Result<Option<CityDetailRow>, AppError> {
        let row = sqlx::query_as::<_, CityDetailRow>(
            "SELECT id, name, department, region, population, description, \
             latitude, longitude, overall_score \
             FROM cities WHERE id = $1",
        )
        .bind(city_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_scores(&self, city_id: i32) -> Result<Vec<ScoreRow>, AppError> {
        let rows = sqlx::query_as::<_, ScoreRow>(
            "SELECT category, label, score FROM scores WHERE city_id = $1 ORDER BY category",
        )
        .bind(city_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::SortOrder;

    #[test]
    fn test_no_filters_means_no_where_clause() {
        let filters = CityFilters::default();
        let builder = build_count_query(&filters);

        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM cities");
    }

    #[test]
    fn test_all_filters_bind_in_order() {
        let filters = CityFilters {
            search: Some("ly".to_string()),
            region: Some("Auvergne-Rhône-Alpes".to_string()),
            department: Some("Rhône".to_string()),
            min_population: Some(100_000),
            ..CityFilters::default()
        };
        let builder = build_count_query(&filters);

        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM cities WHERE name ILIKE $1 AND region = $2 \
             AND department = $3 AND population >= $4"
        );
    }

    #[test]
    fn test_search_query_orders_and_paginates() {
        let filters = CityFilters {
            sort_by: "population".to_string(),
            sort_order: SortOrder::Asc,
            page: 2,
            page_size: 10,
            ..CityFilters::default()
        };
        let builder = build_search_query(&filters);

        assert_eq!(
            builder.sql(),
            "SELECT id, name, department, region, population, overall_score FROM cities \
             ORDER BY population ASC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_disallowed_sort_column_falls_back() {
        let filters = CityFilters {
            sort_by: "latitude".to_string(),
            ..CityFilters::default()
        };
        let builder = build_search_query(&filters);

        assert!(builder.sql().contains("ORDER BY overall_score DESC"));
    }
}
