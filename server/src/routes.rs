use std::sync::Arc;

use axum::{
    extract::{Path, Query, State as AppState},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::{HealthResponse, ReviewCreate};

use crate::{
    error::AppError,
    graph::Neo4jSimilarityRepository,
    mongo::MongoReviewRepository,
    postgres::PostgresCityRepository,
    repository::{CityFilters, SortOrder, DEFAULT_SORT},
    services::{CityService, RecommendationService, ReviewService},
    state::State,
};

const MAX_CITY_PAGE_SIZE: i64 = 100;
const MAX_REVIEW_PAGE_SIZE: i64 = 50;
const MAX_RECOMMENDATIONS: i64 = 20;

#[derive(Deserialize)]
pub struct CitySearchParams {
    search: Option<String>,
    region: Option<String>,
    department: Option<String>,
    min_population: Option<i32>,
    sort_by: Option<String>,
    sort_order: Option<String>,
    page: Option<i64>,
    page_size: Option<i64>,
}

impl CitySearchParams {
    fn into_filters(self) -> Result<CityFilters, AppError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(20);
        validate_page(page)?;
        validate_page_size(page_size, MAX_CITY_PAGE_SIZE)?;

        if self.min_population.is_some_and(|p| p < 0) {
            return Err(AppError::InvalidParameter(
                "min_population must be >= 0".to_string(),
            ));
        }

        let sort_order = match self.sort_order.as_deref() {
            None => SortOrder::Desc,
            Some(raw) => SortOrder::parse(raw).ok_or_else(|| {
                AppError::InvalidParameter("sort_order must be asc or desc".to_string())
            })?,
        };

        // sort_by is normalized against the allow-list later, never rejected
        Ok(CityFilters {
            search: self.search,
            region: self.region,
            department: self.department,
            min_population: self.min_population,
            sort_by: self.sort_by.unwrap_or_else(|| DEFAULT_SORT.to_string()),
            sort_order,
            page,
            page_size,
        })
    }
}

#[derive(Deserialize)]
pub struct ReviewPageParams {
    page: Option<i64>,
    page_size: Option<i64>,
}

#[derive(Deserialize)]
pub struct RecommendationParams {
    city_id: i32,
    k: Option<i64>,
}

fn validate_page(page: i64) -> Result<(), AppError> {
    if page < 1 {
        return Err(AppError::InvalidParameter("page must be >= 1".to_string()));
    }
    Ok(())
}

fn validate_page_size(page_size: i64, max: i64) -> Result<(), AppError> {
    if !(1..=max).contains(&page_size) {
        return Err(AppError::InvalidParameter(format!(
            "page_size must be between 1 and {max}"
        )));
    }
    Ok(())
}

fn validate_k(k: i64) -> Result<(), AppError> {
    if !(1..=MAX_RECOMMENDATIONS).contains(&k) {
        return Err(AppError::InvalidParameter(format!(
            "k must be between 1 and {MAX_RECOMMENDATIONS}"
        )));
    }
    Ok(())
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn search_cities_handler(
    AppState(state): AppState<Arc<State>>,
    Query(params): Query<CitySearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let filters = params.into_filters()?;

    let service = CityService::new(PostgresCityRepository::new(state.pg_pool.clone()));
    let response = service.search_cities(&filters).await?;

    Ok(Json(response))
}

pub async fn city_detail_handler(
    AppState(state): AppState<Arc<State>>,
    Path(city_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let service = CityService::new(PostgresCityRepository::new(state.pg_pool.clone()));
    let detail = service
        .get_city_detail(city_id)
        .await?
        .ok_or(AppError::NotFound("city"))?;

    Ok(Json(detail))
}

pub async fn city_scores_handler(
    AppState(state): AppState<Arc<State>>,
    Path(city_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let service = CityService::new(PostgresCityRepository::new(state.pg_pool.clone()));
    let scores = service
        .get_city_scores(city_id)
        .await?
        .ok_or(AppError::NotFound("city"))?;

    Ok(Json(scores))
}

pub async fn get_reviews_handler(
    AppState(state): AppState<Arc<State>>,
    Path(city_id): Path<i32>,
    Query(params): Query<ReviewPageParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(10);
    validate_page(page)?;
    validate_page_size(page_size, MAX_REVIEW_PAGE_SIZE)?;

    let service = ReviewService::new(MongoReviewRepository::new(&state.mongo_db));
    let response = service.get_reviews(city_id, page, page_size).await?;

    Ok(Json(response))
}

pub async fn create_review_handler(
    AppState(state): AppState<Arc<State>>,
    Path(city_id): Path<i32>,
    Json(input): Json<ReviewCreate>,
) -> Result<impl IntoResponse, AppError> {
    input.validate().map_err(AppError::InvalidParameter)?;

    let service = ReviewService::new(MongoReviewRepository::new(&state.mongo_db));
    let review = service.create_review(city_id, &input).await?;

    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn recommendations_handler(
    AppState(state): AppState<Arc<State>>,
    Query(params): Query<RecommendationParams>,
) -> Result<impl IntoResponse, AppError> {
    let k = params.k.unwrap_or(5);
    validate_k(k)?;

    let service = RecommendationService::new(
        Neo4jSimilarityRepository::new(state.graph.clone()),
        PostgresCityRepository::new(state.pg_pool.clone()),
    );
    let response = service
        .get_recommendations(params.city_id, k)
        .await?
        .ok_or(AppError::NotFound("city"))?;

    Ok(Json(response))
}
