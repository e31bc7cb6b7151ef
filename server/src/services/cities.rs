use shared::{CityDetail, CityListResponse, CityScores};

use super::{city_from_row, score_from_row};
use crate::{
    error::AppError,
    repository::{CityFilters, CityRepository},
};

pub struct CityService<R> {
    repo: R,
}

impl<R: CityRepository> CityService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn search_cities(&self, filters: &CityFilters) -> Result<CityListResponse, AppError> {
        let (rows, total) = self.repo.search(filters).await?;

        Ok(CityListResponse {
            cities: rows.into_iter().map(city_from_row).collect(),
            total,
            page: filters.page,
            page_size: filters.page_size,
        })
    }

    pub async fn get_city_detail(&self, city_id: i32) -> Result<Option<CityDetail>, AppError> {
        let Some(row) = self.repo.get_by_id(city_id).await? else {
            return Ok(None);
        };

        let scores = self.repo.get_scores(city_id).await?;

        Ok(Some(CityDetail {
            id: row.id,
            name: row.name,
            department: row.department.unwrap_or_default(),
            region: row.region.unwrap_or_default(),
            population: row.population.unwrap_or_default(),
            overall_score: row.overall_score.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            latitude: row.latitude.unwrap_or_default(),
            longitude: row.longitude.unwrap_or_default(),
            scores: scores.into_iter().map(score_from_row).collect(),
        }))
    }

    pub async fn get_city_scores(&self, city_id: i32) -> Result<Option<CityScores>, AppError> {
        let Some(row) = self.repo.get_by_id(city_id).await? else {
            return Ok(None);
        };

        let scores = self.repo.get_scores(city_id).await?;

        Ok(Some(CityScores {
            city_id,
            scores: scores.into_iter().map(score_from_row).collect(),
            // stored aggregate, not recomputed from the score rows
            overall: row.overall_score.unwrap_or_default(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::repository::{CityRow, ScoreRow};
    use crate::services::test_support::{detail_row, FakeCityRepo};

    fn score_row(category: &str, score: f64) -> ScoreRow {
        ScoreRow {
            category: category.to_string(),
            label: Some(category.to_string()),
            score,
        }
    }

    #[tokio::test]
    async fn test_search_wraps_rows_and_total() {
        let repo = FakeCityRepo {
            search_rows: vec![CityRow {
                id: 1,
                name: "Lyon".to_string(),
                department: Some("Rhône".to_string()),
                region: Some("Auvergne-Rhône-Alpes".to_string()),
                population: Some(516_092),
                overall_score: Some(7.5),
            }],
            search_total: 42,
            ..FakeCityRepo::default()
        };
        let service = CityService::new(repo);

        let filters = CityFilters {
            page: 2,
            page_size: 10,
            ..CityFilters::default()
        };
        let result = service.search_cities(&filters).await.unwrap();

        assert_eq!(result.cities.len(), 1);
        assert_eq!(result.cities[0].name, "Lyon");
        assert_eq!(result.total, 42);
        assert_eq!(result.page, 2);
        assert_eq!(result.page_size, 10);
    }

    #[tokio::test]
    async fn test_search_defaults_nullable_columns() {
        let repo = FakeCityRepo {
            search_rows: vec![CityRow {
                id: 9,
                name: "Trouville".to_string(),
                department: None,
                region: None,
                population: None,
                overall_score: None,
            }],
            search_total: 1,
            ..FakeCityRepo::default()
        };
        let service = CityService::new(repo);

        let result = service.search_cities(&CityFilters::default()).await.unwrap();

        assert_eq!(result.cities[0].department, "");
        assert_eq!(result.cities[0].population, 0);
        assert_eq!(result.cities[0].overall_score, 0.0);
    }

    #[tokio::test]
    async fn test_detail_combines_city_and_scores() {
        let repo = FakeCityRepo {
            cities: [(1, detail_row(1, "Lyon", 7.5))].into(),
            scores: vec![score_row("culture", 8.0), score_row("transport", 7.2)],
            ..FakeCityRepo::default()
        };
        let service = CityService::new(repo);

        let detail = service.get_city_detail(1).await.unwrap().unwrap();

        assert_eq!(detail.name, "Lyon");
        assert_eq!(detail.scores.len(), 2);
        assert_eq!(detail.scores[0].category, "culture");
    }

    #[tokio::test]
    async fn test_detail_short_circuits_on_missing_city() {
        let repo = FakeCityRepo::default();
        let score_calls = repo.score_calls.clone();
        let service = CityService::new(repo);

        let detail = service.get_city_detail(404).await.unwrap();

        assert!(detail.is_none());
        assert_eq!(score_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_scores_uses_stored_overall() {
        // stored overall deliberately disagrees with the per-category rows
        let repo = FakeCityRepo {
            cities: [(1, detail_row(1, "Lyon", 9.9))].into(),
            scores: vec![score_row("culture", 1.0)],
            ..FakeCityRepo::default()
        };
        let service = CityService::new(repo);

        let scores = service.get_city_scores(1).await.unwrap().unwrap();

        assert_eq!(scores.overall, 9.9);
        assert_eq!(scores.city_id, 1);
    }

    #[tokio::test]
    async fn test_scores_short_circuits_on_missing_city() {
        let repo = FakeCityRepo::default();
        let score_calls = repo.score_calls.clone();
        let service = CityService::new(repo);

        let scores = service.get_city_scores(404).await.unwrap();

        assert!(scores.is_none());
        assert_eq!(score_calls.load(Ordering::SeqCst), 0);
    }
}
