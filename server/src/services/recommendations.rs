use shared::{City, RecommendationItem, RecommendationsResponse};

use super::city_from_detail;
use crate::{
    error::AppError,
    repository::{CityRepository, SimilarCityRow, SimilarityRepository},
};

pub struct RecommendationService<G, C> {
    similarity_repo: G,
    city_repo: C,
}

impl<G: SimilarityRepository, C: CityRepository> RecommendationService<G, C> {
    pub fn new(similarity_repo: G, city_repo: C) -> Self {
        Self {
            similarity_repo,
            city_repo,
        }
    }

    pub async fn get_recommendations(
        &self,
        city_id: i32,
        k: i64,
    ) -> Result<Option<RecommendationsResponse>, AppError> {
        // Sole existence gate: the graph is never consulted for an unknown
        // source city.
        let Some(source) = self.city_repo.get_by_id(city_id).await? else {
            return Ok(None);
        };

        let similar = self.similarity_repo.get_similar_cities(city_id, k).await?;

        let mut recommendations = Vec::with_capacity(similar.len());
        for row in similar {
            let city = self.resolve_city(&row).await?;
            recommendations.push(RecommendationItem {
                city,
                similarity_score: row.similarity_score,
                common_strengths: row.common_strengths,
            });
        }

        Ok(Some(RecommendationsResponse {
            source_city: source.name,
            recommendations,
        }))
    }

    /// The graph copy of the city attributes is a cache; the relational row
    /// wins whenever the target id resolves.
    async fn resolve_city(&self, row: &SimilarCityRow) -> Result<City, AppError> {
        if let Some(target_id) = row.city_id {
            if let Some(pg_row) = self.city_repo.get_by_id(target_id as i32).await? {
                return Ok(city_from_detail(&pg_row));
            }
        }

        Ok(City {
            id: row.city_id.unwrap_or_default() as i32,
            name: row.name.clone().unwrap_or_default(),
            department: row.department.clone().unwrap_or_default(),
            region: row.region.clone().unwrap_or_default(),
            population: row.population.unwrap_or_default() as i32,
            overall_score: row.overall_score.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::services::test_support::{detail_row, FakeCityRepo, FakeSimilarityRepo};

    fn similar_row(city_id: Option<i64>, score: f64) -> SimilarCityRow {
        SimilarCityRow {
            city_id,
            name: Some("stale graph name".to_string()),
            department: Some("stale".to_string()),
            region: Some("stale".to_string()),
            population: Some(1),
            overall_score: Some(1.0),
            similarity_score: score,
            common_strengths: vec!["transport".to_string()],
        }
    }

    #[tokio::test]
    async fn test_missing_source_skips_graph() {
        let similarity_repo = FakeSimilarityRepo::default();
        let similar_calls = similarity_repo.similar_calls.clone();
        let service = RecommendationService::new(similarity_repo, FakeCityRepo::default());

        let result = service.get_recommendations(404, 5).await.unwrap();

        assert!(result.is_none());
        assert_eq!(similar_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_relational_attributes_win_over_graph_copy() {
        let city_repo = FakeCityRepo {
            cities: [
                (1, detail_row(1, "Lyon", 7.5)),
                (2, detail_row(2, "Marseille", 6.8)),
            ]
            .into(),
            ..FakeCityRepo::default()
        };
        let similarity_repo = FakeSimilarityRepo {
            rows: vec![similar_row(Some(2), 0.85)],
            ..FakeSimilarityRepo::default()
        };
        let service = RecommendationService::new(similarity_repo, city_repo);

        let result = service.get_recommendations(1, 5).await.unwrap().unwrap();

        assert_eq!(result.source_city, "Lyon");
        assert_eq!(result.recommendations.len(), 1);
        let rec = &result.recommendations[0];
        assert_eq!(rec.city.name, "Marseille");
        assert_eq!(rec.similarity_score, 0.85);
        assert_eq!(rec.common_strengths, vec!["transport".to_string()]);
    }

    #[tokio::test]
    async fn test_unresolvable_target_falls_back_to_graph_copy() {
        let city_repo = FakeCityRepo {
            cities: [(1, detail_row(1, "Lyon", 7.5))].into(),
            ..FakeCityRepo::default()
        };
        let similarity_repo = FakeSimilarityRepo {
            rows: vec![similar_row(Some(99), 0.6)],
            ..FakeSimilarityRepo::default()
        };
        let service = RecommendationService::new(similarity_repo, city_repo);

        let result = service.get_recommendations(1, 5).await.unwrap().unwrap();

        let rec = &result.recommendations[0];
        assert_eq!(rec.city.id, 99);
        assert_eq!(rec.city.name, "stale graph name");
    }

    #[tokio::test]
    async fn test_target_without_id_gets_defaults() {
        let city_repo = FakeCityRepo {
            cities: [(1, detail_row(1, "Lyon", 7.5))].into(),
            ..FakeCityRepo::default()
        };
        let similarity_repo = FakeSimilarityRepo {
            rows: vec![SimilarCityRow {
                similarity_score: 0.7,
                ..SimilarCityRow::default()
            }],
            ..FakeSimilarityRepo::default()
        };
        let service = RecommendationService::new(similarity_repo, city_repo);

        let result = service.get_recommendations(1, 5).await.unwrap().unwrap();

        let rec = &result.recommendations[0];
        assert_eq!(rec.city.id, 0);
        assert_eq!(rec.city.name, "");
        assert_eq!(rec.city.population, 0);
    }

    #[tokio::test]
    async fn test_k_bounds_result_count() {
        let city_repo = FakeCityRepo {
            cities: [(1, detail_row(1, "Lyon", 7.5))].into(),
            ..FakeCityRepo::default()
        };
        let similarity_repo = FakeSimilarityRepo {
            rows: vec![
                similar_row(None, 0.9),
                similar_row(None, 0.8),
                similar_row(None, 0.7),
            ],
            ..FakeSimilarityRepo::default()
        };
        let service = RecommendationService::new(similarity_repo, city_repo);

        let result = service.get_recommendations(1, 2).await.unwrap().unwrap();

        assert_eq!(result.recommendations.len(), 2);
    }
}
