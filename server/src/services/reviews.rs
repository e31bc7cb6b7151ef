use shared::{Review, ReviewCreate, ReviewsResponse};

use super::review_from_record;
use crate::{error::AppError, repository::ReviewRepository};

pub struct ReviewService<R> {
    repo: R,
}

impl<R: ReviewRepository> ReviewService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn get_reviews(
        &self,
        city_id: i32,
        page: i64,
        page_size: i64,
    ) -> Result<ReviewsResponse, AppError> {
        let (records, total) = self.repo.get_reviews(city_id, page, page_size).await?;

        Ok(ReviewsResponse {
            reviews: records.into_iter().map(review_from_record).collect(),
            total,
        })
    }

    pub async fn create_review(
        &self,
        city_id: i32,
        input: &ReviewCreate,
    ) -> Result<Review, AppError> {
        let record = self.repo.create_review(city_id, input).await?;

        Ok(review_from_record(record))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::repository::ReviewRecord;
    use crate::services::test_support::FakeReviewRepo;

    #[tokio::test]
    async fn test_get_reviews_maps_records() {
        let repo = FakeReviewRepo {
            records: vec![ReviewRecord {
                id: "66f2a40c9d1e8b0001a3c001".to_string(),
                city_id: 1,
                author: "Marie D.".to_string(),
                rating: 4,
                comment: "Très agréable à vivre.".to_string(),
                tags: vec!["transport".to_string(), "culture".to_string()],
                created_at: Utc::now(),
            }],
            total: 7,
        };
        let service = ReviewService::new(repo);

        let result = service.get_reviews(1, 1, 10).await.unwrap();

        assert_eq!(result.total, 7);
        assert_eq!(result.reviews.len(), 1);
        assert_eq!(result.reviews[0].author, "Marie D.");
        assert_eq!(result.reviews[0].tags.len(), 2);
        assert!(result.reviews[0].created_at.is_some());
    }

    #[tokio::test]
    async fn test_create_review_stamps_path_city_id() {
        let service = ReviewService::new(FakeReviewRepo::default());

        let input = ReviewCreate {
            author: "Anonymous".to_string(),
            rating: 5,
            comment: String::new(),
            tags: Vec::new(),
        };
        let review = service.create_review(3, &input).await.unwrap();

        assert_eq!(review.city_id, 3);
        assert!(!review.id.is_empty());
        assert!(review.created_at.is_some());
    }
}
