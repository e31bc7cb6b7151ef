//! Orchestration layer. Each service composes one or two repositories and
//! owns the conversion from raw rows into the `shared` contract types.

pub mod cities;
pub mod recommendations;
pub mod reviews;

pub use cities::CityService;
pub use recommendations::RecommendationService;
pub use reviews::ReviewService;

use shared::{City, Review, ScoreCategory};

use crate::repository::{CityDetailRow, CityRow, ReviewRecord, ScoreRow};

fn city_from_row(row: CityRow) -> City {
    City {
        id: row.id,
        name: row.name,
        department: row.department.unwrap_or_default(),
        region: row.region.unwrap_or_default(),
        population: row.population.unwrap_or_default(),
        overall_score: row.overall_score.unwrap_or_default(),
    }
}

fn city_from_detail(row: &CityDetailRow) -> City {
    City {
        id: row.id,
        name: row.name.clone(),
        department: row.department.clone().unwrap_or_default(),
        region: row.region.clone().unwrap_or_default(),
        population: row.population.unwrap_or_default(),
        overall_score: row.overall_score.unwrap_or_default(),
    }
}

fn score_from_row(row: ScoreRow) -> ScoreCategory {
    ScoreCategory {
        category: row.category,
        label: row.label.unwrap_or_default(),
        score: row.score,
    }
}

fn review_from_record(record: ReviewRecord) -> Review {
    Review {
        id: record.id,
        city_id: record.city_id,
        author: record.author,
        rating: record.rating,
        comment: record.comment,
        tags: record.tags,
        created_at: Some(record.created_at),
    }
}
