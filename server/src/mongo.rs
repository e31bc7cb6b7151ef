//! # MongoDB
//!
//! Document store holding free-form user reviews. Reviews reference cities by
//! a loose `city_id` field only; nothing enforces that the city exists.
//!
//! `create_review` is the single mutating operation of the whole API: one
//! insert, no transactional coupling to the other stores.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime},
    Client, Collection, Database,
};
use serde::{Deserialize, Serialize};
use shared::ReviewCreate;

use crate::{
    error::AppError,
    repository::{ReviewRecord, ReviewRepository},
};

pub const REVIEWS_COLLECTION: &str = "reviews";

pub async fn init_mongo(mongo_url: &str, mongo_db: &str) -> Database {
    let client = Client::with_uri_str(mongo_url)
        .await
        .expect("MongoDB misconfigured!");

    client.database(mongo_db)
}

/// Stored document shape. `created_at` is a real BSON datetime, never a
/// string.
#[derive(Debug, Serialize, Deserialize)]
struct ReviewDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    city_id: i32,
    #[serde(default)]
    author: String,
    rating: i32,
    #[serde(default)]
    comment: String,
    #[serde(default)]
    tags: Vec<String>,
    created_at: DateTime,
}

impl ReviewDoc {
    fn into_record(self) -> ReviewRecord {
        ReviewRecord {
            id: self.id.map(|id| id.to_hex()).unwrap_or_default(),
            city_id: self.city_id,
            author: self.author,
            rating: self.rating,
            comment: self.comment,
            tags: self.tags,
            created_at: self.created_at.to_chrono(),
        }
    }
}

pub struct MongoReviewRepository {
    collection: Collection<ReviewDoc>,
}

impl MongoReviewRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(REVIEWS_COLLECTION),
        }
    }
}

#[async_trait]
impl ReviewRepository for MongoReviewRepository {
    async fn get_reviews(
        &self,
        city_id: i32,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<ReviewRecord>, u64), AppError> {
        let filter = doc! { "city_id": city_id };

        // Total over the filter, independent of the page window
        let total = self.collection.count_documents(filter.clone()).await?;

        let skip = ((page - 1) * page_size) as u64;
        let mut cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(page_size)
            .await?;

        let mut records = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            records.push(doc.into_record());
        }

        Ok((records, total))
    }

    async fn create_review(
        &self,
        city_id: i32,
        input: &ReviewCreate,
    ) -> Result<ReviewRecord, AppError> {
        let mut doc = ReviewDoc {
            id: None,
            city_id,
            author: input.author.clone(),
            rating: input.rating,
            comment: input.comment.clone(),
            tags: input.tags.clone(),
            created_at: DateTime::now(),
        };

        let inserted = self.collection.insert_one(&doc).await?;
        doc.id = inserted.inserted_id.as_object_id();

        Ok(doc.into_record())
    }

    async fn get_average_rating(&self, city_id: i32) -> Result<Option<f64>, AppError> {
        let pipeline = vec![
            doc! { "$match": { "city_id": city_id } },
            doc! { "$group": { "_id": null, "avg_rating": { "$avg": "$rating" } } },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await?;
        match cursor.try_next().await? {
            Some(result) => {
                let avg = result.get_f64("avg_rating").unwrap_or_default();
                Ok(Some(round_to_tenth(avg)))
            }
            None => Ok(None),
        }
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
