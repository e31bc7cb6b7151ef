//! Document load: clears the reviews collection and inserts every JSONL
//! line with a real BSON timestamp.

use chrono::{DateTime, Utc};
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    Database,
};
use smartcity::mongo::REVIEWS_COLLECTION;

use crate::{datasets::ReviewRecord, progress_bar};

pub async fn seed_mongo(db: &Database, reviews: &[ReviewRecord]) {
    let collection = db.collection::<mongodb::bson::Document>(REVIEWS_COLLECTION);

    collection
        .delete_many(doc! {})
        .await
        .expect("Failed to clear reviews");

    let pb = progress_bar(reviews.len() as u64);
    pb.set_message("MongoDB");

    for review in reviews {
        let created_at = review
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);

        let document = doc! {
            "city_id": review.city_id,
            "author": review.author.as_str(),
            "rating": review.rating,
            "comment": review.comment.as_str(),
            "tags": review.tags.clone(),
            "created_at": BsonDateTime::from_chrono(created_at),
        };

        collection.insert_one(document).await.unwrap();
        pb.inc(1);
    }

    pb.finish_with_message("MongoDB seeded");
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
