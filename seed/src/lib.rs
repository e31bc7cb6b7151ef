//! # Seeding Pipeline
//!
//! Offline batch path: dataset files → stores, bypassing the API.
//!
//! Each per-store loader has full-replace semantics: it clears its target
//! before reloading, so rerunning the pipeline against the same datasets
//! leaves every count unchanged. There is no cross-store rollback; a failure
//! partway through leaves the stores already loaded as they are.
//!
//! Load order is relational → document → graph. The graph load derives the
//! STRONG_IN and SIMILAR_TO relationships from the same scores dataset the
//! relational store receives.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use smartcity::{
    config::Config,
    graph::init_neo4j,
    mongo::init_mongo,
    postgres::init_postgres,
};

pub mod datasets;
pub mod graph;
pub mod mongo;
pub mod postgres;

use datasets::{read_cities, read_reviews, read_scores};

pub async fn run(datasets_dir: &Path) {
    let config = Config::load();

    let cities = read_cities(&datasets_dir.join("cities.csv"));
    let scores = read_scores(&datasets_dir.join("scores.csv"));
    let reviews = read_reviews(&datasets_dir.join("reviews.jsonl"));

    println!("Loaded Cities: {}", cities.len());
    println!("Loaded Scores: {}", scores.len());
    println!("Loaded Reviews: {}\n", reviews.len());

    let pool = init_postgres(&config.postgres_url).await;
    postgres::seed_postgres(&pool, &cities, &scores).await;

    let db = init_mongo(&config.mongo_url, &config.mongo_db).await;
    mongo::seed_mongo(&db, &reviews).await;

    let neo4j = init_neo4j(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
    )
    .await;
    graph::seed_graph(&neo4j, &cities, &scores).await;

    println!("\nSeed complete.");
}

pub(crate) fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap()
        .progress_chars("=> "),
    );

    pb
}
