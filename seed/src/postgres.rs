//! Relational load: creates the schema when missing, then replaces the
//! contents of `cities` and `scores` wholesale.

use sqlx::PgPool;

use crate::{
    datasets::{CityRecord, ScoreRecord},
    progress_bar,
};

const CREATE_CITIES: &str = "CREATE TABLE IF NOT EXISTS cities (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    department TEXT,
    region TEXT,
    population INTEGER DEFAULT 0,
    description TEXT,
    latitude DOUBLE PRECISION,
    longitude DOUBLE PRECISION,
    overall_score DOUBLE PRECISION DEFAULT 0
)";

const CREATE_SCORES: &str = "CREATE TABLE IF NOT EXISTS scores (
    city_id INTEGER NOT NULL,
    category TEXT NOT NULL,
    label TEXT,
    score DOUBLE PRECISION NOT NULL
)";

pub async fn seed_postgres(pool: &PgPool, cities: &[CityRecord], scores: &[ScoreRecord]) {
    sqlx::query(CREATE_CITIES)
        .execute(pool)
        .await
        .expect("Failed to create cities table");
    sqlx::query(CREATE_SCORES)
        .execute(pool)
        .await
        .expect("Failed to create scores table");

    // Full replace
    sqlx::query("DELETE FROM scores").execute(pool).await.unwrap();
    sqlx::query("DELETE FROM cities").execute(pool).await.unwrap();

    let pb = progress_bar((cities.len() + scores.len()) as u64);
    pb.set_message("PostgreSQL");

    for city in cities {
        sqlx::query(
            "INSERT INTO cities \
             (id, name, department, region, population, description, \
              latitude, longitude, overall_score) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(city.id)
        .bind(&city.name)
        .bind(&city.department)
        .bind(&city.region)
        .bind(city.population)
        .bind(&city.description)
        .bind(city.latitude)
        .bind(city.longitude)
        .bind(city.overall_score.unwrap_or(0.0))
        .execute(pool)
        .await
        .unwrap();

        pb.inc(1);
    }

    for score in scores {
        sqlx::query(
            "INSERT INTO scores (city_id, category, label, score) VALUES ($1, $2, $3, $4)",
        )
        .bind(score.city_id)
        .bind(&score.category)
        .bind(&score.label)
        .bind(score.score)
        .execute(pool)
        .await
        .unwrap();

        pb.inc(1);
    }

    pb.finish_with_message("PostgreSQL seeded");
}
