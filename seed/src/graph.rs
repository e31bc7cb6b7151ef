//! Graph load: wipes the graph, recreates Criterion and City nodes, then
//! derives the STRONG_IN and SIMILAR_TO relationships from the scores
//! dataset.
//!
//! The similarity weights are computed in-process over the per-city strength
//! sets, one pass per unordered pair, and written as one edge per direction.

use std::collections::{BTreeMap, BTreeSet};

use neo4rs::{query, Graph};

use crate::{
    datasets::{CityRecord, ScoreRecord},
    progress_bar,
};

/// A score at or above this marks the city as strong in that criterion.
pub const STRONG_THRESHOLD: f64 = 7.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityEdge {
    pub source: i64,
    pub target: i64,
    pub score: f64,
}

pub fn is_strong(score: f64) -> bool {
    score >= STRONG_THRESHOLD
}

/// Strong criteria per city, keyed by city id.
pub fn strength_sets(scores: &[ScoreRecord]) -> BTreeMap<i32, BTreeSet<String>> {
    let mut sets: BTreeMap<i32, BTreeSet<String>> = BTreeMap::new();

    for score in scores.iter().filter(|record| is_strong(record.score)) {
        sets.entry(score.city_id)
            .or_default()
            .insert(score.criterion().to_string());
    }

    sets
}

/// Directed SIMILAR_TO edges for every unordered pair of cities sharing at
/// least one strong criterion, emitted in both directions.
/// Weight is `0.5 + 0.1 × shared_count`, uncapped.
pub fn similarity_edges(strengths: &BTreeMap<i32, BTreeSet<String>>) -> Vec<SimilarityEdge> {
    let entries: Vec<_> = strengths.iter().collect();
    let mut edges = Vec::new();

    for (i, (a, a_set)) in entries.iter().enumerate() {
        for (b, b_set) in entries.iter().skip(i + 1) {
            let shared = a_set.intersection(b_set).count();
            if shared == 0 {
                continue;
            }

            let score = 0.5 + 0.1 * shared as f64;
            edges.push(SimilarityEdge {
                source: **a as i64,
                target: **b as i64,
                score,
            });
            edges.push(SimilarityEdge {
                source: **b as i64,
                target: **a as i64,
                score,
            });
        }
    }

    edges
}

pub async fn seed_graph(graph: &Graph, cities: &[CityRecord], scores: &[ScoreRecord]) {
    // Full replace
    graph
        .run(query("MATCH (n) DETACH DELETE n"))
        .await
        .expect("Failed to clear graph");

    let criteria: Vec<String> = scores
        .iter()
        .map(|score| score.criterion().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    graph
        .run(query("UNWIND $names AS name MERGE (c:Criterion {name: name})").param("names", criteria))
        .await
        .expect("Failed to create criteria");

    let strong: Vec<&ScoreRecord> = scores.iter().filter(|s| is_strong(s.score)).collect();
    let edges = similarity_edges(&strength_sets(scores));

    let pb = progress_bar((cities.len() + strong.len() + edges.len()) as u64);
    pb.set_message("Neo4j");

    for city in cities {
        graph
            .run(
                query(
                    "MERGE (c:City {city_id: $city_id})
                     SET c.name = $name, c.department = $department, c.region = $region,
                         c.population = $population, c.overall_score = $overall_score",
                )
                .param("city_id", city.id as i64)
                .param("name", city.name.as_str())
                .param("department", city.department.as_str())
                .param("region", city.region.as_str())
                .param("population", city.population as i64)
                .param("overall_score", city.overall_score.unwrap_or(0.0)),
            )
            .await
            .unwrap();

        pb.inc(1);
    }

    for score in &strong {
        graph
            .run(
                query(
                    "MATCH (city:City {city_id: $city_id})
                     MATCH (cr:Criterion {name: $name})
                     MERGE (city)-[:STRONG_IN]->(cr)",
                )
                .param("city_id", score.city_id as i64)
                .param("name", score.criterion()),
            )
            .await
            .unwrap();

        pb.inc(1);
    }

    for edge in &edges {
        graph
            .run(
                query(
                    "MATCH (a:City {city_id: $source}), (b:City {city_id: $target})
                     CREATE (a)-[:SIMILAR_TO {score: $score}]->(b)",
                )
                .param("source", edge.source)
                .param("target", edge.target)
                .param("score", edge.score),
            )
            .await
            .unwrap();

        pb.inc(1);
    }

    pb.finish_with_message("Neo4j seeded");
}
