//! # Neo4j
//!
//! Graph store for similarity recommendations. Holds a derived copy of the
//! city attributes plus the STRONG_IN / SIMILAR_TO edges computed at seed
//! time; it is never written on the request path.
//!
//! Common strengths are recomputed live from STRONG_IN at query time, not
//! read off the similarity edge.

use async_trait::async_trait;
use neo4rs::{query, Graph};

use crate::{
    error::AppError,
    repository::{SimilarCityRow, SimilarityRepository},
};

pub async fn init_neo4j(uri: &str, user: &str, password: &str) -> Graph {
    Graph::new(uri, user, password)
        .await
        .expect("Neo4j misconfigured!")
}

pub struct Neo4jSimilarityRepository {
    graph: Graph,
}

impl Neo4jSimilarityRepository {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl SimilarityRepository for Neo4jSimilarityRepository {
    async fn get_similar_cities(
        &self,
        city_id: i32,
        k: i64,
    ) -> Result<Vec<SimilarCityRow>, AppError> {
        // A missing start node matches nothing, so unknown cities yield an
        // empty result rather than an error.
        let q = query(
            "MATCH (source:City {city_id: $city_id})-[r:SIMILAR_TO]->(target:City)
             OPTIONAL MATCH (source)-[:STRONG_IN]->(c:Criterion)<-[:STRONG_IN]-(target)
             WITH target, r.score AS similarity_score,
                  collect(DISTINCT c.name) AS common_strengths
             RETURN target.city_id AS city_id, target.name AS name,
                    target.department AS department, target.region AS region,
                    target.population AS population,
                    target.overall_score AS overall_score,
                    similarity_score, common_strengths
             ORDER BY similarity_score DESC
             LIMIT $k",
        )
        .param("city_id", city_id as i64)
        .param("k", k);

        let mut stream = self.graph.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(SimilarCityRow {
                city_id: row.get::<i64>("city_id").ok(),
                name: row.get::<String>("name").ok(),
                department: row.get::<String>("department").ok(),
                region: row.get::<String>("region").ok(),
                population: row.get::<i64>("population").ok(),
                overall_score: row.get::<f64>("overall_score").ok(),
                similarity_score: row.get::<f64>("similarity_score").unwrap_or_default(),
                common_strengths: row.get::<Vec<String>>("common_strengths").unwrap_or_default(),
            });
        }

        Ok(rows)
    }

    async fn get_city_strengths(&self, city_id: i32) -> Result<Vec<String>, AppError> {
        let q = query(
            "MATCH (c:City {city_id: $city_id})-[:STRONG_IN]->(cr:Criterion)
             RETURN cr.name AS name",
        )
        .param("city_id", city_id as i64);

        let mut stream = self.graph.execute(q).await?;
        let mut names = Vec::new();
        while let Some(row) = stream.next().await? {
            names.push(row.get::<String>("name").unwrap_or_default());
        }

        Ok(names)
    }
}
