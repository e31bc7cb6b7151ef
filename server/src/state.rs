use std::sync::Arc;

use mongodb::Database;
use neo4rs::Graph;
use sqlx::PgPool;

use super::{
    config::Config, graph::init_neo4j, mongo::init_mongo, postgres::init_postgres,
};

/// Application-lifecycle context: one long-lived handle per store,
/// constructed once at startup and handed to request-scoped repositories.
pub struct State {
    pub config: Config,
    pub pg_pool: PgPool,
    pub mongo_db: Database,
    pub graph: Graph,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let pg_pool = init_postgres(&config.postgres_url).await;
        let mongo_db = init_mongo(&config.mongo_url, &config.mongo_db).await;
        let graph = init_neo4j(
            &config.neo4j_uri,
            &config.neo4j_user,
            &config.neo4j_password,
        )
        .await;

        Arc::new(Self {
            config,
            pg_pool,
            mongo_db,
            graph,
        })
    }
}
