use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Relational store error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("Document store error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Graph store error: {0}")]
    Graph(#[from] neo4rs::Error),

    #[error("Not implemented")]
    NotImplemented,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            AppError::Postgres { .. } | AppError::Mongo { .. } | AppError::Graph { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
