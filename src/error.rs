use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("catalog request failed: {0}")]
    Catalog(#[from] reqwest::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<jiff::Error> for AppError {
    fn from(err: jiff::Error) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound(_) => {
                (StatusCode::NOT_FOUND, crate::templates::not_found_page())
            },
            AppError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, crate::templates::error_page(self.to_string()))
            },
            _ => {
                tracing::error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, crate::templates::error_page(self.to_string()))
            },
        };
        (status, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
