//! Request extractors
//!
//! Both matching endpoints accept the user's image either as a `userInput`
//! query parameter (GET) or as a JSON body `{ "userInput": "..." }` (POST).

use axum::{
    Json,
    extract::{FromRequest, Query, Request},
    http::Method,
};
use serde::Deserialize;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInputParams {
    pub user_input: Option<String>,
}

impl UserInputParams {
    pub fn into_input(self) -> AppResult<String> {
        self.user_input
            .ok_or_else(|| AppError::validation("Missing required parameter: userInput"))
    }
}

/// The raw `userInput` value, from the query string or the JSON body
#[derive(Debug, Clone)]
pub struct UserInput(pub String);

impl<S> FromRequest<S> for UserInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let params = if req.method() == Method::POST {
            let Json(params) = Json::<UserInputParams>::from_request(req, state)
                .await
                .map_err(|e| AppError::validation(e.body_text()))?;
            params
        } else {
            let Query(params) = Query::<UserInputParams>::try_from_uri(req.uri())
                .map_err(|e| AppError::validation(e.body_text()))?;
            params
        };

        params.into_input().map(UserInput)
    }
}
