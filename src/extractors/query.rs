use crate::{error, Error};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query string extractor that also runs validation.
pub struct Query<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let query = match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(value) => value.0,
            Err(rejection) => {
                return Err(error::QUERY_INVALID.with_message(rejection.body_text()))
            }
        };

        query
            .validate()
            .map_err(|err| error::QUERY_INVALID.with_message(err.to_string()))?;

        Ok(Self(query))
    }
}
