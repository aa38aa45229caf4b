use crate::db::Storage;
use crate::errors::{AppError, ErrorType};
use crate::registry::Registry;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::Method;
use warp::Filter;

pub fn with_storage(
    storage: Storage,
) -> impl Filter<Extract = (Storage,), Error = Infallible> + Clone {
    warp::any().map(move || storage.clone())
}

pub fn with_registry(
    registry: Arc<Registry>,
) -> impl Filter<Extract = (Arc<Registry>,), Error = Infallible> + Clone {
    warp::any().map(move || registry.clone())
}

/// Shared-secret guard. The `Authorization` header must equal the configured
/// secret byte-for-byte; no scheme prefix, no identity. Missing or mismatched
/// header rejects with 401 before the handler runs.
pub fn with_auth(expected: String) -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and_then(move |header: Option<String>| {
            let expected = expected.clone();
            async move {
                match header {
                    Some(token) if token == expected => Ok(()),
                    _ => Err(warp::reject::custom(AppError::new(
                        "Unauthorized",
                        ErrorType::AuthError,
                    ))),
                }
            }
        })
        .untuple_one()
}

pub fn with_json_body<T: DeserializeOwned + Send>(
) -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(1024 * 16).and(warp::body::json())
}

pub fn cors() -> warp::filters::cors::Cors {
    warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Content-Type", "Authorization"])
        .allow_methods(&[Method::GET, Method::POST, Method::PUT])
        .build()
}
