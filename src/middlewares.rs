use crate::{error, Error, StateTrait};
use axum::{error_handling::HandleErrorLayer, BoxError, Router};
use std::time::Duration;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
    ServiceBuilderExt,
};

pub fn middlewares<S: StateTrait>(state: S, router: Router<S>, request_timeout: Duration) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let middlewares = ServiceBuilder::new()
        .catch_panic()
        .set_x_request_id(tower_http::request_id::MakeRequestUuid)
        .propagate_x_request_id()
        .layer(TraceLayer::new_for_http())
        .layer(HandleErrorLayer::new(handle_error))
        .timeout(request_timeout)
        .compression()
        .decompression()
        .layer(cors_layer)
        .into_inner();

    router.layer(middlewares).with_state(state)
}

async fn handle_error(err: BoxError) -> Error {
    if err.is::<Elapsed>() {
        warn!("request timed out");
        return error::REQUEST_TIMEOUT;
    }

    Error::internal(err)
}
