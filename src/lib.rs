#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;
mod extractors;
mod handlers;
mod middlewares;
pub mod models;
pub mod review;
mod state;
pub mod store;
mod utils;

use crate::{middlewares::middlewares, utils::SignalHandler};
use error::{Error, Result};
use extractors::*;
pub use state::*;
use std::time::Duration;
use tokio::net::TcpListener;
pub use utils::panic;

pub async fn run<S: StateTrait>(
    listener: TcpListener,
    state: S,
    request_timeout: Duration,
) -> anyhow::Result<()> {
    info!("listening on {}", listener.local_addr()?);

    let routes = handlers::routes::<S>();
    let app = middlewares(state, routes, request_timeout);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(SignalHandler::new())
        .await?;

    info!("server stopped");

    Ok(())
}
