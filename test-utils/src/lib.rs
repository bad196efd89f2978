pub mod macros;
pub mod prelude;
mod request;
mod response;
mod team;

use dotenvy::dotenv;
pub use macros::macro_support;
use request::*;
use reqwest::Client;
use reviewer_backend::{store::MemoryStore, State};
use serde_json::json;
use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};
pub use team::TestTeam;
use tokio::{
    net::TcpListener,
    sync::{oneshot, OnceCell},
};
use uuid::Uuid;

#[derive(Debug)]
pub struct AppInner {
    addr: SocketAddr,
}

#[derive(Clone, Debug)]
pub struct App {
    inner: Arc<AppInner>,
}

impl App {
    pub async fn new() -> Self {
        dotenv().ok();

        let (tx, rx) = oneshot::channel();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to create tokio runtime");

            rt.block_on(async {
                tracing::trace!("binding socket");

                let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
                let listener = TcpListener::bind(addr)
                    .await
                    .expect("failed to bind tcp listener");
                let state = State::with_store(MemoryStore::new());

                let inner = Arc::new(AppInner {
                    addr: listener.local_addr().unwrap(),
                });

                tx.send(inner).unwrap();

                tracing::trace!("starting app");

                reviewer_backend::run(listener, state, Duration::from_secs(10))
                    .await
                    .unwrap();
            });
        });

        App {
            inner: rx.await.unwrap(),
        }
    }

    /// Creates a team with unique ids. `members` are `(name, is_active)`
    /// pairs; the name doubles as the username.
    pub async fn create_team(&self, members: &[(&str, bool)]) -> TestTeam {
        let team = TestTeam::new(members);

        let res = self
            .post("/team/add")
            .json(&team.to_json())
            .send()
            .await;

        assert_eq!(res.status(), http::StatusCode::CREATED);

        team
    }

    pub async fn create_pull_request(&self, pull_request_id: &str, author_id: &str) -> serde_json::Value {
        let res = self
            .post("/pullRequest/create")
            .json(&json!({
                "pull_request_id": pull_request_id,
                "pull_request_name": "Add feature",
                "author_id": author_id,
            }))
            .send()
            .await;

        assert_eq!(res.status(), http::StatusCode::CREATED);

        let body: serde_json::Value = res.json().await;
        body["pr"].clone()
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(Client::new().get(format!("http://{}{}", self.inner.addr, url)))
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(Client::new().post(format!("http://{}{}", self.inner.addr, url)))
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(Client::new().delete(format!("http://{}{}", self.inner.addr, url)))
    }
}

pub async fn get_cached_app() -> &'static App {
    static APP: OnceCell<App> = OnceCell::const_new();
    APP.get_or_init(App::new).await
}

pub fn uuid() -> String {
    Uuid::new_v4()
        .as_simple()
        .encode_lower(&mut Uuid::encode_buffer())
        .to_owned()
}
