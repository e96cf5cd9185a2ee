#![allow(dead_code)]

use chrono::{Duration, Utc};
use tempfile::TempDir;
use trends::api::client::TrendsApi;
use trends::api::gateway::AuthGateway;
use trends::auth::TokenManager;
use trends::config::{
    ConfigStore, KEY_JWT, KEY_REFRESH_TOKEN, KEY_TOKEN_EXPIRES_AT, KEY_URL_API,
};
use wiremock::MockServer;

pub struct Harness {
    pub server: MockServer,
    pub store: ConfigStore,
    _dir: TempDir,
}

impl Harness {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("tecli.yml"));
        store.set(KEY_URL_API, &server.uri()).unwrap();
        Harness {
            server,
            store,
            _dir: dir,
        }
    }

    /// Store a session whose access token is valid for another hour.
    pub fn with_session(self, token: &str, refresh_token: Option<&str>) -> Self {
        self.store.set(KEY_JWT, token).unwrap();
        if let Some(refresh_token) = refresh_token {
            self.store.set(KEY_REFRESH_TOKEN, refresh_token).unwrap();
        }
        self.set_expiry(Utc::now() + Duration::hours(1));
        self
    }

    pub fn set_expiry(&self, at: chrono::DateTime<Utc>) {
        self.store
            .set(KEY_TOKEN_EXPIRES_AT, &at.to_rfc3339())
            .unwrap();
    }

    pub fn tokens(&self) -> TokenManager {
        TokenManager::new(TrendsApi::new(self.store.clone()).unwrap())
    }

    pub fn gateway(&self) -> AuthGateway {
        AuthGateway::new(self.tokens())
    }

    pub fn get(&self, key: &str) -> String {
        self.store.get(key).unwrap()
    }
}
