// Shared fixtures for router-level tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request},
    response::Response,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

use ott_api::auth::AccountStore;
use ott_api::config::{AppConfig, DatabaseConfig, Environment};
use ott_api::db::models::{Account, Plan, Role, Subscription, SubscriptionStatus};
use ott_api::db::pool::create_lazy_pool;
use ott_api::state::AppState;
use ott_api::{AppError, AppResult};

pub const TEST_SECRET: &str = "integration-test-secret";

/// In-memory account store.
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
    offline: bool,
}

impl MemoryAccountStore {
    pub fn with(accounts: impl IntoIterator<Item = Account>) -> Self {
        let store = Self::default();
        for account in accounts {
            store.insert(account);
        }
        store
    }

    /// A store whose every lookup fails.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, account: Account) {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.id, account);
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        if self.offline {
            return Err(AppError::Internal("account store offline".to_string()));
        }
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }
}

pub fn account(role: Role) -> Account {
    Account {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", role.as_str()),
        name: format!("Test {}", role.as_str()),
        role,
        is_active: true,
        is_blocked: false,
        is_email_verified: true,
        subscription: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn subscriber(plan: Plan, status: SubscriptionStatus) -> Account {
    Account {
        subscription: Some(Subscription { plan, status }),
        ..account(Role::User)
    }
}

pub fn config(environment: Environment) -> AppConfig {
    AppConfig {
        environment,
        jwt_secret: Some(TEST_SECRET.to_string()),
        ..AppConfig::default()
    }
}

/// Application state over a pool that never connects.
pub fn state(store: MemoryAccountStore) -> AppState {
    state_in(Environment::Test, store)
}

pub fn state_in(environment: Environment, store: MemoryAccountStore) -> AppState {
    let pool = create_lazy_pool(&DatabaseConfig {
        min_connections: 0,
        ..DatabaseConfig::default()
    });
    AppState::with_account_store(pool, config(environment), Arc::new(store))
        .expect("test config has a secret")
}

pub fn token_for(state: &AppState, account: &Account) -> String {
    let (token, _) = state.issuer.issue(&account.id.to_string()).unwrap();
    token
}

pub fn expired_token_for(state: &AppState, account: &Account) -> String {
    let issued_at = Utc::now() - Duration::days(30);
    let (token, _) = state
        .issuer
        .issue_at(&account.id.to_string(), issued_at)
        .unwrap();
    token
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token, Body::empty())
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(body).unwrap()
}

pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
