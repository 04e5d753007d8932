use crate::config::AppConfig;
use crate::customers::{
    password::PasswordPolicy,
    repo::{CustomerStore, PgCustomerStore},
};
use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<dyn CustomerStore>,
    pub passwords: Arc<PasswordPolicy>,
}

impl AppState {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
        sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")
    }

    pub fn from_parts(db: PgPool, config: &AppConfig) -> Self {
        Self {
            customers: Arc::new(PgCustomerStore::new(db)) as Arc<dyn CustomerStore>,
            passwords: Arc::new(PasswordPolicy::new(&config.password)),
        }
    }

    #[cfg(test)]
    pub fn fake(store: crate::customers::memory::InMemoryCustomerStore) -> Self {
        Self {
            customers: Arc::new(store) as Arc<dyn CustomerStore>,
            passwords: Arc::new(PasswordPolicy::default()),
        }
    }
}
