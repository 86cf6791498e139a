use crate::{
    config::RuntimeConfiguration,
    data::{StudentStore, postgres::PgStudentStore},
    error::{MigrateSnafu, OpenDatabaseSnafu, StudentsResult},
};
use snafu::ResultExt;
use sqlx::postgres::PgPoolOptions;
use std::{ops::Deref, sync::Arc};

#[derive(Clone, Debug)]
pub struct StudentsState {
    store: Arc<dyn StudentStore>,
}

impl StudentsState {
    pub async fn new(config: &RuntimeConfiguration) -> StudentsResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.server_config().max_connections)
            .connect(&config.db_config().get_db_path())
            .await
            .context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        Ok(Self::with_store(Arc::new(PgStudentStore::new(pool))))
    }

    pub fn with_store(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    pub async fn sensible_shutdown(&self) {
        self.store.close().await;
        info!("Closed student store");
    }
}

impl Deref for StudentsState {
    type Target = dyn StudentStore;

    fn deref(&self) -> &Self::Target {
        self.store.as_ref()
    }
}
