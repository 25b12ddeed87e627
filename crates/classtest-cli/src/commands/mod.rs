pub mod init;
pub mod student;
pub mod teacher;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};

use classtest_core::catalog::{self, Catalog};
use classtest_core::config::{load_config_from, ClasstestConfig};
use classtest_core::model::{Role, TestVariant};
use classtest_core::session::Session;
use classtest_core::storage::JsonFileStorage;
use classtest_core::store::SubmissionStore;

/// Everything a command needs: config, catalog and the loaded store.
pub struct Workspace {
    pub config: ClasstestConfig,
    pub catalog: Catalog,
    pub store: SubmissionStore<JsonFileStorage>,
}

impl Workspace {
    pub fn open(config_path: Option<&Path>) -> Result<Self> {
        let config = load_config_from(config_path)?;
        let catalog = load_configured_catalog(&config)?;
        tracing::debug!(store = %config.store_path.display(), "opening submission store");
        let store = SubmissionStore::load_with_policy(
            JsonFileStorage::new(&config.store_path),
            config.on_corrupt_store,
        )?;
        Ok(Self {
            config,
            catalog,
            store,
        })
    }

    /// A session logged in as `name` with `role`.
    pub fn login(&self, name: &str, role: Role) -> Result<Session> {
        let mut session = Session::new(&self.config.teacher_name);
        session.login(name, role)?;
        Ok(session)
    }

    /// "Subject - Name (grade N)", or the raw id for variants no longer in
    /// the catalog.
    pub fn describe_variant(&self, variant_id: &str) -> String {
        self.catalog
            .get(variant_id)
            .map(describe)
            .unwrap_or_else(|| variant_id.to_string())
    }
}

pub fn load_configured_catalog(config: &ClasstestConfig) -> Result<Catalog> {
    anyhow::ensure!(
        config.catalog_path.exists(),
        "catalog not found at {} (run `classtest init` to create a sample)",
        config.catalog_path.display()
    );
    catalog::load_catalog(&config.catalog_path)
        .with_context(|| format!("failed to load catalog {}", config.catalog_path.display()))
}

pub fn describe(variant: &TestVariant) -> String {
    format!(
        "{} - {} (grade {})",
        variant.subject, variant.name, variant.grade
    )
}

pub fn local_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
