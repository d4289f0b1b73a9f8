//! libSQL backend: one `profiles` row per signed-in user.
//!
//! Supports local file and in-memory databases. `put` upserts the full row
//! and stamps `updated_at`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::onboarding::model::{OnboardingProfile, Pet};
use crate::store::migrations;
use crate::store::traits::{OwnerKey, ProfileStore};

/// libSQL profile store.
///
/// Stores a single connection that is reused for all operations.
pub struct LibSqlProfileStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlProfileStore {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let store = Self::from_database(db).await?;
        info!(path = %path.display(), "Profile database opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StoreError::Pool(format!("Failed to create in-memory database: {e}")))?;
        Self::from_database(db).await
    }

    async fn from_database(db: LibSqlDatabase) -> Result<Self, StoreError> {
        let conn = db
            .connect()
            .map_err(|e| StoreError::Pool(format!("Failed to create connection: {e}")))?;
        migrations::run_migrations(&conn).await?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

fn opt_real(d: Option<Decimal>) -> libsql::Value {
    match d.and_then(|d| d.to_f64()) {
        Some(v) => libsql::Value::Real(v),
        None => libsql::Value::Null,
    }
}

/// Map a libsql Row to an OnboardingProfile.
///
/// Column order: 0:selected_pet, 1:monthly_goal, 2:daily_budget.
/// NULL columns read as unset. An unrecognised pet is dropped with a warning.
fn row_to_profile(row: &libsql::Row) -> OnboardingProfile {
    let pet_str: Option<String> = row.get(0).ok();
    let selected_pet = pet_str.and_then(|s| match s.parse::<Pet>() {
        Ok(pet) => Some(pet),
        Err(unknown) => {
            warn!(pet = %unknown, "Ignoring unknown pet in stored profile");
            None
        }
    });
    let monthly_goal = row.get::<f64>(1).ok().and_then(Decimal::from_f64);
    let daily_budget = row.get::<f64>(2).ok().and_then(Decimal::from_f64);

    OnboardingProfile {
        selected_pet,
        monthly_goal,
        daily_budget,
    }
}

#[async_trait]
impl ProfileStore for LibSqlProfileStore {
    fn name(&self) -> &'static str {
        "libsql"
    }

    fn requires_identity(&self) -> bool {
        true
    }

    async fn get(&self, owner: &OwnerKey) -> Result<Option<OnboardingProfile>, StoreError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT selected_pet, monthly_goal, daily_budget FROM profiles WHERE id = ?1",
                params![owner.as_str()],
            )
            .await
            .map_err(|e| StoreError::Query(format!("get_profile: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_profile(&row))),
            Ok(None) => {
                debug!(%owner, "No profile row yet");
                Ok(None)
            }
            Err(e) => Err(StoreError::Query(format!("get_profile: {e}"))),
        }
    }

    async fn put(&self, owner: &OwnerKey, profile: &OnboardingProfile) -> Result<(), StoreError> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let pet = profile.selected_pet.map(|p| p.as_str());

        conn.execute(
            "INSERT INTO profiles (id, selected_pet, monthly_goal, daily_budget, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (id) DO UPDATE SET
                selected_pet = ?2, monthly_goal = ?3, daily_budget = ?4, updated_at = ?5",
            params![
                owner.as_str(),
                opt_text(pet),
                opt_real(profile.monthly_goal),
                opt_real(profile.daily_budget),
                now
            ],
        )
        .await
        .map_err(|e| StoreError::Query(format!("put_profile: {e}")))?;

        debug!(%owner, "Profile row upserted");
        Ok(())
    }
}
