use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::models::{NewProfile, Profile, ProfileUpdate};
use crate::services::store::{StoreError, UserStore};

const PROFILE_COLUMNS: &str = "id, name, age, gender, email, city, interests, questionnaire";

/// PostgreSQL-backed profile store
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new store from a connection string and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    async fn fetch_optional(&self, id: i64) -> Result<Option<Profile>, StoreError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", PROFILE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(profile_from_row).transpose()
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        let query = format!(
            r#"
            INSERT INTO users (name, age, gender, email, city, interests, questionnaire)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        let age = age_to_column(profile.age)?;
        let row = sqlx::query(&query)
            .bind(&profile.name)
            .bind(age)
            .bind(&profile.gender)
            .bind(&profile.email)
            .bind(&profile.city)
            .bind(&profile.interests)
            .bind(Json(&profile.questionnaire))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, &profile.email))?;

        let created = profile_from_row(&row)?;
        tracing::debug!("Created user {} ({})", created.id, created.email);

        Ok(created)
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Profile>, StoreError> {
        let query = format!(
            "SELECT {} FROM users ORDER BY id LIMIT $1 OFFSET $2",
            PROFILE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(i64::from(limit))
            .bind(i64::from(skip))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(profile_from_row).collect()
    }

    async fn get(&self, id: i64) -> Result<Profile, StoreError> {
        self.fetch_optional(id).await?.ok_or(StoreError::NotFound(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", PROFILE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(profile_from_row).transpose()
    }

    async fn update(&self, id: i64, update: ProfileUpdate) -> Result<Profile, StoreError> {
        // Single statement: concurrent updates to different fields both land
        let query = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender),
                email = COALESCE($5, email),
                city = COALESCE($6, city),
                interests = COALESCE($7, interests),
                questionnaire = COALESCE($8, questionnaire),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        let age = update.age.map(age_to_column).transpose()?;
        let email = update.email.clone().unwrap_or_default();
        let row = sqlx::query(&query)
            .bind(id)
            .bind(update.name)
            .bind(age)
            .bind(update.gender)
            .bind(update.email)
            .bind(update.city)
            .bind(update.interests)
            .bind(update.questionnaire.map(Json))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, &email))?
            .ok_or(StoreError::NotFound(id))?;

        profile_from_row(&row)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    async fn candidate_pool(&self, subject_id: i64) -> Result<Vec<Profile>, StoreError> {
        let query = format!(
            "SELECT {} FROM users WHERE id <> $1 ORDER BY id",
            PROFILE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(subject_id)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Loaded {} candidates for user {}", rows.len(), subject_id);

        rows.iter().map(profile_from_row).collect()
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Build a profile from a row, rejecting ages that cannot be represented
fn profile_from_row(row: &PgRow) -> Result<Profile, StoreError> {
    let id: i64 = row.try_get("id")?;
    let age = age_from_column(id, row.try_get("age")?)?;
    let questionnaire: Option<Json<BTreeMap<String, String>>> = row.try_get("questionnaire")?;
    let interests: Option<Vec<String>> = row.try_get("interests")?;

    Ok(Profile {
        id,
        name: row.try_get("name")?,
        age,
        gender: row.try_get("gender")?,
        email: row.try_get("email")?,
        city: row.try_get("city")?,
        interests: interests.unwrap_or_default(),
        questionnaire: questionnaire.map(|q| q.0).unwrap_or_default(),
    })
}

fn age_from_column(id: i64, age: i32) -> Result<u32, StoreError> {
    u32::try_from(age)
        .map_err(|_| StoreError::InvalidProfile(format!("user {} has age {}", id, age)))
}

fn age_to_column(age: u32) -> Result<i32, StoreError> {
    i32::try_from(age).map_err(|_| StoreError::InvalidProfile(format!("age {} out of range", age)))
}

fn map_unique_violation(err: sqlx::Error, email: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateEmail(email.to_string())
        }
        _ => StoreError::SqlxError(err),
    }
}
