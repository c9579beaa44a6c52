//! # rf-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `rf-core` domain models, including the pledge aggregates the
//! funding engine is built on.

mod schema;

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use rf_core::error::AppError;
use rf_core::models::{Backing, Project, ProjectQuery, Reward, SortKey, User};
use rf_core::traits::ProjectRepo;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use uuid::Uuid;

const PROJECT_COLUMNS: &str = "p.id, p.user_id, p.category, p.title, p.short_blurb, p.description, \
     p.image_url, p.funding_amount, p.funding_end_date, p.created_at";

const REWARD_COLUMNS: &str = "r.id, r.project_id, r.amount, r.title, r.description, r.created_at";

const BACKING_COLUMNS: &str = "b.id, b.reward_id, b.user_id, b.created_at";

const USER_COLUMNS: &str = "u.id, u.email, u.name, u.image_url, u.password_digest, u.created_at";

// Backing count × reward amount per reward, summed per project.
const PLEDGED_TOTAL_SQL: &str = r#"
    SELECT COALESCE(SUM(per_reward.amount_funded), 0) AS amount_funded
    FROM (
        SELECT COUNT(b.id) * r.amount AS amount_funded
        FROM backings b
        INNER JOIN rewards r ON b.reward_id = r.id
        WHERE r.project_id = ?
        GROUP BY r.id
    ) AS per_reward
"#;

const PLEDGED_TOTALS_SQL: &str = r#"
    SELECT per_reward.project_id AS project_id, SUM(per_reward.amount_funded) AS amount_funded
    FROM (
        SELECT r.project_id AS project_id, COUNT(b.id) * r.amount AS amount_funded
        FROM backings b
        INNER JOIN rewards r ON b.reward_id = r.id
        GROUP BY r.id
    ) AS per_reward
    GROUP BY per_reward.project_id
"#;

pub struct SqliteProjectRepo {
    pool: SqlitePool,
}

impl SqliteProjectRepo {
    /// Opens (creating if missing) the database at `url` and applies the schema.
    pub async fn new(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// A private in-memory database. One connection that never expires,
    /// otherwise every new connection would see an empty database.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::raw_sql(schema::SCHEMA).execute(&pool).await?;
        tracing::info!("sqlite schema ready");
        Ok(Self { pool })
    }
}

fn project_from_row(row: &SqliteRow) -> anyhow::Result<Project> {
    Ok(Project {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        category: row
            .try_get::<String, _>("category")?
            .parse()
            .map_err(|e| AppError::Internal(format!("stored project row: {e}")))?,
        title: row.try_get("title")?,
        short_blurb: row.try_get("short_blurb")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        funding_amount: row.try_get("funding_amount")?,
        funding_end_date: row.try_get("funding_end_date")?,
        created_at: row.try_get("created_at")?,
    })
}

fn reward_from_row(row: &SqliteRow) -> anyhow::Result<Reward> {
    Ok(Reward {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        amount: row.try_get("amount")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

fn backing_from_row(row: &SqliteRow) -> anyhow::Result<Backing> {
    Ok(Backing {
        id: row.try_get("id")?,
        reward_id: row.try_get("reward_id")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn user_from_row(row: &SqliteRow) -> anyhow::Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        image_url: row.try_get("image_url")?,
        password_digest: row.try_get("password_digest")?,
        created_at: row.try_get("created_at")?,
    })
}

fn order_by(sort: SortKey) -> &'static str {
    match sort {
        SortKey::Random => " ORDER BY RANDOM()",
        SortKey::FundingGoal => " ORDER BY p.funding_amount ASC, p.id ASC",
        // Timestamps are UTC RFC 3339 text, so text order is chronological.
        SortKey::EndDate => " ORDER BY p.funding_end_date ASC, p.id ASC",
        SortKey::Newest => " ORDER BY p.created_at DESC, p.id DESC",
    }
}

/// Turns constraint failures on insert into typed domain errors.
fn write_error(err: sqlx::Error, conflict: &str, missing: (&str, Uuid)) -> anyhow::Error {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return AppError::Conflict(conflict.to_string()).into();
        }
        if db.is_foreign_key_violation() {
            return AppError::NotFound(missing.0.to_string(), missing.1.to_string()).into();
        }
    }
    err.into()
}

#[async_trait]
impl ProjectRepo for SqliteProjectRepo {
    async fn create_user(&self, user: User) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO users (id, email, name, image_url, password_digest, created_at) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.image_url)
            .bind(&user.password_digest)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, &format!("email {} is already registered", user.email), ("User", user.id)))?;
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users u"))
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(user_from_row)
            .collect()
    }

    async fn create_project(&self, project: Project) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO projects (id, user_id, category, title, short_blurb, description, image_url, funding_amount, funding_end_date, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(project.id)
            .bind(project.user_id)
            .bind(project.category.as_str())
            .bind(&project.title)
            .bind(&project.short_blurb)
            .bind(&project.description)
            .bind(&project.image_url)
            .bind(project.funding_amount)
            .bind(project.funding_end_date)
            .bind(project.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, &format!("project {} already exists", project.id), ("User", project.user_id)))?;
        Ok(())
    }

    async fn get_project(&self, id: Uuid) -> anyhow::Result<Option<Project>> {
        let row = sqlx::query(&format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(project_from_row).transpose()
    }

    async fn list_projects(&self) -> anyhow::Result<Vec<Project>> {
        sqlx::query(&format!("SELECT {PROJECT_COLUMNS} FROM projects p"))
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(project_from_row)
            .collect()
    }

    /// Category, ordering and limit go into one statement. SQLite's `lower()`
    /// only folds ASCII, so the text predicate runs on decoded rows and the
    /// limit moves after it when text is present.
    async fn find_projects(&self, query: &ProjectQuery) -> anyhow::Result<Vec<Project>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {PROJECT_COLUMNS} FROM projects p"));

        if let Some(category) = query.category {
            builder.push(" WHERE p.category = ").push_bind(category.as_str());
        }

        if let Some(sort) = query.sort {
            builder.push(order_by(sort));
        }

        if let (Some(limit), None) = (query.limit, &query.text) {
            builder.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        let mut projects = Vec::with_capacity(rows.len());
        for row in &rows {
            let project = project_from_row(row)?;
            if query.text.as_deref().map_or(true, |text| project.matches_text(text)) {
                projects.push(project);
            }
        }
        if let Some(limit) = query.limit {
            projects.truncate(limit as usize);
        }

        tracing::debug!(?query, rows = rows.len(), matched = projects.len(), "find_projects");
        Ok(projects)
    }

    async fn delete_project(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_created_projects(&self, user_id: Uuid) -> anyhow::Result<Vec<Project>> {
        sqlx::query(&format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.user_id = ?"))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(project_from_row)
            .collect()
    }

    async fn list_backed_projects(&self, user_id: Uuid) -> anyhow::Result<Vec<Project>> {
        sqlx::query(&format!(
            "SELECT DISTINCT {PROJECT_COLUMNS} FROM projects p \
             INNER JOIN rewards r ON r.project_id = p.id \
             INNER JOIN backings b ON b.reward_id = r.id \
             WHERE b.user_id = ?"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(project_from_row)
        .collect()
    }

    async fn create_reward(&self, reward: Reward) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO rewards (id, project_id, amount, title, description, created_at) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(reward.id)
            .bind(reward.project_id)
            .bind(reward.amount)
            .bind(&reward.title)
            .bind(&reward.description)
            .bind(reward.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, &format!("reward {} already exists", reward.id), ("Project", reward.project_id)))?;
        Ok(())
    }

    async fn list_rewards(&self, project_id: Uuid) -> anyhow::Result<Vec<Reward>> {
        sqlx::query(&format!("SELECT {REWARD_COLUMNS} FROM rewards r WHERE r.project_id = ? ORDER BY r.amount ASC"))
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(reward_from_row)
            .collect()
    }

    async fn list_backed_rewards(&self, user_id: Uuid) -> anyhow::Result<Vec<Reward>> {
        sqlx::query(&format!(
            "SELECT {REWARD_COLUMNS} FROM rewards r \
             INNER JOIN backings b ON b.reward_id = r.id \
             WHERE b.user_id = ?"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(reward_from_row)
        .collect()
    }

    async fn create_backing(&self, backing: Backing) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO backings (id, reward_id, user_id, created_at) VALUES (?, ?, ?, ?)")
            .bind(backing.id)
            .bind(backing.reward_id)
            .bind(backing.user_id)
            .bind(backing.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "user has already backed this reward", ("Reward", backing.reward_id)))?;
        Ok(())
    }

    async fn list_backings(&self, project_id: Uuid) -> anyhow::Result<Vec<Backing>> {
        sqlx::query(&format!(
            "SELECT {BACKING_COLUMNS} FROM backings b \
             INNER JOIN rewards r ON b.reward_id = r.id \
             WHERE r.project_id = ?"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(backing_from_row)
        .collect()
    }

    async fn list_user_backings(&self, user_id: Uuid) -> anyhow::Result<Vec<Backing>> {
        sqlx::query(&format!("SELECT {BACKING_COLUMNS} FROM backings b WHERE b.user_id = ?"))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(backing_from_row)
            .collect()
    }

    async fn pledged_total(&self, project_id: Uuid) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(PLEDGED_TOTAL_SQL)
            .bind(project_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn pledged_totals(&self) -> anyhow::Result<HashMap<Uuid, i64>> {
        sqlx::query(PLEDGED_TOTALS_SQL)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| -> anyhow::Result<(Uuid, i64)> {
                Ok((row.try_get("project_id")?, row.try_get("amount_funded")?))
            })
            .collect()
    }
}
