//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Backing, Project, ProjectQuery, Reward, User};

/// Data persistence contract for users, projects, rewards, and backings.
///
/// Cascades and uniqueness belong to the implementation: deleting a project
/// removes its rewards and their backings, and a second backing of the same
/// (user, reward) pair fails with `AppError::Conflict`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ProjectRepo: Send + Sync {
    // User Operations
    async fn create_user(&self, user: User) -> anyhow::Result<()>;
    async fn get_user(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn list_users(&self) -> anyhow::Result<Vec<User>>;

    // Project Operations
    async fn create_project(&self, project: Project) -> anyhow::Result<()>;
    async fn get_project(&self, id: Uuid) -> anyhow::Result<Option<Project>>;
    async fn list_projects(&self) -> anyhow::Result<Vec<Project>>;
    async fn find_projects(&self, query: &ProjectQuery) -> anyhow::Result<Vec<Project>>;
    async fn delete_project(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn list_created_projects(&self, user_id: Uuid) -> anyhow::Result<Vec<Project>>;
    /// Each project once, however many of its rewards the user backed.
    async fn list_backed_projects(&self, user_id: Uuid) -> anyhow::Result<Vec<Project>>;

    // Reward Operations
    async fn create_reward(&self, reward: Reward) -> anyhow::Result<()>;
    async fn list_rewards(&self, project_id: Uuid) -> anyhow::Result<Vec<Reward>>;
    async fn list_backed_rewards(&self, user_id: Uuid) -> anyhow::Result<Vec<Reward>>;

    // Backing Operations
    async fn create_backing(&self, backing: Backing) -> anyhow::Result<()>;
    async fn list_backings(&self, project_id: Uuid) -> anyhow::Result<Vec<Backing>>;
    async fn list_user_backings(&self, user_id: Uuid) -> anyhow::Result<Vec<Backing>>;

    // Aggregates
    /// Sum over the project's rewards of (backing count × reward amount); 0 without backings.
    async fn pledged_total(&self, project_id: Uuid) -> anyhow::Result<i64>;
    /// Same sum for every project that has at least one backing, in one grouped query.
    async fn pledged_totals(&self) -> anyhow::Result<HashMap<Uuid, i64>>;
}
