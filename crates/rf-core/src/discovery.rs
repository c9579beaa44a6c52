//! # Discovery
//!
//! Category-filtered, sorted browsing listing capped at [`DISCOVERY_LIMIT`].

use crate::models::{CategoryFilter, Project, ProjectQuery, SortKey};
use crate::traits::ProjectRepo;

/// Maximum number of projects on a discovery page.
pub const DISCOVERY_LIMIT: u32 = 9;

/// Up to nine projects matching `category`, ordered by `sort`.
///
/// `SortKey::Random` gives an arbitrary selection that differs between calls.
pub async fn discovery_results(
    repo: &dyn ProjectRepo,
    category: CategoryFilter,
    sort: SortKey,
) -> anyhow::Result<Vec<Project>> {
    let query = ProjectQuery {
        category: category.category(),
        text: None,
        sort: Some(sort),
        limit: Some(DISCOVERY_LIMIT),
    };

    let mut projects = repo.find_projects(&query).await?;
    projects.truncate(DISCOVERY_LIMIT as usize);

    tracing::debug!(?category, %sort, found = projects.len(), "discovery listing");
    Ok(projects)
}
