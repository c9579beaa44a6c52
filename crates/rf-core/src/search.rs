//! # Search
//!
//! Free-text lookup: case-insensitive substring of the title or the short
//! blurb. No tokenizing and no ranking.

use crate::models::{Project, ProjectQuery};
use crate::traits::ProjectRepo;

/// Projects whose title or short blurb contains `query`. An empty query
/// returns every project.
pub async fn search_results(repo: &dyn ProjectRepo, query: &str) -> anyhow::Result<Vec<Project>> {
    if query.is_empty() {
        return repo.list_projects().await;
    }

    let projects = repo
        .find_projects(&ProjectQuery {
            text: Some(query.to_string()),
            ..ProjectQuery::default()
        })
        .await?;

    tracing::debug!(query, found = projects.len(), "project search");
    Ok(projects)
}
