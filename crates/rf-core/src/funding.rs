//! # Funding Aggregation
//!
//! Funding percentage = total pledged / funding_amount × 100, rounded to
//! two decimals. Overfunded projects report values above 100.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::Project;
use crate::traits::ProjectRepo;

/// Percentage of `target` covered by `pledged`, rounded to two decimal
/// places with exact ties going to the even digit. `target` must be positive.
pub fn funding_percentage(pledged: i64, target: i64) -> f64 {
    let percentage = pledged as f64 / target as f64 * 100.0;
    (percentage * 100.0).round_ties_even() / 100.0
}

/// Funding percentage of a single project; 0 when nobody backed it.
pub async fn percentage_funded(repo: &dyn ProjectRepo, project: &Project) -> anyhow::Result<f64> {
    let pledged = repo.pledged_total(project.id).await?;
    if pledged == 0 {
        return Ok(0.0);
    }
    Ok(funding_percentage(pledged, project.funding_amount))
}

/// Every project paired with its funding percentage.
///
/// Two passes: one grouped aggregate over all backings, then a single walk
/// of the project list. Projects absent from the aggregate map to 0.
pub async fn funded_projects(repo: &dyn ProjectRepo) -> anyhow::Result<Vec<(Project, f64)>> {
    let totals = repo.pledged_totals().await?;
    let projects = repo.list_projects().await?;

    tracing::debug!(
        projects = projects.len(),
        funded = totals.len(),
        "computed bulk funding percentages"
    );

    Ok(projects
        .into_iter()
        .map(|project| {
            let pledged = totals.get(&project.id).copied().unwrap_or(0);
            let percentage = funding_percentage(pledged, project.funding_amount);
            (project, percentage)
        })
        .collect())
}

/// Funding percentage of every project, keyed by project id.
pub async fn projects_percentage_funded(repo: &dyn ProjectRepo) -> anyhow::Result<HashMap<Uuid, f64>> {
    Ok(funded_projects(repo)
        .await?
        .into_iter()
        .map(|(project, percentage)| (project.id, percentage))
        .collect())
}
