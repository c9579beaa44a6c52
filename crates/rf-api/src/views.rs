//! JSON bodies returned by the handlers.
//!
//! Collections of related records are keyed by id, matching what the
//! frontend store expects.

use std::collections::{BTreeMap, HashMap};

use rf_core::models::{Backing, Project, Reward, User};
use serde::Serialize;
use uuid::Uuid;

/// A project together with its computed funding percentage.
#[derive(Debug, Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub percentage_funded: f64,
}

impl ProjectView {
    /// Looks the project up in a bulk percentage map; projects created after
    /// the map was built count as unfunded.
    pub fn from_bulk(project: Project, percentages: &HashMap<Uuid, f64>) -> Self {
        let percentage_funded = percentages.get(&project.id).copied().unwrap_or(0.0);
        Self { project, percentage_funded }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectIndex {
    pub projects: BTreeMap<Uuid, ProjectView>,
    pub users: BTreeMap<Uuid, User>,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    pub project: ProjectView,
    pub rewards: BTreeMap<Uuid, Reward>,
    pub backings: BTreeMap<Uuid, Backing>,
    pub user: Option<User>,
}

#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub user: User,
    pub backed_projects: BTreeMap<Uuid, ProjectView>,
    pub created_projects: BTreeMap<Uuid, ProjectView>,
    pub rewards: BTreeMap<Uuid, Reward>,
    pub backings: BTreeMap<Uuid, Backing>,
}

pub(crate) fn keyed<T>(items: impl IntoIterator<Item = T>, id: impl Fn(&T) -> Uuid) -> BTreeMap<Uuid, T> {
    items.into_iter().map(|item| (id(&item), item)).collect()
}

pub(crate) fn keyed_views(
    projects: Vec<Project>,
    percentages: &HashMap<Uuid, f64>,
) -> BTreeMap<Uuid, ProjectView> {
    projects
        .into_iter()
        .map(|p| (p.id, ProjectView::from_bulk(p, percentages)))
        .collect()
}

pub(crate) fn keyed_funded(projects: Vec<(Project, f64)>) -> BTreeMap<Uuid, ProjectView> {
    projects
        .into_iter()
        .map(|(project, percentage_funded)| (project.id, ProjectView { project, percentage_funded }))
        .collect()
}
