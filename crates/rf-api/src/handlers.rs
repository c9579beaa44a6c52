//! # rf-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the core engines.

use actix_web::{web, HttpResponse};
use rf_core::discovery::discovery_results;
use rf_core::error::AppError;
use rf_core::funding::{funded_projects, percentage_funded, projects_percentage_funded};
use rf_core::models::{CategoryFilter, SortKey};
use rf_core::search::search_results;
use rf_core::traits::ProjectRepo;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::views::{keyed, keyed_funded, keyed_views, ProjectDetail, ProjectIndex, ProjectView, UserDetail};

/// State shared across all Actix-web workers.
pub struct AppState {
    pub repo: Box<dyn ProjectRepo>,
}

/// `?discovery[category]=Art&discovery[sort]=Funding Goal`
#[derive(Debug, Deserialize)]
pub struct DiscoveryParams {
    #[serde(rename = "discovery[category]")]
    pub category: Option<String>,
    #[serde(rename = "discovery[sort]")]
    pub sort: Option<String>,
}

/// `?search[query]=gamma`
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "search[query]")]
    pub query: Option<String>,
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Every project with its funding percentage, plus every user.
pub async fn project_index(data: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let repo = data.repo.as_ref();

    let projects = funded_projects(repo).await?;
    let users = repo.list_users().await?;

    Ok(HttpResponse::Ok().json(ProjectIndex {
        projects: keyed_funded(projects),
        users: keyed(users, |u| u.id),
    }))
}

/// One project with its rewards, backings, creator and funding percentage.
pub async fn project_show(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let repo = data.repo.as_ref();
    let project_id = path.into_inner();

    let project = repo
        .get_project(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".to_string(), project_id.to_string()))?;

    let percentage_funded = percentage_funded(repo, &project).await?;
    let rewards = repo.list_rewards(project_id).await?;
    let backings = repo.list_backings(project_id).await?;
    let user = repo.get_user(project.user_id).await?;

    Ok(HttpResponse::Ok().json(ProjectDetail {
        project: ProjectView { project, percentage_funded },
        rewards: keyed(rewards, |r| r.id),
        backings: keyed(backings, |b| b.id),
        user,
    }))
}

/// Up to nine projects; category defaults to "All", sort to "Random".
pub async fn project_discovery(
    data: web::Data<AppState>,
    params: web::Query<DiscoveryParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();
    let category: CategoryFilter = params
        .category
        .as_deref()
        .map(str::parse::<CategoryFilter>)
        .transpose()?
        .unwrap_or_default();
    let sort: SortKey = params
        .sort
        .as_deref()
        .map(str::parse::<SortKey>)
        .transpose()?
        .unwrap_or_default();

    let projects = discovery_results(data.repo.as_ref(), category, sort).await?;
    Ok(HttpResponse::Ok().json(projects))
}

pub async fn project_searches(
    data: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> ApiResult<HttpResponse> {
    let query = params.into_inner().query.unwrap_or_default();

    let projects = search_results(data.repo.as_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// A user's profile: what they created, what they backed, and their pledges.
pub async fn user_show(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let repo = data.repo.as_ref();
    let user_id = path.into_inner();

    let user = repo
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string(), user_id.to_string()))?;

    let percentages = projects_percentage_funded(repo).await?;
    let backed_projects = repo.list_backed_projects(user_id).await?;
    let created_projects = repo.list_created_projects(user_id).await?;
    let rewards = repo.list_backed_rewards(user_id).await?;
    let backings = repo.list_user_backings(user_id).await?;

    Ok(HttpResponse::Ok().json(UserDetail {
        user,
        backed_projects: keyed_views(backed_projects, &percentages),
        created_projects: keyed_views(created_projects, &percentages),
        rewards: keyed(rewards, |r| r.id),
        backings: keyed(backings, |b| b.id),
    }))
}
