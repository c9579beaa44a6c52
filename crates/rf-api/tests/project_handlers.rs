use std::collections::HashMap;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::{Duration, Utc};
use mockall::predicate::eq;
use rf_api::configure_routes;
use rf_api::handlers::AppState;
use rf_core::models::{Backing, Category, Project, Reward, SortKey, User, DEFAULT_USER_IMAGE_URL};
use rf_core::traits::MockProjectRepo;
use serde_json::Value;
use uuid::Uuid;

fn sample_user() -> User {
    User {
        id: Uuid::now_v7(),
        email: "creator@example.com".into(),
        name: "Creator".into(),
        image_url: DEFAULT_USER_IMAGE_URL.into(),
        password_digest: "secret-digest".into(),
        created_at: Utc::now(),
    }
}

fn sample_project(owner: Uuid, category: Category, funding_amount: i64) -> Project {
    Project {
        id: Uuid::now_v7(),
        user_id: owner,
        category,
        title: "Film Project Gamma".into(),
        short_blurb: "An indie film shot entirely at night".into(),
        description: "A long description".into(),
        image_url: "http://example.com/gamma.jpg".into(),
        funding_amount,
        funding_end_date: Utc::now() + Duration::days(10),
        created_at: Utc::now(),
    }
}

fn state(repo: MockProjectRepo) -> web::Data<AppState> {
    web::Data::new(AppState { repo: Box::new(repo) })
}

async fn get(repo: MockProjectRepo, uri: &str) -> (StatusCode, Value) {
    let app = test::init_service(App::new().app_data(state(repo)).configure(configure_routes)).await;
    let response = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[actix_web::test]
async fn test_health() {
    let (status, body) = get(MockProjectRepo::new(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_discovery_defaults_to_all_and_random() {
    let owner = Uuid::now_v7();
    let mut repo = MockProjectRepo::new();
    repo.expect_find_projects()
        .withf(|q| q.category.is_none() && q.sort == Some(SortKey::Random) && q.limit == Some(9))
        .times(1)
        .returning(move |_| Ok(vec![sample_project(owner, Category::Film, 100)]));

    let (status, body) = get(repo, "/api/project_discovery").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_discovery_reads_bracketed_params() {
    let owner = Uuid::now_v7();
    let mut repo = MockProjectRepo::new();
    repo.expect_find_projects()
        .withf(|q| q.category == Some(Category::Art) && q.sort == Some(SortKey::FundingGoal))
        .times(1)
        .returning(move |_| {
            Ok(vec![
                sample_project(owner, Category::Art, 100),
                sample_project(owner, Category::Art, 200),
            ])
        });

    let (status, body) = get(
        repo,
        "/api/project_discovery?discovery%5Bcategory%5D=Art&discovery%5Bsort%5D=Funding%20Goal",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let projects = body.as_array().unwrap();
    assert!(projects.iter().all(|p| p["category"] == "Art"));
    assert_eq!(projects[0]["funding_amount"], 100);
}

#[actix_web::test]
async fn test_discovery_rejects_unknown_sort() {
    let mut repo = MockProjectRepo::new();
    repo.expect_find_projects().never();

    let (status, body) = get(repo, "/api/project_discovery?discovery%5Bsort%5D=Popular").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0], "validation error: unknown sort 'Popular'");
}

#[actix_web::test]
async fn test_search_passes_query_through() {
    let owner = Uuid::now_v7();
    let mut repo = MockProjectRepo::new();
    repo.expect_find_projects()
        .withf(|q| q.text.as_deref() == Some("gamma"))
        .times(1)
        .returning(move |_| Ok(vec![sample_project(owner, Category::Film, 100)]));

    let (status, body) = get(repo, "/api/project_searches?search%5Bquery%5D=gamma").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "Film Project Gamma");
}

#[actix_web::test]
async fn test_search_without_query_lists_all() {
    let mut repo = MockProjectRepo::new();
    repo.expect_list_projects().times(1).returning(|| Ok(vec![]));

    let (status, body) = get(repo, "/api/project_searches").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(vec![]));
}

#[actix_web::test]
async fn test_project_index_includes_bulk_percentages() {
    let creator = sample_user();
    let funded = sample_project(creator.id, Category::Food, 1_000);
    let unfunded = sample_project(creator.id, Category::Games, 500);
    let (funded_id, unfunded_id) = (funded.id, unfunded.id);
    let projects = vec![funded, unfunded];
    let users = vec![creator];

    let mut repo = MockProjectRepo::new();
    repo.expect_pledged_totals()
        .times(1)
        .returning(move || Ok(HashMap::from([(funded_id, 1_500)])));
    repo.expect_list_projects().times(1).returning(move || Ok(projects.clone()));
    repo.expect_list_users().returning(move || Ok(users.clone()));

    let (status, body) = get(repo, "/api/projects").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["projects"][funded_id.to_string()]["percentage_funded"], 150.0);
    assert_eq!(body["projects"][unfunded_id.to_string()]["percentage_funded"], 0.0);
    let user = body["users"].as_object().unwrap().values().next().unwrap();
    assert!(user.get("password_digest").is_none());
}

#[actix_web::test]
async fn test_project_show_bundles_related_records() {
    let creator = sample_user();
    let backer = Uuid::now_v7();
    let project = sample_project(creator.id, Category::Technology, 10_000);
    let project_id = project.id;
    let reward = Reward {
        id: Uuid::now_v7(),
        project_id,
        amount: 15_000,
        title: "Producer credit".into(),
        description: String::new(),
        created_at: Utc::now(),
    };
    let backing = Backing {
        id: Uuid::now_v7(),
        reward_id: reward.id,
        user_id: backer,
        created_at: Utc::now(),
    };
    let (reward_id, backing_id) = (reward.id, backing.id);

    let mut repo = MockProjectRepo::new();
    repo.expect_get_project()
        .with(eq(project_id))
        .returning(move |_| Ok(Some(project.clone())));
    repo.expect_pledged_total().with(eq(project_id)).returning(|_| Ok(15_000));
    repo.expect_list_rewards().returning(move |_| Ok(vec![reward.clone()]));
    repo.expect_list_backings().returning(move |_| Ok(vec![backing.clone()]));
    repo.expect_get_user().returning(move |_| Ok(Some(creator.clone())));

    let (status, body) = get(repo, &format!("/api/projects/{project_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["project"]["percentage_funded"], 150.0);
    assert_eq!(body["project"]["id"], project_id.to_string());
    assert_eq!(body["rewards"][reward_id.to_string()]["amount"], 15_000);
    assert_eq!(body["backings"][backing_id.to_string()]["user_id"], backer.to_string());
    assert_eq!(body["user"]["name"], "Creator");
}

#[actix_web::test]
async fn test_missing_project_is_404() {
    let mut repo = MockProjectRepo::new();
    repo.expect_get_project().returning(|_| Ok(None));
    repo.expect_pledged_total().never();

    let (status, body) = get(repo, &format!("/api/projects/{}", Uuid::now_v7())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["errors"][0].as_str().unwrap().starts_with("Project not found"));
}

#[actix_web::test]
async fn test_storage_failure_is_redacted_500() {
    let mut repo = MockProjectRepo::new();
    repo.expect_pledged_totals()
        .returning(|| Err(anyhow::anyhow!("disk I/O error at /var/lib/rusty_fund.db")));

    let (status, body) = get(repo, "/api/projects").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["errors"][0], "internal server error");
}

#[actix_web::test]
async fn test_user_show_lists_created_and_backed_projects() {
    let user = sample_user();
    let user_id = user.id;
    let created = sample_project(user_id, Category::Art, 200);
    let backed = sample_project(Uuid::now_v7(), Category::Fashion, 400);
    let (created_id, backed_id) = (created.id, backed.id);
    let all = vec![created.clone(), backed.clone()];

    let mut repo = MockProjectRepo::new();
    repo.expect_get_user().with(eq(user_id)).returning(move |_| Ok(Some(user.clone())));
    repo.expect_pledged_totals()
        .returning(move || Ok(HashMap::from([(backed_id, 100)])));
    repo.expect_list_projects().returning(move || Ok(all.clone()));
    repo.expect_list_backed_projects().returning(move |_| Ok(vec![backed.clone()]));
    repo.expect_list_created_projects().returning(move |_| Ok(vec![created.clone()]));
    repo.expect_list_backed_rewards().returning(|_| Ok(vec![]));
    repo.expect_list_user_backings().returning(|_| Ok(vec![]));

    let (status, body) = get(repo, &format!("/api/users/{user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backed_projects"][backed_id.to_string()]["percentage_funded"], 25.0);
    assert_eq!(body["created_projects"][created_id.to_string()]["percentage_funded"], 0.0);
    assert_eq!(body["user"]["email"], "creator@example.com");
}
