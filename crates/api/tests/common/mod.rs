#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use pressdesk_api::auth::jwt::{generate_access_token, JwtConfig};
use pressdesk_api::auth::password::hash_password;
use pressdesk_api::config::ServerConfig;
use pressdesk_api::router::build_app_router;
use pressdesk_api::state::AppState;
use pressdesk_core::deadlines::steps::ContentTrack;
use pressdesk_core::types::DbId;
use pressdesk_db::models::action::CreateAction;
use pressdesk_db::models::campaign::CreateCampaign;
use pressdesk_db::models::campaign_action::CreateCampaignAction;
use pressdesk_db::models::company::CreateCompany;
use pressdesk_db::models::magazine_edition::CreateMagazineEdition;
use pressdesk_db::models::medium::CreateMedium;
use pressdesk_db::models::user::{CreateUser, User};
use pressdesk_db::repositories::{
    ActionRepo, CampaignActionRepo, CampaignRepo, CompanyRepo, MagazineEditionRepo, MediumRepo,
    UserRepo,
};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "cierre-de-edicion";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and the given roles.
pub async fn create_user(pool: &PgPool, name: &str, roles: &[&str]) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            surname: None,
            email: format!("{}@pressdesk.test", name.to_lowercase()),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        },
    )
    .await
    .unwrap()
}

/// Issue an access token for a user without going through login.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.roles, &test_config().jwt).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One user per role plus their tokens.
pub struct Team {
    pub admin: User,
    pub admin_token: String,
    pub comercial: User,
    pub comercial_token: String,
    pub post_venta: User,
    pub post_venta_token: String,
    pub analista_token: String,
}

pub async fn team(pool: &PgPool) -> Team {
    let admin = create_user(pool, "Admin", &["admin"]).await;
    let comercial = create_user(pool, "Carla", &["comercial"]).await;
    let post_venta = create_user(pool, "Pablo", &["post-venta"]).await;
    let analista = create_user(pool, "Ana", &["analista"]).await;
    Team {
        admin_token: token_for(&admin),
        comercial_token: token_for(&comercial),
        post_venta_token: token_for(&post_venta),
        analista_token: token_for(&analista),
        admin,
        comercial,
        post_venta,
    }
}

/// An edition holding one technical article and one ad.
pub struct Newsroom {
    pub medium_id: DbId,
    pub edition_id: DbId,
    pub campaign_id: DbId,
    pub technical_action_id: DbId,
    pub ad_action_id: DbId,
    pub article_type_id: DbId,
    pub ad_type_id: DbId,
}

pub async fn create_edition(pool: &PgPool, medium_id: DbId, publication_date: NaiveDate) -> DbId {
    MagazineEditionRepo::create(
        pool,
        &CreateMagazineEdition {
            medium_id,
            publication_date,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn add_action(
    pool: &PgPool,
    campaign_id: DbId,
    medium_id: DbId,
    action_id: DbId,
    edition_id: Option<DbId>,
) -> DbId {
    CampaignActionRepo::create(
        pool,
        &CreateCampaignAction {
            campaign_id,
            medium_id,
            action_id,
            edition_id,
            quantity: None,
            start_date: None,
            end_date: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn newsroom(pool: &PgPool, owner: &User) -> Newsroom {
    let medium = MediumRepo::create(pool, &CreateMedium { name: "Revista Industria".into() })
        .await
        .unwrap();
    let company = CompanyRepo::create(
        pool,
        &CreateCompany {
            name: "Acme".into(),
            tax_number: None,
            billing_country: None,
        },
    )
    .await
    .unwrap();
    let article = ActionRepo::create(
        pool,
        &CreateAction {
            name: "Artículo técnico".into(),
            magazine_content_type: Some(ContentTrack::Technical),
        },
    )
    .await
    .unwrap();
    let ad = ActionRepo::create(
        pool,
        &CreateAction {
            name: "Anuncio".into(),
            magazine_content_type: Some(ContentTrack::Ad),
        },
    )
    .await
    .unwrap();
    let campaign = CampaignRepo::create(
        pool,
        &CreateCampaign {
            name: "Campaña 2025".into(),
            description: None,
            company_id: company.id,
            created_by: owner.id,
        },
    )
    .await
    .unwrap();

    let edition_id = create_edition(pool, medium.id, date(2025, 6, 2)).await;
    let technical_action_id =
        add_action(pool, campaign.id, medium.id, article.id, Some(edition_id)).await;
    let ad_action_id = add_action(pool, campaign.id, medium.id, ad.id, Some(edition_id)).await;

    Newsroom {
        medium_id: medium.id,
        edition_id,
        campaign_id: campaign.id,
        technical_action_id,
        ad_action_id,
        article_type_id: article.id,
        ad_type_id: ad.id,
    }
}

pub fn confirm_uri(campaign_action_id: DbId) -> String {
    format!("/api/v1/magazine-deadlines/campaign-action/{campaign_action_id}/confirm")
}

/// Confirm a step through the API, asserting success.
pub async fn confirm(
    app: Router,
    campaign_action_id: DbId,
    deadline_type: &str,
    link: Option<&str>,
    token: &str,
) -> Value {
    let body = serde_json::json!({ "deadline_type": deadline_type, "link": link });
    let response = post_json_auth(app, &confirm_uri(campaign_action_id), body, token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED, "confirm {deadline_type}");
    body_json(response).await
}
