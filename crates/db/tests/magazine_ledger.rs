//! Integration tests for the edition and confirmation ledger repositories.

use chrono::NaiveDate;
use pressdesk_core::deadlines::ledger::ActiveConfirmations;
use pressdesk_core::deadlines::steps::{ContentTrack, DeadlineType};
use pressdesk_db::models::action::CreateAction;
use pressdesk_db::models::campaign::CreateCampaign;
use pressdesk_db::models::campaign_action::CreateCampaignAction;
use pressdesk_db::models::company::CreateCompany;
use pressdesk_db::models::deadline_confirmation::CreateDeadlineConfirmation;
use pressdesk_db::models::magazine_edition::CreateMagazineEdition;
use pressdesk_db::models::medium::CreateMedium;
use pressdesk_db::models::user::CreateUser;
use pressdesk_db::repositories::{
    ActionRepo, CampaignActionRepo, CampaignRepo, CompanyRepo, DeadlineConfirmationRepo,
    MagazineEditionRepo, MediumRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Fixture {
    user_id: i64,
    edition_id: i64,
    medium_id: i64,
    technical_action_id: i64,
    ad_action_id: i64,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed(pool: &PgPool) -> Fixture {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Lucía".to_string(),
            surname: Some("Pérez".to_string()),
            email: "lucia@example.com".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            roles: vec!["comercial".to_string()],
        },
    )
    .await
    .unwrap();
    let medium = MediumRepo::create(pool, &CreateMedium { name: "Revista Industria".into() })
        .await
        .unwrap();
    let company = CompanyRepo::create(
        pool,
        &CreateCompany {
            name: "Acme".into(),
            tax_number: None,
            billing_country: Some("Spain".into()),
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
            created_by: user.id,
        },
    )
    .await
    .unwrap();
    let edition = MagazineEditionRepo::create(
        pool,
        &CreateMagazineEdition {
            medium_id: medium.id,
            publication_date: date(2025, 6, 2),
        },
    )
    .await
    .unwrap();

    let mut action_ids = Vec::new();
    for action_id in [article.id, ad.id] {
        let ca = CampaignActionRepo::create(
            pool,
            &CreateCampaignAction {
                campaign_id: campaign.id,
                medium_id: medium.id,
                action_id,
                edition_id: Some(edition.id),
                quantity: None,
                start_date: None,
                end_date: None,
            },
        )
        .await
        .unwrap();
        action_ids.push(ca.id);
    }

    Fixture {
        user_id: user.id,
        edition_id: edition.id,
        medium_id: medium.id,
        technical_action_id: action_ids[0],
        ad_action_id: action_ids[1],
    }
}

async fn confirm(pool: &PgPool, f: &Fixture, action_id: i64, t: DeadlineType, link: Option<&str>) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await.unwrap();
    let id = DeadlineConfirmationRepo::create(
        &mut tx,
        &CreateDeadlineConfirmation {
            campaign_action_id: action_id,
            deadline_type: t.as_str().to_string(),
            confirmed_by: f.user_id,
            link: link.map(str::to_string),
        },
    )
    .await?;
    tx.commit().await.unwrap();
    Ok(id)
}

fn constraint_of(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.constraint().map(str::to_string),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Editions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_new_edition_is_draft_with_medium_name(pool: PgPool) {
    let f = seed(&pool).await;
    let edition = MagazineEditionRepo::find_by_id(&pool, f.edition_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edition.status, "draft");
    assert!(!edition.is_completed);
    assert_eq!(edition.publication_link, None);
    assert_eq!(edition.medium_name, "Revista Industria");

    let by_medium = MagazineEditionRepo::list_by_medium(&pool, f.medium_id).await.unwrap();
    assert_eq!(by_medium.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_edition_date_violates_unique(pool: PgPool) {
    let f = seed(&pool).await;
    let err = MagazineEditionRepo::create(
        &pool,
        &CreateMagazineEdition {
            medium_id: f.medium_id,
            publication_date: date(2025, 6, 2),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(constraint_of(&err).as_deref(), Some("uq_magazine_editions_medium_date"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_editions_are_listed_by_publication_date(pool: PgPool) {
    let f = seed(&pool).await;
    MagazineEditionRepo::create(
        &pool,
        &CreateMagazineEdition {
            medium_id: f.medium_id,
            publication_date: date(2025, 5, 5),
        },
    )
    .await
    .unwrap();
    let dates: Vec<_> = MagazineEditionRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.publication_date)
        .collect();
    assert_eq!(dates, vec![date(2025, 5, 5), date(2025, 6, 2)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_complete_and_reopen(pool: PgPool) {
    let f = seed(&pool).await;
    let mut tx = pool.begin().await.unwrap();
    MagazineEditionRepo::complete(&mut tx, f.edition_id, "https://issue.example/6")
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let edition = MagazineEditionRepo::find_by_id(&pool, f.edition_id).await.unwrap().unwrap();
    assert!(edition.is_completed);
    assert_eq!(edition.status, "published");
    assert_eq!(edition.publication_link.as_deref(), Some("https://issue.example/6"));

    let mut tx = pool.begin().await.unwrap();
    MagazineEditionRepo::reopen(&mut tx, f.edition_id, "active").await.unwrap();
    tx.commit().await.unwrap();

    let edition = MagazineEditionRepo::find_by_id(&pool, f.edition_id).await.unwrap().unwrap();
    assert!(!edition.is_completed);
    assert_eq!(edition.status, "active");
    assert_eq!(edition.publication_link, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edition_view_carries_tracks(pool: PgPool) {
    let f = seed(&pool).await;
    let rows = CampaignActionRepo::list_for_edition(&pool, f.edition_id).await.unwrap();
    assert_eq!(rows.len(), 2);
    let tracks: Vec<_> = rows.iter().map(|r| r.track()).collect();
    assert!(tracks.contains(&Some(ContentTrack::Technical)));
    assert!(tracks.contains(&Some(ContentTrack::Ad)));
    assert!(rows.iter().all(|r| r.company_name == "Acme" && r.user_name == "Lucía"));
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirmation_round_trip(pool: PgPool) {
    let f = seed(&pool).await;
    confirm(&pool, &f, f.technical_action_id, DeadlineType::SendToEdition, Some("https://drive/x"))
        .await
        .unwrap();

    let rows = DeadlineConfirmationRepo::list_for_action(&pool, f.technical_action_id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].deadline_type, "send_to_edition");
    assert_eq!(rows[0].link.as_deref(), Some("https://drive/x"));
    assert!(!rows[0].reverted);
    assert_eq!(rows[0].confirmed_by_name, "Lucía");
    assert_eq!(rows[0].confirmed_by_email, "lucia@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_active_confirmation_is_rejected(pool: PgPool) {
    let f = seed(&pool).await;
    confirm(&pool, &f, f.ad_action_id, DeadlineType::Client, None).await.unwrap();
    let err = confirm(&pool, &f, f.ad_action_id, DeadlineType::Client, None)
        .await
        .unwrap_err();
    assert_eq!(constraint_of(&err).as_deref(), Some("uq_active_deadline_confirmation"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revert_preserves_history_and_allows_reconfirm(pool: PgPool) {
    let f = seed(&pool).await;
    let first = confirm(&pool, &f, f.ad_action_id, DeadlineType::Client, None).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let target = DeadlineConfirmationRepo::lock_for_revert(&mut tx, first)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(target.edition_id, Some(f.edition_id));
    assert!(DeadlineConfirmationRepo::mark_reverted(&mut tx, first, f.user_id).await.unwrap());
    assert!(!DeadlineConfirmationRepo::mark_reverted(&mut tx, first, f.user_id).await.unwrap());
    tx.commit().await.unwrap();

    confirm(&pool, &f, f.ad_action_id, DeadlineType::Client, None).await.unwrap();

    let rows = DeadlineConfirmationRepo::list_for_action(&pool, f.ad_action_id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].reverted);
    assert_eq!(rows[0].reverted_by, Some(f.user_id));
    assert_eq!(rows[0].reverted_by_name.as_deref(), Some("Lucía"));
    assert!(rows[0].reverted_at.is_some());
    assert!(!rows[1].reverted);

    let active = ActiveConfirmations::from_entries(&rows);
    assert!(active.is_confirmed(DeadlineType::Client));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_and_active_steps_per_edition(pool: PgPool) {
    let f = seed(&pool).await;
    let mut tx = pool.begin().await.unwrap();
    assert!(!MagazineEditionRepo::has_confirmation_history(&mut tx, f.edition_id).await.unwrap());
    tx.commit().await.unwrap();

    let id = confirm(&pool, &f, f.ad_action_id, DeadlineType::Client, None).await.unwrap();
    confirm(&pool, &f, f.technical_action_id, DeadlineType::Client, None).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    DeadlineConfirmationRepo::mark_reverted(&mut tx, id, f.user_id).await.unwrap();
    let active = DeadlineConfirmationRepo::active_for_edition(&mut tx, f.edition_id)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].campaign_action_id, f.technical_action_id);
    assert!(MagazineEditionRepo::has_confirmation_history(&mut tx, f.edition_id).await.unwrap());
    tx.commit().await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lock_reports_edition_state_and_move(pool: PgPool) {
    let f = seed(&pool).await;
    let other = MagazineEditionRepo::create(
        &pool,
        &CreateMagazineEdition {
            medium_id: f.medium_id,
            publication_date: date(2025, 7, 7),
        },
    )
    .await
    .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let locked = CampaignActionRepo::lock(&mut tx, f.ad_action_id).await.unwrap().unwrap();
    assert_eq!(locked.edition_id, Some(f.edition_id));
    assert_eq!(locked.edition_completed, Some(false));
    assert_eq!(locked.track(), Some(ContentTrack::Ad));
    assert!(CampaignActionRepo::move_to_edition(&mut tx, f.ad_action_id, other.id).await.unwrap());
    tx.commit().await.unwrap();

    let moved = CampaignActionRepo::find_by_id(&pool, f.ad_action_id).await.unwrap().unwrap();
    assert_eq!(moved.edition_id, Some(other.id));
}
