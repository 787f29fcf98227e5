//! Integration tests for the CRM repositories and the studio configuration
//! singleton.

use sqlx::PgPool;

use atelier_db::models::availability_template::UpsertTemplate;
use atelier_db::models::company::{CreateCompany, UpdateCompany};
use atelier_db::models::contact::CreateContact;
use atelier_db::models::studio_config::UpdateStudioConfig;
use atelier_db::repositories::{
    AvailabilityTemplateRepo, CompanyRepo, ContactRepo, StudioConfigRepo,
};
use atelier_core::availability::TemplateSlot;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_company(name: &str) -> CreateCompany {
    CreateCompany {
        name: name.to_string(),
        website: None,
        notes: None,
    }
}

fn new_contact(first: &str, company_id: Option<i64>) -> CreateContact {
    CreateContact {
        first_name: first.to_string(),
        last_name: "Lovelace".to_string(),
        email: None,
        phone: None,
        company_id,
        notes: None,
    }
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn soft_deleted_companies_vanish_from_reads(pool: PgPool) {
    let company = CompanyRepo::create(&pool, &new_company("Acme")).await.unwrap();

    assert!(CompanyRepo::soft_delete(&pool, company.id).await.unwrap());
    assert!(CompanyRepo::find_by_id(&pool, company.id)
        .await
        .unwrap()
        .is_none());
    assert!(CompanyRepo::list(&pool).await.unwrap().is_empty());

    // Double delete reports nothing to do.
    assert!(!CompanyRepo::soft_delete(&pool, company.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn company_partial_update_keeps_unset_fields(pool: PgPool) {
    let company = CompanyRepo::create(&pool, &new_company("Acme")).await.unwrap();

    let updated = CompanyRepo::update(
        &pool,
        company.id,
        &UpdateCompany {
            notes: Some("Key account".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("company must exist");

    assert_eq!(updated.name, "Acme");
    assert_eq!(updated.notes.as_deref(), Some("Key account"));
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_company_nulls_contact_references(pool: PgPool) {
    let company = CompanyRepo::create(&pool, &new_company("Acme")).await.unwrap();
    let contact = ContactRepo::create(&pool, &new_contact("Ada", Some(company.id)))
        .await
        .unwrap();
    assert_eq!(contact.company_id, Some(company.id));

    // Hard-delete the company row; the FK is ON DELETE SET NULL.
    sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(company.id)
        .execute(&pool)
        .await
        .unwrap();

    let contact = ContactRepo::find_by_id(&pool, contact.id)
        .await
        .unwrap()
        .expect("contact must survive");
    assert_eq!(contact.company_id, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn contact_list_filters_by_company(pool: PgPool) {
    let company = CompanyRepo::create(&pool, &new_company("Acme")).await.unwrap();
    ContactRepo::create(&pool, &new_contact("Ada", Some(company.id)))
        .await
        .unwrap();
    ContactRepo::create(&pool, &new_contact("Grace", None))
        .await
        .unwrap();

    let all = ContactRepo::list(&pool, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let filtered = ContactRepo::list(&pool, Some(company.id)).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].first_name, "Ada");
}

// ---------------------------------------------------------------------------
// Studio configuration and templates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn seeded_studio_config_has_defaults(pool: PgPool) {
    let config = StudioConfigRepo::get(&pool).await.unwrap();
    assert_eq!(config.user_display_mode, "30min");
    assert!(!config.allow_multiple_time_slots);
    assert_eq!(config.timezone, "Europe/Brussels");
}

#[sqlx::test(migrations = "./migrations")]
async fn studio_config_partial_update(pool: PgPool) {
    let updated = StudioConfigRepo::update(
        &pool,
        &UpdateStudioConfig {
            user_display_mode: Some("1hour".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.user_display_mode, "1hour");
    assert_eq!(updated.timezone, "Europe/Brussels");
}

#[sqlx::test(migrations = "./migrations")]
async fn seeded_templates_cover_the_whole_week(pool: PgPool) {
    let templates = AvailabilityTemplateRepo::list(&pool).await.unwrap();
    assert_eq!(templates.len(), 7);

    let weekdays: Vec<i16> = templates.iter().map(|t| t.weekday).collect();
    assert_eq!(weekdays, vec![0, 1, 2, 3, 4, 5, 6]);

    // Sunday (0) closed, Monday (1) open with 48 buckets.
    assert!(!templates[0].is_active);
    assert!(templates[1].is_active);
    assert_eq!(templates[1].time_slots.0.len(), 48);
}

#[sqlx::test(migrations = "./migrations")]
async fn template_upsert_replaces_a_weekday(pool: PgPool) {
    let replaced = AvailabilityTemplateRepo::upsert(
        &pool,
        0,
        &UpsertTemplate {
            is_active: true,
            time_slots: vec![TemplateSlot {
                slot: "10:00".to_string(),
                active: true,
            }],
        },
    )
    .await
    .unwrap();

    assert!(replaced.is_active);
    assert_eq!(replaced.time_slots.0.len(), 1);

    let fetched = AvailabilityTemplateRepo::find_by_weekday(&pool, 0)
        .await
        .unwrap()
        .expect("weekday 0 must exist");
    assert_eq!(fetched.time_slots.0[0].slot, "10:00");
}
