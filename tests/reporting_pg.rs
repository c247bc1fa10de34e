use api::domain::{Compensation, Employee};
use api::{seed, service};
use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use platform_db::DbPool;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};
use url::Url;
use uuid::Uuid;

struct PgTestContext {
    db: DbPool,
    admin_url: String,
    db_name: String,
}

impl PgTestContext {
    /// Provision a throwaway database from `TEST_DATABASE_URL`; `None` when
    /// the variable is unset or the server is unreachable.
    async fn new() -> Option<Self> {
        let base = std::env::var("TEST_DATABASE_URL").ok()?;
        let (admin_url, db_name, test_url) = build_urls(&base)?;
        let admin = Database::connect(&admin_url).await.ok()?;
        let drop_sql = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE);", db_name);
        let create_sql = format!("CREATE DATABASE \"{}\";", db_name);
        let _ = admin
            .execute(Statement::from_string(DatabaseBackend::Postgres, drop_sql))
            .await;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                create_sql,
            ))
            .await
            .ok()?;
        let db = Database::connect(&test_url).await.ok()?;
        Migrator::up(&db, None).await.ok()?;
        Some(Self {
            db,
            admin_url,
            db_name,
        })
    }

    async fn cleanup(self) {
        let Self {
            db,
            admin_url,
            db_name,
        } = self;
        drop(db);
        if let Ok(admin) = Database::connect(&admin_url).await {
            let drop_sql = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE);", db_name);
            let _ = admin
                .execute(Statement::from_string(DatabaseBackend::Postgres, drop_sql))
                .await;
        }
    }
}

fn build_urls(base: &str) -> Option<(String, String, String)> {
    let url = Url::parse(base).ok()?;
    let db_path = url.path().trim_start_matches('/').to_string();
    let base_name = if db_path.is_empty() {
        "org_directory_test".to_string()
    } else {
        db_path
    };
    let db_name = format!("{}_{}", base_name, Uuid::new_v4().simple());
    let mut admin_url = url.clone();
    admin_url.set_path("/postgres");
    let mut test_url = url.clone();
    test_url.set_path(&format!("/{}", db_name));
    Some((admin_url.to_string(), db_name, test_url.to_string()))
}

#[tokio::test]
async fn seeded_org_round_trips_through_the_service() {
    let Some(ctx) = PgTestContext::new().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    seed::seed_demo_org(&ctx.db).await.unwrap();

    let structure = service::get_reporting_structure(&ctx.db, seed::LENNON)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(structure.number_of_reports, 4);
    assert_eq!(structure.employee.first_name, "John");

    let leaf = service::get_reporting_structure(&ctx.db, seed::MCCARTNEY)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(leaf.number_of_reports, 0);

    let starr = service::get_reporting_structure(&ctx.db, seed::STARR)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(starr.number_of_reports, 2);

    // Replace keeps the id and drops the reports.
    let original = platform_db::find_employee(&ctx.db, seed::LENNON)
        .await
        .unwrap()
        .unwrap();
    let replacement = Employee {
        employee_id: None,
        first_name: "John".into(),
        last_name: "Lennon".into(),
        position: "CEO".into(),
        department: "Executive".into(),
        direct_reports: None,
    };
    let replaced = service::replace_employee(&ctx.db, original, replacement)
        .await
        .unwrap();
    assert_eq!(replaced.employee_id, Some(seed::LENNON));
    let after = service::get_reporting_structure(&ctx.db, seed::LENNON)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.number_of_reports, 0);

    // Compensation round trip.
    let compensation = Compensation {
        employee: seed::STARR,
        salary: 123_456,
        effective_date: NaiveDate::from_ymd_opt(2014, 10, 6).unwrap(),
    };
    service::create_compensation(&ctx.db, compensation)
        .await
        .unwrap();
    let read = service::get_compensation_by_employee_id(&ctx.db, seed::STARR)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read.salary, 123_456);
    assert_eq!(
        read.effective_date,
        NaiveDate::from_ymd_opt(2014, 10, 6).unwrap()
    );

    ctx.cleanup().await;
}
