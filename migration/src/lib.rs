pub use sea_orm_migration::prelude::*;

mod m20260105_000001_employee_directory;
mod m20260105_000002_compensation;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_employee_directory::Migration),
            Box::new(m20260105_000002_compensation::Migration),
        ]
    }
}
