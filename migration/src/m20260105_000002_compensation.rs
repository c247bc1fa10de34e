use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Compensation {
    Table,
    EmployeeId,
    Salary,
    EffectiveDate,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    // No FK to employee: replacing an employee removes and reinserts the row
    // under the same id, and the compensation record is keyed by that id.
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Compensation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Compensation::EmployeeId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Compensation::Salary)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Compensation::EffectiveDate)
                            .date()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Compensation::Table).to_owned())
            .await
    }
}
