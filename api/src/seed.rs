//! Demo org chart fixtures.

use entity::employee;
use platform_db::DbPool;
use sea_orm::{ActiveValue::Set, DbErr, EntityTrait};
use uuid::{Uuid, uuid};

pub const LENNON: Uuid = uuid!("16a596ae-edd3-4847-99fe-c4518e82c86f");
pub const MCCARTNEY: Uuid = uuid!("b7839309-3348-463b-a7e3-5de1c168beb3");
pub const STARR: Uuid = uuid!("03aa1462-ffa9-4978-901b-7c001562cf6f");
pub const BEST: Uuid = uuid!("62c1084e-6e34-4630-93fd-9153afb65309");
pub const HARRISON: Uuid = uuid!("c0c2293d-16bd-4603-8e08-638a9d18b22c");

fn member(
    id: Uuid,
    first: &str,
    last: &str,
    position: &str,
    manager: Option<Uuid>,
    rank: Option<i32>,
) -> employee::ActiveModel {
    employee::ActiveModel {
        id: Set(id),
        first_name: Set(first.to_string()),
        last_name: Set(last.to_string()),
        position: Set(position.to_string()),
        department: Set("Engineering".to_string()),
        manager_id: Set(manager),
        report_order: Set(rank),
    }
}

/// Insert the demo org chart. A no-op when the root is already present.
pub async fn seed_demo_org(db: &DbPool) -> Result<(), DbErr> {
    if employee::Entity::find_by_id(LENNON).one(db).await?.is_some() {
        return Ok(());
    }
    employee::Entity::insert_many([
        member(LENNON, "John", "Lennon", "Development Manager", None, None),
        member(MCCARTNEY, "Paul", "McCartney", "Developer I", Some(LENNON), Some(0)),
        member(STARR, "Ringo", "Starr", "Developer V", Some(LENNON), Some(1)),
        member(BEST, "Pete", "Best", "Developer II", Some(STARR), Some(0)),
        member(HARRISON, "George", "Harrison", "Developer III", Some(STARR), Some(1)),
    ])
    .exec(db)
    .await?;
    Ok(())
}
