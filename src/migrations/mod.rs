pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_restaurant_profiles;
mod m20260301_000003_create_research_projects;
mod m20260301_000004_create_reports;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_restaurant_profiles::Migration),
            Box::new(m20260301_000003_create_research_projects::Migration),
            Box::new(m20260301_000004_create_reports::Migration),
        ]
    }
}
