//! Migration: Create restaurant_profiles table

use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RestaurantProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RestaurantProfiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RestaurantProfiles::OwnerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RestaurantProfiles::RestaurantName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RestaurantProfiles::ConceptDescription).string().null())
                    .col(ColumnDef::new(RestaurantProfiles::CuisineType).string().null())
                    .col(ColumnDef::new(RestaurantProfiles::TargetAudience).string().null())
                    .col(ColumnDef::new(RestaurantProfiles::PriceRange).string().null())
                    .col(
                        ColumnDef::new(RestaurantProfiles::BusinessType)
                            .string()
                            .not_null()
                            .default("new"),
                    )
                    .col(
                        ColumnDef::new(RestaurantProfiles::IsLocalBrand)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(RestaurantProfiles::StreetAddress).string().null())
                    .col(ColumnDef::new(RestaurantProfiles::City).string().null())
                    .col(ColumnDef::new(RestaurantProfiles::District).string().null())
                    .col(ColumnDef::new(RestaurantProfiles::Latitude).double().null())
                    .col(ColumnDef::new(RestaurantProfiles::Longitude).double().null())
                    .col(
                        ColumnDef::new(RestaurantProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RestaurantProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_profiles_owner")
                            .from(RestaurantProfiles::Table, RestaurantProfiles::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_profiles_owner_id")
                    .table(RestaurantProfiles::Table)
                    .col(RestaurantProfiles::OwnerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(RestaurantProfiles::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "restaurant_profiles"]
pub enum RestaurantProfiles {
    Table,
    Id,
    #[iden = "owner_id"]
    OwnerId,
    #[iden = "restaurant_name"]
    RestaurantName,
    #[iden = "concept_description"]
    ConceptDescription,
    #[iden = "cuisine_type"]
    CuisineType,
    #[iden = "target_audience"]
    TargetAudience,
    #[iden = "price_range"]
    PriceRange,
    #[iden = "business_type"]
    BusinessType,
    #[iden = "is_local_brand"]
    IsLocalBrand,
    #[iden = "street_address"]
    StreetAddress,
    City,
    District,
    Latitude,
    Longitude,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
