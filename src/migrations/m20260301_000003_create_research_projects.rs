//! Migration: Create research_projects table

use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_users::Users;
use super::m20260301_000002_create_restaurant_profiles::RestaurantProfiles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let flag = |col: ResearchProjects| {
            ColumnDef::new(col)
                .boolean()
                .not_null()
                .default(false)
                .to_owned()
        };

        manager
            .create_table(
                Table::create()
                    .table(ResearchProjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResearchProjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ResearchProjects::OwnerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ResearchProjects::RestaurantProfileId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ResearchProjects::Name).string().not_null())
                    .col(ColumnDef::new(ResearchProjects::Description).string().null())
                    .col(
                        ColumnDef::new(ResearchProjects::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(ResearchProjects::Progress)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(flag(ResearchProjects::CompetitiveAnalysis))
                    .col(flag(ResearchProjects::MarketSizing))
                    .col(flag(ResearchProjects::DemographicAnalysis))
                    .col(flag(ResearchProjects::LocationIntelligence))
                    .col(flag(ResearchProjects::TouristAnalysis))
                    .col(flag(ResearchProjects::LocalCompetition))
                    .col(flag(ResearchProjects::PricingStrategy))
                    .col(flag(ResearchProjects::FoodDeliveryAnalysis))
                    .col(ColumnDef::new(ResearchProjects::Results).text().null())
                    .col(ColumnDef::new(ResearchProjects::ErrorDetail).text().null())
                    .col(
                        ColumnDef::new(ResearchProjects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResearchProjects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResearchProjects::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_research_projects_owner")
                            .from(ResearchProjects::Table, ResearchProjects::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_research_projects_profile")
                            .from(ResearchProjects::Table, ResearchProjects::RestaurantProfileId)
                            .to(RestaurantProfiles::Table, RestaurantProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_research_projects_owner_id")
                    .table(ResearchProjects::Table)
                    .col(ResearchProjects::OwnerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_research_projects_status")
                    .table(ResearchProjects::Table)
                    .col(ResearchProjects::Status)
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
                    .table(ResearchProjects::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden, Clone, Copy)]
#[iden = "research_projects"]
pub enum ResearchProjects {
    Table,
    Id,
    #[iden = "owner_id"]
    OwnerId,
    #[iden = "restaurant_profile_id"]
    RestaurantProfileId,
    Name,
    Description,
    Status,
    Progress,
    #[iden = "competitive_analysis"]
    CompetitiveAnalysis,
    #[iden = "market_sizing"]
    MarketSizing,
    #[iden = "demographic_analysis"]
    DemographicAnalysis,
    #[iden = "location_intelligence"]
    LocationIntelligence,
    #[iden = "tourist_analysis"]
    TouristAnalysis,
    #[iden = "local_competition"]
    LocalCompetition,
    #[iden = "pricing_strategy"]
    PricingStrategy,
    #[iden = "food_delivery_analysis"]
    FoodDeliveryAnalysis,
    Results,
    #[iden = "error_detail"]
    ErrorDetail,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
    #[iden = "completed_at"]
    CompletedAt,
}
