//! Migration: Create reports table

use sea_orm_migration::prelude::*;

use super::m20260301_000003_create_research_projects::ResearchProjects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reports::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reports::OwnerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Reports::ResearchProjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reports::Name).string().not_null())
                    .col(ColumnDef::new(Reports::ReportType).string().not_null())
                    .col(
                        ColumnDef::new(Reports::Format)
                            .string()
                            .not_null()
                            .default("json"),
                    )
                    .col(ColumnDef::new(Reports::Data).text().null())
                    .col(ColumnDef::new(Reports::FilePath).string().null())
                    .col(
                        ColumnDef::new(Reports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reports::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_research_project")
                            .from(Reports::Table, Reports::ResearchProjectId)
                            .to(ResearchProjects::Table, ResearchProjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_research_project_id")
                    .table(Reports::Table)
                    .col(Reports::ResearchProjectId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
#[iden = "reports"]
enum Reports {
    Table,
    Id,
    #[iden = "owner_id"]
    OwnerId,
    #[iden = "research_project_id"]
    ResearchProjectId,
    Name,
    #[iden = "report_type"]
    ReportType,
    Format,
    Data,
    #[iden = "file_path"]
    FilePath,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
