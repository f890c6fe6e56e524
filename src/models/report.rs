use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub research_project_id: i64,
    pub name: String,
    pub report_type: String,
    pub format: String,
    pub data: Option<String>, // JSON payload
    pub file_path: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::research_project::Entity",
        from = "Column::ResearchProjectId",
        to = "super::research_project::Column::Id",
        on_delete = "Cascade"
    )]
    ResearchProject,
}

impl Related<super::research_project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResearchProject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
