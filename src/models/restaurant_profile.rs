use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurant_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub restaurant_name: String,
    pub concept_description: Option<String>,
    pub cuisine_type: Option<String>,
    pub target_audience: Option<String>,
    pub price_range: Option<String>,
    /// new, existing
    pub business_type: String,
    pub is_local_brand: bool,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::research_project::Entity")]
    ResearchProjects,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::research_project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResearchProjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
