use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: Option<String>,
    /// free, pro, enterprise
    pub subscription_tier: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::restaurant_profile::Entity")]
    RestaurantProfiles,
    #[sea_orm(has_many = "super::research_project::Entity")]
    ResearchProjects,
}

impl Related<super::restaurant_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RestaurantProfiles.def()
    }
}

impl Related<super::research_project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResearchProjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
