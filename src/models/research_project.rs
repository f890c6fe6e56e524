use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "research_projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub restaurant_profile_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// pending, in_progress, completed, errored
    pub status: String,
    pub progress: i32,

    // Research goals
    pub competitive_analysis: bool,
    pub market_sizing: bool,
    pub demographic_analysis: bool,
    pub location_intelligence: bool,
    pub tourist_analysis: bool,
    pub local_competition: bool,
    pub pricing_strategy: bool,
    pub food_delivery_analysis: bool,

    pub results: Option<String>, // JSON object keyed by stage
    pub error_detail: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub completed_at: Option<DateTimeUtc>,
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
    #[sea_orm(
        belongs_to = "super::restaurant_profile::Entity",
        from = "Column::RestaurantProfileId",
        to = "super::restaurant_profile::Column::Id",
        on_delete = "Cascade"
    )]
    RestaurantProfile,
    #[sea_orm(has_many = "super::report::Entity")]
    Reports,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::restaurant_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RestaurantProfile.def()
    }
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
