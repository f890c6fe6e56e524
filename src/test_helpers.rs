//! Test helpers for unit tests that need a real database.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::db::connect_with_url;
use crate::models::{restaurant_profile, user};

/// Create an in-memory SQLite database with all migrations applied
pub async fn create_test_db() -> DatabaseConnection {
    connect_with_url("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

pub async fn create_test_user(db: &DatabaseConnection, email: &str, tier: &str) -> user::Model {
    let now = Utc::now();
    user::ActiveModel {
        email: Set(email.to_string()),
        full_name: Set(None),
        subscription_tier: Set(tier.to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test user")
}

pub async fn create_test_profile(
    db: &DatabaseConnection,
    owner_id: i64,
    name: &str,
) -> restaurant_profile::Model {
    let now = Utc::now();
    restaurant_profile::ActiveModel {
        owner_id: Set(owner_id),
        restaurant_name: Set(name.to_string()),
        concept_description: Set(None),
        cuisine_type: Set(Some("Thai".to_string())),
        target_audience: Set(None),
        price_range: Set(Some("$$".to_string())),
        business_type: Set("new".to_string()),
        is_local_brand: Set(false),
        street_address: Set(None),
        city: Set(Some("Bangkok".to_string())),
        district: Set(None),
        latitude: Set(Some(13.7563)),
        longitude: Set(Some(100.5018)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test profile")
}
