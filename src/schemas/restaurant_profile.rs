use serde::Deserialize;
use validator::Validate;

use crate::services::analysis::{NewRestaurantProfile, RestaurantProfileChanges};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRestaurantProfile {
    #[validate(length(min = 1, max = 200))]
    pub restaurant_name: String,
    #[validate(length(max = 2000))]
    pub concept_description: Option<String>,
    #[validate(length(max = 100))]
    pub cuisine_type: Option<String>,
    #[validate(length(max = 500))]
    pub target_audience: Option<String>,
    #[validate(length(max = 50))]
    pub price_range: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub business_type: Option<String>,
    pub is_local_brand: Option<bool>,
    #[validate(length(max = 500))]
    pub street_address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub district: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

impl CreateRestaurantProfile {
    pub fn into_new(self, owner_id: i64) -> NewRestaurantProfile {
        NewRestaurantProfile {
            owner_id,
            restaurant_name: self.restaurant_name,
            concept_description: self.concept_description,
            cuisine_type: self.cuisine_type,
            target_audience: self.target_audience,
            price_range: self.price_range,
            business_type: self.business_type,
            is_local_brand: self.is_local_brand,
            street_address: self.street_address,
            city: self.city,
            district: self.district,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Omitted fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRestaurantProfile {
    #[validate(length(min = 1, max = 200))]
    pub restaurant_name: Option<String>,
    #[validate(length(max = 2000))]
    pub concept_description: Option<String>,
    #[validate(length(max = 100))]
    pub cuisine_type: Option<String>,
    #[validate(length(max = 500))]
    pub target_audience: Option<String>,
    #[validate(length(max = 50))]
    pub price_range: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub business_type: Option<String>,
    pub is_local_brand: Option<bool>,
    #[validate(length(max = 500))]
    pub street_address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub district: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

impl From<UpdateRestaurantProfile> for RestaurantProfileChanges {
    fn from(req: UpdateRestaurantProfile) -> Self {
        RestaurantProfileChanges {
            restaurant_name: req.restaurant_name,
            concept_description: req.concept_description,
            cuisine_type: req.cuisine_type,
            target_audience: req.target_audience,
            price_range: req.price_range,
            business_type: req.business_type,
            is_local_brand: req.is_local_brand,
            street_address: req.street_address,
            city: req.city,
            district: req.district,
            latitude: req.latitude,
            longitude: req.longitude,
        }
    }
}

/// Narrows `GET /reports/by-type/{report_type}` to one project
#[derive(Debug, Clone, Deserialize)]
pub struct ReportProjectFilter {
    pub research_project_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_profile_minimal_body() {
        let req: CreateRestaurantProfile = serde_json::from_value(json!({
            "restaurant_name": "Baan Suan"
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let new = req.into_new(7);
        assert_eq!(new.owner_id, 7);
        assert_eq!(new.business_type, None);
        assert_eq!(new.is_local_brand, None);
    }

    #[test]
    fn test_create_profile_rejects_out_of_range_coordinates() {
        let req: CreateRestaurantProfile = serde_json::from_value(json!({
            "restaurant_name": "Baan Suan",
            "latitude": 91.0,
            "longitude": 100.5
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("latitude"));
        assert!(!errors.field_errors().contains_key("longitude"));
    }

    #[test]
    fn test_update_profile_rejects_empty_name() {
        let req: UpdateRestaurantProfile = serde_json::from_value(json!({
            "restaurant_name": ""
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_profile_converts_to_changes() {
        let req: UpdateRestaurantProfile = serde_json::from_value(json!({
            "city": "Chiang Mai",
            "is_local_brand": false
        }))
        .unwrap();
        let changes = RestaurantProfileChanges::from(req);
        assert_eq!(changes.city.as_deref(), Some("Chiang Mai"));
        assert_eq!(changes.is_local_brand, Some(false));
        assert!(changes.restaurant_name.is_none());
    }
}
