//! Domain types shared by the analysis pipeline, the stores and the HTTP layer.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stage results keyed by stage key (`market_sizing`, `demographics`, ...)
pub type ResultsMap = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Lifecycle status of a research project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Pending,
    InProgress,
    Completed,
    Errored,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Errored => "errored",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Errored)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProjectStatus::Pending),
            "in_progress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            "errored" => Ok(ProjectStatus::Errored),
            other => Err(ParseEnumError::new("project status", other)),
        }
    }
}

/// Research goals chosen when the project is created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisFlags {
    pub competitive_analysis: bool,
    pub market_sizing: bool,
    pub demographic_analysis: bool,
    pub location_intelligence: bool,
    pub tourist_analysis: bool,
    pub local_competition: bool,
    pub pricing_strategy: bool,
    pub food_delivery_analysis: bool,
}

/// Subscription level of a project owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Free,
    Pro,
    Enterprise,
}

impl SubscriptionTier {
    /// Unknown tier strings are treated as `Free`.
    pub fn from_tier_str(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "pro" => SubscriptionTier::Pro,
            "enterprise" => SubscriptionTier::Enterprise,
            _ => SubscriptionTier::Free,
        }
    }

    pub fn unlocks_premium(&self) -> bool {
        matches!(self, SubscriptionTier::Pro | SubscriptionTier::Enterprise)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub subscription_tier: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantProfile {
    pub id: i64,
    pub owner_id: i64,
    pub restaurant_name: String,
    pub concept_description: Option<String>,
    pub cuisine_type: Option<String>,
    pub target_audience: Option<String>,
    pub price_range: Option<String>,
    pub business_type: String,
    pub is_local_brand: bool,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl RestaurantProfile {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Fields accepted when creating a restaurant profile
#[derive(Debug, Clone, Default)]
pub struct NewRestaurantProfile {
    pub owner_id: i64,
    pub restaurant_name: String,
    pub concept_description: Option<String>,
    pub cuisine_type: Option<String>,
    pub target_audience: Option<String>,
    pub price_range: Option<String>,
    /// Defaults to "new"
    pub business_type: Option<String>,
    /// Defaults to true
    pub is_local_brand: Option<bool>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl NewRestaurantProfile {
    pub fn into_profile(self, id: i64) -> RestaurantProfile {
        RestaurantProfile {
            id,
            owner_id: self.owner_id,
            restaurant_name: self.restaurant_name,
            concept_description: self.concept_description,
            cuisine_type: self.cuisine_type,
            target_audience: self.target_audience,
            price_range: self.price_range,
            business_type: self.business_type.unwrap_or_else(|| "new".to_string()),
            is_local_brand: self.is_local_brand.unwrap_or(true),
            street_address: self.street_address,
            city: self.city,
            district: self.district,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Partial profile update. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct RestaurantProfileChanges {
    pub restaurant_name: Option<String>,
    pub concept_description: Option<String>,
    pub cuisine_type: Option<String>,
    pub target_audience: Option<String>,
    pub price_range: Option<String>,
    pub business_type: Option<String>,
    pub is_local_brand: Option<bool>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl RestaurantProfileChanges {
    pub fn apply(self, profile: &mut RestaurantProfile) {
        if let Some(name) = self.restaurant_name {
            profile.restaurant_name = name;
        }
        if let Some(business_type) = self.business_type {
            profile.business_type = business_type;
        }
        if let Some(is_local_brand) = self.is_local_brand {
            profile.is_local_brand = is_local_brand;
        }
        let optional = [
            (&mut profile.concept_description, self.concept_description),
            (&mut profile.cuisine_type, self.cuisine_type),
            (&mut profile.target_audience, self.target_audience),
            (&mut profile.price_range, self.price_range),
            (&mut profile.street_address, self.street_address),
            (&mut profile.city, self.city),
            (&mut profile.district, self.district),
        ];
        for (field, value) in optional {
            if value.is_some() {
                *field = value;
            }
        }
        if self.latitude.is_some() {
            profile.latitude = self.latitude;
        }
        if self.longitude.is_some() {
            profile.longitude = self.longitude;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchProject {
    pub id: i64,
    pub owner_id: i64,
    pub restaurant_profile_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub progress: i32,
    #[serde(flatten)]
    pub flags: AnalysisFlags,
    pub results: ResultsMap,
    pub error_detail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewResearchProject {
    pub owner_id: i64,
    pub restaurant_profile_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub flags: AnalysisFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    MarketAnalysis,
    DemographicAnalysis,
    CompetitiveAnalysis,
    LocationIntelligence,
    TouristAnalysis,
    PricingStrategy,
    FoodDeliveryAnalysis,
    Custom,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::MarketAnalysis => "market_analysis",
            ReportType::DemographicAnalysis => "demographic_analysis",
            ReportType::CompetitiveAnalysis => "competitive_analysis",
            ReportType::LocationIntelligence => "location_intelligence",
            ReportType::TouristAnalysis => "tourist_analysis",
            ReportType::PricingStrategy => "pricing_strategy",
            ReportType::FoodDeliveryAnalysis => "food_delivery_analysis",
            ReportType::Custom => "custom",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "market_analysis" => Ok(ReportType::MarketAnalysis),
            "demographic_analysis" => Ok(ReportType::DemographicAnalysis),
            "competitive_analysis" => Ok(ReportType::CompetitiveAnalysis),
            "location_intelligence" => Ok(ReportType::LocationIntelligence),
            "tourist_analysis" => Ok(ReportType::TouristAnalysis),
            "pricing_strategy" => Ok(ReportType::PricingStrategy),
            "food_delivery_analysis" => Ok(ReportType::FoodDeliveryAnalysis),
            "custom" => Ok(ReportType::Custom),
            other => Err(ParseEnumError::new("report type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
    Excel,
    Pdf,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Excel => "excel",
            ReportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "excel" => Ok(ReportFormat::Excel),
            "pdf" => Ok(ReportFormat::Pdf),
            other => Err(ParseEnumError::new("report format", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub owner_id: i64,
    pub research_project_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub format: ReportFormat,
    pub data: Option<serde_json::Value>,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub owner_id: i64,
    pub research_project_id: i64,
    pub name: String,
    pub report_type: ReportType,
    pub format: ReportFormat,
    pub data: Option<serde_json::Value>,
}
