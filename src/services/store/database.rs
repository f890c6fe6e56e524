use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use super::{
    duplicate_profile, profile_busy, profile_locked, stale_status, ResearchStore, StoreError,
    SubscriptionTiers,
};
use crate::db::DbConn;
use crate::models::{report, research_project, restaurant_profile, user};
use crate::services::analysis::domain::{
    AnalysisFlags, NewReport, NewResearchProject, NewRestaurantProfile, ProjectStatus, Report,
    ReportType, ResearchProject, RestaurantProfile, RestaurantProfileChanges, ResultsMap,
    SubscriptionTier, User,
};

/// sea-orm backed store. JSON payloads are kept in text columns.
#[derive(Clone)]
pub struct DatabaseStore {
    db: DbConn,
}

impl DatabaseStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DbConn {
        &self.db
    }
}

fn corrupt(what: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt(what.to_string())
}

fn user_from_model(m: user::Model) -> User {
    User {
        id: m.id,
        email: m.email,
        full_name: m.full_name,
        subscription_tier: m.subscription_tier,
        is_active: m.is_active,
    }
}

fn profile_from_model(m: restaurant_profile::Model) -> RestaurantProfile {
    RestaurantProfile {
        id: m.id,
        owner_id: m.owner_id,
        restaurant_name: m.restaurant_name,
        concept_description: m.concept_description,
        cuisine_type: m.cuisine_type,
        target_audience: m.target_audience,
        price_range: m.price_range,
        business_type: m.business_type,
        is_local_brand: m.is_local_brand,
        street_address: m.street_address,
        city: m.city,
        district: m.district,
        latitude: m.latitude,
        longitude: m.longitude,
    }
}

fn project_from_model(m: research_project::Model) -> Result<ResearchProject, StoreError> {
    let status = m.status.parse::<ProjectStatus>().map_err(corrupt)?;
    let results: ResultsMap = match m.results.as_deref() {
        Some(raw) if !raw.is_empty() => serde_json::from_str(raw)?,
        _ => ResultsMap::new(),
    };

    Ok(ResearchProject {
        id: m.id,
        owner_id: m.owner_id,
        restaurant_profile_id: m.restaurant_profile_id,
        name: m.name,
        description: m.description,
        status,
        progress: m.progress,
        flags: AnalysisFlags {
            competitive_analysis: m.competitive_analysis,
            market_sizing: m.market_sizing,
            demographic_analysis: m.demographic_analysis,
            location_intelligence: m.location_intelligence,
            tourist_analysis: m.tourist_analysis,
            local_competition: m.local_competition,
            pricing_strategy: m.pricing_strategy,
            food_delivery_analysis: m.food_delivery_analysis,
        },
        results,
        error_detail: m.error_detail,
        created_at: m.created_at,
        updated_at: m.updated_at,
        completed_at: m.completed_at,
    })
}

fn report_from_model(m: report::Model) -> Result<Report, StoreError> {
    let data = m
        .data
        .as_deref()
        .map(serde_json::from_str::<serde_json::Value>)
        .transpose()?;

    Ok(Report {
        id: m.id,
        owner_id: m.owner_id,
        research_project_id: m.research_project_id,
        name: m.name,
        report_type: m.report_type.parse().map_err(corrupt)?,
        format: m.format.parse().map_err(corrupt)?,
        data,
        file_path: m.file_path,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn encode_results(results: &ResultsMap) -> Result<Option<String>, StoreError> {
    if results.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(results)?))
}

#[async_trait]
impl ResearchStore for DatabaseStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(user_from_model))
    }

    async fn get_profile(&self, id: i64) -> Result<Option<RestaurantProfile>, StoreError> {
        Ok(restaurant_profile::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(profile_from_model))
    }

    async fn list_profiles(
        &self,
        owner_id: i64,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<RestaurantProfile>, StoreError> {
        Ok(restaurant_profile::Entity::find()
            .filter(restaurant_profile::Column::OwnerId.eq(owner_id))
            .order_by_asc(restaurant_profile::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(profile_from_model)
            .collect())
    }

    async fn create_profile(
        &self,
        new: NewRestaurantProfile,
    ) -> Result<RestaurantProfile, StoreError> {
        let existing = restaurant_profile::Entity::find()
            .filter(restaurant_profile::Column::OwnerId.eq(new.owner_id))
            .filter(restaurant_profile::Column::RestaurantName.eq(new.restaurant_name.as_str()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(duplicate_profile(&new.restaurant_name));
        }

        let now = Utc::now();
        let profile = new.into_profile(0);
        let model = restaurant_profile::ActiveModel {
            owner_id: Set(profile.owner_id),
            restaurant_name: Set(profile.restaurant_name),
            concept_description: Set(profile.concept_description),
            cuisine_type: Set(profile.cuisine_type),
            target_audience: Set(profile.target_audience),
            price_range: Set(profile.price_range),
            business_type: Set(profile.business_type),
            is_local_brand: Set(profile.is_local_brand),
            street_address: Set(profile.street_address),
            city: Set(profile.city),
            district: Set(profile.district),
            latitude: Set(profile.latitude),
            longitude: Set(profile.longitude),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(profile_from_model(model.insert(&self.db).await?))
    }

    async fn update_profile(
        &self,
        id: i64,
        changes: RestaurantProfileChanges,
    ) -> Result<RestaurantProfile, StoreError> {
        let txn = self.db.begin().await?;

        let model = restaurant_profile::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("restaurant profile {id}")))?;

        let completed = research_project::Entity::find()
            .filter(research_project::Column::RestaurantProfileId.eq(id))
            .filter(research_project::Column::Status.eq(ProjectStatus::Completed.as_str()))
            .one(&txn)
            .await?;
        if completed.is_some() {
            return Err(profile_locked(id));
        }

        let mut profile = profile_from_model(model.clone());
        changes.apply(&mut profile);

        let mut active: restaurant_profile::ActiveModel = model.into();
        active.restaurant_name = Set(profile.restaurant_name);
        active.concept_description = Set(profile.concept_description);
        active.cuisine_type = Set(profile.cuisine_type);
        active.target_audience = Set(profile.target_audience);
        active.price_range = Set(profile.price_range);
        active.business_type = Set(profile.business_type);
        active.is_local_brand = Set(profile.is_local_brand);
        active.street_address = Set(profile.street_address);
        active.city = Set(profile.city);
        active.district = Set(profile.district);
        active.latitude = Set(profile.latitude);
        active.longitude = Set(profile.longitude);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(profile_from_model(updated))
    }

    async fn delete_profile(&self, id: i64) -> Result<RestaurantProfile, StoreError> {
        let txn = self.db.begin().await?;

        let profile = restaurant_profile::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .map(profile_from_model)
            .ok_or_else(|| StoreError::NotFound(format!("restaurant profile {id}")))?;

        let projects = research_project::Entity::find()
            .filter(research_project::Column::RestaurantProfileId.eq(id))
            .all(&txn)
            .await?;
        if projects
            .iter()
            .any(|p| p.status == ProjectStatus::InProgress.as_str())
        {
            return Err(profile_busy(id));
        }
        let project_ids: Vec<i64> = projects.iter().map(|p| p.id).collect();

        report::Entity::delete_many()
            .filter(report::Column::ResearchProjectId.is_in(project_ids))
            .exec(&txn)
            .await?;
        let removed = research_project::Entity::delete_many()
            .filter(research_project::Column::RestaurantProfileId.eq(id))
            .filter(research_project::Column::Status.ne(ProjectStatus::InProgress.as_str()))
            .exec(&txn)
            .await?;
        if removed.rows_affected != projects.len() as u64 {
            return Err(profile_busy(id));
        }
        restaurant_profile::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(profile)
    }

    async fn get_project(&self, id: i64) -> Result<Option<ResearchProject>, StoreError> {
        research_project::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(project_from_model)
            .transpose()
    }

    async fn list_projects(
        &self,
        owner_id: i64,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ResearchProject>, StoreError> {
        research_project::Entity::find()
            .filter(research_project::Column::OwnerId.eq(owner_id))
            .order_by_asc(research_project::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(project_from_model)
            .collect()
    }

    async fn create_project(
        &self,
        new: NewResearchProject,
    ) -> Result<ResearchProject, StoreError> {
        let now = Utc::now();
        let flags = new.flags;
        let model = research_project::ActiveModel {
            owner_id: Set(new.owner_id),
            restaurant_profile_id: Set(new.restaurant_profile_id),
            name: Set(new.name),
            description: Set(new.description),
            status: Set(ProjectStatus::Pending.to_string()),
            progress: Set(0),
            competitive_analysis: Set(flags.competitive_analysis),
            market_sizing: Set(flags.market_sizing),
            demographic_analysis: Set(flags.demographic_analysis),
            location_intelligence: Set(flags.location_intelligence),
            tourist_analysis: Set(flags.tourist_analysis),
            local_competition: Set(flags.local_competition),
            pricing_strategy: Set(flags.pricing_strategy),
            food_delivery_analysis: Set(flags.food_delivery_analysis),
            results: Set(None),
            error_detail: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            completed_at: Set(None),
            ..Default::default()
        };

        project_from_model(model.insert(&self.db).await?)
    }

    async fn save_project(
        &self,
        project: &ResearchProject,
        expected: ProjectStatus,
    ) -> Result<ResearchProject, StoreError> {
        let changes = research_project::ActiveModel {
            status: Set(project.status.to_string()),
            progress: Set(project.progress),
            results: Set(encode_results(&project.results)?),
            error_detail: Set(project.error_detail.clone()),
            updated_at: Set(project.updated_at),
            completed_at: Set(project.completed_at),
            ..Default::default()
        };

        let result = research_project::Entity::update_many()
            .set(changes)
            .filter(research_project::Column::Id.eq(project.id))
            .filter(research_project::Column::OwnerId.eq(project.owner_id))
            .filter(research_project::Column::Status.eq(expected.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(match self.get_project(project.id).await? {
                None => StoreError::NotFound(format!("research project {}", project.id)),
                Some(current) if current.owner_id != project.owner_id => StoreError::Conflict(
                    format!("research project {} changed owner", project.id),
                ),
                Some(current) => stale_status(project.id, current.status, expected),
            });
        }

        self.get_project(project.id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("research project {}", project.id)))
    }

    async fn update_project_details(
        &self,
        project: &ResearchProject,
    ) -> Result<ResearchProject, StoreError> {
        let changes = research_project::ActiveModel {
            name: Set(project.name.clone()),
            description: Set(project.description.clone()),
            updated_at: Set(project.updated_at),
            ..Default::default()
        };

        let result = research_project::Entity::update_many()
            .set(changes)
            .filter(research_project::Column::Id.eq(project.id))
            .filter(research_project::Column::OwnerId.eq(project.owner_id))
            .filter(research_project::Column::Status.eq(ProjectStatus::Pending.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(match self.get_project(project.id).await? {
                None => StoreError::NotFound(format!("research project {}", project.id)),
                Some(current) if current.owner_id != project.owner_id => StoreError::Conflict(
                    format!("research project {} changed owner", project.id),
                ),
                Some(current) => stale_status(project.id, current.status, ProjectStatus::Pending),
            });
        }

        self.get_project(project.id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("research project {}", project.id)))
    }

    async fn delete_project(&self, id: i64) -> Result<ResearchProject, StoreError> {
        let txn = self.db.begin().await?;

        let project = research_project::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("research project {id}")))
            .and_then(project_from_model)?;

        if project.status == ProjectStatus::InProgress {
            return Err(StoreError::Conflict(format!(
                "research project {id} is being analyzed and cannot be deleted"
            )));
        }

        report::Entity::delete_many()
            .filter(report::Column::ResearchProjectId.eq(id))
            .exec(&txn)
            .await?;

        let deleted = research_project::Entity::delete_many()
            .filter(research_project::Column::Id.eq(id))
            .filter(research_project::Column::Status.ne(ProjectStatus::InProgress.as_str()))
            .exec(&txn)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(StoreError::Conflict(format!(
                "research project {id} is being analyzed and cannot be deleted"
            )));
        }

        txn.commit().await?;
        Ok(project)
    }

    async fn create_report(&self, new: NewReport) -> Result<Report, StoreError> {
        let now = Utc::now();
        let data = new.data.as_ref().map(serde_json::to_string).transpose()?;
        let model = report::ActiveModel {
            owner_id: Set(new.owner_id),
            research_project_id: Set(new.research_project_id),
            name: Set(new.name),
            report_type: Set(new.report_type.to_string()),
            format: Set(new.format.to_string()),
            data: Set(data),
            file_path: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        report_from_model(model.insert(&self.db).await?)
    }

    async fn get_report(&self, id: i64) -> Result<Option<Report>, StoreError> {
        report::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(report_from_model)
            .transpose()
    }

    async fn list_reports(&self, research_project_id: i64) -> Result<Vec<Report>, StoreError> {
        report::Entity::find()
            .filter(report::Column::ResearchProjectId.eq(research_project_id))
            .order_by_asc(report::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(report_from_model)
            .collect()
    }

    async fn list_owner_reports(
        &self,
        owner_id: i64,
        report_type: Option<ReportType>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Report>, StoreError> {
        let mut query = report::Entity::find().filter(report::Column::OwnerId.eq(owner_id));
        if let Some(report_type) = report_type {
            query = query.filter(report::Column::ReportType.eq(report_type.as_str()));
        }

        query
            .order_by_asc(report::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(report_from_model)
            .collect()
    }

    async fn delete_report(&self, id: i64) -> Result<Report, StoreError> {
        let existing = self
            .get_report(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("report {id}")))?;
        report::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(existing)
    }
}

#[async_trait]
impl SubscriptionTiers for DatabaseStore {
    async fn tier_for(&self, user_id: i64) -> Result<SubscriptionTier, StoreError> {
        let tier = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .map(|u| SubscriptionTier::from_tier_str(&u.subscription_tier));

        Ok(tier.unwrap_or_else(|| {
            tracing::warn!(user_id, "No user for subscription lookup, treating as free tier");
            SubscriptionTier::Free
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_test_db, create_test_profile, create_test_user};
    use serde_json::json;

    async fn store_with_project(tier: &str) -> (DatabaseStore, ResearchProject) {
        let db = create_test_db().await;
        let owner = create_test_user(&db, "owner@example.com", tier).await;
        let profile = create_test_profile(&db, owner.id, "Supanniga").await;
        let store = DatabaseStore::new(db);
        let project = store
            .create_project(NewResearchProject {
                owner_id: owner.id,
                restaurant_profile_id: profile.id,
                name: "Thonglor".to_string(),
                description: Some("Second branch".to_string()),
                flags: AnalysisFlags {
                    market_sizing: true,
                    local_competition: true,
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        (store, project)
    }

    #[tokio::test]
    async fn test_create_project_round_trips_flags() {
        let (store, project) = store_with_project("free").await;
        let loaded = store.get_project(project.id).await.unwrap().unwrap();

        assert_eq!(loaded.status, ProjectStatus::Pending);
        assert_eq!(loaded.progress, 0);
        assert!(loaded.flags.market_sizing);
        assert!(loaded.flags.local_competition);
        assert!(!loaded.flags.pricing_strategy);
        assert!(loaded.results.is_empty());
    }

    #[tokio::test]
    async fn test_save_persists_results_and_rejects_stale_status() {
        let (store, mut project) = store_with_project("free").await;
        let stale = project.clone();

        project.start().unwrap();
        let mut partial = ResultsMap::new();
        partial.insert("market_sizing".to_string(), json!({ "total_market_size": 10 }));
        project.advance(20, partial).unwrap();
        let saved = store
            .save_project(&project, ProjectStatus::Pending)
            .await
            .unwrap();
        assert_eq!(saved.status, ProjectStatus::InProgress);
        assert_eq!(saved.progress, 20);
        assert_eq!(saved.results["market_sizing"]["total_market_size"], 10);

        let err = store
            .save_project(&stale, ProjectStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_save_rejects_foreign_owner() {
        let (store, project) = store_with_project("free").await;
        let mut hijacked = project.clone();
        hijacked.owner_id += 1;
        hijacked.start().unwrap();

        let err = store
            .save_project(&hijacked, ProjectStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        let loaded = store.get_project(project.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, ProjectStatus::Pending);
    }

    #[tokio::test]
    async fn test_start_write_does_not_clobber_rename() {
        let (store, project) = store_with_project("free").await;
        let mut stale = project.clone();

        let mut renamed = project.clone();
        renamed.name = "Ekkamai".to_string();
        renamed.description = None;
        store.update_project_details(&renamed).await.unwrap();

        stale.start().unwrap();
        let saved = store
            .save_project(&stale, ProjectStatus::Pending)
            .await
            .unwrap();
        assert_eq!(saved.status, ProjectStatus::InProgress);
        assert_eq!(saved.name, "Ekkamai");
        assert_eq!(saved.description, None);

        let err = store.update_project_details(&renamed).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_profile_create_update_and_lock() {
        let (store, mut project) = store_with_project("free").await;
        let created = store
            .create_profile(NewRestaurantProfile {
                owner_id: project.owner_id,
                restaurant_name: "Err Urban Rustic".to_string(),
                city: Some("Bangkok".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.business_type, "new");
        assert!(created.is_local_brand);

        let duplicate = store
            .create_profile(NewRestaurantProfile {
                owner_id: project.owner_id,
                restaurant_name: "Err Urban Rustic".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(duplicate, StoreError::Conflict(_)));

        let updated = store
            .update_profile(
                created.id,
                RestaurantProfileChanges {
                    district: Some("Phra Nakhon".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.district.as_deref(), Some("Phra Nakhon"));
        assert_eq!(updated.city.as_deref(), Some("Bangkok"));

        let listed = store.list_profiles(project.owner_id, 0, 10).await.unwrap();
        assert_eq!(listed.len(), 2);

        project.start().unwrap();
        let mut project = store
            .save_project(&project, ProjectStatus::Pending)
            .await
            .unwrap();
        project.complete(ResultsMap::new()).unwrap();
        store
            .save_project(&project, ProjectStatus::InProgress)
            .await
            .unwrap();

        let err = store
            .update_profile(project.restaurant_profile_id, RestaurantProfileChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_profile_cascades_and_refuses_running_projects() {
        let (store, mut project) = store_with_project("free").await;
        project.start().unwrap();
        let mut project = store
            .save_project(&project, ProjectStatus::Pending)
            .await
            .unwrap();

        let err = store
            .delete_profile(project.restaurant_profile_id)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        project.complete(ResultsMap::new()).unwrap();
        store
            .save_project(&project, ProjectStatus::InProgress)
            .await
            .unwrap();
        store
            .create_report(NewReport {
                owner_id: project.owner_id,
                research_project_id: project.id,
                name: "Market Analysis Report".to_string(),
                report_type: ReportType::MarketAnalysis,
                format: crate::services::analysis::ReportFormat::Json,
                data: None,
            })
            .await
            .unwrap();

        let deleted = store
            .delete_profile(project.restaurant_profile_id)
            .await
            .unwrap();
        assert_eq!(deleted.id, project.restaurant_profile_id);
        assert!(store.get_project(project.id).await.unwrap().is_none());
        assert!(store
            .list_owner_reports(project.owner_id, None, 0, 10)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_reports_are_listed_and_deleted_with_project() {
        let (store, project) = store_with_project("free").await;
        for _ in 0..2 {
            store
                .create_report(NewReport {
                    owner_id: project.owner_id,
                    research_project_id: project.id,
                    name: "Market Analysis Report".to_string(),
                    report_type: crate::services::analysis::ReportType::MarketAnalysis,
                    format: crate::services::analysis::ReportFormat::Json,
                    data: Some(json!({ "ok": true })),
                })
                .await
                .unwrap();
        }
        let reports = store.list_reports(project.id).await.unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].data, Some(json!({ "ok": true })));

        store.delete_project(project.id).await.unwrap();
        assert!(store.list_reports(project.id).await.unwrap().is_empty());
        assert!(store.get_project(project.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_refuses_in_progress_project() {
        let (store, mut project) = store_with_project("free").await;
        project.start().unwrap();
        store
            .save_project(&project, ProjectStatus::Pending)
            .await
            .unwrap();

        let err = store.delete_project(project.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_tier_lookup() {
        let (store, project) = store_with_project("enterprise").await;
        assert_eq!(
            store.tier_for(project.owner_id).await.unwrap(),
            SubscriptionTier::Enterprise
        );
        assert_eq!(store.tier_for(9_999).await.unwrap(), SubscriptionTier::Free);
    }

    #[tokio::test]
    async fn test_list_projects_pages_by_owner() {
        let (store, project) = store_with_project("free").await;
        for i in 0..3 {
            store
                .create_project(NewResearchProject {
                    owner_id: project.owner_id,
                    restaurant_profile_id: project.restaurant_profile_id,
                    name: format!("Extra {i}"),
                    description: None,
                    flags: AnalysisFlags::default(),
                })
                .await
                .unwrap();
        }
        let page = store.list_projects(project.owner_id, 1, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "Extra 0");
        assert!(store
            .list_projects(project.owner_id + 1, 0, 10)
            .await
            .unwrap()
            .is_empty());
    }
}
