use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::{
    duplicate_profile, profile_busy, profile_locked, stale_status, ResearchStore, StoreError,
    SubscriptionTiers,
};
use crate::services::analysis::domain::{
    NewReport, NewResearchProject, NewRestaurantProfile, ProjectStatus, Report, ReportType,
    ResearchProject, RestaurantProfile, RestaurantProfileChanges, ResultsMap, SubscriptionTier,
    User,
};

/// Process-local store used by tests and the demo harness.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: BTreeMap<i64, User>,
    profiles: BTreeMap<i64, RestaurantProfile>,
    projects: BTreeMap<i64, ResearchProject>,
    reports: BTreeMap<i64, Report>,
}

impl Inner {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, email: &str, subscription_tier: &str) -> User {
        let mut inner = self.inner.write();
        let user = User {
            id: inner.allocate_id(),
            email: email.to_string(),
            full_name: None,
            subscription_tier: subscription_tier.to_string(),
            is_active: true,
        };
        inner.users.insert(user.id, user.clone());
        user
    }

    /// Insert a profile without the duplicate-name check
    pub fn insert_profile(&self, new: NewRestaurantProfile) -> RestaurantProfile {
        let mut inner = self.inner.write();
        let profile = new.into_profile(inner.allocate_id());
        inner.profiles.insert(profile.id, profile.clone());
        profile
    }
}

#[async_trait]
impl ResearchStore for MemoryStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().users.get(&id).cloned())
    }

    async fn get_profile(&self, id: i64) -> Result<Option<RestaurantProfile>, StoreError> {
        Ok(self.inner.read().profiles.get(&id).cloned())
    }

    async fn list_profiles(
        &self,
        owner_id: i64,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<RestaurantProfile>, StoreError> {
        Ok(self
            .inner
            .read()
            .profiles
            .values()
            .filter(|p| p.owner_id == owner_id)
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create_profile(
        &self,
        new: NewRestaurantProfile,
    ) -> Result<RestaurantProfile, StoreError> {
        let mut inner = self.inner.write();
        let taken = inner
            .profiles
            .values()
            .any(|p| p.owner_id == new.owner_id && p.restaurant_name == new.restaurant_name);
        if taken {
            return Err(duplicate_profile(&new.restaurant_name));
        }
        let profile = new.into_profile(inner.allocate_id());
        inner.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn update_profile(
        &self,
        id: i64,
        changes: RestaurantProfileChanges,
    ) -> Result<RestaurantProfile, StoreError> {
        let mut inner = self.inner.write();
        let locked = inner
            .projects
            .values()
            .any(|p| p.restaurant_profile_id == id && p.status == ProjectStatus::Completed);
        if locked {
            return Err(profile_locked(id));
        }
        let profile = inner
            .profiles
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("restaurant profile {id}")))?;
        changes.apply(profile);
        Ok(profile.clone())
    }

    async fn delete_profile(&self, id: i64) -> Result<RestaurantProfile, StoreError> {
        let mut inner = self.inner.write();
        if !inner.profiles.contains_key(&id) {
            return Err(StoreError::NotFound(format!("restaurant profile {id}")));
        }
        let busy = inner
            .projects
            .values()
            .any(|p| p.restaurant_profile_id == id && p.status == ProjectStatus::InProgress);
        if busy {
            return Err(profile_busy(id));
        }

        let project_ids: Vec<i64> = inner
            .projects
            .values()
            .filter(|p| p.restaurant_profile_id == id)
            .map(|p| p.id)
            .collect();
        inner
            .reports
            .retain(|_, r| !project_ids.contains(&r.research_project_id));
        inner.projects.retain(|_, p| p.restaurant_profile_id != id);
        inner
            .profiles
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(format!("restaurant profile {id}")))
    }

    async fn get_project(&self, id: i64) -> Result<Option<ResearchProject>, StoreError> {
        Ok(self.inner.read().projects.get(&id).cloned())
    }

    async fn list_projects(
        &self,
        owner_id: i64,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ResearchProject>, StoreError> {
        Ok(self
            .inner
            .read()
            .projects
            .values()
            .filter(|p| p.owner_id == owner_id)
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create_project(
        &self,
        new: NewResearchProject,
    ) -> Result<ResearchProject, StoreError> {
        let mut inner = self.inner.write();
        let now = Utc::now();
        let project = ResearchProject {
            id: inner.allocate_id(),
            owner_id: new.owner_id,
            restaurant_profile_id: new.restaurant_profile_id,
            name: new.name,
            description: new.description,
            status: ProjectStatus::Pending,
            progress: 0,
            flags: new.flags,
            results: ResultsMap::new(),
            error_detail: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        inner.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn save_project(
        &self,
        project: &ResearchProject,
        expected: ProjectStatus,
    ) -> Result<ResearchProject, StoreError> {
        let mut inner = self.inner.write();
        let stored = inner
            .projects
            .get_mut(&project.id)
            .ok_or_else(|| StoreError::NotFound(format!("research project {}", project.id)))?;

        if stored.owner_id != project.owner_id {
            return Err(StoreError::Conflict(format!(
                "research project {} changed owner",
                project.id
            )));
        }
        if stored.status != expected {
            return Err(stale_status(project.id, stored.status, expected));
        }

        stored.status = project.status;
        stored.progress = project.progress;
        stored.results = project.results.clone();
        stored.error_detail = project.error_detail.clone();
        stored.updated_at = project.updated_at;
        stored.completed_at = project.completed_at;
        Ok(stored.clone())
    }

    async fn update_project_details(
        &self,
        project: &ResearchProject,
    ) -> Result<ResearchProject, StoreError> {
        let mut inner = self.inner.write();
        let stored = inner
            .projects
            .get_mut(&project.id)
            .ok_or_else(|| StoreError::NotFound(format!("research project {}", project.id)))?;

        if stored.owner_id != project.owner_id {
            return Err(StoreError::Conflict(format!(
                "research project {} changed owner",
                project.id
            )));
        }
        if stored.status != ProjectStatus::Pending {
            return Err(stale_status(project.id, stored.status, ProjectStatus::Pending));
        }

        stored.name = project.name.clone();
        stored.description = project.description.clone();
        stored.updated_at = project.updated_at;
        Ok(stored.clone())
    }

    async fn delete_project(&self, id: i64) -> Result<ResearchProject, StoreError> {
        let mut inner = self.inner.write();
        let status = inner
            .projects
            .get(&id)
            .map(|p| p.status)
            .ok_or_else(|| StoreError::NotFound(format!("research project {id}")))?;
        if status == ProjectStatus::InProgress {
            return Err(StoreError::Conflict(format!(
                "research project {id} is being analyzed and cannot be deleted"
            )));
        }
        inner.reports.retain(|_, r| r.research_project_id != id);
        inner
            .projects
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(format!("research project {id}")))
    }

    async fn create_report(&self, new: NewReport) -> Result<Report, StoreError> {
        let mut inner = self.inner.write();
        if !inner.projects.contains_key(&new.research_project_id) {
            return Err(StoreError::NotFound(format!(
                "research project {}",
                new.research_project_id
            )));
        }
        let now = Utc::now();
        let report = Report {
            id: inner.allocate_id(),
            owner_id: new.owner_id,
            research_project_id: new.research_project_id,
            name: new.name,
            report_type: new.report_type,
            format: new.format,
            data: new.data,
            file_path: None,
            created_at: now,
            updated_at: now,
        };
        inner.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn get_report(&self, id: i64) -> Result<Option<Report>, StoreError> {
        Ok(self.inner.read().reports.get(&id).cloned())
    }

    async fn list_reports(&self, research_project_id: i64) -> Result<Vec<Report>, StoreError> {
        Ok(self
            .inner
            .read()
            .reports
            .values()
            .filter(|r| r.research_project_id == research_project_id)
            .cloned()
            .collect())
    }

    async fn list_owner_reports(
        &self,
        owner_id: i64,
        report_type: Option<ReportType>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Report>, StoreError> {
        Ok(self
            .inner
            .read()
            .reports
            .values()
            .filter(|r| r.owner_id == owner_id)
            .filter(|r| report_type.is_none_or(|t| r.report_type == t))
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn delete_report(&self, id: i64) -> Result<Report, StoreError> {
        self.inner
            .write()
            .reports
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(format!("report {id}")))
    }
}

#[async_trait]
impl SubscriptionTiers for MemoryStore {
    async fn tier_for(&self, user_id: i64) -> Result<SubscriptionTier, StoreError> {
        Ok(self
            .inner
            .read()
            .users
            .get(&user_id)
            .map(|u| SubscriptionTier::from_tier_str(&u.subscription_tier))
            .unwrap_or(SubscriptionTier::Free))
    }
}
