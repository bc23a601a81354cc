//! Events shared by the admin, coordinator and project-manager dashboards.

use crate::kinds::event_kinds;
use dashbus_core::Tagged;
use serde::{Deserialize, Serialize};

event_kinds! {
    /// Kinds emitted by user, category and technology management screens.
    pub enum DashboardEventKind {
        UserStatusChanged => "user-status-changed",
        UserCreated => "user-created",
        UserDeleted => "user-deleted",
        CategoryStatusChanged => "category-status-changed",
        CategoryCreated => "category-created",
        CategoryDeleted => "category-deleted",
        TechStatusChanged => "tech-status-changed",
        TechCreated => "tech-created",
        TechDeleted => "tech-deleted",
        /// Catch-all asking every dashboard to reload its widgets.
        DashboardRefreshNeeded => "dashboard-refresh-needed",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    Admin,
    Coordinator,
    Learner,
    ProjectManager,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub id: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl UserSummary {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            role: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Payload per [`DashboardEventKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum DashboardEvent {
    UserStatusChanged(StatusChange),
    UserCreated(UserSummary),
    UserDeleted(EntityRef),
    CategoryStatusChanged(StatusChange),
    CategoryCreated(CategorySummary),
    CategoryDeleted(EntityRef),
    TechStatusChanged(StatusChange),
    TechCreated(TechSummary),
    TechDeleted(EntityRef),
    DashboardRefreshNeeded(RefreshRequest),
}

impl Tagged for DashboardEvent {
    type Kind = DashboardEventKind;

    fn kind(&self) -> DashboardEventKind {
        match self {
            DashboardEvent::UserStatusChanged(_) => DashboardEventKind::UserStatusChanged,
            DashboardEvent::UserCreated(_) => DashboardEventKind::UserCreated,
            DashboardEvent::UserDeleted(_) => DashboardEventKind::UserDeleted,
            DashboardEvent::CategoryStatusChanged(_) => DashboardEventKind::CategoryStatusChanged,
            DashboardEvent::CategoryCreated(_) => DashboardEventKind::CategoryCreated,
            DashboardEvent::CategoryDeleted(_) => DashboardEventKind::CategoryDeleted,
            DashboardEvent::TechStatusChanged(_) => DashboardEventKind::TechStatusChanged,
            DashboardEvent::TechCreated(_) => DashboardEventKind::TechCreated,
            DashboardEvent::TechDeleted(_) => DashboardEventKind::TechDeleted,
            DashboardEvent::DashboardRefreshNeeded(_) => DashboardEventKind::DashboardRefreshNeeded,
        }
    }
}

impl DashboardEvent {
    /// Id of the user, category or technology the event is about.
    pub fn subject_id(&self) -> Option<&str> {
        match self {
            DashboardEvent::UserStatusChanged(s)
            | DashboardEvent::CategoryStatusChanged(s)
            | DashboardEvent::TechStatusChanged(s) => Some(&s.id),
            DashboardEvent::UserCreated(u) => Some(&u.id),
            DashboardEvent::CategoryCreated(c) => Some(&c.id),
            DashboardEvent::TechCreated(t) => Some(&t.id),
            DashboardEvent::UserDeleted(e)
            | DashboardEvent::CategoryDeleted(e)
            | DashboardEvent::TechDeleted(e) => Some(&e.id),
            DashboardEvent::DashboardRefreshNeeded(_) => None,
        }
    }
}
