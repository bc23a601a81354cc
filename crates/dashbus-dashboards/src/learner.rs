//! Events scoped to the learner dashboard.

use crate::kinds::event_kinds;
use dashbus_core::Tagged;
use serde::{Deserialize, Serialize};

event_kinds! {
    pub enum LearnerEventKind {
        ActiveCoursesUpdated => "active-courses-updated",
        RecentActivitiesUpdated => "recent-activities-updated",
        StatsUpdated => "stats-updated",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCourses {
    pub learner_id: String,
    pub course_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub description: String,
    /// Unix milliseconds.
    pub occurred_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentActivities {
    pub learner_id: String,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearnerStats {
    pub learner_id: String,
    pub completed_courses: u32,
    pub in_progress_courses: u32,
    pub points: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaderboard_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_quiz_score: Option<f32>,
}

/// Payload per [`LearnerEventKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum LearnerEvent {
    ActiveCoursesUpdated(ActiveCourses),
    RecentActivitiesUpdated(RecentActivities),
    StatsUpdated(LearnerStats),
}

impl Tagged for LearnerEvent {
    type Kind = LearnerEventKind;

    fn kind(&self) -> LearnerEventKind {
        match self {
            LearnerEvent::ActiveCoursesUpdated(_) => LearnerEventKind::ActiveCoursesUpdated,
            LearnerEvent::RecentActivitiesUpdated(_) => LearnerEventKind::RecentActivitiesUpdated,
            LearnerEvent::StatsUpdated(_) => LearnerEventKind::StatsUpdated,
        }
    }
}

impl LearnerEvent {
    pub fn learner_id(&self) -> &str {
        match self {
            LearnerEvent::ActiveCoursesUpdated(p) => &p.learner_id,
            LearnerEvent::RecentActivitiesUpdated(p) => &p.learner_id,
            LearnerEvent::StatsUpdated(p) => &p.learner_id,
        }
    }
}
