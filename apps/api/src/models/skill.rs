use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Learning priority attached to a skill assessment.
///
/// Stored as free text; anything unrecognised ranks as `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn parse(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("critical") => Priority::Critical,
            Some("high") => Priority::High,
            Some("low") => Priority::Low,
            _ => Priority::Medium,
        }
    }

    /// Lower rank is studied first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillAssessment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill_name: String,
    pub category: String,
    pub subcategory: String,
    pub proficiency_level: f64,
    pub priority: String,
    pub is_learning_goal: bool,
    pub source: Option<String>,
    pub evidence: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SkillAssessment {
    /// Initial assessment for a skill detected in resume text.
    pub fn detected(user_id: Uuid, skill_name: &str, category: &str, subcategory: &str) -> Self {
        let now = Utc::now();
        SkillAssessment {
            id: Uuid::new_v4(),
            user_id,
            skill_name: skill_name.to_string(),
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            proficiency_level: 30.0,
            priority: Priority::Medium.as_str().to_string(),
            is_learning_goal: false,
            source: Some("resume".to_string()),
            evidence: Some(format!("Detected in resume: {skill_name}")),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn priority(&self) -> Priority {
        Priority::parse(Some(&self.priority))
    }

    /// Upsert key: one assessment per user and lowercase skill name.
    pub fn skill_key(&self) -> String {
        self.skill_name.trim().to_lowercase()
    }
}
