use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::skill::{Priority, SkillAssessment};
use crate::skills::taxonomy::SkillTaxonomy;
use crate::store::RoadmapStore;

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub user_id: Uuid,
    /// Plain resume text. File decoding happens upstream.
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub extracted: usize,
    pub skills: Vec<SkillAssessment>,
}

/// Extracts taxonomy skills from resume text and upserts one assessment per
/// skill for the user, all in one transaction.
pub async fn ingest_resume_text(
    store: &dyn RoadmapStore,
    taxonomy: &SkillTaxonomy,
    user_id: Uuid,
    resume_text: &str,
) -> Result<IngestResponse, AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    let extracted = taxonomy.extract_skills(resume_text);

    let mut tx = store.begin().await?;
    let mut skills = Vec::with_capacity(extracted.len());
    for skill in &extracted {
        let detected =
            SkillAssessment::detected(user_id, &skill.skill_name, &skill.category, &skill.subcategory);
        skills.push(tx.upsert_skill_assessment(&detected).await?);
    }
    tx.commit().await?;

    info!("Extracted {} skills from resume text for user {user_id}", extracted.len());
    Ok(IngestResponse {
        extracted: extracted.len(),
        skills,
    })
}

/// Partial assessment update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillUpdate {
    pub proficiency_level: Option<f64>,
    pub priority: Option<Priority>,
    pub is_learning_goal: Option<bool>,
}

impl SkillUpdate {
    /// Applies the update; proficiency is clamped into [0, 100].
    pub fn apply(&self, assessment: &mut SkillAssessment) -> Result<(), AppError> {
        if let Some(level) = self.proficiency_level {
            if !level.is_finite() {
                return Err(AppError::Validation(
                    "proficiency_level must be a finite number".to_string(),
                ));
            }
            assessment.proficiency_level = level.clamp(0.0, 100.0);
        }
        if let Some(priority) = self.priority {
            assessment.priority = priority.as_str().to_string();
        }
        if let Some(goal) = self.is_learning_goal {
            assessment.is_learning_goal = goal;
        }
        assessment.updated_at = Utc::now();
        Ok(())
    }
}

pub async fn update_skill(
    store: &dyn RoadmapStore,
    user_id: Uuid,
    assessment_id: Uuid,
    update: &SkillUpdate,
) -> Result<SkillAssessment, AppError> {
    let mut tx = store.begin().await?;
    let mut assessment = tx
        .find_skill_assessment(user_id, assessment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Skill {assessment_id} not found")))?;

    update.apply(&mut assessment)?;
    tx.update_skill_assessment(&assessment).await?;
    tx.commit().await?;
    Ok(assessment)
}

pub async fn delete_skill(
    store: &dyn RoadmapStore,
    user_id: Uuid,
    assessment_id: Uuid,
) -> Result<(), AppError> {
    let mut tx = store.begin().await?;
    if !tx.delete_skill_assessment(user_id, assessment_id).await? {
        return Err(AppError::NotFound(format!("Skill {assessment_id} not found")));
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn taxonomy() -> SkillTaxonomy {
        SkillTaxonomy::from_json_str(
            r#"{"technical": {"languages": ["Python", "Rust"], "data": ["SQL"]}}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_ingest_rejects_blank_text() {
        let store = MemoryStore::new();
        let err = ingest_resume_text(&store, &taxonomy(), Uuid::new_v4(), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_ingest_creates_assessments_with_defaults() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let out = ingest_resume_text(&store, &taxonomy(), user, "Built Rust services backed by SQL")
            .await
            .unwrap();

        assert_eq!(out.extracted, 2);
        assert_eq!(out.skills[0].skill_name, "Rust");
        assert_eq!(out.skills[1].skill_name, "SQL");
        assert!(out.skills.iter().all(|s| s.priority == "medium"));
        assert!(out.skills.iter().all(|s| s.source.as_deref() == Some("resume")));
    }

    #[tokio::test]
    async fn test_reingest_preserves_tuned_assessment() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let first = ingest_resume_text(&store, &taxonomy(), user, "python").await.unwrap();
        let id = first.skills[0].id;

        let tuned = SkillUpdate {
            proficiency_level: Some(75.0),
            priority: Some(Priority::Critical),
            is_learning_goal: Some(true),
        };
        update_skill(&store, user, id, &tuned).await.unwrap();

        let again = ingest_resume_text(&store, &taxonomy(), user, "PYTHON again").await.unwrap();
        assert_eq!(again.skills[0].id, id);
        assert_eq!(again.skills[0].proficiency_level, 75.0);
        assert_eq!(again.skills[0].priority, "critical");
        assert!(again.skills[0].is_learning_goal);
    }

    #[tokio::test]
    async fn test_update_clamps_proficiency() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let out = ingest_resume_text(&store, &taxonomy(), user, "sql").await.unwrap();

        let update = SkillUpdate {
            proficiency_level: Some(250.0),
            ..Default::default()
        };
        let updated = update_skill(&store, user, out.skills[0].id, &update).await.unwrap();
        assert_eq!(updated.proficiency_level, 100.0);
    }

    #[tokio::test]
    async fn test_update_and_delete_foreign_skill_not_found() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let out = ingest_resume_text(&store, &taxonomy(), owner, "sql").await.unwrap();
        let id = out.skills[0].id;
        let stranger = Uuid::new_v4();

        let err = update_skill(&store, stranger, id, &SkillUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = delete_skill(&store, stranger, id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        delete_skill(&store, owner, id).await.unwrap();
    }
}
