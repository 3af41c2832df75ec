use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::learning_path::{LearningPath, LearningPathStep, PathStatus, PathSummary};
use crate::models::skill::SkillAssessment;
use crate::store::{RoadmapStore, StoreTx};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoadmapStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

impl PgTx {
    async fn load_steps(&mut self, path: &mut LearningPath) -> Result<(), AppError> {
        path.steps = sqlx::query_as::<_, LearningPathStep>(
            "SELECT * FROM learning_path_steps WHERE learning_path_id = $1 ORDER BY step_number",
        )
        .bind(path.id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl StoreTx for PgTx {
    async fn skill_assessments(&mut self, user_id: Uuid) -> Result<Vec<SkillAssessment>, AppError> {
        Ok(sqlx::query_as::<_, SkillAssessment>(
            "SELECT * FROM skill_assessments WHERE user_id = $1 ORDER BY created_at, skill_name",
        )
        .bind(user_id)
        .fetch_all(&mut *self.tx)
        .await?)
    }

    async fn upsert_skill_assessment(
        &mut self,
        assessment: &SkillAssessment,
    ) -> Result<SkillAssessment, AppError> {
        Ok(sqlx::query_as::<_, SkillAssessment>(
            r#"
            INSERT INTO skill_assessments
                (id, user_id, skill_name, skill_key, category, subcategory, proficiency_level,
                 priority, is_learning_goal, source, evidence, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (user_id, skill_key) DO UPDATE
            SET category = EXCLUDED.category,
                subcategory = EXCLUDED.subcategory,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(assessment.id)
        .bind(assessment.user_id)
        .bind(&assessment.skill_name)
        .bind(assessment.skill_key())
        .bind(&assessment.category)
        .bind(&assessment.subcategory)
        .bind(assessment.proficiency_level)
        .bind(&assessment.priority)
        .bind(assessment.is_learning_goal)
        .bind(&assessment.source)
        .bind(&assessment.evidence)
        .bind(assessment.created_at)
        .bind(assessment.updated_at)
        .fetch_one(&mut *self.tx)
        .await?)
    }

    async fn find_skill_assessment(
        &mut self,
        user_id: Uuid,
        assessment_id: Uuid,
    ) -> Result<Option<SkillAssessment>, AppError> {
        Ok(sqlx::query_as::<_, SkillAssessment>(
            "SELECT * FROM skill_assessments WHERE id = $1 AND user_id = $2",
        )
        .bind(assessment_id)
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await?)
    }

    async fn update_skill_assessment(&mut self, assessment: &SkillAssessment) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE skill_assessments
            SET proficiency_level = $1, priority = $2, is_learning_goal = $3, updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(assessment.proficiency_level)
        .bind(&assessment.priority)
        .bind(assessment.is_learning_goal)
        .bind(assessment.updated_at)
        .bind(assessment.id)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn delete_skill_assessment(
        &mut self,
        user_id: Uuid,
        assessment_id: Uuid,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM skill_assessments WHERE id = $1 AND user_id = $2")
            .bind(assessment_id)
            .bind(user_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn archive_active_paths(&mut self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE learning_paths SET status = $1, updated_at = NOW() WHERE user_id = $2 AND status = $3",
        )
        .bind(PathStatus::Archived.as_str())
        .bind(user_id)
        .bind(PathStatus::Active.as_str())
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn count_active_paths(&mut self, user_id: Uuid) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM learning_paths WHERE user_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(PathStatus::Active.as_str())
        .fetch_one(&mut *self.tx)
        .await?)
    }

    async fn insert_path(&mut self, path: &LearningPath) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO learning_paths
                (id, user_id, title, description, goal, difficulty_level,
                 estimated_duration_weeks, category, status, progress_percentage,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(path.id)
        .bind(path.user_id)
        .bind(&path.title)
        .bind(&path.description)
        .bind(&path.goal)
        .bind(&path.difficulty_level)
        .bind(path.estimated_duration_weeks)
        .bind(&path.category)
        .bind(&path.status)
        .bind(path.progress_percentage)
        .bind(path.created_at)
        .bind(path.updated_at)
        .execute(&mut *self.tx)
        .await?;

        for step in &path.steps {
            sqlx::query(
                r#"
                INSERT INTO learning_path_steps
                    (id, learning_path_id, title, description, step_number, step_type,
                     content_url, content_provider, estimated_duration_hours, status,
                     progress_percentage, learning_objectives, skills_gained)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
            )
            .bind(step.id)
            .bind(step.learning_path_id)
            .bind(&step.title)
            .bind(&step.description)
            .bind(step.step_number)
            .bind(&step.step_type)
            .bind(&step.content_url)
            .bind(&step.content_provider)
            .bind(step.estimated_duration_hours)
            .bind(&step.status)
            .bind(step.progress_percentage)
            .bind(&step.learning_objectives)
            .bind(&step.skills_gained)
            .execute(&mut *self.tx)
            .await?;
        }
        Ok(())
    }

    async fn find_path(
        &mut self,
        user_id: Uuid,
        path_id: Uuid,
    ) -> Result<Option<LearningPath>, AppError> {
        let path = sqlx::query_as::<_, LearningPath>(
            "SELECT * FROM learning_paths WHERE id = $1 AND user_id = $2",
        )
        .bind(path_id)
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        match path {
            Some(mut path) => {
                self.load_steps(&mut path).await?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    async fn current_path(&mut self, user_id: Uuid) -> Result<Option<LearningPath>, AppError> {
        let path = sqlx::query_as::<_, LearningPath>(
            r#"
            SELECT * FROM learning_paths
            WHERE user_id = $1 AND status = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(PathStatus::Active.as_str())
        .fetch_optional(&mut *self.tx)
        .await?;

        match path {
            Some(mut path) => {
                self.load_steps(&mut path).await?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    async fn list_paths(&mut self, user_id: Uuid) -> Result<Vec<PathSummary>, AppError> {
        Ok(sqlx::query_as::<_, PathSummary>(
            r#"
            SELECT id, title, status, created_at, progress_percentage, estimated_duration_weeks
            FROM learning_paths
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.tx)
        .await?)
    }

    async fn set_path_status(&mut self, path_id: Uuid, status: PathStatus) -> Result<(), AppError> {
        sqlx::query("UPDATE learning_paths SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status.as_str())
            .bind(path_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn set_path_progress(&mut self, path_id: Uuid, progress: f64) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE learning_paths SET progress_percentage = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(progress)
        .bind(path_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn find_owned_step(
        &mut self,
        user_id: Uuid,
        step_id: Uuid,
    ) -> Result<Option<LearningPathStep>, AppError> {
        Ok(sqlx::query_as::<_, LearningPathStep>(
            r#"
            SELECT s.*
            FROM learning_path_steps s
            JOIN learning_paths p ON p.id = s.learning_path_id
            WHERE s.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(step_id)
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await?)
    }

    async fn update_step(&mut self, step: &LearningPathStep) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE learning_path_steps SET status = $1, progress_percentage = $2 WHERE id = $3",
        )
        .bind(&step.status)
        .bind(step.progress_percentage)
        .bind(step.id)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
