use training_core::model::QuizResult;

use super::SqliteRepository;
use super::mapping::{encode_answers, map_result_row};
use crate::repository::{ResultId, ResultRepository, StorageError, StoredResult};

#[async_trait::async_trait]
impl ResultRepository for SqliteRepository {
    async fn append_result(&self, result: &QuizResult) -> Result<ResultId, StorageError> {
        let identity = result.identity();
        let answers = encode_answers(result.answers())?;

        let res = sqlx::query(
            r"
                INSERT INTO quiz_results (
                    first_name, last_name, organization, score,
                    total_questions, answers, completed_at, stored_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(identity.first_name())
        .bind(identity.last_name())
        .bind(identity.organization().code())
        .bind(i64::from(result.score()))
        .bind(i64::from(result.total_questions()))
        .bind(answers)
        .bind(result.completed_at())
        .bind(self.clock().now())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn list_results(&self) -> Result<Vec<StoredResult>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, first_name, last_name, organization, score,
                    total_questions, answers, completed_at, stored_at
                FROM quiz_results
                ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_result_row(&row)?);
        }
        Ok(out)
    }

    async fn clear_results(&self) -> Result<u64, StorageError> {
        let res = sqlx::query("DELETE FROM quiz_results")
            .execute(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(res.rows_affected())
    }
}
