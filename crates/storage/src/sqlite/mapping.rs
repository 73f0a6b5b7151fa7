use chrono::{DateTime, Utc};
use sqlx::Row;
use training_core::model::OptionIndex;

use crate::repository::{QuizResultRecord, StorageError, StoredResult, ser};

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// Answers are stored as a JSON array; `null` marks an unanswered question.
pub(crate) fn encode_answers(answers: &[Option<OptionIndex>]) -> Result<String, StorageError> {
    serde_json::to_string(answers).map_err(ser)
}

pub(crate) fn decode_answers(raw: &str) -> Result<Vec<Option<OptionIndex>>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<StoredResult, StorageError> {
    let completed_at: DateTime<Utc> = row.try_get("completed_at").map_err(ser)?;
    let stored_at: DateTime<Utc> = row.try_get("stored_at").map_err(ser)?;
    let answers = decode_answers(&row.try_get::<String, _>("answers").map_err(ser)?)?;

    QuizResultRecord {
        id: row.try_get("id").map_err(ser)?,
        first_name: row.try_get("first_name").map_err(ser)?,
        last_name: row.try_get("last_name").map_err(ser)?,
        organization: row.try_get("organization").map_err(ser)?,
        score: u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?,
        total_questions: u32_from_i64(
            "total_questions",
            row.try_get::<i64, _>("total_questions").map_err(ser)?,
        )?,
        answers,
        completed_at,
        stored_at,
    }
    .into_stored()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_keep_unanswered_sentinel() {
        let encoded = encode_answers(&[Some(1), None, Some(0)]).unwrap();
        assert_eq!(encoded, "[1,null,0]");
        assert_eq!(decode_answers(&encoded).unwrap(), vec![Some(1), None, Some(0)]);
    }

    #[test]
    fn malformed_answers_are_a_serialization_error() {
        assert!(matches!(
            decode_answers("[1,").unwrap_err(),
            StorageError::Serialization(_)
        ));
    }
}
