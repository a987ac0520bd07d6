// src/models/olympic_result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{question::QuestionListItem, user::UserListItem};

/// Fields of an Olympics result that clients can never write.
pub const OLYMPIC_RESULT_READ_ONLY_FIELDS: &[&str] = &[
    "id",
    "olympics",
    "created_by",
    "modified_by",
    "date_created",
    "date_modified",
];

/// Represents the 'olympic_results' table.
/// Question links live in 'olympic_result_questions'.
#[derive(Debug, Clone, FromRow)]
pub struct OlympicResult {
    pub id: i64,
    pub olympics_id: i64,
    pub ball: i32,
    pub created_by: i64,
    pub modified_by: Option<i64>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

/// Terse form used inside Olympics listings: no questions, no timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OlympicResultListItem {
    pub id: i64,
    pub olympics: i64,
    pub ball: i32,
    pub created_by: i64,
    pub modified_by: Option<i64>,
}

impl From<&OlympicResult> for OlympicResultListItem {
    fn from(row: &OlympicResult) -> Self {
        Self {
            id: row.id,
            olympics: row.olympics_id,
            ball: row.ball,
            created_by: row.created_by,
            modified_by: row.modified_by,
        }
    }
}

/// Full form: author expanded, questions nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OlympicResultDetail {
    pub id: i64,
    pub olympics: i64,
    pub ball: i32,
    pub created_by: UserListItem,
    pub modified_by: Option<i64>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub questions: Vec<QuestionListItem>,
}

impl OlympicResultDetail {
    pub fn project(
        row: &OlympicResult,
        created_by: UserListItem,
        questions: Vec<QuestionListItem>,
    ) -> Self {
        Self {
            id: row.id,
            olympics: row.olympics_id,
            ball: row.ball,
            created_by,
            modified_by: row.modified_by,
            date_created: row.date_created,
            date_modified: row.date_modified,
            questions,
        }
    }
}

/// A student's submission to an Olympics event.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OlympicResultInput {
    #[validate(range(min = 0))]
    pub ball: i32,
    /// Ids of the questions the submission covers.
    #[serde(default)]
    #[validate(length(max = 500))]
    pub questions: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row() -> OlympicResult {
        OlympicResult {
            id: 11,
            olympics_id: 2,
            ball: 85,
            created_by: 5,
            modified_by: None,
            date_created: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            date_modified: Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap(),
        }
    }

    fn author() -> UserListItem {
        UserListItem {
            id: 5,
            username: "dilnoza".to_string(),
            role: "student".to_string(),
        }
    }

    #[test]
    fn list_form_omits_questions_and_timestamps() {
        let value = serde_json::to_value(OlympicResultListItem::from(&row())).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("questions"));
        assert!(!obj.contains_key("date_created"));
        assert!(!obj.contains_key("date_modified"));
        assert_eq!(obj["created_by"], 5);
    }

    #[test]
    fn detail_form_nests_questions_and_author() {
        let questions = vec![QuestionListItem {
            id: 9,
            subject: 1,
            question: "Capital of Uzbekistan?".to_string(),
            options: vec!["Tashkent".to_string(), "Samarkand".to_string()],
        }];
        let value =
            serde_json::to_value(OlympicResultDetail::project(&row(), author(), questions))
                .unwrap();
        assert_eq!(value["questions"][0]["id"], 9);
        assert_eq!(value["created_by"]["username"], "dilnoza");
        assert!(value.get("date_created").is_some());
        assert!(value.get("date_modified").is_some());
    }

    #[test]
    fn read_only_fields_in_payload_are_ignored() {
        let input: OlympicResultInput = serde_json::from_value(serde_json::json!({
            "ball": 40,
            "questions": [1, 2],
            "created_by": 999,
            "date_created": "2000-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(input.ball, 40);
        assert_eq!(input.questions, vec![1, 2]);
    }

    #[test]
    fn negative_ball_is_rejected() {
        let input = OlympicResultInput {
            ball: -1,
            questions: vec![],
        };
        assert!(input.validate().is_err());
    }
}
