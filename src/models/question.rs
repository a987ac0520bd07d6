// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use utoipa::ToSchema;
use validator::Validate;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: i64,
    pub subject_id: i64,

    /// The text of the question.
    pub question: String,

    /// List of options (e.g., ["Option A", "Option B"]).
    /// Stored as a JSON array in the database.
    pub options: Json<Vec<String>>,

    /// The correct answer. Never leaves the server.
    pub answer: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Question as shown to students (answer key hidden).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuestionListItem {
    pub id: i64,
    pub subject: i64,
    pub question: String,
    pub options: Vec<String>,
}

impl From<&Question> for QuestionListItem {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            subject: q.subject_id,
            question: q.question.clone(),
            options: q.options.0.clone(),
        }
    }
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionRequest {
    pub subject: i64,
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    #[validate(length(min = 1, max = 500))]
    pub answer: String,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.is_empty() {
        return Err(validator::ValidationError::new("options_cannot_be_empty"));
    }
    if options.iter().any(|opt| opt.len() > 500) {
        return Err(validator::ValidationError::new("option_too_long"));
    }
    Ok(())
}
