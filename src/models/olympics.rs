// src/models/olympics.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{
    deserialize_some,
    olympic_result::{OlympicResult, OlympicResultDetail, OlympicResultListItem},
    subject::Subject,
    user::UserListItem,
};

/// Fields of an Olympics event that clients can never write.
pub const OLYMPICS_READ_ONLY_FIELDS: &[&str] = &[
    "id",
    "created_by",
    "modified_by",
    "date_created",
    "date_modified",
    "results",
];

/// Fields of an Olympics subject slot that clients can never write.
pub const OLYMPICS_SUBJECT_READ_ONLY_FIELDS: &[&str] = &[
    "id",
    "olympics",
    "created_by",
    "modified_by",
    "date_created",
    "date_modified",
];

/// Represents the 'olympics' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Olympic {
    pub id: i64,
    pub title: String,
    /// Absolute URL or relative media path of the cover image.
    pub image: Option<String>,
    /// Sanitized rich-text announcement.
    pub text: String,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
    pub created_by: i64,
    pub modified_by: Option<i64>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

/// Represents the 'olympics_subjects' table: one subject slot of an event.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct OlympicsSubject {
    pub id: i64,
    pub olympics_id: i64,
    pub subject_id: i64,
    pub questions_count: i32,
    /// Points awarded for the subject.
    pub ball: i32,
    pub created_by: i64,
    pub modified_by: Option<i64>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

/// Subject slot nested inside an Olympics event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OlympicSubjectItem {
    pub id: i64,
    pub subject: i64,
    pub questions_count: i32,
    pub ball: i32,
    pub created_by: i64,
}

impl From<&OlympicsSubject> for OlympicSubjectItem {
    fn from(row: &OlympicsSubject) -> Self {
        Self {
            id: row.id,
            subject: row.subject_id,
            questions_count: row.questions_count,
            ball: row.ball,
            created_by: row.created_by,
        }
    }
}

/// Subject slot listed on its own: subject expanded, timestamps dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OlympicSubjectListItem {
    pub id: i64,
    pub olympics: i64,
    pub subject: Subject,
    pub questions_count: i32,
    pub ball: i32,
    pub created_by: i64,
    pub modified_by: Option<i64>,
}

impl OlympicSubjectListItem {
    pub fn project(row: &OlympicsSubject, subject: Subject) -> Self {
        Self {
            id: row.id,
            olympics: row.olympics_id,
            subject,
            questions_count: row.questions_count,
            ball: row.ball,
            created_by: row.created_by,
            modified_by: row.modified_by,
        }
    }
}

/// Olympics event as listed and as returned from creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OlympicItem {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub text: String,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
    pub created_by: UserListItem,
    pub modified_by: Option<i64>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub subjects: Vec<OlympicSubjectItem>,
    pub results: Vec<OlympicResultListItem>,
}

impl OlympicItem {
    pub fn project(
        row: &Olympic,
        created_by: UserListItem,
        subjects: &[OlympicsSubject],
        results: &[OlympicResult],
    ) -> Self {
        Self {
            id: row.id,
            title: row.title.clone(),
            image: row.image.clone(),
            text: row.text.clone(),
            time_start: row.time_start,
            time_end: row.time_end,
            created_by,
            modified_by: row.modified_by,
            date_created: row.date_created,
            date_modified: row.date_modified,
            subjects: subjects.iter().map(OlympicSubjectItem::from).collect(),
            results: results.iter().map(OlympicResultListItem::from).collect(),
        }
    }
}

/// Olympics event with every result expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OlympicDetail {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub text: String,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
    pub created_by: i64,
    pub modified_by: Option<i64>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub subjects: Vec<OlympicSubjectItem>,
    pub results: Vec<OlympicResultDetail>,
}

impl OlympicDetail {
    pub fn project(
        row: &Olympic,
        subjects: &[OlympicsSubject],
        results: Vec<OlympicResultDetail>,
    ) -> Self {
        Self {
            id: row.id,
            title: row.title.clone(),
            image: row.image.clone(),
            text: row.text.clone(),
            time_start: row.time_start,
            time_end: row.time_end,
            created_by: row.created_by,
            modified_by: row.modified_by,
            date_created: row.date_created,
            date_modified: row.date_modified,
            subjects: subjects.iter().map(OlympicSubjectItem::from).collect(),
            results,
        }
    }
}

/// One subject slot submitted together with a new Olympics event.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct OlympicSubjectInput {
    pub subject: i64,
    #[validate(range(min = 0, max = 1000))]
    pub questions_count: i32,
    #[validate(range(min = 0))]
    pub ball: i32,
}

/// Payload for creating an Olympics event.
///
/// A missing `subjects` key is the same as an empty list.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct OlympicPostInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 500), custom(function = validate_image_ref))]
    pub image: Option<String>,
    #[validate(length(max = 20000))]
    pub text: String,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
    #[serde(default)]
    #[validate(nested)]
    pub subjects: Vec<OlympicSubjectInput>,
}

/// Partial update of an Olympics event. Absent keys keep their stored value;
/// `"image": null` clears the image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct OlympicUpdateInput {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    #[validate(length(max = 20000))]
    pub text: Option<String>,
    pub time_start: Option<DateTime<Utc>>,
    pub time_end: Option<DateTime<Utc>>,
}

impl OlympicUpdateInput {
    /// Field validation, including the nullable image which the derive skips.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        if let Some(Some(image)) = &self.image {
            let checked = if image.len() > 500 {
                Err(ValidationError::new("length"))
            } else {
                validate_image_ref(image)
            };
            if let Err(err) = checked {
                let mut errors = ValidationErrors::new();
                errors.add("image", err);
                return Err(errors);
            }
        }
        Ok(())
    }

    /// Merges the supplied fields into `olympic`.
    pub fn apply(self, olympic: &mut Olympic) {
        if let Some(title) = self.title {
            olympic.title = title;
        }
        if let Some(image) = self.image {
            olympic.image = image;
        }
        if let Some(text) = self.text {
            olympic.text = text;
        }
        if let Some(time_start) = self.time_start {
            olympic.time_start = time_start;
        }
        if let Some(time_end) = self.time_end {
            olympic.time_end = time_end;
        }
    }
}

/// Accepts an absolute URL, or a relative media path that stays inside the
/// media root.
fn validate_image_ref(image: &str) -> Result<(), ValidationError> {
    if image.contains("://") {
        return Url::parse(image)
            .map(|_| ())
            .map_err(|_| ValidationError::new("invalid_url"));
    }
    if image.trim().is_empty()
        || image.starts_with('/')
        || image.split(['/', '\\']).any(|segment| segment == "..")
    {
        return Err(ValidationError::new("invalid_image_path"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 12, hour, 0, 0).unwrap()
    }

    fn olympic() -> Olympic {
        Olympic {
            id: 1,
            title: "Spring Olympiad".to_string(),
            image: Some("olympics/spring.png".to_string()),
            text: "<p>Good luck</p>".to_string(),
            time_start: at(9),
            time_end: at(12),
            created_by: 4,
            modified_by: Some(4),
            date_created: at(1),
            date_modified: at(1),
        }
    }

    fn slot(id: i64, subject_id: i64) -> OlympicsSubject {
        OlympicsSubject {
            id,
            olympics_id: 1,
            subject_id,
            questions_count: 20,
            ball: 5,
            created_by: 4,
            modified_by: Some(4),
            date_created: at(1),
            date_modified: at(1),
        }
    }

    fn creator() -> UserListItem {
        UserListItem {
            id: 4,
            username: "teacher_ra".to_string(),
            role: "teacher".to_string(),
        }
    }

    #[test]
    fn absent_subjects_key_means_no_subjects() {
        let input: OlympicPostInput = serde_json::from_value(json!({
            "title": "Autumn",
            "image": null,
            "text": "",
            "time_start": "2024-10-01T09:00:00Z",
            "time_end": "2024-10-01T12:00:00Z"
        }))
        .unwrap();
        assert!(input.subjects.is_empty());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn read_only_fields_cannot_be_smuggled_into_creation() {
        let input: OlympicPostInput = serde_json::from_value(json!({
            "title": "Autumn",
            "text": "x",
            "time_start": "2024-10-01T09:00:00Z",
            "time_end": "2024-10-01T12:00:00Z",
            "created_by": 999,
            "modified_by": 999,
            "date_created": "1999-01-01T00:00:00Z",
            "results": [{"id": 1}],
            "subjects": [{"id": 77, "subject": 3, "questions_count": 10, "ball": 2, "created_by": 999}]
        }))
        .unwrap();
        assert_eq!(
            input.subjects,
            vec![OlympicSubjectInput {
                subject: 3,
                questions_count: 10,
                ball: 2
            }]
        );
    }

    #[test]
    fn nested_subject_errors_are_reported() {
        let input = OlympicPostInput {
            title: "T".to_string(),
            image: None,
            text: String::new(),
            time_start: at(9),
            time_end: at(10),
            subjects: vec![OlympicSubjectInput {
                subject: 1,
                questions_count: 10,
                ball: -3,
            }],
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.errors().contains_key("subjects"));
    }

    #[test]
    fn update_with_only_title_changes_only_title() {
        let before = olympic();
        let mut after = before.clone();
        let patch: OlympicUpdateInput =
            serde_json::from_value(json!({"title": "Renamed"})).unwrap();
        patch.apply(&mut after);

        assert_eq!(after.title, "Renamed");
        assert_eq!(after.image, before.image);
        assert_eq!(after.text, before.text);
        assert_eq!(after.time_start, before.time_start);
        assert_eq!(after.time_end, before.time_end);
    }

    #[test]
    fn explicit_null_clears_image_but_absent_keeps_it() {
        let mut cleared = olympic();
        serde_json::from_value::<OlympicUpdateInput>(json!({"image": null}))
            .unwrap()
            .apply(&mut cleared);
        assert_eq!(cleared.image, None);

        let mut kept = olympic();
        serde_json::from_value::<OlympicUpdateInput>(json!({}))
            .unwrap()
            .apply(&mut kept);
        assert_eq!(kept, olympic());
    }

    #[test]
    fn update_ignores_audit_fields() {
        let patch: OlympicUpdateInput = serde_json::from_value(json!({
            "created_by": 1000,
            "modified_by": 1000,
            "date_modified": "2000-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(patch, OlympicUpdateInput::default());
    }

    #[test]
    fn image_refs_are_checked() {
        assert!(validate_image_ref("https://cdn.example.com/a.png").is_ok());
        assert!(validate_image_ref("olympics/2024/a.png").is_ok());
        assert!(validate_image_ref("../etc/passwd").is_err());
        assert!(validate_image_ref("/abs/path.png").is_err());
        assert!(validate_image_ref("http://").is_err());

        let patch = OlympicUpdateInput {
            image: Some(Some("olympics/../../x".to_string())),
            ..Default::default()
        };
        assert!(patch.check().is_err());
    }

    #[test]
    fn item_nests_every_subject_with_its_author() {
        let subjects = vec![slot(1, 10), slot(2, 11), slot(3, 12)];
        let item = OlympicItem::project(&olympic(), creator(), &subjects, &[]);
        assert_eq!(item.subjects.len(), 3);
        assert!(item.subjects.iter().all(|s| s.created_by == 4));
        assert_eq!(item.created_by.username, "teacher_ra");
    }

    #[test]
    fn detail_keeps_author_as_id() {
        let detail = OlympicDetail::project(&olympic(), &[slot(1, 10)], vec![]);
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["created_by"], 4);
        assert_eq!(value["subjects"][0]["subject"], 10);
    }

    #[test]
    fn subject_list_item_expands_subject_and_drops_timestamps() {
        let subject = Subject {
            id: 10,
            name: "Mathematics".to_string(),
        };
        let value =
            serde_json::to_value(OlympicSubjectListItem::project(&slot(1, 10), subject)).unwrap();
        assert_eq!(value["subject"]["name"], "Mathematics");
        assert!(value.get("date_created").is_none());
        assert!(value.get("date_modified").is_none());
    }

    #[test]
    fn writable_subset_round_trips() {
        let subjects = vec![slot(1, 10), slot(2, 11)];
        let item = OlympicItem::project(&olympic(), creator(), &subjects, &[]);
        let wire = serde_json::to_value(&item).unwrap();

        let input: OlympicPostInput = serde_json::from_value(wire).unwrap();
        assert_eq!(input.title, item.title);
        assert_eq!(input.image, item.image);
        assert_eq!(input.text, item.text);
        assert_eq!(input.time_start, item.time_start);
        assert_eq!(input.time_end, item.time_end);
        let resubmitted: Vec<(i64, i32, i32)> = input
            .subjects
            .iter()
            .map(|s| (s.subject, s.questions_count, s.ball))
            .collect();
        assert_eq!(resubmitted, vec![(10, 20, 5), (11, 20, 5)]);
    }

    #[test]
    fn read_only_tables_cover_audit_fields() {
        for field in ["created_by", "modified_by", "date_created", "date_modified"] {
            assert!(OLYMPICS_READ_ONLY_FIELDS.contains(&field));
            assert!(OLYMPICS_SUBJECT_READ_ONLY_FIELDS.contains(&field));
        }
    }
}
