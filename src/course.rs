use serde::{Deserialize, Serialize};

/// The course a user has picked. Nothing in the app inspects it beyond
/// holding on to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}
