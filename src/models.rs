use serde::{Deserialize, Serialize};

/// A subject row as reported by the portal, before grading.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Subject {
    pub code: String,
    pub name: String,
    pub internal: u32,
    pub external: u32,
    pub total: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Semester {
    pub semester: u32,
    pub subjects: Vec<Subject>,
}

/// Student identity plus every semester recovered from a result page.
///
/// An empty `semesters` list means the extraction failed.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResult {
    pub student_name: String,
    pub enrollment_no: String,
    pub programme: String,
    pub semesters: Vec<Semester>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GradedSubject {
    pub code: String,
    pub name: String,
    pub internal: u32,
    pub external: u32,
    pub total: u32,
    pub grade_point: u32,
    pub credits: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GradedSemester {
    pub semester: u32,
    pub subjects: Vec<GradedSubject>,
    pub sgpa: String,
    pub total_credits: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GradedResult {
    pub student_name: String,
    pub enrollment_no: String,
    pub programme: String,
    pub semesters: Vec<GradedSemester>,
    pub cgpa: String,
    pub total_credits: u32,
}

/// Envelope handed back to whoever asked for a result.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(message.into()) }
    }
}
