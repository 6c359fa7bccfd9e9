use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TestCasePriority {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TestRunStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DefectSeverity {
    #[default]
    Minor,
    Major,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DefectStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: TestCasePriority,
    pub is_active: bool,
    pub tags: Vec<String>,
}

// Request bodies default missing fields instead of rejecting them; the
// handlers report validation problems with a 400, not a deserialize error
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestCaseRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TestCasePriority,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTestCaseRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TestCasePriority,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchTestCaseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TestCasePriority>,
    pub is_active: Option<bool>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    pub id: Uuid,
    pub name: String,
    pub status: TestRunStatus,
    pub executed_at: Option<DateTime<Utc>>,
    pub test_case_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestRunRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: TestRunStatus,
    #[serde(default)]
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub test_case_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTestRunRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: TestRunStatus,
    #[serde(default)]
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub test_case_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchTestRunRequest {
    pub name: Option<String>,
    pub status: Option<TestRunStatus>,
    pub executed_at: Option<DateTime<Utc>>,
    pub test_case_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defect {
    pub id: Uuid,
    pub title: String,
    pub severity: DefectSeverity,
    pub status: DefectStatus,
    pub linked_test_case_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDefectRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub severity: DefectSeverity,
    #[serde(default)]
    pub status: DefectStatus,
    #[serde(default)]
    pub linked_test_case_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDefectRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub severity: DefectSeverity,
    #[serde(default)]
    pub status: DefectStatus,
    #[serde(default)]
    pub linked_test_case_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchDefectRequest {
    pub title: Option<String>,
    pub severity: Option<DefectSeverity>,
    pub status: Option<DefectStatus>,
    pub linked_test_case_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
}

fn default_true() -> bool {
    true
}
