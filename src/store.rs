use chrono::{Duration, Utc};
use dashmap::DashMap;
use uuid::{Uuid, uuid};

use crate::models::{
    Defect, DefectSeverity, DefectStatus, TestCase, TestCasePriority, TestRun, TestRunStatus,
};

// In-memory entity stores, one DashMap per entity keyed by id. Seeded with
// sample rows at startup; contents live for the process lifetime.

pub struct TestCaseStore {
    items: DashMap<Uuid, TestCase>,
}

impl TestCaseStore {
    pub fn seeded() -> Self {
        let store = Self {
            items: DashMap::new(),
        };
        for test_case in seed_test_cases() {
            store.items.insert(test_case.id, test_case);
        }
        store
    }

    pub fn get(&self, id: Uuid) -> Option<TestCase> {
        self.items.get(&id).map(|entry| entry.value().clone())
    }

    // Filtered, title-ordered page plus the total match count
    pub fn list(
        &self,
        priority: Option<TestCasePriority>,
        is_active: Option<bool>,
        tag: Option<&str>,
        page: usize,
        page_size: usize,
    ) -> (Vec<TestCase>, usize) {
        let mut matches: Vec<TestCase> = self
            .items
            .iter()
            .filter(|entry| priority.is_none_or(|p| entry.priority == p))
            .filter(|entry| is_active.is_none_or(|a| entry.is_active == a))
            .filter(|entry| {
                tag.is_none_or(|t| entry.tags.iter().any(|have| have.eq_ignore_ascii_case(t)))
            })
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by(|a, b| a.title.cmp(&b.title));

        let total = matches.len();
        let items = matches
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();
        (items, total)
    }

    pub fn insert(&self, test_case: TestCase) {
        self.items.insert(test_case.id, test_case);
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.items.remove(&id).is_some()
    }
}

pub struct TestRunStore {
    items: DashMap<Uuid, TestRun>,
}

impl TestRunStore {
    pub fn seeded() -> Self {
        let store = Self {
            items: DashMap::new(),
        };
        for test_run in seed_test_runs() {
            store.items.insert(test_run.id, test_run);
        }
        store
    }

    pub fn get(&self, id: Uuid) -> Option<TestRun> {
        self.items.get(&id).map(|entry| entry.value().clone())
    }

    pub fn list(&self) -> Vec<TestRun> {
        let mut runs: Vec<TestRun> = self.items.iter().map(|entry| entry.value().clone()).collect();
        runs.sort_by(|a, b| a.name.cmp(&b.name));
        runs
    }

    pub fn insert(&self, test_run: TestRun) {
        self.items.insert(test_run.id, test_run);
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.items.remove(&id).is_some()
    }

    // Delete-conflict check for test cases
    pub fn any_references(&self, test_case_id: Uuid) -> bool {
        self.items
            .iter()
            .any(|entry| entry.test_case_ids.contains(&test_case_id))
    }
}

pub struct DefectStore {
    items: DashMap<Uuid, Defect>,
}

impl DefectStore {
    pub fn seeded() -> Self {
        let store = Self {
            items: DashMap::new(),
        };
        for defect in seed_defects() {
            store.items.insert(defect.id, defect);
        }
        store
    }

    pub fn get(&self, id: Uuid) -> Option<Defect> {
        self.items.get(&id).map(|entry| entry.value().clone())
    }

    pub fn list(&self) -> Vec<Defect> {
        let mut defects: Vec<Defect> = self.items.iter().map(|entry| entry.value().clone()).collect();
        defects.sort_by_key(|d| d.created_at);
        defects
    }

    pub fn insert(&self, defect: Defect) {
        self.items.insert(defect.id, defect);
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.items.remove(&id).is_some()
    }
}

fn seed_test_cases() -> Vec<TestCase> {
    vec![
        TestCase {
            id: uuid!("550e8400-e29b-41d4-a716-446655440001"),
            title: "Verify login with valid credentials".to_string(),
            description: Some(
                "Test login functionality with correct username and password".to_string(),
            ),
            priority: TestCasePriority::High,
            is_active: true,
            tags: vec!["auth".to_string(), "login".to_string(), "smoke".to_string()],
        },
        TestCase {
            id: uuid!("550e8400-e29b-41d4-a716-446655440002"),
            title: "Verify user registration".to_string(),
            description: Some("Test new user registration flow".to_string()),
            priority: TestCasePriority::High,
            is_active: true,
            tags: vec!["auth".to_string(), "registration".to_string()],
        },
        TestCase {
            id: uuid!("550e8400-e29b-41d4-a716-446655440003"),
            title: "Verify API response time".to_string(),
            description: Some(
                "Test that API responds within acceptable time limits".to_string(),
            ),
            priority: TestCasePriority::Medium,
            is_active: true,
            tags: vec!["api".to_string(), "performance".to_string()],
        },
        TestCase {
            id: uuid!("550e8400-e29b-41d4-a716-446655440004"),
            title: "Test password reset flow".to_string(),
            description: Some("Verify password reset functionality".to_string()),
            priority: TestCasePriority::Medium,
            is_active: true,
            tags: vec!["auth".to_string(), "reset".to_string()],
        },
        TestCase {
            id: uuid!("550e8400-e29b-41d4-a716-446655440005"),
            title: "Verify pagination on list endpoint".to_string(),
            description: Some("Test pagination parameters work correctly".to_string()),
            priority: TestCasePriority::Low,
            is_active: false,
            tags: vec!["api".to_string(), "pagination".to_string()],
        },
    ]
}

fn seed_test_runs() -> Vec<TestRun> {
    vec![
        TestRun {
            id: uuid!("660e8400-e29b-41d4-a716-446655440001"),
            name: "Sprint 1 - Login Feature Testing".to_string(),
            status: TestRunStatus::Completed,
            executed_at: Some(Utc::now() - Duration::days(5)),
            test_case_ids: vec![
                uuid!("550e8400-e29b-41d4-a716-446655440001"),
                uuid!("550e8400-e29b-41d4-a716-446655440004"),
            ],
        },
        TestRun {
            id: uuid!("660e8400-e29b-41d4-a716-446655440002"),
            name: "Sprint 2 - Registration Feature Testing".to_string(),
            status: TestRunStatus::InProgress,
            executed_at: Some(Utc::now() - Duration::days(1)),
            test_case_ids: vec![uuid!("550e8400-e29b-41d4-a716-446655440002")],
        },
        TestRun {
            id: uuid!("660e8400-e29b-41d4-a716-446655440003"),
            name: "Performance Testing Cycle 1".to_string(),
            status: TestRunStatus::Planned,
            executed_at: None,
            test_case_ids: vec![uuid!("550e8400-e29b-41d4-a716-446655440003")],
        },
    ]
}

fn seed_defects() -> Vec<Defect> {
    vec![
        Defect {
            id: uuid!("770e8400-e29b-41d4-a716-446655440001"),
            title: "Login button not responding on mobile".to_string(),
            severity: DefectSeverity::Critical,
            status: DefectStatus::Open,
            linked_test_case_id: Some(uuid!("550e8400-e29b-41d4-a716-446655440001")),
            created_at: Utc::now() - Duration::days(3),
        },
        Defect {
            id: uuid!("770e8400-e29b-41d4-a716-446655440002"),
            title: "Email validation too strict".to_string(),
            severity: DefectSeverity::Major,
            status: DefectStatus::InProgress,
            linked_test_case_id: Some(uuid!("550e8400-e29b-41d4-a716-446655440002")),
            created_at: Utc::now() - Duration::days(5),
        },
        Defect {
            id: uuid!("770e8400-e29b-41d4-a716-446655440003"),
            title: "Typo in success message".to_string(),
            severity: DefectSeverity::Minor,
            status: DefectStatus::Resolved,
            linked_test_case_id: None,
            created_at: Utc::now() - Duration::days(10),
        },
        Defect {
            id: uuid!("770e8400-e29b-41d4-a716-446655440004"),
            title: "Password reset email delays".to_string(),
            severity: DefectSeverity::Major,
            status: DefectStatus::Closed,
            linked_test_case_id: Some(uuid!("550e8400-e29b-41d4-a716-446655440004")),
            created_at: Utc::now() - Duration::days(7),
        },
    ]
}
