use crate::auth::KeyDirectory;
use crate::rate_limit::RateLimiter;
use crate::store::{DefectStore, TestCaseStore, TestRunStore};

// app's shared state: the admission gate's collaborators plus the entity
// stores. Built once in main and handed to every request as Arc<AppState>.
pub struct AppState {
    pub directory: KeyDirectory,
    pub limiter: RateLimiter,
    pub test_cases: TestCaseStore,
    pub test_runs: TestRunStore,
    pub defects: DefectStore,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            directory: KeyDirectory::bundled(),
            limiter: RateLimiter::default(),
            test_cases: TestCaseStore::seeded(),
            test_runs: TestRunStore::seeded(),
            defects: DefectStore::seeded(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
