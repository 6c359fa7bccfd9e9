mod defects;
mod health;
mod metrics;
mod test_cases;
mod test_runs;

pub use defects::{create_defect, delete_defect, get_defect, list_defects, patch_defect, update_defect};
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use test_cases::{
    create_test_case, delete_test_case, get_test_case, list_test_cases, patch_test_case,
    update_test_case,
};
pub use test_runs::{
    create_test_run, delete_test_run, get_test_run, list_test_runs, patch_test_run,
    update_test_run,
};
