// shopfront/src/activity/mod.rs
pub mod logger;
pub mod session;

pub use logger::{ActivityLogger, ActivityReport, DEFAULT_REPORT_BUDGET};
pub use session::{generate_session_id, load_or_create_session_id};
