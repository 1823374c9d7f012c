use std::path::PathBuf;
use std::sync::Once;

use crate::services::resolver::core::tags::Tag;
use crate::services::resolver::models::types::MediaRecord;

static INIT: Once = Once::new();

/// Initialize the test logger once per test binary.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Build a record the way the ingestion side would, panicking on bad fixtures.
pub fn record(system_id: &str, name: &str, tags: &[(&str, &str)]) -> MediaRecord {
    let path = PathBuf::from(format!("/media/{system_id}/{name}.rom"));
    let tags = tags.iter().map(|(t, v)| Tag::new(*t, *v)).collect();
    MediaRecord::new(system_id, path, name, tags).expect("fixture name must normalize")
}
