use chrono::{DateTime, Utc};
use std::env;

const BAD_PATH_CHARS: &[char] = &['\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Replace characters that are unsafe in file names and URLs with `_`.
pub fn secure_path(path: &str) -> String {
    path.chars()
        .map(|c| if BAD_PATH_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

fn is_ci_run() -> bool {
    env::var("CI").is_ok_and(|v| v == "true")
}

fn is_replaying() -> bool {
    env::var("RECORD").is_ok_and(|v| v == "false")
}

/// Build id embedded in names: the CI build when recording in CI, else `local`.
pub fn build_id() -> String {
    match env::var("BUILD_BUILDID") {
        Ok(id) if is_ci_run() && !is_replaying() => id,
        _ => "local".to_string(),
    }
}

/// Unique, URL-safe name for entities created by an acceptance run.
///
/// Shape: `tf-<test name>-<build>-<unix seconds>`. Kept short since some
/// endpoints cap name length.
pub fn unique_entity_name_at(test_name: &str, build: &str, now: DateTime<Utc>) -> String {
    format!("tf-{}-{}-{}", secure_path(test_name), build, now.timestamp()).replace('/', "-")
}

pub fn unique_entity_name(test_name: &str) -> String {
    unique_entity_name_at(test_name, &build_id(), Utc::now())
}
