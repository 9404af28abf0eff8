use chrono::Utc;
use std::process::Command;

// Exposes GIT_HASH and BUILD_TIME to `/health/version`.
fn main() {
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=BUILD_TIME={}", Utc::now().to_rfc3339());
    println!("cargo:rerun-if-changed=.git/HEAD");
}
