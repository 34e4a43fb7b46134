//! Stamps GIT_HASH, BUILD_TIMESTAMP and BUILD_PROFILE for `/api/buildinfo`
//!
//! Packagers building from a tarball can set `FCPA_GIT_HASH`; reproducible
//! builds set `SOURCE_DATE_EPOCH` to pin the timestamp.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rustc-env=GIT_HASH={}", git_hash());
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", build_timestamp());
    println!(
        "cargo:rustc-env=BUILD_PROFILE={}",
        env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string())
    );
}

/// Short commit hash with a `-dirty` suffix for uncommitted changes
fn git_hash() -> String {
    if let Ok(hash) = env::var("FCPA_GIT_HASH") {
        return hash;
    }
    Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=8", "--exclude=*"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// RFC 3339 build time, local offset unless `SOURCE_DATE_EPOCH` is set
fn build_timestamp() -> String {
    let pinned = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|secs| secs.trim().parse::<i64>().ok())
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0));
    match pinned {
        Some(utc) => utc.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        None => chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false),
    }
}
