//! # Version Tag
//!
//! Builds the `<commit>/<branch>` identifier announced when the bot connects.

use tokio::process::Command;

pub const NO_TAG: &str = "NO TAG";

/// Asks git for the current commit and branch inside `workdir`. A missing
/// commit becomes `NO TAG`; a missing branch is left empty.
pub async fn discover(workdir: &str) -> String {
    let commit = git(workdir, &["rev-parse", "HEAD"]).await;
    let branch = git(workdir, &["rev-parse", "--abbrev-ref", "HEAD"]).await;
    format_tag(commit.as_deref(), branch.as_deref())
}

pub fn format_tag(commit: Option<&str>, branch: Option<&str>) -> String {
    let commit = commit.map(str::trim).filter(|c| !c.is_empty()).unwrap_or(NO_TAG);
    let branch = branch.map(str::trim).unwrap_or_default();
    format!("{commit}/{branch}")
}

async fn git(workdir: &str, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(workdir)
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).to_string())
}
