//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes error messages, rebuild progress and ticker replies.

pub const CONFIG_PARSE_ERROR: &str = "Failed to parse YAML";

pub fn config_read_error(path: &str) -> String {
    format!("Failed to read {path}")
}

pub fn startup_announcement(version: &str) -> String {
    format!("... and I'm back! Git tag: {version}")
}

pub fn not_understood(user: &str) -> String {
    format!("@{user} Wat?")
}

pub fn error_message(detail: &str) -> String {
    format!("⚠️ **Error**: {detail}")
}

pub fn no_user_information(text: &str, err: &str) -> String {
    format!("No user information: {text} ({err})")
}

/// Prefix for everything echoed to the console in Local mode
pub fn console_line(text: &str) -> String {
    format!(">>  {text}")
}

pub const REBUILD_REQUESTED: &str = "Rebuild requested. Locked.";
pub const RESTARTING: &str = "...Restarting...";
pub const NO_OUTPUT: &str = "(no output)";

pub fn pulling_branch(branch: &str) -> String {
    format!("pulling origin/{branch}...")
}

pub fn checking_out(branch: &str) -> String {
    format!("checking out {branch}...")
}

pub fn building(command: &str) -> String {
    format!("building with `{command}`...")
}

pub fn step_output(output: &str) -> String {
    if output.trim().is_empty() {
        NO_OUTPUT.to_string()
    } else {
        format!("```\n{}\n```", output.trim_end())
    }
}

pub fn step_failed(err: &str) -> String {
    format!("ERROR: {}", err.trim_end())
}

pub fn restart_failed(err: &str) -> String {
    format!("Build succeeded but restart failed: {err}")
}

pub fn ticker_quote(base: &str, currency: &str, amount: &str, at: &str) -> String {
    format!("₿ {base}/{currency}: {amount} (as of {at})")
}

pub fn ticker_failed(err: &str) -> String {
    format!("Bitcoin ticker unavailable: {err}")
}
