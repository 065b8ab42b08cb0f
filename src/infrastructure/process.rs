//! # Process Control
//!
//! Runs the external steps of a rebuild and hands over to the restart script.

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::traits::ProcessControl;

pub struct SystemProcess;

#[async_trait]
impl ProcessControl for SystemProcess {
    async fn run(&self, program: &str, args: &[String], dir: &str) -> Result<String, String> {
        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()
            .await
            .map_err(|e| format!("failed to run {program}: {e}"))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let err = String::from_utf8_lossy(&output.stderr).to_string();
            if err.trim().is_empty() {
                Err(format!("{program} exited with {}", output.status))
            } else {
                Err(err)
            }
        }
    }

    fn spawn_detached(&self, command: &str, dir: &str) -> Result<(), String> {
        // std rather than tokio: the child must outlive this runtime
        std::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(dir)
            .spawn()
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn exit(&self, code: i32) {
        tracing::warn!("{}", crate::strings::logs::exiting(code));
        std::process::exit(code);
    }
}
