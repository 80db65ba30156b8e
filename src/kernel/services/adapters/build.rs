//! `make`-based build gateway.

use std::path::Path;
use std::process::Command;

use crate::kernel::services::ports::{BuildGateway, BuildOutput, FileGateway, GatewayResult};
use std::sync::Arc;

/// Writes the document, then runs `make` in its directory.
pub struct MakeBuildGateway {
    files: Arc<dyn FileGateway>,
    program: String,
}

impl MakeBuildGateway {
    pub fn new(files: Arc<dyn FileGateway>) -> Self {
        Self::with_program(files, "make")
    }

    pub fn with_program(files: Arc<dyn FileGateway>, program: impl Into<String>) -> Self {
        Self {
            files,
            program: program.into(),
        }
    }
}

impl BuildGateway for MakeBuildGateway {
    fn run_or_build(&self, path: &Path, content: &str) -> GatewayResult<BuildOutput> {
        match self.files.write_file(path, content) {
            GatewayResult::Ok(()) => {}
            GatewayResult::Canceled => return GatewayResult::Canceled,
            GatewayResult::Failed(e) => return GatewayResult::Failed(e),
        }

        let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) else {
            return GatewayResult::Failed(format!("{} has no parent folder", path.display()));
        };
        if !dir.join("Makefile").is_file() && !dir.join("makefile").is_file() {
            return GatewayResult::Ok(BuildOutput {
                success: false,
                output: format!("No Makefile found in {}", dir.display()),
            });
        }

        tracing::info!(dir = %dir.display(), program = %self.program, "running build");
        let output = match Command::new(&self.program).current_dir(dir).output() {
            Ok(output) => output,
            Err(e) => {
                return GatewayResult::Failed(format!("failed to run {}: {}", self.program, e))
            }
        };

        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        GatewayResult::Ok(BuildOutput {
            success: output.status.success(),
            output: text,
        })
    }
}
