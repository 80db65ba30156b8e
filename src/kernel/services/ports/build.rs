use std::path::Path;

use super::GatewayResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    pub success: bool,
    pub output: String,
}

/// Persists `content` to `path`, builds it and optionally runs the result.
pub trait BuildGateway: Send + Sync {
    fn run_or_build(&self, path: &Path, content: &str) -> GatewayResult<BuildOutput>;
}
