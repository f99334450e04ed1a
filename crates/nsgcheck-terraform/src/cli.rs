use std::path::Path;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::OutputError;
use crate::outputs::ParsedOutputs;

/// Run `terraform output -json` (or `tofu`) in `dir` and parse the result.
///
/// Read-only: never runs init/plan/apply, so a missing or stale state
/// surfaces as a terraform error rather than a mutation.
pub async fn load_outputs(binary: &str, dir: &Path) -> Result<ParsedOutputs, OutputError> {
    debug!(binary, dir = %dir.display(), "reading terraform outputs");

    let output = Command::new(binary)
        .args(["output", "-json", "-no-color"])
        .current_dir(dir)
        .env("TF_IN_AUTOMATION", "1")
        .env("TF_INPUT", "0")
        .output()
        .await
        .map_err(|e| OutputError::Spawn { binary: binary.to_string(), source: e })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(binary, code, "terraform output exited non-zero");
        return Err(OutputError::CommandFailed {
            binary: binary.to_string(),
            code,
            stderr,
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    ParsedOutputs::from_json_str(&stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let err = load_outputs("definitely-not-terraform", Path::new("."))
            .await
            .unwrap_err();
        assert!(matches!(err, OutputError::Spawn { .. }), "got: {}", err);
    }
}
