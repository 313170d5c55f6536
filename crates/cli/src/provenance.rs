use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: the subcommand, its parameters and the domain.
#[derive(Debug, Serialize)]
pub struct Provenance {
    pub command: String,
    pub params: Value,
    /// Ω vertices in hull order.
    pub omega: Vec<[f64; 2]>,
}

impl Provenance {
    pub fn new(command: &str, params: Value, omega: Vec<[f64; 2]>) -> Self {
        Self {
            command: command.to_string(),
            params,
            omega,
        }
    }
}

/// Write `<stem>.provenance.json` next to `artifact`: git revision, callsite,
/// crate version, command, params, domain and outputs.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, prov: &Provenance) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let sidecar = sidecar_path(artifact);
    if let Some(parent) = sidecar.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "hilbert_version": hilbert::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "command": prov.command,
        "params": prov.params,
        "omega": prov.omega,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else "unknown".
pub fn current_git_rev() -> String {
    option_env!("GIT_COMMIT")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok().filter(|s| !s.is_empty()))
        .or_else(|| {
            Command::new("git")
                .args(["rev-parse", "HEAD"])
                .output()
                .ok()
                .filter(|o| o.status.success())
                .and_then(|o| String::from_utf8(o.stdout).ok())
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_replaces_the_extension() {
        let derived = sidecar_path(Path::new("/tmp/output/pimap.parquet"));
        assert_eq!(derived, Path::new("/tmp/output/pimap.provenance.json"));
        let bare = sidecar_path(Path::new("ball"));
        assert_eq!(bare, Path::new("ball.provenance.json"));
    }

    #[test]
    fn sidecar_records_command_and_outputs() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("d.json");
        fs::write(&artifact, "{}").unwrap();
        let prov = Provenance::new(
            "distance",
            json!({"sites": [[0.25, 0.5], [0.75, 0.5]]}),
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        );
        let path = write_sidecar(&artifact, &prov).unwrap();
        assert!(path.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["command"], "distance");
        assert_eq!(parsed["omega"].as_array().map(Vec::len), Some(4));
        assert_eq!(parsed["hilbert_version"], hilbert::VERSION);
    }
}
