use anyhow::Context;
use std::path::{Path, PathBuf};
use taskboard_dnd::DragConfig;

pub const DEFAULT_CONFIG_NAME: &str = "taskboard.config.json";

/// Load the drag config.
///
/// An explicit path must exist. Otherwise `taskboard.config.json` in `cwd`
/// is used when present, and the defaults when not.
pub fn load(cwd: &Path, explicit: Option<&Path>) -> anyhow::Result<DragConfig> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);
            if !path.exists() {
                return Ok(DragConfig::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Cannot read config {}", config_path.display()))?;
    let config: DragConfig = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config {}", config_path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_dnd::WriteMode;

    #[test]
    fn test_load_from_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "writeMode": "atomic", "activationDistance": 3 }"#,
        )
        .unwrap();

        let config = load(dir.path(), None).unwrap();
        assert_eq!(config.write_mode, WriteMode::Atomic);
        assert_eq!(config.activation_distance, 3.0);
        assert!(config.drag_enabled);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(dir.path(), None).unwrap();
        assert_eq!(config, DragConfig::default());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load(dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load(dir.path(), Some(&path)).is_err());
    }
}
