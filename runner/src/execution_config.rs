use serde::Deserialize;
use std::path::Path;

/// Resource limits for the sandboxed execution stage (Docker container).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub timeout_secs: u64,          // Max execution time inside the sandbox
    pub max_memory: String,         // Max memory (e.g., "128m")
    pub max_cpus: String,           // CPU share (e.g., "0.5")
    pub max_uncompressed_size: u64, // Max decompressed archive size (zip bomb protection)
    pub max_processes: u32,         // Max number of processes inside the container
    pub image: String,              // Sandbox image name
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            timeout_secs: 10,
            max_memory: "128m".to_string(),
            max_cpus: "0.5".to_string(),
            max_uncompressed_size: 50 * 1024 * 1024,
            max_processes: 64,
            image: "submission-runner".to_string(),
        }
    }
}

impl ExecutionConfig {
    /// Loads the optional `execution` object from the grading config file.
    /// Falls back to defaults if the file or the object is missing or
    /// cannot be parsed.
    pub fn from_config_file(path: &Path) -> Self {
        let Ok(text) = std::fs::read_to_string(path) else {
            return ExecutionConfig::default();
        };
        let Ok(doc) = serde_json::from_str::<serde_json::Value>(&text) else {
            return ExecutionConfig::default();
        };
        match doc.get("execution") {
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
                log::warn!("invalid execution config in {}: {}", path.display(), e);
                ExecutionConfig::default()
            }),
            None => ExecutionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_valid_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let config_json = r#"
        {
            "execution": {
                "timeout_secs": 15,
                "max_memory": "256m",
                "max_cpus": "1.5",
                "max_uncompressed_size": 10485760,
                "max_processes": 32,
                "image": "custom-runner"
            }
        }
        "#;
        fs::write(&config_path, config_json).unwrap();

        let cfg = ExecutionConfig::from_config_file(&config_path);
        assert_eq!(cfg.timeout_secs, 15);
        assert_eq!(cfg.max_memory, "256m");
        assert_eq!(cfg.max_cpus, "1.5");
        assert_eq!(cfg.max_uncompressed_size, 10 * 1024 * 1024);
        assert_eq!(cfg.max_processes, 32);
        assert_eq!(cfg.image, "custom-runner");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, r#"{ "execution": { "timeout_secs": 3 } }"#).unwrap();

        let cfg = ExecutionConfig::from_config_file(&config_path);
        assert_eq!(cfg.timeout_secs, 3);
        assert_eq!(cfg.max_memory, "128m");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cfg = ExecutionConfig::from_config_file(&temp_dir.path().join("none.json"));
        assert_eq!(cfg.timeout_secs, ExecutionConfig::default().timeout_secs);
    }

    #[test]
    fn test_missing_execution_object_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, r#"{ "assignments": {} }"#).unwrap();

        let cfg = ExecutionConfig::from_config_file(&config_path);
        assert_eq!(cfg.image, "submission-runner");
    }
}
