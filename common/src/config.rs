use once_cell::sync::OnceCell;
use std::{env, fs};

/// Process-wide settings resolved from the environment once at startup.
#[derive(Debug)]
pub struct Config {
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub grading_config: String,
    pub report_file: String,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

impl Config {
    pub fn init(env_path: &str) -> &'static Self {
        dotenvy::from_filename(env_path).ok();

        CONFIG.get_or_init(|| {
            let project_name = env::var("PROJECT_NAME").unwrap_or_else(|_| "autograder".into());
            let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
            let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/grader.log".into());
            let grading_config =
                env::var("GRADING_CONFIG").unwrap_or_else(|_| "config.json".into());
            let report_file =
                env::var("REPORT_FILE").unwrap_or_else(|_| "grading_report.txt".into());

            if let Some(parent) = std::path::Path::new(&log_file).parent() {
                fs::create_dir_all(parent).expect("Failed to create log directory");
            }

            Config {
                project_name,
                log_level,
                log_file,
                grading_config,
                report_file,
            }
        })
    }

    pub fn get() -> &'static Self {
        CONFIG.get().expect("Config not initialized")
    }
}
