//! Workspace configuration (`lexirep.toml`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::deck::DeckPolicy;
use crate::scheduler::{Scheduler, SchedulerConfig};

/// Environment variable that replaces `state_file`.
pub const STATE_FILE_ENV: &str = "LEXIREP_STATE_FILE";

/// Top-level lexirep configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexirepConfig {
    /// JSON file holding memory states and progress.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    /// Word list file or directory of word lists.
    #[serde(default = "default_words")]
    pub words: PathBuf,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub session: DeckPolicy,
}

fn default_state_file() -> PathBuf {
    PathBuf::from("lexirep-state.json")
}

fn default_words() -> PathBuf {
    PathBuf::from("words")
}

impl Default for LexirepConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            words: default_words(),
            scheduler: SchedulerConfig::default(),
            session: DeckPolicy::default(),
        }
    }
}

impl LexirepConfig {
    /// Build the scheduler this configuration describes.
    pub fn build_scheduler(&self) -> Result<Scheduler> {
        Scheduler::new(self.scheduler.clone()).context("invalid [scheduler] configuration")
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
pub fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    // Substituted values are not expanded again.
    while let Some(start) = result[from..].find("${").map(|i| from + i) {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
            from = start + value.len();
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path, base: Option<&Path>) -> PathBuf {
    let resolved = PathBuf::from(resolve_env_vars(&path.to_string_lossy()));
    match base {
        Some(base) if resolved.is_relative() => base.join(resolved),
        _ => resolved,
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `lexirep.toml` in the current directory
/// 2. `~/.config/lexirep/config.toml`
///
/// Relative paths inside a config file are taken relative to that file.
/// `LEXIREP_STATE_FILE` overrides the state file location.
pub fn load_config_from(path: Option<&Path>) -> Result<LexirepConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("lexirep.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let (config, base) = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<LexirepConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            let base = path.parent().map(Path::to_path_buf);
            (config, base)
        }
        None => (LexirepConfig::default(), None),
    };

    Ok(finish(config, base.as_deref(), std::env::var(STATE_FILE_ENV).ok()))
}

fn finish(
    mut config: LexirepConfig,
    base: Option<&Path>,
    state_file: Option<String>,
) -> LexirepConfig {
    if let Some(state_file) = state_file {
        config.state_file = PathBuf::from(state_file);
    }
    config.state_file = resolve_path(&config.state_file, base);
    config.words = resolve_path(&config.words, base);
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("lexirep"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_LEXIREP_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_LEXIREP_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_LEXIREP_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("unterminated ${"), "unterminated ${");
        std::env::remove_var("_LEXIREP_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_reexpand_values() {
        std::env::set_var("_LEXIREP_SELF_REF", "${_LEXIREP_SELF_REF}");
        assert_eq!(
            resolve_env_vars("a/${_LEXIREP_SELF_REF}/b"),
            "a/${_LEXIREP_SELF_REF}/b"
        );
        std::env::remove_var("_LEXIREP_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = LexirepConfig::default();
        assert_eq!(config.state_file, PathBuf::from("lexirep-state.json"));
        assert_eq!(config.session.max_new, 5);
        assert!(config.scheduler.enable_fuzz);
        assert!(config.build_scheduler().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
state_file = "data/state.json"

[scheduler]
request_retention = 0.85
enable_fuzz = false

[session]
max_review = 20
"#;
        let config: LexirepConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.words, PathBuf::from("words"));
        assert_eq!(config.scheduler.request_retention, 0.85);
        assert_eq!(config.scheduler.maximum_interval, 36500);
        assert_eq!(config.session.max_review, 20);
        assert_eq!(config.session.max_new, 5);
        assert!(config.session.shuffle);
    }

    #[test]
    fn invalid_scheduler_section_is_reported() {
        let config: LexirepConfig = toml::from_str("[scheduler]\nrequest_retention = 1.5").unwrap();
        let err = config.build_scheduler().unwrap_err();
        assert!(format!("{err:#}").contains("request retention"));
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/lexirep.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexirep.toml");
        std::fs::write(&path, "state_file = \"state.json\"\nwords = \"/abs/words\"\n").unwrap();
        let config: LexirepConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let config = finish(config, Some(dir.path()), None);
        assert_eq!(config.state_file, dir.path().join("state.json"));
        assert_eq!(config.words, PathBuf::from("/abs/words"));
    }

    #[test]
    fn state_file_override_wins() {
        let config = finish(
            LexirepConfig::default(),
            None,
            Some("/tmp/elsewhere.json".into()),
        );
        assert_eq!(config.state_file, PathBuf::from("/tmp/elsewhere.json"));
    }
}
