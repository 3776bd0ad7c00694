use crate::{CmdloopConfig, ConfigError, LogLevel};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

pub struct ConfigLoader {
    explicit_file: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            search_paths.push(home.join(".config/cmdloop/cmdloop.yaml"));
        }
        search_paths.push(PathBuf::from("./cmdloop.yaml"));

        #[cfg(unix)]
        search_paths.insert(0, PathBuf::from("/etc/cmdloop/cmdloop.yaml"));

        Self {
            explicit_file: None,
            search_paths,
        }
    }

    #[must_use]
    pub fn with_file(mut self, path: &str) -> Self {
        self.explicit_file = Some(PathBuf::from(path));
        self
    }

    pub fn load(&self) -> Result<CmdloopConfig, ConfigError> {
        self.load_with_env_path(std::env::var("CMDLOOP_CONFIG").ok().as_deref())
    }

    /// An explicit file wins over `CMDLOOP_CONFIG`, which wins over the
    /// search paths.
    fn load_with_env_path(&self, env_path: Option<&str>) -> Result<CmdloopConfig, ConfigError> {
        let mut config = if let Some(ref explicit) = self.explicit_file {
            self.read_file(explicit)?
        } else if let Some(env_path) = env_path {
            self.read_file(Path::new(env_path))?
        } else {
            let mut merged = Value::Mapping(Mapping::new());
            for path in &self.search_paths {
                if path.exists() {
                    if let Ok(content) = std::fs::read_to_string(path) {
                        tracing::debug!(path = %path.display(), "merging config file");
                        merge_values(&mut merged, self.parse_value(&content)?);
                    }
                }
            }
            serde_yaml::from_value(merged)?
        };

        self.apply_env_overrides(&mut config);
        Ok(config)
    }

    fn read_file(&self, path: &Path) -> Result<CmdloopConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse_yaml(&content)
    }

    fn parse_yaml(&self, content: &str) -> Result<CmdloopConfig, ConfigError> {
        let expanded = self.expand_env_vars(content);
        Ok(serde_yaml::from_str(&expanded)?)
    }

    fn parse_value(&self, content: &str) -> Result<Value, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Value::Null);
        }
        let expanded = self.expand_env_vars(content);
        Ok(serde_yaml::from_str(&expanded)?)
    }

    fn expand_env_vars(&self, content: &str) -> String {
        let Ok(re) = Regex::new(r"\$\{([^}]+)\}") else {
            return content.to_string();
        };
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_default()
        })
        .to_string()
    }

    fn apply_env_overrides(&self, config: &mut CmdloopConfig) {
        if let Ok(prompt) = std::env::var("CMDLOOP_PROMPT") {
            config.shell.prompt = prompt;
        }
        if let Ok(message) = std::env::var("CMDLOOP_WELCOME_MESSAGE") {
            config.shell.welcome_message = message;
        }
        if let Ok(message) = std::env::var("CMDLOOP_EXIT_MESSAGE") {
            config.shell.exit_message = message;
        }
        if let Some(show) = env_flag("CMDLOOP_SHOW_WELCOME") {
            config.shell.show_welcome_message = show;
        }
        if let Some(show) = env_flag("CMDLOOP_SHOW_EXIT") {
            config.shell.show_exit_message = show;
        }
        if let Ok(level) = std::env::var("CMDLOOP_LOG_LEVEL") {
            match serde_yaml::from_str::<LogLevel>(&level) {
                Ok(l) => config.logging.level = l,
                Err(_) => tracing::warn!(value = %level, "ignoring invalid CMDLOOP_LOG_LEVEL"),
            }
        }
    }
}

/// Overlay the keys present in `overlay` onto `base`, recursing into mappings.
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay,
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(variable = name, value = %value, "ignoring invalid boolean");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn expand_env_vars_works() {
        std::env::set_var("CMDLOOP_TEST_VAR_123", "hello");
        let loader = ConfigLoader::new();
        let result = loader.expand_env_vars("value: ${CMDLOOP_TEST_VAR_123}");
        assert_eq!(result, "value: hello");
        std::env::remove_var("CMDLOOP_TEST_VAR_123");
    }

    #[test]
    fn missing_env_var_becomes_empty() {
        let loader = ConfigLoader::new();
        let result = loader.expand_env_vars("value: ${NONEXISTENT_VAR_XYZ}");
        assert_eq!(result, "value: ");
    }

    #[test]
    fn env_overrides_config() {
        std::env::set_var("CMDLOOP_WELCOME_MESSAGE", "hi there");
        std::env::set_var("CMDLOOP_SHOW_WELCOME", "no");
        let mut config = CmdloopConfig::default();
        let loader = ConfigLoader::new();
        loader.apply_env_overrides(&mut config);
        assert_eq!(config.shell.welcome_message, "hi there");
        assert!(!config.shell.show_welcome_message);
        std::env::remove_var("CMDLOOP_WELCOME_MESSAGE");
        std::env::remove_var("CMDLOOP_SHOW_WELCOME");
    }

    #[test]
    fn load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "shell:\n  prompt: \"calc> \"\n  exit_message: \"see you\"").unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path().to_str().unwrap())
            .load()
            .unwrap();
        assert_eq!(config.shell.prompt, "calc> ");
        assert_eq!(config.shell.exit_message, "see you");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = ConfigLoader::new()
            .with_file("/definitely/not/here/cmdloop.yaml")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    fn yaml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    fn loader_with_layers(layers: &[&tempfile::NamedTempFile]) -> ConfigLoader {
        ConfigLoader {
            explicit_file: None,
            search_paths: layers.iter().map(|f| f.path().to_path_buf()).collect(),
        }
    }

    #[test]
    fn later_layer_wins_even_when_setting_default() {
        let system = yaml_file("shell:\n  prompt: \"$ \"\n  show_exit_message: false\n");
        let local = yaml_file("shell:\n  prompt: \"> \"\n");

        let config = loader_with_layers(&[&system, &local])
            .load_with_env_path(None)
            .unwrap();
        assert_eq!(config.shell.prompt, "> ");
        assert!(!config.shell.show_exit_message);
    }

    #[test]
    fn layers_keep_keys_they_do_not_mention() {
        let system = yaml_file("shell:\n  exit_message: \"bye\"\nlogging:\n  level: debug\n");
        let empty = yaml_file("");
        let local = yaml_file("logging:\n  filter: \"cmdloop=trace\"\n");

        let config = loader_with_layers(&[&system, &empty, &local])
            .load_with_env_path(None)
            .unwrap();
        assert_eq!(config.shell.exit_message, "bye");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.filter, "cmdloop=trace");
    }

    #[test]
    fn explicit_file_wins_over_env_path() {
        let from_env = yaml_file("shell:\n  prompt: \"from-env> \"\n");
        let from_flag = yaml_file("shell:\n  prompt: \"from-flag> \"\n");
        let env_path = from_env.path().to_str().unwrap();

        let config = ConfigLoader::new()
            .with_file(from_flag.path().to_str().unwrap())
            .load_with_env_path(Some(env_path))
            .unwrap();
        assert_eq!(config.shell.prompt, "from-flag> ");

        let config = ConfigLoader::new().load_with_env_path(Some(env_path)).unwrap();
        assert_eq!(config.shell.prompt, "from-env> ");
    }
}
