//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Knowledge Tree configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub extractors: ExtractorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(skip)]
    pub api_key: Option<String>,
    pub default_model: String,
    pub fallback_models: Vec<String>,
    pub temperature: f32,
    pub max_tokens: usize,
    pub timeout_secs: u64,
    /// Override for the chat completions endpoint base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Maximum tokens (input + output) a single process may spend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_budget: Option<u64>,
}

/// Tuning for the forward/backward generation loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Fraction of the target handled by each pass
    pub pass_ratio: f64,
    /// Highest complexity level a forward pass uses as a seed
    pub forward_max_complexity: u32,
    /// Lowest complexity level a backward pass traces from
    pub backward_min_complexity: u32,
    /// Safety cap on orchestrator iterations
    pub max_iterations: usize,
    /// A run with this many errors or more is not considered successful
    pub error_threshold: usize,
    /// Seed for seed/target sampling; random when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    pub wikipedia: bool,
    pub web_search: bool,
    pub citations: bool,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: "anthropic/claude-sonnet-4-20250514".to_string(),
            fallback_models: vec![
                "anthropic/claude-3-5-haiku-latest".to_string(),
                "openai/gpt-4o".to_string(),
            ],
            temperature: 0.3,
            max_tokens: 2048,
            timeout_secs: 60,
            base_url: None,
            token_budget: None,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            pass_ratio: 0.10,
            forward_max_complexity: 3,
            backward_min_complexity: 2,
            max_iterations: 100,
            error_threshold: 20,
            rng_seed: None,
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            wikipedia: true,
            web_search: false,
            citations: true,
            timeout_secs: 10,
            user_agent: "KnowledgeTree/1.0 (knowledge-tree-generator)".to_string(),
        }
    }
}

impl LlmConfig {
    pub fn resolved_api_key(&self) -> anyhow::Result<Option<String>> {
        self.enforce_env_only()?;

        Ok(env::var("KTREE_API_KEY")
            .or_else(|_| env::var("OPENROUTER_API_KEY"))
            .ok())
    }

    pub fn redacted_api_key(&self) -> anyhow::Result<Option<String>> {
        self.resolved_api_key().map(|opt| {
            opt.map(|key| {
                if key.len() <= 4 {
                    "***".to_string()
                } else {
                    format!("***{}", &key[key.len() - 4..])
                }
            })
        })
    }

    pub fn enforce_env_only(&self) -> anyhow::Result<()> {
        if self.api_key.is_some() {
            return Err(anyhow!(
                "LLM API keys must be provided via environment variables, not stored in configuration"
            ));
        }
        Ok(())
    }
}

impl StorageConfig {
    /// Database path, falling back to the platform data directory
    pub fn resolved_database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(crate::storage::default_database_path)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("KTREE_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("knowledge-tree")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or use defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.llm.enforce_env_only()?;

        let ratio = self.generator.pass_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(anyhow!("generator.pass_ratio must be in (0, 1], got {}", ratio));
        }
        if self.generator.max_iterations == 0 {
            return Err(anyhow!("generator.max_iterations must be at least 1"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "llm.default_model" => Ok(self.llm.default_model.clone()),
            "llm.fallback_models" => Ok(self.llm.fallback_models.join(", ")),
            "llm.temperature" => Ok(self.llm.temperature.to_string()),
            "llm.max_tokens" => Ok(self.llm.max_tokens.to_string()),
            "llm.timeout_secs" => Ok(self.llm.timeout_secs.to_string()),
            "llm.base_url" => Ok(self.llm.base_url.clone().unwrap_or_else(|| "(default)".to_string())),
            "llm.token_budget" => Ok(self
                .llm
                .token_budget
                .map(|b| b.to_string())
                .unwrap_or_else(|| "(unlimited)".to_string())),

            "generator.pass_ratio" => Ok(self.generator.pass_ratio.to_string()),
            "generator.forward_max_complexity" => Ok(self.generator.forward_max_complexity.to_string()),
            "generator.backward_min_complexity" => Ok(self.generator.backward_min_complexity.to_string()),
            "generator.max_iterations" => Ok(self.generator.max_iterations.to_string()),
            "generator.error_threshold" => Ok(self.generator.error_threshold.to_string()),
            "generator.rng_seed" => Ok(self
                .generator
                .rng_seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "(random)".to_string())),

            "extractors.wikipedia" => Ok(self.extractors.wikipedia.to_string()),
            "extractors.web_search" => Ok(self.extractors.web_search.to_string()),
            "extractors.citations" => Ok(self.extractors.citations.to_string()),
            "extractors.timeout_secs" => Ok(self.extractors.timeout_secs.to_string()),

            "storage.database_path" => Ok(self.storage.resolved_database_path().display().to_string()),

            "llm.api_key" | "api_key" => match self.llm.redacted_api_key()? {
                Some(redacted) => Ok(redacted),
                None => Ok("(not set - use KTREE_API_KEY or OPENROUTER_API_KEY env var)".to_string()),
            },

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `ktree config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "llm.default_model" => {
                self.llm.default_model = value.to_string();
            }
            "llm.fallback_models" => {
                self.llm.fallback_models = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "llm.temperature" => {
                let temp: f32 = value
                    .parse()
                    .with_context(|| format!("Invalid temperature value: {}", value))?;
                if !(0.0..=2.0).contains(&temp) {
                    return Err(anyhow!("Temperature must be between 0.0 and 2.0"));
                }
                self.llm.temperature = temp;
            }
            "llm.max_tokens" => {
                self.llm.max_tokens = value
                    .parse()
                    .with_context(|| format!("Invalid max_tokens value: {}", value))?;
            }
            "llm.timeout_secs" => {
                self.llm.timeout_secs = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs value: {}", value))?;
            }
            "llm.base_url" => {
                self.llm.base_url = Some(value.trim_end_matches('/').to_string());
            }
            "llm.token_budget" => {
                self.llm.token_budget = Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid token_budget value: {}", value))?,
                );
            }

            "generator.pass_ratio" => {
                let ratio: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid pass_ratio value: {}", value))?;
                if !(ratio > 0.0 && ratio <= 1.0) {
                    return Err(anyhow!("Pass ratio must be greater than 0.0 and at most 1.0"));
                }
                self.generator.pass_ratio = ratio;
            }
            "generator.forward_max_complexity" => {
                self.generator.forward_max_complexity = value
                    .parse()
                    .with_context(|| format!("Invalid forward_max_complexity value: {}", value))?;
            }
            "generator.backward_min_complexity" => {
                self.generator.backward_min_complexity = value
                    .parse()
                    .with_context(|| format!("Invalid backward_min_complexity value: {}", value))?;
            }
            "generator.max_iterations" => {
                let max: usize = value
                    .parse()
                    .with_context(|| format!("Invalid max_iterations value: {}", value))?;
                if max == 0 {
                    return Err(anyhow!("max_iterations must be at least 1"));
                }
                self.generator.max_iterations = max;
            }
            "generator.error_threshold" => {
                self.generator.error_threshold = value
                    .parse()
                    .with_context(|| format!("Invalid error_threshold value: {}", value))?;
            }
            "generator.rng_seed" => {
                self.generator.rng_seed = Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid rng_seed value: {}", value))?,
                );
            }

            "extractors.wikipedia" => {
                self.extractors.wikipedia = parse_bool(value)?;
            }
            "extractors.web_search" => {
                self.extractors.web_search = parse_bool(value)?;
            }
            "extractors.citations" => {
                self.extractors.citations = parse_bool(value)?;
            }
            "extractors.timeout_secs" => {
                self.extractors.timeout_secs = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs value: {}", value))?;
            }

            "storage.database_path" => {
                self.storage.database_path = Some(PathBuf::from(value));
            }

            "llm.api_key" | "api_key" => {
                return Err(anyhow!(
                    "API keys cannot be stored in configuration for security. \
                     Set the KTREE_API_KEY or OPENROUTER_API_KEY environment variable instead."
                ));
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `ktree config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "llm.default_model",
            "llm.fallback_models",
            "llm.temperature",
            "llm.max_tokens",
            "llm.timeout_secs",
            "llm.base_url",
            "llm.token_budget",
            "llm.api_key",
            "generator.pass_ratio",
            "generator.forward_max_complexity",
            "generator.backward_min_complexity",
            "generator.max_iterations",
            "generator.error_threshold",
            "generator.rng_seed",
            "extractors.wikipedia",
            "extractors.web_search",
            "extractors.citations",
            "extractors.timeout_secs",
            "storage.database_path",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(anyhow!("Expected a boolean (true/false), got: {}", value)),
    }
}
