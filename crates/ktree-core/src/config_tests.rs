//! Config module tests

use crate::config::{Config, GeneratorConfig, LlmConfig};

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(config.llm.api_key.is_none());
    assert_eq!(config.llm.fallback_models.len(), 2);
    assert!(config.llm.token_budget.is_none());

    assert_eq!(config.generator.pass_ratio, 0.10);
    assert_eq!(config.generator.forward_max_complexity, 3);
    assert_eq!(config.generator.backward_min_complexity, 2);
    assert_eq!(config.generator.max_iterations, 100);
    assert_eq!(config.generator.error_threshold, 20);
    assert!(config.generator.rng_seed.is_none());

    assert!(config.extractors.wikipedia);
    assert!(!config.extractors.web_search);
    assert!(config.extractors.citations);
}

#[test]
fn test_generator_config_roundtrips_through_toml() {
    let generator = GeneratorConfig {
        pass_ratio: 0.5,
        rng_seed: Some(7),
        ..GeneratorConfig::default()
    };
    let config = Config {
        generator,
        ..Config::default()
    };

    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.generator.pass_ratio, 0.5);
    assert_eq!(parsed.generator.rng_seed, Some(7));
}

#[test]
fn test_partial_toml_uses_section_defaults() {
    let parsed: Config = toml::from_str("[generator]\npass_ratio = 0.25\nforward_max_complexity = 2\nbackward_min_complexity = 1\nmax_iterations = 5\nerror_threshold = 3\n").unwrap();
    assert_eq!(parsed.generator.max_iterations, 5);
    assert_eq!(parsed.llm.default_model, LlmConfig::default().default_model);
    assert!(parsed.extractors.wikipedia);
}

#[test]
fn test_set_pass_ratio_validates_range() {
    let mut config = Config::default();
    config.set("generator.pass_ratio", "0.5").unwrap();
    assert_eq!(config.generator.pass_ratio, 0.5);

    assert!(config.set("generator.pass_ratio", "0").is_err());
    assert!(config.set("generator.pass_ratio", "1.5").is_err());
    assert!(config.set("generator.pass_ratio", "abc").is_err());
    assert_eq!(config.generator.pass_ratio, 0.5);
}

#[test]
fn test_set_max_iterations_rejects_zero() {
    let mut config = Config::default();
    assert!(config.set("generator.max_iterations", "0").is_err());
    config.set("generator.max_iterations", "7").unwrap();
    assert_eq!(config.get("generator.max_iterations").unwrap(), "7");
}

#[test]
fn test_set_extractor_flags() {
    let mut config = Config::default();
    config.set("extractors.web_search", "yes").unwrap();
    config.set("extractors.wikipedia", "off").unwrap();
    assert!(config.extractors.web_search);
    assert!(!config.extractors.wikipedia);
    assert!(config.set("extractors.citations", "maybe").is_err());
}

#[test]
fn test_api_key_cannot_be_set() {
    let mut config = Config::default();
    let err = config.set("llm.api_key", "sk-test").unwrap_err();
    assert!(err.to_string().contains("environment variable"));
}

#[test]
fn test_stored_api_key_fails_validation() {
    let mut config = Config::default();
    config.llm.api_key = Some("sk-secret".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn test_unknown_key() {
    let config = Config::default();
    let err = config.get("nope").unwrap_err();
    assert!(err.to_string().contains("ktree config list"));
}

#[test]
fn test_list_contains_generator_keys() {
    let config = Config::default();
    let entries = config.list().unwrap();
    let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
    assert!(keys.contains(&"generator.pass_ratio"));
    assert!(keys.contains(&"generator.max_iterations"));
    assert!(keys.contains(&"storage.database_path"));
}

#[test]
fn test_unset_optional_values_render_placeholders() {
    let config = Config::default();
    assert_eq!(config.get("generator.rng_seed").unwrap(), "(random)");
    assert_eq!(config.get("llm.token_budget").unwrap(), "(unlimited)");
    assert_eq!(config.get("llm.base_url").unwrap(), "(default)");
}
