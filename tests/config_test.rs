// ============================================
// PETDIAG - Configuration Tests
// ============================================

#[cfg(test)]
mod config_tests {
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    use petdiag::llm::OPENROUTER_MODEL;
    use petdiag::{DiagnosisService, Settings};

    /// Full settings file round-trips through the loader
    #[test]
    fn test_full_settings_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[provider]
name = "OpenRouter"
base_url = "http://localhost:9999/api/v1"
model = "meta-llama/llama-3.3-8b-instruct:free"
temperature = 0.15
timeout_secs = 30
api_key = "sk-or-file"

[retry]
max_attempts = 3
initial_delay_ms = 100
max_delay_ms = 400

[cache]
capacity = 8

[server]
host = "0.0.0.0"
port = 8000
static_dir = "public"
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();

        assert_eq!(settings.provider.base_url, "http://localhost:9999/api/v1");
        assert_eq!(settings.provider.model, OPENROUTER_MODEL);
        assert_eq!(settings.provider.timeout_secs, Some(30));
        assert_eq!(settings.provider.resolve_api_key().as_deref(), Some("sk-or-file"));

        let retry = settings.retry.to_retry_config();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(retry.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(retry.delay_for_attempt(2), Duration::from_millis(400));

        assert_eq!(settings.cache.capacity, 8);
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.server.static_dir, std::path::PathBuf::from("public"));
    }

    /// Invalid TOML surfaces as an error, not silent defaults
    #[test]
    fn test_invalid_settings_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\nport = ").unwrap();

        assert!(Settings::load(Some(&path)).is_err());
    }

    /// Credential named by a custom env var
    #[test]
    fn test_custom_key_env() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[provider]
api_key_env = "PETDIAG_CONFIG_TEST_KEY"
"#,
        )
        .unwrap();

        std::env::set_var("PETDIAG_CONFIG_TEST_KEY", "sk-or-env");
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.provider.resolve_api_key().as_deref(), Some("sk-or-env"));

        let service = DiagnosisService::from_settings(&settings);
        assert!(service.is_configured());
        std::env::remove_var("PETDIAG_CONFIG_TEST_KEY");
    }

    /// No key anywhere leaves the service unconfigured
    #[test]
    fn test_service_unconfigured_without_key() {
        let mut settings = Settings::default();
        settings.provider.api_key_env = "PETDIAG_CONFIG_TEST_ABSENT".to_string();

        let service = DiagnosisService::from_settings(&settings);
        assert!(!service.is_configured());
        assert_eq!(service.cache_stats().max_entries, 128);
    }
}
