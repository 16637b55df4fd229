use crate::config::types::{Config, FetcherConfig, OutputConfig, PipelineConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_pipeline_config(&config.pipeline)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    validate_header_text("user-agent", &config.user_agent)?;
    validate_header_text("accept", &config.accept)?;
    validate_header_text("accept-language", &config.accept_language)?;

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > 60 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be between 1 and 60, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates pipeline configuration
fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if let Some(ceiling) = config.page_ceiling {
        if ceiling < 1 || ceiling > 1000 {
            return Err(ConfigError::Validation(format!(
                "page_ceiling must be between 1 and 1000, got {}",
                ceiling
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if let Some(dir) = &config.assets_directory {
        if dir.is_empty() {
            return Err(ConfigError::Validation(
                "assets_directory cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates that a string can travel as an HTTP header value
fn validate_header_text(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} cannot be empty",
            name
        )));
    }

    if !value
        .chars()
        .all(|c| c.is_ascii() && !c.is_ascii_control())
    {
        return Err(ConfigError::Validation(format!(
            "{} must contain only printable ASCII characters, got '{}'",
            name, value
        )));
    }

    Ok(())
}
