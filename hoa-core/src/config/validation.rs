//! Configuration validation module

use crate::config::{ActionLimitConfig, LlmConfig, RateLimitConfig, ServerConfig};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Server configuration error: {message}")]
    Server { message: String },

    #[error("Entitlements configuration error: {message}")]
    Entitlements { message: String },

    #[error("Rate limit configuration error: {message}")]
    RateLimit { message: String },

    #[error("LLM configuration error: {message}")]
    Llm { message: String },
}

impl ValidationError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn entitlements(message: impl Into<String>) -> Self {
        Self::Entitlements {
            message: message.into(),
        }
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
        }
    }

    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // u16 cannot exceed 65535, so only 0 needs rejecting
        if self.port == 0 {
            return Err(ValidationError::server(format!(
                "Port must be in range 1-65535, got {}",
                self.port
            )));
        }

        if self.host.is_empty() {
            return Err(ValidationError::server("Host cannot be empty"));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ValidationError::server(
                "Request timeout must be greater than 0",
            ));
        }

        Ok(())
    }
}

fn validate_action(name: &str, limit: &ActionLimitConfig) -> Result<(), ValidationError> {
    if limit.limit == 0 {
        return Err(ValidationError::rate_limit(format!(
            "{}.limit must be greater than 0",
            name
        )));
    }
    if limit.window_seconds == 0 {
        return Err(ValidationError::rate_limit(format!(
            "{}.window_seconds must be greater than 0",
            name
        )));
    }
    Ok(())
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.cleanup_interval_seconds == 0 {
            return Err(ValidationError::rate_limit(
                "cleanup_interval_seconds must be greater than 0",
            ));
        }

        validate_action("generate", &self.generate)?;
        validate_action("export", &self.export)?;
        validate_action("email", &self.email)?;
        validate_action("email_recipient", &self.email_recipient)?;

        Ok(())
    }
}

impl Validate for LlmConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_seconds == 0 {
            return Err(ValidationError::llm("timeout_seconds must be > 0"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::llm(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::llm("max_tokens must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_rejects_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::Server { .. })
        ));
    }

    #[test]
    fn test_rate_limit_rejects_zero_limit() {
        let mut config = RateLimitConfig::default();
        config.export.limit = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("export.limit"));
    }

    #[test]
    fn test_rate_limit_rejects_zero_window() {
        let mut config = RateLimitConfig::default();
        config.email_recipient.window_seconds = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("email_recipient.window_seconds"));
    }

    #[test]
    fn test_llm_rejects_out_of_range_temperature() {
        let config = LlmConfig {
            temperature: 3.5,
            ..LlmConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(ServerConfig::default().validate().is_ok());
        assert!(RateLimitConfig::default().validate().is_ok());
        assert!(LlmConfig::default().validate().is_ok());
    }
}
