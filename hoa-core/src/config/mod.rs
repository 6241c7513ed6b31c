//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub entitlements: EntitlementsConfig,
    pub rate_limit: RateLimitConfig,
    pub payments: PaymentsConfig,
    pub llm: LlmConfig,
    pub email: EmailConfig,
    pub communities: CommunityStoreConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whether to expose interactive API docs (Swagger UI). Should be false in hardened production.
    pub enable_docs: bool,
    /// Global request timeout in seconds applied at the HTTP layer.
    pub request_timeout_seconds: u64,
    /// Allowed CORS origins. Use ["*"] to allow any (development only). Empty vector -> no external origins.
    pub allowed_origins: Vec<String>,
    /// Seconds to wait for in-flight work after a shutdown signal
    pub shutdown_timeout_seconds: u64,
    /// Security configuration
    pub security: SecurityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_docs: true,
            request_timeout_seconds: 60, // generation calls can be slow
            allowed_origins: vec!["*".to_string()],
            shutdown_timeout_seconds: 5,
            security: SecurityConfig::default(),
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Whether to enable security headers
    pub enable_security_headers: bool,
    /// Whether to sanitize error messages in production
    pub sanitize_errors: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_security_headers: true,
            sanitize_errors: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. "info" or "hoa_core=debug,info"
    pub level: String,
    /// "json" or "pretty"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

/// Entitlement token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntitlementsConfig {
    /// HMAC key for signing entitlement tokens
    pub secret: Option<String>,
    /// When false, every verified entitlement state unlocks all paid capabilities
    pub paywall_enforced: bool,
}

impl Default for EntitlementsConfig {
    fn default() -> Self {
        Self {
            secret: None,
            paywall_enforced: true,
        }
    }
}

/// Limit for a single protected action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLimitConfig {
    /// Attempts allowed inside the window
    pub limit: u32,
    /// Trailing window length in seconds
    pub window_seconds: u64,
}

impl ActionLimitConfig {
    pub const fn new(limit: u32, window_seconds: u64) -> Self {
        Self {
            limit,
            window_seconds,
        }
    }

    pub fn window_millis(&self) -> i64 {
        i64::try_from(self.window_seconds.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}

/// Sliding-window rate limiting for the protected actions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled
    pub enabled: bool,
    /// How often idle buckets are swept (in seconds)
    pub cleanup_interval_seconds: u64,
    /// Letter generation, per client IP
    pub generate: ActionLimitConfig,
    /// Document export, per client IP
    pub export: ActionLimitConfig,
    /// Email sending, per client IP
    pub email: ActionLimitConfig,
    /// Email sending, per client IP and recipient
    pub email_recipient: ActionLimitConfig,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cleanup_interval_seconds: 300,
            generate: ActionLimitConfig::new(20, 60),
            export: ActionLimitConfig::new(10, 60),
            email: ActionLimitConfig::new(10, 60),
            email_recipient: ActionLimitConfig::new(3, 60),
        }
    }
}

impl RateLimitConfig {
    /// Longest configured window, used to decide when a bucket is idle
    pub fn longest_window_millis(&self) -> i64 {
        [
            self.generate,
            self.export,
            self.email,
            self.email_recipient,
        ]
        .iter()
        .map(ActionLimitConfig::window_millis)
        .max()
        .unwrap_or(60_000)
    }
}

/// Payment provider (Stripe) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentsConfig {
    /// Secret API key; payments are disabled when absent
    pub secret_key: Option<String>,
    /// Webhook signing secret, also the fallback entitlement signing secret
    pub webhook_secret: Option<String>,
    /// Price for a single letter
    pub single_price_id: Option<String>,
    /// Price for the monthly subscription
    pub subscription_price_id: Option<String>,
    /// Public base URL used for checkout redirects
    pub app_url: String,
    pub api_base_url: String,
    pub timeout_seconds: u64,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            webhook_secret: None,
            single_price_id: None,
            subscription_price_id: None,
            app_url: "http://localhost:3000".to_string(),
            api_base_url: "https://api.stripe.com".to_string(),
            timeout_seconds: 20,
        }
    }
}

/// Text generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key; generation is disabled when absent
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.4,
            max_tokens: 300,
            timeout_seconds: 45,
        }
    }
}

/// Outbound email (SendGrid) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// API key; email is disabled when absent
    pub api_key: Option<String>,
    /// Verified sender address
    pub from_address: Option<String>,
    pub api_base_url: String,
    pub timeout_seconds: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from_address: None,
            api_base_url: "https://api.sendgrid.com".to_string(),
            timeout_seconds: 15,
        }
    }
}

/// Community profile storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityStoreConfig {
    /// Supabase project URL; the in-memory store is used when absent
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub table: String,
    pub timeout_seconds: u64,
}

impl Default for CommunityStoreConfig {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_key: None,
            table: "communities".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Add environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        // Add local config and environment variables last (highest priority)
        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("HOA").separator("__"));

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.apply_env_overrides(|name| std::env::var(name).ok());

        config.validate()?;

        Ok(config)
    }

    /// Apply the conventional, unprefixed variable names used by hosting platforms.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(secret) = get("ENTITLEMENTS_SECRET") {
            self.entitlements.secret = Some(secret);
        }
        if let Some(flag) = get("PAYWALL_ENFORCED") {
            // Only an explicit "false" turns the paywall off.
            self.entitlements.paywall_enforced = flag.trim() != "false";
        }
        if let Some(value) = get("STRIPE_SECRET_KEY") {
            self.payments.secret_key = Some(value);
        }
        if let Some(value) = get("STRIPE_WEBHOOK_SECRET") {
            self.payments.webhook_secret = Some(value);
        }
        if let Some(value) = get("STRIPE_SINGLE_PRICE_ID") {
            self.payments.single_price_id = Some(value);
        }
        if let Some(value) = get("STRIPE_SUBSCRIPTION_PRICE_ID") {
            self.payments.subscription_price_id = Some(value);
        }
        if let Some(value) = get("APP_URL") {
            self.payments.app_url = value;
        }
        if let Some(value) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(value);
        }
        if let Some(value) = get("SENDGRID_API_KEY") {
            self.email.api_key = Some(value);
        }
        if let Some(value) = get("FROM_EMAIL") {
            self.email.from_address = Some(value);
        }
        if let Some(value) = get("SUPABASE_URL") {
            self.communities.supabase_url = Some(value);
        }
        if let Some(value) = get("SUPABASE_ANON_KEY") {
            self.communities.supabase_key = Some(value);
        }
    }

    /// Key used to sign entitlement tokens.
    ///
    /// Falls back to the payment webhook secret so a deployment only has to
    /// provision one secret.
    pub fn signing_secret(&self) -> Option<&str> {
        self.entitlements
            .secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                self.payments
                    .webhook_secret
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
            })
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.rate_limit.validate()?;
        self.llm.validate()?;

        if self.signing_secret().is_none() {
            return Err(ValidationError::entitlements(
                "A signing secret is required: set ENTITLEMENTS_SECRET (or STRIPE_WEBHOOK_SECRET)",
            ));
        }

        Ok(())
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
