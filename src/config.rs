use crate::validation::is_valid_email;

const DEFAULT_PORT: &str = "8001";
const DEFAULT_COLLECTION: &str = "leads";
const DEFAULT_BRAND: &str = "ArcTrack";
const DEFAULT_EMAIL_API_BASE_URL: &str = "https://api.resend.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub leads_collection: String,
    pub port: u16,
    /// Recipient of new-lead notifications.
    pub admin_email: String,
    /// Sender header for outgoing mail.
    pub email_from: String,
    /// Email API key; `None` switches to the log-only transport.
    pub email_api_key: Option<String>,
    pub email_api_base_url: String,
    /// Product name used in email copy.
    pub brand_name: String,
    /// Allowed CORS origins; empty means permissive.
    pub cors_origins: Vec<String>,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn parse_cors_origins(raw: Option<String>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty() && *origin != "*")
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// First characters of a connection string, cut on a char boundary.
fn redacted_prefix(url: &str) -> String {
    url.chars().take(20).collect()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let brand_name = optional_var("BRAND_NAME").unwrap_or_else(|| DEFAULT_BRAND.to_string());

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("DB_URL"))
                .map_err(|_| {
                    anyhow::anyhow!("DATABASE_URL or DB_URL environment variable required")
                })
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("DATABASE_URL cannot be empty");
                    }
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })?,
            leads_collection: {
                let name = optional_var("LEADS_COLLECTION")
                    .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
                if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    anyhow::bail!("LEADS_COLLECTION may only contain letters, digits and '_'");
                }
                name
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            admin_email: std::env::var("ADMIN_EMAIL")
                .map_err(|_| anyhow::anyhow!("ADMIN_EMAIL environment variable required"))
                .and_then(|email| {
                    if !is_valid_email(email.trim()) {
                        anyhow::bail!("ADMIN_EMAIL must be a valid email address");
                    }
                    Ok(email.trim().to_string())
                })?,
            email_from: optional_var("EMAIL_FROM")
                .unwrap_or_else(|| format!("{} <onboarding@resend.dev>", brand_name)),
            email_api_key: optional_var("EMAIL_API_KEY").or_else(|| optional_var("RESEND_API_KEY")),
            email_api_base_url: optional_var("EMAIL_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_EMAIL_API_BASE_URL.to_string())
                .parse::<url::Url>()
                .map_err(|e| anyhow::anyhow!("EMAIL_API_BASE_URL is not a valid URL: {}", e))
                .and_then(|url| {
                    if url.scheme() != "http" && url.scheme() != "https" {
                        anyhow::bail!("EMAIL_API_BASE_URL must start with http:// or https://");
                    }
                    Ok(url.as_str().trim_end_matches('/').to_string())
                })?,
            brand_name,
            cors_origins: parse_cors_origins(optional_var("CORS_ORIGINS")),
            rate_limit_per_second: std::env::var("RATE_LIMIT_PER_SECOND")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow::anyhow!("RATE_LIMIT_PER_SECOND must be a positive number"))?,
            rate_limit_burst: std::env::var("RATE_LIMIT_BURST")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow::anyhow!("RATE_LIMIT_BURST must be a positive number"))?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Database URL: {}...", redacted_prefix(&config.database_url));
        tracing::debug!("Leads collection: {}", config.leads_collection);
        tracing::debug!("Server Port: {}", config.port);
        if config.email_api_key.is_some() {
            tracing::info!("Email API configured: {}", config.email_api_base_url);
        } else {
            tracing::warn!("EMAIL_API_KEY not set; notification emails will only be logged");
        }

        Ok(config)
    }
}
