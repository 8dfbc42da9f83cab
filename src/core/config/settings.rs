use super::parsing::{
    env_optional, env_or_default, parse_bool, parse_cors_origins, parse_email_list,
    parse_environment, parse_page_size, parse_u16, parse_u64,
};
use super::types::{
    ApiSettings, AuthSettings, ConfigError, CorsSettings, DatabaseSettings, PaginationSettings,
    RedisSettings, RuntimeSettings, ServerHost, ServerPort, ServerSettings, Settings,
    TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("ASSESS_HOST", "0.0.0.0");
        let port = env_or_default("ASSESS_PORT", "8000");

        let environment =
            parse_environment(env_optional("ASSESS_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("ASSESS_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "Assessment Hub API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_v1_str = env_or_default("API_V1_STR", "/api/v1");

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "postgres");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "assessments");
        let database_url = env_optional("DATABASE_URL");

        let redis_host = env_or_default("REDIS_HOST", "localhost");
        let redis_port = parse_u16("REDIS_PORT", env_or_default("REDIS_PORT", "6379"))?;
        let redis_db = parse_u16("REDIS_DB", env_or_default("REDIS_DB", "0"))?;
        let redis_password = env_or_default("REDIS_PASSWORD", "");

        let provider_url = env_or_default("AUTH_PROVIDER_URL", "");
        let anon_key = env_or_default("AUTH_PROVIDER_ANON_KEY", "");
        let jwt_secret = env_or_default("AUTH_JWT_SECRET", "");
        let jwt_audience = env_or_default("AUTH_JWT_AUDIENCE", "authenticated");
        let request_timeout_seconds = parse_u64(
            "AUTH_REQUEST_TIMEOUT_SECONDS",
            env_or_default("AUTH_REQUEST_TIMEOUT_SECONDS", "15"),
        )?;
        let admin_emails = parse_email_list(env_optional("ADMIN_EMAILS"));

        let admin_page_size =
            parse_page_size("ADMIN_PAGE_SIZE", env_or_default("ADMIN_PAGE_SIZE", "10"))?;
        let max_page_size = parse_page_size("MAX_PAGE_SIZE", env_or_default("MAX_PAGE_SIZE", "100"))?;

        let log_level = env_or_default("ASSESS_LOG_LEVEL", "info");
        let json = env_optional("ASSESS_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_v1_str },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
            },
            redis: RedisSettings {
                host: redis_host,
                port: redis_port,
                db: redis_db,
                password: redis_password,
            },
            auth: AuthSettings {
                provider_url: provider_url.trim_end_matches('/').to_string(),
                anon_key,
                jwt_secret,
                jwt_audience,
                request_timeout_seconds,
                admin_emails,
            },
            pagination: PaginationSettings { admin_page_size, max_page_size },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn redis(&self) -> &RedisSettings {
        &self.redis
    }

    pub(crate) fn auth(&self) -> &AuthSettings {
        &self.auth
    }

    pub(crate) fn pagination(&self) -> &PaginationSettings {
        &self.pagination
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.admin_page_size > self.pagination.max_page_size {
            return Err(ConfigError::InvalidValue {
                field: "ADMIN_PAGE_SIZE",
                value: self.pagination.admin_page_size.to_string(),
            });
        }

        if self.auth.request_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "AUTH_REQUEST_TIMEOUT_SECONDS",
                value: "0".to_string(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }
        if self.auth.provider_url.is_empty() {
            return Err(ConfigError::MissingSecret("AUTH_PROVIDER_URL"));
        }
        if self.auth.anon_key.is_empty() {
            return Err(ConfigError::MissingSecret("AUTH_PROVIDER_ANON_KEY"));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret("AUTH_JWT_SECRET"));
        }

        Ok(())
    }
}
