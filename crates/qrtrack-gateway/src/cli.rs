use clap::{Args, Parser, ValueEnum};
use qrtrack_gateway::presenter::{DEFAULT_HANDOFF_SCHEME, ScanPresenter};
use qrtrack_telemetry::{LogFormat, TelemetryConfig};
use qrtrack_uploader::cloudinary::DEFAULT_API_BASE;
use qrtrack_uploader::CloudinaryConfig;
use sqlx::postgres::PgConnectOptions;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const LISTEN_HOST_ENV: &str = "QRTRACK_LISTEN_HOST";
pub const PORT_ENV: &str = "QRTRACK_PORT";
pub const PUBLIC_BASE_URL_ENV: &str = "QRTRACK_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "QRTRACK_STORAGE_BACKEND";
pub const DB_HOST_ENV: &str = "QRTRACK_DB_HOST";
pub const DB_PORT_ENV: &str = "QRTRACK_DB_PORT";
pub const DB_USER_ENV: &str = "QRTRACK_DB_USER";
pub const DB_PASSWORD_ENV: &str = "QRTRACK_DB_PASSWORD";
pub const DB_NAME_ENV: &str = "QRTRACK_DB_NAME";
pub const DB_MAX_CONNECTIONS_ENV: &str = "QRTRACK_DB_MAX_CONNECTIONS";
pub const CLOUDINARY_CLOUD_NAME_ENV: &str = "QRTRACK_CLOUDINARY_CLOUD_NAME";
pub const CLOUDINARY_API_KEY_ENV: &str = "QRTRACK_CLOUDINARY_API_KEY";
pub const CLOUDINARY_API_SECRET_ENV: &str = "QRTRACK_CLOUDINARY_API_SECRET";
pub const CLOUDINARY_API_BASE_ENV: &str = "QRTRACK_CLOUDINARY_API_BASE";
pub const STAGING_DIR_ENV: &str = "QRTRACK_STAGING_DIR";
pub const SCAN_MODE_ENV: &str = "QRTRACK_SCAN_MODE";
pub const HANDOFF_SCHEME_ENV: &str = "QRTRACK_HANDOFF_SCHEME";
pub const HANDOFF_DELAY_MS_ENV: &str = "QRTRACK_HANDOFF_DELAY_MS";
pub const LOG_FORMAT_ENV: &str = "QRTRACK_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "QRTRACK_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_HANDOFF_DELAY_MS: u64 = 1500;

const SERVICE_NAME: &str = "qrtrack";

/// Loads `.env` from the working directory or one of its parents into the
/// process environment. Variables that are already set win.
pub fn load_env_file() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "postgres")]
    Postgres,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanModeArg {
    #[value(name = "direct")]
    Direct,
    #[value(name = "handoff")]
    Handoff,
}

impl Display for ScanModeArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanModeArg::Direct => write!(f, "direct"),
            ScanModeArg::Handoff => write!(f, "handoff"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Args)]
pub struct DatabaseArgs {
    #[arg(long, env = DB_HOST_ENV, default_value = DEFAULT_DB_HOST)]
    pub db_host: String,

    #[arg(long, env = DB_PORT_ENV, default_value_t = DEFAULT_DB_PORT)]
    pub db_port: u16,

    #[arg(long, env = DB_USER_ENV, required_if_eq("storage", "postgres"))]
    pub db_user: Option<String>,

    #[arg(long, env = DB_PASSWORD_ENV, hide_env_values = true)]
    pub db_password: Option<String>,

    #[arg(long, env = DB_NAME_ENV, required_if_eq("storage", "postgres"))]
    pub db_name: Option<String>,

    #[arg(long, env = DB_MAX_CONNECTIONS_ENV, default_value_t = DEFAULT_DB_MAX_CONNECTIONS)]
    pub db_max_connections: u32,
}

impl DatabaseArgs {
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port);
        if let Some(user) = &self.db_user {
            options = options.username(user);
        }
        if let Some(password) = &self.db_password {
            options = options.password(password);
        }
        if let Some(name) = &self.db_name {
            options = options.database(name);
        }
        options
    }
}

#[derive(Debug, Args)]
pub struct CloudinaryArgs {
    #[arg(long, env = CLOUDINARY_CLOUD_NAME_ENV)]
    pub cloudinary_cloud_name: String,

    #[arg(long, env = CLOUDINARY_API_KEY_ENV)]
    pub cloudinary_api_key: String,

    #[arg(long, env = CLOUDINARY_API_SECRET_ENV, hide_env_values = true)]
    pub cloudinary_api_secret: String,

    #[arg(long, env = CLOUDINARY_API_BASE_ENV, default_value = DEFAULT_API_BASE)]
    pub cloudinary_api_base: String,
}

impl CloudinaryArgs {
    pub fn config(&self) -> CloudinaryConfig {
        CloudinaryConfig::builder()
            .cloud_name(self.cloudinary_cloud_name.as_str())
            .api_key(self.cloudinary_api_key.as_str())
            .api_secret(self.cloudinary_api_secret.as_str())
            .api_base(self.cloudinary_api_base.as_str())
            .build()
    }
}

#[derive(Debug, Parser)]
#[command(name = "qrtrack")]
pub struct Cli {
    #[arg(long, env = LISTEN_HOST_ENV, default_value = DEFAULT_LISTEN_HOST)]
    pub listen_host: IpAddr,

    #[arg(long, env = PORT_ENV, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Origin encoded into every QR code, e.g. `https://qr.example.com`.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Postgres
    )]
    pub storage: StorageBackendArg,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub cloudinary: CloudinaryArgs,

    /// Directory for rendered images awaiting upload. Defaults to the system temp dir.
    #[arg(long, env = STAGING_DIR_ENV)]
    pub staging_dir: Option<PathBuf>,

    #[arg(
        long,
        env = SCAN_MODE_ENV,
        value_enum,
        default_value_t = ScanModeArg::Direct
    )]
    pub scan_mode: ScanModeArg,

    #[arg(long, env = HANDOFF_SCHEME_ENV, default_value = DEFAULT_HANDOFF_SCHEME)]
    pub handoff_scheme: String,

    #[arg(long, env = HANDOFF_DELAY_MS_ENV, default_value_t = DEFAULT_HANDOFF_DELAY_MS)]
    pub handoff_delay_ms: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl Cli {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_host, self.port)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn presenter(&self) -> ScanPresenter {
        match self.scan_mode {
            ScanModeArg::Direct => ScanPresenter::Direct,
            ScanModeArg::Handoff => ScanPresenter::handoff(
                self.handoff_scheme.as_str(),
                Duration::from_millis(self.handoff_delay_ms),
            ),
        }
    }

    pub fn telemetry(&self) -> TelemetryConfig {
        let format = match self.log_format {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        };

        match &self.otlp_endpoint {
            Some(endpoint) => TelemetryConfig::builder()
                .service_name(SERVICE_NAME)
                .format(format)
                .otlp_endpoint(endpoint.as_str())
                .build(),
            None => TelemetryConfig::builder()
                .service_name(SERVICE_NAME)
                .format(format)
                .build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 7] = [
        "qrtrack",
        "--cloudinary-cloud-name",
        "demo",
        "--cloudinary-api-key",
        "key",
        "--cloudinary-api-secret",
        "secret",
    ];

    fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(REQUIRED.iter().chain(extra.iter()))
    }

    #[test]
    fn defaults() {
        let cli = parse(&["--storage", "in-memory"]).unwrap();

        assert_eq!(cli.listen_addr(), "0.0.0.0:3000".parse().unwrap());
        assert_eq!(cli.public_base_url, DEFAULT_PUBLIC_BASE_URL);
        assert_eq!(cli.presenter(), ScanPresenter::Direct);
        assert_eq!(cli.database.db_port, 5432);
    }

    #[test]
    fn postgres_requires_credentials() {
        assert!(parse(&["--storage", "postgres"]).is_err());
        assert!(parse(&[
            "--storage",
            "postgres",
            "--db-user",
            "qrtrack",
            "--db-name",
            "qrtrack"
        ])
        .is_ok());
    }

    #[test]
    fn settings_from_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "QRTRACK_CLOUDINARY_CLOUD_NAME=from-file\n\
             QRTRACK_CLOUDINARY_API_KEY=file-key\n\
             QRTRACK_CLOUDINARY_API_SECRET=file-secret\n\
             QRTRACK_STORAGE_BACKEND=in-memory\n",
        )
        .unwrap();

        dotenvy::from_path(&path).unwrap();
        let cli = Cli::try_parse_from(["qrtrack"]).unwrap();

        assert_eq!(cli.cloudinary.cloudinary_cloud_name, "from-file");
        assert_eq!(cli.cloudinary.cloudinary_api_key, "file-key");
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
    }

    #[test]
    fn handoff_mode() {
        let cli = parse(&[
            "--storage",
            "in-memory",
            "--scan-mode",
            "handoff",
            "--handoff-delay-ms",
            "800",
        ])
        .unwrap();

        assert_eq!(
            cli.presenter(),
            ScanPresenter::handoff(DEFAULT_HANDOFF_SCHEME, Duration::from_millis(800))
        );
    }
}
