use crate::error::Result;
pub use clap::Parser;

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about = "REST API for a catalogue of programming languages")]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 3000,
        env = "LANGS_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "LANGS_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "LANGS_DATABASE_URL",
        default_value = "sqlite://languages.db",
        help = "Database URL e.g. sqlite://file.db, the file is created if missing"
    )]
    pub database_url: String,

    #[arg(
        long,
        env = "LANGS_MAX_CONNECTIONS",
        default_value_t = langs_dal::DEFAULT_MAX_CONNECTIONS,
        help = "Maximum number of pooled database connections"
    )]
    pub max_connections: u32,

    #[arg(
        long,
        env = "LANGS_INIT_SCHEMA",
        help = "Create the languages table on startup if it does not exist"
    )]
    pub init_schema: bool,

    #[arg(long, env = "LANGS_CORS", help = "Enable permissive CORS")]
    pub cors: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn listen_addr(&self) -> Result<std::net::SocketAddr> {
        let ip: std::net::IpAddr = self.listen_address.parse()?;
        Ok(std::net::SocketAddr::from((ip, self.port)))
    }
}
