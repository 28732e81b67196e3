use std::{fmt::Display, time::Duration};

use anyhow::{Result, anyhow};
use langs_dal::language::Language;
use langs_server::config::{Parser, ServerConfig};
use rand::Rng as _;
use reqwest::Url;
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tracing::info;

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(3030..4030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
}

/// Server configuration backed by a fresh SQLite file in a temporary directory.
pub fn test_config(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix(format!("{}_", test_name))?;
    let db_file = tmp_data_dir.path().join("languages.db");
    let database_url = format!("sqlite://{}", db_file.to_string_lossy());
    let port = random_port()?.to_string();
    let args = &[
        "langs-e2e-tests",
        "--port",
        &port,
        "--database-url",
        &database_url,
        "--init-schema",
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
        },
    ))
}

pub fn base_url(config: &ServerConfig) -> Url {
    Url::parse(&format!("http://127.0.0.1:{}/", config.port)).expect("valid base url")
}

pub fn api_url(base_url: &Url) -> Url {
    base_url
        .join(langs_app::rest_api::LANGUAGES_PATH.trim_start_matches('/'))
        .expect("valid api url")
}

pub fn extend_url(url: &Url, segment: impl Display) -> Url {
    let mut url = url.clone();
    url.path_segments_mut()
        .expect("base url")
        .push(&segment.to_string());
    url
}

/// Stops the server when dropped.
pub struct ServerGuard {
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn wait_for_health(client: &reqwest::Client, base_url: &Url) -> Result<()> {
    let health_url = base_url.join("health")?;
    for _ in 0..50 {
        if let Ok(response) = client.get(health_url.clone()).send().await {
            if response.status().is_success() {
                return Ok(());
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    Err(anyhow!("Server did not become healthy"))
}

/// Starts the server in the background and waits until it answers.
pub async fn launch_env(args: ServerConfig) -> Result<(reqwest::Client, ServerGuard)> {
    let base_url = base_url(&args);
    let state = langs_server::run::build_state(&args).await?;
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async move {
            let _ = rx.await;
        };
        if let Err(e) = langs_server::run::run_graceful_with_state(args, state, shutdown).await {
            tracing::error!("Server error: {e}");
        }
    });

    let client = reqwest::Client::new();
    wait_for_health(&client, &base_url).await?;
    info!("Test server ready at {base_url}");
    Ok((
        client,
        ServerGuard {
            shutdown: Some(tx),
        },
    ))
}

pub async fn create_language(
    client: &reqwest::Client,
    base_url: &Url,
    name: &str,
    year: i64,
    last_version: &str,
) -> Result<Language> {
    let payload = json!({"name": name, "year": year, "last_version": last_version});
    let response = client.post(api_url(base_url)).json(&payload).send().await?;
    assert_eq!(response.status().as_u16(), 201);

    let new_language: Language = response.json().await?;
    Ok(new_language)
}
