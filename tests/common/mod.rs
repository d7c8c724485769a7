//! Shared utilities for integration tests.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use static_alias::config::ServerConfig;
use static_alias::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    #[allow(dead_code)]
    pub config_updates: mpsc::UnboundedSender<ServerConfig>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the server with `config` on 127.0.0.1 and an ephemeral port.
pub async fn start_server(config: ServerConfig) -> TestServer {
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    start_server_with_updates(config, config_updates, updates_rx).await
}

/// Start the server reading reloads from `updates_rx`, e.g. a `ConfigWatcher`.
pub async fn start_server_with_updates(
    config: ServerConfig,
    config_updates: mpsc::UnboundedSender<ServerConfig>,
    updates_rx: mpsc::UnboundedReceiver<ServerConfig>,
) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    TestServer {
        addr,
        shutdown,
        config_updates,
    }
}

/// Parse a config from TOML with `root` set to `root`.
pub fn config_for(root: &Path, aliases: &str) -> ServerConfig {
    let mut config: ServerConfig = toml::from_str(aliases).unwrap();
    config.root = root.to_path_buf();
    config
}

/// Write `contents` at `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
