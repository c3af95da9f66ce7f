mod account;
mod conf;
mod identity;
mod server;
mod settings;
mod share;
mod system;

use clap::Parser;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::Method;
use identity::StaticIdentityProvider;
use server::proto::smb_admin_server::SmbAdminServer;
use server::SmbAdminService;
use settings::{read_settings, DaemonSettings};
use std::path::PathBuf;
use std::sync::Arc;
use system::SystemRunner;
use tonic::transport::Server;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_ADDR: &str = "127.0.0.1:50061";
const DEFAULT_SETTINGS: &str = "/etc/smbadmin/settings.json";
const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost,https://localhost,http://127.0.0.1,https://127.0.0.1";

/// smbadmin daemon - Samba share and account administration service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, env = "SMBADMIN_ADDR", default_value = DEFAULT_ADDR)]
    addr: String,

    /// Path to the daemon settings file. Missing file means defaults
    /// (including /etc/samba/smb.conf as the share configuration).
    #[arg(short, long, env = "SMBADMIN_SETTINGS", default_value = DEFAULT_SETTINGS)]
    settings: PathBuf,

    /// Comma-separated list of allowed CORS origins.
    /// Use "*" to allow all origins (not recommended for production).
    #[arg(
        long,
        env = "SMBADMIN_CORS_ORIGINS",
        default_value = DEFAULT_CORS_ORIGINS,
        value_delimiter = ','
    )]
    cors_origins: Vec<String>,
}

// Include the file descriptor set for gRPC reflection
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("smbadmin_descriptor");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse CLI arguments
    let args = Args::parse();

    // Parse address
    let addr = args.addr.parse()?;

    // Load settings, falling back to defaults when the file is absent
    let daemon_settings = match read_settings(&args.settings).await? {
        Some(loaded) => {
            info!("loaded settings from {}", args.settings.display());
            loaded
        }
        None => {
            info!(
                "no settings file at {}, using defaults",
                args.settings.display()
            );
            DaemonSettings::default()
        }
    };
    info!(
        "share configuration file: {}",
        daemon_settings.conf_path.display()
    );

    // Process CORS origins
    let cors_origins: Vec<String> = args
        .cors_origins
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let allow_all_origins = cors_origins.iter().any(|o| o == "*");

    info!(
        "CORS origins: {}",
        if allow_all_origins {
            "*".to_string()
        } else {
            cors_origins.join(", ")
        }
    );

    let settings = Arc::new(daemon_settings);
    let runner = Arc::new(SystemRunner);

    let mut service = SmbAdminService::new(settings.clone(), runner);

    // Gate mutations when the settings file names actors
    let provider = StaticIdentityProvider::from_settings(&settings);
    if !provider.is_empty() {
        info!("identity gating enabled ({} actors)", settings.admins.len());
        service = service.with_identity(Arc::new(provider));
    }

    // Create reflection service
    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;

    // Configure CORS for gRPC-Web
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            if allow_all_origins {
                return true;
            }

            if let Ok(origin_str) = origin.to_str() {
                cors_origins
                    .iter()
                    .any(|allowed| origin_str.starts_with(allowed))
            } else {
                false
            }
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            "x-grpc-web".parse().unwrap(),
            "x-user-agent".parse().unwrap(),
            "grpc-timeout".parse().unwrap(),
        ])
        .expose_headers([
            "grpc-status".parse().unwrap(),
            "grpc-message".parse().unwrap(),
            "grpc-status-details-bin".parse().unwrap(),
        ]);

    info!("Starting smbadmin daemon on {} (gRPC + gRPC-Web)", addr);

    Server::builder()
        .accept_http1(true) // Required for gRPC-Web
        .layer(cors)
        .layer(tonic_web::GrpcWebLayer::new())
        .add_service(reflection_service)
        .add_service(SmbAdminServer::new(service))
        .serve_with_shutdown(addr, async {
            tokio::signal::ctrl_c().await.ok();
            info!("Received shutdown signal, stopping server...");
        })
        .await?;

    info!("smbadmin daemon stopped");
    Ok(())
}
