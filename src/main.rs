use clap::{Parser, Subcommand};
use live_gal::config;
use live_gal::roots::RootRegistry;
use live_gal::server::{self, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "live-gal")]
#[command(about = "Browse image directories over HTTP with on-the-fly thumbnails")]
#[command(long_about = "\
Browse image directories over HTTP with on-the-fly thumbnails

Roots are read from config.json:

  {
    \"base_dirs\": { \"photos\": \"/srv/photos\", \"scans\": \"./scans\" }
  }

Without a config file, ./static is served as the root 'default'.

Routes:
  /                          list of roots
  /dir/<root>/<subdir>/      gallery page (?filter=<regex> narrows by file name)
  /img/<root>/<file>?w=&h=   JPEG thumbnail fitting w x h (original if omitted)

Run 'live-gal gen-config' to print a sample config.json.")]
#[command(version)]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:5000", global = true)]
    bind: SocketAddr,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the gallery (default)
    Serve,
    /// Print the configured roots and exit
    Roots,
    /// Print a sample config.json with all options
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            init_tracing()?;
            let (roots, site_config) = load_roots(&cli.config)?;
            serve(cli.bind, AppState::new(roots, site_config))?;
        }
        Command::Roots => {
            let (roots, _) = load_roots(&cli.config)?;
            for (name, dir) in roots.iter() {
                println!("{name}\t{}", dir.display());
            }
        }
        Command::GenConfig => {
            print!("{}", config::sample_config_json());
        }
    }

    Ok(())
}

fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Load the config file and resolve every root to an absolute path.
fn load_roots(
    path: &std::path::Path,
) -> Result<(RootRegistry, config::GalleryConfig), Box<dyn std::error::Error>> {
    let site_config = config::load_config(path)?;
    let roots = RootRegistry::from_config(&site_config)?;
    Ok((roots, site_config))
}

#[tokio::main]
async fn serve(bind: SocketAddr, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    for (name, dir) in state.roots.iter() {
        if dir.is_dir() {
            info!("Root '{}' → {}", name, dir.display());
        } else {
            warn!("Root '{}' → {} (missing, will answer 404)", name, dir.display());
        }
    }

    let app = server::router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on http://{}", bind);
    axum::serve(listener, app).await?;
    Ok(())
}
