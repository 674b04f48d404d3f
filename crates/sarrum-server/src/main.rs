use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sarrum_lexicon::{Dictionary, LexiconOrigin, LexiconSource};
use sarrum_server::{AppState, ThrottleLayer, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_LEXICON: &str = "lexicon.txt";
const DEFAULT_RATE_LIMIT_RPS: u32 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("binding to {}:{}", config.host, config.port);
    info!("using lexicon at {}", config.lexicon_path.display());
    if config.disable_cache {
        info!("cache headers disabled");
    }
    info!("rate limit: {} req/s per client", config.rate_limit_rps);

    let text = fs::read_to_string(&config.lexicon_path)
        .with_context(|| format!("reading {}", config.lexicon_path.display()))?;
    let source = LexiconSource {
        text,
        version: config.lexicon_version,
        origin: LexiconOrigin::Cached,
    };

    let start = Instant::now();
    let dict = Dictionary::from_source(&source).context("parsing lexicon")?;
    info!("dictionary built in {} ms", start.elapsed().as_millis());

    let state = AppState {
        dict: Arc::new(dict),
        source: Arc::new(source),
        disable_cache: config.disable_cache,
    };

    let app = router(state)
        .layer(ThrottleLayer::new(config.rate_limit_rps))
        .layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid listen address")?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    lexicon_path: PathBuf,
    lexicon_version: Option<u64>,
    disable_cache: bool,
    rate_limit_rps: u32,
}

fn load_config() -> Config {
    let mut disable_cache = false;
    let mut cli_lexicon: Option<PathBuf> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-cache" => disable_cache = true,
            "--lexicon" => {
                if let Some(path) = args.next() {
                    cli_lexicon = Some(PathBuf::from(path));
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--lexicon=") {
                    cli_lexicon = Some(PathBuf::from(path));
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let lexicon_path = cli_lexicon
        .or_else(|| env::var("LEXICON_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LEXICON));
    let lexicon_version = env::var("LEXICON_VERSION")
        .ok()
        .and_then(|v| v.parse::<u64>().ok());
    let rate_limit_rps = env::var("RATE_LIMIT_RPS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RATE_LIMIT_RPS);

    Config {
        host,
        port,
        lexicon_path,
        lexicon_version,
        disable_cache,
        rate_limit_rps,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
