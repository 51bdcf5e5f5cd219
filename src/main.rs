use std::sync::Arc;
use std::time::Duration;

use adaptive_landing::config::{EngineConfig, ServerConfig};
use adaptive_landing::engine::SessionManager;
use adaptive_landing::rank::{RankerBackend, RankerConfig, create_ranker};
use adaptive_landing::registry::SectionRegistry;
use adaptive_landing::web::page_routes;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing, optionally teeing to a daily-rolling file
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    let _log_guard = match std::env::var("LANDING_LOG_DIR") {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(&dir, "adaptive-landing.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .init();
            None
        }
    };

    // Pick the ranking backend
    let backend = std::env::var("LANDING_RANKER").unwrap_or_else(|_| "anthropic".to_string());
    let timeout: u64 = std::env::var("LANDING_RANKER_TIMEOUT_SECS")
        .unwrap_or_else(|_| "15".to_string())
        .parse()
        .unwrap_or(15);

    let ranker_config = match backend.as_str() {
        "anthropic" => {
            let api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_else(|_| {
                eprintln!("Error: ANTHROPIC_API_KEY not set");
                eprintln!("  export ANTHROPIC_API_KEY=sk-ant-...");
                std::process::exit(1);
            });
            let model = std::env::var("LANDING_RANKER_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".to_string());
            RankerConfig {
                backend: RankerBackend::Anthropic,
                api_key: secrecy::SecretString::from(api_key),
                model,
                endpoint: None,
                timeout: Duration::from_secs(timeout),
            }
        }
        "openai" => {
            let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
                eprintln!("Error: OPENAI_API_KEY not set");
                std::process::exit(1);
            });
            let model =
                std::env::var("LANDING_RANKER_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
            RankerConfig {
                backend: RankerBackend::OpenAi,
                api_key: secrecy::SecretString::from(api_key),
                model,
                endpoint: None,
                timeout: Duration::from_secs(timeout),
            }
        }
        "http" => {
            let endpoint = std::env::var("LANDING_RANKER_URL").unwrap_or_else(|_| {
                eprintln!("Error: LANDING_RANKER_URL not set for the http backend");
                std::process::exit(1);
            });
            RankerConfig {
                backend: RankerBackend::Http,
                api_key: secrecy::SecretString::from(""),
                model: String::new(),
                endpoint: Some(endpoint),
                timeout: Duration::from_secs(timeout),
            }
        }
        other => {
            eprintln!("Error: unknown LANDING_RANKER backend: {other}");
            eprintln!("  expected one of: anthropic, openai, http");
            std::process::exit(1);
        }
    };

    let ranker = create_ranker(&ranker_config)?;

    let engine_config = EngineConfig::from_env();
    let server_config = ServerConfig::from_env();
    let registry = Arc::new(SectionRegistry::default_landing());

    eprintln!("🧭 Adaptive Landing v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Ranker: {} ({})", backend, ranker.name());
    eprintln!(
        "   Sections: {}",
        registry
            .keys()
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    eprintln!(
        "   Reorder: after {} sections viewed, {} attempt(s) max",
        engine_config.min_history, engine_config.max_rank_attempts
    );
    eprintln!("   Page: http://0.0.0.0:{}/", server_config.port);
    eprintln!("   Events WS: ws://0.0.0.0:{}/ws\n", server_config.port);

    let sessions = SessionManager::new(registry, engine_config, ranker);
    let app = page_routes(sessions);

    let listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", server_config.port)).await?;
    tracing::info!(port = server_config.port, "Landing page server started");
    axum::serve(listener, app).await?;

    Ok(())
}
