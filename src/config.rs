//! Configuration types.

/// Static corpus describing effective landing-page patterns, sent to the
/// ranking collaborator alongside the visitor's navigation history. Fixed
/// text, never derived from live data.
pub const DEFAULT_ANALYSIS_CORPUS: &str = "Successful SaaS landing pages often feature \
benefits and social proof (testimonials) prominently. A clear call to action and easy \
contact options are crucial. FAQs are typically placed lower on the page.";

/// Engine tuning parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Distinct sections a visitor must view before a re-rank is attempted.
    pub min_history: usize,
    /// Fraction of a section's area that must be on screen for it to count
    /// as viewed.
    pub visible_fraction: f64,
    /// Total ranking attempts allowed per page view (first try plus
    /// retries). The gate settles once the budget is spent.
    pub max_rank_attempts: u32,
    /// Corpus string sent with every ranking request.
    pub analysis_corpus: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_history: 2,
            visible_fraction: 0.1,
            max_rank_attempts: 2,
            analysis_corpus: DEFAULT_ANALYSIS_CORPUS.to_string(),
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let min_history = std::env::var("LANDING_MIN_HISTORY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.min_history);

        let visible_fraction = std::env::var("LANDING_VISIBLE_FRACTION")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|f| (0.0..=1.0).contains(f))
            .unwrap_or(defaults.visible_fraction);

        let max_rank_attempts = std::env::var("LANDING_MAX_RANK_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_rank_attempts);

        let analysis_corpus =
            std::env::var("LANDING_ANALYSIS_CORPUS").unwrap_or(defaults.analysis_corpus);

        Self {
            min_history,
            visible_fraction,
            max_rank_attempts,
            analysis_corpus,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the landing page and WebSocket endpoint listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl ServerConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Self {
        let port = std::env::var("LANDING_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Self::default().port);
        Self { port }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.min_history, 2);
        assert_eq!(config.max_rank_attempts, 2);
        assert!((config.visible_fraction - 0.1).abs() < f64::EPSILON);
        assert!(!config.analysis_corpus.is_empty());
    }

    #[test]
    fn server_defaults() {
        assert_eq!(ServerConfig::default().port, 8080);
    }
}
