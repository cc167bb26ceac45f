use std::fmt;

pub mod cache;
pub mod models;

pub use cache::{CacheStats, CachedLoader};
pub use models::{create_loader, Backend};
pub use sm_core::GenerationConfig;

pub const DEFAULT_CACHE_CAPACITY: usize = 2;

#[derive(Clone)]
pub struct Config {
    pub backend: Backend,
    pub api_key: Option<String>,
    /// Base URL for remote backends; the model id is appended to it.
    pub endpoint: Option<String>,
    /// Keep loaded models around between requests.
    pub cache: bool,
    pub cache_capacity: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("backend", &self.backend)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("cache", &self.cache)
            .field("cache_capacity", &self.cache_capacity)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            api_key: None,
            endpoint: None,
            cache: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

pub mod prelude {
    pub use super::models::create_loader;
    pub use super::{Backend, CachedLoader, Config};
    pub use sm_core::{Error, GenerationConfig, ModelLoader, Result, SummaryModel};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_debug_redacts_api_key() {
        let config = Config {
            api_key: Some("hf_secret".to_string()),
            ..Config::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hf_secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_inference_pipeline() {
        let config = Config {
            backend: Backend::Lead,
            ..Config::default()
        };
        let loader = create_loader(&config).unwrap();
        let model = loader.load(sm_core::types::ARTICLE_MODEL).await.unwrap();
        let summary = model
            .summarize("One two three.", &GenerationConfig::for_length(10))
            .await
            .unwrap();
        assert_eq!(summary, "One two three.");
    }
}
