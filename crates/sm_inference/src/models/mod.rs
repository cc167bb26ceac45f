use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use sm_core::{Error, ModelLoader, Result};

use crate::cache::CachedLoader;
use crate::Config;

pub mod huggingface;
pub mod lead;
#[cfg(feature = "pegasus")]
pub mod pegasus;

pub use huggingface::{HuggingFaceLoader, HuggingFaceModel};
pub use lead::{LeadLoader, LeadModel};
#[cfg(feature = "pegasus")]
pub use pegasus::{PegasusLoader, PegasusModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Offline, deterministic leading-words summaries.
    Lead,
    /// Remote Hugging Face inference endpoint.
    HuggingFace,
    /// Local Pegasus weights through rust-bert.
    Pegasus,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(feature = "pegasus") {
            Backend::Pegasus
        } else {
            Backend::HuggingFace
        }
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lead" | "offline" => Ok(Backend::Lead),
            "huggingface" | "hf" => Ok(Backend::HuggingFace),
            "pegasus" | "local" => Ok(Backend::Pegasus),
            other => Err(Error::Model(format!(
                "Unknown backend '{}'. Available backends: lead, huggingface, pegasus",
                other
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Lead => "lead",
            Backend::HuggingFace => "huggingface",
            Backend::Pegasus => "pegasus",
        };
        f.write_str(name)
    }
}

/// Builds the loader for `config.backend`, wrapped in a model cache unless
/// caching is turned off.
pub fn create_loader(config: &Config) -> Result<Arc<dyn ModelLoader>> {
    let loader: Arc<dyn ModelLoader> = match config.backend {
        Backend::Lead => Arc::new(LeadLoader),
        Backend::HuggingFace => Arc::new(HuggingFaceLoader::new(
            config.endpoint.clone(),
            config.api_key.clone(),
        )?),
        #[cfg(feature = "pegasus")]
        Backend::Pegasus => Arc::new(PegasusLoader::new()),
        #[cfg(not(feature = "pegasus"))]
        Backend::Pegasus => {
            return Err(Error::Model(
                "the pegasus backend requires building with the `pegasus` feature".to_string(),
            ))
        }
    };
    tracing::debug!("Created {} model loader", loader.name());

    if config.cache {
        Ok(Arc::new(CachedLoader::new(loader, config.cache_capacity)))
    } else {
        Ok(loader)
    }
}
