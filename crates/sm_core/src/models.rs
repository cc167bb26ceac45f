use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::generation::GenerationConfig;
use crate::Result;

/// A loaded tokenizer + generation model pair.
#[async_trait]
pub trait SummaryModel: Send + Sync + fmt::Debug {
    /// Pretrained identifier this model was loaded from.
    fn model_id(&self) -> &str;

    /// Summarize already-normalized text with the given decoding recipe
    async fn summarize(&self, text: &str, config: &GenerationConfig) -> Result<String>;
}

/// Materializes models by pretrained identifier.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    async fn load(&self, model_id: &str) -> Result<Arc<dyn SummaryModel>>;
}

/// Receives status lines while a request runs.
pub trait ProgressSink: Send + Sync {
    fn update(&self, message: &str);

    fn finish(&self, message: &str) {
        self.update(message);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _message: &str) {}
}

/// Forwards progress lines to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn update(&self, message: &str) {
        tracing::info!("⏳ {}", message);
    }

    fn finish(&self, message: &str) {
        tracing::info!("✅ {}", message);
    }
}
