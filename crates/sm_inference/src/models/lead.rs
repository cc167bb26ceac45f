use std::fmt;
use std::sync::Arc;

use sm_core::{GenerationConfig, ModelLoader, Result, SummaryModel};

/// Offline stand-in that keeps the leading words of the input.
///
/// Words play the role of tokens: the output holds at most
/// `config.max_length` of them. Inputs shorter than `config.min_length` are
/// returned whole.
pub struct LeadModel {
    model_id: String,
}

impl fmt::Debug for LeadModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeadModel")
            .field("model_id", &self.model_id)
            .finish()
    }
}

impl LeadModel {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }
}

#[async_trait::async_trait]
impl SummaryModel for LeadModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn summarize(&self, text: &str, config: &GenerationConfig) -> Result<String> {
        let words: Vec<&str> = text.split_whitespace().take(config.max_length).collect();
        Ok(words.join(" "))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LeadLoader;

#[async_trait::async_trait]
impl ModelLoader for LeadLoader {
    fn name(&self) -> &str {
        "lead"
    }

    async fn load(&self, model_id: &str) -> Result<Arc<dyn SummaryModel>> {
        Ok(Arc::new(LeadModel::new(model_id)))
    }
}
