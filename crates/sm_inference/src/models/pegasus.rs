use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_bert::pegasus::PegasusConditionalGenerator;
use rust_bert::pipelines::common::{ModelResource, ModelType};
use rust_bert::pipelines::generation_utils::{GenerateConfig, GenerateOptions, LanguageGenerator};
use rust_bert::resources::RemoteResource;
use sm_core::{Error, GenerationConfig, ModelLoader, Result, SummaryModel};
use tch::Device;

const HUB_URL: &str = "https://huggingface.co";

fn hub_resource(model_id: &str, file: &str) -> Box<RemoteResource> {
    Box::new(RemoteResource::new(
        &format!("{}/{}/resolve/main/{}", HUB_URL, model_id, file),
        model_id,
    ))
}

fn build_generator(model_id: &str, device: Device) -> Result<PegasusConditionalGenerator> {
    let generate_config = GenerateConfig {
        model_type: ModelType::Pegasus,
        model_resource: ModelResource::Torch(hub_resource(model_id, "rust_model.ot")),
        config_resource: hub_resource(model_id, "config.json"),
        vocab_resource: hub_resource(model_id, "spiece.model"),
        merges_resource: None,
        device,
        ..Default::default()
    };
    PegasusConditionalGenerator::new(generate_config)
        .map_err(|e| Error::Model(format!("failed to load {}: {}", model_id, e)))
}

fn generate_options(config: &GenerationConfig) -> GenerateOptions<'static> {
    GenerateOptions {
        min_length: Some(config.min_length as i64),
        max_length: Some(config.max_length as i64),
        num_beams: Some(config.num_beams as i64),
        length_penalty: Some(config.length_penalty),
        early_stopping: Some(config.early_stopping),
        do_sample: Some(config.do_sample),
        no_repeat_ngram_size: Some(config.no_repeat_ngram_size as i64),
        top_k: Some(config.top_k as i64),
        top_p: Some(config.top_p),
        num_return_sequences: Some(1),
        ..Default::default()
    }
}

/// Pegasus weights held in memory; generation runs on a blocking thread.
pub struct PegasusModel {
    model_id: String,
    generator: Arc<Mutex<PegasusConditionalGenerator>>,
}

impl fmt::Debug for PegasusModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PegasusModel")
            .field("model_id", &self.model_id)
            .field("generator", &"<PegasusConditionalGenerator>")
            .finish()
    }
}

#[async_trait]
impl SummaryModel for PegasusModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn summarize(&self, text: &str, config: &GenerationConfig) -> Result<String> {
        let generator = self.generator.clone();
        let text = text.to_string();
        let options = generate_options(config);
        let model_id = self.model_id.clone();

        tokio::task::spawn_blocking(move || {
            let generator = generator
                .lock()
                .map_err(|_| Error::Model(format!("{} generator lock poisoned", model_id)))?;
            let input = [text.as_str()];
            let output = generator
                .generate(Some(&input[..]), Some(options))
                .map_err(|e| Error::Model(format!("generation with {} failed: {}", model_id, e)))?;
            output
                .into_iter()
                .next()
                .map(|o| o.text)
                .ok_or_else(|| Error::Model(format!("{} produced no output", model_id)))
        })
        .await
        .map_err(|e| Error::Model(format!("generation task failed: {}", e)))?
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PegasusLoader {
    device: Device,
}

impl PegasusLoader {
    pub fn new() -> Self {
        Self {
            device: Device::cuda_if_available(),
        }
    }
}

impl Default for PegasusLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelLoader for PegasusLoader {
    fn name(&self) -> &str {
        "pegasus"
    }

    async fn load(&self, model_id: &str) -> Result<Arc<dyn SummaryModel>> {
        tracing::info!("📦 Loading {} on {:?}", model_id, self.device);
        let id = model_id.to_string();
        let device = self.device;
        let generator = tokio::task::spawn_blocking(move || build_generator(&id, device))
            .await
            .map_err(|e| Error::Model(format!("model loading task failed: {}", e)))??;

        Ok(Arc::new(PegasusModel {
            model_id: model_id.to_string(),
            generator: Arc::new(Mutex::new(generator)),
        }))
    }
}
