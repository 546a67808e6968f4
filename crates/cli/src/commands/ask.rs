//! Ask command handler: the full question-to-answer pipeline.

use clap::Args;
use campus_core::config::AppConfig;
use campus_core::{AppError, AppResult};
use campus_llm::create_generator;
use campus_retrieval::{FallbackHandler, RagPipeline};
use std::path::PathBuf;

/// Answer a question with retrieval-augmented generation
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer
    pub question: String,

    /// Path to the corpus YAML file
    #[arg(short, long, default_value = "data/corpus.yaml")]
    pub data: PathBuf,

    /// Output the full response envelope as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let engine = super::build_engine(config, &self.data).await?;
        let generator = create_generator(&config.provider, config.endpoint.as_deref())?;
        let pipeline = RagPipeline::new(
            engine,
            generator,
            FallbackHandler::new(config.contact_channel.clone()),
            config.model.clone(),
            config.generation_timeout_secs,
        );

        let response = pipeline.answer(&self.question).await;

        if self.json {
            let json = serde_json::to_string_pretty(&response)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("{}", response.answer);

            if !response.sources.is_empty() {
                println!();
                println!(
                    "출처: {}",
                    response
                        .sources
                        .iter()
                        .map(|s| s.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }

            if let Some(validation) = &response.validation {
                for warning in &validation.warnings {
                    tracing::warn!("validation: {}", warning);
                }
            }
        }

        Ok(())
    }
}
