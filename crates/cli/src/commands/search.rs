//! Search command handler: run one search path directly.

use clap::{Args, ValueEnum};
use campus_core::config::AppConfig;
use campus_core::{AppError, AppResult};
use campus_retrieval::Category;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SearchMode {
    Keyword,
    Vector,
    Hybrid,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Schedule,
    Notice,
    Program,
    Info,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Schedule => Category::AcademicSchedule,
            CategoryArg::Notice => Category::Notice,
            CategoryArg::Program => Category::SupportProgram,
            CategoryArg::Info => Category::AcademicInfo,
        }
    }
}

/// Run keyword, vector, or hybrid search directly
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// The search query
    pub query: String,

    /// Search mode
    #[arg(short = 'M', long, value_enum, default_value_t = SearchMode::Hybrid)]
    pub mode: SearchMode,

    /// Restrict the search to one category
    #[arg(short = 'C', long, value_enum)]
    pub category: Option<CategoryArg>,

    /// Maximum number of results
    #[arg(short, long, default_value_t = 5)]
    pub limit: usize,

    /// Path to the corpus YAML file
    #[arg(short, long, default_value = "data/corpus.yaml")]
    pub data: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let engine = super::build_engine(config, &self.data).await?;
        let category = self.category.map(Category::from);

        let results = match self.mode {
            SearchMode::Keyword => {
                engine.keyword_search(&self.query, category, self.limit).await?
            }
            SearchMode::Vector => {
                engine.vector_search(&self.query, category, self.limit).await?
            }
            SearchMode::Hybrid => {
                engine.hybrid_search(&self.query, category, self.limit).await?
            }
        };

        if self.json {
            let json = serde_json::to_string_pretty(&results)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
            return Ok(());
        }

        if results.is_empty() {
            println!("검색 결과가 없습니다.");
            return Ok(());
        }

        for (i, result) in results.iter().enumerate() {
            println!("{}. [{}] {}", i + 1, result.category, result.title);
            println!("   {}", result.body);
            match self.mode {
                SearchMode::Keyword => {
                    println!("   relevance: {}", result.relevance_score)
                }
                SearchMode::Vector => println!("   similarity: {:.3}", result.similarity),
                SearchMode::Hybrid => println!("   score: {:.3}", result.final_score),
            }
        }

        Ok(())
    }
}
