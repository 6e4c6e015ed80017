use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use iap_extract::{DEFAULT_BASE_URL, DEFAULT_MODEL, ExtractionRequest, OpenAiConfig};

pub const DEFAULT_CACHE_PATH: &str = ".iap_cache.jsonl";

#[derive(Debug, Parser)]
#[command(name = "iap")]
#[command(bin_name = "iap")]
#[command(about = "Illocutionary act preservation evaluator for translations", long_about = None)]
pub struct IapCli {
    /// Chat model used for act extraction
    #[arg(long, global = true, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// JSON Lines extraction cache
    #[arg(long, global = true, env = "IAP_CACHE", default_value = DEFAULT_CACHE_PATH)]
    pub cache: PathBuf,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, global = true, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract and score a single original/translation pair
    Eval(EvalArgs),

    /// Run every case of a YAML suite
    Suite { config: PathBuf },

    /// Score two stored act-set records without calling a model
    Score {
        original: PathBuf,

        translated: PathBuf,

        /// Utterance of the original side, used for vocative correction
        #[arg(long, default_value = "")]
        original_text: String,

        /// Utterance of the translated side, used for vocative correction
        #[arg(long, default_value = "")]
        translated_text: String,
    },
}

impl IapCli {
    pub fn openai_config(&self) -> OpenAiConfig {
        let mut config = OpenAiConfig::new(self.api_key.clone().unwrap_or_default());
        config.base_url = self.base_url.clone();
        config.model = self.model.clone();
        config
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[derive(Debug, Args)]
pub struct EvalArgs {
    #[arg(short, long)]
    pub original: String,

    #[arg(short = 't', long, visible_alias = "translated")]
    pub translation: String,

    #[arg(long)]
    pub lang_original: Option<String>,

    #[arg(long)]
    pub lang_translated: Option<String>,

    #[arg(long)]
    pub context_original: Option<String>,

    #[arg(long)]
    pub context_translated: Option<String>,
}

impl EvalArgs {
    pub fn requests(&self) -> (ExtractionRequest, ExtractionRequest) {
        (
            ExtractionRequest::new(self.original.as_str())
                .with_language(self.lang_original.clone())
                .with_context(self.context_original.clone()),
            ExtractionRequest::new(self.translation.as_str())
                .with_language(self.lang_translated.clone())
                .with_context(self.context_translated.clone()),
        )
    }
}
