use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use iap_cli::{Command, Evaluation, IapCli, Report, SuiteConfig, evaluate, load_raw_act_set, run_suite};
use iap_extract::{CachedExtractor, JsonlCache, OpenAiExtractor};
use tracing_subscriber::EnvFilter;

#[tokio::main]
pub async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = IapCli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Eval(args) => {
            let (original, translated) = args.requests();
            let extractor = CachedExtractor::new(
                OpenAiExtractor::new(cli.openai_config())?,
                JsonlCache::new(&cli.cache),
            );
            let evaluation = evaluate(&extractor, &original, &translated).await?;
            print!("{}", Report::new(&evaluation));
            Ok(ExitCode::SUCCESS)
        }
        Command::Suite { config } => {
            let config = SuiteConfig::load(config).await?;
            let cache = config.cache.clone().unwrap_or_else(|| cli.cache.clone());
            let extractor = CachedExtractor::new(
                OpenAiExtractor::new(cli.openai_config())?,
                JsonlCache::new(cache),
            );

            let outcome = run_suite(&config, &extractor, &mut std::io::stdout()).await?;
            if outcome.failures > 0 {
                eprintln!("{} of {} cases failed", outcome.failures, outcome.cases);
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Score {
            original,
            translated,
            original_text,
            translated_text,
        } => {
            let evaluation = Evaluation::from_raw(
                original_text.as_str(),
                load_raw_act_set(original).await?,
                translated_text.as_str(),
                load_raw_act_set(translated).await?,
            )?;
            print!("{}", Report::new(&evaluation));
            Ok(ExitCode::SUCCESS)
        }
    }
}
