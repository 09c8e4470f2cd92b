use clap::Parser;
use covid_sheets::config::file::FileConfig;
use covid_sheets::sheets::{ServiceAccount, SheetsClient};
use covid_sheets::utils::{logger, validation::Validate};
use covid_sheets::{
    Cli, Command, EtlEngine, IngestPipeline, IngestSettings, LocalStorage, PublishPipeline,
    PublishSettings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    let file_config = match &cli.config {
        Some(path) => FileConfig::from_path(path)?,
        None => FileConfig::default(),
    };

    match cli.command {
        Command::Ingest(args) => {
            let settings = IngestSettings::resolve(args, file_config.ingest);
            settings.validate()?;

            tracing::info!("Starting ingestion from {}", settings.api_endpoint);
            let pipeline = IngestPipeline::new(LocalStorage::new("."), settings);
            let summary = EtlEngine::new(pipeline).run().await?;
            println!("Ingestion finished: {}", summary);
        }
        Command::Publish(args) => {
            let settings = PublishSettings::resolve(args, file_config.publish)?;
            settings.validate()?;

            tracing::info!(
                "Publishing '{}' to spreadsheet '{}'",
                settings.csv_path,
                settings.spreadsheet_id
            );
            let account = ServiceAccount::from_file(&settings.credentials_path)?;
            let client = SheetsClient::connect(&account).await?;
            let pipeline = PublishPipeline::new(LocalStorage::new("."), client, settings);
            let summary = EtlEngine::new(pipeline).run().await?;
            println!("Publish finished: {}", summary);
        }
    }

    Ok(())
}
