use chrono::{Local, NaiveDate};
use clap::Parser;
use hatchling::application::{
    init, ConfigService, ExportOrchestrator, InitOptions, SubmissionCoordinator, TagResolver,
};
use hatchling::cli::{format_entry, format_export_receipt, format_tag_resolution, Cli, Commands};
use hatchling::domain::{
    EntryDraft, ExportFilters, ExportFormat, MediaRef, Privacy, SelectionManager, SourceType,
};
use hatchling::error::{HatchlingError, Result, ValidationError};
use hatchling::infrastructure::{
    Config, FileSystemDownloads, FileSystemWorkspace, HttpEntryStore, HttpExportRenderer,
    HttpTagClassifier, TagClassifier, WorkspaceRepository,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init()
        .ok();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init {
            path,
            author,
            api_url,
            classifier_url,
        } => {
            let config = init(
                &path,
                InitOptions {
                    author_id: author,
                    api_url,
                    classifier_url,
                },
            )?;
            println!("Initialized hatchling workspace at {}", path.display());
            println!("Author: {}", config.author_id);
            Ok(())
        }
        Commands::Config { key, value, list } => {
            let workspace = FileSystemWorkspace::discover()?;
            let service = ConfigService::new(workspace);

            if list {
                for (key, value) in service.list()? {
                    println!("{} = {}", key, value);
                }
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
            } else {
                println!("Usage: hatchling config [--list | <key> [<value>]]");
            }
            Ok(())
        }
        Commands::Tags {
            content,
            media_url,
            media_type,
        } => {
            let workspace = FileSystemWorkspace::discover()?;
            let config = workspace.load_config()?;
            let resolver = build_resolver(&config)?;

            let media = media_ref(media_url, media_type);
            let resolution = resolver.resolve(&content, media.as_ref()).await;
            println!("{}", format_tag_resolution(&resolution));
            Ok(())
        }
        Commands::Submit {
            content,
            date,
            privacy,
            tags,
            media_url,
            media_type,
            source,
            entry_id,
            regenerate_tags,
        } => {
            let workspace = FileSystemWorkspace::discover()?;
            let config = workspace.load_config()?;

            let date_of_memory = match date {
                Some(raw) => Some(
                    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .map_err(|_| ValidationError::InvalidDate)?,
                ),
                None => Some(Local::now().date_naive()),
            };

            let draft = EntryDraft {
                content,
                media: media_ref(media_url, media_type),
                date_of_memory,
                privacy: Privacy::from_str(&privacy).map_err(HatchlingError::InvalidArgument)?,
                tags,
                author_id: config.author_id.clone(),
                source_type: SourceType::from_str(&source)
                    .map_err(HatchlingError::InvalidArgument)?,
                regenerate_tags,
            };

            let coordinator = SubmissionCoordinator::new(
                Arc::new(HttpEntryStore::new(&config.api_url)?),
                build_resolver(&config)?,
            );
            let entry = coordinator.submit(&draft, entry_id.as_deref()).await?;
            println!("{}", format_entry(&entry));
            Ok(())
        }
        Commands::Export {
            ids,
            format,
            from,
            to,
            privacy,
        } => {
            let workspace = FileSystemWorkspace::discover()?;
            let config = workspace.load_config()?;

            let format = ExportFormat::from_str(&format).map_err(HatchlingError::InvalidArgument)?;
            let filters = ExportFilters {
                start_date: from.as_deref().map(parse_filter_date).transpose()?,
                end_date: to.as_deref().map(parse_filter_date).transpose()?,
                privacy: privacy
                    .as_deref()
                    .map(Privacy::from_str)
                    .transpose()
                    .map_err(HatchlingError::InvalidArgument)?,
            };

            let mut selection = SelectionManager::new();
            for id in &ids {
                if !selection.contains(id) {
                    selection.toggle(id);
                }
            }

            let orchestrator = ExportOrchestrator::new(
                Arc::new(HttpExportRenderer::new(&config.api_url)?),
                Arc::new(FileSystemDownloads::new(workspace.download_dir(&config))),
                config.author_id.clone(),
            )
            .with_timeouts(config.export_timeouts());

            let receipt = orchestrator
                .export_selection(format, &mut selection, filters)
                .await?;
            println!("{}", format_export_receipt(&receipt));
            Ok(())
        }
    }
}

fn build_resolver(config: &Config) -> Result<TagResolver> {
    let classifier: Option<Arc<dyn TagClassifier>> = match &config.classifier_url {
        Some(url) => Some(Arc::new(HttpTagClassifier::new(
            url,
            config.classify_timeout(),
        )?)),
        None => None,
    };

    Ok(TagResolver::new(classifier, config.classify_timeout()))
}

fn media_ref(url: Option<String>, mime_type: Option<String>) -> Option<MediaRef> {
    match (url, mime_type) {
        (Some(url), Some(mime_type)) => Some(MediaRef::new(url, mime_type)),
        _ => None,
    }
}

fn parse_filter_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        HatchlingError::InvalidArgument(format!(
            "Invalid date format: '{}'. Expected YYYY-MM-DD",
            raw
        ))
    })
}
