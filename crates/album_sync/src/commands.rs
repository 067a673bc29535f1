use std::sync::Arc;

use album_core::{default_publish_offset, SyncMode, SyncStatus};
use album_engine::{
    import_article, ArticleFetcher, ContentExtractor, ImportOverrides, ReqwestTransport,
    RetryPolicy, SyncOrchestrator, SyncReport, SyncSettings, Transport, TransportSettings,
};
use album_logging::album_info;
use anyhow::{Context, Result};

use crate::cli::{Cli, Command, ImportArgs, SyncArgs};
use crate::config::CollectionsConfig;

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Sync(ref args) => {
            let config = load_config(&cli)?;
            sync(&config, args).await
        }
        Command::Import(ref args) => import(args).await,
        Command::List => {
            let config = load_config(&cli)?;
            for name in config.names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<CollectionsConfig> {
    CollectionsConfig::load(&cli.config)
        .with_context(|| format!("loading collection table {:?}", cli.config))
}

fn transport() -> Result<Arc<dyn Transport>> {
    let transport =
        ReqwestTransport::new(TransportSettings::default()).context("building http client")?;
    Ok(Arc::new(transport))
}

async fn sync(config: &CollectionsConfig, args: &SyncArgs) -> Result<()> {
    let targets = if args.is_all() {
        config.resolve_all()?
    } else {
        vec![config.resolve(&args.target)?]
    };
    let mode = args.mode();
    let transport = transport()?;
    let settings = SyncSettings {
        order: args.order(),
        ..SyncSettings::default()
    };

    let mut reports = Vec::with_capacity(targets.len());
    for target in targets {
        let orchestrator = SyncOrchestrator::new(
            target.name,
            target.remote,
            target.output_dir,
            transport.clone(),
            settings.clone(),
        );
        reports.push(orchestrator.run(mode).await);
    }

    for report in &reports {
        println!("{}", summary_line(report, mode));
    }
    Ok(())
}

async fn import(args: &ImportArgs) -> Result<()> {
    let fetcher = ArticleFetcher::new(transport()?, RetryPolicy::content());
    let overrides = ImportOverrides {
        title: args.title.clone(),
        date: args.date,
    };
    let path = import_article(
        &fetcher,
        &ContentExtractor::default(),
        &args.url,
        &args.dir,
        &overrides,
        default_publish_offset(),
    )
    .await
    .with_context(|| format!("importing {}", args.url))?;
    album_info!("saved {path:?}");
    println!("{}", path.display());
    Ok(())
}

fn summary_line(report: &SyncReport, mode: SyncMode) -> String {
    let dates = format!(
        "remote newest {}, local newest {}",
        report
            .remote_newest
            .as_ref()
            .map(|a| a.publish_date(default_publish_offset()).to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        report
            .local_newest
            .map(|d| d.to_string())
            .unwrap_or_else(|| "none".to_string()),
    );
    match report.status {
        SyncStatus::UpToDate => format!("{}: up to date ({dates})", report.collection),
        SyncStatus::Stale => format!("{}: new articles available ({dates})", report.collection),
        SyncStatus::Synced => format!(
            "{}: {mode:?} sync done, {} stored, {} failed, {} skipped",
            report.collection,
            report.result.success_count,
            report.result.fail_count,
            report.result.skip_count
        ),
    }
}
