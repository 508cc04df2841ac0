use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use sitewatch_checker::{
    init_logging, wait_for_signal, AlertDispatcher, HttpProber, ProbeSettings, Scheduler,
    SchedulerSettings,
};
use sitewatch_config::ConfigLoader;
use sitewatch_notify::{EmailConfig, EmailNotifier};
use sitewatch_store::{SupabaseConfig, SupabaseStore};

#[derive(Parser, Debug)]
#[command(author, version, about = "Probes registered sites and emails owners about new outages", long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config/sitewatch.toml")]
    config: PathBuf,

    /// Run a single check cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置
    let config = ConfigLoader::new(&args.config).load_validated()?;
    init_logging(&config.logging)?;

    info!(config = %args.config.display(), "Starting sitewatch checker");

    let store = Arc::new(SupabaseStore::new(SupabaseConfig {
        url: config.store.url.clone(),
        service_key: config.store.service_key.clone(),
        timeout: config.store.timeout(),
        users_per_page: config.store.users_per_page,
    })?);

    let prober = Arc::new(HttpProber::new(ProbeSettings::from(&config.checker))?);

    let notifier = Arc::new(EmailNotifier::new(EmailConfig {
        smtp_host: config.smtp.host.clone(),
        smtp_port: config.smtp.port,
        username: config.smtp.username.clone(),
        password: config.smtp.password.clone(),
        from: config.smtp.sender().to_string(),
        timeout_secs: config.checker.notify_timeout_secs,
    })?);

    let dispatcher = AlertDispatcher::new(notifier, config.checker.notify_timeout())
        .with_subject(config.smtp.subject.clone());

    let mut scheduler = Scheduler::new(
        store.clone(),
        store,
        prober,
        dispatcher,
        SchedulerSettings::from(&config.checker),
    );

    if args.once {
        if config.checker.seed_from_history {
            scheduler.seed_from_history().await;
        }
        let report = scheduler.run_guarded_cycle().await?;
        info!(?report, "Single check cycle finished");
        return Ok(());
    }

    let handle = scheduler.spawn();

    wait_for_signal().await?;
    info!("Waiting for the current check cycle to finish");
    handle.shutdown().await;

    Ok(())
}
