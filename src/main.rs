use codefetch::adapters::{
    ArboardClipboard, HeadlessFocus, HeadlessInjector, ReqwestHttpClient, TokioSleeper,
};
use codefetch::cli::{parse_args, run_cli_command, CliCommand, USAGE, VERSION};
use codefetch::config::AppConfig;
use codefetch::dispatcher::DeliveryDispatcher;
use codefetch::logging;
use codefetch::models::{RetrievalOutcome, TriggerSource};
use codefetch::service::CodeService;
use codefetch::triggers;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::sync::Arc;

fn build_service(config: &AppConfig) -> Result<CodeService> {
    let http = ReqwestHttpClient::new().wrap_err("Failed to build HTTP client")?;
    let dispatcher = Arc::new(DeliveryDispatcher::new(
        Arc::new(ArboardClipboard::new()),
        Arc::new(HeadlessInjector),
        Arc::new(HeadlessFocus),
    ));
    Ok(CodeService::from_config(
        config,
        Arc::new(http),
        Arc::new(TokioSleeper),
        dispatcher,
    ))
}

/// `--once`: one clipboard-only retrieval, code printed to stdout.
async fn run_single(service: &CodeService) -> Result<()> {
    let report = service.run_once(TriggerSource::Manual).await;
    match report.outcome {
        RetrievalOutcome::Fresh(code) => println!("{}", code.code),
        RetrievalOutcome::Stale(code) => {
            eprintln!("warning: code dated {} is not fresh", code.date);
            println!("{}", code.code);
        }
        RetrievalOutcome::Failed(error) => return Err(error.into()),
    }
    if let Some(delivery) = report.delivery {
        delivery.into_result()?;
    }
    Ok(())
}

async fn run_daemon(config: &AppConfig, service: CodeService) -> Result<()> {
    service.run_once(TriggerSource::Startup).await;

    let mut tasks = Vec::new();

    match config.polling_interval() {
        Some(period) => tasks.push(triggers::spawn_timer_trigger(service.clone(), period)),
        None => tracing::info!("Polling interval is 0, timer trigger disabled"),
    }

    let (hotkey, hotkey_rx) = triggers::trigger_channel();
    tasks.push(triggers::spawn_channel_trigger(
        service.clone(),
        hotkey_rx,
        TriggerSource::Hotkey,
    ));
    if let Some(descriptor) = config.hotkey()? {
        tracing::info!(
            hotkey = %descriptor,
            "Bind this shortcut to `pkill -USR1 codefetch` to trigger a fetch"
        );
    }
    #[cfg(unix)]
    tasks.push(
        triggers::spawn_signal_forwarder(hotkey.clone())
            .wrap_err("Failed to install SIGUSR1 handler")?,
    );

    tasks.push(triggers::spawn_stdin_trigger(service));
    tracing::info!("Press Enter to fetch a code, Ctrl-C to quit");

    tokio::signal::ctrl_c()
        .await
        .wrap_err("Failed to listen for Ctrl-C")?;

    tracing::info!("Shutting down");
    drop(hotkey);
    for task in tasks {
        task.abort();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let command = parse_args(std::env::args()).map_err(|e| eyre!("{}\n\n{}", e, USAGE))?;
    if run_cli_command(&command) {
        return Ok(());
    }
    let CliCommand::Run { config, once } = command else {
        return Ok(());
    };

    let (config, config_path) =
        AppConfig::discover(config.as_deref()).wrap_err("Failed to load configuration")?;
    logging::init_tracing(config.log_file().as_deref()).wrap_err("Failed to initialise logging")?;

    tracing::info!(
        version = VERSION,
        config = %config_path.display(),
        "codefetch starting"
    );
    if config.providers().iter().all(|p| !p.is_enabled()) {
        tracing::warn!("Neither github.token nor gitee.token is set; every fetch will fail");
    }

    let service = build_service(&config)?;
    if config.delivery_options().auto_fill && !service.dispatcher().autofill_available() {
        tracing::warn!(
            "auto_fill is set but this build cannot type keystrokes; codes go to the clipboard only"
        );
    }

    if once {
        return run_single(&service).await;
    }

    run_daemon(&config, service).await?;

    // A pending stdin read cannot be cancelled; leave without waiting for it.
    std::process::exit(0)
}
