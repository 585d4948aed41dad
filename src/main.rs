use clap::Parser;
use model_provisioner::utils::{logger, validation::Validate};
use model_provisioner::{
    CliArgs, Manifest, OllamaClient, ProvisionConfig, ProvisionEngine, ProvisionError,
    ReadinessGate,
};
use std::path::Path;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting model-provisioner");

    if let Err(e) = run(args).await {
        tracing::error!("❌ Provisioning aborted: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(args: CliArgs) -> Result<(), ProvisionError> {
    let config = ProvisionConfig::from_env();
    config.validate()?;

    let manifest = match &args.manifest {
        Some(path) => {
            tracing::info!("📁 Loading manifest from: {}", path);
            Manifest::from_file(path)?
        }
        None => Manifest::builtin(),
    };
    // 重複名稱或空路徑交給逐筆處理 (AlreadyExists / MissingDefinition)，不中止啟動
    if let Err(e) = manifest.validate() {
        tracing::warn!("⚠️ Manifest problem, continuing: {}", e);
    }

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - the model service will not be contacted");
        perform_dry_run(&manifest);
        return Ok(());
    }

    tracing::info!("🔗 Model service: {}", config.endpoint.base_url);

    let client = OllamaClient::new(&config)?;
    let engine = ProvisionEngine::new(client, ReadinessGate::from_config(&config), manifest);

    // 只有 readiness 逾時或收到關機訊號才會是非零結束碼
    engine.run_until(shutdown_signal()).await?;

    Ok(())
}

fn perform_dry_run(manifest: &Manifest) {
    for (index, spec) in manifest.models().iter().enumerate() {
        let present = Path::new(&spec.definition_path).is_file();
        println!(
            "{}. {} <- {} [{}]",
            index + 1,
            spec.name,
            spec.definition_path,
            if present { "found" } else { "missing" }
        );
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("⚠️ Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("⚠️ Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("⚠️ Received Ctrl-C, stopping"),
        _ = terminate => tracing::warn!("⚠️ Received SIGTERM, stopping"),
    }
}
