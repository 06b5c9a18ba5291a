use access_relay::utils::{logger, validation::Validate};
use access_relay::{
    CliConfig, InboundRequest, MailChannelsDispatcher, RegistrationHandler, RelayConfig,
    RelayError, TomlConfig,
};
use clap::Parser;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("🚀 Starting access-relay CLI");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(e);
    }

    let dispatcher = match MailChannelsDispatcher::from_config(&config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => exit_with(e),
    };
    let handler = RegistrationHandler::new(dispatcher);

    let body = read_body(&cli).await?;
    let response = handler.handle(InboundRequest::new(cli.method, body)).await;

    println!("{} {}", response.status, response.content_type);
    println!("{}", response.body);

    // 2xx => 0, 4xx => 2, 5xx => 1
    let exit_code = match response.status {
        200..=299 => 0,
        400..=499 => 2,
        _ => 1,
    };
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

fn load_config(cli: &CliConfig) -> access_relay::Result<RelayConfig> {
    match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            Ok(TomlConfig::from_file(path)?.into_relay_config())
        }
        None => RelayConfig::from_env(),
    }
}

async fn read_body(cli: &CliConfig) -> anyhow::Result<Vec<u8>> {
    let body = match &cli.body_file {
        Some(path) => tokio::fs::read(path).await?,
        None => {
            let mut buffer = Vec::new();
            tokio::io::stdin().read_to_end(&mut buffer).await?;
            buffer
        }
    };
    Ok(body)
}

fn exit_with(e: RelayError) -> ! {
    tracing::error!("❌ Configuration failed: {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(3);
}
