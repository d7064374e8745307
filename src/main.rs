use clap::Parser;
use clipstore::application::session::Session;
use clipstore::cli::commands::{run_command, Cli, Commands};
use clipstore::config::StoreConfig;
use clipstore::domain::ports::device_runtime::DeviceRuntime;
use clipstore::domain::values::device::DeviceSelector;
use clipstore::infrastructure::devices::host::HostRuntime;
use clipstore::infrastructure::embeddings::noop::NoopProvider;
use clipstore::{logging, ClipStore};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    logging::init();
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let runtime: Arc<dyn DeviceRuntime> = Arc::new(HostRuntime::new());
    if let Err(e) = run(runtime, config, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn build_config(cli: &Cli) -> Result<StoreConfig, Box<dyn std::error::Error>> {
    let mut config = StoreConfig::from_env()?;
    if let Some(db) = &cli.db {
        config.db_path = Some(db.clone());
    }
    if let Some(backend) = &cli.backend {
        config.backend = backend.parse()?;
    }
    if let Some(dimension) = cli.dimension {
        config.dimension = dimension;
    }
    if let Some(kind) = &cli.device {
        config.device = DeviceSelector { kind: kind.parse()?, id: cli.device_id.unwrap_or(0) };
    }
    config.validate()?;
    Ok(config)
}

async fn run(runtime: Arc<dyn DeviceRuntime>, config: StoreConfig, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::Devices = cmd {
        let info = runtime.enum_devices()?;
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let session = Session::open(runtime, config.device)?;
    let store = ClipStore::create(&session, Arc::new(NoopProvider::new(config.dimension)), &config)?;

    let result = run_command(&store, &config, cmd, &mut std::io::stdout().lock());
    // destroy flushes even when the command failed
    let flushed = store.destroy();
    drop(store);
    let closed = session.close();

    result?;
    flushed?;
    closed?;
    Ok(())
}
