use std::sync::Arc;

use restitude::config::{self, AppState, Config};
use restitude::server::{create_reusable_listener, serve, shutdown_signal};
use restitude::widgets::WidgetResource;
use restitude::{logger, ApiBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut print_config = false;
    let mut config_path = config::DEFAULT_CONFIG_PATH.to_string();
    for arg in std::env::args().skip(1) {
        if arg == "--print-config" {
            print_config = true;
        } else {
            config_path = arg;
        }
    }

    let cfg = Config::load_from(&config_path)?;
    if print_config {
        print!("{}", cfg.to_toml()?);
        return Ok(());
    }

    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("Using {workers} worker threads"));
    } else {
        logger::log_info("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = create_reusable_listener(addr)?;

    let api = ApiBuilder::from_config(&cfg.api)
        .register(WidgetResource::new())
        .build();
    logger::log_server_start(&addr, &cfg);
    logger::log_info(&format!("Resources: {}", api.resources().join(", ")));
    logger::log_info(&format!("Content types: {}", api.content_types().join(", ")));

    let state = Arc::new(AppState::new(cfg, api));
    serve(listener, state, shutdown_signal()).await;

    logger::log_info("Server stopped");
    Ok(())
}
