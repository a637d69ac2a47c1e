use std::sync::Arc;

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskpad::config::AppConfig;
use taskpad::controller::TodoController;
use taskpad::handlers;
use taskpad::remote::{CrudHttpClient, MemoryTodoStore, TodoStore};
use taskpad::view::TerminalView;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "taskpad=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let offline = std::env::args().any(|a| a == "--offline");
    let config = AppConfig::new_from_env(offline)?;

    let store: Arc<dyn TodoStore> = match config.store {
        Some(store_config) => {
            let client = CrudHttpClient::new(store_config)?;
            info!("using remote store at {}", client.base_url());
            Arc::new(client)
        }
        None => {
            info!("using in-memory store");
            Arc::new(MemoryTodoStore::new())
        }
    };

    let controller = TodoController::new(store, Arc::new(TerminalView::new()), config.update_errors);

    // a failed first load was already shown; the user can retry with `list`
    let _ = controller.refresh().await;
    controller.message(handlers::HELP);

    handlers::run(&controller, BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}
