use error_chain::ChainedError;
use recipe_box::config::AppConfig;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[rocket::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_box=info,rocket=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = AppConfig::from_env().and_then(recipe_box::rocket);
    let app = match app {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("failed to start: {}", e.display_chain());
            process::exit(1);
        }
    };

    if let Err(e) = app.launch().await {
        tracing::error!("server stopped: {}", e);
        process::exit(1);
    }
}
