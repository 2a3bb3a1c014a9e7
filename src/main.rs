use dotenvy::dotenv;
use tracing::info;

use boleto_backend::infra::{
    app::create_app,
    config::AppConfig,
    error::InfraError,
    setup::{init_app_state, init_tracing},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(config.log_file.as_deref())?;

    let app_state = init_app_state(config).await?;

    let bind_addr = app_state.config.bind_addr;
    if app_state.config.enable_test_routes {
        info!("Test webhook triggers are enabled");
    }

    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(InfraError::TcpBind)?;

    info!("Backend listening at {}", &listener.local_addr()?);

    axum::serve(listener, app).await.map_err(InfraError::Server)?;

    Ok(())
}
