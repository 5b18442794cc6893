use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use railway_bot::clock::{Clock, SystemClock};
use railway_bot::config::BotConfig;
use railway_bot::dialog::Controller;
use railway_bot::monitor::{MonitorChecker, MonitorRegistry};
use railway_bot::railway::{AvailabilitySource, MockRailwayClient, RailwayClient};
use railway_bot::web::{AppState, Outbox, create_router};

const DEFAULT_LOG_FILTER: &str = "railway_bot=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BotConfig::from_env()?;

    let source: Arc<dyn AvailabilitySource> = match &config.mock_dir {
        Some(dir) => {
            let mock = MockRailwayClient::new(dir)?;
            info!(routes = mock.route_count(), dir = %dir.display(), "using mock availability data");
            Arc::new(mock)
        }
        None => Arc::new(RailwayClient::new(config.railway())?),
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let monitors = MonitorRegistry::new();
    let outbox = Outbox::new();

    let checker = MonitorChecker::new(
        monitors.clone(),
        source.clone(),
        Arc::new(outbox.clone()),
        clock.clone(),
    );
    tokio::spawn(checker.run());

    let controller = Controller::new(source, monitors, clock);
    let app = create_router(AppState::new(controller, outbox));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "railway bot listening");
    info!("POST /chat/:user_id/events, GET /chat/:user_id/notifications, GET /health");

    axum::serve(listener, app).await?;
    Ok(())
}
