use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::app::{AppServices, create_app};
use crate::configs::Settings;
use crate::services::MonitorService;

pub mod app;
pub mod configs;
pub mod errors;
pub mod handles;
pub mod models;
pub mod services;

pub async fn run(settings: &Arc<Settings>) -> anyhow::Result<()> {
    let services = AppServices::new(settings)?;

    let monitor = Arc::new(MonitorService::new(
        services.device_service.clone(),
        services.reading.clone(),
        settings.timings.clone(),
        settings.rainlevel.clone(),
    ));
    let _monitor_handle = monitor.start();

    let app = create_app(settings, &services);

    let ip_addr = settings.server.host.parse::<IpAddr>()?;

    let address = SocketAddr::from((ip_addr, settings.server.port));

    let listener = TcpListener::bind(&address).await?;

    tracing::info!("listening on {:?}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
