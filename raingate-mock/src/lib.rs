use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::settings::Settings;
use crate::simulate::Weather;

mod device;
pub mod settings;
mod simulate;

pub use device::{IrMode, MockIrController, MockSensor, SensorMode, unreachable_address};

pub async fn run(settings: &Arc<Settings>) -> io::Result<()> {
    let mut weather = Weather::new(settings.simulation.clone());

    let sensor = MockSensor::spawn(
        settings.sensor.address,
        SensorMode::Value(settings.simulation.dry_level),
    )
    .await?;
    let ir_controller = MockIrController::spawn(
        settings.ir_controller.address,
        IrMode::Ack(settings.ir_controller.reply.clone()),
    )
    .await?;

    tracing::info!("rain sensor listening on {}", sensor.address());
    tracing::info!("ir controller listening on {}", ir_controller.address());

    let mut interval = time::interval(Duration::from_secs(settings.simulation.step));
    let mut seen = 0;
    loop {
        interval.tick().await;

        let was_raining = weather.is_raining();
        let level = weather.step(&mut rand::rng());
        sensor.set_mode(SensorMode::Value(level)).await;

        if weather.is_raining() != was_raining {
            tracing::info!(raining = weather.is_raining(), "weather changed");
        }
        tracing::debug!("rain level {}", level);

        let commands = ir_controller.commands().await;
        for command in &commands[seen..] {
            tracing::info!("ir controller received {}", command);
        }
        seen = commands.len();
    }
}
