use std::error::Error;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    pub address: SocketAddr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrController {
    pub address: SocketAddr,
    pub reply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    /// Seconds between two simulated sensor updates
    pub step: u64,
    pub dry_level: f64,
    pub wet_level: f64,
    /// Chance per step that the weather flips between dry and rain
    pub shower_chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub sensor: Sensor,
    pub ir_controller: IrController,
    pub simulation: Simulation,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let settings: Settings = toml::from_str(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../",
            "configs/mock.toml"
        )))?;

        if !(0.0..=1.0).contains(&settings.simulation.shower_chance) {
            return Err("shower_chance must be within 0.0 and 1.0".into());
        }

        if settings.simulation.step == 0 {
            return Err("simulation step must be at least one second".into());
        }

        Ok(settings)
    }
}
