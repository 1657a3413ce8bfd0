mod settings;

pub use settings::{Devices, Logger, RainLevel, SENSOR_ENDPOINT, Server, Settings, Timings};
