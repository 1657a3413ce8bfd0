use std::fmt;

/// Last known state of the rain sensor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SensorReading {
    /// Nothing fetched yet
    #[default]
    Loading,
    /// Analog level reported by the sensor, lower means wetter
    Value(f64),
    /// The sensor answered without a level
    NoData,
}

impl SensorReading {
    pub fn value(&self) -> Option<f64> {
        match self {
            SensorReading::Value(value) => Some(*value),
            _ => None,
        }
    }

    /// Only a numeric reading strictly below the threshold counts as rain.
    pub fn is_raining(&self, threshold: f64) -> bool {
        self.value().is_some_and(|value| value < threshold)
    }
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorReading::Loading => write!(f, "Loading..."),
            SensorReading::Value(value) => write!(f, "{value}"),
            SensorReading::NoData => write!(f, "Error retrieving data"),
        }
    }
}
