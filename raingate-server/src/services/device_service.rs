use std::collections::HashMap;
use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;

use crate::configs::{Devices, SENSOR_ENDPOINT};
use crate::errors::{ActionError, FetchError};
use crate::models::SensorReading;

const NO_IR_REPLY: &str = "No IR send action found";

/// Tasmota `Status 10` answer, only the analog block is of interest.
#[derive(Debug, Deserialize)]
struct SensorStatus {
    #[serde(rename = "StatusSNS")]
    status_sns: Option<StatusSns>,
}

#[derive(Debug, Deserialize)]
struct StatusSns {
    #[serde(rename = "ANALOG")]
    analog: Option<Analog>,
}

#[derive(Debug, Deserialize)]
struct Analog {
    #[serde(rename = "A1")]
    a1: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct IrReply {
    #[serde(rename = "IRSend")]
    ir_send: Option<serde_json::Value>,
}

/// HTTP client for the rain sensor and the IR controller.
pub struct DeviceService {
    client: reqwest::Client,
    devices: Devices,
    endpoints: HashMap<String, String>,
    sensor_url: String,
}

impl DeviceService {
    pub fn new(devices: Devices, endpoints: HashMap<String, String>) -> Result<Self, ConfigError> {
        let sensor_path = endpoints
            .get(SENSOR_ENDPOINT)
            .ok_or_else(|| ConfigError::NotFound(format!("endpoints.{SENSOR_ENDPOINT}")))?;
        let sensor_url = format!("http://{}{}", devices.rain_sensor, sensor_path);

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(devices.connect_timeout))
            .build()
            .map_err(|e| ConfigError::Message(format!("http client: {e}")))?;

        Ok(Self {
            client,
            devices,
            endpoints,
            sensor_url,
        })
    }

    pub async fn fetch_sensor_reading(&self) -> Result<SensorReading, FetchError> {
        tracing::info!("fetching data from {}", self.sensor_url);

        let body = self.get(&self.sensor_url).await.map_err(|e| {
            tracing::error!("error fetching data from {}: {}", self.sensor_url, e);
            FetchError::Network(e.to_string())
        })?;

        let reading = parse_reading(&body).map_err(|e| {
            tracing::error!("error parsing fetched data: {}", e);
            FetchError::Parse(e.to_string())
        })?;

        tracing::info!("fetched rain sensor data: {}", reading);

        Ok(reading)
    }

    /// Sends the IR command configured for `action`. Unknown actions never reach the network.
    pub async fn trigger_action(&self, action: &str) -> Result<String, ActionError> {
        let Some(path) = self.endpoints.get(action) else {
            tracing::error!("invalid action: {}", action);
            return Err(ActionError::InvalidAction(action.to_string()));
        };

        let url = format!("http://{}{}", self.devices.ir_controller, path);

        tracing::info!("triggering {} via {}", action, url);

        let body = self.get(&url).await.map_err(|e| {
            tracing::error!("error triggering {}: {}", action, e);
            ActionError::Network(e.to_string())
        })?;

        let reply = parse_ir_reply(&body).map_err(|e| {
            tracing::error!("error parsing ir controller response for {}: {}", action, e);
            ActionError::Parse(e.to_string())
        })?;

        tracing::info!("ir controller response for {}: {}", action, reply);

        Ok(reply)
    }

    async fn get(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client.get(url).send().await?.text().await
    }
}

fn parse_reading(body: &str) -> Result<SensorReading, serde_json::Error> {
    let status: SensorStatus = serde_json::from_str(body)?;

    let level = status
        .status_sns
        .and_then(|sns| sns.analog)
        .and_then(|analog| analog.a1);

    Ok(level.map_or(SensorReading::NoData, SensorReading::Value))
}

fn parse_ir_reply(body: &str) -> Result<String, serde_json::Error> {
    let reply: IrReply = serde_json::from_str(body)?;

    Ok(match reply.ir_send {
        Some(serde_json::Value::String(text)) => text,
        Some(serde_json::Value::Null) | None => NO_IR_REPLY.to_string(),
        Some(other) => other.to_string(),
    })
}
