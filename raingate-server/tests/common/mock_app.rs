use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;

use raingate_mock::{IrMode, MockIrController, MockSensor, SensorMode, unreachable_address};
use raingate_server::app::{AppServices, create_app};
use raingate_server::configs::Settings;
use raingate_server::services::MonitorService;

#[allow(dead_code)]
pub const BUTTONS: [&str; 4] = ["open-left", "open-right", "close-left", "close-right"];

#[allow(dead_code)]
pub struct MockApp {
    pub router: Router,
    pub settings: Arc<Settings>,
    pub services: AppServices,
    pub sensor: MockSensor,
    pub ir_controller: MockIrController,
}

impl MockApp {
    pub async fn new() -> Self {
        Self::with_modes(SensorMode::Value(812.0), IrMode::Ack(String::from("Done"))).await
    }

    pub async fn with_modes(sensor_mode: SensorMode, ir_mode: IrMode) -> Self {
        let sensor = MockSensor::spawn(any_port(), sensor_mode).await.unwrap();
        let ir_controller = MockIrController::spawn(any_port(), ir_mode).await.unwrap();

        let settings = test_settings(sensor.address(), ir_controller.address());

        Self::build(settings, sensor, ir_controller)
    }

    /// The rain sensor address points at a closed port.
    #[allow(dead_code)]
    pub async fn with_offline_sensor() -> Self {
        let app = Self::new().await;
        let offline = unreachable_address().await.unwrap();

        let settings = test_settings(offline, app.ir_controller.address());

        Self::build(settings, app.sensor, app.ir_controller)
    }

    /// The IR controller address points at a closed port.
    #[allow(dead_code)]
    pub async fn with_offline_ir_controller() -> Self {
        let app = Self::new().await;
        let offline = unreachable_address().await.unwrap();

        let settings = test_settings(app.sensor.address(), offline);

        Self::build(settings, app.sensor, app.ir_controller)
    }

    #[allow(dead_code)]
    pub fn with_stylesheet(self, path: &str) -> Self {
        let mut settings = (*self.settings).clone();
        settings.server.stylesheet = path.to_string();
        let settings = Arc::new(settings);

        Self {
            router: create_app(&settings, &self.services),
            settings,
            ..self
        }
    }

    #[allow(dead_code)]
    pub fn monitor(&self) -> Arc<MonitorService> {
        Arc::new(MonitorService::new(
            self.services.device_service.clone(),
            self.services.reading.clone(),
            self.settings.timings.clone(),
            self.settings.rainlevel.clone(),
        ))
    }

    #[allow(dead_code)]
    pub fn endpoint(&self, action: &str) -> String {
        self.settings.endpoints[action].clone()
    }

    fn build(settings: Settings, sensor: MockSensor, ir_controller: MockIrController) -> Self {
        let settings = Arc::new(settings);
        let services = AppServices::new(&settings).unwrap();
        let router = create_app(&settings, &services);

        Self {
            router,
            settings,
            services,
            sensor,
            ir_controller,
        }
    }
}

fn any_port() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

fn test_settings(sensor: SocketAddr, ir_controller: SocketAddr) -> Settings {
    let source = format!(
        r#"
        buttons = ["open-left", "open-right", "close-left", "close-right"]

        [server]
        host = "127.0.0.1"
        port = 8080
        stylesheet = "{manifest}/static/style.css"

        [logger]
        level = "debug"

        [timings]
        refresh = 1

        [rainlevel]
        threshold = 300
        default = 1000
        close_actions = ["close-left", "close-right"]

        [devices]
        rain_sensor = "{sensor}"
        ir_controller = "{ir_controller}"
        connect_timeout = 1

        [endpoints]
        "get-rain-data" = "/cm?cmnd=Status%2010"
        "open-left" = "/ir/open-left"
        "open-right" = "/ir/open-right"
        "close-left" = "/ir/close-left"
        "close-right" = "/ir/close-right"
        "#,
        manifest = env!("CARGO_MANIFEST_DIR"),
    );

    Settings::from_toml(&source).unwrap()
}
