pub mod device_service;
pub mod monitor_service;
pub mod reading_store;

pub use device_service::DeviceService;
pub use monitor_service::{Enforcement, MonitorHandle, MonitorService};
pub use reading_store::ReadingStore;
