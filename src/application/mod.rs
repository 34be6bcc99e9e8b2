// Application layer - Use cases driving the device through the DeviceApi port
pub mod device_api;
pub mod home_service;
pub mod light_service;
pub mod telemetry_poller;
pub mod telemetry_view;
