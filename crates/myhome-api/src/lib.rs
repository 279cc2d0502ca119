// myhome-api: Async Rust client for the MyHOME gateway-management API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod configuration;
mod discovery;
mod gateways;

pub use client::MyHomeClient;
pub use error::Error;
pub use models::{
    ActivationDiscoveryResponse, ConfigurationResponse, DeleteDeviceRequest, DeviceListing,
    DeviceWriteRequest, DeviceWriteResponse, GatewayInfo, GatewayListResponse,
    PassiveDiscoveryResponse, RawConfiguredDevice,
};
pub use transport::{TlsMode, TransportConfig};
