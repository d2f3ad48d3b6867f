#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Client Environment Information Library
//!
//! This library normalizes what a host runtime exposes about the client it
//! runs on into one plain record:
//! - Device information (device class, OS, browser, screen, viewport, touch)
//! - Hardware information (concurrency, memory, GPU, battery, storage, media
//!   decoding)
//!
//! Every value comes from a [`HostEnvironment`] passed in explicitly. Optional
//! capabilities that are missing or fail turn into a fixed sentinel string in
//! the field they belong to; collection itself never fails.

mod collector;
mod device_collector;
mod hardware_collector;

#[cfg(feature = "native")]
mod native;

pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod host;
pub mod model;
pub mod snapshot;

pub use collector::EnvInfoCollector;
pub use config::{CollectorConfig, MediaProbe};
pub use device_collector::DeviceInfoCollector;
pub use error::ProbeError;
pub use hardware_collector::HardwareInfoCollector;
pub use host::HostEnvironment;
pub use model::*;
#[cfg(feature = "native")]
pub use native::NativeHost;
pub use snapshot::{HostSnapshot, SnapshotProbe};
