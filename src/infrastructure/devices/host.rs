use crate::domain::error::ClipError;
use crate::domain::ports::device_runtime::DeviceRuntime;
use crate::domain::values::device::{DeviceKind, DeviceSelector, DevicesInfo, HostInfo, MemInfo};
use parking_lot::Mutex;
use std::collections::HashSet;

/// Runtime for host-only execution. Reports no accelerator cards.
pub struct HostRuntime {
    initialized: Mutex<HashSet<DeviceSelector>>,
}

impl HostRuntime {
    pub fn new() -> Self {
        Self { initialized: Mutex::new(HashSet::new()) }
    }
}

impl Default for HostRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceRuntime for HostRuntime {
    fn enum_devices(&self) -> Result<DevicesInfo, ClipError> {
        let mem_info = std::fs::read_to_string("/proc/meminfo")
            .map(|s| parse_meminfo(&s))
            .unwrap_or_default();
        Ok(DevicesInfo {
            host: HostInfo {
                available: true,
                version: env!("CARGO_PKG_VERSION").to_string(),
                mem_info,
            },
            ..Default::default()
        })
    }

    fn init(&self, device: DeviceSelector) -> Result<(), ClipError> {
        if device.kind == DeviceKind::Accelerator {
            return Err(ClipError::Device(format!("no accelerator runtime available for {device}")));
        }
        if !self.initialized.lock().insert(device) {
            return Err(ClipError::Device(format!("{device} is already initialized")));
        }
        tracing::info!(device = %device, "Device initialized");
        Ok(())
    }

    fn deinit(&self, device: DeviceSelector) -> Result<(), ClipError> {
        if !self.initialized.lock().remove(&device) {
            return Err(ClipError::Device(format!("{device} is not initialized")));
        }
        tracing::info!(device = %device, "Device deinitialized");
        Ok(())
    }
}

/// `MemAvailable`/`MemTotal` from /proc/meminfo, converted from KiB to MiB.
fn parse_meminfo(text: &str) -> MemInfo {
    let field = |name: &str| -> u64 {
        text.lines()
            .find_map(|l| l.strip_prefix(name))
            .and_then(|rest| rest.trim_start_matches(':').split_whitespace().next())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0)
    };
    MemInfo {
        remain: field("MemAvailable") / 1024,
        total: field("MemTotal") / 1024,
    }
}
