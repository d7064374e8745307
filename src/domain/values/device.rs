use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on accelerator cards reported by one enumeration.
pub const MAX_DEVICES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Host,
    Accelerator,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Host => write!(f, "host"),
            DeviceKind::Accelerator => write!(f, "accelerator"),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "host" => Ok(DeviceKind::Host),
            "accelerator" | "axcl" => Ok(DeviceKind::Accelerator),
            _ => Err(format!("Unknown device kind: {s}")),
        }
    }
}

/// Execution target: the host itself, or accelerator card `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceSelector {
    pub kind: DeviceKind,
    #[serde(default)]
    pub id: u8,
}

impl DeviceSelector {
    pub fn host() -> Self {
        Self { kind: DeviceKind::Host, id: 0 }
    }

    pub fn accelerator(id: u8) -> Self {
        Self { kind: DeviceKind::Accelerator, id }
    }
}

impl Default for DeviceSelector {
    fn default() -> Self {
        Self::host()
    }
}

impl fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DeviceKind::Host => write!(f, "host"),
            DeviceKind::Accelerator => write!(f, "accelerator:{}", self.id),
        }
    }
}

/// Memory figures in MiB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemInfo {
    pub remain: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostInfo {
    pub available: bool,
    pub version: String,
    pub mem_info: MemInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcceleratorInfo {
    /// Degrees Celsius.
    pub temp: i32,
    /// Percent.
    pub cpu_usage: u8,
    /// Percent.
    pub npu_usage: u8,
    pub mem_info: MemInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcceleratorsInfo {
    pub host_version: String,
    pub dev_version: String,
    pub devices: Vec<AcceleratorInfo>,
}

impl AcceleratorsInfo {
    pub fn count(&self) -> usize {
        self.devices.len()
    }
}

/// Informational snapshot of every execution target visible to a runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevicesInfo {
    pub host: HostInfo,
    pub accelerators: AcceleratorsInfo,
}

impl DevicesInfo {
    /// Host if it is usable, otherwise the first accelerator, mirroring how the demo scripts pick a target.
    pub fn preferred(&self) -> Option<DeviceSelector> {
        if self.host.available {
            Some(DeviceSelector::host())
        } else if self.accelerators.count() > 0 {
            Some(DeviceSelector::accelerator(0))
        } else {
            None
        }
    }
}
