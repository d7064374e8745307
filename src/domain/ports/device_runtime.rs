use crate::domain::error::ClipError;
use crate::domain::values::device::{DeviceSelector, DevicesInfo};

/// Process-wide execution runtime. `init` must precede any store bound to the
/// device and `deinit` must follow the last one.
pub trait DeviceRuntime: Send + Sync {
    fn enum_devices(&self) -> Result<DevicesInfo, ClipError>;
    fn init(&self, device: DeviceSelector) -> Result<(), ClipError>;
    fn deinit(&self, device: DeviceSelector) -> Result<(), ClipError>;
}
