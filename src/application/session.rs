use crate::domain::error::ClipError;
use crate::domain::ports::device_runtime::DeviceRuntime;
use crate::domain::values::device::{DeviceSelector, DevicesInfo};
use std::sync::Arc;

struct SessionInner {
    runtime: Arc<dyn DeviceRuntime>,
    device: DeviceSelector,
    live: bool,
}

impl SessionInner {
    fn shutdown(&mut self) -> Result<(), ClipError> {
        if !self.live {
            return Ok(());
        }
        self.live = false;
        self.runtime.deinit(self.device)
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::warn!(device = %self.device, error = %e, "Device deinit failed during drop");
        }
    }
}

/// An initialized execution device.
///
/// Opening runs `runtime.init`; the matching `deinit` runs when the last
/// clone is closed or dropped. Stores keep a clone, so the device outlives
/// every store bound to it.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub fn open(runtime: Arc<dyn DeviceRuntime>, device: DeviceSelector) -> Result<Self, ClipError> {
        runtime.init(device)?;
        Ok(Self {
            inner: Arc::new(SessionInner { runtime, device, live: true }),
        })
    }

    /// Enumerates devices, picks the preferred one and opens it.
    pub fn open_preferred(runtime: Arc<dyn DeviceRuntime>) -> Result<Self, ClipError> {
        let info = runtime.enum_devices()?;
        let device = info
            .preferred()
            .ok_or_else(|| ClipError::Device("no available device".into()))?;
        Self::open(runtime, device)
    }

    pub fn device(&self) -> DeviceSelector {
        self.inner.device
    }

    pub fn enum_devices(&self) -> Result<DevicesInfo, ClipError> {
        self.inner.runtime.enum_devices()
    }

    /// Number of handles (this one plus stores and other clones) keeping the device alive.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Deinitializes the device now. While stores still hold the session this
    /// fails and the device is deinitialized when the last holder drops.
    pub fn close(self) -> Result<(), ClipError> {
        match Arc::try_unwrap(self.inner) {
            Ok(mut inner) => inner.shutdown(),
            Err(inner) => Err(ClipError::Device(format!(
                "{} still in use by {} other handle(s)",
                inner.device,
                Arc::strong_count(&inner) - 1
            ))),
        }
    }
}
