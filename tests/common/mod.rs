//! Shared test helpers.
#![allow(dead_code)]

use clipstore::application::session::Session;
use clipstore::application::store::{FeatureStore, StoreOptions};
use clipstore::domain::error::ClipError;
use clipstore::domain::ports::device_runtime::DeviceRuntime;
use clipstore::domain::values::device::{DeviceSelector, DevicesInfo};
use clipstore::infrastructure::memory::MemoryRepo;
use std::sync::{Arc, Mutex};

pub fn memory_store(dimension: usize) -> FeatureStore {
    FeatureStore::open(Arc::new(MemoryRepo), StoreOptions::new(dimension)).unwrap()
}

/// The three-entry store from the matching walkthrough: A=[1,0], B=[0,1], C=[0.7071,0.7071].
pub fn abc_store() -> FeatureStore {
    let store = memory_store(2);
    store.insert("A", vec![1.0, 0.0]).unwrap();
    store.insert("B", vec![0.0, 1.0]).unwrap();
    store.insert("C", vec![0.7071, 0.7071]).unwrap();
    store
}

/// Deterministic pseudo-random unit vector.
pub fn unit_vector(seed: u64, dimension: usize) -> Vec<f32> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut v: Vec<f32> = (0..dimension)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) as f32 / (1u64 << 31) as f32) - 0.5
        })
        .collect();
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    v.iter_mut().for_each(|x| *x /= norm);
    v
}

/// Runtime that records init/deinit calls and never fails.
#[derive(Default)]
pub struct RecordingRuntime {
    pub events: Mutex<Vec<String>>,
}

impl RecordingRuntime {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl DeviceRuntime for RecordingRuntime {
    fn enum_devices(&self) -> Result<DevicesInfo, ClipError> {
        let mut info = DevicesInfo::default();
        info.host.available = true;
        Ok(info)
    }

    fn init(&self, device: DeviceSelector) -> Result<(), ClipError> {
        self.events.lock().unwrap().push(format!("init {device}"));
        Ok(())
    }

    fn deinit(&self, device: DeviceSelector) -> Result<(), ClipError> {
        self.events.lock().unwrap().push(format!("deinit {device}"));
        Ok(())
    }
}

pub fn host_session() -> (Arc<RecordingRuntime>, Session) {
    let runtime = Arc::new(RecordingRuntime::default());
    let session = Session::open(runtime.clone(), DeviceSelector::host()).unwrap();
    (runtime, session)
}
