#![allow(dead_code)]

mod scripted;
mod simulated_device;

pub use scripted::{Script, ScriptedProjector};
pub use simulated_device::{Behavior, DeviceState, SimulatedDevice};

use sony_sdcp::{Coordinator, Projector, Update};

use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

fn init_logger() {
    if let Err(e) = pretty_env_logger::try_init() {
        log::warn!(target: "test::support", "Logger init() returned '{}'", e);
    }
}

/// Start a simulated projector and return it with a client session for it
pub async fn simulate(powered_on: bool) -> (SimulatedDevice, Projector) {
    init_logger();

    let device = SimulatedDevice::start(powered_on).await;
    let projector = Projector::new("127.0.0.1")
        .with_port(device.addr.port())
        .with_timeout(Duration::from_secs(2));
    (device, projector)
}

/// Coordinator over a scripted projector
pub fn scripted(script: Script) -> (ScriptedProjector, Coordinator<ScriptedProjector>) {
    init_logger();

    let projector = ScriptedProjector::new(script);
    let coordinator = Coordinator::new(projector.clone(), POLL_INTERVAL);
    (projector, coordinator)
}

/// Record every update a coordinator delivers
pub fn record<P: sony_sdcp::Sdcp>(coordinator: &Coordinator<P>) -> Arc<Mutex<Vec<Update>>> {
    let updates = Arc::new(Mutex::new(Vec::new()));
    coordinator.subscribe({
        let updates = updates.clone();
        move |update: &Update| updates.lock().unwrap().push(update.clone())
    });
    updates
}

/// A local port with nothing listening on it
pub async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}
