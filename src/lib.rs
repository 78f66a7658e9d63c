//! Control Sony projectors over SDCP and keep a shared, polled view of their state.
//!
//! A [`Projector`] is a session with one projector. A [`Coordinator`] owns that
//! session, polls it on a fixed interval and publishes a [`Snapshot`] to
//! listeners and [`entity`] adapters.

mod config;
mod constant;
mod coordinator;
mod device;
mod discover;
pub mod entity;
pub mod error;

pub use config::Config;
pub use constant::{DEFAULT_POLL_INTERVAL, DEFAULT_SDAP_MAXTIME, SDCP_PORT};
pub use coordinator::{Coordinator, ListenerId, PollHandle, Snapshot, Status, Update};
pub use device::{
    validate_tables, Action, AdvancedIris, AspectRatio, CalibrationPreset, Choice, DynamicRange,
    HdmiInput, HdrMode, IrCommand, LampControl, MenuPosition, Motionflow, PicturePosition,
    Projector, Sdcp, Setting, ThreeDFormat, TwoDThreeD,
};
pub use discover::DiscoveredProjector;
pub use error::{Error, Result};

use constant::SDAP_PORT;

use std::time::Duration;

/// Discover Sony projectors on the network
///
/// Listens for SDAP advertisements, which projectors broadcast periodically,
/// for `timeout` and returns every projector heard. Projectors advertise every
/// few seconds; [`DEFAULT_SDAP_MAXTIME`] is enough to hear each one once.
pub async fn discover_projectors(timeout: Duration) -> Result<Vec<DiscoveredProjector>> {
    discover::sdap(SDAP_PORT, timeout).await
}

/// Set up a coordinator for the configured projector
///
/// The projector must answer a power query, otherwise setup fails with
/// [`ClientError::CannotConnect`](error::ClientError::CannotConnect). Polling is
/// not started; call [`Coordinator::start()`].
///
/// # Example
///
/// ```no_run
/// # use sony_sdcp::{connect, Config};
/// #
/// # async fn setup() -> Result<(), sony_sdcp::Error> {
/// let coordinator = connect(Config::new("192.168.0.20", "Theater")).await?;
/// let _polling = coordinator.start();
/// # Ok(())
/// # }
/// ```
pub async fn connect(config: Config) -> Result<Coordinator<Projector>> {
    connect_with(Projector::new(config.host.clone()), &config).await
}

/// Like [`connect()`], with a preconfigured session
pub async fn connect_with<P: Sdcp>(projector: P, config: &Config) -> Result<Coordinator<P>> {
    config.validate()?;
    validate_tables()?;

    if let Err(e) = projector.get_power().await {
        log::warn!("Could not connect to {}: {}", config.host, e);
        return Err(Error::cannot_connect(config.host.clone()));
    }

    log::debug!("Connected to {} at {}", config.name, config.host);
    Ok(Coordinator::new(projector, config.poll_interval))
}
