use crate::constant::DEFAULT_POLL_INTERVAL;
use crate::device::{Action, HdmiInput, IrCommand, Sdcp, Setting};
use crate::error::{Error, Result};

use serde::Serialize;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

/// Projector state produced by one successful poll cycle.
///
/// Only `power` is always known. The other fields are read only while the
/// projector is on and are `None` when unknown, either because the projector is
/// off or because reading them failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub power: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muting: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lamp_hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<HdmiInput>,
}

impl Snapshot {
    fn off() -> Self {
        Self {
            power: false,
            muting: None,
            lamp_hours: None,
            input: None,
        }
    }
}

/// Outcome of a poll cycle, delivered to listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// A new snapshot was published
    Published(Arc<Snapshot>),
    /// Power could not be read; the previous snapshot stays in place
    Failed(String),
}

/// Latest published snapshot and whether the most recent cycle failed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub snapshot: Option<Arc<Snapshot>>,
    pub failed: bool,
}

/// Identifies a listener registered with [`Coordinator::subscribe()`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&Update) + Send + Sync>;

/// Polls a projector and shares its state.
///
/// The coordinator owns the projector session. Every device operation, whether
/// a poll cycle or a command, holds the coordinator's I/O lock for its whole
/// exchange, so no two operations interleave. Cloning a `Coordinator` is cheap;
/// clones share the session, the snapshot and the listeners.
///
/// # Example
///
/// ```no_run
/// # use sony_sdcp::{Coordinator, Projector, Update};
/// # use std::time::Duration;
/// #
/// # async fn watch_power() -> Result<(), sony_sdcp::Error> {
/// let coordinator = Coordinator::new(Projector::new("192.168.0.20"), Duration::from_secs(30));
/// coordinator.subscribe(|update: &Update| {
///     if let Update::Published(snapshot) = update {
///         println!("power: {}", snapshot.power);
///     }
/// });
/// let _polling = coordinator.start();
///
/// coordinator.set_power(true).await?;
/// let snapshot = coordinator.refresh_now().await?;
/// # Ok(())
/// # }
/// ```
pub struct Coordinator<P: Sdcp> {
    inner: Arc<Inner<P>>,
}

impl<P: Sdcp> Clone for Coordinator<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct Inner<P> {
    projector: P,
    poll_interval: Duration,
    io: AsyncMutex<()>,
    status: RwLock<Status>,
    in_flight: Mutex<Option<watch::Receiver<Option<Update>>>>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<P: Sdcp> Coordinator<P> {
    /// Create a coordinator. A zero poll interval falls back to
    /// [`DEFAULT_POLL_INTERVAL`](crate::DEFAULT_POLL_INTERVAL) seconds.
    pub fn new(projector: P, poll_interval: Duration) -> Self {
        let poll_interval = if poll_interval.is_zero() {
            log::warn!(
                "Poll interval must be positive, using {}s",
                DEFAULT_POLL_INTERVAL
            );
            Duration::from_secs(DEFAULT_POLL_INTERVAL)
        } else {
            poll_interval
        };

        Self {
            inner: Arc::new(Inner {
                projector,
                poll_interval,
                io: AsyncMutex::new(()),
                status: RwLock::new(Status::default()),
                in_flight: Mutex::new(None),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(0),
            }),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.inner.poll_interval
    }

    /// Start polling. The first cycle runs immediately, then one every poll
    /// interval whether or not earlier cycles failed. Polling stops when the
    /// returned handle is stopped or dropped.
    pub fn start(&self) -> PollHandle {
        let coordinator = self.clone();
        let period = self.inner.poll_interval;

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = coordinator.refresh_now().await {
                    log::debug!("Scheduled poll failed: {}", e);
                }
            }
        });

        PollHandle { task }
    }

    /// Run a poll cycle now and return the snapshot it published.
    ///
    /// If a cycle is already in flight, this waits for that cycle instead of
    /// starting a second one, and returns its outcome. A cycle that fails to
    /// read power returns [`ClientError::UpdateFailed`](crate::error::ClientError::UpdateFailed).
    ///
    /// The cycle runs on its own task and completes even if the caller stops
    /// waiting.
    pub async fn refresh_now(&self) -> Result<Arc<Snapshot>> {
        let mut rx = {
            let mut in_flight = lock(&self.inner.in_flight);
            match in_flight.as_ref() {
                // A closed channel means the cycle's task was torn down
                Some(rx) if rx.has_changed().is_ok() => {
                    log::trace!("Joining poll cycle in flight");
                    rx.clone()
                }
                _ => {
                    let (tx, rx) = watch::channel(None);
                    *in_flight = Some(rx.clone());
                    tokio::spawn(self.inner.clone().cycle(tx));
                    rx
                }
            }
        };

        let update = rx
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|update| (*update).clone());

        match update {
            Some(Update::Published(snapshot)) => Ok(snapshot),
            Some(Update::Failed(reason)) => Err(Error::update_failed(reason)),
            None => Err(Error::update_failed("poll cycle ended without a result".into())),
        }
    }

    /// Latest published snapshot, and whether the most recent cycle failed
    pub fn snapshot(&self) -> Status {
        self.inner
            .status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Register a listener. It runs on the polling task after every cycle that
    /// publishes a snapshot or fails to read power.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Update) + Send + Sync + 'static,
    {
        let id = ListenerId(self.inner.next_listener.fetch_add(1, Ordering::Relaxed));
        lock(&self.inner.listeners).push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = lock(&self.inner.listeners);
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        listeners.len() != before
    }

    pub async fn set_power(&self, on: bool) -> Result<()> {
        let _io = self.inner.io.lock().await;
        self.inner.projector.set_power(on).await
    }

    pub async fn set_muting(&self, on: bool) -> Result<()> {
        let _io = self.inner.io.lock().await;
        self.inner.projector.set_muting(on).await
    }

    pub async fn set_input(&self, input: HdmiInput) -> Result<()> {
        let _io = self.inner.io.lock().await;
        self.inner.projector.set_input(input).await
    }

    pub async fn set_screen(&self, setting: Setting) -> Result<()> {
        let _io = self.inner.io.lock().await;
        self.inner.projector.set_screen(setting).await
    }

    pub async fn press(&self, key: IrCommand) -> Result<()> {
        let _io = self.inner.io.lock().await;
        self.inner.projector.press(key).await
    }

    pub async fn send_command(
        &self,
        action: Action,
        item: u16,
        data: Option<u16>,
    ) -> Result<Option<u16>> {
        let _io = self.inner.io.lock().await;
        self.inner.projector.send_command(action, item, data).await
    }
}

impl<P: Sdcp> Inner<P> {
    async fn cycle(self: Arc<Self>, tx: watch::Sender<Option<Update>>) {
        let _io = self.io.lock().await;

        let update = self.fetch().await;
        self.publish(&update);

        // Cleared while the I/O lock is held, so a refresh requested after any
        // later command starts a new cycle.
        *lock(&self.in_flight) = None;
        tx.send_replace(Some(update));
    }

    async fn fetch(&self) -> Update {
        let power = match self.projector.get_power().await {
            Ok(power) => power,
            Err(e) => {
                log::warn!("Error communicating with projector: {}", e);
                return Update::Failed(e.to_string());
            }
        };

        let mut snapshot = Snapshot::off();
        snapshot.power = power;
        if power {
            snapshot.muting = optional("muting", self.projector.get_muting().await);
            snapshot.lamp_hours = optional("lamp_hours", self.projector.get_lamp_hours().await);
            snapshot.input = optional("input", self.projector.get_input().await);
        }

        log::debug!("Poll cycle published {:?}", snapshot);
        Update::Published(Arc::new(snapshot))
    }

    fn publish(&self, update: &Update) {
        {
            let mut status = self.status.write().unwrap_or_else(PoisonError::into_inner);
            match update {
                Update::Published(snapshot) => {
                    status.snapshot = Some(snapshot.clone());
                    status.failed = false;
                }
                Update::Failed(_) => status.failed = true,
            }
        }

        // Listeners may subscribe or unsubscribe while being notified
        let listeners: Vec<Listener> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(update);
        }
    }
}

fn optional<T>(field: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Could not read {}: {}", field, e);
            None
        }
    }
}

/// Keeps a coordinator polling. Polling stops when the handle is dropped.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop polling. A cycle already running still completes for callers
    /// waiting on it.
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
