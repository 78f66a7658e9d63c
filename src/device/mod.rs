use crate::constant::{DEFAULT_COMMUNITY, DEFAULT_TIMEOUT, SDCP_PORT};
use crate::error::{Error, Result};

mod command;
mod remote;
mod response;
mod settings;

pub use self::command::Action;
pub use self::remote::IrCommand;
pub use self::settings::{
    validate_tables, AdvancedIris, AspectRatio, CalibrationPreset, Choice, DynamicRange,
    HdmiInput, HdrMode, LampControl, MenuPosition, Motionflow, PicturePosition, Setting,
    ThreeDFormat, TwoDThreeD,
};

use self::command::{item, power_status, Command, HEADER_LEN};
use self::response::Response;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use std::sync::Arc;
use std::time::Duration;

/// Operations a projector control session offers.
///
/// Calls may fail on network errors or timeouts and are not meant to be issued
/// concurrently by independent callers; the [`Coordinator`](crate::Coordinator)
/// serializes them.
#[async_trait]
pub trait Sdcp: Send + Sync + 'static {
    /// Whether the projector is on. Warming up counts as on, cooling down as off.
    async fn get_power(&self) -> Result<bool>;

    async fn set_power(&self, on: bool) -> Result<()>;

    /// Whether the picture is muted
    async fn get_muting(&self) -> Result<bool>;

    async fn set_muting(&self, on: bool) -> Result<()>;

    /// Hours on the lamp timer
    async fn get_lamp_hours(&self) -> Result<u32>;

    /// Active HDMI input
    async fn get_input(&self) -> Result<HdmiInput>;

    async fn set_input(&self, input: HdmiInput) -> Result<()>;

    /// Write one screen or picture setting
    async fn set_screen(&self, setting: Setting) -> Result<()>;

    /// Emulate a remote control key press
    async fn press(&self, key: IrCommand) -> Result<()>;

    /// Send a raw command for settings without a dedicated method. Returns the
    /// response's data word, if any.
    async fn send_command(&self, action: Action, item: u16, data: Option<u16>)
        -> Result<Option<u16>>;
}

/// A Sony projector reachable over SDCP
///
/// Every request opens its own TCP connection to the projector, which answers
/// exactly one request per connection. Cloning `Projector` is cheap and clones
/// share the same session settings.
///
/// # Example
///
/// ```no_run
/// # use sony_sdcp::{Projector, Sdcp};
/// #
/// # async fn power_on() -> Result<(), sony_sdcp::Error> {
/// let projector = Projector::new("192.168.0.20");
/// if !projector.get_power().await? {
///     projector.set_power(true).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Projector {
    inner: Arc<ProjectorRef>,
}

#[derive(Debug)]
struct ProjectorRef {
    host: String,
    port: u16,
    community: String,
    timeout: Duration,
}

impl Projector {
    /// Session for the projector at `host` on the default SDCP port
    pub fn new<S: Into<String>>(host: S) -> Self {
        Self {
            inner: Arc::new(ProjectorRef {
                host: host.into(),
                port: SDCP_PORT,
                community: DEFAULT_COMMUNITY.into(),
                timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            }),
        }
    }

    pub fn with_port(self, port: u16) -> Self {
        self.map(|inner| inner.port = port)
    }

    /// Community string configured on the projector, "SONY" unless changed
    pub fn with_community<S: Into<String>>(self, community: S) -> Self {
        let community = community.into();
        self.map(|inner| inner.community = community)
    }

    /// Upper bound for one request/response exchange
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.map(|inner| inner.timeout = timeout)
    }

    fn map<F: FnOnce(&mut ProjectorRef)>(self, f: F) -> Self {
        let mut inner = ProjectorRef {
            host: self.inner.host.clone(),
            port: self.inner.port,
            community: self.inner.community.clone(),
            timeout: self.inner.timeout,
        };
        f(&mut inner);
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Projector's host name or IP
    pub fn host(&self) -> String {
        self.inner.host.clone()
    }

    /// Projector's SDCP port
    pub fn port(&self) -> u16 {
        self.inner.port
    }

    pub fn community(&self) -> String {
        self.inner.community.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    async fn send(&self, command: Command) -> Result<Response> {
        timeout(self.inner.timeout, self.exchange(&command)).await?
    }

    async fn exchange(&self, command: &Command) -> Result<Response> {
        let request = command.encode(&self.inner.community);
        log::trace!(
            "-> {}:{} {:?} item {:#06x} data {:?}",
            self.inner.host,
            self.inner.port,
            command.action,
            command.item,
            command.data
        );

        let mut stream = TcpStream::connect((self.inner.host.as_str(), self.inner.port)).await?;
        stream.write_all(&request).await?;

        let mut frame = vec![0u8; HEADER_LEN];
        if let Err(e) = stream.read_exact(&mut frame).await {
            return Err(match e.kind() {
                std::io::ErrorKind::UnexpectedEof => {
                    Error::malformed_response("connection closed before header".into())
                }
                _ => e.into(),
            });
        }
        let len = Response::frame_len(&frame)?;
        frame.resize(len, 0);
        if let Err(e) = stream.read_exact(&mut frame[HEADER_LEN..]).await {
            return Err(match e.kind() {
                std::io::ErrorKind::UnexpectedEof => {
                    Error::malformed_response("connection closed before data".into())
                }
                _ => e.into(),
            });
        }

        let res = response::process(&frame)?;
        log::trace!("<- item {:#06x} data {:?}", res.item, res.data);
        Ok(res)
    }
}

#[async_trait]
impl Sdcp for Projector {
    async fn get_power(&self) -> Result<bool> {
        let res = self.send(Command::get(item::STATUS_POWER)).await?;
        Ok(!matches!(
            res.data()?,
            power_status::STANDBY | power_status::COOLING | power_status::COOLING2
        ))
    }

    async fn set_power(&self, on: bool) -> Result<()> {
        log::debug!("Set power: {}", on);
        self.send(Command::set(item::SET_POWER, on as u16)).await?;
        Ok(())
    }

    async fn get_muting(&self) -> Result<bool> {
        let res = self.send(Command::get(item::PICTURE_MUTING)).await?;
        Ok(res.data()? == 1)
    }

    async fn set_muting(&self, on: bool) -> Result<()> {
        log::debug!("Set picture muting: {}", on);
        self.send(Command::set(item::PICTURE_MUTING, on as u16)).await?;
        Ok(())
    }

    async fn get_lamp_hours(&self) -> Result<u32> {
        let res = self.send(Command::get(item::STATUS_LAMP_TIMER)).await?;
        Ok(res.data()? as u32)
    }

    async fn get_input(&self) -> Result<HdmiInput> {
        let res = self.send(Command::get(item::INPUT)).await?;
        let value = res.data()?;
        HdmiInput::from_value(value).ok_or_else(|| Error::unexpected_value(item::INPUT, Some(value)))
    }

    async fn set_input(&self, input: HdmiInput) -> Result<()> {
        log::debug!("Set input: {}", input);
        self.send(Command::set(item::INPUT, input.value())).await?;
        Ok(())
    }

    async fn set_screen(&self, setting: Setting) -> Result<()> {
        log::debug!("Set screen: {:?}", setting);
        self.send(Command::set(setting.item(), setting.data())).await?;
        Ok(())
    }

    async fn press(&self, key: IrCommand) -> Result<()> {
        log::debug!("Press: {}", key.display_name());
        self.send(Command {
            action: Action::Set,
            item: key.code(),
            data: None,
        })
        .await?;
        Ok(())
    }

    async fn send_command(
        &self,
        action: Action,
        item: u16,
        data: Option<u16>,
    ) -> Result<Option<u16>> {
        let res = self.send(Command { action, item, data }).await?;
        Ok(res.data)
    }
}
