use sony_sdcp::error::ClientError;
use sony_sdcp::{Action, Error, HdmiInput, IrCommand, Result, Sdcp, Setting};

use async_trait::async_trait;
use tokio::time::sleep;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Values the scripted projector answers with. `None` makes the read fail.
#[derive(Debug, Clone)]
pub struct Script {
    pub power: Option<bool>,
    pub muting: Option<bool>,
    pub lamp_hours: Option<u32>,
    pub input: Option<HdmiInput>,
    /// Time every operation takes
    pub delay: Duration,
    pub fail_commands: bool,
    /// Power reads fail even after a successful `set_power`
    pub fail_power_reads: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            power: Some(true),
            muting: Some(false),
            lamp_hours: Some(1234),
            input: Some(HdmiInput::Hdmi1),
            delay: Duration::ZERO,
            fail_commands: false,
            fail_power_reads: false,
        }
    }
}

/// In-memory projector whose answers are set by the test
#[derive(Clone, Default)]
pub struct ScriptedProjector {
    inner: Arc<ScriptedRef>,
}

#[derive(Default)]
struct ScriptedRef {
    script: Mutex<Script>,
    calls: Mutex<Vec<&'static str>>,
    busy: AtomicBool,
    overlaps: AtomicUsize,
}

struct Busy<'a>(&'a ScriptedRef);

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.0.busy.store(false, Ordering::SeqCst);
    }
}

impl ScriptedProjector {
    pub fn new(script: Script) -> Self {
        let projector = Self::default();
        *projector.inner.script.lock().unwrap() = script;
        projector
    }

    pub fn update<F: FnOnce(&mut Script)>(&self, f: F) {
        f(&mut self.inner.script.lock().unwrap());
    }

    /// Operations performed, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    /// Number of operations that started while another was running
    pub fn overlaps(&self) -> usize {
        self.inner.overlaps.load(Ordering::SeqCst)
    }

    async fn enter(&self, call: &'static str) -> (Busy<'_>, Script) {
        if self.inner.busy.swap(true, Ordering::SeqCst) {
            self.inner.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        let busy = Busy(&self.inner);
        self.inner.calls.lock().unwrap().push(call);

        let delay = self.inner.script.lock().unwrap().delay;
        if !delay.is_zero() {
            sleep(delay).await;
        }
        let script = self.inner.script.lock().unwrap().clone();
        (busy, script)
    }

    async fn command<F: FnOnce(&mut Script)>(&self, call: &'static str, f: F) -> Result<()> {
        let (_busy, script) = self.enter(call).await;
        if script.fail_commands {
            return Err(ClientError::Timeout.into());
        }
        self.update(f);
        Ok(())
    }
}

fn answer<T>(value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::from(ClientError::Timeout))
}

#[async_trait]
impl Sdcp for ScriptedProjector {
    async fn get_power(&self) -> Result<bool> {
        let (_busy, script) = self.enter("get_power").await;
        if script.fail_power_reads {
            return Err(ClientError::Timeout.into());
        }
        answer(script.power)
    }

    async fn set_power(&self, on: bool) -> Result<()> {
        self.command("set_power", |s| s.power = Some(on)).await
    }

    async fn get_muting(&self) -> Result<bool> {
        let (_busy, script) = self.enter("get_muting").await;
        answer(script.muting)
    }

    async fn set_muting(&self, on: bool) -> Result<()> {
        self.command("set_muting", |s| s.muting = Some(on)).await
    }

    async fn get_lamp_hours(&self) -> Result<u32> {
        let (_busy, script) = self.enter("get_lamp_hours").await;
        answer(script.lamp_hours)
    }

    async fn get_input(&self) -> Result<HdmiInput> {
        let (_busy, script) = self.enter("get_input").await;
        answer(script.input)
    }

    async fn set_input(&self, input: HdmiInput) -> Result<()> {
        self.command("set_input", |s| s.input = Some(input)).await
    }

    async fn set_screen(&self, _setting: Setting) -> Result<()> {
        self.command("set_screen", |_| {}).await
    }

    async fn press(&self, _key: IrCommand) -> Result<()> {
        self.command("press", |_| {}).await
    }

    async fn send_command(
        &self,
        _action: Action,
        _item: u16,
        _data: Option<u16>,
    ) -> Result<Option<u16>> {
        self.command("send_command", |_| {}).await?;
        Ok(None)
    }
}
