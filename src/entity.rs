//! Presentation adapters over a [`Coordinator`].
//!
//! Entities never talk to the projector on their own. They read the shared
//! snapshot and send commands through the coordinator, requesting a refresh
//! after commands that change polled state.

use crate::coordinator::Coordinator;
use crate::device::{
    AdvancedIris, AspectRatio, CalibrationPreset, Choice, DynamicRange, HdmiInput, HdrMode,
    IrCommand, LampControl, MenuPosition, Motionflow, PicturePosition, Sdcp, Setting,
    ThreeDFormat, TwoDThreeD,
};
use crate::error::Result;

use std::sync::{Mutex, PoisonError};

/// Fields every entity shares
#[derive(Debug, Clone)]
struct Entry {
    unique_id: String,
    name: String,
}

impl Entry {
    fn new(device_id: &str, key: &str, name: &str) -> Self {
        Self {
            unique_id: format!("{}_{}", device_id, key),
            name: name.into(),
        }
    }
}

/// Refresh after a successful command. A failed cycle is already reported
/// through the coordinator's status, so it does not fail the command.
async fn refresh<P: Sdcp>(coordinator: &Coordinator<P>) {
    if let Err(e) = coordinator.refresh_now().await {
        log::warn!("Refresh after command failed: {}", e);
    }
}

macro_rules! entity_common {
    () => {
        /// Identifier unique across all projectors, `"{device_id}_{key}"`
        pub fn unique_id(&self) -> String {
            self.entry.unique_id.clone()
        }

        pub fn name(&self) -> String {
            self.entry.name.clone()
        }

        /// False while the most recent poll cycle failed
        pub fn available(&self) -> bool {
            !self.coordinator.snapshot().failed
        }
    };
}

/// Projector power
pub struct PowerSwitch<P: Sdcp> {
    coordinator: Coordinator<P>,
    entry: Entry,
}

impl<P: Sdcp> PowerSwitch<P> {
    pub fn new(coordinator: Coordinator<P>, device_id: &str) -> Self {
        Self {
            coordinator,
            entry: Entry::new(device_id, "power", "Power"),
        }
    }

    entity_common!();

    /// `None` until the first snapshot is published
    pub fn is_on(&self) -> Option<bool> {
        self.coordinator.snapshot().snapshot.map(|s| s.power)
    }

    pub async fn turn_on(&self) -> Result<()> {
        self.coordinator.set_power(true).await?;
        refresh(&self.coordinator).await;
        Ok(())
    }

    pub async fn turn_off(&self) -> Result<()> {
        self.coordinator.set_power(false).await?;
        refresh(&self.coordinator).await;
        Ok(())
    }
}

/// Picture muting
pub struct MutingSwitch<P: Sdcp> {
    coordinator: Coordinator<P>,
    entry: Entry,
}

impl<P: Sdcp> MutingSwitch<P> {
    pub fn new(coordinator: Coordinator<P>, device_id: &str) -> Self {
        Self {
            coordinator,
            entry: Entry::new(device_id, "picture_muting", "Picture Muting"),
        }
    }

    entity_common!();

    pub fn is_on(&self) -> Option<bool> {
        self.coordinator.snapshot().snapshot.and_then(|s| s.muting)
    }

    pub async fn turn_on(&self) -> Result<()> {
        self.coordinator.set_muting(true).await?;
        refresh(&self.coordinator).await;
        Ok(())
    }

    pub async fn turn_off(&self) -> Result<()> {
        self.coordinator.set_muting(false).await?;
        refresh(&self.coordinator).await;
        Ok(())
    }
}

/// Lamp timer in hours
pub struct LampHoursSensor<P: Sdcp> {
    coordinator: Coordinator<P>,
    entry: Entry,
}

impl<P: Sdcp> LampHoursSensor<P> {
    pub const UNIT: &'static str = "h";

    pub fn new(coordinator: Coordinator<P>, device_id: &str) -> Self {
        Self {
            coordinator,
            entry: Entry::new(device_id, "lamp_hours", "Lamp Hours"),
        }
    }

    entity_common!();

    pub fn native_value(&self) -> Option<u32> {
        self.coordinator.snapshot().snapshot.and_then(|s| s.lamp_hours)
    }
}

/// Active HDMI input, read back from the snapshot
pub struct InputSelect<P: Sdcp> {
    coordinator: Coordinator<P>,
    entry: Entry,
}

impl<P: Sdcp> InputSelect<P> {
    pub fn new(coordinator: Coordinator<P>, device_id: &str) -> Self {
        Self {
            coordinator,
            entry: Entry::new(device_id, "hdmi_input", "HDMI Input"),
        }
    }

    entity_common!();

    pub fn options(&self) -> Vec<&'static str> {
        HdmiInput::options()
    }

    pub fn current_option(&self) -> Option<&'static str> {
        self.coordinator
            .snapshot()
            .snapshot
            .and_then(|s| s.input)
            .map(|input| input.display_name())
    }

    pub async fn select_option(&self, option: &str) -> Result<()> {
        let input: HdmiInput = option.parse()?;
        self.coordinator.set_input(input).await?;
        refresh(&self.coordinator).await;
        Ok(())
    }
}

/// A write-only screen setting.
///
/// The projector's current value is not polled, so the select remembers the
/// last option it set successfully.
pub struct SettingSelect<P: Sdcp, C: Choice> {
    coordinator: Coordinator<P>,
    entry: Entry,
    to_setting: fn(C) -> Setting,
    current: Mutex<Option<C>>,
}

impl<P: Sdcp, C: Choice> SettingSelect<P, C> {
    pub fn new(
        coordinator: Coordinator<P>,
        device_id: &str,
        key: &str,
        name: &str,
        to_setting: fn(C) -> Setting,
    ) -> Self {
        Self {
            coordinator,
            entry: Entry::new(device_id, key, name),
            to_setting,
            current: Mutex::new(None),
        }
    }

    entity_common!();

    pub fn options(&self) -> Vec<&'static str> {
        C::options()
    }

    pub fn current_option(&self) -> Option<&'static str> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .map(|c| c.display_name())
    }

    pub async fn select_option(&self, option: &str) -> Result<()> {
        let choice = C::from_display_name(option)?;
        self.coordinator.set_screen((self.to_setting)(choice)).await?;
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(choice);
        Ok(())
    }
}

/// One remote control key
pub struct IrButton<P: Sdcp> {
    coordinator: Coordinator<P>,
    entry: Entry,
    key: IrCommand,
}

impl<P: Sdcp> IrButton<P> {
    pub fn new(coordinator: Coordinator<P>, device_id: &str, key: IrCommand) -> Self {
        Self {
            coordinator,
            entry: Entry::new(device_id, &key.key(), key.display_name()),
            key,
        }
    }

    entity_common!();

    pub fn icon(&self) -> &'static str {
        self.key.icon()
    }

    pub async fn press(&self) -> Result<()> {
        self.coordinator.press(self.key).await
    }
}

/// Every entity for one projector
pub struct Entities<P: Sdcp> {
    pub power: PowerSwitch<P>,
    pub muting: MutingSwitch<P>,
    pub lamp_hours: LampHoursSensor<P>,
    pub input: InputSelect<P>,
    pub aspect_ratio: SettingSelect<P, AspectRatio>,
    pub picture_position: SettingSelect<P, PicturePosition>,
    pub calibration_preset: SettingSelect<P, CalibrationPreset>,
    pub hdmi1_dynamic_range: SettingSelect<P, DynamicRange>,
    pub hdmi2_dynamic_range: SettingSelect<P, DynamicRange>,
    pub lamp_control: SettingSelect<P, LampControl>,
    pub advanced_iris: SettingSelect<P, AdvancedIris>,
    pub motionflow: SettingSelect<P, Motionflow>,
    pub hdr: SettingSelect<P, HdrMode>,
    pub two_d_three_d: SettingSelect<P, TwoDThreeD>,
    pub three_d_format: SettingSelect<P, ThreeDFormat>,
    pub menu_position: SettingSelect<P, MenuPosition>,
    pub buttons: Vec<IrButton<P>>,
}

impl<P: Sdcp> Entities<P> {
    pub fn new(coordinator: &Coordinator<P>, device_id: &str) -> Self {
        let c = || coordinator.clone();
        Self {
            power: PowerSwitch::new(c(), device_id),
            muting: MutingSwitch::new(c(), device_id),
            lamp_hours: LampHoursSensor::new(c(), device_id),
            input: InputSelect::new(c(), device_id),
            aspect_ratio: SettingSelect::new(
                c(),
                device_id,
                "aspect_ratio",
                "Aspect Ratio",
                Setting::AspectRatio,
            ),
            picture_position: SettingSelect::new(
                c(),
                device_id,
                "picture_position",
                "Picture Position",
                Setting::PicturePosition,
            ),
            calibration_preset: SettingSelect::new(
                c(),
                device_id,
                "calibration_preset",
                "Calibration Preset",
                Setting::CalibrationPreset,
            ),
            hdmi1_dynamic_range: SettingSelect::new(
                c(),
                device_id,
                "hdmi_1_dynamic_range",
                "HDMI 1 Dynamic Range",
                |range| Setting::DynamicRange(HdmiInput::Hdmi1, range),
            ),
            hdmi2_dynamic_range: SettingSelect::new(
                c(),
                device_id,
                "hdmi_2_dynamic_range",
                "HDMI 2 Dynamic Range",
                |range| Setting::DynamicRange(HdmiInput::Hdmi2, range),
            ),
            lamp_control: SettingSelect::new(
                c(),
                device_id,
                "lamp_control",
                "Lamp Control",
                Setting::LampControl,
            ),
            advanced_iris: SettingSelect::new(
                c(),
                device_id,
                "advanced_iris",
                "Advanced Iris",
                Setting::AdvancedIris,
            ),
            motionflow: SettingSelect::new(
                c(),
                device_id,
                "motionflow",
                "Motionflow",
                Setting::Motionflow,
            ),
            hdr: SettingSelect::new(c(), device_id, "hdr", "HDR", Setting::Hdr),
            two_d_three_d: SettingSelect::new(
                c(),
                device_id,
                "2d_3d_display",
                "2D/3D Display",
                Setting::TwoDThreeD,
            ),
            three_d_format: SettingSelect::new(
                c(),
                device_id,
                "3d_format",
                "3D Format",
                Setting::ThreeDFormat,
            ),
            menu_position: SettingSelect::new(
                c(),
                device_id,
                "menu_position",
                "Menu Position",
                Setting::MenuPosition,
            ),
            buttons: IrCommand::ALL
                .iter()
                .map(|key| IrButton::new(c(), device_id, *key))
                .collect(),
        }
    }
}
