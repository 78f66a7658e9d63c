use crate::error::{ClientError, Error, Result};

use serde::{Serialize, Serializer};

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// An enumerated projector setting with a fixed set of options.
///
/// Every option has a display name, shown to users, and the SDCP data word the
/// projector understands. Both mappings are total over the enum.
pub trait Choice: Copy + PartialEq + fmt::Debug + 'static {
    /// Name of the setting, used in diagnostics
    const NAME: &'static str;
    /// Every option, in display order
    const ALL: &'static [Self];

    /// Name shown to users
    fn display_name(&self) -> &'static str;

    /// SDCP data word for this option
    fn value(&self) -> u16;

    /// Option with the given SDCP data word, if any
    fn from_value(value: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.value() == value)
    }

    /// Option with the given display name
    fn from_display_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.display_name() == name)
            .ok_or_else(|| Error::unknown_option(format!("{}: {}", Self::NAME, name)))
    }

    /// Display names of every option
    fn options() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.display_name()).collect()
    }
}

macro_rules! choice {
    (
        $(#[$meta:meta])*
        $name:ident, $label:expr, {
            $($variant:ident => ($display:expr, $value:expr)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Choice for $name {
            const NAME: &'static str = $label;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn display_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $display),+
                }
            }

            fn value(&self) -> u16 {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_display_name(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.display_name())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.display_name())
            }
        }
    };
}

choice!(
    /// HDMI input terminal
    HdmiInput, "HDMI Input", {
        Hdmi1 => ("HDMI 1", 0x0002),
        Hdmi2 => ("HDMI 2", 0x0003),
    }
);

choice!(
    AspectRatio, "Aspect Ratio", {
        Normal => ("Normal", 0x0001),
        VStretch => ("V Stretch", 0x000B),
        Zoom185 => ("Zoom 1.85", 0x000C),
        Zoom235 => ("Zoom 2.35", 0x000D),
        Stretch => ("Stretch", 0x000E),
        Squeeze => ("Squeeze", 0x000F),
    }
);

choice!(
    PicturePosition, "Picture Position", {
        Ratio185 => ("1.85", 0x0000),
        Ratio235 => ("2.35", 0x0001),
        Custom1 => ("Custom 1", 0x0002),
        Custom2 => ("Custom 2", 0x0003),
        Custom3 => ("Custom 3", 0x0004),
        Custom4 => ("Custom 4", 0x0005),
        Custom5 => ("Custom 5", 0x0006),
    }
);

choice!(
    /// Picture mode preset
    CalibrationPreset, "Calibration Preset", {
        CinemaFilm1 => ("Cinema Film 1", 0x0000),
        CinemaFilm2 => ("Cinema Film 2", 0x0001),
        Reference => ("Reference", 0x0002),
        Tv => ("TV", 0x0003),
        Photo => ("Photo", 0x0004),
        Game => ("Game", 0x0005),
        BrightCinema => ("Bright Cinema", 0x0006),
        BrightTv => ("Bright TV", 0x0007),
        User => ("User", 0x0008),
    }
);

choice!(
    /// HDMI signal range, set per input
    DynamicRange, "Dynamic Range", {
        Auto => ("Auto", 0x0000),
        Limited => ("Limited", 0x0001),
        Full => ("Full", 0x0002),
    }
);

choice!(
    LampControl, "Lamp Control", {
        Low => ("Low", 0x0000),
        High => ("High", 0x0001),
    }
);

choice!(
    AdvancedIris, "Advanced Iris", {
        Off => ("Off", 0x0000),
        Full => ("Full", 0x0002),
        Limited => ("Limited", 0x0003),
    }
);

choice!(
    /// Motion interpolation mode
    Motionflow, "Motionflow", {
        Off => ("Off", 0x0000),
        SmoothHigh => ("Smooth High", 0x0001),
        SmoothLow => ("Smooth Low", 0x0002),
        Impulse => ("Impulse", 0x0003),
        Combination => ("Combination", 0x0004),
        TrueCinema => ("True Cinema", 0x0005),
    }
);

choice!(
    HdrMode, "HDR", {
        Off => ("Off", 0x0000),
        On => ("On", 0x0001),
        Auto => ("Auto", 0x0002),
    }
);

choice!(
    TwoDThreeD, "2D/3D Display", {
        Auto => ("Auto", 0x0000),
        ThreeD => ("3D", 0x0001),
        TwoD => ("2D", 0x0002),
    }
);

choice!(
    ThreeDFormat, "3D Format", {
        Simulated3D => ("Simulated 3D", 0x0000),
        SideBySide => ("Side by Side", 0x0001),
        OverUnder => ("Over Under", 0x0002),
    }
);

choice!(
    MenuPosition, "Menu Position", {
        BottomLeft => ("Bottom Left", 0x0000),
        Center => ("Center", 0x0001),
    }
);

/// Screen and picture settings written with
/// [`Sdcp::set_screen()`](super::Sdcp::set_screen)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    AspectRatio(AspectRatio),
    PicturePosition(PicturePosition),
    CalibrationPreset(CalibrationPreset),
    /// Dynamic range of one HDMI input
    DynamicRange(HdmiInput, DynamicRange),
    LampControl(LampControl),
    AdvancedIris(AdvancedIris),
    Motionflow(Motionflow),
    Hdr(HdrMode),
    TwoDThreeD(TwoDThreeD),
    ThreeDFormat(ThreeDFormat),
    MenuPosition(MenuPosition),
}

impl Setting {
    /// SDCP item code the setting is written to
    pub fn item(&self) -> u16 {
        match self {
            Self::CalibrationPreset(_) => 0x0002,
            Self::LampControl(_) => 0x001A,
            Self::AdvancedIris(_) => 0x001D,
            Self::AspectRatio(_) => 0x0020,
            Self::Motionflow(_) => 0x0059,
            Self::TwoDThreeD(_) => 0x0060,
            Self::ThreeDFormat(_) => 0x0061,
            Self::PicturePosition(_) => 0x0066,
            Self::DynamicRange(HdmiInput::Hdmi1, _) => 0x006E,
            Self::DynamicRange(HdmiInput::Hdmi2, _) => 0x006F,
            Self::Hdr(_) => 0x007C,
            Self::MenuPosition(_) => 0x00A0,
        }
    }

    /// SDCP data word of the chosen option
    pub fn data(&self) -> u16 {
        match self {
            Self::AspectRatio(c) => c.value(),
            Self::PicturePosition(c) => c.value(),
            Self::CalibrationPreset(c) => c.value(),
            Self::DynamicRange(_, c) => c.value(),
            Self::LampControl(c) => c.value(),
            Self::AdvancedIris(c) => c.value(),
            Self::Motionflow(c) => c.value(),
            Self::Hdr(c) => c.value(),
            Self::TwoDThreeD(c) => c.value(),
            Self::ThreeDFormat(c) => c.value(),
            Self::MenuPosition(c) => c.value(),
        }
    }
}

fn validate<C: Choice>() -> Result<()> {
    let mut names = HashSet::new();
    let mut values = HashSet::new();

    for choice in C::ALL {
        let duplicate = |entry: String| ClientError::DuplicateConstant {
            setting: C::NAME,
            entry,
        };

        if !names.insert(choice.display_name()) {
            return Err(duplicate(choice.display_name().to_string()).into());
        }
        if !values.insert(choice.value()) {
            return Err(duplicate(format!("{:#06x}", choice.value())).into());
        }
        if C::from_value(choice.value()) != Some(*choice)
            || C::from_display_name(choice.display_name())? != *choice
        {
            return Err(duplicate(choice.display_name().to_string()).into());
        }
    }
    Ok(())
}

/// Check that every setting table maps its options to distinct display names and
/// distinct protocol values.
pub fn validate_tables() -> Result<()> {
    validate::<HdmiInput>()?;
    validate::<AspectRatio>()?;
    validate::<PicturePosition>()?;
    validate::<CalibrationPreset>()?;
    validate::<DynamicRange>()?;
    validate::<LampControl>()?;
    validate::<AdvancedIris>()?;
    validate::<Motionflow>()?;
    validate::<HdrMode>()?;
    validate::<TwoDThreeD>()?;
    validate::<ThreeDFormat>()?;
    validate::<MenuPosition>()?;
    log::trace!("Setting tables validated");
    Ok(())
}
