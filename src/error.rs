use std::fmt::Display;

/// Result for API calls from [`Projector`](super::Projector) and
/// [`Coordinator`](super::Coordinator)
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Errors reported by the projector
    Api(ApiError),
    /// Errors from this library
    Client(ClientError),
    /// Error from std::io
    IO(std::io::Error),
    /// Error processing json
    Json(serde_json::Error),
}

impl Error {
    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api(_))
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Error::Client(_))
    }

    pub fn is_serde(&self) -> bool {
        matches!(self, Error::Json(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Error::IO(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Client(ClientError::Timeout))
    }

    pub fn cannot_connect(host: String) -> Error {
        ClientError::CannotConnect(host).into()
    }

    pub fn update_failed(reason: String) -> Error {
        ClientError::UpdateFailed(reason).into()
    }

    pub fn malformed_response(reason: String) -> Error {
        ClientError::MalformedResponse(reason).into()
    }

    pub fn unexpected_value(item: u16, value: Option<u16>) -> Error {
        ClientError::UnexpectedValue { item, value }.into()
    }

    pub fn unknown_option(option: String) -> Error {
        ClientError::UnknownOption(option).into()
    }

    pub fn invalid_config(reason: String) -> Error {
        ClientError::InvalidConfig(reason).into()
    }
}

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Self {
        Error::Api(e)
    }
}

impl From<ClientError> for Error {
    fn from(e: ClientError) -> Self {
        Error::Client(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Json(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::IO(e)
    }
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(_: tokio::time::error::Elapsed) -> Error {
        Error::Client(ClientError::Timeout)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Api(e) => write!(f, "{}", e),
            Self::Client(e) => write!(f, "{}", e),
            Self::IO(e) => write!(f, "{}", e),
            Self::Json(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

/// Error codes carried in a failed SDCP response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// Item is not supported by this model
    InvalidItem,
    /// Request is not supported for this item
    InvalidItemRequest,
    /// Data length does not match the item
    InvalidLength,
    /// Data is outside the item's range
    InvalidData,
    /// Data is too short
    ShortData,
    /// Item cannot be used in the current state, e.g. while in standby
    NotApplicableItem,
    /// Community does not match the projector's
    DifferentCommunity,
    /// Unsupported protocol version
    InvalidVersion,
    /// Unsupported category
    InvalidCategory,
    /// Unsupported request
    InvalidRequest,
    /// Header is too short
    ShortHeader,
    /// Community is too short
    ShortCommunity,
    /// Command is too short
    ShortCommand,
    /// Projector timed out internally
    Timeout,
    /// Internal communication checksum error
    Checksum,
    /// Internal communication framing error
    Framing,
    /// Internal communication parity error
    Parity,
    /// Internal communication overrun error
    Overrun,
    /// Other internal communication error
    Communication,
    /// Projector could not interpret its own response
    UnknownResponse,
    /// NV memory read error
    NvRead,
    /// NV memory write error
    NvWrite,
    #[doc(hidden)]
    Unknown(u16),
}

impl ApiError {
    /// Map an SDCP error code to an [`ApiError`]
    pub fn from_code(code: u16) -> ApiError {
        match code {
            0x0101 => Self::InvalidItem,
            0x0102 => Self::InvalidItemRequest,
            0x0103 => Self::InvalidLength,
            0x0104 => Self::InvalidData,
            0x0111 => Self::ShortData,
            0x0180 => Self::NotApplicableItem,
            0x0201 => Self::DifferentCommunity,
            0x1001 => Self::InvalidVersion,
            0x1002 => Self::InvalidCategory,
            0x1003 => Self::InvalidRequest,
            0x1011 => Self::ShortHeader,
            0x1012 => Self::ShortCommunity,
            0x1013 => Self::ShortCommand,
            0x2001 => Self::Timeout,
            0xF001 => Self::Timeout,
            0xF010 => Self::Checksum,
            0xF020 => Self::Framing,
            0xF030 => Self::Parity,
            0xF040 => Self::Overrun,
            0xF050 => Self::Communication,
            0xF0F0 => Self::UnknownResponse,
            0xF110 => Self::NvRead,
            0xF120 => Self::NvWrite,
            other => Self::Unknown(other),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InvalidItem => write!(f, "Invalid item"),
            Self::InvalidItemRequest => write!(f, "Invalid item request"),
            Self::InvalidLength => write!(f, "Invalid length"),
            Self::InvalidData => write!(f, "Invalid data"),
            Self::ShortData => write!(f, "Short data"),
            Self::NotApplicableItem => write!(f, "Item not applicable in current state"),
            Self::DifferentCommunity => write!(f, "Community does not match"),
            Self::InvalidVersion => write!(f, "Invalid protocol version"),
            Self::InvalidCategory => write!(f, "Invalid category"),
            Self::InvalidRequest => write!(f, "Invalid request"),
            Self::ShortHeader => write!(f, "Short header"),
            Self::ShortCommunity => write!(f, "Short community"),
            Self::ShortCommand => write!(f, "Short command"),
            Self::Timeout => write!(f, "Projector timed out"),
            Self::Checksum => write!(f, "Checksum error"),
            Self::Framing => write!(f, "Framing error"),
            Self::Parity => write!(f, "Parity error"),
            Self::Overrun => write!(f, "Overrun error"),
            Self::Communication => write!(f, "Communication error"),
            Self::UnknownResponse => write!(f, "Unknown response"),
            Self::NvRead => write!(f, "NV memory read error"),
            Self::NvWrite => write!(f, "NV memory write error"),
            Self::Unknown(code) => write!(f, "Unknown error: '{:#06x}'", code),
        }
    }
}

#[derive(Debug)]
pub enum ClientError {
    /// Projector could not be reached during setup
    CannotConnect(String),
    /// Power could not be read during a poll cycle
    UpdateFailed(String),
    /// No response within the projector's timeout
    Timeout,
    /// Response could not be parsed
    MalformedResponse(String),
    /// Projector answered with a value outside the known constant set
    UnexpectedValue { item: u16, value: Option<u16> },
    /// Display name does not belong to the setting
    UnknownOption(String),
    /// Configuration is incomplete or out of range
    InvalidConfig(String),
    /// A setting table maps two entries to the same name or value
    DuplicateConstant { setting: &'static str, entry: String },
}

impl Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Self::CannotConnect(host) => {
                write!(f, "Could not connect to projector at '{}'", host)
            }

            Self::UpdateFailed(reason) => {
                write!(f, "Error communicating with projector: {}", reason)
            }

            Self::Timeout => write!(f, "Projector did not respond in time"),

            Self::MalformedResponse(reason) => write!(f, "Malformed response: {}", reason),

            Self::UnexpectedValue { item, value } => write!(
                f,
                "Unexpected value [{:?}] for item {:#06x}",
                value, item
            ),

            Self::UnknownOption(option) => write!(f, "Unknown option: '{}'", option),

            Self::InvalidConfig(reason) => write!(f, "Invalid configuration: {}", reason),

            Self::DuplicateConstant { setting, entry } => write!(
                f,
                "Setting '{}' has a duplicate entry: '{}'",
                setting, entry
            ),
        }
    }
}
