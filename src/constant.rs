pub const SDCP_PORT: u16 = 53484;
pub const SDAP_PORT: u16 = 53862;

pub const PROTOCOL_VERSION: u8 = 2;
pub const PROTOCOL_CATEGORY: u8 = 0x0A;
pub const DEFAULT_COMMUNITY: &str = "SONY";

pub const DEFAULT_TIMEOUT: u64 = 5;
pub const DEFAULT_POLL_INTERVAL: u64 = 30;
pub const DEFAULT_SDAP_MAXTIME: u64 = 5;
