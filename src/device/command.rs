use crate::constant::{PROTOCOL_CATEGORY, PROTOCOL_VERSION};

/// Request type of an SDCP command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Write a value
    Set,
    /// Read a value
    Get,
}

impl Action {
    pub(crate) fn code(&self) -> u8 {
        match self {
            Self::Set => 0x00,
            Self::Get => 0x01,
        }
    }
}

/// Item codes the client reads and writes directly
pub(crate) mod item {
    pub const INPUT: u16 = 0x0001;
    pub const PICTURE_MUTING: u16 = 0x0030;
    pub const STATUS_POWER: u16 = 0x0102;
    pub const STATUS_LAMP_TIMER: u16 = 0x0113;
    pub const SET_POWER: u16 = 0x0130;
}

/// Power status values returned by [`item::STATUS_POWER`]
pub(crate) mod power_status {
    pub const STANDBY: u16 = 0;
    pub const COOLING: u16 = 4;
    pub const COOLING2: u16 = 5;
}

pub(crate) const HEADER_LEN: usize = 10;

/// A single SDCP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Command {
    pub action: Action,
    pub item: u16,
    pub data: Option<u16>,
}

impl Command {
    pub fn get(item: u16) -> Self {
        Self {
            action: Action::Get,
            item,
            data: None,
        }
    }

    pub fn set(item: u16, data: u16) -> Self {
        Self {
            action: Action::Set,
            item,
            data: Some(data),
        }
    }

    /// Serialize the request. `community` is truncated or NUL padded to four bytes.
    pub fn encode(&self, community: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + 2);
        buf.push(PROTOCOL_VERSION);
        buf.push(PROTOCOL_CATEGORY);

        let mut community_bytes = [0u8; 4];
        for (dst, src) in community_bytes.iter_mut().zip(community.bytes()) {
            *dst = src;
        }
        buf.extend_from_slice(&community_bytes);

        buf.push(self.action.code());
        buf.extend_from_slice(&self.item.to_be_bytes());

        match self.data {
            Some(data) => {
                // Data is always two bytes
                buf.push(2);
                buf.extend_from_slice(&data.to_be_bytes());
            }
            None => buf.push(0),
        }
        buf
    }
}
