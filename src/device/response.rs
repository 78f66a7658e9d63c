use super::command::HEADER_LEN;
use crate::error::{ApiError, Error, Result};

/// A parsed SDCP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Response {
    pub item: u16,
    pub data: Option<u16>,
}

impl Response {
    /// Number of bytes the full frame occupies, given its header
    pub fn frame_len(header: &[u8]) -> Result<usize> {
        if header.len() < HEADER_LEN {
            return Err(Error::malformed_response(format!(
                "header is {} bytes, expected {}",
                header.len(),
                HEADER_LEN
            )));
        }
        Ok(HEADER_LEN + header[9] as usize)
    }

    pub fn data(&self) -> Result<u16> {
        self.data
            .ok_or_else(|| Error::malformed_response(format!("item {:#06x} returned no data", self.item)))
    }
}

/// Parse a complete response frame. A failed response becomes an [`ApiError`].
pub(crate) fn process(frame: &[u8]) -> Result<Response> {
    let len = Response::frame_len(frame)?;
    if frame.len() < len {
        return Err(Error::malformed_response(format!(
            "frame is {} bytes, header declares {}",
            frame.len(),
            len
        )));
    }

    let success = frame[6] != 0;
    let item = u16::from_be_bytes([frame[7], frame[8]]);
    let data = match &frame[HEADER_LEN..len] {
        [] => None,
        [b] => Some(*b as u16),
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
    };

    if !success {
        let code = data.unwrap_or_default();
        log::debug!("Item {:#06x} failed with code {:#06x}", item, code);
        return Err(ApiError::from_code(code).into());
    }

    Ok(Response { item, data })
}
