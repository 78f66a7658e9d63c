use rand::Rng;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

const STANDBY: u16 = 0;
const POWER_ON: u16 = 3;

const HDMI1: u16 = 0x0002;
const HDMI2: u16 = 0x0003;

/// SDCP error codes the simulated projector answers with
enum Reject {
    InvalidItem,
    InvalidData,
    NotApplicable,
    DifferentCommunity,
}

impl Reject {
    fn code(&self) -> u16 {
        match self {
            Self::InvalidItem => 0x0101,
            Self::InvalidData => 0x0104,
            Self::NotApplicable => 0x0180,
            Self::DifferentCommunity => 0x0201,
        }
    }
}

/// How the simulated projector answers requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Answer every request
    Normal,
    /// Accept connections but never answer
    Silent,
    /// Answer with a truncated frame
    Truncated,
}

#[derive(Debug)]
pub struct DeviceState {
    pub power_status: u16,
    pub muting: bool,
    pub lamp_hours: u16,
    pub input: u16,
    /// Screen settings written, by item
    pub settings: HashMap<u16, u16>,
    /// IR codes received, in order
    pub pressed: Vec<u16>,
    /// Requests served, in order
    pub requests: Vec<(u8, u16)>,
    pub behavior: Behavior,
}

impl DeviceState {
    fn new(powered_on: bool) -> Self {
        Self {
            power_status: if powered_on { POWER_ON } else { STANDBY },
            muting: false,
            lamp_hours: rand::thread_rng().gen_range(100..20000),
            input: HDMI1,
            settings: HashMap::new(),
            pressed: Vec::new(),
            requests: Vec::new(),
            behavior: Behavior::Normal,
        }
    }

    fn is_on(&self) -> bool {
        self.power_status != STANDBY
    }

    fn handle(&mut self, action: u8, item: u16, data: Option<u16>) -> Result<Option<u16>, Reject> {
        self.requests.push((action, item));
        match (action, item, data) {
            // Power status
            (0x01, 0x0102, None) => Ok(Some(self.power_status)),
            // Power
            (0x00, 0x0130, Some(on)) => {
                self.power_status = if on == 1 { POWER_ON } else { STANDBY };
                Ok(None)
            }
            // Lamp timer
            (0x01, 0x0113, None) => Ok(Some(self.lamp_hours)),

            // Items below need the projector on
            _ if !self.is_on() => Err(Reject::NotApplicable),

            // Picture muting
            (0x01, 0x0030, None) => Ok(Some(self.muting as u16)),
            (0x00, 0x0030, Some(on)) => {
                self.muting = on == 1;
                Ok(None)
            }
            // Input
            (0x01, 0x0001, None) => Ok(Some(self.input)),
            (0x00, 0x0001, Some(input)) if input == HDMI1 || input == HDMI2 => {
                self.input = input;
                Ok(None)
            }
            (0x00, 0x0001, Some(_)) => Err(Reject::InvalidData),
            // IR keys
            (0x00, code, None) if code >= 0x1700 => {
                self.pressed.push(code);
                Ok(None)
            }
            // Screen settings
            (0x00, item, Some(value)) => {
                self.settings.insert(item, value);
                Ok(None)
            }
            (0x01, item, None) => self.settings.get(&item).map(|v| Some(*v)).ok_or(Reject::InvalidItem),
            _ => Err(Reject::InvalidItem),
        }
    }
}

/// A projector answering SDCP on a local port
#[derive(Clone)]
pub struct SimulatedDevice {
    pub addr: SocketAddr,
    pub state: Arc<Mutex<DeviceState>>,
}

impl SimulatedDevice {
    pub async fn start(powered_on: bool) -> Self {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let device = SimulatedDevice {
            addr: listener.local_addr().unwrap(),
            state: Arc::new(Mutex::new(DeviceState::new(powered_on))),
        };

        tokio::spawn({
            let state = device.state.clone();
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    tokio::spawn(serve(stream, state.clone()));
                }
            }
        });

        device
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        self.state.lock().unwrap().behavior = behavior;
    }
}

fn frame(success: bool, item: u16, data: Option<u16>) -> Vec<u8> {
    let mut buf = vec![0x02, 0x0A, b'S', b'O', b'N', b'Y', success as u8];
    buf.extend_from_slice(&item.to_be_bytes());
    match data {
        Some(data) => {
            buf.push(2);
            buf.extend_from_slice(&data.to_be_bytes());
        }
        None => buf.push(0),
    }
    buf
}

async fn serve(mut stream: TcpStream, state: Arc<Mutex<DeviceState>>) {
    let mut header = [0u8; 10];
    if stream.read_exact(&mut header).await.is_err() {
        return;
    }
    let data = if header[9] == 2 {
        let mut data = [0u8; 2];
        if stream.read_exact(&mut data).await.is_err() {
            return;
        }
        Some(u16::from_be_bytes(data))
    } else {
        None
    };

    let action = header[6];
    let item = u16::from_be_bytes([header[7], header[8]]);

    let (behavior, response) = {
        let mut state = state.lock().unwrap();
        let response = if &header[2..6] != b"SONY" {
            frame(false, item, Some(Reject::DifferentCommunity.code()))
        } else {
            match state.handle(action, item, data) {
                Ok(data) => frame(true, item, data),
                Err(reject) => frame(false, item, Some(reject.code())),
            }
        };
        (state.behavior, response)
    };

    match behavior {
        Behavior::Normal => {
            let _ = stream.write_all(&response).await;
        }
        Behavior::Truncated => {
            let _ = stream.write_all(&response[..7]).await;
        }
        Behavior::Silent => {
            // Hold the connection open without answering
            let mut rest = Vec::new();
            let _ = stream.read_to_end(&mut rest).await;
        }
    }
}
