use crate::error::{Error, Result};

use tokio::{
    net::UdpSocket,
    time::{timeout_at, Duration, Instant},
};

use std::net::{IpAddr, SocketAddr};
use std::str;

const ADVERTISEMENT_LEN: usize = 50;

/// A projector heard advertising itself over SDAP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredProjector {
    pub ip: IpAddr,
    pub product_name: String,
    pub serial_number: u32,
    pub power_status: u16,
    pub location: String,
    pub community: String,
}

fn text(field: &[u8]) -> Result<String> {
    let end = field.iter().position(|b| *b == 0).unwrap_or(field.len());
    str::from_utf8(&field[..end])
        .map(|s| s.trim().to_string())
        .map_err(|e| Error::malformed_response(format!("advertisement text: {}", e)))
}

/// Parse one SDAP advertisement datagram
pub(crate) fn parse_advertisement(buf: &[u8], ip: IpAddr) -> Result<DiscoveredProjector> {
    if buf.len() < ADVERTISEMENT_LEN {
        return Err(Error::malformed_response(format!(
            "advertisement is {} bytes, expected {}",
            buf.len(),
            ADVERTISEMENT_LEN
        )));
    }
    if &buf[0..2] != b"DA" {
        return Err(Error::malformed_response("not an SDAP advertisement".into()));
    }

    Ok(DiscoveredProjector {
        ip,
        community: text(&buf[4..8])?,
        product_name: text(&buf[8..20])?,
        serial_number: u32::from_be_bytes([buf[20], buf[21], buf[22], buf[23]]),
        power_status: u16::from_be_bytes([buf[24], buf[25]]),
        location: text(&buf[26..50])?,
    })
}

// Returns every distinct projector heard on `port` within `maxtime`
pub(super) async fn sdap(port: u16, maxtime: Duration) -> Result<Vec<DiscoveredProjector>> {
    let socket = UdpSocket::bind(SocketAddr::from(([0, 0, 0, 0], port))).await?;
    listen(socket, maxtime).await
}

pub(crate) async fn listen(socket: UdpSocket, maxtime: Duration) -> Result<Vec<DiscoveredProjector>> {
    let deadline = Instant::now() + maxtime;
    let mut rbuf = [0; 1024];

    let mut projectors: Vec<DiscoveredProjector> = Vec::new();
    while let Ok(Ok((len, addr))) = timeout_at(deadline, socket.recv_from(&mut rbuf)).await {
        match parse_advertisement(&rbuf[..len], addr.ip()) {
            Ok(projector) => {
                if !projectors.iter().any(|p| p.ip == projector.ip) {
                    log::debug!(
                        "Discovered {} at {}",
                        projector.product_name,
                        projector.ip
                    );
                    projectors.push(projector);
                }
            }
            Err(e) => log::debug!("Skipping datagram from {}: {}", addr, e),
        }
    }

    Ok(projectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::constant::DEFAULT_SDAP_MAXTIME;
    use tokio::sync::oneshot;

    fn advertisement(product: &str, serial: u32, power: u16) -> Vec<u8> {
        let mut buf = b"DA".to_vec();
        buf.push(2);
        buf.push(0x0A);
        buf.extend_from_slice(b"SONY");
        let mut name = [0u8; 12];
        name[..product.len()].copy_from_slice(product.as_bytes());
        buf.extend_from_slice(&name);
        buf.extend_from_slice(&serial.to_be_bytes());
        buf.extend_from_slice(&power.to_be_bytes());
        let mut location = [0u8; 24];
        location[..7].copy_from_slice(b"Theater");
        buf.extend_from_slice(&location);
        buf
    }

    #[test]
    fn parse() {
        let ip: IpAddr = [192, 168, 0, 20].into();
        let projector = parse_advertisement(&advertisement("VPL-VW295ES", 1234567, 3), ip).unwrap();
        assert_eq!(projector.product_name, "VPL-VW295ES");
        assert_eq!(projector.serial_number, 1234567);
        assert_eq!(projector.power_status, 3);
        assert_eq!(projector.location, "Theater");
        assert_eq!(projector.community, "SONY");
    }

    #[test]
    fn parse_rejects_garbage() {
        let ip: IpAddr = [192, 168, 0, 20].into();
        assert!(parse_advertisement(b"DA", ip).is_err());
        let mut bad = advertisement("VPL", 1, 0);
        bad[0] = b'X';
        assert!(parse_advertisement(&bad, ip).is_err());
    }

    // Emulate projectors advertising to the listener
    async fn emulate_projectors(address_rx: oneshot::Receiver<SocketAddr>, count: usize) {
        let target = address_rx.await.unwrap();
        let mut sockets = Vec::new();
        for _ in 0..count {
            sockets.push(UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await.unwrap());
        }
        // Noise
        sockets[0].send_to(b"hello", target).await.unwrap();

        // Two rounds of advertisements; the listener keeps one entry per sender
        for _ in 0..2 {
            for (i, socket) in sockets.iter().enumerate() {
                socket
                    .send_to(&advertisement(&format!("VPL-{}", i), i as u32, 0), target)
                    .await
                    .unwrap();
            }
        }
    }

    #[tokio::test]
    async fn sdap_listen() {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await.unwrap();
        let (address_tx, address_rx) = oneshot::channel::<SocketAddr>();
        address_tx.send(socket.local_addr().unwrap()).unwrap();
        tokio::spawn(emulate_projectors(address_rx, 1));

        let projectors = listen(socket, Duration::from_millis(500)).await.unwrap();
        assert_eq!(projectors.len(), 1);
        assert_eq!(projectors[0].product_name, "VPL-0");
    }

    #[tokio::test]
    async fn sdap_stops_at_timeout() {
        let started = Instant::now();
        let projectors = sdap(0, Duration::from_millis(150)).await.unwrap();
        assert!(projectors.is_empty());
        assert!(started.elapsed() >= Duration::from_millis(150));
        assert!(started.elapsed() < Duration::from_secs(DEFAULT_SDAP_MAXTIME));
    }

    #[tokio::test]
    async fn sdap_no_projector() {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await.unwrap();
        let projectors = listen(socket, Duration::from_millis(100)).await.unwrap();
        assert!(projectors.is_empty());
    }
}
