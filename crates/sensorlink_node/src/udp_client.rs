//! Cliente de telemetria sobre UDP.
//!
//! Cada operação envia um único frame do protocolo. Como UDP não tem sessão,
//! "pronto" significa socket criado e associado ao destino.

use sensorlink_core::client::{ClientError, TelemetryClient};
use sensorlink_core::config::{LinkConfig, LocationConfig};
use sensorlink_core::protocol::{Frame, encode_frame};
use sensorlink_core::types::{LocationReport, TelemetryPayload};
use std::net::UdpSocket;
use tracing::{debug, info, warn};

pub struct UdpTelemetryClient {
    link: LinkConfig,
    location: LocationConfig,
    sock: Option<UdpSocket>,
}

impl UdpTelemetryClient {
    pub fn new(link: LinkConfig, location: LocationConfig) -> Self {
        Self {
            link,
            location,
            sock: None,
        }
    }

    pub fn dest_addr(&self) -> String {
        format!("{}:{}", self.link.dest_ip, self.link.port)
    }

    fn send_frame(&self, frame: &Frame) -> Result<bool, ClientError> {
        let sock = self.sock.as_ref().ok_or(ClientError::NotStarted)?;
        let bytes = encode_frame(frame)?;
        let sent = sock.send(&bytes)?;
        debug!("→ {sent} bytes para {}", self.dest_addr());
        Ok(sent == bytes.len())
    }

    fn coarse_report(&self) -> Option<LocationReport> {
        self.location.cell.as_ref().map(|c| LocationReport::Cell {
            mcc: c.mcc,
            mnc: c.mnc,
            lac: c.lac,
            cell_id: c.cell_id,
        })
    }

    fn satellite_report(&self) -> Option<LocationReport> {
        self.location.fix.as_ref().map(|f| LocationReport::Satellite {
            latitude: f.latitude,
            longitude: f.longitude,
            altitude_m: f.altitude_m,
        })
    }
}

impl TelemetryClient for UdpTelemetryClient {
    fn start(&mut self) -> Result<(), ClientError> {
        let bind = if self.link.bind_ip.is_empty() {
            "0.0.0.0:0".to_string()
        } else {
            format!("{}:0", self.link.bind_ip)
        };
        let sock = UdpSocket::bind(bind)?;
        sock.connect(self.dest_addr())?;
        info!("Sessão UDP → {}", self.dest_addr());
        self.sock = Some(sock);
        Ok(())
    }

    fn is_ready(&mut self) -> bool {
        self.sock
            .as_ref()
            .is_some_and(|s| s.peer_addr().is_ok())
    }

    fn send_coarse_location(&mut self) -> Result<bool, ClientError> {
        let Some(report) = self.coarse_report() else {
            warn!("Célula não configurada, LBS indisponível");
            return Ok(false);
        };
        self.send_frame(&Frame::Location(report))
    }

    fn send_satellite_location(&mut self) -> Result<bool, ClientError> {
        let Some(report) = self.satellite_report() else {
            warn!("Posição não configurada, GNSS indisponível");
            return Ok(false);
        };
        self.send_frame(&Frame::Location(report))
    }

    fn send_telemetry(
        &mut self,
        profile_id: u8,
        payload: &TelemetryPayload,
    ) -> Result<bool, ClientError> {
        self.send_frame(&Frame::Telemetry {
            profile_id,
            payload: payload.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensorlink_core::config::FixConfig;
    use sensorlink_core::protocol::decode_frame;
    use sensorlink_core::types::metric_id;
    use std::time::Duration;

    fn server() -> (UdpSocket, LinkConfig) {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        server
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let link = LinkConfig {
            dest_ip: "127.0.0.1".into(),
            port: server.local_addr().unwrap().port(),
            bind_ip: "127.0.0.1".into(),
        };
        (server, link)
    }

    fn recv(server: &UdpSocket) -> Frame {
        let mut buf = [0u8; 2048];
        let (size, _) = server.recv_from(&mut buf).unwrap();
        decode_frame(&buf[..size]).unwrap()
    }

    #[test]
    fn not_ready_before_start() {
        let (_server, link) = server();
        let mut client = UdpTelemetryClient::new(link, LocationConfig::default());
        assert!(!client.is_ready());
        assert!(matches!(
            client.send_telemetry(1, &TelemetryPayload::new()),
            Err(ClientError::NotStarted)
        ));
    }

    #[test]
    fn telemetry_reaches_server() {
        let (server, link) = server();
        let mut client = UdpTelemetryClient::new(link, LocationConfig::default());
        client.start().unwrap();
        assert!(client.is_ready());

        let mut payload = TelemetryPayload::new();
        payload.insert_opt(metric_id::TEMP1, Some(22.5));
        assert!(client.send_telemetry(1, &payload).unwrap());

        assert_eq!(
            recv(&server),
            Frame::Telemetry {
                profile_id: 1,
                payload
            }
        );
    }

    #[test]
    fn unconfigured_location_is_rejected() {
        let (_server, link) = server();
        let mut client = UdpTelemetryClient::new(link, LocationConfig::default());
        client.start().unwrap();
        assert!(!client.send_coarse_location().unwrap());
        assert!(!client.send_satellite_location().unwrap());
    }

    #[test]
    fn configured_fix_is_sent() {
        let (server, link) = server();
        let location = LocationConfig {
            cell: None,
            fix: Some(FixConfig {
                latitude: 38.72,
                longitude: -9.14,
                altitude_m: 12.0,
            }),
        };
        let mut client = UdpTelemetryClient::new(link, location);
        client.start().unwrap();
        assert!(client.send_satellite_location().unwrap());
        assert!(matches!(
            recv(&server),
            Frame::Location(LocationReport::Satellite { .. })
        ));
    }
}
