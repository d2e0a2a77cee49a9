//! Protocolo de comunicação binário com o servidor de telemetria.
//!
//! Formato do frame:
//!
//! ```text
//! ┌──────────┬─────────┬──────────────┐
//! │ Magic(1) │ Ver.(1) │ Frame (N)    │
//! └──────────┴─────────┴──────────────┘
//! ```
//!
//! - Magic byte `0x53` ('S') identifica pacote Sensorlink
//! - Versão do protocolo (1 byte)
//! - [`Frame`] serializado com bincode

use crate::types::{LocationReport, TelemetryPayload};
use serde::{Deserialize, Serialize};

/// Magic byte que identifica pacotes do protocolo.
pub const MAGIC_BYTE: u8 = 0x53; // 'S'

/// Versão atual do protocolo.
pub const PROTOCOL_VERSION: u8 = 1;

/// Tamanho do header (magic + version).
const HEADER_SIZE: usize = 2;

/// Tamanho máximo de pacote UDP seguro (sem fragmentação).
pub const MAX_UDP_PAYLOAD: usize = 65507;

/// Mensagens enviadas ao servidor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Frame {
    Telemetry {
        profile_id: u8,
        payload: TelemetryPayload,
    },
    Location(LocationReport),
}

/// Erros do protocolo.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Pacote muito curto ({0} bytes, mínimo {HEADER_SIZE})")]
    TooShort(usize),

    #[error("Pacote muito grande ({0} bytes, máximo {MAX_UDP_PAYLOAD})")]
    TooLarge(usize),

    #[error("Magic byte inválido: 0x{0:02X} (esperado 0x{MAGIC_BYTE:02X})")]
    InvalidMagic(u8),

    #[error("Versão incompatível: {0} (suportada: {PROTOCOL_VERSION})")]
    VersionMismatch(u8),

    #[error("Erro de serialização: {0}")]
    Serialize(String),

    #[error("Erro de deserialização: {0}")]
    Deserialize(String),
}

/// Codifica um [`Frame`] para transmissão UDP.
///
/// Retorna bytes no formato: `[MAGIC][VERSION][bincode_frame...]`
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, ProtocolError> {
    let body = bincode::serialize(frame).map_err(|e| ProtocolError::Serialize(e.to_string()))?;

    let total = HEADER_SIZE + body.len();
    if total > MAX_UDP_PAYLOAD {
        return Err(ProtocolError::TooLarge(total));
    }

    let mut bytes = Vec::with_capacity(total);
    bytes.push(MAGIC_BYTE);
    bytes.push(PROTOCOL_VERSION);
    bytes.extend_from_slice(&body);

    Ok(bytes)
}

/// Decodifica bytes recebidos em [`Frame`].
///
/// Valida magic byte e versão antes de deserializar.
pub fn decode_frame(data: &[u8]) -> Result<Frame, ProtocolError> {
    if data.len() < HEADER_SIZE {
        return Err(ProtocolError::TooShort(data.len()));
    }

    let magic = data[0];
    if magic != MAGIC_BYTE {
        return Err(ProtocolError::InvalidMagic(magic));
    }

    let version = data[1];
    if version != PROTOCOL_VERSION {
        return Err(ProtocolError::VersionMismatch(version));
    }

    bincode::deserialize(&data[HEADER_SIZE..])
        .map_err(|e| ProtocolError::Deserialize(e.to_string()))
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
