//! Contrato do cliente de telemetria (sessão com o servidor).

use crate::protocol::ProtocolError;
use crate::types::TelemetryPayload;

/// Erros inesperados do cliente.
///
/// Uma rejeição normal do servidor é `Ok(false)`, não um erro.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Sessão não iniciada")]
    NotStarted,

    #[error("Erro de I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro de protocolo: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Cliente de telemetria. Todas as operações são síncronas.
pub trait TelemetryClient: Send {
    /// Inicia a sessão. Sem retentativas.
    fn start(&mut self) -> Result<(), ClientError>;

    /// Indica se o transporte está pronto para envio.
    fn is_ready(&mut self) -> bool;

    /// Envia a posição aproximada (célula).
    fn send_coarse_location(&mut self) -> Result<bool, ClientError>;

    /// Envia a posição via satélite.
    fn send_satellite_location(&mut self) -> Result<bool, ClientError>;

    /// Envia o payload de telemetria sob o perfil `profile_id`.
    fn send_telemetry(
        &mut self,
        profile_id: u8,
        payload: &TelemetryPayload,
    ) -> Result<bool, ClientError>;
}

pub type TelemetryClientPointer = Box<dyn TelemetryClient>;
