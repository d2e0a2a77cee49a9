//! Thread de upload – handshake com o servidor e envio periódico.
//!
//! Estados: `Connecting → Handshaking → ActiveReporting`. Se o servidor não
//! ficar pronto durante o handshake a thread termina em `Aborted`; a thread
//! de amostragem continua normalmente.
//!
//! Em `ActiveReporting` nenhuma falha é fatal: cada tick loga o resultado e
//! o próximo tick substitui o anterior.
//!
//! O lock do conjunto é mantido só durante a cópia; envio e localizações
//! rodam depois de liberá-lo, para não bloquear a amostragem.

use crate::cadence::{Cadence, TELEMETRY_PROFILE_ID, TICK};
use crate::client::{ClientError, TelemetryClientPointer};
use crate::retry::{RetryPolicy, retry};
use crate::shared::SharedReadingSetPointer;
use crate::shutdown::Shutdown;
use crate::time::ClockPointer;
use crate::types::{Reading, TelemetryPayload, metric_id};
use std::fmt;
use std::thread::JoinHandle;
use tracing::{debug, error, info, warn};

/// Estado da thread de upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Connecting,
    Handshaking,
    ActiveReporting,
    Aborted,
}

/// Erros fatais para a thread de upload (apenas na inicialização).
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Falha ao iniciar sessão: {0}")]
    Start(#[from] ClientError),

    #[error("Servidor não ficou pronto após {attempts} tentativas")]
    HandshakeExhausted { attempts: u32 },
}

/// Tipo de relatório de localização.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    /// Célula da rede móvel (LBS)
    Coarse,
    /// GNSS
    Satellite,
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationKind::Coarse => f.write_str("LBS"),
            LocationKind::Satellite => f.write_str("GNSS"),
        }
    }
}

/// Resultado de um tick em regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Cliente não pronto; o conjunto de leituras nem foi lido.
    NotReady,
    /// Payload entregue ao cliente; `accepted` é a resposta do servidor.
    Sent { accepted: bool, entries: usize },
    /// Erro inesperado no envio.
    Failed,
}

/// Monta o payload do tick a partir da cópia do conjunto.
///
/// O payload é sempre criado do zero, mesmo quando as cores não entram.
pub fn build_payload(reading: &Reading, cadence: Cadence) -> TelemetryPayload {
    let mut payload = TelemetryPayload::new();

    if cadence.color {
        payload.insert_color(reading.rgb888);
    }

    if cadence.metrics {
        payload.insert_opt(metric_id::TEMP1, reading.temp1);
        payload.insert_opt(metric_id::HUMIDITY, reading.humidity);
        payload.insert_opt(metric_id::TEMP2, reading.temp2);
        payload.insert_opt(metric_id::PRESSURE, reading.pressure);
    }

    payload
}

pub struct UploadScheduler {
    shared: SharedReadingSetPointer,
    client: TelemetryClientPointer,
    clock: ClockPointer,
    state: SchedulerState,
}

impl UploadScheduler {
    pub fn new(
        shared: SharedReadingSetPointer,
        client: TelemetryClientPointer,
        clock: ClockPointer,
    ) -> Self {
        Self {
            shared,
            client,
            clock,
            state: SchedulerState::Connecting,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Inicia a sessão, aguarda o servidor e envia as localizações iniciais.
    pub fn bootstrap(&mut self) -> Result<(), UploadError> {
        self.state = SchedulerState::Connecting;
        if let Err(e) = self.client.start() {
            self.state = SchedulerState::Aborted;
            error!("Não foi possível iniciar a sessão com o servidor: {e}");
            return Err(e.into());
        }

        self.state = SchedulerState::Handshaking;
        let policy = RetryPolicy::HANDSHAKE;
        let ready = retry(&policy, self.clock.as_ref(), || self.client.is_ready());
        if !ready {
            self.state = SchedulerState::Aborted;
            error!(
                "Servidor inacessível após {} tentativas, encerrando upload!",
                policy.max_attempts
            );
            return Err(UploadError::HandshakeExhausted {
                attempts: policy.max_attempts,
            });
        }

        self.state = SchedulerState::ActiveReporting;
        info!("Servidor pronto, iniciando relatórios");
        self.report_location(LocationKind::Coarse);
        self.report_location(LocationKind::Satellite);
        Ok(())
    }

    /// Envia um relatório de localização com retentativa limitada.
    pub fn report_location(&mut self, kind: LocationKind) -> bool {
        let client = &mut self.client;
        let ok = retry(&RetryPolicy::LOCATION, self.clock.as_ref(), || {
            let result = match kind {
                LocationKind::Coarse => client.send_coarse_location(),
                LocationKind::Satellite => client.send_satellite_location(),
            };
            result.unwrap_or_else(|e| {
                warn!("Erro ao enviar {kind}: {e}");
                false
            })
        });

        if ok {
            info!("Upload {kind}: sucesso");
        } else {
            warn!("Upload {kind}: falha");
        }
        ok
    }

    /// Uma iteração do regime de relatórios.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.client.is_ready() {
            error!("Conexão com o servidor indisponível");
            return TickOutcome::NotReady;
        }

        let cadence = Cadence::for_timestamp(self.clock.now_secs());
        let reading = self.shared.snapshot();
        let payload = build_payload(&reading, cadence);

        if payload.is_empty() {
            debug!("t={}s: nenhuma mudança, enviando payload vazio", cadence.timestamp);
        }

        let outcome = match self.client.send_telemetry(TELEMETRY_PROFILE_ID, &payload) {
            Ok(accepted) => {
                info!(
                    "t={}s: upload de {} métricas: {}",
                    cadence.timestamp,
                    payload.len(),
                    if accepted { "sucesso" } else { "falha" }
                );
                TickOutcome::Sent {
                    accepted,
                    entries: payload.len(),
                }
            }
            Err(e) => {
                error!("t={}s: erro no upload: {e}", cadence.timestamp);
                return TickOutcome::Failed;
            }
        };

        if cadence.coarse_location {
            self.report_location(LocationKind::Coarse);
        }
        if cadence.satellite_location {
            self.report_location(LocationKind::Satellite);
        }

        outcome
    }

    /// Handshake seguido do loop de relatórios, um tick por segundo.
    pub fn run(mut self, shutdown: Shutdown) {
        if self.bootstrap().is_err() {
            return;
        }

        while !shutdown.is_triggered() {
            let cycle_start = self.clock.now();
            self.tick();

            let elapsed = self.clock.now().saturating_sub(cycle_start);
            if elapsed < TICK {
                self.clock.sleep(TICK - elapsed);
            }
        }
        info!("Upload encerrado");
    }

    /// Inicia a thread de upload.
    pub fn spawn(self, shutdown: Shutdown) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("uploader".into())
            .spawn(move || self.run(shutdown))
    }
}
