//! # Sensorlink Core
//!
//! Núcleo do nó de sensores ambientais: conjunto de leituras compartilhado,
//! filtro de mudança significativa, thread de amostragem e agendador de
//! upload com retentativa limitada.
//!
//! ## Módulos
//! - [`types`] – Leitura, cor empacotada e payload de telemetria
//! - [`filter`] – Filtro de mudança significativa
//! - [`shared`] – Conjunto de leituras protegido por mutex
//! - [`sensors`] / [`client`] – Contratos dos drivers e do cliente de rede
//! - [`sampler`] – Thread de amostragem
//! - [`scheduler`] – Thread de upload (handshake + cadências)
//! - [`retry`] – Retentativa limitada com espera
//! - [`cadence`] – Períodos fixos de cada relatório
//! - [`protocol`] – Encode/decode binário com magic byte
//! - [`config`] – Configuração via TOML

pub mod cadence;
pub mod client;
pub mod config;
pub mod filter;
pub mod protocol;
pub mod retry;
pub mod sampler;
pub mod scheduler;
pub mod sensors;
pub mod shared;
pub mod shutdown;
pub mod time;
pub mod types;

// Re-exports convenientes
pub use config::AppConfig;
pub use protocol::{Frame, PROTOCOL_VERSION, decode_frame, encode_frame};
pub use sampler::SamplingLoop;
pub use scheduler::UploadScheduler;
pub use shared::SharedReadingSet;
pub use shutdown::Shutdown;
pub use types::{Reading, TelemetryPayload};
