//! Cadências fixas de amostragem e upload.
//!
//! A chave de cadência é o timestamp em segundos inteiros; cada tipo de
//! relatório dispara quando o timestamp é múltiplo do seu período.

use std::time::Duration;

/// Período de um tick das duas threads.
pub const TICK: Duration = Duration::from_secs(1);

/// Cores: a cada 5s.
pub const COLOR_PERIOD_SECS: u64 = 5;
/// Métricas filtradas: a cada 1s.
pub const METRICS_PERIOD_SECS: u64 = 1;
/// Localização por célula: a cada 30min.
pub const COARSE_LOCATION_PERIOD_SECS: u64 = 1800;
/// Localização por satélite: a cada 1min.
pub const SATELLITE_LOCATION_PERIOD_SECS: u64 = 60;

/// Perfil fixo usado no envio de telemetria.
pub const TELEMETRY_PROFILE_ID: u8 = 1;

/// O que deve ser reportado num tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub timestamp: u64,
    pub color: bool,
    pub metrics: bool,
    pub coarse_location: bool,
    pub satellite_location: bool,
}

impl Cadence {
    pub fn for_timestamp(timestamp: u64) -> Self {
        Self {
            timestamp,
            color: timestamp % COLOR_PERIOD_SECS == 0,
            metrics: timestamp % METRICS_PERIOD_SECS == 0,
            coarse_location: timestamp % COARSE_LOCATION_PERIOD_SECS == 0,
            satellite_location: timestamp % SATELLITE_LOCATION_PERIOD_SECS == 0,
        }
    }
}
