//! # Sensorlink Node
//!
//! Amostra os sensores ambientais (SHTC3, LPS22HB, TCS34725) a cada segundo
//! e envia as mudanças significativas ao servidor de telemetria via UDP.
//!
//! ## Uso
//! ```bash
//! sensorlink_node                      # config.toml ao lado do executável
//! RUST_LOG=debug sensorlink_node       # log detalhado
//! ```

mod sysfs;
mod udp_client;

use sensorlink_core::config::AppConfig;
use sensorlink_core::time::{ClockPointer, SystemClock};
use sensorlink_core::{SamplingLoop, SharedReadingSet, Shutdown, UploadScheduler};
use std::sync::Arc;
use sysfs::{Lps22hbIio, Shtc3Hwmon, Tcs34725Iio};
use tracing::{error, info, warn};
use udp_client::UdpTelemetryClient;

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Carregar config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    for problem in config.validate() {
        warn!("Config: {problem}");
    }

    // ── Conjunto compartilhado + relógio ──
    let shared = SharedReadingSet::shared();
    let clock: ClockPointer = Arc::new(SystemClock::new());
    let shutdown = Shutdown::new();

    // ── Sensores ──
    let sensors = &config.sensors;
    let sampler = SamplingLoop::new(
        Arc::clone(&shared),
        Box::new(Shtc3Hwmon::new(&sensors.shtc3_hwmon)),
        Box::new(Lps22hbIio::new(&sensors.lps22hb_iio)),
        Box::new(Tcs34725Iio::new(&sensors.tcs34725_iio)),
        Arc::clone(&clock),
    );

    // ── Cliente de telemetria ──
    let client = UdpTelemetryClient::new(config.link.clone(), config.location.clone());
    let dest_addr = client.dest_addr();
    let uploader = UploadScheduler::new(Arc::clone(&shared), Box::new(client), clock);

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   SENSORLINK NODE – ATIVO");
    println!("══════════════════════════════════════════════");
    println!("  Destino:   {dest_addr}");
    println!("  SHTC3:     {}", sensors.shtc3_hwmon.display());
    println!("  LPS22HB:   {}", sensors.lps22hb_iio.display());
    println!("  TCS34725:  {}", sensors.tcs34725_iio.display());
    println!("  Protocolo: bincode v{}", sensorlink_core::PROTOCOL_VERSION);
    println!("══════════════════════════════════════════════");
    println!();

    // ── Threads ──
    let sampler_handle = match sampler.spawn(shutdown.clone()) {
        Ok(handle) => handle,
        Err(e) => {
            error!("Falha ao criar thread de amostragem: {e}");
            return;
        }
    };
    if let Err(e) = uploader.spawn(shutdown) {
        error!("Falha ao criar thread de upload: {e}");
    }
    info!("Threads de amostragem e upload iniciadas");

    // Roda até o processo ser encerrado
    if sampler_handle.join().is_err() {
        error!("Thread de amostragem terminou com panic");
    }
}
