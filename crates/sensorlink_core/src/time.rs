//! Relógio monotônico usado pelas duas threads.
//!
//! Todas as esperas do núcleo (ticks, retentativas, handshake) passam por
//! [`Clock`], o que permite testes determinísticos sem dormir de verdade.

use std::sync::Arc;
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    /// Tempo decorrido desde uma época arbitrária.
    fn now(&self) -> Duration;

    /// Bloqueia a thread atual por `d`.
    fn sleep(&self, d: Duration);

    /// Segundos inteiros desde a época (truncado).
    fn now_secs(&self) -> u64 {
        self.now().as_secs()
    }
}

pub type ClockPointer = Arc<dyn Clock>;

/// Relógio real: tempo de atividade desde a criação.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}
