//! Retentativa limitada com espera fixa entre tentativas.

use crate::time::Clock;
use std::time::Duration;

/// Política de retentativa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Número máximo de chamadas da ação
    pub max_attempts: u32,
    /// Espera entre tentativas consecutivas
    pub delay: Duration,
}

impl RetryPolicy {
    /// Polling do handshake com o servidor: 30 tentativas, 1s entre elas.
    pub const HANDSHAKE: RetryPolicy = RetryPolicy {
        max_attempts: 30,
        delay: Duration::from_secs(1),
    };

    /// Relatórios de localização: 10 tentativas, 1s entre elas.
    pub const LOCATION: RetryPolicy = RetryPolicy {
        max_attempts: 10,
        delay: Duration::from_secs(1),
    };
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::LOCATION
    }
}

/// Chama `action` até ela retornar `true` ou esgotar `max_attempts`.
///
/// Dorme `delay` entre tentativas (nunca depois da última). Retorna se
/// alguma tentativa teve sucesso.
pub fn retry<C, F>(policy: &RetryPolicy, clock: &C, mut action: F) -> bool
where
    C: Clock + ?Sized,
    F: FnMut() -> bool,
{
    for attempt in 1..=policy.max_attempts {
        if action() {
            return true;
        }
        if attempt < policy.max_attempts {
            clock.sleep(policy.delay);
        }
    }
    false
}
