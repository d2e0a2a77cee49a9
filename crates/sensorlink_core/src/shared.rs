//! Conjunto de leituras compartilhado entre amostragem e upload.
//!
//! A thread de amostragem é a única escritora e a de upload a única leitora.
//! Todo acesso passa por um único `Mutex`, mantido durante a sequência
//! inteira de leitura ou escrita, nunca por campo.

use crate::types::Reading;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

pub type SharedReadingSetPointer = Arc<SharedReadingSet>;

#[derive(Debug, Default)]
pub struct SharedReadingSet {
    inner: Mutex<Reading>,
}

impl SharedReadingSet {
    /// Cria o conjunto zerado.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedReadingSetPointer {
        Arc::new(Self::new())
    }

    /// Executa `f` com acesso exclusivo ao conjunto.
    ///
    /// O lock é liberado quando `f` retorna, inclusive em retornos antecipados.
    pub fn update<R>(&self, f: impl FnOnce(&mut Reading) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    /// Cópia consistente do conjunto atual.
    pub fn snapshot(&self) -> Reading {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, Reading> {
        // Um panic numa thread não deve travar a outra para sempre
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Lock do conjunto de leituras envenenado, recuperando");
            poisoned.into_inner()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb888;
    use std::thread;

    #[test]
    fn starts_zeroed() {
        let set = SharedReadingSet::new();
        assert_eq!(set.snapshot(), Reading::default());
    }

    #[test]
    fn update_is_visible_in_snapshot() {
        let set = SharedReadingSet::new();
        set.update(|r| {
            r.temp1 = Some(20.0);
            r.rgb888 = Rgb888(0xABCDEF);
        });
        let snap = set.snapshot();
        assert_eq!(snap.temp1, Some(20.0));
        assert_eq!(snap.rgb888, Rgb888(0xABCDEF));
    }

    #[test]
    fn reader_never_sees_partial_tick() {
        let set = SharedReadingSet::shared();
        let writer_set = Arc::clone(&set);

        let writer = thread::spawn(move || {
            for tick in 1..=5_000u32 {
                writer_set.update(|r| {
                    let v = tick as f32;
                    r.temp1 = Some(v);
                    thread::yield_now();
                    r.humidity = Some(v);
                    r.temp2 = Some(v);
                    thread::yield_now();
                    r.pressure = Some(v);
                    r.rgb888 = Rgb888(tick);
                });
            }
        });

        for _ in 0..5_000 {
            let snap = set.snapshot();
            let Some(t) = snap.temp1 else { continue };
            assert_eq!(snap.humidity, Some(t));
            assert_eq!(snap.temp2, Some(t));
            assert_eq!(snap.pressure, Some(t));
            assert_eq!(snap.rgb888, Rgb888(t as u32));
        }

        writer.join().unwrap();
    }

    #[test]
    fn recovers_from_poisoned_lock() {
        let set = SharedReadingSet::shared();
        let poisoner = Arc::clone(&set);
        let result = thread::spawn(move || {
            poisoner.update(|r| {
                r.temp1 = Some(1.0);
                if r.temp1.is_some() {
                    panic!("falha simulada");
                }
            })
        })
        .join();

        assert!(result.is_err());
        assert_eq!(set.snapshot().temp1, Some(1.0));
    }
}
