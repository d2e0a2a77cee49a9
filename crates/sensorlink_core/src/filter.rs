//! Filtro de mudança significativa.
//!
//! Um valor novo só é reportado quando difere do último valor *reportado*
//! (não da última amostra) por mais que [`SIGNIFICANCE_THRESHOLD`].

/// Diferença mínima (exclusiva), na unidade da própria métrica.
pub const SIGNIFICANCE_THRESHOLD: f32 = 1.0;

/// Filtro de uma única métrica, guardando o último valor reportado.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChangeFilter {
    prev: Option<f32>,
}

impl ChangeFilter {
    /// Decide se `v` é significativo em relação a `prev`.
    ///
    /// Retorna `(reportar, novo_prev)`. Sem `prev` a primeira amostra é
    /// sempre reportada.
    pub fn evaluate(prev: Option<f32>, v: f32) -> (bool, f32) {
        match prev {
            None => (true, v),
            Some(p) if (v - p).abs() > SIGNIFICANCE_THRESHOLD => (true, v),
            Some(p) => (false, p),
        }
    }

    /// Aplica o filtro e atualiza a memória.
    ///
    /// `Some(v)` quando a mudança é significativa, `None` caso contrário.
    pub fn observe(&mut self, v: f32) -> Option<f32> {
        let (report, new_prev) = Self::evaluate(self.prev, v);
        self.prev = Some(new_prev);
        report.then_some(v)
    }

    /// Último valor reportado.
    pub fn last_reported(&self) -> Option<f32> {
        self.prev
    }
}

/// Memória dos últimos valores reportados, privada à thread de amostragem.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviousValueMemo {
    pub temp1: ChangeFilter,
    pub humidity: ChangeFilter,
    pub temp2: ChangeFilter,
    pub pressure: ChangeFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_always_reported() {
        for v in [-40.0, 0.0, 21.3, 1013.0] {
            assert_eq!(ChangeFilter::evaluate(None, v), (true, v));
        }
    }

    #[test]
    fn small_change_is_suppressed() {
        assert_eq!(ChangeFilter::evaluate(Some(20.0), 20.5), (false, 20.0));
        assert_eq!(ChangeFilter::evaluate(Some(20.0), 19.2), (false, 20.0));
    }

    #[test]
    fn threshold_is_strict() {
        assert_eq!(ChangeFilter::evaluate(Some(20.0), 21.0), (false, 20.0));
        assert_eq!(ChangeFilter::evaluate(Some(20.0), 19.0), (false, 20.0));
    }

    #[test]
    fn large_change_updates_memo() {
        assert_eq!(ChangeFilter::evaluate(Some(20.0), 21.5), (true, 21.5));
        assert_eq!(ChangeFilter::evaluate(Some(20.0), 18.0), (true, 18.0));
    }

    #[test]
    fn compares_against_last_reported_not_last_sample() {
        let mut f = ChangeFilter::default();
        assert_eq!(f.observe(20.0), Some(20.0));
        // Deriva lenta: cada passo < 1, mas o acumulado passa do limiar
        assert_eq!(f.observe(20.6), None);
        assert_eq!(f.observe(20.9), None);
        assert_eq!(f.observe(21.2), Some(21.2));
        assert_eq!(f.last_reported(), Some(21.2));
    }

    #[test]
    fn scenario_temp1() {
        let mut f = ChangeFilter::default();
        assert_eq!(f.observe(20.0), Some(20.0));
        assert_eq!(f.last_reported(), Some(20.0));
        assert_eq!(f.observe(20.5), None);
        assert_eq!(f.last_reported(), Some(20.0));
        assert_eq!(f.observe(22.0), Some(22.0));
        assert_eq!(f.last_reported(), Some(22.0));
    }
}
