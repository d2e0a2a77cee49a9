//! Contratos dos drivers de sensores.
//!
//! Cada driver expõe uma única operação de leitura. A implementação concreta
//! (barramento, registradores, sysfs…) fica fora deste crate.

/// Erros de leitura de sensor.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("Falha no barramento: {0}")]
    Bus(String),

    #[error("Erro de I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Valor inválido em {attr}: {value:?}")]
    Parse { attr: String, value: String },

    #[error("Sensor indisponível: {0}")]
    Unavailable(String),
}

/// Sensor A: temperatura e umidade.
pub trait TempHumiditySensor: Send {
    /// Retorna `(temperatura °C, umidade %)`.
    fn read(&mut self) -> Result<(f32, f32), SensorError>;
}

/// Sensor B: pressão e temperatura.
pub trait PressureTempSensor: Send {
    /// Retorna `(pressão hPa, temperatura °C)`.
    fn read(&mut self) -> Result<(f32, f32), SensorError>;
}

/// Sensor de cor.
pub trait ColorSensor: Send {
    /// Retorna a cor empacotada `0xRRGGBB`.
    fn read(&mut self) -> Result<u32, SensorError>;
}

pub type TempHumiditySensorPointer = Box<dyn TempHumiditySensor>;
pub type PressureTempSensorPointer = Box<dyn PressureTempSensor>;
pub type ColorSensorPointer = Box<dyn ColorSensor>;
