//! Definição de tipos/structs do conjunto de leituras e do payload de upload.
//!
//! O payload enviado ao servidor é um mapa de identificadores numéricos fixos
//! para valores, com as cores agrupadas sob um identificador próprio.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ──────────────────────────────────────────────
// Identificadores de métricas
// ──────────────────────────────────────────────

/// Identificadores numéricos fixos usados no payload de telemetria.
pub mod metric_id {
    /// Temperatura do sensor A (°C)
    pub const TEMP1: u8 = 3;
    /// Umidade relativa (%)
    pub const HUMIDITY: u8 = 4;
    /// Temperatura do sensor B (°C)
    pub const TEMP2: u8 = 5;
    /// Pressão (hPa)
    pub const PRESSURE: u8 = 6;
    /// Grupo das cores
    pub const COLOR: u8 = 7;

    /// Canais dentro do grupo [`COLOR`].
    pub const RED: u8 = 1;
    pub const GREEN: u8 = 2;
    pub const BLUE: u8 = 3;
}

// ──────────────────────────────────────────────
// Cor
// ──────────────────────────────────────────────

/// Valor RGB empacotado em 24 bits (`0xRRGGBB`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb888(pub u32);

impl Rgb888 {
    pub fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self((u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b))
    }

    pub fn red(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    pub fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub fn blue(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

// ──────────────────────────────────────────────
// Leitura
// ──────────────────────────────────────────────

/// Conjunto de leituras filtradas de um ciclo de amostragem.
///
/// `None` significa "sem mudança significativa" neste ciclo. A cor nunca é
/// filtrada. O conjunto zerado tem as métricas em `None` e a cor em 0, para
/// que nenhum valor fictício seja enviado antes da primeira amostra.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Temperatura do sensor A (°C)
    pub temp1: Option<f32>,
    /// Umidade relativa do sensor A (%)
    pub humidity: Option<f32>,
    /// Temperatura do sensor B (°C)
    pub temp2: Option<f32>,
    /// Pressão do sensor B (hPa)
    pub pressure: Option<f32>,
    /// Cor empacotada do sensor de cor
    pub rgb888: Rgb888,
}

/// Formata um campo opcional como o log de diagnóstico espera.
struct Field(Option<f32>);

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("None"),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data: temp1: {}, humi: {}, press: {}, temp2: {}, rgb888: 0x{:02X}",
            Field(self.temp1),
            Field(self.humidity),
            Field(self.pressure),
            Field(self.temp2),
            self.rgb888.0
        )
    }
}

// ──────────────────────────────────────────────
// Payload
// ──────────────────────────────────────────────

/// Valor de uma entrada do payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PayloadValue {
    Float(f32),
    Byte(u8),
    Group(BTreeMap<u8, PayloadValue>),
}

/// Payload de telemetria: identificador da métrica → valor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPayload {
    pub entries: BTreeMap<u8, PayloadValue>,
}

impl TelemetryPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u8, value: PayloadValue) {
        self.entries.insert(id, value);
    }

    /// Insere o valor apenas quando presente.
    pub fn insert_opt(&mut self, id: u8, value: Option<f32>) {
        if let Some(v) = value {
            self.entries.insert(id, PayloadValue::Float(v));
        }
    }

    /// Insere as cores como grupo aninhado sob [`metric_id::COLOR`].
    pub fn insert_color(&mut self, rgb: Rgb888) {
        let group = BTreeMap::from([
            (metric_id::RED, PayloadValue::Byte(rgb.red())),
            (metric_id::GREEN, PayloadValue::Byte(rgb.green())),
            (metric_id::BLUE, PayloadValue::Byte(rgb.blue())),
        ]);
        self.entries.insert(metric_id::COLOR, PayloadValue::Group(group));
    }

    pub fn get(&self, id: u8) -> Option<&PayloadValue> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: u8) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ──────────────────────────────────────────────
// Localização
// ──────────────────────────────────────────────

/// Relatório de posição enviado ao servidor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationReport {
    /// Posição aproximada pela célula da rede móvel.
    Cell {
        mcc: u16,
        mnc: u16,
        lac: u32,
        cell_id: u32,
    },
    /// Posição via satélite.
    Satellite {
        latitude: f64,
        longitude: f64,
        altitude_m: f32,
    },
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
