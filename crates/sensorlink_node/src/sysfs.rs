//! Sensores lidos via sysfs do Linux (hwmon / IIO).
//!
//! Os drivers do kernel fazem o acesso ao barramento I²C; aqui só lemos os
//! atributos exportados e convertemos para as unidades do núcleo.
//!
//! | Sensor   | Driver   | Atributos                                         |
//! |----------|----------|---------------------------------------------------|
//! | SHTC3    | shtc1    | `temp1_input` (m°C), `humidity1_input` (m%)       |
//! | LPS22HB  | st_press | `in_pressure_raw/scale` (kPa), `in_temp_raw/scale` |
//! | TCS34725 | tcs3472  | `in_intensity_{red,green,blue,clear}_raw`         |

use sensorlink_core::sensors::{ColorSensor, PressureTempSensor, SensorError, TempHumiditySensor};
use sensorlink_core::types::Rgb888;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lê um atributo numérico de um diretório sysfs.
fn read_attr(dir: &Path, attr: &str) -> Result<f64, SensorError> {
    let raw = std::fs::read_to_string(dir.join(attr))?;
    let value = raw.trim();
    value.parse::<f64>().map_err(|_| SensorError::Parse {
        attr: attr.into(),
        value: value.into(),
    })
}

/// Lê um atributo opcional; ausente = `default`.
fn read_attr_or(dir: &Path, attr: &str, default: f64) -> Result<f64, SensorError> {
    if dir.join(attr).exists() {
        read_attr(dir, attr)
    } else {
        Ok(default)
    }
}

fn ensure_dir(dir: &Path) -> Result<(), SensorError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(SensorError::Unavailable(dir.display().to_string()))
    }
}

// ──────────────────────────────────────────────
// SHTC3 (hwmon)
// ──────────────────────────────────────────────

/// Temperatura + umidade do SHTC3.
pub struct Shtc3Hwmon {
    dir: PathBuf,
}

impl Shtc3Hwmon {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TempHumiditySensor for Shtc3Hwmon {
    fn read(&mut self) -> Result<(f32, f32), SensorError> {
        ensure_dir(&self.dir)?;
        let temp = read_attr(&self.dir, "temp1_input")? / 1000.0;
        let humi = read_attr(&self.dir, "humidity1_input")? / 1000.0;
        debug!("SHTC3: {temp:.2}°C {humi:.1}%");
        Ok((temp as f32, humi as f32))
    }
}

// ──────────────────────────────────────────────
// LPS22HB (IIO)
// ──────────────────────────────────────────────

/// Pressão + temperatura do LPS22HB.
pub struct Lps22hbIio {
    dir: PathBuf,
}

impl Lps22hbIio {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PressureTempSensor for Lps22hbIio {
    fn read(&mut self) -> Result<(f32, f32), SensorError> {
        ensure_dir(&self.dir)?;
        // IIO: pressão em kPa, temperatura em m°C
        let press_kpa =
            read_attr(&self.dir, "in_pressure_raw")? * read_attr(&self.dir, "in_pressure_scale")?;
        let temp_raw = read_attr(&self.dir, "in_temp_raw")?
            + read_attr_or(&self.dir, "in_temp_offset", 0.0)?;
        let temp_mc = temp_raw * read_attr(&self.dir, "in_temp_scale")?;

        let press_hpa = press_kpa * 10.0;
        let temp = temp_mc / 1000.0;
        debug!("LPS22HB: {press_hpa:.2}hPa {temp:.2}°C");
        Ok((press_hpa as f32, temp as f32))
    }
}

// ──────────────────────────────────────────────
// TCS34725 (IIO)
// ──────────────────────────────────────────────

/// Cor do TCS34725, normalizada pelo canal clear para 8 bits por canal.
pub struct Tcs34725Iio {
    dir: PathBuf,
}

impl Tcs34725Iio {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Converte um canal de 16 bits para 8 bits relativo ao clear.
fn normalize(channel: f64, clear: f64) -> u8 {
    if clear <= 0.0 {
        return 0;
    }
    (channel * 255.0 / clear).round().clamp(0.0, 255.0) as u8
}

impl ColorSensor for Tcs34725Iio {
    fn read(&mut self) -> Result<u32, SensorError> {
        ensure_dir(&self.dir)?;
        let clear = read_attr(&self.dir, "in_intensity_clear_raw")?;
        let r = read_attr(&self.dir, "in_intensity_red_raw")?;
        let g = read_attr(&self.dir, "in_intensity_green_raw")?;
        let b = read_attr(&self.dir, "in_intensity_blue_raw")?;

        let rgb = Rgb888::from_channels(
            normalize(r, clear),
            normalize(g, clear),
            normalize(b, clear),
        );
        debug!("TCS34725: c={clear} rgb=0x{:06X}", rgb.0);
        Ok(rgb.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn device(attrs: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, value) in attrs {
            fs::write(dir.path().join(name), format!("{value}\n")).unwrap();
        }
        dir
    }

    #[test]
    fn shtc3_converts_milli_units() {
        let dev = device(&[("temp1_input", "23450"), ("humidity1_input", "41200")]);
        let (t, h) = Shtc3Hwmon::new(dev.path()).read().unwrap();
        assert!((t - 23.45).abs() < 1e-4);
        assert!((h - 41.2).abs() < 1e-4);
    }

    #[test]
    fn lps22hb_scales_to_hpa() {
        let dev = device(&[
            ("in_pressure_raw", "4149248"),
            ("in_pressure_scale", "0.000024414"),
            ("in_temp_raw", "2350"),
            ("in_temp_scale", "10"),
        ]);
        let (p, t) = Lps22hbIio::new(dev.path()).read().unwrap();
        assert!((p - 1012.99).abs() < 0.05, "pressão {p}");
        assert!((t - 23.5).abs() < 1e-4);
    }

    #[test]
    fn tcs34725_normalizes_against_clear() {
        let dev = device(&[
            ("in_intensity_clear_raw", "1000"),
            ("in_intensity_red_raw", "1000"),
            ("in_intensity_green_raw", "500"),
            ("in_intensity_blue_raw", "0"),
        ]);
        let rgb = Tcs34725Iio::new(dev.path()).read().unwrap();
        assert_eq!(rgb, 0xFF_80_00);
    }

    #[test]
    fn dark_reading_is_black() {
        assert_eq!(normalize(10.0, 0.0), 0);
        assert_eq!(normalize(2000.0, 1000.0), 255);
    }

    #[test]
    fn missing_device_is_unavailable() {
        let err = Shtc3Hwmon::new("/nonexistent/hwmon9").read().unwrap_err();
        assert!(matches!(err, SensorError::Unavailable(_)));
    }

    #[test]
    fn garbage_value_is_parse_error() {
        let dev = device(&[("temp1_input", "abc"), ("humidity1_input", "1")]);
        let err = Shtc3Hwmon::new(dev.path()).read().unwrap_err();
        assert!(matches!(err, SensorError::Parse { ref attr, .. } if attr == "temp1_input"));
    }
}
