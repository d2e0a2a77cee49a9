//! Configuração unificada via TOML.
//!
//! Apenas destino de rede, caminhos dos sensores e localização fixa são
//! configuráveis; as cadências de amostragem e upload são fixas.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Erros ao salvar a configuração.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Erro de I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro ao gerar TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Destino do servidor de telemetria.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// IP ou hostname do servidor
    pub dest_ip: String,
    /// Porta UDP
    pub port: u16,
    /// IP local para bind (vazio = auto)
    pub bind_ip: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            dest_ip: "127.0.0.1".into(),
            port: 5683,
            bind_ip: String::new(),
        }
    }
}

/// Diretórios sysfs dos três sensores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// hwmon do SHTC3 (temperatura + umidade)
    pub shtc3_hwmon: PathBuf,
    /// IIO do LPS22HB (pressão + temperatura)
    pub lps22hb_iio: PathBuf,
    /// IIO do TCS34725 (cor)
    pub tcs34725_iio: PathBuf,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            shtc3_hwmon: "/sys/class/hwmon/hwmon0".into(),
            lps22hb_iio: "/sys/bus/iio/devices/iio:device0".into(),
            tcs34725_iio: "/sys/bus/iio/devices/iio:device1".into(),
        }
    }
}

/// Célula da rede móvel, para localização aproximada.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellConfig {
    pub mcc: u16,
    pub mnc: u16,
    pub lac: u32,
    pub cell_id: u32,
}

/// Posição fixa conhecida (sem receptor GNSS).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f32,
}

/// Localização reportada ao servidor. Ausente = relatório falha.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub cell: Option<CellConfig>,
    pub fix: Option<FixConfig>,
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub link: LinkConfig,
    pub sensors: SensorConfig,
    pub location: LocationConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.link.port == 0 {
            errors.push("Porta do servidor não pode ser 0".into());
        }
        if self.link.dest_ip.trim().is_empty() {
            errors.push("Destino do servidor vazio".into());
        }
        if let Some(fix) = &self.location.fix {
            if !(-90.0..=90.0).contains(&fix.latitude) {
                errors.push(format!("Latitude inválida: {} (-90–90)", fix.latitude));
            }
            if !(-180.0..=180.0).contains(&fix.longitude) {
                errors.push(format!("Longitude inválida: {} (-180–180)", fix.longitude));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn default_has_no_location() {
        let config = AppConfig::default();
        assert!(config.location.cell.is_none());
        assert!(config.location.fix.is_none());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let partial = r#"
[link]
port = 9999

[location.fix]
latitude = -23.55
longitude = -46.63
"#;
        let config: AppConfig = toml::from_str(partial).unwrap();
        assert_eq!(config.link.port, 9999);
        // Outros campos devem ter valor padrão
        assert_eq!(config.link.dest_ip, "127.0.0.1");
        assert_eq!(config.location.fix.as_ref().unwrap().altitude_m, 0.0);
        assert!(config.location.cell.is_none());
    }

    #[test]
    fn invalid_latitude_is_reported() {
        let mut config = AppConfig::default();
        config.location.fix = Some(FixConfig {
            latitude: 123.0,
            ..Default::default()
        });
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Latitude"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = AppConfig::default();
        config.location.cell = Some(CellConfig {
            mcc: 724,
            mnc: 5,
            lac: 1234,
            cell_id: 98765,
        });
        config.save(&path).unwrap();
        assert!(path.exists());

        let loaded = AppConfig::load(&path);
        assert_eq!(loaded.location.cell, config.location.cell);
        assert_eq!(loaded.link.port, config.link.port);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let config = AppConfig::load(Path::new("/nonexistent/sensorlink.toml"));
        assert_eq!(config.link.port, LinkConfig::default().port);
    }
}
