use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use crate::error::ConfigError;

pub const CUTTING_TIME_MS: u64 = 20;
pub const BARBERS_AMOUNT: usize = 1;
pub const HALL_SEATS_AMOUNT: usize = 3;
pub const MIN_ARRIVAL_GAP_MS: u64 = 7;
pub const MAX_ARRIVAL_GAP_MS: u64 = 35;
pub const RUN_FOR_MS: u64 = 2000;

/// Parámetros de la barbería. Lo que no se especifique toma los valores de la
/// versión clásica: un barbero, tres sillas, cortes de 20 ms y clientes cada
/// 7 a 35 ms.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShopConfig {
    pub barbers: usize,
    pub hall_seats: usize,
    pub cutting_time_ms: u64,
    pub min_gap_ms: u64,
    pub max_gap_ms: u64,
    pub run_for_ms: u64,
    pub seed: Option<u64>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            barbers: BARBERS_AMOUNT,
            hall_seats: HALL_SEATS_AMOUNT,
            cutting_time_ms: CUTTING_TIME_MS,
            min_gap_ms: MIN_ARRIVAL_GAP_MS,
            max_gap_ms: MAX_ARRIVAL_GAP_MS,
            run_for_ms: RUN_FOR_MS,
            seed: None,
        }
    }
}

impl ShopConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.barbers == 0 {
            return Err(ConfigError::NoBarbers);
        }
        if self.cutting_time_ms == 0 {
            return Err(ConfigError::ZeroCuttingTime);
        }
        if self.min_gap_ms >= self.max_gap_ms {
            return Err(ConfigError::EmptyGapRange {
                min: self.min_gap_ms,
                max: self.max_gap_ms,
            });
        }
        Ok(())
    }

    pub fn cutting_time(&self) -> Duration {
        Duration::from_millis(self.cutting_time_ms)
    }

    pub fn run_for(&self) -> Duration {
        Duration::from_millis(self.run_for_ms)
    }

    pub fn gap_range_ms(&self) -> Range<u64> {
        self.min_gap_ms..self.max_gap_ms
    }
}

/// Opciones de línea de comandos compartidas por los dos binarios. Pisan lo que
/// diga el archivo de configuración.
#[derive(Debug, Parser)]
#[command(about = "Simulación del barbero dormilón")]
pub struct Cli {
    /// Archivo TOML con la configuración base
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub barbers: Option<usize>,
    #[arg(long)]
    pub hall_seats: Option<usize>,
    #[arg(long)]
    pub cutting_time_ms: Option<u64>,
    #[arg(long)]
    pub min_gap_ms: Option<u64>,
    #[arg(long)]
    pub max_gap_ms: Option<u64>,
    /// Cuánto tiempo se deja abierta la barbería
    #[arg(long)]
    pub run_for_ms: Option<u64>,
    /// Semilla para repetir exactamente la misma secuencia de llegadas
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    pub fn into_config(self) -> Result<ShopConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ShopConfig::load(path)?,
            None => ShopConfig::default(),
        };
        if let Some(barbers) = self.barbers {
            config.barbers = barbers;
        }
        if let Some(hall_seats) = self.hall_seats {
            config.hall_seats = hall_seats;
        }
        if let Some(cutting_time_ms) = self.cutting_time_ms {
            config.cutting_time_ms = cutting_time_ms;
        }
        if let Some(min_gap_ms) = self.min_gap_ms {
            config.min_gap_ms = min_gap_ms;
        }
        if let Some(max_gap_ms) = self.max_gap_ms {
            config.max_gap_ms = max_gap_ms;
        }
        if let Some(run_for_ms) = self.run_for_ms {
            config.run_for_ms = run_for_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}
