/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::SignalError;
use crate::models::Interval;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub market_data: MarketDataConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Indicator window lengths. MACD and trend spans are fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub window_sr: usize,
    pub rsi_window: usize,
    pub atr_window: usize,
    pub bb_window: usize,
    pub bb_std: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Yahoo,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    pub provider: ProviderKind,
    pub base_url: String,
    pub csv_path: Option<String>,
    /// UTC offset bars are normalised to, e.g. "+05:30".
    pub utc_offset: String,
    pub timeout_ms: u64,
    pub default_interval: Interval,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub session: String,
    pub recipient_prefix: String,
    pub recipient: Option<String>,
    pub min_confidence: f64,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub auto_refresh: bool,
    pub interval_secs: u64,
    /// Symbol the server watches in the background when `auto_refresh` is on.
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load configuration from `config.json`, falling back to defaults
    pub fn load() -> Result<Self, SignalError> {
        Self::load_from(Path::new("config.json"))
    }

    pub fn load_from(config_path: &Path) -> Result<Self, SignalError> {
        let mut cfg = if config_path.exists() {
            let mut file = File::open(config_path)
                .map_err(|e| SignalError::ConfigError(format!("Failed to open config file: {}", e)))?;

            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .map_err(|e| SignalError::ConfigError(format!("Failed to read config file: {}", e)))?;

            Self::from_json(&contents)?
        } else {
            Config::default()
        };

        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json(contents: &str) -> Result<Self, SignalError> {
        serde_json::from_str(contents)
            .map_err(|e| SignalError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// Apply environment variable overrides for sensitive/runtime fields
    fn apply_env_overrides(&mut self) {
        use std::env;
        if let Ok(v) = env::var("SIGNAL_RECIPIENT") { if !v.is_empty() { self.notification.recipient = Some(v); } }
        if let Ok(v) = env::var("NOTIFY_ENDPOINT") { if !v.is_empty() { self.notification.endpoint = v; } }
        if let Ok(v) = env::var("MARKET_DATA_CSV") { if !v.is_empty() { self.market_data.csv_path = Some(v); } }
        if let Ok(v) = env::var("WATCH_SYMBOL") { if !v.is_empty() { self.refresh.symbol = Some(v); } }
        if let Ok(v) = env::var("LOG_LEVEL") { if !v.is_empty() { self.logging.level = v; } }
        if let Ok(v) = env::var("SERVER_PORT") {
            if let Ok(port) = v.parse() { self.server.port = port; }
        }
        if let Ok(v) = env::var("MARKET_DATA_PROVIDER") {
            match v.to_lowercase().as_str() {
                "yahoo" => self.market_data.provider = ProviderKind::Yahoo,
                "csv" => self.market_data.provider = ProviderKind::Csv,
                _ => {}
            }
        }
        if let Ok(v) = env::var("AUTO_REFRESH") {
            let lower = v.to_lowercase();
            if ["1","true","yes"].contains(&lower.as_str()) { self.refresh.auto_refresh = true; }
            if ["0","false","no"].contains(&lower.as_str()) { self.refresh.auto_refresh = false; }
        }
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        self.analyzer.validate()?;

        if self.market_data.provider == ProviderKind::Csv && self.market_data.csv_path.is_none() {
            return Err(SignalError::ConfigError("csv provider requires market_data.csv_path".to_string()));
        }
        if self.refresh.interval_secs == 0 {
            return Err(SignalError::ConfigError("refresh.interval_secs must be positive".to_string()));
        }
        Ok(())
    }
}

impl AnalyzerConfig {
    /// Largest window the fetch period has to cover, trend filter included.
    pub fn max_window(&self) -> usize {
        [self.window_sr, self.rsi_window, self.atr_window, self.bb_window, 200]
            .into_iter()
            .max()
            .unwrap_or(200)
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        let windows = [
            ("window_sr", self.window_sr),
            ("rsi_window", self.rsi_window),
            ("atr_window", self.atr_window),
            ("bb_window", self.bb_window),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(SignalError::ConfigError(format!("analyzer.{} must be at least 1", name)));
            }
        }
        if self.bb_window < 2 {
            return Err(SignalError::ConfigError("analyzer.bb_window must be at least 2".to_string()));
        }
        if !(self.bb_std.is_finite() && self.bb_std > 0.0) {
            return Err(SignalError::ConfigError("analyzer.bb_std must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            analyzer: AnalyzerConfig::default(),
            market_data: MarketDataConfig::default(),
            notification: NotificationConfig::default(),
            refresh: RefreshConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            window_sr: 20,
            rsi_window: 14,
            atr_window: 14,
            bb_window: 20,
            bb_std: 2.0,
        }
    }
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        MarketDataConfig {
            provider: ProviderKind::Yahoo,
            base_url: "https://query1.finance.yahoo.com".to_string(),
            csv_path: None,
            utc_offset: "+05:30".to_string(),
            timeout_ms: 30_000,
            default_interval: Interval::FifteenMinutes,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        NotificationConfig {
            enabled: true,
            endpoint: "http://127.0.0.1:5001/send-message".to_string(),
            session: "main".to_string(),
            recipient_prefix: "91".to_string(),
            recipient: None,
            min_confidence: 0.5,
            timeout_ms: 10_000,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        RefreshConfig {
            auto_refresh: false,
            interval_secs: 300,
            symbol: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}
