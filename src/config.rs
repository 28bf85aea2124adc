use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::mixing::{ContractionModel, TEMPERATURE_MAX_C, TEMPERATURE_MIN_C};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 입력 영역 배치.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputLayout {
    /// 좌측 사이드바에 입력을 둔다.
    Sidebar,
    /// 본문에 입력을 바로 둔다.
    Inline,
}

/// 화면 초기 입력값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDefaults {
    pub water_ml: String,
    pub ethanol_ml: String,
    pub temperature_c: i32,
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            water_ml: "250".into(),
            ethanol_ml: "250".into(),
            temperature_c: 25,
        }
    }
}

/// GUI 전용 표시 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiSettings {
    pub layout: InputLayout,
    /// 배경 이미지 파일 경로
    pub background_image: Option<String>,
    /// 결과 표시 전 대기 시간(ms). 0이면 즉시 표시
    pub result_delay_ms: u64,
    /// 제목/결과 색상(RGB)
    pub heading_color: [u8; 3],
    /// 본문 색상(RGB)
    pub text_color: [u8; 3],
    /// 한글 표시용 사용자 폰트
    pub font_path: Option<String>,
}

impl Default for GuiSettings {
    fn default() -> Self {
        Self {
            layout: InputLayout::Sidebar,
            background_image: None,
            result_delay_ms: 1000,
            heading_color: [30, 110, 220],
            text_color: [255, 255, 255],
            font_path: None,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드(auto/en/en-us/ko/ko-kr/de/de-de)
    pub language: String,
    /// 언어팩 디렉터리
    pub language_pack_dir: Option<String>,
    pub contraction: ContractionModel,
    pub defaults: InputDefaults,
    pub gui: GuiSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            language_pack_dir: None,
            contraction: ContractionModel::default(),
            defaults: InputDefaults::default(),
            gui: GuiSettings::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 역직렬화 오류
    Serde(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
    /// 값 범위 오류
    Invalid(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "file I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "config parse error: {e}"),
            ConfigError::Serialize(e) => write!(f, "config serialize error: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Serde(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        ConfigError::Serialize(value)
    }
}

/// 지정한 경로의 설정을 로드한다. 파일이 없으면 기본값을 기록한 뒤 반환한다.
pub fn load_or_default_at(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        cfg.validate()?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        tracing::info!(path = %path.display(), "default config created");
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 지정한 경로에 저장한다.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 로드 후 값 범위를 검사한다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.contraction.is_finite() {
            return Err(ConfigError::Invalid(
                "contraction k0, t0 and alpha must be finite numbers",
            ));
        }
        let t = self.defaults.temperature_c;
        if !(TEMPERATURE_MIN_C..=TEMPERATURE_MAX_C).contains(&t) {
            return Err(ConfigError::Invalid(
                "defaults.temperature_c must be between -10 and 100",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes_and_parses_back() {
        let cfg = Config::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
language = "ko"

[contraction]
k0 = 0.04
"#,
        )
        .unwrap();
        assert_eq!(cfg.language, "ko");
        assert_eq!(cfg.contraction.k0, 0.04);
        assert_eq!(cfg.contraction.t0, 25.0);
        assert_eq!(cfg.gui.layout, InputLayout::Sidebar);
        assert_eq!(cfg.defaults.water_ml, "250");
    }

    #[test]
    fn out_of_range_default_temperature_is_invalid() {
        let mut cfg = Config::default();
        cfg.defaults.temperature_c = 120;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }
}
