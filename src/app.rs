use std::io::{BufRead, Write};
use std::path::Path;

use crate::config::{Config, ConfigError};
use crate::i18n::{self, keys, Translator};
use crate::mixing::MixError;
use crate::ui_cli::{self, Console, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 입출력 오류
    Io(std::io::Error),
    /// 설정 저장/로드 오류
    Config(ConfigError),
    /// 혼합 계산 오류
    Mix(MixError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "I/O error: {e}"),
            AppError::Config(e) => write!(f, "config error: {e}"),
            AppError::Mix(e) => write!(f, "mixture error: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<MixError> for AppError {
    fn from(value: MixError) -> Self {
        AppError::Mix(value)
    }
}

/// CLI 플래그와 설정으로 번역기를 만든다.
pub fn build_translator(cli_lang: &str, config: &Config) -> Translator {
    let code = i18n::resolve_language(cli_lang, Some(config.language.as_str()));
    Translator::new_with_pack(&code, config.language_pack_dir.as_deref())
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run<R: BufRead, W: Write>(
    config: &mut Config,
    config_path: &Path,
    mut tr: Translator,
    con: &mut Console<R, W>,
) -> Result<(), AppError> {
    loop {
        match ui_cli::main_menu(&tr, con)? {
            MenuChoice::Calculate => {
                ui_cli::handle_calculation(&tr, config, con)?;
            }
            MenuChoice::Settings => {
                let previous_language = config.language.clone();
                if ui_cli::handle_settings(&tr, config, con)? {
                    config.save_to(config_path)?;
                    if config.language != previous_language {
                        tr = build_translator("auto", config);
                    }
                    con.say(&tr.t(keys::SETTINGS_SAVED))?;
                    tracing::info!(path = %config_path.display(), "settings saved");
                }
            }
            MenuChoice::Exit => {
                config.save_to(config_path)?;
                con.say(&tr.t(keys::APP_EXIT))?;
                break;
            }
        }
    }
    Ok(())
}
