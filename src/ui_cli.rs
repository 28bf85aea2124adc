use std::io::{self, BufRead, Write};

use crate::app::AppError;
use crate::config::Config;
use crate::i18n::{self, keys, Translator};
use crate::mixing::{
    temperature_in_range, ContractionModel, MixtureForm, MixtureResult, TEMPERATURE_MAX_C,
    TEMPERATURE_MIN_C,
};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Calculate,
    Settings,
    Exit,
}

/// 콘솔 입출력 묶음.
pub struct Console<R, W> {
    input: R,
    output: W,
}

/// 표준 입출력에 연결된 콘솔.
pub fn stdio() -> Console<io::StdinLock<'static>, io::Stdout> {
    Console::new(io::stdin().lock(), io::stdout())
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// 한 줄을 출력한다.
    pub fn say(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// 프롬프트를 출력하고 한 줄을 읽는다. 입력이 끝나면 UnexpectedEof 오류.
    fn read_line(&mut self, prompt: &str) -> Result<String, AppError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(AppError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }
        Ok(buf.trim().to_string())
    }

    /// 유한한 실수를 읽는다. 빈 입력이면 기본값.
    fn read_f64_or(
        &mut self,
        tr: &Translator,
        prompt: &str,
        default: f64,
    ) -> Result<f64, AppError> {
        loop {
            let s = self.read_line(prompt)?;
            if s.is_empty() {
                return Ok(default);
            }
            match s.parse::<f64>() {
                Ok(v) if v.is_finite() => return Ok(v),
                _ => self.say(&tr.t(keys::ERROR_INVALID_NUMBER))?,
            }
        }
    }
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu<R: BufRead, W: Write>(
    tr: &Translator,
    con: &mut Console<R, W>,
) -> Result<MenuChoice, AppError> {
    con.say(&tr.t(keys::MAIN_MENU_TITLE))?;
    con.say(&tr.t(keys::MAIN_MENU_CALCULATE))?;
    con.say(&tr.t(keys::MAIN_MENU_SETTINGS))?;
    con.say(&tr.t(keys::MAIN_MENU_EXIT))?;
    loop {
        let sel = con.read_line(&tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.as_str() {
            "1" => return Ok(MenuChoice::Calculate),
            "2" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => con.say(&tr.t(keys::INVALID_SELECTION_RETRY))?,
        }
    }
}

/// 최종 부피 계산 메뉴를 처리한다. 입력이 잘못되면 계산하지 않고 None.
pub fn handle_calculation<R: BufRead, W: Write>(
    tr: &Translator,
    cfg: &Config,
    con: &mut Console<R, W>,
) -> Result<Option<MixtureResult>, AppError> {
    con.say(&tr.t(keys::MIXER_HEADING))?;
    let defaults = &cfg.defaults;
    let water = con.read_line(&tr.tf(
        keys::PROMPT_WATER,
        &[("default", defaults.water_ml.clone())],
    ))?;
    let ethanol = con.read_line(&tr.tf(
        keys::PROMPT_ETHANOL,
        &[("default", defaults.ethanol_ml.clone())],
    ))?;
    let temperature = read_temperature(tr, con, defaults.temperature_c)?;

    let form = MixtureForm::new(
        or_default(water, &defaults.water_ml),
        or_default(ethanol, &defaults.ethanol_ml),
        temperature,
    );
    let request = match form.to_request() {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!(error = %e, "volume input rejected");
            con.say(&tr.t(keys::MIXER_INVALID_INPUT))?;
            return Ok(None);
        }
    };
    let result = match cfg.contraction.compute(&request) {
        Ok(res) => res,
        Err(e) => {
            tracing::warn!(error = %e, "calculation rejected");
            con.say(&tr.tf(keys::ERROR_CALCULATION, &[("error", e.to_string())]))?;
            return Ok(None);
        }
    };
    con.say(&i18n::result_message(tr, &result))?;
    con.say(&tr.tf(
        keys::MIXER_CONTRACTION,
        &[
            ("contraction", format!("{:.2}", result.contraction_ml)),
            ("k", format!("{:.4}", result.coefficient_k)),
        ],
    ))?;
    Ok(Some(result))
}

fn or_default(input: String, default: &str) -> String {
    if input.is_empty() {
        default.to_string()
    } else {
        input
    }
}

fn read_temperature<R: BufRead, W: Write>(
    tr: &Translator,
    con: &mut Console<R, W>,
    default: i32,
) -> Result<f64, AppError> {
    let range = [
        ("min", TEMPERATURE_MIN_C.to_string()),
        ("max", TEMPERATURE_MAX_C.to_string()),
    ];
    let prompt = tr.tf(
        keys::PROMPT_TEMPERATURE,
        &[range[0].clone(), range[1].clone(), ("default", default.to_string())],
    );
    loop {
        let t = con.read_f64_or(tr, &prompt, f64::from(default))?;
        if temperature_in_range(t) {
            return Ok(t);
        }
        con.say(&tr.tf(keys::ERROR_TEMPERATURE_RANGE, &range))?;
    }
}

/// 설정 메뉴를 처리한다. 값이 바뀌었으면 true.
pub fn handle_settings<R: BufRead, W: Write>(
    tr: &Translator,
    cfg: &mut Config,
    con: &mut Console<R, W>,
) -> Result<bool, AppError> {
    con.say(&tr.t(keys::SETTINGS_HEADING))?;
    con.say(&tr.tf(
        keys::SETTINGS_CURRENT_LANGUAGE,
        &[("language", cfg.language.clone())],
    ))?;
    con.say(&tr.tf(
        keys::SETTINGS_CURRENT_CONTRACTION,
        &[
            ("k0", cfg.contraction.k0.to_string()),
            ("t0", cfg.contraction.t0.to_string()),
            ("alpha", cfg.contraction.alpha.to_string()),
        ],
    ))?;
    con.say(&tr.t(keys::SETTINGS_OPTIONS))?;
    let sel = con.read_line(&tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    match sel.as_str() {
        "" => Ok(false),
        "1" => {
            let lang = con.read_line(&tr.t(keys::SETTINGS_PROMPT_LANGUAGE))?;
            if i18n::is_known_language(&lang) {
                cfg.language = lang.to_lowercase();
                Ok(true)
            } else {
                con.say(&tr.t(keys::SETTINGS_INVALID))?;
                Ok(false)
            }
        }
        "2" => {
            let current = cfg.contraction;
            let k0 =
                con.read_f64_or(tr, &default_prompt(tr, keys::PROMPT_K0, current.k0), current.k0)?;
            let t0 =
                con.read_f64_or(tr, &default_prompt(tr, keys::PROMPT_T0, current.t0), current.t0)?;
            let alpha = con.read_f64_or(
                tr,
                &default_prompt(tr, keys::PROMPT_ALPHA, current.alpha),
                current.alpha,
            )?;
            cfg.contraction = ContractionModel { k0, t0, alpha };
            Ok(cfg.contraction != current)
        }
        "3" => {
            cfg.contraction = ContractionModel::default();
            con.say(&tr.t(keys::SETTINGS_RESET))?;
            Ok(true)
        }
        _ => {
            con.say(&tr.t(keys::SETTINGS_INVALID))?;
            Ok(false)
        }
    }
}

fn default_prompt(tr: &Translator, key: &str, value: f64) -> String {
    tr.tf(key, &[("default", value.to_string())])
}
