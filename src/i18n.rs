use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

use crate::mixing::MixtureResult;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const APP_TITLE: &str = "general.app_title";
    pub const PROBLEM_STATEMENT: &str = "general.problem_statement";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_CALCULATE: &str = "main_menu.calculate";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";

    pub const MIXER_HEADING: &str = "mixer.heading";
    pub const MIXER_INPUTS: &str = "mixer.inputs";
    pub const MIXER_WATER_LABEL: &str = "mixer.water_label";
    pub const MIXER_ETHANOL_LABEL: &str = "mixer.ethanol_label";
    pub const MIXER_TEMPERATURE_LABEL: &str = "mixer.temperature_label";
    pub const MIXER_CALCULATE: &str = "mixer.calculate";
    pub const MIXER_CALCULATING: &str = "mixer.calculating";
    pub const MIXER_INVALID_INPUT: &str = "mixer.invalid_input";
    pub const MIXER_RESULT: &str = "mixer.result";
    pub const MIXER_CONTRACTION: &str = "mixer.contraction";

    pub const PROMPT_WATER: &str = "prompt.water";
    pub const PROMPT_ETHANOL: &str = "prompt.ethanol";
    pub const PROMPT_TEMPERATURE: &str = "prompt.temperature";
    pub const PROMPT_K0: &str = "prompt.k0";
    pub const PROMPT_T0: &str = "prompt.t0";
    pub const PROMPT_ALPHA: &str = "prompt.alpha";

    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";
    pub const ERROR_TEMPERATURE_RANGE: &str = "error.temperature_range";
    pub const ERROR_CALCULATION: &str = "error.calculation";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_LANGUAGE: &str = "settings.current_language";
    pub const SETTINGS_CURRENT_CONTRACTION: &str = "settings.current_contraction";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_PROMPT_LANGUAGE: &str = "settings.prompt_language";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";
    pub const SETTINGS_RESET: &str = "settings.reset";

    pub const GUI_SETTINGS: &str = "gui.settings.title";
    pub const GUI_LAYOUT: &str = "gui.settings.layout";
    pub const GUI_LAYOUT_SIDEBAR: &str = "gui.settings.layout_sidebar";
    pub const GUI_LAYOUT_INLINE: &str = "gui.settings.layout_inline";
    pub const GUI_LANGUAGE: &str = "gui.settings.language";
    pub const GUI_LANGUAGE_PACK_DIR: &str = "gui.settings.language_pack_dir";
    pub const GUI_BACKGROUND: &str = "gui.settings.background";
    pub const GUI_RESULT_DELAY: &str = "gui.settings.result_delay";
    pub const GUI_BROWSE: &str = "gui.settings.browse";
    pub const GUI_CLEAR: &str = "gui.settings.clear";
    pub const GUI_SAVE: &str = "gui.settings.save";
    pub const GUI_SAVED: &str = "gui.settings.saved";
    pub const GUI_SAVE_FAILED: &str = "gui.settings.save_failed";
    pub const GUI_LANGUAGE_NOTE: &str = "gui.settings.language_note";
    pub const GUI_ABOUT: &str = "gui.about.title";
    pub const GUI_ABOUT_BODY: &str = "gui.about.body";
    pub const GUI_BACKGROUND_FAILED: &str = "gui.background_failed";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 지정 디렉터리 → locales/ 순으로 찾고, 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        if overrides.is_some() {
            tracing::debug!(lang = lang_code, "language pack loaded");
        }
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 언어팩에서 키를 조회한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides.as_ref().and_then(|m| m.get(key).cloned())
    }

    /// 번역을 가져온다. 언어팩 → 내장 문자열 순, 한국어에 없는 키는 영어로 폴백한다.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.lookup(key) {
            return v;
        }
        let s = match self.lang {
            Language::Ko => ko(key).or_else(|| en(key)),
            Language::En => en(key),
        };
        s.unwrap_or("[missing translation]").to_string()
    }

    /// 번역 후 `{name}` 자리표시자를 채운다.
    pub fn tf(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(&self.t(key), vars)
    }
}

/// `{name}` 형식 자리표시자를 치환한다.
pub fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// 계산 결과 문장. 온도는 입력 그대로, 부피는 소수 둘째 자리.
pub fn result_message(tr: &Translator, result: &MixtureResult) -> String {
    tr.tf(
        keys::MIXER_RESULT,
        &[
            ("temperature", result.temperature_c.to_string()),
            ("volume", result.display_ml()),
        ],
    )
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en-us".to_string())
}

/// 설정에 저장 가능한 언어 코드인지 여부.
pub fn is_known_language(code: &str) -> bool {
    let c = code.trim().to_lowercase();
    c == "auto" || normalize_lang(&c).is_some()
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "ko" | "ko-kr" => Some("ko-kr".into()),
        "en" | "en-us" | "en-uk" => Some("en-us".into()),
        "de" | "de-de" => Some("de-de".into()),
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko-kr".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        other if other.starts_with("de") => Some("de-de".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko-kr".into()),
        "en" => Some("en-us".into()),
        "de" => Some("de-de".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    for var in ["LANG", "LC_ALL"] {
        if let Ok(lang) = std::env::var(var) {
            if let Some(code) = normalize_locale_string(&lang) {
                return Some(code);
            }
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 중첩 테이블.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // 1) full code (e.g., ko-kr)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    // 2) base code (e.g., ko)
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        APP_TITLE => "알코올 희석 계산기",
        PROBLEM_STATEMENT => {
            "알코올을 정확하게 희석해야 하나요? 섞으려는 물과 알코올의 부피(ml)와 실온(°C)을 입력하면, 물과 알코올을 섞을 때 생기는 부피 수축을 고려해 최종 용액 부피를 계산합니다."
        }
        MAIN_MENU_TITLE => "\n=== 알코올 희석 계산기 ===",
        MAIN_MENU_CALCULATE => "1) 최종 부피 계산",
        MAIN_MENU_SETTINGS => "2) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        MIXER_HEADING => "\n-- 최종 부피 계산 --",
        MIXER_INPUTS => "입력",
        MIXER_WATER_LABEL => "물 부피 (ml)",
        MIXER_ETHANOL_LABEL => "알코올 부피 (ml)",
        MIXER_TEMPERATURE_LABEL => "실온 (°C)",
        MIXER_CALCULATE => "부피 계산",
        MIXER_CALCULATING => "계산 중...",
        MIXER_INVALID_INPUT => "물과 알코올 부피에 올바른 숫자를 입력하세요.",
        MIXER_RESULT => "{temperature}°C에서 용액의 최종 부피는 약 {volume} ml 입니다",
        MIXER_CONTRACTION => "수축량: {contraction} ml (k = {k})",
        PROMPT_WATER => "물 부피 (ml) [{default}]: ",
        PROMPT_ETHANOL => "알코올 부피 (ml) [{default}]: ",
        PROMPT_TEMPERATURE => "실온 (°C, {min}~{max}) [{default}]: ",
        PROMPT_K0 => "기준 수축 계수 k0 [{default}]: ",
        PROMPT_T0 => "기준 온도 t0 (°C) [{default}]: ",
        PROMPT_ALPHA => "온도 계수 alpha [{default}]: ",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        ERROR_TEMPERATURE_RANGE => "온도는 {min}~{max} °C 범위여야 합니다.",
        ERROR_CALCULATION => "계산 실패: {error}",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_CURRENT_LANGUAGE => "현재 언어: {language}",
        SETTINGS_CURRENT_CONTRACTION => "현재 k0 = {k0}, t0 = {t0} °C, alpha = {alpha}",
        SETTINGS_OPTIONS => "1) 언어  2) 수축 계수  3) 계수 초기화",
        SETTINGS_PROMPT_CHANGE => "변경할 번호(취소하려면 엔터): ",
        SETTINGS_PROMPT_LANGUAGE => "언어 (auto/en/ko/de): ",
        SETTINGS_INVALID => "잘못된 입력이므로 변경하지 않습니다.",
        SETTINGS_SAVED => "설정을 저장했습니다.",
        SETTINGS_RESET => "수축 계수를 기본값으로 되돌렸습니다.",
        GUI_SETTINGS => "설정",
        GUI_LAYOUT => "입력 배치",
        GUI_LAYOUT_SIDEBAR => "사이드바",
        GUI_LAYOUT_INLINE => "본문",
        GUI_LANGUAGE => "언어",
        GUI_LANGUAGE_PACK_DIR => "언어팩 폴더",
        GUI_BACKGROUND => "배경 이미지",
        GUI_RESULT_DELAY => "결과 표시 지연 (ms)",
        GUI_BROWSE => "찾아보기…",
        GUI_CLEAR => "지우기",
        GUI_SAVE => "설정 저장",
        GUI_SAVED => "설정을 저장했습니다.",
        GUI_SAVE_FAILED => "설정 저장 실패: {error}",
        GUI_LANGUAGE_NOTE => "언어 변경은 즉시 적용됩니다.",
        GUI_ABOUT => "도움말 / 정보",
        GUI_ABOUT_BODY => {
            "V = Vw + Ve - k·√(Vw·Ve),  k = k0 + alpha·(T - t0)\n기본값: k0 = 0.05, t0 = 25 °C, alpha = 0.0001. 경험식이므로 참고용으로만 사용하세요."
        }
        GUI_BACKGROUND_FAILED => "배경 이미지를 불러오지 못했습니다: {error}",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting application.",
        APP_TITLE => "Alcohol Dilution Calculator.",
        PROBLEM_STATEMENT => {
            "Do you need to accurately dilute alcohol for your mixtures? Enter the volume of water and alcohol (in milliliters) you want to mix, along with the room temperature (in degrees Celsius). We'll calculate the final solution volume, considering potential volume contraction when mixing water and alcohol."
        }
        MAIN_MENU_TITLE => "\n=== Alcohol Dilution Calculator ===",
        MAIN_MENU_CALCULATE => "1) Calculate final volume",
        MAIN_MENU_SETTINGS => "2) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        MIXER_HEADING => "\n-- Calculate final volume --",
        MIXER_INPUTS => "Inputs",
        MIXER_WATER_LABEL => "Volume of Water (ml)",
        MIXER_ETHANOL_LABEL => "Volume of Alcohol (ml)",
        MIXER_TEMPERATURE_LABEL => "Room Temperature (°C)",
        MIXER_CALCULATE => "Calculate Volume",
        MIXER_CALCULATING => "Calculating...",
        MIXER_INVALID_INPUT => "Please enter valid numeric values for water and alcohol volumes.",
        MIXER_RESULT => {
            "The final volume of the solution at {temperature}°C is approximately {volume} ml"
        }
        MIXER_CONTRACTION => "Contraction: {contraction} ml (k = {k})",
        PROMPT_WATER => "Volume of Water (ml) [{default}]: ",
        PROMPT_ETHANOL => "Volume of Alcohol (ml) [{default}]: ",
        PROMPT_TEMPERATURE => "Room Temperature (°C, {min}~{max}) [{default}]: ",
        PROMPT_K0 => "Base contraction factor k0 [{default}]: ",
        PROMPT_T0 => "Reference temperature t0 (°C) [{default}]: ",
        PROMPT_ALPHA => "Temperature coefficient alpha [{default}]: ",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        ERROR_TEMPERATURE_RANGE => "Temperature must be between {min} and {max} °C.",
        ERROR_CALCULATION => "Calculation failed: {error}",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_LANGUAGE => "Current language: {language}",
        SETTINGS_CURRENT_CONTRACTION => "Current k0 = {k0}, t0 = {t0} °C, alpha = {alpha}",
        SETTINGS_OPTIONS => "1) Language  2) Contraction coefficients  3) Reset coefficients",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_PROMPT_LANGUAGE => "Language (auto/en/ko/de): ",
        SETTINGS_INVALID => "Invalid input; settings unchanged.",
        SETTINGS_SAVED => "Settings saved.",
        SETTINGS_RESET => "Contraction coefficients reset to defaults.",
        GUI_SETTINGS => "Settings",
        GUI_LAYOUT => "Input layout",
        GUI_LAYOUT_SIDEBAR => "Sidebar",
        GUI_LAYOUT_INLINE => "Inline",
        GUI_LANGUAGE => "Language",
        GUI_LANGUAGE_PACK_DIR => "Language pack folder",
        GUI_BACKGROUND => "Background image",
        GUI_RESULT_DELAY => "Result delay (ms)",
        GUI_BROWSE => "Browse…",
        GUI_CLEAR => "Clear",
        GUI_SAVE => "Save settings",
        GUI_SAVED => "Settings saved.",
        GUI_SAVE_FAILED => "Failed to save settings: {error}",
        GUI_LANGUAGE_NOTE => "Language changes apply immediately.",
        GUI_ABOUT => "Help / About",
        GUI_ABOUT_BODY => {
            "V = Vw + Ve - k·√(Vw·Ve),  k = k0 + alpha·(T - t0)\nDefaults: k0 = 0.05, t0 = 25 °C, alpha = 0.0001. The constants are empirical; treat the result as an estimate."
        }
        GUI_BACKGROUND_FAILED => "Could not load background image: {error}",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flag_wins_over_config() {
        assert_eq!(resolve_language("ko", Some("en")), "ko-kr");
        assert_eq!(resolve_language("auto", Some("en-uk")), "en-us");
    }

    #[test]
    fn korean_falls_back_to_english_for_unknown_pack_keys() {
        let tr = Translator::new("ko");
        assert_eq!(tr.language(), Language::Ko);
        assert_eq!(tr.t(keys::MIXER_CALCULATE), "부피 계산");
        assert_eq!(tr.t("no.such.key"), "[missing translation]");
    }

    #[test]
    fn template_fills_every_placeholder() {
        let tr = Translator::new("en");
        let msg = tr.tf(
            keys::MIXER_RESULT,
            &[("temperature", "25".into()), ("volume", "487.50".into())],
        );
        assert_eq!(
            msg,
            "The final volume of the solution at 25°C is approximately 487.50 ml"
        );
    }

    #[test]
    fn shipped_german_pack_overrides_and_falls_back() {
        let tr = Translator::new_with_pack("de-de", None);
        assert_eq!(tr.t(keys::MIXER_CALCULATE), "Volumen berechnen");
        assert_eq!(tr.t(keys::GUI_BROWSE), "Browse…");
    }

    #[test]
    fn language_prompt_lists_every_accepted_code() {
        let prompt = Translator::new("en").t(keys::SETTINGS_PROMPT_LANGUAGE);
        for code in ["auto", "en", "ko", "de"] {
            assert!(prompt.contains(code), "{prompt}");
            assert!(is_known_language(code));
        }
        assert!(!is_known_language("klingon"));
    }

    #[test]
    fn nested_pack_tables_flatten_to_dotted_keys() {
        let map = parse_toml_to_map("[mixer]\ncalculate = \"Go\"\n").unwrap();
        assert_eq!(map.get("mixer.calculate").map(String::as_str), Some("Go"));
    }
}
