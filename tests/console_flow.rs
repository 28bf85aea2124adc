//! 콘솔 호스트 흐름 테스트. 입력을 스크립트로 넣고 출력 문자열을 확인한다.
use std::io::Cursor;

use alcohol_dilution_calculator::{
    app,
    config::{self, Config},
    i18n::Translator,
    ui_cli::{self, Console},
};

fn console(script: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
    Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
}

fn output(con: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
    String::from_utf8(con.into_output()).expect("utf8 output")
}

#[test]
fn calculation_prints_two_decimal_result() {
    let tr = Translator::new("en");
    let cfg = Config::default();
    let mut con = console("250\n250\n50\n");
    let res = ui_cli::handle_calculation(&tr, &cfg, &mut con)
        .expect("io")
        .expect("computed");
    assert_eq!(res.display_ml(), "486.88");
    let out = output(con);
    assert!(
        out.contains("The final volume of the solution at 50°C is approximately 486.88 ml"),
        "{out}"
    );
}

#[test]
fn blank_answers_use_configured_defaults() {
    let tr = Translator::new("en");
    let cfg = Config::default();
    let mut con = console("\n\n\n");
    let res = ui_cli::handle_calculation(&tr, &cfg, &mut con)
        .expect("io")
        .expect("computed");
    assert_eq!(res.display_ml(), "487.50");
    assert_eq!(res.temperature_c, 25.0);
}

#[test]
fn invalid_volume_prints_validation_message_only() {
    let tr = Translator::new("en");
    let cfg = Config::default();
    let mut con = console("abc\n250\n25\n");
    let res = ui_cli::handle_calculation(&tr, &cfg, &mut con).expect("io");
    assert!(res.is_none());
    let out = output(con);
    assert!(out.contains("Please enter valid numeric values for water and alcohol volumes."));
    assert!(!out.contains("final volume of the solution"));
}

#[test]
fn invalid_ethanol_after_valid_water_is_not_computed() {
    let tr = Translator::new("en");
    let cfg = Config::default();
    let mut con = console("250\n1,5\n25\n");
    let res = ui_cli::handle_calculation(&tr, &cfg, &mut con).expect("io");
    assert!(res.is_none());
    let out = output(con);
    assert!(out.contains("Please enter valid numeric values for water and alcohol volumes."));
    assert!(!out.contains("final volume of the solution"), "{out}");
}

#[test]
fn out_of_range_temperature_is_asked_again() {
    let tr = Translator::new("en");
    let cfg = Config::default();
    let mut con = console("100\n100\n150\nwarm\n25\n");
    let res = ui_cli::handle_calculation(&tr, &cfg, &mut con)
        .expect("io")
        .expect("computed");
    assert_eq!(res.display_ml(), "195.00");
    let out = output(con);
    assert!(out.contains("Temperature must be between -10 and 100 °C."));
    assert!(out.contains("Please enter a number."));
}

#[test]
fn closed_input_is_an_error_not_a_loop() {
    let tr = Translator::new("en");
    let mut con = console("");
    assert!(ui_cli::main_menu(&tr, &mut con).is_err());
}

#[test]
fn settings_update_contraction_and_save_on_exit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let mut cfg = Config::default();
    cfg.language = "en".into();
    // 설정 → 계수 변경(k0=0, t0 기본, alpha=0) → 계산 → 종료
    let script = "2\n2\n0\n\n0\n1\n100\n100\n25\n0\n";
    let mut con = console(script);
    app::run(&mut cfg, &path, Translator::new("en"), &mut con).expect("run");

    assert_eq!(cfg.contraction.k0, 0.0);
    assert_eq!(cfg.contraction.alpha, 0.0);
    let out = output(con);
    assert!(out.contains("Settings saved."), "{out}");
    assert!(out.contains("approximately 200.00 ml"), "{out}");
    assert!(out.contains("Exiting application."));

    let saved = config::load_or_default_at(&path).expect("saved config");
    assert_eq!(saved.contraction.k0, 0.0);
}

#[test]
fn unknown_language_is_rejected() {
    let tr = Translator::new("en");
    let mut cfg = Config::default();
    let mut con = console("1\nklingon\n");
    let changed = ui_cli::handle_settings(&tr, &mut cfg, &mut con).expect("io");
    assert!(!changed);
    assert_eq!(cfg.language, "auto");
}
