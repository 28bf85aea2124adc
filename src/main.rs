use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use alcohol_dilution_calculator::{app, config, i18n, logging, ui_cli};

/// 알코올 희석 계산기 콘솔 버전.
#[derive(Debug, Parser)]
#[command(name = "alcohol_dilution_calculator_cli", version, about)]
struct Args {
    /// 언어 코드 (auto/en/ko/de)
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,
    /// 설정 파일 경로
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// 디버그 로그 출력
    #[arg(short, long)]
    verbose: bool,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);
    tracing::info!("starting console calculator");
    if let Err(err) = try_run(&args) {
        let code = i18n::resolve_language(&args.lang, None);
        let tr = i18n::Translator::new(&code);
        eprintln!("{}: {err}", tr.t(i18n::keys::ERROR_PREFIX));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn try_run(args: &Args) -> Result<(), app::AppError> {
    let mut cfg = config::load_or_default_at(&args.config)?;
    let tr = app::build_translator(&args.lang, &cfg);
    let mut con = ui_cli::stdio();
    app::run(&mut cfg, &args.config, tr, &mut con)
}
