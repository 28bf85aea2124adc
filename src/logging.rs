use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// stderr 로거를 설치한다. RUST_LOG가 있으면 그 필터를 우선한다.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "alcohol_dilution_calculator=debug,info"
    } else {
        "alcohol_dilution_calculator=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // 이미 설치된 전역 구독자가 있으면 무시한다
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
