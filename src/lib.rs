//! 혼합 부피 계산 로직을 라이브러리로 분리하여 CLI와 GUI가 함께 사용한다.

pub mod app;
pub mod config;
pub mod i18n;
pub mod logging;
pub mod mixing;
pub mod ui_cli;
