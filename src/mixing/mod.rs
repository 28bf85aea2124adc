//! 물-에탄올 혼합 부피 계산 모듈.
//! 수축 계수 모델(contraction)과 원시 입력 검증(input)으로 구성한다.

pub mod contraction;
pub mod input;

pub use contraction::{compute, ContractionModel, MixtureRequest, MixtureResult};
pub use input::{
    parse_volume_ml, temperature_in_range, MixtureForm, VolumeField, TEMPERATURE_MAX_C, TEMPERATURE_MIN_C,
};

/// 혼합 계산 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Clone, PartialEq)]
pub enum MixError {
    /// 부피 입력 문자열이 음이 아닌 숫자가 아님
    InputParse { field: VolumeField, raw: String },
    /// 음수/비유한 값이 계산 단계에 도달함
    InvalidDomain { quantity: &'static str, value: f64 },
}

impl std::fmt::Display for MixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MixError::InputParse { field, raw } => {
                write!(f, "invalid {} volume input: {raw:?}", field.as_str())
            }
            MixError::InvalidDomain { quantity, value } => {
                write!(f, "{quantity} out of domain: {value}")
            }
        }
    }
}

impl std::error::Error for MixError {}
