use super::contraction::MixtureRequest;
use super::MixError;

/// 온도 입력 컨트롤의 하한(°C)
pub const TEMPERATURE_MIN_C: i32 = -10;
/// 온도 입력 컨트롤의 상한(°C)
pub const TEMPERATURE_MAX_C: i32 = 100;

/// 부피 입력 필드 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeField {
    Water,
    Ethanol,
}

impl VolumeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeField::Water => "water",
            VolumeField::Ethanol => "ethanol",
        }
    }
}

/// 원시 문자열을 음이 아닌 부피(ml)로 해석한다.
///
/// 허용 형식: 숫자와 최대 한 개의 소수점(예: `250`, `12.5`, `.5`, `3.`).
/// 부호, 지수 표기, inf/nan, 천 단위 구분자는 허용하지 않는다.
/// 앞뒤 공백은 잘라낸 뒤 검사하므로 `" 250 "`도 250으로 받아들인다.
pub fn parse_volume_ml(field: VolumeField, raw: &str) -> Result<f64, MixError> {
    let fail = || MixError::InputParse {
        field,
        raw: raw.to_string(),
    };
    let s = raw.trim();
    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return Err(fail()),
        }
    }
    if digits == 0 || dots > 1 {
        return Err(fail());
    }
    let value: f64 = s.parse().map_err(|_| fail())?;
    // 자릿수가 지나치게 많으면 inf로 파싱된다
    if !value.is_finite() {
        return Err(fail());
    }
    Ok(value)
}

/// 온도가 입력 컨트롤 범위 안에 있는지 확인한다.
pub fn temperature_in_range(temperature_c: f64) -> bool {
    temperature_c >= f64::from(TEMPERATURE_MIN_C) && temperature_c <= f64::from(TEMPERATURE_MAX_C)
}

/// UI 호스트가 들고 있는 입력 상태.
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureForm {
    pub water_text: String,
    pub ethanol_text: String,
    pub temperature_c: f64,
}

impl MixtureForm {
    /// 온도는 입력 컨트롤 범위로 잘라낸다.
    pub fn new(
        water_text: impl Into<String>,
        ethanol_text: impl Into<String>,
        temperature_c: f64,
    ) -> Self {
        Self {
            water_text: water_text.into(),
            ethanol_text: ethanol_text.into(),
            temperature_c: temperature_c
                .clamp(f64::from(TEMPERATURE_MIN_C), f64::from(TEMPERATURE_MAX_C)),
        }
    }

    /// 두 부피가 모두 유효한지 여부. 버튼 노출 여부 판단에 쓴다.
    pub fn is_valid(&self) -> bool {
        self.to_request().is_ok()
    }

    /// 검증 후 계산 요청으로 변환한다. 물 → 에탄올 순으로 검사한다.
    pub fn to_request(&self) -> Result<MixtureRequest, MixError> {
        let water_volume_ml = parse_volume_ml(VolumeField::Water, &self.water_text)?;
        let ethanol_volume_ml = parse_volume_ml(VolumeField::Ethanol, &self.ethanol_text)?;
        Ok(MixtureRequest {
            water_volume_ml,
            ethanol_volume_ml,
            temperature_c: self.temperature_c,
        })
    }
}
