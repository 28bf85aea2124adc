use serde::{Deserialize, Serialize};

use super::MixError;

/// 온도 선형 보정을 포함한 혼합 수축 모델.
///
/// k = k0 + alpha * (T - t0)
/// V = Vw + Ve - k * sqrt(Vw * Ve)
///
/// 상수는 경험값이며 설정 파일에서 덮어쓸 수 있다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractionModel {
    /// 기준 온도에서의 수축 계수
    pub k0: f64,
    /// 기준 온도(°C)
    pub t0: f64,
    /// 온도 계수(1/°C)
    pub alpha: f64,
}

impl Default for ContractionModel {
    fn default() -> Self {
        Self {
            k0: 0.05,
            t0: 25.0,
            alpha: 0.0001,
        }
    }
}

/// 한 번의 계산 요청.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixtureRequest {
    pub water_volume_ml: f64,
    pub ethanol_volume_ml: f64,
    pub temperature_c: f64,
}

/// 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixtureResult {
    /// 혼합 후 부피(ml)
    pub final_volume_ml: f64,
    /// 적용된 수축 계수 k
    pub coefficient_k: f64,
    /// 단순 합 대비 줄어든 부피(ml)
    pub contraction_ml: f64,
    /// 요청 온도(°C)
    pub temperature_c: f64,
}

impl MixtureResult {
    /// 소수 둘째 자리까지 표시한다.
    pub fn display_ml(&self) -> String {
        format!("{:.2}", self.final_volume_ml)
    }
}

impl ContractionModel {
    /// 모든 계수가 유한한지 확인한다.
    pub fn is_finite(&self) -> bool {
        self.k0.is_finite() && self.t0.is_finite() && self.alpha.is_finite()
    }

    /// 주어진 온도의 유효 수축 계수 k.
    pub fn coefficient_at(&self, temperature_c: f64) -> f64 {
        self.k0 + self.alpha * (temperature_c - self.t0)
    }

    /// 혼합 후 부피(ml)를 계산한다.
    pub fn final_volume(
        &self,
        water_volume_ml: f64,
        ethanol_volume_ml: f64,
        temperature_c: f64,
    ) -> Result<f64, MixError> {
        check_volume("water volume", water_volume_ml)?;
        check_volume("ethanol volume", ethanol_volume_ml)?;
        if !temperature_c.is_finite() {
            return Err(MixError::InvalidDomain {
                quantity: "temperature",
                value: temperature_c,
            });
        }
        let k = self.coefficient_at(temperature_c);
        let volume =
            water_volume_ml + ethanol_volume_ml - k * (water_volume_ml * ethanol_volume_ml).sqrt();
        if !volume.is_finite() {
            return Err(MixError::InvalidDomain {
                quantity: "final volume",
                value: volume,
            });
        }
        Ok(volume)
    }

    /// 요청 하나를 계산해 결과 객체로 돌려준다.
    pub fn compute(&self, request: &MixtureRequest) -> Result<MixtureResult, MixError> {
        let final_volume_ml = self.final_volume(
            request.water_volume_ml,
            request.ethanol_volume_ml,
            request.temperature_c,
        )?;
        let result = MixtureResult {
            final_volume_ml,
            coefficient_k: self.coefficient_at(request.temperature_c),
            contraction_ml: request.water_volume_ml + request.ethanol_volume_ml - final_volume_ml,
            temperature_c: request.temperature_c,
        };
        tracing::debug!(
            water_ml = request.water_volume_ml,
            ethanol_ml = request.ethanol_volume_ml,
            temperature_c = request.temperature_c,
            k = result.coefficient_k,
            final_ml = result.final_volume_ml,
            "mixture computed"
        );
        Ok(result)
    }

    /// 물 부피에 대해 결과가 순증가하기 시작하는 경계(ml).
    ///
    /// dV/dVw = 1 - (k/2) * sqrt(Ve/Vw) 이므로 k > 0 이면 Vw > k² * Ve / 4 에서만 증가한다.
    /// 그 아래에서는 기하평균 항이 지배해 물을 더 넣어도 부피가 줄어든다.
    pub fn monotonic_from_ml(&self, ethanol_volume_ml: f64, temperature_c: f64) -> f64 {
        let k = self.coefficient_at(temperature_c);
        if k <= 0.0 {
            0.0
        } else {
            k * k * ethanol_volume_ml / 4.0
        }
    }
}

fn check_volume(quantity: &'static str, value: f64) -> Result<(), MixError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MixError::InvalidDomain { quantity, value })
    }
}

/// 기본 계수로 계산한다.
pub fn compute(request: &MixtureRequest) -> Result<MixtureResult, MixError> {
    ContractionModel::default().compute(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(w: f64, e: f64, t: f64) -> MixtureRequest {
        MixtureRequest {
            water_volume_ml: w,
            ethanol_volume_ml: e,
            temperature_c: t,
        }
    }

    #[test]
    fn equal_parts_at_reference_temperature() {
        let res = compute(&req(250.0, 250.0, 25.0)).unwrap();
        assert_eq!(res.final_volume_ml, 487.5);
        assert_eq!(res.display_ml(), "487.50");
        assert!((res.contraction_ml - 12.5).abs() < 1e-12);
    }

    #[test]
    fn warm_mixture_rounds_up() {
        let res = compute(&req(250.0, 250.0, 50.0)).unwrap();
        assert!((res.coefficient_k - 0.0525).abs() < 1e-12);
        assert_eq!(res.display_ml(), "486.88");
    }

    #[test]
    fn negative_volume_is_rejected() {
        let err = compute(&req(-1.0, 100.0, 25.0)).unwrap_err();
        assert_eq!(
            err,
            MixError::InvalidDomain {
                quantity: "water volume",
                value: -1.0
            }
        );
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let model = ContractionModel::default();
        assert!(model.final_volume(f64::NAN, 1.0, 25.0).is_err());
        assert!(model.final_volume(1.0, f64::INFINITY, 25.0).is_err());
        assert!(model.final_volume(1.0, 1.0, f64::NAN).is_err());
    }

    #[test]
    fn overflowing_result_is_rejected() {
        let model = ContractionModel::default();
        let err = model.final_volume(f64::MAX, f64::MAX, 25.0).unwrap_err();
        assert!(matches!(
            err,
            MixError::InvalidDomain {
                quantity: "final volume",
                ..
            }
        ));
    }

    #[test]
    fn monotonic_boundary_follows_coefficient() {
        let model = ContractionModel::default();
        // k = 0.05, Ve = 250 → 0.05² * 250 / 4
        let b = model.monotonic_from_ml(250.0, 25.0);
        assert!((b - 0.15625).abs() < 1e-12);

        let flat = ContractionModel {
            k0: 0.0,
            t0: 25.0,
            alpha: 0.0,
        };
        assert_eq!(flat.monotonic_from_ml(250.0, 80.0), 0.0);
    }
}
