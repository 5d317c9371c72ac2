// ==========================================
// 集装箱船配载分析 - 分析参数快照
// ==========================================
// 职责: 一次性读取全部配置,以值对象形式传入纯函数引擎
// 红线: 引擎内部不读全局状态,只读本快照
// ==========================================

use crate::config::analysis_config_trait::AnalysisConfigReader;
use crate::config::config_manager::config_keys;
use crate::domain::types::{ContainerSize, PortSeq};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

// ==========================================
// AnalysisParams - 分析参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub leg_offset: PortSeq,
    pub light_threshold_20: u32,     // 0.1 吨
    pub light_threshold_40: u32,     // 0.1 吨
    pub restow_weight_margin_t: f64, // 吨
    pub dual_cycling_gain: f64,
    pub hc_move_time: f64,        // 小时
    pub default_crane_speed: f64, // move/h
    pub reefer_type_prefix: String,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            leg_offset: 0,
            light_threshold_20: 100,
            light_threshold_40: 150,
            restow_weight_margin_t: 30.0,
            dual_cycling_gain: 0.5,
            hc_move_time: 1.0,
            default_crane_speed: 25.0,
            reefer_type_prefix: "R".to_string(),
        }
    }
}

impl AnalysisParams {
    /// 通过配置读取器加载并校验
    pub async fn load<C>(reader: &C) -> EngineResult<Self>
    where
        C: AnalysisConfigReader + ?Sized,
    {
        let params = Self {
            leg_offset: reader
                .get_leg_offset()
                .await
                .map_err(|e| config_error(config_keys::LEG_OFFSET, e))?,
            light_threshold_20: reader
                .get_light_threshold_20()
                .await
                .map_err(|e| config_error(config_keys::LIGHT_THRESHOLD_20, e))?,
            light_threshold_40: reader
                .get_light_threshold_40()
                .await
                .map_err(|e| config_error(config_keys::LIGHT_THRESHOLD_40, e))?,
            restow_weight_margin_t: reader
                .get_restow_weight_margin_t()
                .await
                .map_err(|e| config_error(config_keys::RESTOW_WEIGHT_MARGIN_T, e))?,
            dual_cycling_gain: reader
                .get_dual_cycling_gain()
                .await
                .map_err(|e| config_error(config_keys::DUAL_CYCLING_GAIN, e))?,
            hc_move_time: reader
                .get_hc_move_time()
                .await
                .map_err(|e| config_error(config_keys::HC_MOVE_TIME, e))?,
            default_crane_speed: reader
                .get_default_crane_speed()
                .await
                .map_err(|e| config_error(config_keys::DEFAULT_CRANE_SPEED, e))?,
            reefer_type_prefix: reader
                .get_reefer_type_prefix()
                .await
                .map_err(|e| config_error(config_keys::REEFER_TYPE_PREFIX, e))?,
        };
        params.validate()?;
        Ok(params)
    }

    /// 参数校验
    ///
    /// # 规则
    /// - dual_cycling_gain ∈ [0, 1]
    /// - 轻箱阈值 > 0
    /// - 时间/效率/重量余量 >= 0
    pub fn validate(&self) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&self.dual_cycling_gain) {
            return Err(EngineError::Config {
                key: config_keys::DUAL_CYCLING_GAIN.to_string(),
                message: format!("应在 [0, 1] 内, 实际 {}", self.dual_cycling_gain),
            });
        }
        if self.light_threshold_20 == 0 || self.light_threshold_40 == 0 {
            return Err(EngineError::Config {
                key: config_keys::LIGHT_THRESHOLD_20.to_string(),
                message: "轻箱阈值必须大于 0".to_string(),
            });
        }
        for (key, value) in [
            (config_keys::RESTOW_WEIGHT_MARGIN_T, self.restow_weight_margin_t),
            (config_keys::HC_MOVE_TIME, self.hc_move_time),
            (config_keys::DEFAULT_CRANE_SPEED, self.default_crane_speed),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(EngineError::Config {
                    key: key.to_string(),
                    message: format!("不能为负, 实际 {}", value),
                });
            }
        }
        Ok(())
    }

    /// 尺寸对应的轻箱均重阈值（0.1 吨）
    pub fn light_threshold(&self, size: ContainerSize) -> u32 {
        if size.is_twenty() {
            self.light_threshold_20
        } else {
            self.light_threshold_40
        }
    }

    /// 冷箱判定: 箱型代码前缀
    pub fn is_reefer_type(&self, type_code: &str) -> bool {
        type_code
            .trim()
            .to_uppercase()
            .starts_with(self.reefer_type_prefix.as_str())
    }
}

fn config_error(key: &str, err: Box<dyn std::error::Error>) -> EngineError {
    EngineError::Config {
        key: key.to_string(),
        message: err.to_string(),
    }
}
