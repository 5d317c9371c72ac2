// ==========================================
// 集装箱船配载分析 - 倒箱可行性领域模型
// ==========================================
// 红线: 只读视图,逐航段计算,不回写
// ==========================================

use crate::domain::grid::{HatchSectionId, Stack, SubbayId};
use serde::{Deserialize, Serialize};

// ==========================================
// RestowExclusions - 倒箱排除条件
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestowExclusions {
    pub contains_dangerous_1_7: bool,
    pub contains_oog_left: bool,
    pub contains_oog_right: bool,
}

impl RestowExclusions {
    pub fn any(&self) -> bool {
        self.contains_dangerous_1_7 || self.contains_oog_left || self.contains_oog_right
    }

    pub fn merge(&mut self, other: RestowExclusions) {
        self.contains_dangerous_1_7 |= other.contains_dangerous_1_7;
        self.contains_oog_left |= other.contains_oog_left;
        self.contains_oog_right |= other.contains_oog_right;
    }
}

// ==========================================
// HoldStackRestow - 舱内列倒箱聚合
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldStackRestow {
    pub stack: Stack,
    pub subbay: SubbayId,
    pub nb_containers: u32,
    pub nb_heavy: u32,
    pub nb_light: u32,
    pub light_teu: u32,
    pub total_weight_heavy: f64,
    pub max_weight: f64,
    pub remaining_weight: f64,
    pub exclusions: RestowExclusions,
    pub is_restowable: bool,
}

// ==========================================
// DeckSubbayRestow - 甲板分舱倒箱聚合
// ==========================================
// 甲板不做重量判定
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckSubbayRestow {
    pub subbay: SubbayId,
    pub nb_containers: u32,
    pub teu: u32,
    pub exclusions: RestowExclusions,
    pub is_restowable: bool,
}

// ==========================================
// RestowRatio - 倒箱代价比
// ==========================================
// 显式变体代替 +inf: NoCapacityGain = 无法释放容量
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestowRatio {
    Value(f64),
    NoCapacityGain,
}

impl RestowRatio {
    /// 由分子/分母构造,分母为 0 → NoCapacityGain
    pub fn from_parts(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            RestowRatio::NoCapacityGain
        } else {
            RestowRatio::Value(numerator / denominator)
        }
    }

    /// 数值视图: NoCapacityGain → +infinity
    pub fn as_f64(&self) -> f64 {
        match self {
            RestowRatio::Value(v) => *v,
            RestowRatio::NoCapacityGain => f64::INFINITY,
        }
    }
}

// ==========================================
// HatchSectionRestow - 舱盖分区汇总
// ==========================================
// 舱内列聚合 ⋈ 甲板分舱聚合 (按舱盖分区)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HatchSectionRestow {
    pub hatch_section: HatchSectionId,
    pub hold_subbays: Vec<SubbayId>,
    pub deck_subbays: Vec<SubbayId>,
    pub teu_empty_on_hold: u32,
    pub light_teu_on_hold: u32,
    pub light_containers_in_hold: u32,
    pub containers_on_deck: u32,
    pub extra_weight_loadable_on_hold: f64,
    pub hold_is_restowable: bool,
    pub deck_is_restowable: bool,
    pub is_restowable: bool,
    pub ratio_restow_heavy_hold: RestowRatio,
}

// ==========================================
// RestowReport - 倒箱分析报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RestowReport {
    pub hold_stacks: Vec<HoldStackRestow>,
    pub deck_subbays: Vec<DeckSubbayRestow>,
    pub hatch_sections: Vec<HatchSectionRestow>,
}
