// ==========================================
// 集装箱船配载分析 - 船舶参考数据
// ==========================================
// 红线: 一次加载,只读共享,不可修改
// ==========================================

use crate::domain::grid::{Stack, SubbayId};
use crate::domain::types::PortSeq;
use serde::{Deserialize, Serialize};

// ==========================================
// StackReference - 列参考表行
// ==========================================
// (bay, row, macro_tier) → (subbay, first_tier, max_slots, max_weight, nb_reefer_slots)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackReference {
    pub stack: Stack,
    pub subbay: SubbayId,
    pub first_tier: u8,
    pub max_slots: u32,
    pub max_weight: f64, // 列限重 (吨)
    #[serde(default)]
    pub nb_reefer_slots: u32,
}

// ==========================================
// SubbayCapacity - 分舱容量表行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubbayCapacity {
    pub subbay: SubbayId,
    pub cap_20_or_40: u32,
    pub cap_only_20: u32,
    pub cap_only_40: u32,
}

impl SubbayCapacity {
    /// 分舱 TEU 容量
    pub fn teu_capacity(&self) -> u32 {
        self.cap_20_or_40 + self.cap_only_20 + self.cap_only_40
    }
}

// ==========================================
// PortCall - 港口轮转表行
// ==========================================
// (sequence, port_name, nb_cranes, crane_single_speed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortCall {
    pub sequence: PortSeq,
    pub port_name: String,
    #[serde(default = "default_nb_cranes")]
    pub nb_cranes: u32,
    #[serde(default)]
    pub crane_single_speed: Option<f64>, // 单桥效率 (move/h)
}

fn default_nb_cranes() -> u32 {
    1
}

// ==========================================
// VesselReference - 船舶参考数据集
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VesselReference {
    pub stacks: Vec<StackReference>,
    #[serde(default)]
    pub subbay_capacities: Vec<SubbayCapacity>,
}
