// ==========================================
// 集装箱船配载分析 - 箱货领域模型
// ==========================================

use crate::domain::grid::{Slot, Stack, SubbayId};
use crate::domain::types::{ContainerSize, PortSeq, WeightClass};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ContainerRecord - 单箱记录 (外部输入)
// ==========================================
// 由 EDI/BAPLIE/CSV 解析方提供,本系统只消费类型化记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub container_id: String,
    pub load_port: String,      // 装港名称
    pub discharge_port: String, // 卸港名称
    pub size: ContainerSize,
    pub type_code: String, // 箱型代码 (GP/RE/OT...)
    #[serde(default)]
    pub height: String, // 高度等级 (""=标准, "HC"=高箱)
    pub weight_t: f64,  // 重量 (吨)

    #[serde(default)]
    pub setting: Option<String>, // 冷箱设定温度
    #[serde(default)]
    pub empty: bool,
    #[serde(default)]
    pub slot: Option<String>, // 箱位代码,None/空 = 未装船

    // ===== 倒箱排除条件 =====
    #[serde(default)]
    pub dg_class: Option<String>, // 危险品类别
    #[serde(default)]
    pub oog_left: bool, // 左侧超限
    #[serde(default)]
    pub oog_right: bool, // 右侧超限
}

impl ContainerRecord {
    /// 是否已装船（箱位代码非空）
    pub fn has_slot(&self) -> bool {
        self.slot.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
    }

    /// 重量 (0.1 吨)
    pub fn weight_decitons(&self) -> u32 {
        (self.weight_t * 10.0).round().max(0.0) as u32
    }
}

// ==========================================
// MacroGroup - 不含轻重等级的分组键
// ==========================================
// 用途: 轻重拆分算法的统计口径
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MacroGroup {
    pub load_port_seq: PortSeq,
    pub discharge_port_seq: PortSeq,
    pub size: ContainerSize,
    pub type_code: String,
    pub height: String,
}

impl MacroGroup {
    pub fn with_weight_class(self, weight_class: WeightClass) -> ContainerGroup {
        ContainerGroup {
            load_port_seq: self.load_port_seq,
            discharge_port_seq: self.discharge_port_seq,
            size: self.size,
            type_code: self.type_code,
            weight_class,
            height: self.height,
        }
    }
}

// ==========================================
// ContainerGroup - 箱组 (CG)
// ==========================================
// 键: (装港序号, 卸港序号, 尺寸, 箱型, 轻重, 高度)
// 红线: load_port_seq != discharge_port_seq
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContainerGroup {
    pub load_port_seq: PortSeq,
    pub discharge_port_seq: PortSeq,
    pub size: ContainerSize,
    pub type_code: String,
    pub weight_class: WeightClass,
    pub height: String,
}

impl ContainerGroup {
    /// 替换装/卸港序号,其余属性不变
    pub fn with_ports(&self, load_port_seq: PortSeq, discharge_port_seq: PortSeq) -> Self {
        Self {
            load_port_seq,
            discharge_port_seq,
            ..self.clone()
        }
    }

    pub fn macro_group(&self) -> MacroGroup {
        MacroGroup {
            load_port_seq: self.load_port_seq,
            discharge_port_seq: self.discharge_port_seq,
            size: self.size,
            type_code: self.type_code.clone(),
            height: self.height.clone(),
        }
    }

    /// 单箱 TEU
    pub fn teu_per_unit(&self) -> u32 {
        self.size.teu()
    }

    pub fn is_heavy(&self) -> bool {
        matches!(self.weight_class, WeightClass::Heavy)
    }
}

impl fmt::Display for ContainerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},'{}','{}','{}','{}')",
            self.load_port_seq,
            self.discharge_port_seq,
            self.size,
            self.type_code,
            self.weight_class,
            self.height
        )
    }
}

// ==========================================
// PlacedContainer - 已解析的单箱
// ==========================================
// 聚合器输出: 箱位/列/分舱已解析,轻重等级已确定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedContainer {
    pub container_id: String,
    pub slot: Option<Slot>,
    pub stack: Option<Stack>,
    pub subbay: SubbayId,
    pub tier_index: Option<u8>,
    pub group: ContainerGroup,
    pub weight_t: f64,
    pub empty: bool,
    pub reefer: bool,
    pub dg_class: Option<String>,
    pub oog_left: bool,
    pub oog_right: bool,
}

impl PlacedContainer {
    pub fn is_placed(&self) -> bool {
        self.slot.is_some()
    }

    /// 危险品 1 类或 7 类（倒箱排除条件）
    pub fn is_dangerous_1_or_7(&self) -> bool {
        match self.dg_class.as_deref() {
            Some(class) => {
                let main = class.trim().split('.').next().unwrap_or("");
                main == "1" || main == "7"
            }
            None => false,
        }
    }
}
