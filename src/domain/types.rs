// ==========================================
// 集装箱船配载分析 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 港口序号（在轮转中的位置，始终对轮转长度 N 取模）
pub type PortSeq = u16;

/// 甲板层判定阈值: tier >= 50 为甲板
pub const DECK_TIER_THRESHOLD: u8 = 50;

// ==========================================
// 宏观层 (Macro Tier)
// ==========================================
// 舱内(0) / 甲板(1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MacroTier {
    Hold, // 舱内
    Deck, // 甲板
}

impl MacroTier {
    /// 由层号推导宏观层
    pub fn from_tier(tier: u8) -> Self {
        if tier >= DECK_TIER_THRESHOLD {
            MacroTier::Deck
        } else {
            MacroTier::Hold
        }
    }

    /// 数字编码 (舱内=0, 甲板=1)
    pub fn code(&self) -> u8 {
        match self {
            MacroTier::Hold => 0,
            MacroTier::Deck => 1,
        }
    }
}

impl fmt::Display for MacroTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroTier::Hold => write!(f, "HOLD"),
            MacroTier::Deck => write!(f, "DECK"),
        }
    }
}

// ==========================================
// 轻重箱等级 (Weight Class)
// ==========================================
// 红线: 不是固定阈值,由轻重拆分算法按实际货物组合推导
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeightClass {
    #[serde(rename = "L")]
    Light, // 轻箱
    #[serde(rename = "H")]
    Heavy, // 重箱
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightClass::Light => write!(f, "L"),
            WeightClass::Heavy => write!(f, "H"),
        }
    }
}

// ==========================================
// 箱型尺寸 (Container Size)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContainerSize {
    #[serde(rename = "20")]
    Twenty,
    #[serde(rename = "40")]
    Forty,
    #[serde(rename = "45")]
    FortyFive,
}

impl ContainerSize {
    /// 从尺寸代码解析（"20"/"40"/"45"，也接受 ISO 尺寸类型首位 2/4/L）
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "20" | "2" => Some(ContainerSize::Twenty),
            "40" | "4" => Some(ContainerSize::Forty),
            "45" | "L" => Some(ContainerSize::FortyFive),
            _ => None,
        }
    }

    /// TEU 折算: 20' = 1, 40'/45' = 2
    pub fn teu(&self) -> u32 {
        match self {
            ContainerSize::Twenty => 1,
            _ => 2,
        }
    }

    pub fn is_twenty(&self) -> bool {
        matches!(self, ContainerSize::Twenty)
    }
}

impl fmt::Display for ContainerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerSize::Twenty => write!(f, "20"),
            ContainerSize::Forty => write!(f, "40"),
            ContainerSize::FortyFive => write!(f, "45"),
        }
    }
}

// ==========================================
// 在船状态 (Cargo Status)
// ==========================================
// 按轮转判定: 当前港位于 [装港, 卸港) 内为在船, 否则待装
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CargoStatus {
    Onboard,  // 在船
    Loadlist, // 待装
}

impl fmt::Display for CargoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CargoStatus::Onboard => write!(f, "ONBOARD"),
            CargoStatus::Loadlist => write!(f, "LOADLIST"),
        }
    }
}

// ==========================================
// 快照类型 (Snapshot Kind)
// ==========================================
// 到港快照 / 离港快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotKind {
    Arrival,
    Departure,
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotKind::Arrival => write!(f, "ARRIVAL"),
            SnapshotKind::Departure => write!(f, "DEPARTURE"),
        }
    }
}

// ==========================================
// 舷侧 (Board Side)
// ==========================================
// 排号奇数 = 右舷, 偶数 = 左舷, 00 = 中线
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardSide {
    Left,
    Right,
    Centre,
}

impl BoardSide {
    pub fn from_row(row: u8) -> Self {
        if row == 0 {
            BoardSide::Centre
        } else if row % 2 == 0 {
            BoardSide::Left
        } else {
            BoardSide::Right
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_tier_threshold() {
        assert_eq!(MacroTier::from_tier(48), MacroTier::Hold);
        assert_eq!(MacroTier::from_tier(50), MacroTier::Deck);
        assert_eq!(MacroTier::from_tier(82), MacroTier::Deck);
    }

    #[test]
    fn test_size_teu() {
        assert_eq!(ContainerSize::from_code("20").map(|s| s.teu()), Some(1));
        assert_eq!(ContainerSize::from_code("45").map(|s| s.teu()), Some(2));
        assert_eq!(ContainerSize::from_code("53"), None);
    }

    #[test]
    fn test_board_side() {
        assert_eq!(BoardSide::from_row(0), BoardSide::Centre);
        assert_eq!(BoardSide::from_row(1), BoardSide::Right);
        assert_eq!(BoardSide::from_row(2), BoardSide::Left);
    }
}
