// ==========================================
// 集装箱船配载分析 - 船舶网格地址
// ==========================================
// 职责: 箱位 ↔ 列 ↔ 分舱 地址的值类型
// 红线: 组合键一律使用结构体,不使用位置元组
// ==========================================

use crate::domain::types::MacroTier;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Slot - 箱位 (bay, row, tier)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub bay: u16,
    pub row: u8,
    pub tier: u8,
}

impl Slot {
    pub fn new(bay: u16, row: u8, tier: u8) -> Self {
        Self { bay, row, tier }
    }

    /// 解析箱位代码
    ///
    /// # 格式
    /// - 6 位: BBRRTT
    /// - 7 位: BBBRRTT
    ///
    /// # 返回
    /// - None: 非纯数字或长度不符
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        if !(code.len() == 6 || code.len() == 7) || !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let split = code.len() - 4;
        let bay = code[..split].parse::<u16>().ok()?;
        let row = code[split..split + 2].parse::<u8>().ok()?;
        let tier = code[split + 2..].parse::<u8>().ok()?;
        Some(Self { bay, row, tier })
    }

    pub fn macro_tier(&self) -> MacroTier {
        MacroTier::from_tier(self.tier)
    }

    /// 所在列
    pub fn stack(&self) -> Stack {
        Stack {
            bay: self.bay,
            row: self.row,
            macro_tier: self.macro_tier(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}{:02}", self.bay, self.row, self.tier)
    }
}

// ==========================================
// Stack - 列 (bay, row, macro_tier)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Stack {
    pub bay: u16,
    pub row: u8,
    pub macro_tier: MacroTier,
}

impl Stack {
    pub fn new(bay: u16, row: u8, macro_tier: MacroTier) -> Self {
        Self { bay, row, macro_tier }
    }

    /// 同贝同排的另一宏观层
    pub fn with_macro_tier(&self, macro_tier: MacroTier) -> Self {
        Self { macro_tier, ..*self }
    }

    pub fn with_bay(&self, bay: u16) -> Self {
        Self { bay, ..*self }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{}", self.bay, self.row, self.macro_tier.code())
    }
}

// ==========================================
// SubbayId - 分舱代码 (4 位)
// ==========================================
// 空字符串保留给"未装船"(待装清单)货物
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct SubbayId(String);

impl SubbayId {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// 待装清单键
    pub fn loadlist() -> Self {
        Self(String::new())
    }

    pub fn is_loadlist(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 舱盖分区: 去掉末位
    pub fn hatch_section(&self) -> HatchSectionId {
        let mut chars = self.0.chars();
        chars.next_back();
        HatchSectionId(chars.as_str().to_string())
    }
}

impl fmt::Display for SubbayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SubbayId {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

// ==========================================
// HatchSectionId - 舱盖分区
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HatchSectionId(String);

impl HatchSectionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HatchSectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
