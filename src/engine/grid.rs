// ==========================================
// 集装箱船配载分析 - 网格模型
// ==========================================
// 职责: 箱位 ↔ 列 ↔ 分舱 寻址, 舱内/甲板分类, 相邻列几何
// 输入: 船舶参考数据 (列表 + 分舱容量表)
// 红线: 一次构建,只读共享 (可跨线程 Arc 共享)
// ==========================================

use crate::domain::grid::{HatchSectionId, Slot, Stack, SubbayId};
use crate::domain::types::{BoardSide, MacroTier};
use crate::domain::vessel::{StackReference, SubbayCapacity, VesselReference};
use crate::engine::error::{EngineError, EngineResult};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

// ==========================================
// SubbayInfo - 分舱派生信息
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SubbayInfo {
    pub subbay: SubbayId,
    pub macro_tier: MacroTier,
    pub hatch_section: HatchSectionId,
    pub bays: BTreeSet<u16>,
    pub rows: BTreeSet<u8>,
    pub crane_bay: u16,
    pub side: BoardSide,
    pub nb_reefer_slots: u32,
    pub teu_capacity: u32,
}

// ==========================================
// GridModel - 网格模型
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct GridModel {
    stacks: HashMap<Stack, StackReference>,
    subbays: BTreeMap<SubbayId, SubbayInfo>,
    hatch_sections: BTreeMap<HatchSectionId, Vec<SubbayId>>,
}

impl GridModel {
    /// 由船舶参考数据构建网格模型
    ///
    /// # 说明
    /// - 分舱宏观层取其第一条列记录的宏观层
    /// - 分舱 TEU 容量取容量表; 容量表缺失时取各列 max_slots 之和
    pub fn new(reference: &VesselReference) -> Self {
        let capacities: HashMap<&SubbayId, &SubbayCapacity> = reference
            .subbay_capacities
            .iter()
            .map(|cap| (&cap.subbay, cap))
            .collect();

        let mut stacks = HashMap::new();
        let mut subbays: BTreeMap<SubbayId, SubbayInfo> = BTreeMap::new();

        for row in &reference.stacks {
            stacks.insert(row.stack, row.clone());

            let info = subbays.entry(row.subbay.clone()).or_insert_with(|| SubbayInfo {
                subbay: row.subbay.clone(),
                macro_tier: row.stack.macro_tier,
                hatch_section: row.subbay.hatch_section(),
                bays: BTreeSet::new(),
                rows: BTreeSet::new(),
                crane_bay: crane_bay(row.stack.bay),
                side: BoardSide::Centre,
                nb_reefer_slots: 0,
                teu_capacity: 0,
            });
            if info.macro_tier != row.stack.macro_tier {
                warn!(
                    subbay = %row.subbay,
                    stack = %row.stack,
                    "分舱内存在不同宏观层的列,沿用首条记录"
                );
            }
            info.bays.insert(row.stack.bay);
            info.rows.insert(row.stack.row);
            info.nb_reefer_slots += row.nb_reefer_slots;
            info.teu_capacity += row.max_slots;
        }

        let mut hatch_sections: BTreeMap<HatchSectionId, Vec<SubbayId>> = BTreeMap::new();
        for info in subbays.values_mut() {
            if let Some(cap) = capacities.get(&info.subbay) {
                info.teu_capacity = cap.teu_capacity();
            }
            info.crane_bay = info.bays.iter().next().copied().map(crane_bay).unwrap_or(0);
            info.side = info
                .rows
                .iter()
                .find(|row| **row != 0)
                .map(|row| BoardSide::from_row(*row))
                .unwrap_or(BoardSide::Centre);
            hatch_sections
                .entry(info.hatch_section.clone())
                .or_default()
                .push(info.subbay.clone());
        }

        Self {
            stacks,
            subbays,
            hatch_sections,
        }
    }

    // ==========================================
    // 寻址
    // ==========================================

    /// 箱位所在列
    pub fn stack_of(slot: &Slot) -> Stack {
        slot.stack()
    }

    /// 列参考信息
    pub fn stack_info(&self, stack: &Stack) -> EngineResult<&StackReference> {
        self.stacks.get(stack).ok_or(EngineError::UnknownStack {
            bay: stack.bay,
            row: stack.row,
            macro_tier: stack.macro_tier,
        })
    }

    /// 列所属分舱（查表,缺失 → UnknownStack）
    pub fn subbay_of(&self, stack: &Stack) -> EngineResult<&SubbayId> {
        self.stack_info(stack).map(|info| &info.subbay)
    }

    pub fn hatch_section_of(subbay: &SubbayId) -> HatchSectionId {
        subbay.hatch_section()
    }

    /// 列内层序号 = (tier - first_tier) / 2
    ///
    /// # 错误
    /// - DataConsistency: 层号低于该列起始层
    pub fn tier_index(&self, slot: &Slot) -> EngineResult<u8> {
        let info = self.stack_info(&slot.stack())?;
        let offset = slot.tier.checked_sub(info.first_tier).ok_or_else(|| {
            EngineError::data_consistency(
                format!("slot={}", slot),
                format!("层号 {} 低于列起始层 {}", slot.tier, info.first_tier),
            )
        })?;
        Ok(offset / 2)
    }

    pub fn subbay_info(&self, subbay: &SubbayId) -> EngineResult<&SubbayInfo> {
        self.subbays
            .get(subbay)
            .ok_or_else(|| EngineError::UnknownSubbay(subbay.to_string()))
    }

    pub fn subbays(&self) -> impl Iterator<Item = &SubbayInfo> {
        self.subbays.values()
    }

    pub fn stacks(&self) -> impl Iterator<Item = &StackReference> {
        self.stacks.values()
    }

    pub fn hatch_sections(&self) -> impl Iterator<Item = (&HatchSectionId, &Vec<SubbayId>)> {
        self.hatch_sections.iter()
    }

    // ==========================================
    // 相邻几何
    // ==========================================

    /// 下方/相邻列
    ///
    /// # 规则
    /// - 同宏观层: 按贝号奇偶配对的相邻贝 (1~2 个)
    /// - 甲板列: 另加同贝同排的舱内列
    pub fn adjacent_stacks_below(stack: &Stack) -> Vec<Stack> {
        let mut adjacent: Vec<Stack> = paired_bays(stack.bay)
            .into_iter()
            .map(|bay| stack.with_bay(bay))
            .collect();
        if stack.macro_tier == MacroTier::Deck {
            adjacent.push(stack.with_macro_tier(MacroTier::Hold));
        }
        adjacent
    }

    /// 分舱"下方"的分舱: 甲板分舱 → 同舱盖分区的舱内分舱
    pub fn subbays_below(&self, subbay: &SubbayId) -> Vec<&SubbayId> {
        let info = match self.subbays.get(subbay) {
            Some(info) if info.macro_tier == MacroTier::Deck => info,
            _ => return Vec::new(),
        };
        self.hatch_sections
            .get(&info.hatch_section)
            .map(|members| {
                members
                    .iter()
                    .filter(|member| {
                        self.subbays
                            .get(*member)
                            .map(|m| m.macro_tier == MacroTier::Hold)
                            .unwrap_or(false)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ==========================================
// 贝号奇偶规则 (纯函数)
// ==========================================

/// 贝号配对
///
/// # 规则
/// - bay % 4 == 1 → bay + 1
/// - bay % 4 == 3 → bay - 1
/// - 其他 → bay - 1 与 bay + 1
pub fn paired_bays(bay: u16) -> Vec<u16> {
    match bay % 4 {
        1 => vec![bay + 1],
        3 => vec![bay - 1],
        _ if bay == 0 => vec![bay + 1],
        _ => vec![bay - 1, bay + 1],
    }
}

/// 岸桥分组贝（宏观贝）
///
/// 两个 20' 贝归入中间的 40' 贝, 40' 贝归自身
pub fn crane_bay(bay: u16) -> u16 {
    match bay % 4 {
        1 => bay + 1,
        3 => bay - 1,
        _ => bay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> VesselReference {
        let row = |bay: u16, r: u8, tier: MacroTier, subbay: &str| StackReference {
            stack: Stack::new(bay, r, tier),
            subbay: SubbayId::from(subbay),
            first_tier: if tier == MacroTier::Deck { 82 } else { 2 },
            max_slots: 4,
            max_weight: 120.0,
            nb_reefer_slots: if tier == MacroTier::Deck { 2 } else { 0 },
        };
        VesselReference {
            stacks: vec![
                row(17, 1, MacroTier::Hold, "1810"),
                row(18, 1, MacroTier::Hold, "1810"),
                row(19, 1, MacroTier::Hold, "1810"),
                row(18, 1, MacroTier::Deck, "1811"),
                row(18, 2, MacroTier::Deck, "1821"),
            ],
            subbay_capacities: vec![SubbayCapacity {
                subbay: SubbayId::from("1810"),
                cap_20_or_40: 6,
                cap_only_20: 2,
                cap_only_40: 0,
            }],
        }
    }

    #[test]
    fn test_paired_bays_parity() {
        assert_eq!(paired_bays(1), vec![2]);
        assert_eq!(paired_bays(3), vec![2]);
        assert_eq!(paired_bays(2), vec![1, 3]);
        assert_eq!(paired_bays(17), vec![18]);
        assert_eq!(paired_bays(19), vec![18]);
    }

    #[test]
    fn test_crane_bay_groups_twenty_foot_bays() {
        assert_eq!(crane_bay(17), 18);
        assert_eq!(crane_bay(18), 18);
        assert_eq!(crane_bay(19), 18);
        assert_eq!(crane_bay(74), 74);
    }

    #[test]
    fn test_adjacent_stacks_below_deck_includes_hold() {
        let deck = Stack::new(18, 1, MacroTier::Deck);
        let adjacent = GridModel::adjacent_stacks_below(&deck);
        assert!(adjacent.contains(&Stack::new(17, 1, MacroTier::Deck)));
        assert!(adjacent.contains(&Stack::new(19, 1, MacroTier::Deck)));
        assert!(adjacent.contains(&Stack::new(18, 1, MacroTier::Hold)));
        assert_eq!(adjacent.len(), 3);

        let hold = Stack::new(17, 1, MacroTier::Hold);
        assert_eq!(
            GridModel::adjacent_stacks_below(&hold),
            vec![Stack::new(18, 1, MacroTier::Hold)]
        );
    }

    #[test]
    fn test_subbay_lookup_and_unknown_stack() {
        let grid = GridModel::new(&reference());
        let stack = Stack::new(18, 1, MacroTier::Deck);
        assert_eq!(grid.subbay_of(&stack).unwrap().as_str(), "1811");

        let missing = Stack::new(42, 1, MacroTier::Deck);
        assert!(matches!(
            grid.subbay_of(&missing),
            Err(EngineError::UnknownStack { bay: 42, .. })
        ));
    }

    #[test]
    fn test_tier_index_steps_of_two() {
        let grid = GridModel::new(&reference());
        assert_eq!(grid.tier_index(&Slot::new(18, 1, 82)).unwrap(), 0);
        assert_eq!(grid.tier_index(&Slot::new(18, 1, 86)).unwrap(), 2);
        assert_eq!(grid.tier_index(&Slot::new(18, 1, 6)).unwrap(), 2);
    }

    #[test]
    fn test_tier_below_first_tier_is_reported() {
        let grid = GridModel::new(&reference());
        // 甲板列起始层 82, 层 80 不存在
        assert!(matches!(
            grid.tier_index(&Slot::new(18, 1, 80)),
            Err(EngineError::DataConsistency { .. })
        ));
    }

    #[test]
    fn test_subbay_info_derivation() {
        let grid = GridModel::new(&reference());
        let hold = grid.subbay_info(&"1810".into()).unwrap();
        assert_eq!(hold.macro_tier, MacroTier::Hold);
        assert_eq!(hold.teu_capacity, 8);
        assert_eq!(hold.crane_bay, 18);
        assert_eq!(hold.side, BoardSide::Right);

        let left = grid.subbay_info(&"1821".into()).unwrap();
        assert_eq!(left.side, BoardSide::Left);
        assert_eq!(left.teu_capacity, 4);
    }

    #[test]
    fn test_subbays_below() {
        let grid = GridModel::new(&reference());
        let below: Vec<&str> = grid
            .subbays_below(&"1811".into())
            .into_iter()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(below, vec!["1810"]);
        assert!(grid.subbays_below(&"1810".into()).is_empty());
        // 1821 的舱盖分区为 182,没有舱内分舱
        assert!(grid.subbays_below(&"1821".into()).is_empty());
    }
}
