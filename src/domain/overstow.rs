// ==========================================
// 集装箱船配载分析 - 压箱领域模型
// ==========================================
// 生命周期: 派生 → 修正在船内容图 → 丢弃
// ==========================================

use crate::domain::cargo::ContainerGroup;
use crate::domain::content::Load;
use crate::domain::grid::{Slot, SubbayId};
use crate::domain::types::PortSeq;
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

// ==========================================
// OverstowRecord - 压箱记录
// ==========================================
// (subbay, CG) → (数量, 重量, 最早阻塞卸港)
// 红线: 数量/重量不超过内容图中对应条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverstowRecord {
    pub subbay: SubbayId,
    pub group: ContainerGroup,
    pub load: Load,
    pub overstow_port_seq: PortSeq,
}

impl OverstowRecord {
    /// 修正后的 CG: 卸港改为压箱港
    pub fn corrected_group(&self) -> ContainerGroup {
        self.group
            .with_ports(self.group.load_port_seq, self.overstow_port_seq)
    }
}

// ==========================================
// OverstowSource - 倒箱来源键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OverstowSource {
    pub subbay: SubbayId,
    pub load_port_seq: PortSeq,
}

// ==========================================
// OverstowMove - 倒箱重装
// ==========================================
// 合成 CG: (压箱港, 原卸港, 尺寸, 箱型, 轻重, 高度)
// sources: (原分舱, 原装港) → (数量, 重量), 累加合并
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverstowMove {
    pub group: ContainerGroup,
    pub load: Load,
    #[serde(serialize_with = "serialize_sources")]
    pub sources: BTreeMap<OverstowSource, Load>,
}

impl OverstowMove {
    pub fn new(group: ContainerGroup) -> Self {
        Self {
            group,
            load: Load::default(),
            sources: BTreeMap::new(),
        }
    }

    /// 累加一个来源（加法合并,不覆盖）
    pub fn add_source(&mut self, source: OverstowSource, load: Load) {
        self.sources.entry(source).or_default().add(load);
        self.load.add(load);
    }

    /// 压箱港（即重装港）
    pub fn overstow_port_seq(&self) -> PortSeq {
        self.group.load_port_seq
    }

    /// 原始卸港
    pub fn original_discharge_seq(&self) -> PortSeq {
        self.group.discharge_port_seq
    }
}

#[derive(Serialize)]
struct SourceEntry<'a> {
    subbay: &'a SubbayId,
    load_port_seq: PortSeq,
    quantity: u32,
    weight: f64,
}

fn serialize_sources<S: Serializer>(
    sources: &BTreeMap<OverstowSource, Load>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(sources.len()))?;
    for (source, load) in sources {
        seq.serialize_element(&SourceEntry {
            subbay: &source.subbay,
            load_port_seq: source.load_port_seq,
            quantity: load.quantity,
            weight: load.weight,
        })?;
    }
    seq.end()
}

// ==========================================
// SlotOverstow - 单箱级压箱
// ==========================================
// 只保留最早的阻塞卸港
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotOverstow {
    pub container_id: String,
    pub slot: Slot,
    pub discharge_port_seq: PortSeq,
    pub blocking_port_seq: PortSeq,
    pub nb_blocking: usize, // 被压的下层箱数
}

// ==========================================
// SlotOverstowKey - 单箱压箱汇总键
// ==========================================
// (上层卸港, 被压下层箱数)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SlotOverstowKey {
    pub discharge_port_seq: PortSeq,
    pub nb_blocking: usize,
}

/// 单箱压箱汇总条目: 键 → 上层箱数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotOverstowCount {
    #[serde(flatten)]
    pub key: SlotOverstowKey,
    pub nb_containers: usize,
}
