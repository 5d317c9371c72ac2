// ==========================================
// 集装箱船配载分析 - 领域模型层
// ==========================================
// 职责: 定义网格地址、箱组、内容图、压箱/倒箱/KPI 值类型
// 红线: 不含引擎逻辑,不含 I/O
// ==========================================

pub mod cargo;
pub mod content;
pub mod grid;
pub mod kpi;
pub mod overstow;
pub mod restow;
pub mod types;
pub mod vessel;

// 重导出核心类型
pub use cargo::{ContainerGroup, ContainerRecord, MacroGroup, PlacedContainer};
pub use content::{Load, SubbayContentMap};
pub use grid::{HatchSectionId, Slot, Stack, SubbayId};
pub use kpi::{KpiMetric, LegKpis};
pub use overstow::{
    OverstowMove, OverstowRecord, OverstowSource, SlotOverstow, SlotOverstowCount, SlotOverstowKey,
};
pub use restow::{
    DeckSubbayRestow, HatchSectionRestow, HoldStackRestow, RestowExclusions, RestowRatio,
    RestowReport,
};
pub use types::{
    BoardSide, CargoStatus, ContainerSize, MacroTier, PortSeq, SnapshotKind, WeightClass,
};
pub use vessel::{PortCall, StackReference, SubbayCapacity, VesselReference};
