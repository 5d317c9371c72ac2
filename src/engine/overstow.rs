// ==========================================
// 集装箱船配载分析 - 压箱检测引擎
// ==========================================
// 红线: 只读输入快照,修正结果以新内容图返回
// 红线: 数据一致性问题报告并跳过,不中断航段
// ==========================================
// 职责:
// (a) 单箱级阻塞检测 (自下而上)
// (b) 分舱/CG 级多航段压箱修正 + 倒箱重装
// (c) 到港压箱在离港快照中的虚拟重装
// ==========================================
// 注: 压箱港须满足 < N (轮转长度),落在下一轮的压箱关系被截断
// ==========================================

mod blocking;
mod correction;
mod detection;


pub use blocking::SlotBlockingReport;
pub use detection::OverstowDetection;

use crate::engine::grid::GridModel;
use crate::engine::rotation::PortRotation;

// ==========================================
// OverstowDetector - 压箱检测器
// ==========================================
pub struct OverstowDetector<'a> {
    grid: &'a GridModel,
    rotation: &'a PortRotation,
}

impl<'a> OverstowDetector<'a> {
    pub fn new(grid: &'a GridModel, rotation: &'a PortRotation) -> Self {
        Self { grid, rotation }
    }
}
