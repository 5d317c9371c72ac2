// ==========================================
// 集装箱船配载分析 - 引擎层
// ==========================================
// 职责: 无状态分析引擎,输入只读快照,输出新值
// 红线: 引擎不做 I/O, 不读全局状态
// ==========================================

pub mod aggregator;
pub mod error;
pub mod grid;
pub mod kpi;
pub mod orchestrator;
pub mod overstow;
pub mod restow;
pub mod rotation;
pub mod weight_split;

// 重导出核心引擎
pub use aggregator::{AggregationOutput, ContainerGroupAggregator};
pub use error::{EngineError, EngineResult, LegIssue};
pub use grid::{GridModel, SubbayInfo};
pub use kpi::{KpiEngine, KpiInput};
pub use orchestrator::{LegInput, LegOrchestrator, LegReport};
pub use overstow::{OverstowDetection, OverstowDetector, SlotBlockingReport};
pub use restow::RestowEngine;
pub use rotation::PortRotation;
pub use weight_split::{classify_weight, light_heavy_boundary, WeightSplitter};
