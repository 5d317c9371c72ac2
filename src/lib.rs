// ==========================================
// 集装箱船配载分析 - 核心库
// ==========================================
// 技术栈: Rust + SQLite (配置存储)
// 系统定位: 批处理分析 (逐航段纯函数计算)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 值类型
pub mod domain;

// 引擎层 - 分析规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    BoardSide, CargoStatus, ContainerSize, MacroTier, PortSeq, SnapshotKind, WeightClass,
};

// 领域实体
pub use domain::{
    ContainerGroup, ContainerRecord, KpiMetric, LegKpis, Load, OverstowMove, OverstowRecord,
    PortCall, RestowReport, Slot, Stack, SubbayContentMap, SubbayId, VesselReference,
};

// 引擎
pub use engine::{
    ContainerGroupAggregator, EngineError, EngineResult, GridModel, KpiEngine, LegInput,
    LegOrchestrator, LegReport, OverstowDetector, PortRotation, RestowEngine,
};

// 配置
pub use config::{AnalysisConfigReader, AnalysisParams, ConfigManager};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "集装箱船配载分析";
