// ==========================================
// 集装箱船配载分析 - 引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================
// 传播策略:
// - 记录级错误(箱位格式/未知列)就地恢复,汇总到航段问题列表
// - 数据一致性错误: 报告并跳过,不中断航段
// - 轮转配置错误: 中断该航段计算,返回调用方
// ==========================================

use crate::domain::types::MacroTier;
use serde::Serialize;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== 记录级错误 =====
    #[error("箱位格式错误 (container_id={container_id}): '{slot}'")]
    InvalidSlotFormat { container_id: String, slot: String },

    #[error("未知列: bay={bay} row={row} macro_tier={macro_tier}")]
    UnknownStack {
        bay: u16,
        row: u8,
        macro_tier: MacroTier,
    },

    #[error("未知分舱: {0}")]
    UnknownSubbay(String),

    // ===== 数据一致性错误 =====
    #[error("数据一致性错误 ({context}): {message}")]
    DataConsistency { context: String, message: String },

    // ===== 配置错误 =====
    #[error("港口轮转配置错误: {0}")]
    RotationConfig(String),

    #[error("配置值错误 (key: {key}): {message}")]
    Config { key: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    Internal(String),
}

impl EngineError {
    /// 是否可在航段内就地恢复
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidSlotFormat { .. }
                | EngineError::UnknownStack { .. }
                | EngineError::UnknownSubbay(_)
                | EngineError::DataConsistency { .. }
        )
    }

    /// 错误类别名（用于报告）
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidSlotFormat { .. } => "INVALID_SLOT_FORMAT",
            EngineError::UnknownStack { .. } => "UNKNOWN_STACK",
            EngineError::UnknownSubbay(_) => "UNKNOWN_SUBBAY",
            EngineError::DataConsistency { .. } => "DATA_CONSISTENCY",
            EngineError::RotationConfig(_) => "ROTATION_CONFIG",
            EngineError::Config { .. } => "CONFIG",
            EngineError::Internal(_) => "INTERNAL",
        }
    }

    pub fn data_consistency(context: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::DataConsistency {
            context: context.into(),
            message: message.into(),
        }
    }
}

// ==========================================
// LegIssue - 航段问题条目 (可序列化)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegIssue {
    pub kind: String,
    pub message: String,
}

impl From<&EngineError> for LegIssue {
    fn from(err: &EngineError) -> Self {
        LegIssue {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
