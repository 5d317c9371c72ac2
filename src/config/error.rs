// ==========================================
// 集装箱船配载分析 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置库访问失败: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("配置快照格式错误: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("锁获取失败: {0}")]
    Lock(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
