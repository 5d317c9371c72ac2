// ==========================================
// 集装箱船配载分析 - 配置层
// ==========================================
// 职责: 系统配置管理,替代脚本级全局参数
// 存储: config_kv 表
// ==========================================

pub mod analysis_config_trait;
pub mod analysis_params;
pub mod config_manager;
pub mod error;

// 重导出核心配置管理器
pub use analysis_config_trait::AnalysisConfigReader;
pub use analysis_params::AnalysisParams;
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
