// ==========================================
// 集装箱船配载分析 - 分析配置读取 Trait
// ==========================================
// 职责: 定义分析引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// AnalysisConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait AnalysisConfigReader: Send + Sync {
    // ===== 轮转 =====

    /// 获取轮转参考起点
    ///
    /// # 默认值
    /// - 0
    async fn get_leg_offset(&self) -> Result<u16, Box<dyn Error>>;

    // ===== 轻重拆分 =====

    /// 获取 20' 轻箱均重阈值（0.1 吨）
    ///
    /// # 默认值
    /// - 100
    async fn get_light_threshold_20(&self) -> Result<u32, Box<dyn Error>>;

    /// 获取 40'/45' 轻箱均重阈值（0.1 吨）
    ///
    /// # 默认值
    /// - 150
    async fn get_light_threshold_40(&self) -> Result<u32, Box<dyn Error>>;

    // ===== 倒箱 =====

    /// 获取舱内列剩余重量下限（吨）
    ///
    /// # 默认值
    /// - 30.0
    async fn get_restow_weight_margin_t(&self) -> Result<f64, Box<dyn Error>>;

    // ===== 岸桥 =====

    /// 获取双循环收益系数
    ///
    /// # 默认值
    /// - 0.5
    async fn get_dual_cycling_gain(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取舱盖开关耗时（小时）
    ///
    /// # 默认值
    /// - 1.0
    async fn get_hc_move_time(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取缺省单桥效率（move/h）
    ///
    /// # 默认值
    /// - 25.0
    async fn get_default_crane_speed(&self) -> Result<f64, Box<dyn Error>>;

    // ===== 冷箱 =====

    /// 获取冷箱箱型代码前缀
    ///
    /// # 默认值
    /// - "R"
    async fn get_reefer_type_prefix(&self) -> Result<String, Box<dyn Error>>;
}
