// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use stowage_analysis::config::AnalysisConfigReader;
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub leg_offset: u16,
    pub light_threshold_20: u32,
    pub light_threshold_40: u32,
    pub restow_weight_margin_t: f64,
    pub dual_cycling_gain: f64,
    pub hc_move_time: f64,
    pub default_crane_speed: f64,
    pub reefer_type_prefix: String,
    /// 为 true 时所有读取返回错误 (模拟配置库不可用)
    pub broken: bool,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            leg_offset: 0,
            light_threshold_20: 100,
            light_threshold_40: 150,
            restow_weight_margin_t: 30.0,
            dual_cycling_gain: 0.5,
            hc_move_time: 1.0,
            default_crane_speed: 25.0,
            reefer_type_prefix: "R".to_string(),
            broken: false,
        }
    }

    /// 自定义岸桥参数
    pub fn with_crane(gain: f64, hc_move_time: f64) -> Self {
        let mut config = Self::default();
        config.dual_cycling_gain = gain;
        config.hc_move_time = hc_move_time;
        config
    }

    /// 读取一律失败的配置
    pub fn broken() -> Self {
        let mut config = Self::default();
        config.broken = true;
        config
    }

    fn check(&self) -> Result<(), Box<dyn Error>> {
        if self.broken {
            return Err("mock 配置库不可用".into());
        }
        Ok(())
    }
}

#[async_trait]
impl AnalysisConfigReader for MockConfig {
    async fn get_leg_offset(&self) -> Result<u16, Box<dyn Error>> {
        self.check()?;
        Ok(self.leg_offset)
    }

    async fn get_light_threshold_20(&self) -> Result<u32, Box<dyn Error>> {
        self.check()?;
        Ok(self.light_threshold_20)
    }

    async fn get_light_threshold_40(&self) -> Result<u32, Box<dyn Error>> {
        self.check()?;
        Ok(self.light_threshold_40)
    }

    async fn get_restow_weight_margin_t(&self) -> Result<f64, Box<dyn Error>> {
        self.check()?;
        Ok(self.restow_weight_margin_t)
    }

    async fn get_dual_cycling_gain(&self) -> Result<f64, Box<dyn Error>> {
        self.check()?;
        Ok(self.dual_cycling_gain)
    }

    async fn get_hc_move_time(&self) -> Result<f64, Box<dyn Error>> {
        self.check()?;
        Ok(self.hc_move_time)
    }

    async fn get_default_crane_speed(&self) -> Result<f64, Box<dyn Error>> {
        self.check()?;
        Ok(self.default_crane_speed)
    }

    async fn get_reefer_type_prefix(&self) -> Result<String, Box<dyn Error>> {
        self.check()?;
        Ok(self.reefer_type_prefix.clone())
    }
}
