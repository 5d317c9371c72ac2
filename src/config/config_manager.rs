// ==========================================
// 集装箱船配载分析 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写、快照
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::analysis_config_trait::AnalysisConfigReader;
use crate::config::error::{ConfigError, ConfigResult};
use crate::db::{ensure_config_schema, open_sqlite_connection};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 配置库文件路径（不存在则创建）
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 内存配置库（全部取默认值,用于测试与一次性运行）
    pub fn in_memory() -> ConfigResult<Self> {
        let conn = Connection::open_in_memory()?;
        ensure_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> ConfigResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::Lock(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.lock()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取数值配置,格式错误时告警并回落默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr + Copy,
    {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(config_key = key, raw_value = %raw, "配置值格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 随分析报告记录所用配置,保证结果可复现
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.lock()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    /// 从快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 此方法会覆盖现有的 global 配置
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

// ==========================================
// AnalysisConfigReader Trait 实现
// ==========================================
#[async_trait]
impl AnalysisConfigReader for ConfigManager {
    async fn get_leg_offset(&self) -> Result<u16, Box<dyn Error>> {
        Ok(self.get_parsed_or_default(config_keys::LEG_OFFSET, 0u16)?)
    }

    async fn get_light_threshold_20(&self) -> Result<u32, Box<dyn Error>> {
        Ok(self.get_parsed_or_default(config_keys::LIGHT_THRESHOLD_20, 100u32)?)
    }

    async fn get_light_threshold_40(&self) -> Result<u32, Box<dyn Error>> {
        Ok(self.get_parsed_or_default(config_keys::LIGHT_THRESHOLD_40, 150u32)?)
    }

    async fn get_restow_weight_margin_t(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.get_parsed_or_default(config_keys::RESTOW_WEIGHT_MARGIN_T, 30.0f64)?)
    }

    async fn get_dual_cycling_gain(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.get_parsed_or_default(config_keys::DUAL_CYCLING_GAIN, 0.5f64)?)
    }

    async fn get_hc_move_time(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.get_parsed_or_default(config_keys::HC_MOVE_TIME, 1.0f64)?)
    }

    async fn get_default_crane_speed(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.get_parsed_or_default(config_keys::DEFAULT_CRANE_SPEED, 25.0f64)?)
    }

    async fn get_reefer_type_prefix(&self) -> Result<String, Box<dyn Error>> {
        let value = self
            .get_config_value(config_keys::REEFER_TYPE_PREFIX)?
            .map(|v| v.trim().to_uppercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "R".to_string());
        Ok(value)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 轮转
    pub const LEG_OFFSET: &str = "leg_offset";

    // 轻重拆分 (0.1 吨)
    pub const LIGHT_THRESHOLD_20: &str = "light_threshold_20";
    pub const LIGHT_THRESHOLD_40: &str = "light_threshold_40";

    // 倒箱
    pub const RESTOW_WEIGHT_MARGIN_T: &str = "restow_weight_margin_t";

    // 岸桥
    pub const DUAL_CYCLING_GAIN: &str = "dual_cycling_gain";
    pub const HC_MOVE_TIME: &str = "hc_move_time";
    pub const DEFAULT_CRANE_SPEED: &str = "default_crane_speed";

    // 冷箱
    pub const REEFER_TYPE_PREFIX: &str = "reefer_type_prefix";
}
