// ==========================================
// 集装箱船配载分析 - KPI 领域模型
// ==========================================
// 输出: 按指标名索引的 KPI 字典
//       港口级 / 贝位级 / 分舱级 三层明细
// ==========================================

use crate::domain::grid::SubbayId;
use crate::domain::types::PortSeq;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// KpiMetric - 指标名
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiMetric {
    // ===== 基础流量 =====
    QuantityAtArrival,
    QuantityDischarged,
    QuantityToLoad,
    QuantityLoaded,
    QuantityAtDepart,
    WeightAtArrival,
    WeightDischarged,
    WeightToLoad,
    WeightLoaded,
    WeightAtDepart,
    TeuAtArrival,
    TeuDischarged,
    TeuToLoad,
    TeuLoaded,
    TeuAtDepart,

    // ===== 派生流量 =====
    Rob,
    HcMove,
    HcRestow,
    HcObligatoryRestow,
    ExtraMove,
    EffectiveLoad,
    Garbage,

    // ===== 岸桥 =====
    DualCycling,
    CraneSplit,
    CraneWorkloadTotal,
    IdealDualCycling,
    IdealCraneSplit,

    // ===== 装载率/重量分布 =====
    HoldTeuEmptyRatio,
    DeckTeuEmptyRatio,
    ReeferUtilization,
    WeightDiffLeftRight,
}

impl fmt::Display for KpiMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 与序列化名称保持一致
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(|s| s.to_string()))
            .unwrap_or_default();
        write!(f, "{}", name)
    }
}

// ==========================================
// LegKpis - 单航段 KPI 字典
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LegKpis {
    pub port_name: String,
    pub port_seq: PortSeq,
    pub port: BTreeMap<KpiMetric, f64>,
    pub bay: BTreeMap<KpiMetric, BTreeMap<u16, f64>>,
    pub subbay: BTreeMap<KpiMetric, BTreeMap<SubbayId, f64>>,
}

impl LegKpis {
    pub fn new(port_name: &str, port_seq: PortSeq) -> Self {
        Self {
            port_name: port_name.to_string(),
            port_seq,
            ..Default::default()
        }
    }

    pub fn set_port(&mut self, metric: KpiMetric, value: f64) {
        self.port.insert(metric, value);
    }

    pub fn set_bay(&mut self, metric: KpiMetric, bay: u16, value: f64) {
        self.bay.entry(metric).or_default().insert(bay, value);
    }

    pub fn set_subbay(&mut self, metric: KpiMetric, subbay: &SubbayId, value: f64) {
        self.subbay
            .entry(metric)
            .or_default()
            .insert(subbay.clone(), value);
    }

    /// 港口级指标,缺失视为 0
    pub fn port_value(&self, metric: KpiMetric) -> f64 {
        self.port.get(&metric).copied().unwrap_or(0.0)
    }

    pub fn bay_value(&self, metric: KpiMetric, bay: u16) -> f64 {
        self.bay
            .get(&metric)
            .and_then(|by_bay| by_bay.get(&bay))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn subbay_value(&self, metric: KpiMetric, subbay: &SubbayId) -> f64 {
        self.subbay
            .get(&metric)
            .and_then(|by_subbay| by_subbay.get(subbay))
            .copied()
            .unwrap_or(0.0)
    }
}
