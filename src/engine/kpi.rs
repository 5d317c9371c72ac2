// ==========================================
// 集装箱船配载分析 - KPI 推导引擎
// ==========================================
// 职责: 到港 → 离港 两个修正后内容图 → KPI 字典
// 输入: 修正后的到港/离港内容图 + 离港单箱 + 港口轮转行
// 输出: LegKpis (港口级 / 贝位级 / 分舱级)
// ==========================================
// 层次:
// 1. 基础流量 (flows): 到港/卸/待装/装/离港, 数量/重量/TEU
// 2. 派生: rob / hc_* / extra_move / effective_load / garbage
// 3. 岸桥 (crane): 按宏观贝分组的 dual_cycling / crane_split
// 4. 装载率 (ratios): 舱内/甲板空 TEU 比、冷箱插座利用率、左右重量差
// 红线: 无活动 → crane_split = 0; 零容量 → 比值 0.0,不产生 NaN
// ==========================================

mod crane;
mod flows;
mod ratios;


pub use flows::{Flow, SubbayFlows};

use crate::config::AnalysisParams;
use crate::domain::cargo::PlacedContainer;
use crate::domain::content::SubbayContentMap;
use crate::domain::kpi::{KpiMetric, LegKpis};
use crate::domain::types::PortSeq;
use crate::domain::vessel::PortCall;
use crate::engine::grid::GridModel;
use tracing::{debug, instrument};

/// 单航段 KPI 输入
pub struct KpiInput<'i> {
    pub port_seq: PortSeq,
    pub port_call: &'i PortCall,
    pub arrival: &'i SubbayContentMap,
    pub departure: &'i SubbayContentMap,
    pub departure_containers: &'i [PlacedContainer],
}

// ==========================================
// KpiEngine - KPI 推导引擎
// ==========================================
pub struct KpiEngine<'a> {
    grid: &'a GridModel,
    params: &'a AnalysisParams,
}

impl<'a> KpiEngine<'a> {
    pub fn new(grid: &'a GridModel, params: &'a AnalysisParams) -> Self {
        Self { grid, params }
    }

    /// 计算单航段 KPI
    #[instrument(skip(self, input), fields(port = %input.port_call.port_name, port_seq = input.port_seq))]
    pub fn derive(&self, input: &KpiInput<'_>) -> LegKpis {
        let mut kpis = LegKpis::new(&input.port_call.port_name, input.port_seq);

        let flows = self.subbay_flows(input.arrival, input.departure, input.port_seq);
        self.write_flows(&mut kpis, &flows, input.arrival, input.port_seq);
        self.write_crane(&mut kpis, &flows, input.port_call);
        self.write_ratios(&mut kpis, input.departure, input.departure_containers);

        debug!(
            subbays = flows.len(),
            crane_split = kpis.port_value(KpiMetric::CraneSplit),
            garbage = kpis.port_value(KpiMetric::Garbage),
            "KPI 推导完成"
        );
        kpis
    }
}
