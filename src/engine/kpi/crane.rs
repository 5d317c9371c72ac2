// ==========================================
// 集装箱船配载分析 - 岸桥 KPI
// ==========================================
// 规则 (按宏观贝分组):
// - dual_cycling = min(discharged, effective_load) × gain
// - crane_split = discharged + effective_load - dual_cycling
//                 + 2 × hc_restow + hc_move_time × crane_speed × hc_move
// - 港口级 crane_split = 各组最大值 (瓶颈贝决定总作业时间)
// - ideal_*: 全部贝视为一组, ideal_crane_split = 总作业量 / 岸桥数
// ==========================================

use super::flows::SubbayFlows;
use super::KpiEngine;
use crate::domain::grid::SubbayId;
use crate::domain::kpi::{KpiMetric, LegKpis};
use crate::domain::vessel::PortCall;
use std::collections::BTreeMap;

/// 岸桥分组累计量
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(super) struct CraneGroup {
    pub discharged: f64,
    pub effective_load: f64,
    pub hc_restow: f64,
    pub hc_move: f64,
}

impl CraneGroup {
    fn absorb(&mut self, flow: &SubbayFlows) {
        self.discharged += flow.discharged.quantity;
        self.effective_load += flow.effective_load;
        self.hc_restow += flow.hc_restow;
        if flow.hc_move {
            self.hc_move += 1.0;
        }
    }

    /// (dual_cycling, crane_split)
    pub fn workload(&self, gain: f64, hc_move_time: f64, crane_speed: f64) -> (f64, f64) {
        let dual_cycling = self.discharged.min(self.effective_load).max(0.0) * gain;
        let crane_split = self.discharged + self.effective_load - dual_cycling
            + 2.0 * self.hc_restow
            + hc_move_time * crane_speed * self.hc_move;
        (dual_cycling, crane_split.max(0.0))
    }
}

impl<'a> KpiEngine<'a> {
    pub(super) fn write_crane(
        &self,
        kpis: &mut LegKpis,
        flows: &BTreeMap<SubbayId, SubbayFlows>,
        port_call: &PortCall,
    ) {
        let gain = self.params.dual_cycling_gain;
        let hc_move_time = self.params.hc_move_time;
        let crane_speed = port_call
            .crane_single_speed
            .unwrap_or(self.params.default_crane_speed);

        let mut groups: BTreeMap<u16, CraneGroup> = BTreeMap::new();
        let mut global = CraneGroup::default();
        for flow in flows.values() {
            groups.entry(flow.crane_bay).or_default().absorb(flow);
            global.absorb(flow);
        }

        let mut max_split = 0.0f64;
        let mut total_split = 0.0;
        let mut total_dual = 0.0;
        for (bay, group) in &groups {
            let (dual_cycling, crane_split) = group.workload(gain, hc_move_time, crane_speed);
            kpis.set_bay(KpiMetric::QuantityDischarged, *bay, group.discharged);
            kpis.set_bay(KpiMetric::EffectiveLoad, *bay, group.effective_load);
            kpis.set_bay(KpiMetric::HcRestow, *bay, group.hc_restow);
            kpis.set_bay(KpiMetric::HcMove, *bay, group.hc_move);
            kpis.set_bay(KpiMetric::DualCycling, *bay, dual_cycling);
            kpis.set_bay(KpiMetric::CraneSplit, *bay, crane_split);
            max_split = max_split.max(crane_split);
            total_split += crane_split;
            total_dual += dual_cycling;
        }

        kpis.set_port(KpiMetric::DualCycling, total_dual);
        kpis.set_port(KpiMetric::CraneSplit, max_split);
        kpis.set_port(KpiMetric::CraneWorkloadTotal, total_split);

        let (ideal_dual, ideal_workload) = global.workload(gain, hc_move_time, crane_speed);
        let ideal_split = if port_call.nb_cranes == 0 {
            0.0
        } else {
            ideal_workload / port_call.nb_cranes as f64
        };
        kpis.set_port(KpiMetric::IdealDualCycling, ideal_dual);
        kpis.set_port(KpiMetric::IdealCraneSplit, ideal_split);
    }
}
