// ==========================================
// 集装箱船配载分析 - KPI 基础流量与派生量
// ==========================================
// 规则 (分舱级,数量口径):
// - rob = at_arrival - discharged
// - hc_move (甲板分舱) = 下方舱内分舱本港有卸或装 → 1
// - hc_restow = hc_move 时甲板 rob
// - hc_obligatory_restow = 下方舱内有卸时甲板 rob
// - extra_move = rob + loaded - at_depart
// - effective_load = loaded - extra_move
// 港口级: garbage = to_load - effective_load
// ==========================================

use super::KpiEngine;
use crate::domain::cargo::ContainerGroup;
use crate::domain::content::{Load, SubbayContentMap};
use crate::domain::grid::SubbayId;
use crate::domain::kpi::{KpiMetric, LegKpis};
use crate::domain::types::{MacroTier, PortSeq};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// Flow - 数量 / 重量 / TEU
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Flow {
    pub quantity: f64,
    pub weight: f64,
    pub teu: f64,
}

impl Flow {
    pub fn add(&mut self, group: &ContainerGroup, load: &Load) {
        self.quantity += load.quantity as f64;
        self.weight += load.weight;
        self.teu += (load.quantity * group.teu_per_unit()) as f64;
    }

    pub fn merge(&mut self, other: &Flow) {
        self.quantity += other.quantity;
        self.weight += other.weight;
        self.teu += other.teu;
    }

    pub fn is_zero(&self) -> bool {
        self.quantity == 0.0
    }
}

// ==========================================
// SubbayFlows - 分舱流量
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubbayFlows {
    pub crane_bay: u16,
    pub macro_tier: Option<MacroTier>,
    pub at_arrival: Flow,
    pub discharged: Flow,
    pub loaded: Flow,
    pub at_depart: Flow,
    pub rob: f64,
    pub hc_move: bool,
    pub hc_restow: f64,
    pub hc_obligatory_restow: f64,
    pub extra_move: f64,
    pub effective_load: f64,
}

impl SubbayFlows {
    fn has_activity(&self) -> bool {
        !self.discharged.is_zero() || !self.loaded.is_zero()
    }
}

impl<'a> KpiEngine<'a> {
    /// 分舱级流量 (到港 ∪ 离港 中出现的已装船分舱)
    pub(super) fn subbay_flows(
        &self,
        arrival: &SubbayContentMap,
        departure: &SubbayContentMap,
        port_seq: PortSeq,
    ) -> BTreeMap<SubbayId, SubbayFlows> {
        let subbays: BTreeSet<&SubbayId> = arrival
            .placed_subbays()
            .chain(departure.placed_subbays())
            .map(|(subbay, _)| subbay)
            .collect();

        let mut flows: BTreeMap<SubbayId, SubbayFlows> = BTreeMap::new();
        for subbay in subbays {
            let info = self.grid.subbay_info(subbay).ok();
            let mut flow = SubbayFlows {
                crane_bay: info.map(|i| i.crane_bay).unwrap_or(0),
                macro_tier: info.map(|i| i.macro_tier),
                ..Default::default()
            };

            for (group, load) in arrival.subbay(subbay).into_iter().flatten() {
                flow.at_arrival.add(group, load);
                if group.discharge_port_seq == port_seq {
                    flow.discharged.add(group, load);
                }
            }
            for (group, load) in departure.subbay(subbay).into_iter().flatten() {
                flow.at_depart.add(group, load);
                if group.load_port_seq == port_seq {
                    flow.loaded.add(group, load);
                }
            }

            flow.rob = flow.at_arrival.quantity - flow.discharged.quantity;
            flow.extra_move = flow.rob + flow.loaded.quantity - flow.at_depart.quantity;
            flow.effective_load = flow.loaded.quantity - flow.extra_move;
            flows.insert(subbay.clone(), flow);
        }

        // 舱盖移动: 甲板分舱依赖下方舱内分舱的作业
        let deck_subbays: Vec<SubbayId> = flows
            .iter()
            .filter(|(_, f)| f.macro_tier == Some(MacroTier::Deck))
            .map(|(subbay, _)| subbay.clone())
            .collect();
        for deck in deck_subbays {
            let below = self.grid.subbays_below(&deck);
            let hold_active = below
                .iter()
                .any(|b| flows.get(*b).map_or(false, |f| f.has_activity()));
            let hold_discharged = below
                .iter()
                .any(|b| flows.get(*b).map_or(false, |f| !f.discharged.is_zero()));

            if let Some(flow) = flows.get_mut(&deck) {
                flow.hc_move = hold_active;
                flow.hc_restow = if hold_active { flow.rob } else { 0.0 };
                flow.hc_obligatory_restow = if hold_discharged { flow.rob } else { 0.0 };
            }
        }

        flows
    }

    /// 写入基础流量与派生量 (分舱级 + 港口级)
    pub(super) fn write_flows(
        &self,
        kpis: &mut LegKpis,
        flows: &BTreeMap<SubbayId, SubbayFlows>,
        arrival: &SubbayContentMap,
        port_seq: PortSeq,
    ) {
        let mut totals = SubbayFlows::default();
        let mut hc_moves = 0.0;

        for (subbay, flow) in flows {
            for (metric, value) in elementary(flow) {
                kpis.set_subbay(metric, subbay, value);
            }
            kpis.set_subbay(KpiMetric::Rob, subbay, flow.rob);
            kpis.set_subbay(KpiMetric::ExtraMove, subbay, flow.extra_move);
            kpis.set_subbay(KpiMetric::EffectiveLoad, subbay, flow.effective_load);
            if flow.macro_tier == Some(MacroTier::Deck) {
                kpis.set_subbay(KpiMetric::HcMove, subbay, if flow.hc_move { 1.0 } else { 0.0 });
                kpis.set_subbay(KpiMetric::HcRestow, subbay, flow.hc_restow);
                kpis.set_subbay(KpiMetric::HcObligatoryRestow, subbay, flow.hc_obligatory_restow);
            }

            totals.at_arrival.merge(&flow.at_arrival);
            totals.discharged.merge(&flow.discharged);
            totals.loaded.merge(&flow.loaded);
            totals.at_depart.merge(&flow.at_depart);
            totals.rob += flow.rob;
            totals.hc_restow += flow.hc_restow;
            totals.hc_obligatory_restow += flow.hc_obligatory_restow;
            totals.extra_move += flow.extra_move;
            totals.effective_load += flow.effective_load;
            if flow.hc_move {
                hc_moves += 1.0;
            }
        }

        let mut to_load = Flow::default();
        for (group, load) in arrival.loadlist().into_iter().flatten() {
            if group.load_port_seq == port_seq {
                to_load.add(group, load);
            }
        }

        for (metric, value) in elementary(&totals) {
            kpis.set_port(metric, value);
        }
        kpis.set_port(KpiMetric::QuantityToLoad, to_load.quantity);
        kpis.set_port(KpiMetric::WeightToLoad, to_load.weight);
        kpis.set_port(KpiMetric::TeuToLoad, to_load.teu);
        kpis.set_port(KpiMetric::Rob, totals.rob);
        kpis.set_port(KpiMetric::HcMove, hc_moves);
        kpis.set_port(KpiMetric::HcRestow, totals.hc_restow);
        kpis.set_port(KpiMetric::HcObligatoryRestow, totals.hc_obligatory_restow);
        kpis.set_port(KpiMetric::ExtraMove, totals.extra_move);
        kpis.set_port(KpiMetric::EffectiveLoad, totals.effective_load);
        kpis.set_port(KpiMetric::Garbage, to_load.quantity - totals.effective_load);
    }
}

fn elementary(flow: &SubbayFlows) -> [(KpiMetric, f64); 12] {
    [
        (KpiMetric::QuantityAtArrival, flow.at_arrival.quantity),
        (KpiMetric::QuantityDischarged, flow.discharged.quantity),
        (KpiMetric::QuantityLoaded, flow.loaded.quantity),
        (KpiMetric::QuantityAtDepart, flow.at_depart.quantity),
        (KpiMetric::WeightAtArrival, flow.at_arrival.weight),
        (KpiMetric::WeightDischarged, flow.discharged.weight),
        (KpiMetric::WeightLoaded, flow.loaded.weight),
        (KpiMetric::WeightAtDepart, flow.at_depart.weight),
        (KpiMetric::TeuAtArrival, flow.at_arrival.teu),
        (KpiMetric::TeuDischarged, flow.discharged.teu),
        (KpiMetric::TeuLoaded, flow.loaded.teu),
        (KpiMetric::TeuAtDepart, flow.at_depart.teu),
    ]
}
