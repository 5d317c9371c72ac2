// ==========================================
// 集装箱船配载分析 - 装载率 / 重量分布 KPI
// ==========================================
// 口径: 离港快照 (船舶开航时的状态)
// - hold/deck_teu_empty_ratio = 空 TEU / TEU 容量, 容量为 0 → 0.0
// - reefer_utilization = 冷箱数 / 冷箱插座数, 插座为 0 → 0.0
// - weight_diff_left_right = 左舷重量 - 右舷重量 (中线分舱不计)
// ==========================================

use super::KpiEngine;
use crate::domain::cargo::PlacedContainer;
use crate::domain::content::SubbayContentMap;
use crate::domain::kpi::{KpiMetric, LegKpis};
use crate::domain::types::{BoardSide, MacroTier};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default)]
struct BayFill {
    hold_capacity: u32,
    hold_used: u32,
    deck_capacity: u32,
    deck_used: u32,
    reefer_slots: u32,
    reefers: u32,
    weight_left: f64,
    weight_right: f64,
}

impl BayFill {
    fn merge(&mut self, other: &BayFill) {
        self.hold_capacity += other.hold_capacity;
        self.hold_used += other.hold_used;
        self.deck_capacity += other.deck_capacity;
        self.deck_used += other.deck_used;
        self.reefer_slots += other.reefer_slots;
        self.reefers += other.reefers;
        self.weight_left += other.weight_left;
        self.weight_right += other.weight_right;
    }

    fn write(&self, mut set: impl FnMut(KpiMetric, f64)) {
        set(
            KpiMetric::HoldTeuEmptyRatio,
            empty_ratio(self.hold_capacity, self.hold_used),
        );
        set(
            KpiMetric::DeckTeuEmptyRatio,
            empty_ratio(self.deck_capacity, self.deck_used),
        );
        set(
            KpiMetric::ReeferUtilization,
            safe_ratio(self.reefers as f64, self.reefer_slots as f64),
        );
        set(
            KpiMetric::WeightDiffLeftRight,
            self.weight_left - self.weight_right,
        );
    }
}

impl<'a> KpiEngine<'a> {
    pub(super) fn write_ratios(
        &self,
        kpis: &mut LegKpis,
        departure: &SubbayContentMap,
        containers: &[PlacedContainer],
    ) {
        let mut bays: BTreeMap<u16, BayFill> = BTreeMap::new();

        for info in self.grid.subbays() {
            let fill = bays.entry(info.crane_bay).or_default();
            let (used, weight) = departure
                .subbay(&info.subbay)
                .into_iter()
                .flatten()
                .fold((0u32, 0.0f64), |(teu, weight), (group, load)| {
                    (teu + load.quantity * group.teu_per_unit(), weight + load.weight)
                });

            match info.macro_tier {
                MacroTier::Hold => {
                    fill.hold_capacity += info.teu_capacity;
                    fill.hold_used += used;
                }
                MacroTier::Deck => {
                    fill.deck_capacity += info.teu_capacity;
                    fill.deck_used += used;
                }
            }
            fill.reefer_slots += info.nb_reefer_slots;
            match info.side {
                BoardSide::Left => fill.weight_left += weight,
                BoardSide::Right => fill.weight_right += weight,
                BoardSide::Centre => {}
            }
        }

        for container in containers.iter().filter(|c| c.reefer && c.is_placed()) {
            if let Ok(info) = self.grid.subbay_info(&container.subbay) {
                bays.entry(info.crane_bay).or_default().reefers += 1;
            }
        }

        let mut ship = BayFill::default();
        for (bay, fill) in &bays {
            fill.write(|metric, value| kpis.set_bay(metric, *bay, value));
            ship.merge(fill);
        }
        ship.write(|metric, value| kpis.set_port(metric, value));
    }
}

/// 空 TEU 比; 超装时按 0 计
fn empty_ratio(capacity: u32, used: u32) -> f64 {
    safe_ratio(capacity.saturating_sub(used) as f64, capacity as f64)
}

fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
