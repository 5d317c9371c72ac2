// ==========================================
// 集装箱船配载分析 - 单箱级阻塞检测
// ==========================================
// 规则:
// 1. 下层邻居 = 同列 + 相邻列 (网格模型相邻规则)
// 2. 同宏观层: 只看严格更低的层; 甲板箱下的舱内列: 任意层
// 3. 下层卸港严格早于上层 → 阻塞 (先后按当前港起算的剩余港数)
// 4. 每个上层箱只保留最早的阻塞卸港
// ==========================================

use super::OverstowDetector;
use crate::domain::cargo::PlacedContainer;
use crate::domain::grid::{Slot, Stack};
use crate::domain::overstow::{SlotOverstow, SlotOverstowCount, SlotOverstowKey};
use crate::domain::types::PortSeq;
use crate::engine::grid::GridModel;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

// ==========================================
// SlotBlockingReport - 单箱级阻塞报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlotBlockingReport {
    /// 被阻塞的上层箱（按箱号排序）
    pub overstows: Vec<SlotOverstow>,

    /// (上层卸港, 阻塞箱数) → 上层箱数
    pub summary: Vec<SlotOverstowCount>,
}

/// 参与比较的单箱视图
struct SlotCargo<'c> {
    container: &'c PlacedContainer,
    slot: Slot,
    /// 距卸港的剩余港数
    rank: PortSeq,
}

impl<'a> OverstowDetector<'a> {
    /// 单箱级阻塞检测
    ///
    /// # 参数
    /// - containers: 同一快照的已解析单箱 (未装船箱被忽略)
    /// - port_seq: 快照所在港序号
    ///
    /// # 返回
    /// - 每个被阻塞上层箱一条记录 + 按 (卸港, 阻塞数) 的汇总
    pub fn detect_blocking(
        &self,
        containers: &[PlacedContainer],
        port_seq: PortSeq,
    ) -> SlotBlockingReport {
        let mut by_stack: HashMap<Stack, Vec<SlotCargo<'_>>> = HashMap::new();
        for container in containers {
            if let (Some(slot), Some(stack)) = (container.slot, container.stack) {
                by_stack.entry(stack).or_default().push(SlotCargo {
                    container,
                    slot,
                    rank: self
                        .rotation
                        .ports_until(container.group.discharge_port_seq, port_seq),
                });
            }
        }

        let mut overstows = Vec::new();
        for (stack, column) in &by_stack {
            let mut neighbours: Vec<(&SlotCargo<'_>, bool)> = column
                .iter()
                .map(|cargo| (cargo, false))
                .collect();
            for adjacent in GridModel::adjacent_stacks_below(stack) {
                let any_tier = adjacent.macro_tier != stack.macro_tier;
                if let Some(cargos) = by_stack.get(&adjacent) {
                    neighbours.extend(cargos.iter().map(|cargo| (cargo, any_tier)));
                }
            }

            for upper in column {
                let mut nb_blocking = 0usize;
                let mut earliest: Option<&SlotCargo<'_>> = None;
                for (lower, any_tier) in &neighbours {
                    if std::ptr::eq(*lower, upper) {
                        continue;
                    }
                    if !*any_tier && lower.slot.tier >= upper.slot.tier {
                        continue;
                    }
                    if lower.rank >= upper.rank {
                        continue;
                    }
                    nb_blocking += 1;
                    if earliest.map_or(true, |e| lower.rank < e.rank) {
                        earliest = Some(*lower);
                    }
                }

                if let Some(blocking) = earliest {
                    overstows.push(SlotOverstow {
                        container_id: upper.container.container_id.clone(),
                        slot: upper.slot,
                        discharge_port_seq: upper.container.group.discharge_port_seq,
                        blocking_port_seq: blocking.container.group.discharge_port_seq,
                        nb_blocking,
                    });
                }
            }
        }
        overstows.sort_by(|a, b| a.container_id.cmp(&b.container_id));

        let mut counts: BTreeMap<SlotOverstowKey, usize> = BTreeMap::new();
        for overstow in &overstows {
            *counts
                .entry(SlotOverstowKey {
                    discharge_port_seq: overstow.discharge_port_seq,
                    nb_blocking: overstow.nb_blocking,
                })
                .or_default() += 1;
        }
        debug!(
            containers = containers.len(),
            blocked = overstows.len(),
            "单箱级阻塞检测完成"
        );

        SlotBlockingReport {
            overstows,
            summary: counts
                .into_iter()
                .map(|(key, nb_containers)| SlotOverstowCount { key, nb_containers })
                .collect(),
        }
    }
}
