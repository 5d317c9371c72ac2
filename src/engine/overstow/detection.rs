// ==========================================
// 集装箱船配载分析 - 分舱级压箱检测
// ==========================================
// 规则:
// 1. 对每个甲板分舱的每个 CG, 查看其下方舱内分舱中卸港严格更早的 CG
// 2. 先后按当前港起算的剩余港数比较, 跨轮转边界的在船货同样适用
// 3. 取最早者为压箱港
// 4. 压箱港范围: 到港快照 [port_seq, N), 离港快照 (port_seq, N)
// 5. 输出压箱记录 + 倒箱重装 (来源按加法合并)
// ==========================================

use super::OverstowDetector;
use crate::domain::cargo::ContainerGroup;
use crate::domain::content::SubbayContentMap;
use crate::domain::overstow::{OverstowMove, OverstowRecord, OverstowSource};
use crate::domain::types::{PortSeq, SnapshotKind};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

// ==========================================
// OverstowDetection - 分舱级检测结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverstowDetection {
    pub records: Vec<OverstowRecord>,
    pub moves: Vec<OverstowMove>,
}

impl OverstowDetection {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> OverstowDetector<'a> {
    /// 分舱级压箱检测
    ///
    /// # 参数
    /// - map: 快照内容图 (只读)
    /// - port_seq: 当前港序号
    /// - kind: 到港/离港快照,决定压箱港下界
    #[instrument(skip(self, map), fields(port_seq = port_seq, kind = %kind))]
    pub fn detect(
        &self,
        map: &SubbayContentMap,
        port_seq: PortSeq,
        kind: SnapshotKind,
    ) -> OverstowDetection {
        let n = self.rotation.len();
        let mut records = Vec::new();
        let mut moves: BTreeMap<ContainerGroup, OverstowMove> = BTreeMap::new();

        for (subbay, groups) in map.placed_subbays() {
            let below = self.grid.subbays_below(subbay);
            if below.is_empty() {
                continue;
            }

            for (group, load) in groups {
                let upper_rank = self.rotation.ports_until(group.discharge_port_seq, port_seq);

                let candidate = below
                    .iter()
                    .filter_map(|b| map.subbay(b))
                    .flat_map(|lower| lower.keys())
                    .map(|lower| self.rotation.ports_until(lower.discharge_port_seq, port_seq))
                    .filter(|lower_rank| *lower_rank < upper_rank)
                    .min()
                    .map(|rank| port_seq + rank);

                let overstow_port = match candidate {
                    Some(c) if within_horizon(c, port_seq, kind, n) => c,
                    Some(c) => {
                        debug!(subbay = %subbay, group = %group, candidate = c, "压箱港超出范围,忽略");
                        continue;
                    }
                    None => continue,
                };

                records.push(OverstowRecord {
                    subbay: subbay.clone(),
                    group: group.clone(),
                    load: *load,
                    overstow_port_seq: overstow_port,
                });

                let synthetic = group.with_ports(overstow_port, group.discharge_port_seq);
                moves
                    .entry(synthetic.clone())
                    .or_insert_with(|| OverstowMove::new(synthetic))
                    .add_source(
                        OverstowSource {
                            subbay: subbay.clone(),
                            load_port_seq: group.load_port_seq,
                        },
                        *load,
                    );
            }
        }

        debug!(records = records.len(), moves = moves.len(), "分舱级压箱检测完成");
        OverstowDetection {
            records,
            moves: moves.into_values().collect(),
        }
    }
}

/// 压箱港范围判定
///
/// 到港快照处于上一离港的参照系,当前港卸货的阻塞同样计入
fn within_horizon(candidate: PortSeq, port_seq: PortSeq, kind: SnapshotKind, n: PortSeq) -> bool {
    let lower_ok = match kind {
        SnapshotKind::Arrival => candidate >= port_seq,
        SnapshotKind::Departure => candidate > port_seq,
    };
    lower_ok && candidate < n
}
