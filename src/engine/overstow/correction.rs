// ==========================================
// 集装箱船配载分析 - 压箱修正与虚拟重装
// ==========================================
// 修正规则:
// 1. (subbay, CG) 扣减 (q, w), 数量归零则删除
// 2. 同分舱加入 CG (原装港, 压箱港, ...)
// 3. 待装清单扣减倒箱部分 (最多扣到 0)
// 虚拟重装:
// - 到港检测出的、压箱港 = 当前港的倒箱,
//   在离港快照中按来源改标为 装港 = 当前港
// 红线: 输入内容图只读,结果以新内容图返回
// 红线: 在船总量守恒 (只搬移 CG 桶,不增减箱量)
// ==========================================

use super::{OverstowDetection, OverstowDetector};
use crate::domain::content::SubbayContentMap;
use crate::domain::grid::SubbayId;
use crate::domain::overstow::OverstowMove;
use crate::domain::types::PortSeq;
use crate::engine::error::EngineError;
use tracing::{debug, warn};

impl<'a> OverstowDetector<'a> {
    /// 生成修正后的内容图
    ///
    /// # 返回
    /// - (修正后的内容图, 数据一致性问题)
    pub fn apply_correction(
        &self,
        map: &SubbayContentMap,
        detection: &OverstowDetection,
    ) -> (SubbayContentMap, Vec<EngineError>) {
        let mut corrected = map.clone();
        let mut issues = Vec::new();

        for record in &detection.records {
            match corrected.take(&record.subbay, &record.group, record.load) {
                Some(taken) => {
                    corrected.add(record.subbay.clone(), record.corrected_group(), taken);
                }
                None => {
                    let err = EngineError::data_consistency(
                        format!("subbay={}", record.subbay),
                        format!("压箱记录引用的 CG {} 不在内容图中", record.group),
                    );
                    warn!(error = %err, "压箱修正跳过");
                    issues.push(err);
                }
            }
        }

        let loadlist = SubbayId::loadlist();
        for mv in &detection.moves {
            if let Some(taken) = corrected.take(&loadlist, &mv.group, mv.load) {
                debug!(group = %mv.group, quantity = taken.quantity, "待装清单扣除倒箱部分");
            }
        }

        (corrected, issues)
    }

    /// 离港快照虚拟重装
    ///
    /// # 参数
    /// - departure: 离港快照内容图 (只读)
    /// - arrival_moves: 到港检测出的倒箱
    /// - port_seq: 当前港序号
    pub fn virtual_reload(
        &self,
        departure: &SubbayContentMap,
        arrival_moves: &[OverstowMove],
        port_seq: PortSeq,
    ) -> (SubbayContentMap, Vec<EngineError>) {
        let mut relabelled = departure.clone();
        let mut issues = Vec::new();

        for mv in arrival_moves
            .iter()
            .filter(|mv| mv.overstow_port_seq() == port_seq)
        {
            for (source, load) in &mv.sources {
                let original = mv
                    .group
                    .with_ports(source.load_port_seq, mv.original_discharge_seq());
                match relabelled.take(&source.subbay, &original, *load) {
                    Some(taken) => {
                        relabelled.add(source.subbay.clone(), mv.group.clone(), taken);
                    }
                    None => {
                        let err = EngineError::data_consistency(
                            format!("subbay={}", source.subbay),
                            format!("倒箱来源 CG {} 不在离港快照中", original),
                        );
                        warn!(error = %err, "虚拟重装跳过");
                        issues.push(err);
                    }
                }
            }
        }

        (relabelled, issues)
    }
}
