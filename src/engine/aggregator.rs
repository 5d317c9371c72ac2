// ==========================================
// 集装箱船配载分析 - 箱组聚合器
// ==========================================
// 职责: 单箱记录 → 分舱内容图 (含轻重拆分)
// 输入: 单箱记录序列 (箱位或空)
// 输出: 分舱内容图 + CG→箱号索引 + 已解析单箱 + 记录级错误
// ==========================================
// 步骤:
// (a) 解析列/分舱/宏观层,或标记为未装船 (subbay = "")
//     有箱位但按轮转不在船的记录 → 数据一致性问题
// (b) 按宏观组分桶 (忽略轻重)
// (c) 按全体(非按分舱)计算每个宏观组的轻重分界
// (d) 按最终 CG 重新分桶
// (e) 输出内容图与 CG→[(箱号, 空箱标记)] 索引
// 红线: 单条记录失败不影响其余记录 (部分失败容忍)
// 红线: 轮转配置错误直接中断 (序号无法计算)
// ==========================================

use crate::config::AnalysisParams;
use crate::domain::cargo::{ContainerGroup, ContainerRecord, MacroGroup, PlacedContainer};
use crate::domain::content::{Load, SubbayContentMap};
use crate::domain::grid::{Slot, Stack, SubbayId};
use crate::domain::types::{CargoStatus, PortSeq};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::grid::GridModel;
use crate::engine::rotation::PortRotation;
use crate::engine::weight_split::{classify_weight, WeightSplitter};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

// ==========================================
// AggregationOutput - 聚合结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AggregationOutput {
    pub content: SubbayContentMap,
    pub containers: Vec<PlacedContainer>,
    pub container_index: BTreeMap<ContainerGroup, Vec<(String, bool)>>,
    pub errors: Vec<EngineError>,
}

/// 已解析记录（轻重未定）
#[derive(Debug, Clone)]
struct ResolvedRecord<'r> {
    record: &'r ContainerRecord,
    macro_group: MacroGroup,
    slot: Option<Slot>,
    stack: Option<Stack>,
    subbay: SubbayId,
    tier_index: Option<u8>,
    weight_decitons: u32,
}

// ==========================================
// ContainerGroupAggregator - 箱组聚合器
// ==========================================
pub struct ContainerGroupAggregator<'a> {
    grid: &'a GridModel,
    rotation: &'a PortRotation,
    params: &'a AnalysisParams,
}

impl<'a> ContainerGroupAggregator<'a> {
    pub fn new(grid: &'a GridModel, rotation: &'a PortRotation, params: &'a AnalysisParams) -> Self {
        Self {
            grid,
            rotation,
            params,
        }
    }

    /// 聚合单个快照（轻重分界按该快照全体计算）
    ///
    /// # 参数
    /// - records: 单箱记录
    /// - onboard_at: 判定在船状态所用的港序号
    pub fn aggregate(
        &self,
        records: &[ContainerRecord],
        onboard_at: PortSeq,
    ) -> EngineResult<AggregationOutput> {
        let mut errors = Vec::new();
        let resolved = self.resolve_all(records, onboard_at, &mut errors)?;
        let boundaries = self.boundaries(resolved.iter());
        Ok(self.build_output(resolved, &boundaries, errors))
    }

    /// 聚合同一航段的到港/离港快照
    ///
    /// 轻重分界按两个快照的并集（按箱号去重）计算,保证同航段内分类一致。
    /// 到港快照沿用上一港离港的在船状态,离港快照按本港判定
    pub fn aggregate_leg(
        &self,
        arrival: &[ContainerRecord],
        departure: &[ContainerRecord],
        port_seq: PortSeq,
    ) -> EngineResult<(AggregationOutput, AggregationOutput)> {
        let n = self.rotation.len();
        let previous_port = (port_seq % n + n - 1) % n;
        let mut arrival_errors = Vec::new();
        let mut departure_errors = Vec::new();
        let arrival_resolved = self.resolve_all(arrival, previous_port, &mut arrival_errors)?;
        let departure_resolved = self.resolve_all(departure, port_seq, &mut departure_errors)?;

        let mut seen: HashSet<&str> = HashSet::new();
        let population = arrival_resolved
            .iter()
            .chain(departure_resolved.iter())
            .filter(|r| seen.insert(r.record.container_id.as_str()));
        let boundaries = self.boundaries(population);

        Ok((
            self.build_output(arrival_resolved, &boundaries, arrival_errors),
            self.build_output(departure_resolved, &boundaries, departure_errors),
        ))
    }

    // ==========================================
    // 步骤 (a): 解析
    // ==========================================

    fn resolve_all<'r>(
        &self,
        records: &'r [ContainerRecord],
        onboard_at: PortSeq,
        errors: &mut Vec<EngineError>,
    ) -> EngineResult<Vec<ResolvedRecord<'r>>> {
        let mut resolved = Vec::with_capacity(records.len());
        for record in records {
            match self.resolve(record, onboard_at) {
                Ok(r) => resolved.push(r),
                Err(err) if err.is_recoverable() => {
                    warn!(container_id = %record.container_id, error = %err, "记录被跳过");
                    errors.push(err);
                }
                Err(err) => return Err(err),
            }
        }
        debug!(
            total = records.len(),
            resolved = resolved.len(),
            skipped = errors.len(),
            "记录解析完成"
        );
        Ok(resolved)
    }

    fn resolve<'r>(
        &self,
        record: &'r ContainerRecord,
        onboard_at: PortSeq,
    ) -> EngineResult<ResolvedRecord<'r>> {
        let load_port_seq = self.rotation.name_to_seq(&record.load_port)?;
        let discharge_port_seq = self.rotation.name_to_seq(&record.discharge_port)?;
        if load_port_seq == discharge_port_seq {
            return Err(EngineError::data_consistency(
                format!("container_id={}", record.container_id),
                format!("装港与卸港相同: {}", record.load_port),
            ));
        }

        if record.has_slot()
            && self
                .rotation
                .classify(load_port_seq, discharge_port_seq, onboard_at)
                != CargoStatus::Onboard
        {
            return Err(EngineError::data_consistency(
                format!("container_id={}", record.container_id),
                format!(
                    "有箱位但在港序号 {} 不在船: {} → {}",
                    onboard_at, record.load_port, record.discharge_port
                ),
            ));
        }

        let (slot, stack, subbay, tier_index) = if record.has_slot() {
            let raw = record.slot.as_deref().unwrap_or_default();
            let slot = Slot::parse(raw).ok_or_else(|| EngineError::InvalidSlotFormat {
                container_id: record.container_id.clone(),
                slot: raw.to_string(),
            })?;
            let stack = GridModel::stack_of(&slot);
            let subbay = self.grid.subbay_of(&stack)?.clone();
            let tier_index = self.grid.tier_index(&slot)?;
            (Some(slot), Some(stack), subbay, Some(tier_index))
        } else {
            (None, None, SubbayId::loadlist(), None)
        };

        Ok(ResolvedRecord {
            record,
            macro_group: MacroGroup {
                load_port_seq,
                discharge_port_seq,
                size: record.size,
                type_code: record.type_code.trim().to_uppercase(),
                height: record.height.trim().to_uppercase(),
            },
            slot,
            stack,
            subbay,
            tier_index,
            weight_decitons: record.weight_decitons(),
        })
    }

    // ==========================================
    // 步骤 (b)(c): 宏观组分桶 + 轻重分界
    // ==========================================

    fn boundaries<'x, 'r: 'x, I>(&self, population: I) -> HashMap<MacroGroup, Option<u32>>
    where
        I: Iterator<Item = &'x ResolvedRecord<'r>>,
    {
        let mut splitter = WeightSplitter::new();
        for r in population {
            splitter.observe(&r.macro_group, r.weight_decitons);
        }
        splitter.boundaries(|group| self.params.light_threshold(group.size))
    }

    // ==========================================
    // 步骤 (d)(e): 最终 CG 分桶 + 输出
    // ==========================================

    fn build_output(
        &self,
        resolved: Vec<ResolvedRecord<'_>>,
        boundaries: &HashMap<MacroGroup, Option<u32>>,
        errors: Vec<EngineError>,
    ) -> AggregationOutput {
        let mut content = SubbayContentMap::new();
        let mut container_index: BTreeMap<ContainerGroup, Vec<(String, bool)>> = BTreeMap::new();
        let mut containers = Vec::with_capacity(resolved.len());

        for r in resolved {
            let boundary = boundaries.get(&r.macro_group).copied().flatten();
            let weight_class = classify_weight(r.weight_decitons, boundary);
            let group = r.macro_group.with_weight_class(weight_class);
            let record = r.record;

            content.add(r.subbay.clone(), group.clone(), Load::new(1, record.weight_t));
            container_index
                .entry(group.clone())
                .or_default()
                .push((record.container_id.clone(), record.empty));

            containers.push(PlacedContainer {
                container_id: record.container_id.clone(),
                slot: r.slot,
                stack: r.stack,
                subbay: r.subbay,
                tier_index: r.tier_index,
                reefer: self.params.is_reefer_type(&group.type_code) || record.setting.is_some(),
                group,
                weight_t: record.weight_t,
                empty: record.empty,
                dg_class: record.dg_class.clone(),
                oog_left: record.oog_left,
                oog_right: record.oog_right,
            });
        }

        AggregationOutput {
            content,
            containers,
            container_index,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ContainerSize, MacroTier, WeightClass};
    use crate::domain::vessel::{PortCall, StackReference, VesselReference};

    fn grid() -> GridModel {
        GridModel::new(&VesselReference {
            stacks: vec![
                StackReference {
                    stack: Stack::new(18, 1, MacroTier::Hold),
                    subbay: "1810".into(),
                    first_tier: 2,
                    max_slots: 8,
                    max_weight: 150.0,
                    nb_reefer_slots: 0,
                },
                StackReference {
                    stack: Stack::new(18, 1, MacroTier::Deck),
                    subbay: "1811".into(),
                    first_tier: 82,
                    max_slots: 5,
                    max_weight: 90.0,
                    nb_reefer_slots: 2,
                },
            ],
            subbay_capacities: Vec::new(),
        })
    }

    fn rotation() -> PortRotation {
        let ports = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .enumerate()
            .map(|(i, name)| PortCall {
                sequence: i as u16,
                port_name: name.to_string(),
                nb_cranes: 2,
                crane_single_speed: None,
            })
            .collect();
        PortRotation::new(ports, 0).unwrap()
    }

    fn record(id: &str, pod: &str, weight_t: f64, slot: Option<&str>) -> ContainerRecord {
        ContainerRecord {
            container_id: id.to_string(),
            load_port: "B".to_string(),
            discharge_port: pod.to_string(),
            size: ContainerSize::Forty,
            type_code: "GP".to_string(),
            height: String::new(),
            weight_t,
            setting: None,
            empty: false,
            slot: slot.map(|s| s.to_string()),
            dg_class: None,
            oog_left: false,
            oog_right: false,
        }
    }

    #[test]
    fn test_aggregates_into_subbays_and_loadlist() {
        let (grid, rotation, params) = (grid(), rotation(), AnalysisParams::default());
        let aggregator = ContainerGroupAggregator::new(&grid, &rotation, &params);
        let records = vec![
            record("C1", "F", 10.0, Some("180102")),
            record("C2", "F", 10.0, Some("180104")),
            record("C3", "D", 8.0, Some("180182")),
            record("C4", "D", 9.0, None),
        ];

        let out = aggregator.aggregate(&records, 1).unwrap();
        assert!(out.errors.is_empty());
        assert_eq!(out.content.total_onboard().quantity, 3);
        let hold = out.content.subbay(&"1810".into()).unwrap();
        let (cg, load) = hold.iter().next().unwrap();
        assert_eq!((cg.load_port_seq, cg.discharge_port_seq), (1, 5));
        assert_eq!(load.quantity, 2);
        assert_eq!(out.content.loadlist().map(|l| l.len()), Some(1));
        assert_eq!(out.containers[1].tier_index, Some(1));
    }

    #[test]
    fn test_light_heavy_split_uses_whole_population() {
        let (grid, rotation, params) = (grid(), rotation(), AnalysisParams::default());
        let aggregator = ContainerGroupAggregator::new(&grid, &rotation, &params);
        // 40' 阈值 15.0t: 累计 8 ok, 8+12=20 <= 30 ok, 20+28=48 > 45 停止
        let records = vec![
            record("C1", "F", 8.0, Some("180102")),
            record("C2", "F", 28.0, Some("180104")),
            record("C3", "F", 12.0, None),
        ];

        let out = aggregator.aggregate(&records, 1).unwrap();
        let class_of = |id: &str| {
            out.containers
                .iter()
                .find(|c| c.container_id == id)
                .map(|c| c.group.weight_class)
                .unwrap()
        };
        assert_eq!(class_of("C1"), WeightClass::Light);
        assert_eq!(class_of("C3"), WeightClass::Light);
        assert_eq!(class_of("C2"), WeightClass::Heavy);
    }

    #[test]
    fn test_invalid_slot_is_partial_failure() {
        let (grid, rotation, params) = (grid(), rotation(), AnalysisParams::default());
        let aggregator = ContainerGroupAggregator::new(&grid, &rotation, &params);
        let records = vec![
            record("C1", "F", 10.0, Some("18X102")),
            record("C2", "F", 10.0, Some("420102")),
            record("C3", "F", 10.0, Some("180102")),
        ];

        let out = aggregator.aggregate(&records, 1).unwrap();
        assert_eq!(out.content.total_onboard().quantity, 1);
        assert_eq!(out.errors.len(), 2);
        assert!(matches!(out.errors[0], EngineError::InvalidSlotFormat { .. }));
        assert!(matches!(out.errors[1], EngineError::UnknownStack { bay: 42, .. }));
    }

    #[test]
    fn test_unknown_port_aborts() {
        let (grid, rotation, params) = (grid(), rotation(), AnalysisParams::default());
        let aggregator = ContainerGroupAggregator::new(&grid, &rotation, &params);
        let records = vec![record("C1", "LEHAVRE", 10.0, Some("180102"))];
        assert!(matches!(
            aggregator.aggregate(&records, 1),
            Err(EngineError::RotationConfig(_))
        ));
    }

    #[test]
    fn test_same_port_record_is_skipped() {
        let (grid, rotation, params) = (grid(), rotation(), AnalysisParams::default());
        let aggregator = ContainerGroupAggregator::new(&grid, &rotation, &params);
        let records = vec![record("C1", "B", 10.0, Some("180102"))];
        let out = aggregator.aggregate(&records, 1).unwrap();
        assert!(out.content.is_empty());
        assert!(matches!(out.errors[0], EngineError::DataConsistency { .. }));
    }

    #[test]
    fn test_slotted_record_not_onboard_is_skipped() {
        let (grid, rotation, params) = (grid(), rotation(), AnalysisParams::default());
        let aggregator = ContainerGroupAggregator::new(&grid, &rotation, &params);
        // B→D 在 E 港已卸: 有箱位的记录报告并跳过, 无箱位的仍进待装清单
        let records = vec![
            record("C1", "D", 10.0, Some("180102")),
            record("C2", "D", 10.0, None),
        ];

        let out = aggregator.aggregate(&records, 4).unwrap();
        assert_eq!(out.errors.len(), 1);
        assert!(matches!(out.errors[0], EngineError::DataConsistency { .. }));
        assert_eq!(out.content.total_onboard().quantity, 0);
        assert_eq!(out.content.loadlist().map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_arrival_uses_previous_port_onboard_status() {
        let (grid, rotation, params) = (grid(), rotation(), AnalysisParams::default());
        let aggregator = ContainerGroupAggregator::new(&grid, &rotation, &params);
        // 在 D 港: 到港时 B→D 仍在船, 离港时已卸
        let records = vec![record("C1", "D", 10.0, Some("180102"))];

        let (arrival, departure) = aggregator.aggregate_leg(&records, &records, 3).unwrap();
        assert!(arrival.errors.is_empty());
        assert_eq!(arrival.content.total_onboard().quantity, 1);
        assert_eq!(departure.errors.len(), 1);
        assert!(departure.content.is_empty());
    }

    #[test]
    fn test_container_index_tracks_empty_flag() {
        let (grid, rotation, params) = (grid(), rotation(), AnalysisParams::default());
        let aggregator = ContainerGroupAggregator::new(&grid, &rotation, &params);
        let mut empty = record("C9", "F", 4.0, Some("180102"));
        empty.empty = true;
        let out = aggregator.aggregate(&[empty], 1).unwrap();
        let entries: Vec<_> = out.container_index.values().flatten().collect();
        assert_eq!(entries, vec![&("C9".to_string(), true)]);
    }
}
