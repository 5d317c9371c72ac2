// ==========================================
// 集装箱船配载分析 - 倒箱可行性引擎
// ==========================================
// 职责: 舱内列 / 甲板分舱 / 舱盖分区 三级倒箱聚合
// 输入: 快照的已解析单箱 + 网格模型 + 分析参数
// 输出: RestowReport (只读视图)
// ==========================================
// 规则:
// - 舱内列: remaining_weight = max_weight - total_weight_heavy
//           is_restowable = remaining_weight >= 余量 且 无排除条件
// - 甲板分舱: is_restowable = 无排除条件 (不做重量判定)
// - 舱盖分区: 舱内侧全部列可倒 且 甲板侧全部分舱可倒
// - ratio_restow_heavy_hold = (舱内轻箱数 + 甲板箱数) / (舱内空 TEU + 舱内轻箱 TEU)
//   分母为 0 → NoCapacityGain
// ==========================================

use crate::config::AnalysisParams;
use crate::domain::cargo::PlacedContainer;
use crate::domain::grid::{Stack, SubbayId};
use crate::domain::restow::{
    DeckSubbayRestow, HatchSectionRestow, HoldStackRestow, RestowExclusions, RestowRatio,
    RestowReport,
};
use crate::domain::types::MacroTier;
use crate::engine::grid::GridModel;
use std::collections::BTreeMap;
use tracing::debug;

// ==========================================
// RestowEngine - 倒箱可行性引擎
// ==========================================
pub struct RestowEngine<'a> {
    grid: &'a GridModel,
    params: &'a AnalysisParams,
}

impl<'a> RestowEngine<'a> {
    pub fn new(grid: &'a GridModel, params: &'a AnalysisParams) -> Self {
        Self { grid, params }
    }

    /// 计算倒箱可行性报告
    ///
    /// # 参数
    /// - containers: 快照的已解析单箱 (未装船箱被忽略)
    pub fn evaluate(&self, containers: &[PlacedContainer]) -> RestowReport {
        let hold_stacks = self.hold_stacks(containers);
        let deck_subbays = self.deck_subbays(containers);
        let hatch_sections = self.hatch_sections(containers, &hold_stacks, &deck_subbays);

        debug!(
            hold_stacks = hold_stacks.len(),
            deck_subbays = deck_subbays.len(),
            restowable_sections = hatch_sections.iter().filter(|h| h.is_restowable).count(),
            "倒箱可行性计算完成"
        );

        RestowReport {
            hold_stacks,
            deck_subbays,
            hatch_sections,
        }
    }

    // ==========================================
    // 舱内列聚合
    // ==========================================

    fn hold_stacks(&self, containers: &[PlacedContainer]) -> Vec<HoldStackRestow> {
        let mut stacks: BTreeMap<Stack, HoldStackRestow> = self
            .grid
            .stacks()
            .filter(|reference| reference.stack.macro_tier == MacroTier::Hold)
            .map(|reference| {
                (
                    reference.stack,
                    HoldStackRestow {
                        stack: reference.stack,
                        subbay: reference.subbay.clone(),
                        nb_containers: 0,
                        nb_heavy: 0,
                        nb_light: 0,
                        light_teu: 0,
                        total_weight_heavy: 0.0,
                        max_weight: reference.max_weight,
                        remaining_weight: reference.max_weight,
                        exclusions: RestowExclusions::default(),
                        is_restowable: false,
                    },
                )
            })
            .collect();

        for container in containers {
            let aggregate = match container.stack.and_then(|stack| stacks.get_mut(&stack)) {
                Some(aggregate) => aggregate,
                None => continue,
            };
            aggregate.nb_containers += 1;
            if container.group.is_heavy() {
                aggregate.nb_heavy += 1;
                aggregate.total_weight_heavy += container.weight_t;
            } else {
                aggregate.nb_light += 1;
                aggregate.light_teu += container.group.teu_per_unit();
            }
            aggregate.exclusions.merge(exclusions_of(container));
        }

        stacks
            .into_values()
            .map(|mut aggregate| {
                aggregate.remaining_weight = aggregate.max_weight - aggregate.total_weight_heavy;
                aggregate.is_restowable = aggregate.remaining_weight
                    >= self.params.restow_weight_margin_t
                    && !aggregate.exclusions.any();
                aggregate
            })
            .collect()
    }

    // ==========================================
    // 甲板分舱聚合
    // ==========================================

    fn deck_subbays(&self, containers: &[PlacedContainer]) -> Vec<DeckSubbayRestow> {
        let mut subbays: BTreeMap<SubbayId, DeckSubbayRestow> = self
            .grid
            .subbays()
            .filter(|info| info.macro_tier == MacroTier::Deck)
            .map(|info| {
                (
                    info.subbay.clone(),
                    DeckSubbayRestow {
                        subbay: info.subbay.clone(),
                        nb_containers: 0,
                        teu: 0,
                        exclusions: RestowExclusions::default(),
                        is_restowable: false,
                    },
                )
            })
            .collect();

        for container in containers {
            if let Some(aggregate) = subbays.get_mut(&container.subbay) {
                aggregate.nb_containers += 1;
                aggregate.teu += container.group.teu_per_unit();
                aggregate.exclusions.merge(exclusions_of(container));
            }
        }

        subbays
            .into_values()
            .map(|mut aggregate| {
                aggregate.is_restowable = !aggregate.exclusions.any();
                aggregate
            })
            .collect()
    }

    // ==========================================
    // 舱盖分区汇总
    // ==========================================

    fn hatch_sections(
        &self,
        containers: &[PlacedContainer],
        hold_stacks: &[HoldStackRestow],
        deck_subbays: &[DeckSubbayRestow],
    ) -> Vec<HatchSectionRestow> {
        let mut used_teu: BTreeMap<&SubbayId, u32> = BTreeMap::new();
        for container in containers.iter().filter(|c| c.is_placed()) {
            *used_teu.entry(&container.subbay).or_default() += container.group.teu_per_unit();
        }

        let mut sections = Vec::new();
        for (hatch_section, members) in self.grid.hatch_sections() {
            let mut summary = HatchSectionRestow {
                hatch_section: hatch_section.clone(),
                hold_subbays: Vec::new(),
                deck_subbays: Vec::new(),
                teu_empty_on_hold: 0,
                light_teu_on_hold: 0,
                light_containers_in_hold: 0,
                containers_on_deck: 0,
                extra_weight_loadable_on_hold: 0.0,
                hold_is_restowable: false,
                deck_is_restowable: false,
                is_restowable: false,
                ratio_restow_heavy_hold: RestowRatio::NoCapacityGain,
            };

            for subbay in members {
                let info = match self.grid.subbay_info(subbay) {
                    Ok(info) => info,
                    Err(_) => continue,
                };
                match info.macro_tier {
                    MacroTier::Hold => {
                        summary.hold_subbays.push(subbay.clone());
                        let used = used_teu.get(subbay).copied().unwrap_or(0);
                        summary.teu_empty_on_hold += info.teu_capacity.saturating_sub(used);
                    }
                    MacroTier::Deck => summary.deck_subbays.push(subbay.clone()),
                }
            }

            let section_stacks: Vec<&HoldStackRestow> = hold_stacks
                .iter()
                .filter(|s| summary.hold_subbays.contains(&s.subbay))
                .collect();
            for stack in &section_stacks {
                summary.light_teu_on_hold += stack.light_teu;
                summary.light_containers_in_hold += stack.nb_light;
                summary.extra_weight_loadable_on_hold += stack.remaining_weight.max(0.0);
            }
            summary.hold_is_restowable =
                !section_stacks.is_empty() && section_stacks.iter().all(|s| s.is_restowable);

            let section_decks: Vec<&DeckSubbayRestow> = deck_subbays
                .iter()
                .filter(|d| summary.deck_subbays.contains(&d.subbay))
                .collect();
            summary.containers_on_deck = section_decks.iter().map(|d| d.nb_containers).sum();
            summary.deck_is_restowable = section_decks.iter().all(|d| d.is_restowable);

            summary.is_restowable = summary.hold_is_restowable && summary.deck_is_restowable;
            summary.ratio_restow_heavy_hold = RestowRatio::from_parts(
                (summary.light_containers_in_hold + summary.containers_on_deck) as f64,
                (summary.teu_empty_on_hold + summary.light_teu_on_hold) as f64,
            );
            sections.push(summary);
        }
        sections
    }
}

fn exclusions_of(container: &PlacedContainer) -> RestowExclusions {
    RestowExclusions {
        contains_dangerous_1_7: container.is_dangerous_1_or_7(),
        contains_oog_left: container.oog_left,
        contains_oog_right: container.oog_right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cargo::ContainerGroup;
    use crate::domain::grid::Slot;
    use crate::domain::types::{ContainerSize, WeightClass};
    use crate::domain::vessel::{StackReference, SubbayCapacity, VesselReference};

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn create_test_grid() -> GridModel {
        let stack = |row: u8, tier: MacroTier, subbay: &str| StackReference {
            stack: Stack::new(18, row, tier),
            subbay: SubbayId::from(subbay),
            first_tier: if tier == MacroTier::Deck { 82 } else { 2 },
            max_slots: 4,
            max_weight: 150.0,
            nb_reefer_slots: 0,
        };
        GridModel::new(&VesselReference {
            stacks: vec![
                stack(1, MacroTier::Hold, "1810"),
                stack(2, MacroTier::Hold, "1810"),
                stack(1, MacroTier::Deck, "1811"),
            ],
            subbay_capacities: vec![SubbayCapacity {
                subbay: "1810".into(),
                cap_20_or_40: 8,
                cap_only_20: 0,
                cap_only_40: 0,
            }],
        })
    }

    fn create_test_container(
        id: &str,
        slot: Slot,
        subbay: &str,
        weight_class: WeightClass,
        weight_t: f64,
    ) -> PlacedContainer {
        PlacedContainer {
            container_id: id.to_string(),
            slot: Some(slot),
            stack: Some(slot.stack()),
            subbay: subbay.into(),
            tier_index: None,
            group: ContainerGroup {
                load_port_seq: 1,
                discharge_port_seq: 5,
                size: ContainerSize::Forty,
                type_code: "GP".to_string(),
                weight_class,
                height: String::new(),
            },
            weight_t,
            empty: false,
            reefer: false,
            dg_class: None,
            oog_left: false,
            oog_right: false,
        }
    }

    fn create_test_cargo() -> Vec<PlacedContainer> {
        vec![
            create_test_container("H1", Slot::new(18, 1, 2), "1810", WeightClass::Heavy, 30.0),
            create_test_container("H2", Slot::new(18, 1, 4), "1810", WeightClass::Heavy, 30.0),
            create_test_container("H3", Slot::new(18, 1, 6), "1810", WeightClass::Heavy, 30.0),
            create_test_container("L1", Slot::new(18, 2, 2), "1810", WeightClass::Light, 8.0),
            create_test_container("D1", Slot::new(18, 1, 82), "1811", WeightClass::Light, 10.0),
            create_test_container("D2", Slot::new(18, 1, 84), "1811", WeightClass::Light, 10.0),
        ]
    }

    #[test]
    fn test_hold_stack_aggregates() {
        let (grid, params) = (create_test_grid(), AnalysisParams::default());
        let report = RestowEngine::new(&grid, &params).evaluate(&create_test_cargo());

        assert_eq!(report.hold_stacks.len(), 2);
        let row1 = &report.hold_stacks[0];
        assert_eq!(row1.stack, Stack::new(18, 1, MacroTier::Hold));
        assert_eq!((row1.nb_containers, row1.nb_heavy, row1.nb_light), (3, 3, 0));
        assert_eq!(row1.total_weight_heavy, 90.0);
        assert_eq!(row1.remaining_weight, 60.0);
        assert!(row1.is_restowable);

        let row2 = &report.hold_stacks[1];
        assert_eq!((row2.nb_light, row2.light_teu), (1, 2));
        assert_eq!(row2.remaining_weight, 150.0);
    }

    #[test]
    fn test_oog_left_flips_restowable() {
        println!("\n=== 测试：左侧超限箱使舱内列不可倒箱 ===");
        let (grid, params) = (create_test_grid(), AnalysisParams::default());
        let engine = RestowEngine::new(&grid, &params);
        let mut cargo = create_test_cargo();
        cargo[1].oog_left = true;

        let report = engine.evaluate(&cargo);
        assert!(!report.hold_stacks[0].is_restowable);
        assert!(report.hold_stacks[0].exclusions.contains_oog_left);
        assert!(!report.hatch_sections[0].hold_is_restowable);

        cargo[1].oog_left = false;
        let report = engine.evaluate(&cargo);
        assert!(report.hold_stacks[0].is_restowable);
        println!("✓ 排除条件翻转正确");
    }

    #[test]
    fn test_weight_margin_below_threshold() {
        let (grid, params) = (create_test_grid(), AnalysisParams::default());
        let mut cargo = create_test_cargo();
        cargo.push(create_test_container(
            "H4",
            Slot::new(18, 1, 8),
            "1810",
            WeightClass::Heavy,
            35.0,
        ));

        let report = RestowEngine::new(&grid, &params).evaluate(&cargo);
        assert_eq!(report.hold_stacks[0].remaining_weight, 25.0);
        assert!(!report.hold_stacks[0].is_restowable);
    }

    #[test]
    fn test_deck_dangerous_class_excludes() {
        let (grid, params) = (create_test_grid(), AnalysisParams::default());
        let mut cargo = create_test_cargo();
        cargo[4].dg_class = Some("1.4S".to_string());

        let report = RestowEngine::new(&grid, &params).evaluate(&cargo);
        let deck = &report.deck_subbays[0];
        assert_eq!((deck.nb_containers, deck.teu), (2, 4));
        assert!(deck.exclusions.contains_dangerous_1_7);
        assert!(!deck.is_restowable);
        assert!(!report.hatch_sections[0].is_restowable);
    }

    #[test]
    fn test_hatch_section_summary_and_ratio() {
        let (grid, params) = (create_test_grid(), AnalysisParams::default());
        let report = RestowEngine::new(&grid, &params).evaluate(&create_test_cargo());

        let section = &report.hatch_sections[0];
        assert_eq!(section.hatch_section.as_str(), "181");
        assert_eq!(section.hold_subbays, vec![SubbayId::from("1810")]);
        assert_eq!(section.deck_subbays, vec![SubbayId::from("1811")]);
        // 容量 8 TEU, 已用 4 箱 × 2 TEU
        assert_eq!(section.teu_empty_on_hold, 0);
        assert_eq!(section.light_teu_on_hold, 2);
        assert_eq!(section.extra_weight_loadable_on_hold, 210.0);
        assert!(section.is_restowable);
        // (1 + 2) / (0 + 2)
        assert_eq!(section.ratio_restow_heavy_hold, RestowRatio::Value(1.5));
    }

    #[test]
    fn test_no_capacity_gain_ratio() {
        let (grid, params) = (create_test_grid(), AnalysisParams::default());
        let cargo: Vec<PlacedContainer> = create_test_cargo()
            .into_iter()
            .map(|mut c| {
                c.group.weight_class = WeightClass::Heavy;
                c
            })
            .collect();

        let report = RestowEngine::new(&grid, &params).evaluate(&cargo);
        let section = &report.hatch_sections[0];
        assert_eq!(section.ratio_restow_heavy_hold, RestowRatio::NoCapacityGain);
        assert!(section.ratio_restow_heavy_hold.as_f64().is_infinite());
    }
}
