// ==========================================
// 集装箱船配载分析 - 分舱内容图
// ==========================================
// 结构: subbay → CG → (数量, 重量)
// 红线: 每个港口快照重新构建,不跨航段原地修改
// 红线: 存储的 CG 数量必须 > 0
// ==========================================

use crate::domain::cargo::ContainerGroup;
use crate::domain::grid::SubbayId;
use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;

// ==========================================
// Load - 数量 + 重量
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, Deserialize)]
pub struct Load {
    pub quantity: u32,
    pub weight: f64, // 吨
}

impl Load {
    pub fn new(quantity: u32, weight: f64) -> Self {
        Self { quantity, weight }
    }

    pub fn add(&mut self, other: Load) {
        self.quantity += other.quantity;
        self.weight += other.weight;
    }

    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }
}

/// 序列化用的扁平条目（CG 结构体不能作为 JSON 键）
#[derive(Debug, Clone, serde::Serialize)]
pub struct ContentEntry<'a> {
    pub subbay: &'a SubbayId,
    pub group: &'a ContainerGroup,
    pub quantity: u32,
    pub weight: f64,
}

// ==========================================
// SubbayContentMap - 分舱内容图
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubbayContentMap {
    entries: BTreeMap<SubbayId, BTreeMap<ContainerGroup, Load>>,
}

impl SubbayContentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加 (subbay, CG) 的数量与重量
    ///
    /// 数量为 0 的条目不入图
    pub fn add(&mut self, subbay: SubbayId, group: ContainerGroup, load: Load) {
        if load.is_empty() {
            return;
        }
        self.entries
            .entry(subbay)
            .or_default()
            .entry(group)
            .or_default()
            .add(load);
    }

    /// 从 (subbay, CG) 扣减,最多扣到 0
    ///
    /// # 规则
    /// - 扣减数量 = min(请求数量, 现有数量)
    /// - 全部扣完时重量一并清零（避免浮点残差）
    /// - 数量归零则删除条目,分舱为空则删除分舱
    ///
    /// # 返回
    /// - Some(Load): 实际扣减的量
    /// - None: 条目不存在
    pub fn take(&mut self, subbay: &SubbayId, group: &ContainerGroup, load: Load) -> Option<Load> {
        let groups = self.entries.get_mut(subbay)?;
        let held = groups.get_mut(group)?;

        let quantity = load.quantity.min(held.quantity);
        let weight = if quantity == held.quantity {
            held.weight
        } else {
            load.weight.min(held.weight)
        };
        held.quantity -= quantity;
        held.weight -= weight;

        if held.quantity == 0 {
            groups.remove(group);
        }
        if groups.is_empty() {
            self.entries.remove(subbay);
        }
        Some(Load::new(quantity, weight))
    }

    pub fn get(&self, subbay: &SubbayId, group: &ContainerGroup) -> Option<&Load> {
        self.entries.get(subbay).and_then(|groups| groups.get(group))
    }

    pub fn subbay(&self, subbay: &SubbayId) -> Option<&BTreeMap<ContainerGroup, Load>> {
        self.entries.get(subbay)
    }

    pub fn contains_subbay(&self, subbay: &SubbayId) -> bool {
        self.entries.contains_key(subbay)
    }

    /// 待装清单部分 (subbay = "")
    pub fn loadlist(&self) -> Option<&BTreeMap<ContainerGroup, Load>> {
        self.entries.get(&SubbayId::loadlist())
    }

    /// 已装船分舱（不含待装清单）
    pub fn placed_subbays(&self) -> impl Iterator<Item = (&SubbayId, &BTreeMap<ContainerGroup, Load>)> {
        self.entries.iter().filter(|(subbay, _)| !subbay.is_loadlist())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SubbayId, &ContainerGroup, &Load)> {
        self.entries
            .iter()
            .flat_map(|(subbay, groups)| groups.iter().map(move |(group, load)| (subbay, group, load)))
    }

    /// 在船总量（不含待装清单）
    pub fn total_onboard(&self) -> Load {
        let mut total = Load::default();
        for (_, groups) in self.placed_subbays() {
            for load in groups.values() {
                total.add(*load);
            }
        }
        total
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SubbayContentMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(subbay, group, load)| ContentEntry {
            subbay,
            group,
            quantity: load.quantity,
            weight: load.weight,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ContainerSize, WeightClass};

    fn cg(pol: u16, pod: u16) -> ContainerGroup {
        ContainerGroup {
            load_port_seq: pol,
            discharge_port_seq: pod,
            size: ContainerSize::Forty,
            type_code: "GP".to_string(),
            weight_class: WeightClass::Heavy,
            height: String::new(),
        }
    }

    #[test]
    fn test_add_merges_same_key() {
        let mut map = SubbayContentMap::new();
        map.add("1810".into(), cg(1, 5), Load::new(2, 40.0));
        map.add("1810".into(), cg(1, 5), Load::new(1, 30.0));
        map.add("1810".into(), cg(1, 5), Load::new(0, 0.0));
        assert_eq!(map.get(&"1810".into(), &cg(1, 5)), Some(&Load::new(3, 70.0)));
    }

    #[test]
    fn test_take_removes_empty_entries() {
        let mut map = SubbayContentMap::new();
        map.add("1811".into(), cg(1, 3), Load::new(2, 20.0));

        let taken = map.take(&"1811".into(), &cg(1, 3), Load::new(5, 50.0));
        assert_eq!(taken, Some(Load::new(2, 20.0)));
        assert!(map.is_empty());
        assert!(map.take(&"1811".into(), &cg(1, 3), Load::new(1, 1.0)).is_none());
    }

    #[test]
    fn test_total_onboard_excludes_loadlist() {
        let mut map = SubbayContentMap::new();
        map.add("1811".into(), cg(1, 3), Load::new(2, 20.0));
        map.add(SubbayId::loadlist(), cg(2, 4), Load::new(7, 70.0));
        assert_eq!(map.total_onboard(), Load::new(2, 20.0));
        assert_eq!(map.loadlist().map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_serializes_as_entry_list() {
        let mut map = SubbayContentMap::new();
        map.add("1811".into(), cg(1, 3), Load::new(2, 20.0));
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json[0]["subbay"], "1811");
        assert_eq!(json[0]["quantity"], 2);
        assert_eq!(json[0]["group"]["weight_class"], "H");
    }
}
