// ==========================================
// 集装箱船配载分析 - 轻重拆分纯函数库
// ==========================================
// 规则:
// 1. 按宏观组收集全部单箱重量（忽略轻重等级,覆盖在船+待装全体）
// 2. 升序排序,按等重子组逐步推进
// 3. sum(重量<=候选点) <= count * threshold 时接受候选点为轻箱
// 4. 最后接受的候选点重量即该宏观组的轻/重分界
// 红线: 使用单调的累加和判定,不使用滑动均值
// 红线: 无状态、无副作用
// ==========================================

use crate::domain::cargo::MacroGroup;
use crate::domain::types::WeightClass;
use std::collections::HashMap;

/// 计算轻/重分界重量
///
/// # 参数
/// - weights: 宏观组内全部单箱重量（0.1 吨）
/// - threshold: 尺寸对应的均重阈值（0.1 吨）
///
/// # 返回
/// - Some(w): 重量 <= w 为轻箱
/// - None: 没有可接受的轻箱分界,全部为重箱
pub fn light_heavy_boundary(weights: &[u32], threshold: u32) -> Option<u32> {
    let mut sorted = weights.to_vec();
    sorted.sort_unstable();

    let threshold = threshold as u64;
    let mut boundary = None;
    let mut sum: u64 = 0;
    let mut count: u64 = 0;
    let mut i = 0;

    while i < sorted.len() {
        let weight = sorted[i];
        while i < sorted.len() && sorted[i] == weight {
            sum += weight as u64;
            count += 1;
            i += 1;
        }
        // 均值随子组单调不减,一旦失败后续全部失败
        if sum <= count * threshold {
            boundary = Some(weight);
        } else {
            break;
        }
    }

    boundary
}

/// 按分界判定轻重等级
pub fn classify_weight(weight: u32, boundary: Option<u32>) -> WeightClass {
    match boundary {
        Some(limit) if weight <= limit => WeightClass::Light,
        _ => WeightClass::Heavy,
    }
}

// ==========================================
// WeightSplitter - 宏观组重量收集器
// ==========================================
#[derive(Debug, Default)]
pub struct WeightSplitter {
    weights: HashMap<MacroGroup, Vec<u32>>,
}

impl WeightSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, group: &MacroGroup, weight_decitons: u32) {
        self.weights
            .entry(group.clone())
            .or_default()
            .push(weight_decitons);
    }

    /// 计算每个宏观组的分界
    ///
    /// # 参数
    /// - threshold_of: 宏观组 → 均重阈值
    pub fn boundaries<F>(&self, threshold_of: F) -> HashMap<MacroGroup, Option<u32>>
    where
        F: Fn(&MacroGroup) -> u32,
    {
        self.weights
            .iter()
            .map(|(group, weights)| {
                (
                    group.clone(),
                    light_heavy_boundary(weights, threshold_of(group)),
                )
            })
            .collect()
    }
}
