// ==========================================
// 集装箱船配载分析 - 港口轮转序列器
// ==========================================
// 职责: 港名 ↔ 序号 (循环取模), 在船/待装分类
// 红线: 序号一律对轮转长度 N 取模, N 可配置
// ==========================================

use crate::domain::types::{CargoStatus, PortSeq};
use crate::domain::vessel::PortCall;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::HashSet;

// ==========================================
// PortRotation - 港口轮转
// ==========================================
#[derive(Debug, Clone)]
pub struct PortRotation {
    ports: Vec<PortCall>,
    leg_offset: PortSeq,
}

impl PortRotation {
    /// 由轮转表构建
    ///
    /// # 参数
    /// - ports: 轮转表 (按 sequence 排序后使用)
    /// - leg_offset: 轮转参考起点
    ///
    /// # 错误
    /// - RotationConfig: 轮转表为空或港名重复
    pub fn new(mut ports: Vec<PortCall>, leg_offset: PortSeq) -> EngineResult<Self> {
        if ports.is_empty() {
            return Err(EngineError::RotationConfig("轮转表为空".to_string()));
        }
        ports.sort_by_key(|p| p.sequence);

        let mut seen = HashSet::new();
        for port in &ports {
            if !seen.insert(normalize(&port.port_name)) {
                return Err(EngineError::RotationConfig(format!(
                    "港名重复: {}",
                    port.port_name
                )));
            }
        }

        let n = ports.len() as PortSeq;
        Ok(Self {
            ports,
            leg_offset: leg_offset % n,
        })
    }

    /// 轮转长度 N
    pub fn len(&self) -> PortSeq {
        self.ports.len() as PortSeq
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn leg_offset(&self) -> PortSeq {
        self.leg_offset
    }

    /// 港名在轮转表中的位置
    pub fn index_of(&self, name: &str) -> EngineResult<usize> {
        let key = normalize(name);
        self.ports
            .iter()
            .position(|p| normalize(&p.port_name) == key)
            .ok_or_else(|| EngineError::RotationConfig(format!("港口不在轮转表中: {}", name)))
    }

    /// name_to_seq(name) = (index_of(name) - leg_offset) mod N
    pub fn name_to_seq(&self, name: &str) -> EngineResult<PortSeq> {
        self.name_to_seq_at(name, self.leg_offset)
    }

    /// 指定参考点的 name_to_seq
    pub fn name_to_seq_at(&self, name: &str, leg_offset: PortSeq) -> EngineResult<PortSeq> {
        let n = self.len() as usize;
        let index = self.index_of(name)?;
        let offset = leg_offset as usize % n;
        Ok(((index + n - offset) % n) as PortSeq)
    }

    /// name_to_seq 的逆映射
    pub fn seq_to_name(&self, seq: PortSeq) -> &str {
        &self.port_call(seq).port_name
    }

    /// 序号对应的港口轮转行
    pub fn port_call(&self, seq: PortSeq) -> &PortCall {
        let n = self.ports.len();
        let index = (seq as usize % n + self.leg_offset as usize) % n;
        &self.ports[index]
    }

    /// 在船/待装分类
    pub fn classify(&self, pol: PortSeq, pod: PortSeq, at: PortSeq) -> CargoStatus {
        classify(pol, pod, at, self.len())
    }

    /// 自 at 起到卸港 pod 还需经过的港数, 范围 [0, N)
    ///
    /// 在 at 港在船的货物按此值排序即为卸货先后 (与装港无关)
    pub fn ports_until(&self, pod: PortSeq, at: PortSeq) -> PortSeq {
        ports_until(pod, at, self.len())
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}

/// 卸港展开 (处理跨越轮转边界的货物)
pub fn unwrap_discharge(pol: PortSeq, pod: PortSeq, n: PortSeq) -> PortSeq {
    if pod < pol {
        pod + n
    } else {
        pod
    }
}

/// (pod - at) mod N
pub fn ports_until(pod: PortSeq, at: PortSeq, n: PortSeq) -> PortSeq {
    (pod % n + n - at % n) % n
}

/// 在船/待装分类
///
/// # 规则
/// - pod < pol 时视为 pod + N
/// - at ∈ [pol, pod) 或 at + N ∈ [pol, pod) 或 at ∈ [pol + N, pod + N) → Onboard
/// - 否则 → Loadlist
pub fn classify(pol: PortSeq, pod: PortSeq, at: PortSeq, n: PortSeq) -> CargoStatus {
    let pol = pol as u32;
    let pod = unwrap_discharge(pol as PortSeq, pod, n) as u32;
    let at = at as u32;
    let n = n as u32;

    let within = |x: u32, lo: u32, hi: u32| x >= lo && x < hi;
    if within(at, pol, pod) || within(at + n, pol, pod) || within(at, pol + n, pod + n) {
        CargoStatus::Onboard
    } else {
        CargoStatus::Loadlist
    }
}
