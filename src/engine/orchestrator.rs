// ==========================================
// 集装箱船配载分析 - 航段编排器
// ==========================================
// 用途: 协调聚合、压箱、倒箱、KPI 引擎的执行顺序
// ==========================================
// 单航段流程:
// 1. 到港/离港快照聚合 (轻重分界按两者并集)
// 2. 到港压箱检测 + 修正 → A'
// 3. 离港快照虚拟重装 (到港倒箱, 压箱港 = 当前港)
// 4. 离港压箱检测 + 修正 → D'
// 5. 单箱级阻塞 + 倒箱可行性 (离港快照)
// 6. KPI (A', D')
// 红线: 各航段互不依赖,只共享只读的网格与轮转表
// ==========================================

use crate::config::{AnalysisConfigReader, AnalysisParams};
use crate::domain::cargo::{ContainerGroup, ContainerRecord};
use crate::domain::content::SubbayContentMap;
use crate::domain::kpi::LegKpis;
use crate::domain::restow::RestowReport;
use crate::domain::types::{PortSeq, SnapshotKind};
use crate::domain::vessel::{PortCall, VesselReference};
use crate::engine::aggregator::ContainerGroupAggregator;
use crate::engine::error::{EngineError, EngineResult, LegIssue};
use crate::engine::grid::GridModel;
use crate::engine::kpi::{KpiEngine, KpiInput};
use crate::engine::overstow::{OverstowDetection, OverstowDetector, SlotBlockingReport};
use crate::engine::restow::RestowEngine;
use crate::engine::rotation::PortRotation;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// LegInput - 单航段输入
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegInput {
    pub port_name: String,
    #[serde(default)]
    pub arrival: Vec<ContainerRecord>,
    #[serde(default)]
    pub departure: Vec<ContainerRecord>,
}

// ==========================================
// LegReport - 单航段报告
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct LegReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub port_name: String,
    pub port_seq: PortSeq,

    // 修正后的内容图
    pub arrival_map: SubbayContentMap,
    pub departure_map: SubbayContentMap,

    // 压箱
    pub arrival_overstow: OverstowDetection,
    pub departure_overstow: OverstowDetection,
    pub slot_overstows: SlotBlockingReport,

    pub restow: RestowReport,
    pub kpis: LegKpis,

    /// 记录级/数据一致性问题 (已恢复)
    pub issues: Vec<LegIssue>,

    /// 离港快照 CG → [(箱号, 空箱标记)]
    #[serde(skip)]
    pub container_index: BTreeMap<ContainerGroup, Vec<(String, bool)>>,
}

// ==========================================
// LegOrchestrator - 航段编排器
// ==========================================
#[derive(Debug, Clone)]
pub struct LegOrchestrator {
    grid: Arc<GridModel>,
    rotation: Arc<PortRotation>,
    params: AnalysisParams,
}

impl LegOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - grid: 网格模型（只读共享）
    /// - rotation: 港口轮转（只读共享）
    /// - params: 分析参数快照
    pub fn new(grid: Arc<GridModel>, rotation: Arc<PortRotation>, params: AnalysisParams) -> Self {
        Self {
            grid,
            rotation,
            params,
        }
    }

    /// 通过配置读取器构建
    ///
    /// # 参数
    /// - vessel: 船舶参考数据
    /// - ports: 港口轮转表
    /// - config: 配置读取器 (leg_offset 等参数一次性读取)
    pub async fn from_config<C>(
        vessel: &VesselReference,
        ports: Vec<PortCall>,
        config: &C,
    ) -> EngineResult<Self>
    where
        C: AnalysisConfigReader + ?Sized,
    {
        let params = AnalysisParams::load(config).await?;
        let rotation = PortRotation::new(ports, params.leg_offset)?;
        let grid = GridModel::new(vessel);
        info!(
            ports = rotation.len(),
            leg_offset = params.leg_offset,
            subbays = grid.subbays().count(),
            "编排器初始化完成"
        );
        Ok(Self::new(Arc::new(grid), Arc::new(rotation), params))
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    pub fn rotation(&self) -> &PortRotation {
        &self.rotation
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    /// 执行单航段分析
    ///
    /// # 返回
    /// - Ok(LegReport): 已恢复的问题列于 issues
    /// - Err: 轮转配置错误等致命错误
    #[instrument(skip(self, leg), fields(port = %leg.port_name))]
    pub fn analyze_leg(&self, leg: &LegInput) -> EngineResult<LegReport> {
        let grid = self.grid.as_ref();
        let rotation = self.rotation.as_ref();
        let port_seq = rotation.name_to_seq(&leg.port_name)?;
        info!(
            port_seq,
            arrival_records = leg.arrival.len(),
            departure_records = leg.departure.len(),
            "开始航段分析"
        );

        let mut issues: Vec<EngineError> = Vec::new();

        // ==========================================
        // 步骤1: 快照聚合
        // ==========================================
        let aggregator = ContainerGroupAggregator::new(grid, rotation, &self.params);
        let (arrival, departure) =
            aggregator.aggregate_leg(&leg.arrival, &leg.departure, port_seq)?;
        issues.extend(arrival.errors.iter().cloned());
        issues.extend(departure.errors.iter().cloned());

        // ==========================================
        // 步骤2: 到港压箱修正
        // ==========================================
        let detector = OverstowDetector::new(grid, rotation);
        let arrival_overstow = detector.detect(&arrival.content, port_seq, SnapshotKind::Arrival);
        let (arrival_map, arrival_issues) =
            detector.apply_correction(&arrival.content, &arrival_overstow);
        issues.extend(arrival_issues);

        // ==========================================
        // 步骤3: 虚拟重装
        // ==========================================
        let (reloaded, reload_issues) =
            detector.virtual_reload(&departure.content, &arrival_overstow.moves, port_seq);
        issues.extend(reload_issues);

        // ==========================================
        // 步骤4: 离港压箱修正
        // ==========================================
        let departure_overstow = detector.detect(&reloaded, port_seq, SnapshotKind::Departure);
        let (departure_map, departure_issues) =
            detector.apply_correction(&reloaded, &departure_overstow);
        issues.extend(departure_issues);

        // ==========================================
        // 步骤5: 单箱级阻塞 + 倒箱可行性
        // ==========================================
        let slot_overstows = detector.detect_blocking(&departure.containers, port_seq);
        let restow = RestowEngine::new(grid, &self.params).evaluate(&departure.containers);

        // ==========================================
        // 步骤6: KPI
        // ==========================================
        let kpis = KpiEngine::new(grid, &self.params).derive(&KpiInput {
            port_seq,
            port_call: rotation.port_call(port_seq),
            arrival: &arrival_map,
            departure: &departure_map,
            departure_containers: &departure.containers,
        });

        if !issues.is_empty() {
            warn!(issues = issues.len(), "航段存在已恢复的问题");
        }
        debug!(
            arrival_overstow = arrival_overstow.records.len(),
            departure_overstow = departure_overstow.records.len(),
            slot_overstows = slot_overstows.overstows.len(),
            "航段分析完成"
        );

        Ok(LegReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            port_name: rotation.seq_to_name(port_seq).to_string(),
            port_seq,
            arrival_map,
            departure_map,
            arrival_overstow,
            departure_overstow,
            slot_overstows,
            restow,
            kpis,
            issues: issues.iter().map(LegIssue::from).collect(),
            container_index: departure.container_index,
        })
    }

    /// 并行执行整条航次
    ///
    /// 每个航段在阻塞线程池中独立计算,结果按输入顺序返回
    pub async fn analyze_voyage(&self, legs: Vec<LegInput>) -> Vec<EngineResult<LegReport>> {
        info!(legs = legs.len(), "开始航次分析");

        let handles = legs.into_iter().map(|leg| {
            let orchestrator = self.clone();
            tokio::task::spawn_blocking(move || orchestrator.analyze_leg(&leg))
        });

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(result) => result,
                Err(e) => Err(EngineError::Internal(format!("航段任务异常: {}", e))),
            })
            .collect()
    }
}
