// ==========================================
// 集装箱船配载分析 - 命令行入口
// ==========================================
// 用途: 读取场景 JSON (船舶参考 + 港口轮转 + 各航段记录),
//       执行整条航次分析, 以 JSON 输出各航段报告
// ==========================================
// 用法:
//   stowage-analysis <scenario.json> [--config <db>] [--set key=value]...
//                    [--output <file>] [--json-log]
//   stowage-analysis --help
// ==========================================

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use stowage_analysis::db::get_default_config_db_path;
use stowage_analysis::engine::{LegInput, LegOrchestrator, LegReport};
use stowage_analysis::{logging, ConfigManager, PortCall, VesselReference};
use tracing::{error, info};

/// 场景文件
#[derive(Debug, Deserialize)]
struct Scenario {
    vessel: VesselReference,
    rotation: Vec<PortCall>,
    legs: Vec<LegInput>,
}

/// 单航段输出: 成功报告或致命错误
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum LegOutcome {
    Report(Box<LegReport>),
    Failed { port_name: String, error: String },
}

/// 集装箱船配载分析: 压箱/倒箱检测与港口 KPI
#[derive(Parser, Debug)]
#[command(name = "stowage-analysis")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 场景文件 (JSON)
    scenario: String,

    /// 配置库路径 (默认: 用户数据目录)
    #[arg(short = 'c', long = "config")]
    config_db: Option<String>,

    /// 运行前覆写配置项, 可重复
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    overrides: Vec<(String, String)>,

    /// 报告输出文件 (默认: 标准输出)
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// 以 JSON 行格式输出日志
    #[arg(long)]
    json_log: bool,
}

/// 解析 key=value
fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("参数格式应为 key=value: {}", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("配置项名为空: {}", raw));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.json_log);

    info!("==================================================");
    info!("{} - 系统版本: {}", stowage_analysis::APP_NAME, stowage_analysis::VERSION);
    info!("==================================================");

    // 配置
    let db_path = args.config_db.clone().unwrap_or_else(get_default_config_db_path);
    info!("使用配置库: {}", db_path);
    let config = ConfigManager::new(&db_path)
        .with_context(|| format!("无法打开配置库: {}", db_path))?;
    for (key, value) in &args.overrides {
        config
            .set_config_value(key, value)
            .with_context(|| format!("写入配置失败: {}", key))?;
        info!(config_key = %key, value = %value, "配置已覆写");
    }

    // 场景
    let raw = std::fs::read_to_string(&args.scenario)
        .with_context(|| format!("无法读取场景文件: {}", args.scenario))?;
    let scenario: Scenario = serde_json::from_str(&raw)
        .with_context(|| format!("场景文件格式错误: {}", args.scenario))?;

    let orchestrator = LegOrchestrator::from_config(&scenario.vessel, scenario.rotation, &config)
        .await
        .context("编排器初始化失败")?;

    let port_names: Vec<String> = scenario.legs.iter().map(|l| l.port_name.clone()).collect();
    let results = orchestrator.analyze_voyage(scenario.legs).await;

    let mut failed = 0usize;
    let outcomes: Vec<LegOutcome> = port_names
        .into_iter()
        .zip(results)
        .map(|(port_name, result)| match result {
            Ok(report) => LegOutcome::Report(Box::new(report)),
            Err(e) => {
                failed += 1;
                error!(port = %port_name, error = %e, "航段分析失败");
                LegOutcome::Failed {
                    port_name,
                    error: e.to_string(),
                }
            }
        })
        .collect();

    let json = serde_json::to_string_pretty(&outcomes).context("报告序列化失败")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("无法写入报告: {}", path))?;
            info!("报告已写入: {}", path);
        }
        None => println!("{}", json),
    }

    info!(legs = outcomes.len(), failed, "航次分析结束");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let args = Args::try_parse_from([
            "stowage-analysis",
            "voyage.json",
            "--config",
            "/tmp/config.db",
            "--set",
            "dual_cycling_gain = 0.4",
            "--set",
            "leg_offset=2",
            "-o",
            "report.json",
            "--json-log",
        ])
        .unwrap();

        assert_eq!(args.scenario, "voyage.json");
        assert_eq!(args.config_db.as_deref(), Some("/tmp/config.db"));
        assert_eq!(
            args.overrides,
            vec![
                ("dual_cycling_gain".to_string(), "0.4".to_string()),
                ("leg_offset".to_string(), "2".to_string()),
            ]
        );
        assert_eq!(args.output.as_deref(), Some("report.json"));
        assert!(args.json_log);
    }

    #[test]
    fn test_defaults_without_flags() {
        let args = Args::try_parse_from(["stowage-analysis", "voyage.json"]).unwrap();
        assert!(args.config_db.is_none());
        assert!(args.overrides.is_empty());
        assert!(!args.json_log);
    }

    #[test]
    fn test_malformed_set_is_rejected() {
        assert!(Args::try_parse_from(["stowage-analysis", "v.json", "--set", "no_equals"]).is_err());
        assert!(Args::try_parse_from(["stowage-analysis", "v.json", "--set", "=1"]).is_err());
        assert!(Args::try_parse_from(["stowage-analysis"]).is_err());
    }
}
