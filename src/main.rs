// ==========================================
// 农产品贸易后台 - 贸易潜力矩阵 CLI
// ==========================================
// 用法:
//   trade-potential [db_path] [--status <status>] [--csv <path>]
//
// - db_path 缺省: TRADE_POTENTIAL_DB_PATH 环境变量 → 用户数据目录
// - --status: complete / missing_price / missing_transport / missing_both / all
// - --csv: 将（过滤后的）潜力列表导出为 CSV
// 标准输出: 统计 JSON；日志输出到 stderr
// ==========================================

use anyhow::{bail, Context, Result};
use produce_trade_potential::api::{export_potentials_csv, TradePotentialApi};
use produce_trade_potential::{db, logging};
use serde_json::json;
use std::fs::File;
use std::io::BufWriter;

#[derive(Debug, Default)]
struct CliArgs {
    db_path: Option<String>,
    status: Option<String>,
    csv_path: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--status" => {
                parsed.status = Some(args.next().context("--status 需要一个取值")?);
            }
            "--csv" => {
                parsed.csv_path = Some(args.next().context("--csv 需要一个文件路径")?);
            }
            flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
            _ if parsed.db_path.is_none() => parsed.db_path = Some(arg),
            _ => bail!("多余的位置参数: {}", arg),
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args = parse_args(std::env::args().skip(1))?;
    let db_path = args.db_path.unwrap_or_else(db::default_db_path);

    tracing::info!(
        version = produce_trade_potential::VERSION,
        db_version = produce_trade_potential::DB_VERSION,
        db_path = %db_path,
        "{}",
        produce_trade_potential::APP_NAME
    );

    let api = TradePotentialApi::open(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;

    let response = api
        .generate_trade_potential(args.status.as_deref())
        .await
        .context("贸易潜力矩阵生成失败")?;

    if let Some(csv_path) = args.csv_path.as_deref() {
        let file = File::create(csv_path).with_context(|| format!("无法创建文件: {}", csv_path))?;
        let rows = export_potentials_csv(&response.potentials, BufWriter::new(file))?;
        tracing::info!(csv_path, rows, "CSV 导出完成");
    }

    let output = json!({
        "run_id": response.run_id,
        "generated_at": response.generated_at,
        "status_filter": response.status_filter,
        "returned": response.potentials.len(),
        "summary": response.summary,
        "stats": response.stats,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
