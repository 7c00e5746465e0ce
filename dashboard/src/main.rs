use anyhow::Context;
use clap::Parser;
use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod controller;
mod decoder;
mod generator;
mod gui_bridge;
mod workflow;

use controller::RefreshController;
use decoder::JsonRowsDecoder;
use generator::rows::{build_rows, to_json_bytes};
use gui_bridge::bridge::DashboardBridge;
use workflow::config::DashboardConfig;

#[derive(Parser)]
#[command(author, version, about = "Production-line telemetry dashboard driver")]
struct Args {
    /// Stage a workbook from disk and run one refresh
    #[arg(long)]
    input: Option<PathBuf>,
    /// Load dashboard config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 30)]
    refresh_secs: u64,
    #[arg(long, default_value_t = 9000)]
    port: u16,
    /// Stage a generated demo shift instead of a file
    #[arg(long, default_value_t = false)]
    demo: bool,
    /// Keep the HTTP bridge alive for uploads and dashboard reads
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        DashboardConfig::load(path)?
    } else {
        DashboardConfig::from_args(args.refresh_secs, args.port)
    };

    let controller = RefreshController::new(Box::new(JsonRowsDecoder), config.refresh_period());

    let mut staged = false;
    if args.demo {
        let rows = build_rows(&["1", "2"], 8)?;
        let bytes = to_json_bytes(&rows)?;
        controller.stage("demo-shift.xlsx", bytes, None)?;
        staged = true;
    } else if let Some(path) = args.input.as_ref() {
        let bytes =
            fs::read(path).with_context(|| format!("reading workbook {}", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.xlsx".to_string());
        controller.stage(&name, bytes, None)?;
        staged = true;
    }

    if staged {
        let outcome = controller.refresh();
        info!("initial refresh -> {:?}", outcome);

        let model = controller.model();
        let snapshot = model.read().unwrap().clone();
        println!(
            "Refresh -> lines {}, records {}, total quantity {}, total scrap {}, avg scrap {}%",
            snapshot.lines.len(),
            snapshot.record_count,
            snapshot.totals.total_quantity,
            snapshot.totals.total_scrap,
            snapshot.totals.average_scrap_rate_percent
        );
        if let Some(error) = snapshot.error.as_ref() {
            eprintln!("refresh error: {}", error);
        }

        let report = format!(
            "lines={} records={} total_quantity={} total_scrap={} avg_scrap={}\n",
            snapshot.lines.len(),
            snapshot.record_count,
            snapshot.totals.total_quantity,
            snapshot.totals.total_scrap,
            snapshot.totals.average_scrap_rate_percent
        );
        let report_path = PathBuf::from("tools/data/offline_dashboard.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }

    if args.serve {
        let bridge = DashboardBridge::new(controller.clone(), config.bind_port);
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            if staged {
                controller.enable_auto_refresh();
            }
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
        controller.teardown();
    }

    Ok(())
}
