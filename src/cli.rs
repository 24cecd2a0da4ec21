use crate::{
    config::Config,
    export, present, probe,
    report::ReportModel,
    service::HttpAnalyzeService,
    session::{SubmitOutcome, UploadController},
    util::{hash_file, now_rfc3339},
    view,
};
use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "call-audit")]
#[command(about = "Call-quality audit client (upload, analyze, deterministic report rendering)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./call-audit.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the analysis service is reachable.
    Doctor {},
    /// Upload a recorded call and render the returned report.
    Analyze {
        #[arg(long)]
        input: PathBuf,
        /// Mark the participant's consent to recording/analysis.
        #[arg(long)]
        consent: bool,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Open the service-rendered document in the platform viewer.
        #[arg(long)]
        open: bool,
    },
    /// Re-render a previously exported report JSON.
    Render {
        #[arg(long)]
        input: PathBuf,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref())?;
    let cfg = Config::load(&cfg_path)?;
    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    match &args.cmd {
        Command::Doctor {} => runtime()?.block_on(doctor(&cfg)),
        Command::Analyze {
            input,
            consent,
            out_dir,
            open,
        } => runtime()?.block_on(analyze(&cfg, input, *consent, out_dir.as_deref(), *open)),
        Command::Render { input } => render_saved(input),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = user {
        return Ok(p.to_path_buf());
    }
    let default = PathBuf::from("call-audit.toml");
    if default.exists() {
        Ok(default)
    } else {
        Ok(PathBuf::from("call-audit.example.toml"))
    }
}

// The whole client is event-driven on one thread; network calls
// suspend, nothing runs in parallel workers.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .with_context(|| "building tokio runtime")
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        crate::util::ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    Some(PathBuf::from(&cfg.output.out_dir).join("call-audit.log"))
}

async fn doctor(cfg: &Config) -> Result<()> {
    let service = HttpAnalyzeService::new(cfg)?;
    let diag = probe::doctor(&service).await;
    println!("{}", serde_json::to_string_pretty(&diag)?);
    Ok(())
}

async fn analyze(
    cfg: &Config,
    input: &Path,
    consent: bool,
    out_override: Option<&Path>,
    open_doc: bool,
) -> Result<()> {
    validate_input(cfg, input)?;

    if let Ok(hash) = hash_file(&cfg.hashing, input) {
        info!("input {} sha256={hash}", input.display());
    }

    let service = HttpAnalyzeService::new(cfg)?;

    let _probe = if cfg.service.probe_on_start {
        let probe_service = service.clone();
        Some(tokio::spawn(async move {
            probe::ping(&probe_service, &probe::TracingSink).await;
        }))
    } else {
        None
    };

    let controller = UploadController::new(service, cfg.upload.max_upload_bytes);

    match controller.submit(input, consent).await {
        SubmitOutcome::Completed { .. } => {}
        _ => bail!("{}", controller.status()),
    }

    let Some(report) = controller.report() else {
        bail!("analysis completed without a report");
    };

    if cfg.global.print_report {
        let rendered = present::to_text(&view::build(&report));
        println!("{rendered}");
    }

    let out_root = out_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&cfg.output.out_dir));

    let mut exports = Vec::new();

    if cfg.output.write_report_json {
        let path = export::export_data(Some(&*report), &out_root)?;
        info!("wrote {}", path.display());
        exports.push(path.display().to_string());
    }

    if cfg.output.write_report_html {
        match export::write_document(Some(&*report), &out_root) {
            Ok(path) => {
                info!("wrote {}", path.display());
                exports.push(path.display().to_string());
            }
            Err(export::ExportError::NoDocument) => {
                warn!("service returned no rendered document; skipping HTML export");
            }
            Err(err) => return Err(err.into()),
        }
    }

    if open_doc || cfg.export.open_document {
        let delay = Duration::from_millis(cfg.export.cleanup_delay_ms);
        match export::open_document(Some(&*report), delay).await {
            Ok(path) => info!("opened document view: {}", path.display()),
            Err(err) => warn!("document view unavailable: {err}"),
        }
    }

    if cfg.global.print_summary {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "callId": report.call_id.clone(),
                "status": controller.status(),
                "partial": report.partial,
                "finished": now_rfc3339(),
                "exports": exports,
            }))?
        );
    }

    Ok(())
}

fn render_saved(input: &Path) -> Result<()> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("reading report: {}", input.display()))?;
    let report = ReportModel::from_json_bytes(&bytes).with_context(|| "parsing report JSON")?;
    println!("{}", present::to_text(&view::build(&report)));
    Ok(())
}

const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "ogg", "flac", "opus", "webm"];

fn validate_input(cfg: &Config, input: &Path) -> Result<()> {
    let input_str = input.display().to_string();

    if cfg.security.reject_url_inputs && looks_like_url(&input_str) {
        return Err(anyhow!("URL inputs are disabled: {input_str}"));
    }

    if let Some(ext) = input.extension().and_then(|s| s.to_str()) {
        if !AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            warn!("unrecognized audio extension: {}", input.display());
        }
    } else {
        warn!("input has no extension; assuming audio: {}", input.display());
    }

    Ok(())
}

fn looks_like_url(s: &str) -> bool {
    let s = s.to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("file://")
}
