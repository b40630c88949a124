use std::{path::Path, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use logforth::{
    append::{
        self,
        rolling_file::{self, RollingFile, RollingFileWriter, Rotation},
    },
    layout::TextLayout,
    non_blocking::WorkerGuard,
};
use tokio::sync::Notify;

mod probe;
pub use probe::*;
mod store;
pub use store::*;

use crate::{
    conf::{self, Conf, LogSettings},
    get_env_or_default, FailurePolicy, GatewayProbe, ProbeConfig, Prober,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Dry mode, results are only logged
    #[arg(short = 'd', long, default_value_t = get_env_or_default("PROBE_DRY", "false")=="true")]
    pub dry: bool,

    /// Configuration file
    #[arg(short = 'f', long, default_value_t = get_env_or_default("PROBE_CONFIG", "config.yaml"))]
    pub config: String,

    /// Show JSON schema
    #[arg(short = 'j', long, default_value_t = false)]
    pub json_schema: bool,

    /// Run a single cycle and exit
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Gateway base URL
    #[arg(long)]
    pub gateway_url: Option<String>,

    /// Identifier carried into every result
    #[arg(long)]
    pub container_id: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Pause between cycles in seconds
    #[arg(long)]
    pub interval: Option<u64>,

    /// `partial` or `all-or-nothing`
    #[arg(long)]
    pub failure_policy: Option<FailurePolicy>,
}

impl Args {
    /// Command line values win over the environment and the file.
    pub fn apply(&self, c: &mut Conf) {
        if let Some(url) = &self.gateway_url {
            c.probe.target_gateway_url = url.clone();
        }
        if let Some(id) = &self.container_id {
            c.probe.container_id = id.clone();
        }
        let timeout = Duration::from_secs(self.timeout.unwrap_or_default());
        c.probe.request_timeout = c.probe.normalize_timeout(timeout);
        let interval = Duration::from_secs(self.interval.unwrap_or_default());
        c.probe.interval = c.probe.normalize_interval(interval);
        if let Some(policy) = self.failure_policy {
            c.probe.failure_policy = policy;
        }
    }
}

pub fn load_conf(args: &Args) -> Result<Conf> {
    let mut c = Conf::load(&args.config)?;
    c.apply_env()?;
    args.apply(&mut c);
    c.validate()?;
    Ok(c)
}

/// Installs the global logger at `level`, on stdout and/or a daily-rotated
/// file under `settings.path`. The returned guard flushes the file on drop.
pub fn init_logging(settings: &LogSettings, level: LevelFilter) -> Result<Option<WorkerGuard>> {
    let mut builder = logforth::builder().max_level(level);
    if settings.console {
        builder = builder.dispatch(|d| d.filter(level).append(append::Stdout::default()));
    }

    let mut guard = None;
    if let Some(dir) = &settings.path {
        let writer = RollingFileWriter::builder()
            .rotation(Rotation::Daily)
            .filename_prefix(env!("CARGO_PKG_NAME"))
            .filename_suffix("log")
            .build(dir)
            .with_context(|| format!("failed to open log directory {}", dir))?;
        let (writer, g) = rolling_file::non_blocking(writer).finish();
        builder = builder.dispatch(|d| {
            d.filter(level)
                .append(RollingFile::new(writer).with_layout(TextLayout::default().no_color()))
        });
        guard = Some(g);
    }

    builder.try_apply()?;
    Ok(guard)
}

pub async fn start() -> Result<()> {
    let args = Args::parse();
    if args.json_schema {
        println!("{}", conf::json_schema()?);
        return Ok(());
    }

    let c = load_conf(&args)?;
    let _guard = init_logging(&c.settings.log, c.log_level()?)?;
    if Path::new(&args.config).exists() {
        log::info!("loaded configuration from {}", args.config);
    } else {
        log::warn!("configuration file {} not found, using defaults", args.config);
    }
    log::info!(
        "{} - probing {} every {:?} as {}",
        c.settings.name,
        c.probe.target_gateway_url,
        c.probe.interval,
        c.probe.container_id,
    );
    log::debug!("{:?}", c);

    let store = config_store(&c.store, args.dry);
    let prober: Arc<dyn Prober> = Arc::new(GatewayProbe::new(ProbeConfig::from(&c.probe))?);
    let opts = RunOptions::from(&c.probe);

    if args.once {
        run_once(prober.as_ref(), store.as_ref(), opts.record_failures).await;
        return Ok(());
    }

    let shutdown = Arc::new(Notify::new());
    let signal = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal.notify_one();
        }
    });

    run_forever(prober, store, opts, shutdown).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_PROBE_INTERVAL, DEFAULT_TIMEOUT};

    #[test]
    fn test_args_override_conf() {
        let args = Args::try_parse_from([
            "gatewayprobe",
            "-f",
            "/nonexistent/config.yaml",
            "--gateway-url",
            "http://10.1.1.1",
            "--timeout",
            "2",
            "--failure-policy",
            "all-or-nothing",
            "--once",
        ])
        .unwrap();
        assert!(args.once);
        assert_eq!(args.config, "/nonexistent/config.yaml");

        let mut c = Conf::default();
        c.probe.request_timeout = Duration::from_secs(9);
        args.apply(&mut c);
        assert_eq!(c.probe.target_gateway_url, "http://10.1.1.1");
        assert_eq!(c.probe.request_timeout, Duration::from_secs(2));
        assert_eq!(c.probe.interval, DEFAULT_PROBE_INTERVAL);
        assert_eq!(c.probe.failure_policy, FailurePolicy::AllOrNothing);
        assert_eq!(c.probe.container_id, "tcm");
    }

    #[test]
    fn test_args_keep_file_values() {
        let args = Args::try_parse_from(["gatewayprobe"]).unwrap();
        let mut c = Conf::default();
        c.probe.request_timeout = Duration::ZERO;
        c.probe.interval = Duration::from_secs(5);
        args.apply(&mut c);
        assert_eq!(c.probe.request_timeout, DEFAULT_TIMEOUT);
        assert_eq!(c.probe.interval, Duration::from_secs(5));
    }

    #[test]
    fn test_init_logging_honours_level_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LogSettings {
            level: "debug".to_string(),
            path: Some(dir.path().display().to_string()),
            console: false,
        };
        let guard = init_logging(&settings, LevelFilter::Debug).unwrap();
        assert!(guard.is_some());
        assert_eq!(log::max_level(), LevelFilter::Debug);

        let debug = log::Metadata::builder()
            .level(log::Level::Debug)
            .target("gatewayprobe")
            .build();
        let trace = log::Metadata::builder()
            .level(log::Level::Trace)
            .target("gatewayprobe")
            .build();
        assert!(log::logger().enabled(&debug));
        assert!(!log::logger().enabled(&trace));

        log::debug!("debug line reaches the log file");
        drop(guard);

        let mut written = String::new();
        for entry in std::fs::read_dir(dir.path()).unwrap() {
            let entry = entry.unwrap();
            if entry.file_name().to_string_lossy().starts_with("gatewayprobe") {
                written.push_str(&std::fs::read_to_string(entry.path()).unwrap());
            }
        }
        assert!(written.contains("debug line reaches the log file"));
    }

    #[test]
    fn test_bad_policy_arg() {
        assert!(Args::try_parse_from(["gatewayprobe", "--failure-policy", "maybe"]).is_err());
    }
}
