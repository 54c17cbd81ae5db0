mod progress;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing_subscriber::{fmt, EnvFilter};

use sitecheck_core::{
    load_sites, Checker, HttpProber, ReportContext, ReportRenderer, SiteCheckError, SiteProber,
    SiteStatus,
};

use crate::progress::ProgressWriter;
use crate::settings::{LogFormat, Overrides, Settings, SettingsFile};

/// Probe a list of websites and render their up/down status into a Markdown report.
#[derive(Parser)]
#[command(name = "sitecheck", version, about)]
struct Cli {
    /// Sites file (YAML). Falls back to $SITECHECK_SITES, then sites.yaml.
    #[arg(short, long)]
    sites: Option<PathBuf>,

    /// Report template. Falls back to $SITECHECK_TEMPLATE, then README.md.tmpl.
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Report output path. Falls back to $SITECHECK_OUTPUT, then README.md.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Optional TOML settings file.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Per-site request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Number of sites probed at once. Report order is unaffected.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Do not print per-site results to stdout.
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// Log output format.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Expose the run time to the template as `generated_at`.
    #[arg(long, default_value_t = false)]
    timestamp: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            sites: self.sites.clone(),
            template: self.template.clone(),
            output: self.output.clone(),
            timeout_secs: self.timeout_secs,
            concurrency: self.concurrency,
            quiet: self.quiet,
            log_format: self.log_format,
            timestamp: self.timestamp,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    // Drawn only once settings say so; log lines are routed around it.
    let progress = ProgressBar::hidden();

    let settings_file = match cli.settings.as_deref().map(SettingsFile::load).transpose() {
        Ok(file) => file,
        Err(e) => {
            init_tracing(cli.log_format.unwrap_or_default(), &progress);
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let settings = match Settings::resolve(
        &cli.overrides(),
        settings_file.as_ref(),
        settings::env_lookup,
    ) {
        Ok(s) => s,
        Err(e) => {
            init_tracing(cli.log_format.unwrap_or_default(), &progress);
            tracing::error!("Invalid settings: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(settings.log_format, &progress);
    tracing::debug!(?settings, "Resolved settings");

    let prober = match HttpProber::from_config(&settings.probe) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            std::process::exit(1);
        }
    };

    if settings.show_output {
        progress.set_draw_target(ProgressDrawTarget::stderr());
    }

    let statuses = match run(&settings, prober, &progress).await {
        Ok(statuses) => statuses,
        Err(e) => {
            tracing::error!(path = %e.path().display(), "{}", e);
            std::process::exit(1);
        }
    };

    if settings.show_output {
        print_statuses(&statuses);
    }
}

/// Load sites, probe them, write the report. Nothing is probed when the
/// sites file cannot be loaded.
async fn run(
    settings: &Settings,
    prober: Arc<dyn SiteProber>,
    progress: &ProgressBar,
) -> Result<Vec<SiteStatus>, SiteCheckError> {
    let sites = load_sites(&settings.sites_path)?;
    tracing::info!(
        path = %settings.sites_path.display(),
        count = sites.len(),
        "Loaded sites"
    );

    progress.set_length(sites.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let checker = Checker::new(prober, settings.probe.clone());
    let statuses = checker
        .check_all_with(&sites, |status| {
            progress.set_message(status.name.clone());
            progress.inc(1);
        })
        .await;
    progress.finish_and_clear();

    let mut context = ReportContext::new(&statuses);
    if settings.timestamp {
        context = context.with_generated_at(Utc::now());
    }
    ReportRenderer::load(&settings.template_path)?.write(&settings.output_path, &context)?;

    Ok(statuses)
}

fn print_statuses(statuses: &[SiteStatus]) {
    for s in statuses {
        let marker = if s.is_up() {
            style(s.status.marker()).green()
        } else {
            style(s.status.marker()).red()
        };
        println!("{}: {}", s.name, marker);
    }
}

fn init_tracing(log_format: LogFormat, progress: &ProgressBar) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let writer = ProgressWriter::new(progress.clone(), std::io::stderr);

    match log_format {
        LogFormat::Json => {
            fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .json()
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .init();
        }
    }
}
