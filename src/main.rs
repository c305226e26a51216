use clap::Parser;
use ingress_canary::annotations::Extractor;
use ingress_canary::config::{Settings, ANNOTATIONS_PREFIX_ENV};
use ingress_canary::manifest::load_ingresses;
use ingress_canary::report::CanaryReport;
use ingress_canary::resolver::OfflineResolver;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Resolve canary annotations of Ingress manifests
///
/// Prints one JSON report per Ingress on stdout.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Annotation key prefix (default: nginx.ingress.kubernetes.io)
    #[arg(long, env = ANNOTATIONS_PREFIX_ENV)]
    annotations_prefix: Option<String>,

    /// Exit with an error if any Ingress has an invalid canary configuration
    #[arg(long)]
    strict: bool,

    /// Pretty-print each report
    #[arg(long)]
    pretty: bool,

    /// Manifest files holding Ingress resources
    #[arg(required = true)]
    manifests: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, stdout carries the reports)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let settings = match &args.annotations_prefix {
        Some(prefix) => Settings::new(prefix)?,
        None => Settings::default(),
    };
    info!(prefix = %settings.annotations_prefix, "Resolving canary annotations");

    let extractor = Extractor::with_defaults(Arc::new(OfflineResolver), settings.reader());

    let mut invalid = 0usize;
    let mut total = 0usize;
    for path in &args.manifests {
        let ingresses = match load_ingresses(path).await {
            Ok(ingresses) => ingresses,
            Err(e) => {
                error!(error = %e, "Failed to load manifest");
                return Err(e.into());
            }
        };

        let source = path.display().to_string();
        if ingresses.is_empty() {
            warn!(manifest = %source, "No Ingress resources found");
        }

        for ing in &ingresses {
            let report = CanaryReport::from_extracted(&source, ing, &extractor.extract(ing));
            if report.is_invalid() {
                invalid += 1;
            }
            total += 1;

            let line = if args.pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{}", line);
        }
    }

    info!(ingresses = total, invalid, "Finished");

    if args.strict && invalid > 0 {
        anyhow::bail!(
            "{} of {} Ingress resources have an invalid canary configuration",
            invalid,
            total
        );
    }

    Ok(())
}
