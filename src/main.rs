use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use oas_request_guard::{
    ErrorCategory, GuardConfig, RequestContext, RequestValidator, ResolveReference,
};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Validate HTTP requests against an OpenAPI 2.0 document
#[derive(Parser, Debug)]
#[command(name = "oas-guard", version, about, long_about = None)]
struct Cli {
    /// OpenAPI document; defaults to $OAS_FILE or ./schemas/oas.json
    #[arg(long, global = true)]
    spec: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate one request and exit 0 (pass), 1 (rejected) or 2 (internal error).
    Check(CheckArgs),
    /// List every operation and the parameter locations it declares.
    Routes,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[arg(long, short = 'X', default_value = "GET")]
    method: String,

    /// Server route template, e.g. /books/<isbn>
    #[arg(long, conflicts_with = "uri", required_unless_present = "uri")]
    route: Option<String>,

    /// Concrete request path, matched against the document's templates
    #[arg(long)]
    uri: Option<String>,

    /// Raw query string
    #[arg(long, short, default_value = "")]
    query: String,

    /// JSON body file, or - for stdin
    #[arg(long, short)]
    body: Option<PathBuf>,

    /// Coerce integer, number and boolean query values before validating
    #[arg(long)]
    coerce_query: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "oas_request_guard=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = match cli.spec {
        Some(spec) => GuardConfig::new(spec),
        None => GuardConfig::from_env(&std::env::current_dir()?),
    };

    match cli.command {
        Commands::Check(args) => {
            config.coerce_query_scalars |= args.coerce_query;
            let validator = RequestValidator::from_config(&config)
                .with_context(|| format!("loading {}", config.spec_file.display()))?;
            check(&validator, &args)
        }
        Commands::Routes => {
            let validator = RequestValidator::from_config(&config)
                .with_context(|| format!("loading {}", config.spec_file.display()))?;
            routes(&validator)
        }
    }
}

fn check(validator: &RequestValidator, args: &CheckArgs) -> Result<ExitCode> {
    let body = args.body.as_deref().map(read_body).transpose()?;
    let method = args.method.to_uppercase();

    let (target, outcome) = match (&args.route, &args.uri) {
        (Some(route), _) => {
            let mut request = RequestContext::new(&args.method, route).with_query(&args.query);
            if let Some(body) = &body {
                request = request.with_body(body);
            }
            (route.clone(), validator.validate(&request))
        }
        (None, Some(uri)) => match validator.match_uri(uri) {
            // Matched keys are already relative to basePath.
            Some(matched) => {
                let outcome =
                    validator.validate_key(&matched.key, &args.method, &args.query, body.as_ref());
                (uri.clone(), outcome)
            }
            None => {
                println!("✗ No path template matches {}", uri);
                return Ok(ExitCode::from(1));
            }
        },
        (None, None) => bail!("either --route or --uri is required"),
    };

    match outcome {
        Ok(()) => {
            println!("✓ {} {} passed validation", method, target);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.category() == ErrorCategory::Rejected => {
            println!("✗ {} {} rejected: {}", method, target, e);
            Ok(ExitCode::from(1))
        }
        Err(e) => Err(e.into()),
    }
}

fn read_body(path: &Path) -> Result<Value> {
    let text = if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("reading body from stdin")?;
        text
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    serde_json::from_str(&text).context("request body is not valid JSON")
}

fn routes(validator: &RequestValidator) -> Result<ExitCode> {
    let document = validator.document();
    for (path, item) in &document.paths {
        for (method, operation) in item.iter() {
            let mut locations = Vec::new();
            for parameter in &operation.parameters {
                let parameter = parameter.resolve(document)?;
                let location = parameter.location.as_str();
                if !locations.contains(&location) {
                    locations.push(location);
                }
            }
            println!("{:<7} {:<40} [{}]", method.as_str(), path, locations.join(", "));
        }
    }
    Ok(ExitCode::SUCCESS)
}
