use std::fs;
use std::path::{Path, PathBuf};

use aaview_core::{
    AaviewError, OutputFormat, RangeMode, ThreadView, UrlHistory, Viewer, ViewerConfig, default_history_path,
    read_file, read_stdin,
};
use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod echo;

use echo::{
    format_size, print_banner, print_detail, print_error, print_history, print_info, print_step, print_success,
    print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// View ASCII-art threads with every space and line break intact
#[derive(Parser, Debug)]
#[command(name = "aaview")]
#[command(author = "aaview Contributors")]
#[command(version)]
#[command(about = "View ASCII-art threads without breaking the art", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT", required_unless_present_any = ["history", "last"])]
    input: Option<String>,

    /// Keep only anchor posts and the post right after each one
    #[arg(short, long)]
    anchor_only: bool,

    /// First post of the window (1-based)
    #[arg(long, default_value = "1", value_name = "NUM")]
    start: usize,

    /// Number of posts in the window
    #[arg(long, default_value = "400", value_name = "NUM")]
    size: usize,

    /// Show every post, up to the hard limit
    #[arg(long)]
    all: bool,

    /// Output format (text, html, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "15", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// CSS selector for post headers
    #[arg(long, value_name = "SELECTOR")]
    header_selector: Option<String>,

    /// CSS selector for post bodies
    #[arg(long, value_name = "SELECTOR")]
    body_selector: Option<String>,

    /// Character marking anchor posts in the header
    #[arg(long, value_name = "CHAR")]
    anchor_marker: Option<char>,

    /// History file (default: platform data directory)
    #[arg(long, value_name = "FILE")]
    history_file: Option<PathBuf>,

    /// Do not record fetched URLs
    #[arg(long)]
    no_history: bool,

    /// List recently viewed URLs and exit
    #[arg(long)]
    history: bool,

    /// Reopen the most recently viewed URL
    #[arg(long, conflicts_with = "input")]
    last: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Where the page bytes come from
#[derive(Debug, PartialEq, Eq)]
enum Source {
    Stdin,
    File(String),
    Remote(String),
}

impl Source {
    fn classify(input: &str) -> Self {
        if input == "-" {
            Source::Stdin
        } else if !Path::new(input).exists() && is_remote(input) {
            Source::Remote(input.to_string())
        } else {
            Source::File(input.to_string())
        }
    }
}

/// Extensions that mark a dotted name as a local file rather than a host.
const LOCAL_EXTENSIONS: [&str; 5] = ["html", "htm", "xhtml", "dat", "txt"];

/// Whether an input that is not a local file should be fetched.
///
/// Anything with a scheme separator counts, including the truncated
/// `ttp://` forms, as does a dotted host with or without a path. A bare
/// `name.html` stays a file.
fn is_remote(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.contains("://") || trimmed.starts_with("www.") {
        return true;
    }

    let host = trimmed.split('/').next().unwrap_or_default();
    let Some((name, tld)) = host.rsplit_once('.') else {
        return false;
    };
    if name.is_empty() || tld.is_empty() || host.contains(char::is_whitespace) {
        return false;
    }

    trimmed.contains('/') || !LOCAL_EXTENSIONS.contains(&tld.to_ascii_lowercase().as_str())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "aaview_core=debug,aaview=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_config(args: &Args) -> ViewerConfig {
    let range = if args.all { RangeMode::All } else { RangeMode::bounded(args.start, args.size) };
    let mut builder = ViewerConfig::builder()
        .anchor_only(args.anchor_only)
        .range(range)
        .timeout(args.timeout);

    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }
    if let Some(selector) = &args.header_selector {
        builder = builder.header_selector(selector.clone());
    }
    if let Some(selector) = &args.body_selector {
        builder = builder.body_selector(selector.clone());
    }
    if let Some(marker) = args.anchor_marker {
        builder = builder.anchor_marker(marker);
    }

    builder.build()
}

fn load_history(path: Option<&Path>) -> UrlHistory {
    let Some(path) = path else {
        return UrlHistory::new();
    };

    UrlHistory::load(path).unwrap_or_else(|err| {
        print_warning(&format!("Could not read history: {}", err));
        UrlHistory::new()
    })
}

async fn load_view(viewer: &Viewer, source: &Source, verbose: bool) -> aaview_core::Result<ThreadView> {
    match source {
        Source::Stdin => {
            if verbose {
                print_step(1, 3, "Reading from stdin");
            }
            let bytes = read_stdin()?;
            if verbose {
                print_detail("Size", &format_size(bytes.len()));
            }
            viewer.view_bytes(&bytes, None, None)
        }
        Source::File(path) => {
            if verbose {
                print_step(1, 3, &format!("Reading from file {}", path.bright_white()));
            }
            let bytes = read_file(path)?;
            if verbose {
                print_detail("Size", &format_size(bytes.len()));
            }
            viewer.view_bytes(&bytes, None, Some(path))
        }
        Source::Remote(url) => {
            if verbose {
                print_step(1, 3, &format!("Fetching {}", url.bright_white().underline()));
            }
            viewer.fetch_and_view(url).await
        }
    }
}

/// Report a pipeline failure: errors exit non-zero, empty results are only a notice.
fn report(err: &AaviewError) -> ! {
    if err.category().is_fatal() {
        print_error(&err.user_message());
        std::process::exit(1);
    }

    print_info(&err.user_message());
    std::process::exit(0);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let history_path = args.history_file.clone().or_else(default_history_path);
    let mut history = load_history(history_path.as_deref());

    if args.history {
        if history.is_empty() {
            print_info("No threads viewed yet");
        } else {
            print_history(history.entries());
        }
        return Ok(());
    }

    let source = if args.last {
        match history.latest() {
            Some(url) => Source::Remote(url.to_string()),
            None => {
                print_error("No threads viewed yet");
                std::process::exit(1);
            }
        }
    } else {
        Source::classify(args.input.as_deref().unwrap_or_default())
    };

    debug!(?source, "resolved input");

    let viewer = Viewer::with_config(build_config(&args));
    let view = match load_view(&viewer, &source, args.verbose).await {
        Ok(view) => view,
        Err(err) => report(&err),
    };

    if args.verbose {
        eprintln!();
        print_step(2, 3, "Extracting posts");
        if let Some(title) = &view.title {
            print_detail("Title", title);
        }
        print_detail("Encoding", &view.encoding);
        print_detail("Posts", &format!("{} of {} extracted", view.len(), view.total_posts));
        print_detail("Range", &view.label);
        eprintln!();
    }

    if let Some(truncation) = &view.truncation {
        print_warning(&truncation.to_string());
    }

    if let (Source::Remote(_), Some(url), Some(path)) = (&source, &view.source, &history_path)
        && !args.no_history
    {
        history.push(url.clone());
        if let Err(err) = history.save(path) {
            print_warning(&format!("Could not save history: {}", err));
        }
    }

    let output = view.to_format(args.format).context("Failed to render output")?;

    if args.verbose {
        print_step(3, 3, "Writing output");
        print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}
