mod echo;
mod logging;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use folio_core::crawl::{DEFAULT_LIST_URL, DEFAULT_SITE_ROOT};
use folio_core::{
    BookTable, CrawlConfig, Crawler, Document, FetchConfig, JsonConfig, Recommender, TOP_N, book_links,
    extract_book, fetch_file, fetch_stdin, fetch_url, record_to_json, record_to_text, records_to_json,
};
use owo_colors::OwoColorize;
use url::Url;

use crate::echo::{format_size, print_banner, print_detail, print_info, print_step, print_success, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for book records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// Harvest book records from list pages and recommend similar books
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author = "Folio Contributors")]
#[command(version)]
#[command(about = "Harvest book records and find similar books", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a range of list pages and write the book tables
    Crawl(CrawlArgs),
    /// Extract one book record from a detail page
    Extract(ExtractArgs),
    /// Print the book links found on a list page
    Links(LinksArgs),
    /// Find books whose title contains a query (case-insensitive)
    Search(SearchArgs),
    /// Recommend books similar to a title
    Recommend(RecommendArgs),
    /// Generate a shell completion script
    Completions {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct HttpArgs {
    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,
}

impl HttpArgs {
    fn fetch_config(&self) -> FetchConfig {
        let defaults = FetchConfig::default();
        FetchConfig { timeout: self.timeout, user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent) }
    }
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// First list page (inclusive)
    #[arg(long, default_value = "1", value_name = "N")]
    start: u32,

    /// Last list page (inclusive)
    #[arg(long, default_value = "100", value_name = "N")]
    end: u32,

    /// Delay between requests in milliseconds
    #[arg(long, default_value = "250", value_name = "MS")]
    delay_ms: u64,

    /// Directory for pages-<start>-<end>.tsv and .csv
    #[arg(short, long, default_value = "output", value_name = "DIR")]
    output_dir: PathBuf,

    /// List to crawl; `page=N` is appended per page
    #[arg(long, default_value = DEFAULT_LIST_URL, value_name = "URL")]
    list_url: String,

    /// Base URL for resolving book links
    #[arg(long, default_value = DEFAULT_SITE_ROOT, value_name = "URL")]
    site_root: String,

    #[command(flatten)]
    http: HttpArgs,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(flatten)]
    http: HttpArgs,
}

#[derive(Args, Debug)]
struct LinksArgs {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Base URL for resolving book links
    #[arg(long, default_value = DEFAULT_SITE_ROOT, value_name = "URL")]
    site_root: String,

    #[command(flatten)]
    http: HttpArgs,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Substring to look for in titles
    #[arg(value_name = "QUERY")]
    query: String,

    /// Book table (.tsv or .csv) written by a crawl
    #[arg(long, value_name = "FILE")]
    books: PathBuf,

    /// Maximum number of titles to print
    #[arg(long, value_name = "NUM")]
    limit: Option<usize>,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// Exact title of the book to start from
    #[arg(value_name = "TITLE")]
    title: String,

    /// Book table (.tsv or .csv) written by a crawl
    #[arg(long, value_name = "FILE")]
    books: PathBuf,

    /// Similarity matrix (headerless CSV, one row per book)
    #[arg(long, value_name = "FILE")]
    similarity: PathBuf,

    /// Number of recommendations
    #[arg(short = 'n', long, default_value_t = TOP_N, value_name = "NUM")]
    count: usize,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,
}

/// Reads HTML from a URL, a file, or stdin; URLs are returned alongside
async fn read_input(input: &str, http: &HttpArgs) -> anyhow::Result<(String, Option<Url>)> {
    tracing::debug!(input, "reading input");
    if input == "-" {
        let html = fetch_stdin().context("Failed to read from stdin")?;
        Ok((html, None))
    } else if input.starts_with("http://") || input.starts_with("https://") {
        let html = fetch_url(input, &http.fetch_config()).await.context("Failed to fetch URL")?;
        let url = Url::parse(input).context("Invalid URL")?;
        Ok((html, Some(url)))
    } else {
        let html = fetch_file(input).with_context(|| format!("Failed to read file: {}", input))?;
        Ok((html, None))
    }
}

fn write_output(output: String, path: Option<PathBuf>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => println!("{}", output),
    }
    Ok(())
}

async fn run_crawl(args: CrawlArgs, verbose: bool) -> anyhow::Result<()> {
    let config = CrawlConfig::builder()
        .pages(args.start, args.end)
        .delay(Duration::from_millis(args.delay_ms))
        .list_url(args.list_url)
        .site_root(args.site_root)
        .output_dir(args.output_dir)
        .fetch(args.http.fetch_config())
        .build();

    let crawler = Crawler::with_http(config).context("Invalid crawl configuration")?;
    let config = crawler.config();

    if verbose {
        print_step(1, 2, &format!("Crawling list pages {}-{}", config.start_page, config.end_page));
        print_detail("List", &config.list_url);
        print_detail("Delay", &format!("{}ms", config.delay.as_millis()));
        eprintln!();
    }

    let started = Instant::now();
    let report = crawler.run().await.context("Crawl failed")?;

    if verbose {
        print_step(2, 2, "Writing book tables");
    }

    let (tsv, csv) = report
        .sink
        .write_outputs(&config.output_dir, config.start_page, config.end_page)
        .context("Failed to write book tables")?;

    echo::print_crawl_summary(&report.summary, started.elapsed(), &tsv, &csv);
    if report.sink.is_empty() {
        print_warning("No books were extracted");
    } else {
        print_success(&format!("{} books written", report.sink.len()));
    }

    Ok(())
}

async fn run_extract(args: ExtractArgs, verbose: bool) -> anyhow::Result<()> {
    if verbose {
        print_step(1, 3, &format!("Reading {}", args.input.bright_white()));
    }

    let (html, url) = read_input(&args.input, &args.http).await?;

    if verbose {
        print_detail("Size", &format_size(html.len()));
        eprintln!();
        print_step(2, 3, "Extracting book record");
    }

    let doc = match url {
        Some(url) => Document::parse_with_url(&html, url),
        None => Document::parse(&html),
    }
    .context("Failed to parse HTML")?;

    let book = extract_book(&doc).context("Failed to extract book")?;

    if verbose {
        let missing = book.missing_fields();
        if !missing.is_empty() {
            print_warning(&format!("Missing fields: {}", missing.join(", ")));
        }
        eprintln!();
        print_step(3, 3, "Writing output");
    }

    let output = match args.format {
        OutputFormat::Text => record_to_text(&book),
        OutputFormat::Json => {
            record_to_json(&book, &JsonConfig { pretty: args.pretty }).context("Failed to convert to JSON")?
        }
    };

    write_output(output, args.output)
}

async fn run_links(args: LinksArgs, verbose: bool) -> anyhow::Result<()> {
    let site_root = Url::parse(&args.site_root).context("Invalid site root")?;
    let (html, _) = read_input(&args.input, &args.http).await?;

    let doc = Document::parse(&html).context("Failed to parse HTML")?;
    let links = book_links(&doc, &site_root).context("Failed to collect book links")?;

    if verbose {
        print_info(&format!("{} book links", links.len()));
    }
    for link in links {
        println!("{}", link);
    }

    Ok(())
}

fn run_search(args: SearchArgs) -> anyhow::Result<()> {
    let table = BookTable::from_path(&args.books)
        .with_context(|| format!("Failed to load book table: {}", args.books.display()))?;

    let titles = table.autocomplete(&args.query, args.limit.unwrap_or(usize::MAX));
    if titles.is_empty() {
        print_warning(&format!("No titles match \"{}\"", args.query));
    }

    for title in titles {
        println!("{}", title);
    }

    Ok(())
}

fn run_recommend(args: RecommendArgs) -> anyhow::Result<()> {
    let recommender = Recommender::load(&args.books, &args.similarity).context("Failed to load recommender data")?;

    let Some(books) = recommender.recommend_n(&args.title, args.count) else {
        anyhow::bail!("Title not found in index: {}", args.title);
    };

    let output = match args.format {
        OutputFormat::Text => books.iter().map(|book| book.title.as_str()).collect::<Vec<_>>().join("\n"),
        OutputFormat::Json => records_to_json(&books, &JsonConfig::default()).context("Failed to convert to JSON")?,
    };
    println!("{}", output);

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    if cli.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    match cli.command {
        Command::Crawl(args) => run_crawl(args, cli.verbose).await,
        Command::Extract(args) => run_extract(args, cli.verbose).await,
        Command::Links(args) => run_links(args, cli.verbose).await,
        Command::Search(args) => run_search(args),
        Command::Recommend(args) => run_recommend(args),
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "folio", &mut io::stdout());
            Ok(())
        }
    }
}
