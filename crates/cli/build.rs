use std::{env, fs, path::PathBuf};

/// A valued long option; `long` is the kebab-case flag the derive CLI accepts.
fn option(long: &'static str, value_name: &'static str, help: &'static str) -> clap::Arg {
    clap::Arg::new(long).long(long).value_name(value_name).help(help)
}

fn http_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(option("timeout", "SECS", "HTTP timeout in seconds").default_value("30"))
        .arg(option("user-agent", "UA", "Custom User-Agent for HTTP requests"))
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let crawl = http_args(
        clap::Command::new("crawl")
            .about("Crawl a range of list pages and write the book tables")
            .arg(clap::arg!(--start <N> "First list page (inclusive)").default_value("1"))
            .arg(clap::arg!(--end <N> "Last list page (inclusive)").default_value("100"))
            .arg(option("delay-ms", "MS", "Delay between requests in milliseconds").default_value("250"))
            .arg(
                option("output-dir", "DIR", "Directory for the TSV and CSV tables")
                    .short('o')
                    .default_value("output")
                    .value_parser(clap::value_parser!(std::path::PathBuf)),
            )
            .arg(option("list-url", "URL", "List to crawl"))
            .arg(option("site-root", "URL", "Base URL for resolving book links")),
    );

    let extract = http_args(
        clap::Command::new("extract")
            .about("Extract one book record from a detail page")
            .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
            .arg(
                clap::arg!(-f --format <FORMAT> "Output format (text, json)")
                    .default_value("text")
                    .value_parser(["text", "json"]),
            )
            .arg(clap::arg!(--pretty "Pretty-print JSON output"))
            .arg(
                clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                    .value_parser(clap::value_parser!(std::path::PathBuf)),
            ),
    );

    let links = http_args(
        clap::Command::new("links")
            .about("Print the book links found on a list page")
            .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
            .arg(option("site-root", "URL", "Base URL for resolving book links")),
    );

    let search = clap::Command::new("search")
        .about("Find books whose title contains a query")
        .arg(clap::arg!(<QUERY> "Substring to look for in titles"))
        .arg(clap::arg!(--books <FILE> "Book table").value_parser(clap::value_parser!(std::path::PathBuf)))
        .arg(clap::arg!(--limit <NUM> "Maximum number of titles to print"));

    let recommend = clap::Command::new("recommend")
        .about("Recommend books similar to a title")
        .arg(clap::arg!(<TITLE> "Exact title of the book to start from"))
        .arg(clap::arg!(--books <FILE> "Book table").value_parser(clap::value_parser!(std::path::PathBuf)))
        .arg(
            clap::arg!(--similarity <FILE> "Similarity matrix")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(-n --count <NUM> "Number of recommendations").default_value("10"))
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (text, json)")
                .default_value("text")
                .value_parser(["text", "json"]),
        );

    let completions = clap::Command::new("completions")
        .about("Generate a shell completion script")
        .arg(clap::arg!(<SHELL> "Target shell").value_parser(["bash", "zsh", "fish", "powershell", "elvish"]));

    let mut cmd = clap::Command::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Folio Contributors")
        .about("Harvest book records and find similar books")
        .arg(clap::arg!(-v --verbose "Enable debug logging").global(true))
        .subcommand(crawl)
        .subcommand(extract)
        .subcommand(links)
        .subcommand(search)
        .subcommand(recommend)
        .subcommand(completions);

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "folio", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "folio", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "folio", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "folio", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
