use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("aaview")
        .version(env!("CARGO_PKG_VERSION"))
        .author("aaview Contributors")
        .about("View ASCII-art threads without breaking the art")
        .arg(clap::arg!([INPUT] "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(clap::arg!(-a --anchor_only "Keep only anchor posts and the post right after each one"))
        .arg(clap::arg!(--start <NUM> "First post of the window (1-based)").default_value("1"))
        .arg(clap::arg!(--size <NUM> "Number of posts in the window").default_value("400"))
        .arg(clap::arg!(--all "Show every post, up to the hard limit"))
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (text, html, json)")
                .value_name("FORMAT")
                .default_value("text")
                .value_parser(["text", "html", "json"]),
        )
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("15"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(--header_selector <SELECTOR> "CSS selector for post headers"))
        .arg(clap::arg!(--body_selector <SELECTOR> "CSS selector for post bodies"))
        .arg(clap::arg!(--anchor_marker <CHAR> "Character marking anchor posts in the header"))
        .arg(
            clap::arg!(--history_file <FILE> "History file (default: platform data directory)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--no_history "Do not record fetched URLs"))
        .arg(clap::arg!(--history "List recently viewed URLs and exit"))
        .arg(clap::arg!(--last "Reopen the most recently viewed URL"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "aaview", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "aaview", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "aaview", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "aaview", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
