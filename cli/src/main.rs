//! markupdoc CLI - render operation scripts to markup
//!
//! A command-line tool for turning JSON operation scripts into AsciiDoc,
//! Markdown, or Confluence wiki markup.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use markupdoc::encoding_rs::Encoding;
use markupdoc::{BuilderOptions, MarkupDocBuilder, MarkupLanguage, Script};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Render document scripts to AsciiDoc, Markdown, and Confluence markup
#[derive(Parser)]
#[command(
    name = "markupdoc",
    author = "iyulab",
    version,
    about = "Render document scripts to markup",
    long_about = "markupdoc - Fluent markup document builder.\n\n\
                  Replays JSON operation scripts and writes AsciiDoc, Markdown, or Confluence wiki markup."
)]
struct Cli {
    /// Log builder activity (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one or more scripts
    Render {
        /// Script files (JSON)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Target dialects (repeatable)
        #[arg(short, long = "to", value_delimiter = ',', default_value = "asciidoc")]
        to: Vec<Dialect>,

        /// Output directory (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Prefix for generated anchors (overrides the script's own)
        #[arg(long)]
        anchor_prefix: Option<String>,

        /// Output charset label, e.g. utf-8, windows-1252, utf-16le
        #[arg(long, default_value = "utf-8")]
        encoding: String,
    },

    /// Print the anchor token generated for a title
    Normalize {
        /// Title text
        title: String,

        /// Anchor prefix
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Show version information
    Version,
}

/// Target markup dialect
#[derive(Clone, Copy, ValueEnum)]
enum Dialect {
    /// AsciiDoc (.adoc)
    #[value(alias = "adoc")]
    Asciidoc,
    /// Markdown (.md)
    #[value(alias = "md")]
    Markdown,
    /// Confluence wiki markup (.txt)
    #[value(alias = "wiki")]
    Confluence,
}

impl From<Dialect> for MarkupLanguage {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Asciidoc => MarkupLanguage::AsciiDoc,
            Dialect::Markdown => MarkupLanguage::Markdown,
            Dialect::Confluence => MarkupLanguage::Confluence,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Render {
            inputs,
            to,
            output,
            anchor_prefix,
            encoding,
        } => {
            let encoding = Encoding::for_label(encoding.as_bytes())
                .ok_or_else(|| format!("unknown encoding: {encoding}"))?;
            let languages: Vec<MarkupLanguage> = to.into_iter().map(Into::into).collect();

            match output {
                Some(dir) => {
                    render_to_dir(&inputs, &languages, &dir, anchor_prefix.as_deref(), encoding)?
                }
                None => render_to_stdout(&inputs, &languages, anchor_prefix.as_deref())?,
            }
        }

        Commands::Normalize { title, prefix } => {
            let token = markupdoc::normalize_anchor(&title, prefix.as_deref())?;
            println!("{token}");
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn load_script(path: &Path, anchor_prefix: Option<&str>) -> markupdoc::Result<Script> {
    let mut script = Script::from_path(path)?;
    if let Some(prefix) = anchor_prefix {
        script.anchor_prefix = Some(prefix.to_string());
    }
    tracing::debug!(
        path = %path.display(),
        operations = script.operations.len(),
        "script loaded"
    );
    Ok(script)
}

fn render_to_stdout(
    inputs: &[PathBuf],
    languages: &[MarkupLanguage],
    anchor_prefix: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for input in inputs {
        let script = load_script(input, anchor_prefix)?;
        for &language in languages {
            write!(handle, "{}", script.render(language)?)?;
        }
    }
    Ok(())
}

fn render_to_dir(
    inputs: &[PathBuf],
    languages: &[MarkupLanguage],
    dir: &Path,
    anchor_prefix: Option<&str>,
    encoding: &'static Encoding,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = create_progress((inputs.len() * languages.len()) as u64);

    let mut written = 0;
    for input in inputs {
        let script = load_script(input, anchor_prefix)?;
        let name = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| format!("no file name in {}", input.display()))?;

        for &language in languages {
            pb.set_message(format!("{name} ({language})"));

            let mut options = BuilderOptions::new(language);
            options.anchor_prefix = script.anchor_prefix.clone();
            let mut builder = MarkupDocBuilder::with_options(options);
            script.apply(&mut builder)?;
            builder.write_to_file(dir, &name, encoding)?;

            written += 1;
            pb.inc(1);
        }
    }

    pb.finish_and_clear();
    println!(
        "{} Rendered {} documents to {}",
        "✓".green().bold(),
        written,
        dir.display()
    );
    Ok(())
}

fn print_version() {
    println!("{} {}", "markupdoc".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Fluent markup document builder");
    println!();
    println!("Dialects: AsciiDoc, Markdown, Confluence wiki markup");
    println!("Repository: https://github.com/iyulab/markupdoc");
}

fn create_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template("{bar:30.blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb
}
