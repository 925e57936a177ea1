use crate::config::{Config, OutputFormat};
use crate::html::parse_html;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use notepaste_cleaner::{CleanOptions, Cleaner};
use notepaste_document::export_xml;
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const DEFAULT_OUT_DIR: &str = "cleaned";

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// HTML file or directory of HTML files (`-` or nothing reads stdin)
    pub path: Option<String>,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON and XML output
    #[arg(long)]
    pub pretty: bool,

    /// Pass through inline elements whose kind is already open
    #[arg(long)]
    pub dedupe_inline: bool,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

/// Config file values with command-line flags applied on top
#[derive(Debug, Clone)]
pub struct Settings {
    pub format: OutputFormat,
    pub pretty: bool,
    pub out_dir: Option<String>,
    pub clean: CleanOptions,
}

impl Settings {
    pub fn resolve(args: &CleanArgs, config: Config) -> Self {
        let mut clean = config.clean;
        if args.dedupe_inline {
            clean.dedupe_inline = true;
        }
        Self {
            format: args.format.unwrap_or(config.format),
            pretty: args.pretty || config.pretty,
            out_dir: args.out_dir.clone().or(config.out_dir),
            clean,
        }
    }
}

pub fn clean(args: CleanArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let settings = Settings::resolve(&args, config);
    debug!(?settings, "Resolved settings");

    let path = match args.path.as_deref() {
        None | Some("-") => return clean_stdin(&settings),
        Some(path) => PathBuf::from(cwd).join(path),
    };

    if path.is_file() {
        let output = render(&fs::read_to_string(&path)?, &settings)?;
        match (&settings.out_dir, args.stdout) {
            (Some(out_dir), false) => {
                let name = PathBuf::from(path.file_name().unwrap_or_default());
                let output_file = write_output(&PathBuf::from(cwd).join(out_dir), &name, &settings, &output)?;
                println!("  {} {} → {}", "✓".green(), path.display(), output_file.display());
            }
            _ => println!("{}", output),
        }
        Ok(())
    } else if path.is_dir() {
        clean_directory(&path, &args, &settings, cwd)
    } else {
        Err(anyhow!("Input path does not exist: {}", path.display()))
    }
}

fn clean_stdin(settings: &Settings) -> Result<()> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    println!("{}", render(&input, settings)?);
    Ok(())
}

fn clean_directory(dir: &Path, args: &CleanArgs, settings: &Settings, cwd: &str) -> Result<()> {
    let files = find_html_files(dir);
    if files.is_empty() {
        println!("{}", "⚠️  No .html files found".yellow());
        return Ok(());
    }

    let out_dir = PathBuf::from(cwd).join(settings.out_dir.as_deref().unwrap_or(DEFAULT_OUT_DIR));
    if !args.stdout {
        println!("{}", "🧹 Cleaning HTML files...".bright_blue().bold());
        println!("Found {} files", files.len());
    }

    let mut success_count = 0;
    let mut error_count = 0;

    for file in &files {
        let relative_path = file.strip_prefix(dir).unwrap_or(file);
        let result = fs::read_to_string(file)
            .map_err(anyhow::Error::from)
            .and_then(|html| render(&html, settings));

        match result {
            Ok(output) if args.stdout => {
                success_count += 1;
                println!("{}", output);
            }
            Ok(output) => match write_output(&out_dir, relative_path, settings, &output) {
                Ok(output_file) => {
                    success_count += 1;
                    println!(
                        "  {} {} → {}",
                        "✓".green(),
                        relative_path.display(),
                        output_file.display()
                    );
                }
                Err(e) => {
                    error_count += 1;
                    report_failure(relative_path, &e);
                }
            },
            Err(e) => {
                error_count += 1;
                report_failure(relative_path, &e);
            }
        }
    }

    info!(success_count, error_count, "Directory cleaned");
    if args.stdout {
        return Ok(());
    }

    println!();
    if error_count == 0 {
        println!("{} Cleaned {} files successfully", "✅".green(), success_count);
    } else {
        println!(
            "{} Cleaned {} files, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
    }
    Ok(())
}

fn report_failure(path: &Path, err: &anyhow::Error) {
    eprintln!("  {} {} - {}", "✗".red(), path.display(), err.to_string().red());
}

fn find_html_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|s| s.to_str()),
                Some("html") | Some("htm")
            )
        })
        .collect();
    files.sort();
    files
}

fn write_output(out_dir: &Path, relative_path: &Path, settings: &Settings, output: &str) -> Result<PathBuf> {
    let output_file = out_dir
        .join(relative_path)
        .with_extension(settings.format.extension());
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, output)?;
    Ok(output_file)
}

/// Parse, clean and format one HTML input.
pub fn render(html: &str, settings: &Settings) -> Result<String> {
    let source = parse_html(html);
    let output = Cleaner::standard(settings.clean.clone()).clean(&source)?;

    let rendered = match settings.format {
        OutputFormat::Markup => output.to_markup(),
        OutputFormat::Tree => to_json(&output.to_tree(), settings.pretty)?,
        OutputFormat::Events => to_json(output.events(), settings.pretty)?,
        OutputFormat::Xml => export_xml(&output.to_tree(), settings.pretty)?,
    };
    Ok(rendered)
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
