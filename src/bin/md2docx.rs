//! Command-line adapter: converts Markdown files to Word documents.
//!
//! # Usage
//!
//! ```sh
//! md2docx notes.md
//! md2docx docs/*.md --out-dir build/ --verify
//! md2docx report.md --font Georgia --font-size 12 --title "Q3 Report"
//! ```
//!
//! Each `<stem>.md` becomes `<stem>.docx` next to its input, or inside
//! `--out-dir` when given. Inputs are converted in parallel.

use clap::Parser;
use log::{debug, info};
use md2docx::common::Error;
use md2docx::convert::{ConvertOptions, Converter, FsResolver, output_file_name};
use md2docx::ooxml::opc::verify_package;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Convert Markdown files to Word (.docx) documents
#[derive(Parser, Debug)]
#[command(name = "md2docx", version)]
struct Args {
    /// Markdown file(s) to convert (.md or .markdown)
    #[arg(value_name = "INPUT", required = true)]
    input: Vec<PathBuf>,

    /// Directory for the generated files (default: next to each input)
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(short, long)]
    force: bool,

    /// Reject inputs larger than this many bytes
    #[arg(long, value_name = "BYTES", default_value_t = 16 * 1024 * 1024)]
    max_bytes: usize,

    /// Check every produced package for missing or dangling parts
    #[arg(long)]
    verify: bool,

    /// Body font family
    #[arg(long, value_name = "NAME", default_value = "Calibri")]
    font: String,

    /// Body font size in points
    #[arg(long, value_name = "PT", default_value_t = 11.0)]
    font_size: f32,

    /// Monospace font for code
    #[arg(long, value_name = "NAME", default_value = "Consolas")]
    code_font: String,

    /// Code font size in points
    #[arg(long, value_name = "PT", default_value_t = 10.0)]
    code_font_size: f32,

    /// Widest an embedded image may be, in inches
    #[arg(long, value_name = "IN", default_value_t = 6.0)]
    max_image_width: f64,

    /// Document title (default: the first level-1 heading)
    #[arg(long)]
    title: Option<String>,

    /// Document author
    #[arg(long)]
    author: Option<String>,

    /// Log progress (debug level)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> ConvertOptions {
        let mut options = ConvertOptions::new()
            .with_body_font(&self.font, half_points(self.font_size))
            .with_code_font(&self.code_font, half_points(self.code_font_size))
            .with_max_image_width_inches(self.max_image_width);
        if let Some(title) = &self.title {
            options = options.with_title(title);
        }
        if let Some(author) = &self.author {
            options = options.with_creator(author);
        }
        options
    }

    fn output_path(&self, input: &Path) -> Result<PathBuf, BoxError> {
        let name = input
            .file_name()
            .ok_or_else(|| format!("Invalid input filename: {}", input.display()))?
            .to_string_lossy();
        let dir = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        Ok(dir.join(output_file_name(&name)))
    }
}

fn half_points(points: f32) -> u32 {
    (points * 2.0).round().max(1.0) as u32
}

fn main() -> Result<(), BoxError> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()?;

    if let Some(dir) = &args.out_dir {
        fs::create_dir_all(dir)?;
    }

    let options = args.options();
    let results: Vec<(&PathBuf, Result<PathBuf, BoxError>)> = args
        .input
        .par_iter()
        .map(|input| (input, convert_one(&args, &options, input)))
        .collect();

    let mut error_count = 0;
    for (input, result) in &results {
        match result {
            Ok(output) => println!("✓ {} -> {}", input.display(), output.display()),
            Err(e) => {
                error_count += 1;
                eprintln!("✗ {}: {}", input.display(), e);
            },
        }
    }

    if results.len() > 1 {
        info!(
            "{} converted, {} failed",
            results.len() - error_count,
            error_count
        );
    }
    if error_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Convert a single file and write the package.
fn convert_one(args: &Args, options: &ConvertOptions, input: &Path) -> Result<PathBuf, BoxError> {
    let name = input
        .file_name()
        .ok_or_else(|| format!("Invalid input filename: {}", input.display()))?
        .to_string_lossy()
        .into_owned();

    let size = fs::metadata(input)?.len() as usize;
    if size > args.max_bytes {
        return Err(Error::InputTooLarge {
            size,
            limit: args.max_bytes,
        }
        .into());
    }

    let text = fs::read_to_string(input).map_err(Error::Io)?;
    let base_dir = input.parent().map(Path::to_path_buf).unwrap_or_default();
    let converter = Converter::new(options.clone()).with_resolver(FsResolver::new(base_dir));
    let converted = converter.convert_file(&name, &text)?;

    if args.verify {
        let report = verify_package(&converted.bytes)?;
        if !report.is_valid() {
            let problems: Vec<String> = report.violations.iter().map(|v| v.to_string()).collect();
            return Err(format!("invalid package: {}", problems.join("; ")).into());
        }
        debug!("{}: {} parts verified", name, report.parts.len());
    }

    let output = args.output_path(input)?;
    if output.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            output.display()
        )
        .into());
    }
    fs::write(&output, &converted.bytes)?;
    debug!("wrote {} ({} bytes)", output.display(), converted.bytes.len());
    Ok(output)
}
