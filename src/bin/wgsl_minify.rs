//! Command-line front end for the `wgsl-minify` library. Turns flags into a
//! [`MinifyOptions`], reads one or more `.wgsl` files (or stdin), and writes
//! the minified result to disk or stdout.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use globset::Glob;
use rayon::prelude::*;
use wgsl_common::{Diagnostic, MinifyOptions, SourceMapOptions};

/// Minify or pretty-print WGSL shader source.
#[derive(Parser, Debug)]
#[command(name = "wgsl-minify", version, about = "Source-to-source minifier for WGSL")]
struct CliArgs {
    /// Input file, or a glob pattern for batch processing (e.g. "shaders/**/*.wgsl").
    /// Reads from stdin when omitted.
    input: Option<String>,

    /// Write output to this path instead of overwriting each input in place.
    /// Ignored when more than one input file is matched.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the result to stdout instead of writing a file.
    #[arg(long)]
    stdout: bool,

    /// Disable whitespace minification.
    #[arg(long = "no-minify-whitespace")]
    no_minify_whitespace: bool,

    /// Disable identifier minification.
    #[arg(long = "no-minify-identifiers")]
    no_minify_identifiers: bool,

    /// Permit literal-level syntax tidying, e.g. `1.0` -> `1.`.
    #[arg(long)]
    minify_syntax: bool,

    /// Mangle `@group`/`@binding` variable names instead of preserving them.
    #[arg(long)]
    mangle_external_bindings: bool,

    /// Disable tree-shaking of unused declarations.
    #[arg(long = "no-tree-shaking")]
    no_tree_shaking: bool,

    /// Keep the struct type of any uniform/storage binding un-renamed.
    #[arg(long)]
    preserve_uniform_struct_types: bool,

    /// Identifier spellings the renamer must never emit.
    #[arg(long, value_delimiter = ',')]
    keep_names: Vec<String>,

    /// Emit a `<output>.map` source map alongside the minified output.
    #[arg(long)]
    source_map: bool,

    /// Increase log verbosity; repeat for more detail (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl CliArgs {
    fn options(&self) -> MinifyOptions {
        MinifyOptions {
            minify_whitespace: !self.no_minify_whitespace,
            minify_identifiers: !self.no_minify_identifiers,
            minify_syntax: self.minify_syntax,
            mangle_external_bindings: self.mangle_external_bindings,
            tree_shaking: !self.no_tree_shaking,
            preserve_uniform_struct_types: self.preserve_uniform_struct_types,
            keep_names: self.keep_names.clone(),
            source_map: self.source_map,
            source_map_options: SourceMapOptions::default(),
        }
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).without_time().init();
}

fn render_diagnostic(path: &str, diagnostic: &Diagnostic) {
    let label = if diagnostic.is_error() { "error".red().bold() } else { "warning".yellow().bold() };
    eprintln!("{label}: {path}:{}:{}: {}", diagnostic.line, diagnostic.column, diagnostic.message);
}

/// Resolves `pattern` to a file list: a direct path if it exists, otherwise
/// a glob walked from the current directory (per §12's "glob pattern for
/// batch processing multiple .wgsl files in parallel").
fn resolve_inputs(pattern: &str) -> Result<Vec<PathBuf>> {
    let direct = Path::new(pattern);
    if direct.is_file() {
        return Ok(vec![direct.to_path_buf()]);
    }

    let matcher = Glob::new(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?.compile_matcher();
    let matches: Vec<PathBuf> = walkdir::WalkDir::new(".")
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| matcher.is_match(path))
        .collect();

    if matches.is_empty() {
        bail!("no files matched pattern: {pattern}");
    }
    Ok(matches)
}

/// Minifies one file and writes its result, returning whether it was
/// error-free. Errors are rendered to stderr as they're found; the caller
/// aggregates exit status across every input.
fn process_file(path: &Path, options: &MinifyOptions, args: &CliArgs, single_input: bool) -> Result<bool> {
    let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let output = wgsl_minify::minify(&source, options);

    let path_text = path.display().to_string();
    for diagnostic in &output.errors {
        render_diagnostic(&path_text, diagnostic);
    }

    let dest = if args.output.is_some() && single_input { args.output.clone() } else { None };

    if args.stdout || (args.output.is_none() && !single_input) {
        io::stdout().write_all(output.code.as_bytes())?;
    } else {
        let dest = dest.unwrap_or_else(|| path.to_path_buf());
        fs::write(&dest, &output.code).with_context(|| format!("writing {}", dest.display()))?;
        if let Some(mappings) = &output.source_map {
            let map_path = dest.with_extension(format!("{}.map", dest.extension().and_then(|e| e.to_str()).unwrap_or("wgsl")));
            let json = serde_json::to_string_pretty(mappings).context("serializing source map")?;
            fs::write(&map_path, json).with_context(|| format!("writing {}", map_path.display()))?;
        }
    }

    Ok(output.errors.iter().all(|d| !d.is_error()))
}

fn run_stdin(options: &MinifyOptions) -> Result<bool> {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source).context("reading stdin")?;
    let output = wgsl_minify::minify(&source, options);
    for diagnostic in &output.errors {
        render_diagnostic("<stdin>", diagnostic);
    }
    io::stdout().write_all(output.code.as_bytes())?;
    Ok(output.errors.iter().all(|d| !d.is_error()))
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);
    let options = args.options();

    let ok = match &args.input {
        None => run_stdin(&options)?,
        Some(pattern) => {
            let inputs = resolve_inputs(pattern)?;
            let single_input = inputs.len() == 1;
            let results: Vec<Result<bool>> = inputs.par_iter().map(|path| process_file(path, &options, &args, single_input)).collect();

            let mut all_ok = true;
            for result in results {
                match result {
                    Ok(file_ok) => all_ok &= file_ok,
                    Err(err) => {
                        eprintln!("{}: {err:#}", "error".red().bold());
                        all_ok = false;
                    }
                }
            }
            all_ok
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
