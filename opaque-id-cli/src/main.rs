//! # opaque-id
//!
//! CLI tool running the whole-crate opaque id pass.
//!
//! ## Usage
//!
//! ```bash
//! # Generate the registration (and per-declaration files) for the current crate
//! opaque-id generate
//!
//! # Watch mode for development
//! opaque-id generate --watch
//!
//! # Dry run to preview changes
//! opaque-id generate --dry-run
//!
//! # Initialize configuration
//! opaque-id init
//!
//! # Check generated files are up-to-date (exit status 2 when not)
//! opaque-id validate
//!
//! # Print the code generated for one declaration
//! opaque-id expand --name OrderId
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use opaque_id_cli::{
    config::{CliArgs, ConfigManager, CONFIG_FILENAME},
    error::{CliError, CliResult},
    generator::{ProjectGenerator, ProjectOutput},
    watcher::{FileWatcher, WatchEvent},
    writer::{FileWriter, WriteResult},
};
use opaque_id_codegen::Diagnostic;

#[derive(Parser)]
#[command(name = "opaque-id")]
#[command(author, version, about = "Generate strongly-typed opaque id code for a Rust crate", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Diagnostic output format
    #[arg(long, value_enum, global = true, default_value_t = MessageFormat::Human)]
    message_format: MessageFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MessageFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pass and write the generated files
    Generate {
        /// Crate root containing Cargo.toml
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory, relative to the crate root
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Watch for file changes and regenerate
        #[arg(short, long)]
        watch: bool,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Filter source files by path pattern (glob)
        #[arg(long)]
        filter: Option<String>,
    },

    /// Initialize a new opaque-id configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "opaque-id.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Validate that generated files are up-to-date
    Validate {
        /// Crate root containing Cargo.toml
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory, relative to the crate root
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the code generated for one declaration
    Expand {
        /// Name of the declared type
        #[arg(short, long)]
        name: String,

        /// Crate root containing Cargo.toml
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    let format = cli.message_format;
    match cli.command {
        Commands::Generate {
            input,
            output,
            watch,
            dry_run,
            config,
            filter,
        } => {
            let generator = project(&input, output, config.as_deref(), filter)?;
            if watch {
                run_watch_mode(&generator, dry_run, format)
            } else {
                run_generate(&generator, dry_run, format)
            }
        }

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Validate {
            input,
            output,
            config,
        } => cmd_validate(&project(&input, output, config.as_deref(), None)?, format),

        Commands::Expand {
            name,
            input,
            config,
        } => cmd_expand(&project(&input, None, config.as_deref(), None)?, &name, format),
    }
}

/// Load configuration and build the generator for a crate.
fn project(
    input: &Path,
    output: Option<PathBuf>,
    config_path: Option<&Path>,
    filter: Option<String>,
) -> CliResult<ProjectGenerator> {
    let config = ConfigManager::load_for(input, config_path)?;
    let config = ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            output,
            ..Default::default()
        },
    );
    Ok(ProjectGenerator::new(input, config).with_filter(filter))
}

/// Run the pass once and write its files.
fn run_generate(
    generator: &ProjectGenerator,
    dry_run: bool,
    format: MessageFormat,
) -> CliResult<()> {
    println!("{}", "Scanning crate for #[opaque_id] declarations...".cyan());

    let result = generator.run()?;
    report_pass(&result);
    let diagnostics = report_diagnostics(&result.output.diagnostics, format);

    let writer = FileWriter::new(dry_run);
    let plan = generator.plan(&result.output);
    let mut results = writer.write_all(&plan)?;
    if let Some(stale) = generator.stale_registration(&result) {
        results.push(writer.remove(&stale)?);
    }
    report_writes(&results);

    if !result.is_complete() {
        return Err(CliError::Unparsed {
            count: result.parse_errors.len(),
        });
    }
    if diagnostics > 0 {
        return Err(CliError::Diagnostics { count: diagnostics });
    }
    Ok(())
}

/// Print scan and parse statistics.
fn report_pass(result: &ProjectOutput) {
    println!(
        "  Scanned {} file(s), found {} declaration(s)",
        result.files_scanned.to_string().green(),
        result.declarations.len().to_string().green()
    );

    if !result.is_complete() {
        eprintln!(
            "{} {} file(s) could not be parsed:",
            "Error:".red(),
            result.parse_errors.len()
        );
        for error in &result.parse_errors {
            eprintln!("  {}", error);
        }
    }

    if result.output.registration.is_none() && result.capabilities.persistence {
        if !result.is_complete() {
            println!(
                "  {}",
                "Registration left unchanged: fix the files above first.".yellow()
            );
        } else if result.output.diagnostics.is_empty() {
            println!("  {}", "No registration: no declarations found.".dimmed());
        } else {
            println!(
                "  {}",
                "No registration: fix the reported declarations first.".yellow()
            );
        }
    }
}

/// Print each diagnostic; returns how many were printed.
fn report_diagnostics(diagnostics: &[Diagnostic], format: MessageFormat) -> usize {
    for diagnostic in diagnostics {
        match format {
            MessageFormat::Human => eprintln!("{}\n", format_diagnostic(diagnostic)),
            MessageFormat::Json => match serde_json::to_string(diagnostic) {
                Ok(line) => println!("{}", line),
                Err(e) => eprintln!("{} {}", "Error:".red(), e),
            },
        }
    }
    diagnostics.len()
}

fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let text = diagnostic.to_string();
    match text.split_once('\n') {
        Some((headline, rest)) => format!("{}\n{}", headline.red().bold(), rest.dimmed()),
        None => text.red().bold().to_string(),
    }
}

fn report_writes(results: &[WriteResult]) {
    let mut unchanged = 0;
    for result in results {
        match result {
            WriteResult::Written { path, bytes } => {
                println!(
                    "{} Written {} bytes to {}",
                    "✓".green(),
                    bytes,
                    path.display()
                );
            }
            WriteResult::Removed { path } => {
                println!("{} Removed stale {}", "✓".green(), path.display());
            }
            WriteResult::Unchanged { .. } => unchanged += 1,
            WriteResult::DryRun {
                content: Some(content),
                path,
            } => {
                println!(
                    "{} Would write to {}:",
                    "[dry-run]".yellow(),
                    path.display()
                );
                println!("{}", "─".repeat(60).dimmed());
                println!("{}", content);
                println!("{}", "─".repeat(60).dimmed());
            }
            WriteResult::DryRun {
                content: None,
                path,
            } => {
                println!("{} Would remove {}", "[dry-run]".yellow(), path.display());
            }
        }
    }
    if unchanged > 0 {
        println!("  {} file(s) already up-to-date", unchanged);
    }
}

/// Run in watch mode.
fn run_watch_mode(
    generator: &ProjectGenerator,
    dry_run: bool,
    format: MessageFormat,
) -> CliResult<()> {
    let root = std::fs::canonicalize(generator.crate_root())?;
    println!("{}", "Starting watch mode...".cyan());
    println!("  Watching: {}", root.display());
    println!("  Press Ctrl+C to stop\n");

    if let Err(e) = run_generate(generator, dry_run, format) {
        print_error(&e);
    }

    let watcher = FileWatcher::new(&root)
        .with_ignored(generator.config().output_dir(&root))
        .with_ignored(root.join("target"));
    let (_debouncer, rx) = watcher.watch()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(first) = rx.recv() {
        // One pass per burst of changes.
        let burst: Vec<WatchEvent> = std::iter::once(first).chain(rx.try_iter()).collect();
        let mut changed = false;
        for event in &burst {
            match event {
                WatchEvent::Error(message) => println!("{} {}", "Watch error:".red(), message),
                WatchEvent::Source(path) => {
                    println!("{} {}", "Changed:".cyan(), path.display())
                }
                WatchEvent::Settings(path) if path.ends_with(CONFIG_FILENAME) => println!(
                    "{} {} changed; restart watch mode to apply it",
                    "Note:".yellow(),
                    path.display()
                ),
                WatchEvent::Settings(path) => {
                    println!("{} {}", "Manifest changed:".cyan(), path.display())
                }
                WatchEvent::Removed(path) => {
                    println!("{} {}", "Removed:".cyan(), path.display())
                }
            }
            changed |= !event.is_error();
        }
        if !changed {
            continue;
        }

        if let Err(e) = run_generate(generator, dry_run, format) {
            print_error(&e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> CliResult<()> {
    if output.exists() && !force {
        println!(
            "{} Configuration file already exists: {}",
            "Error:".red(),
            output.display()
        );
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(
            "Configuration file already exists".to_string(),
        ));
    }

    let content = ConfigManager::default_config_content();
    std::fs::write(&output, content)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Validate command implementation.
fn cmd_validate(generator: &ProjectGenerator, format: MessageFormat) -> CliResult<()> {
    println!("{}", "Validating generated files...".cyan());

    let result = generator.run()?;
    report_pass(&result);
    let diagnostics = report_diagnostics(&result.output.diagnostics, format);

    let stale = generator.out_of_date(&result);
    if !stale.is_empty() {
        println!("{} Generated files are out of date:", "✗".red());
        for path in &stale {
            println!("  {}", path.display());
        }
        println!("  Run 'opaque-id generate' to update");
        return Err(CliError::Validation(format!(
            "{} file(s) out of date",
            stale.len()
        )));
    }

    if !result.is_complete() {
        return Err(CliError::Unparsed {
            count: result.parse_errors.len(),
        });
    }
    if diagnostics > 0 {
        return Err(CliError::Diagnostics { count: diagnostics });
    }

    println!("{} Generated files are up-to-date", "✓".green());
    Ok(())
}

/// Expand command implementation.
fn cmd_expand(generator: &ProjectGenerator, name: &str, format: MessageFormat) -> CliResult<()> {
    let result = generator.run()?;

    let diagnostics: Vec<Diagnostic> = result
        .declarations
        .iter()
        .filter(|declaration| declaration.name == name)
        .filter_map(|declaration| {
            opaque_id_codegen::validate::validate(declaration)
                .diagnostic()
                .cloned()
        })
        .collect();
    let count = report_diagnostics(&diagnostics, format);

    let mut found = false;
    for artifact in result.artifacts_named(name) {
        found = true;
        println!("{}", format!("// {}", artifact.hint_name()).dimmed());
        println!("{}", artifact.content);
    }

    if count > 0 {
        return Err(CliError::Diagnostics { count });
    }
    if !found {
        println!(
            "{} No opaque id named '{}' found",
            "Warning:".yellow(),
            name
        );
    }
    Ok(())
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
