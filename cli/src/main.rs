//! deckwright CLI - edit PowerPoint presentations with natural language
//!
//! Reads instructions line by line, turns each into a validated edit plan,
//! applies it, and reviews the rendered result.

use clap::Parser;
use colored::*;
use deckwright::{
    Converter, Deck, Error, GeminiClient, Inspector, Modifier, Settings, Verification, Visual,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Natural-language PowerPoint editing powered by Gemini
#[derive(Parser)]
#[command(
    name = "deckwright",
    author = "iyulab",
    version,
    about = "Edit PowerPoint presentations with natural-language instructions",
    long_about = "deckwright - natural-language PowerPoint editing.\n\n\
                  Each instruction is translated into a validated edit plan, applied to the\n\
                  presentation, rendered to PDF and reviewed by a vision model."
)]
struct Cli {
    /// Print the generated edit plan before applying it
    #[arg(short, long)]
    debug: bool,

    /// Target presentation; created on the first instruction if missing
    #[arg(short, long, default_value = "presentation.pptx")]
    ppt: PathBuf,

    /// Settings file (default: ./.env when present)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Directory for rendered PDFs
    #[arg(long)]
    visuals_dir: Option<PathBuf>,

    /// Do not open the presentation after a successful edit
    #[arg(long)]
    no_open: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "deckwright=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load(cli.env_file.as_deref())?;
    if let Some(dir) = cli.visuals_dir {
        settings = settings.with_visuals_dir(dir);
    }

    println!("{}", "deckwright".green().bold());
    println!("{}", "─".repeat(40));
    if cli.debug {
        println!("{} Debug mode on: edit plans are printed before they are applied", "i".cyan().bold());
    }

    let pb = create_spinner("Detecting conversion engines...");
    let converter = Converter::detect(settings.convert_timeout);
    pb.finish_and_clear();
    match converter.engine_names().as_slice() {
        [] => println!(
            "{} No conversion engine found; verification will be text-only",
            "!".yellow().bold()
        ),
        names => println!("{}: {}", "Converter".bold(), names.join(", ")),
    }

    let inspector = Inspector::new(converter, &settings.visuals_dir);
    let client = GeminiClient::new(
        &settings.api_key,
        settings.base_url.as_deref(),
        settings.request_timeout,
    )?;
    let modifier = Modifier::new(client, &settings.text_model, &settings.vision_model)
        .with_temperature(settings.temperature);
    println!("{}: {}", "Text model".bold(), settings.text_model);
    println!("{}: {}", "Vision model".bold(), settings.vision_model);

    let path = std::path::absolute(&cli.ppt)?;
    println!("{}: {}", "Target".bold(), path.display());
    if !path.exists() {
        println!(
            "{} File does not exist; it will be created on the first instruction",
            "!".yellow().bold()
        );
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\n{} ", "[USER]:".bold());
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let instruction = line.trim();
        if instruction.is_empty() {
            continue;
        }
        if instruction.eq_ignore_ascii_case("exit") || instruction.eq_ignore_ascii_case("quit") {
            println!("Bye!");
            break;
        }

        match handle_instruction(instruction, &path, &inspector, &modifier, cli.debug, !cli.no_open) {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => report_error(&e),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn handle_instruction(
    instruction: &str,
    path: &Path,
    inspector: &Inspector,
    modifier: &Modifier<GeminiClient>,
    debug: bool,
    open_after: bool,
) -> deckwright::Result<()> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Deck::create()?.save(path)?;
        println!("{} Created new presentation: {}", "✓".green().bold(), path.display());
    }

    let pb = create_spinner("Inspecting presentation...");
    let before = inspector.inspect(path);
    pb.finish_and_clear();
    let before = before?;
    if let Visual::Unavailable(reason) = &before.visual {
        println!("{} No rendering: {}", "!".yellow().bold(), reason);
    }

    let pb = create_spinner("Generating edit plan...");
    let outcome = modifier.generate_and_apply(instruction, &before, path, debug);
    pb.finish_and_clear();
    let outcome = outcome?;

    let summary = outcome.plan.summary.as_deref().unwrap_or("edit plan applied");
    println!(
        "{} {} ({} operations, {})",
        "✓".green().bold(),
        summary,
        outcome.report.applied,
        outcome.model
    );

    let pb = create_spinner("Verifying result...");
    let review = modifier.verify(instruction, outcome.before.as_ref(), inspector, path);
    pb.finish_and_clear();
    match review {
        Ok(Verification::TextOnly(reason)) => {
            println!("{} Text-only verification ({})", "!".yellow().bold(), reason);
        }
        Ok(Verification::Reviewed { passed, feedback }) => {
            println!("{}:\n{}", "Review".cyan().bold(), feedback);
            if !passed {
                println!("{} The review reported possible issues", "!".yellow().bold());
            }
        }
        Err(e) => report_error(&e),
    }

    if open_after {
        open_document(path);
    }
    Ok(())
}

fn report_error(err: &Error) {
    let label = match err {
        Error::Locked(_) | Error::InUse(_) => "File locked",
        Error::Generation(_) | Error::Model { .. } => "Generation failed",
        Error::Plan(_) | Error::SlideOutOfRange { .. } | Error::ShapeNotFound { .. } | Error::InvalidData(_) => {
            "Edit failed"
        }
        Error::Verification(_) => "Verification failed",
        _ => "Error",
    };
    eprintln!("{}: {}", label.red().bold(), err);
}

fn open_document(path: &Path) {
    let mut command = if cfg!(windows) {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else if cfg!(target_os = "macos") {
        std::process::Command::new("open")
    } else {
        std::process::Command::new("xdg-open")
    };

    if let Err(e) = command.arg(path).spawn() {
        println!("{} Could not open the presentation: {}", "!".yellow().bold(), e);
        println!("Please open it manually: {}", path.display());
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["deckwright"]);
        assert_eq!(cli.ppt, PathBuf::from("presentation.pptx"));
        assert!(!cli.debug);
        assert!(!cli.no_open);

        let cli = Cli::parse_from(["deckwright", "-d", "-p", "talk.pptx", "--no-open"]);
        assert!(cli.debug);
        assert!(cli.no_open);
        assert_eq!(cli.ppt, PathBuf::from("talk.pptx"));
    }
}
