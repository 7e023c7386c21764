mod test_runner;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use exam::{ExamRequest, GenerateRequest, GenerateResponse, RequestError};
use examdoc::Theme;

#[derive(Parser)]
#[command(
    name = "examdoc",
    version,
    about = "Convert generated exam markup into editor documents"
)]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert markup text into the editor's JSON document
    Convert(ConvertArgs),

    /// Build the generation prompt for an exam request
    Prompt(PromptArgs),

    /// Run .test.md conversion fixtures
    Test(TestArgs),
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Markup file to convert (reads stdin when omitted or "-")
    file: Option<PathBuf>,

    /// Theme file (TOML) overriding fonts and the color palette
    #[arg(short, long)]
    theme: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print the converted plain text instead of JSON
    #[arg(long, conflicts_with = "envelope")]
    text: bool,

    /// Wrap the document as `{ "examJson": ... }`
    #[arg(long)]
    envelope: bool,
}

#[derive(clap::Args)]
struct PromptArgs {
    /// Exam request file (TOML, or JSON when the extension is .json)
    request: PathBuf,

    /// Parse the request as JSON regardless of extension
    #[arg(long)]
    json: bool,

    /// Print the stamped `{ "formData": ... }` body instead of the prompt
    #[arg(long)]
    envelope: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or directory containing them
    path: PathBuf,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

/// Source files plus the diagnostics writer for one invocation.
struct Reporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl Reporter {
    fn new(no_color: bool) -> Self {
        let color_choice = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        Reporter {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(color_choice),
            config: term::Config::default(),
        }
    }

    fn add(&mut self, name: &Path, source: &str) -> usize {
        self.files
            .add(name.display().to_string(), source.to_string())
    }

    fn emit(&self, diagnostics: &[Diagnostic<usize>]) {
        for diagnostic in diagnostics {
            let _ = term::emit_to_write_style(
                &mut self.writer.lock(),
                &self.config,
                &self.files,
                diagnostic,
            );
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Command::Convert(args) => do_convert(args, cli.no_color),
        Command::Prompt(args) => do_prompt(args, cli.no_color),
        Command::Test(args) => {
            if args.list_categories {
                test_runner::list_categories(&args.path);
                0
            } else {
                test_runner::run_tests(&args.path, cli.no_color, &args.category)
            }
        }
    };
    process::exit(exit_code);
}

fn read_input(file: Option<&Path>) -> io::Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path),
        _ => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn load_theme(path: &Path, reporter: &mut Reporter) -> Option<Theme> {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read theme '{}': {}", path.display(), e);
            return None;
        }
    };
    let file_id = reporter.add(path, &source);
    match Theme::from_toml_str(&source) {
        Ok(theme) => Some(theme),
        Err(err) => {
            reporter.emit(&[err.to_diagnostic(file_id)]);
            None
        }
    }
}

fn do_convert(args: ConvertArgs, no_color: bool) -> i32 {
    let mut reporter = Reporter::new(no_color);

    let theme = match &args.theme {
        Some(path) => match load_theme(path, &mut reporter) {
            Some(theme) => theme,
            None => return 1,
        },
        None => Theme::default(),
    };

    let source = match read_input(args.file.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            let name = args
                .file
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<stdin>".to_string());
            eprintln!("error: cannot read '{}': {}", name, e);
            return 1;
        }
    };

    let response = GenerateResponse::from_text(&source, &theme);
    log::info!(
        "converted {} lines into {} blocks",
        source.split('\n').count(),
        response.exam_json.block_count()
    );

    let output = if args.text {
        Ok(response.exam_json.to_string())
    } else if args.envelope {
        to_json(&response, args.pretty)
    } else {
        to_json(&response.exam_json, args.pretty)
    };

    match output {
        Ok(out) => write_stdout(&out),
        Err(e) => {
            eprintln!("error: cannot serialize document: {}", e);
            1
        }
    }
}

fn do_prompt(args: PromptArgs, no_color: bool) -> i32 {
    let mut reporter = Reporter::new(no_color);

    let source = match std::fs::read_to_string(&args.request) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.request.display(), e);
            return 1;
        }
    };
    let file_id = reporter.add(&args.request, &source);

    let json = args.json || exam::is_json_path(&args.request);
    let request = match ExamRequest::parse(&source, json)
        .and_then(|r| r.validate().map(|()| r).map_err(RequestError::Invalid))
    {
        Ok(r) => r,
        Err(err) => {
            reporter.emit(&err.to_diagnostics(file_id));
            return 1;
        }
    };

    if args.envelope {
        let body = GenerateRequest::new(request, chrono::Utc::now());
        match to_json(&body, true) {
            Ok(out) => write_stdout(&out),
            Err(e) => {
                eprintln!("error: cannot serialize request: {}", e);
                1
            }
        }
    } else {
        write_stdout(&exam::build_prompt(&request))
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    let mut out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    out.push('\n');
    Ok(out)
}

fn write_stdout(out: &str) -> i32 {
    let mut stdout = io::stdout().lock();
    match stdout.write_all(out.as_bytes()).and_then(|()| stdout.flush()) {
        Ok(()) => 0,
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => 0,
        Err(e) => {
            eprintln!("error: cannot write output: {}", e);
            1
        }
    }
}
