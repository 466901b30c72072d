//! Interactive session command.
//!
//! Drives the workflow root from stdin: pick a namespace and files, upload and
//! index them, then chat. Questions do not block the prompt; answers are
//! printed and logged as they arrive.

use anyhow::Context;
use clap::Args;
use docchat_api::create_backend;
use docchat_core::config::AppConfig;
use docchat_workflow::{
    render_listing, AskReply, ExchangeEntry, Phase, Role, StatusReporter, WorkflowRoot,
};
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  /namespace <name>   switch namespace (blank means \"default\")
  /files <paths...>   select files or directories to upload
  /upload             upload the selection and index it
  /back               return to the upload view
  /alpha <number>     set the lexical/semantic blend for the next questions
  /top_k <number>     set how many sources to retrieve for the next questions
  /log                print the conversation so far
  /status             show namespace, phase and tuning
  /help               show this help
  /quit               leave (waits for questions still in flight)
Anything else is a question once documents are indexed.";

/// Interactive upload-then-chat session
#[derive(Args, Debug)]
pub struct SessionCommand {
    /// Files or directories to preselect for upload
    #[arg(long)]
    pub files: Vec<PathBuf>,
}

/// One parsed line of session input.
#[derive(Debug, Clone, PartialEq)]
enum SessionInput {
    Empty,
    Namespace(String),
    Files(Vec<PathBuf>),
    Upload,
    Back,
    Alpha(String),
    TopK(String),
    Log,
    Status,
    Help,
    Quit,
    Question(String),
    Unknown(String),
}

fn parse_line(line: &str) -> SessionInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return SessionInput::Empty;
    }

    let Some(command) = trimmed.strip_prefix('/') else {
        return SessionInput::Question(trimmed.to_string());
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "namespace" | "ns" => SessionInput::Namespace(rest.to_string()),
        "files" => SessionInput::Files(rest.split_whitespace().map(PathBuf::from).collect()),
        "upload" => SessionInput::Upload,
        "back" => SessionInput::Back,
        "alpha" => SessionInput::Alpha(rest.to_string()),
        "top_k" | "k" => SessionInput::TopK(rest.to_string()),
        "log" => SessionInput::Log,
        "status" => SessionInput::Status,
        "help" | "?" => SessionInput::Help,
        "quit" | "exit" | "q" => SessionInput::Quit,
        other => SessionInput::Unknown(other.to_string()),
    }
}

/// Render one conversation entry for the terminal.
fn render_entry(entry: &ExchangeEntry) -> String {
    match entry.role() {
        Role::User => format!("you> {}", entry.text()),
        Role::Assistant => format!("assistant>\n{}", entry.text()),
    }
}

fn prompt_for(root: &WorkflowRoot) -> String {
    format!("[{} @ {}] ", root.phase(), root.namespace())
}

enum Flow {
    Continue,
    Quit,
}

type InFlight = FuturesUnordered<std::pin::Pin<Box<dyn Future<Output = AskReply> + Send>>>;

impl SessionCommand {
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<ExitCode> {
        tracing::info!("Starting interactive session");

        let backend = create_backend(config)?;
        let reporter = StatusReporter::new(Arc::new(|status: &str| println!("  {}", status)));
        let mut root = WorkflowRoot::from_config(backend, config).with_status_reporter(reporter);

        if !self.files.is_empty() {
            let count = root.upload_mut().select_paths(&self.files).await?;
            println!("Selected {} files", count);
            print_selection(&root);
        }

        println!("DocChat session. Type /help for commands.");
        print_prompt(&root);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut in_flight: InFlight = FuturesUnordered::new();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read input")? else {
                        break;
                    };
                    if let Flow::Quit = handle_input(&mut root, parse_line(&line), &mut in_flight).await {
                        break;
                    }
                    print_prompt(&root);
                }
                Some(reply) = in_flight.next(), if !in_flight.is_empty() => {
                    println!();
                    println!("{}", render_entry(root.chat_mut().complete(&reply)));
                    print_prompt(&root);
                }
            }
        }

        if !in_flight.is_empty() {
            println!("Waiting for {} pending answers...", in_flight.len());
        }
        while let Some(reply) = in_flight.next().await {
            println!("{}", render_entry(root.chat_mut().complete(&reply)));
        }

        tracing::info!(entries = root.chat().log().len(), "Session ended");
        Ok(ExitCode::SUCCESS)
    }
}

async fn handle_input(root: &mut WorkflowRoot, input: SessionInput, in_flight: &mut InFlight) -> Flow {
    match input {
        SessionInput::Empty => {}
        SessionInput::Namespace(name) => {
            root.set_namespace(&name);
            println!("Namespace: {}", root.namespace());
        }
        SessionInput::Files(paths) => match root.upload_mut().select_paths(&paths).await {
            Ok(count) => {
                println!("Selected {} files", count);
                print_selection(root);
            }
            Err(e) => println!("{}", e),
        },
        SessionInput::Upload => match root.submit_upload().await {
            Ok(outcome) if outcome.is_success() => {
                println!("Documents indexed. Ask away, or /back to upload more.");
            }
            Ok(_) => {}
            Err(e) => println!("{}", e),
        },
        SessionInput::Back => match root.navigate_to_upload() {
            Ok(()) => print_selection(root),
            Err(e) => println!("{}", e),
        },
        SessionInput::Alpha(value) => match value.parse::<f64>() {
            Ok(alpha) => {
                root.chat_mut().set_alpha(alpha);
                println!("alpha = {}", alpha);
            }
            Err(_) => println!("Not a number: '{}' (alpha stays {})", value, root.chat().alpha()),
        },
        SessionInput::TopK(value) => match value.parse::<u32>() {
            Ok(top_k) => {
                root.chat_mut().set_top_k(top_k);
                println!("top_k = {}", top_k);
            }
            Err(_) => println!("Not a count: '{}' (top_k stays {})", value, root.chat().top_k()),
        },
        SessionInput::Log => {
            for entry in root.chat().log() {
                println!("{}", render_entry(entry));
            }
        }
        SessionInput::Status => {
            println!("Namespace: {}", root.namespace());
            println!("Phase: {}", root.phase());
            println!("alpha: {}  top_k: {}", root.chat().alpha(), root.chat().top_k());
            if !root.upload().status().is_empty() {
                println!("Last status: {}", root.upload().status());
            }
            if !in_flight.is_empty() {
                println!("Pending answers: {}", in_flight.len());
            }
        }
        SessionInput::Help => println!("{}", HELP),
        SessionInput::Quit => return Flow::Quit,
        SessionInput::Question(question) => match root.begin_send(&question) {
            Ok(Some(pending)) => {
                tracing::debug!(seq = pending.seq(), "Question queued");
                in_flight.push(Box::pin(pending.resolve()));
            }
            Ok(None) => {}
            Err(e) => println!("{} (use /files and /upload first)", e),
        },
        SessionInput::Unknown(name) => println!("Unknown command /{}. Type /help.", name),
    }

    Flow::Continue
}

fn print_selection(root: &WorkflowRoot) {
    if root.phase() != Phase::Upload {
        return;
    }
    let listing = render_listing(&root.upload().selected_files());
    if !listing.is_empty() {
        println!("{}", listing);
    }
}

fn print_prompt(root: &WorkflowRoot) {
    use std::io::Write;
    print!("{}", prompt_for(root));
    std::io::stdout().flush().ok();
}
