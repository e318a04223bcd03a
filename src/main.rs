use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use log_annotator::error::Error;
use log_annotator::icons::NullFetcher;
use log_annotator::summary::LogSummary;
use log_annotator::view::{
    AnnotationSession, Clipboard, LogDocument, NavigateTarget, Notifier, NoticeLevel, TextView,
};

fn main() -> io::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json_mode = args.iter().any(|a| a == "--json");
    let path = match args.iter().skip(1).find(|a| !a.starts_with("--")) {
        Some(p) => p.clone(),
        None => {
            eprintln!("usage: log-annotator <logfile> [--json]");
            std::process::exit(2);
        }
    };

    let contents = fs::read_to_string(&path)?;
    let lines: Vec<&str> = contents.lines().collect();
    let summary = LogSummary::scan(&lines);

    let mut doc = LogDocument::from_text(&contents);
    let mut session = AnnotationSession::new(summary.addon_registry(), Arc::new(NullFetcher));
    session.load(&doc);

    if json_mode {
        run_json_mode(&summary, &mut session)
    } else {
        run_interactive_mode(&summary, &mut session, &mut doc)
    }
}

/// Emit the overlay replacement set and the summary as JSON lines.
fn run_json_mode(summary: &LogSummary, session: &mut AnnotationSession) -> io::Result<()> {
    let overlays = session.overlay_message();
    println!(
        "{}",
        serde_json::to_string(&overlays).map_err(io::Error::other)?
    );
    println!(
        "{}",
        serde_json::to_string(summary).map_err(io::Error::other)?
    );
    Ok(())
}

fn run_interactive_mode(
    summary: &LogSummary,
    session: &mut AnnotationSession,
    doc: &mut LogDocument,
) -> io::Result<()> {
    eprintln!(
        "Build {} {} {} / runtime {:02}:{:02}:{:02}",
        summary.build_version,
        summary.build_platform,
        summary.build_arch,
        summary.total_time[0],
        summary.total_time[1],
        summary.total_time[2]
    );
    eprintln!(
        "{} add-ons loaded, lua crash: {}",
        summary.addons.len(),
        summary.has_lua_crash
    );
    for (i, block) in session.scan_result().blocks.iter().enumerate() {
        eprintln!(
            "  error block #{}: lines {}-{}",
            i, block.start_line, block.end_line
        );
    }

    loop {
        eprintln!(
            "\nCommands: (n)ext error, (p)rev error, (N)ext instance, (P)rev instance, copy <n>, (q)uit"
        );
        eprint!("> ");
        io::stderr().flush()?;

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();

        let target = match cmd {
            "q" | "quit" => break,
            "n" | "next" => Some(NavigateTarget::NextError),
            "p" | "prev" => Some(NavigateTarget::PrevError),
            "N" => Some(NavigateTarget::NextInstance),
            "P" => Some(NavigateTarget::PrevInstance),
            cmd if cmd.starts_with("copy ") => {
                match cmd["copy ".len()..].trim().parse::<usize>() {
                    Ok(index) => {
                        let mut clipboard = ConsoleClipboard;
                        let mut notifier = ConsoleNotifier;
                        if !session.invoke_copy_action(index, doc, &mut clipboard, &mut notifier) {
                            eprintln!("no error block #{}", index);
                        }
                    }
                    Err(_) => eprintln!("invalid block number"),
                }
                None
            }
            "" => None,
            _ => {
                eprintln!("unknown command: {}", cmd);
                None
            }
        };

        if let Some(target) = target {
            match session.navigate(doc, target) {
                Some(pos) => {
                    let text = doc.line(pos.line).unwrap_or("");
                    eprintln!("line {}: {}", pos.line, text);
                }
                None => eprintln!("no further occurrence"),
            }
        }
    }

    Ok(())
}

/// Clipboard stand-in for terminal use: the copied text goes to stdout.
struct ConsoleClipboard;

impl Clipboard for ConsoleClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), Error> {
        println!("{}", text);
        Ok(())
    }
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => eprintln!("{}", message),
            NoticeLevel::Error => eprintln!("error: {}", message),
        }
    }
}
