use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use nowdo_cli::cli::{Cli, Command, collect_overrides, position_to_index, reject_launch_flags};
use nowdo_cli::logging::init_tracing;
use nowdo_cli::render::{Tally, local_offset, outcome_json, render_list, render_outcome};
use nowdo_core::config::{Config, Palette};
use nowdo_core::storage::PrefsFile;
use nowdo_core::{AppError, Intent, Outcome, TaskList};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use time::UtcOffset;

struct Session {
    list: TaskList<PrefsFile>,
    palette: Palette,
    aliases: HashMap<String, String>,
    offset: UtcOffset,
}

fn open_session(raw_overrides: &[String]) -> Result<Session, AppError> {
    let offset = local_offset();
    let loaded = Config::load();
    if let Some(err) = loaded.error.as_ref() {
        eprintln!("WARNING: {err}; using default configuration");
    }

    let overrides = collect_overrides(raw_overrides)?;
    let config = loaded.config.with_overrides(overrides);
    let list = nowdo_core::open_task_list(config.prefs_name())?;
    if let Some(err) = list.load_error() {
        eprintln!("WARNING: {err}; starting with an empty list");
    }

    Ok(Session {
        list,
        palette: config.palette(),
        aliases: config.aliases,
        offset,
    })
}

fn print_outcome(session: &Session, outcome: &Outcome, json: bool) {
    if json {
        println!("{}", outcome_json(outcome));
    } else {
        println!("{}", render_outcome(outcome, &session.palette));
    }
}

fn print_cancelled(json: bool) {
    if json {
        println!("{}", serde_json::json!({ "outcome": "cancelled", "notice": "Cancelled" }));
    } else {
        println!("Cancelled");
    }
}

fn confirm(input: &mut dyn BufRead, prompt: &str) -> Result<bool, AppError> {
    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }

    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn expand_alias(
    args: Vec<String>,
    aliases: &HashMap<String, String>,
) -> Result<Vec<String>, AppError> {
    let Some(expansion) = args.first().and_then(|first| aliases.get(first)) else {
        return Ok(args);
    };

    let mut expanded = split_command_line(expansion)?;
    expanded.extend(args.into_iter().skip(1));
    Ok(expanded)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(
    session: &mut Session,
    command: Command,
    json: bool,
    input: &mut dyn BufRead,
) -> Result<(), AppError> {
    let intent = match command {
        Command::List => {
            if json {
                println!("{}", serde_json::to_string(session.list.tasks())?);
            } else {
                let tally = Tally {
                    pending: session.list.pending_count(),
                    completed: session.list.completed_count(),
                    has_completed: session.list.has_completed(),
                };
                println!(
                    "{}",
                    render_list(
                        session.list.tasks(),
                        session.list.selection(),
                        tally,
                        &session.palette,
                        session.offset,
                    )
                );
            }
            return Ok(());
        }
        Command::Add { text } => Intent::Add(text.join(" ")),
        Command::Pick => Intent::PickRandom,
        Command::Complete => Intent::CompleteSelected,
        Command::Check { position } => Intent::Toggle {
            index: position_to_index(position)?,
            completed: true,
        },
        Command::Uncheck { position } => Intent::Toggle {
            index: position_to_index(position)?,
            completed: false,
        },
        Command::Delete { position, yes } => {
            let index = position_to_index(position)?;
            if !yes
                && let Some(task) = session.list.tasks().get(index)
            {
                let prompt = format!(
                    "Delete \"{}\"? Are you sure you want to delete this task?",
                    task.text()
                );
                if !confirm(input, &prompt)? {
                    print_cancelled(json);
                    return Ok(());
                }
            }
            Intent::Delete(index)
        }
        Command::Clear { yes } => {
            let prompt = "Are you sure you want to delete all tasks? This action cannot be undone.";
            if !yes && !session.list.is_empty() && !confirm(input, prompt)? {
                print_cancelled(json);
                return Ok(());
            }
            Intent::ClearAll
        }
    };

    let outcome = session.list.dispatch(intent)?;
    print_outcome(session, &outcome, json);
    Ok(())
}

fn run_interactive() -> Result<(), AppError> {
    let mut session = open_session(&[])?;
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let parsed = split_command_line(line).and_then(|args| expand_alias(args, &session.aliases));
        let args = match parsed {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("nowdo".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = reject_launch_flags(&cli) {
            eprintln!("ERROR: {}", err);
            continue;
        }

        if let Err(err) = run_command(&mut session, cli.command, cli.json, &mut stdin_lock) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn run_once(cli: Cli) -> Result<(), AppError> {
    init_tracing(cli.verbose)?;
    let mut session = open_session(&cli.config_override)?;
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();
    run_command(&mut session, cli.command, cli.json, &mut stdin_lock)
}

fn main() {
    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = init_tracing(0).and_then(|_| run_interactive()) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_once(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{expand_alias, split_command_line};
    use std::collections::HashMap;

    #[test]
    fn split_command_line_keeps_quoted_words() {
        let args = split_command_line(r#"add "Buy milk" now"#).unwrap();
        assert_eq!(args, vec!["add", "Buy milk", "now"]);
    }

    #[test]
    fn split_command_line_rejects_open_quote() {
        let err = split_command_line(r#"add "Buy milk"#).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn expand_alias_replaces_first_word() {
        let aliases: HashMap<String, String> =
            [("done".to_string(), "check".to_string())].into_iter().collect();

        let expanded = expand_alias(vec!["done".into(), "2".into()], &aliases).unwrap();
        assert_eq!(expanded, vec!["check", "2"]);

        let untouched = expand_alias(vec!["list".into()], &aliases).unwrap();
        assert_eq!(untouched, vec!["list"]);
    }
}
