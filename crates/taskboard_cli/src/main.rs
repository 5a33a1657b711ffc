use clap::{CommandFactory, Parser};
use log::debug;
use std::io::{self, BufRead};
use std::path::Path;
use taskboard_cli::cli::{Cli, Command};
use taskboard_cli::render;
use taskboard_core::config::{self, Config, ConfigOverrides};
use taskboard_core::error::AppError;
use taskboard_core::logging;
use taskboard_core::storage::json_store;
use taskboard_core::{JsonFileStore, Task, TaskFilter, TaskInput, TaskPatch, TaskStore};

type Store = TaskStore<JsonFileStore>;

fn print_task_json(task: &Task) -> Result<(), AppError> {
    let json =
        serde_json::to_string(task).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_tasks_json(tasks: &[&Task]) -> Result<(), AppError> {
    let json =
        serde_json::to_string(tasks).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn warn_if_unsaved(store: &Store) {
    if let Some(err) = store.last_write_error() {
        eprintln!("WARNING: changes were not saved: {err}");
    }
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

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(store: &mut Store, command: Command, json: bool) -> Result<(), AppError> {
    match command {
        Command::Add {
            title,
            description,
            status,
            priority,
            assignee,
            due,
        } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value.trim().to_string(),
                _ => return Err(AppError::invalid_input("title is required")),
            };

            let mut input = TaskInput::new(title, description, status, priority);
            input.assignee = assignee;
            input.due_date = due;
            let task = store.add(input);
            warn_if_unsaved(store);
            if json {
                print_task_json(&task)?;
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
        }
        Command::Update {
            id,
            title,
            description,
            status,
            priority,
            assignee,
            unassign,
            due,
            clear_due,
        } => {
            let patch = TaskPatch {
                title,
                description,
                status,
                priority,
                assignee: if unassign {
                    Some(None)
                } else {
                    assignee.map(Some)
                },
                due_date: if clear_due { Some(None) } else { due.map(Some) },
            };
            if patch.is_empty() {
                return Err(AppError::invalid_input("nothing to update"));
            }
            update_and_report(store, &id, patch, json)?;
        }
        Command::Status { id, status } => {
            update_and_report(store, &id, TaskPatch::status(status), json)?;
        }
        Command::Delete { id } => {
            let removed = store.delete(id.trim());
            warn_if_unsaved(store);
            match (removed, json) {
                (Some(task), true) => print_task_json(&task)?,
                (Some(task), false) => println!("Deleted task: {} ({})", task.title, task.id),
                (None, true) => println!("null"),
                (None, false) => println!("No task with id {}", id.trim()),
            }
        }
        Command::Show { id } => {
            let task = store
                .get(id.trim())
                .ok_or_else(|| AppError::not_found(format!("task '{}' not found", id.trim())))?;
            if json {
                print_task_json(task)?;
            } else {
                println!("{}", render::task_details(task));
            }
        }
        Command::List {
            query,
            status,
            priority,
            assignee,
        } => {
            let filter = TaskFilter {
                query,
                status,
                priority,
                assignee,
            };
            let tasks = store.filtered(&filter);
            if json {
                print_tasks_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("No tasks found");
            } else {
                println!("{}", render::task_table(&tasks));
                println!("Showing {} of {} tasks", tasks.len(), store.stats().total);
            }
        }
        Command::Stats => {
            let stats = store.stats();
            if json {
                let payload = serde_json::to_string(&stats)
                    .map_err(|err| AppError::invalid_data(err.to_string()))?;
                println!("{payload}");
            } else {
                println!("{}", render::stats_summary(&stats));
            }
        }
    }

    Ok(())
}

fn update_and_report(
    store: &mut Store,
    id: &str,
    patch: TaskPatch,
    json: bool,
) -> Result<(), AppError> {
    let task = store.update(id.trim(), patch)?;
    warn_if_unsaved(store);
    if json {
        print_task_json(&task)?;
    } else {
        println!("Updated task: {} ({})", task.title, task.id);
    }
    Ok(())
}

/// Reads commands line by line against one open store. `json` is the
/// session default; a line may still add `--json` on its own.
fn run_interactive(store: &mut Store, json: bool) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;

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

        let args = match split_command_line(line) {
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
        argv.push("taskboard".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        let result = if !cli.config_override.is_empty() {
            Err(AppError::invalid_input(
                "config overrides are only accepted at startup",
            ))
        } else {
            match cli.command {
                Some(command) => run_command(store, command, json || cli.json),
                None => Err(AppError::invalid_input("a command is required")),
            }
        };
        if let Err(err) = result {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn resolve_config(raw_overrides: &[String]) -> Result<Config, AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: ignoring config: {err}");
    }

    let mut overrides = ConfigOverrides::default();
    for raw in raw_overrides {
        let (key, value) = config::parse_override(raw)?;
        overrides.set(key, value);
    }

    Ok(config::merge_overrides(&loaded.config, &overrides))
}

fn start_logging(config: &Config) {
    let level = std::env::var(logging::LOG_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| logging::default_log_level().to_string());
    let log_dir = config.log_dir.as_deref().map(Path::new);

    if let Err(err) = logging::init_logging(&level, log_dir) {
        eprintln!("WARNING: logging disabled: {err}");
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = resolve_config(&cli.config_override)?;
    start_logging(&config);

    let path = json_store::store_path(config.store_path.as_deref())?;
    debug!("event=cli_start module=cli store_path={}", path.display());
    let mut store = TaskStore::open(JsonFileStore::new(path));

    match cli.command {
        Some(command) => run_command(&mut store, command, cli.json),
        None => run_interactive(&mut store, cli.json),
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help and --version
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::split_command_line;

    #[test]
    fn split_command_line_honours_quotes() {
        let args = split_command_line(r#"add "demo task" -d "say \"hi\"""#).unwrap();
        assert_eq!(args, ["add", "demo task", "-d", "say \"hi\""]);
    }

    #[test]
    fn split_command_line_rejects_unterminated_quote() {
        let err = split_command_line("add \"demo").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }
}
