//! `taskboard`: command-line host for the task board client.
//!
//! Each subcommand drives one form or board operation against the task
//! service and prints the resulting acknowledgment. Configuration via CLI
//! flags, environment variables, or config file
//! (`~/.config/taskboard/config.toml`).
//!
//! ```bash
//! cargo run --bin taskboard -- board
//! cargo run --bin taskboard -- add-task --description "Revisar contrato" \
//!     --sector financeiro --priority high --user 1
//! cargo run --bin taskboard -- move 4 Fazendo
//! TASKBOARD_API_URL=http://10.0.0.5:8000/api/v1/ cargo run --bin taskboard -- users
//! ```

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskboard::api::http::HttpCollaborator;
use taskboard::board::{Board, BoardError, BoardEvent};
use taskboard::config::{CliArgs, ClientConfig, Command};
use taskboard::feedback::Acknowledgment;
use taskboard::forms::{
    FormError, FormEvent, FormSettings, SubmitOutcome, TaskEditForm, TaskForm, UserForm,
};
use taskboard::validation::{FieldErrors, TaskField, UserField};
use taskboard_proto::task::TaskId;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Erro de configuração: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());
    tracing::info!(base_url = %config.base_url, "taskboard starting");

    let api = match config
        .api_url()
        .map_err(|e| e.to_string())
        .and_then(|url| {
            HttpCollaborator::new(url, config.request_timeout).map_err(|e| e.to_string())
        }) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Erro de configuração: {e}");
            return ExitCode::FAILURE;
        }
    };

    let command = cli.command.clone().unwrap_or(Command::Board);
    let ok = run(api, &config, command).await;
    tracing::info!(ok, "taskboard exiting");
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Log file used when `--log-file` is not given, under the temp dir.
const DEFAULT_LOG_FILE: &str = "taskboard.log";

/// Routes tracing to a file.
///
/// Acknowledgments, field errors and the deletion `confirm` prompt share
/// stdout and stderr with the user's answers, so log lines must never land
/// on the terminal. The returned [`WorkerGuard`] flushes the non-blocking
/// writer on drop; hold it until `main` returns. `None` means the path had
/// no usable directory or file name and the client runs without logs.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let log_path = file_path.map_or_else(
        || std::env::temp_dir().join(DEFAULT_LOG_FILE),
        Path::to_path_buf,
    );
    let (log_dir, file_name) = (log_path.parent()?, log_path.file_name()?);

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, file_name));

    // RUST_LOG wins over --log-level.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .init();

    Some(guard)
}

/// Runs one subcommand. Returns `false` if it ended in an error.
async fn run(api: HttpCollaborator, config: &ClientConfig, command: Command) -> bool {
    let settings = config.form_settings();
    match command {
        Command::Board => show_board(api, config.event_buffer).await,
        Command::Users => list_users(api, &settings).await,
        Command::AddTask {
            description,
            sector,
            priority,
            status,
            user,
        } => {
            let (mut form, mut events) = TaskForm::new(api, &settings);
            form.set_field(TaskField::Description, &description);
            form.set_field(TaskField::NameClass, &sector);
            form.set_field(TaskField::Priority, &priority);
            form.set_field(TaskField::Status, &status);
            form.set_field(TaskField::User, &user);
            let outcome = form.submit().await;
            report_submit(outcome, &mut events)
        }
        Command::EditTask {
            id,
            description,
            sector,
            priority,
            status,
        } => {
            let (mut form, mut events) = TaskEditForm::new(api, TaskId::new(id), &settings);
            if !form.load().await {
                drain_form_events(&mut events);
                return false;
            }
            let edits = [
                (TaskField::Description, description),
                (TaskField::NameClass, sector),
                (TaskField::Priority, priority),
                (TaskField::Status, status),
            ];
            for (field, value) in edits
                .into_iter()
                .filter_map(|(field, value)| value.map(|v| (field, v)))
            {
                if let Err(e) = form.set_field(field, &value) {
                    eprintln!("{e}");
                    return false;
                }
            }
            let outcome = form.submit().await;
            report_submit(outcome, &mut events)
        }
        Command::Move { id, column } => {
            let Some((mut board, mut events)) = load_board(api, config.event_buffer).await else {
                return false;
            };
            let result = board.drop_task(TaskId::new(id), column).await;
            report_board(result, &mut events)
        }
        Command::SetStatus { id, status } => {
            let Some((mut board, mut events)) = load_board(api, config.event_buffer).await else {
                return false;
            };
            let result = board.change_status(TaskId::new(id), status).await;
            report_board(result, &mut events)
        }
        Command::Delete { id, yes } => {
            let Some((mut board, mut events)) = load_board(api, config.event_buffer).await else {
                return false;
            };
            let request = match board.request_deletion(TaskId::new(id)) {
                Ok(request) => request,
                Err(e) => {
                    eprintln!("{e}");
                    return false;
                }
            };
            if !yes && !confirm(&format!("Excluir a tarefa \"{}\"?", request.description())) {
                println!("Exclusão cancelada.");
                return true;
            }
            let result = board.confirm_deletion(request).await;
            report_board(result, &mut events)
        }
        Command::AddUser { name, email, phone } => {
            let (mut form, mut events) = UserForm::new(api, &settings);
            form.set_field(UserField::Name, &name);
            form.set_field(UserField::Email, &email);
            form.set_field(UserField::Phone, &phone);
            let outcome = form.submit().await;
            report_submit(outcome, &mut events)
        }
    }
}

/// Creates a board and fetches its first snapshot.
async fn load_board(
    api: HttpCollaborator,
    event_buffer: usize,
) -> Option<(Board<HttpCollaborator>, mpsc::Receiver<BoardEvent>)> {
    let (mut board, mut events) = Board::new(api, event_buffer);
    let loaded = board.reload().await.is_ok();
    drain_board_events(&mut events);
    loaded.then_some((board, events))
}

async fn show_board(api: HttpCollaborator, event_buffer: usize) -> bool {
    let Some((board, _events)) = load_board(api, event_buffer).await else {
        return false;
    };
    for (column, tasks) in board.columns().iter() {
        println!("== {column} ({}) ==", tasks.len());
        for task in tasks {
            println!(
                "  #{:<4} [{}] {} ({}, usuário {})",
                task.id.get(),
                task.priority,
                task.description,
                task.name_class,
                task.user
            );
        }
    }
    true
}

async fn list_users(api: HttpCollaborator, settings: &FormSettings) -> bool {
    let (mut form, _events) = TaskForm::new(api, settings);
    let users = form.load_users().await;
    if users.is_empty() {
        println!("Nenhum usuário disponível.");
    }
    for user in users {
        println!("  #{:<4} {}", user.id.get(), user.name);
    }
    true
}

fn report_submit<F: Ord + Copy + Display, T>(
    outcome: Result<SubmitOutcome<F, T>, FormError>,
    events: &mut mpsc::Receiver<FormEvent>,
) -> bool {
    drain_form_events(events);
    match outcome {
        Ok(SubmitOutcome::Submitted(_)) => true,
        Ok(SubmitOutcome::Invalid(errors)) => {
            print_field_errors(&errors);
            false
        }
        Ok(SubmitOutcome::Failed(_)) => false,
        Err(e) => {
            eprintln!("{e}");
            false
        }
    }
}

fn report_board<T>(
    result: Result<T, BoardError>,
    events: &mut mpsc::Receiver<BoardEvent>,
) -> bool {
    drain_board_events(events);
    match result {
        Ok(_) => true,
        Err(BoardError::UnknownTask(id)) => {
            eprintln!("Tarefa {id} não encontrada no quadro.");
            false
        }
        // Already acknowledged on the event channel.
        Err(BoardError::Api(_)) => false,
    }
}

fn print_field_errors<F: Ord + Copy + Display>(errors: &FieldErrors<F>) {
    for (field, message) in errors.iter() {
        eprintln!("  {field}: {message}");
    }
}

fn print_ack(ack: &Acknowledgment) {
    if ack.is_success() {
        println!("{ack}");
    } else {
        eprintln!("{ack}");
    }
}

fn drain_form_events(events: &mut mpsc::Receiver<FormEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            FormEvent::Acknowledged { ack, .. } => print_ack(&ack),
            FormEvent::Navigate { .. } => println!("(voltando ao quadro)"),
            FormEvent::StateChanged { form, state } => {
                tracing::trace!(%form, ?state, "form state");
            }
        }
    }
}

fn drain_board_events(events: &mut mpsc::Receiver<BoardEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            BoardEvent::Acknowledged(ack) => print_ack(&ack),
            BoardEvent::Reloaded(diff) => {
                tracing::debug!(changed = !diff.is_empty(), "board snapshot");
            }
        }
    }
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt} [s/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes")
}
