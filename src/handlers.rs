use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::controller::{Field, TodoController};
use crate::error::AppError;

pub const HELP: &str = "\
commands:
  list              reload the task list
  select <n>        make row n the active task
  title <text>      set the title input
  notes <text>      set the notes input
  when <date>       set the start date input (YYYY-MM-DD)
  due <date>        set the due date input (YYYY-MM-DD)
  clear             empty all inputs
  add               create a task from the inputs
  update            save the inputs into the active task
  delete            delete the active task
  show              fetch the stored copy of the active task
  help              show this text
  quit              leave
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Select(usize),
    Set(Field, String),
    Clear,
    Add,
    Update,
    Delete,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word.to_ascii_lowercase().as_str() {
            "list" | "ls" | "refresh" => Command::List,
            "select" | "sel" => {
                let n: usize = rest
                    .parse()
                    .map_err(|_| AppError::BadRequest(format!("select needs a row number, got {:?}", rest)))?;
                if n == 0 {
                    return Err(AppError::BadRequest("rows are numbered from 1".to_string()));
                }
                Command::Select(n - 1)
            }
            "title" => Command::Set(Field::Title, rest.to_string()),
            "notes" => Command::Set(Field::Notes, rest.to_string()),
            "when" | "start" => Command::Set(Field::When, rest.to_string()),
            "due" => Command::Set(Field::DueBy, rest.to_string()),
            "clear" | "reset" => Command::Clear,
            "add" => Command::Add,
            "update" => Command::Update,
            "delete" | "del" | "rm" => Command::Delete,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(AppError::BadRequest(format!("unknown command {:?}, try help", other))),
        };
        Ok(command)
    }
}

/// Runs one command. Failures have already been shown by the controller.
pub async fn dispatch(controller: &TodoController, command: Command) -> Result<Flow, AppError> {
    match command {
        Command::List => controller.refresh().await?,
        Command::Select(index) => controller.select(index)?,
        Command::Set(field, value) => controller.set_field(field, &value)?,
        Command::Clear => controller.reset_fields(),
        Command::Add => controller.add().await?,
        Command::Update => controller.update().await?,
        Command::Delete => controller.delete().await?,
        Command::Show => {
            controller.show_active().await?;
        }
        Command::Help => controller.message(HELP),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Reads commands line by line until `quit` or end of input. Bytes that are
/// not UTF-8 are replaced, so one bad line cannot end the loop.
pub async fn run<R>(controller: &TodoController, input: R) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
{
    let mut input = input;
    let mut buf = Vec::new();
    loop {
        controller.prompt();
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf).into_owned();
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                controller.notify(&e.to_string());
                continue;
            }
        };
        debug!("command: {:?}", command);

        match dispatch(controller, command).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => debug!("command failed: {}", e),
        }
    }
    Ok(())
}
