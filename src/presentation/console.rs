// Interaction console - line-oriented page events for the headless host
use crate::application::controller::{DashboardController, UiEvent};
use crate::presentation::charts::ChartLedger;
use crate::presentation::dom::MemoryDom;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Event(UiEvent),
    Show(Option<String>),
    ShowCharts,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("unknown command '{0}' (try: tab, set, click, enter, show, quit)")]
    UnknownCommand(String),
    #[error("'{0}' needs an element id")]
    MissingTarget(&'static str),
}

/// Parses one input line; blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, ConsoleError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();
    let target = |verb: &'static str| -> Result<(String, String), ConsoleError> {
        let (id, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if id.is_empty() {
            return Err(ConsoleError::MissingTarget(verb));
        }
        Ok((id.to_string(), tail.trim_start().to_string()))
    };

    let command = match verb {
        "tab" => ConsoleCommand::Event(UiEvent::TabClick(target("tab")?.0)),
        "click" => ConsoleCommand::Event(UiEvent::Click(target("click")?.0)),
        "enter" => ConsoleCommand::Event(UiEvent::KeyPress {
            id: target("enter")?.0,
            key: "Enter".to_string(),
        }),
        "set" => {
            let (id, value) = target("set")?;
            ConsoleCommand::Event(UiEvent::Input { id, value })
        }
        "show" if rest == "charts" => ConsoleCommand::ShowCharts,
        "show" if rest.is_empty() => ConsoleCommand::Show(None),
        "show" => ConsoleCommand::Show(Some(rest.to_string())),
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

/// Reads commands from stdin until `quit` or end of input. Page events run
/// as independent tasks, so a slow request never blocks the next command.
/// Must run inside a `LocalSet`.
pub async fn run_console(
    controller: DashboardController,
    dom: Rc<RefCell<MemoryDom>>,
    charts: Rc<RefCell<ChartLedger>>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("{}", e);
                continue;
            }
        };
        match command {
            ConsoleCommand::Event(event) => {
                let controller = controller.clone();
                tokio::task::spawn_local(async move {
                    let description = format!("{:?}", event);
                    if let Err(e) = controller.dispatch(event).await {
                        tracing::error!(event = %description, "Unhandled handler failure: {}", e);
                    }
                });
            }
            ConsoleCommand::Show(only) => {
                if only.is_none() {
                    println!("{}", status_line(&controller));
                }
                print!("{}", dom.borrow().outline(only.as_deref()));
            }
            ConsoleCommand::ShowCharts => print!("{}", chart_report(&charts.borrow())),
            ConsoleCommand::Quit => break,
        }
    }
    Ok(())
}

fn status_line(controller: &DashboardController) -> String {
    let updated = controller
        .snapshot()
        .map(|s| s.timestamp.clone().unwrap_or_else(|| "unknown".to_string()))
        .unwrap_or_else(|| "never".to_string());
    format!(
        "view={} updated={} chat_turns={}",
        controller.active_view(),
        updated,
        controller.transcript().len()
    )
}

fn chart_report(ledger: &ChartLedger) -> String {
    let mut out = String::new();
    for surface in ledger.surfaces() {
        out.push_str(&format!(
            "{} live={} drawn={}\n",
            surface,
            ledger.live_on(surface),
            ledger.drawn_on(surface)
        ));
        if let Some(spec) = ledger.current(surface) {
            out.push_str(&format!("    {}\n", spec.summary()));
        }
    }
    out
}
