//! Provisioning status rendering and the watch loop

use crate::platform::api::types::TfModule;
use crate::platform::api::{PlatformApiError, ProvisionerApi};
use crate::provision::status::module_display_name;
use crate::provision::{ModuleState, ModuleStatus, StatusBoard};
use crate::wizard::render::{progress_bar, state_icon, state_label};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

fn module_kind(modules: &[TfModule], id: u64) -> &str {
    modules
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.kind.as_str())
        .unwrap_or("")
}

/// Machine-readable snapshot of a board
pub fn status_json(board: &StatusBoard) -> serde_json::Value {
    let status = board.status();
    let modules: Vec<serde_json::Value> = status
        .modules
        .iter()
        .map(|(id, module)| {
            let kind = module_kind(board.modules(), *id);
            json!({
                "id": id,
                "kind": kind,
                "name": module_display_name(kind),
                "state": module.state,
                "percent": module.percent,
                "provisioned": module.provisioned,
                "total": module.total,
                "errors": module.errors,
            })
        })
        .collect();

    json!({
        "infra_id": board.infra_id(),
        "state": status.state,
        "percent": status.percent,
        "modules": modules,
        "poll_error": board.last_error(),
    })
}

fn module_line(name: &str, module: &ModuleStatus) -> String {
    format!(
        "{} {:<40} {} {:>5.1}%  {}/{}",
        state_icon(module.state),
        name,
        progress_bar(module.percent),
        module.percent,
        module.provisioned,
        module.total
    )
}

/// Print the current snapshot once
pub fn print_status(board: &StatusBoard) {
    let status = board.status();

    println!(
        "\n{} Infrastructure {} is {} ({:.0}%)",
        state_icon(status.state),
        board.infra_id().to_string().cyan(),
        state_label(status.state),
        status.percent
    );

    if status.modules.is_empty() {
        println!("  {}", "No modules reported yet.".dimmed());
    }

    for (id, module) in &status.modules {
        let name = module_display_name(module_kind(board.modules(), *id));
        println!("  {}", module_line(name, module));
        for error in &module.errors {
            for line in textwrap::wrap(error, 72) {
                println!("      {}", line.red());
            }
        }
    }

    if let Some(error) = board.last_error() {
        println!("\n  {} {}", "Last poll failed:".yellow(), error);
    }
}

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
}

/// Live progress bars, one per module plus an overall bar
pub struct StatusProgress {
    multi: MultiProgress,
    overall: ProgressBar,
    modules: HashMap<u64, ProgressBar>,
}

impl StatusProgress {
    pub fn new(infra_id: u64) -> Self {
        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(100));
        overall.set_style(bar_style(
            "{prefix:.bold} {bar:40.cyan/blue} {pos:>3}% {msg} [{elapsed_precise}]",
        ));
        overall.set_prefix(format!("infra {}", infra_id));
        overall.set_message("waiting for state...");
        Self {
            multi,
            overall,
            modules: HashMap::new(),
        }
    }

    /// Reflect the board's latest snapshot
    pub fn update(&mut self, board: &StatusBoard) {
        let status = board.status();
        self.overall.set_position(status.percent.round() as u64);
        self.overall.set_message(match board.last_error() {
            Some(error) => format!("{} (poll failed: {})", status.state, error),
            None => status.state.to_string(),
        });

        for (id, module) in &status.modules {
            let bar = self.modules.entry(*id).or_insert_with(|| {
                let bar = self.multi.add(ProgressBar::new(100));
                bar.set_style(bar_style("  {prefix:<40} {bar:30.green/white} {pos:>3}% {msg}"));
                bar.set_prefix(module_display_name(module_kind(board.modules(), *id)).to_string());
                bar
            });
            bar.set_position(module.percent.round() as u64);
            bar.set_message(match module.state {
                ModuleState::Error => module.errors.join("; ").red().to_string(),
                state => state_label(state),
            });
        }
    }

    /// Freeze the bars with their final state
    pub fn finish(&self) {
        for bar in self.modules.values() {
            bar.abandon();
        }
        self.overall.abandon();
    }
}

/// Poll a run until it settles or the user presses Ctrl-C
///
/// Transient fetch failures are shown and polling continues; any other API
/// error ends the watch.
pub async fn watch_status<A: ProvisionerApi + ?Sized>(
    api: &A,
    project_id: u64,
    infra_id: u64,
    interval: Duration,
    live: bool,
) -> Result<StatusBoard, PlatformApiError> {
    let mut board = StatusBoard::new(infra_id);
    let mut progress = live.then(|| StatusProgress::new(infra_id));

    loop {
        match board.refresh(api, project_id).await {
            Err(e) if !e.is_transient() => {
                if let Some(progress) = &progress {
                    progress.finish();
                }
                return Err(e);
            }
            _ => {}
        }

        match progress.as_mut() {
            Some(progress) => progress.update(&board),
            None => log::info!(
                "Infra {} is {} ({:.0}%)",
                infra_id,
                board.status().state,
                board.status().percent
            ),
        }

        if board.is_finished() {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                log::debug!("Watch interrupted");
                break;
            }
        }
    }

    if let Some(progress) = &progress {
        progress.finish();
    }
    Ok(board)
}
