//! Shared rendering utilities for wizard prompts

use crate::provision::ModuleState;
use colored::Colorize;
use inquire::InquireError;
use inquire::ui::{Color, IndexPrefix, RenderConfig, StyleSheet, Styled};

const BAR_WIDTH: usize = 20;

/// Get the standard render config for wizard prompts
pub fn wizard_render_config() -> RenderConfig<'static> {
    RenderConfig::default()
        .with_prompt_prefix(Styled::new("?").with_fg(Color::LightCyan))
        .with_highlighted_option_prefix(Styled::new("▸ ").with_fg(Color::LightCyan))
        .with_option_index_prefix(IndexPrefix::Simple)
        .with_selected_option(Some(StyleSheet::new().with_fg(Color::LightCyan)))
        .with_help_message(StyleSheet::new().with_fg(Color::DarkGrey))
        .with_scroll_up_prefix(Styled::new("▲ "))
        .with_scroll_down_prefix(Styled::new("▼ "))
}

/// Print the wizard banner
pub fn display_banner(title: &str) {
    let width = term_size::dimensions().map(|(w, _)| w).unwrap_or(80).min(64);
    let rule = "═".repeat(width);
    println!();
    println!("{}", rule.bright_cyan());
    println!(
        "{}",
        format!("{:^width$}", title, width = width).bright_cyan().bold()
    );
    println!("{}", rule.bright_cyan());
}

/// Display a wizard step header box
pub fn display_step_header(step_number: u8, step_name: &str, description: &str) {
    let term_width = term_size::dimensions().map(|(w, _)| w).unwrap_or(80);
    let box_width = term_width.clamp(24, 70);
    let inner_width = box_width - 4;

    println!();
    let header = format!("─ Step {} · {} ", step_number, step_name);
    println!(
        "{}{}{}",
        "┌".bright_cyan(),
        header.bright_cyan(),
        "─"
            .repeat(inner_width.saturating_sub(header.chars().count()))
            .bright_cyan()
    );

    for line in textwrap::wrap(description, inner_width - 2) {
        println!("{}  {}", "│".dimmed(), line.white());
    }

    println!("{}{}", "└".dimmed(), "─".repeat(box_width - 1).dimmed());
    println!();
}

/// Format a connection indicator (checkmark or X)
pub fn status_indicator(connected: bool) -> String {
    if connected {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// Icon for a module state
pub fn state_icon(state: ModuleState) -> String {
    match state {
        ModuleState::Successful => "✓".green().to_string(),
        ModuleState::Loading => "⟳".yellow().to_string(),
        ModuleState::Error => "✗".red().to_string(),
    }
}

/// Colored state label
pub fn state_label(state: ModuleState) -> String {
    match state {
        ModuleState::Successful => state.as_str().green().to_string(),
        ModuleState::Loading => state.as_str().yellow().to_string(),
        ModuleState::Error => state.as_str().red().bold().to_string(),
    }
}

/// Fixed-width text progress bar for a 0..=100 percentage
pub fn progress_bar(percent: f64) -> String {
    let clamped = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = ((clamped / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    )
}

/// Format a count badge
pub fn count_badge(count: usize, label: &str) -> String {
    if count > 0 {
        format!("{} {}", count.to_string().cyan(), label.dimmed())
    } else {
        format!("{} {}", "0".dimmed(), label.dimmed())
    }
}

/// How a prompt ended without an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptExit {
    /// Esc: step back where that makes sense
    Escaped,
    /// Ctrl-C or a closed terminal: leave the wizard
    Interrupted,
}

/// Classify an inquire error; anything unexpected aborts the wizard
pub fn prompt_exit(error: &InquireError) -> PromptExit {
    match error {
        InquireError::OperationCanceled => PromptExit::Escaped,
        InquireError::OperationInterrupted => PromptExit::Interrupted,
        other => {
            log::debug!("Prompt failed: {}", other);
            PromptExit::Interrupted
        }
    }
}
