use super::{CommandContext, print_json};
use crate::cli::ProjectCommand;
use crate::error::Result;
use crate::platform::ProjectSession;
use crate::platform::api::types::Project;
use colored::Colorize;
use prettytable::{Table, format, row};

pub async fn handle_project(ctx: &CommandContext, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::List => list_projects(ctx).await,
        ProjectCommand::Use { id } => use_project(ctx, id).await,
        ProjectCommand::Show => show_project(ctx),
        ProjectCommand::Clear => {
            let mut session = ctx.session.clone();
            session.clear();
            session.save_to(&ctx.session_path)?;
            println!("{} Project selection cleared", "✓".green());
            Ok(())
        }
    }
}

async fn list_projects(ctx: &CommandContext) -> Result<()> {
    let projects = ctx.client.list_projects().await?;
    if ctx.json {
        return print_json(&projects);
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row![b => "", "ID", "NAME"]);
    for project in &projects {
        let marker = if ctx.session.project_id == Some(project.id) {
            "*"
        } else {
            ""
        };
        table.add_row(row![marker, project.id, project.name]);
    }
    table.printstd();
    Ok(())
}

/// Persist `id` as the selected project
///
/// The name is looked up when the API is reachable; selection still works
/// offline, just without a name.
async fn use_project(ctx: &CommandContext, id: u64) -> Result<()> {
    let name = match ctx.client.list_projects().await {
        Ok(projects) => find_project_name(&projects, id),
        Err(e) => {
            log::warn!("Could not look up project {}: {}", id, e);
            None
        }
    };

    let session = ProjectSession::with_project(id, name);
    session.save_to(&ctx.session_path)?;
    println!(
        "{} Now using {}",
        "✓".green(),
        session.display_context().cyan()
    );
    Ok(())
}

fn find_project_name(projects: &[Project], id: u64) -> Option<String> {
    projects.iter().find(|p| p.id == id).map(|p| p.name.clone())
}

fn show_project(ctx: &CommandContext) -> Result<()> {
    if ctx.json {
        return print_json(&ctx.session);
    }

    if ctx.session.is_project_selected() {
        println!("{}", ctx.session.display_context().cyan());
        if let Some(updated) = ctx.session.last_updated {
            println!(
                "  {} {}",
                "selected".dimmed(),
                updated.format("%Y-%m-%d %H:%M UTC").to_string().dimmed()
            );
        }
    } else {
        println!(
            "{}",
            "No project selected. Run `infractl project use <ID>`.".yellow()
        );
    }
    Ok(())
}
