use super::{CommandContext, print_json};
use crate::error::Result;
use crate::platform::api::types::{Infra, InfraRunStatus};
use colored::Colorize;
use prettytable::{Cell, Row, Table, format};

fn status_cell(status: &InfraRunStatus) -> Cell {
    let style = match status {
        InfraRunStatus::Created => "Fg",
        InfraRunStatus::Errored | InfraRunStatus::Deleted => "Fr",
        InfraRunStatus::Unknown => "",
        _ => "Fy",
    };
    Cell::new(&status.to_string()).style_spec(style)
}

/// The integration a run was provisioned with, as `provider:#id`
fn integration_column(infra: &Infra) -> String {
    [
        ("aws", infra.aws_integration_id),
        ("gcp", infra.gcp_integration_id),
        ("do", infra.do_integration_id),
    ]
    .iter()
    .find_map(|(provider, id)| id.map(|id| format!("{}:#{}", provider, id)))
    .unwrap_or_else(|| "-".to_string())
}

pub fn infra_table(infras: &[Infra]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(Row::new(
        ["ID", "KIND", "STATUS", "INTEGRATION", "CREATED"]
            .iter()
            .map(|t| Cell::new(t).style_spec("b"))
            .collect(),
    ));
    for infra in infras {
        table.add_row(Row::new(vec![
            Cell::new(&infra.id.to_string()),
            Cell::new(&infra.kind),
            status_cell(&infra.status),
            Cell::new(&integration_column(infra)),
            Cell::new(
                &infra
                    .created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]));
    }
    table
}

pub async fn handle_infra(ctx: &CommandContext) -> Result<()> {
    let project_id = ctx.require_project()?;
    let infras = ctx.client.list_infras(project_id).await?;

    if ctx.json {
        return print_json(&infras);
    }

    if infras.is_empty() {
        println!(
            "{}",
            "Nothing provisioned yet. Run `infractl provision` to get started.".yellow()
        );
        return Ok(());
    }

    infra_table(&infras).printstd();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infra(id: u64, status: InfraRunStatus) -> Infra {
        Infra {
            id,
            project_id: 1,
            kind: "eks".to_string(),
            status,
            aws_integration_id: Some(4),
            gcp_integration_id: None,
            do_integration_id: None,
            created_at: None,
        }
    }

    #[test]
    fn test_integration_column() {
        assert_eq!(integration_column(&infra(1, InfraRunStatus::Created)), "aws:#4");

        let mut bare = infra(2, InfraRunStatus::Creating);
        bare.aws_integration_id = None;
        assert_eq!(integration_column(&bare), "-");
    }

    #[test]
    fn test_infra_table() {
        let table = infra_table(&[
            infra(1, InfraRunStatus::Created),
            infra(2, InfraRunStatus::Errored),
        ]);
        assert_eq!(table.len(), 2);
        assert!(table.to_string().contains("aws:#4"));
    }
}
