use super::{CommandContext, print_json};
use crate::error::Result;
use crate::platform::api::ProvisionerApi;
use crate::platform::api::types::InfraTemplate;
use colored::Colorize;
use prettytable::{Table, format, row};

fn provider_column(template: &InfraTemplate) -> String {
    template
        .required_credential
        .provider()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn templates_table(templates: &[InfraTemplate]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row![b => "NAME", "KIND", "PROVIDER", "VERSION", "SETTINGS", "DESCRIPTION"]);
    for template in templates {
        table.add_row(row![
            template.name,
            template.kind,
            provider_column(template),
            template.version.as_deref().unwrap_or("-"),
            template.form.fields().len(),
            textwrap::fill(&template.description, 48)
        ]);
    }
    table
}

pub async fn handle_templates(ctx: &CommandContext) -> Result<()> {
    let project_id = ctx.require_project()?;
    let templates = ctx.client.list_infra_templates(project_id).await?;

    if ctx.json {
        return print_json(&templates);
    }

    if templates.is_empty() {
        println!("{}", "No templates are available for this project.".yellow());
        return Ok(());
    }

    templates_table(&templates).printstd();
    println!(
        "\n{}",
        "Run `infractl provision --template <NAME>` to start one.".dimmed()
    );
    Ok(())
}
