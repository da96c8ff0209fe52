use super::InfoReport;
use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn print_cli_table(report: &InfoReport) -> Result<()> {
    println!();
    println!("{}", report.path.display());
    println!();

    let table = Table::new(rows(report)).with(Style::rounded()).to_string();
    println!("{}", table);

    if report.identifier.is_none() {
        println!();
        println!("This package cannot be built: no valid extension ID.");
    }

    Ok(())
}

fn rows(report: &InfoReport) -> Vec<FieldRow> {
    let info = &report.ext.info;
    vec![
        FieldRow {
            field: "Type",
            value: report.ext.kind.display_name().to_string(),
        },
        FieldRow {
            field: "Name",
            value: or_dash(&info.name),
        },
        FieldRow {
            field: "Version",
            value: or_dash(&info.version),
        },
        FieldRow {
            field: "Manifest ID",
            value: or_dash(&info.id),
        },
        FieldRow {
            field: "Package ID",
            value: report
                .identifier
                .clone()
                .unwrap_or_else(|| "invalid".to_string()),
        },
    ]
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}
