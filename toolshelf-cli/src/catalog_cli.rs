//! Catalog listing command

use anyhow::Result;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use toolshelf_core::catalog::{record_list, record_slug, record_text, FileCatalogStore};
use toolshelf_core::ToolshelfLayout;

const DESCRIPTION_WIDTH: usize = 60;

/// Table row for catalog entries
#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Categories")]
    categories: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn list_command(layout: &ToolshelfLayout, json: bool) -> Result<()> {
    let document = FileCatalogStore::new(layout.catalog.clone()).load_required()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&document.toolkits)?);
        return Ok(());
    }

    if document.toolkits.is_empty() {
        println!("No toolkits in catalog/toolkits.json.");
        return Ok(());
    }

    let rows: Vec<CatalogRow> = document
        .toolkits
        .iter()
        .map(|record| CatalogRow {
            slug: record_slug(record).unwrap_or("-").to_string(),
            name: record_text(record, "name").unwrap_or_default(),
            version: record_text(record, "version").unwrap_or_default(),
            categories: record_list(record, "categories").join(", "),
            description: truncate(
                &record_text(record, "description").unwrap_or_default(),
                DESCRIPTION_WIDTH,
            ),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();

    println!("{table}");
    println!("{} toolkit(s)", rows.len());
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{cut}...")
}
