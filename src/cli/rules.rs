use std::path::Path;

use comfy_table::{Cell, Table};

use crate::categorizer::RuleTable;
use crate::error::{FinsortError, Result};
use crate::settings::{expand_path, load_settings, RulesSource};

pub fn list(rules: Option<&str>) -> Result<()> {
    let source = RulesSource::resolve(rules, &load_settings());
    let table = source.load()?;
    println!("Rules ({})\n{}", source.describe(), format_rules(&table));
    Ok(())
}

pub fn export(output: Option<&str>) -> Result<()> {
    let json = RuleTable::default().to_json()?;
    let Some(output) = output else {
        println!("{json}");
        return Ok(());
    };
    let path = expand_path(output);
    write_new(&path, &json)?;
    println!("Wrote built-in rules to {}", path.display());
    Ok(())
}

fn write_new(path: &Path, json: &str) -> Result<()> {
    if path.exists() {
        return Err(FinsortError::Other(format!(
            "{} already exists; choose another --output",
            path.display()
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn format_rules(rules: &RuleTable) -> String {
    let mut table = Table::new();
    table.set_header(vec!["#", "Category", "Keywords"]);
    for (i, category) in rules.categories.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&category.name),
            Cell::new(category.keywords.join(", ")),
        ]);
    }
    format!("{table}\nUnmatched transactions: {}", rules.default_category)
}
