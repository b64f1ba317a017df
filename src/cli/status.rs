use crate::error::Result;
use crate::settings::{expand_path, load_settings, settings_path, RulesSource};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let path = settings_path();
    let rules = RulesSource::resolve(None, &settings);

    println!(
        "Settings:     {}{}",
        path.display(),
        if path.exists() { "" } else { " (not found, using defaults)" }
    );
    println!("Rules:        {}", rules.describe());
    match settings.default_input.as_deref() {
        Some(input) => println!("Input:        {}", expand_path(input).display()),
        None => println!("Input:        (not set)"),
    }

    println!();
    println!("Date column:         {}", settings.columns.date);
    println!("Description column:  {}", settings.columns.description);
    println!("Debit column:        {}", settings.columns.debit);
    println!("Credit column:       {}", settings.columns.credit);

    if let RulesSource::File(_) = rules {
        let table = rules.load()?;
        println!();
        println!("{} categories, unmatched go to {}", table.categories.len(), table.default_category);
    }
    Ok(())
}
