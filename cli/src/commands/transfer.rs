use std::path::Path;

use anyhow::{Context, Result};

use ratio_core::db::Database;
use ratio_core::models::ExportData;
use ratio_core::scaler::Rescaler;

pub(crate) fn cmd_export(scaler: &Rescaler<Database>, output: Option<&Path>) -> Result<()> {
    let data = scaler.export();
    let payload = serde_json::to_string_pretty(&data)?;

    match output {
        Some(path) => {
            std::fs::write(path, &payload)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Exported {} ingredient(s) to {}",
                data.ingredients.len(),
                path.display()
            );
        }
        None => println!("{payload}"),
    }

    Ok(())
}

pub(crate) fn cmd_import(scaler: &mut Rescaler<Database>, file: &Path, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let data: ExportData = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid ratio export", file.display()))?;

    let imported = scaler.import(&data)?;

    if json {
        println!("{}", serde_json::json!({ "imported": imported }));
    } else {
        println!("Imported {imported} ingredient(s), replacing the previous list");
    }

    Ok(())
}
