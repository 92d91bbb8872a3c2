use anyhow::{Context, Result};
use serde::Serialize;

use ratio_core::db::Database;
use ratio_core::models::Ingredient;
use ratio_core::scaler::Rescaler;

use super::helpers::{fmt_grams, print_ingredient_table};

pub(crate) fn cmd_add(
    scaler: &mut Rescaler<Database>,
    name: &str,
    weight: &str,
    json: bool,
) -> Result<()> {
    let ingredient = scaler.add(name, weight)?;

    if json {
        println!("{}", serde_json::to_string_pretty(ingredient)?);
    } else {
        println!(
            "Added {} ({} g) with id {}",
            ingredient.name,
            fmt_grams(ingredient.weight_g),
            ingredient.id
        );
    }

    Ok(())
}

pub(crate) fn cmd_rescale(
    scaler: &mut Rescaler<Database>,
    id: i64,
    weight: &str,
    json: bool,
) -> Result<()> {
    let old = scaler
        .ingredients()
        .iter()
        .find(|i| i.id == id)
        .map(|i| (i.name.clone(), i.weight_g))
        .with_context(|| format!("No ingredient with id {id}"))?;

    scaler.rescale(id, weight)?;

    let (name, old_weight) = old;
    let new_weight = scaler
        .ingredients()
        .iter()
        .find(|i| i.id == id)
        .map_or(old_weight, |i| i.weight_g);
    let ratio = new_weight / old_weight;

    if json {
        #[derive(Serialize)]
        struct RescaleOutcome<'a> {
            id: i64,
            ratio: f64,
            ingredients: &'a [Ingredient],
        }
        let outcome = RescaleOutcome {
            id,
            ratio,
            ingredients: scaler.ingredients(),
        };
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!(
            "Rescaled {} from {} g to {} g (×{ratio:.3}); {} other ingredient(s) adjusted",
            name,
            fmt_grams(old_weight),
            fmt_grams(new_weight),
            scaler.ingredients().len().saturating_sub(1)
        );
        print_ingredient_table(scaler.ingredients());
        println!("Total: {} g", fmt_grams(scaler.total_weight_g()));
    }

    Ok(())
}

pub(crate) fn cmd_delete(scaler: &mut Rescaler<Database>, id: i64, json: bool) -> Result<()> {
    let removed = scaler.delete(id)?;

    if json {
        println!("{}", serde_json::json!({ "id": id, "deleted": removed }));
    } else if removed {
        println!("Deleted ingredient {id}");
    } else {
        eprintln!("No ingredient with id {id}");
    }

    Ok(())
}

pub(crate) fn cmd_show(scaler: &Rescaler<Database>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(scaler.ingredients())?);
    } else if scaler.ingredients().is_empty() {
        eprintln!("No ingredients yet. Use `ratio add <name> <weight>` to start a recipe.");
    } else {
        print_ingredient_table(scaler.ingredients());
        println!("Total: {} g", fmt_grams(scaler.total_weight_g()));
    }

    Ok(())
}
