use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{Connection, params};

use crate::models::Ingredient;
use crate::scaler::IngredientStore;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS recipes (
                    key TEXT PRIMARY KEY,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS ingredients (
                    recipe_key TEXT NOT NULL REFERENCES recipes(key),
                    id INTEGER NOT NULL,
                    position INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    weight_g REAL NOT NULL,
                    PRIMARY KEY (recipe_key, id)
                );

                CREATE INDEX IF NOT EXISTS idx_ingredients_recipe ON ingredients(recipe_key);

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    fn ingredient_from_row(row: &rusqlite::Row) -> rusqlite::Result<Ingredient> {
        Ok(Ingredient {
            id: row.get(0)?,
            name: row.get(1)?,
            weight_g: row.get(2)?,
        })
    }

    /// Load the ingredient list for a recipe key, in insertion order.
    /// An absent key yields an empty list.
    pub fn load_ingredients(&self, recipe: &str) -> Result<Vec<Ingredient>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, weight_g FROM ingredients
             WHERE recipe_key = ?1
             ORDER BY position",
        )?;
        let ingredients = stmt
            .query_map(params![recipe], Self::ingredient_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ingredients)
    }

    /// Replace the stored list for a recipe key with `ingredients`, in one
    /// transaction. Positions are rewritten from the slice order.
    pub fn save_ingredients(&mut self, recipe: &str, ingredients: &[Ingredient]) -> Result<()> {
        let now = Local::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO recipes (key, updated_at) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET updated_at = ?2",
            params![recipe, now],
        )?;
        tx.execute(
            "DELETE FROM ingredients WHERE recipe_key = ?1",
            params![recipe],
        )?;
        for (position, ingredient) in ingredients.iter().enumerate() {
            tx.execute(
                "INSERT INTO ingredients (recipe_key, id, position, name, weight_g)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    recipe,
                    ingredient.id,
                    position as i64,
                    ingredient.name,
                    ingredient.weight_g,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl IngredientStore for Database {
    fn load(&self, recipe: &str) -> Result<Vec<Ingredient>> {
        self.load_ingredients(recipe)
    }

    fn save(&mut self, recipe: &str, ingredients: &[Ingredient]) -> Result<()> {
        self.save_ingredients(recipe, ingredients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_RECIPE;

    fn sample_list() -> Vec<Ingredient> {
        vec![
            Ingredient {
                id: 1,
                name: "Flour".to_string(),
                weight_g: 250.0,
            },
            Ingredient {
                id: 2,
                name: "Water".to_string(),
                weight_g: 150.0,
            },
            Ingredient {
                id: 3,
                name: "Salt".to_string(),
                weight_g: 5.0,
            },
        ]
    }

    #[test]
    fn test_load_absent_key_is_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_ingredients(DEFAULT_RECIPE).unwrap().is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut db = Database::open_in_memory().unwrap();
        let list = sample_list();
        db.save_ingredients(DEFAULT_RECIPE, &list).unwrap();

        let loaded = db.load_ingredients(DEFAULT_RECIPE).unwrap();
        assert_eq!(loaded, list);
    }

    #[test]
    fn test_save_replaces_previous_list() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_ingredients(DEFAULT_RECIPE, &sample_list()).unwrap();

        let shorter = vec![Ingredient {
            id: 9,
            name: "Butter".to_string(),
            weight_g: 80.0,
        }];
        db.save_ingredients(DEFAULT_RECIPE, &shorter).unwrap();

        let loaded = db.load_ingredients(DEFAULT_RECIPE).unwrap();
        assert_eq!(loaded, shorter);
    }

    #[test]
    fn test_save_preserves_order_not_id_order() {
        let mut db = Database::open_in_memory().unwrap();
        // Insertion order deliberately disagrees with id order.
        let list = vec![
            Ingredient {
                id: 30,
                name: "Sugar".to_string(),
                weight_g: 100.0,
            },
            Ingredient {
                id: 10,
                name: "Eggs".to_string(),
                weight_g: 120.0,
            },
        ];
        db.save_ingredients(DEFAULT_RECIPE, &list).unwrap();

        let loaded = db.load_ingredients(DEFAULT_RECIPE).unwrap();
        assert_eq!(loaded, list);
    }

    #[test]
    fn test_recipes_are_isolated_by_key() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_ingredients("bread", &sample_list()).unwrap();
        db.save_ingredients(
            "cake",
            &[Ingredient {
                id: 1,
                name: "Sugar".to_string(),
                weight_g: 200.0,
            }],
        )
        .unwrap();

        assert_eq!(db.load_ingredients("bread").unwrap().len(), 3);
        assert_eq!(db.load_ingredients("cake").unwrap().len(), 1);
    }

    #[test]
    fn test_save_empty_list_clears() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_ingredients(DEFAULT_RECIPE, &sample_list()).unwrap();
        db.save_ingredients(DEFAULT_RECIPE, &[]).unwrap();
        assert!(db.load_ingredients(DEFAULT_RECIPE).unwrap().is_empty());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratio.db");

        {
            let mut db = Database::open(&path).unwrap();
            db.save_ingredients(DEFAULT_RECIPE, &sample_list()).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.load_ingredients(DEFAULT_RECIPE).unwrap(), sample_list());
    }
}
