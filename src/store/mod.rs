//! Recipe tables and the transfer of recipe values to and from the controller.
//!
//! A [`RecipeStore`] owns the session state: the recipe table, the value
//! table and the tag bindings discovered on the controller. Tables are read
//! lazily on first use and written back whole after every change. Every
//! operation holds the session lock for its whole duration, file access and
//! controller handshake included, so operations never interleave.

pub mod info;
pub mod listing;
pub mod model;

use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::client::bridge::{FileSystem, TagBridge};
use crate::client::controller::Controller;
use crate::config::Config;
use crate::error::RecipeError;
use crate::proto::load_mode::LoadMode;
use crate::proto::record_codec::TagBinding;
use crate::store::info::{NumericLabels, TextLookup};
use crate::store::listing::{RecipePage, SortMode};
use crate::store::model::{
    parse_table, write_table, RecipeId, RecipeRecord, RecipeValueOverride, RECIPE_HEADER,
    VALUE_HEADER,
};

#[derive(Default)]
struct Tables {
    recipes: Vec<RecipeRecord>,
    values: Vec<RecipeValueOverride>,
    recipes_loaded: bool,
    values_loaded: bool,
    /// Highest recipe id seen this session, removed recipes included.
    highest_id: RecipeId,
    bindings: Option<Vec<TagBinding>>,
}

pub struct RecipeStore {
    config: Config,
    fs: Arc<dyn FileSystem>,
    controller: Controller,
    lookup: Arc<dyn TextLookup>,
    tables: Mutex<Tables>,
}

impl RecipeStore {
    pub fn new(config: Config, fs: Arc<dyn FileSystem>, bridge: Arc<dyn TagBridge>) -> Self {
        RecipeStore {
            config,
            fs,
            controller: Controller::new(bridge),
            lookup: Arc::new(NumericLabels),
            tables: Mutex::new(Tables::default()),
        }
    }

    /// Localized headings for [`RecipeStore::value_information`].
    pub fn with_text_lookup(mut self, lookup: Arc<dyn TextLookup>) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub async fn load_recipe_table(&self) -> Result<(), RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_recipes(&mut tables).await
    }

    pub async fn load_value_table(&self) -> Result<(), RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_values(&mut tables).await
    }

    /// Forgets tables and bindings, the next operation reads everything again.
    pub async fn reset_tables(&self) {
        let mut tables = self.tables.lock().await;
        *tables = Tables::default();
        debug!("Recipe tables reset");
    }

    pub async fn add_recipe(
        &self,
        product_name: &str,
        variant_name: &str,
        description: &str,
    ) -> Result<RecipeId, RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_recipes(&mut tables).await?;

        let last = tables
            .recipes
            .iter()
            .map(|r| r.recipe_id)
            .fold(tables.highest_id, RecipeId::max);
        let recipe_id = last
            .checked_add(1)
            .ok_or(RecipeError::IdsExhausted { last })?;

        let previous_highest = tables.highest_id;
        tables.highest_id = recipe_id;
        tables.recipes.push(RecipeRecord::new(
            recipe_id,
            product_name,
            variant_name,
            description,
        ));
        if let Err(e) = self.write_recipes(&mut tables).await {
            //table in memory stays what is on disk
            tables.recipes.pop();
            tables.highest_id = previous_highest;
            return Err(e);
        }
        info!("Added recipe {}", recipe_id);
        Ok(recipe_id)
    }

    pub async fn update_recipe(
        &self,
        recipe_id: RecipeId,
        product_name: &str,
        variant_name: &str,
        description: &str,
    ) -> Result<(), RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_recipes(&mut tables).await?;

        let recipe = find_recipe(&mut tables.recipes, recipe_id)?;
        recipe.product_name = product_name.to_owned();
        recipe.variant_name = variant_name.to_owned();
        recipe.description = description.to_owned();
        self.write_recipes(&mut tables).await?;
        info!("Updated recipe {}", recipe_id);
        Ok(())
    }

    /// Removes the recipe together with all of its stored values.
    pub async fn remove_recipe(&self, recipe_id: RecipeId) -> Result<(), RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_recipes(&mut tables).await?;
        self.ensure_values(&mut tables).await?;

        find_recipe(&mut tables.recipes, recipe_id)?;
        tables.recipes.retain(|r| r.recipe_id != recipe_id);
        tables.values.retain(|v| v.recipe_id != recipe_id);
        self.write_recipes(&mut tables).await?;
        self.write_values(&mut tables).await?;
        info!("Removed recipe {}", recipe_id);
        Ok(())
    }

    pub async fn get_recipe(&self, recipe_id: RecipeId) -> Result<RecipeRecord, RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_recipes(&mut tables).await?;
        find_recipe(&mut tables.recipes, recipe_id).map(|r| r.clone())
    }

    pub async fn recipes(&self) -> Result<Vec<RecipeRecord>, RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_recipes(&mut tables).await?;
        Ok(tables.recipes.clone())
    }

    /// Stored values of one recipe in table order.
    pub async fn values_of(&self, recipe_id: RecipeId) -> Result<Vec<RecipeValueOverride>, RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_values(&mut tables).await?;
        Ok(recipe_values(&tables.values, recipe_id))
    }

    /// Bindings discovered in this session, empty before the first transfer.
    pub async fn bindings(&self) -> Vec<TagBinding> {
        let tables = self.tables.lock().await;
        tables.bindings.clone().unwrap_or_default()
    }

    /// Captures the current controller values into the recipe.
    ///
    /// All previous rows of the recipe are replaced by one row per bound
    /// field. Rows of other recipes stay as they are.
    pub async fn store_values(&self, recipe_id: RecipeId) -> Result<(), RecipeError> {
        let mut guard = self.tables.lock().await;
        self.ensure_recipes(&mut guard).await?;
        self.ensure_values(&mut guard).await?;
        find_recipe(&mut guard.recipes, recipe_id)?;
        self.ensure_bindings(&mut guard).await?;

        let tables = &mut *guard;
        let bindings = tables.bindings.get_or_insert_with(Vec::new);
        self.controller.upload(bindings).await?;

        tables.values.retain(|v| v.recipe_id != recipe_id);
        for binding in bindings.iter() {
            for slot in binding.slots.iter() {
                tables.values.push(RecipeValueOverride::new(
                    recipe_id,
                    &binding.record_id,
                    slot.name(),
                    &slot.value_to_text(),
                ));
            }
        }

        find_recipe(&mut tables.recipes, recipe_id)?.mark_saved(Utc::now());
        self.write_values(tables).await?;
        self.write_recipes(tables).await?;
        info!("Stored values of recipe {}", recipe_id);
        Ok(())
    }

    /// Applies the stored values of the recipe to the bindings and sends them
    /// to the controller.
    pub async fn load_values(&self, recipe_id: RecipeId, mode: LoadMode) -> Result<(), RecipeError> {
        let mut guard = self.tables.lock().await;
        self.ensure_recipes(&mut guard).await?;
        self.ensure_values(&mut guard).await?;
        find_recipe(&mut guard.recipes, recipe_id)?;
        self.ensure_bindings(&mut guard).await?;

        let tables = &mut *guard;
        let rows: Vec<&RecipeValueOverride> = tables
            .values
            .iter()
            .filter(|v| v.recipe_id == recipe_id)
            .collect();
        if rows.is_empty() {
            return Err(RecipeError::ValuesNotFound { recipe_id });
        }

        let bindings = tables.bindings.get_or_insert_with(Vec::new);
        for row in rows {
            let binding = match bindings.iter_mut().find(|b| b.record_id == row.record_id) {
                Some(binding) => binding,
                None => {
                    warn!("Record {} is not bound, value skipped", row.record_id);
                    continue;
                }
            };
            match binding.slot_mut(&row.field_name) {
                Some(slot) => slot.value_from_text(&row.value),
                None => warn!(
                    "Record {} has no field {}, value skipped",
                    row.record_id, row.field_name
                ),
            }
        }

        self.controller.download(bindings, mode).await?;
        info!("Loaded values of recipe {} ({:?})", recipe_id, mode);
        Ok(())
    }

    pub async fn remove_values(&self, recipe_id: RecipeId) -> Result<(), RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_values(&mut tables).await?;

        let before = tables.values.len();
        tables.values.retain(|v| v.recipe_id != recipe_id);
        if tables.values.len() == before {
            return Err(RecipeError::ValuesNotFound { recipe_id });
        }
        self.write_values(&mut tables).await?;
        info!("Removed values of recipe {}", recipe_id);
        Ok(())
    }

    pub async fn list_page(
        &self,
        page: usize,
        sort_mode: SortMode,
        filter_product: &str,
        filter_variant: &str,
    ) -> Result<RecipePage, RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_recipes(&mut tables).await?;
        Ok(listing::list_page(
            &tables.recipes,
            page,
            sort_mode,
            filter_product,
            filter_variant,
        ))
    }

    /// Info panel pages for the stored values of the recipe.
    pub async fn value_information(&self, recipe_id: RecipeId, simple: bool) -> Result<Vec<String>, RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_values(&mut tables).await?;
        let values = recipe_values(&tables.values, recipe_id);
        let bindings = tables.bindings.as_deref().unwrap_or(&[]);
        Ok(info::value_information(
            &values,
            bindings,
            simple,
            self.lookup.as_ref(),
        ))
    }

    pub async fn trace_recipes(&self) -> Result<(), RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_recipes(&mut tables).await?;
        debug!("Start trace recipes");
        for r in tables.recipes.iter() {
            debug!(
                "Recipe - Id: {}, Product: {}, Variant: {}, LastSaved: {}",
                r.recipe_id, r.product_name, r.variant_name, r.last_saved
            );
        }
        debug!("End trace recipes");
        Ok(())
    }

    pub async fn trace_values(&self) -> Result<(), RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_values(&mut tables).await?;
        debug!("Start trace values");
        for v in tables.values.iter() {
            debug!(
                "Value - Id: {}, Rid: {}, Variable: {}, Value: {}",
                v.recipe_id, v.record_id, v.field_name, v.value
            );
        }
        debug!("End trace values");
        Ok(())
    }

    pub async fn trace_bindings(&self) -> Result<(), RecipeError> {
        let mut tables = self.tables.lock().await;
        self.ensure_bindings(&mut tables).await?;
        debug!("Start trace bindings");
        for b in tables.bindings.iter().flatten() {
            debug!("Tag - Name: {}, Rid: {}, Type: {}", b.tag_name, b.record_id, b.record_type);
            for slot in b.slots.iter() {
                debug!("  {} ({}): {}", slot.name(), slot.plc_type(), slot.value);
            }
        }
        debug!("End trace bindings");
        Ok(())
    }

    async fn ensure_recipes(&self, tables: &mut Tables) -> Result<(), RecipeError> {
        if tables.recipes_loaded {
            return Ok(());
        }
        let path = self.config.recipe_file_path();
        tables.recipes = match self.read_table(&path).await? {
            Some(content) => parse_table(&content, RecipeRecord::from_csv_row),
            None => Vec::new(),
        };
        tables.highest_id = tables.recipes.iter().map(|r| r.recipe_id).max().unwrap_or(0);
        tables.recipes_loaded = true;
        debug!("Recipe table loaded, {} recipe(s)", tables.recipes.len());
        Ok(())
    }

    async fn ensure_values(&self, tables: &mut Tables) -> Result<(), RecipeError> {
        if tables.values_loaded {
            return Ok(());
        }
        let path = self.config.value_file_path();
        tables.values = match self.read_table(&path).await? {
            Some(content) => parse_table(&content, RecipeValueOverride::from_csv_row),
            None => Vec::new(),
        };
        tables.values_loaded = true;
        debug!("Value table loaded, {} value(s)", tables.values.len());
        Ok(())
    }

    async fn ensure_bindings(&self, tables: &mut Tables) -> Result<(), RecipeError> {
        if tables.bindings.is_none() {
            tables.bindings = Some(self.controller.discover_bindings().await?);
        }
        Ok(())
    }

    /// `None` if the file does not exist yet.
    async fn read_table(&self, path: &Path) -> Result<Option<String>, RecipeError> {
        match self.fs.read_text_file(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("{} not found, starting with an empty table", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_recipes(&self, tables: &mut Tables) -> Result<(), RecipeError> {
        tables.recipes.sort_by_key(|r| r.recipe_id);
        let content = write_table(RECIPE_HEADER, tables.recipes.iter().map(|r| r.to_csv_row()));
        self.write_file(&self.config.recipe_file_path(), &content).await
    }

    async fn write_values(&self, tables: &mut Tables) -> Result<(), RecipeError> {
        tables.values.sort_by_key(|v| v.recipe_id);
        let content = write_table(VALUE_HEADER, tables.values.iter().map(|v| v.to_csv_row()));
        self.write_file(&self.config.value_file_path(), &content).await
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<(), RecipeError> {
        self.fs.create_directory(&self.config.recipe_path).await?;
        self.fs.write_text_file(path, content).await?;
        Ok(())
    }
}

fn find_recipe(recipes: &mut [RecipeRecord], recipe_id: RecipeId) -> Result<&mut RecipeRecord, RecipeError> {
    recipes
        .iter_mut()
        .find(|r| recipe_id > 0 && r.recipe_id == recipe_id)
        .ok_or(RecipeError::RecipeNotFound { recipe_id })
}

fn recipe_values(values: &[RecipeValueOverride], recipe_id: RecipeId) -> Vec<RecipeValueOverride> {
    values
        .iter()
        .filter(|v| v.recipe_id == recipe_id)
        .cloned()
        .collect()
}
