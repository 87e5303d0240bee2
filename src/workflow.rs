//! Recipe screen logic on top of [`RecipeStore`].
//!
//! The screen talks to the engine through HMI tags only: the list rows, the
//! paging and sort state, the selected recipe and the result of the last
//! controller exchange. Confirmation dialogs stay with the caller, the
//! methods here run once the operator has confirmed.

use std::convert::TryFrom;
use std::sync::Arc;

use log::{error, info};

use crate::client::bridge::{TagBridge, TagValue};
use crate::error::RecipeError;
use crate::proto::load_mode::LoadMode;
use crate::store::listing::{RecipePage, SortKey, SortMode, PAGE_SIZE};
use crate::store::model::{RecipeId, RecipeRecord};
use crate::store::RecipeStore;

pub const SELECTED_ID_TAG: &str = "Recipe_List_SelectedId";
pub const PAGE_ACT_TAG: &str = "Recipe_List_Page_Act";
pub const PAGE_MAX_TAG: &str = "Recipe_List_Page_Max";
pub const SORT_MODE_TAG: &str = "Recipe_Load_SortMode";
pub const FILTER_PRODUCT_TAG: &str = "Recipe_Load_FilterProduct";
pub const FILTER_VARIANT_TAG: &str = "Recipe_Load_FilterVariant";
pub const MEMORY_DUMP_TAG: &str = "Recipe_Load_MemoryDump";
pub const CURRENT_RECIPE_TAG: &str = "DB_Recipe_CurrentRecipe";
pub const EXCHANGE_TAG: &str = "Recipe_PLCExchange";

/// Values of [`EXCHANGE_TAG`].
pub const EXCHANGE_FAILED: u16 = 1;
pub const EXCHANGE_DONE: u16 = 2;

/// Content of the info panel for one recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeInfo {
    pub recipe: RecipeRecord,
    pub pages: Vec<String>,
}

pub struct RecipeWorkflow {
    store: Arc<RecipeStore>,
    bridge: Arc<dyn TagBridge>,
}

impl RecipeWorkflow {
    pub fn new(store: Arc<RecipeStore>) -> Self {
        let bridge = store.controller().bridge().clone();
        RecipeWorkflow { store, bridge }
    }

    pub fn store(&self) -> &Arc<RecipeStore> {
        &self.store
    }

    pub async fn screen_loaded(&self) -> Result<RecipePage, RecipeError> {
        self.bridge
            .write_tags(vec![
                (SELECTED_ID_TAG.to_owned(), TagValue::Int(0)),
                (PAGE_ACT_TAG.to_owned(), TagValue::Int(1)),
            ])
            .await?;
        self.fill_list().await
    }

    pub async fn screen_unloaded(&self) {
        self.store.reset_tables().await;
    }

    /// Writes the current page of the list to the row tags. Paging, sort and
    /// filter state come from their tags.
    pub async fn fill_list(&self) -> Result<RecipePage, RecipeError> {
        let state = self
            .bridge
            .read_tags(&[
                PAGE_ACT_TAG.to_owned(),
                SORT_MODE_TAG.to_owned(),
                FILTER_PRODUCT_TAG.to_owned(),
                FILTER_VARIANT_TAG.to_owned(),
            ])
            .await?;
        let mut state = state.into_iter();
        let mut next = || state.next().unwrap_or_else(|| TagValue::from(""));
        let page = next().as_i64().unwrap_or(1).max(1) as usize;
        let sort_mode = SortMode::from_tag(next().as_i64().unwrap_or(0));
        let filter_product = next().as_text();
        let filter_variant = next().as_text();
        let recipe_page = self
            .store
            .list_page(page, sort_mode, &filter_product, &filter_variant)
            .await?;

        let mut values = vec![(
            PAGE_MAX_TAG.to_owned(),
            TagValue::from(recipe_page.page_count as u32),
        )];
        for i in 0..PAGE_SIZE {
            let row = match recipe_page.recipes.get(i) {
                Some(r) => [
                    TagValue::from(r.recipe_id),
                    TagValue::from(r.product_name.as_str()),
                    TagValue::from(r.variant_name.as_str()),
                    TagValue::from(r.last_saved.as_str()),
                ],
                None => [
                    TagValue::Int(0),
                    TagValue::from(""),
                    TagValue::from(""),
                    TagValue::from(""),
                ],
            };
            let names = ["RecipeId", "ProductName", "VariantName", "LastSaved"];
            for (name, value) in names.iter().zip(row.iter()) {
                values.push((format!("Recipe_List_{}[{}]", name, i), value.clone()));
            }
        }
        self.bridge.write_tags(values).await?;
        Ok(recipe_page)
    }

    /// Next page, wraps to the first after the last.
    pub async fn next_page(&self) -> Result<RecipePage, RecipeError> {
        let (act, max) = self.page_state().await?;
        let act = if act >= max { 1 } else { act + 1 };
        self.go_to_page(act).await
    }

    /// Previous page, wraps to the last before the first.
    pub async fn prev_page(&self) -> Result<RecipePage, RecipeError> {
        let (act, max) = self.page_state().await?;
        let act = if act <= 1 { max } else { act - 1 };
        self.go_to_page(act).await
    }

    /// Sorts by `key`, flipping the direction if the list already is sorted
    /// ascending by it. Returns to the first page.
    pub async fn toggle_sort(&self, key: SortKey) -> Result<RecipePage, RecipeError> {
        let current = self.bridge.read_tag(SORT_MODE_TAG).await?;
        let sort_mode = SortMode::from_tag(current.as_i64().unwrap_or(0)).toggle(key);
        self.bridge
            .write_tags(vec![
                (PAGE_ACT_TAG.to_owned(), TagValue::Int(1)),
                (SELECTED_ID_TAG.to_owned(), TagValue::Int(0)),
                (SORT_MODE_TAG.to_owned(), TagValue::from(sort_mode.as_u8() as u16)),
            ])
            .await?;
        self.fill_list().await
    }

    pub async fn apply_filter(&self, product: &str, variant: &str) -> Result<RecipePage, RecipeError> {
        self.bridge
            .write_tags(vec![
                (FILTER_PRODUCT_TAG.to_owned(), TagValue::from(product)),
                (FILTER_VARIANT_TAG.to_owned(), TagValue::from(variant)),
                (PAGE_ACT_TAG.to_owned(), TagValue::Int(1)),
                (SELECTED_ID_TAG.to_owned(), TagValue::Int(0)),
            ])
            .await?;
        self.fill_list().await
    }

    /// Recipe behind the selected list row.
    pub async fn selected_recipe(&self) -> Result<RecipeRecord, RecipeError> {
        let id = self.selected_id().await?;
        self.store.get_recipe(id).await
    }

    /// Creates a recipe and captures the current controller values into it.
    pub async fn add_recipe(
        &self,
        product: &str,
        variant: &str,
        description: &str,
    ) -> Result<RecipeId, RecipeError> {
        let result = async {
            let id = self.store.add_recipe(product, variant, description).await?;
            self.store.store_values(id).await?;
            let recipe = self.store.get_recipe(id).await?;
            self.fill_list().await?;
            Ok::<_, RecipeError>((id, recipe))
        }
        .await;

        match result {
            Ok((id, recipe)) => {
                self.report_done(&recipe).await?;
                Ok(id)
            }
            Err(e) => self.report_failed(e).await,
        }
    }

    pub async fn edit_selected(
        &self,
        product: &str,
        variant: &str,
        description: &str,
    ) -> Result<(), RecipeError> {
        let id = self.selected_id().await?;
        self.store
            .update_recipe(id, product, variant, description)
            .await?;
        self.fill_list().await?;
        Ok(())
    }

    pub async fn delete_selected(&self) -> Result<(), RecipeError> {
        let recipe = self.selected_recipe().await?;
        self.store.remove_recipe(recipe.recipe_id).await?;
        self.fill_list().await?;
        info!("Recipe {} deleted", recipe.display_name());
        Ok(())
    }

    /// Captures the controller values into the selected recipe. A recipe that
    /// [`RecipeRecord::was_saved`] gets overwritten.
    pub async fn save_selected(&self) -> Result<(), RecipeError> {
        let result = async {
            let recipe = self.selected_recipe().await?;
            self.store.store_values(recipe.recipe_id).await?;
            self.fill_list().await?;
            Ok::<_, RecipeError>(recipe)
        }
        .await;

        match result {
            Ok(recipe) => self.report_done(&recipe).await,
            Err(e) => self.report_failed(e).await,
        }
    }

    /// Sends the selected recipe to the controller. The memory dump request
    /// is consumed either way.
    pub async fn load_selected(&self) -> Result<(), RecipeError> {
        let result = async {
            let recipe = self.selected_recipe().await?;
            let memory_dump = self.bridge.read_tag(MEMORY_DUMP_TAG).await?.is_truthy();
            self.store
                .load_values(recipe.recipe_id, LoadMode::from_memory_dump(memory_dump))
                .await?;
            Ok::<_, RecipeError>(recipe)
        }
        .await;

        let reported = match result {
            Ok(recipe) => self.report_done(&recipe).await,
            Err(e) => self.report_failed(e).await,
        };
        self.bridge
            .write_tag(MEMORY_DUMP_TAG, TagValue::Bool(false))
            .await?;
        reported
    }

    pub async fn info_selected(&self, simple: bool) -> Result<RecipeInfo, RecipeError> {
        let recipe = self.selected_recipe().await?;
        let pages = self
            .store
            .value_information(recipe.recipe_id, simple)
            .await?;
        Ok(RecipeInfo { recipe, pages })
    }

    async fn selected_id(&self) -> Result<RecipeId, RecipeError> {
        let value = self.bridge.read_tag(SELECTED_ID_TAG).await?;
        Ok(value
            .as_i64()
            .and_then(|id| RecipeId::try_from(id).ok())
            .unwrap_or(0))
    }

    async fn page_state(&self) -> Result<(i64, i64), RecipeError> {
        let state = self
            .bridge
            .read_tags(&[PAGE_ACT_TAG.to_owned(), PAGE_MAX_TAG.to_owned()])
            .await?;
        let act = state.get(0).and_then(TagValue::as_i64).unwrap_or(1);
        let max = state.get(1).and_then(TagValue::as_i64).unwrap_or(1).max(1);
        Ok((act, max))
    }

    async fn go_to_page(&self, page: i64) -> Result<RecipePage, RecipeError> {
        self.bridge
            .write_tags(vec![
                (PAGE_ACT_TAG.to_owned(), TagValue::Int(page)),
                (SELECTED_ID_TAG.to_owned(), TagValue::Int(0)),
            ])
            .await?;
        self.fill_list().await
    }

    async fn report_done(&self, recipe: &RecipeRecord) -> Result<(), RecipeError> {
        info!("Controller exchange for {} done", recipe.display_name());
        self.bridge
            .write_tags(vec![
                (CURRENT_RECIPE_TAG.to_owned(), TagValue::from(recipe.display_name())),
                (EXCHANGE_TAG.to_owned(), TagValue::from(EXCHANGE_DONE)),
            ])
            .await?;
        Ok(())
    }

    async fn report_failed<T>(&self, e: RecipeError) -> Result<T, RecipeError> {
        error!("Controller exchange failed: {}", e);
        self.bridge
            .write_tag(EXCHANGE_TAG, TagValue::from(EXCHANGE_FAILED))
            .await?;
        Err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::controller::{LOAD_COMMAND_TAG, SAVE_COMMAND_TAG};
    use crate::client::memory::{MemoryFileSystem, MemoryTagBridge};
    use crate::config::Config;
    use crate::schema::layout::size_tags;

    async fn workflow() -> (Arc<MemoryTagBridge>, RecipeWorkflow) {
        let bridge = Arc::new(MemoryTagBridge::new());
        for tag in size_tags() {
            bridge.set(&tag, -1i64).await;
        }
        bridge.set("DB_Recipe_Parameters.MeterWeigthControl.RID", "MW").await;
        bridge.set("DB_Recipe_Parameters.MeterWeigthControl.Recipe", "").await;
        bridge.set("DB_Recipe_Parameters.EM27Extruder.RID", "").await;
        bridge.set("DB_Recipe_Parameters.General.RID", "").await;
        bridge.acknowledge_after(SAVE_COMMAND_TAG, 1).await;

        bridge.set(SELECTED_ID_TAG, 0i64).await;
        bridge.set(PAGE_ACT_TAG, 1i64).await;
        bridge.set(PAGE_MAX_TAG, 1i64).await;
        bridge.set(SORT_MODE_TAG, 0i64).await;
        bridge.set(FILTER_PRODUCT_TAG, "").await;
        bridge.set(FILTER_VARIANT_TAG, "").await;
        bridge.set(MEMORY_DUMP_TAG, false).await;

        let fs = Arc::new(MemoryFileSystem::new());
        let store = Arc::new(RecipeStore::new(Config::default(), fs, bridge.clone()));
        (bridge, RecipeWorkflow::new(store))
    }

    async fn add_recipes(workflow: &RecipeWorkflow, count: usize) {
        for i in 0..count {
            workflow
                .store()
                .add_recipe(&format!("P{:02}", i), "V", "")
                .await
                .unwrap();
        }
    }

    async fn tag(bridge: &MemoryTagBridge, name: &str) -> TagValue {
        bridge.get(name).await.unwrap()
    }

    #[tokio::test]
    async fn list_paging_test() {
        let (bridge, workflow) = workflow().await;
        add_recipes(&workflow, 12).await;
        bridge.set(PAGE_ACT_TAG, 2i64).await;

        workflow.screen_loaded().await.unwrap();
        assert_eq!(tag(&bridge, PAGE_ACT_TAG).await, TagValue::Int(1));
        assert_eq!(tag(&bridge, PAGE_MAX_TAG).await, TagValue::Int(2));
        assert_eq!(tag(&bridge, "Recipe_List_RecipeId[9]").await, TagValue::Int(10));
        assert_eq!(tag(&bridge, "Recipe_List_LastSaved[0]").await, TagValue::from("---"));

        let page = workflow.next_page().await.unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(tag(&bridge, "Recipe_List_RecipeId[0]").await, TagValue::Int(11));
        assert_eq!(tag(&bridge, "Recipe_List_RecipeId[2]").await, TagValue::Int(0));
        assert_eq!(tag(&bridge, "Recipe_List_ProductName[2]").await, TagValue::from(""));

        assert_eq!(workflow.next_page().await.unwrap().page, 1);
        assert_eq!(workflow.prev_page().await.unwrap().page, 2);
        assert_eq!(workflow.prev_page().await.unwrap().page, 1);
    }

    #[tokio::test]
    async fn out_of_range_page_tag_test() {
        let (bridge, workflow) = workflow().await;
        add_recipes(&workflow, 12).await;
        bridge.set(PAGE_ACT_TAG, i64::MAX).await;

        let page = workflow.fill_list().await.unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.recipes.len(), 2);
        assert_eq!(tag(&bridge, "Recipe_List_RecipeId[0]").await, TagValue::Int(11));
    }

    #[tokio::test]
    async fn sort_and_filter_test() {
        let (bridge, workflow) = workflow().await;
        add_recipes(&workflow, 12).await;
        bridge.set(PAGE_ACT_TAG, 2i64).await;
        bridge.set(SELECTED_ID_TAG, 4i64).await;

        workflow.toggle_sort(SortKey::Id).await.unwrap();
        assert_eq!(tag(&bridge, SORT_MODE_TAG).await, TagValue::Int(1));
        assert_eq!(tag(&bridge, PAGE_ACT_TAG).await, TagValue::Int(1));
        assert_eq!(tag(&bridge, SELECTED_ID_TAG).await, TagValue::Int(0));
        assert_eq!(tag(&bridge, "Recipe_List_RecipeId[0]").await, TagValue::Int(12));

        workflow.toggle_sort(SortKey::Product).await.unwrap();
        assert_eq!(tag(&bridge, SORT_MODE_TAG).await, TagValue::Int(2));

        let page = workflow.apply_filter("p1", "").await.unwrap();
        assert_eq!(page.recipes.len(), 2);
        assert_eq!(tag(&bridge, PAGE_MAX_TAG).await, TagValue::Int(1));
        assert_eq!(tag(&bridge, "Recipe_List_ProductName[1]").await, TagValue::from("P11"));
        assert_eq!(tag(&bridge, "Recipe_List_RecipeId[2]").await, TagValue::Int(0));
    }

    #[tokio::test(start_paused = true)]
    async fn add_recipe_test() {
        let (bridge, workflow) = workflow().await;
        let id = workflow.add_recipe("Pipe", "40mm", "").await.unwrap();

        assert_eq!(id, 1);
        assert_eq!(tag(&bridge, CURRENT_RECIPE_TAG).await, TagValue::from("1 / Pipe / 40mm"));
        assert_eq!(tag(&bridge, EXCHANGE_TAG).await, TagValue::Int(2));
        assert!(workflow.store().get_recipe(1).await.unwrap().was_saved());
        assert_eq!(workflow.store().values_of(1).await.unwrap().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn save_timeout_test() {
        let (bridge, workflow) = workflow().await;
        add_recipes(&workflow, 1).await;
        bridge.acknowledge_after(SAVE_COMMAND_TAG, 20).await;
        bridge.set(SELECTED_ID_TAG, 1i64).await;

        let err = workflow.save_selected().await.unwrap_err();
        assert!(matches!(err, RecipeError::TransferTimeout { .. }));
        assert_eq!(tag(&bridge, EXCHANGE_TAG).await, TagValue::Int(1));
        assert!(bridge.get(CURRENT_RECIPE_TAG).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn load_selected_test() {
        let (bridge, workflow) = workflow().await;
        add_recipes(&workflow, 1).await;
        bridge.set(SELECTED_ID_TAG, 1i64).await;

        assert!(workflow.load_selected().await.unwrap_err().is_not_found());
        assert_eq!(tag(&bridge, EXCHANGE_TAG).await, TagValue::Int(1));

        workflow.save_selected().await.unwrap();
        bridge.set(MEMORY_DUMP_TAG, true).await;
        workflow.load_selected().await.unwrap();

        assert_eq!(tag(&bridge, LOAD_COMMAND_TAG).await, TagValue::Int(2));
        assert_eq!(tag(&bridge, MEMORY_DUMP_TAG).await, TagValue::Bool(false));
        assert_eq!(tag(&bridge, EXCHANGE_TAG).await, TagValue::Int(2));
        assert_eq!(tag(&bridge, CURRENT_RECIPE_TAG).await, TagValue::from("1 / P00 / V"));
    }

    #[tokio::test]
    async fn edit_delete_info_test() {
        let (bridge, workflow) = workflow().await;
        add_recipes(&workflow, 2).await;
        bridge.set(SELECTED_ID_TAG, 2i64).await;

        workflow.edit_selected("Tube", "50mm", "thin").await.unwrap();
        assert_eq!(tag(&bridge, "Recipe_List_ProductName[1]").await, TagValue::from("Tube"));

        let info = workflow.info_selected(false).await.unwrap();
        assert_eq!(info.recipe.description, "thin");
        assert_eq!(info.pages, vec![String::new()]);

        workflow.delete_selected().await.unwrap();
        assert_eq!(tag(&bridge, "Recipe_List_RecipeId[1]").await, TagValue::Int(0));
        assert!(workflow.delete_selected().await.unwrap_err().is_not_found());
    }
}
