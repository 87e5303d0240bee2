use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;

use hmi_recipe::client::bridge::LocalFileSystem;
use hmi_recipe::client::controller::SAVE_COMMAND_TAG;
use hmi_recipe::client::memory::MemoryTagBridge;
use hmi_recipe::config::Config;
use hmi_recipe::proto::load_mode::LoadMode;
use hmi_recipe::proto::record_codec::TagBinding;
use hmi_recipe::schema::layout::size_tags;
use hmi_recipe::schema::RecordType;
use hmi_recipe::store::listing::SortMode;
use hmi_recipe::store::RecipeStore;

//Playground for the recipe engine against a simulated controller

#[derive(Debug, StructOpt)]
#[structopt(name = "recipe-playground")]
struct Opt {
    /// YAML configuration, defaults apply if omitted
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Write a template configuration to the --config path and exit
    #[structopt(long)]
    new: bool,

    #[structopt(short, long)]
    verbose: bool,
}

fn set_field(binding: &mut TagBinding, name: &str, text: &str) {
    if let Some(slot) = binding.slot_mut(name) {
        slot.value_from_text(text);
    }
}

/// Tag runtime with one meter weight record and one CAN master in use.
async fn simulated_controller() -> Arc<MemoryTagBridge> {
    let bridge = Arc::new(MemoryTagBridge::new());
    for tag in size_tags() {
        bridge.set(&tag, -1i64).await;
    }

    let mut meterweight = TagBinding::new(
        "DB_Recipe_Parameters.MeterWeigthControl.Recipe",
        "MW1",
        RecordType::Meterweight,
    );
    set_field(&mut meterweight, "SP", "42.5");
    set_field(&mut meterweight, "Limit", "3");
    meterweight.encode();
    bridge.set("DB_Recipe_Parameters.MeterWeigthControl.RID", "MW1").await;
    bridge.set(&meterweight.tag_name, meterweight.transport.clone()).await;

    let mut extruder = TagBinding::new(
        "DB_Recipe_Parameters.EM27Extruder.Recipe",
        "EX1",
        RecordType::CanMaster,
    );
    set_field(&mut extruder, "NodeId", "5");
    extruder.encode();
    bridge.set("DB_Recipe_Parameters.EM27Extruder.RID", "EX1").await;
    bridge.set(&extruder.tag_name, extruder.transport.clone()).await;

    bridge.set("DB_Recipe_Parameters.General.RID", "").await;
    bridge.acknowledge_after(SAVE_COMMAND_TAG, 2).await;
    bridge
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    let level = if opt.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let config = match &opt.config {
        Some(path) if opt.new => {
            info!("Making a template config at {}", path.display());
            Config::default().write_config_file(path)?;
            return Ok(());
        }
        Some(path) => Config::read_config_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None if opt.new => anyhow::bail!("--new needs a --config path"),
        None => Config::default(),
    };

    let bridge = simulated_controller().await;
    let store = RecipeStore::new(config, Arc::new(LocalFileSystem), bridge);
    info!("Recipe tables in {}", store.config().recipe_path.display());

    //Create a recipe and capture the controller into it
    let id = store.add_recipe("Pipe", "40mm", "playground").await?;
    store.store_values(id).await?;
    info!("Saved {}", store.get_recipe(id).await?.display_name());

    //List
    let page = store.list_page(1, SortMode::LastSavedDesc, "", "").await?;
    for recipe in page.recipes.iter() {
        info!("{} saved {}", recipe.display_name(), recipe.last_saved);
    }
    info!("Page {} of {}", page.page, page.page_count);

    //Send back as memory dump
    match store.load_values(id, LoadMode::MemoryDump).await {
        Ok(_) => info!("Recipe {} sent to controller", id),
        Err(e) => warn!("Recipe {} not sent: {}", id, e),
    }

    //Info panel
    for (i, text) in store.value_information(id, false).await?.iter().enumerate() {
        info!("Info page {}:\n{}", i + 1, text);
    }

    store.trace_recipes().await?;
    store.trace_values().await?;
    store.trace_bindings().await?;
    Ok(())
}
