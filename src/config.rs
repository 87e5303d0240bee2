use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Where the recipe tables live. Serializable to YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub recipe_path: PathBuf,
    pub recipe_file: String,
    pub value_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recipe_path: PathBuf::from("Recipes"),
            recipe_file: String::from("RecipeTable.csv"),
            value_file: String::from("ValueTable.csv"),
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration as YAML, used to create a template
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }

    pub fn recipe_file_path(&self) -> PathBuf {
        self.recipe_path.join(&self.recipe_file)
    }

    pub fn value_file_path(&self) -> PathBuf {
        self.recipe_path.join(&self.value_file)
    }
}
