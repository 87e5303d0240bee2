use std::path::PathBuf;
use thiserror::Error;

/// Malformed base64 transport input.
#[derive(Error, Debug, PartialEq)]
pub enum Base64Error {
    #[error("Supplied base64 length {}! Expected a multiple of 4", length)]
    InvalidLength { length: usize },
    #[error("Padding character at position {} of {}", position, length)]
    MisplacedPadding { position: usize, length: usize },
    #[error("Invalid base64 character {:?} at position {}", character, position)]
    InvalidCharacter { character: char, position: usize },
}

#[derive(Error, Debug, PartialEq)]
pub enum SchemaError {
    #[error("No record schema declared for record type {0:?}")]
    UnknownSchema(String),
}

/// Failure while unpacking one transport string into its binding.
#[derive(Error, Debug, PartialEq)]
pub enum RecordCodecError {
    #[error("Transport string is not valid base64: {0}")]
    Transport(#[from] Base64Error),
    #[error("Field {field} needs {size} byte(s) at offset {offset} but the record has {length}")]
    OutOfRange {
        field: &'static str,
        offset: usize,
        size: usize,
        length: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    #[error("Tag {0} does not exist")]
    UnknownTag(String),
    #[error("Tag {name} holds {found}, expected {expected}")]
    UnexpectedValue {
        name: String,
        expected: &'static str,
        found: String,
    },
}

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Recipe {recipe_id} does not exist")]
    RecipeNotFound { recipe_id: u32 },
    #[error("Recipe {recipe_id} has no stored values")]
    ValuesNotFound { recipe_id: u32 },
    #[error("No recipe id left after {last}")]
    IdsExhausted { last: u32 },
    #[error("Controller did not finish the capture after {polls} polls")]
    TransferTimeout { polls: u32 },
    #[error("Recipe file access failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Tag access failed: {0}")]
    Bridge(#[from] BridgeError),
}

impl RecipeError {
    /// Both "recipe missing" and "recipe without values" count as not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RecipeError::RecipeNotFound { .. } | RecipeError::ValuesNotFound { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}
