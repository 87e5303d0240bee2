use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::client::bridge::{TagBridge, TagValue};
use crate::error::{BridgeError, RecipeError};
use crate::proto::load_mode::LoadMode;
use crate::proto::record_codec::TagBinding;
use crate::schema::layout::{self, LayoutGroup, ParameterArray, CONTROLLER_LAYOUT};

/// Set to request a capture, cleared by the controller once the transport tags are filled
pub const SAVE_COMMAND_TAG: &str = "DB_Recipe_Control_Save";
/// Takes a [`LoadMode`] value, starts ingestion of the transport tags
pub const LOAD_COMMAND_TAG: &str = "DB_Recipe_Control_Load";
pub const UPLOAD_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const UPLOAD_POLLS: u32 = 10;

/// Record transfer to and from the controller over the tag bridge.
pub struct Controller {
    bridge: Arc<dyn TagBridge>,
}

impl Controller {
    pub fn new(bridge: Arc<dyn TagBridge>) -> Self {
        Controller { bridge }
    }

    pub fn bridge(&self) -> &Arc<dyn TagBridge> {
        &self.bridge
    }

    /// Builds one binding per configured record instance. Instances with an
    /// empty `RID` are not in use and get no binding.
    pub async fn discover_bindings(&self) -> Result<Vec<TagBinding>, BridgeError> {
        info!("Start tag table discovery");
        let size_tags = layout::size_tags();
        let size_values = self.bridge.read_tags(&size_tags).await?;
        let mut sizes = Vec::with_capacity(size_values.len());
        for (name, value) in size_tags.iter().zip(size_values.iter()) {
            let size = value
                .as_i64()
                .filter(|size| *size <= layout::MAX_ARRAY_BOUND)
                .ok_or_else(|| BridgeError::UnexpectedValue {
                    name: name.clone(),
                    expected: "an array size",
                    found: value.to_string(),
                })?;
            sizes.push(size);
        }
        let mut sizes = sizes.into_iter();

        let mut instances: Vec<(&ParameterArray, Option<u32>)> = Vec::new();
        for group in CONTROLLER_LAYOUT {
            match group {
                LayoutGroup::Indexed { members, .. } => {
                    let size = sizes.next().unwrap_or(-1);
                    for i in 0..=size {
                        for member in members.iter() {
                            instances.push((member, Some(i as u32)));
                        }
                    }
                }
                LayoutGroup::Single(member) => instances.push((member, None)),
            }
        }

        let rid_tags: Vec<String> = instances
            .iter()
            .map(|(member, index)| member.rid_tag(*index))
            .collect();
        let rids = self.bridge.read_tags(&rid_tags).await?;

        let bindings: Vec<TagBinding> = instances
            .iter()
            .zip(rids.iter())
            .filter_map(|((member, index), rid)| {
                let rid = rid.as_text();
                if rid.is_empty() {
                    return None;
                }
                Some(TagBinding::new(
                    &member.recipe_tag(*index),
                    &rid,
                    member.record_type,
                ))
            })
            .collect();
        info!("End tag table discovery, {} record(s) bound", bindings.len());
        Ok(bindings)
    }

    /// Asks the controller to capture its records and decodes them into
    /// `bindings`. Bindings stay untouched if the capture never completes.
    pub async fn upload(&self, bindings: &mut [TagBinding]) -> Result<(), RecipeError> {
        info!("Start upload from controller");
        self.bridge
            .write_tag(SAVE_COMMAND_TAG, TagValue::Bool(true))
            .await?;

        for poll in 1..=UPLOAD_POLLS {
            tokio::time::sleep(UPLOAD_POLL_INTERVAL).await;
            if self.bridge.read_tag(SAVE_COMMAND_TAG).await?.is_truthy() {
                debug!("Capture pending after poll {}", poll);
                continue;
            }

            let names: Vec<String> = bindings.iter().map(|b| b.tag_name.clone()).collect();
            let transports = self.bridge.read_tags(&names).await?;
            for (binding, transport) in bindings.iter_mut().zip(transports) {
                binding.transport = transport.as_text();
                binding.decode();
            }
            info!("End upload from controller");
            return Ok(());
        }

        warn!("Controller did not clear {}", SAVE_COMMAND_TAG);
        Err(RecipeError::TransferTimeout {
            polls: UPLOAD_POLLS,
        })
    }

    /// Writes every binding to its transport tag and triggers ingestion.
    /// Completion is not awaited.
    pub async fn download(
        &self,
        bindings: &mut [TagBinding],
        mode: LoadMode,
    ) -> Result<(), RecipeError> {
        info!("Start download to controller ({:?})", mode);
        let mut values = Vec::with_capacity(bindings.len());
        for binding in bindings.iter_mut() {
            binding.encode();
            values.push((binding.tag_name.clone(), TagValue::Text(binding.transport.clone())));
        }
        self.bridge.write_tags(values).await?;
        self.bridge
            .write_tag(LOAD_COMMAND_TAG, TagValue::from(mode.as_u16()))
            .await?;
        info!("End download to controller");
        Ok(())
    }
}
