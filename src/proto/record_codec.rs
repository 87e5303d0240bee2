//! Binary layout of one controller record.
//!
//! Fields are written in schema order. Multi-byte fields start on an even
//! offset, consecutive booleans share one byte (up to eight per byte, bit `n`
//! for the n-th boolean of the run) and the whole record is padded to an even
//! length before it is wrapped in base64.

use bitfield::Bit;
use log::{error, warn};

use crate::client::plc_types::PlcValueSlot;
use crate::error::RecordCodecError;
use crate::proto::base64;
use crate::schema::RecordType;

const BITS_PER_BYTE: usize = 8;

/// One discovered controller record and the tag carrying its transport string.
#[derive(Debug, Clone, PartialEq)]
pub struct TagBinding {
    pub tag_name: String,
    pub record_id: String,
    pub record_type: RecordType,
    pub slots: Vec<PlcValueSlot>,
    pub transport: String,
}

impl TagBinding {
    pub fn new(tag_name: &str, record_id: &str, record_type: RecordType) -> Self {
        TagBinding {
            tag_name: tag_name.to_owned(),
            record_id: record_id.to_owned(),
            record_type,
            slots: record_type
                .schema()
                .iter()
                .map(|variable| PlcValueSlot::new(*variable))
                .collect(),
            transport: String::new(),
        }
    }

    pub fn slot(&self, name: &str) -> Option<&PlcValueSlot> {
        self.slots.iter().find(|s| s.name() == name)
    }

    pub fn slot_mut(&mut self, name: &str) -> Option<&mut PlcValueSlot> {
        self.slots.iter_mut().find(|s| s.name() == name)
    }

    /// Packs all slot values into the transport string.
    pub fn encode(&mut self) {
        let bytes = pack_slots(&mut self.slots);
        self.transport = base64::encode(&bytes);
    }

    /// Unpacks the transport string into the slots. Errors are logged, the
    /// binding keeps every slot decoded before the failure.
    pub fn decode(&mut self) {
        if let Err(e) = self.try_decode() {
            error!(
                "Failed to decode record {} from {}: {}",
                self.record_id, self.tag_name, e
            );
        }
    }

    pub fn try_decode(&mut self) -> Result<(), RecordCodecError> {
        let bytes = base64::decode(&self.transport)?;
        unpack_slots(&mut self.slots, &bytes)
    }
}

pub fn pack_slots(slots: &mut [PlcValueSlot]) -> Vec<u8> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut run = 0;

    for slot in slots.iter_mut() {
        slot.value_to_bytes();
        let plc_type = slot.plc_type();

        if buffer.len() % 2 == 1 && plc_type.size() > 1 {
            buffer.push(0);
        } else if plc_type.is_bool() && run >= BITS_PER_BYTE {
            run = 0;
        }

        if plc_type.is_bool() {
            if run == 0 {
                buffer.push(slot.bytes.first().copied().unwrap_or(0));
            } else if let Some(last) = buffer.last_mut() {
                if slot.value.is_true() {
                    last.set_bit(run, true);
                }
            }
            run += 1;
        } else {
            run = 0;
            buffer.extend_from_slice(&slot.bytes);
        }
    }

    if buffer.len() % 2 == 1 {
        buffer.push(0);
    }
    buffer
}

/// Inverse of [`pack_slots`]. Bools past the end read as false, any other
/// field that does not fit stops the decode.
pub fn unpack_slots(slots: &mut [PlcValueSlot], bytes: &[u8]) -> Result<(), RecordCodecError> {
    let mut cursor = 0;
    let mut run = 0;

    for slot in slots.iter_mut() {
        let plc_type = slot.plc_type();
        let size = plc_type.size();

        if cursor % 2 == 1 && size > 1 {
            cursor += 1;
        } else if plc_type.is_bool() {
            if run >= BITS_PER_BYTE {
                run = 0;
            } else if run > 0 {
                cursor -= 1;
            }
        }

        if plc_type.is_bool() {
            let byte = bytes.get(cursor).copied().unwrap_or(0);
            slot.bytes = vec![byte.bit(run) as u8];
            run += 1;
        } else {
            let field = bytes
                .get(cursor..cursor + size)
                .ok_or(RecordCodecError::OutOfRange {
                    field: slot.name(),
                    offset: cursor,
                    size,
                    length: bytes.len(),
                })?;
            slot.bytes = field.to_vec();
            run = 0;
        }
        cursor += size;

        if let Err(e) = slot.bytes_to_value() {
            warn!("Field {} left unchanged: {}", slot.name(), e);
        }
    }
    Ok(())
}
