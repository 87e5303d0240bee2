use num_derive::FromPrimitive;

/// Value written to the load command tag to start ingestion on the controller.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, FromPrimitive)]
pub enum LoadMode {
    Normal = 1,
    MemoryDump = 2,
}

impl LoadMode {
    pub fn from_memory_dump(memory_dump: bool) -> Self {
        if memory_dump {
            LoadMode::MemoryDump
        } else {
            LoadMode::Normal
        }
    }

    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}
