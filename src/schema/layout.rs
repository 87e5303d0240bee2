//! Where the controller keeps its recipe records.
//!
//! Every record lives under `DB_Recipe_Parameters`, either as an element of a
//! parameter array bounded by a size tag or as a single structure. Each
//! instance exposes a `RID` text tag (empty when unused) and a `Recipe` text
//! tag carrying the transport string.

use super::RecordType;

pub const PARAMETER_DB: &str = "DB_Recipe_Parameters";
/// Highest upper bound a size tag may report. -1 or below means empty.
pub const MAX_ARRAY_BOUND: i64 = 255;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterArray {
    pub path: &'static str,
    pub record_type: RecordType,
}

impl ParameterArray {
    const fn new(path: &'static str, record_type: RecordType) -> Self {
        ParameterArray { path, record_type }
    }

    fn instance(&self, index: Option<u32>) -> String {
        match index {
            Some(i) => format!("{}.{}[{}]", PARAMETER_DB, self.path, i),
            None => format!("{}.{}", PARAMETER_DB, self.path),
        }
    }

    pub fn rid_tag(&self, index: Option<u32>) -> String {
        format!("{}.RID", self.instance(index))
    }

    pub fn recipe_tag(&self, index: Option<u32>) -> String {
        format!("{}.Recipe", self.instance(index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutGroup {
    /// Arrays indexed `0..=size`, visited index by index across all members.
    Indexed {
        size: &'static str,
        members: &'static [ParameterArray],
    },
    Single(ParameterArray),
}

pub fn size_tag(size: &str) -> String {
    format!("{}.Size.{}", PARAMETER_DB, size)
}

/// Discovery order is binding order.
pub static CONTROLLER_LAYOUT: &[LayoutGroup] = &[
    LayoutGroup::Indexed {
        size: "TempZone",
        members: &[ParameterArray::new("Zones", RecordType::TempZone)],
    },
    LayoutGroup::Indexed {
        size: "TempGroup",
        members: &[ParameterArray::new("TempGroups", RecordType::TempGroup)],
    },
    LayoutGroup::Indexed {
        size: "Act",
        members: &[ParameterArray::new("Act", RecordType::Act)],
    },
    LayoutGroup::Indexed {
        size: "Set",
        members: &[ParameterArray::new("Set", RecordType::Set)],
    },
    LayoutGroup::Indexed {
        size: "State",
        members: &[ParameterArray::new("State", RecordType::State)],
    },
    LayoutGroup::Indexed {
        size: "SawControl",
        members: &[ParameterArray::new("SawControl", RecordType::SawControl)],
    },
    LayoutGroup::Indexed {
        size: "MeltpumpControl",
        members: &[ParameterArray::new(
            "MeltPumpControl",
            RecordType::MeltPumpControl,
        )],
    },
    LayoutGroup::Single(ParameterArray::new(
        "MeterWeigthControl",
        RecordType::Meterweight,
    )),
    LayoutGroup::Indexed {
        size: "EM27",
        members: &[
            ParameterArray::new("EM27Puller", RecordType::EM27Puller),
            ParameterArray::new("EM27PullerCom", RecordType::CanSlave),
            ParameterArray::new("EM27Saw", RecordType::EM27Saw),
            ParameterArray::new("EM27SawCom", RecordType::CanSlave),
            ParameterArray::new("EM27Corrugator", RecordType::EM27Corrugator),
            ParameterArray::new("EM27CorrugatorCom", RecordType::CanSlave),
        ],
    },
    LayoutGroup::Single(ParameterArray::new("EM27Extruder", RecordType::CanMaster)),
    LayoutGroup::Indexed {
        size: "IGS",
        members: &[ParameterArray::new("IGS", RecordType::IGS)],
    },
    LayoutGroup::Single(ParameterArray::new("General", RecordType::General)),
];

/// Size tags in layout order.
pub fn size_tags() -> Vec<String> {
    CONTROLLER_LAYOUT
        .iter()
        .filter_map(|group| match group {
            LayoutGroup::Indexed { size, .. } => Some(size_tag(size)),
            LayoutGroup::Single(_) => None,
        })
        .collect()
}
