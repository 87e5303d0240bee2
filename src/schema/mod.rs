//! Static registry of controller record types and their field layouts.

pub mod layout;
pub mod tables;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::client::plc_types::PlcVariable;
use crate::error::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    TempZone,
    TempGroup,
    Act,
    Set,
    State,
    SawControl,
    MeltPumpControl,
    Meterweight,
    CanMaster,
    CanSlave,
    EM27Puller,
    EM27Saw,
    EM27Corrugator,
    IGS,
    General,
}

impl RecordType {
    pub const ALL: [RecordType; 15] = [
        RecordType::TempZone,
        RecordType::TempGroup,
        RecordType::Act,
        RecordType::Set,
        RecordType::State,
        RecordType::SawControl,
        RecordType::MeltPumpControl,
        RecordType::Meterweight,
        RecordType::CanMaster,
        RecordType::CanSlave,
        RecordType::EM27Puller,
        RecordType::EM27Saw,
        RecordType::EM27Corrugator,
        RecordType::IGS,
        RecordType::General,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            RecordType::TempZone => "TempZone",
            RecordType::TempGroup => "TempGroup",
            RecordType::Act => "Act",
            RecordType::Set => "Set",
            RecordType::State => "State",
            RecordType::SawControl => "SawControl",
            RecordType::MeltPumpControl => "MeltPumpControl",
            RecordType::Meterweight => "Meterweight",
            RecordType::CanMaster => "CanMaster",
            RecordType::CanSlave => "CanSlave",
            RecordType::EM27Puller => "EM27Puller",
            RecordType::EM27Saw => "EM27Saw",
            RecordType::EM27Corrugator => "EM27Corrugator",
            RecordType::IGS => "IGS",
            RecordType::General => "General",
        }
    }

    pub fn schema(&self) -> &'static [PlcVariable] {
        match self {
            RecordType::TempZone => tables::TEMP_ZONE,
            RecordType::TempGroup => tables::TEMP_GROUP,
            RecordType::Act => tables::ACT,
            RecordType::Set => tables::SET,
            RecordType::State => tables::STATE,
            RecordType::SawControl => tables::SAW_CONTROL,
            RecordType::MeltPumpControl => tables::MELT_PUMP_CONTROL,
            RecordType::Meterweight => tables::METERWEIGHT,
            RecordType::CanMaster => tables::CAN_MASTER,
            RecordType::CanSlave => tables::CAN_SLAVE,
            RecordType::EM27Puller => tables::EM27_PULLER,
            RecordType::EM27Saw => tables::EM27_SAW,
            RecordType::EM27Corrugator => tables::EM27_CORRUGATOR,
            RecordType::IGS => tables::IGS,
            RecordType::General => tables::GENERAL,
        }
    }

    /// Record type whose field names are exactly `names`, if any.
    ///
    /// Used for stored override rows whose record is not bound in the
    /// current session.
    pub fn identify<'a, I>(names: I) -> Option<RecordType>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: HashSet<&str> = names.into_iter().collect();
        if names.is_empty() {
            return None;
        }
        RecordType::ALL.iter().copied().find(|record_type| {
            let schema = record_type.schema();
            schema.len() == names.len() && schema.iter().all(|v| names.contains(v.name))
        })
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RecordType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .iter()
            .copied()
            .find(|t| t.id() == s)
            .ok_or_else(|| SchemaError::UnknownSchema(s.to_owned()))
    }
}

/// Ordered field list of the record type named `record_type_id`.
pub fn schema_for(record_type_id: &str) -> Result<&'static [PlcVariable], SchemaError> {
    record_type_id.parse::<RecordType>().map(|t| t.schema())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::plc_types::PlcTypes;

    #[test]
    fn schema_for_test() {
        let schema = schema_for("TempZone").unwrap();
        assert_eq!(schema.len(), 34);
        assert_eq!(schema[0].name, "Group");
        assert_eq!(schema[2].plc_type, PlcTypes::UInt);
        assert_eq!(schema[33].name, "GentleStartup");

        assert_eq!(schema_for("Set").unwrap().len(), 31);
        assert_eq!(schema_for("EM27Puller").unwrap().len(), 24);
        assert_eq!(schema_for("CanMaster").unwrap().len(), 3);
    }

    #[test]
    fn schema_for_unknown_test() {
        assert_eq!(
            schema_for("Extruder").unwrap_err(),
            SchemaError::UnknownSchema("Extruder".to_owned())
        );
        assert!(schema_for("tempzone").is_err());
    }

    #[test]
    fn record_type_id_round_trip_test() {
        for t in RecordType::ALL.iter() {
            assert_eq!(t.id().parse::<RecordType>().unwrap(), *t);
            assert!(!t.schema().is_empty());
        }
    }

    #[test]
    fn simple_fields_test() {
        let simple: Vec<&str> = RecordType::ALL
            .iter()
            .flat_map(|t| t.schema().iter())
            .filter(|v| v.simple)
            .map(|v| v.name)
            .collect();
        assert_eq!(simple, vec!["RecipeSP1", "RecipeSP2", "RecipeValue"]);
    }

    #[test]
    fn field_names_unique_test() {
        for t in RecordType::ALL.iter() {
            let names: HashSet<&str> = t.schema().iter().map(|v| v.name).collect();
            assert_eq!(names.len(), t.schema().len(), "{}", t);
        }
    }

    #[test]
    fn identify_test() {
        let names = RecordType::State.schema().iter().map(|v| v.name);
        assert_eq!(RecordType::identify(names), Some(RecordType::State));

        let names = RecordType::CanSlave.schema().iter().rev().map(|v| v.name);
        assert_eq!(RecordType::identify(names), Some(RecordType::CanSlave));

        assert_eq!(RecordType::identify(vec!["Group", "Name"]), None);
        assert_eq!(RecordType::identify(Vec::<&str>::new()), None);
    }
}
