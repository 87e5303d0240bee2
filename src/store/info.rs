//! Text for the recipe info panel.

use log::debug;

use crate::client::plc_types::parse_int_prefix;
use crate::proto::record_codec::TagBinding;
use crate::schema::RecordType;
use crate::store::model::RecipeValueOverride;

/// Most lines the panel shows on one page.
pub const INFO_PAGE_LINES: usize = 35;

/// Localized text lists the panel headings are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextList {
    Groups,
    Zones,
    Indications,
    States,
    Id,
}

pub trait TextLookup: Send + Sync {
    fn text(&self, list: TextList, index: i64) -> Option<String>;
}

/// Lookup without resources, every entry is its own index.
pub struct NumericLabels;

impl TextLookup for NumericLabels {
    fn text(&self, _list: TextList, index: i64) -> Option<String> {
        Some(index.to_string())
    }
}

fn field_value(rows: &[&RecipeValueOverride], name: &str) -> Option<i64> {
    rows.iter()
        .find(|r| r.field_name == name)
        .and_then(|r| parse_int_prefix(&r.value))
}

/// "{group} - {name} {id}" for records addressed by group, name and sub number.
fn indexed_heading(rows: &[&RecipeValueOverride], names: TextList, lookup: &dyn TextLookup) -> Option<String> {
    let group = lookup.text(TextList::Groups, field_value(rows, "Group")?)?;
    let name = lookup.text(names, field_value(rows, "Name")?)?;
    let id = lookup.text(TextList::Id, field_value(rows, "SubNum")?)?;
    Some(format!("{} - {} {}", group, name, id))
}

pub fn heading(record_type: Option<RecordType>, rows: &[&RecipeValueOverride], lookup: &dyn TextLookup) -> String {
    let text = match record_type {
        Some(RecordType::TempZone) => indexed_heading(rows, TextList::Zones, lookup),
        Some(RecordType::Act) | Some(RecordType::Set) => {
            indexed_heading(rows, TextList::Indications, lookup)
        }
        Some(RecordType::State) => indexed_heading(rows, TextList::States, lookup),
        Some(RecordType::MeltPumpControl) => lookup.text(TextList::Groups, 110),
        Some(RecordType::Meterweight) => lookup.text(TextList::Indications, 27),
        Some(RecordType::SawControl) => lookup.text(TextList::Groups, 60),
        _ => None,
    };
    text.unwrap_or_default()
}

fn is_simple(record_type: Option<RecordType>, field_name: &str) -> bool {
    record_type
        .map(|t| t.schema().iter().any(|v| v.simple && v.name == field_name))
        .unwrap_or(false)
}

fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Info panel pages for the stored values of one recipe.
///
/// Values are grouped per record in storage order. The simple variant only
/// lists positive values of simple-display fields, one heading line per
/// record. There is always at least one page.
pub fn value_information(
    values: &[RecipeValueOverride],
    bindings: &[TagBinding],
    simple: bool,
    lookup: &dyn TextLookup,
) -> Vec<String> {
    let mut record_ids: Vec<&str> = Vec::new();
    for row in values {
        if !record_ids.contains(&row.record_id.as_str()) {
            record_ids.push(&row.record_id);
        }
    }

    let mut pages = Vec::new();
    let mut page = String::new();
    for record_id in record_ids {
        let rows: Vec<&RecipeValueOverride> =
            values.iter().filter(|r| r.record_id == record_id).collect();
        let record_type = bindings
            .iter()
            .find(|b| b.record_id == record_id)
            .map(|b| b.record_type)
            .or_else(|| RecordType::identify(rows.iter().map(|r| r.field_name.as_str())));

        let mut full = format!("{}\n", record_id);
        let mut condensed = String::new();
        for row in rows.iter() {
            full.push_str(&format!("{}: {}\n", row.field_name, row.value));
            let positive = parse_int_prefix(&row.value).map_or(false, |v| v > 0);
            if is_simple(record_type, &row.field_name) && positive {
                condensed.push_str(&format!("{}\n", row.value));
            }
        }
        if simple && condensed.is_empty() {
            continue;
        }

        let title = heading(record_type, &rows, lookup);
        debug!("Info for record {} ({:?}): {}", record_id, record_type, title);
        let text = if simple {
            format!("{}: {}", title, condensed)
        } else {
            format!("{}\n{}", title, full)
        };

        if page.is_empty() || line_count(&page) + line_count(&text) <= INFO_PAGE_LINES {
            if !page.is_empty() && !simple {
                page.push_str("\n\n");
            }
            page.push_str(&text);
        } else {
            pages.push(std::mem::replace(&mut page, text));
        }
    }
    pages.push(page);
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Labels;

    impl TextLookup for Labels {
        fn text(&self, list: TextList, index: i64) -> Option<String> {
            match (list, index) {
                (TextList::Groups, 1) => Some("Extruder".to_owned()),
                (TextList::Zones, 4) => Some("Barrel".to_owned()),
                (TextList::Id, 2) => Some("B".to_owned()),
                (TextList::Groups, 110) => Some("Melt pump".to_owned()),
                _ => None,
            }
        }
    }

    fn zone_rows(recipe_id: u32, record_id: &str, sp1: &str) -> Vec<RecipeValueOverride> {
        vec![
            RecipeValueOverride::new(recipe_id, record_id, "Group", "1"),
            RecipeValueOverride::new(recipe_id, record_id, "Name", "4"),
            RecipeValueOverride::new(recipe_id, record_id, "SubNum", "2"),
            RecipeValueOverride::new(recipe_id, record_id, "RecipeSP1", sp1),
            RecipeValueOverride::new(recipe_id, record_id, "RecipeSP2", "0"),
        ]
    }

    fn zone_binding(record_id: &str) -> TagBinding {
        TagBinding::new("Zones[0].Recipe", record_id, RecordType::TempZone)
    }

    #[test]
    fn full_information_test() {
        let values = zone_rows(1, "Z1", "230.5");
        let pages = value_information(&values, &[zone_binding("Z1")], false, &Labels);
        assert_eq!(
            pages,
            vec!["Extruder - Barrel B\nZ1\nGroup: 1\nName: 4\nSubNum: 2\nRecipeSP1: 230.5\nRecipeSP2: 0\n"]
        );
    }

    #[test]
    fn simple_information_test() {
        let mut values = zone_rows(1, "Z1", "230.5");
        values.extend(zone_rows(1, "Z2", "0"));
        let bindings = vec![zone_binding("Z1"), zone_binding("Z2")];

        let pages = value_information(&values, &bindings, true, &Labels);
        assert_eq!(pages, vec!["Extruder - Barrel B: 230.5\n"]);
    }

    #[test]
    fn heading_without_binding_test() {
        let values = vec![
            RecipeValueOverride::new(1, "M1", "Enabled", "true"),
            RecipeValueOverride::new(1, "M1", "XP", "1"),
            RecipeValueOverride::new(1, "M1", "TN", "1"),
            RecipeValueOverride::new(1, "M1", "TAB", "1"),
            RecipeValueOverride::new(1, "M1", "MinRpmPump", "1"),
            RecipeValueOverride::new(1, "M1", "TimeShutdown", "1"),
            RecipeValueOverride::new(1, "M1", "TimeProduction", "1"),
            RecipeValueOverride::new(1, "M1", "TimeStartup", "1"),
            RecipeValueOverride::new(1, "M1", "MaxPressureDiff", "1"),
            RecipeValueOverride::new(1, "M1", "MinPressureDiff", "1"),
            RecipeValueOverride::new(1, "M1", "MinMPIn", "1"),
        ];
        let pages = value_information(&values, &[], false, &Labels);
        assert!(pages[0].starts_with("Melt pump\nM1\nEnabled: true\n"));

        let unknown = vec![RecipeValueOverride::new(1, "X", "Foo", "1")];
        let pages = value_information(&unknown, &[], false, &NumericLabels);
        assert_eq!(pages, vec!["\nX\nFoo: 1\n"]);
    }

    #[test]
    fn paging_test() {
        let mut values = Vec::new();
        let mut bindings = Vec::new();
        for i in 0..6 {
            values.extend(zone_rows(1, &format!("Z{}", i), "1"));
            bindings.push(zone_binding(&format!("Z{}", i)));
        }
        // 8 lines per record, 4 of them plus separators fit on a page
        let pages = value_information(&values, &bindings, false, &NumericLabels);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].starts_with("1 - 4 2\nZ0\n"));
        assert!(pages[0].contains("\n\n\n1 - 4 2\nZ1\n"));
        assert!(pages[1].starts_with("1 - 4 2\nZ4\n"));
        assert!(pages.iter().all(|p| line_count(p) <= INFO_PAGE_LINES));
    }

    #[test]
    fn empty_information_test() {
        assert_eq!(value_information(&[], &[], true, &NumericLabels), vec![String::new()]);
    }
}
