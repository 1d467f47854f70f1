//! Two-column text tables for the listing commands.

use crate::models::{IndicatorInfo, SourceInfo};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, ContentArrangement, Table};

fn two_columns<'a>(
    header: (&str, &str),
    rows: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new(header.0), Cell::new(header.1)]);
    for (code, name) in rows {
        table.add_row(vec![Cell::new(code), Cell::new(name)]);
    }
    table
}

pub fn sources_table(sources: &[SourceInfo]) -> Table {
    two_columns(
        ("ID", "Name"),
        sources.iter().map(|s| (s.id.as_str(), s.name.as_str())),
    )
}

pub fn indicators_table(indicators: &[IndicatorInfo]) -> Table {
    two_columns(
        ("Code", "Name"),
        indicators.iter().map(|i| (i.id.as_str(), i.name.as_str())),
    )
}
