use chrono::NaiveDate;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

use crate::{
    core::{
        catalog::ResourceCatalog,
        means::ResourceMeans,
        summary::ResourceSummary,
        week::WeeklyBucket,
    },
    fmt::{FormattedOption, FormattedPercentage},
    quantity::{energy::MegawattHours, power::Megawatts},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

pub fn build_summary_table(summary: &[ResourceSummary]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Name", "Over", "Under", "Overall", "Over %", "Under %"]);
    for row in summary {
        table.add_row(vec![
            Cell::new(&row.label).add_attribute(Attribute::Bold),
            Cell::new(row.over_forecast).set_alignment(CellAlignment::Right),
            Cell::new(row.under_forecast).set_alignment(CellAlignment::Right),
            Cell::new(row.overall)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(FormattedPercentage(row.percentage_over))
                .set_alignment(CellAlignment::Right)
                .fg(if row.percentage_over > 50.0 { Color::Red } else { Color::Green }),
            Cell::new(FormattedPercentage(row.percentage_under))
                .set_alignment(CellAlignment::Right)
                .fg(if row.percentage_under > 50.0 { Color::Red } else { Color::Green }),
        ]);
    }
    table
}

pub fn build_means_table(means: &[ResourceMeans]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Name", "Forecast", "Outturn", "Difference"]);
    for row in means {
        let difference = row.difference();
        table.add_row(vec![
            Cell::new(&row.label).add_attribute(Attribute::Bold),
            Cell::new(FormattedOption(row.forecast)).set_alignment(CellAlignment::Right),
            Cell::new(FormattedOption(row.outturn)).set_alignment(CellAlignment::Right),
            Cell::new(FormattedOption(difference)).set_alignment(CellAlignment::Right).fg(
                match difference {
                    Some(difference) if difference > Megawatts::ZERO => Color::Red,
                    Some(_) => Color::Green,
                    None => Color::DarkGrey,
                },
            ),
        ]);
    }
    table
}

/// Weekly forecast and outturn energy per resource, followed by the weekly totals.
pub fn build_weekly_energy_table(
    catalog: &ResourceCatalog,
    forecast: &WeeklyBucket,
    outturn: &WeeklyBucket,
) -> Table {
    let weeks: Vec<NaiveDate> = forecast
        .iter()
        .chain(outturn.iter())
        .map(|(_, week_start, _)| week_start)
        .sorted_unstable()
        .dedup()
        .collect();

    let mut table = new_table();
    table.set_header(vec!["Name", "Week", "Forecast", "Outturn"]);
    for (label, resource_id) in catalog.iter() {
        for week_start in &weeks {
            let forecast = forecast.get(resource_id, *week_start);
            let outturn = outturn.get(resource_id, *week_start);
            if forecast.is_none() && outturn.is_none() {
                continue;
            }
            table.add_row(vec![
                Cell::new(label).add_attribute(Attribute::Bold),
                Cell::new(week_start.format("%Y-%m-%d")).add_attribute(Attribute::Dim),
                Cell::new(FormattedOption(forecast)).set_alignment(CellAlignment::Right),
                Cell::new(FormattedOption(outturn)).set_alignment(CellAlignment::Right),
            ]);
        }
    }

    let forecast_totals = forecast.totals_by_week();
    let outturn_totals = outturn.totals_by_week();
    for week_start in &weeks {
        table.add_row(vec![
            Cell::new("Total").add_attribute(Attribute::Italic),
            Cell::new(week_start.format("%Y-%m-%d")).add_attribute(Attribute::Dim),
            total_cell(forecast_totals.get(week_start).copied()),
            total_cell(outturn_totals.get(week_start).copied()),
        ]);
    }
    table
}

fn total_cell(energy: Option<MegawattHours>) -> Cell {
    Cell::new(FormattedOption(energy))
        .set_alignment(CellAlignment::Right)
        .add_attribute(Attribute::Italic)
}
