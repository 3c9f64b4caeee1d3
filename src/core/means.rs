use average::Mean;

use crate::{
    core::{catalog::ResourceCatalog, record::ReportTable},
    quantity::power::Megawatts,
};

/// Average forecast and outturn availability of a resource.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceMeans {
    pub label: String,

    /// [`None`] when the resource has no forecast rows.
    pub forecast: Option<Megawatts>,

    /// [`None`] when the resource has no outturn rows.
    pub outturn: Option<Megawatts>,
}

impl ResourceMeans {
    pub fn compute(
        catalog: &ResourceCatalog,
        forecast: &ReportTable,
        outturn: &ReportTable,
    ) -> Vec<Self> {
        catalog
            .iter()
            .map(|(label, resource_id)| Self {
                label: label.to_owned(),
                forecast: mean(forecast, resource_id),
                outturn: mean(outturn, resource_id),
            })
            .collect()
    }

    /// Forecast minus outturn, when both are known.
    #[must_use]
    pub fn difference(&self) -> Option<Megawatts> {
        Some(self.forecast? - self.outturn?)
    }
}

fn mean(table: &ReportTable, resource_id: &str) -> Option<Megawatts> {
    let estimate: Mean =
        table.for_resource(resource_id).map(|record| record.availability.0).collect();
    if estimate.is_empty() { None } else { Some(Megawatts(estimate.mean())) }
}
