use std::time::Instant;

use crate::{
    core::{
        CardRecord,
        GridConfig,
        IgnoreList,
        KanjiGridError,
        UnitMap,
    },
    groups::GroupSet,
};

pub mod aggregate;
pub mod export;
pub mod html;
pub mod report;
pub mod scoring;
pub mod snapshot;
pub mod sort;

pub use aggregate::{
    Aggregator,
    NoteSource,
};
pub use export::Export;
pub use report::Report;

/// Everything a host needs to display or save one grid.
#[derive(Debug, Clone)]
pub struct GridOutput {
    pub units: UnitMap,
    pub report: Report,
}

impl GridOutput {
    pub fn html(&self) -> String {
        html::render_html(&self.report)
    }

    pub fn png(&self) -> Result<Vec<u8>, KanjiGridError> {
        snapshot::render_png(&self.report)
    }

    pub fn export(&self, config: &GridConfig) -> Export {
        Export::new(&self.units, config)
    }
}

/// Aggregate, classify and lay out a grid in one pass.
pub fn generate<'c, I, N>(
    cards: I,
    notes: &N,
    config: &GridConfig,
    ignore: &IgnoreList,
    groups: &GroupSet,
) -> Result<GridOutput, KanjiGridError>
where
    I: IntoIterator<Item = &'c CardRecord>,
    N: NoteSource + ?Sized,
{
    config.validate(groups)?;

    let units = Aggregator::new(config, ignore).aggregate(cards, notes);

    let start = Instant::now();
    let classification = sort::classify(&units, config, groups)?;
    log::debug!("Classified units ({}) in {:.2}s", config.ordering, start.elapsed().as_secs_f32());

    let start = Instant::now();
    let report = report::build_report(&classification, config);
    log::debug!(
        "Built report with {} section(s) in {:.2}s",
        report.sections.len(),
        start.elapsed().as_secs_f32()
    );

    Ok(GridOutput { units, report })
}
