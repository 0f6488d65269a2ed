use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::search::discovery::SubgroupDiscovery;
use crate::search::queue::Item;

/// One reported subgroup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub description: String,
    /// `None` when the score was NaN.
    pub quality: Option<f64>,
    /// Records matching the description.
    pub size: usize,
}

pub fn findings(run: &SubgroupDiscovery<'_>, items: &[Item]) -> Vec<Finding> {
    items
        .iter()
        .map(|item| Finding {
            description: item.description.to_string(),
            quality: Some(item.quality).filter(|q| !q.is_nan()),
            size: run.subgroup_size(&item.description),
        })
        .collect()
}

/// `quality<TAB>description`, one line per item, in the given order.
pub fn write_text<W: Write>(out: &mut W, items: &[Item]) -> Result<()> {
    for item in items {
        writeln!(out, "{:.6}\t{}", item.quality, item.description)?;
    }
    Ok(())
}

/// Pretty-printed JSON array of [`Finding`]s.
pub fn write_json<W: Write>(out: &mut W, findings: &[Finding]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, findings)?;
    writeln!(out)?;
    Ok(())
}
