// ABOUTME: Pie-chart data shaping for stats sections
// ABOUTME: Produces chart definitions the host framework renders; no drawing happens here
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pie-chart definitions built from aggregate statistics. Rendering is
//! the host chat framework's concern; this module only shapes the data.

use crate::provider::{StatItem, StatsData};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Chart canvas width in pixels
pub const PIE_CHART_WIDTH: u32 = 400;

/// Chart canvas height in pixels
pub const PIE_CHART_HEIGHT: u32 = 200;

/// Stats sections that can be charted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PieSection {
    /// Per-language time share (command default)
    #[default]
    Languages,
    /// Per-editor time share
    Editors,
    /// Per-machine time share
    Machines,
    /// Per-OS time share
    OperatingSystems,
}

impl PieSection {
    /// Key the section is selected by on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Languages => "languages",
            Self::Editors => "editors",
            Self::Machines => "machines",
            Self::OperatingSystems => "operating_systems",
        }
    }
}

impl fmt::Display for PieSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PieSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "languages" => Ok(Self::Languages),
            "editors" => Ok(Self::Editors),
            "machines" => Ok(Self::Machines),
            "operating_systems" => Ok(Self::OperatingSystems),
            other => Err(format!("unknown chart section: {other}")),
        }
    }
}

/// One labeled slice, value is the section percentage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    /// Entry name
    pub name: String,
    /// Share of total time, 0-100
    pub value: f64,
}

/// A complete pie-chart definition for the host renderer
#[derive(Debug, Clone, Serialize)]
pub struct PieChart {
    /// Which stats section is charted (the formatters layer localizes the title)
    pub section: PieSection,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Labeled percentage slices
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    /// Shape one stats section into a pie definition
    #[must_use]
    pub fn from_stats(stats: &StatsData, section: PieSection) -> Self {
        let items: &[StatItem] = match section {
            PieSection::Languages => &stats.languages,
            PieSection::Editors => &stats.editors,
            PieSection::Machines => &stats.machines,
            PieSection::OperatingSystems => &stats.operating_systems,
        };

        Self {
            section,
            width: PIE_CHART_WIDTH,
            height: PIE_CHART_HEIGHT,
            slices: items
                .iter()
                .map(|item| PieSlice {
                    name: item.name.clone(),
                    value: item.percent,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with_languages() -> StatsData {
        StatsData {
            languages: vec![
                StatItem {
                    name: "Rust".into(),
                    percent: 62.5,
                    text: "5 hrs".into(),
                    total_seconds: 18000.0,
                },
                StatItem {
                    name: "TOML".into(),
                    percent: 37.5,
                    text: "3 hrs".into(),
                    total_seconds: 10800.0,
                },
            ],
            ..StatsData::default()
        }
    }

    #[test]
    fn slices_carry_section_percentages() {
        let chart = PieChart::from_stats(&stats_with_languages(), PieSection::Languages);
        assert_eq!(chart.width, PIE_CHART_WIDTH);
        assert_eq!(chart.height, PIE_CHART_HEIGHT);
        assert_eq!(
            chart.slices,
            vec![
                PieSlice {
                    name: "Rust".into(),
                    value: 62.5
                },
                PieSlice {
                    name: "TOML".into(),
                    value: 37.5
                },
            ]
        );
    }

    #[test]
    fn empty_section_yields_empty_chart() {
        let chart = PieChart::from_stats(&stats_with_languages(), PieSection::Editors);
        assert!(chart.slices.is_empty());
    }

    #[test]
    fn section_keys_round_trip() {
        for section in [
            PieSection::Languages,
            PieSection::Editors,
            PieSection::Machines,
            PieSection::OperatingSystems,
        ] {
            assert_eq!(section.as_str().parse::<PieSection>().unwrap(), section);
        }
        assert!("keyboards".parse::<PieSection>().is_err());
        assert_eq!(PieSection::default(), PieSection::Languages);
    }
}
