use crate::physics::{Phase, PhaseMask};
use crate::survey::{ExtractionMethod, Survey};
use chrono::NaiveDate;
use glam::DVec3;
use std::fmt;

/// Identity of one side of an evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct SurveyStamp {
    pub name: String,
    pub sim_date: NaiveDate,
    pub report_step: usize,
}

impl From<&Survey> for SurveyStamp {
    fn from(survey: &Survey) -> Self {
        Self {
            name: survey.name().to_string(),
            sim_date: survey.sim_date(),
            report_step: survey.report_step(),
        }
    }
}

/// Outcome of a gravity-change evaluation, in the engine's output unit.
#[derive(Clone, Debug, PartialEq)]
pub struct GravityReport {
    pub base: SurveyStamp,
    pub monitor: SurveyStamp,
    pub method: ExtractionMethod,
    pub station: DVec3,
    pub phase_mask: PhaseMask,

    pub total: f64,
    /// `None` marks the single aggregate column of RPORV/PORMOD surveys.
    pub contributions: Vec<(Option<Phase>, f64)>,

    pub cells_summed: usize,
    /// Cells coincident with the station.
    pub cells_excluded: usize,
}

impl GravityReport {
    pub fn contribution(&self, phase: Phase) -> Option<f64> {
        self.contributions
            .iter()
            .find(|(p, _)| *p == Some(phase))
            .map(|(_, v)| *v)
    }

    pub fn print_to_console(&self) {
        println!("{self}");
    }
}

impl fmt::Display for GravityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "{:^60}", "GRAVITY CHANGE")?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(
            f,
            "Base:      {:<16} {} (step {})",
            self.base.name, self.base.sim_date, self.base.report_step
        )?;
        writeln!(
            f,
            "Monitor:   {:<16} {} (step {})",
            self.monitor.name, self.monitor.sim_date, self.monitor.report_step
        )?;
        writeln!(f, "Method:    {}", self.method)?;
        writeln!(
            f,
            "Station:   ({:.2}, {:.2}, {:.2})",
            self.station.x, self.station.y, self.station.z
        )?;
        writeln!(f, "{}", "-".repeat(60))?;
        for (phase, value) in &self.contributions {
            match phase {
                Some(p) => writeln!(f, "  {:<8} {:>14.6e} µGal", p.to_string(), value)?,
                None => writeln!(f, "  {:<8} {:>14.6e} µGal", "total", value)?,
            }
        }
        if self.method.is_phase_resolved() {
            writeln!(f, "  mask     {}", self.phase_mask)?;
        }
        writeln!(f, "{}", "-".repeat(60))?;
        writeln!(f, "Delta g:   {:.6e} µGal", self.total)?;
        write!(
            f,
            "Cells:     {} summed, {} excluded",
            self.cells_summed, self.cells_excluded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(name: &str, year: i32) -> SurveyStamp {
        SurveyStamp {
            name: name.to_string(),
            sim_date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            report_step: 0,
        }
    }

    #[test]
    fn display_lists_phase_contributions() {
        let report = GravityReport {
            base: stamp("base", 2000),
            monitor: stamp("mon", 2010),
            method: ExtractionMethod::Fip,
            station: DVec3::ZERO,
            phase_mask: Phase::Oil | Phase::Gas,
            total: 3.0,
            contributions: vec![(Some(Phase::Oil), 1.0), (Some(Phase::Gas), 2.0)],
            cells_summed: 10,
            cells_excluded: 1,
        };

        let text = report.to_string();
        assert!(text.contains("FIP"));
        assert!(text.contains("oil+gas"));
        assert!(text.contains("10 summed, 1 excluded"));
        assert_eq!(report.contribution(Phase::Gas), Some(2.0));
        assert_eq!(report.contribution(Phase::Water), None);
    }
}
