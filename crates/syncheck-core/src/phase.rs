//! Phase loop: frame, build, evaluate, emit, repeat.
//!
//! Each phase gets a fresh [`NeighborMapping`]; nothing but the cursor carries
//! over from one phase to the next.

use crate::config::EvaluationConfig;
use crate::engine::{self, NeighborMapping, QueryVerdict, Verdict};
use crate::error::{Result, SyncheckError};
use crate::input::{self, Cursor, InputLines};
use serde::Serialize;

/// Verdicts for one phase, in query order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    /// 1-based phase number.
    pub index: usize,
    pub synonym_pairs: usize,
    /// Distinct words with a neighbor entry after folding.
    pub words: usize,
    pub verdicts: Vec<QueryVerdict>,
}

impl PhaseReport {
    pub fn count(&self, verdict: Verdict) -> usize {
        self.verdicts.iter().filter(|v| v.verdict == verdict).count()
    }
}

/// Totals across every phase of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub phases: usize,
    pub synonym_pairs: usize,
    pub queries: usize,
    pub synonyms: usize,
    pub different: usize,
}

impl RunSummary {
    fn record(&mut self, report: &PhaseReport) {
        let synonyms = report.count(Verdict::Synonyms);
        self.phases += 1;
        self.synonym_pairs += report.synonym_pairs;
        self.queries += report.verdicts.len();
        self.synonyms += synonyms;
        self.different += report.verdicts.len() - synonyms;
    }
}

/// Run the phase whose synonym count sits under `cursor`.
pub fn run_phase(
    lines: &InputLines,
    cursor: &mut Cursor,
    index: usize,
    config: &EvaluationConfig,
) -> Result<PhaseReport> {
    let frame = input::split_frame(lines, cursor)?;
    let mapping = NeighborMapping::build(frame.synonyms)?;
    let verdicts = engine::evaluate_all(frame.queries, &mapping, config.parallel_threshold)?;

    tracing::debug!(
        phase = index,
        pairs = frame.synonyms.len(),
        queries = verdicts.len(),
        "phase evaluated"
    );

    Ok(PhaseReport {
        index,
        synonym_pairs: frame.synonyms.len(),
        words: mapping.len(),
        verdicts,
    })
}

/// Run every phase declared on the first line, handing each report to `sink`
/// before the next phase is framed.
///
/// The first error stops the run. Reports already handed to `sink` stay
/// delivered.
pub fn run_phases<F, E>(
    lines: &InputLines,
    config: &EvaluationConfig,
    mut sink: F,
) -> std::result::Result<RunSummary, E>
where
    F: FnMut(&PhaseReport) -> std::result::Result<(), E>,
    E: From<SyncheckError>,
{
    let (phases, mut cursor) = input::read_phase_count(lines)?;
    let mut summary = RunSummary::default();

    for index in 1..=phases {
        let report = run_phase(lines, &mut cursor, index, config)?;
        summary.record(&report);
        sink(&report)?;
    }

    if cursor.position() < lines.len() {
        tracing::debug!(
            ignored = lines.len() - cursor.position(),
            "lines after the last phase ignored"
        );
    }
    tracing::info!(
        phases = summary.phases,
        queries = summary.queries,
        synonyms = summary.synonyms,
        "run complete"
    );
    Ok(summary)
}

/// Run every phase and keep all reports.
pub fn collect_phases(lines: &InputLines, config: &EvaluationConfig) -> Result<Vec<PhaseReport>> {
    let mut reports = Vec::new();
    run_phases(lines, config, |report| {
        reports.push(report.clone());
        Ok::<(), SyncheckError>(())
    })?;
    Ok(reports)
}
