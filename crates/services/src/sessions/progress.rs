/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// Zero-based index of the current drill phase; equals `phase_count` once complete.
    pub phase: usize,
    pub phase_count: usize,
    /// Cards drilled in each phase.
    pub total: usize,
    /// Distinct cards answered in the current phase.
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}
