/// Vote counts of a single review relative to the supervisor roster.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub total_supervisors : usize,
    pub approved          : usize,
    pub rejected          : usize,
    pub pending           : usize,
}

impl Tally {
    /// Tally of a finalized review.
    pub const fn frozen() -> Self {
        Self {
            total_supervisors: 0,
            approved: 0,
            rejected: 0,
            pending: 0,
        }
    }

    pub const fn cast(&self) -> usize {
        self.approved + self.rejected
    }
}
