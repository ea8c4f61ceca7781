/// Run-scoped tally of rescued and lost inhabitants.
/// Incremented by the simulation, read by the score overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub rescued_people: u32,
    pub killed_people: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
