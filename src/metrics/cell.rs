use std::cell::Cell;

/// Counter that can be bumped through a shared reference.
///
/// Lets `&self` lookups (`frequency`, `peek`, `iter`) record metrics. The cell
/// makes the owning cache `!Sync`, which matches its single-owner contract.
#[repr(transparent)]
#[derive(Debug, Default, Clone)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get().saturating_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incr_through_shared_reference() {
        let cell = MetricsCell::new();
        let shared = &cell;
        shared.incr();
        shared.incr();
        assert_eq!(cell.get(), 2);
    }
}
