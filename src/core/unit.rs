/// One item ("detail") travelling through the line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub(crate) id: u64,
    pub(crate) needs_rework: bool,
    pub(crate) rework_count: u32,
}

impl Unit {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            needs_rework: false,
            rework_count: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn needs_rework(&self) -> bool {
        self.needs_rework
    }

    pub fn rework_count(&self) -> u32 {
        self.rework_count
    }

    /// Flag the unit for a rework pass on its next service
    pub fn mark_for_rework(&mut self) {
        self.needs_rework = true;
    }

    /// A unit flagged again after its single allowed rework is scrap
    pub fn is_scrap(&self) -> bool {
        self.needs_rework && self.rework_count == 1
    }

    /// Consume the pending rework pass, if any
    pub(crate) fn apply_rework(&mut self) {
        if self.needs_rework {
            self.rework_count += 1;
            self.needs_rework = false;
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unit {} (reworks: {}, to rework: {})",
            self.id, self.rework_count, self.needs_rework
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_unit_is_clean() {
        let unit = Unit::new(7);
        assert_eq!(unit.id(), 7);
        assert!(!unit.needs_rework());
        assert_eq!(unit.rework_count(), 0);
        assert!(!unit.is_scrap());
    }

    #[test]
    fn test_rework_pass_consumes_flag() {
        let mut unit = Unit::new(1);
        unit.mark_for_rework();
        unit.apply_rework();
        assert_eq!(unit.rework_count(), 1);
        assert!(!unit.needs_rework());

        // no flag, no pass
        unit.apply_rework();
        assert_eq!(unit.rework_count(), 1);
    }

    #[test]
    fn test_second_marking_is_scrap() {
        let mut unit = Unit::new(1);
        unit.mark_for_rework();
        assert!(!unit.is_scrap());
        unit.apply_rework();
        unit.mark_for_rework();
        assert!(unit.is_scrap());
    }
}
