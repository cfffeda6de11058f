use std::fmt;

/// Drill-down granularity of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Country,
    State,
    District,
    /// Entered only through an explicit state+district search. Not part of
    /// the drill-down chain.
    Search,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Country => write!(f, "country"),
            Level::State => write!(f, "state"),
            Level::District => write!(f, "district"),
            Level::Search => write!(f, "search"),
        }
    }
}

/// Current drill-down level and the names selected along the way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    level: Level,
    selected_state: Option<String>,
    selected_district: Option<String>,
}

impl SelectionState {
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn selected_state(&self) -> Option<&str> {
        self.selected_state.as_deref()
    }

    pub fn selected_district(&self) -> Option<&str> {
        self.selected_district.as_deref()
    }

    pub fn select_state(&mut self, name: &str) {
        self.level = Level::State;
        self.selected_state = Some(name.to_string());
        self.selected_district = None;
    }

    /// Select a district of the current state. Ignored without a selected
    /// state.
    pub fn select_district(&mut self, name: &str) -> bool {
        if self.selected_state.is_none() {
            return false;
        }
        self.level = Level::District;
        self.selected_district = Some(name.to_string());
        true
    }

    /// Switch to search mode. Drill-down selections are cleared.
    pub fn enter_search(&mut self) {
        self.level = Level::Search;
        self.selected_state = None;
        self.selected_district = None;
    }

    pub fn reset(&mut self) {
        *self = SelectionState::default();
    }

    /// Whether the level agrees with which names are set.
    pub fn is_consistent(&self) -> bool {
        match self.level {
            Level::Country | Level::Search => {
                self.selected_state.is_none() && self.selected_district.is_none()
            }
            Level::State => self.selected_state.is_some() && self.selected_district.is_none(),
            Level::District => self.selected_state.is_some() && self.selected_district.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_country() {
        let s = SelectionState::default();
        assert_eq!(s.level(), Level::Country);
        assert!(s.selected_state().is_none());
        assert!(s.is_consistent());
    }

    #[test]
    fn test_drill_down() {
        let mut s = SelectionState::default();
        s.select_state("Madhya Pradesh");
        assert_eq!(s.level(), Level::State);
        assert!(s.select_district("Indore"));
        assert_eq!(s.level(), Level::District);
        assert_eq!(s.selected_state(), Some("Madhya Pradesh"));
        assert_eq!(s.selected_district(), Some("Indore"));
        assert!(s.is_consistent());
    }

    #[test]
    fn test_selecting_state_clears_district() {
        let mut s = SelectionState::default();
        s.select_state("Odisha");
        s.select_district("Cuttack");
        s.select_state("Bihar");
        assert_eq!(s.selected_district(), None);
        assert_eq!(s.level(), Level::State);
    }

    #[test]
    fn test_district_requires_state() {
        let mut s = SelectionState::default();
        assert!(!s.select_district("Indore"));
        assert_eq!(s.level(), Level::Country);
    }

    #[test]
    fn test_search_clears_selection() {
        let mut s = SelectionState::default();
        s.select_state("Tripura");
        s.enter_search();
        assert_eq!(s.level(), Level::Search);
        assert!(s.selected_state().is_none());
        assert!(s.is_consistent());
        s.reset();
        assert_eq!(s, SelectionState::default());
    }
}
