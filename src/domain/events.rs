/// Button → target chain bindings.
///
/// Each button letter maps to the ordered gates/doors it operates.
/// Built once per level (by the decoder or the text reader).

use std::collections::BTreeMap;

use super::room::Loc;
use super::tile::Button;

/// Upper bound on a chain: the archive has 256 event slots.
pub const EVENT_SLOTS: usize = 256;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventGraph {
    chains: BTreeMap<Button, Vec<Loc>>,
}

impl EventGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a chain to a button. A button holds at most one chain; a second
    /// bind replaces the first.
    pub fn bind(&mut self, button: Button, targets: Vec<Loc>) {
        debug_assert!(targets.len() <= EVENT_SLOTS);
        self.chains.insert(button, targets);
    }

    pub fn targets(&self, button: Button) -> &[Loc] {
        self.chains.get(&button).map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Button, &[Loc])> {
        self.chains.iter().map(|(b, t)| (*b, t.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::room::test_support::loc;
    use crate::domain::tile::ButtonKind;

    #[test]
    fn unbound_button_has_no_targets() {
        let g = EventGraph::new();
        let b = Button::new(ButtonKind::Raise, 0).unwrap();
        assert!(g.targets(b).is_empty());
    }

    #[test]
    fn rebinding_replaces_chain() {
        let mut g = EventGraph::new();
        let b = Button::from_letter('c').unwrap();
        g.bind(b, vec![loc(1, 2)]);
        g.bind(b, vec![loc(3, 4), loc(5, 6)]);
        assert_eq!(g.targets(b), &[loc(3, 4), loc(5, 6)]);
        assert_eq!(g.len(), 1);
    }
}
