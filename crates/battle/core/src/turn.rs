//! Per-round turn ordering.

use std::cmp::Reverse;

use crate::action::ActorId;
use crate::character::Character;

/// One round's acting order, computed once and consumed once.
///
/// Living combatants are sorted by descending agility, ties broken by
/// ascending name. The queue is a snapshot: deaths later in the round do not
/// reorder it (the battle loop re-checks liveness before each turn), and a
/// fresh order is built at the top of every round.
pub struct TurnOrder {
    queue: std::vec::IntoIter<ActorId>,
}

impl TurnOrder {
    /// Builds the order from a roster snapshot.
    pub fn new(roster: &[(ActorId, &dyn Character)]) -> Self {
        let mut living: Vec<(ActorId, u32, String)> = roster
            .iter()
            .filter(|(_, combatant)| combatant.state().is_alive())
            .map(|(id, combatant)| {
                let state = combatant.state();
                (*id, state.stats().agility(), state.name().to_owned())
            })
            .collect();
        living.sort_by(|a, b| (Reverse(a.1), &a.2).cmp(&(Reverse(b.1), &b.2)));

        let queue: Vec<ActorId> = living.into_iter().map(|(id, _, _)| id).collect();
        Self {
            queue: queue.into_iter(),
        }
    }
}

impl Iterator for TurnOrder {
    type Item = ActorId;

    fn next(&mut self) -> Option<ActorId> {
        self.queue.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heroes::{Healer, Mage, Warrior};
    use crate::stats::StatBlock;

    #[test]
    fn orders_by_agility_then_name() {
        let a = Warrior::new("A", StatBlock::new(1, 3, 5, 1));
        let b = Mage::new("B", StatBlock::new(1, 1, 7, 5));
        let c = Healer::new("C", StatBlock::new(1, 1, 5, 4));

        let roster: Vec<(ActorId, &dyn Character)> = vec![
            (ActorId::hero(0), &a),
            (ActorId::hero(1), &b),
            (ActorId::hero(2), &c),
        ];

        let order: Vec<ActorId> = TurnOrder::new(&roster).collect();
        // B first on agility; A before C by name on the tie.
        assert_eq!(
            order,
            vec![ActorId::hero(1), ActorId::hero(0), ActorId::hero(2)]
        );
    }

    #[test]
    fn dead_combatants_are_left_out() {
        let a = Warrior::new("A", StatBlock::new(1, 3, 5, 1));
        let mut b = Mage::new("B", StatBlock::new(1, 1, 7, 5));
        b.state_mut().stats_mut().set_hp(0);

        let roster: Vec<(ActorId, &dyn Character)> =
            vec![(ActorId::hero(0), &a), (ActorId::hero(1), &b)];

        let order: Vec<ActorId> = TurnOrder::new(&roster).collect();
        assert_eq!(order, vec![ActorId::hero(0)]);
    }
}
