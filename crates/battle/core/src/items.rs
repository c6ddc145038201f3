//! Consumable items and the inventory that holds them.
//!
//! Items live outside the round loop: they mutate characters only through
//! the stable HP/MP/effect-list operations on [`ActorState`], so using one
//! between rounds (or mid-test) cannot desync battle state.

use crate::character::ActorState;

/// A consumable applied by a user to a target.
pub trait Item {
    fn name(&self) -> &str;

    /// Applies the item and returns a human-readable description of what
    /// happened.
    fn apply(&self, user: &str, target: &mut ActorState) -> String;
}

/// Restores a fixed amount of the target's HP.
pub struct Potion {
    heal_amount: u32,
}

impl Potion {
    pub fn new(heal_amount: u32) -> Self {
        Self { heal_amount }
    }
}

impl Item for Potion {
    fn name(&self) -> &str {
        "Potion"
    }

    fn apply(&self, user: &str, target: &mut ActorState) -> String {
        let healed = target.heal(self.heal_amount);
        format!("{user} used Potion on {}: +{healed} HP", target.name())
    }
}

/// Restores the target's MP, clamped at its maximum.
pub struct Ether {
    mp_amount: u32,
}

impl Ether {
    pub fn new(mp_amount: u32) -> Self {
        Self { mp_amount }
    }
}

impl Item for Ether {
    fn name(&self) -> &str {
        "Ether"
    }

    fn apply(&self, user: &str, target: &mut ActorState) -> String {
        let before = target.stats().mp();
        target
            .stats_mut()
            .set_mp(before.saturating_add(self.mp_amount));
        let gained = target.stats().mp() - before;
        format!("{user} used Ether on {}: +{gained} MP", target.name())
    }
}

/// Dispels effects by name. Removes poisons unless told otherwise.
pub struct Antidote {
    removes: Vec<String>,
}

impl Antidote {
    pub fn new() -> Self {
        Self {
            removes: vec![String::from("Poison")],
        }
    }

    /// An antidote for a custom set of effect names.
    pub fn for_effects(removes: Vec<String>) -> Self {
        Self { removes }
    }
}

impl Default for Antidote {
    fn default() -> Self {
        Self::new()
    }
}

impl Item for Antidote {
    fn name(&self) -> &str {
        "Antidote"
    }

    fn apply(&self, user: &str, target: &mut ActorState) -> String {
        let mut removed = 0;
        for name in &self.removes {
            removed += target.remove_effects_named(name);
        }
        format!(
            "{user} used Antidote on {}: removed {removed} effect(s)",
            target.name()
        )
    }
}

/// Malformed inventory access.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("invalid item index {index} (holding {len} items)")]
    InvalidIndex { index: usize, len: usize },
}

/// An ordered bag of items usable by index.
#[derive(Default)]
pub struct Inventory {
    items: Vec<Box<dyn Item>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn add(&mut self, item: Box<dyn Item>) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[Box<dyn Item>] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Removes and returns the item at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Box<dyn Item>, InventoryError> {
        if index >= self.items.len() {
            return Err(InventoryError::InvalidIndex {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Consumes the item at `index`, applying it from `user` to `target`.
    pub fn use_item(
        &mut self,
        index: usize,
        user: &str,
        target: &mut ActorState,
    ) -> Result<String, InventoryError> {
        let item = self.remove(index)?;
        let message = item.apply(user, target);
        tracing::info!(item = item.name(), message = message.as_str(), "item used");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Poison, Shield};
    use crate::stats::StatBlock;

    fn target() -> ActorState {
        ActorState::new("W", StatBlock::new(1, 4, 2, 1))
    }

    #[test]
    fn potion_heals_and_clamps_at_max() {
        let mut hero = target();
        hero.stats_mut().set_hp(10);

        let mut inventory = Inventory::new();
        inventory.add(Box::new(Potion::new(500)));
        let message = inventory.use_item(0, "W", &mut hero).unwrap();

        assert!(message.contains("used Potion"));
        assert_eq!(hero.stats().hp(), hero.stats().max_hp());
        assert!(inventory.is_empty());
    }

    #[test]
    fn ether_restores_mp_up_to_max() {
        let mut hero = target();
        hero.stats_mut().set_mp(0);

        let mut inventory = Inventory::new();
        inventory.add(Box::new(Ether::new(999)));
        inventory.use_item(0, "W", &mut hero).unwrap();

        assert_eq!(hero.stats().mp(), hero.stats().max_mp());
    }

    #[test]
    fn antidote_removes_poison_only() {
        let mut hero = target();
        hero.add_effect(Box::new(Poison::new(5, 3)));
        hero.add_effect(Box::new(Shield::new(10, 2)));

        let mut inventory = Inventory::new();
        inventory.add(Box::new(Antidote::new()));
        let message = inventory.use_item(0, "W", &mut hero).unwrap();

        assert!(message.contains("removed 1 effect"));
        assert_eq!(hero.effects().len(), 1);
        assert_eq!(hero.effects()[0].name(), "Shield");
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut hero = target();
        let mut inventory = Inventory::new();
        inventory.add(Box::new(Potion::new(20)));
        inventory.remove(0).unwrap();

        assert_eq!(
            inventory.use_item(0, "W", &mut hero),
            Err(InventoryError::InvalidIndex { index: 0, len: 0 })
        );
    }
}
