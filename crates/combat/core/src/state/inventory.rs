//! Consumable inventory with the mutation contract shared by combat and shop.
//!
//! Both paths (item use in battle, buy/sell outside it) mutate quantities by
//! item id and filter out empty stacks, so inventory stays consistent no
//! matter which side touched it last.

/// Effect category of a consumable item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemEffect {
    /// Restores HP; roll floors at 1.
    Heal,
    /// Unmitigated damage to the enemy, no to-hit check.
    Damage,
    /// Ends the battle as Escaped (useless against bosses).
    Escape,
}

/// A stack of identical consumable items.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    pub id: String,
    pub name: String,
    pub effect: ItemEffect,
    /// Dice notation for the heal/damage amount. Ignored for escape items.
    pub dice: String,
    pub quantity: u32,
}

/// Consumable inventory. Zero-quantity stacks are never retained.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    stacks: Vec<ItemStack>,
}

impl Inventory {
    pub fn new(stacks: Vec<ItemStack>) -> Self {
        let mut inv = Self { stacks };
        inv.stacks.retain(|s| s.quantity > 0);
        inv
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn get(&self, item_id: &str) -> Option<&ItemStack> {
        self.stacks.iter().find(|s| s.id == item_id)
    }

    pub fn quantity(&self, item_id: &str) -> u32 {
        self.get(item_id).map(|s| s.quantity).unwrap_or(0)
    }

    /// Add items, merging into an existing stack by id.
    pub fn add(&mut self, stack: ItemStack) {
        if stack.quantity == 0 {
            return;
        }
        match self.stacks.iter_mut().find(|s| s.id == stack.id) {
            Some(existing) => existing.quantity += stack.quantity,
            None => self.stacks.push(stack),
        }
    }

    /// Remove `quantity` items by id, dropping the stack when it empties.
    /// Returns false (and leaves the inventory untouched) if the stack is
    /// missing or too small.
    pub fn remove(&mut self, item_id: &str, quantity: u32) -> bool {
        let Some(idx) = self.stacks.iter().position(|s| s.id == item_id) else {
            return false;
        };
        if self.stacks[idx].quantity < quantity {
            return false;
        }
        self.stacks[idx].quantity -= quantity;
        if self.stacks[idx].quantity == 0 {
            self.stacks.remove(idx);
        }
        true
    }
}
