//! Named, ordered entity collections
//!
//! Layers decide two things:
//! - which entities get updated, and in what order
//! - the draw order (first layer in the list is drawn first, i.e. at the back)
//!
//! A new layer goes to the bottom of the stack, matching how the game
//! registers its layers: the last one added is drawn first.

use serde::{Deserialize, Serialize};

use super::state::EntityId;

/// The game's layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LayerId {
    Shield = 0,
    MainEnemy = 1,
    Enemy = 2,
    Player = 3,
    Info = 4,
}

impl LayerId {
    pub const ALL: [LayerId; 5] = [
        LayerId::Shield,
        LayerId::MainEnemy,
        LayerId::Enemy,
        LayerId::Player,
        LayerId::Info,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LayerId::Shield => "shield",
            LayerId::MainEnemy => "main enemy",
            LayerId::Enemy => "enemy",
            LayerId::Player => "player",
            LayerId::Info => "info",
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Small bitset of layer memberships, stored on each body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayerSet(u8);

impl LayerSet {
    pub const EMPTY: LayerSet = LayerSet(0);

    #[cfg(test)]
    pub fn of(layers: &[LayerId]) -> Self {
        let mut set = Self::EMPTY;
        for &layer in layers {
            set.insert(layer);
        }
        set
    }

    pub fn contains(&self, layer: LayerId) -> bool {
        self.0 & layer.bit() != 0
    }

    pub fn insert(&mut self, layer: LayerId) {
        self.0 |= layer.bit();
    }

    pub fn remove(&mut self, layer: LayerId) {
        self.0 &= !layer.bit();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = LayerId> {
        LayerId::ALL.into_iter().filter(move |l| self.contains(*l))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Layer {
    id: LayerId,
    members: Vec<EntityId>,
}

/// Ordered set of layers, back to front
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerRegistry {
    layers: Vec<Layer>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Register a layer at the bottom of the stack (drawn first).
    /// Registering an existing layer is a no-op.
    pub fn add(&mut self, id: LayerId) {
        if self.index_of(id).is_some() {
            return;
        }
        self.layers.insert(
            0,
            Layer {
                id,
                members: Vec::new(),
            },
        );
    }

    /// Unregister a layer, reporting each member so its owner can drop the
    /// membership
    pub(crate) fn remove(&mut self, id: LayerId, memberships: &mut dyn FnMut(EntityId, LayerId)) {
        if let Some(index) = self.index_of(id) {
            let layer = self.layers.remove(index);
            for member in layer.members {
                memberships(member, id);
            }
        }
    }

    /// Layer order, back to front
    pub fn order(&self) -> Vec<LayerId> {
        self.layers.iter().map(|l| l.id).collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Draw last (topmost)
    pub fn move_to_top(&mut self, id: LayerId) {
        if let Some(index) = self.index_of(id) {
            let layer = self.layers.remove(index);
            self.layers.push(layer);
        }
    }

    /// Draw first (bottommost)
    pub fn move_to_bottom(&mut self, id: LayerId) {
        if let Some(index) = self.index_of(id) {
            let layer = self.layers.remove(index);
            self.layers.insert(0, layer);
        }
    }

    /// One step toward the top
    pub fn move_up(&mut self, id: LayerId) {
        if let Some(index) = self.index_of(id)
            && index + 1 < self.layers.len()
        {
            self.layers.swap(index, index + 1);
        }
    }

    /// One step toward the bottom
    pub fn move_down(&mut self, id: LayerId) {
        if let Some(index) = self.index_of(id)
            && index > 0
        {
            self.layers.swap(index, index - 1);
        }
    }

    /// Append an entity to a layer. Returns false if it was already a member
    /// or the layer is not registered.
    pub(crate) fn insert(&mut self, layer: LayerId, entity: EntityId) -> bool {
        let Some(index) = self.index_of(layer) else {
            log::warn!("insert into unregistered layer '{}'", layer.name());
            return false;
        };
        let members = &mut self.layers[index].members;
        if members.contains(&entity) {
            return false;
        }
        members.push(entity);
        true
    }

    /// Drop an entity from a layer; missing members are ignored
    pub(crate) fn detach(&mut self, layer: LayerId, entity: EntityId) {
        if let Some(index) = self.index_of(layer) {
            self.layers[index].members.retain(|&e| e != entity);
        }
    }

    pub fn members(&self, layer: LayerId) -> &[EntityId] {
        self.index_of(layer)
            .map(|i| self.layers[i].members.as_slice())
            .unwrap_or(&[])
    }

    pub fn count(&self, layer: LayerId) -> usize {
        self.members(layer).len()
    }

    pub fn contains(&self, layer: LayerId, entity: EntityId) -> bool {
        self.members(layer).contains(&entity)
    }

    /// Copy of the members of several layers, in the given layer order.
    /// Iterate this instead of the live lists so entities can be removed
    /// mid-update.
    pub fn snapshot(&self, layers: &[LayerId]) -> Vec<EntityId> {
        layers
            .iter()
            .flat_map(|&l| self.members(l).iter().copied())
            .collect()
    }

    /// Every member of every layer, back to front (draw order)
    pub fn draw_order(&self) -> Vec<EntityId> {
        self.layers
            .iter()
            .flat_map(|l| l.members.iter().copied())
            .collect()
    }

    fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> LayerRegistry {
        let mut r = LayerRegistry::new();
        r.add(LayerId::Shield);
        r.add(LayerId::MainEnemy);
        r.add(LayerId::Enemy);
        r.add(LayerId::Player);
        r
    }

    #[test]
    fn later_layers_are_drawn_first() {
        let r = registry();
        assert_eq!(
            r.order(),
            vec![
                LayerId::Player,
                LayerId::Enemy,
                LayerId::MainEnemy,
                LayerId::Shield
            ]
        );
    }

    #[test]
    fn adding_twice_is_a_noop() {
        let mut r = registry();
        r.add(LayerId::Enemy);
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn reorder_operations() {
        let mut r = registry();
        r.add(LayerId::Info);
        r.move_to_top(LayerId::Info);
        assert_eq!(r.order().last(), Some(&LayerId::Info));

        r.move_to_bottom(LayerId::Shield);
        assert_eq!(r.order()[0], LayerId::Shield);

        r.move_up(LayerId::Shield);
        assert_eq!(r.order()[1], LayerId::Shield);

        r.move_down(LayerId::Shield);
        r.move_down(LayerId::Shield);
        assert_eq!(r.order()[0], LayerId::Shield);

        // Top stays top
        r.move_up(LayerId::Info);
        assert_eq!(r.order().last(), Some(&LayerId::Info));
    }

    #[test]
    fn membership_is_unique_and_detach_is_idempotent() {
        let mut r = registry();
        assert!(r.insert(LayerId::Enemy, 7));
        assert!(!r.insert(LayerId::Enemy, 7));
        assert_eq!(r.count(LayerId::Enemy), 1);

        r.detach(LayerId::Enemy, 7);
        r.detach(LayerId::Enemy, 7);
        assert_eq!(r.count(LayerId::Enemy), 0);
    }

    #[test]
    fn insert_into_unregistered_layer_fails() {
        let mut r = registry();
        assert!(!r.insert(LayerId::Info, 1));
        assert!(r.members(LayerId::Info).is_empty());
    }

    #[test]
    fn snapshot_follows_requested_order() {
        let mut r = registry();
        r.insert(LayerId::Player, 1);
        r.insert(LayerId::Enemy, 2);
        r.insert(LayerId::Enemy, 3);
        r.insert(LayerId::MainEnemy, 4);

        let snap = r.snapshot(&[LayerId::MainEnemy, LayerId::Enemy, LayerId::Player]);
        assert_eq!(snap, vec![4, 2, 3, 1]);

        // Mutating after the snapshot leaves it intact
        r.detach(LayerId::Enemy, 2);
        assert_eq!(snap.len(), 4);
        assert_eq!(r.draw_order(), vec![1, 3, 4]);
    }

    #[test]
    fn removing_a_layer_reports_members() {
        let mut r = registry();
        r.insert(LayerId::Enemy, 5);
        r.insert(LayerId::Enemy, 6);
        let mut dropped = Vec::new();
        r.remove(LayerId::Enemy, &mut |e, l| dropped.push((e, l)));
        assert_eq!(dropped, vec![(5, LayerId::Enemy), (6, LayerId::Enemy)]);
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn layer_set_tracks_membership() {
        let mut set = LayerSet::of(&[LayerId::Enemy, LayerId::Info]);
        assert!(set.contains(LayerId::Enemy));
        assert!(!set.contains(LayerId::Player));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![LayerId::Enemy, LayerId::Info]);
        set.remove(LayerId::Enemy);
        set.remove(LayerId::Info);
        assert!(set.is_empty());
    }
}
