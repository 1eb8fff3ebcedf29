//! Entity store: entity identity plus per-kind component storage
//!
//! The store knows nothing about game rules; it hands out components by
//! kind and maintains kind-indexed entity sets for queries. Absent
//! entities and components are reported as `None`, never as errors.

use ahash::{AHashMap, AHashSet};

use crate::core::types::EntityId;
use crate::ecs::components::{
    Combatant, Equipment, Info, Inventory, Item, Player, Position, Resources, Skills, SpellBook,
    Stats,
};

/// The closed set of component kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Position,
    Stats,
    Info,
    Item,
    Inventory,
    Equipment,
    Skills,
    SpellBook,
    Resources,
    Player,
    Combatant,
}

/// Tagged union of every component type
#[derive(Debug, Clone)]
pub enum Component {
    Position(Position),
    Stats(Stats),
    Info(Info),
    Item(Item),
    Inventory(Inventory),
    Equipment(Equipment),
    Skills(Skills),
    SpellBook(SpellBook),
    Resources(Resources),
    Player(Player),
    Combatant(Combatant),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Position(_) => ComponentKind::Position,
            Component::Stats(_) => ComponentKind::Stats,
            Component::Info(_) => ComponentKind::Info,
            Component::Item(_) => ComponentKind::Item,
            Component::Inventory(_) => ComponentKind::Inventory,
            Component::Equipment(_) => ComponentKind::Equipment,
            Component::Skills(_) => ComponentKind::Skills,
            Component::SpellBook(_) => ComponentKind::SpellBook,
            Component::Resources(_) => ComponentKind::Resources,
            Component::Player(_) => ComponentKind::Player,
            Component::Combatant(_) => ComponentKind::Combatant,
        }
    }
}

/// Maps entity identity to named component instances, with per-kind
/// entity-set indices for "all entities having X" queries
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: AHashMap<EntityId, AHashMap<ComponentKind, Component>>,
    indices: AHashMap<ComponentKind, AHashSet<EntityId>>,
    next_id: u64,
}

macro_rules! typed_accessors {
    ($( $get:ident, $get_mut:ident, $kind:ident, $ty:ty );* $(;)?) => {
        $(
            pub fn $get(&self, entity: EntityId) -> Option<&$ty> {
                match self.get_component(entity, ComponentKind::$kind) {
                    Some(Component::$kind(inner)) => Some(inner),
                    _ => None,
                }
            }

            pub fn $get_mut(&mut self, entity: EntityId) -> Option<&mut $ty> {
                match self.get_component_mut(entity, ComponentKind::$kind) {
                    Some(Component::$kind(inner)) => Some(inner),
                    _ => None,
                }
            }
        )*
    };
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity with no components
    pub fn create_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, AHashMap::new());
        id
    }

    /// Register a component under its kind, replacing any existing one,
    /// and update the kind index
    ///
    /// Adding to an unknown entity id registers the entity implicitly,
    /// but ids should come from `create_entity` so they stay unique.
    pub fn add_component(&mut self, entity: EntityId, component: Component) {
        let kind = component.kind();
        self.entities.entry(entity).or_default().insert(kind, component);
        self.indices.entry(kind).or_default().insert(entity);
    }

    pub fn get_component(&self, entity: EntityId, kind: ComponentKind) -> Option<&Component> {
        self.entities.get(&entity)?.get(&kind)
    }

    pub fn get_component_mut(
        &mut self,
        entity: EntityId,
        kind: ComponentKind,
    ) -> Option<&mut Component> {
        self.entities.get_mut(&entity)?.get_mut(&kind)
    }

    pub fn has_component(&self, entity: EntityId, kind: ComponentKind) -> bool {
        self.get_component(entity, kind).is_some()
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    /// Entities carrying every one of the given kinds
    ///
    /// The intersection across kind indices; empty (not an error) if any
    /// kind has no registrants.
    pub fn entities_with(&self, kinds: &[ComponentKind]) -> AHashSet<EntityId> {
        let mut sets = Vec::with_capacity(kinds.len());
        for kind in kinds {
            match self.indices.get(kind) {
                Some(set) => sets.push(set),
                None => return AHashSet::new(),
            }
        }
        let Some((&first, rest)) = sets.split_first() else {
            return AHashSet::new();
        };
        first
            .iter()
            .copied()
            .filter(|id| rest.iter().all(|set| set.contains(id)))
            .collect()
    }

    /// Delete an entity and all its components atomically
    ///
    /// Subsequent queries for the id report absence; removal of an
    /// unknown id is a no-op.
    pub fn remove_entity(&mut self, entity: EntityId) {
        if let Some(components) = self.entities.remove(&entity) {
            for kind in components.keys() {
                if let Some(index) = self.indices.get_mut(kind) {
                    index.remove(&entity);
                }
            }
        }
    }

    typed_accessors! {
        position, position_mut, Position, Position;
        stats, stats_mut, Stats, Stats;
        info, info_mut, Info, Info;
        item, item_mut, Item, Item;
        inventory, inventory_mut, Inventory, Inventory;
        equipment, equipment_mut, Equipment, Equipment;
        skills, skills_mut, Skills, Skills;
        spell_book, spell_book_mut, SpellBook, SpellBook;
        resources, resources_mut, Resources, Resources;
    }
}
