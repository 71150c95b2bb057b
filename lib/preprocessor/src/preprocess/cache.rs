use dashmap::{mapref::entry::Entry, DashMap};

use crate::model::{TypeNode, WeakTypeNode};

/// The outcome of visiting one node.
#[derive(Clone, Debug)]
pub enum Visited {
    Included(TypeNode),
    Excluded,
}

impl Visited {
    pub fn included(self) -> Option<TypeNode> {
        match self {
            Visited::Included(node) => Some(node),
            Visited::Excluded => None,
        }
    }
}

enum Slot {
    Included(WeakTypeNode),
    Excluded,
}

impl Slot {
    fn new(visited: &Visited) -> Self {
        match visited {
            Visited::Included(node) => Slot::Included(node.downgrade()),
            Visited::Excluded => Slot::Excluded,
        }
    }

    /// `None` when the rewritten node has already been dropped.
    fn visited(&self) -> Option<Visited> {
        match self {
            Slot::Included(node) => node.upgrade().map(Visited::Included),
            Slot::Excluded => Some(Visited::Excluded),
        }
    }
}

/// Remembers the outcome of every node visited during one preprocessing run, keyed by
/// [`TypeNode::identity`].
///
/// Member maps of rewritten composites materialize lazily and may do so from several
/// threads, so a slot is claimed by the first outcome committed for it and every later
/// commit observes that winner.
///
/// Rewritten composites and wrappers are held weakly: they keep the run alive, and the
/// run must not keep them alive in return. A slot whose node is gone counts as empty.
#[derive(Default)]
pub struct VisitCache {
    slots: DashMap<String, Slot>,
}

impl VisitCache {
    pub fn get(&self, identity: &str) -> Option<Visited> {
        self.slots.get(identity).and_then(|slot| slot.visited())
    }

    pub fn commit(&self, identity: String, visited: Visited) -> Visited {
        match self.slots.entry(identity) {
            Entry::Occupied(mut occupied) => match occupied.get().visited() {
                Some(winner) => winner,
                None => {
                    occupied.insert(Slot::new(&visited));
                    visited
                }
            },
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::new(&visited));
                visited
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{VisitCache, Visited};
    use crate::model::{scalar, Field, ObjectType, TypeNode};

    #[test]
    fn first_commit_wins() {
        let cache = VisitCache::default();
        let first = TypeNode::Scalar(scalar::string());

        let committed = cache.commit("String".to_string(), Visited::Included(first.clone()));
        let again = cache.commit("String".to_string(), Visited::Excluded);

        assert!(committed.included().is_some_and(|node| node.ptr_eq(&first)));
        assert!(again.included().is_some_and(|node| node.ptr_eq(&first)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn excluded_outcome_is_remembered() {
        let cache = VisitCache::default();
        assert!(cache.get("Secretβ").is_none());

        cache.commit("Secretβ".to_string(), Visited::Excluded);

        assert!(matches!(cache.get("Secretβ"), Some(Visited::Excluded)));
    }

    #[test]
    fn dropped_composites_are_not_kept_alive() {
        let cache = VisitCache::default();
        let user = || {
            ObjectType::new("User")
                .fields([Field::new("id", TypeNode::Scalar(scalar::id()))])
                .into_node()
        };

        let first = user();
        cache.commit("User".to_string(), Visited::Included(first.clone()));
        assert!(cache.get("User").is_some_and(|visited| {
            visited.included().is_some_and(|node| node.ptr_eq(&first))
        }));

        drop(first);
        assert!(cache.get("User").is_none());

        let second = user();
        let committed = cache.commit("User".to_string(), Visited::Included(second.clone()));
        assert!(committed.included().is_some_and(|node| node.ptr_eq(&second)));
        assert_eq!(cache.len(), 1);
    }
}
