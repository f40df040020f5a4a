//! Immutable, copy-on-write collection snapshots.

use console_core::Resource;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
struct Inner<R: Resource> {
    order: Vec<R::Id>,
    by_id: HashMap<R::Id, Arc<R>>,
}

impl<R: Resource> Clone for Inner<R> {
    fn clone(&self) -> Self {
        Self {
            order: self.order.clone(),
            by_id: self.by_id.clone(),
        }
    }
}

/// Ordered, keyed set of entities of one resource type.
///
/// Cloning is cheap. Mutating methods are crate-private and copy the
/// shared state first, so a snapshot handed to the UI never changes.
#[derive(Debug)]
pub struct Collection<R: Resource> {
    inner: Arc<Inner<R>>,
}

impl<R: Resource> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Resource> Default for Collection<R> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Inner {
                order: Vec::new(),
                by_id: HashMap::new(),
            }),
        }
    }
}

impl<R: Resource> PartialEq for Collection<R> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b))
    }
}

impl<R: Resource> Collection<R> {
    /// Build from server order. Later duplicates of an id replace earlier
    /// ones in place.
    pub fn from_vec(items: Vec<R>) -> Self {
        let mut inner = Inner {
            order: Vec::with_capacity(items.len()),
            by_id: HashMap::with_capacity(items.len()),
        };
        for item in items {
            let id = item.id().clone();
            if inner.by_id.insert(id.clone(), Arc::new(item)).is_none() {
                inner.order.push(id);
            }
        }
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.order.is_empty()
    }

    pub fn get(&self, id: &R::Id) -> Option<&Arc<R>> {
        self.inner.by_id.get(id)
    }

    pub fn contains(&self, id: &R::Id) -> bool {
        self.inner.by_id.contains_key(id)
    }

    pub fn position(&self, id: &R::Id) -> Option<usize> {
        self.inner.order.iter().position(|candidate| candidate == id)
    }

    /// Entities in server/insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<R>> + '_ {
        self.inner
            .order
            .iter()
            .filter_map(move |id| self.inner.by_id.get(id))
    }

    pub fn to_vec(&self) -> Vec<R> {
        self.iter().map(|item| R::clone(item)).collect()
    }

    /// Append, or replace in place when the id is already present.
    pub(crate) fn upsert(&mut self, item: R) {
        let inner = Arc::make_mut(&mut self.inner);
        let id = item.id().clone();
        if inner.by_id.insert(id.clone(), Arc::new(item)).is_none() {
            inner.order.push(id);
        }
    }

    pub(crate) fn remove(&mut self, id: &R::Id) -> Option<Arc<R>> {
        if !self.contains(id) {
            return None;
        }
        let inner = Arc::make_mut(&mut self.inner);
        inner.order.retain(|candidate| candidate != id);
        inner.by_id.remove(id)
    }
}

impl<'a, R: Resource> IntoIterator for &'a Collection<R> {
    type Item = &'a Arc<R>;
    type IntoIter = Box<dyn Iterator<Item = &'a Arc<R>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_core::{Role, RoleId};

    fn role(id: &str, name: &str, level: u8) -> Role {
        Role {
            id: RoleId::new(id),
            number: String::new(),
            name: name.to_string(),
            level,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_preserves_server_order() {
        let collection = Collection::from_vec(vec![
            role("c", "Viewer", 1),
            role("a", "Administrator", 5),
            role("b", "Manager", 4),
        ]);
        let names: Vec<&str> = collection.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Viewer", "Administrator", "Manager"]);
        assert_eq!(collection.position(&RoleId::new("b")), Some(2));
    }

    #[test]
    fn test_snapshots_are_isolated() {
        let mut live = Collection::from_vec(vec![role("a", "Administrator", 5)]);
        let snapshot = live.clone();
        live.upsert(role("b", "Manager", 4));
        live.remove(&RoleId::new("a"));
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains(&RoleId::new("a")));
        assert_eq!(live.len(), 1);
        assert!(live.contains(&RoleId::new("b")));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut live = Collection::from_vec(vec![role("a", "Admin", 5), role("b", "Manager", 4)]);
        live.upsert(role("a", "Administrator", 5));
        assert_eq!(live.len(), 2);
        assert_eq!(live.position(&RoleId::new("a")), Some(0));
        assert_eq!(live.get(&RoleId::new("a")).unwrap().name, "Administrator");
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut live: Collection<Role> = Collection::default();
        assert!(live.remove(&RoleId::new("x")).is_none());
        assert!(live.is_empty());
    }

    #[test]
    fn test_value_equality() {
        let a = Collection::from_vec(vec![role("a", "Admin", 5)]);
        let b = Collection::from_vec(vec![role("a", "Admin", 5)]);
        assert_eq!(a, b);
        assert_eq!(a.to_vec(), b.to_vec());
    }
}
