//! Union-find resolution of co-delivery groups.
//!
//! Each "A must ship with B" relation unions the sets of A and B. Once all
//! relations are in, [`DependencyResolver::resolve`] freezes the partition
//! into [`DependencyGroups`], whose groups are plain owned sets that can be
//! copied onto packages without sharing.

use std::collections::BTreeSet;

use tracing::warn;

use crate::collections::OrderedMap;
use crate::models::{Constraint, Package, PackageId};

/// Incrementally merges packages that must ride together.
///
/// # Examples
///
/// ```
/// use package_routing::dependency::DependencyResolver;
/// use package_routing::models::PackageId;
///
/// let (a, b, c) = (PackageId::new(1), PackageId::new(2), PackageId::new(3));
/// let mut resolver = DependencyResolver::new();
/// resolver.relate(a, b);
/// resolver.relate(b, c);
///
/// let groups = resolver.resolve();
/// assert_eq!(groups.group_of(a), groups.group_of(c));
/// assert_eq!(groups.partners(a).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyResolver {
    index: OrderedMap<PackageId, usize>,
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DependencyResolver {
    /// Creates a resolver with no relations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `a` and `b` must ship on the same route.
    pub fn relate(&mut self, a: PackageId, b: PackageId) {
        let ia = self.slot(a);
        let ib = self.slot(b);
        self.union(ia, ib);
    }

    /// Records that `a` must ship with every package in `others`.
    pub fn relate_all(&mut self, a: PackageId, others: impl IntoIterator<Item = PackageId>) {
        let ia = self.slot(a);
        for b in others {
            let ib = self.slot(b);
            self.union(ia, ib);
        }
    }

    /// Number of packages seen in any relation.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no relation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Freezes the current partition.
    pub fn resolve(mut self) -> DependencyGroups {
        let ids: Vec<(PackageId, usize)> = self.index.iter().map(|(&id, &i)| (id, i)).collect();

        let mut root_group: OrderedMap<usize, usize> = OrderedMap::new();
        let mut groups: Vec<BTreeSet<PackageId>> = Vec::new();
        let mut membership = OrderedMap::new();

        for (id, i) in ids {
            let root = self.find(i);
            let group = match root_group.get(&root) {
                Some(&g) => g,
                None => {
                    groups.push(BTreeSet::new());
                    root_group.insert(root, groups.len() - 1);
                    groups.len() - 1
                }
            };
            groups[group].insert(id);
            membership.insert(id, group);
        }

        DependencyGroups { membership, groups }
    }

    fn slot(&mut self, id: PackageId) -> usize {
        if let Some(&i) = self.index.get(&id) {
            return i;
        }
        let i = self.parent.len();
        self.parent.push(i);
        self.rank.push(0);
        self.index.insert(id, i);
        i
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Immutable co-delivery groups produced by [`DependencyResolver::resolve`].
#[derive(Debug, Clone, Default)]
pub struct DependencyGroups {
    membership: OrderedMap<PackageId, usize>,
    groups: Vec<BTreeSet<PackageId>>,
}

impl DependencyGroups {
    /// The full group containing `id`, itself included.
    pub fn group_of(&self, id: PackageId) -> Option<&BTreeSet<PackageId>> {
        let g = *self.membership.get(&id)?;
        self.groups.get(g)
    }

    /// Group members other than `id`; `None` if `id` has no partners.
    pub fn partners(&self, id: PackageId) -> Option<BTreeSet<PackageId>> {
        let others: BTreeSet<PackageId> = self
            .group_of(id)?
            .iter()
            .copied()
            .filter(|&other| other != id)
            .collect();
        (!others.is_empty()).then_some(others)
    }

    /// All groups in order of first appearance.
    pub fn groups(&self) -> &[BTreeSet<PackageId>] {
        &self.groups
    }

    /// Writes each package's partners as its `MustShipWith` constraint.
    ///
    /// Packages without partners lose any stale `MustShipWith`. Group
    /// members missing from `packages` are reported and skipped.
    pub fn apply(&self, packages: &mut OrderedMap<PackageId, Package>) {
        for id in self.membership.keys() {
            if !packages.contains_key(id) {
                warn!("Co-delivery note references unknown package {}", id);
            }
        }
        for (&id, package) in packages.iter_mut() {
            match self.partners(id) {
                Some(others) => package.add_constraint(Constraint::MustShipWith(others)),
                None => package.remove_constraint(&Constraint::MustShipWith(BTreeSet::new())),
            }
        }
    }
}
