//! Most-recently-used ordering of activated contents.
//!
//! The chain is a doubly-linked list whose links are stored in a side table
//! keyed by [`ContentId`], so no content owns a pointer to another. Contents
//! that were registered but never focused wait in an unordered holding set.

use std::collections::BTreeMap;

use super::ContentId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Link {
    previous: Option<ContentId>,
    next: Option<ContentId>,
}

#[derive(Debug, Clone, Default)]
pub struct ActivationList {
    links: BTreeMap<ContentId, Link>,
    // head of the chain
    last: Option<ContentId>,
    holding: Vec<ContentId>,
}

impl ActivationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn most_recent(&self) -> Option<ContentId> {
        self.last
    }

    pub fn previous(&self, content: ContentId) -> Option<ContentId> {
        self.links.get(&content).and_then(|link| link.previous)
    }

    pub fn next(&self, content: ContentId) -> Option<ContentId> {
        self.links.get(&content).and_then(|link| link.next)
    }

    /// A content with no `next` link is in the chain only when it is the head.
    pub fn is_in_chain(&self, content: ContentId) -> bool {
        self.next(content).is_some() || self.last == Some(content)
    }

    pub fn is_holding(&self, content: ContentId) -> bool {
        self.holding.contains(&content)
    }

    pub fn contains(&self, content: ContentId) -> bool {
        self.is_in_chain(content) || self.is_holding(content)
    }

    pub fn holding(&self) -> &[ContentId] {
        &self.holding
    }

    /// Number of contents tracked, chained or holding.
    pub fn len(&self) -> usize {
        self.links.len() + self.holding.len()
    }

    pub fn chain_len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add_to_holding(&mut self, content: ContentId) {
        if self.is_holding(content) || self.is_in_chain(content) {
            return;
        }
        self.holding.push(content);
    }

    /// Drop `content` from wherever it is. Absent contents are ignored.
    pub fn remove(&mut self, content: ContentId) {
        self.unlink(content);
        self.holding.retain(|c| *c != content);
    }

    fn unlink(&mut self, content: ContentId) {
        if !self.is_in_chain(content) {
            return;
        }
        let link = self.links.remove(&content).unwrap_or_default();
        if self.last == Some(content) {
            self.last = link.previous;
        }
        if let Some(previous) = link.previous
            && let Some(entry) = self.links.get_mut(&previous)
        {
            entry.next = link.next;
        }
        if let Some(next) = link.next
            && let Some(entry) = self.links.get_mut(&next)
        {
            entry.previous = link.previous;
        }
    }

    /// Make `content` the head of the chain.
    pub fn promote(&mut self, content: ContentId) {
        let last = self.last;
        if last == Some(content) {
            return;
        }
        self.remove(content);
        self.links.insert(
            content,
            Link {
                previous: last,
                next: None,
            },
        );
        if let Some(previous) = last
            && let Some(entry) = self.links.get_mut(&previous)
        {
            entry.next = Some(content);
        }
        self.last = Some(content);
    }

    /// Replacement to activate when `content` gives up focus.
    ///
    /// When `content` is the head its predecessor wins; otherwise the head
    /// itself. Without a chain candidate the most recently inserted holding
    /// entry is used.
    pub fn fallback_for(&self, content: ContentId) -> Option<ContentId> {
        let candidate = if self.last == Some(content) {
            self.previous(content)
        } else {
            self.last
        };
        candidate.or_else(|| self.holding.last().copied())
    }

    /// Walk the chain from most to least recent.
    pub fn iter_most_recent(&self) -> MostRecent<'_> {
        MostRecent {
            list: self,
            cursor: self.last,
            remaining: self.links.len(),
        }
    }

    pub fn clear(&mut self) {
        self.links.clear();
        self.holding.clear();
        self.last = None;
    }
}

pub struct MostRecent<'a> {
    list: &'a ActivationList,
    cursor: Option<ContentId>,
    // bounds the walk even if links were corrupted
    remaining: usize,
}

impl Iterator for MostRecent<'_> {
    type Item = ContentId;

    fn next(&mut self) -> Option<ContentId> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.cursor?;
        self.remaining -= 1;
        self.cursor = self.list.previous(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(index: usize) -> ContentId {
        ContentId::new(index)
    }

    fn order(list: &ActivationList) -> Vec<usize> {
        list.iter_most_recent().map(ContentId::index).collect()
    }

    #[test]
    fn promote_orders_most_recent_first() {
        let mut list = ActivationList::new();
        for id in [0, 1, 2] {
            list.promote(c(id));
        }
        list.promote(c(0));
        assert_eq!(order(&list), vec![0, 2, 1]);
        assert_eq!(list.most_recent(), Some(c(0)));
        assert_eq!(list.next(c(2)), Some(c(0)));
        assert_eq!(list.previous(c(1)), None);
    }

    #[test]
    fn promote_sequences_never_form_cycles() {
        // deterministic pseudo-random sequence over eight contents
        let mut list = ActivationList::new();
        let mut seed: u64 = 0x9e37_79b9;
        let mut promoted = std::collections::BTreeSet::new();
        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let id = ((seed >> 33) % 8) as usize;
            list.promote(c(id));
            promoted.insert(id);

            let walk = order(&list);
            let unique: std::collections::BTreeSet<_> = walk.iter().copied().collect();
            assert_eq!(walk.len(), unique.len(), "chain revisited a content");
            assert_eq!(unique, promoted);
            assert_eq!(walk[0], id);
        }
    }

    #[test]
    fn remove_is_idempotent() {
        let mut once = ActivationList::new();
        let mut twice = ActivationList::new();
        for list in [&mut once, &mut twice] {
            list.add_to_holding(c(9));
            for id in [0, 1, 2, 3] {
                list.promote(c(id));
            }
        }
        once.remove(c(1));
        twice.remove(c(1));
        twice.remove(c(1));
        assert_eq!(order(&once), order(&twice));
        assert_eq!(order(&once), vec![3, 2, 0]);
        assert_eq!(once.holding(), twice.holding());

        // removing the head moves it to the predecessor
        once.remove(c(3));
        assert_eq!(once.most_recent(), Some(c(2)));
        assert_eq!(once.next(c(2)), None);
    }

    #[test]
    fn holding_and_chain_are_disjoint() {
        let mut list = ActivationList::new();
        list.add_to_holding(c(1));
        list.add_to_holding(c(1));
        assert_eq!(list.holding(), &[c(1)]);
        assert_eq!(list.len(), 1);
        assert_eq!(list.chain_len(), 0);
        assert!(!list.is_empty());

        list.promote(c(1));
        assert!(list.holding().is_empty());
        assert!(list.is_in_chain(c(1)));

        list.add_to_holding(c(1));
        assert!(list.holding().is_empty());
        assert_eq!(list.len(), 1);
        assert_eq!(list.chain_len(), 1);
    }

    #[test]
    fn tail_without_next_is_not_in_chain_unless_head() {
        let mut list = ActivationList::new();
        list.promote(c(0));
        assert!(list.is_in_chain(c(0)));
        list.promote(c(1));
        assert!(list.is_in_chain(c(0)));
        assert!(!list.is_in_chain(c(5)));
    }

    #[test]
    fn fallback_prefers_predecessor_then_holding() {
        let mut list = ActivationList::new();
        list.add_to_holding(c(7));
        list.add_to_holding(c(8));
        assert_eq!(list.fallback_for(c(0)), Some(c(8)));

        list.promote(c(0));
        assert_eq!(list.fallback_for(c(0)), Some(c(8)));

        list.promote(c(1));
        assert_eq!(list.fallback_for(c(1)), Some(c(0)));
        // giving up a non-head content hands focus to the head
        assert_eq!(list.fallback_for(c(0)), Some(c(1)));

        list.clear();
        assert_eq!(list.fallback_for(c(1)), None);
        assert!(list.is_empty());
    }
}
