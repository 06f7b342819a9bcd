use std::collections::HashSet;

use crate::models::{Marker, MarkerId};

/// Orders full-snapshot reloads. Higher tickets were issued later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReloadTicket(u64);

/// Client-side mirror of the server's markers.
///
/// Only ever replaced wholesale by a snapshot; never patched. A snapshot
/// from a reload issued before the one currently applied is discarded.
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    last_issued: u64,
    last_applied: u64,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_reload(&mut self) -> ReloadTicket {
        self.last_issued += 1;
        ReloadTicket(self.last_issued)
    }

    /// Apply a snapshot. Returns `false` if a newer snapshot is already in
    /// place. Duplicate ids keep their first occurrence.
    pub fn finish_reload(&mut self, ticket: ReloadTicket, markers: Vec<Marker>) -> bool {
        if ticket.0 <= self.last_applied {
            tracing::debug!(
                ticket = ticket.0,
                applied = self.last_applied,
                "discarding out-of-order marker snapshot"
            );
            return false;
        }
        let mut seen = HashSet::with_capacity(markers.len());
        self.markers = markers
            .into_iter()
            .filter(|m| seen.insert(m.id.clone()))
            .collect();
        self.last_applied = ticket.0;
        true
    }

    /// Whether any snapshot has been applied yet.
    pub fn is_loaded(&self) -> bool {
        self.last_applied > 0
    }

    pub fn get(&self, id: &MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| &m.id == id)
    }

    pub fn contains(&self, id: &MarkerId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl<'a> IntoIterator for &'a MarkerStore {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
