//! Urgency ordering shared by sorting and heap extraction.
//!
//! Items are ranked by priority date, then by priority time where timed
//! items come before untimed ones. Items that still compare equal keep
//! their insertion order, both in [`sort_by_priority`] and in
//! [`PriorityQueue`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::agenda::AgendaEntry;
use crate::item::PriorityItem;

/// Sort key of an agenda item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriorityKey {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl PriorityKey {
    pub fn new(date: NaiveDate, time: Option<NaiveTime>) -> Self {
        Self { date, time }
    }

    pub fn of<T: PriorityItem + ?Sized>(item: &T) -> Self {
        Self::new(item.priority_date(), item.priority_time())
    }
}

impl Ord for PriorityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| match (self.time, other.time) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two items by urgency; `Less` means `a` is more urgent.
pub fn compare_priority<A, B>(a: &A, b: &B) -> Ordering
where
    A: PriorityItem + ?Sized,
    B: PriorityItem + ?Sized,
{
    PriorityKey::of(a).cmp(&PriorityKey::of(b))
}

/// Stable sort of entries by urgency.
pub fn sort_by_priority(entries: &mut [AgendaEntry<'_>]) {
    entries.sort_by(|a, b| compare_priority(a.item, b.item));
}

struct HeapSlot<T> {
    key: PriorityKey,
    seq: u64,
    value: T,
}

impl<T> PartialEq for HeapSlot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl<T> Eq for HeapSlot<T> {}

impl<T> Ord for HeapSlot<T> {
    // BinaryHeap is a max-heap: reverse so the most urgent, earliest
    // inserted slot sits on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for HeapSlot<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of values keyed by [`PriorityKey`], O(log n) push and pop.
pub struct PriorityQueue<T> {
    heap: BinaryHeap<HeapSlot<T>>,
    next_seq: u64,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, key: PriorityKey, value: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(HeapSlot { key, seq, value });
    }

    /// Remove and return the most urgent value.
    pub fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|slot| slot.value)
    }

    pub fn peek_key(&self) -> Option<PriorityKey> {
        self.heap.peek().map(|slot| slot.key)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drain every value in urgency order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.heap.len());
        while let Some(value) = self.pop() {
            out.push(value);
        }
        out
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Extend<AgendaEntry<'a>> for PriorityQueue<AgendaEntry<'a>> {
    fn extend<I: IntoIterator<Item = AgendaEntry<'a>>>(&mut self, iter: I) {
        for entry in iter {
            self.push(entry.key(), entry);
        }
    }
}
