use crate::error::{Error, Result};
use crate::node::Node;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry holding a snapshot of a node's key at insertion time.
struct SmallestCostHolder {
    estimated_cost: f64,
    cost: f64,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // First orders per estimated cost, then creates subordering
        // based on cost, favoring exploration of the deepest nodes first
        match other.estimated_cost.total_cmp(&self.estimated_cost) {
            Ordering::Equal => self.cost.total_cmp(&other.cost),
            s => s,
        }
    }
}

/// Binary min-heap of arena indices keyed by the `f` value of the node at insertion time.
///
/// There is no decrease-key: a node whose key improves is simply inserted again. The search
/// recognizes the outdated entries on extraction since their node is already closed by then.
#[derive(Default)]
pub struct PriorityQueue {
    heap: BinaryHeap<SmallestCostHolder>,
}

impl PriorityQueue {
    pub fn new() -> PriorityQueue {
        PriorityQueue::default()
    }
    pub fn insert(&mut self, index: usize, node: &Node) {
        self.heap.push(SmallestCostHolder {
            estimated_cost: node.f(),
            cost: node.g(),
            index,
        });
    }
    /// Removes and returns the index with the smallest key.
    pub fn extract_min(&mut self) -> Result<usize> {
        self.heap
            .pop()
            .map(|holder| holder.index)
            .ok_or(Error::EmptyQueue)
    }
    pub fn size(&self) -> usize {
        self.heap.len()
    }
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Heapifies all entries at once instead of sifting them up one by one.
impl<'a> FromIterator<(usize, &'a Node)> for PriorityQueue {
    fn from_iter<I: IntoIterator<Item = (usize, &'a Node)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(index, node)| SmallestCostHolder {
                estimated_cost: node.f(),
                cost: node.g(),
                index,
            })
            .collect::<Vec<_>>();
        PriorityQueue {
            heap: BinaryHeap::from(entries),
        }
    }
}
