//! A binary max-heap whose entries can be removed after they were pushed.
//!
//! Pushing an entry returns an [`EventIdx`] handle. The queue keeps track of
//! where in the heap every handle currently lives, so that [`EventQueue::remove`]
//! can take out an arbitrary entry in logarithmic time. The sweep uses this to
//! cancel circle events that later changes to the beachline made obsolete.

typed_vec!(
    /// A handle to an entry of an [`EventQueue`].
    EventIdx,
    /// Storage for queue entries, indexed by [`EventIdx`].
    EventVec,
    "ev"
);

#[derive(Clone, Debug)]
struct Slot<T> {
    entry: Option<T>,
    heap_pos: usize,
}

/// A max-heap supporting removal by handle.
///
/// Handles of popped or removed entries are recycled, so a handle must not be
/// used after its entry has left the queue.
#[derive(Clone, Debug)]
pub struct EventQueue<T> {
    heap: Vec<EventIdx>,
    slots: EventVec<Slot<T>>,
    free: Vec<EventIdx>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        EventQueue {
            heap: Vec::new(),
            slots: EventVec::default(),
            free: Vec::new(),
        }
    }
}

impl<T: Ord> EventQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of entries in the queue.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Is the queue empty?
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Is the entry with this handle still in the queue?
    pub fn contains(&self, idx: EventIdx) -> bool {
        self.slots.get(idx).is_some_and(|slot| slot.entry.is_some())
    }

    /// Adds an entry, returning a handle that can be used to remove it.
    pub fn push(&mut self, entry: T) -> EventIdx {
        let heap_pos = self.heap.len();
        let slot = Slot {
            entry: Some(entry),
            heap_pos,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => self.slots.push(slot),
        };
        self.heap.push(idx);
        self.sift_up(heap_pos);
        idx
    }

    /// The largest entry, if there is one.
    pub fn peek(&self) -> Option<&T> {
        self.heap
            .first()
            .and_then(|&idx| self.slots[idx].entry.as_ref())
    }

    /// Removes and returns the largest entry, or `None` if the queue is empty.
    pub fn pop(&mut self) -> Option<T> {
        let idx = *self.heap.first()?;
        self.remove(idx)
    }

    /// Removes the entry with this handle.
    ///
    /// Returns `None` if that entry is no longer in the queue.
    pub fn remove(&mut self, idx: EventIdx) -> Option<T> {
        let slot = self.slots.get_mut(idx)?;
        let entry = slot.entry.take()?;
        let pos = slot.heap_pos;

        let last = self.heap.len() - 1;
        self.swap(pos, last);
        self.heap.pop();
        self.free.push(idx);
        if pos < self.heap.len() {
            self.sift_up(pos);
            self.sift_down(pos);
        }

        #[cfg(feature = "slow-asserts")]
        self.check_invariants();

        Some(entry)
    }

    fn entry_at(&self, pos: usize) -> Option<&T> {
        self.slots[self.heap[pos]].entry.as_ref()
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        let (idx_a, idx_b) = (self.heap[a], self.heap[b]);
        self.slots[idx_a].heap_pos = a;
        self.slots[idx_b].heap_pos = b;
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.entry_at(pos) <= self.entry_at(parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut largest = pos;
            if left < self.heap.len() && self.entry_at(left) > self.entry_at(largest) {
                largest = left;
            }
            if right < self.heap.len() && self.entry_at(right) > self.entry_at(largest) {
                largest = right;
            }
            if largest == pos {
                break;
            }
            self.swap(pos, largest);
            pos = largest;
        }
    }

    /// Panics if the heap order or the handle bookkeeping is broken.
    pub fn check_invariants(&self) {
        for (pos, &idx) in self.heap.iter().enumerate() {
            assert_eq!(self.slots[idx].heap_pos, pos);
            assert!(self.slots[idx].entry.is_some());
            if pos > 0 {
                assert!(self.entry_at(pos) <= self.entry_at((pos - 1) / 2));
            }
        }
        let live = self.slots.iter().filter(|(_, s)| s.entry.is_some()).count();
        assert_eq!(live, self.heap.len());
        assert_eq!(live + self.free.len(), self.slots.len());
    }
}
