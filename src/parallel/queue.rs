use crossbeam::queue::SegQueue;

/// Shared pull queue drained by the workers of one concurrent call.
///
/// Seeded once with the whole input; afterwards items only leave. `pop` is
/// lock-free, so a worker awaiting its action never blocks the others.
#[derive(Debug)]
pub struct WorkQueue<T> {
    items: SegQueue<T>,
}

impl<T> WorkQueue<T> {
    /// Enumerates `items` completely before returning.
    pub fn seeded(items: impl IntoIterator<Item = T>) -> Self {
        let queue = SegQueue::new();
        for item in items {
            queue.push(item);
        }
        Self { items: queue }
    }

    /// Takes the next item, or `None` once another worker emptied the queue.
    #[inline]
    pub fn pop(&self) -> Option<T> {
        self.items.pop()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
