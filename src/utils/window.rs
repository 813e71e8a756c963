use alloc::boxed::Box;

/// A fixed-capacity circular buffer holding the most recent observations.
///
/// Fills one element at a time until capacity is reached, after which every
/// push overwrites the oldest retained element and hands it back to the
/// caller.
#[derive(Debug, Clone)]
pub struct Window<T> {
    /// The buffer that stores the values
    buf: Box<[T]>,
    /// Index of the oldest retained element, the next slot to overwrite
    /// once the buffer is full
    head: usize,
    /// Number of elements currently retained, at most `buf.len()`
    len: usize,
}

impl<T: Default + Copy> Window<T> {
    /// Creates an empty window with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity can not be zero");

        Self {
            buf: vec![T::default(); capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    /// Returns the capacity of the window.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the number of elements currently retained.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` once `len` has reached capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Pushes a new value into the window.
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The evicted element if the window was already full,
    ///   `None` while still filling
    pub fn push(&mut self, value: T) -> Option<T> {
        let cap = self.capacity();

        if self.is_full() {
            let evicted = core::mem::replace(&mut self.buf[self.head], value);
            self.head = (self.head + 1) % cap;
            Some(evicted)
        } else {
            let insert_at = (self.head + self.len) % cap;
            self.buf[insert_at] = value;
            self.len += 1;
            None
        }
    }

    /// Clears the buffer, resetting its state.
    pub fn reset(&mut self) {
        self.buf.fill(T::default());
        self.head = 0;
        self.len = 0;
    }

    /// Returns an iterator over the retained elements in logical
    /// (oldest to newest) order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.len).map(move |i| &self.buf[(self.head + i) % self.capacity()])
    }
}

#[cfg(test)]
mod tests {
    use super::Window;

    use alloc::vec::Vec;

    #[test]
    fn push_fills_then_evicts() {
        let mut win = Window::new(3);
        assert_eq!(win.push(1), None);
        assert_eq!(win.push(2), None);
        assert_eq!(win.push(3), None);
        assert!(win.is_full());

        assert_eq!(win.push(4), Some(1));
        assert_eq!(win.push(5), Some(2));
        assert_eq!(win.len(), 3);
    }

    #[test]
    fn iter_is_oldest_to_newest() {
        let mut win = Window::new(3);
        win.push(5);
        win.push(6);
        assert_eq!(win.iter().copied().collect::<Vec<_>>(), vec![5, 6]);

        win.push(7);
        win.push(8);
        assert_eq!(win.iter().copied().collect::<Vec<_>>(), vec![6, 7, 8]);
    }

    #[test]
    fn reset_clears_state() {
        let mut win = Window::new(2);
        win.push(1.0);
        win.push(2.0);
        assert!(win.is_full());

        win.reset();
        assert_eq!(win.len(), 0);
        assert!(!win.is_full());

        assert_eq!(win.push(3.0), None);
        assert_eq!(win.len(), 1);
    }

    #[test]
    #[should_panic(expected = "window capacity can not be zero")]
    fn zero_capacity_panics() {
        let _win: Window<i32> = Window::new(0);
    }
}
