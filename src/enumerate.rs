//! Resumable enumerators.
//!
//! Every combinatorial space in the crate (digestion windows, modification
//! counts, modification placements, candidate masses) is walked through the
//! [`Enumerator`] trait: a state machine whose [`advance`](Enumerator::advance)
//! either produces the next value or reports exhaustion. An exhausted
//! enumerator resets itself to its initial position, so driving it again
//! replays the same sequence.
//!
//! [`EnumIter`] adapts any enumerator to a standard [`Iterator`], keeping the
//! last produced value available by reference.
//!
//! ```rust
//! use xlsearch::enumerate::{Enumerator, Step};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Countdown {
//!     from: u32,
//!     next: Option<u32>,
//! }
//!
//! impl Enumerator for Countdown {
//!     type Item = u32;
//!
//!     fn advance(&mut self) -> Step<u32> {
//!         let current = self.next.unwrap_or(self.from);
//!         if current == 0 {
//!             self.next = None;
//!             return Step::Exhausted;
//!         }
//!         self.next = Some(current - 1);
//!         Step::Produced(current)
//!     }
//! }
//!
//! let values: Vec<u32> = Countdown { from: 3, next: None }.into_iter_adapter().collect();
//! assert_eq!(values, vec![3, 2, 1]);
//! ```

/// Outcome of a single [`Enumerator::advance`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    /// The next value in the enumeration.
    Produced(T),
    /// No values remain; the enumerator is back at its initial position.
    Exhausted,
}

impl<T> Step<T> {
    /// Convert into an `Option`, mapping exhaustion to `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Step::Produced(value) => Some(value),
            Step::Exhausted => None,
        }
    }

    /// Whether this step produced a value.
    pub fn is_produced(&self) -> bool {
        matches!(self, Step::Produced(_))
    }
}

/// A resumable computation over an ordered sequence of values.
///
/// Implementors keep every piece of state that must survive between values
/// as struct fields. On exhaustion the implementor must leave itself in its
/// initial state.
pub trait Enumerator {
    /// Value produced by each step.
    type Item;

    /// Produce the next value, or report exhaustion and reset.
    fn advance(&mut self) -> Step<Self::Item>;

    /// Wrap this enumerator as a standard iterator.
    fn into_iter_adapter(self) -> EnumIter<Self>
    where
        Self: Sized,
    {
        EnumIter::new(self)
    }

    /// Keep only values accepted by `predicate`.
    fn filtered<F>(self, predicate: F) -> Filtered<Self, F>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> bool,
    {
        Filtered {
            inner: self,
            predicate,
        }
    }
}

impl<E: Enumerator + ?Sized> Enumerator for Box<E> {
    type Item = E::Item;

    fn advance(&mut self) -> Step<Self::Item> {
        (**self).advance()
    }
}

/// Enumerator adapter that skips values rejected by a predicate.
#[derive(Debug, Clone)]
pub struct Filtered<E, F> {
    inner: E,
    predicate: F,
}

impl<E, F> Filtered<E, F> {
    /// Access the wrapped enumerator.
    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E, F> Enumerator for Filtered<E, F>
where
    E: Enumerator,
    F: FnMut(&E::Item) -> bool,
{
    type Item = E::Item;

    fn advance(&mut self) -> Step<E::Item> {
        loop {
            match self.inner.advance() {
                Step::Produced(value) if (self.predicate)(&value) => {
                    return Step::Produced(value)
                }
                Step::Produced(_) => continue,
                Step::Exhausted => return Step::Exhausted,
            }
        }
    }
}

/// Cartesian product of enumerators, advanced like an odometer.
///
/// The first wheel turns fastest; when it is exhausted it restarts and the
/// next wheel advances by one. Each produced value holds one item per wheel.
/// With no wheels a single empty product is produced. If any wheel produces
/// nothing, the product is empty.
#[derive(Debug, Clone)]
pub struct Odometer<E: Enumerator> {
    initial: Vec<E>,
    wheels: Vec<E>,
    current: Vec<E::Item>,
    started: bool,
}

impl<E> Odometer<E>
where
    E: Enumerator + Clone,
    E::Item: Clone,
{
    /// Combine `wheels`, fastest first.
    pub fn new(wheels: Vec<E>) -> Self {
        Self {
            initial: wheels.clone(),
            wheels,
            current: Vec::new(),
            started: false,
        }
    }

    /// Number of wheels.
    pub fn len(&self) -> usize {
        self.initial.len()
    }

    /// Whether there are no wheels.
    pub fn is_empty(&self) -> bool {
        self.initial.is_empty()
    }

    fn reset(&mut self) -> Step<Vec<E::Item>> {
        self.wheels = self.initial.clone();
        self.current.clear();
        self.started = false;
        Step::Exhausted
    }
}

impl<E> Enumerator for Odometer<E>
where
    E: Enumerator + Clone,
    E::Item: Clone,
{
    type Item = Vec<E::Item>;

    fn advance(&mut self) -> Step<Vec<E::Item>> {
        if !self.started {
            let mut current = Vec::with_capacity(self.wheels.len());
            for wheel in &mut self.wheels {
                match wheel.advance() {
                    Step::Produced(value) => current.push(value),
                    Step::Exhausted => return self.reset(),
                }
            }
            self.started = true;
            self.current = current;
            return Step::Produced(self.current.clone());
        }

        for index in 0..self.wheels.len() {
            if let Step::Produced(value) = self.wheels[index].advance() {
                self.current[index] = value;
                return Step::Produced(self.current.clone());
            }
            // wheel wrapped: restart it and carry into the next one
            match self.wheels[index].advance() {
                Step::Produced(value) => self.current[index] = value,
                Step::Exhausted => return self.reset(),
            }
        }
        self.reset()
    }
}

impl<E> PartialEq for Odometer<E>
where
    E: Enumerator + PartialEq,
    E::Item: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.wheels == other.wheels
            && self.current == other.current
            && self.started == other.started
    }
}

/// Forward, single-pass iterator over an [`Enumerator`].
///
/// A default-constructed adapter is the end sentinel: it holds no enumerator
/// and yields nothing. Once the wrapped enumerator is exhausted the adapter
/// becomes equal to the sentinel.
#[derive(Debug)]
pub struct EnumIter<E: Enumerator> {
    enumerator: Option<E>,
    current: Option<E::Item>,
}

impl<E: Enumerator> Default for EnumIter<E> {
    fn default() -> Self {
        Self {
            enumerator: None,
            current: None,
        }
    }
}

impl<E: Enumerator> EnumIter<E> {
    /// Wrap an enumerator. Nothing is produced until the first `next`.
    pub fn new(enumerator: E) -> Self {
        Self {
            enumerator: Some(enumerator),
            current: None,
        }
    }

    /// The value produced by the most recent advance, if any.
    pub fn get(&self) -> Option<&E::Item> {
        self.current.as_ref()
    }

    /// The wrapped enumerator, unless the adapter has reached the end.
    pub fn enumerator(&self) -> Option<&E> {
        self.enumerator.as_ref()
    }

    /// Whether this adapter has reached the end sentinel.
    pub fn is_end(&self) -> bool {
        self.enumerator.is_none()
    }

    /// Advance the wrapped enumerator, returning a reference to the new value.
    pub fn step(&mut self) -> Option<&E::Item> {
        let step = match self.enumerator.as_mut() {
            Some(enumerator) => enumerator.advance(),
            None => return None,
        };
        match step {
            Step::Produced(value) => {
                self.current = Some(value);
                self.current.as_ref()
            }
            Step::Exhausted => {
                self.enumerator = None;
                self.current = None;
                None
            }
        }
    }
}

impl<E> Iterator for EnumIter<E>
where
    E: Enumerator,
    E::Item: Clone,
{
    type Item = E::Item;

    fn next(&mut self) -> Option<E::Item> {
        self.step().cloned()
    }
}

impl<E> PartialEq for EnumIter<E>
where
    E: Enumerator + PartialEq,
    E::Item: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        match (&self.enumerator, &other.enumerator) {
            (None, None) => true,
            (Some(lhs), Some(rhs)) => lhs == rhs && self.current == other.current,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct UpTo {
        limit: u32,
        position: u32,
    }

    impl UpTo {
        fn new(limit: u32) -> Self {
            Self { limit, position: 0 }
        }
    }

    impl Enumerator for UpTo {
        type Item = u32;

        fn advance(&mut self) -> Step<u32> {
            if self.position == self.limit {
                self.position = 0;
                return Step::Exhausted;
            }
            self.position += 1;
            Step::Produced(self.position)
        }
    }

    #[test]
    fn test_exhaustion_resets_state() {
        let mut up_to = UpTo::new(2);
        assert_eq!(up_to.advance(), Step::Produced(1));
        assert_eq!(up_to.advance(), Step::Produced(2));
        assert_eq!(up_to.advance(), Step::Exhausted);
        assert_eq!(up_to, UpTo::new(2));
        assert_eq!(up_to.advance(), Step::Produced(1));
    }

    #[test]
    fn test_adapter_collects_in_order() {
        let values: Vec<u32> = UpTo::new(4).into_iter_adapter().collect();
        assert_eq!(values, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_adapter_reaches_end_sentinel() {
        let mut iter = UpTo::new(1).into_iter_adapter();
        assert!(iter.get().is_none());
        assert_eq!(iter.step(), Some(&1));
        assert_eq!(iter.get(), Some(&1));
        assert_ne!(iter, EnumIter::default());
        assert_eq!(iter.step(), None);
        assert!(iter.is_end());
        assert_eq!(iter, EnumIter::default());
    }

    #[test]
    fn test_adapter_equality_tracks_position() {
        let mut a = UpTo::new(3).into_iter_adapter();
        let mut b = UpTo::new(3).into_iter_adapter();
        a.step();
        assert_ne!(a, b);
        b.step();
        assert_eq!(a, b);
    }

    #[test]
    fn test_filtered_skips_rejected_values() {
        let evens: Vec<u32> = UpTo::new(7)
            .filtered(|v| v % 2 == 0)
            .into_iter_adapter()
            .collect();
        assert_eq!(evens, vec![2, 4, 6]);
    }

    #[test]
    fn test_odometer_first_wheel_fastest() {
        let products: Vec<Vec<u32>> = Odometer::new(vec![UpTo::new(2), UpTo::new(3)])
            .into_iter_adapter()
            .collect();
        assert_eq!(
            products,
            vec![
                vec![1, 1],
                vec![2, 1],
                vec![1, 2],
                vec![2, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[test]
    fn test_odometer_without_wheels_produces_once() {
        let mut odometer: Odometer<UpTo> = Odometer::new(Vec::new());
        assert_eq!(odometer.advance(), Step::Produced(Vec::new()));
        assert_eq!(odometer.advance(), Step::Exhausted);
        assert_eq!(odometer.advance(), Step::Produced(Vec::new()));
    }

    #[test]
    fn test_odometer_with_empty_wheel_is_empty() {
        let odometer = Odometer::new(vec![UpTo::new(2), UpTo::new(0)]);
        assert_eq!(odometer.into_iter_adapter().count(), 0);
    }

    #[test]
    fn test_odometer_replays_after_exhaustion() {
        let mut odometer = Odometer::new(vec![UpTo::new(2), UpTo::new(2)]);
        let first: Vec<_> = std::iter::from_fn(|| odometer.advance().into_option()).collect();
        let second: Vec<_> = std::iter::from_fn(|| odometer.advance().into_option()).collect();
        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_enumerator() {
        let values: Vec<u32> = UpTo::new(0).into_iter_adapter().collect();
        assert!(values.is_empty());
    }
}
