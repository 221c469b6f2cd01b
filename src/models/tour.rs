//! Tour representation backed by a successor array.
//!
//! A tour is an ordered sequence of distinct customer ids with three shapes:
//!
//! - **open** — no closing edge (`last` is `None`)
//! - **closed** — the tour returns to `first` (`last == Some(first)`)
//! - **fixed-endpoint** — the tour must end at a required distinct customer
//!   (`last == Some(l)` with `l != first`)
//!
//! The representation is a single array `next[c] = successor(c)`; the closing
//! edge of a closed tour is implicit and produced only by [`Tour::pairs`].
//! `insert_after`, `get_next_to`, and `contains` are O(1); `remove` walks to
//! the predecessor and is O(count).

use thiserror::Error;

/// Customer has no successor entry (not part of the tour).
const NOT_SET: usize = usize::MAX;
/// Customer is the final entry of the sequence.
const END: usize = usize::MAX - 1;

/// Errors raised by tour construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// The initial sequence was empty.
    #[error("tour sequence is empty")]
    Empty,
    /// A customer appeared twice in the initial sequence.
    #[error("customer {0} appears more than once")]
    Duplicate(usize),
    /// The sequence does not end with the fixed last customer.
    #[error("sequence does not end with fixed last customer {0}")]
    LastMismatch(usize),
    /// The referenced customer is not part of the tour.
    #[error("customer {0} is not part of the tour")]
    NotInTour(usize),
    /// The customer to insert is already part of the tour.
    #[error("customer {0} is already part of the tour")]
    AlreadyInTour(usize),
    /// The customer is the first or the fixed last and cannot be moved.
    #[error("customer {0} is fixed and cannot be moved")]
    Fixed(usize),
}

/// An ordered sequence of distinct customers with O(1) successor lookup.
///
/// # Examples
///
/// ```
/// use eax_tsp::models::Tour;
///
/// let mut tour = Tour::new(&[0, 1, 2, 3], Some(0)).unwrap(); // closed
/// assert_eq!(tour.count(), 4);
/// assert_eq!(tour.get_next_to(1), Some(2));
/// assert_eq!(tour.get_next_to(3), Some(0)); // wraps to first
///
/// tour.insert_after(1, 4).unwrap();
/// assert_eq!(tour.get_next_to(1), Some(4));
/// assert_eq!(tour.get_next_to(4), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct Tour {
    next: Vec<usize>,
    first: usize,
    last: Option<usize>,
    count: usize,
}

impl Tour {
    /// Creates a tour from an initial sequence and an optional fixed last.
    ///
    /// The first element of `sequence` becomes `first`. With
    /// `last == Some(first)` the tour is closed; the closing edge is implicit
    /// and must not be repeated in `sequence`. With a distinct fixed last the
    /// sequence must end with that customer.
    pub fn new(sequence: &[usize], last: Option<usize>) -> Result<Self, TourError> {
        let &first = sequence.first().ok_or(TourError::Empty)?;
        if let Some(l) = last {
            if l != first && *sequence.last().expect("non-empty") != l {
                return Err(TourError::LastMismatch(l));
            }
        }

        let capacity = sequence.iter().max().expect("non-empty") + 1;
        let mut next = vec![NOT_SET; capacity];
        for pair in sequence.windows(2) {
            if next[pair[0]] != NOT_SET {
                return Err(TourError::Duplicate(pair[0]));
            }
            next[pair[0]] = pair[1];
        }
        let &tail = sequence.last().expect("non-empty");
        if next[tail] != NOT_SET {
            return Err(TourError::Duplicate(tail));
        }
        next[tail] = END;

        Ok(Self {
            next,
            first,
            last,
            count: sequence.len(),
        })
    }

    /// Rebases an existing tour under a new shape without changing its order.
    ///
    /// Used to close an open tour, reopen a closed one, or pin an endpoint.
    /// A distinct fixed `last` must already be the final customer of `other`.
    pub fn rebased(other: &Tour, last: Option<usize>) -> Result<Self, TourError> {
        let sequence: Vec<usize> = other.iter().collect();
        Tour::new(&sequence, last)
    }

    /// Number of customers in the tour.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The starting customer.
    pub fn first(&self) -> usize {
        self.first
    }

    /// The fixed endpoint: `None` for an open tour, `Some(first)` for a
    /// closed tour, a distinct customer for a fixed-endpoint tour.
    pub fn last(&self) -> Option<usize> {
        self.last
    }

    /// Returns `true` if the tour closes back to `first`.
    pub fn is_closed(&self) -> bool {
        self.last == Some(self.first)
    }

    /// Returns `true` if the customer is part of the tour.
    pub fn contains(&self, customer: usize) -> bool {
        customer < self.next.len() && self.next[customer] != NOT_SET
    }

    /// The successor of `customer`, or `None`.
    ///
    /// For the final customer of a closed tour this is `first`; for the
    /// final customer of an open or fixed-endpoint tour it is `None`.
    pub fn get_next_to(&self, customer: usize) -> Option<usize> {
        if !self.contains(customer) {
            return None;
        }
        match self.next[customer] {
            END if self.is_closed() => Some(self.first),
            END => None,
            n => Some(n),
        }
    }

    /// Inserts `customer` immediately after `from`.
    ///
    /// Fails if `from` is absent, `customer` is already present, or either
    /// touches a distinct fixed last (the endpoint may be neither inserted
    /// nor displaced).
    pub fn insert_after(&mut self, from: usize, customer: usize) -> Result<(), TourError> {
        if !self.contains(from) {
            return Err(TourError::NotInTour(from));
        }
        if let Some(l) = self.last {
            if l != self.first {
                if customer == l {
                    return Err(TourError::Fixed(customer));
                }
                if from == l {
                    return Err(TourError::Fixed(from));
                }
            }
        }
        if self.contains(customer) {
            return Err(TourError::AlreadyInTour(customer));
        }

        if customer >= self.next.len() {
            self.next.resize(customer + 1, NOT_SET);
        }
        self.next[customer] = self.next[from];
        self.next[from] = customer;
        self.count += 1;
        Ok(())
    }

    /// Removes `customer` from the tour.
    ///
    /// Fails if `customer` is `first`, a distinct fixed last, or absent.
    pub fn remove(&mut self, customer: usize) -> Result<(), TourError> {
        if customer == self.first {
            return Err(TourError::Fixed(customer));
        }
        if self.last == Some(customer) {
            return Err(TourError::Fixed(customer));
        }
        if !self.contains(customer) {
            return Err(TourError::NotInTour(customer));
        }

        let mut pred = self.first;
        while self.next[pred] != customer {
            pred = self.next[pred];
        }
        self.next[pred] = self.next[customer];
        self.next[customer] = NOT_SET;
        self.count -= 1;
        Ok(())
    }

    /// Iterates the customers in tour order, starting at `first`.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        Iter {
            tour: self,
            current: Some(self.first),
        }
    }

    /// Iterates consecutive `(from, to)` pairs in tour order.
    ///
    /// Includes the implicit closing pair when the tour is closed.
    ///
    /// # Examples
    ///
    /// ```
    /// use eax_tsp::models::Tour;
    ///
    /// let closed = Tour::new(&[0, 1, 2], Some(0)).unwrap();
    /// let pairs: Vec<_> = closed.pairs().collect();
    /// assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 0)]);
    ///
    /// let open = Tour::new(&[0, 1, 2], None).unwrap();
    /// let pairs: Vec<_> = open.pairs().collect();
    /// assert_eq!(pairs, vec![(0, 1), (1, 2)]);
    /// ```
    pub fn pairs(&self) -> Pairs<'_> {
        Pairs {
            tour: self,
            current: Some(self.first),
        }
    }

    /// Overwrites this tour with a deep copy of `other`.
    pub fn copy_from(&mut self, other: &Tour) {
        self.next.clear();
        self.next.extend_from_slice(&other.next);
        self.first = other.first;
        self.last = other.last;
        self.count = other.count;
    }
}

impl PartialEq for Tour {
    fn eq(&self, other: &Self) -> bool {
        self.first == other.first
            && self.last == other.last
            && self.count == other.count
            && self.iter().eq(other.iter())
    }
}

struct Iter<'a> {
    tour: &'a Tour,
    current: Option<usize>,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let customer = self.current?;
        self.current = match self.tour.next[customer] {
            END => None,
            n => Some(n),
        };
        Some(customer)
    }
}

/// Lazy sequence of consecutive `(from, to)` pairs, see [`Tour::pairs`].
pub struct Pairs<'a> {
    tour: &'a Tour,
    current: Option<usize>,
}

impl Iterator for Pairs<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        let from = self.current?;
        match self.tour.next[from] {
            END => {
                self.current = None;
                if self.tour.is_closed() {
                    Some((from, self.tour.first))
                } else {
                    None
                }
            }
            to => {
                self.current = Some(to);
                Some((from, to))
            }
        }
    }
}
