//! Packed directed customer ids for turn-aware tours.
//!
//! A directed tour visits each physical vertex on one of its two sides
//! (side 0 / side 1) and leaves it on one of its two sides, giving four
//! possible turns per visit. The quadruple `(id, arrival, departure, turn)`
//! is packed into a single non-negative integer with explicit shifts:
//!
//! ```text
//! raw = id << 4 | arrival << 3 | departure << 2 | turn
//! ```
//!
//! so a directed tour can reuse the plain successor-array [`Tour`] over raw
//! values. Extraction is O(1) and the packing round-trips exactly.
//!
//! [`Tour`]: crate::models::Tour

/// A directed customer id packing `(id, arrival, departure, turn)`.
///
/// The `turn` index is `arrival * 2 + departure` and doubles as the lookup
/// index into a problem's four turn penalties.
///
/// # Examples
///
/// ```
/// use eax_tsp::models::DirectedId;
///
/// let d = DirectedId::new(7, 2);
/// assert_eq!(d.extract_all(), (1, 0, 7, 2));
/// assert_eq!(DirectedId::from_raw(d.raw()), d);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirectedId(usize);

impl DirectedId {
    /// Packs a physical vertex id and a turn (`0..4`).
    ///
    /// The arrival and departure sides are implied by the turn.
    pub fn new(id: usize, turn: u8) -> Self {
        debug_assert!(turn < 4);
        let arrival = (turn >> 1) as usize;
        let departure = (turn & 1) as usize;
        Self(id << 4 | arrival << 3 | departure << 2 | turn as usize)
    }

    /// Packs a physical vertex id and explicit arrival/departure sides.
    pub fn from_sides(id: usize, arrival: u8, departure: u8) -> Self {
        debug_assert!(arrival < 2 && departure < 2);
        Self::new(id, arrival * 2 + departure)
    }

    /// Reinterprets a raw packed value.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// The raw packed value, usable as a customer id in a [`Tour`].
    ///
    /// [`Tour`]: crate::models::Tour
    pub fn raw(self) -> usize {
        self.0
    }

    /// The physical vertex id.
    pub fn id(self) -> usize {
        self.0 >> 4
    }

    /// The arrival side (0 or 1).
    pub fn arrival(self) -> u8 {
        (self.0 >> 3 & 1) as u8
    }

    /// The departure side (0 or 1).
    pub fn departure(self) -> u8 {
        (self.0 >> 2 & 1) as u8
    }

    /// The turn taken at the vertex (`0..4`), index into the turn penalties.
    pub fn turn(self) -> u8 {
        (self.0 & 0b11) as u8
    }

    /// Unpacks all four fields as `(arrival, departure, id, turn)`.
    pub fn extract_all(self) -> (u8, u8, usize, u8) {
        (self.arrival(), self.departure(), self.id(), self.turn())
    }

    /// Index of the arrival side in a doubled (2N) directed weight matrix.
    pub fn arrival_weight_id(self) -> usize {
        self.id() * 2 + self.arrival() as usize
    }

    /// Index of the departure side in a doubled (2N) directed weight matrix.
    pub fn departure_weight_id(self) -> usize {
        self.id() * 2 + self.departure() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_turn_implies_sides() {
        assert_eq!(DirectedId::new(0, 0).extract_all(), (0, 0, 0, 0));
        assert_eq!(DirectedId::new(0, 1).extract_all(), (0, 1, 0, 1));
        assert_eq!(DirectedId::new(0, 2).extract_all(), (1, 0, 0, 2));
        assert_eq!(DirectedId::new(0, 3).extract_all(), (1, 1, 0, 3));
    }

    #[test]
    fn test_from_sides_matches_new() {
        for arrival in 0..2u8 {
            for departure in 0..2u8 {
                let d = DirectedId::from_sides(5, arrival, departure);
                assert_eq!(d, DirectedId::new(5, arrival * 2 + departure));
                assert_eq!(d.arrival(), arrival);
                assert_eq!(d.departure(), departure);
            }
        }
    }

    #[test]
    fn test_weight_ids() {
        let d = DirectedId::from_sides(3, 1, 0);
        assert_eq!(d.arrival_weight_id(), 7);
        assert_eq!(d.departure_weight_id(), 6);
    }

    #[test]
    fn test_distinct_turns_distinct_raw() {
        let raws: Vec<usize> = (0..4).map(|t| DirectedId::new(9, t).raw()).collect();
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_ne!(raws[i], raws[j]);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip(id in 0usize..1_000_000, turn in 0u8..4) {
            let d = DirectedId::new(id, turn);
            let (arrival, departure, out_id, out_turn) = d.extract_all();
            prop_assert_eq!(out_id, id);
            prop_assert_eq!(out_turn, turn);
            prop_assert_eq!(arrival, turn >> 1);
            prop_assert_eq!(departure, turn & 1);
            prop_assert_eq!(DirectedId::from_raw(d.raw()), d);
        }
    }
}
