//! Bids, bid ordering, and dice tallies.
//!
//! A [`Bid`] claims that at least `quantity` dice on the table show `face`.
//! Whether one bid raises another is decided by an injected
//! [`BidOrderPolicy`], never by comparison logic at the call site, so the
//! engine can switch orderings without changing any caller.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;

use super::config::{FaceRange, WILD_FACE};
use super::error::ValidationError;

/// A die face value.
pub type Face = u8;

/// One player's dice, in roll order. Inline for typical hand sizes.
pub type Dice = SmallVec<[Face; 8]>;

/// A claim `(quantity, face)` about the whole table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bid {
    pub quantity: u32,
    pub face: Face,
}

impl Bid {
    #[must_use]
    pub const fn new(quantity: u32, face: Face) -> Self {
        Self { quantity, face }
    }

    /// Check the bid's shape against the face range and dice in play.
    pub fn validate(&self, faces: FaceRange, total_dice: u32) -> Result<(), ValidationError> {
        if !faces.contains(self.face) {
            return Err(ValidationError::FaceOutOfRange {
                face: self.face,
                min: faces.min(),
                max: faces.max(),
            });
        }
        if self.quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        if self.quantity > total_dice {
            return Err(ValidationError::QuantityExceedsDice {
                quantity: self.quantity,
                total_dice,
            });
        }
        Ok(())
    }

    /// Whether this bid raises `reference` under `policy`.
    ///
    /// Any bid raises an absent reference (the opening bid of a round).
    #[must_use]
    pub fn is_higher_than(&self, reference: Option<&Bid>, policy: &dyn BidOrderPolicy) -> bool {
        reference.map_or(true, |r| policy.is_higher(self, r))
    }
}

impl std::fmt::Display for Bid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}×{}", self.quantity, self.face)
    }
}

/// A strict total order over bids.
///
/// Implementations must be irreflexive (`is_higher(b, b)` is false) and
/// total: for distinct bids exactly one direction is higher.
pub trait BidOrderPolicy: std::fmt::Debug + Send + Sync {
    /// Whether `candidate` is strictly higher than `reference`.
    fn is_higher(&self, candidate: &Bid, reference: &Bid) -> bool;

    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Compare two bids under this order.
    fn compare(&self, a: &Bid, b: &Bid) -> Ordering {
        if self.is_higher(a, b) {
            Ordering::Greater
        } else if self.is_higher(b, a) {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }
}

/// Higher quantity wins; on equal quantity the higher face wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuantityThenFace;

impl BidOrderPolicy for QuantityThenFace {
    fn is_higher(&self, candidate: &Bid, reference: &Bid) -> bool {
        (candidate.quantity, candidate.face) > (reference.quantity, reference.face)
    }

    fn name(&self) -> &'static str {
        "quantity_then_face"
    }
}

/// Perudo ordering where bids on the wild face count double.
///
/// A bid of `k` wild faces ranks between `2k` of any face and `2k + 1` of
/// the lowest non-wild face. Moving onto the wild face needs `ceil(q / 2)`;
/// leaving it needs `2k + 1`. Other bids order as [`QuantityThenFace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiarsDiceStandard {
    faces: FaceRange,
}

impl LiarsDiceStandard {
    #[must_use]
    pub fn new(faces: FaceRange) -> Self {
        Self { faces }
    }

    fn rank(&self, bid: &Bid) -> (u64, u16) {
        if bid.face == WILD_FACE {
            (u64::from(bid.quantity) * 2, u16::from(self.faces.max()) + 1)
        } else {
            (u64::from(bid.quantity), u16::from(bid.face))
        }
    }
}

impl BidOrderPolicy for LiarsDiceStandard {
    fn is_higher(&self, candidate: &Bid, reference: &Bid) -> bool {
        self.rank(candidate) > self.rank(reference)
    }

    fn name(&self) -> &'static str {
        "liars_dice_standard"
    }
}

/// Every bid that raises `reference`, lowest first under `policy`.
#[must_use]
pub fn legal_raises(
    reference: Option<&Bid>,
    faces: FaceRange,
    total_dice: u32,
    policy: &dyn BidOrderPolicy,
) -> Vec<Bid> {
    let mut raises: Vec<Bid> = (1..=total_dice)
        .flat_map(|q| faces.iter().map(move |f| Bid::new(q, f)))
        .filter(|b| b.is_higher_than(reference, policy))
        .collect();
    raises.sort_by(|a, b| policy.compare(a, b));
    raises
}

/// Count dice on the table that support a bid on `face`.
///
/// With `ones_wild`, dice showing 1 also count toward any other face.
/// A bid on face 1 counts only the ones themselves.
pub fn count_matches<'a>(
    hands: impl IntoIterator<Item = &'a [Face]>,
    face: Face,
    ones_wild: bool,
) -> u32 {
    let wild_applies = ones_wild && face != WILD_FACE;
    hands
        .into_iter()
        .flat_map(|hand| hand.iter())
        .filter(|&&d| d == face || (wild_applies && d == WILD_FACE))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACES: FaceRange = FaceRange::SIX_SIDED;

    #[test]
    fn test_validate_bounds() {
        assert!(Bid::new(5, 6).validate(FACES, 5).is_ok());
        assert_eq!(
            Bid::new(6, 2).validate(FACES, 5),
            Err(ValidationError::QuantityExceedsDice {
                quantity: 6,
                total_dice: 5
            })
        );
        assert_eq!(
            Bid::new(0, 1).validate(FACES, 5),
            Err(ValidationError::ZeroQuantity)
        );
        assert!(matches!(
            Bid::new(1, 0).validate(FACES, 5),
            Err(ValidationError::FaceOutOfRange { face: 0, .. })
        ));
        assert!(matches!(
            Bid::new(1, 7).validate(FACES, 5),
            Err(ValidationError::FaceOutOfRange { face: 7, .. })
        ));
    }

    #[test]
    fn test_quantity_then_face() {
        let policy = QuantityThenFace;

        assert!(Bid::new(2, 3).is_higher_than(None, &policy));
        assert!(Bid::new(3, 1).is_higher_than(Some(&Bid::new(2, 6)), &policy));
        assert!(Bid::new(2, 4).is_higher_than(Some(&Bid::new(2, 3)), &policy));
        assert!(!Bid::new(2, 3).is_higher_than(Some(&Bid::new(2, 3)), &policy));
        assert!(!Bid::new(2, 2).is_higher_than(Some(&Bid::new(2, 3)), &policy));
        assert!(!Bid::new(1, 6).is_higher_than(Some(&Bid::new(2, 1)), &policy));
    }

    #[test]
    fn test_standard_wild_bids_count_double() {
        let policy = LiarsDiceStandard::new(FACES);

        // onto aces: ceil(q/2)
        assert!(policy.is_higher(&Bid::new(2, 1), &Bid::new(4, 6)));
        assert!(policy.is_higher(&Bid::new(3, 1), &Bid::new(5, 3)));
        assert!(!policy.is_higher(&Bid::new(2, 1), &Bid::new(5, 3)));

        // off aces: 2k + 1
        assert!(policy.is_higher(&Bid::new(5, 2), &Bid::new(2, 1)));
        assert!(!policy.is_higher(&Bid::new(4, 6), &Bid::new(2, 1)));

        // within aces and within other faces
        assert!(policy.is_higher(&Bid::new(3, 1), &Bid::new(2, 1)));
        assert!(policy.is_higher(&Bid::new(3, 5), &Bid::new(3, 4)));
        assert!(!policy.is_higher(&Bid::new(2, 1), &Bid::new(2, 1)));
    }

    #[test]
    fn test_policies_are_total_orders() {
        let policies: [&dyn BidOrderPolicy; 2] = [&QuantityThenFace, &LiarsDiceStandard::new(FACES)];
        let bids: Vec<Bid> = (1..=6)
            .flat_map(|q| FACES.iter().map(move |f| Bid::new(q, f)))
            .collect();

        for policy in policies {
            for a in &bids {
                assert!(!policy.is_higher(a, a), "{} reflexive on {}", policy.name(), a);
                for b in &bids {
                    if a != b {
                        assert!(
                            policy.is_higher(a, b) ^ policy.is_higher(b, a),
                            "{} not total on {} / {}",
                            policy.name(),
                            a,
                            b
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_legal_raises_sorted_and_strict() {
        let policy = QuantityThenFace;
        let raises = legal_raises(Some(&Bid::new(2, 5)), FACES, 3, &policy);

        assert_eq!(raises.first(), Some(&Bid::new(2, 6)));
        assert_eq!(raises.last(), Some(&Bid::new(3, 6)));
        assert_eq!(raises.len(), 7);
        assert!(raises.windows(2).all(|w| policy.is_higher(&w[1], &w[0])));

        let opening = legal_raises(None, FACES, 2, &policy);
        assert_eq!(opening.len(), 12);
        assert_eq!(opening[0], Bid::new(1, 1));
    }

    #[test]
    fn test_count_matches_without_wilds() {
        let hands: [&[Face]; 2] = [&[1, 2], &[3, 2, 2]];
        assert_eq!(count_matches(hands, 2, false), 3);
        assert_eq!(count_matches(hands, 1, false), 1);
        assert_eq!(count_matches(hands, 6, false), 0);
    }

    #[test]
    fn test_count_matches_with_wilds() {
        let hands: [&[Face]; 2] = [&[1, 2], &[1, 3, 2]];
        assert_eq!(count_matches(hands, 2, true), 4);
        // ones never double count on a bid for ones
        assert_eq!(count_matches(hands, 1, true), 2);
    }

    #[test]
    fn test_bid_display() {
        assert_eq!(Bid::new(3, 4).to_string(), "3×4");
    }
}
