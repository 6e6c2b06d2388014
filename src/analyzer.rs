// Reads one hand pose: how many fingers are up, which symbol it makes,
// and which click buttons the index/middle fingers are asking for.

use crate::geometry::{angle_at, is_extended};
use crate::types::{Hand, landmarks::*};

/// (tip, pip, mcp) for index, middle, ring, pinky.
const FINGERS: [(usize, usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP, INDEX_MCP),
    (MIDDLE_TIP, MIDDLE_PIP, MIDDLE_MCP),
    (RING_TIP, RING_PIP, RING_MCP),
    (PINKY_TIP, PINKY_PIP, PINKY_MCP),
];

const FINGER_STRAIGHT_DEG: f32 = 150.0;
const THUMB_STRAIGHT_DEG: f32 = 120.0; // thumb bends against the wrist, so it gets more slack
const THUMB_UP_DEG: f32 = 160.0;

/// Count raised fingers (0..=5) from joint angles.
pub fn count_extended_fingers(hand: &Hand) -> u8 {
    let mut count = 0;
    for (tip, pip, mcp) in FINGERS {
        if angle_at(hand.get(tip), hand.get(pip), hand.get(mcp)) > FINGER_STRAIGHT_DEG {
            count += 1;
        }
    }

    let thumb = angle_at(hand.get(THUMB_TIP), hand.get(THUMB_MCP), hand.get(WRIST));
    if thumb > THUMB_STRAIGHT_DEG {
        count += 1;
    }
    count
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    ThumbsUp,
}

impl Symbol {
    pub fn label(self) -> &'static str {
        match self {
            Symbol::ThumbsUp => "Thumbs Up",
        }
    }
}

/// Everything the symbol rules look at, computed once per hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandFeatures {
    pub extended: u8,
    /// Angle at the thumb MCP between wrist and thumb tip.
    pub thumb_angle: f32,
}

impl HandFeatures {
    pub fn extract(hand: &Hand) -> Self {
        Self {
            extended: count_extended_fingers(hand),
            thumb_angle: angle_at(hand.get(WRIST), hand.get(THUMB_MCP), hand.get(THUMB_TIP)),
        }
    }
}

/// A symbol fires when its predicate holds.
pub struct SymbolRule {
    pub symbol: Symbol,
    pub matches: fn(&HandFeatures) -> bool,
}

fn thumbs_up(f: &HandFeatures) -> bool {
    f.thumb_angle > THUMB_UP_DEG && f.extended == 1
}

/// Rules in priority order; the first match wins.
pub const SYMBOL_RULES: &[SymbolRule] = &[SymbolRule { symbol: Symbol::ThumbsUp, matches: thumbs_up }];

pub fn detect_symbol(hand: &Hand) -> Option<Symbol> {
    detect_symbol_with(&HandFeatures::extract(hand), SYMBOL_RULES)
}

pub fn detect_symbol_with(features: &HandFeatures, rules: &[SymbolRule]) -> Option<Symbol> {
    rules.iter().find(|rule| (rule.matches)(features)).map(|rule| rule.symbol)
}

/// Raw (undebounced) click requests for this frame.
/// Both fingers up, or both down, asks for neither button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickTriggers {
    pub left: bool,
    pub right: bool,
}

impl ClickTriggers {
    pub fn from_hand(hand: &Hand) -> Self {
        let index = index_extended(hand);
        let middle = is_extended(hand.get(MIDDLE_TIP), hand.get(MIDDLE_PIP));
        Self { left: index && !middle, right: middle && !index }
    }
}

/// The draw gesture: index finger raised.
pub fn index_extended(hand: &Hand) -> bool {
    is_extended(hand.get(INDEX_TIP), hand.get(INDEX_PIP))
}

/// What the HUD shows about the current hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandReading {
    pub fingers: u8,
    pub symbol: Option<Symbol>,
}

impl HandReading {
    pub fn of(hand: &Hand) -> Self {
        Self { fingers: count_extended_fingers(hand), symbol: detect_symbol(hand) }
    }

    /// Symbol label if any, otherwise the finger count (nothing for a closed hand).
    pub fn caption(&self) -> Option<String> {
        match self.symbol {
            Some(symbol) => Some(symbol.label().to_string()),
            None if self.fingers > 0 => Some(format!("Fingers: {}", self.fingers)),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{fist, open_hand, pose};

    #[test]
    fn open_hand_counts_five() {
        assert_eq!(count_extended_fingers(&open_hand()), 5);
    }

    #[test]
    fn fist_counts_zero() {
        assert_eq!(count_extended_fingers(&fist()), 0);
    }

    #[test]
    fn partial_poses_count_each_finger() {
        assert_eq!(count_extended_fingers(&pose([false, true, true, false, false])), 2);
        assert_eq!(count_extended_fingers(&pose([true, false, false, false, true])), 2);
        assert_eq!(count_extended_fingers(&pose([false, true, true, true, true])), 4);
    }

    #[test]
    fn thumbs_up_needs_straight_thumb_and_nothing_else() {
        assert_eq!(detect_symbol(&pose([true, false, false, false, false])), Some(Symbol::ThumbsUp));
        assert_eq!(detect_symbol(&open_hand()), None);
        assert_eq!(detect_symbol(&fist()), None);
        // One finger up, but it is the index, not the thumb.
        assert_eq!(detect_symbol(&pose([false, true, false, false, false])), None);
    }

    #[test]
    fn first_matching_rule_wins() {
        let features = HandFeatures { extended: 1, thumb_angle: 170.0 };
        let never = SymbolRule { symbol: Symbol::ThumbsUp, matches: |_| false };
        assert_eq!(detect_symbol_with(&features, &[never]), None);
        assert_eq!(detect_symbol_with(&features, SYMBOL_RULES), Some(Symbol::ThumbsUp));
        assert_eq!(detect_symbol_with(&features, &[]), None);
    }

    #[test]
    fn click_triggers_are_mutually_exclusive() {
        let index_only = pose([false, true, false, false, false]);
        let middle_only = pose([false, false, true, false, false]);
        let both = pose([false, true, true, false, false]);

        assert_eq!(ClickTriggers::from_hand(&index_only), ClickTriggers { left: true, right: false });
        assert_eq!(ClickTriggers::from_hand(&middle_only), ClickTriggers { left: false, right: true });
        assert_eq!(ClickTriggers::from_hand(&both), ClickTriggers::default());
        assert_eq!(ClickTriggers::from_hand(&fist()), ClickTriggers::default());
    }

    #[test]
    fn caption_prefers_symbol_then_count() {
        assert_eq!(HandReading::of(&pose([true, false, false, false, false])).caption().as_deref(), Some("Thumbs Up"));
        assert_eq!(HandReading::of(&open_hand()).caption().as_deref(), Some("Fingers: 5"));
        assert_eq!(HandReading::of(&fist()).caption(), None);
    }
}
