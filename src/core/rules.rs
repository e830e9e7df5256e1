// Rule variations the move generator understands.

/// When a man that reaches the far rank during a capture chain is crowned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PromotionPolicy {
    /// Crowned on landing; the rest of the chain is played as a king.
    #[default]
    MidCapture,
    /// Crowned only if the move ends on the far rank; the chain continues as a man.
    EndOfMove,
}

/// Rule set for move generation. The default is Russian giveaway (poddavki):
/// flying kings, men capture backwards, crowning in the middle of a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rules {
    pub flying_kings: bool,
    pub men_capture_backward: bool,
    pub promotion: PromotionPolicy,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            flying_kings: true,
            men_capture_backward: true,
            promotion: PromotionPolicy::MidCapture,
        }
    }
}

impl Rules {
    /// Short kings, forward-only men captures, crowning at the end of the move.
    pub fn short_kings() -> Self {
        Rules {
            flying_kings: false,
            men_capture_backward: false,
            promotion: PromotionPolicy::EndOfMove,
        }
    }
}
