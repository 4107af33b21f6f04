use crate::shared::region::{PixelPoint, Region};

/// What to do with a gesture that produced a zero-area rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyRegionPolicy {
    #[default]
    Discard,
    Keep,
}

/// How an overlay rectangle should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayStyle {
    InProgress,
    Pending,
    Confirmed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayRect {
    pub region: Region,
    pub style: OverlayStyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gesture {
    Idle,
    Dragging { anchor: PixelPoint, current: PixelPoint },
}

/// Turns press → drag → release gestures into rectangles in image space.
///
/// Released rectangles are pending until [`confirm`](Self::confirm) moves
/// them into the confirmed list, which the blur step drains with
/// [`take_confirmed`](Self::take_confirmed). Every rectangle is clamped to
/// the image bounds given at construction.
#[derive(Clone, Debug)]
pub struct SelectionSession {
    width: u32,
    height: u32,
    policy: EmptyRegionPolicy,
    gesture: Gesture,
    pending: Vec<Region>,
    confirmed: Vec<Region>,
}

impl SelectionSession {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_policy(width, height, EmptyRegionPolicy::default())
    }

    pub fn with_policy(width: u32, height: u32, policy: EmptyRegionPolicy) -> Self {
        Self {
            width,
            height,
            policy,
            gesture: Gesture::Idle,
            pending: Vec::new(),
            confirmed: Vec::new(),
        }
    }

    pub fn bounds(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn policy(&self) -> EmptyRegionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: EmptyRegionPolicy) {
        self.policy = policy;
    }

    /// Starts a gesture. Pressing again mid-drag restarts at the new anchor.
    pub fn press(&mut self, point: PixelPoint) {
        log::debug!("Selection press at ({}, {})", point.x, point.y);
        self.gesture = Gesture::Dragging {
            anchor: point,
            current: point,
        };
    }

    pub fn drag(&mut self, point: PixelPoint) {
        if let Gesture::Dragging { current, .. } = &mut self.gesture {
            *current = point;
        }
    }

    /// Ends the gesture and returns the rectangle it appended, if any.
    pub fn release(&mut self, point: PixelPoint) -> Option<Region> {
        let Gesture::Dragging { anchor, .. } = self.gesture else {
            return None;
        };
        self.gesture = Gesture::Idle;

        let region = Region::from_corners(anchor, point).clamp_to(self.width, self.height);
        if region.is_empty() && self.policy == EmptyRegionPolicy::Discard {
            log::debug!("Discarding empty selection {region}");
            return None;
        }
        log::debug!("Selected {region}");
        self.pending.push(region);
        Some(region)
    }

    pub fn cancel_gesture(&mut self) {
        self.gesture = Gesture::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    /// The live rectangle between the anchor and the pointer, clamped.
    pub fn in_progress(&self) -> Option<Region> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging { anchor, current } => {
                Some(Region::from_corners(anchor, current).clamp_to(self.width, self.height))
            }
        }
    }

    /// Moves all pending rectangles into the confirmed list. Returns how many moved.
    pub fn confirm(&mut self) -> usize {
        let moved = self.pending.len();
        self.confirmed.append(&mut self.pending);
        moved
    }

    /// Drains the confirmed list, leaving the session ready for another round.
    pub fn take_confirmed(&mut self) -> Vec<Region> {
        std::mem::take(&mut self.confirmed)
    }

    pub fn pending(&self) -> &[Region] {
        &self.pending
    }

    pub fn confirmed(&self) -> &[Region] {
        &self.confirmed
    }

    pub fn clear(&mut self) {
        self.gesture = Gesture::Idle;
        self.pending.clear();
        self.confirmed.clear();
    }

    /// Rectangles to draw, confirmed first so live feedback stays on top.
    pub fn overlay(&self) -> Vec<OverlayRect> {
        let confirmed = self.confirmed.iter().map(|&region| OverlayRect {
            region,
            style: OverlayStyle::Confirmed,
        });
        let pending = self.pending.iter().map(|&region| OverlayRect {
            region,
            style: OverlayStyle::Pending,
        });
        let live = self.in_progress().map(|region| OverlayRect {
            region,
            style: OverlayStyle::InProgress,
        });
        confirmed.chain(pending).chain(live).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> PixelPoint {
        PixelPoint::new(x, y)
    }

    fn select(session: &mut SelectionSession, a: PixelPoint, b: PixelPoint) -> Option<Region> {
        session.press(a);
        session.drag(b);
        session.release(b)
    }

    // ── Gesture state machine ────────────────────────────────────────

    #[test]
    fn test_starts_idle_and_empty() {
        let session = SelectionSession::new(100, 100);
        assert!(!session.is_dragging());
        assert!(session.pending().is_empty());
        assert!(session.confirmed().is_empty());
        assert!(session.overlay().is_empty());
    }

    #[test]
    fn test_press_drag_updates_in_progress_only() {
        let mut session = SelectionSession::new(100, 100);
        session.press(pt(30, 30));
        session.drag(pt(10, 20));
        assert!(session.is_dragging());
        assert_eq!(session.in_progress(), Some(Region::new(10, 20, 30, 30)));
        assert!(session.pending().is_empty());
        assert!(session.confirmed().is_empty());
    }

    #[test]
    fn test_release_appends_normalized_pending() {
        let mut session = SelectionSession::new(100, 100);
        let region = select(&mut session, pt(30, 30), pt(10, 10));
        assert_eq!(region, Some(Region::new(10, 10, 30, 30)));
        assert_eq!(session.pending(), &[Region::new(10, 10, 30, 30)]);
        assert!(!session.is_dragging());
        assert_eq!(session.in_progress(), None);
    }

    #[test]
    fn test_release_while_idle_is_ignored() {
        let mut session = SelectionSession::new(100, 100);
        assert_eq!(session.release(pt(5, 5)), None);
        assert!(session.pending().is_empty());
    }

    #[test]
    fn test_drag_while_idle_is_ignored() {
        let mut session = SelectionSession::new(100, 100);
        session.drag(pt(5, 5));
        assert!(!session.is_dragging());
    }

    #[test]
    fn test_press_mid_drag_restarts_anchor() {
        let mut session = SelectionSession::new(100, 100);
        session.press(pt(0, 0));
        session.press(pt(50, 50));
        session.release(pt(60, 60));
        assert_eq!(session.pending(), &[Region::new(50, 50, 60, 60)]);
    }

    #[test]
    fn test_cancel_gesture_drops_live_rectangle() {
        let mut session = SelectionSession::new(100, 100);
        session.press(pt(0, 0));
        session.cancel_gesture();
        assert_eq!(session.release(pt(10, 10)), None);
    }

    // ── Clamping and empty regions ───────────────────────────────────

    #[test]
    fn test_release_clamps_to_image_bounds() {
        let mut session = SelectionSession::new(100, 80);
        select(&mut session, pt(-20, 50), pt(150, 200));
        assert_eq!(session.pending(), &[Region::new(0, 50, 100, 80)]);
    }

    #[test]
    fn test_click_without_drag_discarded_by_default() {
        let mut session = SelectionSession::new(100, 100);
        assert_eq!(select(&mut session, pt(40, 40), pt(40, 40)), None);
        assert!(session.pending().is_empty());
    }

    #[test]
    fn test_keep_policy_retains_empty_regions() {
        let mut session = SelectionSession::with_policy(100, 100, EmptyRegionPolicy::Keep);
        select(&mut session, pt(40, 40), pt(40, 40));
        assert_eq!(session.pending().len(), 1);
        assert!(session.pending()[0].is_empty());
    }

    #[test]
    fn test_selection_entirely_outside_image_discarded() {
        let mut session = SelectionSession::new(100, 100);
        assert_eq!(select(&mut session, pt(150, 150), pt(200, 200)), None);
    }

    #[test]
    fn test_overlapping_regions_are_not_deduplicated() {
        let mut session = SelectionSession::new(100, 100);
        select(&mut session, pt(10, 10), pt(30, 30));
        select(&mut session, pt(10, 10), pt(30, 30));
        assert_eq!(session.pending().len(), 2);
    }

    // ── Confirmation ─────────────────────────────────────────────────

    #[test]
    fn test_confirm_moves_pending_atomically() {
        let mut session = SelectionSession::new(100, 100);
        select(&mut session, pt(10, 10), pt(20, 20));
        select(&mut session, pt(50, 50), pt(70, 70));
        assert_eq!(session.confirm(), 2);
        assert!(session.pending().is_empty());
        assert_eq!(
            session.confirmed(),
            &[Region::new(10, 10, 20, 20), Region::new(50, 50, 70, 70)]
        );
    }

    #[test]
    fn test_confirm_with_nothing_pending_keeps_confirmed() {
        let mut session = SelectionSession::new(100, 100);
        select(&mut session, pt(10, 10), pt(20, 20));
        session.confirm();
        let before = session.confirmed().to_vec();
        assert_eq!(session.confirm(), 0);
        assert_eq!(session.confirmed(), &before[..]);
    }

    #[test]
    fn test_confirm_accumulates_across_rounds() {
        let mut session = SelectionSession::new(100, 100);
        select(&mut session, pt(10, 10), pt(20, 20));
        session.confirm();
        select(&mut session, pt(30, 30), pt(40, 40));
        session.confirm();
        assert_eq!(session.confirmed().len(), 2);
    }

    #[test]
    fn test_take_confirmed_rearms_session() {
        let mut session = SelectionSession::new(100, 100);
        select(&mut session, pt(10, 10), pt(20, 20));
        session.confirm();
        let taken = session.take_confirmed();
        assert_eq!(taken, vec![Region::new(10, 10, 20, 20)]);
        assert!(session.confirmed().is_empty());

        select(&mut session, pt(30, 30), pt(40, 40));
        assert_eq!(session.pending().len(), 1);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = SelectionSession::new(100, 100);
        select(&mut session, pt(10, 10), pt(20, 20));
        session.confirm();
        select(&mut session, pt(30, 30), pt(40, 40));
        session.press(pt(1, 1));
        session.clear();
        assert!(session.overlay().is_empty());
        assert!(!session.is_dragging());
    }

    // ── Overlay ──────────────────────────────────────────────────────

    #[test]
    fn test_overlay_styles_distinguish_states() {
        let mut session = SelectionSession::new(100, 100);
        select(&mut session, pt(10, 10), pt(20, 20));
        session.confirm();
        select(&mut session, pt(30, 30), pt(40, 40));
        session.press(pt(50, 50));
        session.drag(pt(60, 60));

        let styles: Vec<OverlayStyle> = session.overlay().iter().map(|o| o.style).collect();
        assert_eq!(
            styles,
            vec![
                OverlayStyle::Confirmed,
                OverlayStyle::Pending,
                OverlayStyle::InProgress
            ]
        );
    }
}
