//! Slide cursor and drag tracking for the project image carousel.
//!
//! Two navigation modes coexist on purpose: discrete controls (buttons, keys, thumbnails)
//! cycle with [`NavMode::Wrap`], while a released drag moves at most one slide and stops at
//! the ends with [`NavMode::Clamp`].
//!
//! Drag positions are measured along the slide track, growing toward later slides. A host that
//! reads pointer x-coordinates passes them negated so that content follows the pointer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMode {
    Wrap,
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub start: f64,
    pub offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The drag crossed the threshold; `to` may equal `from` at either end.
    Committed { from: usize, to: usize },
    SnappedBack { index: usize },
    /// `end_drag` without a matching `begin_drag`.
    Idle,
}

impl DragOutcome {
    pub fn index(&self) -> Option<usize> {
        match *self {
            DragOutcome::Committed { to, .. } => Some(to),
            DragOutcome::SnappedBack { index } => Some(index),
            DragOutcome::Idle => None,
        }
    }
}

pub const DEFAULT_DRAG_THRESHOLD: f64 = 0.1;

/// Keeps a drag threshold inside `[0, 1]`; NaN and infinities fall back to the default.
pub fn checked_threshold(threshold: f64) -> f64 {
    if threshold.is_finite() {
        threshold.clamp(0.0, 1.0)
    } else {
        DEFAULT_DRAG_THRESHOLD
    }
}

#[derive(Debug, Clone)]
pub struct Carousel {
    slides: Vec<String>,
    placeholder: bool,
    current: usize,
    drag: Option<DragState>,
    /// Fraction of the slide extent a drag must exceed to commit.
    threshold: f64,
}

impl Carousel {
    /// Blank entries are dropped; if nothing is left the carousel holds `placeholder` alone.
    pub fn new<I, S>(slides: I, placeholder: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slides: Vec<String> = slides
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.trim().is_empty())
            .collect();
        let placeholder_only = slides.is_empty();
        if placeholder_only {
            slides.push(placeholder.to_owned());
        }
        Self {
            slides,
            placeholder: placeholder_only,
            current: 0,
            drag: None,
            threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }

    /// Out-of-range values are clamped, see [`checked_threshold`].
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        let checked = checked_threshold(threshold);
        if checked != threshold {
            log::warn!("drag threshold {threshold} out of range, using {checked}");
        }
        self.threshold = checked;
        self
    }

    pub fn slides(&self) -> &[String] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Never true: an empty source yields a placeholder slide.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> &str {
        &self.slides[self.current]
    }

    pub fn drag(&self) -> Option<DragState> {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn go_to(&mut self, index: isize, mode: NavMode) -> usize {
        let len = self.slides.len() as isize;
        let index = match mode {
            NavMode::Wrap => index.rem_euclid(len),
            NavMode::Clamp => index.clamp(0, len - 1),
        };
        self.current = index as usize;
        self.current
    }

    pub fn next(&mut self) -> usize {
        self.go_to(self.current as isize + 1, NavMode::Wrap)
    }

    pub fn previous(&mut self) -> usize {
        self.go_to(self.current as isize - 1, NavMode::Wrap)
    }

    pub fn first(&mut self) -> usize {
        self.current = 0;
        self.current
    }

    pub fn last(&mut self) -> usize {
        self.current = self.slides.len() - 1;
        self.current
    }

    /// Thumbnail or indicator pick.
    pub fn select(&mut self, index: usize) -> usize {
        self.go_to(index.min(isize::MAX as usize) as isize, NavMode::Wrap)
    }

    /// Returns `false` if a drag is already in progress.
    pub fn begin_drag(&mut self, position: f64) -> bool {
        if self.drag.is_some() {
            return false;
        }
        self.drag = Some(DragState { start: position, offset: 0.0 });
        true
    }

    /// Live offset for the viewport; the index does not change until release.
    pub fn update_drag(&mut self, position: f64) -> Option<f64> {
        let drag = self.drag.as_mut()?;
        drag.offset = position - drag.start;
        Some(drag.offset)
    }

    pub fn end_drag(&mut self, slide_extent: f64) -> DragOutcome {
        let Some(drag) = self.drag.take() else {
            return DragOutcome::Idle;
        };
        let extent = if slide_extent.is_finite() { slide_extent.max(0.0) } else { 0.0 };
        let from = self.current;
        if drag.offset.abs() > self.threshold * extent {
            let step = if drag.offset > 0.0 { 1 } else { -1 };
            let to = self.go_to(from as isize + step, NavMode::Clamp);
            DragOutcome::Committed { from, to }
        } else {
            DragOutcome::SnappedBack { index: from }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Carousel {
        Carousel::new(["a", "b", "c"], "placeholder")
    }

    #[test]
    fn discrete_navigation_wraps() {
        let mut c = three();
        c.go_to(2, NavMode::Wrap);
        assert_eq!(c.next(), 0);
        c.go_to(0, NavMode::Wrap);
        assert_eq!(c.previous(), 2);
    }

    #[test]
    fn go_to_modes() {
        let mut c = three();
        assert_eq!(c.go_to(7, NavMode::Wrap), 1);
        assert_eq!(c.go_to(-1, NavMode::Wrap), 2);
        assert_eq!(c.go_to(7, NavMode::Clamp), 2);
        assert_eq!(c.go_to(-4, NavMode::Clamp), 0);
    }

    #[test]
    fn first_and_last_jump() {
        let mut c = three();
        assert_eq!(c.last(), 2);
        assert_eq!(c.first(), 0);
        assert_eq!(c.select(4), 1);
    }

    #[test]
    fn empty_source_gets_a_placeholder() {
        let mut c = Carousel::new(Vec::<String>::new(), "ph");
        assert_eq!(c.slides(), ["ph"]);
        assert!(c.is_placeholder());
        assert_eq!(c.next(), 0);
        assert_eq!(c.previous(), 0);

        let c = Carousel::new(["", "  "], "ph");
        assert!(c.is_placeholder());
    }

    #[test]
    fn drag_release_clamps_at_the_ends() {
        let mut c = three();
        c.begin_drag(100.0);
        c.update_drag(50.0);
        assert_eq!(c.end_drag(200.0), DragOutcome::Committed { from: 0, to: 0 });

        c.last();
        c.begin_drag(0.0);
        c.update_drag(60.0);
        assert_eq!(c.end_drag(200.0), DragOutcome::Committed { from: 2, to: 2 });
    }

    #[test]
    fn drag_release_moves_one_slide() {
        let mut c = three();
        c.begin_drag(0.0);
        c.update_drag(400.0);
        assert_eq!(c.end_drag(200.0).index(), Some(1));
        c.begin_drag(0.0);
        c.update_drag(-30.0);
        assert_eq!(c.end_drag(200.0).index(), Some(0));
    }

    #[test]
    fn short_drags_snap_back() {
        let mut c = three();
        c.select(1);
        for offset in [20.0, -20.0, 0.0, 5.0] {
            c.begin_drag(100.0);
            c.update_drag(100.0 + offset);
            assert_eq!(c.end_drag(200.0), DragOutcome::SnappedBack { index: 1 });
        }
        assert!(!c.is_dragging());
    }

    #[test]
    fn drag_bookkeeping() {
        let mut c = three();
        assert_eq!(c.update_drag(10.0), None);
        assert_eq!(c.end_drag(100.0), DragOutcome::Idle);
        assert!(c.begin_drag(10.0));
        assert!(!c.begin_drag(99.0));
        assert_eq!(c.update_drag(35.0), Some(25.0));
        assert_eq!(c.drag(), Some(DragState { start: 10.0, offset: 25.0 }));
        assert_eq!(c.current(), 0);
        c.end_drag(100.0);
        assert_eq!(c.drag(), None);
    }

    #[test]
    fn threshold_is_configurable() {
        let mut c = three().with_threshold(0.5);
        c.begin_drag(0.0);
        c.update_drag(80.0);
        assert_eq!(c.end_drag(200.0).index(), Some(0));
    }

    #[test]
    fn unusable_thresholds_are_clamped() {
        assert_eq!(checked_threshold(f64::NAN), DEFAULT_DRAG_THRESHOLD);
        assert_eq!(checked_threshold(f64::INFINITY), DEFAULT_DRAG_THRESHOLD);
        assert_eq!(checked_threshold(-0.5), 0.0);
        assert_eq!(checked_threshold(3.0), 1.0);

        // A NaN threshold would otherwise make every comparison false.
        let mut c = three().with_threshold(f64::NAN);
        c.begin_drag(0.0);
        c.update_drag(30.0);
        assert_eq!(c.end_drag(200.0).index(), Some(1));

        let mut c = three().with_threshold(-2.0);
        c.begin_drag(0.0);
        c.update_drag(0.0);
        assert_eq!(c.end_drag(200.0), DragOutcome::SnappedBack { index: 0 });
    }
}
