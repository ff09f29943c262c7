//! Carousel cursor over the package slides and the trailing CTA slide.

/// What the carousel currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
    /// Package at a zero-based catalog position.
    Package(usize),
    /// The closing "contact us" slide.
    CallToAction,
}

/// One pagination dot under the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    /// Slide index this dot jumps to.
    pub target: usize,
    pub active: bool,
    /// The last dot leads to the contact slide and is styled apart.
    pub contact: bool,
}

/// Cursor over `N` package slides plus one CTA slide.
///
/// The index always stays in `[0, N]`; navigation wraps around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    package_count: usize,
}

impl Carousel {
    /// Start on the first slide of a deck with `package_count` packages.
    pub fn new(package_count: usize) -> Self {
        Self {
            index: 0,
            package_count,
        }
    }

    /// Current slide index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Total slides including the CTA slide.
    pub fn slide_count(&self) -> usize {
        self.package_count + 1
    }

    /// Advance one slide, wrapping from the CTA slide back to the first package.
    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.slide_count();
    }

    /// Go back one slide, wrapping from the first package to the CTA slide.
    pub fn previous(&mut self) {
        let total = self.slide_count();
        self.index = (self.index + total - 1) % total;
    }

    /// Jump directly to `target`.
    ///
    /// `target` must be in `[0, N]`; anything else is a caller bug.
    pub fn jump_to(&mut self, target: usize) {
        debug_assert!(
            target < self.slide_count(),
            "slide {target} out of range for {} slides",
            self.slide_count()
        );
        self.index = target;
    }

    /// Whether the cursor is on the CTA slide.
    pub fn is_call_to_action(&self) -> bool {
        self.index >= self.package_count
    }

    pub fn current(&self) -> Slide {
        if self.is_call_to_action() {
            Slide::CallToAction
        } else {
            Slide::Package(self.index)
        }
    }

    /// Caption under the carousel: "package i of N" or "contact us".
    pub fn position_label(&self) -> String {
        match self.current() {
            Slide::Package(position) => {
                format!("باقة {} من {}", position + 1, self.package_count)
            }
            Slide::CallToAction => "تواصل معنا".to_string(),
        }
    }

    /// One indicator per slide, the CTA indicator last.
    pub fn indicators(&self) -> Vec<Indicator> {
        (0..self.slide_count())
            .map(|target| Indicator {
                target,
                active: target == self.index,
                contact: target == self.package_count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_next_wraps_to_first_package() {
        let mut carousel = Carousel::new(10);
        carousel.jump_to(10);
        assert_eq!(carousel.current(), Slide::CallToAction);
        carousel.next();
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_previous_wraps_to_cta() {
        let mut carousel = Carousel::new(10);
        carousel.previous();
        assert_eq!(carousel.index(), 10);
        assert!(carousel.is_call_to_action());
    }

    #[test]
    fn test_empty_deck_stays_on_cta() {
        let mut carousel = Carousel::new(0);
        assert_eq!(carousel.current(), Slide::CallToAction);
        carousel.next();
        carousel.previous();
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_position_label() {
        let mut carousel = Carousel::new(10);
        carousel.jump_to(2);
        assert_eq!(carousel.position_label(), "باقة 3 من 10");
        carousel.jump_to(10);
        assert_eq!(carousel.position_label(), "تواصل معنا");
    }

    #[test]
    fn test_indicators_mark_active_and_contact() {
        let mut carousel = Carousel::new(3);
        carousel.jump_to(1);
        let indicators = carousel.indicators();
        assert_eq!(indicators.len(), 4);
        assert!(indicators[1].active);
        assert_eq!(indicators.iter().filter(|i| i.active).count(), 1);
        assert!(indicators[3].contact);
        assert!(!indicators[0].contact);
    }

    proptest! {
        #[test]
        fn prop_next_cycles_back(n in 0usize..40, start_seed in 0usize..1000) {
            let mut carousel = Carousel::new(n);
            let start = start_seed % (n + 1);
            carousel.jump_to(start);
            for _ in 0..=n {
                carousel.next();
            }
            prop_assert_eq!(carousel.index(), start);
        }

        #[test]
        fn prop_previous_inverts_next(n in 0usize..40, start_seed in 0usize..1000) {
            let mut carousel = Carousel::new(n);
            carousel.jump_to(start_seed % (n + 1));
            let before = carousel.clone();
            carousel.next();
            carousel.previous();
            prop_assert_eq!(carousel, before);
        }

        #[test]
        fn prop_jump_ignores_prior_state(
            n in 0usize..40,
            steps in 0usize..100,
            target_seed in 0usize..1000,
        ) {
            let mut carousel = Carousel::new(n);
            for _ in 0..steps {
                carousel.next();
            }
            let target = target_seed % (n + 1);
            carousel.jump_to(target);
            prop_assert_eq!(carousel.index(), target);
        }
    }
}
