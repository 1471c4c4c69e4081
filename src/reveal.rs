//! Scroll-reveal, pointer-light and form rules, independent of the DOM.
//!
//! The browser layer feeds intersection and input events through these and
//! applies the returned class/style changes.

use crate::config::{
    ITEM_VISIBLE_CLASS, REVEAL_STEP_MS, SECTION_VISIBLE_CLASS, SKILL_VISIBLE_CLASS, VISIBLE_CLASS,
};

/// The three visibility observers installed on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observer {
    /// Timeline items; delay applied as a CSS transition delay.
    Timeline,
    /// Sections; reveals their `.reveal-item` descendants on a timer.
    Section,
    /// Skill items; keeps observing after the first reveal.
    Skill,
}

/// How a reveal delay is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    /// Class added now, no style change.
    Immediate,
    /// Class added now, `transition-delay` set to the value.
    Transition(i32),
    /// Class added after a timer of the value.
    Timer(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    pub class: &'static str,
    pub delay: Delay,
    /// Stop observing the target afterwards.
    pub unobserve: bool,
}

/// Delay for the element at `position` in its stagger group.
pub fn stagger_ms(position: usize) -> i32 {
    i32::try_from(position)
        .unwrap_or(i32::MAX)
        .saturating_mul(REVEAL_STEP_MS)
}

impl Observer {
    /// What to do with an intersection entry. `position` is the target's
    /// ordinal: among all timeline items for [`Observer::Timeline`], among
    /// its siblings for [`Observer::Skill`], ignored for sections.
    pub fn on_entry(self, intersecting: bool, position: usize) -> Option<Reveal> {
        if !intersecting {
            return None;
        }
        Some(match self {
            Observer::Timeline => Reveal {
                class: VISIBLE_CLASS,
                delay: Delay::Transition(stagger_ms(position)),
                unobserve: true,
            },
            Observer::Section => Reveal {
                class: SECTION_VISIBLE_CLASS,
                delay: Delay::Immediate,
                unobserve: true,
            },
            Observer::Skill => Reveal {
                class: SKILL_VISIBLE_CLASS,
                delay: Delay::Timer(stagger_ms(position)),
                unobserve: false,
            },
        })
    }
}

/// Staggered reveals for the `count` reveal items of a section that just
/// became visible.
pub fn section_items(count: usize) -> impl Iterator<Item = Reveal> {
    (0..count).map(|i| Reveal {
        class: ITEM_VISIBLE_CLASS,
        delay: Delay::Timer(stagger_ms(i)),
        unobserve: false,
    })
}

/// Pointer position relative to the card, formatted as CSS lengths.
pub fn light_offset(client: (f64, f64), card_origin: (f64, f64)) -> (String, String) {
    (
        format!("{}px", client.0 - card_origin.0),
        format!("{}px", client.1 - card_origin.1),
    )
}

/// A field wrapper keeps its `focused` class on blur while it has content.
pub fn keep_focus_on_blur(value: &str) -> bool {
    !value.is_empty()
}
