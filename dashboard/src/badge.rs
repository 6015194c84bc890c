//! Status badge: the visual fragment for a position state.

use lockvote_positions::PositionState;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Red,
    Yellow,
    Green,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DotColor {
    Green,
    Orange,
    Red,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Lock,
    Unlock,
    Clock,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: &'static str,
    pub tag: TagColor,
    pub dot: DotColor,
    pub icons: &'static [Icon],
}

impl StatusBadge {
    pub fn for_state(state: PositionState) -> Self {
        match state {
            PositionState::Locked => Self {
                label: state.label(),
                tag: TagColor::Red,
                dot: DotColor::Green,
                icons: &[Icon::Lock],
            },
            PositionState::Unlocking => Self {
                label: state.label(),
                tag: TagColor::Yellow,
                dot: DotColor::Orange,
                icons: &[Icon::Unlock, Icon::Clock],
            },
            PositionState::Unlocked => Self {
                label: state.label(),
                tag: TagColor::Green,
                dot: DotColor::Red,
                icons: &[Icon::Unlock],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlocking_shows_clock() {
        let badge = StatusBadge::for_state(PositionState::Unlocking);
        assert_eq!(badge.label, "Unlocking...");
        assert_eq!(badge.tag, TagColor::Yellow);
        assert_eq!(badge.icons, &[Icon::Unlock, Icon::Clock]);
    }

    #[test]
    fn locked_and_unlocked_swap_colors() {
        let locked = StatusBadge::for_state(PositionState::Locked);
        let unlocked = StatusBadge::for_state(PositionState::Unlocked);
        assert_eq!((locked.tag, locked.dot), (TagColor::Red, DotColor::Green));
        assert_eq!((unlocked.tag, unlocked.dot), (TagColor::Green, DotColor::Red));
    }
}
