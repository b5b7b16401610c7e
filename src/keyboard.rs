//! Page-wide key routing between the cart panel and the project modal.
//!
//! The panel slides in above the modal, so while it is anywhere but Closed it owns Escape and
//! the modal keeps its session. Every other key is the modal's, and only while it is open.

use crate::modal::{KeyOutcome, NavKey, ProjectModal};
use crate::panel::CartPanel;
use crate::transition::Pending;
use crate::view::PanelState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRoute {
    /// Escape went to the panel; carries the transition to schedule, if one started.
    Panel(Option<Pending>),
    Modal(KeyOutcome),
    Ignored,
}

impl KeyRoute {
    /// Whether the browser's default action for the key should be suppressed.
    pub fn consumed(&self) -> bool {
        match self {
            KeyRoute::Panel(_) => true,
            KeyRoute::Modal(outcome) => !matches!(outcome, KeyOutcome::Ignored),
            KeyRoute::Ignored => false,
        }
    }
}

pub fn route_key(key: NavKey, panel: &mut CartPanel, modal: &mut ProjectModal) -> KeyRoute {
    if key == NavKey::Escape && panel.state() != PanelState::Closed {
        return KeyRoute::Panel(panel.handle_escape());
    }
    if !modal.is_open() {
        return KeyRoute::Ignored;
    }
    KeyRoute::Modal(modal.handle_key(key))
}
