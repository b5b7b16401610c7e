//! Cart slide-in panel and header badges.
//!
//! `Closed -> Opening -> Open -> Closing -> Closed`. The transient states last one transition
//! timer each and cannot be skipped: open requests while `Closing` and close requests while
//! `Opening` are ignored.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::cart::CartEngine;
use crate::config::SiteConfig;
use crate::transition::{Pending, Ticket, TransitionSlot};
use crate::view::{BadgeSurface, CartPanelSurface, PanelState, PanelView};

pub type SharedCart = Rc<RefCell<CartEngine>>;

pub struct CartPanel {
    state: Rc<Cell<PanelState>>,
    timer: TransitionSlot,
    transition: Duration,
    cart: SharedCart,
    surface: Rc<RefCell<dyn CartPanelSurface>>,
    currency: String,
}

impl CartPanel {
    /// Subscribes the panel to `cart`; the list re-renders on every change while the panel is
    /// anywhere but `Closed`.
    pub fn new(cart: SharedCart, surface: Rc<RefCell<dyn CartPanelSurface>>, config: &SiteConfig) -> Self {
        let state = Rc::new(Cell::new(PanelState::Closed));
        {
            let state = Rc::clone(&state);
            let surface = Rc::clone(&surface);
            let currency = config.currency.clone();
            cart.borrow_mut().subscribe(move |cart| {
                if state.get() != PanelState::Closed {
                    surface.borrow_mut().render(&PanelView::of(cart, &currency));
                }
            });
        }
        Self {
            state,
            timer: TransitionSlot::default(),
            transition: config.panel_transition(),
            cart,
            surface,
            currency: config.currency.clone(),
        }
    }

    pub fn state(&self) -> PanelState {
        self.state.get()
    }

    pub fn request_open(&mut self) -> Option<Pending> {
        match self.state.get() {
            PanelState::Closed => {
                let view = PanelView::of(self.cart.borrow().cart(), &self.currency);
                self.enter(PanelState::Opening);
                let mut surface = self.surface.borrow_mut();
                surface.set_scroll_locked(true);
                surface.render(&view);
                drop(surface);
                Some(self.timer.arm(self.transition))
            }
            PanelState::Opening | PanelState::Open => None,
            PanelState::Closing => {
                log::debug!("cart panel open ignored while closing");
                None
            }
        }
    }

    /// Explicit close control, backdrop or "continue shopping". Only honoured while `Open`.
    pub fn request_close(&mut self) -> Option<Pending> {
        match self.state.get() {
            PanelState::Open => {
                self.enter(PanelState::Closing);
                Some(self.timer.arm(self.transition))
            }
            PanelState::Opening => {
                log::debug!("cart panel close ignored while opening");
                None
            }
            PanelState::Closing | PanelState::Closed => None,
        }
    }

    pub fn toggle(&mut self) -> Option<Pending> {
        match self.state.get() {
            PanelState::Closed => self.request_open(),
            _ => self.request_close(),
        }
    }

    pub fn handle_escape(&mut self) -> Option<Pending> {
        self.request_close()
    }

    /// Host callback for an elapsed transition timer. Stale tickets are ignored.
    pub fn transition_elapsed(&mut self, ticket: Ticket) {
        if !self.timer.fire(ticket) {
            return;
        }
        match self.state.get() {
            PanelState::Opening => self.enter(PanelState::Open),
            PanelState::Closing => {
                self.enter(PanelState::Closed);
                self.surface.borrow_mut().set_scroll_locked(false);
            }
            PanelState::Open | PanelState::Closed => {}
        }
    }

    pub fn change_quantity(&mut self, id: &str, quantity: i64) {
        self.cart.borrow_mut().set_quantity(id, quantity);
    }

    pub fn remove(&mut self, id: &str) {
        self.cart.borrow_mut().remove_item(id);
    }

    fn enter(&mut self, state: PanelState) {
        self.state.set(state);
        self.surface.borrow_mut().show_state(state);
    }
}

/// Keeps `badge` showing the cart's item count.
pub fn attach_badge(cart: &SharedCart, badge: Rc<RefCell<dyn BadgeSurface>>) {
    cart.borrow_mut()
        .subscribe(move |cart| badge.borrow_mut().set_count(cart.item_count()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::store::{CartStore, MemoryStore};

    #[derive(Default)]
    struct Recorder {
        states: Vec<PanelState>,
        renders: Vec<PanelView>,
        scroll_locked: bool,
    }

    impl CartPanelSurface for Recorder {
        fn show_state(&mut self, state: PanelState) {
            self.states.push(state);
        }
        fn render(&mut self, view: &PanelView) {
            self.renders.push(view.clone());
        }
        fn set_scroll_locked(&mut self, locked: bool) {
            self.scroll_locked = locked;
        }
    }

    #[derive(Default)]
    struct Badge(Vec<u32>);

    impl BadgeSurface for Badge {
        fn set_count(&mut self, count: u32) {
            self.0.push(count);
        }
    }

    fn panel() -> (SharedCart, Rc<RefCell<Recorder>>, CartPanel) {
        let cart: SharedCart = Rc::new(RefCell::new(CartEngine::new(CartStore::new(
            Box::new(MemoryStore::new()),
            "cart",
        ))));
        let surface = Rc::new(RefCell::new(Recorder::default()));
        let panel = CartPanel::new(Rc::clone(&cart), surface.clone(), &SiteConfig::default());
        (cart, surface, panel)
    }

    fn open(panel: &mut CartPanel) {
        let pending = panel.request_open().unwrap();
        panel.transition_elapsed(pending.ticket);
    }

    #[test]
    fn full_cycle() {
        let (_, surface, mut panel) = panel();
        let pending = panel.request_open().unwrap();
        assert_eq!(pending.after, Duration::from_millis(300));
        assert_eq!(panel.state(), PanelState::Opening);
        assert!(surface.borrow().scroll_locked);
        panel.transition_elapsed(pending.ticket);
        assert_eq!(panel.state(), PanelState::Open);

        let pending = panel.handle_escape().unwrap();
        assert_eq!(panel.state(), PanelState::Closing);
        assert!(surface.borrow().scroll_locked);
        panel.transition_elapsed(pending.ticket);
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(!surface.borrow().scroll_locked);
        assert_eq!(
            surface.borrow().states,
            [PanelState::Opening, PanelState::Open, PanelState::Closing, PanelState::Closed]
        );
    }

    #[test]
    fn transitions_cannot_be_skipped() {
        let (_, _, mut panel) = panel();
        let opening = panel.request_open().unwrap();
        assert!(panel.request_close().is_none());
        assert!(panel.toggle().is_none());
        assert!(panel.request_open().is_none());
        assert_eq!(panel.state(), PanelState::Opening);
        panel.transition_elapsed(opening.ticket);

        let closing = panel.request_close().unwrap();
        assert!(panel.request_open().is_none());
        assert!(panel.request_close().is_none());
        panel.transition_elapsed(closing.ticket);
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn stale_tickets_are_ignored() {
        let (_, _, mut panel) = panel();
        let opening = panel.request_open().unwrap();
        panel.transition_elapsed(opening.ticket);
        let closing = panel.request_close().unwrap();
        panel.transition_elapsed(opening.ticket);
        assert_eq!(panel.state(), PanelState::Closing);
        panel.transition_elapsed(closing.ticket);
        panel.transition_elapsed(closing.ticket);
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn escape_while_closed_does_nothing() {
        let (_, surface, mut panel) = panel();
        assert!(panel.handle_escape().is_none());
        assert!(surface.borrow().states.is_empty());
    }

    #[test]
    fn renders_only_while_visible() {
        let (cart, surface, mut panel) = panel();
        cart.borrow_mut().add_item(CartLine::new("x", "Gear", 10.0).unwrap());
        assert!(surface.borrow().renders.is_empty());

        open(&mut panel);
        assert_eq!(surface.borrow().renders.len(), 1);
        panel.change_quantity("x", 3);
        let last = surface.borrow().renders.last().cloned().unwrap();
        let PanelView::Filled { lines, subtotal } = last else {
            panic!("expected lines");
        };
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(subtotal, "30.00 EGP");

        panel.remove("x");
        assert_eq!(surface.borrow().renders.last(), Some(&PanelView::Empty));
    }

    #[test]
    fn badges_follow_item_count() {
        let (cart, _, _panel) = panel();
        let badge = Rc::new(RefCell::new(Badge::default()));
        attach_badge(&cart, badge.clone());
        cart.borrow_mut().add_item(CartLine::new("x", "Gear", 10.0).unwrap().with_quantity(2));
        cart.borrow_mut().add_item(CartLine::new("y", "Cog", 1.0).unwrap());
        cart.borrow_mut().remove_item("x");
        assert_eq!(badge.borrow().0, [0, 2, 3, 1]);
    }
}
