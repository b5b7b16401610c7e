use std::cell::RefCell;
use std::rc::Rc;

use storefront_ui::modal::{KeyOutcome, NavKey};
use storefront_ui::{route_key, KeyRoute};
use storefront_ui::view::{CartPanelSurface, Detached, PanelState, PanelView};
use storefront_ui::{
    CartEngine, CartPanel, CartStore, MemoryStore, Project, ProjectModal, SharedCart, SiteConfig,
};

#[derive(Default)]
struct PanelRecorder {
    last: Option<PanelView>,
}

impl CartPanelSurface for PanelRecorder {
    fn show_state(&mut self, _state: PanelState) {}
    fn render(&mut self, view: &PanelView) {
        self.last = Some(view.clone());
    }
    fn set_scroll_locked(&mut self, _locked: bool) {}
}

fn shared_cart(mem: &MemoryStore) -> SharedCart {
    Rc::new(RefCell::new(CartEngine::new(CartStore::new(Box::new(mem.clone()), "cart"))))
}

#[test]
fn modal_keyboard_session_resets_on_reopen() {
    let config = SiteConfig::default();
    let cart = shared_cart(&MemoryStore::new());
    let mut modal = ProjectModal::new(cart, Rc::new(RefCell::new(Detached)), &config);
    let project = Project {
        id: Some("dragon".into()),
        images: vec!["a".into(), "b".into(), "c".into()],
        ..Project::default()
    };
    let index = |m: &ProjectModal| m.carousel().map(|c| c.current());

    modal.open(project.clone());
    assert_eq!(index(&modal), Some(0));
    modal.handle_key(NavKey::ArrowRight);
    modal.handle_key(NavKey::ArrowRight);
    assert_eq!(index(&modal), Some(2));
    modal.handle_key(NavKey::ArrowRight);
    assert_eq!(index(&modal), Some(0));

    match modal.handle_key(NavKey::Escape) {
        KeyOutcome::Closed(pending) => modal.hide_elapsed(pending.ticket),
        other => panic!("expected close, got {other:?}"),
    }
    assert_eq!(index(&modal), None);

    modal.open(project);
    assert_eq!(index(&modal), Some(0));
}

#[test]
fn cart_panel_lifecycle_with_storage() {
    let config = SiteConfig::default();
    let mem = MemoryStore::new();
    let cart = shared_cart(&mem);
    let surface = Rc::new(RefCell::new(PanelRecorder::default()));
    let mut panel = CartPanel::new(Rc::clone(&cart), surface.clone(), &config);

    let pending = panel.request_open().expect("closed panel opens");
    panel.transition_elapsed(pending.ticket);
    assert_eq!(panel.state(), PanelState::Open);
    assert_eq!(surface.borrow().last, Some(PanelView::Empty));
    assert_eq!(cart.borrow().item_count(), 0);

    let mut modal = ProjectModal::new(Rc::clone(&cart), Rc::new(RefCell::new(Detached)), &config);
    modal.open(Project {
        id: Some("vase".into()),
        title: Some("Spiral Vase".into()),
        price_from: Some(120.0),
        ..Project::default()
    });
    assert_eq!(modal.add_to_cart(), Ok(true));
    assert_eq!(cart.borrow().item_count(), 1);
    assert_eq!(cart.borrow().subtotal(), 120.0);
    // Placeholder slides are never stored as the line image.
    assert_eq!(cart.borrow().cart().get("vase").unwrap().image_ref, None);

    panel.change_quantity("vase", 3);
    assert_eq!(cart.borrow().subtotal(), 360.0);
    match surface.borrow().last.as_ref() {
        Some(PanelView::Filled { subtotal, .. }) => assert_eq!(subtotal, "360.00 EGP"),
        other => panic!("expected filled view, got {other:?}"),
    }

    panel.remove("vase");
    assert_eq!(surface.borrow().last, Some(PanelView::Empty));
    assert_eq!(mem.raw("cart").as_deref(), Some("[]"));

    let reloaded = shared_cart(&mem);
    assert!(reloaded.borrow().cart().is_empty());
}

#[test]
fn escape_closes_the_cart_panel_before_the_modal() {
    let config = SiteConfig::default();
    let cart = shared_cart(&MemoryStore::new());
    let mut panel = CartPanel::new(Rc::clone(&cart), Rc::new(RefCell::new(Detached)), &config);
    let mut modal = ProjectModal::new(cart, Rc::new(RefCell::new(Detached)), &config);
    modal.open(Project {
        id: Some("lamp".into()),
        images: vec!["a".into(), "b".into()],
        ..Project::default()
    });
    let pending = panel.request_open().expect("closed panel opens");
    panel.transition_elapsed(pending.ticket);

    let closing = match route_key(NavKey::Escape, &mut panel, &mut modal) {
        KeyRoute::Panel(Some(pending)) => pending,
        other => panic!("expected the panel to take Escape, got {other:?}"),
    };
    assert_eq!(panel.state(), PanelState::Closing);
    assert!(modal.is_open());

    // Still the panel's while it slides out.
    let route = route_key(NavKey::Escape, &mut panel, &mut modal);
    assert_eq!(route, KeyRoute::Panel(None));
    assert!(route.consumed());
    assert!(modal.is_open());

    // Arrows are never the panel's.
    let route = route_key(NavKey::ArrowRight, &mut panel, &mut modal);
    assert_eq!(route, KeyRoute::Modal(KeyOutcome::Handled));
    assert_eq!(modal.carousel().map(|c| c.current()), Some(1));

    panel.transition_elapsed(closing.ticket);
    assert_eq!(panel.state(), PanelState::Closed);
    assert!(matches!(
        route_key(NavKey::Escape, &mut panel, &mut modal),
        KeyRoute::Modal(KeyOutcome::Closed(_))
    ));
    assert!(!modal.is_open());

    let route = route_key(NavKey::Escape, &mut panel, &mut modal);
    assert_eq!(route, KeyRoute::Ignored);
    assert!(!route.consumed());
}
