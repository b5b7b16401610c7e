//! Browser wiring: finds the page's attachment points, builds the controllers and forwards DOM
//! events to them. All behaviour lives in the controllers; this module only translates.

mod dom;
mod feed;

use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};

use anyhow::Context as _;
use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

use crate::cart::CartEngine;
use crate::config::SiteConfig;
use crate::likes::LikeBook;
use crate::gallery::Gallery;
use crate::keyboard::{route_key, KeyRoute};
use crate::modal::{KeyOutcome, NavKey, ProjectModal};
use crate::panel::{attach_badge, CartPanel, SharedCart};
use crate::project::Project;
use crate::render::{ACTION_ATTR, GALLERY_ATTR, LIKE_ATTR, SLIDE_ATTR};
use crate::store::{CartStore, KeyValueStore, LocalStorage, MemoryStore};
use crate::transition::Pending;
use crate::view::{CartPanelSurface, Detached, GallerySurface, ModalSurface};

use dom::{DomBadge, DomCartPanel, DomGallery, DomModal, ScrollHold, ScrollLock};

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

/// Moved pointer distance after which a touch drag stops the page from scrolling.
const SCROLL_GUARD_PX: f64 = 10.0;

pub(crate) struct App {
    document: Document,
    cart: SharedCart,
    panel: RefCell<CartPanel>,
    modal: RefCell<ProjectModal>,
    gallery: RefCell<Gallery>,
    gallery_url: String,
    carousel: Option<HtmlElement>,
    panel_timer: RefCell<Option<Timeout>>,
    modal_timer: RefCell<Option<Timeout>>,
    listeners: RefCell<Vec<EventListener>>,
}

pub(crate) fn with_app(f: impl FnOnce(&Rc<App>)) {
    let app = APP.with(|slot| slot.borrow().clone());
    match app {
        Some(app) => f(&app),
        None => log::warn!("storefront is not mounted"),
    }
}

pub(crate) fn mount() -> anyhow::Result<()> {
    let document = web_sys::window()
        .context("no window")?
        .document()
        .context("no document")?;
    let config = read_config(&document);

    let cart: SharedCart = Rc::new(RefCell::new(CartEngine::new(CartStore::new(
        open_backend(),
        config.cart_storage_key.clone(),
    ))));
    for id in ["cart-item-count", "mobile-cart-item-count"] {
        if let Some(badge) = DomBadge::find(&document, id) {
            attach_badge(&cart, Rc::new(RefCell::new(badge)));
        }
    }

    let scroll = ScrollLock::new(&document);
    let panel_surface: Rc<RefCell<dyn CartPanelSurface>> =
        match DomCartPanel::find(&document, ScrollHold::new(Rc::clone(&scroll))) {
            Some(surface) => Rc::new(RefCell::new(surface)),
            None => Rc::new(RefCell::new(Detached)),
        };
    let modal_surface: Rc<RefCell<dyn ModalSurface>> =
        match DomModal::find(&document, ScrollHold::new(Rc::clone(&scroll))) {
            Some(surface) => Rc::new(RefCell::new(surface)),
            None => Rc::new(RefCell::new(Detached)),
        };

    let panel = CartPanel::new(Rc::clone(&cart), panel_surface, &config);
    let likes = LikeBook::load(open_backend(), config.likes_storage_key.clone());
    let modal = ProjectModal::new(Rc::clone(&cart), modal_surface, &config).with_likes(likes);
    let gallery_surface: Rc<RefCell<dyn GallerySurface>> = match DomGallery::find(&document) {
        Some(surface) => Rc::new(RefCell::new(surface)),
        None => Rc::new(RefCell::new(Detached)),
    };
    let gallery = Gallery::new(gallery_surface, &config);

    let app = Rc::new(App {
        carousel: dom::html_element(&document, "image-carousel"),
        document,
        cart,
        panel: RefCell::new(panel),
        modal: RefCell::new(modal),
        gallery: RefCell::new(gallery),
        gallery_url: config.gallery_url.clone(),
        panel_timer: RefCell::new(None),
        modal_timer: RefCell::new(None),
        listeners: RefCell::new(Vec::new()),
    });
    app.bind();
    APP.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&app)));

    app.reload_gallery();
    log::info!("storefront mounted, {} item(s) in cart", app.cart.borrow().item_count());
    Ok(())
}

fn read_config(document: &Document) -> SiteConfig {
    let Some(text) = document.get_element_by_id("site-config").and_then(|e| e.text_content()) else {
        return SiteConfig::default();
    };
    SiteConfig::from_json(&text).unwrap_or_else(|e| {
        log::warn!("ignoring malformed site-config: {e}");
        SiteConfig::default()
    })
}

fn open_backend() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("{e}; cart will not survive a reload");
            Box::new(MemoryStore::new())
        }
    }
}

impl App {
    fn bind(self: &Rc<Self>) {
        let mut listeners = Vec::new();

        let app = Rc::downgrade(self);
        listeners.push(EventListener::new(&self.document, "click", move |event| {
            if let Some(app) = app.upgrade() {
                app.route_click(event);
            }
        }));

        let app = Rc::downgrade(self);
        let options = EventListenerOptions::enable_prevent_default();
        listeners.push(EventListener::new_with_options(&self.document, "keydown", options, move |event| {
            if let Some(app) = app.upgrade() {
                app.route_keydown(event);
            }
        }));

        if let Some(carousel) = &self.carousel {
            self.bind_drag(carousel, &mut listeners);
        }
        self.listeners.borrow_mut().extend(listeners);
    }

    fn bind_drag(self: &Rc<Self>, carousel: &HtmlElement, listeners: &mut Vec<EventListener>) {
        for kind in ["mousedown", "touchstart"] {
            let app = Rc::downgrade(self);
            listeners.push(EventListener::new(carousel, kind, move |event| {
                let Some(app) = app.upgrade() else { return };
                if event.dyn_ref::<MouseEvent>().is_some_and(|m| m.button() != 0) {
                    return;
                }
                if let Some(x) = pointer_x(event) {
                    app.modal.borrow_mut().begin_drag(-x);
                }
            }));
        }
        for kind in ["mousemove", "touchmove"] {
            let app = Rc::downgrade(self);
            let options = EventListenerOptions::enable_prevent_default();
            listeners.push(EventListener::new_with_options(carousel, kind, options, move |event| {
                let Some(app) = app.upgrade() else { return };
                let Some(x) = pointer_x(event) else { return };
                let mut modal = app.modal.borrow_mut();
                modal.update_drag(-x);
                let offset = modal.carousel().and_then(|c| c.drag()).map(|d| d.offset);
                if offset.is_some_and(|o| o.abs() > SCROLL_GUARD_PX) && event.cancelable() {
                    event.prevent_default();
                }
            }));
        }
        for kind in ["mouseup", "mouseleave", "touchend", "touchcancel"] {
            let app = Rc::downgrade(self);
            let host = carousel.clone();
            listeners.push(EventListener::new(carousel, kind, move |_| {
                let Some(app) = app.upgrade() else { return };
                let extent = f64::from(host.offset_width());
                app.modal.borrow_mut().end_drag(extent);
            }));
        }
    }

    fn route_keydown(self: &Rc<Self>, event: &Event) {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().and_then(|e| NavKey::from_key(&e.key())) else {
            return;
        };
        // Typing in a form field keeps the arrows; Escape still closes.
        if key != NavKey::Escape && is_text_entry(event) {
            return;
        }
        let route = route_key(key, &mut self.panel.borrow_mut(), &mut self.modal.borrow_mut());
        if route.consumed() {
            event.prevent_default();
        }
        match route {
            KeyRoute::Panel(pending) => self.schedule_panel(pending),
            KeyRoute::Modal(KeyOutcome::Closed(pending)) => self.after_modal_close(pending),
            KeyRoute::Modal(_) | KeyRoute::Ignored => {}
        }
    }

    fn route_click(self: &Rc<Self>, event: &Event) {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let hit = |selector: &str| target.closest(selector).ok().flatten();

        if let Some(control) = hit(format!("[{ACTION_ATTR}]").as_str()) {
            self.cart_action(&control);
        } else if hit("#cart-toggle-button, #mobile-cart-toggle").is_some() {
            self.open_cart();
        } else if hit("#close-cart-button").is_some() || target.id() == "cart-backdrop" {
            self.close_cart();
        } else if hit("#modal-close-button").is_some() || target.id() == "modal-backdrop" {
            self.close_modal();
        } else if hit("#modal-prev-image").is_some() {
            self.modal.borrow_mut().previous();
        } else if hit("#modal-next-image").is_some() {
            self.modal.borrow_mut().next();
        } else if let Some(control) = hit(format!("#project-modal [{SLIDE_ATTR}]").as_str()) {
            if let Some(index) = control.get_attribute(SLIDE_ATTR).and_then(|v| v.parse().ok()) {
                self.modal.borrow_mut().select(index);
            }
        } else if hit("#modal-add-to-cart").is_some() {
            self.add_from_modal();
        } else if hit("#modal-like-button").is_some() {
            self.toggle_modal_like();
        } else if let Some(button) = hit(format!("[{LIKE_ATTR}]").as_str()) {
            if let Some(id) = button.get_attribute(LIKE_ATTR) {
                event.prevent_default();
                self.gallery.borrow_mut().toggle_like(&id, &mut self.modal.borrow_mut());
            }
        } else if hit(format!("[{GALLERY_ATTR}=\"retry\"]").as_str()).is_some() {
            self.reload_gallery();
        } else if let Some(card) = hit(".view-project-btn, .project-card") {
            if hit("a, button").is_some() && card.class_list().contains("project-card") {
                // Links and buttons inside a card keep their own behaviour.
                return;
            }
            if let Some(id) = card.get_attribute("data-project-id") {
                event.prevent_default();
                self.open_project(&id);
            }
        }
    }

    fn cart_action(self: &Rc<Self>, control: &Element) {
        let id = control.get_attribute("data-id");
        match (control.get_attribute(ACTION_ATTR).as_deref(), id) {
            (Some("close"), _) => self.close_cart(),
            (Some("quantity"), Some(id)) => {
                let Some(quantity) = control.get_attribute("data-quantity").and_then(|q| q.parse::<i64>().ok()) else {
                    return;
                };
                self.panel.borrow_mut().change_quantity(&id, quantity);
            }
            (Some("remove"), Some(id)) => {
                self.panel.borrow_mut().remove(&id);
                log::info!("removed `{id}` from cart");
            }
            // Checkout hands off to the order form, which lives outside this crate.
            (Some("checkout"), _) => log::info!("checkout requested"),
            (action, _) => log::debug!("unhandled cart action {action:?}"),
        }
    }

    pub(crate) fn open_cart(self: &Rc<Self>) {
        let pending = self.panel.borrow_mut().request_open();
        self.schedule_panel(pending);
    }

    fn close_cart(self: &Rc<Self>) {
        let pending = self.panel.borrow_mut().request_close();
        self.schedule_panel(pending);
    }

    pub(crate) fn open_project(self: &Rc<Self>, id: &str) {
        let project = self.gallery.borrow().find(id).cloned();
        match project {
            Some(project) => self.open_modal(project),
            None => log::error!("project `{id}` not found in gallery"),
        }
    }

    pub(crate) fn add_project_to_cart(self: &Rc<Self>, id: &str) {
        let line = self.gallery.borrow().find(id).map(|p| p.cart_line(p.image_list().into_iter().next()));
        match line {
            Some(Ok(line)) => {
                self.cart.borrow_mut().add_item(line);
                self.open_cart();
            }
            Some(Err(e)) => log::warn!("cannot add `{id}` to cart: {e}"),
            None => log::error!("project `{id}` not found in gallery"),
        }
    }

    fn open_modal(self: &Rc<Self>, project: Project) {
        self.modal_timer.borrow_mut().take();
        self.modal.borrow_mut().open(project);
    }

    fn close_modal(self: &Rc<Self>) {
        let pending = self.modal.borrow_mut().close();
        if let Some(pending) = pending {
            self.after_modal_close(pending);
        }
    }

    fn after_modal_close(self: &Rc<Self>, pending: Pending) {
        let app = Rc::downgrade(self);
        let timeout = Timeout::new(millis(&pending), move || {
            if let Some(app) = app.upgrade() {
                app.modal.borrow_mut().hide_elapsed(pending.ticket);
            }
        });
        *self.modal_timer.borrow_mut() = Some(timeout);
    }

    fn toggle_modal_like(self: &Rc<Self>) {
        let mut modal = self.modal.borrow_mut();
        if modal.toggle_like().is_none() {
            return;
        }
        let id = modal.project().and_then(|p| p.id.clone());
        if let Some(id) = id {
            self.gallery.borrow_mut().sync_likes(&id, &modal);
        }
    }

    fn reload_gallery(self: &Rc<Self>) {
        execute(feed::load(Rc::downgrade(self), self.gallery_url.clone()));
    }

    fn add_from_modal(self: &Rc<Self>) {
        let added = self.modal.borrow_mut().add_to_cart();
        match added {
            Ok(true) => self.open_cart(),
            Ok(false) => {}
            Err(e) => log::warn!("add to cart skipped: {e}"),
        }
    }

    /// Replaces (and so cancels) any timer still pending for the panel.
    fn schedule_panel(self: &Rc<Self>, pending: Option<Pending>) {
        let Some(pending) = pending else { return };
        let app: Weak<App> = Rc::downgrade(self);
        let timeout = Timeout::new(millis(&pending), move || {
            if let Some(app) = app.upgrade() {
                app.panel.borrow_mut().transition_elapsed(pending.ticket);
            }
        });
        *self.panel_timer.borrow_mut() = Some(timeout);
    }
}

fn millis(pending: &Pending) -> u32 {
    u32::try_from(pending.after.as_millis()).unwrap_or(u32::MAX)
}

fn pointer_x(event: &Event) -> Option<f64> {
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        return Some(f64::from(mouse.page_x()));
    }
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some(f64::from(touch.client_x()))
}

fn is_text_entry(event: &Event) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .is_some_and(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA"))
}

// Executes an async future on the browser's event loop
fn execute<F: Future<Output = ()> + 'static>(f: F) {
    wasm_bindgen_futures::spawn_local(f);
}
