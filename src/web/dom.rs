//! DOM-backed surfaces. Each one is built from the page's attachment points; a missing
//! required element means the caller falls back to [`crate::view::Detached`].

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::render;
use crate::view::{
    BadgeSurface, CarouselView, CartPanelSurface, GallerySurface, GalleryView, LikesView, ModalSurface, ModalView,
    PanelState, PanelView,
};

pub(crate) fn element(document: &Document, id: &str) -> Option<Element> {
    let found = document.get_element_by_id(id);
    if found.is_none() {
        log::warn!("element #{id} not found");
    }
    found
}

pub(crate) fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
    element(document, id)?.dyn_into::<HtmlElement>().ok()
}

fn optional(document: &Document, id: &str) -> Option<Element> {
    document.get_element_by_id(id)
}

fn classes(el: &Element, add: &[&str], remove: &[&str]) {
    let list = el.class_list();
    for c in remove {
        let _ = list.remove_1(c);
    }
    for c in add {
        let _ = list.add_1(c);
    }
}

fn set_hidden(el: &Element, hidden: bool) {
    let _ = el.class_list().toggle_with_force("hidden", hidden);
}

/// Reference-counted `overflow: hidden` on `<body>`; the panel and the modal can both hold it.
pub(crate) struct ScrollLock {
    holders: Cell<u32>,
    body: Option<HtmlElement>,
}

impl ScrollLock {
    pub(crate) fn new(document: &Document) -> Rc<Self> {
        Rc::new(Self {
            holders: Cell::new(0),
            body: document.body(),
        })
    }

    fn acquire(&self) {
        let n = self.holders.get() + 1;
        self.holders.set(n);
        if n == 1 {
            if let Some(body) = &self.body {
                let _ = body.style().set_property("overflow", "hidden");
            }
        }
    }

    fn release(&self) {
        let n = self.holders.get().saturating_sub(1);
        self.holders.set(n);
        if n == 0 {
            if let Some(body) = &self.body {
                let _ = body.style().remove_property("overflow");
            }
        }
    }
}

pub(crate) struct ScrollHold {
    lock: Rc<ScrollLock>,
    held: bool,
}

impl ScrollHold {
    pub(crate) fn new(lock: Rc<ScrollLock>) -> Self {
        Self { lock, held: false }
    }

    fn set(&mut self, locked: bool) {
        if locked == self.held {
            return;
        }
        self.held = locked;
        if locked { self.lock.acquire() } else { self.lock.release() }
    }
}

pub(crate) struct DomCartPanel {
    sidebar: HtmlElement,
    backdrop: HtmlElement,
    items: HtmlElement,
    scroll: ScrollHold,
}

impl DomCartPanel {
    pub(crate) fn find(document: &Document, scroll: ScrollHold) -> Option<Self> {
        Some(Self {
            sidebar: html_element(document, "cart-sidebar")?,
            backdrop: html_element(document, "cart-backdrop")?,
            items: html_element(document, "cart-items-container")?,
            scroll,
        })
    }
}

impl CartPanelSurface for DomCartPanel {
    fn show_state(&mut self, state: PanelState) {
        match state {
            PanelState::Opening => {
                set_hidden(&self.sidebar, false);
                set_hidden(&self.backdrop, false);
                // Flush layout so the slide-in transition starts from off-screen.
                let _ = self.sidebar.offset_width();
                classes(&self.sidebar, &["flex", "translate-x-0"], &["translate-x-full"]);
                classes(&self.backdrop, &["opacity-100"], &["opacity-0"]);
            }
            PanelState::Open => {}
            PanelState::Closing => {
                self.items.set_scroll_top(0);
                classes(&self.sidebar, &["translate-x-full"], &["translate-x-0"]);
                classes(&self.backdrop, &["opacity-0"], &["opacity-100"]);
            }
            PanelState::Closed => {
                classes(&self.sidebar, &[], &["flex"]);
                set_hidden(&self.sidebar, true);
                set_hidden(&self.backdrop, true);
            }
        }
    }

    fn render(&mut self, view: &PanelView) {
        self.items.set_inner_html(&render::cart_panel(view));
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll.set(locked);
    }
}

pub(crate) struct DomBadge {
    el: Element,
}

impl DomBadge {
    pub(crate) fn find(document: &Document, id: &str) -> Option<Self> {
        optional(document, id).map(|el| Self { el })
    }
}

impl BadgeSurface for DomBadge {
    fn set_count(&mut self, count: u32) {
        self.el.set_text_content(Some(count.to_string().as_str()));
        set_hidden(&self.el, count == 0);
    }
}

const DETAIL_FIELDS: [&str; 7] = [
    "modal-project-title",
    "modal-project-description",
    "modal-project-material",
    "modal-project-weight",
    "modal-project-resolution",
    "modal-project-print-time",
    "modal-project-price",
];

pub(crate) struct DomModal {
    modal: HtmlElement,
    slides: HtmlElement,
    details: Vec<Option<Element>>,
    close_button: Option<HtmlElement>,
    prev: Option<HtmlElement>,
    next: Option<HtmlElement>,
    indicators: Option<Element>,
    thumbnails: Option<Element>,
    like_button: Option<Element>,
    likes: Option<Element>,
    scroll: ScrollHold,
}

impl DomModal {
    pub(crate) fn find(document: &Document, scroll: ScrollHold) -> Option<Self> {
        let html = |id: &str| optional(document, id).and_then(|e| e.dyn_into::<HtmlElement>().ok());
        Some(Self {
            modal: html_element(document, "project-modal")?,
            slides: html_element(document, "carousel-slides")?,
            details: DETAIL_FIELDS.iter().map(|id| optional(document, id)).collect(),
            close_button: html("modal-close-button"),
            prev: html("modal-prev-image"),
            next: html("modal-next-image"),
            indicators: optional(document, "carousel-indicators"),
            thumbnails: optional(document, "modal-thumbnail-gallery"),
            like_button: optional(document, "modal-like-button"),
            likes: optional(document, "modal-likes"),
            scroll,
        })
    }

    fn highlight(container: &Option<Element>, current: usize, active: &[&str], inactive: &[&str]) {
        let Some(container) = container else { return };
        let Ok(buttons) = container.query_selector_all("button") else { return };
        for i in 0..buttons.length() {
            let Some(el) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let is_current = i as usize == current;
            if is_current {
                classes(&el, active, inactive);
                let _ = el.set_attribute("aria-current", "true");
            } else {
                classes(&el, inactive, active);
                let _ = el.remove_attribute("aria-current");
            }
        }
    }
}

impl ModalSurface for DomModal {
    fn show_project(&mut self, view: &ModalView) {
        let texts = [
            &view.title,
            &view.description,
            &view.material,
            &view.weight,
            &view.resolution,
            &view.print_time,
            &view.price,
        ];
        for (el, text) in self.details.iter().zip(texts) {
            if let Some(el) = el {
                el.set_text_content(Some(text.as_str()));
            }
        }
        match &view.project_id {
            Some(id) => {
                let _ = self.modal.set_attribute("data-project-id", id);
            }
            None => {
                let _ = self.modal.remove_attribute("data-project-id");
            }
        }

        self.slides.set_inner_html(&render::slides(&view.slides));
        let nav = if view.show_navigation { "flex" } else { "none" };
        for button in [&self.prev, &self.next].into_iter().flatten() {
            let _ = button.style().set_property("display", nav);
        }
        if let Some(el) = &self.indicators {
            el.set_inner_html(&if view.show_navigation { render::indicators(view.slides.len()) } else { String::new() });
        }
        if let Some(el) = &self.thumbnails {
            el.set_inner_html(&if view.show_navigation { render::thumbnails(&view.slides) } else { String::new() });
        }
        if let Some(likes) = &view.likes {
            self.render_likes(likes);
        }

        set_hidden(&self.modal, false);
        let _ = self.modal.set_attribute("aria-hidden", "false");
        let _ = self.modal.offset_width();
        classes(&self.modal, &["opacity-100"], &[]);
        if let Some(close) = &self.close_button {
            let _ = close.focus();
        }
    }

    fn render_carousel(&mut self, view: &CarouselView) {
        let style = self.slides.style();
        let transition = if view.drag_offset.is_some() { "none" } else { "transform 0.3s ease-out" };
        let _ = style.set_property("transition", transition);
        let _ = style.set_property("transform", &render::strip_transform(view));

        Self::highlight(&self.indicators, view.current, &["bg-brand-indigo", "w-4"], &["bg-gray-300"]);
        Self::highlight(&self.thumbnails, view.current, &["ring-2", "ring-brand-indigo"], &["opacity-50"]);
    }

    fn render_likes(&mut self, view: &LikesView) {
        if let Some(el) = &self.likes {
            el.set_text_content(Some(view.count.to_string().as_str()));
        }
        if let Some(el) = &self.like_button {
            let _ = el.class_list().toggle_with_force("text-red-500", view.liked);
            let _ = el.class_list().toggle_with_force("text-gray-400", !view.liked);
        }
    }

    fn begin_hide(&mut self) {
        classes(&self.modal, &[], &["opacity-100"]);
    }

    fn finish_hide(&mut self) {
        set_hidden(&self.modal, true);
        let _ = self.modal.set_attribute("aria-hidden", "true");
        self.slides.set_inner_html("");
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll.set(locked);
    }
}

pub(crate) struct DomGallery {
    document: Document,
    container: Element,
}

impl DomGallery {
    pub(crate) fn find(document: &Document) -> Option<Self> {
        Some(Self {
            container: element(document, "gallery-container")?,
            document: document.clone(),
        })
    }
}

impl GallerySurface for DomGallery {
    fn render(&mut self, view: &GalleryView) {
        self.container.set_inner_html(&render::gallery(view));
    }

    fn render_likes(&mut self, project_id: &str, view: &LikesView) {
        let (button, count) = render::like_ids(project_id);
        if let Some(el) = optional(&self.document, &count) {
            el.set_text_content(Some(crate::format::count(view.count).as_str()));
        }
        if let Some(el) = optional(&self.document, &button) {
            let _ = el.class_list().toggle_with_force("text-red-500", view.liked);
            let _ = el.class_list().toggle_with_force("text-gray-400", !view.liked);
            let _ = el.set_attribute("aria-pressed", if view.liked { "true" } else { "false" });
        }
    }
}
