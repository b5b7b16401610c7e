//! Project detail modal: metadata, the image carousel and keyboard routing.
//!
//! Each `open` builds a fresh [`Carousel`]; nothing of it survives a close. Closing is
//! immediate for input purposes, and the surface gets a fixed delay to play its exit animation
//! before it is told to hide for good.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::cart::CartError;
use crate::carousel::{Carousel, DragOutcome};
use crate::config::SiteConfig;
use crate::likes::LikeBook;
use crate::panel::SharedCart;
use crate::project::Project;
use crate::transition::{Pending, Ticket, TransitionSlot};
use crate::view::{CarouselView, LikesView, ModalSurface, ModalView, SlideView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Escape,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
}

impl NavKey {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "Escape" | "Esc" => NavKey::Escape,
            "ArrowLeft" => NavKey::ArrowLeft,
            "ArrowRight" => NavKey::ArrowRight,
            "Home" => NavKey::Home,
            "End" => NavKey::End,
            _ => return None,
        })
    }
}

struct Session {
    project: Project,
    carousel: Carousel,
}

pub struct ProjectModal {
    session: Option<Session>,
    hide_timer: TransitionSlot,
    close_delay: Duration,
    surface: Rc<RefCell<dyn ModalSurface>>,
    cart: SharedCart,
    likes: Option<LikeBook>,
    currency: String,
    placeholder: String,
    drag_threshold: f64,
}

impl ProjectModal {
    pub fn new(cart: SharedCart, surface: Rc<RefCell<dyn ModalSurface>>, config: &SiteConfig) -> Self {
        Self {
            session: None,
            hide_timer: TransitionSlot::default(),
            close_delay: config.modal_close_delay(),
            surface,
            cart,
            likes: None,
            currency: config.currency.clone(),
            placeholder: config.placeholder_image.clone(),
            drag_threshold: config.drag_threshold,
        }
    }

    pub fn with_likes(mut self, likes: LikeBook) -> Self {
        self.likes = Some(likes);
        self
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn project(&self) -> Option<&Project> {
        self.session.as_ref().map(|s| &s.project)
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        self.session.as_ref().map(|s| &s.carousel)
    }

    /// Shows `project`, replacing whatever was open and cancelling a pending hide.
    pub fn open(&mut self, project: Project) {
        let was_visible = self.session.is_some() || self.hide_timer.is_armed();
        self.hide_timer.disarm();

        let carousel = Carousel::new(project.image_list(), &self.placeholder).with_threshold(self.drag_threshold);
        let view = self.view_of(&project, &carousel);
        let carousel_view = carousel_view(&carousel);
        self.session = Some(Session { project, carousel });

        let mut surface = self.surface.borrow_mut();
        if !was_visible {
            surface.set_scroll_locked(true);
        }
        surface.show_project(&view);
        surface.render_carousel(&carousel_view);
    }

    pub fn close(&mut self) -> Option<Pending> {
        self.session.take()?;
        self.surface.borrow_mut().begin_hide();
        Some(self.hide_timer.arm(self.close_delay))
    }

    /// Host callback for the hide delay. Ignored if the modal was reopened in the meantime.
    pub fn hide_elapsed(&mut self, ticket: Ticket) {
        if self.hide_timer.fire(ticket) {
            let mut surface = self.surface.borrow_mut();
            surface.finish_hide();
            surface.set_scroll_locked(false);
        }
    }

    /// Routes a key press. Nothing is consumed while closed; Escape hands back the pending hide.
    pub fn handle_key(&mut self, key: NavKey) -> KeyOutcome {
        if self.session.is_none() {
            return KeyOutcome::Ignored;
        }
        match key {
            NavKey::Escape => match self.close() {
                Some(pending) => KeyOutcome::Closed(pending),
                None => KeyOutcome::Ignored,
            },
            NavKey::ArrowLeft => self.navigate(Carousel::previous),
            NavKey::ArrowRight => self.navigate(Carousel::next),
            NavKey::Home => self.navigate(Carousel::first),
            NavKey::End => self.navigate(Carousel::last),
        }
    }

    pub fn next(&mut self) {
        self.navigate(Carousel::next);
    }

    pub fn previous(&mut self) {
        self.navigate(Carousel::previous);
    }

    pub fn select(&mut self, index: usize) {
        self.navigate(|c| c.select(index));
    }

    pub fn begin_drag(&mut self, position: f64) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.carousel.begin_drag(position) {
            return false;
        }
        self.render_carousel();
        true
    }

    pub fn update_drag(&mut self, position: f64) {
        let moved = self
            .session
            .as_mut()
            .and_then(|s| s.carousel.update_drag(position))
            .is_some();
        if moved {
            self.render_carousel();
        }
    }

    pub fn end_drag(&mut self, slide_extent: f64) -> DragOutcome {
        let Some(session) = self.session.as_mut() else {
            return DragOutcome::Idle;
        };
        let outcome = session.carousel.end_drag(slide_extent);
        if outcome != DragOutcome::Idle {
            self.render_carousel();
        }
        outcome
    }

    /// Adds one unit of the displayed project. Returns `Ok(false)` when nothing is open.
    pub fn add_to_cart(&mut self) -> Result<bool, CartError> {
        let Some(session) = self.session.as_ref() else {
            return Ok(false);
        };
        let image = (!session.carousel.is_placeholder()).then(|| session.carousel.slides()[0].clone());
        let line = session.project.cart_line(image)?;
        log::info!("adding `{}` to cart", line.id);
        self.cart.borrow_mut().add_item(line);
        Ok(true)
    }

    /// Flips the like on the open project. `None` when closed, without an id, or without a
    /// like book.
    pub fn toggle_like(&mut self) -> Option<bool> {
        let project = self.project()?;
        let id = project.id.clone()?;
        let base = project.likes.unwrap_or(0);
        self.flip_like(&id, base).map(|view| view.liked)
    }

    /// Flips the like on any gallery project. The modal's counter follows when it is showing
    /// the same project.
    pub fn toggle_like_of(&mut self, project: &Project) -> Option<LikesView> {
        let id = project.id.as_deref()?;
        self.flip_like(id, project.likes.unwrap_or(0))
    }

    pub fn likes_of(&self, project: &Project) -> Option<LikesView> {
        let book = self.likes.as_ref()?;
        let id = project.id.as_deref()?;
        Some(LikesView {
            count: book.displayed_count(project.likes.unwrap_or(0), id),
            liked: book.is_liked(id),
        })
    }

    fn flip_like(&mut self, id: &str, base: u64) -> Option<LikesView> {
        let likes = self.likes.as_mut()?;
        let liked = likes.toggle(id);
        let view = LikesView {
            count: likes.displayed_count(base, id),
            liked,
        };
        if self.project().and_then(|p| p.id.as_deref()) == Some(id) {
            self.surface.borrow_mut().render_likes(&view);
        }
        Some(view)
    }

    fn navigate(&mut self, step: impl FnOnce(&mut Carousel) -> usize) -> KeyOutcome {
        let Some(session) = self.session.as_mut() else {
            return KeyOutcome::Ignored;
        };
        step(&mut session.carousel);
        self.render_carousel();
        KeyOutcome::Handled
    }

    fn render_carousel(&self) {
        if let Some(session) = &self.session {
            self.surface.borrow_mut().render_carousel(&carousel_view(&session.carousel));
        }
    }

    fn view_of(&self, project: &Project, carousel: &Carousel) -> ModalView {
        let details = project.details(&self.currency);
        let slides = carousel
            .slides()
            .iter()
            .enumerate()
            .map(|(i, src)| SlideView {
                src: src.clone(),
                alt: format!("{} - Image {}", details.title, i + 1),
            })
            .collect();
        let likes = self.likes_of(project);
        ModalView {
            project_id: project.id.clone(),
            title: details.title,
            description: details.description,
            material: details.material,
            weight: details.weight,
            resolution: details.resolution,
            print_time: details.print_time,
            price: details.price,
            slides,
            show_navigation: carousel.len() > 1,
            likes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Handled,
    Closed(Pending),
}

fn carousel_view(carousel: &Carousel) -> CarouselView {
    CarouselView {
        current: carousel.current(),
        slide_count: carousel.len(),
        drag_offset: carousel.drag().map(|d| d.offset),
    }
}
