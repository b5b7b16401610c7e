//! View models and the surfaces that draw them.
//!
//! Controllers push fully-formed views into a surface and never read anything back from it;
//! the in-memory state machines stay authoritative.

use crate::cart::Cart;
use crate::format;
use crate::project::Project;

/// Visibility of the cart panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub image: Option<String>,
    pub quantity: u32,
    /// Quantity the decrease control requests; reaching zero removes the line.
    pub decrease_to: i64,
    pub increase_to: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    Empty,
    Filled { lines: Vec<LineView>, subtotal: String },
}

impl PanelView {
    pub fn of(cart: &Cart, currency: &str) -> Self {
        if cart.is_empty() {
            return PanelView::Empty;
        }
        let lines = cart
            .lines()
            .iter()
            .map(|l| LineView {
                id: l.id.clone(),
                title: l.title.clone(),
                price: format::money(l.unit_price, currency),
                image: l.image_ref.clone(),
                quantity: l.quantity,
                decrease_to: i64::from(l.quantity) - 1,
                increase_to: i64::from(l.quantity) + 1,
            })
            .collect();
        PanelView::Filled {
            lines,
            subtotal: format::money(cart.subtotal(), currency),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlideView {
    pub src: String,
    pub alt: String,
}

/// Everything the modal shows for one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalView {
    pub project_id: Option<String>,
    pub title: String,
    pub description: String,
    pub material: String,
    pub weight: String,
    pub resolution: String,
    pub print_time: String,
    pub price: String,
    pub slides: Vec<SlideView>,
    /// Previous/next controls and thumbnails only make sense with more than one slide.
    pub show_navigation: bool,
    pub likes: Option<LikesView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikesView {
    pub count: u64,
    pub liked: bool,
}

/// Cursor position plus any live drag offset, in track units (see [`crate::carousel`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselView {
    pub current: usize,
    pub slide_count: usize,
    pub drag_offset: Option<f64>,
}

/// One gallery card. Projects without an id get no card: nothing could open them.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub price: String,
    /// Only the specifications the record actually carries, as `(label, value)`.
    pub specs: Vec<(&'static str, String)>,
    pub print_time: Option<String>,
    pub likes: LikesView,
}

impl CardView {
    pub fn of(project: &Project, currency: &str, placeholder: &str, likes: Option<LikesView>) -> Option<Self> {
        let id = project.id.as_deref().map(str::trim).filter(|id| !id.is_empty())?;
        let details = project.details(currency);
        let present = |v: &Option<String>| v.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned);
        let mut specs = Vec::new();
        if let Some(material) = present(&project.material) {
            specs.push(("Material", material));
        }
        if let Some(weight) = present(&project.weight) {
            specs.push(("Weight", format!("{weight}g")));
        }
        if let Some(resolution) = present(&project.resolution) {
            specs.push(("Resolution", format!("{resolution}mm")));
        }
        Some(Self {
            id: id.to_owned(),
            title: details.title,
            description: details.description,
            thumbnail: project
                .image_list()
                .into_iter()
                .next()
                .unwrap_or_else(|| placeholder.to_owned()),
            price: details.price,
            specs,
            print_time: present(&project.print_time),
            likes: likes.unwrap_or(LikesView {
                count: project.likes.unwrap_or(0),
                liked: false,
            }),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryView {
    Loading,
    /// The feed could not be fetched or parsed.
    Failed,
    /// An empty list is the "no projects" state.
    Cards(Vec<CardView>),
}

pub trait CartPanelSurface {
    fn show_state(&mut self, state: PanelState);
    fn render(&mut self, view: &PanelView);
    fn set_scroll_locked(&mut self, locked: bool);
}

pub trait BadgeSurface {
    /// Zero hides the badge.
    fn set_count(&mut self, count: u32);
}

pub trait ModalSurface {
    /// Populates and reveals the modal, moving focus inside it.
    fn show_project(&mut self, view: &ModalView);
    fn render_carousel(&mut self, view: &CarouselView);
    fn render_likes(&mut self, view: &LikesView);
    /// Starts the exit animation; the modal is still in the layout.
    fn begin_hide(&mut self);
    fn finish_hide(&mut self);
    fn set_scroll_locked(&mut self, locked: bool);
}

pub trait GallerySurface {
    fn render(&mut self, view: &GalleryView);
    fn render_likes(&mut self, project_id: &str, view: &LikesView);
}

/// Stand-in for a surface whose attachment point is missing from the page.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl CartPanelSurface for Detached {
    fn show_state(&mut self, _state: PanelState) {}
    fn render(&mut self, _view: &PanelView) {}
    fn set_scroll_locked(&mut self, _locked: bool) {}
}

impl BadgeSurface for Detached {
    fn set_count(&mut self, _count: u32) {}
}

impl GallerySurface for Detached {
    fn render(&mut self, _view: &GalleryView) {}
    fn render_likes(&mut self, _project_id: &str, _view: &LikesView) {}
}

impl ModalSurface for Detached {
    fn show_project(&mut self, _view: &ModalView) {}
    fn render_carousel(&mut self, _view: &CarouselView) {}
    fn render_likes(&mut self, _view: &LikesView) {}
    fn begin_hide(&mut self) {}
    fn finish_hide(&mut self) {}
    fn set_scroll_locked(&mut self, _locked: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartEngine, CartLine};
    use crate::store::{CartStore, MemoryStore};

    #[test]
    fn empty_cart_projects_to_empty_view() {
        let engine = CartEngine::new(CartStore::new(Box::new(MemoryStore::new()), "cart"));
        assert_eq!(PanelView::of(engine.cart(), "EGP"), PanelView::Empty);
    }

    #[test]
    fn filled_view_carries_quantity_targets() {
        let mut engine = CartEngine::new(CartStore::new(Box::new(MemoryStore::new()), "cart"));
        engine.add_item(CartLine::new("x", "Gear", 120.0).unwrap());
        let PanelView::Filled { lines, subtotal } = PanelView::of(engine.cart(), "EGP") else {
            panic!("expected lines");
        };
        assert_eq!(subtotal, "120.00 EGP");
        assert_eq!(lines[0].price, "120.00 EGP");
        assert_eq!(lines[0].decrease_to, 0);
        assert_eq!(lines[0].increase_to, 2);
    }

    #[test]
    fn cards_list_only_present_specs() {
        let project = Project {
            id: Some(" vase ".into()),
            material: Some("PETG".into()),
            resolution: Some("0.2".into()),
            likes: Some(12),
            ..Project::default()
        };
        let card = CardView::of(&project, "EGP", "ph.svg", None).unwrap();
        assert_eq!(card.id, "vase");
        assert_eq!(card.title, "Project Title");
        assert_eq!(card.thumbnail, "ph.svg");
        assert_eq!(card.price, "Contact for quote");
        assert_eq!(card.specs, [("Material", "PETG".to_owned()), ("Resolution", "0.2mm".to_owned())]);
        assert_eq!(card.print_time, None);
        assert_eq!(card.likes, LikesView { count: 12, liked: false });

        assert!(CardView::of(&Project::default(), "EGP", "ph.svg", None).is_none());
    }
}
