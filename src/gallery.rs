//! The project grid: holds the fetched feed and keeps its cards in step with the like book.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::SiteConfig;
use crate::modal::ProjectModal;
use crate::project::{self, Project};
use crate::view::{CardView, GallerySurface, GalleryView, LikesView};

pub struct Gallery {
    projects: Vec<Project>,
    surface: Rc<RefCell<dyn GallerySurface>>,
    currency: String,
    placeholder: String,
}

impl Gallery {
    pub fn new(surface: Rc<RefCell<dyn GallerySurface>>, config: &SiteConfig) -> Self {
        Self {
            projects: Vec::new(),
            surface,
            currency: config.currency.clone(),
            placeholder: config.placeholder_image.clone(),
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn find(&self, id: &str) -> Option<&Project> {
        project::find(&self.projects, id)
    }

    pub fn loading(&mut self) {
        self.surface.borrow_mut().render(&GalleryView::Loading);
    }

    /// Any feed installed earlier stays available to `find`.
    pub fn failed(&mut self) {
        self.surface.borrow_mut().render(&GalleryView::Failed);
    }

    /// Replaces the feed and draws one card per project that has an id.
    pub fn install(&mut self, projects: Vec<Project>, modal: &ProjectModal) {
        self.projects = projects;
        let cards: Vec<CardView> = self
            .projects
            .iter()
            .filter_map(|p| CardView::of(p, &self.currency, &self.placeholder, modal.likes_of(p)))
            .collect();
        if cards.len() != self.projects.len() {
            log::debug!("{} project(s) without an id left off the grid", self.projects.len() - cards.len());
        }
        self.surface.borrow_mut().render(&GalleryView::Cards(cards));
    }

    /// Like button on a card. `None` for unknown projects or when likes are unavailable.
    pub fn toggle_like(&mut self, id: &str, modal: &mut ProjectModal) -> Option<LikesView> {
        let project = project::find(&self.projects, id)?;
        let view = modal.toggle_like_of(project)?;
        self.surface.borrow_mut().render_likes(id, &view);
        Some(view)
    }

    /// Redraws one card's likes after they changed elsewhere, e.g. from the modal.
    pub fn sync_likes(&mut self, id: &str, modal: &ProjectModal) {
        let Some(view) = self.find(id).and_then(|p| modal.likes_of(p)) else {
            return;
        };
        self.surface.borrow_mut().render_likes(id, &view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartEngine;
    use crate::likes::LikeBook;
    use crate::store::{CartStore, MemoryStore};
    use crate::view::Detached;

    #[derive(Default)]
    struct Recorder {
        views: Vec<GalleryView>,
        likes: Vec<(String, LikesView)>,
    }

    impl GallerySurface for Recorder {
        fn render(&mut self, view: &GalleryView) {
            self.views.push(view.clone());
        }
        fn render_likes(&mut self, project_id: &str, view: &LikesView) {
            self.likes.push((project_id.to_owned(), *view));
        }
    }

    fn setup(likes: &MemoryStore) -> (Rc<RefCell<Recorder>>, Gallery, ProjectModal) {
        let config = SiteConfig::default();
        let cart = Rc::new(RefCell::new(CartEngine::new(CartStore::new(Box::new(MemoryStore::new()), "cart"))));
        let modal = ProjectModal::new(cart, Rc::new(RefCell::new(Detached)), &config)
            .with_likes(LikeBook::load(Box::new(likes.clone()), "likedProjects"));
        let surface = Rc::new(RefCell::new(Recorder::default()));
        let gallery = Gallery::new(surface.clone(), &config);
        (surface, gallery, modal)
    }

    fn feed() -> Vec<Project> {
        project::parse_gallery(r#"[{"id":"a","title":"Gear","likes":3}, {"title":"No id"}, {"id":"b"}]"#).unwrap()
    }

    #[test]
    fn install_draws_cards_for_projects_with_ids() {
        let (surface, mut gallery, modal) = setup(&MemoryStore::new());
        gallery.loading();
        gallery.install(feed(), &modal);

        let surface = surface.borrow();
        assert_eq!(surface.views[0], GalleryView::Loading);
        let GalleryView::Cards(cards) = &surface.views[1] else {
            panic!("expected cards");
        };
        let ids: Vec<_> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(cards[0].likes, LikesView { count: 3, liked: false });
        assert_eq!(gallery.projects().len(), 3);
    }

    #[test]
    fn card_likes_persist_and_redraw() {
        let likes = MemoryStore::new();
        let (surface, mut gallery, mut modal) = setup(&likes);
        gallery.install(feed(), &modal);

        assert_eq!(gallery.toggle_like("a", &mut modal), Some(LikesView { count: 4, liked: true }));
        assert_eq!(likes.raw("likedProjects").as_deref(), Some(r#"{"a":true}"#));
        assert_eq!(gallery.toggle_like("missing", &mut modal), None);

        // Liked state survives a reinstall of the same feed.
        gallery.install(feed(), &modal);
        let surface = surface.borrow();
        assert_eq!(surface.likes, [("a".to_owned(), LikesView { count: 4, liked: true })]);
        let Some(GalleryView::Cards(cards)) = surface.views.last() else {
            panic!("expected cards");
        };
        assert!(cards[0].likes.liked);
    }

    #[test]
    fn modal_likes_reach_the_card() {
        let (surface, mut gallery, mut modal) = setup(&MemoryStore::new());
        gallery.install(feed(), &modal);
        let project = gallery.find("b").cloned().unwrap();
        modal.open(project);
        assert_eq!(modal.toggle_like(), Some(true));

        gallery.sync_likes("b", &modal);
        assert_eq!(surface.borrow().likes, [("b".to_owned(), LikesView { count: 1, liked: true })]);
    }

    #[test]
    fn failure_keeps_the_feed() {
        let (surface, mut gallery, modal) = setup(&MemoryStore::new());
        gallery.install(feed(), &modal);
        gallery.failed();
        assert_eq!(surface.borrow().views.last(), Some(&GalleryView::Failed));
        assert!(gallery.find("a").is_some());
    }
}
