//! Markup for the views that are rebuilt wholesale: the gallery grid, the cart list, carousel
//! slides, indicators and thumbnails. Controls carry `data-*` attributes that the page's delegated click handler
//! maps back onto controller calls.

use std::fmt::Write as _;

use crate::format;
use crate::view::{CardView, CarouselView, GalleryView, LineView, PanelView, SlideView};

pub const ACTION_ATTR: &str = "data-cart-action";
pub const SLIDE_ATTR: &str = "data-slide-index";
/// On a card's like button; the value is the project id.
pub const LIKE_ATTR: &str = "data-like-id";
pub const GALLERY_ATTR: &str = "data-gallery-action";

/// Element ids of a card's like button and its counter.
pub fn like_ids(project_id: &str) -> (String, String) {
    (format!("like-btn-{project_id}"), format!("like-count-{project_id}"))
}

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn gallery(view: &GalleryView) -> String {
    match view {
        GalleryView::Loading => r#"<div class="gallery-loading col-span-full text-center py-12">
<div class="animate-spin rounded-full h-12 w-12 border-t-2 border-b-2 border-brand-indigo mx-auto"></div>
<p class="mt-4 text-gray-600">Loading projects...</p>
</div>"#
            .to_owned(),
        GalleryView::Failed => format!(
            r#"<div class="gallery-error col-span-full text-center py-12 px-4">
<h3 class="mt-4 text-lg font-medium">Error Loading Projects</h3>
<p class="mt-2 text-gray-500">We couldn't load the projects. Please try again later.</p>
<button type="button" {GALLERY_ATTR}="retry" class="mt-6 px-4 py-2 rounded-md text-white bg-brand-indigo">Try Again</button>
</div>"#
        ),
        GalleryView::Cards(cards) if cards.is_empty() => r#"<div class="gallery-empty col-span-full text-center py-12 px-4">
<h3 class="mt-4 text-lg font-medium">No Projects Found</h3>
<p class="mt-2 text-gray-500">No projects found. Please check back soon.</p>
</div>"#
            .to_owned(),
        GalleryView::Cards(cards) => {
            let mut html = String::new();
            for card in cards {
                gallery_card(&mut html, card);
            }
            html
        }
    }
}

fn gallery_card(html: &mut String, card: &CardView) {
    let id = escape(&card.id);
    let title = escape(&card.title);
    let (like_button, like_count) = like_ids(&card.id);
    let mut specs = String::new();
    for (label, value) in &card.specs {
        let _ = write!(
            specs,
            r#"<div class="flex items-center text-sm text-gray-600"><span class="font-medium mr-1">{label}:</span><span>{}</span></div>"#,
            escape(value),
        );
    }
    if let Some(print_time) = &card.print_time {
        let _ = write!(
            specs,
            r#"<div class="flex items-center text-sm text-gray-600 pt-1 border-t mt-2"><span class="font-medium">Print Time: {}</span></div>"#,
            escape(print_time),
        );
    }
    let _ = write!(
        html,
        r#"<div id="project-{id}" class="project-card group bg-white rounded-xl shadow-md overflow-hidden" data-project-id="{id}">
<div class="relative overflow-hidden h-48 bg-gray-100 cursor-pointer">
<img src="{thumb}" alt="{title}" class="w-full h-full object-cover" loading="lazy">
<div class="absolute inset-0 flex items-end p-4"><button type="button" class="view-project-btn w-full py-2 px-4 rounded-lg font-medium" data-project-id="{id}">View Project</button></div>
</div>
<div class="p-5">
<div class="mb-3"><h3 class="text-lg font-bold line-clamp-1 mb-1">{title}</h3><span class="text-sm font-medium text-gray-600">{price}</span></div>
<p class="text-gray-600 text-sm mb-4 line-clamp-2">{description}</p>
<div class="space-y-2 mb-4">{specs}</div>
<div class="pt-3 border-t flex items-center justify-end">
<button type="button" id="{like_button}" {LIKE_ATTR}="{id}" class="like-button flex items-center text-sm {like_class}" aria-label="Like this project" aria-pressed="{liked}"><span class="heart-icon mr-1">&#9829;</span><span id="{like_count}" class="like-count">{count}</span></button>
</div>
</div>
</div>"#,
        thumb = escape(&card.thumbnail),
        price = escape(&card.price),
        description = escape(&card.description),
        like_button = escape(&like_button),
        like_count = escape(&like_count),
        like_class = like_class(card.likes.liked),
        liked = card.likes.liked,
        count = format::count(card.likes.count),
    );
}

/// Colour class of a like button.
pub fn like_class(liked: bool) -> &'static str {
    if liked { "text-red-500" } else { "text-gray-400" }
}

pub fn cart_panel(view: &PanelView) -> String {
    match view {
        PanelView::Empty => format!(
            r#"<div class="cart-empty flex flex-col items-center justify-center py-12 px-4 text-center">
<h3 class="text-lg font-medium mb-1">Your cart is empty</h3>
<p class="text-gray-500 mb-6">Looks like you haven't added any items yet.</p>
<button type="button" {ACTION_ATTR}="close" class="px-4 py-2 rounded-md text-white bg-brand-indigo">Continue Shopping</button>
</div>"#
        ),
        PanelView::Filled { lines, subtotal } => {
            let mut html = String::from(r#"<div class="cart-lines divide-y">"#);
            for line in lines {
                cart_line(&mut html, line);
            }
            let _ = write!(
                html,
                r#"</div>
<div class="cart-footer border-t px-4 py-6">
<div class="flex justify-between font-medium mb-4"><p>Subtotal</p><p class="cart-subtotal">{subtotal}</p></div>
<p class="text-sm text-gray-500 mb-6">Shipping and taxes calculated at checkout.</p>
<button type="button" {ACTION_ATTR}="checkout" class="w-full px-6 py-3 rounded-md text-white bg-brand-indigo">Checkout</button>
<div class="mt-4 text-sm text-center"><p>or <button type="button" {ACTION_ATTR}="close">Continue Shopping</button></p></div>
</div>"#,
                subtotal = escape(subtotal),
            );
            html
        }
    }
}

fn cart_line(html: &mut String, line: &LineView) {
    let id = escape(&line.id);
    let title = escape(&line.title);
    let thumb = match &line.image {
        Some(src) => format!(r#"<img src="{}" alt="{title}" class="h-full w-full object-cover">"#, escape(src)),
        None => r#"<div class="cart-line-placeholder h-full w-full"></div>"#.to_owned(),
    };
    let _ = write!(
        html,
        r#"<div class="cart-line flex items-center py-4 px-4" data-item-id="{id}">
<div class="h-16 w-16 rounded-md overflow-hidden">{thumb}</div>
<div class="ml-4 flex-1">
<div class="flex justify-between font-medium"><h3 class="truncate">{title}</h3><p class="ml-4">{price}</p></div>
<div class="flex items-center mt-1">
<button type="button" {ACTION_ATTR}="quantity" data-id="{id}" data-quantity="{dec}" aria-label="Decrease quantity">-</button>
<span class="mx-2 text-sm">{qty}</span>
<button type="button" {ACTION_ATTR}="quantity" data-id="{id}" data-quantity="{inc}" aria-label="Increase quantity">+</button>
</div>
</div>
<button type="button" {ACTION_ATTR}="remove" data-id="{id}" class="ml-4" aria-label="Remove">&times;</button>
</div>"#,
        price = escape(&line.price),
        dec = line.decrease_to,
        inc = line.increase_to,
        qty = line.quantity,
    );
}

pub fn slides(slides: &[SlideView]) -> String {
    let mut html = String::new();
    for slide in slides {
        let _ = write!(
            html,
            r#"<div class="carousel-slide min-w-full h-full flex-shrink-0 flex items-center justify-center"><img src="{}" alt="{}" class="max-w-full max-h-full object-contain" loading="lazy"></div>"#,
            escape(&slide.src),
            escape(&slide.alt),
        );
    }
    html
}

/// CSS transform for the slide strip. One slide is 100% of the strip's width, so the position
/// holds across resizes. Track offsets grow toward later slides; the strip moves the other way.
pub fn strip_transform(view: &CarouselView) -> String {
    let percent = -(view.current as i64) * 100;
    let pixels = 0.0 - view.drag_offset.unwrap_or(0.0);
    format!("translateX(calc({percent}% + {pixels}px))")
}

pub fn indicators(count: usize) -> String {
    let mut html = String::new();
    for i in 0..count {
        let _ = write!(
            html,
            r#"<button type="button" {SLIDE_ATTR}="{i}" class="carousel-indicator w-2 h-2 rounded-full" aria-label="Go to image {n}"></button>"#,
            n = i + 1,
        );
    }
    html
}

pub fn thumbnails(slides: &[SlideView]) -> String {
    let mut html = String::new();
    for (i, slide) in slides.iter().enumerate() {
        let _ = write!(
            html,
            r#"<button type="button" {SLIDE_ATTR}="{i}" class="thumbnail-btn rounded-md overflow-hidden" aria-label="View image {n} of {total}"><img src="{src}" alt="" class="w-16 h-16 object-cover" loading="lazy"></button>"#,
            n = i + 1,
            total = slides.len(),
            src = escape(&slide.src),
        );
    }
    html
}
