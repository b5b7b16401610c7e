//! Gallery project records and their display fallbacks.

use serde::{Deserialize, Deserializer};

use crate::cart::{CartError, CartLine};
use crate::format;

/// One entry of the gallery feed. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub images: Vec<String>,
    pub material: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub weight: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub resolution: Option<String>,
    pub print_time: Option<String>,
    pub price_from: Option<f64>,
    pub price_to: Option<f64>,
    pub likes: Option<u64>,
}

/// Text shown in the modal's detail fields; every entry is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDetails {
    pub title: String,
    pub description: String,
    pub material: String,
    pub weight: String,
    pub resolution: String,
    pub print_time: String,
    pub price: String,
}

impl Project {
    /// Thumbnail first, then the gallery images, blanks removed.
    pub fn image_list(&self) -> Vec<String> {
        self.thumbnail
            .iter()
            .chain(self.images.iter())
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect()
    }

    pub fn details(&self, currency: &str) -> ProjectDetails {
        ProjectDetails {
            title: text_or(&self.title, "Project Title"),
            description: text_or(&self.description, "No description available"),
            material: text_or(&self.material, "PLA"),
            weight: suffixed_or(&self.weight, "g"),
            resolution: suffixed_or(&self.resolution, "mm"),
            print_time: text_or(&self.print_time, "N/A"),
            price: match (positive(self.price_from), positive(self.price_to)) {
                (Some(from), Some(to)) => format!(
                    "{} - {}",
                    format::whole_price(from, currency),
                    format::whole_price(to, currency)
                ),
                _ => "Contact for quote".to_owned(),
            },
        }
    }

    /// Price charged when the project is added to the cart.
    pub fn unit_price(&self) -> f64 {
        positive(self.price_from).unwrap_or(0.0)
    }

    /// One unit of this project. Fails when the record carries no id.
    pub fn cart_line(&self, image: Option<String>) -> Result<CartLine, CartError> {
        Ok(CartLine::new(
            self.id.clone().unwrap_or_default(),
            self.title.clone().unwrap_or_default(),
            self.unit_price(),
        )?
        .with_image(image))
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn text_or(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_owned(),
        _ => fallback.to_owned(),
    }
}

fn suffixed_or(value: &Option<String>, unit: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => format!("{v}{unit}"),
        _ => "N/A".to_owned(),
    }
}

/// Accepts strings and numbers (`"25"` and `25` alike); anything else becomes `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Parses the gallery feed, skipping records that are not objects or fail to decode.
pub fn parse_gallery(text: &str) -> Result<Vec<Project>, serde_json::Error> {
    let records: Vec<serde_json::Value> = serde_json::from_str(text)?;
    let total = records.len();
    let projects: Vec<Project> = records
        .into_iter()
        .filter_map(|r| serde_json::from_value(r).ok())
        .collect();
    if projects.len() != total {
        log::warn!("skipped {} malformed gallery record(s)", total - projects.len());
    }
    Ok(projects)
}

pub fn find<'a>(gallery: &'a [Project], id: &str) -> Option<&'a Project> {
    gallery.iter().find(|p| p.id.as_deref() == Some(id))
}
