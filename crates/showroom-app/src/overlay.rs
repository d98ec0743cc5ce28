//! Text overlay shown over the 3D stage.

use serde::Serialize;
use showroom_core::ProductState;

/// Second headline word used when a product name has only one word.
pub const HEADLINE_FALLBACK: &str = "SERIES";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlay {
    /// Product identification label, e.g. `ID_VISION_PRIME`.
    pub id_label: String,
    pub headline: [String; 2],
    pub tagline: &'static str,
    pub price: &'static str,
    pub description: &'static str,
    /// Primary color of the active product, as hex.
    pub accent: String,
    pub selector: Vec<SelectorEntry>,
}

/// One button of the product selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub color: String,
    pub selected: bool,
}

impl Overlay {
    pub fn new(active: ProductState) -> Self {
        let config = active.config();
        Self {
            id_label: id_label(config.name),
            headline: headline(config.name),
            tagline: config.tagline,
            price: config.price,
            description: config.description,
            accent: config.color.to_hex(),
            selector: ProductState::ALL
                .into_iter()
                .map(|state| SelectorEntry {
                    id: state.id(),
                    name: state.config().name,
                    color: state.config().color.to_hex(),
                    selected: state == active,
                })
                .collect(),
        }
    }
}

/// `ID_` followed by the uppercased name with its first space replaced.
pub fn id_label(name: &str) -> String {
    format!("ID_{}", name.to_uppercase().replacen(' ', "_", 1))
}

/// First and second word of the name; the second defaults to `SERIES`.
pub fn headline(name: &str) -> [String; 2] {
    let mut words = name.split(' ');
    let first = words.next().unwrap_or_default().to_string();
    let second = words
        .next()
        .filter(|word| !word.is_empty())
        .unwrap_or(HEADLINE_FALLBACK)
        .to_string();
    [first, second]
}
