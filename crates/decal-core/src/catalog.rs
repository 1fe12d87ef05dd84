//! The admin-defined asset catalog, consumed as a read-only snapshot.
//!
//! Accepts the JSON written by the configuration panel, including its
//! legacy field names (`welcomeBackground`, `eventLogo`) and numeric
//! product ids.

use crate::error::CatalogError;
use crate::model::Color;
use crate::value::parse_color;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Catalog product identifier, normalized to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => ProductId(s),
            Raw::Number(n) => ProductId(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    pub image: String,
}

/// A clipart or custom image the user can drop onto the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub image: String,
    #[serde(default)]
    pub name: String,
}

fn default_fonts() -> Vec<String> {
    ["Roboto", "Montserrat", "Bebas Neue"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// The catalog exactly as the configuration panel writes it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    #[serde(default, alias = "welcomeBackground")]
    background: Option<String>,
    #[serde(default, alias = "eventLogo")]
    logo: Option<String>,
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    cliparts: Vec<Asset>,
    #[serde(default)]
    custom_images: Vec<Asset>,
    #[serde(default)]
    colors: Vec<String>,
    #[serde(default)]
    fonts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CatalogFile")]
pub struct Catalog {
    pub background: Option<String>,
    /// Page chrome for the host UI. Not part of the rendered design.
    pub logo: Option<String>,
    pub products: Vec<Product>,
    pub cliparts: Vec<Asset>,
    pub custom_images: Vec<Asset>,
    /// Empty means free-form colors.
    pub colors: Vec<String>,
    /// Never empty; a missing or empty list falls back to the stock fonts.
    pub fonts: Vec<String>,
    /// `colors` parsed once on load.
    #[serde(skip)]
    palette: Vec<Color>,
}

impl From<CatalogFile> for Catalog {
    fn from(file: CatalogFile) -> Self {
        let palette = file
            .colors
            .iter()
            .filter_map(|c| {
                let parsed = parse_color(c);
                if parsed.is_none() {
                    log::warn!("ignoring unparseable palette color `{c}`");
                }
                parsed
            })
            .collect();
        let fonts = if file.fonts.is_empty() {
            default_fonts()
        } else {
            file.fonts
        };
        Self {
            background: file.background,
            logo: file.logo,
            products: file.products,
            cliparts: file.cliparts,
            custom_images: file.custom_images,
            colors: file.colors,
            fonts,
            palette,
        }
    }
}

impl Catalog {
    /// Parse and validate a catalog snapshot.
    ///
    /// # Errors
    /// Fails on malformed JSON or when no products are configured.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the fields an editor session cannot start without.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.products.is_empty() {
            return Err(CatalogError::NoProducts);
        }
        if let Some(p) = self.products.iter().find(|p| p.id.as_str().is_empty()) {
            return Err(CatalogError::EmptyProductId(p.name.clone()));
        }
        if !self.colors.is_empty() && self.colors.len() < 3 {
            log::warn!("catalog palette has only {} colors", self.colors.len());
        }
        if self.fonts.len() < 3 {
            log::warn!("catalog font set has only {} fonts", self.fonts.len());
        }
        Ok(())
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn allows_font(&self, font: &str) -> bool {
        self.fonts.iter().any(|f| f == font)
    }

    pub fn default_font(&self) -> &str {
        self.fonts.first().map_or("Roboto", String::as_str)
    }

    /// Free-form colors are allowed when no palette is configured.
    pub fn is_free_form_color(&self) -> bool {
        self.colors.is_empty()
    }

    /// The palette parsed to colors. Unparseable entries are skipped.
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Whether `color` may be applied to text.
    pub fn allows_color(&self, color: Color) -> bool {
        self.is_free_form_color() || self.palette.contains(&color)
    }

    pub fn default_color(&self) -> Color {
        self.palette.first().copied().unwrap_or(Color::BLACK)
    }
}
