//! Artwork record model
//!
//! Keys match the upstream catalog payload so that a validated record can be
//! serialized and validated again without loss.

use serde::{Deserialize, Serialize};

/// Validated artwork as served by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkRecord {
    pub artwork_id: String,
    pub legacy_user_art_id: u64,
    pub user_id: u64,
    pub year_produced: u64,
    pub is_deleted: bool,
    pub artwork_image: ArtworkImage,
    pub additional_images: Vec<AdditionalImage>,
    pub youtube_video_id: Option<String>,
    pub title: String,
    /// Decimal strings such as `"20"` or `"20.0"`, kept as sent
    pub width: String,
    pub height: String,
    pub depth: String,
    pub description: String,
    pub total_likes: u64,
    pub total_views: u64,
    pub total_curation_votes: u64,
    pub category: String,
    pub subject: String,
    pub styles: Vec<String>,
    pub mediums: Vec<String>,
    pub keywords: Vec<String>,
    pub materials: Vec<String>,
    pub has_original: bool,
    pub is_multipanel: bool,
    pub panels: u64,
    pub is_safe: bool,
    pub visibility: String,
    pub has_open_editions: bool,
    pub has_limited_editions: bool,
    pub cheapest_print_price: Option<u64>,
    pub slug: String,
    pub url: String,
    pub products: Vec<ProductVariant>,
}

impl ArtworkRecord {
    /// The product entry standing for the physical original, if it is listed
    pub fn original_product(&self) -> Option<&ProductVariant> {
        self.products.iter().find(|product| product.is_original)
    }

    /// Open and limited edition print variants
    pub fn prints(&self) -> impl Iterator<Item = &ProductVariant> {
        self.products.iter().filter(|product| !product.is_original)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkImage {
    pub main_url: String,
    pub thumbnail_url: String,
    pub polaroid_url: String,
    pub original_width: u64,
    pub original_height: u64,
    pub crops: Crops,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crops {
    pub studio: StudioCrops,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioCrops {
    pub square: CropRect,
    pub print: PrintCrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Print crop, each coordinate may be unset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintCrop {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalImage {
    pub main_url: String,
    pub thumbnail_url: String,
    pub polaroid_url: String,
    pub main_width: u64,
    pub main_height: u64,
    pub display_width: u64,
    pub display_height: u64,
    pub description: Option<String>,
}

/// A purchasable form of the artwork: the original or a print edition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub sku: String,
    pub is_original: bool,
    pub is_open_edition_print: bool,
    pub is_limited_edition_print: bool,
    /// Minor currency units
    pub price: u64,
    pub width: String,
    pub height: String,
    pub depth: String,
    pub material: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FramingOption>>,
    pub units_produced: u64,
    pub is_sold_out: bool,
    pub is_reserved: bool,
    pub is_available_for_sale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<OriginalDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramingOption {
    pub id: String,
    pub framing_type_id: u64,
    pub extended_description: String,
    pub title: String,
    pub description: String,
    pub price: u64,
    pub width: String,
    pub height: String,
    pub mat_size: u64,
    pub framed_width: Option<f64>,
    pub framed_height: Option<f64>,
}

/// Shipping and handling facts that only exist for the physical original
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginalDetails {
    pub aisp: ShippingPrice,
    pub has_original_frame: bool,
    pub original_frame_color: Option<String>,
    pub packaging_option: String,
    pub is_ready_to_hang: Option<bool>,
    pub address_book_item_id: String,
    pub ships_from_country_code: String,
    pub ships_from_country_name: String,
    pub shipping_dimensions: ShippingDimensions,
    pub days_to_produce: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingPrice {
    pub freight_amount: f64,
    pub version: String,
    pub bucket: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShippingDimensions {
    pub dimensional_weight: f64,
    pub height: f64,
    pub width: f64,
    pub depth: f64,
}
