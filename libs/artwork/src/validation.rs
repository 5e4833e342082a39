//! Artwork payload validation
//!
//! Every field of the payload is checked in one pass, so a rejected payload
//! reports all of its problems at once. Keys the record does not know about
//! are ignored.

use common::error::{ArtworkError, ArtworkResult};
use common::validation::Checker;
use serde_json::{Map, Value};

use crate::model::{
    AdditionalImage, ArtworkImage, ArtworkRecord, CropRect, Crops, FramingOption, OriginalDetails,
    PrintCrop, ProductVariant, ShippingDimensions, ShippingPrice, StudioCrops,
};
use crate::vocabulary::{
    CATEGORIES, FRAME_COLORS, MATERIALS, MEDIUMS, PACKAGING_OPTIONS, PRODUCT_MATERIALS, STYLES,
    SUBJECTS, VISIBILITIES,
};

/// Validate an untrusted artwork payload into an `ArtworkRecord`
pub fn validate_artwork(json: &Value) -> ArtworkResult<ArtworkRecord> {
    let mut checker = Checker::new();
    let artwork = checker.object(Some(json));
    let record = artwork.and_then(|artwork| read_artwork(&mut checker, artwork));

    checker.finish(record).map_err(ArtworkError::SchemaViolation)
}

fn read_artwork(c: &mut Checker, artwork: &Map<String, Value>) -> Option<ArtworkRecord> {
    let artwork_id = c.field(artwork, "artwork_id", |c, v| c.string(v, 1));
    let legacy_user_art_id = c.field(artwork, "legacy_user_art_id", |c, v| c.integer(v, 1));
    let user_id = c.field(artwork, "user_id", |c, v| c.integer(v, 1));
    let year_produced = c.field(artwork, "year_produced", |c, v| c.integer(v, 1));
    let is_deleted = c.field(artwork, "is_deleted", |c, v| c.boolean(v));
    let artwork_image = c.field(artwork, "artwork_image", |c, v| {
        let image = c.object(v)?;
        read_image(c, image)
    });
    let additional_images = c.field(artwork, "additional_images", |c, v| {
        c.array(v, |c, v| {
            let image = c.object(v)?;
            read_additional_image(c, image)
        })
    });
    let youtube_video_id = c.field(artwork, "youtube_video_id", |c, v| {
        c.nullable(v, |c, v| c.string(v, 1))
    });
    let title = c.field(artwork, "title", |c, v| c.string(v, 1));
    let width = c.field(artwork, "width", |c, v| c.decimal_string(v));
    let height = c.field(artwork, "height", |c, v| c.decimal_string(v));
    let depth = c.field(artwork, "depth", |c, v| c.decimal_string(v));
    let description = c.field(artwork, "description", |c, v| c.string(v, 1));
    let total_likes = c.field(artwork, "total_likes", |c, v| c.integer(v, 0));
    let total_views = c.field(artwork, "total_views", |c, v| c.integer(v, 0));
    let total_curation_votes = c.field(artwork, "total_curation_votes", |c, v| c.integer(v, 0));
    let category = c.field(artwork, "category", |c, v| c.term(v, &CATEGORIES));
    let subject = c.field(artwork, "subject", |c, v| c.term(v, &SUBJECTS));
    let styles = c.field(artwork, "styles", |c, v| c.array(v, |c, v| c.term(v, &STYLES)));
    let mediums = c.field(artwork, "mediums", |c, v| c.array(v, |c, v| c.term(v, &MEDIUMS)));
    let keywords = c.field(artwork, "keywords", |c, v| c.array(v, |c, v| c.string(v, 1)));
    let materials = c.field(artwork, "materials", |c, v| {
        c.array(v, |c, v| c.term(v, &MATERIALS))
    });
    let has_original = c.field(artwork, "has_original", |c, v| c.boolean(v));
    let is_multipanel = c.field(artwork, "is_multipanel", |c, v| c.boolean(v));
    let panels = c.field(artwork, "panels", |c, v| c.integer(v, 1));
    let is_safe = c.field(artwork, "is_safe", |c, v| c.boolean(v));
    let visibility = c.field(artwork, "visibility", |c, v| c.term(v, &VISIBILITIES));
    let has_open_editions = c.field(artwork, "has_open_editions", |c, v| c.boolean(v));
    let has_limited_editions = c.field(artwork, "has_limited_editions", |c, v| c.boolean(v));
    let cheapest_print_price = c.field(artwork, "cheapest_print_price", |c, v| {
        c.nullable(v, |c, v| c.integer(v, 1))
    });
    let slug = c.field(artwork, "slug", |c, v| c.string(v, 1));
    let url = c.field(artwork, "url", |c, v| c.string(v, 1));
    let products = c.field(artwork, "products", |c, v| {
        c.array(v, |c, v| {
            let product = c.object(v)?;
            read_product(c, product)
        })
    });

    Some(ArtworkRecord {
        artwork_id: artwork_id?,
        legacy_user_art_id: legacy_user_art_id?,
        user_id: user_id?,
        year_produced: year_produced?,
        is_deleted: is_deleted?,
        artwork_image: artwork_image?,
        additional_images: additional_images?,
        youtube_video_id: youtube_video_id?,
        title: title?,
        width: width?,
        height: height?,
        depth: depth?,
        description: description?,
        total_likes: total_likes?,
        total_views: total_views?,
        total_curation_votes: total_curation_votes?,
        category: category?,
        subject: subject?,
        styles: styles?,
        mediums: mediums?,
        keywords: keywords?,
        materials: materials?,
        has_original: has_original?,
        is_multipanel: is_multipanel?,
        panels: panels?,
        is_safe: is_safe?,
        visibility: visibility?,
        has_open_editions: has_open_editions?,
        has_limited_editions: has_limited_editions?,
        cheapest_print_price: cheapest_print_price?,
        slug: slug?,
        url: url?,
        products: products?,
    })
}

fn read_image(c: &mut Checker, image: &Map<String, Value>) -> Option<ArtworkImage> {
    let main_url = c.field(image, "main_url", |c, v| c.string(v, 1));
    let thumbnail_url = c.field(image, "thumbnail_url", |c, v| c.string(v, 1));
    let polaroid_url = c.field(image, "polaroid_url", |c, v| c.string(v, 1));
    let original_width = c.field(image, "original_width", |c, v| c.integer(v, 1));
    let original_height = c.field(image, "original_height", |c, v| c.integer(v, 1));
    let crops = c.field(image, "crops", |c, v| {
        let crops = c.object(v)?;
        c.field(crops, "studio", |c, v| {
            let studio = c.object(v)?;
            let square = c.field(studio, "square", |c, v| {
                let square = c.object(v)?;
                read_crop_rect(c, square)
            });
            let print = c.field(studio, "print", |c, v| {
                let print = c.object(v)?;
                read_print_crop(c, print)
            });
            Some(StudioCrops {
                square: square?,
                print: print?,
            })
        })
    });

    Some(ArtworkImage {
        main_url: main_url?,
        thumbnail_url: thumbnail_url?,
        polaroid_url: polaroid_url?,
        original_width: original_width?,
        original_height: original_height?,
        crops: Crops { studio: crops? },
    })
}

fn read_crop_rect(c: &mut Checker, rect: &Map<String, Value>) -> Option<CropRect> {
    let x = c.field(rect, "x", |c, v| c.number(v, Some(0.0)));
    let y = c.field(rect, "y", |c, v| c.number(v, Some(0.0)));
    let width = c.field(rect, "width", |c, v| c.number(v, Some(1.0)));
    let height = c.field(rect, "height", |c, v| c.number(v, Some(1.0)));

    Some(CropRect {
        x: x?,
        y: y?,
        width: width?,
        height: height?,
    })
}

fn read_print_crop(c: &mut Checker, rect: &Map<String, Value>) -> Option<PrintCrop> {
    let x = c.field(rect, "x", |c, v| c.nullable(v, |c, v| c.number(v, Some(0.0))));
    let y = c.field(rect, "y", |c, v| c.nullable(v, |c, v| c.number(v, Some(0.0))));
    let width = c.field(rect, "width", |c, v| c.nullable(v, |c, v| c.number(v, Some(1.0))));
    let height = c.field(rect, "height", |c, v| c.nullable(v, |c, v| c.number(v, Some(1.0))));

    Some(PrintCrop {
        x: x?,
        y: y?,
        width: width?,
        height: height?,
    })
}

fn read_additional_image(c: &mut Checker, image: &Map<String, Value>) -> Option<AdditionalImage> {
    let main_url = c.field(image, "main_url", |c, v| c.string(v, 1));
    let thumbnail_url = c.field(image, "thumbnail_url", |c, v| c.string(v, 1));
    let polaroid_url = c.field(image, "polaroid_url", |c, v| c.string(v, 1));
    let main_width = c.field(image, "main_width", |c, v| c.integer(v, 1));
    let main_height = c.field(image, "main_height", |c, v| c.integer(v, 1));
    let display_width = c.field(image, "display_width", |c, v| c.integer(v, 1));
    let display_height = c.field(image, "display_height", |c, v| c.integer(v, 1));
    let description = c.field(image, "description", |c, v| c.nullable(v, |c, v| c.string(v, 1)));

    Some(AdditionalImage {
        main_url: main_url?,
        thumbnail_url: thumbnail_url?,
        polaroid_url: polaroid_url?,
        main_width: main_width?,
        main_height: main_height?,
        display_width: display_width?,
        display_height: display_height?,
        description: description?,
    })
}

fn read_product(c: &mut Checker, product: &Map<String, Value>) -> Option<ProductVariant> {
    let sku = c.field(product, "sku", |c, v| c.string(v, 1));
    let is_original = c.field(product, "is_original", |c, v| c.boolean(v));
    let is_open_edition_print = c.field(product, "is_open_edition_print", |c, v| c.boolean(v));
    let is_limited_edition_print =
        c.field(product, "is_limited_edition_print", |c, v| c.boolean(v));
    let price = c.field(product, "price", |c, v| c.integer(v, 1));
    let width = c.field(product, "width", |c, v| c.decimal_string(v));
    let height = c.field(product, "height", |c, v| c.decimal_string(v));
    let depth = c.field(product, "depth", |c, v| c.decimal_string(v));
    let material = c.field(product, "material", |c, v| c.term(v, &PRODUCT_MATERIALS));
    let options = c.field(product, "options", |c, v| {
        c.optional(v, |c, v| {
            c.array(v, |c, v| {
                let option = c.object(v)?;
                read_framing_option(c, option)
            })
        })
    });
    let units_produced = c.field(product, "units_produced", |c, v| c.integer(v, 1));
    let is_sold_out = c.field(product, "is_sold_out", |c, v| c.boolean(v));
    let is_reserved = c.field(product, "is_reserved", |c, v| c.boolean(v));
    let is_available_for_sale = c.field(product, "is_available_for_sale", |c, v| c.boolean(v));
    let original = c.field(product, "original", |c, v| {
        c.optional(v, |c, v| {
            let original = c.object(v)?;
            read_original(c, original)
        })
    });

    Some(ProductVariant {
        sku: sku?,
        is_original: is_original?,
        is_open_edition_print: is_open_edition_print?,
        is_limited_edition_print: is_limited_edition_print?,
        price: price?,
        width: width?,
        height: height?,
        depth: depth?,
        material: material?,
        options: options?,
        units_produced: units_produced?,
        is_sold_out: is_sold_out?,
        is_reserved: is_reserved?,
        is_available_for_sale: is_available_for_sale?,
        original: original?,
    })
}

fn read_framing_option(c: &mut Checker, option: &Map<String, Value>) -> Option<FramingOption> {
    let id = c.field(option, "id", |c, v| c.string(v, 1));
    let framing_type_id = c.field(option, "framing_type_id", |c, v| c.integer(v, 1));
    let extended_description = c.field(option, "extended_description", |c, v| c.string(v, 1));
    let title = c.field(option, "title", |c, v| c.string(v, 1));
    let description = c.field(option, "description", |c, v| c.string(v, 1));
    let price = c.field(option, "price", |c, v| c.integer(v, 1));
    let width = c.field(option, "width", |c, v| c.decimal_string(v));
    let height = c.field(option, "height", |c, v| c.decimal_string(v));
    let mat_size = c.field(option, "mat_size", |c, v| c.integer(v, 1));
    let framed_width = c.field(option, "framed_width", |c, v| {
        c.nullable(v, |c, v| c.number(v, Some(1.0)))
    });
    let framed_height = c.field(option, "framed_height", |c, v| {
        c.nullable(v, |c, v| c.number(v, Some(1.0)))
    });

    Some(FramingOption {
        id: id?,
        framing_type_id: framing_type_id?,
        extended_description: extended_description?,
        title: title?,
        description: description?,
        price: price?,
        width: width?,
        height: height?,
        mat_size: mat_size?,
        framed_width: framed_width?,
        framed_height: framed_height?,
    })
}

fn read_original(c: &mut Checker, original: &Map<String, Value>) -> Option<OriginalDetails> {
    let aisp = c.field(original, "aisp", |c, v| {
        let aisp = c.object(v)?;
        let freight_amount = c.field(aisp, "freight_amount", |c, v| c.number(v, None));
        let version = c.field(aisp, "version", |c, v| c.string(v, 0));
        let bucket = c.field(aisp, "bucket", |c, v| c.string(v, 0));
        Some(ShippingPrice {
            freight_amount: freight_amount?,
            version: version?,
            bucket: bucket?,
        })
    });
    let has_original_frame = c.field(original, "has_original_frame", |c, v| c.boolean(v));
    let original_frame_color = c.field(original, "original_frame_color", |c, v| {
        c.nullable(v, |c, v| c.term(v, &FRAME_COLORS))
    });
    let packaging_option =
        c.field(original, "packaging_option", |c, v| c.term(v, &PACKAGING_OPTIONS));
    let is_ready_to_hang = c.field(original, "is_ready_to_hang", |c, v| {
        c.nullable(v, |c, v| c.boolean(v))
    });
    let address_book_item_id = c.field(original, "address_book_item_id", |c, v| c.string(v, 1));
    let ships_from_country_code =
        c.field(original, "ships_from_country_code", |c, v| c.string_of_len(v, 2));
    let ships_from_country_name =
        c.field(original, "ships_from_country_name", |c, v| c.string(v, 1));
    let shipping_dimensions = c.field(original, "shipping_dimensions", |c, v| {
        let dimensions = c.object(v)?;
        read_shipping_dimensions(c, dimensions)
    });
    let days_to_produce = c.field(original, "days_to_produce", |c, v| {
        c.nullable(v, |c, v| c.integer(v, 1))
    });

    Some(OriginalDetails {
        aisp: aisp?,
        has_original_frame: has_original_frame?,
        original_frame_color: original_frame_color?,
        packaging_option: packaging_option?,
        is_ready_to_hang: is_ready_to_hang?,
        address_book_item_id: address_book_item_id?,
        ships_from_country_code: ships_from_country_code?,
        ships_from_country_name: ships_from_country_name?,
        shipping_dimensions: shipping_dimensions?,
        days_to_produce: days_to_produce?,
    })
}

fn read_shipping_dimensions(
    c: &mut Checker,
    dimensions: &Map<String, Value>,
) -> Option<ShippingDimensions> {
    let dimensional_weight = c.field(dimensions, "dimensional_weight", |c, v| c.number(v, None));
    let height = c.field(dimensions, "height", |c, v| c.number(v, Some(1.0)));
    let width = c.field(dimensions, "width", |c, v| c.number(v, Some(1.0)));
    let depth = c.field(dimensions, "depth", |c, v| c.number(v, Some(0.0)));

    Some(ShippingDimensions {
        dimensional_weight: dimensional_weight?,
        height: height?,
        width: width?,
        depth: depth?,
    })
}
