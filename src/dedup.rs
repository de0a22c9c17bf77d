/// Crop deduplication by pixel content.

use crate::hash::{content_hash, to_hex};
use crate::preprocess::Image;
use tracing::debug;

/// Drop images whose pixels duplicate an earlier one, keeping first occurrences in order.
pub fn dedupe(images: Vec<Image>) -> Vec<Image> {
    dedupe_by(images, |img| img)
}

/// Deduplicate arbitrary items by the pixel content of the image each carries.
///
/// Quadratic in the number of items, which is fine for tens of crops per
/// photo. The content hash only short-circuits comparisons; a match is
/// always confirmed on the full pixel buffer so a collision cannot merge
/// two different crops.
pub fn dedupe_by<T, F>(items: Vec<T>, image_of: F) -> Vec<T>
where
    F: Fn(&T) -> &Image,
{
    let mut kept: Vec<(Option<u128>, T)> = Vec::with_capacity(items.len());

    for item in items {
        let image = image_of(&item);
        let hash = content_hash(image).ok();

        let duplicate = kept.iter().any(|(kept_hash, other)| {
            let may_match = match (hash, kept_hash) {
                (Some(a), Some(b)) => a == *b,
                _ => true,
            };
            may_match && image.same_pixels(image_of(other))
        });

        if duplicate {
            debug!(
                hash = %hash.map(to_hex).unwrap_or_default(),
                "Dropping duplicate crop"
            );
            continue;
        }

        kept.push((hash, item));
    }

    kept.into_iter().map(|(_, item)| item).collect()
}
