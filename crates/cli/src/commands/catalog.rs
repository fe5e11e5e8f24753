//! Local catalog listing.

use athyre_storefront::catalog::Catalog;
use tracing::info;

/// Log every product in the Rise catalog.
pub fn list() {
    let catalog = Catalog::rise();

    for product in catalog.products() {
        info!(
            id = %product.id,
            handle = %product.handle,
            price = %product.price,
            category = %product.category,
            sizes = %product.sizes.join("/"),
            colors = %product.colors.join("/"),
            new = product.is_new,
            "{}",
            product.title
        );
    }

    info!(products = catalog.products().len(), "Catalog listed");
}
