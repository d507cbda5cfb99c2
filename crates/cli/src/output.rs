//! Terminal rendering for storefront data.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use lynora_core::Price;
use lynora_storefront::cart::CartStore;
use lynora_storefront::checkout::OrderTotals;
use lynora_storefront::models::Product;
use lynora_storefront::store::DataStore;

/// Print one line of text.
pub fn line(text: &str) {
    println!("{text}");
}

/// Print an error for the shopper.
pub fn error(message: &str) {
    eprintln!("error: {message}");
}

/// One-line product summary for listings.
pub fn product_row(product: &Product) {
    let mut badges = Vec::new();
    if product.featured {
        badges.push("featured");
    }
    if product.new_arrival {
        badges.push("new");
    }
    if product.best_seller {
        badges.push("best seller");
    }
    if !product.in_stock() {
        badges.push("sold out");
    }

    let badges = if badges.is_empty() {
        String::new()
    } else {
        format!("  [{}]", badges.join(", "))
    };
    println!(
        "{:<32} {:>9}  {}{badges}",
        product.name,
        product.price.round_to_cents().to_string(),
        product.slug
    );
}

/// Full product page.
pub fn product_detail(product: &Product, related: &[Product]) {
    println!("{}", product.name);
    println!("{}", product.price.round_to_cents());
    if let Some(category) = &product.category {
        println!("Category: {}", category.name);
    }
    if let Some(description) = &product.description {
        println!();
        println!("{description}");
    }
    println!();
    if !product.sizes.is_empty() {
        println!("Sizes:  {}", product.sizes.join(" "));
    }
    if !product.colors.is_empty() {
        println!("Colors: {}", product.colors.join(" "));
    }
    if product.in_stock() {
        println!("{} in stock", product.stock);
    } else {
        println!("Out of stock");
    }
    for image in product.ordered_images() {
        println!("  image: {}", image.image_url);
    }

    if !related.is_empty() {
        println!();
        println!("You may also like:");
        for product in related {
            product_row(product);
        }
    }
}

/// Cart lines followed by the checkout summary.
pub fn cart<S: DataStore>(cart: &CartStore<S>) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for item in cart.items() {
        let variant = [item.size.as_str(), item.color.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" / ");
        println!(
            "{}  {} x{}  {}  {}",
            item.id,
            item.product.name,
            item.quantity,
            variant,
            item.line_total().round_to_cents()
        );
    }
    println!();
    println!("{} item(s)", cart.cart_count());
    totals(&OrderTotals::for_subtotal(cart.cart_total()));
}

/// Subtotal, shipping, tax and total.
pub fn totals(totals: &OrderTotals) {
    println!("Subtotal: {:>10}", totals.subtotal.round_to_cents().to_string());
    let shipping = if totals.shipping == Price::ZERO {
        "FREE".to_string()
    } else {
        totals.shipping.round_to_cents().to_string()
    };
    println!("Shipping: {shipping:>10}");
    println!("Tax:      {:>10}", totals.tax.round_to_cents().to_string());
    println!("Total:    {:>10}", totals.total.round_to_cents().to_string());
}
