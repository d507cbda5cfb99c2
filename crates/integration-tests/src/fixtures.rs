//! Sample catalog and shopper data.

use lynora_core::{CategoryId, Price, ProductId, ProductImageId, SessionId};
use lynora_storefront::checkout::CheckoutForm;
use lynora_storefront::models::{Category, Product, ProductImage};

/// A category with a slug derived from its name.
#[must_use]
pub fn category(name: &str) -> Category {
    Category {
        id: CategoryId::generate(),
        name: name.to_string(),
        slug: slugify(name),
        description: None,
        image_url: None,
    }
}

/// A dress with no flags, no category and no images.
#[must_use]
pub fn dress(name: &str, price_cents: i64, stock: u32, sizes: &[&str], colors: &[&str]) -> Product {
    Product {
        id: ProductId::generate(),
        name: name.to_string(),
        slug: slugify(name),
        description: Some(format!("The {name}.")),
        price: Price::from_cents(price_cents),
        stock,
        category_id: None,
        featured: false,
        new_arrival: false,
        best_seller: false,
        sizes: sizes.iter().map(ToString::to_string).collect(),
        colors: colors.iter().map(ToString::to_string).collect(),
        images: Vec::new(),
        category: None,
        created_at: None,
        updated_at: None,
    }
}

fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

fn in_category(mut product: Product, category: &Category) -> Product {
    product.category_id = Some(category.id);
    product.category = Some(category.clone());
    product
}

/// The sample shop.
pub struct Catalog {
    pub evening: Category,
    pub casual: Category,
    pub products: Vec<Product>,
}

impl Catalog {
    /// Look up a sample product by slug.
    ///
    /// # Panics
    ///
    /// Panics if the slug is not in the sample catalog.
    #[must_use]
    pub fn product(&self, slug: &str) -> &Product {
        self.products
            .iter()
            .find(|p| p.slug == slug)
            .unwrap_or_else(|| panic!("no sample product {slug}"))
    }

    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        vec![self.evening.clone(), self.casual.clone()]
    }
}

/// Six dresses over two categories (plus one uncategorized), one sold out and
/// one priced above the default filter ceiling.
#[must_use]
pub fn sample_catalog() -> Catalog {
    let evening = category("Evening");
    let casual = category("Casual");

    let mut crimson = in_category(
        dress("Crimson Evening Gown", 18_999, 4, &["S", "M", "L"], &["Red", "Black"]),
        &evening,
    );
    crimson.featured = true;
    crimson.images = vec![
        ProductImage {
            id: ProductImageId::generate(),
            product_id: crimson.id,
            image_url: "/images/crimson-back.jpg".to_string(),
            alt_text: Some("Back".to_string()),
            display_order: 2,
        },
        ProductImage {
            id: ProductImageId::generate(),
            product_id: crimson.id,
            image_url: "/images/crimson-front.jpg".to_string(),
            alt_text: Some("Front".to_string()),
            display_order: 1,
        },
    ];

    let mut midnight = in_category(
        dress("Midnight Slip Dress", 12_900, 6, &["XS", "S", "M"], &["Black", "Navy"]),
        &evening,
    );
    midnight.new_arrival = true;

    let mut garden = in_category(
        dress("Garden Party Midi", 8_999, 10, &["S", "M", "L", "XL"], &["Pink", "White"]),
        &casual,
    );
    garden.featured = true;
    garden.best_seller = true;

    let mut linen = in_category(
        dress("Linen Sundress", 4_500, 12, &["XS", "S", "M", "L"], &["White", "Beige"]),
        &casual,
    );
    linen.new_arrival = true;

    let velvet = dress("Velvet Wrap Dress", 3_000, 0, &["M", "L"], &["Red"]);

    let bridal = in_category(
        dress("Bridal Couture Gown", 32_000, 1, &["S", "M"], &["White"]),
        &evening,
    );

    Catalog {
        evening,
        casual,
        products: vec![crimson, midnight, garden, linen, velvet, bridal],
    }
}

/// A stable session id for shopper `n`.
///
/// # Panics
///
/// Never; the generated value is non-empty.
#[must_use]
pub fn session(n: u32) -> SessionId {
    SessionId::from_stored(format!("session_1718000000000_shopper{n:03}"))
        .unwrap_or_else(|| panic!("session id for shopper {n}"))
}

/// A fully filled-in shipping form.
#[must_use]
pub fn shipping_form() -> CheckoutForm {
    CheckoutForm {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: "grace@example.com".to_string(),
        phone: "555-0100".to_string(),
        address: "1 Compiler Way".to_string(),
        city: "Arlington".to_string(),
        state: "VA".to_string(),
        zip_code: "22201".to_string(),
        ..CheckoutForm::default()
    }
}
