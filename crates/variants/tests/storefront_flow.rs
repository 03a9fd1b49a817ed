use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use storefront_cart::{CartNotification, CartStore, InMemoryCartStore, LineKey};
use storefront_catalog::{
    CatalogProvider, Collection, CollectionFilter, InMemoryCatalog, Product, ProductOption, Stock,
    Variant,
};
use storefront_core::{CollectionId, Money, ProductId, VariantId};
use storefront_variants::{ResolverConfig, UnavailableValuePolicy, VariantResolver};

struct Storefront {
    catalog: Arc<InMemoryCatalog>,
    cart: Arc<InMemoryCartStore>,
    alebrijes: CollectionId,
}

fn cents(value: u64) -> Money {
    Money::from_cents(value)
}

fn seed() -> Result<Storefront> {
    storefront_observability::init();

    let catalog = Arc::new(InMemoryCatalog::new());
    let alebrijes = CollectionId::new();
    catalog.insert_collection(Collection::new(alebrijes, "Alebrijes").featured())?;

    catalog.insert_product(
        Product::new(ProductId::new(), "Fox Alebrije", "fox-alebrije", cents(4_000))
            .with_description("<p>Carved from <em>copal</em> wood.</p>")
            .with_image("https://cdn.example/fox.jpg")
            .in_collection(alebrijes)
            .featured()
            .with_option(ProductOption::new("Size", ["Small", "Large"]))
            .with_variant(
                Variant::new(VariantId::new(), cents(4_000))
                    .with_option("Size", "Small")
                    .with_compare_at(cents(5_000))
                    .with_stock(Stock::Quantity(3)),
            )
            .with_variant(
                Variant::new(VariantId::new(), cents(6_000))
                    .with_option("Size", "Large")
                    .with_stock(Stock::Quantity(0)),
            ),
    )?;

    catalog.insert_product(
        Product::new(ProductId::new(), "Jaguar", "jaguar", cents(9_000))
            .in_collection(alebrijes)
            .with_option(
                ProductOption::new("Color", ["Red", "Blue"])
                    .with_swatch("Red", "#b03a2e")
                    .with_swatch("Blue", "#1f618d"),
            )
            .with_option(ProductOption::new("Size", ["S", "M"]))
            .with_variant(
                Variant::new(VariantId::new(), cents(9_000))
                    .with_option("Color", "Red")
                    .with_option("Size", "S"),
            )
            .with_variant(
                Variant::new(VariantId::new(), cents(9_500))
                    .with_option("Color", "Blue")
                    .with_option("Size", "M")
                    .with_image("https://cdn.example/jaguar-blue.jpg"),
            ),
    )?;

    catalog.insert_product(
        Product::new(ProductId::new(), "Sugar Skull Magnet", "sugar-skull-magnet", cents(800))
            .with_stock(Stock::Available(true)),
    )?;

    Ok(Storefront {
        catalog,
        cart: Arc::new(InMemoryCartStore::default()),
        alebrijes,
    })
}

fn product(store: &Storefront, slug: &str) -> Result<Arc<Product>> {
    store
        .catalog
        .product_by_slug(slug)
        .ok_or_else(|| anyhow::anyhow!("missing product `{slug}`"))
}

#[test]
fn listing_filters_by_collection() -> Result<()> {
    let store = seed()?;

    let all = store.catalog.products_matching(CollectionFilter::All);
    assert_eq!(all.len(), 3);

    let alebrijes = store
        .catalog
        .products_matching(CollectionFilter::Collection(store.alebrijes));
    let titles: Vec<&str> = alebrijes.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Fox Alebrije", "Jaguar"]);

    let featured = store.catalog.products_matching(CollectionFilter::Featured);
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].plain_description(), "Carved from copal wood.");
    Ok(())
}

#[test]
fn shopper_picks_variants_across_cards_and_fills_the_cart() -> Result<()> {
    let store = seed()?;
    let badge = store.cart.subscribe();

    let fox = product(&store, "fox-alebrije")?;
    let mut fox_card = VariantResolver::new(Arc::clone(&fox));
    assert_eq!(fox_card.snapshot().discount_percentage, Some(20));

    // Large is sold out: the button stays disabled and nothing is written.
    fox_card.select_option_value("Size", "Large")?;
    let snapshot = fox_card.snapshot();
    assert!(!snapshot.in_stock);
    assert!(!snapshot.can_add_to_cart);
    assert_eq!(fox_card.handle_add_to_cart(&store.cart)?, None);

    fox_card.select_option_value("Size", "Small")?;
    let line = fox_card
        .handle_add_to_cart(&store.cart)?
        .ok_or_else(|| anyhow::anyhow!("small fox should be purchasable"))?;
    assert_eq!(line.unit_price, cents(4_000));

    let jaguar = product(&store, "jaguar")?;
    let mut jaguar_card = VariantResolver::new(Arc::clone(&jaguar));
    jaguar_card.select_option_value("Color", "Blue")?;
    assert!(!jaguar_card.is_option_value_available("Size", "S"));
    jaguar_card.select_option_value("Size", "M")?;
    assert_eq!(
        jaguar_card.snapshot().image.as_deref(),
        Some("https://cdn.example/jaguar-blue.jpg")
    );
    jaguar_card.handle_add_to_cart_with_quantity(&store.cart, 2)?;

    let magnet = product(&store, "sugar-skull-magnet")?;
    VariantResolver::new(Arc::clone(&magnet)).handle_add_to_cart(&store.cart)?;
    fox_card.handle_add_to_cart(&store.cart)?;

    let lines = store.cart.lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(store.cart.total_items(), 5);
    assert!(lines.iter().any(|l| l.key == LineKey::Product(magnet.id)));
    assert!(
        lines
            .iter()
            .any(|l| l.key == LineKey::Variant(fox.variants[0].id) && l.quantity == 2)
    );

    let counts: Vec<u64> = badge
        .drain()
        .into_iter()
        .filter_map(|n| match n {
            CartNotification::ItemAdded { total_items, .. } => Some(total_items),
            _ => None,
        })
        .collect();
    assert_eq!(counts, vec![1, 3, 4, 5]);
    Ok(())
}

#[test]
fn concurrent_cards_share_one_cart() -> Result<()> {
    let store = seed()?;
    let fox = product(&store, "fox-alebrije")?;
    let badge = store.cart.subscribe();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cart = Arc::clone(&store.cart);
            let fox = Arc::clone(&fox);
            std::thread::spawn(move || -> Result<()> {
                let mut card = VariantResolver::new(fox);
                card.select_option_value("Size", "Small")?;
                for _ in 0..10 {
                    card.handle_add_to_cart(&cart)?;
                }
                Ok(())
            })
        })
        .collect();
    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("card thread panicked"))??;
    }

    assert_eq!(store.cart.lines().len(), 1);
    assert_eq!(store.cart.total_items(), 40);

    // Publishing happens outside the cart lock, so arrival order may interleave.
    let mut totals = Vec::new();
    while let Ok(notification) = badge.recv_timeout(Duration::from_millis(50)) {
        if let CartNotification::ItemAdded { total_items, .. } = notification {
            totals.push(total_items);
        }
    }
    assert_eq!(totals.len(), 40);
    assert_eq!(totals.iter().max(), Some(&40));
    Ok(())
}

#[test]
fn configured_resolver_hides_unreachable_values() -> Result<()> {
    let store = seed()?;
    let config = ResolverConfig::from_lookup(|key| match key {
        ResolverConfig::ENV_UNAVAILABLE_VALUES => Some("hide".to_string()),
        ResolverConfig::ENV_SEED_SELECTION => Some("true".to_string()),
        ResolverConfig::ENV_DEFAULT_QUANTITY => Some("3".to_string()),
        _ => None,
    });
    assert_eq!(config.unavailable_values, UnavailableValuePolicy::Hide);

    let jaguar = product(&store, "jaguar")?;
    let card = VariantResolver::with_config(jaguar, config);

    // Seeded with Red/S, so M is unreachable and hidden.
    let snapshot = card.snapshot();
    assert_eq!(snapshot.selected.get("Color").map(String::as_str), Some("Red"));
    let sizes: Vec<&str> = snapshot.options[1].values.iter().map(|v| v.value.as_str()).collect();
    assert_eq!(sizes, vec!["S"]);

    let line = card
        .handle_add_to_cart(&store.cart)?
        .ok_or_else(|| anyhow::anyhow!("seeded selection should be purchasable"))?;
    assert_eq!(line.quantity, 3);
    Ok(())
}
