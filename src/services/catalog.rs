use std::cmp::Ordering;
use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::{models::Product, store::MockStore};

/// Flat score bonus for sharing the anchor product's category.
const CATEGORY_BONUS: f64 = 40.0;
/// Maximum score contribution of rating proximity to the anchor.
const RATING_PROXIMITY_MAX: f64 = 20.0;
/// Maximum score contribution of price proximity to the anchor.
const PRICE_PROXIMITY_MAX: f64 = 20.0;
/// Upper bound (exclusive) of the behavioral-variance jitter term.
const JITTER_MAX: f64 = 20.0;
/// Flat bonus for highly rated products.
const HIGH_RATING_BONUS: f64 = 10.0;
const HIGH_RATING_CUTOFF: f32 = 4.5;
/// Flat bonus for products currently in stock.
const IN_STOCK_BONUS: f64 = 5.0;

/// Compound listing filter. Predicates are conjunctive and applied in a
/// fixed sequence: search, category, price range, rating, stock.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match over title, description, category.
    pub search: Option<String>,
    /// Exact category match, case-insensitive. `"all"` matches everything.
    pub category: Option<String>,
    /// Inclusive price bounds.
    pub price_range: Option<(Decimal, Decimal)>,
    /// Minimum rating threshold.
    pub min_rating: Option<f32>,
    /// Keep only products currently in stock.
    pub in_stock_only: bool,
}

/// Listing sort keys. Parsed leniently: an unknown key sorts nothing and
/// the filtered set keeps its original catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PriceLow,
    PriceHigh,
    Rating,
    Newest,
    Name,
}

impl SortKey {
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "price-low" => Some(Self::PriceLow),
            "price-high" => Some(Self::PriceHigh),
            "rating" => Some(Self::Rating),
            "newest" => Some(Self::Newest),
            "name" => Some(Self::Name),
            _ => None,
        }
    }
}

/// Read-only query engine over the product catalog: lookups, search,
/// compound filtering, and the "bought together" recommendation scorer.
///
/// The scorer's jitter comes from an owned RNG so tests can seed it and
/// get reproducible rankings; production construction seeds from entropy.
pub struct CatalogService {
    store: Arc<MockStore>,
    rng: Mutex<StdRng>,
}

impl CatalogService {
    pub fn new(store: Arc<MockStore>) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Constructs the service with a caller-provided RNG, letting tests
    /// pin the jitter term.
    pub fn with_rng(store: Arc<MockStore>, rng: StdRng) -> Self {
        Self {
            store,
            rng: Mutex::new(rng),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Vec<Product> {
        self.store.simulate_io().await;
        self.store.catalog().to_vec()
    }

    /// Soft miss: unknown ids yield `None`.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Option<Product> {
        self.store.simulate_io().await;
        self.store
            .catalog()
            .iter()
            .find(|product| product.id == id)
            .cloned()
    }

    #[instrument(skip(self))]
    pub async fn get_by_category(&self, category: &str) -> Vec<Product> {
        self.store.simulate_io().await;
        self.store
            .catalog()
            .iter()
            .filter(|product| product.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search across title, description, and
    /// category.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Vec<Product> {
        self.store.simulate_io().await;
        let term = query.to_lowercase();
        self.store
            .catalog()
            .iter()
            .filter(|product| product_matches(product, &term))
            .cloned()
            .collect()
    }

    /// Top-rated products, descending by rating, truncated to `limit`.
    #[instrument(skip(self))]
    pub async fn get_featured(&self, limit: usize) -> Vec<Product> {
        self.store.simulate_io().await;
        let mut products = self.store.catalog().to_vec();
        products.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        products.truncate(limit);
        products
    }

    /// Heuristic "bought together" recommendations for the anchor product.
    ///
    /// Every other product is scored on category match, rating and price
    /// proximity, a random jitter term emulating behavioral variance, and
    /// flat quality/stock bonuses; the top `limit` by score are returned
    /// with scores stripped. Output is intentionally non-deterministic
    /// across calls unless the RNG was seeded. An unknown anchor id
    /// soft-misses with an empty list.
    #[instrument(skip(self))]
    pub async fn recommendations(
        &self,
        product_id: i32,
        kind: &str,
        limit: usize,
    ) -> Vec<Product> {
        self.store.simulate_io().await;

        let catalog = self.store.catalog();
        let Some(anchor) = catalog.iter().find(|product| product.id == product_id) else {
            return Vec::new();
        };

        let mut rng = self.rng.lock().await;
        let mut scored: Vec<(f64, &Product)> = catalog
            .iter()
            .filter(|candidate| candidate.id != anchor.id)
            .map(|candidate| {
                let jitter = rng.gen::<f64>() * JITTER_MAX;
                (score_candidate(anchor, candidate, jitter), candidate)
            })
            .collect();
        drop(rng);

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, product)| product.clone())
            .collect()
    }

    /// Compound filter plus a single sort pass, the listing surface's
    /// workhorse. Unknown sort keys preserve the filtered set's original
    /// order.
    #[instrument(skip(self, filter))]
    pub async fn filter_products(
        &self,
        filter: &ProductFilter,
        sort: Option<SortKey>,
    ) -> Vec<Product> {
        self.store.simulate_io().await;

        let mut filtered: Vec<Product> = self
            .store
            .catalog()
            .iter()
            .filter(|product| {
                if let Some(search) = &filter.search {
                    if !product_matches(product, &search.to_lowercase()) {
                        return false;
                    }
                }
                if let Some(category) = &filter.category {
                    if !category.eq_ignore_ascii_case("all")
                        && !product.category.eq_ignore_ascii_case(category)
                    {
                        return false;
                    }
                }
                if let Some((min, max)) = filter.price_range {
                    if product.price < min || product.price > max {
                        return false;
                    }
                }
                if let Some(min_rating) = filter.min_rating {
                    if product.rating < min_rating {
                        return false;
                    }
                }
                if filter.in_stock_only && !product.in_stock {
                    return false;
                }
                true
            })
            .cloned()
            .collect();

        if let Some(key) = sort {
            // Stable sort, so equal keys keep catalog order.
            match key {
                SortKey::PriceLow => filtered.sort_by(|a, b| a.price.cmp(&b.price)),
                SortKey::PriceHigh => filtered.sort_by(|a, b| b.price.cmp(&a.price)),
                SortKey::Rating => filtered.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
                SortKey::Newest => filtered.sort_by(|a, b| b.date_added.cmp(&a.date_added)),
                SortKey::Name => filtered
                    .sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase())),
            }
        }

        filtered
    }

    /// Distinct categories in catalog order, for the filter sidebar.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Vec<String> {
        self.store.simulate_io().await;
        let mut categories: Vec<String> = Vec::new();
        for product in self.store.catalog() {
            if !categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&product.category))
            {
                categories.push(product.category.clone());
            }
        }
        categories
    }
}

fn product_matches(product: &Product, lowercase_term: &str) -> bool {
    product.title.to_lowercase().contains(lowercase_term)
        || product.description.to_lowercase().contains(lowercase_term)
        || product.category.to_lowercase().contains(lowercase_term)
}

/// Scores a candidate against the anchor. `jitter` is the caller-drawn
/// random term in `[0, JITTER_MAX)`.
fn score_candidate(anchor: &Product, candidate: &Product, jitter: f64) -> f64 {
    let mut score = jitter;

    if candidate.category.eq_ignore_ascii_case(&anchor.category) {
        score += CATEGORY_BONUS;
    }

    let rating_distance = f64::from((candidate.rating - anchor.rating).abs());
    score += (RATING_PROXIMITY_MAX - rating_distance * 10.0).max(0.0);

    let anchor_price = anchor.price.to_f64().unwrap_or(0.0);
    if anchor_price > 0.0 {
        let price_distance =
            (candidate.price.to_f64().unwrap_or(0.0) - anchor_price).abs() / anchor_price;
        score += (PRICE_PROXIMITY_MAX - price_distance * 30.0).max(0.0);
    }

    if candidate.rating >= HIGH_RATING_CUTOFF {
        score += HIGH_RATING_BONUS;
    }
    if candidate.in_stock {
        score += IN_STOCK_BONUS;
    }

    score
}
