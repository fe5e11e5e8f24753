//! Static catalog: products and editorial content.
//!
//! Everything here is built once at startup and only ever read. Handlers
//! reach it through [`AppState::catalog`](crate::state::AppState::catalog).

use std::str::FromStr;
use std::sync::Arc;

use athyre_core::{ArticleId, CurrencyCode, Price, Product, ProductId};
use thiserror::Error;

/// Number of related products shown on a product page.
pub const RELATED_PRODUCTS_LIMIT: usize = 4;

/// Number of journal articles teased on the home page.
pub const HOME_ARTICLES_LIMIT: usize = 3;

/// A `?category=` value that names no filter tab.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Journal article category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleCategory {
    Recipe,
    Playlist,
    FitnessTip,
}

impl ArticleCategory {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Recipe => "Recipe",
            Self::Playlist => "Playlist",
            Self::FitnessTip => "Fitness Tip",
        }
    }

    #[must_use]
    pub const fn is_playlist(&self) -> bool {
        matches!(self, Self::Playlist)
    }
}

/// Journal filter tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JournalFilter {
    #[default]
    All,
    Only(ArticleCategory),
}

impl JournalFilter {
    /// Tabs in display order.
    pub const TABS: [Self; 4] = [
        Self::All,
        Self::Only(ArticleCategory::Recipe),
        Self::Only(ArticleCategory::Playlist),
        Self::Only(ArticleCategory::FitnessTip),
    ];

    /// Query value selecting this tab.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(ArticleCategory::Recipe) => "recipe",
            Self::Only(ArticleCategory::Playlist) => "playlist",
            Self::Only(ArticleCategory::FitnessTip) => "fitness-tip",
        }
    }

    #[must_use]
    pub const fn tab_label(&self) -> &'static str {
        match self {
            Self::All => "All Posts",
            Self::Only(ArticleCategory::Recipe) => "Recipes",
            Self::Only(ArticleCategory::Playlist) => "Playlists",
            Self::Only(ArticleCategory::FitnessTip) => "Fitness Tips",
        }
    }

    #[must_use]
    pub fn matches(&self, article: &JournalArticle) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => article.category == *category,
        }
    }
}

impl FromStr for JournalFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::TABS
            .into_iter()
            .find(|tab| tab.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Collection page filter tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionFilter {
    #[default]
    All,
    Tops,
    Bottoms,
    Outerwear,
}

impl CollectionFilter {
    /// Tabs in display order.
    pub const TABS: [Self; 4] = [Self::All, Self::Tops, Self::Bottoms, Self::Outerwear];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Tops => "Tops",
            Self::Bottoms => "Bottoms",
            Self::Outerwear => "Outerwear",
        }
    }

    /// Query value selecting this tab.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Tops => "tops",
            Self::Bottoms => "bottoms",
            Self::Outerwear => "outerwear",
        }
    }

    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            category => product.category == category.label(),
        }
    }
}

impl FromStr for CollectionFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::TABS
            .into_iter()
            .find(|tab| tab.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A journal article teaser.
#[derive(Debug, Clone)]
pub struct JournalArticle {
    pub id: ArticleId,
    pub title: String,
    pub excerpt: String,
    pub category: ArticleCategory,
    pub image: String,
    pub read_time_minutes: u32,
    pub author: String,
    pub date: String,
}

/// A promotional collection banner.
#[derive(Debug, Clone)]
pub struct CollectionCard {
    pub title: String,
    pub image: String,
    pub color: String,
    pub link: String,
}

/// Read-only catalog shared by all handlers.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
    articles: Arc<Vec<JournalArticle>>,
    cards: Arc<Vec<CollectionCard>>,
}

impl Catalog {
    /// Build a catalog from explicit records.
    #[must_use]
    pub fn new(
        products: Vec<Product>,
        articles: Vec<JournalArticle>,
        cards: Vec<CollectionCard>,
    ) -> Self {
        Self {
            products: Arc::new(products),
            articles: Arc::new(articles),
            cards: Arc::new(cards),
        }
    }

    /// The Rise collection and current editorial content.
    #[must_use]
    pub fn rise() -> Self {
        Self::new(rise_products(), journal_articles(), collection_cards())
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn product_by_handle(&self, handle: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.handle == handle)
    }

    /// Other products in the same category, in catalog order.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .collect()
    }

    /// Products shown under a collection tab, in catalog order.
    #[must_use]
    pub fn products_in(&self, filter: CollectionFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Every journal article, newest first.
    #[must_use]
    pub fn articles(&self) -> &[JournalArticle] {
        &self.articles
    }

    /// The newest `limit` articles.
    #[must_use]
    pub fn latest_articles(&self, limit: usize) -> &[JournalArticle] {
        self.articles.get(..limit).unwrap_or(&self.articles)
    }

    /// The article headlining the journal page.
    #[must_use]
    pub fn featured_article(&self) -> Option<&JournalArticle> {
        self.articles.first()
    }

    /// Articles shown under a journal tab, newest first.
    #[must_use]
    pub fn articles_in(&self, filter: JournalFilter) -> Vec<&JournalArticle> {
        self.articles.iter().filter(|a| filter.matches(a)).collect()
    }

    #[must_use]
    pub fn collection_cards(&self) -> &[CollectionCard] {
        &self.cards
    }
}

// =============================================================================
// Seed Data
// =============================================================================

const FULL_SIZES: [&str; 5] = ["XS", "S", "M", "L", "XL"];
const ALL_COLORS: [&str; 3] = ["Black", "Navy", "Cherry"];

struct Seed<'a> {
    id: i32,
    title: &'a str,
    price: i64,
    images: [&'a str; 2],
    colors: &'a [&'a str],
    sizes: &'a [&'a str],
    rating: f32,
    reviews: u32,
    handle: &'a str,
    is_new: bool,
    category: &'a str,
}

impl Seed<'_> {
    fn build(&self) -> Product {
        Product {
            id: ProductId::new(self.id),
            handle: self.handle.to_string(),
            title: self.title.to_string(),
            price: Price::from_major(self.price, CurrencyCode::USD),
            images: self.images.iter().map(|url| unsplash(url, 800)).collect(),
            sizes: self.sizes.iter().map(|s| (*s).to_string()).collect(),
            colors: self.colors.iter().map(|c| (*c).to_string()).collect(),
            rating: self.rating,
            reviews: self.reviews,
            category: self.category.to_string(),
            is_new: self.is_new,
        }
    }
}

fn unsplash(photo: &str, width: u32) -> String {
    format!("https://images.unsplash.com/{photo}?w={width}")
}

fn rise_products() -> Vec<Product> {
    [
        Seed {
            id: 1,
            title: "Rise Sports Bra",
            price: 68,
            images: ["photo-1544367567-0f2fcb009e0b", "photo-1578408663304-03c3ac99eb02"],
            colors: &ALL_COLORS,
            sizes: &FULL_SIZES,
            rating: 4.8,
            reviews: 127,
            handle: "rise-sports-bra",
            is_new: true,
            category: "Tops",
        },
        Seed {
            id: 2,
            title: "Rise Leggings",
            price: 88,
            images: ["photo-1506629082955-511b1aa562c8", "photo-1556906781-9a412961c28c"],
            colors: &ALL_COLORS,
            sizes: &FULL_SIZES,
            rating: 4.9,
            reviews: 203,
            handle: "rise-leggings",
            is_new: false,
            category: "Bottoms",
        },
        Seed {
            id: 3,
            title: "Rise Tank",
            price: 48,
            images: ["photo-1518609878373-06d740f60d8b", "photo-1515886657613-9f3515b0c78f"],
            colors: &ALL_COLORS,
            sizes: &FULL_SIZES,
            rating: 4.7,
            reviews: 89,
            handle: "rise-tank",
            is_new: false,
            category: "Tops",
        },
        Seed {
            id: 4,
            title: "Rise Shorts",
            price: 58,
            images: ["photo-1556906781-9a412961c28c", "photo-1506629082955-511b1aa562c8"],
            colors: &ALL_COLORS,
            sizes: &FULL_SIZES,
            rating: 4.6,
            reviews: 156,
            handle: "rise-shorts",
            is_new: false,
            category: "Bottoms",
        },
        Seed {
            id: 5,
            title: "Rise Long Sleeve Top",
            price: 72,
            images: ["photo-1544367567-0f2fcb009e0b", "photo-1578408663304-03c3ac99eb02"],
            colors: &["Black", "Navy"],
            sizes: &FULL_SIZES,
            rating: 4.8,
            reviews: 94,
            handle: "rise-long-sleeve",
            is_new: true,
            category: "Tops",
        },
        Seed {
            id: 6,
            title: "Rise Crop Top",
            price: 52,
            images: ["photo-1515886657613-9f3515b0c78f", "photo-1518609878373-06d740f60d8b"],
            colors: &["Black", "Cherry"],
            sizes: &["XS", "S", "M", "L"],
            rating: 4.7,
            reviews: 112,
            handle: "rise-crop-top",
            is_new: false,
            category: "Tops",
        },
        Seed {
            id: 7,
            title: "Rise Joggers",
            price: 78,
            images: ["photo-1506629082955-511b1aa562c8", "photo-1556906781-9a412961c28c"],
            colors: &["Black", "Navy"],
            sizes: &FULL_SIZES,
            rating: 4.9,
            reviews: 178,
            handle: "rise-joggers",
            is_new: false,
            category: "Bottoms",
        },
        Seed {
            id: 8,
            title: "Rise Sports Jacket",
            price: 98,
            images: ["photo-1578408663304-03c3ac99eb02", "photo-1544367567-0f2fcb009e0b"],
            colors: &ALL_COLORS,
            sizes: &["S", "M", "L", "XL"],
            rating: 4.8,
            reviews: 67,
            handle: "rise-jacket",
            is_new: true,
            category: "Outerwear",
        },
    ]
    .iter()
    .map(Seed::build)
    .collect()
}

fn journal_articles() -> Vec<JournalArticle> {
    use ArticleCategory::{FitnessTip, Playlist, Recipe};

    [
        (
            "Pre-Workout Energy Bites Recipe",
            "Fuel your workout with these delicious, nutritious energy bites packed with protein and healthy fats.",
            Recipe,
            "photo-1490645935967-10de6ba17061",
            5,
            "Sarah Chen",
            "Jan 10, 2025",
        ),
        (
            "Morning Movement Mix",
            "Wake up and energize with this curated playlist designed to get you moving and motivated.",
            Playlist,
            "photo-1571902943202-507ec2618e8f",
            3,
            "DJ Riley",
            "Jan 8, 2025",
        ),
        (
            "Perfect Form: Mastering the Squat",
            "Learn the fundamentals of proper squat technique to maximize results and prevent injury.",
            FitnessTip,
            "photo-1518611012118-696072aa579a",
            7,
            "Coach Marcus",
            "Jan 5, 2025",
        ),
        (
            "Post-Workout Recovery Smoothie",
            "Replenish and repair with this protein-packed smoothie featuring bananas, berries, and plant-based protein.",
            Recipe,
            "photo-1638176066666-ffb2f013c7dd",
            4,
            "Sarah Chen",
            "Jan 3, 2025",
        ),
        (
            "High-Intensity Cardio Beats",
            "Push through your HIIT sessions with this high-energy playlist featuring the best workout anthems.",
            Playlist,
            "photo-1493225457124-a3eb161ffa5f",
            2,
            "DJ Riley",
            "Dec 28, 2024",
        ),
        (
            "Building Core Strength: A Complete Guide",
            "Master the fundamentals of core training with exercises that build stability, strength, and power.",
            FitnessTip,
            "photo-1571019614242-c5c5dee9f50b",
            10,
            "Coach Marcus",
            "Dec 20, 2024",
        ),
        (
            "Overnight Oats: 5 Variations",
            "Prep your breakfast the night before with these delicious and nutritious overnight oats recipes.",
            Recipe,
            "photo-1517673400267-0251440c45dc",
            6,
            "Sarah Chen",
            "Dec 15, 2024",
        ),
        (
            "Yoga Flow for Athletes",
            "Improve flexibility and recovery with this 30-minute yoga sequence designed specifically for active individuals.",
            FitnessTip,
            "photo-1544367567-0f2fcb009e0b",
            8,
            "Emma Woods",
            "Dec 10, 2024",
        ),
        (
            "Evening Wind-Down Mix",
            "Cool down and relax after your workout with this soothing playlist perfect for stretching and recovery.",
            Playlist,
            "photo-1511671782779-c97d3d27a1d4",
            3,
            "DJ Riley",
            "Dec 5, 2024",
        ),
    ]
    .into_iter()
    .zip(1..)
    .map(
        |((title, excerpt, category, photo, minutes, author, date), id)| JournalArticle {
            id: ArticleId::new(id),
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            category,
            image: unsplash(photo, 800),
            read_time_minutes: minutes,
            author: author.to_string(),
            date: date.to_string(),
        },
    )
    .collect()
}

fn collection_cards() -> Vec<CollectionCard> {
    [
        ("RISE INTO YOUR POTENTIAL", "photo-1544367567-0f2fcb009e0b", "black"),
        ("RISE ABOVE THE DOUBT", "photo-1518611012118-696072aa579a", "navy"),
        ("RISE TO THE OCCASION", "photo-1571902943202-507ec2618e8f", "cherry"),
    ]
    .into_iter()
    .map(|(title, photo, color)| CollectionCard {
        title: title.to_string(),
        image: unsplash(photo, 1200),
        color: color.to_string(),
        link: "/collections/rise".to_string(),
    })
    .collect()
}
