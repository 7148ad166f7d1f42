use crate::{Result, SeedbenchError};
use rand::Rng;

/// A product category together with the fixed set of subcategories rows may
/// pair it with.
#[derive(Debug, Clone)]
pub struct Category {
    pub name: &'static str,
    pub subcategories: Vec<&'static str>,
}

/// The word lists every categorical draw comes from.
///
/// The defaults are what seedbench ships with. Individual lists can be
/// replaced as long as none of them end up empty; [Vocabulary::validate]
/// runs before any row is generated.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub first_names: Vec<&'static str>,
    pub last_names: Vec<&'static str>,
    pub email_domains: Vec<&'static str>,
    pub product_adjectives: Vec<&'static str>,
    pub product_nouns: Vec<&'static str>,
    pub brands: Vec<&'static str>,
    pub order_statuses: Vec<&'static str>,
    pub customer_segments: Vec<&'static str>,
    pub categories: Vec<Category>,
    pub countries: Vec<&'static str>,
    pub states: Vec<&'static str>,
    pub cities: Vec<&'static str>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            first_names: vec![
                "Alice", "Bjorn", "Carmen", "Dmitri", "Elena", "Felix", "Greta", "Hassan",
                "Ingrid", "Jonas", "Katya", "Liam", "Mona", "Noah", "Olga", "Pavel", "Quinn",
                "Rosa", "Soren", "Tessa",
            ],
            last_names: vec![
                "Andersen", "Berg", "Castillo", "Dahl", "Eriksen", "Fischer", "Garcia", "Holm",
                "Ivanov", "Jensen", "Keller", "Larsen", "Meyer", "Nielsen", "Olsen", "Petrov",
                "Quist", "Rasmussen", "Schmidt", "Thomsen",
            ],
            email_domains: vec![
                "example.com",
                "example.net",
                "example.org",
                "mail.test",
                "inbox.test",
            ],
            product_adjectives: vec![
                "Compact", "Durable", "Ergonomic", "Foldable", "Heavy-Duty", "Lightweight",
                "Modular", "Portable", "Premium", "Recycled", "Sleek", "Sturdy", "Vintage",
                "Wireless",
            ],
            product_nouns: vec![
                "Backpack", "Binder", "Bookcase", "Chair", "Copier", "Desk", "Headset",
                "Keyboard", "Lamp", "Monitor", "Notebook", "Organizer", "Phone", "Printer",
                "Shelf", "Stapler",
            ],
            brands: vec![
                "Acme", "Beacon", "Cascade", "Harbor", "Meridian", "Northwind", "Pioneer",
                "Summit", "Vertex", "Zenith",
            ],
            order_statuses: vec!["pending", "shipped", "delivered", "cancelled"],
            customer_segments: vec!["Consumer", "Corporate", "Enterprise", "Government"],
            categories: vec![
                Category {
                    name: "Furniture",
                    subcategories: vec!["Bookcases", "Chairs", "Desks", "Storage", "Tables"],
                },
                Category {
                    name: "Office Supplies",
                    subcategories: vec!["Binders", "Labels", "Paper", "Pens"],
                },
                Category {
                    name: "Technology",
                    subcategories: vec!["Accessories", "Copiers", "Phones", "Printers"],
                },
                Category {
                    name: "Outdoor",
                    subcategories: vec!["Backpacks", "Lanterns", "Stoves", "Tents"],
                },
                Category {
                    name: "Grocery",
                    subcategories: vec!["Baking", "Beverages", "Canned Goods", "Snacks"],
                },
            ],
            countries: vec![
                "Australia",
                "Canada",
                "Denmark",
                "France",
                "Germany",
                "Japan",
                "Spain",
                "United Kingdom",
                "United States",
            ],
            states: vec![
                "Bavaria",
                "British Columbia",
                "California",
                "Catalonia",
                "Hokkaido",
                "Jutland",
                "New South Wales",
                "Normandy",
                "Ontario",
                "Oregon",
                "Texas",
                "Yorkshire",
            ],
            cities: vec![
                "Aarhus", "Barcelona", "Bordeaux", "Brisbane", "Calgary", "Hamburg", "Leeds",
                "Lyon", "Munich", "Osaka", "Portland", "Sapporo", "Seville", "Sydney", "Toronto",
                "Vancouver",
            ],
        }
    }
}

impl Vocabulary {
    /// Fails on the first empty list, before any row has been generated, so a
    /// bad configuration never produces a partial dataset.
    pub fn validate(&self) -> Result {
        fn non_empty(name: &str, items: &[&'static str]) -> Result {
            if items.is_empty() {
                Err(SeedbenchError::EmptyVocabulary(name.to_string()))
            } else {
                Ok(())
            }
        }

        non_empty("first_names", &self.first_names)?;
        non_empty("last_names", &self.last_names)?;
        non_empty("email_domains", &self.email_domains)?;
        non_empty("product_adjectives", &self.product_adjectives)?;
        non_empty("product_nouns", &self.product_nouns)?;
        non_empty("brands", &self.brands)?;
        non_empty("order_statuses", &self.order_statuses)?;
        non_empty("customer_segments", &self.customer_segments)?;
        non_empty("countries", &self.countries)?;
        non_empty("states", &self.states)?;
        non_empty("cities", &self.cities)?;

        if self.categories.is_empty() {
            return Err(SeedbenchError::EmptyVocabulary("categories".to_string()));
        }

        for category in &self.categories {
            non_empty(
                &format!("subcategories of `{}`", category.name),
                &category.subcategories,
            )?;
        }

        Ok(())
    }

    pub(crate) fn category(&self, rng: &mut impl Rng) -> &Category {
        &self.categories[rng.gen_range(0..self.categories.len())]
    }
}

impl Category {
    pub(crate) fn subcategory(&self, rng: &mut impl Rng) -> &'static str {
        pick(rng, &self.subcategories)
    }
}

/// Uniform draw from a list. Lists are validated before generation starts, so
/// indexing is in bounds here.
pub(crate) fn pick(rng: &mut impl Rng, items: &[&'static str]) -> &'static str {
    items[rng.gen_range(0..items.len())]
}
