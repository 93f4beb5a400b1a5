use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MAX_AMOUNT, MIN_LIMIT};
use crate::error::Error;

/// Colors offered to new categories, cycled through in order.
pub(crate) const PALETTE: &[&str] = &[
    "#FF5722", "#E91E63", "#9C27B0", "#673AB7", "#3F51B5", "#2196F3", "#03A9F4", "#00BCD4",
    "#009688", "#4CAF50", "#8BC34A", "#CDDC39", "#FFC107", "#FF9800", "#795548",
];

/// A spending category with its cashback rate and optional monthly cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Category {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) cashback_percent: Decimal,
    /// Cashback cap per billing cycle. `None` or zero means uncapped.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub(crate) monthly_limit: Option<Decimal>,
    #[serde(default)]
    pub(crate) color: String,
}

impl Category {
    pub(crate) fn new(
        name: String,
        cashback_percent: Decimal,
        monthly_limit: Option<Decimal>,
        color: String,
    ) -> Self {
        Self {
            id: super::new_id(),
            name,
            cashback_percent,
            monthly_limit,
            color,
        }
    }

    /// The cap, if this category has a positive one.
    pub(crate) fn limit(&self) -> Option<Decimal> {
        self.monthly_limit.filter(|limit| *limit > Decimal::ZERO)
    }

    pub(crate) fn has_limit(&self) -> bool {
        self.limit().is_some()
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::EmptyCategoryName);
        }
        if self.cashback_percent < Decimal::ZERO || self.cashback_percent > Decimal::ONE_HUNDRED {
            return Err(Error::PercentOutOfRange(self.cashback_percent));
        }
        if let Some(limit) = self.monthly_limit {
            if limit < Decimal::ZERO {
                return Err(Error::NegativeLimit(limit));
            }
            if limit > Decimal::ZERO && limit < MIN_LIMIT {
                return Err(Error::LimitTooSmall(limit));
            }
            if limit > MAX_AMOUNT {
                return Err(Error::LimitTooLarge(limit));
            }
        }
        Ok(())
    }

    /// Apply a partial update, keeping fields the update leaves unset.
    pub(crate) fn apply(&mut self, update: CategoryUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(percent) = update.cashback_percent {
            self.cashback_percent = percent;
        }
        if let Some(limit) = update.monthly_limit {
            self.monthly_limit = limit;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
    }

    /// Find a category by name (case-insensitive) in a slice.
    pub(crate) fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let lower = name.trim().to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }

    /// Find a category by ID in a slice.
    pub(crate) fn find_by_id<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
        categories.iter().find(|c| c.id == id)
    }

    /// Resolve user input that may be either an ID or a name.
    pub(crate) fn find<'a>(categories: &'a [Category], id_or_name: &str) -> Option<&'a Category> {
        Self::find_by_id(categories, id_or_name).or_else(|| Self::find_by_name(categories, id_or_name))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Fields to change on an existing category. `None` leaves a field as is.
///
/// `monthly_limit` is doubly optional: `Some(None)` removes the cap.
#[derive(Debug, Clone, Default)]
pub(crate) struct CategoryUpdate {
    pub(crate) name: Option<String>,
    pub(crate) cashback_percent: Option<Decimal>,
    pub(crate) monthly_limit: Option<Option<Decimal>>,
    pub(crate) color: Option<String>,
}

/// Categories written to an empty store on first use.
pub(crate) fn default_categories() -> Vec<Category> {
    vec![
        Category::new(
            "Airtel Payment".into(),
            Decimal::from(25),
            Some(Decimal::from(250)),
            "#FF5722".into(),
        ),
        Category::new(
            "Other Utilities".into(),
            Decimal::from(10),
            Some(Decimal::from(250)),
            "#2196F3".into(),
        ),
        Category::new(
            "Swiggy / Zomato / BigBasket".into(),
            Decimal::from(10),
            Some(Decimal::from(500)),
            "#4CAF50".into(),
        ),
    ]
}
