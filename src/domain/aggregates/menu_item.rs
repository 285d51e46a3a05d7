//! Menu Item Aggregate

use rust_decimal::Decimal;
use thiserror::Error;
use validator::{Validate, ValidationError};
use crate::domain::value_objects::Price;

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400?text=No+Image";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem {
    id: u64,
    name: String,
    category: String,
    price: Price,
    stock: u32,
    description: String,
    image: String,
    available: bool,
    popular: bool,
}

/// Form input for adding or editing a menu item.
#[derive(Clone, Debug, Default, Validate)]
pub struct MenuItemDraft {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 60))]
    pub category: String,
    #[validate(custom = "non_negative")]
    pub price: Decimal,
    pub stock: u32,
    pub description: String,
    pub image: String,
    pub available: bool,
    pub popular: bool,
}

fn non_negative(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() { return Err(ValidationError::new("negative_price")); }
    Ok(())
}

impl MenuItemDraft {
    /// Trims text fields and validates the result.
    fn normalized(&self) -> Result<Self, MenuError> {
        let draft = Self {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            description: self.description.trim().to_string(),
            image: self.image.trim().to_string(),
            ..self.clone()
        };
        draft.validate().map_err(|errors| {
            let mut fields: Vec<&str> = errors.field_errors().into_keys().collect();
            fields.sort_unstable();
            MenuError::Invalid(fields.join(", "))
        })?;
        Ok(draft)
    }
}

impl MenuItem {
    pub fn create(id: u64, draft: &MenuItemDraft) -> Result<Self, MenuError> {
        let mut item = Self {
            id, name: String::new(), category: String::new(), price: Price::zero(), stock: 0,
            description: String::new(), image: String::new(), available: false, popular: false,
        };
        item.apply(draft)?;
        Ok(item)
    }

    pub fn id(&self) -> u64 { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn category(&self) -> &str { &self.category }
    pub fn price(&self) -> Price { self.price }
    pub fn stock(&self) -> u32 { self.stock }
    pub fn description(&self) -> &str { &self.description }
    pub fn image(&self) -> &str { &self.image }
    pub fn is_available(&self) -> bool { self.available }
    pub fn is_popular(&self) -> bool { self.popular }
    pub fn is_in_stock(&self) -> bool { self.stock > 0 }

    /// Overwrites every editable field from `draft`; the id is kept.
    pub fn apply(&mut self, draft: &MenuItemDraft) -> Result<(), MenuError> {
        let draft = draft.normalized()?;
        self.price = Price::new(draft.price).map_err(|_| MenuError::Invalid("price".into()))?;
        self.name = draft.name;
        self.category = draft.category;
        self.stock = draft.stock;
        self.description = draft.description;
        self.image = if draft.image.is_empty() { PLACEHOLDER_IMAGE.to_string() } else { draft.image };
        self.available = draft.available;
        self.popular = draft.popular;
        Ok(())
    }

    pub fn to_draft(&self) -> MenuItemDraft {
        MenuItemDraft {
            name: self.name.clone(), category: self.category.clone(), price: self.price.amount(),
            stock: self.stock, description: self.description.clone(), image: self.image.clone(),
            available: self.available, popular: self.popular,
        }
    }

    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        [self.name.as_str(), self.category.as_str(), self.description.as_str()]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    #[error("invalid menu item fields: {0}")]
    Invalid(String),
    #[error("menu item {0} not found")]
    ItemNotFound(u64),
}
