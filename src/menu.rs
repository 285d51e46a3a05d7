//! Menu catalogue operations.

use chrono::Utc;
use std::str::FromStr;
use tracing::info;

use crate::domain::aggregates::{MenuError, MenuItem, MenuItemDraft};
use crate::domain::events::MenuEvent;

/// Adds a new item; the returned event carries its id. Ids are the current time in
/// milliseconds, bumped past any id already in use.
pub fn add_item(items: &mut Vec<MenuItem>, draft: &MenuItemDraft) -> Result<MenuEvent, MenuError> {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let next = items.iter().map(MenuItem::id).max().map_or(now, |max| now.max(max.saturating_add(1)));
    add_item_with_id(items, draft, next)
}

pub fn add_item_with_id(items: &mut Vec<MenuItem>, draft: &MenuItemDraft, id: u64) -> Result<MenuEvent, MenuError> {
    let item = MenuItem::create(id, draft)?;
    info!(item_id = id, name = item.name(), "menu item added");
    let event = MenuEvent::Added { item_id: id, name: item.name().to_string() };
    items.push(item);
    Ok(event)
}

pub fn update_item(items: &mut [MenuItem], id: u64, draft: &MenuItemDraft) -> Result<MenuEvent, MenuError> {
    let item = items.iter_mut().find(|i| i.id() == id).ok_or(MenuError::ItemNotFound(id))?;
    item.apply(draft)?;
    info!(item_id = id, "menu item updated");
    Ok(MenuEvent::Updated { item_id: id })
}

pub fn delete_item(items: &mut Vec<MenuItem>, id: u64) -> Result<MenuEvent, MenuError> {
    let before = items.len();
    items.retain(|i| i.id() != id);
    if items.len() == before { return Err(MenuError::ItemNotFound(id)); }
    info!(item_id = id, "menu item deleted");
    Ok(MenuEvent::Deleted { item_id: id })
}

/// Items whose name, category or description contains `term`, ignoring case.
pub fn search_menu<'a, I>(items: I, term: &str) -> Vec<&'a MenuItem>
where
    I: IntoIterator<Item = &'a MenuItem>,
{
    let needle = term.to_lowercase();
    items.into_iter().filter(|i| i.matches_lowercase(&needle)).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(if s.eq_ignore_ascii_case("all") { Self::All } else { Self::Only(s.to_string()) })
    }
}

/// Exact category match, as the category buttons on the menu screen do.
pub fn filter_by_category<'a, I>(items: I, filter: &CategoryFilter) -> Vec<&'a MenuItem>
where
    I: IntoIterator<Item = &'a MenuItem>,
{
    match filter {
        CategoryFilter::All => items.into_iter().collect(),
        CategoryFilter::Only(category) => items.into_iter().filter(|i| i.category() == category.as_str()).collect(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuStatistics {
    pub total: usize,
    /// Flagged available and with stock left.
    pub available: usize,
    pub out_of_stock: usize,
    pub popular: usize,
}

pub fn menu_statistics(items: &[MenuItem]) -> MenuStatistics {
    MenuStatistics {
        total: items.len(),
        available: items.iter().filter(|i| i.is_available() && i.is_in_stock()).count(),
        out_of_stock: items.iter().filter(|i| !i.is_in_stock()).count(),
        popular: items.iter().filter(|i| i.is_popular()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn draft(name: &str, category: &str, stock: u32, available: bool, popular: bool) -> MenuItemDraft {
        MenuItemDraft {
            name: name.into(), category: category.into(), price: Decimal::new(150, 0), stock,
            description: format!("Fresh {}", name.to_lowercase()), available, popular, ..Default::default()
        }
    }

    fn catalogue() -> Vec<MenuItem> {
        let mut items = Vec::new();
        add_item_with_id(&mut items, &draft("Chicken Burger", "Lunch", 50, true, true), 1).unwrap();
        add_item_with_id(&mut items, &draft("Coffee", "Beverages", 100, true, false), 2).unwrap();
        add_item_with_id(&mut items, &draft("Pancakes", "Breakfast", 0, false, false), 3).unwrap();
        add_item_with_id(&mut items, &draft("Iced Tea", "Beverages", 10, false, true), 4).unwrap();
        items
    }

    #[test]
    fn test_statistics() {
        let stats = menu_statistics(&catalogue());
        assert_eq!(stats, MenuStatistics { total: 4, available: 2, out_of_stock: 1, popular: 2 });
        assert_eq!(menu_statistics(&[]), MenuStatistics::default());
    }

    #[test]
    fn test_add_assigns_fresh_id() {
        let mut items = catalogue();
        let event = add_item(&mut items, &draft("Fries", "Snacks", 80, true, true)).unwrap();
        let MenuEvent::Added { item_id, .. } = event else { panic!("expected Added") };
        assert!(item_id > 4);
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn test_update_and_delete() {
        let mut items = catalogue();
        let mut edit = items[1].to_draft();
        edit.price = Decimal::new(130, 0);
        update_item(&mut items, 2, &edit).unwrap();
        assert_eq!(items[1].price().amount(), Decimal::new(130, 0));
        assert_eq!(update_item(&mut items, 99, &edit).unwrap_err(), MenuError::ItemNotFound(99));

        assert_eq!(delete_item(&mut items, 3).unwrap(), MenuEvent::Deleted { item_id: 3 });
        assert_eq!(items.len(), 3);
        assert_eq!(delete_item(&mut items, 3).unwrap_err(), MenuError::ItemNotFound(3));
    }

    #[test]
    fn test_failed_update_leaves_item() {
        let mut items = catalogue();
        let before = items[0].clone();
        let bad = MenuItemDraft { name: String::new(), ..items[0].to_draft() };
        assert!(update_item(&mut items, 1, &bad).is_err());
        assert_eq!(items[0], before);
    }

    #[test]
    fn test_search_and_category() {
        let items = catalogue();
        let names: Vec<&str> = search_menu(&items, "BEVER").into_iter().map(MenuItem::name).collect();
        assert_eq!(names, vec!["Coffee", "Iced Tea"]);
        assert_eq!(search_menu(&items, "fresh pan").len(), 1);

        let lunch = filter_by_category(&items, &"Lunch".parse().unwrap());
        assert_eq!(lunch.len(), 1);
        assert_eq!(filter_by_category(&items, &CategoryFilter::All).len(), 4);
        assert!(filter_by_category(&items, &CategoryFilter::Only("lunch".into())).is_empty());
    }
}
