//! Dish selection for customisable packages.
//!
//! A `FIXED` package lists more dishes than the customer gets; for each
//! category with a `num_dishes_to_select` quota the customer picks exactly
//! that many. Categories without a quota, and every dish of other package
//! kinds, are simply included.
//!
//! Rules are matched to dishes by category id when both sides carry one and
//! by case-insensitive display name otherwise. Two different categories
//! sharing a display name and lacking ids will be treated as one.

use std::collections::{BTreeSet, HashMap};

use crate::data_types::catalog_types::{CategorySelection, Dish, Package};
use crate::errors::{SelectionError, ValidationError};

pub type SelectionSet = BTreeSet<String>;

#[derive(Debug, Clone, Copy)]
struct CategoryKey<'a> {
    id: Option<&'a str>,
    name: &'a str,
}

impl<'a> CategoryKey<'a> {
    fn of_dish(dish: &'a Dish) -> Self {
        CategoryKey {
            id: dish.category_id(),
            name: dish.category_name(),
        }
    }

    fn of_rule(rule: &'a CategorySelection) -> Self {
        CategoryKey {
            id: rule.category.id(),
            name: rule.category.name(),
        }
    }

    fn matches(&self, other: &CategoryKey<'_>) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name.to_lowercase() == other.name.to_lowercase(),
        }
    }
}

fn find_rule<'p>(package: &'p Package, key: &CategoryKey<'_>) -> Option<(usize, &'p CategorySelection)> {
    package
        .category_selections
        .iter()
        .enumerate()
        .find(|(_, rule)| CategoryKey::of_rule(rule).matches(key))
}

fn count_selected_in(package: &Package, selection: &SelectionSet, key: &CategoryKey<'_>) -> u32 {
    selection
        .iter()
        .filter_map(|id| package.dish(id))
        .filter(|dish| CategoryKey::of_dish(dish).matches(key))
        .count() as u32
}

/// Default selection for a freshly opened package: the first dishes of each
/// quota category up to its quota, everything else included.
pub fn compute_initial_selection(package: &Package) -> SelectionSet {
    let mut selected = SelectionSet::new();
    let enforce = package.enforces_quotas();
    // running count per matched rule
    let mut counts: HashMap<usize, u32> = HashMap::new();

    for dish in package.dishes() {
        if selected.contains(&dish.id) {
            continue;
        }
        if !enforce {
            selected.insert(dish.id.clone());
            continue;
        }

        let quota = find_rule(package, &CategoryKey::of_dish(dish))
            .and_then(|(idx, rule)| rule.num_dishes_to_select.map(|limit| (idx, limit)));

        match quota {
            Some((idx, limit)) => {
                let count = counts.entry(idx).or_insert(0);
                if *count < limit {
                    selected.insert(dish.id.clone());
                    *count += 1;
                }
            }
            None => {
                selected.insert(dish.id.clone());
            }
        }
    }

    selected
}

/// Selects or deselects `dish_id`, which the caller displays under
/// `category_name`. The returned set is a new one; on error `selection` is
/// left as it was.
pub fn toggle_selection(
    package: &Package,
    selection: &SelectionSet,
    dish_id: &str,
    category_name: &str,
) -> Result<SelectionSet, SelectionError> {
    if !package.enforces_quotas() {
        return Err(SelectionError::NotCustomisable);
    }

    let mut next = selection.clone();
    if next.remove(dish_id) {
        return Ok(next);
    }

    let dish = package
        .dish(dish_id)
        .ok_or_else(|| SelectionError::UnknownDish(dish_id.to_string()))?;
    let key = CategoryKey {
        id: dish.category_id(),
        name: category_name,
    };

    if let Some((_, rule)) = find_rule(package, &key) {
        if let Some(limit) = rule.num_dishes_to_select {
            // count what the rule covers, not what shares the toggled dish's key
            if count_selected_in(package, selection, &CategoryKey::of_rule(rule)) >= limit {
                return Err(SelectionError::QuotaExceeded {
                    limit,
                    category: category_name.to_string(),
                });
            }
        }
    }

    next.insert(dish_id.to_string());
    Ok(next)
}

/// Submission check: every quota category must be filled exactly.
pub fn validate_selection(package: &Package, selection: &SelectionSet) -> Result<(), ValidationError> {
    if !package.enforces_quotas() {
        return Ok(());
    }

    for rule in &package.category_selections {
        let Some(limit) = rule.num_dishes_to_select else {
            continue;
        };
        let key = CategoryKey::of_rule(rule);
        let selected = count_selected_in(package, selection, &key);
        let category = rule.category.name().to_string();

        if selected < limit {
            return Err(ValidationError::QuotaUnfilled { limit, category });
        }
        if selected > limit {
            return Err(ValidationError::QuotaExceeded { limit, category });
        }
    }

    Ok(())
}

/// Selection state of one category as shown next to its dish list.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProgress {
    pub category: String,
    pub dish_ids: Vec<String>,
    pub selected: u32,
    /// Only set for quota-enforcing packages.
    pub limit: Option<u32>,
}

impl CategoryProgress {
    /// Further unselected dishes of this category cannot be picked.
    pub fn is_at_limit(&self) -> bool {
        self.limit.is_some_and(|limit| self.selected >= limit)
    }

    pub fn is_complete(&self) -> bool {
        self.limit.map_or(true, |limit| self.selected == limit)
    }
}

/// Per-category progress in package item order, grouped by display name.
///
/// For a quota category `selected` is the count the quota is checked
/// against, which includes picks from other groups the same rule covers.
pub fn category_progress(package: &Package, selection: &SelectionSet) -> Vec<CategoryProgress> {
    let enforce = package.enforces_quotas();
    let mut progress: Vec<CategoryProgress> = Vec::new();
    let mut rules: Vec<Option<&CategorySelection>> = Vec::new();

    for dish in package.dishes() {
        let name = dish.category_name();
        let pos = match progress.iter().position(|p| p.category == name) {
            Some(pos) => pos,
            None => {
                let rule = if enforce {
                    find_rule(package, &CategoryKey::of_dish(dish)).map(|(_, rule)| rule)
                } else {
                    None
                };
                progress.push(CategoryProgress {
                    category: name.to_string(),
                    dish_ids: Vec::new(),
                    selected: 0,
                    limit: rule.and_then(|rule| rule.num_dishes_to_select),
                });
                rules.push(rule);
                progress.len() - 1
            }
        };

        let entry = &mut progress[pos];
        if !entry.dish_ids.contains(&dish.id) {
            entry.dish_ids.push(dish.id.clone());
            if selection.contains(&dish.id) {
                entry.selected += 1;
            }
        }
    }

    for (entry, rule) in progress.iter_mut().zip(rules) {
        if let Some(rule) = rule {
            if rule.num_dishes_to_select.is_some() {
                entry.selected = count_selected_in(package, selection, &CategoryKey::of_rule(rule));
            }
        }
    }

    progress
}

#[derive(Debug, Clone, PartialEq)]
pub struct DishGroup<'a> {
    pub category_name: String,
    pub dishes: Vec<&'a Dish>,
}

/// Groups a caterer's dishes by category name, in order of first appearance.
pub fn group_by_category(dishes: &[Dish]) -> Vec<DishGroup<'_>> {
    let mut groups: Vec<DishGroup<'_>> = Vec::new();
    for dish in dishes {
        match groups
            .iter_mut()
            .find(|g| g.category_name == dish.category_name())
        {
            Some(group) => group.dishes.push(dish),
            None => groups.push(DishGroup {
                category_name: dish.category_name().to_string(),
                dishes: vec![dish],
            }),
        }
    }
    groups
}

/// A package opened for customisation together with the current picks.
#[derive(Debug, Clone)]
pub struct PackageSelection {
    package: Package,
    selected: SelectionSet,
}

impl PackageSelection {
    pub fn new(package: Package) -> Self {
        let selected = compute_initial_selection(&package);
        PackageSelection { package, selected }
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn selected(&self) -> &SelectionSet {
        &self.selected
    }

    pub fn toggle(&mut self, dish_id: &str, category_name: &str) -> Result<(), SelectionError> {
        self.selected = toggle_selection(&self.package, &self.selected, dish_id, category_name)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_selection(&self.package, &self.selected)
    }

    pub fn progress(&self) -> Vec<CategoryProgress> {
        category_progress(&self.package, &self.selected)
    }
}
