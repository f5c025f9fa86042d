//! Client-side ordering and slicing of already-fetched rows.

use crate::pagination::{reconcile, PaginationInfo};
use crate::pokemon::Pokemon;
use schema::{SortOption, StatName};
use std::cmp::Ordering;

/// Orders rows by one stat. Rows missing the stat count as 0. Stable, so ties
/// keep their fetched (id) order.
pub fn sort_by_stat(rows: &mut [Pokemon], stat: StatName, ascending: bool) {
    rows.sort_by(|a, b| {
        let ordering = a.stat_value(stat).cmp(&b.stat_value(stat));
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

/// Page-local fallback for stat sorts the remote service can't apply. A no-op
/// for name and id sorts, which arrive already ordered.
pub fn apply_local_sort(rows: &mut [Pokemon], sort: SortOption) {
    if let Some((stat, ascending)) = sort.stat_sort() {
        sort_by_stat(rows, stat, ascending);
    }
}

/// Sorts a copy of `rows` by any option.
pub fn sort_pokemon(rows: &[Pokemon], sort: SortOption) -> Vec<Pokemon> {
    let mut sorted = rows.to_vec();
    match sort {
        SortOption::NameAsc => sorted.sort_by(compare_names),
        SortOption::NameDesc => sorted.sort_by(|a, b| compare_names(b, a)),
        SortOption::IdAsc => sorted.sort_by_key(|p| p.id),
        SortOption::IdDesc => sorted.sort_by(|a, b| b.id.cmp(&a.id)),
        SortOption::HpAsc | SortOption::HpDesc | SortOption::AttackAsc | SortOption::AttackDesc => {
            apply_local_sort(&mut sorted, sort)
        }
    }
    sorted
}

fn compare_names(a: &Pokemon, b: &Pokemon) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Slices one page out of a full client-side list.
pub fn paginate(rows: &[Pokemon], page: u32, page_size: u32) -> (Vec<Pokemon>, PaginationInfo) {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_count = u32::try_from(rows.len()).unwrap_or(u32::MAX);
    let start = ((page - 1) as usize).saturating_mul(page_size as usize);
    let slice = rows
        .iter()
        .skip(start)
        .take(page_size as usize)
        .cloned()
        .collect();
    let window = reconcile(page, page_size, total_count);
    let info = PaginationInfo {
        current_page: page,
        total_pages: window.total_pages,
        total_count,
        has_next_page: window.has_next_page,
        has_previous_page: window.has_previous_page,
        page_size,
    };
    (slice, info)
}
