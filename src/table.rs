//! Generic tabular data view.
//!
//! A `DataTable` owns the transient view state for one table: search text,
//! sort column and direction, current page, and the selected row on that
//! page. Rows are opaque JSON objects; columns name an accessor into them
//! and may carry a custom cell renderer. Every render recomputes the visible
//! window from the caller's rows in a fixed pipeline: filter, then stable
//! sort, then paginate at ten rows per page.
//!
//! The table never validates row shape; a missing accessor renders as an
//! empty cell and sorts like one.

use serde_json::Value;
use std::cmp::Ordering;

pub const PAGE_SIZE: usize = 10;
/// Skeleton rows shown while the caller is still loading data.
pub const PLACEHOLDER_ROWS: usize = 5;

pub type CellRenderer = Box<dyn Fn(&Value) -> String>;

pub struct Column {
    pub accessor: String,
    pub header: String,
    cell: Option<CellRenderer>,
}

impl Column {
    pub fn new(accessor: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            accessor: accessor.into(),
            header: header.into(),
            cell: None,
        }
    }

    pub fn with_cell(
        accessor: impl Into<String>,
        header: impl Into<String>,
        cell: impl Fn(&Value) -> String + 'static,
    ) -> Self {
        Self {
            accessor: accessor.into(),
            header: header.into(),
            cell: Some(Box::new(cell)),
        }
    }

    /// Cell text for one row: the custom renderer if present, else the
    /// accessor value coerced for display.
    pub fn render(&self, row: &Value) -> String {
        match &self.cell {
            Some(cell) => cell(row),
            None => display_value(field(row, &self.accessor)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// The slice of rows visible on the current page, plus pagination facts.
pub struct TableWindow<'a> {
    pub rows: Vec<&'a Value>,
    /// Effective page, clamped to `[1, max(1, total_pages)]`.
    pub page: usize,
    pub total_pages: usize,
    pub filtered_len: usize,
    /// Index into `rows` of the selected row, when any row is visible.
    pub selected: Option<usize>,
}

impl TableWindow<'_> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.total_pages > 0 && self.page < self.total_pages
    }
}

pub struct DataTable {
    columns: Vec<Column>,
    searchable: bool,
    searching: bool,
    search: String,
    sort: Option<(usize, SortDirection)>,
    page: usize,
    selected: usize,
}

impl DataTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            searchable: false,
            searching: false,
            search: String::new(),
            sort: None,
            page: 1,
            selected: 0,
        }
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    pub fn sort(&self) -> Option<(usize, SortDirection)> {
        self.sort
    }

    pub fn search_text(&self) -> &str {
        &self.search
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn start_search(&mut self) {
        if self.searchable {
            self.searching = true;
        }
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
        if self.search.is_empty() {
            self.searching = false;
        }
    }

    /// Leave search-entry mode but keep the query applied.
    pub fn stop_search(&mut self) {
        self.searching = false;
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.searching = false;
    }

    /// Cycle the sort state for a column: ascending on first selection,
    /// flipped on repeat, ascending again after switching columns.
    pub fn toggle_sort(&mut self, column: usize) {
        if column >= self.columns.len() {
            return;
        }
        self.sort = match self.sort {
            Some((current, direction)) if current == column => Some((column, direction.flip())),
            _ => Some((column, SortDirection::Ascending)),
        };
    }

    pub fn next_page(&mut self, rows: &[Value]) {
        let window = self.view(rows);
        if window.has_next() {
            self.page = window.page + 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self, rows: &[Value]) {
        let window = self.view(rows);
        if window.has_prev() {
            self.page = window.page - 1;
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self, rows: &[Value]) {
        let window = self.view(rows);
        if let Some(selected) = window.selected {
            if selected + 1 < window.rows.len() {
                self.selected = selected + 1;
            }
        }
    }

    pub fn select_prev(&mut self, rows: &[Value]) {
        let window = self.view(rows);
        if let Some(selected) = window.selected {
            self.selected = selected.saturating_sub(1);
        }
    }

    /// The full row object behind the current selection, if any. This is
    /// the table's one externally observable output.
    pub fn selected_row<'a>(&self, rows: &'a [Value]) -> Option<&'a Value> {
        let window = self.view(rows);
        window.selected.and_then(|i| window.rows.get(i).copied())
    }

    /// Run the filter / sort / paginate pipeline over the caller's rows.
    pub fn view<'a>(&self, rows: &'a [Value]) -> TableWindow<'a> {
        let mut filtered: Vec<&Value> = if self.searchable && !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            rows.iter()
                .filter(|row| {
                    self.columns.iter().any(|col| {
                        display_value(field(row, &col.accessor))
                            .to_lowercase()
                            .contains(&needle)
                    })
                })
                .collect()
        } else {
            rows.iter().collect()
        };

        if let Some((index, direction)) = self.sort {
            if let Some(column) = self.columns.get(index) {
                // sort_by is stable, so ties keep their input order
                filtered.sort_by(|a, b| {
                    let ord =
                        compare_values(field(a, &column.accessor), field(b, &column.accessor));
                    match direction {
                        SortDirection::Ascending => ord,
                        SortDirection::Descending => ord.reverse(),
                    }
                });
            }
        }

        let filtered_len = filtered.len();
        let total_pages = filtered_len.div_ceil(PAGE_SIZE);
        let page = self.page.clamp(1, total_pages.max(1));
        let visible: Vec<&Value> = filtered
            .into_iter()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect();
        let selected = if visible.is_empty() {
            None
        } else {
            Some(self.selected.min(visible.len() - 1))
        };

        TableWindow {
            rows: visible,
            page,
            total_pages,
            filtered_len,
            selected,
        }
    }
}

fn field<'a>(row: &'a Value, accessor: &str) -> Option<&'a Value> {
    row.get(accessor)
}

/// Coerce an accessor value for display and filtering. Missing values and
/// nulls become the empty string; strings pass through unquoted.
fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Generic less-than/greater-than comparison on raw accessor values:
/// numbers compare numerically, everything else by its display string.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a.and_then(Value::as_f64), b.and_then(Value::as_f64)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => display_value(a).cmp(&display_value(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_columns() -> Vec<Column> {
        vec![Column::new("name", "Name"), Column::new("sku", "SKU")]
    }

    fn products(n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| json!({ "name": format!("item-{i:02}"), "sku": format!("SKU-{i:02}") }))
            .collect()
    }

    fn names(window: &TableWindow) -> Vec<String> {
        window
            .rows
            .iter()
            .map(|row| row["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn search_matches_exactly_one_row() {
        let rows = vec![
            json!({"name": "widget", "sku": "A-1"}),
            json!({"name": "gadget", "sku": "B-2"}),
            json!({"name": "gizmo", "sku": "C-3"}),
        ];
        let mut table = DataTable::new(product_columns()).searchable(true);
        table.start_search();
        for c in "B-2".chars() {
            table.push_search_char(c);
        }

        let window = table.view(&rows);
        assert_eq!(window.filtered_len, 1);
        assert_eq!(names(&window), vec!["gadget"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let rows = vec![json!({"name": "Widget", "sku": "A-1"})];
        let mut table = DataTable::new(product_columns()).searchable(true);
        table.start_search();
        for c in "WIDG".chars() {
            table.push_search_char(c);
        }
        assert_eq!(table.view(&rows).filtered_len, 1);
    }

    #[test]
    fn search_ignored_when_not_searchable() {
        let rows = products(3);
        let mut table = DataTable::new(product_columns());
        table.start_search();
        assert!(!table.is_searching());
        table.push_search_char('z');
        // not searchable, so the query must not filter anything
        assert_eq!(table.view(&rows).filtered_len, 3);
    }

    #[test]
    fn sorting_twice_reverses_order() {
        let rows = vec![
            json!({"name": "pear", "sku": "3"}),
            json!({"name": "apple", "sku": "1"}),
            json!({"name": "mango", "sku": "2"}),
        ];
        let mut table = DataTable::new(product_columns());

        table.toggle_sort(0);
        let ascending = names(&table.view(&rows));
        assert_eq!(ascending, vec!["apple", "mango", "pear"]);

        table.toggle_sort(0);
        let descending = names(&table.view(&rows));
        assert_eq!(
            descending,
            ascending.into_iter().rev().collect::<Vec<_>>()
        );
    }

    #[test]
    fn switching_sort_column_resets_to_ascending() {
        let mut table = DataTable::new(product_columns());
        table.toggle_sort(0);
        table.toggle_sort(0);
        assert_eq!(table.sort(), Some((0, SortDirection::Descending)));

        table.toggle_sort(1);
        assert_eq!(table.sort(), Some((1, SortDirection::Ascending)));
    }

    #[test]
    fn numbers_sort_numerically() {
        let rows = vec![
            json!({"name": "a", "sku": 10}),
            json!({"name": "b", "sku": 2}),
            json!({"name": "c", "sku": 1}),
        ];
        let mut table = DataTable::new(product_columns());
        table.toggle_sort(1);
        assert_eq!(names(&table.view(&rows)), vec!["c", "b", "a"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let rows = vec![
            json!({"name": "first", "sku": "same"}),
            json!({"name": "second", "sku": "same"}),
            json!({"name": "third", "sku": "same"}),
        ];
        let mut table = DataTable::new(product_columns());
        table.toggle_sort(1);
        assert_eq!(names(&table.view(&rows)), vec!["first", "second", "third"]);
    }

    #[test]
    fn page_count_and_last_page_size() {
        let table = DataTable::new(product_columns());

        let rows = products(25);
        let window = table.view(&rows);
        assert_eq!(window.total_pages, 3);
        assert_eq!(window.rows.len(), 10);

        let mut table = DataTable::new(product_columns());
        table.next_page(&rows);
        table.next_page(&rows);
        let last = table.view(&rows);
        assert_eq!(last.page, 3);
        assert_eq!(last.rows.len(), 5);

        // evenly divisible collections fill the last page
        let rows = products(20);
        let table = DataTable::new(product_columns());
        assert_eq!(table.view(&rows).total_pages, 2);
        let mut table = DataTable::new(product_columns());
        table.next_page(&rows);
        assert_eq!(table.view(&rows).rows.len(), 10);
    }

    #[test]
    fn navigation_disabled_at_boundaries() {
        let rows = products(25);
        let mut table = DataTable::new(product_columns());

        let first = table.view(&rows);
        assert!(!first.has_prev());
        assert!(first.has_next());

        table.next_page(&rows);
        table.next_page(&rows);
        let last = table.view(&rows);
        assert!(last.has_prev());
        assert!(!last.has_next());

        // next_page past the end is a no-op
        table.next_page(&rows);
        assert_eq!(table.view(&rows).page, 3);
    }

    #[test]
    fn empty_collection_has_zero_pages_and_no_navigation() {
        let rows: Vec<Value> = Vec::new();
        let table = DataTable::new(product_columns());
        let window = table.view(&rows);
        assert_eq!(window.total_pages, 0);
        assert_eq!(window.page, 1);
        assert!(window.selected.is_none());
        assert!(!window.has_prev());
        assert!(!window.has_next());
    }

    #[test]
    fn narrowing_search_clamps_the_page() {
        let rows: Vec<Value> = (0..12)
            .map(|i| {
                let name = if i < 3 { format!("widget-{i}") } else { format!("part-{i}") };
                json!({ "name": name, "sku": format!("SKU-{i}") })
            })
            .collect();
        let mut table = DataTable::new(product_columns()).searchable(true);
        table.next_page(&rows);
        assert_eq!(table.view(&rows).page, 2);

        table.start_search();
        for c in "wid".chars() {
            table.push_search_char(c);
        }
        let window = table.view(&rows);
        assert_eq!(window.filtered_len, 3);
        assert_eq!(window.page, 1);
        assert_eq!(window.total_pages, 1);
        assert!(!window.has_prev());
        assert!(!window.has_next());
    }

    #[test]
    fn selection_follows_navigation() {
        let rows = products(12);
        let mut table = DataTable::new(product_columns());
        table.select_next(&rows);
        table.select_next(&rows);
        let selected = table.selected_row(&rows).unwrap();
        assert_eq!(selected["name"], "item-02");

        // selection resets when the page changes
        table.next_page(&rows);
        let selected = table.selected_row(&rows).unwrap();
        assert_eq!(selected["name"], "item-10");

        table.select_prev(&rows);
        assert_eq!(table.selected_row(&rows).unwrap()["name"], "item-10");
    }

    #[test]
    fn missing_accessor_renders_empty_and_sorts_first() {
        let rows = vec![
            json!({"name": "has-sku", "sku": "B"}),
            json!({"name": "no-sku"}),
        ];
        let column = Column::new("sku", "SKU");
        assert_eq!(column.render(&rows[1]), "");

        let mut table = DataTable::new(product_columns());
        table.toggle_sort(1);
        assert_eq!(names(&table.view(&rows)), vec!["no-sku", "has-sku"]);
    }

    #[test]
    fn custom_cell_renderer_wins_over_accessor() {
        let column = Column::with_cell("status", "Status", |row| {
            format!("[{}]", row["status"].as_str().unwrap_or("?"))
        });
        assert_eq!(column.render(&json!({"status": "published"})), "[published]");
    }

    #[test]
    fn non_object_rows_degrade_to_empty_cells() {
        let rows = vec![json!("not an object"), json!(42)];
        let table = DataTable::new(product_columns());
        let window = table.view(&rows);
        assert_eq!(window.rows.len(), 2);
        assert_eq!(table.columns()[0].render(window.rows[0]), "");
    }
}
