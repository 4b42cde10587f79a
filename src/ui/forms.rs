//! Form input widgets: single-line text fields, option selects and a
//! checklist for picking suppliers. These hold value + cursor state only;
//! drawing happens in `draw.rs` with the field's display string.

use unicode_width::UnicodeWidthStr;

/// Single-line text input with a character-based cursor.
#[derive(Debug, Clone)]
pub struct TextField {
    pub label: &'static str,
    value: String,
    cursor: usize,
    masked: bool,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            cursor: 0,
            masked: false,
        }
    }

    pub fn masked(label: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label)
        }
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// What to draw: masked fields render one bullet per character.
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Column offset of the cursor within the display string.
    pub fn cursor_offset(&self) -> u16 {
        if self.masked {
            return self.cursor as u16;
        }
        let at = self.byte_index();
        self.value[..at].width() as u16
    }
}

/// Fixed set of options with one active choice.
#[derive(Debug, Clone)]
pub struct Select<T: Copy> {
    options: Vec<(T, &'static str)>,
    index: usize,
}

impl<T: Copy> Select<T> {
    pub fn new(options: Vec<(T, &'static str)>) -> Self {
        Self { options, index: 0 }
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.options.len();
    }

    pub fn prev(&mut self) {
        self.index = (self.index + self.options.len() - 1) % self.options.len();
    }

    pub fn selected(&self) -> T {
        self.options[self.index].0
    }

    pub fn selected_label(&self) -> &'static str {
        self.options[self.index].1
    }
}

#[derive(Debug, Clone)]
pub struct ChecklistItem {
    pub id: i64,
    pub label: String,
    pub checked: bool,
}

/// Scrollable multi-select list (supplier invitations).
#[derive(Debug, Clone, Default)]
pub struct Checklist {
    items: Vec<ChecklistItem>,
    cursor: usize,
}

impl Checklist {
    /// Replace the items, everything preselected.
    pub fn fill(&mut self, items: Vec<(i64, String)>) {
        self.items = items
            .into_iter()
            .map(|(id, label)| ChecklistItem {
                id,
                label,
                checked: true,
            })
            .collect();
        self.cursor = 0;
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn next(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }

    pub fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn toggle(&mut self) {
        if let Some(item) = self.items.get_mut(self.cursor) {
            item.checked = !item.checked;
        }
    }

    pub fn checked_ids(&self) -> Vec<i64> {
        self.items
            .iter()
            .filter(|item| item.checked)
            .map(|item| item.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_backspace_are_char_aware() {
        let mut field = TextField::new("Name");
        for c in "café".chars() {
            field.insert(c);
        }
        assert_eq!(field.value(), "café");

        field.move_left();
        field.backspace();
        assert_eq!(field.value(), "caé");

        field.move_end();
        field.backspace();
        assert_eq!(field.value(), "ca");
    }

    #[test]
    fn masked_field_displays_bullets() {
        let mut field = TextField::masked("Password");
        field.set_value("secret");
        assert_eq!(field.display(), "••••••");
        assert_eq!(field.cursor_offset(), 6);
    }

    #[test]
    fn select_wraps_both_ways() {
        let mut select = Select::new(vec![(1, "one"), (2, "two"), (3, "three")]);
        select.prev();
        assert_eq!(select.selected(), 3);
        select.next();
        assert_eq!(select.selected(), 1);
        assert_eq!(select.selected_label(), "one");
    }

    #[test]
    fn checklist_preselects_and_toggles() {
        let mut list = Checklist::default();
        list.fill(vec![(10, "acme".into()), (20, "globex".into())]);
        assert_eq!(list.checked_ids(), vec![10, 20]);

        list.toggle();
        assert_eq!(list.checked_ids(), vec![20]);

        list.next();
        list.toggle();
        assert!(list.checked_ids().is_empty());
    }
}
