//! Data table widget: renders a `DataTable`'s current window with a search
//! bar, sortable headers, skeleton rows while loading and a pagination
//! footer.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use serde_json::Value;

use crate::table::{DataTable, PLACEHOLDER_ROWS};

use super::theme::Theme;

pub fn render(
    f: &mut Frame,
    area: Rect,
    table: &DataTable,
    rows: &[Value],
    loading: bool,
    theme: &Theme,
) {
    let show_search =
        table.is_searchable() && (table.is_searching() || !table.search_text().is_empty());

    let chunks = if show_search {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // search bar
                Constraint::Min(1),    // table body
                Constraint::Length(1), // pagination footer
            ])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area)
    };

    let (body_area, footer_area) = if show_search {
        draw_search_bar(f, table, chunks[0], theme);
        (chunks[1], chunks[2])
    } else {
        (chunks[0], chunks[1])
    };

    let columns = table.columns();
    let ncols = columns.len().max(1) as u32;
    let window = table.view(rows);

    let header = Row::new(columns.iter().enumerate().map(|(i, col)| {
        let mut text = col.header.clone();
        if let Some((sorted, direction)) = table.sort() {
            if sorted == i {
                text.push(' ');
                text.push_str(direction.indicator());
            }
        }
        Cell::from(text)
    }))
    .style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );

    let body: Vec<Row> = if loading {
        // placeholder skeleton instead of data
        (0..PLACEHOLDER_ROWS)
            .map(|_| {
                Row::new(
                    columns
                        .iter()
                        .map(|_| Cell::from("░░░░░░░░").style(Style::default().fg(theme.dimmed_alt))),
                )
            })
            .collect()
    } else if window.rows.is_empty() {
        let mut cells = vec![Cell::from("No data found.")
            .style(Style::default().fg(theme.dimmed).add_modifier(Modifier::ITALIC))];
        cells.extend((1..columns.len()).map(|_| Cell::from("")));
        vec![Row::new(cells)]
    } else {
        window
            .rows
            .iter()
            .map(|row| Row::new(columns.iter().map(|col| Cell::from(col.render(row)))))
            .collect()
    };

    let widths = vec![Constraint::Ratio(1, ncols); ncols as usize];
    let widget = Table::new(body, widths)
        .header(header)
        .row_highlight_style(
            Style::default()
                .bg(theme.selection_bg)
                .fg(theme.selection_fg),
        )
        .style(Style::default().fg(theme.foreground));

    let mut state = TableState::default();
    if !loading {
        state.select(window.selected);
    }
    f.render_stateful_widget(widget, body_area, &mut state);

    draw_footer(f, footer_area, &window, theme, loading);
}

fn draw_search_bar(f: &mut Frame, table: &DataTable, area: Rect, theme: &Theme) {
    let style = if table.is_searching() {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.dimmed)
    };

    let search = Paragraph::new(table.search_text()).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(" Search "),
    );
    f.render_widget(search, area);

    if table.is_searching() {
        let cursor_x = area.x + 1 + table.search_text().len() as u16;
        f.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn draw_footer(
    f: &mut Frame,
    area: Rect,
    window: &crate::table::TableWindow,
    theme: &Theme,
    loading: bool,
) {
    if loading {
        let status = Paragraph::new("Loading...").style(Style::default().fg(theme.dimmed));
        f.render_widget(status, area);
        return;
    }

    let pages = Paragraph::new(format!(
        "Page {} of {} · {} rows",
        window.page,
        window.total_pages.max(1),
        window.filtered_len,
    ))
    .style(Style::default().fg(theme.dimmed));
    f.render_widget(pages, area);

    let nav_style = |enabled: bool| {
        if enabled {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.dimmed_alt)
        }
    };
    let nav = Paragraph::new(Line::from(vec![
        Span::styled("◀ prev", nav_style(window.has_prev())),
        Span::raw("  "),
        Span::styled("next ▶", nav_style(window.has_next())),
    ]))
    .alignment(Alignment::Right);
    f.render_widget(nav, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn render_to_text(table: &DataTable, rows: &[Value], loading: bool) -> String {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| render(f, f.area(), table, rows, loading, &Theme::default()))
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn table() -> DataTable {
        DataTable::new(vec![
            Column::new("name", "Name"),
            Column::new("sku", "SKU"),
        ])
    }

    #[test]
    fn loading_renders_exactly_five_placeholder_rows() {
        let rows = vec![json!({"name": "hidden", "sku": "X"})];
        let text = render_to_text(&table(), &rows, true);
        let skeleton_lines = text.lines().filter(|line| line.contains('░')).count();
        assert_eq!(skeleton_lines, 5);
        assert!(!text.contains("hidden"));
    }

    #[test]
    fn empty_table_shows_no_data_row_and_page_one() {
        let text = render_to_text(&table(), &[], false);
        assert!(text.contains("No data found."));
        assert!(text.contains("Page 1 of 1"));
    }

    #[test]
    fn rows_and_sort_indicator_render() {
        let rows = vec![
            json!({"name": "widget", "sku": "A-1"}),
            json!({"name": "gadget", "sku": "B-2"}),
        ];
        let mut table = table();
        table.toggle_sort(0);
        let text = render_to_text(&table, &rows, false);
        assert!(text.contains("Name ▲"));
        assert!(text.contains("widget"));
        assert!(text.contains("gadget"));
    }
}
