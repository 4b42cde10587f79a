use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};
use serde_json::Value;

use crate::app::{
    AdminTab, App, BuyerTab, LoginField, RegisterField, RequestDetail, ResponseField,
    ResponseMode, ResponseModal, RfxField, RfxForm, SupplierTab,
};
use crate::api::models::{AwardStatus, NegotiationMessage, ResponseStatus, RfxRequest};
use crate::route::Route;
use crate::toast::ToastLevel;

use super::forms::TextField;
use super::table as table_widget;
use super::theme::Theme;

/// Main draw function, dispatching on the current route.
pub fn draw(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let bg = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(bg, f.area());

    match app.route {
        Route::Login => draw_login(f, app, theme),
        Route::Register => draw_register(f, app, theme),
        Route::Buyer => draw_buyer(f, app, theme),
        Route::Supplier => draw_supplier(f, app, theme),
        Route::Admin => draw_admin(f, app, theme),
    }

    draw_toasts(f, app, theme);
}

// ---- auth screens ----

fn draw_login(f: &mut Frame, app: &App, theme: &Theme) {
    let area = centered_rect(f.area(), 50, 16);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(" RFx Portal — Sign in ");
    f.render_widget(block, area);

    let inner = inset(area, 2, 1);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // username
            Constraint::Length(3), // password
            Constraint::Length(1), // error / progress
            Constraint::Length(1), // hint
        ])
        .split(inner);

    draw_text_field(
        f,
        chunks[0],
        &app.login.username,
        app.login.focus == LoginField::Username,
        theme,
    );
    draw_text_field(
        f,
        chunks[1],
        &app.login.password,
        app.login.focus == LoginField::Password,
        theme,
    );

    if app.login.submitting {
        let progress =
            Paragraph::new("Signing in...").style(Style::default().fg(theme.dimmed));
        f.render_widget(progress, chunks[2]);
    } else if let Some(error) = &app.login.error {
        let error = Paragraph::new(error.as_str()).style(Style::default().fg(theme.error));
        f.render_widget(error, chunks[2]);
    }

    let hint = Paragraph::new("Tab: next field · Enter: sign in · Ctrl+R: register · Esc: quit")
        .style(Style::default().fg(theme.dimmed_alt));
    f.render_widget(hint, chunks[3]);
}

fn draw_register(f: &mut Frame, app: &App, theme: &Theme) {
    let area = centered_rect(f.area(), 50, 21);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(" RFx Portal — Create account ");
    f.render_widget(block, area);

    let inner = inset(area, 2, 1);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // username
            Constraint::Length(3), // email
            Constraint::Length(3), // password
            Constraint::Length(3), // account type
            Constraint::Length(1), // error / progress
            Constraint::Length(1), // hint
        ])
        .split(inner);

    draw_text_field(
        f,
        chunks[0],
        &app.register.username,
        app.register.focus == RegisterField::Username,
        theme,
    );
    draw_text_field(
        f,
        chunks[1],
        &app.register.email,
        app.register.focus == RegisterField::Email,
        theme,
    );
    draw_text_field(
        f,
        chunks[2],
        &app.register.password,
        app.register.focus == RegisterField::Password,
        theme,
    );
    draw_select(
        f,
        chunks[3],
        "Account type",
        app.register.user_type.selected_label(),
        app.register.focus == RegisterField::UserType,
        theme,
    );

    if app.register.submitting {
        let progress =
            Paragraph::new("Creating account...").style(Style::default().fg(theme.dimmed));
        f.render_widget(progress, chunks[4]);
    } else if let Some(error) = &app.register.error {
        let error = Paragraph::new(error.as_str()).style(Style::default().fg(theme.error));
        f.render_widget(error, chunks[4]);
    }

    let hint = Paragraph::new("Tab: next field · Enter: create · Esc: back to sign in")
        .style(Style::default().fg(theme.dimmed_alt));
    f.render_widget(hint, chunks[5]);
}

// ---- dashboards ----

fn draw_buyer(f: &mut Frame, app: &App, theme: &Theme) {
    let chunks = dashboard_chunks(f.area());
    draw_header(f, app, chunks[0], theme);

    let labels: Vec<String> = BuyerTab::ALL.iter().map(|t| t.label().to_string()).collect();
    let active = BuyerTab::ALL
        .iter()
        .position(|t| *t == app.buyer.tab)
        .unwrap_or(0);
    draw_tabs(f, chunks[1], &labels, active, theme);

    match app.buyer.tab {
        BuyerTab::Products => table_widget::render(
            f,
            chunks[2],
            &app.buyer.products_table,
            &app.buyer.product_rows,
            app.buyer.loading,
            theme,
        ),
        BuyerTab::Requests => table_widget::render(
            f,
            chunks[2],
            &app.buyer.requests_table,
            &app.buyer.request_rows,
            app.buyer.loading,
            theme,
        ),
        BuyerTab::Analytics => draw_json_panel(
            f,
            chunks[2],
            " Dashboard Analytics ",
            &app.buyer.analytics,
            theme,
        ),
    }

    let hint = match app.buyer.tab {
        BuyerTab::Analytics => "Tab: switch · r: refresh · Ctrl+L: logout · q: quit",
        _ => "/: search · 1-9: sort · ←→: page · ↑↓: select · Enter: open · Tab: switch · r: refresh · q: quit",
    };
    draw_status_bar(f, chunks[3], hint, theme);

    if let Some(request) = &app.buyer.detail {
        draw_request_summary(f, request, theme);
    }
    if let Some(form) = &app.buyer.form {
        draw_rfx_form(f, form, theme);
    }
}

fn draw_supplier(f: &mut Frame, app: &App, theme: &Theme) {
    let chunks = dashboard_chunks(f.area());
    draw_header(f, app, chunks[0], theme);

    let labels: Vec<String> = SupplierTab::ALL
        .iter()
        .map(|t| {
            // invitation count badge on the first tab
            if *t == SupplierTab::Invitations && !app.supplier.invitations.is_empty() {
                format!("{} ({})", t.label(), app.supplier.invitations.len())
            } else {
                t.label().to_string()
            }
        })
        .collect();
    let active = SupplierTab::ALL
        .iter()
        .position(|t| *t == app.supplier.tab)
        .unwrap_or(0);
    draw_tabs(f, chunks[1], &labels, active, theme);

    match app.supplier.tab {
        SupplierTab::Invitations => table_widget::render(
            f,
            chunks[2],
            &app.supplier.invitations_table,
            &app.supplier.invitation_rows,
            app.supplier.loading,
            theme,
        ),
        SupplierTab::Products => draw_supplier_products(f, chunks[2], app, theme),
        SupplierTab::Responses => draw_supplier_responses(f, chunks[2], app, theme),
    }

    let hint = match app.supplier.tab {
        SupplierTab::Invitations => {
            "/: search · ↑↓: select · Enter: open · Tab: switch · r: refresh · q: quit"
        }
        _ => "Tab: switch · r: refresh · Ctrl+L: logout · q: quit",
    };
    draw_status_bar(f, chunks[3], hint, theme);

    if let Some(detail) = &app.supplier.detail {
        draw_request_detail(f, app, detail, theme);
    }
}

fn draw_admin(f: &mut Frame, app: &App, theme: &Theme) {
    let chunks = dashboard_chunks(f.area());
    draw_header(f, app, chunks[0], theme);

    let labels: Vec<String> = AdminTab::ALL.iter().map(|t| t.label().to_string()).collect();
    let active = AdminTab::ALL
        .iter()
        .position(|t| *t == app.admin.tab)
        .unwrap_or(0);
    draw_tabs(f, chunks[1], &labels, active, theme);

    match app.admin.tab {
        AdminTab::Overview => draw_admin_overview(f, chunks[2], app, theme),
        AdminTab::Workflows => draw_workflows(f, chunks[2], app, theme),
        AdminTab::Users => table_widget::render(
            f,
            chunks[2],
            &app.admin.users_table,
            &app.admin.user_rows,
            app.admin.loading,
            theme,
        ),
        AdminTab::Analytics => draw_json_panel(
            f,
            chunks[2],
            " Platform Analytics ",
            &app.admin.analytics,
            theme,
        ),
        AdminTab::Tickets => draw_tickets(f, chunks[2], app, theme),
    }

    let hint = match app.admin.tab {
        AdminTab::Users => {
            "/: search · 1-9: sort · ↑↓: select · Enter: open · Tab: switch · r: refresh · q: quit"
        }
        _ => "Tab: switch · r: refresh · Ctrl+L: logout · q: quit",
    };
    draw_status_bar(f, chunks[3], hint, theme);
}

fn draw_admin_overview(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(rows[0]);

    let stats = app.admin.stats;
    draw_stat_card(f, cards[0], stats.total_users.to_string(), "Total Users", theme);
    draw_stat_card(
        f,
        cards[1],
        stats.total_workflows.to_string(),
        "Workflow Rules",
        theme,
    );
    draw_stat_card(f, cards[2], stats.open_tickets.to_string(), "Open Tickets", theme);
    draw_stat_card(
        f,
        cards[3],
        stats.total_requests.to_string(),
        "Total Requests",
        theme,
    );

    let note = if app.admin.loading {
        "Loading platform data..."
    } else {
        "Use Tab to inspect workflows, users, analytics and support tickets."
    };
    let note = Paragraph::new(note).style(Style::default().fg(theme.dimmed));
    f.render_widget(note, inset(rows[1], 1, 1));
}

fn draw_stat_card(f: &mut Frame, area: Rect, value: String, label: &str, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed_alt));
    let lines = vec![
        Line::from(Span::styled(
            value,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label, Style::default().fg(theme.dimmed))),
    ];
    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(card, area);
}

fn draw_workflows(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    if app.admin.workflows.is_empty() {
        draw_empty_state(f, area, "No workflow rules", theme);
        return;
    }
    let items: Vec<ListItem> = app
        .admin
        .workflows
        .iter()
        .map(|w| {
            ListItem::new(Line::from(vec![
                Span::styled(w.name.clone(), Style::default().fg(theme.foreground)),
                Span::styled(
                    format!("  {}", w.rule_type),
                    Style::default().fg(theme.dimmed),
                ),
                Span::styled("  Active", Style::default().fg(theme.success)),
            ]))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.dimmed_alt))
            .title(" Workflow Rules "),
    );
    f.render_widget(list, area);
}

fn draw_tickets(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    if app.admin.tickets.is_empty() {
        draw_empty_state(f, area, "No support tickets", theme);
        return;
    }
    let items: Vec<ListItem> = app
        .admin
        .tickets
        .iter()
        .map(|t| {
            let status_color = match t.status {
                crate::api::models::TicketStatus::Open => theme.error,
                crate::api::models::TicketStatus::InProgress => theme.warning,
                crate::api::models::TicketStatus::Resolved => theme.success,
                _ => theme.dimmed,
            };
            let mut spans = vec![
                Span::styled(format!("#{} ", t.id), Style::default().fg(theme.dimmed)),
                Span::styled(t.subject.clone(), Style::default().fg(theme.foreground)),
                Span::styled(
                    format!("  [{}]", t.status.label()),
                    Style::default().fg(status_color),
                ),
            ];
            if !t.description.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", t.description),
                    Style::default().fg(theme.dimmed_alt),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.dimmed_alt))
            .title(" Support Tickets "),
    );
    f.render_widget(list, area);
}

fn draw_supplier_products(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    if app.supplier.products.is_empty() {
        draw_empty_state(f, area, "No products listed", theme);
        return;
    }
    let items: Vec<ListItem> = app
        .supplier
        .products
        .iter()
        .map(|p| {
            let mut spans = vec![
                Span::styled(p.name.clone(), Style::default().fg(theme.foreground)),
                Span::styled(
                    format!("  SKU: {}", p.sku),
                    Style::default().fg(theme.dimmed),
                ),
            ];
            if !p.description.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", p.description),
                    Style::default().fg(theme.dimmed_alt),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.dimmed_alt))
            .title(" My Products "),
    );
    f.render_widget(list, area);
}

fn draw_supplier_responses(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    if app.supplier.responses.is_empty() {
        draw_empty_state(f, area, "No responses yet", theme);
        return;
    }
    let items: Vec<ListItem> = app
        .supplier
        .responses
        .iter()
        .map(|r| {
            let title = r
                .request
                .title()
                .map(str::to_string)
                .or_else(|| {
                    app.supplier
                        .requests
                        .iter()
                        .find(|req| req.id == r.request.id())
                        .map(|req| req.title.clone())
                })
                .unwrap_or_else(|| "Untitled Request".to_string());
            let mut spans = vec![
                Span::styled(title, Style::default().fg(theme.foreground)),
                Span::styled(
                    format!("  [{}]", r.status.label()),
                    Style::default().fg(status_color(r.status, theme)),
                ),
            ];
            if r.award_status == Some(AwardStatus::Awarded) {
                spans.push(Span::styled("  ★ awarded", Style::default().fg(theme.warning)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.dimmed_alt))
            .title(" My Responses "),
    );
    f.render_widget(list, area);
}

// ---- modals ----

fn draw_request_summary(f: &mut Frame, request: &RfxRequest, theme: &Theme) {
    let area = centered_percent(f.area(), 70, 70);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(format!(" {} ", request.title));
    f.render_widget(block, area);

    let inner = inset(area, 2, 1);
    let mut lines = request_meta_lines(request, theme);
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Specifications",
        Style::default().fg(theme.dimmed),
    )));
    for line in pretty_json(&request.specifications) {
        lines.push(Line::from(Span::styled(
            line,
            Style::default().fg(theme.foreground),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Esc: close",
        Style::default().fg(theme.dimmed_alt),
    )));

    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(body, inner);
}

fn draw_rfx_form(f: &mut Frame, form: &RfxForm, theme: &Theme) {
    let area = centered_percent(f.area(), 70, 80);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(format!(" Create RFx Request — {} ", form.product.name));
    f.render_widget(block, area);

    let inner = inset(area, 2, 1);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // type
            Constraint::Length(3), // deadline
            Constraint::Length(3), // specs
            Constraint::Min(3),    // suppliers
            Constraint::Length(1), // error / progress
            Constraint::Length(1), // hint
        ])
        .split(inner);

    draw_select(
        f,
        chunks[0],
        "RFx type",
        form.rfx_type.selected_label(),
        form.focus == RfxField::Type,
        theme,
    );
    draw_text_field(f, chunks[1], &form.deadline, form.focus == RfxField::Deadline, theme);
    draw_text_field(f, chunks[2], &form.specs, form.focus == RfxField::Specs, theme);

    let focused = form.focus == RfxField::Suppliers;
    let border = if focused { theme.accent } else { theme.dimmed_alt };
    let items: Vec<ListItem> = if form.suppliers.is_empty() {
        vec![ListItem::new(Span::styled(
            "No suppliers available for this product",
            Style::default().fg(theme.dimmed),
        ))]
    } else {
        form.suppliers
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let mark = if item.checked { "[x]" } else { "[ ]" };
                let style = if focused && i == form.suppliers.cursor() {
                    Style::default().bg(theme.selection_bg).fg(theme.selection_fg)
                } else {
                    Style::default().fg(theme.foreground)
                };
                ListItem::new(Span::styled(format!("{mark} {}", item.label), style))
            })
            .collect()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" Suppliers ({}) ", form.suppliers.items().len())),
    );
    f.render_widget(list, chunks[3]);

    if form.submitting {
        let progress =
            Paragraph::new("Submitting request...").style(Style::default().fg(theme.dimmed));
        f.render_widget(progress, chunks[4]);
    } else if let Some(error) = &form.error {
        let error = Paragraph::new(error.as_str()).style(Style::default().fg(theme.error));
        f.render_widget(error, chunks[4]);
    }

    let hint = Paragraph::new("Tab: field · Space: toggle · Enter: submit · Esc: cancel")
        .style(Style::default().fg(theme.dimmed_alt));
    f.render_widget(hint, chunks[5]);
}

fn draw_request_detail(f: &mut Frame, app: &App, detail: &RequestDetail, theme: &Theme) {
    let area = centered_percent(f.area(), 80, 85);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(format!(" {} ", detail.request.title));
    f.render_widget(block, area);

    let inner = inset(area, 2, 1);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // meta + description
            Constraint::Min(4),    // negotiation
            Constraint::Length(3), // message input
            Constraint::Length(1), // actions
            Constraint::Length(1), // notice / hint
        ])
        .split(inner);

    let mut meta = request_meta_lines(&detail.request, theme);
    meta.push(Line::from(vec![
        Span::styled("Description: ", Style::default().fg(theme.dimmed)),
        Span::styled(
            detail.request.description.clone(),
            Style::default().fg(theme.foreground),
        ),
    ]));
    f.render_widget(Paragraph::new(meta).wrap(Wrap { trim: false }), chunks[0]);

    draw_negotiation(f, chunks[1], detail, theme);

    if detail.composing {
        draw_text_field(f, chunks[2], &detail.message, true, theme);
    } else {
        let idle = Paragraph::new("m: write message")
            .style(Style::default().fg(theme.dimmed_alt))
            .block(Block::default().borders(Borders::ALL).border_style(
                Style::default().fg(theme.dimmed_alt),
            ));
        f.render_widget(idle, chunks[2]);
    }

    f.render_widget(
        Paragraph::new(actions_line(app, theme)),
        chunks[3],
    );

    if let Some(notice) = &detail.notice {
        let notice = Paragraph::new(notice.as_str()).style(Style::default().fg(theme.warning));
        f.render_widget(notice, chunks[4]);
    } else {
        let hint = Paragraph::new("Esc: close").style(Style::default().fg(theme.dimmed_alt));
        f.render_widget(hint, chunks[4]);
    }

    if let Some(modal) = &detail.response_modal {
        draw_response_modal(f, modal, theme);
    }
}

fn draw_negotiation(f: &mut Frame, area: Rect, detail: &RequestDetail, theme: &Theme) {
    let title = match &detail.thread {
        Some(thread) if !thread.subject.is_empty() => format!(" {} ", thread.subject),
        _ => " Negotiation ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed_alt))
        .title(title);

    if detail.thread_loading {
        let loading = Paragraph::new("Loading thread...")
            .style(Style::default().fg(theme.dimmed))
            .block(block);
        f.render_widget(loading, area);
        return;
    }

    let Some(thread) = &detail.thread else {
        let empty = Paragraph::new("No negotiation yet. Press n to start one.")
            .style(Style::default().fg(theme.dimmed))
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    if thread.messages.is_empty() {
        let empty = Paragraph::new("No messages yet. Start the conversation!")
            .style(Style::default().fg(theme.dimmed))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    // show the newest messages that fit
    let capacity = area.height.saturating_sub(2) as usize;
    let start = thread.messages.len().saturating_sub(capacity);
    let items: Vec<ListItem> = thread.messages[start..]
        .iter()
        .map(|m| message_line(m, theme))
        .map(ListItem::new)
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn message_line(message: &NegotiationMessage, theme: &Theme) -> Line<'static> {
    let stamp = message
        .created_at
        .map(|dt| dt.format("%m-%d %H:%M").to_string())
        .unwrap_or_default();
    Line::from(vec![
        Span::styled(format!("{stamp} "), Style::default().fg(theme.dimmed_alt)),
        Span::styled(
            format!("{}: ", message.sender_username),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            message.content.clone(),
            Style::default().fg(theme.foreground),
        ),
    ])
}

/// Supplier actions available for the open request, keyed by state.
fn actions_line(app: &App, theme: &Theme) -> Line<'static> {
    let mut spans: Vec<Span> = Vec::new();
    match app.current_response() {
        None => spans.push(Span::styled(
            "r: reply to request",
            Style::default().fg(theme.accent),
        )),
        Some(response) => {
            spans.push(Span::styled(
                "e: edit response",
                Style::default().fg(theme.accent),
            ));
            if response.award_status == Some(AwardStatus::Awarded) {
                spans.push(Span::styled(
                    "  a: accept award  d: decline",
                    Style::default().fg(theme.warning),
                ));
            }
            if matches!(
                response.status,
                ResponseStatus::Submitted | ResponseStatus::UnderReview
            ) {
                spans.push(Span::styled(
                    "  x: close response",
                    Style::default().fg(theme.dimmed),
                ));
            }
            spans.push(Span::styled(
                format!("  Status: {}", response.status.label()),
                Style::default().fg(theme.dimmed),
            ));
        }
    }
    Line::from(spans)
}

fn draw_response_modal(f: &mut Frame, modal: &ResponseModal, theme: &Theme) {
    let area = centered_rect(f.area(), 60, 15);
    f.render_widget(Clear, area);

    let title = match modal.mode {
        ResponseMode::Reply { .. } => " Reply to Request ",
        ResponseMode::Edit { .. } => " Edit Response ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(title);
    f.render_widget(block, area);

    let inner = inset(area, 2, 1);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    draw_text_field(
        f,
        chunks[0],
        &modal.content,
        modal.focus == ResponseField::Content,
        theme,
    );
    draw_text_field(
        f,
        chunks[1],
        &modal.quoted_price,
        modal.focus == ResponseField::Price,
        theme,
    );
    draw_text_field(
        f,
        chunks[2],
        &modal.delivery_timeline,
        modal.focus == ResponseField::Timeline,
        theme,
    );

    if modal.submitting {
        let progress =
            Paragraph::new("Submitting...").style(Style::default().fg(theme.dimmed));
        f.render_widget(progress, chunks[3]);
    } else if let Some(error) = &modal.error {
        let error = Paragraph::new(error.as_str()).style(Style::default().fg(theme.error));
        f.render_widget(error, chunks[3]);
    }

    let hint = Paragraph::new("Tab: field · Enter: submit · Esc: cancel")
        .style(Style::default().fg(theme.dimmed_alt));
    f.render_widget(hint, chunks[4]);
}

// ---- chrome ----

fn dashboard_chunks(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(1), // tabs
            Constraint::Min(1),    // content
            Constraint::Length(1), // status bar
        ])
        .split(area)
}

fn draw_header(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(theme.dimmed_alt));
    f.render_widget(block, area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "RFx Portal",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", app.route.title()),
            Style::default().fg(theme.dimmed),
        ),
    ]));
    f.render_widget(title, inset(area, 1, 1));

    if let Some(session) = &app.session {
        let who = Paragraph::new(format!(
            "{} · {}",
            session.user.username, session.user.user_type
        ))
        .style(Style::default().fg(theme.dimmed))
        .alignment(Alignment::Right);
        f.render_widget(who, inset(area, 1, 1));
    }
}

fn draw_tabs(f: &mut Frame, area: Rect, labels: &[String], active: usize, theme: &Theme) {
    let tabs = Tabs::new(labels.to_vec())
        .select(active)
        .style(Style::default().fg(theme.dimmed))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(tabs, area);
}

fn draw_status_bar(f: &mut Frame, area: Rect, hint: &str, theme: &Theme) {
    let bar = Paragraph::new(format!(" {hint}")).style(Style::default().fg(theme.dimmed));
    f.render_widget(bar, area);
}

fn draw_toasts(f: &mut Frame, app: &App, theme: &Theme) {
    if app.toasts.is_empty() {
        return;
    }
    let width = 44.min(f.area().width);
    let x = f.area().right().saturating_sub(width);
    for (i, toast) in app.toasts.iter().enumerate() {
        let y = f.area().y + 1 + (i as u16) * 3;
        if y + 3 > f.area().bottom() {
            break;
        }
        let area = Rect::new(x, y, width, 3);
        f.render_widget(Clear, area);

        let color = match toast.level {
            ToastLevel::Success => theme.success,
            ToastLevel::Error => theme.error,
            ToastLevel::Info => theme.accent,
        };
        let body = Paragraph::new(format!("{} {}", toast.level.symbol(), toast.message))
            .style(Style::default().fg(theme.foreground))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(body, area);
    }
}

// ---- shared widgets ----

fn draw_text_field(f: &mut Frame, area: Rect, field: &TextField, focused: bool, theme: &Theme) {
    let border = if focused { theme.accent } else { theme.dimmed_alt };
    let widget = Paragraph::new(field.display())
        .style(Style::default().fg(theme.foreground))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!(" {} ", field.label)),
        );
    f.render_widget(widget, area);

    if focused {
        let x = area.x + 1 + field.cursor_offset();
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn draw_select(
    f: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    theme: &Theme,
) {
    let border = if focused { theme.accent } else { theme.dimmed_alt };
    let widget = Paragraph::new(format!("◂ {value} ▸"))
        .style(Style::default().fg(theme.foreground))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!(" {label} ")),
        );
    f.render_widget(widget, area);
}

fn draw_json_panel(f: &mut Frame, area: Rect, title: &str, value: &Value, theme: &Theme) {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    let panel = Paragraph::new(text)
        .style(Style::default().fg(theme.foreground))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.dimmed_alt))
                .title(title.to_string()),
        );
    f.render_widget(panel, area);
}

fn draw_empty_state(f: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let empty = Paragraph::new(message.to_string())
        .style(Style::default().fg(theme.dimmed).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.dimmed_alt)),
        );
    f.render_widget(empty, area);
}

fn request_meta_lines(request: &RfxRequest, theme: &Theme) -> Vec<Line<'static>> {
    let deadline = request
        .submission_deadline
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    vec![
        Line::from(vec![
            Span::styled("Type: ", Style::default().fg(theme.dimmed)),
            Span::styled(
                request.request_type.to_string(),
                Style::default().fg(theme.foreground),
            ),
            Span::styled("   Status: ", Style::default().fg(theme.dimmed)),
            Span::styled(
                request.status.as_str().to_string(),
                Style::default().fg(theme.warning),
            ),
        ]),
        Line::from(vec![
            Span::styled("Deadline: ", Style::default().fg(theme.dimmed)),
            Span::styled(deadline, Style::default().fg(theme.foreground)),
        ]),
    ]
}

fn status_color(status: ResponseStatus, theme: &Theme) -> ratatui::style::Color {
    match status {
        ResponseStatus::Accepted => theme.success,
        ResponseStatus::Rejected => theme.error,
        ResponseStatus::Draft => theme.dimmed,
        ResponseStatus::Submitted | ResponseStatus::UnderReview => theme.warning,
    }
}

fn pretty_json(value: &Value) -> Vec<String> {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|_| "{}".to_string())
        .lines()
        .map(str::to_string)
        .collect()
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn centered_percent(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    centered_rect(
        area,
        (u32::from(area.width) * u32::from(percent_x) / 100) as u16,
        (u32::from(area.height) * u32::from(percent_y) / 100) as u16,
    )
}

fn inset(area: Rect, dx: u16, dy: u16) -> Rect {
    Rect {
        x: area.x + dx,
        y: area.y + dy,
        width: area.width.saturating_sub(dx * 2),
        height: area.height.saturating_sub(dy * 2),
    }
}
