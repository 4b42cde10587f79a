//! Application state machine.
//!
//! All state lives here and is mutated only on the UI thread, in response to
//! key events and to completion events posted by spawned fetch tasks. Each
//! spawned task sends exactly one `AppEvent` over the channel; the main loop
//! drains the channel between repaints.

use std::collections::HashMap;
use std::time::Duration;

use chrono::DateTime;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::models::{
    AwardStatus, NegotiationThread, NewMessage, NewRequest, NewResponse, NewThread, Product,
    Registration, RequestStatus, ResponseStatus, ResponseUpdate, RfxRequest, RfxType,
    SupplierResponse, SupportTicket, TicketStatus, User, UserType, WorkflowRule,
};
use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::route::{route_for, Route};
use crate::session::{Session, SessionStore};
use crate::table::{Column, DataTable};
use crate::toast::Toasts;
use crate::ui::forms::{Checklist, Select, TextField};
use crate::ui::Theme;

/// Completion events posted by spawned API tasks.
pub enum AppEvent {
    LoggedIn(Result<Session, ApiError>),
    Registered(Result<(), ApiError>),
    BuyerData(Result<BuyerData, ApiError>),
    SupplierData(Result<SupplierData, ApiError>),
    AdminData(Box<AdminData>),
    /// Request created and suppliers invited; carries the refreshed listing.
    RequestSubmitted(Result<Vec<RfxRequest>, ApiError>),
    ThreadLoaded(Result<Option<NegotiationThread>, ApiError>),
    ThreadStarted(Result<NegotiationThread, ApiError>),
    /// Message posted; carries the refetched thread.
    MessageSent(Result<Option<NegotiationThread>, ApiError>),
    ResponseSaved(Result<SupplierResponse, ApiError>),
    ResponseActionDone {
        done: &'static str,
        failed: &'static str,
        result: Result<(), ApiError>,
    },
}

pub struct BuyerData {
    pub products: Vec<Product>,
    pub requests: Vec<RfxRequest>,
    pub suppliers: Vec<User>,
    pub analytics: Value,
}

pub struct SupplierData {
    pub products: Vec<Product>,
    pub responses: Vec<SupplierResponse>,
    pub requests: Vec<RfxRequest>,
}

pub struct AdminData {
    pub workflows: Vec<WorkflowRule>,
    pub users: Vec<User>,
    pub analytics: Value,
    pub tickets: Vec<SupportTicket>,
}

macro_rules! tabs {
    ($name:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn next(self) -> Self {
                let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
                Self::ALL[(i + 1) % Self::ALL.len()]
            }

            pub fn prev(self) -> Self {
                let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
                Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
            }
        }
    };
}

tabs!(BuyerTab {
    Products => "Products",
    Requests => "My Requests",
    Analytics => "Analytics",
});

tabs!(SupplierTab {
    Invitations => "Invited Requests",
    Products => "My Products",
    Responses => "My Responses",
});

tabs!(AdminTab {
    Overview => "Overview",
    Workflows => "Workflows",
    Users => "Users",
    Analytics => "Analytics",
    Tickets => "Support",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

pub struct LoginView {
    pub username: TextField,
    pub password: TextField,
    pub focus: LoginField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginView {
    fn new() -> Self {
        Self {
            username: TextField::new("Username"),
            password: TextField::masked("Password"),
            focus: LoginField::Username,
            error: None,
            submitting: false,
        }
    }

    fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterField {
    Username,
    Email,
    Password,
    UserType,
}

pub struct RegisterView {
    pub username: TextField,
    pub email: TextField,
    pub password: TextField,
    pub user_type: Select<UserType>,
    pub focus: RegisterField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl RegisterView {
    fn new() -> Self {
        Self {
            username: TextField::new("Username"),
            email: TextField::new("Email"),
            password: TextField::masked("Password"),
            // admins are provisioned server-side, not self-registered
            user_type: Select::new(vec![
                (UserType::Buyer, "Buyer"),
                (UserType::Supplier, "Supplier"),
            ]),
            focus: RegisterField::Username,
            error: None,
            submitting: false,
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        const ORDER: [RegisterField; 4] = [
            RegisterField::Username,
            RegisterField::Email,
            RegisterField::Password,
            RegisterField::UserType,
        ];
        let i = ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
        let n = ORDER.len();
        self.focus = if forward {
            ORDER[(i + 1) % n]
        } else {
            ORDER[(i + n - 1) % n]
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfxField {
    Type,
    Deadline,
    Specs,
    Suppliers,
}

/// RFx creation form, opened by selecting a product.
pub struct RfxForm {
    pub product: Product,
    pub rfx_type: Select<RfxType>,
    pub deadline: TextField,
    pub specs: TextField,
    pub suppliers: Checklist,
    pub focus: RfxField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl RfxForm {
    fn new(product: Product, candidates: Vec<(i64, String)>) -> Self {
        let mut suppliers = Checklist::default();
        suppliers.fill(candidates);
        Self {
            product,
            rfx_type: Select::new(
                RfxType::ALL.iter().map(|t| (*t, t.as_str())).collect(),
            ),
            deadline: TextField::new("Submission deadline"),
            specs: TextField::new("Specifications"),
            suppliers,
            focus: RfxField::Type,
            error: None,
            submitting: false,
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        const ORDER: [RfxField; 4] = [
            RfxField::Type,
            RfxField::Deadline,
            RfxField::Specs,
            RfxField::Suppliers,
        ];
        let i = ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
        let n = ORDER.len();
        self.focus = if forward {
            ORDER[(i + 1) % n]
        } else {
            ORDER[(i + n - 1) % n]
        };
    }
}

pub struct BuyerView {
    pub tab: BuyerTab,
    pub loading: bool,
    pub products: Vec<Product>,
    pub suppliers: Vec<User>,
    pub requests: Vec<RfxRequest>,
    pub analytics: Value,
    pub product_rows: Vec<Value>,
    pub request_rows: Vec<Value>,
    pub products_table: DataTable,
    pub requests_table: DataTable,
    pub form: Option<RfxForm>,
    /// Read-only detail of one of the buyer's own requests.
    pub detail: Option<RfxRequest>,
}

impl BuyerView {
    fn new() -> Self {
        Self {
            tab: BuyerTab::Products,
            loading: false,
            products: Vec::new(),
            suppliers: Vec::new(),
            requests: Vec::new(),
            analytics: Value::Null,
            product_rows: Vec::new(),
            request_rows: Vec::new(),
            products_table: DataTable::new(product_columns()).searchable(true),
            requests_table: DataTable::new(request_columns()).searchable(true),
            form: None,
            detail: None,
        }
    }

    fn set_data(&mut self, data: BuyerData) {
        self.product_rows = product_rows(&data.products, &data.suppliers);
        self.request_rows = to_rows(&data.requests);
        self.products = data.products;
        self.suppliers = data.suppliers;
        self.requests = data.requests;
        self.analytics = data.analytics;
        self.loading = false;
    }

    fn set_requests(&mut self, requests: Vec<RfxRequest>) {
        self.request_rows = to_rows(&requests);
        self.requests = requests;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    Reply { request_id: i64 },
    Edit { response_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseField {
    Content,
    Price,
    Timeline,
}

/// Reply/edit form for a supplier response.
pub struct ResponseModal {
    pub mode: ResponseMode,
    pub content: TextField,
    pub quoted_price: TextField,
    pub delivery_timeline: TextField,
    pub focus: ResponseField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl ResponseModal {
    fn reply(request_id: i64) -> Self {
        Self {
            mode: ResponseMode::Reply { request_id },
            content: TextField::new("Response content"),
            quoted_price: TextField::new("Quoted price"),
            delivery_timeline: TextField::new("Delivery timeline"),
            focus: ResponseField::Content,
            error: None,
            submitting: false,
        }
    }

    fn edit(response: &SupplierResponse) -> Self {
        let mut modal = Self::reply(response.request.id());
        modal.mode = ResponseMode::Edit {
            response_id: response.id,
        };
        modal.content.set_value(
            serde_json::to_string(&response.content).unwrap_or_default(),
        );
        modal
            .quoted_price
            .set_value(response.quoted_price.clone().unwrap_or_default());
        modal
            .delivery_timeline
            .set_value(response.delivery_timeline.clone());
        modal
    }

    fn cycle_focus(&mut self, forward: bool) {
        const ORDER: [ResponseField; 3] = [
            ResponseField::Content,
            ResponseField::Price,
            ResponseField::Timeline,
        ];
        let i = ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
        let n = ORDER.len();
        self.focus = if forward {
            ORDER[(i + 1) % n]
        } else {
            ORDER[(i + n - 1) % n]
        };
    }

    fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            ResponseField::Content => &mut self.content,
            ResponseField::Price => &mut self.quoted_price,
            ResponseField::Timeline => &mut self.delivery_timeline,
        }
    }
}

/// Detail view of a request the supplier was invited to.
pub struct RequestDetail {
    pub request: RfxRequest,
    pub thread: Option<NegotiationThread>,
    pub thread_loading: bool,
    pub message: TextField,
    pub composing: bool,
    pub response_modal: Option<ResponseModal>,
    pub notice: Option<String>,
}

impl RequestDetail {
    fn new(request: RfxRequest) -> Self {
        Self {
            request,
            thread: None,
            thread_loading: true,
            message: TextField::new("Message"),
            composing: false,
            response_modal: None,
            notice: None,
        }
    }
}

pub struct SupplierView {
    pub tab: SupplierTab,
    pub loading: bool,
    pub products: Vec<Product>,
    pub responses: Vec<SupplierResponse>,
    pub requests: Vec<RfxRequest>,
    pub invitations: Vec<RfxRequest>,
    pub invitation_rows: Vec<Value>,
    pub invitations_table: DataTable,
    pub detail: Option<RequestDetail>,
}

impl SupplierView {
    fn new() -> Self {
        Self {
            tab: SupplierTab::Invitations,
            loading: false,
            products: Vec::new(),
            responses: Vec::new(),
            requests: Vec::new(),
            invitations: Vec::new(),
            invitation_rows: Vec::new(),
            invitations_table: DataTable::new(invitation_columns()).searchable(true),
            detail: None,
        }
    }

    fn set_data(&mut self, data: SupplierData, user_id: i64) {
        self.invitations = invited_requests(&data.requests, user_id);
        self.invitation_rows = to_rows(&self.invitations);
        self.products = data.products;
        self.responses = data.responses;
        self.requests = data.requests;
        self.loading = false;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AdminStats {
    pub total_users: usize,
    pub total_workflows: usize,
    pub open_tickets: usize,
    pub total_requests: u64,
}

pub struct AdminView {
    pub tab: AdminTab,
    pub loading: bool,
    pub workflows: Vec<WorkflowRule>,
    pub users: Vec<User>,
    pub analytics: Value,
    pub tickets: Vec<SupportTicket>,
    pub user_rows: Vec<Value>,
    pub users_table: DataTable,
    pub stats: AdminStats,
}

impl AdminView {
    fn new() -> Self {
        Self {
            tab: AdminTab::Overview,
            loading: false,
            workflows: Vec::new(),
            users: Vec::new(),
            analytics: Value::Null,
            tickets: Vec::new(),
            user_rows: Vec::new(),
            users_table: DataTable::new(user_columns()).searchable(true),
            stats: AdminStats::default(),
        }
    }

    fn set_data(&mut self, data: AdminData) {
        self.stats = AdminStats {
            total_users: data.users.len(),
            total_workflows: data.workflows.len(),
            open_tickets: data
                .tickets
                .iter()
                .filter(|t| t.status == TicketStatus::Open)
                .count(),
            total_requests: crate::api::models::total_requests(&data.analytics),
        };
        self.user_rows = to_rows(&data.users);
        self.workflows = data.workflows;
        self.users = data.users;
        self.analytics = data.analytics;
        self.tickets = data.tickets;
        self.loading = false;
    }
}

pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub route: Route,
    pub session: Option<Session>,
    pub toasts: Toasts,
    pub login: LoginView,
    pub register: RegisterView,
    pub buyer: BuyerView,
    pub supplier: SupplierView,
    pub admin: AdminView,
    pub should_quit: bool,
    client: ApiClient,
    store: Box<dyn SessionStore>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(config: Config, mut client: ApiClient, store: Box<dyn SessionStore>) -> Self {
        let session = if config.behavior.remember_session {
            store.load().unwrap_or_else(|err| {
                tracing::warn!("Could not restore session: {err:#}");
                None
            })
        } else {
            None
        };

        let route = match &session {
            Some(session) => {
                client.set_token(Some(session.token.clone()));
                route_for(session.user.user_type)
            }
            None => Route::Login,
        };

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let theme = Theme::by_name(&config.appearance.theme);
        let toasts = Toasts::new(Duration::from_secs(config.behavior.toast_secs));

        let mut app = Self {
            config,
            theme,
            route,
            session,
            toasts,
            login: LoginView::new(),
            register: RegisterView::new(),
            buyer: BuyerView::new(),
            supplier: SupplierView::new(),
            admin: AdminView::new(),
            should_quit: false,
            client,
            store,
            events_tx,
            events_rx,
        };
        app.reload_dashboard();
        app
    }

    /// Drain completed fetch events and expire toasts. Called once per
    /// main-loop iteration, before drawing.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.on_event(event);
        }
        self.toasts.tick();
    }

    // ---- key handling ----

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.route {
            Route::Login => self.handle_login_key(key),
            Route::Register => self.handle_register_key(key),
            Route::Buyer => self.handle_buyer_key(key),
            Route::Supplier => self.handle_supplier_key(key),
            Route::Admin => self.handle_admin_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => self.login.cycle_focus(),
            KeyCode::BackTab | KeyCode::Up => self.login.cycle_focus(),
            KeyCode::Enter => self.submit_login(),
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.route = Route::Register;
            }
            KeyCode::Char(c) => self.login.focused_field().insert(c),
            KeyCode::Backspace => self.login.focused_field().backspace(),
            KeyCode::Left => self.login.focused_field().move_left(),
            KeyCode::Right => self.login.focused_field().move_right(),
            KeyCode::Home => self.login.focused_field().move_home(),
            KeyCode::End => self.login.focused_field().move_end(),
            _ => {}
        }
    }

    fn handle_register_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.route = Route::Login;
                return;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.register.cycle_focus(true);
                return;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.register.cycle_focus(false);
                return;
            }
            KeyCode::Enter => {
                self.submit_registration();
                return;
            }
            _ => {}
        }

        if self.register.focus == RegisterField::UserType {
            if matches!(key.code, KeyCode::Left) {
                self.register.user_type.prev();
            } else if matches!(key.code, KeyCode::Right | KeyCode::Char(' ')) {
                self.register.user_type.next();
            }
            return;
        }

        let field = match self.register.focus {
            RegisterField::Username => &mut self.register.username,
            RegisterField::Email => &mut self.register.email,
            RegisterField::Password => &mut self.register.password,
            RegisterField::UserType => return,
        };
        match key.code {
            KeyCode::Char(c) => field.insert(c),
            KeyCode::Backspace => field.backspace(),
            KeyCode::Left => field.move_left(),
            KeyCode::Right => field.move_right(),
            KeyCode::Home => field.move_home(),
            KeyCode::End => field.move_end(),
            _ => {}
        }
    }

    fn handle_buyer_key(&mut self, key: KeyEvent) {
        if self.buyer.form.is_some() {
            self.handle_rfx_form_key(key);
            return;
        }
        if self.buyer.detail.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.buyer.detail = None;
            }
            return;
        }

        let searching = match self.buyer.tab {
            BuyerTab::Products => self.buyer.products_table.is_searching(),
            BuyerTab::Requests => self.buyer.requests_table.is_searching(),
            BuyerTab::Analytics => false,
        };

        if !searching && self.handle_dashboard_key(key) {
            return;
        }

        match self.buyer.tab {
            BuyerTab::Products => {
                let clicked = handle_table_key(
                    &mut self.buyer.products_table,
                    &self.buyer.product_rows,
                    key,
                );
                if let Some(row) = clicked {
                    self.open_rfx_form(&row);
                }
            }
            BuyerTab::Requests => {
                let clicked = handle_table_key(
                    &mut self.buyer.requests_table,
                    &self.buyer.request_rows,
                    key,
                );
                if let Some(row) = clicked {
                    let id = row.get("id").and_then(Value::as_i64);
                    self.buyer.detail = self
                        .buyer
                        .requests
                        .iter()
                        .find(|r| Some(r.id) == id)
                        .cloned();
                }
            }
            BuyerTab::Analytics => {}
        }
    }

    fn handle_supplier_key(&mut self, key: KeyEvent) {
        if self.supplier.detail.is_some() {
            self.handle_supplier_detail_key(key);
            return;
        }

        let searching = self.supplier.tab == SupplierTab::Invitations
            && self.supplier.invitations_table.is_searching();
        if !searching && self.handle_dashboard_key(key) {
            return;
        }

        if self.supplier.tab == SupplierTab::Invitations {
            let clicked = handle_table_key(
                &mut self.supplier.invitations_table,
                &self.supplier.invitation_rows,
                key,
            );
            if let Some(row) = clicked {
                let id = row.get("id").and_then(Value::as_i64);
                if let Some(request) = self
                    .supplier
                    .invitations
                    .iter()
                    .find(|r| Some(r.id) == id)
                    .cloned()
                {
                    self.open_request_detail(request);
                }
            }
        }
    }

    fn handle_admin_key(&mut self, key: KeyEvent) {
        let searching =
            self.admin.tab == AdminTab::Users && self.admin.users_table.is_searching();
        if !searching && self.handle_dashboard_key(key) {
            return;
        }

        if self.admin.tab == AdminTab::Users {
            let clicked =
                handle_table_key(&mut self.admin.users_table, &self.admin.user_rows, key);
            if let Some(row) = clicked {
                let username = row
                    .get("username")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                self.toasts.info(format!("User {username} selected"));
            }
        }
    }

    /// Keys shared by every dashboard. Returns true when consumed.
    fn handle_dashboard_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                true
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.logout();
                true
            }
            KeyCode::Char('r') => {
                self.reload_dashboard();
                true
            }
            KeyCode::Tab => {
                self.cycle_tab(true);
                true
            }
            KeyCode::BackTab => {
                self.cycle_tab(false);
                true
            }
            _ => false,
        }
    }

    fn cycle_tab(&mut self, forward: bool) {
        match self.route {
            Route::Buyer => {
                self.buyer.tab = if forward {
                    self.buyer.tab.next()
                } else {
                    self.buyer.tab.prev()
                };
            }
            Route::Supplier => {
                self.supplier.tab = if forward {
                    self.supplier.tab.next()
                } else {
                    self.supplier.tab.prev()
                };
            }
            Route::Admin => {
                self.admin.tab = if forward {
                    self.admin.tab.next()
                } else {
                    self.admin.tab.prev()
                };
            }
            _ => {}
        }
    }

    // ---- RFx form ----

    fn open_rfx_form(&mut self, row: &Value) {
        let id = row.get("id").and_then(Value::as_i64);
        let Some(product) = self.buyer.products.iter().find(|p| Some(p.id) == id).cloned()
        else {
            return;
        };

        // suppliers belonging to the product's company, all preselected
        let candidates: Vec<(i64, String)> = self
            .buyer
            .suppliers
            .iter()
            .filter(|s| {
                s.company
                    .as_ref()
                    .is_some_and(|c| Some(c.id) == product.supplier)
            })
            .map(|s| {
                let company = s
                    .company
                    .as_ref()
                    .map(|c| c.name.as_str())
                    .unwrap_or("no company");
                (s.id, format!("{} ({company})", s.username))
            })
            .collect();

        self.buyer.form = Some(RfxForm::new(product, candidates));
    }

    fn handle_rfx_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.buyer.form = None;
                return;
            }
            KeyCode::Enter => {
                self.submit_rfx();
                return;
            }
            KeyCode::Tab => {
                if let Some(form) = self.buyer.form.as_mut() {
                    form.cycle_focus(true);
                }
                return;
            }
            KeyCode::BackTab => {
                if let Some(form) = self.buyer.form.as_mut() {
                    form.cycle_focus(false);
                }
                return;
            }
            _ => {}
        }

        let Some(form) = self.buyer.form.as_mut() else {
            return;
        };
        match form.focus {
            RfxField::Type => match key.code {
                KeyCode::Left | KeyCode::Up => form.rfx_type.prev(),
                KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => form.rfx_type.next(),
                _ => {}
            },
            RfxField::Suppliers => match key.code {
                KeyCode::Up => form.suppliers.prev(),
                KeyCode::Down => form.suppliers.next(),
                KeyCode::Char(' ') => form.suppliers.toggle(),
                _ => {}
            },
            RfxField::Deadline | RfxField::Specs => {
                let field = if form.focus == RfxField::Deadline {
                    &mut form.deadline
                } else {
                    &mut form.specs
                };
                match key.code {
                    KeyCode::Char(c) => field.insert(c),
                    KeyCode::Backspace => field.backspace(),
                    KeyCode::Left => field.move_left(),
                    KeyCode::Right => field.move_right(),
                    KeyCode::Home => field.move_home(),
                    KeyCode::End => field.move_end(),
                    _ => {}
                }
            }
        }
    }

    fn submit_rfx(&mut self) {
        let Some(form) = self.buyer.form.as_mut() else {
            return;
        };
        if form.submitting {
            return;
        }

        let specs = form.specs.value().trim().to_string();
        let deadline = form.deadline.value().trim().to_string();
        let supplier_ids = form.suppliers.checked_ids();
        if specs.is_empty() || deadline.is_empty() || supplier_ids.is_empty() {
            form.error =
                Some("Please fill all fields and select at least one supplier.".to_string());
            return;
        }

        // free-form specs become {"text": ...} when they are not JSON
        let specifications = serde_json::from_str::<Value>(&specs)
            .unwrap_or_else(|_| json!({ "text": specs }));
        let rfx_type = form.rfx_type.selected();
        let request = NewRequest {
            title: format!("{} for {}", rfx_type, form.product.name),
            request_type: rfx_type,
            description: specs,
            specifications,
            submission_deadline: deadline,
        };

        form.submitting = true;
        form.error = None;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = async {
                let created = client.create_request(&request).await?;
                client.invite_suppliers(created.id, &supplier_ids).await?;
                client.requests().await
            }
            .await;
            let _ = tx.send(AppEvent::RequestSubmitted(result));
        });
    }

    // ---- supplier detail ----

    fn open_request_detail(&mut self, request: RfxRequest) {
        let request_id = request.id;
        self.supplier.detail = Some(RequestDetail::new(request));

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client
                .negotiation_threads(request_id)
                .await
                .map(|threads| threads.into_iter().next());
            let _ = tx.send(AppEvent::ThreadLoaded(result));
        });
    }

    /// The session user's existing response to the open request, if any.
    pub fn current_response(&self) -> Option<&SupplierResponse> {
        let detail = self.supplier.detail.as_ref()?;
        let user_id = self.session.as_ref()?.user.id;
        self.supplier
            .responses
            .iter()
            .find(|r| r.request.id() == detail.request.id && r.supplier == Some(user_id))
    }

    fn handle_supplier_detail_key(&mut self, key: KeyEvent) {
        let has_modal = self
            .supplier
            .detail
            .as_ref()
            .is_some_and(|d| d.response_modal.is_some());
        if has_modal {
            self.handle_response_modal_key(key);
            return;
        }

        let composing = self
            .supplier
            .detail
            .as_ref()
            .is_some_and(|d| d.composing);
        if composing {
            match key.code {
                KeyCode::Enter => self.send_message(),
                KeyCode::Esc => {
                    if let Some(detail) = self.supplier.detail.as_mut() {
                        detail.composing = false;
                    }
                }
                _ => {
                    if let Some(detail) = self.supplier.detail.as_mut() {
                        match key.code {
                            KeyCode::Char(c) => detail.message.insert(c),
                            KeyCode::Backspace => detail.message.backspace(),
                            KeyCode::Left => detail.message.move_left(),
                            KeyCode::Right => detail.message.move_right(),
                            _ => {}
                        }
                    }
                }
            }
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.supplier.detail = None,
            KeyCode::Char('m') => {
                if let Some(detail) = self.supplier.detail.as_mut() {
                    if detail.thread.is_some() {
                        detail.composing = true;
                    }
                }
            }
            KeyCode::Char('n') => self.start_negotiation(),
            KeyCode::Char('r') => {
                if self.current_response().is_none() {
                    if let Some(detail) = self.supplier.detail.as_mut() {
                        let request_id = detail.request.id;
                        detail.response_modal = Some(ResponseModal::reply(request_id));
                    }
                }
            }
            KeyCode::Char('e') => {
                if let Some(modal) = self.current_response().map(ResponseModal::edit) {
                    if let Some(detail) = self.supplier.detail.as_mut() {
                        detail.response_modal = Some(modal);
                    }
                }
            }
            KeyCode::Char('a') => self.award_action(key.code),
            KeyCode::Char('d') => self.award_action(key.code),
            KeyCode::Char('x') => self.award_action(key.code),
            _ => {}
        }
    }

    fn award_action(&mut self, code: KeyCode) {
        let Some(response) = self.current_response() else {
            return;
        };
        let awarded = response.award_status == Some(AwardStatus::Awarded);
        let closable = matches!(
            response.status,
            ResponseStatus::Submitted | ResponseStatus::UnderReview
        );
        let response_id = response.id;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        match code {
            KeyCode::Char('a') if awarded => {
                tokio::spawn(async move {
                    let result = client.accept_award(response_id).await;
                    let _ = tx.send(AppEvent::ResponseActionDone {
                        done: "Award accepted!",
                        failed: "Failed to accept award.",
                        result,
                    });
                });
            }
            KeyCode::Char('d') if awarded => {
                tokio::spawn(async move {
                    let result = client.decline_award(response_id).await;
                    let _ = tx.send(AppEvent::ResponseActionDone {
                        done: "Award declined.",
                        failed: "Failed to decline award.",
                        result,
                    });
                });
            }
            KeyCode::Char('x') if closable => {
                tokio::spawn(async move {
                    let result = client.close_response(response_id).await;
                    let _ = tx.send(AppEvent::ResponseActionDone {
                        done: "Response closed.",
                        failed: "Failed to close response.",
                        result,
                    });
                });
            }
            _ => {}
        }
    }

    fn start_negotiation(&mut self) {
        let Some(user_id) = self.session.as_ref().map(|s| s.user.id) else {
            return;
        };
        let Some(detail) = self.supplier.detail.as_mut() else {
            return;
        };
        if detail.thread.is_some() || detail.thread_loading {
            return;
        }

        let thread = NewThread {
            request: detail.request.id,
            supplier: user_id,
            subject: format!("Negotiation for {}", detail.request.title),
        };
        detail.thread_loading = true;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.start_negotiation(&thread).await;
            let _ = tx.send(AppEvent::ThreadStarted(result));
        });
    }

    fn send_message(&mut self) {
        let Some(detail) = self.supplier.detail.as_mut() else {
            return;
        };
        let Some(thread_id) = detail.thread.as_ref().map(|t| t.id) else {
            return;
        };
        let content = detail.message.value().trim().to_string();
        if content.is_empty() {
            return;
        }
        let request_id = detail.request.id;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = async {
                client
                    .send_message(&NewMessage {
                        thread: thread_id,
                        content,
                    })
                    .await?;
                // refetch so the new message shows with server-side fields
                client
                    .negotiation_threads(request_id)
                    .await
                    .map(|threads| threads.into_iter().next())
            }
            .await;
            let _ = tx.send(AppEvent::MessageSent(result));
        });
    }

    fn handle_response_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if let Some(detail) = self.supplier.detail.as_mut() {
                    detail.response_modal = None;
                }
                return;
            }
            KeyCode::Enter => {
                self.submit_response_form();
                return;
            }
            _ => {}
        }

        let Some(modal) = self
            .supplier
            .detail
            .as_mut()
            .and_then(|d| d.response_modal.as_mut())
        else {
            return;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => modal.cycle_focus(true),
            KeyCode::BackTab | KeyCode::Up => modal.cycle_focus(false),
            KeyCode::Char(c) => modal.focused_field().insert(c),
            KeyCode::Backspace => modal.focused_field().backspace(),
            KeyCode::Left => modal.focused_field().move_left(),
            KeyCode::Right => modal.focused_field().move_right(),
            KeyCode::Home => modal.focused_field().move_home(),
            KeyCode::End => modal.focused_field().move_end(),
            _ => {}
        }
    }

    fn submit_response_form(&mut self) {
        let Some(modal) = self
            .supplier
            .detail
            .as_mut()
            .and_then(|d| d.response_modal.as_mut())
        else {
            return;
        };
        if modal.submitting {
            return;
        }

        let content_text = modal.content.value().trim().to_string();
        let quoted_price = modal.quoted_price.value().trim().to_string();
        let delivery_timeline = modal.delivery_timeline.value().trim().to_string();
        if content_text.is_empty() || quoted_price.is_empty() || delivery_timeline.is_empty() {
            modal.error = Some("All fields are required.".to_string());
            return;
        }

        let content = serde_json::from_str::<Value>(&content_text)
            .unwrap_or_else(|_| json!({ "text": content_text }));
        let mode = modal.mode;
        modal.submitting = true;
        modal.error = None;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = match mode {
                ResponseMode::Reply { request_id } => {
                    client
                        .submit_response(&NewResponse {
                            request: request_id,
                            content,
                            quoted_price,
                            delivery_timeline,
                            status: ResponseStatus::Submitted,
                        })
                        .await
                }
                ResponseMode::Edit { response_id } => {
                    client
                        .update_response(
                            response_id,
                            &ResponseUpdate {
                                content,
                                quoted_price,
                                delivery_timeline,
                                status: ResponseStatus::Submitted,
                            },
                        )
                        .await
                }
            };
            let _ = tx.send(AppEvent::ResponseSaved(result));
        });
    }

    // ---- auth ----

    fn submit_login(&mut self) {
        if self.login.submitting {
            return;
        }
        let username = self.login.username.value().trim().to_string();
        let password = self.login.password.value().to_string();
        if username.is_empty() || password.is_empty() {
            self.login.error = Some("Username and password are required.".to_string());
            return;
        }
        self.login.submitting = true;
        self.login.error = None;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client
                .authenticate(&username, &password)
                .await
                .map(|(user, token)| Session { user, token });
            let _ = tx.send(AppEvent::LoggedIn(result));
        });
    }

    fn submit_registration(&mut self) {
        if self.register.submitting {
            return;
        }
        let form = Registration {
            username: self.register.username.value().trim().to_string(),
            email: self.register.email.value().trim().to_string(),
            password: self.register.password.value().to_string(),
            user_type: self.register.user_type.selected(),
        };
        if form.username.is_empty() || form.email.is_empty() || form.password.is_empty() {
            self.register.error = Some("All fields are required.".to_string());
            return;
        }
        self.register.submitting = true;
        self.register.error = None;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.register(&form).await;
            let _ = tx.send(AppEvent::Registered(result));
        });
    }

    fn logout(&mut self) {
        if let Err(err) = self.store.clear() {
            tracing::warn!("Could not clear stored session: {err:#}");
        }
        self.session = None;
        self.client.set_token(None);
        self.route = Route::Login;
        self.login = LoginView::new();
        self.supplier.detail = None;
        self.buyer.form = None;
        self.buyer.detail = None;
        self.toasts.info("Signed out");
    }

    // ---- data loading ----

    pub fn reload_dashboard(&mut self) {
        match self.route {
            Route::Buyer => self.load_buyer(),
            Route::Supplier => self.load_supplier(),
            Route::Admin => self.load_admin(),
            Route::Login | Route::Register => {}
        }
    }

    fn load_buyer(&mut self) {
        self.buyer.loading = true;
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = fetch_buyer(client).await;
            let _ = tx.send(AppEvent::BuyerData(result));
        });
    }

    fn load_supplier(&mut self) {
        self.supplier.loading = true;
        let company = self
            .session
            .as_ref()
            .and_then(|s| s.user.company.as_ref().map(|c| c.id));
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = fetch_supplier(client, company).await;
            let _ = tx.send(AppEvent::SupplierData(result));
        });
    }

    fn load_admin(&mut self) {
        self.admin.loading = true;
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let data = fetch_admin(client).await;
            let _ = tx.send(AppEvent::AdminData(Box::new(data)));
        });
    }

    // ---- event handling ----

    fn on_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LoggedIn(result) => {
                self.login.submitting = false;
                match result {
                    Ok(session) => {
                        self.client.set_token(Some(session.token.clone()));
                        if self.config.behavior.remember_session {
                            if let Err(err) = self.store.save(&session) {
                                tracing::warn!("Could not persist session: {err:#}");
                            }
                        }
                        self.toasts
                            .success(format!("Welcome back, {}", session.user.username));
                        self.route = route_for(session.user.user_type);
                        self.session = Some(session);
                        self.login = LoginView::new();
                        self.reload_dashboard();
                    }
                    Err(err) => {
                        tracing::debug!("login failed: {err}");
                        self.login.error = Some("Invalid credentials".to_string());
                    }
                }
            }
            AppEvent::Registered(result) => {
                self.register.submitting = false;
                match result {
                    Ok(()) => {
                        self.toasts.success("Account created, please sign in");
                        self.register = RegisterView::new();
                        self.route = Route::Login;
                    }
                    Err(err) => {
                        tracing::debug!("registration failed: {err}");
                        self.register.error = Some("Registration failed".to_string());
                    }
                }
            }
            AppEvent::BuyerData(result) => match result {
                Ok(data) => self.buyer.set_data(data),
                Err(err) => {
                    self.buyer.loading = false;
                    self.toasts.error(format!("Could not load dashboard: {}", err.brief()));
                }
            },
            AppEvent::SupplierData(result) => match result {
                Ok(data) => {
                    let user_id = self.session.as_ref().map(|s| s.user.id).unwrap_or(0);
                    self.supplier.set_data(data, user_id);
                }
                Err(err) => {
                    self.supplier.loading = false;
                    self.toasts.error(format!("Could not load dashboard: {}", err.brief()));
                }
            },
            AppEvent::AdminData(data) => self.admin.set_data(*data),
            AppEvent::RequestSubmitted(result) => match result {
                Ok(requests) => {
                    self.buyer.form = None;
                    self.buyer.set_requests(requests);
                    self.toasts.success("Request submitted and suppliers invited!");
                }
                Err(err) => {
                    if let Some(form) = self.buyer.form.as_mut() {
                        form.submitting = false;
                        form.error = Some(err.brief());
                    }
                    self.toasts.error("Failed to submit request or invite suppliers.");
                }
            },
            AppEvent::ThreadLoaded(result) => {
                if let Some(detail) = self.supplier.detail.as_mut() {
                    detail.thread_loading = false;
                    match result {
                        Ok(thread) => detail.thread = thread,
                        Err(err) => {
                            tracing::debug!("thread fetch failed: {err}");
                            detail.thread = None;
                        }
                    }
                }
            }
            AppEvent::ThreadStarted(result) => {
                if let Some(detail) = self.supplier.detail.as_mut() {
                    detail.thread_loading = false;
                    match result {
                        Ok(thread) => detail.thread = Some(thread),
                        Err(err) => {
                            tracing::debug!("start negotiation failed: {err}");
                            detail.notice = Some("Failed to start negotiation.".to_string());
                        }
                    }
                }
            }
            AppEvent::MessageSent(result) => {
                if let Some(detail) = self.supplier.detail.as_mut() {
                    match result {
                        Ok(thread) => {
                            detail.thread = thread;
                            detail.message.clear();
                        }
                        Err(err) => {
                            tracing::debug!("send message failed: {err}");
                            detail.notice = Some("Failed to send message.".to_string());
                        }
                    }
                }
            }
            AppEvent::ResponseSaved(result) => match result {
                Ok(_) => {
                    if let Some(detail) = self.supplier.detail.as_mut() {
                        detail.response_modal = None;
                        detail.notice = Some("Response submitted!".to_string());
                    }
                    self.toasts.success("Response submitted!");
                    self.load_supplier();
                }
                Err(err) => {
                    if let Some(modal) = self
                        .supplier
                        .detail
                        .as_mut()
                        .and_then(|d| d.response_modal.as_mut())
                    {
                        modal.submitting = false;
                        modal.error = Some("Failed to submit response.".to_string());
                    }
                    tracing::debug!("response submit failed: {err}");
                }
            },
            AppEvent::ResponseActionDone {
                done,
                failed,
                result,
            } => match result {
                Ok(()) => {
                    if let Some(detail) = self.supplier.detail.as_mut() {
                        detail.notice = Some(done.to_string());
                    }
                    self.toasts.success(done);
                    self.load_supplier();
                }
                Err(err) => {
                    if let Some(detail) = self.supplier.detail.as_mut() {
                        detail.notice = Some(failed.to_string());
                    }
                    tracing::debug!("response action failed: {err}");
                }
            },
        }
    }
}

// ---- free helpers ----

/// Key handling shared by every data table. Returns the clicked row when
/// Enter lands on one.
fn handle_table_key(table: &mut DataTable, rows: &[Value], key: KeyEvent) -> Option<Value> {
    if table.is_searching() {
        match key.code {
            KeyCode::Esc => table.clear_search(),
            KeyCode::Enter => table.stop_search(),
            KeyCode::Char(c) => table.push_search_char(c),
            KeyCode::Backspace => table.pop_search_char(),
            _ => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Char('/') => table.start_search(),
        KeyCode::Esc => table.clear_search(),
        KeyCode::Up | KeyCode::Char('k') => table.select_prev(rows),
        KeyCode::Down | KeyCode::Char('j') => table.select_next(rows),
        KeyCode::Left | KeyCode::Char('h') => table.prev_page(rows),
        KeyCode::Right | KeyCode::Char('l') => table.next_page(rows),
        KeyCode::Char(c @ '1'..='9') => {
            table.toggle_sort(c as usize - '1' as usize);
        }
        KeyCode::Enter => return table.selected_row(rows).cloned(),
        _ => {}
    }
    None
}

/// Requests where this user appears in the invitation list. Matching is by
/// invited user id, not by supplier company; draft requests stay hidden.
pub fn invited_requests(requests: &[RfxRequest], user_id: i64) -> Vec<RfxRequest> {
    requests
        .iter()
        .filter(|r| {
            r.status != RequestStatus::Draft
                && r.invitations
                    .iter()
                    .any(|inv| inv.supplier.as_ref().is_some_and(|s| s.id == user_id))
        })
        .cloned()
        .collect()
}

fn to_rows<T: Serialize>(items: &[T]) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect()
}

/// Product rows carry the supplying company's name so the table can render
/// and search it like any other field.
fn product_rows(products: &[Product], suppliers: &[User]) -> Vec<Value> {
    let companies: HashMap<i64, &str> = suppliers
        .iter()
        .filter_map(|s| s.company.as_ref().map(|c| (c.id, c.name.as_str())))
        .collect();

    products
        .iter()
        .filter_map(|product| {
            let mut row = serde_json::to_value(product).ok()?;
            let name = product
                .supplier
                .and_then(|id| companies.get(&id).copied())
                .unwrap_or("N/A");
            row["supplier_name"] = Value::String(name.to_string());
            Some(row)
        })
        .collect()
}

fn product_columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name"),
        Column::new("sku", "SKU"),
        Column::new("supplier_name", "Supplier"),
        Column::with_cell("actions", "Actions", |_| "Select".to_string()),
    ]
}

fn request_columns() -> Vec<Column> {
    vec![
        Column::new("title", "Title"),
        Column::new("description", "Description"),
        Column::with_cell("status", "Status", |row| title_case(row, "status")),
        Column::with_cell("created_at", "Created", |row| date_cell(row, "created_at")),
        Column::with_cell("actions", "Actions", |_| "View".to_string()),
    ]
}

fn invitation_columns() -> Vec<Column> {
    vec![
        Column::new("title", "Request Title"),
        Column::with_cell("buyer", "Buyer", |row| {
            row.get("buyer")
                .and_then(|b| b.get("username"))
                .and_then(Value::as_str)
                .unwrap_or("-")
                .to_string()
        }),
        Column::with_cell("status", "Status", |row| title_case(row, "status")),
        Column::with_cell("actions", "Actions", |_| "View".to_string()),
    ]
}

fn user_columns() -> Vec<Column> {
    vec![
        Column::new("username", "User"),
        Column::new("email", "Email"),
        Column::with_cell("user_type", "Type", |row| title_case(row, "user_type")),
        Column::with_cell("status", "Status", |_| "Active".to_string()),
        Column::with_cell("actions", "Actions", |_| "Edit".to_string()),
    ]
}

/// "under_review" reads "Under review".
fn title_case(row: &Value, key: &str) -> String {
    let raw = row.get(key).and_then(Value::as_str).unwrap_or("");
    let spaced = raw.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn date_cell(row: &Value, key: &str) -> String {
    let raw = row.get(key).and_then(Value::as_str).unwrap_or("");
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

async fn fetch_buyer(client: ApiClient) -> Result<BuyerData, ApiError> {
    let (products, requests, suppliers, analytics) = tokio::try_join!(
        client.products(),
        client.requests(),
        client.suppliers(),
        client.analytics(),
    )?;
    Ok(BuyerData {
        products,
        requests,
        suppliers,
        analytics,
    })
}

async fn fetch_supplier(
    client: ApiClient,
    company: Option<i64>,
) -> Result<SupplierData, ApiError> {
    let products = async {
        match company {
            Some(id) => client.company_products(id).await,
            None => client.products().await,
        }
    };
    let (products, responses, requests) =
        tokio::try_join!(products, client.responses(), client.requests())?;
    Ok(SupplierData {
        products,
        responses,
        requests,
    })
}

/// Admin endpoints degrade independently: a failing endpoint shows up as an
/// empty section, not a failed dashboard.
async fn fetch_admin(client: ApiClient) -> AdminData {
    let (workflows, users, analytics, tickets) = tokio::join!(
        client.workflow_rules(),
        client.users(),
        client.analytics(),
        client.support_tickets(),
    );
    AdminData {
        workflows: workflows.unwrap_or_else(|err| {
            tracing::warn!("workflow rules unavailable: {err}");
            Vec::new()
        }),
        users: users.unwrap_or_else(|err| {
            tracing::warn!("user listing unavailable: {err}");
            Vec::new()
        }),
        analytics: analytics.unwrap_or_else(|err| {
            tracing::warn!("analytics unavailable: {err}");
            json!({})
        }),
        tickets: tickets.unwrap_or_else(|err| {
            tracing::warn!("support tickets unavailable: {err}");
            Vec::new()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{Company, Invitation};
    use crate::session::MemoryStore;

    fn test_app() -> App {
        let client = ApiClient::new("http://localhost:8000", Duration::from_secs(1)).unwrap();
        App::new(Config::default(), client, Box::new(MemoryStore::default()))
    }

    fn user(id: i64, user_type: UserType) -> User {
        User {
            id,
            username: format!("user-{id}"),
            email: String::new(),
            user_type,
            company: None,
        }
    }

    fn request(id: i64, status: RequestStatus, invited: &[i64]) -> RfxRequest {
        RfxRequest {
            id,
            title: format!("request-{id}"),
            description: String::new(),
            request_type: RfxType::Rfi,
            specifications: Value::Null,
            status,
            submission_deadline: None,
            created_at: None,
            buyer: None,
            invitations: invited
                .iter()
                .map(|&uid| Invitation {
                    supplier: Some(user(uid, UserType::Supplier)),
                })
                .collect(),
        }
    }

    #[test]
    fn invitation_filter_matches_user_id_and_skips_drafts() {
        let requests = vec![
            request(1, RequestStatus::Published, &[7, 8]),
            request(2, RequestStatus::Draft, &[7]),
            request(3, RequestStatus::Published, &[8]),
            request(4, RequestStatus::Closed, &[7]),
        ];
        let invited = invited_requests(&requests, 7);
        let ids: Vec<i64> = invited.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn tabs_cycle_and_wrap() {
        assert_eq!(BuyerTab::Products.next(), BuyerTab::Requests);
        assert_eq!(BuyerTab::Analytics.next(), BuyerTab::Products);
        assert_eq!(BuyerTab::Products.prev(), BuyerTab::Analytics);
        assert_eq!(AdminTab::Tickets.next(), AdminTab::Overview);
    }

    #[test]
    fn title_case_formats_statuses() {
        let row = json!({"status": "under_review"});
        assert_eq!(title_case(&row, "status"), "Under review");
        assert_eq!(title_case(&json!({}), "status"), "");
    }

    #[test]
    fn product_rows_carry_company_names() {
        let suppliers = vec![User {
            id: 1,
            username: "sales".into(),
            email: String::new(),
            user_type: UserType::Supplier,
            company: Some(Company {
                id: 77,
                name: "Acme".into(),
            }),
        }];
        let products = vec![
            Product {
                id: 1,
                name: "Widget".into(),
                sku: "W-1".into(),
                description: String::new(),
                supplier: Some(77),
            },
            Product {
                id: 2,
                name: "Orphan".into(),
                sku: "O-1".into(),
                description: String::new(),
                supplier: None,
            },
        ];
        let rows = product_rows(&products, &suppliers);
        assert_eq!(rows[0]["supplier_name"], "Acme");
        assert_eq!(rows[1]["supplier_name"], "N/A");
    }

    #[tokio::test]
    async fn successful_login_routes_by_user_type() {
        let mut app = test_app();
        assert_eq!(app.route, Route::Login);

        app.on_event(AppEvent::LoggedIn(Ok(Session {
            user: user(5, UserType::Supplier),
            token: "t".into(),
        })));
        assert_eq!(app.route, Route::Supplier);
        assert!(app.session.is_some());
        assert!(!app.toasts.is_empty());
    }

    #[tokio::test]
    async fn failed_login_sets_error_and_stays() {
        let mut app = test_app();
        app.on_event(AppEvent::LoggedIn(Err(ApiError::Unauthorized)));
        assert_eq!(app.route, Route::Login);
        assert_eq!(app.login.error.as_deref(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn registration_returns_to_login() {
        let mut app = test_app();
        app.route = Route::Register;
        app.on_event(AppEvent::Registered(Ok(())));
        assert_eq!(app.route, Route::Login);
    }

    #[tokio::test]
    async fn logout_clears_session_and_routes_to_login() {
        let mut app = test_app();
        app.on_event(AppEvent::LoggedIn(Ok(Session {
            user: user(9, UserType::Buyer),
            token: "t".into(),
        })));
        assert_eq!(app.route, Route::Buyer);

        app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert_eq!(app.route, Route::Login);
        assert!(app.session.is_none());
    }

    #[tokio::test]
    async fn table_row_click_opens_buyer_request_detail() {
        let mut app = test_app();
        app.on_event(AppEvent::LoggedIn(Ok(Session {
            user: user(9, UserType::Buyer),
            token: "t".into(),
        })));
        app.buyer.tab = BuyerTab::Requests;
        app.buyer
            .set_requests(vec![request(11, RequestStatus::Published, &[])]);

        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.buyer.detail.as_ref().map(|r| r.id), Some(11));
    }

    #[tokio::test]
    async fn supplier_data_populates_invitations() {
        let mut app = test_app();
        app.on_event(AppEvent::LoggedIn(Ok(Session {
            user: user(7, UserType::Supplier),
            token: "t".into(),
        })));
        app.on_event(AppEvent::SupplierData(Ok(SupplierData {
            products: Vec::new(),
            responses: Vec::new(),
            requests: vec![
                request(1, RequestStatus::Published, &[7]),
                request(2, RequestStatus::Published, &[8]),
            ],
        })));
        assert_eq!(app.supplier.invitations.len(), 1);
        assert_eq!(app.supplier.invitation_rows.len(), 1);
        assert!(!app.supplier.loading);
    }
}
