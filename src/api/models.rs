//! Wire types for the procurement backend.
//!
//! These mirror the REST payloads one-to-one. Fields the server may omit
//! carry `#[serde(default)]` so a sparse payload degrades to empty values
//! instead of a decode failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Account role; decides which dashboard a session lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Buyer,
    Supplier,
    Admin,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Buyer => "buyer",
            UserType::Supplier => "supplier",
            UserType::Admin => "admin",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub user_type: UserType,
    /// Supplier accounts belong to a company; buyers and admins do not.
    #[serde(default)]
    pub company: Option<Company>,
}

/// Body of a successful login. Only the access token is used.
#[derive(Debug, Deserialize)]
pub struct LoginTokens {
    pub access: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub user_type: UserType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub description: String,
    /// Id of the supplying company.
    #[serde(default)]
    pub supplier: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RfxType {
    #[serde(rename = "RFI")]
    Rfi,
    #[serde(rename = "RFQ")]
    Rfq,
    #[serde(rename = "RFP")]
    Rfp,
}

impl RfxType {
    pub const ALL: [RfxType; 3] = [RfxType::Rfi, RfxType::Rfq, RfxType::Rfp];

    pub fn as_str(self) -> &'static str {
        match self {
            RfxType::Rfi => "RFI",
            RfxType::Rfq => "RFQ",
            RfxType::Rfp => "RFP",
        }
    }
}

impl fmt::Display for RfxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Draft,
    Published,
    Closed,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Draft => "draft",
            RequestStatus::Published => "published",
            RequestStatus::Closed => "closed",
            RequestStatus::Cancelled => "cancelled",
        }
    }
}

/// An invitation row nested inside a request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(default)]
    pub supplier: Option<User>,
}

/// A buyer-issued RFI/RFQ/RFP solicitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfxRequest {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub request_type: RfxType,
    #[serde(default)]
    pub specifications: Value,
    pub status: RequestStatus,
    #[serde(default)]
    pub submission_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub buyer: Option<User>,
    #[serde(default)]
    pub invitations: Vec<Invitation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRequest {
    pub title: String,
    pub request_type: RfxType,
    pub description: String,
    pub specifications: Value,
    pub submission_deadline: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Draft,
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
}

impl ResponseStatus {
    /// Display label, e.g. `under_review` reads "Under Review".
    pub fn label(self) -> &'static str {
        match self {
            ResponseStatus::Draft => "Draft",
            ResponseStatus::Submitted => "Submitted",
            ResponseStatus::UnderReview => "Under Review",
            ResponseStatus::Accepted => "Accepted",
            ResponseStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardStatus {
    Pending,
    Awarded,
    Declined,
    Unknown,
}

// Tolerate award states this client does not know about.
impl<'de> Deserialize<'de> for AwardStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "pending" => AwardStatus::Pending,
            "awarded" => AwardStatus::Awarded,
            "declined" => AwardStatus::Declined,
            _ => AwardStatus::Unknown,
        })
    }
}

/// A response payload may carry its request as a bare id or embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestRef {
    Id(i64),
    Embedded(Box<RfxRequest>),
}

impl RequestRef {
    pub fn id(&self) -> i64 {
        match self {
            RequestRef::Id(id) => *id,
            RequestRef::Embedded(req) => req.id,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            RequestRef::Id(_) => None,
            RequestRef::Embedded(req) => Some(&req.title),
        }
    }
}

/// A supplier's answer to a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierResponse {
    pub id: i64,
    pub request: RequestRef,
    /// Id of the responding user.
    #[serde(default)]
    pub supplier: Option<i64>,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub quoted_price: Option<String>,
    #[serde(default)]
    pub delivery_timeline: String,
    pub status: ResponseStatus,
    #[serde(default)]
    pub award_status: Option<AwardStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewResponse {
    pub request: i64,
    pub content: Value,
    pub quoted_price: String,
    pub delivery_timeline: String,
    pub status: ResponseStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseUpdate {
    pub content: Value,
    pub quoted_price: String,
    pub delivery_timeline: String,
    pub status: ResponseStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiationMessage {
    pub id: i64,
    pub sender_username: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Message thread between a buyer and one supplier about one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiationThread {
    pub id: i64,
    pub request: i64,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub messages: Vec<NegotiationMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewThread {
    pub request: i64,
    pub supplier: i64,
    pub subject: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMessage {
    pub thread: i64,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRule {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub rule_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    Unknown,
}

impl<'de> Deserialize<'de> for TicketStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "open" => TicketStatus::Open,
            "in_progress" => TicketStatus::InProgress,
            "resolved" => TicketStatus::Resolved,
            "closed" => TicketStatus::Closed,
            _ => TicketStatus::Unknown,
        })
    }
}

impl TicketStatus {
    pub fn label(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
            TicketStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: i64,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    pub status: TicketStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Pull `total_requests` out of the analytics blob, tolerating any shape.
pub fn total_requests(analytics: &Value) -> u64 {
    analytics
        .get("total_requests")
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_decodes_without_company() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "username": "dana",
            "email": "dana@example.com",
            "user_type": "buyer"
        }))
        .unwrap();
        assert_eq!(user.user_type, UserType::Buyer);
        assert!(user.company.is_none());
    }

    #[test]
    fn request_decodes_sparse_payload() {
        let req: RfxRequest = serde_json::from_value(json!({
            "id": 3,
            "title": "RFQ for widgets",
            "request_type": "RFQ",
            "status": "published"
        }))
        .unwrap();
        assert_eq!(req.request_type, RfxType::Rfq);
        assert!(req.invitations.is_empty());
        assert!(req.submission_deadline.is_none());
    }

    #[test]
    fn response_request_ref_both_shapes() {
        let by_id: SupplierResponse = serde_json::from_value(json!({
            "id": 1,
            "request": 42,
            "status": "submitted"
        }))
        .unwrap();
        assert_eq!(by_id.request.id(), 42);
        assert!(by_id.request.title().is_none());

        let embedded: SupplierResponse = serde_json::from_value(json!({
            "id": 2,
            "request": {"id": 9, "title": "RFP for crates", "request_type": "RFP", "status": "closed"},
            "status": "under_review",
            "award_status": "awarded"
        }))
        .unwrap();
        assert_eq!(embedded.request.id(), 9);
        assert_eq!(embedded.request.title(), Some("RFP for crates"));
        assert_eq!(embedded.award_status, Some(AwardStatus::Awarded));
        assert_eq!(embedded.status.label(), "Under Review");
    }

    #[test]
    fn unknown_award_status_is_tolerated() {
        let resp: SupplierResponse = serde_json::from_value(json!({
            "id": 5,
            "request": 1,
            "status": "submitted",
            "award_status": "shortlisted"
        }))
        .unwrap();
        assert_eq!(resp.award_status, Some(AwardStatus::Unknown));
    }

    #[test]
    fn analytics_total_requests() {
        assert_eq!(total_requests(&json!({"total_requests": 12})), 12);
        assert_eq!(total_requests(&json!({})), 0);
        assert_eq!(total_requests(&json!("oops")), 0);
    }
}
