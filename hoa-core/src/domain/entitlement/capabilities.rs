//! Capability model for paywall gating.
//!
//! This module is the single source of truth for what a caller may do.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::state::EntitlementState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Generate,
    ExportPdf,
    ExportDocx,
    ExportTxt,
    Email,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Generate => "canGenerate",
            Capability::ExportPdf => "canExportPdf",
            Capability::ExportDocx => "canExportDocx",
            Capability::ExportTxt => "canExportTxt",
            Capability::Email => "canEmail",
        }
    }

    /// Whether the capability sits behind the paywall
    pub fn is_paid(&self) -> bool {
        !matches!(self, Capability::Generate)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability set reported to the caller, merged with the raw state fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entitlements {
    pub is_subscriber: bool,
    pub expires_at: i64,
    pub remaining_one_time_credits: u32,
    pub can_generate: bool,
    pub can_export_pdf: bool,
    pub can_export_docx: bool,
    pub can_export_txt: bool,
    pub can_email: bool,
}

impl Entitlements {
    /// What a caller without a valid token gets: free preview generation only
    pub fn unpaid() -> Self {
        Self {
            is_subscriber: false,
            expires_at: 0,
            remaining_one_time_credits: 0,
            can_generate: true,
            can_export_pdf: false,
            can_export_docx: false,
            can_export_txt: false,
            can_email: false,
        }
    }

    /// Derive capabilities from a verified state.
    ///
    /// Referentially transparent: no clock, no I/O. An absent state never unlocks
    /// paid capabilities, even with the paywall switched off.
    pub fn evaluate(state: Option<&EntitlementState>, paywall_enforced: bool) -> Self {
        let Some(state) = state else {
            return Self::unpaid();
        };

        let can_use_paid = !paywall_enforced || state.grants_paid_access();

        Self {
            is_subscriber: state.is_subscriber,
            expires_at: state.expires_at,
            remaining_one_time_credits: state.remaining_one_time_credits,
            can_generate: true,
            can_export_pdf: can_use_paid,
            can_export_docx: can_use_paid,
            can_export_txt: can_use_paid,
            can_email: can_use_paid,
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Generate => self.can_generate,
            Capability::ExportPdf => self.can_export_pdf,
            Capability::ExportDocx => self.can_export_docx,
            Capability::ExportTxt => self.can_export_txt,
            Capability::Email => self.can_email,
        }
    }
}

impl Default for Entitlements {
    fn default() -> Self {
        Self::unpaid()
    }
}
