//! Vendor onboarding
//!
//! A draft registration filled in field by field, validated into a
//! `VendorRegistration` and posted to the vendor directory.

use crate::backend::{ApiError, HttpBackend, Vendor, VendorRegistration};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Vendor categories accepted by the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorType {
    Driver,
    Restaurant,
    ArtworkCraftwork,
}

impl VendorType {
    pub const ALL: [VendorType; 3] = [
        VendorType::Driver,
        VendorType::Restaurant,
        VendorType::ArtworkCraftwork,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VendorType::Driver => "Driver",
            VendorType::Restaurant => "Restaurant",
            VendorType::ArtworkCraftwork => "Artwork/Craftwork",
        }
    }
}

impl fmt::Display for VendorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorType {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DraftError::UnknownVendorType(wanted.to_string()))
    }
}

/// Required registration fields, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    VendorType,
    BusinessName,
    ContactName,
    MobileNumber,
    City,
    Summary,
}

impl DraftField {
    pub const REQUIRED: [DraftField; 6] = [
        DraftField::VendorType,
        DraftField::BusinessName,
        DraftField::ContactName,
        DraftField::MobileNumber,
        DraftField::City,
        DraftField::Summary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::VendorType => "Vendor type",
            DraftField::BusinessName => "Business name",
            DraftField::ContactName => "Contact name",
            DraftField::MobileNumber => "Mobile number",
            DraftField::City => "City",
            DraftField::Summary => "Summary",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Draft validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("{0} is required")]
    Missing(DraftField),
    #[error("Unknown vendor type {0:?} (expected Driver, Restaurant or Artwork/Craftwork)")]
    UnknownVendorType(String),
}

/// Registration form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorDraft {
    pub vendor_type: Option<VendorType>,
    pub business_name: String,
    pub contact_name: String,
    pub mobile_number: String,
    pub city: String,
    pub summary: String,
    pub portfolio_url: String,
    /// Comma-separated
    pub languages: String,
}

impl VendorDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a required field; the vendor type is parsed
    ///
    /// Blank values are refused and leave the field unchanged.
    pub fn set(&mut self, field: DraftField, value: &str) -> Result<(), DraftError> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(DraftError::Missing(field));
        }
        match field {
            DraftField::VendorType => self.vendor_type = Some(value.parse()?),
            DraftField::BusinessName => self.business_name = value,
            DraftField::ContactName => self.contact_name = value,
            DraftField::MobileNumber => self.mobile_number = value,
            DraftField::City => self.city = value,
            DraftField::Summary => self.summary = value,
        }
        Ok(())
    }

    /// Check every required field and build the request body
    pub fn validate(&self) -> Result<VendorRegistration, DraftError> {
        let vendor_type = self
            .vendor_type
            .ok_or(DraftError::Missing(DraftField::VendorType))?;
        let required = |field: DraftField, value: &str| {
            let value = value.trim();
            if value.is_empty() {
                Err(DraftError::Missing(field))
            } else {
                Ok(value.to_string())
            }
        };

        let portfolio_url = self.portfolio_url.trim();
        Ok(VendorRegistration {
            vendor_type: vendor_type.as_str().to_string(),
            business_name: required(DraftField::BusinessName, &self.business_name)?,
            contact_name: required(DraftField::ContactName, &self.contact_name)?,
            mobile_number: required(DraftField::MobileNumber, &self.mobile_number)?,
            city: required(DraftField::City, &self.city)?,
            summary: required(DraftField::Summary, &self.summary)?,
            portfolio_url: (!portfolio_url.is_empty()).then(|| portfolio_url.to_string()),
            languages: self
                .languages
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    /// Clear every field
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Destination for validated registrations
#[async_trait]
pub trait VendorRegistrar: Send + Sync {
    async fn register(&self, registration: &VendorRegistration) -> Result<Vendor, ApiError>;
}

#[async_trait]
impl VendorRegistrar for HttpBackend {
    async fn register(&self, registration: &VendorRegistration) -> Result<Vendor, ApiError> {
        self.register_vendor(registration).await
    }
}

/// Validate and post a draft, returning the line to show the user
///
/// The draft is cleared only after the directory accepts it.
pub async fn submit<R: VendorRegistrar + ?Sized>(registrar: &R, draft: &mut VendorDraft) -> String {
    let registration = match draft.validate() {
        Ok(registration) => registration,
        Err(e) => return format!("Error adding vendor: {e}"),
    };

    match registrar.register(&registration).await {
        Ok(vendor) => {
            tracing::info!(
                business_name = %vendor.business_name,
                id = ?vendor.id,
                "Vendor registered"
            );
            draft.reset();
            format!(
                "Vendor created with ID: {}",
                vendor.id.as_deref().unwrap_or("success")
            )
        }
        Err(e) => {
            tracing::error!(kind = e.kind.as_str(), error = %e, "Vendor registration failed");
            format!("Error adding vendor: {e}")
        }
    }
}
