//! Lifecycle and tier enums for vendors and shops.
//!
//! Vendors and shops share the same three-state lifecycle
//! (`pending -> active | rejected`) but carry it independently: a vendor
//! still awaiting review may own an already-active shop.

use serde::{Deserialize, Serialize};

/// Error returned when parsing a status or tier from text fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseStatusError {
    kind: &'static str,
    value: String,
}

/// Vendor account status.
///
/// Moderated by administrators; a freshly registered vendor starts `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "vendor_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    #[default]
    Pending,
    Active,
    Rejected,
}

impl VendorStatus {
    /// Whether an approve transition may fire from this state.
    #[must_use]
    pub const fn is_approvable(self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VendorStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseStatusError {
                kind: "vendor status",
                value: s.to_owned(),
            }),
        }
    }
}

/// Shop lifecycle state.
///
/// Controls whether a shop's resources are visible or mutable. There is no
/// terminal state: rejected shops stay addressable so administrators can
/// reconsider them.
///
/// | transition          | guard                         |
/// |---------------------|-------------------------------|
/// | approve -> `Active` | only from `Pending`           |
/// | reject -> `Rejected`| unconditional                 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ShopStatus {
    #[default]
    Pending,
    Active,
    Rejected,
}

impl ShopStatus {
    /// Whether an approve transition may fire from this state.
    #[must_use]
    pub const fn is_approvable(self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ShopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShopStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseStatusError {
                kind: "shop status",
                value: s.to_owned(),
            }),
        }
    }
}

/// Marketplace participation tier of a shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "display_mode", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Free,
    Paid,
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Paid => write!(f, "paid"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pending_is_approvable() {
        assert!(ShopStatus::Pending.is_approvable());
        assert!(!ShopStatus::Active.is_approvable());
        assert!(!ShopStatus::Rejected.is_approvable());
        assert!(VendorStatus::Pending.is_approvable());
        assert!(!VendorStatus::Rejected.is_approvable());
    }

    #[test]
    fn test_status_text_roundtrip() {
        for status in [ShopStatus::Pending, ShopStatus::Active, ShopStatus::Rejected] {
            assert_eq!(status.to_string().parse::<ShopStatus>().unwrap(), status);
        }
        assert!("approved".parse::<ShopStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&VendorStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(serde_json::to_string(&DisplayMode::Free).unwrap(), "\"free\"");
    }
}
