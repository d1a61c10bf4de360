//! License notice selection for the in-context update message
//!
//! Only the choice of message is made here. Hosts render the variant in
//! their own markup; [`Notice`]'s `Display` gives a plain-text fallback.

use std::fmt;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::DEFAULT_DATE_FORMAT;
use crate::update::types::{LicenseState, ProductEntity};

/// Message variant shown under an available update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// No activation token: ask the user to activate (or buy) a license
    ActivateLicense {
        purchase_url: String,
        settings_url: String,
    },
    /// License expired: ask the user to renew
    LicenseExpired {
        /// Formatted expiry date, when the server reported a parseable one
        expired_on: Option<String>,
        purchase_url: String,
        settings_url: String,
    },
    /// License is valid, nothing to say
    Silent,
}

/// Select the notice for a product
///
/// `license` is the state looked up for the product's token. A token whose
/// license could not be looked up is treated as expired.
pub fn select_notice(
    product: &ProductEntity,
    license: Option<&LicenseState>,
    date_format: &str,
) -> Notice {
    let purchase_url = product.purchase_url.clone();
    let settings_url = product.settings_url.clone();

    if product.token().is_none() {
        return Notice::ActivateLicense {
            purchase_url,
            settings_url,
        };
    }

    match license {
        Some(license) if !license.is_expired => Notice::Silent,
        license => Notice::LicenseExpired {
            expired_on: license
                .and_then(|l| l.expires_at.as_deref())
                .and_then(|date| format_date(date, date_format)),
            purchase_url,
            settings_url,
        },
    }
}

/// Format a server timestamp for display
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD`. An invalid
/// `date_format` falls back to the default format.
pub fn format_date(value: &str, date_format: &str) -> Option<String> {
    let value = value.trim();
    let date = DateTime::parse_from_rfc3339(value)
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| {
                    NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
                })
                .map(|dt| dt.and_utc().fixed_offset())
        })
        .ok()?;

    let format = if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
        DEFAULT_DATE_FORMAT
    } else {
        date_format
    };

    Some(date.format(format).to_string())
}

impl Notice {
    pub fn is_silent(&self) -> bool {
        matches!(self, Notice::Silent)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ActivateLicense {
                purchase_url,
                settings_url,
            } => write!(
                f,
                "Important: To enable updates, please activate your license key on the settings page ({}). Need a license key? Purchase one now: {}",
                settings_url, purchase_url
            ),
            Notice::LicenseExpired {
                expired_on,
                purchase_url,
                settings_url,
            } => {
                match expired_on {
                    Some(date) => write!(f, "Important: Your license expired on {}. ", date)?,
                    None => write!(f, "Important: Your license expired. ")?,
                }
                write!(
                    f,
                    "To continue with updates please purchase a new license key ({}) and activate it on the settings page ({}).",
                    purchase_url, settings_url
                )
            }
            Notice::Silent => Ok(()),
        }
    }
}
