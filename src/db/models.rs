use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Donor {
    pub id: i64,
    pub name: String,
    pub phone: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    pub id: i64,
    pub date: String,
    pub size: Size,
    pub condition: Condition,
    pub status: DonationStatus,
    pub description: String,
    /// Lookup key into the donor table; no ownership implied.
    pub donor_id: Option<i64>,
}

/// Field set for a donation that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub date: String,
    pub size: Size,
    pub condition: Condition,
    pub status: DonationStatus,
    pub description: String,
    pub donor_id: Option<i64>,
}

/// Garment size as printed on the label.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    P,
    M,
    G,
    GG,
    XG,
}

impl Size {
    pub const ALL: [Size; 5] = [Size::P, Size::M, Size::G, Size::GG, Size::XG];
    pub const LABELS: [&'static str; 5] = ["P", "M", "G", "GG", "XG"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::P => "P",
            Size::M => "M",
            Size::G => "G",
            Size::GG => "GG",
            Size::XG => "XG",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "P" => Some(Size::P),
            "M" => Some(Size::M),
            "G" => Some(Size::G),
            "GG" => Some(Size::GG),
            "XG" => Some(Size::XG),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    New,
    #[serde(rename = "Semi-new")]
    SemiNew,
    Used,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::New, Condition::SemiNew, Condition::Used];
    pub const LABELS: [&'static str; 3] = ["New", "Semi-new", "Used"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::SemiNew => "Semi-new",
            Condition::Used => "Used",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "New" => Some(Condition::New),
            "Semi-new" => Some(Condition::SemiNew),
            "Used" => Some(Condition::Used),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationStatus {
    Available,
    Donated,
}

impl DonationStatus {
    pub const ALL: [DonationStatus; 2] = [DonationStatus::Available, DonationStatus::Donated];
    pub const LABELS: [&'static str; 2] = ["Available", "Donated"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Available => "Available",
            DonationStatus::Donated => "Donated",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Available" => Some(DonationStatus::Available),
            "Donated" => Some(DonationStatus::Donated),
            _ => None,
        }
    }
}

macro_rules! text_column {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(self.as_str().into())
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let s = value.as_str()?;
                Self::from_label(s).ok_or_else(|| {
                    FromSqlError::Other(format!("unrecognized {}: {s}", $what).into())
                })
            }
        }
    };
}

text_column!(Size, "size");
text_column!(Condition, "condition");
text_column!(DonationStatus, "status");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for size in Size::ALL {
            assert_eq!(Size::from_label(size.as_str()), Some(size));
        }
        for condition in Condition::ALL {
            assert_eq!(Condition::from_label(condition.as_str()), Some(condition));
        }
        for status in DonationStatus::ALL {
            assert_eq!(DonationStatus::from_label(status.as_str()), Some(status));
        }
        assert_eq!(Size::from_label("XXL"), None);
        assert_eq!(Condition::from_label("new"), None);
    }
}
