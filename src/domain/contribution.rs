use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A member's claimed monthly payment, subject to treasurer approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    pub id: Uuid,
    pub member_id: Uuid,
    pub amount: i64,
    pub month: Month,
    pub year: i32,
    pub payment_date: DateTime<Utc>,
    pub status: ContributionStatus,
    pub approved_by: Option<Uuid>,
    pub approval_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributionStatus {
    Pending,
    Approved,
    Rejected,
}

impl ContributionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionStatus::Pending => "Pending",
            ContributionStatus::Approved => "Approved",
            ContributionStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ContributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContributionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ContributionStatus::Pending),
            "Approved" => Ok(ContributionStatus::Approved),
            "Rejected" => Ok(ContributionStatus::Rejected),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Calendar month. Display ordering uses the calendar index, not the
/// lexicographic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// 1-based calendar index.
    pub fn index(&self) -> u32 {
        match self {
            Month::January => 1,
            Month::February => 2,
            Month::March => 3,
            Month::April => 4,
            Month::May => 5,
            Month::June => 6,
            Month::July => 7,
            Month::August => 8,
            Month::September => 9,
            Month::October => 10,
            Month::November => 11,
            Month::December => 12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "January" => Ok(Month::January),
            "February" => Ok(Month::February),
            "March" => Ok(Month::March),
            "April" => Ok(Month::April),
            "May" => Ok(Month::May),
            "June" => Ok(Month::June),
            "July" => Ok(Month::July),
            "August" => Ok(Month::August),
            "September" => Ok(Month::September),
            "October" => Ok(Month::October),
            "November" => Ok(Month::November),
            "December" => Ok(Month::December),
            _ => Err(format!("Unknown month: {}", s)),
        }
    }
}

/// Body of POST /contributions. Month arrives as a string and is parsed
/// by the service so a bad name surfaces as a ValidationError rather
/// than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitContributionRequest {
    pub amount: i64,
    pub month: String,
    pub year: i32,
    pub notes: Option<String>,
}

/// Body of POST /contributions/admin-add. `user` matches the wire field
/// name of the existing clients.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminAddContributionRequest {
    #[serde(rename = "user")]
    pub member_id: Uuid,
    pub amount: i64,
    pub month: String,
    pub year: i32,
    pub notes: Option<String>,
}

/// Body of PUT /contributions/:id/status.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub notes: Option<String>,
}

/// Optional filters for listing contributions.
#[derive(Debug, Clone, Default)]
pub struct ContributionFilter {
    pub member_id: Option<Uuid>,
    pub month: Option<Month>,
    pub year: Option<i32>,
    pub status: Option<ContributionStatus>,
}

/// A contribution with member and approver identity resolved to display
/// names. Missing directory entries degrade to None.
#[derive(Debug, Clone, Serialize)]
pub struct ContributionView {
    #[serde(flatten)]
    pub contribution: Contribution,
    pub member_name: Option<String>,
    pub approved_by_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_parses_canonical_names_only() {
        assert_eq!("March".parse::<Month>().unwrap(), Month::March);
        assert!("march".parse::<Month>().is_err());
        assert!("Marchuary".parse::<Month>().is_err());
    }

    #[test]
    fn month_index_is_calendar_order() {
        assert_eq!(Month::January.index(), 1);
        assert_eq!(Month::December.index(), 12);
        assert!(Month::February.index() < Month::November.index());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for s in ["Pending", "Approved", "Rejected"] {
            assert_eq!(s.parse::<ContributionStatus>().unwrap().as_str(), s);
        }
        assert!("Reverted".parse::<ContributionStatus>().is_err());
    }
}
