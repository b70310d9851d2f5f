use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub village_name: String,
    pub mobile_number: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Closed role set. Requests carry the display spelling ("Up Pradhan");
/// it is parsed once at the boundary and never handled as a free string
/// inside the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Pradhan,
    #[serde(rename = "Up Pradhan")]
    UpPradhan,
    Secretary,
    Treasurer,
    #[serde(rename = "Chief Advisor")]
    ChiefAdvisor,
    Advisor,
    #[serde(rename = "Core Member")]
    CoreMember,
    #[serde(rename = "Other Member")]
    OtherMember,
    Guest,
}

impl Role {
    /// Roles restricted to at most one concurrent holder.
    pub fn is_singleton(&self) -> bool {
        matches!(
            self,
            Role::Pradhan
                | Role::UpPradhan
                | Role::Secretary
                | Role::Treasurer
                | Role::ChiefAdvisor
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Pradhan => "Pradhan",
            Role::UpPradhan => "Up Pradhan",
            Role::Secretary => "Secretary",
            Role::Treasurer => "Treasurer",
            Role::ChiefAdvisor => "Chief Advisor",
            Role::Advisor => "Advisor",
            Role::CoreMember => "Core Member",
            Role::OtherMember => "Other Member",
            Role::Guest => "Guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Pradhan" => Ok(Role::Pradhan),
            "Up Pradhan" => Ok(Role::UpPradhan),
            "Secretary" => Ok(Role::Secretary),
            "Treasurer" => Ok(Role::Treasurer),
            "Chief Advisor" => Ok(Role::ChiefAdvisor),
            "Advisor" => Ok(Role::Advisor),
            "Core Member" => Ok(Role::CoreMember),
            "Other Member" => Ok(Role::OtherMember),
            "Guest" => Ok(Role::Guest),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub village_name: String,
    pub mobile_number: String,
    pub role: Role,
}
