//! Read models returned by search and the closed vocabularies they use.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// A closed set of string values stored as TEXT.
///
/// `parse` is the lenient entry point used by search parameters: unknown
/// values yield `None` and the filter is dropped.
macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            #[must_use]
            pub fn parse(value: &str) -> Option<Self> {
                match value.trim() {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// `part_time` -> `Part time`.
            #[must_use]
            pub fn humanize(self) -> String {
                humanize(self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value).ok_or_else(|| {
                    let expected: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                    format!(
                        "unknown {} '{value}' (expected {})",
                        stringify!($name),
                        expected.join("|")
                    )
                })
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let text = value.as_str()?;
                Self::parse(text).ok_or_else(|| {
                    FromSqlError::Other(format!("unknown {} '{text}'", stringify!($name)).into())
                })
            }
        }
    };
}

vocabulary!(
    EmploymentType {
        FullTime => "full_time",
        PartTime => "part_time",
        Contract => "contract",
        Freelance => "freelance",
        Internship => "internship",
    }
);

vocabulary!(
    CompanySize {
        Startup => "startup",
        Small => "small",
        Medium => "medium",
        Large => "large",
        Enterprise => "enterprise",
    }
);

vocabulary!(
    ExperienceLevel {
        Junior => "junior",
        Mid => "mid",
        Senior => "senior",
        Expert => "expert",
    }
);

vocabulary!(
    Availability {
        Available => "available",
        PartTime => "part_time",
        Busy => "busy",
        Unavailable => "unavailable",
    }
);

vocabulary!(
    /// Only `active` listings are searchable.
    JobStatus {
        Active => "active",
        Inactive => "inactive",
        Expired => "expired",
    }
);

fn humanize(value: &str) -> String {
    let spaced = value.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Thousands separators: `80000` -> `80,000`.
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: i64,
    pub company_id: i64,
    pub company_name: String,
    pub company_size: Option<CompanySize>,
    pub location_id: Option<i64>,
    pub location_name: Option<String>,
    pub title: String,
    pub description: String,
    pub employment_type: EmploymentType,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub remote_ok: bool,
    pub status: JobStatus,
    pub posted_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub slug: String,
    /// Text-match score, higher is better. Present only for ranked searches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
}

impl JobListing {
    #[must_use]
    pub fn display_salary(&self) -> String {
        match (self.salary_min, self.salary_max) {
            (None, None) => "Competitive".to_string(),
            (Some(min), None) => format!("${}+", group_thousands(min)),
            (None, Some(max)) => format!("Up to ${}", group_thousands(max)),
            (Some(min), Some(max)) => {
                format!("${} - ${}", group_thousands(min), group_thousands(max))
            }
        }
    }

    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Active && self.expires_at.is_none_or(|expires| expires > now)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketerProfile {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub hourly_rate: Option<i64>,
    pub location_id: Option<i64>,
    pub location_name: Option<String>,
    pub service_type_id: Option<i64>,
    pub service_type_name: Option<String>,
    pub availability: Option<Availability>,
    pub experience_level: Option<ExperienceLevel>,
    pub slug: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
}

impl MarketerProfile {
    #[must_use]
    pub fn display_rate(&self) -> String {
        self.hourly_rate
            .map_or_else(|| "Rate on request".to_string(), |rate| format!("${rate}/hr"))
    }

    #[must_use]
    pub fn experience_level_display(&self) -> String {
        self.experience_level
            .map_or_else(|| "Not specified".to_string(), ExperienceLevel::humanize)
    }
}
