//! Closed value domains for visitor profiles and page categories.
//!
//! The stored columns are plain text; these enums are the only values the
//! typed API ever writes. Each one parses from and formats to its exact
//! stored string.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::errors::{AppError, Result};

/// Shared behaviour of every value domain.
pub trait Domain:
    Copy + FromStr + IntoEnumIterator + Into<&'static str> + 'static
{
    /// 字段名，用于错误信息与 `/valid-values`
    const FIELD: &'static str;

    fn as_str(self) -> &'static str {
        self.into()
    }

    fn allowed_values() -> Vec<&'static str> {
        Self::iter().map(Into::into).collect()
    }

    /// 解析字符串，失败时返回列出全部合法值的校验错误
    fn parse_value(value: &str) -> Result<Self> {
        value.parse::<Self>().map_err(|_| {
            AppError::validation(format!(
                "Invalid {}: '{}'. Allowed values: {}",
                Self::FIELD,
                value,
                Self::allowed_values().join(", ")
            ))
        })
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
pub enum VisitorType {
    Couple,
    Family,
    Solo,
}

impl Domain for VisitorType {
    const FIELD: &'static str = "visitor_type";
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
pub enum StayDuration {
    #[serde(rename = "<1 week")]
    #[strum(serialize = "<1 week")]
    UnderOneWeek,
    #[serde(rename = "1-2 weeks")]
    #[strum(serialize = "1-2 weeks")]
    OneToTwoWeeks,
    #[serde(rename = ">1 month")]
    #[strum(serialize = ">1 month")]
    OverOneMonth,
    #[serde(rename = ">3 months")]
    #[strum(serialize = ">3 months")]
    OverThreeMonths,
}

impl Domain for StayDuration {
    const FIELD: &'static str = "stay_duration";
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
pub enum AgeBracket {
    #[serde(rename = "18-25")]
    #[strum(serialize = "18-25")]
    From18To25,
    #[serde(rename = "26-35")]
    #[strum(serialize = "26-35")]
    From26To35,
    #[serde(rename = "36-45")]
    #[strum(serialize = "36-45")]
    From36To45,
    #[serde(rename = "46-55")]
    #[strum(serialize = "46-55")]
    From46To55,
    #[serde(rename = "56-65")]
    #[strum(serialize = "56-65")]
    From56To65,
    #[serde(rename = "65+")]
    #[strum(serialize = "65+")]
    Over65,
}

impl Domain for AgeBracket {
    const FIELD: &'static str = "age_bracket";
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
pub enum InterestType {
    #[serde(rename = "Culture/Heritage")]
    #[strum(serialize = "Culture/Heritage")]
    CultureHeritage,
    Hiking,
    Beach,
    Food,
    Sport,
    Relaxation,
}

impl Domain for InterestType {
    const FIELD: &'static str = "interest_type";
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
pub enum PageCategory {
    Home,
    Activities,
    Lodging,
    Dining,
    Culture,
    Nature,
    Events,
    Practical,
}

impl Domain for PageCategory {
    const FIELD: &'static str = "page_category";
}

/// Every domain with its allowed values, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidValues {
    pub visitor_type: Vec<String>,
    pub stay_duration: Vec<String>,
    pub age_bracket: Vec<String>,
    pub interest_type: Vec<String>,
    pub page_category: Vec<String>,
}

impl ValidValues {
    pub fn collect() -> Self {
        fn owned<D: Domain>() -> Vec<String> {
            D::allowed_values().into_iter().map(str::to_string).collect()
        }

        Self {
            visitor_type: owned::<VisitorType>(),
            stay_duration: owned::<StayDuration>(),
            age_bracket: owned::<AgeBracket>(),
            interest_type: owned::<InterestType>(),
            page_category: owned::<PageCategory>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_stored_strings() {
        assert_eq!(StayDuration::UnderOneWeek.as_str(), "<1 week");
        assert_eq!(StayDuration::OverThreeMonths.to_string(), ">3 months");
        assert_eq!(AgeBracket::Over65.as_str(), "65+");
        assert_eq!(InterestType::CultureHeritage.as_str(), "Culture/Heritage");
        assert_eq!(PageCategory::Practical.as_str(), "Practical");
    }

    #[test]
    fn test_parse_value_accepts_domain_strings() {
        assert_eq!(
            StayDuration::parse_value("1-2 weeks").unwrap(),
            StayDuration::OneToTwoWeeks
        );
        assert_eq!(AgeBracket::parse_value("18-25").unwrap(), AgeBracket::From18To25);
        assert_eq!(VisitorType::parse_value("Solo").unwrap(), VisitorType::Solo);
    }

    #[test]
    fn test_parse_value_does_not_trim() {
        assert!(VisitorType::parse_value(" Solo ").is_err());
        assert!(PageCategory::parse_value("Home\n").is_err());
        assert!(VisitorType::parse_value("solo").is_err());
    }

    #[test]
    fn test_parse_value_rejects_and_lists_allowed() {
        let err = VisitorType::parse_value("Famille").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.message().contains("visitor_type"));
        assert!(err.message().contains("Couple, Family, Solo"));
    }

    #[test]
    fn test_domain_sizes() {
        assert_eq!(VisitorType::allowed_values().len(), 3);
        assert_eq!(StayDuration::allowed_values().len(), 4);
        assert_eq!(AgeBracket::allowed_values().len(), 6);
        assert_eq!(InterestType::allowed_values().len(), 6);
        assert_eq!(PageCategory::allowed_values().len(), 8);
    }

    #[test]
    fn test_serde_uses_stored_strings() {
        let json = serde_json::to_string(&StayDuration::OverOneMonth).unwrap();
        assert_eq!(json, "\">1 month\"");
        let parsed: InterestType = serde_json::from_str("\"Culture/Heritage\"").unwrap();
        assert_eq!(parsed, InterestType::CultureHeritage);
    }

    #[test]
    fn test_valid_values_listing() {
        let values = ValidValues::collect();
        assert_eq!(values.visitor_type, vec!["Couple", "Family", "Solo"]);
        assert_eq!(values.page_category.first().map(String::as_str), Some("Home"));
    }
}
