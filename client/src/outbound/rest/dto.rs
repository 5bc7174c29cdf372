//! Request bodies and response payloads for the wallet API.
//!
//! The token travels in the body of every authenticated request, next to the
//! page cursor and the list's flattened filters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::AccountKind;
use crate::domain::ports::VipProfile;
use crate::domain::rate::{coerce_decimal, coerce_f64};

#[derive(Debug, Serialize)]
pub(super) struct LoginBody<'a> {
    pub(super) account: &'a str,
    pub(super) account_type: AccountTypeDto,
    pub(super) password: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(super) enum AccountTypeDto {
    Email,
    Phone,
}

impl From<AccountKind> for AccountTypeDto {
    fn from(value: AccountKind) -> Self {
        match value {
            AccountKind::Email => Self::Email,
            AccountKind::Phone => Self::Phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct TokenBody<'a> {
    pub(super) token: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct PageBody<'a, F> {
    pub(super) token: &'a str,
    pub(super) page: u32,
    pub(super) page_size: u32,
    #[serde(flatten)]
    pub(super) filters: &'a F,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginDataDto {
    pub(super) token: String,
}

/// VIP payload; older servers send `bonus_percent` as a string.
#[derive(Debug, Deserialize)]
pub(super) struct VipProfileDto {
    #[serde(default)]
    level: u32,
    #[serde(default)]
    bonus_percent: Value,
}

impl From<VipProfileDto> for VipProfile {
    fn from(value: VipProfileDto) -> Self {
        Self {
            level: value.level,
            bonus_percent: loose_decimal(&value.bonus_percent).max(Decimal::ZERO),
        }
    }
}

fn loose_decimal(value: &Value) -> Decimal {
    match value {
        Value::String(raw) => coerce_decimal(raw),
        Value::Number(number) => number.as_f64().map_or(Decimal::ZERO, coerce_f64),
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    //! Body shapes and loose payload decoding.

    use std::str::FromStr;

    use super::*;
    use crate::domain::stores::{NotificationFilter, RechargeLogFilter, UtilityType};
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn page_body_flattens_struct_filters() {
        let filters = RechargeLogFilter::only(UtilityType::Data);
        let body = PageBody {
            token: "tok",
            page: 2,
            page_size: 10,
            filters: &filters,
        };
        let value = serde_json::to_value(&body).expect("serialise body");
        assert_eq!(
            value,
            json!({ "token": "tok", "page": 2, "page_size": 10, "utility_type": "data" })
        );
    }

    #[test]
    fn page_body_flattens_tagged_filters() {
        let body = PageBody {
            token: "tok",
            page: 0,
            page_size: 20,
            filters: &NotificationFilter::System,
        };
        let value = serde_json::to_value(&body).expect("serialise body");
        assert_eq!(value["type"], "system");
        assert_eq!(value["page"], 0);
    }

    #[test]
    fn login_body_names_the_account_type() {
        let body = LoginBody {
            account: "+2348012345678",
            account_type: AccountKind::Phone.into(),
            password: "pw",
        };
        let value = serde_json::to_value(&body).expect("serialise body");
        assert_eq!(
            value,
            json!({ "account": "+2348012345678", "account_type": "phone", "password": "pw" })
        );
    }

    #[rstest]
    #[case(json!({ "level": 2, "bonus_percent": "1.5" }), "1.5")]
    #[case(json!({ "level": 2, "bonus_percent": 2.25 }), "2.25")]
    #[case(json!({ "level": 2, "bonus_percent": "n/a" }), "0")]
    #[case(json!({ "level": 2, "bonus_percent": -4 }), "0")]
    #[case(json!({ "level": 2 }), "0")]
    fn vip_bonus_is_coerced(#[case] payload: Value, #[case] expected: &str) {
        let dto: VipProfileDto = serde_json::from_value(payload).expect("dto decodes");
        let profile = VipProfile::from(dto);
        assert_eq!(profile.level, 2);
        assert_eq!(profile.bonus_percent, Decimal::from_str(expected).expect("decimal"));
    }
}
