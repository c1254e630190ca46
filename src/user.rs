use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tokens credited per unit passed to [`User::with_tokens_added`].
pub const TOKENS_PER_UNIT: i64 = 50;
/// Fixed price taken by [`User::with_tokens_retracted`].
pub const RETRACT_COST: i64 = 500;

/// Identity handed to the page by the Telegram client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Document returned by the balance service for `POST /users/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub user_id: i64,
    pub tokens_balance: i64,
    #[serde(default)]
    pub experience_points: Option<i64>,
    #[serde(default)]
    pub level: Option<i64>,
    /// The service stores this without a zone.
    #[serde(default)]
    pub registration_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
    #[serde(default)]
    pub photo_url: String,
    pub tokens_balance: i64,
    #[serde(default)]
    pub experience_points: Option<i64>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub registration_date: Option<NaiveDateTime>,
}

/// Why a token helper refused to touch the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("no user is signed in")]
    NoUser,
    #[error("balance is empty")]
    EmptyBalance,
    #[error("balance {balance} is below the required {required}")]
    InsufficientBalance { balance: i64, required: i64 },
    #[error("balance would overflow")]
    Overflow,
}

impl User {
    /// The stand-in used when the page is opened outside Telegram.
    pub fn placeholder() -> Self {
        Self {
            id: 0,
            first_name: Some("Developer".to_string()),
            last_name: Some("User".to_string()),
            username: None,
            language_code: None,
            is_premium: None,
            photo_url: String::new(),
            tokens_balance: 0,
            experience_points: None,
            level: None,
            registration_date: None,
        }
    }

    /// Combines the service record with the host identity. Whatever the host
    /// supplied wins, including the id.
    ///
    /// Only the fields of [`HostUser`] and [`BalanceRecord`] are carried over;
    /// anything else either side sends is dropped when it is deserialized.
    pub fn merge(host: HostUser, record: BalanceRecord) -> Self {
        Self {
            id: host.id,
            first_name: host.first_name,
            last_name: host.last_name,
            username: host.username,
            language_code: host.language_code,
            is_premium: host.is_premium,
            photo_url: host.photo_url.unwrap_or_default(),
            tokens_balance: record.tokens_balance,
            experience_points: record.experience_points,
            level: record.level,
            registration_date: record.registration_date,
        }
    }

    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns a copy credited with `TOKENS_PER_UNIT * quantity` tokens.
    ///
    /// An empty balance is refused rather than credited.
    pub fn with_tokens_added(&self, quantity: u32) -> Result<Self, TokenError> {
        if self.tokens_balance == 0 {
            return Err(TokenError::EmptyBalance);
        }
        let tokens_balance = TOKENS_PER_UNIT
            .checked_mul(i64::from(quantity))
            .and_then(|credit| self.tokens_balance.checked_add(credit))
            .ok_or(TokenError::Overflow)?;
        Ok(Self {
            tokens_balance,
            ..self.clone()
        })
    }

    /// Returns a copy with [`RETRACT_COST`] tokens taken away.
    pub fn with_tokens_retracted(&self) -> Result<Self, TokenError> {
        if self.tokens_balance < RETRACT_COST {
            return Err(TokenError::InsufficientBalance {
                balance: self.tokens_balance,
                required: RETRACT_COST,
            });
        }
        Ok(Self {
            tokens_balance: self.tokens_balance - RETRACT_COST,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user_with_balance(tokens_balance: i64) -> User {
        User {
            tokens_balance,
            ..User::placeholder()
        }
    }

    fn host_user() -> HostUser {
        HostUser {
            id: 279058397,
            first_name: Some("Vladislav".to_string()),
            last_name: Some("Kibenko".to_string()),
            username: Some("vdkfrost".to_string()),
            language_code: Some("ru".to_string()),
            is_premium: Some(true),
            photo_url: Some("https://t.me/i/userpic/320/vdkfrost.svg".to_string()),
        }
    }

    #[test]
    fn placeholder_is_the_developer_user() {
        let user = User::placeholder();
        assert_eq!(user.id, 0);
        assert_eq!(user.display_name(), "Developer User");
        assert_eq!(user.tokens_balance, 0);
        assert_eq!(user.photo_url, "");
    }

    #[rstest]
    #[case(1, 1)]
    #[case(100, 3)]
    #[case(750, 10)]
    #[case(5, 1000)]
    fn adding_credits_fifty_per_unit(#[case] balance: i64, #[case] quantity: u32) {
        let updated = user_with_balance(balance).with_tokens_added(quantity).unwrap();
        assert_eq!(updated.tokens_balance, balance + 50 * i64::from(quantity));
    }

    #[test]
    fn adding_to_an_empty_balance_is_refused() {
        let user = user_with_balance(0);
        assert_eq!(user.with_tokens_added(4), Err(TokenError::EmptyBalance));
        assert_eq!(user.tokens_balance, 0);
    }

    #[test]
    fn adding_reports_overflow() {
        let user = user_with_balance(i64::MAX - 10);
        assert_eq!(user.with_tokens_added(1), Err(TokenError::Overflow));
    }

    #[rstest]
    #[case(500, 0)]
    #[case(501, 1)]
    #[case(2_000, 1_500)]
    fn retracting_takes_five_hundred(#[case] balance: i64, #[case] expected: i64) {
        let updated = user_with_balance(balance).with_tokens_retracted().unwrap();
        assert_eq!(updated.tokens_balance, expected);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(499)]
    fn retracting_below_the_cost_is_refused(#[case] balance: i64) {
        let user = user_with_balance(balance);
        assert_eq!(
            user.with_tokens_retracted(),
            Err(TokenError::InsufficientBalance {
                balance,
                required: RETRACT_COST,
            })
        );
    }

    #[test]
    fn merge_prefers_host_fields_and_takes_the_balance_from_the_record() {
        let record: BalanceRecord = serde_json::from_str(
            r#"{
                "user_id": 1,
                "registration_date": "2024-10-19T18:21:26.680946",
                "tokens_balance": 1200,
                "experience_points": 40,
                "level": 2
            }"#,
        )
        .unwrap();

        let user = User::merge(host_user(), record);

        assert_eq!(user.id, 279058397);
        assert_eq!(user.display_name(), "Vladislav Kibenko");
        assert_eq!(user.username.as_deref(), Some("vdkfrost"));
        assert_eq!(user.language_code.as_deref(), Some("ru"));
        assert_eq!(user.is_premium, Some(true));
        assert_eq!(user.photo_url, "https://t.me/i/userpic/320/vdkfrost.svg");
        assert_eq!(user.tokens_balance, 1200);
        assert_eq!(user.level, Some(2));
        assert!(user.registration_date.is_some());
    }

    #[test]
    fn merge_leaves_avatar_empty_when_host_has_none() {
        let host = HostUser {
            photo_url: None,
            last_name: None,
            ..host_user()
        };
        let record = BalanceRecord {
            user_id: host.id,
            tokens_balance: 0,
            experience_points: None,
            level: None,
            registration_date: None,
        };

        let user = User::merge(host, record);
        assert_eq!(user.photo_url, "");
        assert_eq!(user.display_name(), "Vladislav");
    }

    #[test]
    fn record_without_a_balance_is_rejected() {
        let parsed = serde_json::from_str::<BalanceRecord>(r#"{"user_id": 3}"#);
        assert!(parsed.is_err());
    }
}
