//! Sms - ゲートウェイから受け取る SMS レコード
//!
//! sms-gammu-gateway の `/getsms` は 1 件の JSON オブジェクトを返します。
//! 新着がない場合は全フィールドが空のオブジェクト（`{}`）になります。

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::errors::{FetchError, MissingField};

/// A single SMS as reported by the gateway.
///
/// Missing or `null` keys deserialize to empty strings; [`Sms::validate`]
/// decides whether the record is "nothing new", malformed, or deliverable.
/// Keys are accepted in their gateway spelling and in lower/upper case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sms {
    #[serde(
        rename = "Date",
        alias = "date",
        alias = "DATE",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub date: String,

    #[serde(
        rename = "Number",
        alias = "number",
        alias = "NUMBER",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub number: String,

    #[serde(
        rename = "State",
        alias = "state",
        alias = "STATE",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub state: String,

    #[serde(
        rename = "Text",
        alias = "text",
        alias = "TEXT",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub text: String,

    #[serde(
        rename = "ID",
        alias = "id",
        alias = "Id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
}

/// `null` は空文字列として扱う（キー欠落と同じ）
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Sms {
    pub fn new(
        number: impl Into<String>,
        date: impl Into<String>,
        state: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            number: number.into(),
            state: state.into(),
            text: text.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// 空レコード判定 → 必須フィールド検査 の順で評価する
    ///
    /// # 検査順
    /// 1. 4 フィールドすべて空 → `NoNewMessages`
    /// 2. Date → Number → State → Text の順に欠落を報告
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.date.is_empty()
            && self.number.is_empty()
            && self.state.is_empty()
            && self.text.is_empty()
        {
            return Err(FetchError::NoNewMessages);
        }

        let missing = [
            (MissingField::Date, &self.date),
            (MissingField::Number, &self.number),
            (MissingField::State, &self.state),
            (MissingField::Text, &self.text),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(field, _)| field);

        match missing {
            Some(field) => Err(FetchError::Validation(field)),
            None => Ok(()),
        }
    }
}

/// Notification text forwarded to Telegram.
impl fmt::Display for Sms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sent on {} ({})\n{}",
            self.number, self.date, self.state, self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn complete() -> Sms {
        Sms::new("+123456789", "2022-01-01", "received", "Test SMS")
    }

    #[test]
    fn renders_notification_text() {
        assert_eq!(
            complete().to_string(),
            "+123456789 sent on 2022-01-01 (received)\nTest SMS"
        );
    }

    #[test]
    fn complete_record_is_valid() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn empty_record_means_no_new_messages() {
        let err = Sms::default().validate().unwrap_err();
        assert!(err.is_no_new_messages());
    }

    #[test]
    fn id_alone_still_means_no_new_messages() {
        let sms = Sms::default().with_id("7");
        assert!(sms.validate().unwrap_err().is_no_new_messages());
    }

    #[rstest]
    #[case::date(Sms { date: String::new(), ..complete() }, MissingField::Date)]
    #[case::number(Sms { number: String::new(), ..complete() }, MissingField::Number)]
    #[case::state(Sms { state: String::new(), ..complete() }, MissingField::State)]
    #[case::text(Sms { text: String::new(), ..complete() }, MissingField::Text)]
    fn reports_the_missing_field(#[case] sms: Sms, #[case] expected: MissingField) {
        match sms.validate() {
            Err(FetchError::Validation(field)) => assert_eq!(field, expected),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn date_is_checked_before_other_fields() {
        let sms = Sms::new("", "", "", "only text");
        assert!(matches!(
            sms.validate(),
            Err(FetchError::Validation(MissingField::Date))
        ));
    }

    #[test]
    fn decodes_gateway_json() {
        let raw = r#"{"ID":"1","Text":"Test message 1","Number":"+123456789","State":"received","Date":"2022-01-01"}"#;
        let sms: Sms = serde_json::from_str(raw).unwrap();
        assert_eq!(sms.id.as_deref(), Some("1"));
        assert_eq!(sms.number, "+123456789");
        assert_eq!(sms.text, "Test message 1");
    }

    #[test]
    fn accepts_lowercase_number_key_and_missing_keys() {
        let sms: Sms = serde_json::from_str(r#"{"number":"42"}"#).unwrap();
        assert_eq!(sms.number, "42");
        assert!(sms.date.is_empty());
        assert_eq!(sms.id, None);
    }

    #[rstest]
    #[case::gateway_spelling(r#"{"ID":"1","Date":"2022-01-01","Number":"+123456789","State":"received","Text":"Test SMS"}"#)]
    #[case::lowercase(r#"{"id":"1","date":"2022-01-01","number":"+123456789","state":"received","text":"Test SMS"}"#)]
    #[case::uppercase(r#"{"ID":"1","DATE":"2022-01-01","NUMBER":"+123456789","STATE":"received","TEXT":"Test SMS"}"#)]
    fn decodes_any_key_casing(#[case] raw: &str) {
        let sms: Sms = serde_json::from_str(raw).unwrap();
        assert_eq!(
            sms,
            Sms::new("+123456789", "2022-01-01", "received", "Test SMS").with_id("1")
        );
        assert!(sms.validate().is_ok());
    }

    #[rstest]
    #[case::all_null(
        r#"{"Date":null,"Number":null,"State":null,"Text":null,"ID":null}"#,
        None
    )]
    #[case::null_text(
        r#"{"Date":"2022-01-01","Number":"+1","State":"received","Text":null}"#,
        Some(MissingField::Text)
    )]
    #[case::null_date(
        r#"{"Date":null,"Number":"+1","State":"received","Text":"hi"}"#,
        Some(MissingField::Date)
    )]
    fn null_fields_read_as_empty(#[case] raw: &str, #[case] missing: Option<MissingField>) {
        let sms: Sms = serde_json::from_str(raw).unwrap();
        match (sms.validate(), missing) {
            (Err(FetchError::NoNewMessages), None) => {}
            (Err(FetchError::Validation(field)), Some(expected)) => assert_eq!(field, expected),
            (other, expected) => panic!("expected {expected:?}, got {other:?}"),
        }
    }
}
