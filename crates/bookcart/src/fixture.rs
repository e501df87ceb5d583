//! Fixture records driving the parameterized scenarios.
//!
//! Three JSON files, camelCase keys:
//! - `loginData.json`: seeded account and invalid credential cases
//! - `registerFormData.json`: registration field sets per validation scenario
//! - `shippingData.json`: checkout shipping address
//!
//! Copies of all three are compiled in; [`FixtureSet::load`] reads a directory
//! instead. Fixtures are loaded once per run and never mutated.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::result::{BookcartError, BookcartResult};

const LOGIN_FILE: &str = "loginData.json";
const REGISTER_FILE: &str = "registerFormData.json";
const SHIPPING_FILE: &str = "shippingData.json";

/// Label of the registration username field
pub const USERNAME_FIELD: &str = "User name";

/// Label of the registration password field
pub const PASSWORD_FIELD: &str = "Password";

/// A username/password pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

/// One invalid login case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Case name, e.g. "Empty Password"
    pub test_case: String,
    /// Username to enter; whitespace-only means blank
    pub username: String,
    /// Password to enter; whitespace-only means blank
    pub password: String,
}

impl Credentials {
    /// Case exercises required-field validation rather than a server rejection
    #[must_use]
    pub fn is_empty_case(&self) -> bool {
        self.test_case.contains("Empty")
    }

    /// Username is left blank
    #[must_use]
    pub fn username_blank(&self) -> bool {
        self.username.trim().is_empty()
    }

    /// Password is left blank
    #[must_use]
    pub fn password_blank(&self) -> bool {
        self.password.trim().is_empty()
    }
}

/// Contents of `loginData.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// Seeded account
    pub valid_credentials: Account,
    /// Rejected combinations
    pub invalid_credentials: Vec<Credentials>,
}

/// Registration field label and the name used in its required-message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldName {
    /// Input placeholder
    pub field_name: String,
    /// Name in "{name} is required"
    pub error_field_name: String,
}

/// One form input to fill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawField", into = "RawField")]
pub enum FormField {
    /// Free-text input located by placeholder
    Text {
        /// Input placeholder
        label: String,
        /// Text to type
        value: String,
    },
    /// Radio button located by its exact label text
    Choice {
        /// Group name
        label: String,
        /// Option to select
        option: String,
    },
}

impl FormField {
    /// Text input
    #[must_use]
    pub fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Radio choice
    #[must_use]
    pub fn choice(label: impl Into<String>, option: impl Into<String>) -> Self {
        Self::Choice {
            label: label.into(),
            option: option.into(),
        }
    }

    /// Field label
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Text { label, .. } | Self::Choice { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gender: Option<String>,
}

impl TryFrom<RawField> for FormField {
    type Error = String;

    fn try_from(raw: RawField) -> Result<Self, Self::Error> {
        match raw {
            RawField {
                field_name,
                gender: Some(option),
                ..
            } => Ok(Self::Choice {
                label: field_name.unwrap_or_else(|| "Gender".to_string()),
                option,
            }),
            RawField {
                field_name: Some(label),
                data: Some(value),
                ..
            } => Ok(Self::Text { label, value }),
            RawField {
                field_name: Some(label),
                ..
            } => Err(format!("field {label:?} has neither \"data\" nor \"gender\"")),
            RawField { .. } => Err("form field without \"fieldName\"".to_string()),
        }
    }
}

impl From<FormField> for RawField {
    fn from(field: FormField) -> Self {
        match field {
            FormField::Text { label, value } => Self {
                field_name: Some(label),
                data: Some(value),
                gender: None,
            },
            FormField::Choice { label, option } => Self {
                field_name: Some(label),
                data: None,
                gender: Some(option),
            },
        }
    }
}

/// Contents of `registerFormData.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFormData {
    /// Every text input of the form
    pub field_names: Vec<FieldName>,
    /// Password and confirmation differ
    pub password_matching_validation: Vec<FormField>,
    /// Username already taken
    pub user_name_availability_validation: Vec<FormField>,
    /// Password too weak
    #[serde(rename = "passswordFormatValidation")]
    pub password_format_validation: Vec<FormField>,
    /// Single-character values, emptied one by one
    pub required_field_validation: Vec<FormField>,
    /// A registration the site accepts, given a fresh username
    pub correct_registration_details: Vec<FormField>,
}

impl RegisterFormData {
    /// Accepted registration with the username replaced
    pub fn correct_details_for(&self, username: &str) -> BookcartResult<Vec<FormField>> {
        let mut replaced = false;
        let fields: Vec<FormField> = self
            .correct_registration_details
            .iter()
            .map(|field| match field {
                FormField::Text { label, .. } if label == USERNAME_FIELD => {
                    replaced = true;
                    FormField::text(label.clone(), username)
                }
                other => other.clone(),
            })
            .collect();
        if replaced {
            Ok(fields)
        } else {
            Err(BookcartError::fixture(format!(
                "correctRegistrationDetails has no {USERNAME_FIELD:?} field"
            )))
        }
    }

    /// Value of a text field in the accepted registration
    pub fn correct_value(&self, label: &str) -> BookcartResult<&str> {
        self.correct_registration_details
            .iter()
            .find_map(|field| match field {
                FormField::Text { label: l, value } if l == label => Some(value.as_str()),
                _ => None,
            })
            .ok_or_else(|| {
                BookcartError::fixture(format!("correctRegistrationDetails has no {label:?} field"))
            })
    }
}

/// One shipping address input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingField {
    /// Input placeholder
    #[serde(rename = "fieldName")]
    pub label: String,
    /// Text to type
    #[serde(rename = "fieldData")]
    pub value: String,
}

/// Contents of `shippingData.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingData {
    /// Address inputs in form order
    pub shipping_details: Vec<ShippingField>,
}

/// All fixture records for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSet {
    /// Login cases
    pub login: LoginData,
    /// Registration field sets
    pub register: RegisterFormData,
    /// Shipping address
    pub shipping: ShippingData,
}

impl FixtureSet {
    /// Fixtures compiled into the crate
    pub fn builtin() -> BookcartResult<Self> {
        Ok(Self {
            login: parse(LOGIN_FILE, include_str!("../fixtures/loginData.json"))?,
            register: parse(REGISTER_FILE, include_str!("../fixtures/registerFormData.json"))?,
            shipping: parse(SHIPPING_FILE, include_str!("../fixtures/shippingData.json"))?,
        })
    }

    /// Read the three fixture files from `dir`
    pub fn load(dir: &Path) -> BookcartResult<Self> {
        Ok(Self {
            login: read(dir, LOGIN_FILE)?,
            register: read(dir, REGISTER_FILE)?,
            shipping: read(dir, SHIPPING_FILE)?,
        })
    }

    /// `load(dir)` when a directory is configured, else the built-in set
    pub fn from_dir_or_builtin(dir: Option<&Path>) -> BookcartResult<Self> {
        dir.map_or_else(Self::builtin, Self::load)
    }
}

fn read<T: serde::de::DeserializeOwned>(dir: &Path, file: &str) -> BookcartResult<T> {
    let path = dir.join(file);
    let text = std::fs::read_to_string(&path)
        .map_err(|e| BookcartError::fixture(format!("cannot read {}: {e}", path.display())))?;
    parse(file, &text)
}

fn parse<T: serde::de::DeserializeOwned>(file: &str, text: &str) -> BookcartResult<T> {
    serde_json::from_str(text).map_err(|e| BookcartError::fixture(format!("{file}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod builtin_tests {
        use super::*;

        #[test]
        fn test_builtin_fixtures_parse() {
            let fixtures = FixtureSet::builtin().unwrap();
            assert_eq!(fixtures.login.valid_credentials.username, "SamUser");
            assert_eq!(fixtures.login.valid_credentials.password, "Samuser123");
            assert!(!fixtures.login.invalid_credentials.is_empty());
            assert_eq!(fixtures.register.field_names.len(), 5);
            assert!(!fixtures.shipping.shipping_details.is_empty());
        }

        #[test]
        fn test_empty_cases_have_a_blank_field() {
            let fixtures = FixtureSet::builtin().unwrap();
            for case in fixtures.login.invalid_credentials.iter().filter(|c| c.is_empty_case()) {
                assert!(
                    case.username_blank() || case.password_blank(),
                    "{} has no blank field",
                    case.test_case
                );
            }
        }

        #[test]
        fn test_correct_details_for_replaces_username_only() {
            let fixtures = FixtureSet::builtin().unwrap();
            let fields = fixtures.register.correct_details_for("samtesterQx").unwrap();
            assert!(fields.contains(&FormField::text(USERNAME_FIELD, "samtesterQx")));
            assert_eq!(fields.len(), fixtures.register.correct_registration_details.len());
            assert_eq!(
                fixtures.register.correct_value(PASSWORD_FIELD).unwrap(),
                "Samtester123"
            );
        }
    }

    mod form_field_tests {
        use super::*;

        #[test]
        fn test_gender_key_becomes_choice() {
            let field: FormField =
                serde_json::from_str(r#"{"fieldName": "Gender", "gender": "Female"}"#).unwrap();
            assert_eq!(field, FormField::choice("Gender", "Female"));
            assert_eq!(field.label(), "Gender");
        }

        #[test]
        fn test_data_key_becomes_text() {
            let field: FormField =
                serde_json::from_str(r#"{"fieldName": "Last Name", "data": "User"}"#).unwrap();
            assert_eq!(field, FormField::text("Last Name", "User"));
        }

        #[test]
        fn test_field_without_value_rejected() {
            let err =
                serde_json::from_str::<FormField>(r#"{"fieldName": "Password"}"#).unwrap_err();
            assert!(err.to_string().contains("neither"));
        }

        #[test]
        fn test_choice_serializes_with_gender_key() {
            let json = serde_json::to_value(FormField::choice("Gender", "Male")).unwrap();
            assert_eq!(json, serde_json::json!({"fieldName": "Gender", "gender": "Male"}));
        }
    }

    mod credential_tests {
        use super::*;

        #[test]
        fn test_blank_detection_trims() {
            let case = Credentials {
                test_case: "Empty Username and Password".into(),
                username: " ".into(),
                password: "\t".into(),
            };
            assert!(case.is_empty_case());
            assert!(case.username_blank());
            assert!(case.password_blank());
        }
    }

    mod load_tests {
        use super::*;

        #[test]
        fn test_load_from_directory() {
            let dir = tempfile::tempdir().unwrap();
            let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
            for file in [LOGIN_FILE, REGISTER_FILE, SHIPPING_FILE] {
                std::fs::copy(src.join(file), dir.path().join(file)).unwrap();
            }
            let loaded = FixtureSet::load(dir.path()).unwrap();
            assert_eq!(loaded, FixtureSet::builtin().unwrap());
        }

        #[test]
        fn test_missing_file_names_path() {
            let dir = tempfile::tempdir().unwrap();
            let err = FixtureSet::load(dir.path()).unwrap_err();
            assert!(matches!(err, BookcartError::FixtureError { .. }));
            assert!(err.to_string().contains("loginData.json"));
        }

        #[test]
        fn test_malformed_file_names_file() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join(LOGIN_FILE), "{ not json").unwrap();
            let err = FixtureSet::load(dir.path()).unwrap_err();
            assert!(err.to_string().contains("loginData.json"));
        }
    }
}
