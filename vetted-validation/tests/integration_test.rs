//! Integration tests for vetted-validation

use proptest::prelude::*;
use std::collections::HashMap;
use vetted_i18n::Locale;
use vetted_validation::taiwan::*;
use vetted_validation::*;

fn en() -> ValidationContext {
    ValidationContext::for_locale(Locale::en())
}

fn zh() -> ValidationContext {
    ValidationContext::for_locale(Locale::zh_tw())
}

#[test]
fn test_text_trim_invariance() {
    let validator = TextValidator::new(TextOptions::default().min_length(2).max_length(5));
    for raw in ["  abc", "abc  ", "\tabc\n", "abc"] {
        assert_eq!(
            validator.validate_with(&raw.into(), &en()),
            Ok(Some("abc".to_string()))
        );
    }
}

#[test]
fn test_email_business_only() {
    let validator = EmailValidator::new(EmailOptions::default().business_only(true));

    let error = validator
        .validate_with(&"someone@gmail.com".into(), &en())
        .unwrap_err();
    assert_eq!(error.code, "businessOnly");
    assert_eq!(error.key(), "email.businessOnly");
    assert!(error.message.contains("gmail.com"));

    assert_eq!(
        validator.validate_with(&"Someone@Acme.com.tw".into(), &en()),
        Ok(Some("someone@acme.com.tw".to_string()))
    );
}

#[test]
fn test_messages_follow_context_locale() {
    let validator = TextValidator::new(TextOptions::default().min_length(3));

    let english = validator.validate_with(&"ab".into(), &en()).unwrap_err();
    let chinese = validator.validate_with(&"ab".into(), &zh()).unwrap_err();

    assert_eq!(english.code, chinese.code);
    assert_ne!(english.message, chinese.message);
    assert!(english.message.contains('3'));
    assert!(chinese.message.contains('3'));
}

#[test]
fn test_unknown_locale_falls_back_to_key() {
    let fr = ValidationContext::for_locale(Locale::parse("fr").unwrap());
    let validator = TextValidator::new(TextOptions::default().min_length(3));

    let error = validator.validate_with(&"ab".into(), &fr).unwrap_err();
    assert_eq!(error.message, "text.min");
}

#[test]
fn test_override_by_language() {
    let validator = TextValidator::new(
        TextOptions::default()
            .min_length(3)
            .message("zh", "min", "最少 ${min} 字"),
    );

    let error = validator.validate_with(&"ab".into(), &zh()).unwrap_err();
    assert_eq!(error.message, "最少 3 字");

    let english = validator.validate_with(&"ab".into(), &en()).unwrap_err();
    assert_ne!(english.message, "最少 3 字");
}

#[test]
fn test_national_id() {
    assert!(is_valid_national_id("A123456789"));
    assert!(!is_valid_national_id("A123456788"));
    assert!(!is_valid_national_id("a12345678"));

    let validator = NationalIdValidator::default();
    assert_eq!(
        validator.validate_with(&" a123456789 ".into(), &en()),
        Ok(Some("A123456789".to_string()))
    );
    assert_eq!(
        validator
            .validate_with(&"A123456788".into(), &en())
            .unwrap_err()
            .code,
        "checksum"
    );
}

#[test]
fn test_business_id_seventh_digit_rule() {
    assert!(is_valid_business_id("04595257"));
    assert!(is_valid_business_id("00000074"));
    assert!(!is_valid_business_id("00000084"));
    assert!(!is_valid_business_id("0459525"));
}

#[test]
fn test_postal_code_strictness() {
    let strict = PostalCodeValidator::default();
    let loose = PostalCodeValidator::new(PostalCodeOptions::default().strict_validation(false));

    assert_eq!(
        strict.validate_with(&"101".into(), &en()).unwrap_err().code,
        "invalidPrefix"
    );
    assert_eq!(
        loose.validate_with(&"101".into(), &en()),
        Ok(Some("101".to_string()))
    );
    assert!(strict.validate_with(&"106-001".into(), &en()).is_ok());
}

#[test]
fn test_landline_subscriber_rule() {
    assert!(is_valid_tel("0223456789"));
    assert!(!is_valid_tel("0213456789"));

    let error = TelValidator::default()
        .validate_with(&"0213456789".into(), &en())
        .unwrap_err();
    assert_eq!(error.code, "format");
    assert_eq!(error.param("areaCode"), Some("02"));
}

#[test]
fn test_uuid_is_not_shortid() {
    let uuid = "550e8400-e29b-41d4-a716-446655440000";
    assert_eq!(detect_id_type(uuid), Some(IdKind::Uuid));

    let auto = IdValidator::default();
    assert_eq!(
        auto.validate_with(&uuid.into(), &en()),
        Ok(Some(uuid.to_string()))
    );
}

#[test]
fn test_optional_fields_accept_empty() {
    let ctx = en();
    let empty = Input::from("   ");

    assert_eq!(
        EmailValidator::new(EmailOptions::default().required(false)).validate_with(&empty, &ctx),
        Ok(None)
    );
    assert_eq!(
        MobileValidator::new(MobileOptions::default().required(false)).validate_with(&empty, &ctx),
        Ok(None)
    );
    assert_eq!(
        UrlValidator::new(UrlOptions::default().required(false)).validate_with(&Input::Null, &ctx),
        Ok(None)
    );
    assert_eq!(
        TelValidator::default()
            .validate_with(&empty, &ctx)
            .unwrap_err()
            .code,
        "required"
    );
}

#[test]
fn test_options_from_json() {
    let options: EmailOptions =
        serde_json::from_str(r#"{"businessOnly": true, "required": false}"#).unwrap();
    let validator = EmailValidator::new(options);

    assert_eq!(validator.validate_with(&"".into(), &en()), Ok(None));
    assert_eq!(
        validator
            .validate_with(&"a@gmail.com".into(), &en())
            .unwrap_err()
            .code,
        "businessOnly"
    );

    let postal: PostalCodeOptions =
        serde_json::from_str(r#"{"format": "all", "strictValidation": false}"#).unwrap();
    assert_eq!(postal.format, PostalFormat::All);
    assert!(!postal.strict_validation);
}

#[test]
fn test_form_validation() {
    let form = ValidationBuilder::new()
        .field("email", EmailValidator::default())
        .field("mobile", MobileValidator::default())
        .field("postal", PostalCodeValidator::default())
        .field("nickname", TextValidator::new(TextOptions::default().required(false)));

    let mut data = HashMap::new();
    data.insert("email".to_string(), Input::from(" Ada@Example.com "));
    data.insert("mobile".to_string(), Input::from("0912-345-678"));
    data.insert("postal".to_string(), Input::from("106-001"));

    let values = form.validate_with(&data, &en()).unwrap();
    assert_eq!(values.get("email"), Some(&Input::from("ada@example.com")));
    assert_eq!(values.get("mobile"), Some(&Input::from("0912345678")));
    assert_eq!(values.get("postal"), Some(&Input::from("106001")));
    assert_eq!(values.get("nickname"), Some(&Input::Null));

    data.insert("mobile".to_string(), Input::from("0812-345-678"));
    data.remove("email");
    let errors = form.validate_with(&data, &en()).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.get("email").map(|e| e.code), Some("required"));
    assert_eq!(errors.get("mobile").map(|e| e.code), Some("invalid"));
    assert_eq!(errors.get("mobile").and_then(|e| e.field.as_deref()), Some("mobile"));
}

#[test]
fn test_error_json_shape() {
    let error = NumberValidator::new(NumberOptions::default().min(10.0))
        .validate_with(&Input::from(3), &en())
        .unwrap_err();
    let json = error.to_json();
    assert_eq!(json["code"], "min");
    assert_eq!(json["key"], "number.min");
    assert_eq!(json["params"]["min"], "10");
}

proptest! {
    #[test]
    fn prop_mobile_is_idempotent(rest in "[0-9]{8}") {
        let raw = format!("09{}-{}", &rest[..2], &rest[2..]);
        let validator = MobileValidator::default();
        let first = validator.validate_with(&raw.as_str().into(), &en()).unwrap().unwrap();
        let second = validator.validate_with(&first.as_str().into(), &en()).unwrap().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_business_id_checks_digits_only(s in "[A-Za-z]{8}") {
        prop_assert!(!is_valid_business_id(&s));
    }

    #[test]
    fn prop_padding_never_changes_outcome(id in "[A-Z][12][0-9]{8}", pad in " {0,3}") {
        let validator = NationalIdValidator::default();
        let padded = format!("{pad}{id}{pad}");
        prop_assert_eq!(
            validator.validate_with(&padded.as_str().into(), &en()),
            validator.validate_with(&id.as_str().into(), &en())
        );
    }
}
