use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::collections::HashMap;
use vetted::i18n::Locale;
use vetted::taiwan::*;
use vetted::validation::*;

fn bench_email_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("email_validation");
    let ctx = ValidationContext::for_locale(Locale::en());

    let valid_emails = vec![
        "user@example.com",
        "test.user+tag@domain.co.uk",
        "admin@subdomain.example.com",
    ];

    let invalid_emails = vec!["invalid-email", "@example.com", "user@"];

    let validator = EmailValidator::default();
    group.bench_function("valid_emails", |b| {
        b.iter(|| {
            for email in &valid_emails {
                validator
                    .validate_with(&black_box(*email).into(), &ctx)
                    .unwrap();
            }
        })
    });

    group.bench_function("invalid_emails", |b| {
        b.iter(|| {
            for email in &invalid_emails {
                let _ = validator.validate_with(&black_box(*email).into(), &ctx);
            }
        })
    });

    let business = EmailValidator::new(EmailOptions::default().business_only(true));
    group.bench_function("business_only", |b| {
        b.iter(|| business.validate_with(&black_box("someone@gmail.com").into(), &ctx))
    });

    group.finish();
}

fn bench_url_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("url_validation");
    let ctx = ValidationContext::for_locale(Locale::en());

    let valid_urls = vec![
        "https://example.com",
        "http://localhost:8080/path",
        "https://subdomain.example.com/path?query=value",
    ];

    let validator = UrlValidator::default();
    group.bench_function("validate_urls", |b| {
        b.iter(|| {
            for url in &valid_urls {
                validator.validate_with(&black_box(*url).into(), &ctx).unwrap();
            }
        })
    });

    group.finish();
}

fn bench_text_validators(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_validators");
    let ctx = ValidationContext::for_locale(Locale::en());

    let plain = TextValidator::new(TextOptions::default().min_length(5).max_length(50));
    group.bench_function("length", |b| {
        b.iter(|| plain.validate_with(&black_box("  Hello World 123  ").into(), &ctx))
    });

    let pattern = TextValidator::new(TextOptions::default().regex(r"^[A-Za-z ]+\d*$"));
    group.bench_function("pattern", |b| {
        b.iter(|| pattern.validate_with(&black_box("Hello World 123").into(), &ctx))
    });

    let password = PasswordValidator::new(
        PasswordOptions::default()
            .min_length(8)
            .no_sequential(true)
            .no_common_words(true)
            .min_strength(Strength::Strong),
    );
    group.bench_function("password", |b| {
        b.iter(|| password.validate_with(&black_box("Harbor#2024x").into(), &ctx))
    });

    group.finish();
}

fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("detection");

    let ids = vec![
        "550e8400-e29b-41d4-a716-446655440000",
        "507f1f77bcf86cd799439011",
        "01ARZ3NDEKTSV4RRFFQ69G5FAV",
        "175928847299117063",
    ];
    group.bench_function("detect_id_type", |b| {
        b.iter(|| {
            for id in &ids {
                black_box(detect_id_type(black_box(id)));
            }
        })
    });

    group.bench_function("detect_card_type", |b| {
        b.iter(|| detect_card_type(black_box("5555555555554444")))
    });

    group.bench_function("luhn_check", |b| {
        b.iter(|| luhn_check(black_box("4111111111111111")))
    });

    group.bench_function("detect_color_format", |b| {
        b.iter(|| detect_color_format(black_box("hsla(210, 50%, 40%, 0.5)")))
    });

    group.finish();
}

fn bench_taiwan_validators(c: &mut Criterion) {
    let mut group = c.benchmark_group("taiwan_validators");
    let ctx = ValidationContext::for_locale(Locale::en());

    group.bench_function("national_id", |b| {
        b.iter(|| is_valid_national_id(black_box("A123456789")))
    });

    group.bench_function("business_id", |b| {
        b.iter(|| is_valid_business_id(black_box("04595257")))
    });

    group.bench_function("tel", |b| b.iter(|| is_valid_tel(black_box("(049) 234-5678"))));

    let postal = PostalCodeValidator::new(PostalCodeOptions::default().strict_suffix_validation(true));
    group.bench_function("postal_code", |b| {
        b.iter(|| postal.validate_with(&black_box("106-001").into(), &ctx))
    });

    group.finish();
}

fn bench_validation_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation_builder");
    let ctx = ValidationContext::for_locale(Locale::en());

    let form = ValidationBuilder::new()
        .field("name", TextValidator::new(TextOptions::default().min_length(2)))
        .field("email", EmailValidator::default())
        .field("mobile", MobileValidator::default())
        .field("age", NumberValidator::new(NumberOptions::default().min(18.0)));

    let data: HashMap<String, Input> = HashMap::from([
        ("name".to_string(), Input::from("Ada")),
        ("email".to_string(), Input::from("ada@example.com")),
        ("mobile".to_string(), Input::from("0912-345-678")),
        ("age".to_string(), Input::from(36)),
    ]);

    group.bench_function("four_fields", |b| {
        b.iter(|| form.validate_with(black_box(&data), &ctx))
    });

    group.finish();
}

criterion_group!(
    validation_benches,
    bench_email_validation,
    bench_url_validation,
    bench_text_validators,
    bench_detection,
    bench_taiwan_validators,
    bench_validation_builder,
);

criterion_main!(validation_benches);
