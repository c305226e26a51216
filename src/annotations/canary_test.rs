use super::*;
use crate::resolver::{MockResolver, OfflineResolver};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

fn annotations(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (format!("nginx.ingress.kubernetes.io/{}", k), v.to_string()))
        .collect()
}

fn build_ingress(pairs: &[(&str, &str)]) -> Ingress {
    Ingress {
        metadata: ObjectMeta {
            name: Some("foo".to_string()),
            namespace: Some("default".to_string()),
            annotations: Some(annotations(pairs)),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn parser() -> Canary {
    Canary::new(Arc::new(OfflineResolver))
}

#[test]
fn test_enabled_with_weight() {
    let config = parser()
        .parse_annotations(&annotations(&[("canary", "true"), ("canary-weight", "20")]))
        .unwrap();

    assert_eq!(
        config,
        Config {
            enabled: true,
            weight: 20,
            header: String::new(),
            cookie: String::new(),
        }
    );
}

#[test]
fn test_disabled_without_fields() {
    let config = parser()
        .parse_annotations(&annotations(&[("canary", "false")]))
        .unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn test_disabled_with_weight_is_invalid() {
    let err = parser()
        .parse_annotations(&annotations(&[("canary", "false"), ("canary-weight", "20")]))
        .unwrap_err();

    assert!(err.is_invalid_configuration(), "got {:?}", err);
}

#[test]
fn test_disabled_with_zero_weight_is_valid() {
    let config = parser()
        .parse_annotations(&annotations(&[("canary", "false"), ("canary-weight", "0")]))
        .unwrap();

    assert!(!config.enabled);
    assert_eq!(config.weight, 0);
}

#[test]
fn test_disabled_with_header_or_cookie_is_invalid() {
    for (key, value) in [("canary-by-header", "X-Canary"), ("canary-by-cookie", "canary")] {
        let err = parser()
            .parse_annotations(&annotations(&[("canary", "false"), (key, value)]))
            .unwrap_err();
        assert!(err.is_invalid_configuration(), "{}: got {:?}", key, err);
    }
}

#[test]
fn test_enabled_with_header() {
    let config = parser()
        .parse_annotations(&annotations(&[
            ("canary", "true"),
            ("canary-by-header", "X-Canary"),
        ]))
        .unwrap();

    assert_eq!(
        config,
        Config {
            enabled: true,
            weight: 0,
            header: "X-Canary".to_string(),
            cookie: String::new(),
        }
    );
}

#[test]
fn test_enabled_with_all_fields() {
    let config = parser()
        .parse_annotations(&annotations(&[
            ("canary", "true"),
            ("canary-weight", "100"),
            ("canary-by-header", "X-Canary"),
            ("canary-by-cookie", "use_canary"),
        ]))
        .unwrap();

    assert!(config.enabled);
    assert_eq!(config.weight, 100);
    assert_eq!(config.header, "X-Canary");
    assert_eq!(config.cookie, "use_canary");
}

#[test]
fn test_missing_canary_is_not_present() {
    let err = parser().parse_annotations(&BTreeMap::new()).unwrap_err();
    assert!(err.is_missing());

    // Other canary annotations do not make the feature present
    let err = parser()
        .parse_annotations(&annotations(&[
            ("canary-weight", "20"),
            ("canary-by-header", "X-Canary"),
        ]))
        .unwrap_err();
    assert_eq!(
        err,
        AnnotationError::missing("nginx.ingress.kubernetes.io/canary")
    );
}

#[test]
fn test_malformed_values() {
    let cases = [
        vec![("canary", "yes")],
        vec![("canary", "true"), ("canary-weight", "abc")],
        vec![("canary", "true"), ("canary-weight", "12.5")],
        vec![("canary", "false"), ("canary-weight", "")],
    ];

    for pairs in cases {
        let err = parser().parse_annotations(&annotations(&pairs)).unwrap_err();
        assert!(err.is_invalid_content(), "{:?}: got {:?}", pairs, err);
    }
}

#[test]
fn test_empty_header_or_cookie_is_invalid_content() {
    for enabled in ["true", "false"] {
        for key in ["canary-by-header", "canary-by-cookie"] {
            let err = parser()
                .parse_annotations(&annotations(&[("canary", enabled), (key, "")]))
                .unwrap_err();
            assert!(err.is_invalid_content(), "{} {}: got {:?}", enabled, key, err);
        }
    }
}

#[test]
fn test_weight_out_of_range_is_invalid() {
    for weight in ["101", "-1"] {
        let err = parser()
            .parse_annotations(&annotations(&[("canary", "true"), ("canary-weight", weight)]))
            .unwrap_err();
        assert!(err.is_invalid_configuration(), "{}: got {:?}", weight, err);
    }

    // A negative weight is not a "set" field, but it is still out of range
    let err = parser()
        .parse_annotations(&annotations(&[("canary", "false"), ("canary-weight", "-5")]))
        .unwrap_err();
    assert!(err.is_invalid_configuration());
}

#[test]
fn test_annotations_table() {
    struct Case {
        title: &'static str,
        enabled: bool,
        weight: i32,
        exp_err: bool,
    }

    let cases = [
        Case {
            title: "canary disabled and no weight",
            enabled: false,
            weight: 0,
            exp_err: false,
        },
        Case {
            title: "canary disabled and weight",
            enabled: false,
            weight: 20,
            exp_err: true,
        },
        Case {
            title: "canary enabled and weight",
            enabled: true,
            weight: 20,
            exp_err: false,
        },
        Case {
            title: "canary enabled and no weight",
            enabled: true,
            weight: 0,
            exp_err: false,
        },
    ];

    for case in cases {
        let enabled = case.enabled.to_string();
        let weight = case.weight.to_string();
        let ing = build_ingress(&[
            ("canary", enabled.as_str()),
            ("canary-weight", weight.as_str()),
        ]);

        let result = parser().parse(&ing);
        if case.exp_err {
            assert!(result.is_err(), "{}: expected error", case.title);
            continue;
        }

        let parsed = result.unwrap_or_else(|e| panic!("{}: unexpected error {}", case.title, e));
        let config = parsed
            .downcast_ref::<Config>()
            .unwrap_or_else(|| panic!("{}: expected a canary Config", case.title));
        assert_eq!(config.enabled, case.enabled, "{}", case.title);
        assert_eq!(config.weight, case.weight, "{}", case.title);
    }
}

#[test]
fn test_parse_ingress_without_annotations() {
    let ing = Ingress {
        metadata: ObjectMeta {
            name: Some("foo".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    let err = parser().parse(&ing).unwrap_err();
    assert!(err.is_missing());
}

#[test]
fn test_parse_is_idempotent() {
    let canary = parser();
    let anns = annotations(&[
        ("canary", "true"),
        ("canary-weight", "35"),
        ("canary-by-cookie", "beta"),
    ]);

    let first = canary.parse_annotations(&anns);
    let second = canary.parse_annotations(&anns);
    assert_eq!(first, second);

    let bad = annotations(&[("canary", "false"), ("canary-by-cookie", "beta")]);
    assert_eq!(
        canary.parse_annotations(&bad),
        canary.parse_annotations(&bad)
    );
}

#[test]
fn test_custom_prefix_reader() {
    let canary = Canary::with_reader(
        Arc::new(OfflineResolver),
        PrefixedReader::new("canary.example.com"),
    );

    let mut anns = BTreeMap::new();
    anns.insert("canary.example.com/canary".to_string(), "true".to_string());
    anns.insert("canary.example.com/canary-weight".to_string(), "5".to_string());
    // Default-prefix keys are ignored by this reader
    anns.insert(
        "nginx.ingress.kubernetes.io/canary-weight".to_string(),
        "90".to_string(),
    );

    let config = canary.parse_annotations(&anns).unwrap();
    assert!(config.enabled);
    assert_eq!(config.weight, 5);
    assert_eq!(canary.reader().prefix(), "canary.example.com");
}

#[test]
fn test_handler_keeps_injected_resolver() {
    let mut resolver = MockResolver::default();
    resolver.secrets.insert(
        "default/canary-tls".to_string(),
        Secret {
            metadata: ObjectMeta {
                name: Some("canary-tls".to_string()),
                ..Default::default()
            },
            ..Default::default()
        },
    );

    let canary = Canary::new(Arc::new(resolver));
    let secret = canary.resolver().get_secret("default/canary-tls").unwrap();
    assert_eq!(secret.metadata.name.as_deref(), Some("canary-tls"));
    assert_eq!(canary.name(), "canary");
}

#[test]
fn test_validate_config() {
    assert!(validate_config(&Config::default()).is_ok());
    assert!(validate_config(&Config {
        enabled: true,
        weight: 50,
        header: "X-Canary".to_string(),
        cookie: "canary".to_string(),
    })
    .is_ok());
    assert!(validate_config(&Config {
        enabled: false,
        weight: 0,
        header: String::new(),
        cookie: "canary".to_string(),
    })
    .unwrap_err()
    .is_invalid_configuration());
}

#[test]
fn test_config_serializes_field_names() {
    let config = Config {
        enabled: true,
        weight: 20,
        header: "X-Canary".to_string(),
        cookie: String::new(),
    };

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "enabled": true,
            "weight": 20,
            "header": "X-Canary",
            "cookie": ""
        })
    );
}

#[tokio::test]
async fn test_concurrent_parses_agree() {
    let canary = Arc::new(parser());
    let anns = Arc::new(annotations(&[
        ("canary", "true"),
        ("canary-weight", "10"),
        ("canary-by-header", "X-Canary"),
    ]));

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..32 {
        let canary = canary.clone();
        let anns = anns.clone();
        tasks.spawn(async move { canary.parse_annotations(&anns) });
    }

    let expected = canary.parse_annotations(&anns).unwrap();
    while let Some(result) = tasks.join_next().await {
        assert_eq!(result.unwrap().unwrap(), expected);
    }
}
