// tests/validate_behaviour.rs

use std::io::Write;

use makefile_provisioner::Provisioner;
use makefile_provisioner::config::{ProvisionerSettings, load_and_validate};
use makefile_provisioner::errors::{DecodeError, ProvisionerError};
use makefile_provisioner_test_utils::builders::ResourceConfigBuilder;
use tempfile::NamedTempFile;
use toml::Value;

fn provisioner() -> Provisioner {
    Provisioner::new(ProvisionerSettings::default()).unwrap()
}

#[test]
fn good_config_has_no_warnings_or_errors() {
    let config = ResourceConfigBuilder::valid("~/infrastructure", "provision")
        .variables(&[("foo", "bar")])
        .build();

    let (warnings, errors) = provisioner().validate(&config);

    assert!(warnings.is_empty(), "Warnings: {warnings:?}");
    assert!(errors.is_empty(), "Errors: {errors:?}");
}

#[test]
fn missing_config_reports_errors() {
    let (warnings, errors) = provisioner().validate(&ResourceConfigBuilder::new().build());

    assert!(warnings.is_empty());
    assert!(!errors.is_empty());
}

#[test]
fn removing_either_required_field_is_reported() {
    for missing in ["directory", "target"] {
        let config = ResourceConfigBuilder::valid("/srv/app", "all")
            .without(missing)
            .build();

        let (warnings, errors) = provisioner().validate(&config);

        assert!(warnings.is_empty());
        assert_eq!(errors.len(), 1, "missing {missing}: {errors:?}");
        assert_eq!(errors[0].to_string(), format!("a {missing} is required"));
    }
}

#[test]
fn empty_strings_count_as_missing() {
    let config = ResourceConfigBuilder::valid("", "").build();

    let (_, errors) = provisioner().validate(&config);

    assert_eq!(errors.len(), 2);
}

#[test]
fn shape_problems_are_collected_together() {
    let config = ResourceConfigBuilder::valid("/srv/app", "all")
        .value("shell", Value::String("bash".to_string()))
        .value("variables", Value::Array(vec![]))
        .value("target", Value::Array(vec![Value::Integer(1)]))
        .build();

    let (warnings, errors) = provisioner().validate(&config);

    assert!(warnings.is_empty());
    assert_eq!(errors.len(), 3, "{errors:?}");
    let decode_errors: Vec<&DecodeError> = errors
        .iter()
        .filter_map(|e| match e {
            ProvisionerError::Decode(d) => Some(d),
            _ => None,
        })
        .collect();
    assert!(decode_errors.contains(&&DecodeError::UnknownField("shell".to_string())));
    assert!(decode_errors.contains(&&DecodeError::MalformedVariables { len: 0 }));
    assert!(decode_errors.iter().any(|e| matches!(
        e,
        DecodeError::TypeMismatch { field, .. } if field == "target"
    )));
}

#[test]
fn provisioner_file_round_trips_into_a_valid_config() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
directory = "/srv/app"
target = "provision"

[[variables]]
region = "eu-west-1"
replicas = 3
"#
    )
    .unwrap();

    let loaded = load_and_validate(file.path()).unwrap();
    let (warnings, errors) = provisioner().validate(&loaded.resource_config());

    assert!(warnings.is_empty());
    assert!(errors.is_empty(), "{errors:?}");
}
