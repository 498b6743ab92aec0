// src/config/validate.rs

use tracing::debug;

use crate::config::decode::decode_all;
use crate::config::model::{ProvisionerSettings, ResourceConfig};
use crate::errors::{ProvisionerError, Result};

/// Check a resource configuration without running anything.
///
/// Returns `(warnings, errors)`. Decoding problems are all reported
/// together; if decoding succeeds, the required `directory` and `target`
/// fields are checked. No warnings are produced at the moment.
pub fn validate(config: &ResourceConfig) -> (Vec<String>, Vec<ProvisionerError>) {
    let warnings: Vec<String> = Vec::new();
    let mut errors = Vec::new();

    match decode_all(config) {
        Err(problems) => {
            errors.extend(problems.into_iter().map(ProvisionerError::from));
        }
        Ok(request) => {
            if request.directory.as_os_str().is_empty() {
                errors.push(ProvisionerError::RequiredField("directory"));
            }
            if request.target.is_empty() {
                errors.push(ProvisionerError::RequiredField("target"));
            }
        }
    }

    debug!(
        warnings = warnings.len(),
        errors = errors.len(),
        "validated resource configuration"
    );

    (warnings, errors)
}

/// Sanity checks for provisioner settings.
pub fn validate_settings(settings: &ProvisionerSettings) -> Result<()> {
    if settings.program.trim().is_empty() {
        return Err(ProvisionerError::Settings(
            "program must not be empty".to_string(),
        ));
    }

    if settings.capture_limit == 0 {
        return Err(ProvisionerError::Settings(
            "capture_limit must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DecodeError;

    fn resource(src: &str) -> ResourceConfig {
        ResourceConfig::from_raw(toml::from_str(src).unwrap())
    }

    #[test]
    fn complete_config_has_no_problems() {
        let (warnings, errors) = validate(&resource(
            "directory = \"~/infrastructure\"\ntarget = \"provision\"\n[[variables]]\nfoo = \"bar\"",
        ));
        assert!(warnings.is_empty());
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn empty_config_reports_both_required_fields() {
        let (warnings, errors) = validate(&ResourceConfig::default());

        assert!(warnings.is_empty());
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ProvisionerError::RequiredField("directory")));
        assert!(matches!(errors[1], ProvisionerError::RequiredField("target")));
    }

    #[test]
    fn decode_problems_are_all_reported() {
        let (_, errors) = validate(&resource("nope = 1\nalso_nope = 2\ntarget = \"x\""));

        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(
            e,
            ProvisionerError::Decode(DecodeError::UnknownField(_))
        )));
    }

    #[test]
    fn settings_reject_zero_capture_limit() {
        let settings = ProvisionerSettings {
            capture_limit: 0,
            ..ProvisionerSettings::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(ProvisionerError::Settings(_))
        ));
    }

    #[test]
    fn settings_reject_blank_program() {
        let settings = ProvisionerSettings {
            program: "  ".to_string(),
            ..ProvisionerSettings::default()
        };
        assert!(validate_settings(&settings).is_err());
        assert!(validate_settings(&ProvisionerSettings::default()).is_ok());
    }
}
