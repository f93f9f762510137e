use tracing_subscriber::EnvFilter;

use crate::error::{SdkError, SdkResult};

/// Install a fmt subscriber filtered by `filter` (an `EnvFilter` directive
/// such as `"info,soul_registry=debug"`).
///
/// Returns `false` if a global subscriber was already installed; the
/// existing one is kept.
pub fn init_tracing(filter: &str) -> SdkResult<bool> {
    let filter = parse_filter(filter)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}

pub(crate) fn parse_filter(directive: &str) -> SdkResult<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| SdkError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let _ = init_tracing("warn").unwrap();
        assert!(!init_tracing("debug").unwrap());
    }

    #[test]
    fn rejects_bad_directive() {
        assert!(matches!(
            init_tracing("soul_registry=notalevel"),
            Err(SdkError::Telemetry(_))
        ));
    }
}
