/*!
 * Tests for the optional stderr logger
 */

use ytcaptions::app_config::LogLevel;
use ytcaptions::logging;

#[test]
fn test_logging_init_calledTwice_shouldFailWithoutPanicking() {
    // Another test may already have installed a logger; only the second call is certain to fail
    let _ = logging::init(LogLevel::Debug);
    assert!(logging::init(LogLevel::Info).is_err());
    log::debug!("logger is installed");
}
