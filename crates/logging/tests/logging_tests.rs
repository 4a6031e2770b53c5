//! # Logging Tests
//!
//! Public surface of the logging crate.

mod logging_config_tests {
    use logging::{LogFormat, LoggingConfig};

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.environment, "development");
        assert!(config.include_timestamp);
    }

    #[test]
    fn test_format_round_trip_through_display() {
        for format in [LogFormat::Json, LogFormat::Pretty, LogFormat::Compact] {
            assert_eq!(format.to_string().parse::<LogFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_build_each_format() {
        for format in [LogFormat::Json, LogFormat::Pretty, LogFormat::Compact] {
            for include_timestamp in [true, false] {
                let config = LoggingConfig {
                    format,
                    include_timestamp,
                    ..Default::default()
                };
                let (_subscriber, _guard) = config.build();
            }
        }
    }
}

mod request_id_tests {
    use logging::RequestId;

    #[test]
    fn test_request_id_uniqueness() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();
        assert_ne!(id1, id2, "Request IDs should be unique");
    }

    #[test]
    fn test_generated_id_parses_back() {
        let id = RequestId::new();
        let parsed: RequestId = id.as_str().parse().unwrap();
        assert_eq!(parsed, id);
    }
}

mod macro_tests {
    #[test]
    fn test_macros_expand() {
        logging::log_api_request!("req", "GET", "/health", 200, 1);
        logging::log_auth_event!("login", 1, true);
        logging::log_shift_event!("break_booked", 3, 1, "12:00-12:30");
    }
}
