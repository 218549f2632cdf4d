#[cfg(test)]
mod tests {
    use super::super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_usable() {
        let config = SoapConfig::default();
        assert_eq!(config.lexicon.source, "embedded");
        assert!(config.cache.enabled);
        assert!(config.cache.capacity > 0);
        assert!(config.batch.parallel_threshold > 0);
        assert!(config.splitter.abbreviations.contains(&"dr.".to_string()));
    }

    #[test]
    fn test_default_lexicon_resolves_to_embedded_set() {
        let entries = SoapConfig::default().lexicon_entries().expect("entries");
        assert!(!entries.is_empty());
        assert!(entries
            .iter()
            .any(|e| e.phrase_key() == "no acute distress"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "[cache]\ncapacity = 8\n").expect("write");

        let config =
            SoapConfig::load_from(file.path().to_str().expect("path")).expect("load");
        assert_eq!(config.cache.capacity, 8);
        assert!(config.cache.enabled, "unset field keeps its default");
        assert_eq!(config.lexicon.source, "embedded");
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "[cache\ncapacity = ").expect("write");

        let err = SoapConfig::load_from(file.path().to_str().expect("path"))
            .expect_err("malformed file must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = SoapConfig::load_from("/nonexistent/soapstone.toml")
            .expect_err("missing file must fail");
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_capacity_override_parses() {
        let mut config = SoapConfig::default();
        config.apply_capacity_override(" 512 ").expect("valid override");
        assert_eq!(config.cache.capacity, 512);

        let err = config
            .apply_capacity_override("lots")
            .expect_err("non-numeric override must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_lexicon_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"[
                {{"phrase": "reports", "section": "subjective"}},
                {{"phrase": "No Acute Distress", "section": "A", "priority": 6}}
            ]"#
        )
        .expect("write");

        let entries =
            load_lexicon_file(file.path().to_str().expect("path")).expect("load");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, SectionLabel::Subjective);
        assert_eq!(entries[0].priority, 4, "priority defaults when omitted");
        assert_eq!(entries[1].label, SectionLabel::Assessment);
        assert_eq!(entries[1].phrase_key(), "no acute distress");
    }

    #[test]
    fn test_lexicon_file_rejects_unclassified_target() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"[{{"phrase": "noise", "section": "unclassified"}}]"#
        )
        .expect("write");

        let err = load_lexicon_file(file.path().to_str().expect("path"))
            .expect_err("unclassified target must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_file_source_without_path_fails() {
        let mut config = SoapConfig::default();
        config.lexicon.source = "file".to_string();
        config.lexicon.path = None;
        let err = config.lexicon_entries().expect_err("path is required");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
