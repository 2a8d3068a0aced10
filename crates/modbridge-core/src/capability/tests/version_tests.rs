use crate::capability::version::{parse_module_version, VersionBounds, VersionRange};
use crate::capability::VersionError;
use semver::Version;

#[test]
fn test_parse_module_version_lenient_forms() {
    assert_eq!(parse_module_version("2.11.6").unwrap(), Version::new(2, 11, 6));
    assert_eq!(parse_module_version("v7.2").unwrap(), Version::new(7, 2, 0));
    assert_eq!(parse_module_version("4").unwrap(), Version::new(4, 0, 0));
    assert_eq!(parse_module_version(" 1.21.42 ").unwrap(), Version::new(1, 21, 42));

    let snapshot = parse_module_version("4.0.0-SNAPSHOT").unwrap();
    assert_eq!((snapshot.major, snapshot.minor, snapshot.patch), (4, 0, 0));
    assert_eq!(snapshot.pre.as_str(), "SNAPSHOT");

    let short_snapshot = parse_module_version("2.11-SNAPSHOT").unwrap();
    assert_eq!((short_snapshot.major, short_snapshot.minor), (2, 11));
}

#[test]
fn test_parse_module_version_rejects_garbage() {
    assert!(matches!(parse_module_version("latest"), Err(VersionError::Invalid { .. })));
    assert!(parse_module_version("").is_err());
}

#[test]
fn test_bounds_are_inclusive() {
    let bounds = VersionBounds::parse(Some("2.10"), Some("2.11.6")).unwrap();
    assert!(bounds.contains(&Version::new(2, 10, 0)));
    assert!(bounds.contains(&Version::new(2, 11, 6)));
    assert!(!bounds.contains(&Version::new(2, 11, 7)));
    assert!(!bounds.contains(&Version::new(2, 9, 9)));
    assert_eq!(bounds.to_string(), ">=2.10.0, <=2.11.6");
}

#[test]
fn test_open_bounds() {
    let any = VersionBounds::any();
    assert!(any.contains(&Version::new(0, 0, 1)));
    assert_eq!(any.to_string(), "any");

    let min_only = VersionBounds::parse(Some("7"), None).unwrap();
    assert!(min_only.contains(&Version::new(99, 0, 0)));
    assert!(!min_only.contains(&Version::new(6, 9, 0)));
}

#[test]
fn test_inverted_bounds_rejected() {
    let result = VersionBounds::parse(Some("3.0.0"), Some("2.0.0"));
    assert!(matches!(result, Err(VersionError::InvertedBounds { .. })));
}

#[test]
fn test_version_range_ignores_prerelease() {
    let range = VersionRange::from_constraint("^4").unwrap();
    assert!(range.includes(&parse_module_version("4.0.0-SNAPSHOT").unwrap()));
    assert!(range.includes(&Version::new(4, 3, 1)));
    assert!(!range.includes(&Version::new(3, 9, 0)));
    assert_eq!(range.to_string(), "^4");
}

#[test]
fn test_version_range_parse_error() {
    assert!(matches!("not a range".parse::<VersionRange>(), Err(VersionError::InvalidConstraint { .. })));
}
