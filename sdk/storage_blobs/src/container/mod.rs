pub mod operations;

use photostore_core::error::{Error, ErrorKind};

const RESERVED_CONTAINER_NAMES: [&str; 3] = ["$root", "$logs", "$web"];

/// Check a name against the service's container naming rules.
///
/// Names are 3 to 63 characters of lowercase letters, digits and single
/// hyphens, starting and ending with a letter or digit.
pub fn validate_container_name(name: &str) -> photostore_core::Result<()> {
    if RESERVED_CONTAINER_NAMES.contains(&name) {
        return Ok(());
    }

    let invalid = |reason: &str| {
        Error::message(
            ErrorKind::DataConversion,
            format!("invalid container name '{name}': {reason}"),
        )
    };

    if !(3..=63).contains(&name.len()) {
        return Err(invalid("must be 3 to 63 characters long"));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(invalid("only lowercase letters, digits and hyphens are allowed"));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(invalid("must start and end with a letter or digit"));
    }
    if name.contains("--") {
        return Err(invalid("consecutive hyphens are not allowed"));
    }
    Ok(())
}
