use uuid::Uuid;

pub type Id = String;

/// Identifiers are assigned once, at creation, and never change afterwards.
pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}

/// Trim a required text field and check it against its length bound.
///
/// Returns the trimmed value, or the message describing why it was rejected.
pub(crate) fn required_text(
    value: Option<&str>,
    label: &str,
    max_len: usize,
) -> Result<String, String> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(format!("must provide {}", label));
    }
    if trimmed.chars().count() > max_len {
        return Err(format!(
            "{} can not be more than {} characters",
            label, max_len
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn required_text_trims_and_bounds() {
        assert_eq!(required_text(Some("  milk "), "name", 10), Ok("milk".to_string()));
        assert_eq!(
            required_text(None, "name", 10),
            Err("must provide name".to_string())
        );
        assert_eq!(
            required_text(Some("   "), "name", 10),
            Err("must provide name".to_string())
        );
        assert_eq!(
            required_text(Some("abcdefghijk"), "name", 10),
            Err("name can not be more than 10 characters".to_string())
        );
        // Length counts characters, not bytes
        assert!(required_text(Some("ééééé"), "name", 5).is_ok());
    }
}
