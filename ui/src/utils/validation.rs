//! CSS class and inline style helpers for validated controls.

pub fn field_class(has_error: bool) -> &'static str {
    if has_error {
        "input-field input-invalid"
    } else {
        "input-field"
    }
}

pub fn field_style(has_error: bool) -> &'static str {
    if has_error {
        "border: 2px solid #ef4444; background-color: #fef2f2;"
    } else {
        ""
    }
}

/// Basic email shape check: one `@`, non-empty local part, dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local_part = parts[0];
    let domain_part = parts[1];

    !local_part.is_empty() && domain_part.contains('.') && domain_part.len() > 2
}
