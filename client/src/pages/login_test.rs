use super::*;

#[test]
fn login_input_trims_email_only() {
    assert_eq!(
        login_input("  ada@example.com ", " secret "),
        Ok(("ada@example.com".to_owned(), " secret ".to_owned()))
    );
}

#[test]
fn login_input_reports_first_problem() {
    assert_eq!(login_input("", "secret"), Err(ValidationError::EmailRequired));
    assert_eq!(login_input("ada@example.com", ""), Err(ValidationError::PasswordRequired));
    assert_eq!(login_input("not-an-email", "secret"), Err(ValidationError::EmailInvalid));
}
