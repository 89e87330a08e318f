use crate::error::BookingError;

// ゲスト用のログイン情報。実際の認証基盤はない
#[derive(Clone, Debug, PartialEq)]
pub struct GuestAccount {
    email: String,
    password: String,
}

impl GuestAccount {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    pub fn get_email(&self) -> &str {
        &self.email
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<(), BookingError> {
        if self.email == email && self.password == password {
            Ok(())
        } else {
            Err(BookingError::InvalidCredentials)
        }
    }
}

#[test]
fn test_authenticate_正常系() {
    let account = GuestAccount::new("guest@example.com", "secret");
    assert_eq!(account.authenticate("guest@example.com", "secret"), Ok(()));
}

#[test]
fn test_authenticate_パスワード違いは異常系() {
    let account = GuestAccount::new("guest@example.com", "secret");
    let actual = account.authenticate("guest@example.com", "Secret");

    assert_eq!(actual, Err(BookingError::InvalidCredentials));
    assert_eq!(
        actual.unwrap_err().to_string(),
        "Invalid email or password"
    );
}
