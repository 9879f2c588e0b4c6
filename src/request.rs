//! Queue submission requests.

use std::fmt;

/// Why a submission was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// Name or phone was blank after trimming.
    MissingField,
    /// Fewer than ten digits once everything else is stripped.
    InvalidPhone,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField => write!(f, "Please enter both name and phone."),
            Self::InvalidPhone => write!(f, "Please enter a valid phone number."),
        }
    }
}

impl std::error::Error for SubmitError {}

/// An accepted queue-join request: the venue plus the visitor's contact
/// details. Built at submission time, shown once, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRequest {
    pub service_name: String,
    pub name: String,
    pub phone: String,
}

impl QueueRequest {
    /// Validate a submission. Checks run in order and the first failure
    /// wins: blank name or phone after trimming, then a phone carrying
    /// fewer than ten digits. The phone keeps its original formatting.
    pub fn new(service_name: &str, name: &str, phone: &str) -> Result<Self, SubmitError> {
        let name = name.trim();
        let phone = phone.trim();

        if name.is_empty() || phone.is_empty() {
            return Err(SubmitError::MissingField);
        }

        let digits = phone.chars().filter(char::is_ascii_digit).count();
        if digits < 10 {
            return Err(SubmitError::InvalidPhone);
        }

        Ok(Self {
            service_name: service_name.to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
        })
    }

    /// Summary lines for the confirmation notice and the clipboard.
    pub fn details(&self) -> String {
        format!(
            "Service: {}\nName: {}\nPhone: {}",
            self.service_name, self.name, self.phone
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_formatted_phone_with_ten_digits() {
        let request = QueueRequest::new("Central Pharmacy", "Ana Reis", "(021) 555-01234").unwrap();
        assert_eq!(request.name, "Ana Reis");
        assert_eq!(request.phone, "(021) 555-01234");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let request = QueueRequest::new("Central Pharmacy", "  Ana Reis ", " 0215550123 ").unwrap();
        assert_eq!(request.name, "Ana Reis");
        assert_eq!(request.phone, "0215550123");
    }

    #[test]
    fn rejects_blank_name() {
        assert_eq!(
            QueueRequest::new("Central Pharmacy", "   ", "0215550123"),
            Err(SubmitError::MissingField)
        );
    }

    #[test]
    fn rejects_blank_phone() {
        assert_eq!(
            QueueRequest::new("Central Pharmacy", "Ana Reis", ""),
            Err(SubmitError::MissingField)
        );
    }

    #[test]
    fn missing_field_wins_over_phone_format() {
        // Both fields blank reports the missing fields, not the phone format.
        assert_eq!(
            QueueRequest::new("Central Pharmacy", "", ""),
            Err(SubmitError::MissingField)
        );
    }

    #[test]
    fn rejects_nine_digit_phone() {
        assert_eq!(
            QueueRequest::new("Central Pharmacy", "Ana Reis", "021-555-012"),
            Err(SubmitError::InvalidPhone)
        );
    }

    #[test]
    fn accepts_exactly_ten_digits() {
        assert!(QueueRequest::new("Central Pharmacy", "Ana Reis", "0215550123").is_ok());
    }

    #[test]
    fn rejects_letters_only_phone() {
        assert_eq!(
            QueueRequest::new("Central Pharmacy", "Ana Reis", "call me maybe"),
            Err(SubmitError::InvalidPhone)
        );
    }

    #[test]
    fn rejection_messages_read_like_prompts() {
        assert_eq!(
            SubmitError::MissingField.to_string(),
            "Please enter both name and phone."
        );
        assert_eq!(
            SubmitError::InvalidPhone.to_string(),
            "Please enter a valid phone number."
        );
    }
}
