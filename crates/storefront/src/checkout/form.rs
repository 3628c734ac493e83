//! Checkout form and its validation.

use airshop_core::Email;

use crate::api::{Customer, Delivery};

/// Contact and delivery details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub telegram: Option<String>,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub comment: Option<String>,
}

/// One invalid form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in a [`CheckoutForm`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    /// Whether `field` has an error.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl CheckoutForm {
    /// Check required fields and the email address.
    ///
    /// # Errors
    ///
    /// Returns every invalid field at once.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();

        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("zip_code", &self.zip_code),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(field, "is required");
            }
        }

        if !errors.has("email")
            && let Err(e) = Email::parse(&self.email)
        {
            errors.push("email", e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Customer block of the order request.
    #[must_use]
    pub fn customer(&self) -> Customer {
        Customer {
            name: format!("{} {}", self.first_name.trim(), self.last_name.trim()),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            telegram: non_blank(self.telegram.as_deref()),
        }
    }

    /// Delivery block of the order request.
    #[must_use]
    pub fn delivery(&self) -> Delivery {
        Delivery {
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            zipcode: self.zip_code.trim().to_string(),
        }
    }

    /// Order comment, empty when none was given.
    #[must_use]
    pub fn comment(&self) -> String {
        non_blank(self.comment.as_deref()).unwrap_or_default()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn valid_form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Анна".to_string(),
            last_name: "Иванова".to_string(),
            email: "anna@example.ru".to_string(),
            phone: "+7 999 000-00-00".to_string(),
            telegram: Some("  ".to_string()),
            address: "ул. Тверская, 1".to_string(),
            city: "Москва".to_string(),
            zip_code: "101000".to_string(),
            comment: None,
        }
    }

    #[test]
    fn test_valid_form() {
        let form = valid_form();
        assert!(form.validate().is_ok());

        let customer = form.customer();
        assert_eq!(customer.name, "Анна Иванова");
        assert_eq!(customer.telegram, None);
        assert_eq!(form.delivery().zipcode, "101000");
        assert_eq!(form.comment(), "");
    }

    #[test]
    fn test_reports_every_missing_field() {
        let form = CheckoutForm {
            city: " ".to_string(),
            phone: String::new(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("city"));
        assert!(errors.has("phone"));
        assert!(!errors.has("email"));
        assert_eq!(errors.0.len(), 2);
        assert_eq!(errors.to_string(), "phone: is required; city: is required");
    }

    #[test]
    fn test_rejects_bad_email() {
        let form = CheckoutForm {
            email: "anna.example.ru".to_string(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("email"));
        assert_eq!(errors.0.len(), 1);
    }
}
