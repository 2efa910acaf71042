//! Password strength scoring and registration-time password rules.
//!
//! Scoring is delegated to a [`StrengthEstimator`]; the default is `zxcvbn`
//! (scores 0..=4). Only registration is validated, login passwords are sent
//! as typed.

#[cfg(test)]
#[path = "password_test.rs"]
mod password_test;

use super::error::ValidationError;

/// Lowest acceptable estimator score.
pub const MIN_STRENGTH_SCORE: u8 = 2;
/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Estimator output for a single password.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PasswordStrength {
    /// 0 (trivially guessable) to 4 (very strong).
    pub score: u8,
    pub warning: Option<String>,
    pub suggestions: Vec<String>,
}

/// Coarse label shown next to the password field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrengthLabel {
    Weak,
    Fair,
    Good,
    Strong,
}

impl StrengthLabel {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => Self::Weak,
            2 => Self::Fair,
            3 => Self::Good,
            _ => Self::Strong,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Strong => "Strong",
        }
    }

    /// CSS modifier used by the login form.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Weak => "strength--weak",
            Self::Fair => "strength--fair",
            Self::Good => "strength--good",
            Self::Strong => "strength--strong",
        }
    }
}

pub trait StrengthEstimator {
    fn estimate(&self, password: &str, user_inputs: &[&str]) -> PasswordStrength;
}

/// `zxcvbn`-backed estimator.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZxcvbnEstimator;

impl StrengthEstimator for ZxcvbnEstimator {
    fn estimate(&self, password: &str, user_inputs: &[&str]) -> PasswordStrength {
        if password.is_empty() {
            return PasswordStrength::default();
        }

        match zxcvbn::zxcvbn(password, user_inputs) {
            Ok(entropy) => {
                let feedback = entropy.feedback().as_ref();
                PasswordStrength {
                    score: entropy.score(),
                    warning: feedback
                        .and_then(|f| f.warning())
                        .map(|w| w.to_string())
                        .filter(|w| !w.is_empty()),
                    suggestions: feedback
                        .map(|f| {
                            f.suggestions()
                                .iter()
                                .map(ToString::to_string)
                                .map(|s| s.trim().to_owned())
                                .filter(|s| !s.is_empty())
                                .collect()
                        })
                        .unwrap_or_default(),
                }
            }
            Err(e) => {
                leptos::logging::warn!("password: strength estimate failed: {e:?}");
                PasswordStrength::default()
            }
        }
    }
}

/// Check a registration password before any network traffic.
///
/// Rules are checked weak, then length, then mismatch; the first violation is
/// returned and later rules are not evaluated.
///
/// # Errors
///
/// Returns the first violated [`ValidationError`].
pub fn validate_registration<E: StrengthEstimator + ?Sized>(
    estimator: &E,
    password: &str,
    confirmation: &str,
    user_inputs: &[&str],
) -> Result<(), ValidationError> {
    if estimator.estimate(password, user_inputs).score < MIN_STRENGTH_SCORE {
        return Err(ValidationError::WeakPassword);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort);
    }
    if password != confirmation {
        return Err(ValidationError::Mismatch);
    }
    Ok(())
}

/// Everything the registration form shows while the user types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PasswordFeedback {
    pub label: Option<StrengthLabel>,
    pub violations: Vec<ValidationError>,
    pub suggestions: Vec<String>,
}

/// Live feedback for the registration form.
///
/// Unlike [`validate_registration`] this lists every violated rule. Mismatch
/// is only reported once a confirmation has been typed.
pub fn live_feedback<E: StrengthEstimator + ?Sized>(
    estimator: &E,
    password: &str,
    confirmation: &str,
    user_inputs: &[&str],
) -> PasswordFeedback {
    if password.is_empty() {
        return PasswordFeedback::default();
    }

    let strength = estimator.estimate(password, user_inputs);
    let mut violations = Vec::new();
    if strength.score < MIN_STRENGTH_SCORE {
        violations.push(ValidationError::WeakPassword);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        violations.push(ValidationError::TooShort);
    }
    if !confirmation.is_empty() && password != confirmation {
        violations.push(ValidationError::Mismatch);
    }

    PasswordFeedback {
        label: Some(StrengthLabel::from_score(strength.score)),
        violations,
        suggestions: strength.suggestions,
    }
}
