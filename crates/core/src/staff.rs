//! Staff form input and its validation rules.
//!
//! Field errors are collected into [`validator::ValidationErrors`] so the
//! API can report every failing field at once, keyed by field name.

use std::borrow::Cow;

use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::forms;
use crate::roles::{Role, DEFAULT_ROLE};
use crate::types::DbId;

/// Most images a single staff request may carry.
pub const MAX_IMAGES: usize = 5;
/// Largest accepted image, in kilobytes.
pub const MAX_IMAGE_KB: usize = 2048;
/// Accepted image extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "png", "jpg"];

/// Which operation a staff form is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

/// Staff create/update body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StaffInput {
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "forms::opt_text")]
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "forms::opt_text")]
    #[validate(length(min = 6, message = "The password field must be at least 6 characters."))]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "forms::opt_text")]
    pub role: Option<String>,

    #[serde(default, deserialize_with = "forms::opt_bool")]
    pub active: Option<bool>,

    #[serde(default, deserialize_with = "forms::opt_text")]
    #[validate(required(message = "The staff name field is required."))]
    pub staff_name: Option<String>,

    #[serde(default, deserialize_with = "forms::opt_text")]
    pub employee_code: Option<String>,

    #[serde(default, deserialize_with = "forms::opt_text")]
    #[validate(required(message = "The date of birth field is required."))]
    pub date_of_birth: Option<String>,

    #[serde(default, deserialize_with = "forms::opt_text")]
    #[validate(required(message = "The address field is required."))]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "forms::opt_text")]
    #[validate(required(message = "The mobile field is required."))]
    pub mobile: Option<String>,

    #[serde(default, deserialize_with = "forms::opt_value_list")]
    pub course_id: Option<Vec<Value>>,

    #[serde(default, deserialize_with = "forms::opt_value_list")]
    pub semester_id: Option<Vec<Value>>,

    #[serde(default, deserialize_with = "forms::opt_value_list")]
    pub subject_id: Option<Vec<Value>>,

    #[serde(default, deserialize_with = "forms::opt_json_list")]
    pub education: Option<Vec<EducationInput>>,

    #[serde(default, deserialize_with = "forms::opt_json_list")]
    pub papers: Option<Vec<PaperInput>>,

    /// Remove every stored image before appending uploads.
    #[serde(default, deserialize_with = "forms::opt_bool")]
    pub delete_existing_images: Option<bool>,

    /// Remove these stored images before appending uploads. Ignored when
    /// `delete_existing_images` is set.
    #[serde(default, deserialize_with = "forms::opt_id_list")]
    pub deleted_image_ids: Option<Vec<DbId>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EducationInput {
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub qualification: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub college_name: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub board_university: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub passing_year: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub percentage: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PaperInput {
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub journal: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub published_year: Option<String>,
}

impl EducationInput {
    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("qualification", &self.qualification),
            ("college_name", &self.college_name),
            ("board_university", &self.board_university),
            ("passing_year", &self.passing_year),
            ("percentage", &self.percentage),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_none())
        .map(|(k, _)| k)
        .collect()
    }
}

/// An uploaded file as seen by the image rules.
#[derive(Debug, Clone, Copy)]
pub struct ImageCandidate<'a> {
    pub file_name: &'a str,
    pub bytes: &'a [u8],
}

/// Build a field error with a human-readable message.
pub fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Whether `errors` holds no failures.
pub fn is_clean(errors: &ValidationErrors) -> bool {
    errors.errors().is_empty()
}

impl StaffInput {
    /// Run every field rule for `mode` and return the collected errors.
    ///
    /// Uniqueness rules need the database and are added by the caller.
    pub fn field_errors(&self, mode: FormMode) -> ValidationErrors {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };

        if mode == FormMode::Create {
            if self.name.is_none() {
                errors.add("name", field_error("required", "The name field is required."));
            }
            if self.password.is_none() {
                errors.add(
                    "password",
                    field_error("required", "The password field is required."),
                );
            }
        }

        if let Some(dob) = &self.date_of_birth {
            if forms::parse_date(dob).is_none() {
                errors.add(
                    "date_of_birth",
                    field_error("date", "The date of birth field must be a valid date."),
                );
            }
        }

        if self.role.is_some() && self.resolved_role().is_err() {
            errors.add("role", field_error("in", "The selected role is invalid."));
        }

        for (index, entry) in self.education.iter().flatten().enumerate() {
            let missing = entry.missing_fields();
            if !missing.is_empty() {
                errors.add(
                    "education",
                    field_error(
                        "required",
                        format!(
                            "Education entry {} is missing: {}.",
                            index + 1,
                            missing.join(", ")
                        ),
                    ),
                );
            }
        }

        for (index, paper) in self.papers.iter().flatten().enumerate() {
            if paper.title.is_none() {
                errors.add(
                    "papers",
                    field_error(
                        "required",
                        format!("Paper entry {} is missing a title.", index + 1),
                    ),
                );
            }
        }

        errors
    }

    /// The role to assign, defaulting to the baseline staff role.
    pub fn resolved_role(&self) -> Result<Role, String> {
        self.role.as_deref().unwrap_or(DEFAULT_ROLE).parse()
    }

    /// Parsed date of birth. `None` when absent or malformed.
    pub fn birth_date(&self) -> Option<chrono::NaiveDate> {
        self.date_of_birth.as_deref().and_then(forms::parse_date)
    }

    /// Password to hash on this request, if any.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

/// Apply the upload rules to the images of one request.
pub fn check_images(errors: &mut ValidationErrors, images: &[ImageCandidate<'_>]) {
    if images.len() > MAX_IMAGES {
        errors.add(
            "images",
            field_error(
                "max",
                format!("The images field must not have more than {MAX_IMAGES} items."),
            ),
        );
    }

    for (index, image) in images.iter().enumerate() {
        let extension = image
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            errors.add(
                "images",
                field_error(
                    "mimes",
                    format!(
                        "The images.{index} field must be a file of type: {}.",
                        IMAGE_EXTENSIONS.join(", ")
                    ),
                ),
            );
            continue;
        }

        if !matches!(
            image::guess_format(image.bytes),
            Ok(image::ImageFormat::Png | image::ImageFormat::Jpeg)
        ) {
            errors.add(
                "images",
                field_error("image", format!("The images.{index} field must be an image.")),
            );
            continue;
        }

        if image.bytes.len() > MAX_IMAGE_KB * 1024 {
            errors.add(
                "images",
                field_error(
                    "max",
                    format!(
                        "The images.{index} field must not be greater than {MAX_IMAGE_KB} kilobytes."
                    ),
                ),
            );
        }
    }
}
