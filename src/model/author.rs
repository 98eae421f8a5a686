use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::common::required_text;
use crate::model::{generate_id, Id, ValidationError, Validator};

pub const AUTHOR_NAME_MAX_LEN: usize = 100;

/// Shown instead of a death date while the author is still living
pub const LIVING_SENTINEL: &str = "Today";

pub const LIFESPAN_UNAVAILABLE: &str = "Life Span Unavailable";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Id,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAuthor {
    pub first_name: Option<String>,
    pub family_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl NewAuthor {
    pub fn new(first_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            family_name: Some(family_name.into()),
            ..Self::default()
        }
    }

    pub fn into_author(self) -> Result<Author, ValidationError> {
        let mut validator = Validator::new();
        let first_name = validator.check(
            "first_name",
            required_text(self.first_name.as_deref(), "first name", AUTHOR_NAME_MAX_LEN),
        );
        let family_name = validator.check(
            "family_name",
            required_text(self.family_name.as_deref(), "family name", AUTHOR_NAME_MAX_LEN),
        );
        validator.finish()?;

        Ok(Author {
            id: generate_id(),
            first_name: first_name.unwrap_or_default(),
            family_name: family_name.unwrap_or_default(),
            date_of_birth: self.date_of_birth,
            date_of_death: self.date_of_death,
        })
    }
}

/// Partial update of an author. Dates can be set but not cleared.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuthorPatch {
    pub first_name: Option<String>,
    pub family_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl AuthorPatch {
    pub fn validate(self) -> Result<Self, ValidationError> {
        let mut validator = Validator::new();
        let first_name = match self.first_name {
            Some(name) => validator.check(
                "first_name",
                required_text(Some(&name), "first name", AUTHOR_NAME_MAX_LEN),
            ),
            None => None,
        };
        let family_name = match self.family_name {
            Some(name) => validator.check(
                "family_name",
                required_text(Some(&name), "family name", AUTHOR_NAME_MAX_LEN),
            ),
            None => None,
        };
        validator.finish()?;

        Ok(Self {
            first_name,
            family_name,
            date_of_birth: self.date_of_birth,
            date_of_death: self.date_of_death,
        })
    }

    pub fn apply_to(&self, author: &Author) -> Author {
        Author {
            id: author.id.clone(),
            first_name: self
                .first_name
                .clone()
                .unwrap_or_else(|| author.first_name.clone()),
            family_name: self
                .family_name
                .clone()
                .unwrap_or_else(|| author.family_name.clone()),
            date_of_birth: self.date_of_birth.or(author.date_of_birth),
            date_of_death: self.date_of_death.or(author.date_of_death),
        }
    }
}

// Derived fields. Never stored, always recomputed from the record.

/// "Family, First", or an empty string when either part is missing
pub fn display_name(author: &Author) -> String {
    if author.first_name.is_empty() || author.family_name.is_empty() {
        return String::new();
    }
    format!("{}, {}", author.family_name, author.first_name)
}

pub fn author_url(author: &Author) -> String {
    format!("/catalog/author/{}", author.id)
}

/// Medium date format, e.g. "Oct 14, 1983"
fn format_date_med(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn lifespan(author: &Author) -> String {
    let Some(born) = author.date_of_birth else {
        return LIFESPAN_UNAVAILABLE.to_string();
    };
    let died = author
        .date_of_death
        .map(format_date_med)
        .unwrap_or_else(|| LIVING_SENTINEL.to_string());
    format!("{} - {}", format_date_med(born), died)
}

pub fn iso_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// An author as returned by the API: stored fields plus the derived ones
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    pub name: String,
    pub url: String,
    pub lifespan: String,
    pub date_of_birth_yyyy_mm_dd: Option<String>,
    pub date_of_death_yyyy_mm_dd: Option<String>,
}

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            name: display_name(&author),
            url: author_url(&author),
            lifespan: lifespan(&author),
            date_of_birth_yyyy_mm_dd: iso_date(author.date_of_birth),
            date_of_death_yyyy_mm_dd: iso_date(author.date_of_death),
            author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn author() -> Author {
        Author {
            id: "a1".to_string(),
            first_name: "Patrick".to_string(),
            family_name: "Rothfuss".to_string(),
            date_of_birth: Some(date(1973, 6, 6)),
            date_of_death: None,
        }
    }

    #[test]
    fn display_name_joins_family_then_first() {
        assert_eq!(display_name(&author()), "Rothfuss, Patrick");

        let mut nameless = author();
        nameless.first_name.clear();
        assert_eq!(display_name(&nameless), "");
    }

    #[test]
    fn url_is_derived_from_id() {
        assert_eq!(author_url(&author()), "/catalog/author/a1");
    }

    #[test]
    fn lifespan_formats() {
        assert_eq!(lifespan(&author()), "Jun 6, 1973 - Today");

        let mut dead = author();
        dead.date_of_birth = Some(date(1920, 1, 2));
        dead.date_of_death = Some(date(1992, 4, 6));
        assert_eq!(lifespan(&dead), "Jan 2, 1920 - Apr 6, 1992");

        let mut unknown = author();
        unknown.date_of_birth = None;
        assert_eq!(lifespan(&unknown), LIFESPAN_UNAVAILABLE);
    }

    #[test]
    fn view_carries_derived_fields() {
        let json = serde_json::to_value(AuthorView::from(author())).unwrap();
        assert_eq!(json["id"], "a1");
        assert_eq!(json["first_name"], "Patrick");
        assert_eq!(json["date_of_birth"], "1973-06-06");
        assert_eq!(json["name"], "Rothfuss, Patrick");
        assert_eq!(json["url"], "/catalog/author/a1");
        assert_eq!(json["date_of_birth_yyyy_mm_dd"], "1973-06-06");
        assert!(json["date_of_death_yyyy_mm_dd"].is_null());
    }

    #[test]
    fn new_author_reports_all_missing_names() {
        let err = NewAuthor::default().into_author().unwrap_err();
        let fields: Vec<_> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "family_name"]);
    }

    #[test]
    fn new_author_bounds_name_length() {
        let long = "n".repeat(AUTHOR_NAME_MAX_LEN + 1);
        let err = NewAuthor::new(long, "Smith").into_author().unwrap_err();
        assert_eq!(err.errors[0].field, "first_name");
    }

    #[test]
    fn patch_keeps_untouched_fields() {
        let original = author();
        let patch = AuthorPatch {
            date_of_death: Some(date(2020, 1, 1)),
            ..AuthorPatch::default()
        }
        .validate()
        .unwrap();
        let updated = patch.apply_to(&original);
        assert_eq!(updated.first_name, "Patrick");
        assert_eq!(updated.date_of_birth, original.date_of_birth);
        assert_eq!(updated.date_of_death, Some(date(2020, 1, 1)));
    }
}
