use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub mod store;

pub type BookId = u64;

/// A book as held by the [`store::BookStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub description: String,
    pub rating: u8,
    pub published_date: i32,
}

impl Book {
    fn new(
        id: BookId,
        title: &str,
        author: &str,
        category: &str,
        description: &str,
        rating: u8,
        published_date: i32,
    ) -> Self {
        Self {
            id,
            title: title.to_string(),
            author: author.to_string(),
            category: Some(category.to_string()),
            description: description.to_string(),
            rating,
            published_date,
        }
    }

    fn from_new_book(id: BookId, new_book: NewBook) -> Self {
        Self {
            id,
            title: new_book.title,
            author: new_book.author,
            category: new_book.category,
            description: new_book.description,
            // Range checked by `Validate` before the store builds a record.
            rating: new_book.rating as u8,
            published_date: new_book.published_date as i32,
        }
    }

    fn from_update(id: BookId, update: BookUpdate) -> Self {
        Self {
            id,
            title: update.title,
            author: update.author,
            category: update.category,
            description: update.description,
            // Range checked by `Validate` before the store builds a record.
            rating: update.rating as u8,
            published_date: update.published_date as i32,
        }
    }

    pub fn matches_key(&self, key: &BookKey) -> bool {
        match key {
            BookKey::Id(id) => self.id == *id,
            BookKey::Title(title) => eq_ignore_case(&self.title, title),
        }
    }
}

/// The records every fresh store starts with when seeding is enabled.
pub fn seed() -> Vec<Book> {
    vec![
        Book::new(1, "Computer Science Pro", "Coding with Roby", "science", "Great CS book", 5, 2023),
        Book::new(2, "Be Fast with FastAPI", "Coding with Roby", "programming", "Great book", 5, 2024),
        Book::new(3, "Master Endpoints", "Coding with Roby", "programming", "Good CS book", 5, 2025),
        Book::new(4, "HP1", "Author 1", "fantasy", "An average book", 2, 2020),
        Book::new(5, "HP2", "Author 2", "fantasy", "A nice book", 3, 2021),
        Book::new(6, "HP3", "Author 3", "fantasy", "A terrible book", 1, 2022),
    ]
}

/// Payload for creating a book. The id is assigned by the store when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, ToSchema, Validate)]
pub struct NewBook {
    #[serde(default)]
    #[validate(range(min = 1, message = "Must be greater than 0"))]
    pub id: Option<BookId>,
    #[validate(length(min = 3, message = "Must be at least 3 characters long"))]
    pub title: String,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub author: String,
    #[serde(default)]
    pub category: Option<String>,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Must be between 1 and 100 characters long"
    ))]
    pub description: String,
    #[validate(range(min = 1, max = 5, message = "Must be between 1 and 5"))]
    pub rating: i64,
    #[validate(range(
        min = 1901,
        max = 2030,
        message = "Must be between 1901 and 2030"
    ))]
    pub published_date: i64,
}

/// Payload for replacing a book.
///
/// Keyed by `id` when present, otherwise by the case-insensitive `title`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, ToSchema, Validate)]
pub struct BookUpdate {
    #[serde(default)]
    #[validate(range(min = 1, message = "Must be greater than 0"))]
    pub id: Option<BookId>,
    #[validate(length(min = 3, message = "Must be at least 3 characters long"))]
    pub title: String,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub author: String,
    #[serde(default)]
    pub category: Option<String>,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Must be between 1 and 100 characters long"
    ))]
    pub description: String,
    #[validate(range(min = 1, max = 5, message = "Must be between 1 and 5"))]
    pub rating: i64,
    #[validate(range(
        min = 1901,
        max = 2030,
        message = "Must be between 1901 and 2030"
    ))]
    pub published_date: i64,
}

impl BookUpdate {
    pub fn key(&self) -> BookKey {
        match self.id {
            Some(id) => BookKey::Id(id),
            None => BookKey::Title(self.title.clone()),
        }
    }
}

/// Identifies a single book, either by id or by title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookKey {
    Id(BookId),
    Title(String),
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookKey::Id(id) => write!(f, "id {id}"),
            BookKey::Title(title) => write!(f, "title `{title}`"),
        }
    }
}

/// Field-equality filter over books. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub category: Option<String>,
    pub author: Option<String>,
    pub rating: Option<i64>,
    pub published_date: Option<i64>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        let category = match (&self.category, &book.category) {
            (None, _) => true,
            (Some(wanted), Some(category)) => eq_ignore_case(category, wanted),
            (Some(_), None) => false,
        };

        let author = self
            .author
            .as_deref()
            .map_or(true, |wanted| eq_ignore_case(&book.author, wanted));

        let rating = self
            .rating
            .map_or(true, |wanted| i64::from(book.rating) == wanted);

        let published_date = self
            .published_date
            .map_or(true, |wanted| i64::from(book.published_date) == wanted);

        category && author && rating && published_date
    }
}

/// Compares by full Unicode lowercase mapping (`"ÄB"` equals `"äb"`).
///
/// This is not case folding: `"ß"` and `"SS"` stay distinct, and so do the
/// Greek final and medial sigma.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book() -> NewBook {
        NewBook {
            id: None,
            title: "Valid title".to_string(),
            author: "Someone".to_string(),
            category: None,
            description: "Fine".to_string(),
            rating: 3,
            published_date: 2000,
        }
    }

    #[test]
    fn accepts_boundaries() {
        let mut book = new_book();
        book.title = "abc".to_string();
        book.description = "d".repeat(100);
        book.rating = 1;
        book.published_date = 1901;
        assert!(book.validate().is_ok());

        book.rating = 5;
        book.published_date = 2030;
        assert!(book.validate().is_ok());
    }

    fn assert_rejected(field: &str, mutate: impl FnOnce(&mut NewBook)) {
        let mut book = new_book();
        mutate(&mut book);

        let errors = book.validate().expect_err("must be rejected");
        assert!(
            errors.field_errors().contains_key(field),
            "expected an error on `{field}`, got {errors:?}"
        );
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert_rejected("title", |b| b.title = "ab".to_string());
        assert_rejected("author", |b| b.author = String::new());
        assert_rejected("description", |b| b.description = String::new());
        assert_rejected("description", |b| b.description = "d".repeat(101));
        assert_rejected("rating", |b| b.rating = 0);
        assert_rejected("rating", |b| b.rating = 6);
        assert_rejected("published_date", |b| b.published_date = 1900);
        assert_rejected("published_date", |b| b.published_date = 2031);
        assert_rejected("rating", |b| b.rating = -1);
        assert_rejected("rating", |b| b.rating = 300);
        assert_rejected("id", |b| b.id = Some(0));
    }

    #[test]
    fn title_length_counts_characters() {
        let mut book = new_book();
        book.title = "äöü".to_string();
        assert!(book.validate().is_ok());
    }

    #[test]
    fn filter_is_case_insensitive_and_conjunctive() {
        let books = seed();

        let filter = BookFilter {
            author: Some("coding WITH roby".to_string()),
            category: Some("PROGRAMMING".to_string()),
            ..Default::default()
        };
        let ids: Vec<_> = books.iter().filter(|b| filter.matches(b)).map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 3]);

        assert!(books.iter().all(|b| BookFilter::default().matches(b)));
    }

    #[test]
    fn title_matching_lowercases_unicode() {
        let mut book = seed().remove(3);
        book.title = "Ärger im Öl".to_string();

        assert!(book.matches_key(&BookKey::Title("äRGER IM öL".to_string())));
        assert!(!book.matches_key(&BookKey::Title("Arger im Ol".to_string())));

        book.title = "Straße".to_string();
        assert!(book.matches_key(&BookKey::Title("STRAßE".to_string())));
        assert!(!book.matches_key(&BookKey::Title("STRASSE".to_string())));
    }

    #[test]
    fn update_key_prefers_id() {
        let update = BookUpdate {
            id: Some(4),
            title: "HP1".to_string(),
            author: "Author 1".to_string(),
            category: None,
            description: "An average book".to_string(),
            rating: 2,
            published_date: 2020,
        };
        assert_eq!(update.key(), BookKey::Id(4));

        let update = BookUpdate { id: None, ..update };
        assert_eq!(update.key(), BookKey::Title("HP1".to_string()));
    }
}
