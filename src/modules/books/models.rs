use std::fmt;

use libris_http::FieldErrors;
use serde::{Deserialize, Serialize};

/// Server-assigned book identifier.
pub type BookId = u64;

/// A catalog entry as returned by `GET /api/books`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier for the book
    pub id: BookId,
    /// Title of the book
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub publisher: String,
}

/// The editable fields of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Author,
    Category,
    Publisher,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Author, Field::Category, Field::Publisher];

    /// Key used in request bodies and error maps.
    pub fn key(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Category => "category",
            Field::Publisher => "publisher",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Author => "Author",
            Field::Category => "Category",
            Field::Publisher => "Publisher",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unsaved form values; doubles as the body of create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub category: String,
    pub publisher: String,
}

impl BookDraft {
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            publisher: book.publisher.clone(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Author => &self.author,
            Field::Category => &self.category,
            Field::Publisher => &self.publisher,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Author => &mut self.author,
            Field::Category => &mut self.category,
            Field::Publisher => &mut self.publisher,
        };
        *slot = value.into();
    }

    /// Every field must be non-blank. Errors name exactly the blank fields.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let errors: FieldErrors = Field::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .map(|field| (field.key().to_string(), vec![format!("{field} is required.")]))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
